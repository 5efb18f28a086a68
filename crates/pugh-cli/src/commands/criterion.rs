use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CriterionCommands;
use crate::commands::shared::parse::parse_scale;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pugh criterion`.
pub fn handle(
    action: &CriterionCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let store = &mut ctx.store;
    match action {
        CriterionCommands::Add { label, scale } => {
            let scale = scale.as_deref().map(parse_scale).transpose()?;
            let id = store.add_criterion(label, scale)?;
            output(
                &json!({
                    "criterion": store.snapshot().criterion(&id),
                    "weight": store.snapshot().weight(&id),
                }),
                flags.format,
            )
        }
        CriterionCommands::Rename { id, label } => {
            output(&store.rename_criterion(id, label)?, flags.format)
        }
        CriterionCommands::Remove { id } => output(&store.remove_criterion(id)?, flags.format),
        CriterionCommands::Reorder { id, position } => {
            output(&store.reorder_criterion(id, *position)?, flags.format)
        }
        CriterionCommands::Scale { id, scale } => {
            let scale = parse_scale(scale)?;
            output(&store.set_criterion_scale(id, scale)?, flags.format)
        }
        CriterionCommands::Describe { id, description } => {
            output(&store.describe_criterion(id, description)?, flags.format)
        }
        CriterionCommands::Weight { id, weight } => {
            output(&store.set_weight(id, *weight)?, flags.format)
        }
    }
}
