use pugh_core::scale::Scale;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MatrixCommands;
use crate::commands::shared::parse::parse_scale;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pugh matrix`.
pub fn handle(action: &MatrixCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = &mut ctx.store;
    let event = match action {
        MatrixCommands::Create {
            title,
            description,
            allow_negative,
            scale,
        } => {
            let scale = scale
                .as_deref()
                .map(parse_scale)
                .transpose()?
                .unwrap_or_default();
            store.create_matrix(title, description.as_deref(), *allow_negative, scale)?
        }
        MatrixCommands::Title { title } => store.set_matrix_title(title)?,
        MatrixCommands::Description { description } => store.set_matrix_description(description)?,
        MatrixCommands::Scale { scale } => store.set_default_scale(parse_scale(scale)?)?,
        MatrixCommands::Archive => store.archive_matrix()?,
    };
    tracing::debug!(event_id = %event.id, "matrix updated");
    output(&event, flags.format)
}
