use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OptionCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pugh option`.
pub fn handle(
    action: &OptionCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let store = &mut ctx.store;
    match action {
        OptionCommands::Add { label } => {
            let id = store.add_option(label)?;
            output(&json!({ "option": store.snapshot().option(&id) }), flags.format)
        }
        OptionCommands::Rename { id, label } => output(&store.rename_option(id, label)?, flags.format),
        OptionCommands::Remove { id } => output(&store.remove_option(id)?, flags.format),
        OptionCommands::Reorder { id, position } => {
            output(&store.reorder_option(id, *position)?, flags.format)
        }
        OptionCommands::Describe { id, description } => {
            output(&store.describe_option(id, description)?, flags.format)
        }
    }
}
