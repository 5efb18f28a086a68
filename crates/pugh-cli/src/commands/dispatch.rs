use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Show => commands::show::handle(ctx, flags),
        Commands::Totals => commands::totals::handle(ctx, flags),
        Commands::Log(args) => commands::log::handle(&args, ctx, flags),
        Commands::Criterion { action } => commands::criterion::handle(&action, ctx, flags),
        Commands::DecisionOption { action } => commands::option::handle(&action, ctx, flags),
        Commands::Rate(args) => commands::rate::handle_rate(&args, ctx, flags),
        Commands::Unrate(args) => commands::rate::handle_unrate(&args, ctx, flags),
        Commands::Comment(args) => commands::comment::handle_comment(&args, ctx, flags),
        Commands::Thread(args) => commands::comment::handle_thread(&args, ctx, flags),
        Commands::Matrix { action } => commands::matrix::handle(&action, ctx, flags),
        Commands::Branch { action } => commands::branch::handle(&action, ctx, flags),
    }
}

/// Name of the mutation `command` performs, or `None` for read-only
/// commands. Mutating runs hold the registry lock under this name.
#[must_use]
pub fn mutation_name(command: &Commands) -> Option<&'static str> {
    use crate::cli::subcommands::BranchCommands;

    match command {
        Commands::Show | Commands::Totals | Commands::Log(_) | Commands::Thread(_) => None,
        Commands::Branch {
            action: BranchCommands::List,
        } => None,
        Commands::Branch { .. } => Some("branch"),
        Commands::Criterion { .. } => Some("criterion"),
        Commands::DecisionOption { .. } => Some("option"),
        Commands::Rate(_) => Some("rate"),
        Commands::Unrate(_) => Some("unrate"),
        Commands::Comment(_) => Some("comment"),
        Commands::Matrix { .. } => Some("matrix"),
    }
}
