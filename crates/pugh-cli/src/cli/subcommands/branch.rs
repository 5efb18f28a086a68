use clap::Subcommand;

/// Branch commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BranchCommands {
    /// List branches.
    List,
    /// Fork the active branch and switch to the fork.
    Create { name: String },
    /// Switch the active branch.
    Switch { id: String },
    /// Rename a branch.
    Rename { id: String, name: String },
    /// Delete a branch other than main.
    Delete { id: String },
}
