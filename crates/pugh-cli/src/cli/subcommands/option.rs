use clap::Subcommand;

/// Option commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OptionCommands {
    /// Add an option.
    Add { label: String },
    /// Rename an option.
    Rename { id: String, label: String },
    /// Remove an option and its ratings.
    Remove { id: String },
    /// Move an option to a zero-based position.
    Reorder {
        id: String,
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },
    /// Set the description.
    Describe { id: String, description: String },
}
