use clap::Subcommand;

/// Matrix-level commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MatrixCommands {
    /// Set title, description and scoring defaults together.
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        allow_negative: bool,
        /// Default scale: `binary`, `unbounded`, or `MIN..MAX[:STEP]`.
        #[arg(long)]
        scale: Option<String>,
    },
    /// Change the title.
    Title { title: String },
    /// Change the description.
    Description { description: String },
    /// Change the default scale.
    Scale { scale: String },
    /// Archive the matrix.
    Archive,
}
