use clap::Subcommand;

/// Criterion commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CriterionCommands {
    /// Add a criterion.
    Add {
        label: String,
        /// Scale override: `binary`, `unbounded`, or `MIN..MAX[:STEP]`.
        #[arg(long)]
        scale: Option<String>,
    },
    /// Rename a criterion.
    Rename { id: String, label: String },
    /// Remove a criterion and its ratings.
    Remove { id: String },
    /// Move a criterion to a zero-based position.
    Reorder {
        id: String,
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },
    /// Set the scale override.
    Scale { id: String, scale: String },
    /// Set the description.
    Describe { id: String, description: String },
    /// Set the weight.
    Weight {
        id: String,
        #[arg(allow_negative_numbers = true)]
        weight: i64,
    },
}
