use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    BranchCommands, CriterionCommands, MatrixCommands, OptionCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Projected matrix of the active branch.
    Show,
    /// Weighted totals per option and the current leader.
    Totals,
    /// Event log of the active branch.
    Log(LogArgs),
    /// Criteria (rows).
    Criterion {
        #[command(subcommand)]
        action: CriterionCommands,
    },
    /// Options (columns).
    #[command(name = "option")]
    DecisionOption {
        #[command(subcommand)]
        action: OptionCommands,
    },
    /// Rate a cell, optionally with a label and comment.
    Rate(RateArgs),
    /// Clear every rating in a cell.
    Unrate(CellArgs),
    /// Comment on a cell or reply to one of its entries.
    Comment(CommentArgs),
    /// Comment threads and rating history of a cell.
    Thread(CellArgs),
    /// Matrix title, description and scoring defaults.
    Matrix {
        #[command(subcommand)]
        action: MatrixCommands,
    },
    /// Branches.
    Branch {
        #[command(subcommand)]
        action: BranchCommands,
    },
}

/// Arguments for `pugh log`.
#[derive(Clone, Debug, Args)]
pub struct LogArgs {
    /// Show only the last N events.
    #[arg(long)]
    pub tail: Option<usize>,
    /// Log of another branch instead of the active one.
    #[arg(long)]
    pub branch: Option<String>,
}

/// An option/criterion pair.
#[derive(Clone, Debug, Args)]
pub struct CellArgs {
    pub option: String,
    pub criterion: String,
}

/// Arguments for `pugh rate`.
#[derive(Clone, Debug, Args)]
pub struct RateArgs {
    pub option: String,
    pub criterion: String,
    #[arg(long, allow_negative_numbers = true)]
    pub value: Option<f64>,
    /// Display label; defaults to the scale's label for the value.
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

/// Arguments for `pugh comment`.
#[derive(Clone, Debug, Args)]
pub struct CommentArgs {
    pub option: String,
    pub criterion: String,
    pub text: String,
    /// Entry id to reply to.
    #[arg(long)]
    pub reply_to: Option<String>,
}
