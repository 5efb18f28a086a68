use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `pugh` binary.
#[derive(Debug, Parser)]
#[command(name = "pugh", version, about = "Pugh decision matrices with branchable history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to the nearest directory holding `.pugh`)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::{BranchCommands, CriterionCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["pugh", "--format", "table", "--verbose", "show"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Show));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["pugh", "totals", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Totals));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["pugh", "--format", "xml", "show"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["pugh", "--project", "/tmp/demo", "show"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }

    #[test]
    fn nested_subcommands_parse() {
        let cli = Cli::try_parse_from(["pugh", "criterion", "weight", "cri_1", "7"])
            .expect("cli should parse");
        let Commands::Criterion { action } = cli.command else {
            panic!("expected criterion command");
        };
        assert!(matches!(
            action,
            CriterionCommands::Weight { ref id, weight: 7 } if id == "cri_1"
        ));

        let cli = Cli::try_parse_from(["pugh", "branch", "create", "pro-react"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Branch {
                action: BranchCommands::Create { .. }
            }
        ));
    }

    #[test]
    fn negative_positions_and_values_parse() {
        let cli = Cli::try_parse_from(["pugh", "rate", "opt_1", "cri_1", "--value", "-2"])
            .expect("cli should parse");
        let Commands::Rate(args) = cli.command else {
            panic!("expected rate command");
        };
        assert_eq!(args.value, Some(-2.0));
    }
}
