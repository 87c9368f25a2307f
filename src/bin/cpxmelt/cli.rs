use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cpxmelt",
    about = "Equilibrium melt compositions from clinopyroxene trace-element data",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Calculate melt and normalized values and write the results workbook
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Classify the sheets of a workbook without calculating anything
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),
}

/// Options shared by all commands.
#[derive(Args)]
pub struct CommonOptions {
    /// Input workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Custom classifier rules (TOML file)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Suppress banner, progress and tables (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Log more detail to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Output workbook (.xlsx); defaults to <INPUT>_melt_results.xlsx
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Add a long-format "Detailed Results" sheet
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub common: CommonOptions,
}

impl Command {
    pub fn common(&self) -> &CommonOptions {
        match self {
            Command::Run(args) => &args.common,
            Command::Inspect(args) => &args.common,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_flags() {
        let cli = Cli::try_parse_from([
            "cpxmelt", "run", "-i", "in.xlsx", "-o", "out.xlsx", "--detailed", "-vv",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.common.input, PathBuf::from("in.xlsx"));
        assert_eq!(args.output, Some(PathBuf::from("out.xlsx")));
        assert!(args.detailed);
        assert_eq!(args.common.verbose, 2);
        assert!(!args.common.quiet);
    }

    #[test]
    fn inspect_requires_input() {
        assert!(Cli::try_parse_from(["cpxmelt", "inspect"]).is_err());
        let cli = Cli::try_parse_from(["cpxmelt", "i", "-i", "in.ods", "--rules", "r.toml"]).unwrap();
        assert_eq!(
            cli.command.common().rules.as_deref(),
            Some(std::path::Path::new("r.toml"))
        );
    }
}
