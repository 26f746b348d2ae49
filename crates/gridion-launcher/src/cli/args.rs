// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.

//! CLI argument definitions using clap.
//!
//! Two independent parsers make up the surface: `run` launches a simulation
//! over a date range, `extract` post-processes a completed run. Both are
//! syntactic gates only — dates, solver names and directory contents are
//! validated downstream by the engine orchestrator.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use gridion_types::{DEFAULT_FREQUENCY, ExtractConfig, RunConfig, Threads};

use crate::solvers::{DEFAULT_SOLVER, SolverRegistry};

#[derive(Parser, Debug)]
#[command(name = "gridion-sim")]
#[command(version, about = "GridION simulation launcher CLI")]
#[command(
    long_about = "Command-line front-end for the GridION grid simulation engine.\n\
    \nValidates the command line, resolves defaults and prints the resulting\n\
    run or extraction configuration as JSON for the engine orchestrator.\n\
    Semantic checks (date ranges, solver availability, input files) belong\n\
    to the orchestrator; this binary is the syntactic gate.\n\
    \nExamples:\n  \
    gridion-sim run -s 2024-01-01 -e 2024-01-07 --interval 24 -i ./texas -d\n  \
    gridion-sim extract -s 2024-01-01 -e 2024-01-07 -f D -o ./results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch a simulation over a date range
    #[command(
        long_about = "Launch a simulation over a date range.\n\
        \nThe engine runs one optimization per interval between the start and\n\
        end dates, reading its input profiles from the input directory.\n\
        With --extract-data the extraction pipeline runs automatically once\n\
        the engine finishes.\n\
        \nExamples:\n  \
        gridion-sim run -s 2024-01-01 -e 2024-01-07 --interval 24 -i ./texas\n  \
        gridion-sim run -s 2024-01-01 -e 2024-01-07 --interval 24 -i ./texas -d -o ./out\n  \
        gridion-sim run -s 2024-01-01 -e 2024-01-07 --interval 24 -i ./texas --solver glpk -t 8"
    )]
    Run(RunArgs),

    /// Extract results from a completed simulation run
    #[command(
        long_about = "Extract results from a previously completed simulation run into\n\
        structured output files, without touching the engine.\n\
        \nExamples:\n  \
        gridion-sim extract -s 2024-01-01 -e 2024-01-07\n  \
        gridion-sim extract -s 2024-01-01 -e 2024-01-07 -f D -o ./results -k"
    )]
    Extract(ExtractArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Simulation start date
    #[arg(
        short = 's',
        long,
        value_name = "TIMESTAMP",
        help = "The start date for the simulation",
        long_help = "The start date for the simulation in format 'YYYY-MM-DD', 'YYYY-MM-DD HH', \
          'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD HH:MM:SS'."
    )]
    pub start_date: Option<String>,

    /// Simulation end date
    #[arg(
        short = 'e',
        long,
        value_name = "TIMESTAMP",
        help = "The end date for the simulation",
        long_help = "The end date for the simulation in format 'YYYY-MM-DD', 'YYYY-MM-DD HH', \
          'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD HH:MM:SS'. If only the date is specified \
          (without any hours), the entire end date will be included in the simulation."
    )]
    pub end_date: Option<String>,

    /// Length of each interval in hours
    #[arg(
        short = 'n',
        long,
        visible_alias = "int",
        value_name = "HOURS",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "The length of each interval in hours"
    )]
    pub interval: Option<u32>,

    /// Directory with the input data files
    #[arg(
        short = 'i',
        long,
        value_name = "DIR",
        help = "The directory containing the input data files",
        long_help = "The directory containing the input data files. Required files are \
          'grid.json', 'demand.csv', 'hydro.csv', 'solar.csv', and 'wind.csv'."
    )]
    pub input_dir: Option<PathBuf>,

    /// Engine thread count, or 'auto'
    #[arg(
        short = 't',
        long,
        value_name = "COUNT",
        default_value_t = Threads::Auto,
        help = "The number of threads to run the simulation with",
        long_help = "The number of threads to run the simulation with, as a positive \
          integer or 'auto'. This is optional and defaults to auto."
    )]
    pub threads: Threads,

    /// Extract the generated data once the engine finishes
    #[arg(
        short = 'd',
        long,
        help = "Extract the simulation data once the engine has finished",
        long_help = "If this flag is used, the data generated by the simulation after the \
          engine has finished running will be automatically extracted into structured \
          output files, and the result.mat files will be deleted. The extraction \
          process can be memory intensive. This is optional and defaults to false if \
          the flag is omitted."
    )]
    pub extract_data: bool,

    /// Directory for the extracted data
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "The directory to store the extracted data",
        long_help = "The directory to store the extracted data. This is optional and \
          defaults to a folder in the input directory. This flag is only used if the \
          extract-data flag is set."
    )]
    pub output_dir: Option<PathBuf>,

    /// Keep the raw result files after extraction
    #[arg(
        short = 'k',
        long,
        help = "Keep the engine's result.mat files after extraction",
        long_help = "The result.mat files found in the execute directory will be kept \
          instead of deleted after extraction. This flag is only used if the \
          extract-data flag is set."
    )]
    pub keep_matlab: bool,

    // Help text is rendered from the solver registry at construction time,
    // see `solver_help`. Unknown names pass through: the engine is the source
    // of truth for solver validity.
    #[arg(long, value_name = "NAME", help = "Specify the solver to run the optimization")]
    pub solver: Option<String>,

    /// Julia environment for the engine runtime
    #[arg(
        short = 'j',
        long,
        value_name = "DIR",
        help = "The path to the julia environment within which to run the engine",
        long_help = "The path to the julia environment within which to run the engine. \
          This is optional and defaults to the default julia environment."
    )]
    pub julia_env: Option<PathBuf>,

    // For backwards compatibility with scenario-manager callers
    #[arg(
        value_name = "SCENARIO_ID",
        help = "Scenario ID only if launched by the scenario manager"
    )]
    pub scenario_id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// Start date of the completed run
    #[arg(
        short = 's',
        long,
        value_name = "TIMESTAMP",
        help = "The start date as provided to run the simulation",
        long_help = "The start date as provided to run the simulation. Supported formats \
          are 'YYYY-MM-DD', 'YYYY-MM-DD HH', 'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD HH:MM:SS'."
    )]
    pub start_date: Option<String>,

    /// End date of the completed run
    #[arg(
        short = 'e',
        long,
        value_name = "TIMESTAMP",
        help = "The end date as provided to run the simulation",
        long_help = "The end date as provided to run the simulation. Supported formats \
          are 'YYYY-MM-DD', 'YYYY-MM-DD HH', 'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD HH:MM:SS'."
    )]
    pub end_date: Option<String>,

    /// Directory for the extracted results
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "The directory to store the results",
        long_help = "The directory to store the results. This is optional and defaults \
          to a folder in the input directory."
    )]
    pub output_dir: Option<PathBuf>,

    /// Frequency of the original profile data points
    #[arg(
        short = 'f',
        long,
        value_name = "FREQ",
        default_value = DEFAULT_FREQUENCY,
        help = "The frequency of data points in the original profile data",
        long_help = "The frequency of data points in the original profile data as a \
          frequency code. This is optional and defaults to an hour ('H'). The code's \
          grammar is validated by the extraction pipeline."
    )]
    pub frequency: String,

    /// Keep the raw result files
    #[arg(
        short = 'k',
        long,
        help = "Keep the engine's result.mat files",
        long_help = "If this flag is used, the result.mat files found in the execute \
          directory will be kept instead of deleted."
    )]
    pub keep_matlab: bool,

    // For backwards compatibility with scenario-manager callers
    #[arg(
        value_name = "SCENARIO_ID",
        help = "Scenario ID only if launched by the scenario manager"
    )]
    pub scenario_id: Option<String>,
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            start_date: args.start_date,
            end_date: args.end_date,
            interval_hours: args.interval,
            input_dir: args.input_dir,
            threads: args.threads,
            extract_data: args.extract_data,
            output_dir: args.output_dir,
            keep_matlab: args.keep_matlab,
            solver: args.solver,
            julia_env: args.julia_env,
            scenario_id: args.scenario_id,
        }
    }
}

impl From<ExtractArgs> for ExtractConfig {
    fn from(args: ExtractArgs) -> Self {
        Self {
            start_date: args.start_date,
            end_date: args.end_date,
            output_dir: args.output_dir,
            frequency: args.frequency,
            keep_matlab: args.keep_matlab,
            scenario_id: args.scenario_id,
        }
    }
}

/// Build the full CLI with solver help rendered from the injected registry.
pub fn command(solvers: &dyn SolverRegistry) -> Command {
    let help = solver_help(solvers);
    Cli::command().mut_subcommand("run", |run| run.mut_arg("solver", |arg| arg.help(help)))
}

/// The run parser on its own, with registry-aware solver help.
pub fn run_command(solvers: &dyn SolverRegistry) -> Command {
    let help = solver_help(solvers);
    RunArgs::command().mut_arg("solver", |arg| arg.help(help))
}

/// The extraction parser on its own. No registry capability is needed.
pub fn extract_command() -> Command {
    ExtractArgs::command()
}

// An empty registry degrades the help sentence, it never fails construction.
fn solver_help(solvers: &dyn SolverRegistry) -> String {
    let available = solvers.available_solvers();
    if available.is_empty() {
        format!("Specify the solver to run the optimization. Will default to {DEFAULT_SOLVER}.")
    } else {
        format!(
            "Specify the solver to run the optimization. Will default to {DEFAULT_SOLVER}. \
             Current solvers available are {}.",
            available.join(",")
        )
    }
}

/// Parse the given argument tokens, reporting usage errors as `clap::Error`.
pub fn try_parse_from<I, T>(solvers: &dyn SolverRegistry, argv: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(solvers).try_get_matches_from(argv)?;
    Cli::from_arg_matches(&matches)
}

/// Parse the process argument vector. On `-h`/usage errors this prints the
/// message and exits with clap's standard status codes.
pub fn parse(solvers: &dyn SolverRegistry) -> Cli {
    try_parse_from(solvers, std::env::args_os()).unwrap_or_else(|err| err.exit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::InstalledSolvers;

    struct FakeSolvers(Vec<&'static str>);

    impl SolverRegistry for FakeSolvers {
        fn available_solvers(&self) -> Vec<String> {
            self.0.iter().map(|solver| (*solver).to_string()).collect()
        }
    }

    fn parse_run(argv: &[&str]) -> RunConfig {
        let cli =
            try_parse_from(&InstalledSolvers, argv.iter().copied()).expect("arguments should parse");
        match cli.command {
            Commands::Run(args) => args.into(),
            Commands::Extract(_) => panic!("expected a run command"),
        }
    }

    fn parse_extract(argv: &[&str]) -> ExtractConfig {
        let cli =
            try_parse_from(&InstalledSolvers, argv.iter().copied()).expect("arguments should parse");
        match cli.command {
            Commands::Extract(args) => args.into(),
            Commands::Run(_) => panic!("expected an extract command"),
        }
    }

    #[test]
    fn test_run_example_scenario() {
        let config = parse_run(&[
            "gridion-sim",
            "run",
            "-s",
            "2020-01-01",
            "-e",
            "2020-01-02",
            "--interval",
            "24",
            "-i",
            "/data",
            "-d",
        ]);

        assert_eq!(config.start_date.as_deref(), Some("2020-01-01"));
        assert_eq!(config.end_date.as_deref(), Some("2020-01-02"));
        assert_eq!(config.interval_hours, Some(24));
        assert_eq!(config.input_dir, Some(PathBuf::from("/data")));
        assert_eq!(config.threads, Threads::Auto);
        assert!(config.extract_data);
        assert!(!config.keep_matlab);
        assert!(config.solver.is_none());
        assert!(config.julia_env.is_none());
        assert!(config.scenario_id.is_none());
    }

    #[test]
    fn test_interval_alias_matches_long_form() {
        let config = parse_run(&["gridion-sim", "run", "--int", "6"]);
        assert_eq!(config.interval_hours, Some(6));

        let config = parse_run(&["gridion-sim", "run", "-n", "6"]);
        assert_eq!(config.interval_hours, Some(6));
    }

    #[test]
    fn test_presence_flags_default_false_regardless_of_order() {
        let bare = parse_run(&["gridion-sim", "run"]);
        assert!(!bare.extract_data);
        assert!(!bare.keep_matlab);

        let forward = parse_run(&["gridion-sim", "run", "-d", "-k", "-s", "2020-01-01"]);
        let reversed = parse_run(&["gridion-sim", "run", "-s", "2020-01-01", "-k", "-d"]);
        for config in [forward, reversed] {
            assert!(config.extract_data);
            assert!(config.keep_matlab);
            assert_eq!(config.start_date.as_deref(), Some("2020-01-01"));
        }
    }

    #[test]
    fn test_threads_accepts_counts_and_auto() {
        let explicit = parse_run(&["gridion-sim", "run", "--threads", "4"]);
        assert_eq!(explicit.threads, "4".parse::<Threads>().unwrap());

        let auto = parse_run(&["gridion-sim", "run", "-t", "auto"]);
        assert_eq!(auto.threads, Threads::Auto);
    }

    #[test]
    fn test_threads_rejects_non_numeric_input() {
        let err = try_parse_from(
            &InstalledSolvers,
            ["gridion-sim", "run", "--threads", "four"],
        )
        .unwrap_err();
        assert!(
            err.to_string().contains("--threads"),
            "Usage error should name the offending flag, got: {err}"
        );
    }

    #[test]
    fn test_interval_rejects_non_numeric_and_zero() {
        for bad in ["four", "0"] {
            let err = try_parse_from(
                &InstalledSolvers,
                ["gridion-sim", "run", "--interval", bad],
            )
            .unwrap_err();
            assert!(
                err.to_string().contains("--interval"),
                "Usage error for '{bad}' should name the offending flag, got: {err}"
            );
        }
    }

    #[test]
    fn test_trailing_scenario_id_leaves_named_flags_alone() {
        let config = parse_run(&[
            "gridion-sim",
            "run",
            "-s",
            "2020-01-01",
            "-e",
            "2020-01-02",
            "myscenario",
        ]);

        assert_eq!(config.scenario_id.as_deref(), Some("myscenario"));
        assert_eq!(config.start_date.as_deref(), Some("2020-01-01"));
        assert_eq!(config.end_date.as_deref(), Some("2020-01-02"));

        let extract = parse_extract(&["gridion-sim", "extract", "-k", "87"]);
        assert_eq!(extract.scenario_id.as_deref(), Some("87"));
        assert!(extract.keep_matlab);
    }

    #[test]
    fn test_output_dir_sentinel_versus_literal_path() {
        assert!(parse_run(&["gridion-sim", "run"]).output_dir.is_none());
        assert!(
            parse_extract(&["gridion-sim", "extract"])
                .output_dir
                .is_none()
        );

        assert_eq!(
            parse_run(&["gridion-sim", "run", "-o", "/somepath"]).output_dir,
            Some(PathBuf::from("/somepath"))
        );
        assert_eq!(
            parse_extract(&["gridion-sim", "extract", "-o", "/somepath"]).output_dir,
            Some(PathBuf::from("/somepath"))
        );
    }

    #[test]
    fn test_extract_example_scenario() {
        let config = parse_extract(&["gridion-sim", "extract", "-f", "D", "-k"]);

        assert_eq!(config.frequency, "D");
        assert!(config.keep_matlab);
        assert!(config.output_dir.is_none());
        assert!(config.scenario_id.is_none());
    }

    #[test]
    fn test_extract_frequency_defaults_to_hourly() {
        let config = parse_extract(&["gridion-sim", "extract"]);
        assert_eq!(config.frequency, DEFAULT_FREQUENCY);
    }

    #[test]
    fn test_solver_value_passes_through_unvalidated() {
        let config = parse_run(&["gridion-sim", "run", "--solver", "not-a-real-solver"]);
        assert_eq!(config.solver.as_deref(), Some("not-a-real-solver"));
    }

    #[test]
    fn test_run_help_lists_registry_solvers_in_order() {
        let mut run = run_command(&FakeSolvers(vec!["alpha", "beta", "gamma"]));
        let help = run.render_long_help().to_string();
        assert!(
            help.contains("alpha,beta,gamma"),
            "Help should list solvers comma-joined in registry order, got:\n{help}"
        );

        let mut full = command(&FakeSolvers(vec!["alpha", "beta", "gamma"]));
        let sub = full
            .find_subcommand_mut("run")
            .expect("run subcommand should exist");
        let help = sub.render_long_help().to_string();
        assert!(help.contains("alpha,beta,gamma"));
    }

    #[test]
    fn test_empty_registry_still_constructs() {
        let mut run = run_command(&FakeSolvers(Vec::new()));
        let help = run.render_long_help().to_string();
        assert!(
            help.contains(DEFAULT_SOLVER),
            "Degraded help should still mention the default solver, got:\n{help}"
        );

        let config = parse_run(&["gridion-sim", "run", "-s", "2020-01-01"]);
        assert_eq!(config.start_date.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn test_unknown_flag_is_a_usage_error() {
        assert!(try_parse_from(&InstalledSolvers, ["gridion-sim", "run", "--bogus"]).is_err());
        assert!(
            try_parse_from(&InstalledSolvers, ["gridion-sim", "extract", "--threads", "4"])
                .is_err(),
            "Engine-launch flags should not leak into the extract parser"
        );
    }
}
