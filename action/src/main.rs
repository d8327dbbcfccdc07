//! Treebeard CI action.
//!
//! Reads the action inputs from `INPUT_*`, checks the Python toolchain,
//! installs Treebeard and runs the planned `treebeard` commands, reporting a
//! single success or failure to the CI host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use treebeard_action::action::{ActionRequest, report_outcome, run_action};
use treebeard_action::core::plan::build_plan;
use treebeard_action::error::ActionError;
use treebeard_action::exit_codes;
use treebeard_action::io::config::load_config;
use treebeard_action::io::context::capture_context;
use treebeard_action::io::inputs::read_inputs;
use treebeard_action::io::process::ProcessRunner;
use treebeard_action::io::report::WorkflowReporter;
use treebeard_action::logging;

#[derive(Parser)]
#[command(
    name = "treebeard-action",
    version,
    about = "Install Treebeard and run notebooks in CI"
)]
struct Cli {
    /// TOML file overriding tool settings (interpreter, installer, failure policy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check Python, install Treebeard and run notebooks (default).
    Run,
    /// Print the commands and environment keys that `run` would use.
    Plan {
        /// Emit JSON instead of one command per line.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => cmd_run(cli.config.as_deref()),
        Command::Plan { json } => cmd_plan(cli.config.as_deref(), json),
    }
}

fn cmd_run(config_path: Option<&Path>) -> Result<i32> {
    let mut reporter = WorkflowReporter::stdout();
    let result = (|| -> Result<(), ActionError> {
        let settings = load_config(config_path)?;
        let context = capture_context();
        let config = read_inputs(&context.env);
        let base_dir = std::env::current_dir().context("resolve current directory")?;
        let request = ActionRequest {
            config: &config,
            context: &context,
            settings: &settings,
            base_dir: &base_dir,
        };
        run_action(&request, &ProcessRunner, &mut reporter)
    })();
    report_outcome(&result, &mut reporter)
}

fn cmd_plan(config_path: Option<&Path>, json: bool) -> Result<i32> {
    let settings = load_config(config_path)?;
    let context = capture_context();
    let config = read_inputs(&context.env);
    let plan = match build_plan(&config, &context, &settings.tool) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("error: {}", err.report_message());
            return Ok(exit_codes::FAILED);
        }
    };

    let summary = plan.summary();
    if json {
        let payload = serde_json::to_string_pretty(&summary).context("serialize plan")?;
        println!("{payload}");
    } else {
        for command in &summary.commands {
            println!("{command}");
        }
    }
    Ok(exit_codes::OK)
}
