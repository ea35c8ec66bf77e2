//! dmri-testkit CLI - run command-line entry points the way the test suite does

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use dmri_testkit_core::domain::config::{DEFAULT_INTERPRETER, DEFAULT_SCRIPT_SUBDIR};
use dmri_testkit_core::domain::{CommandResult, OutputProcessor, RunnerConfig};
use dmri_testkit_core::{RunnerError, ScriptRunner};
use dmri_testkit_infra_system::{read_gradient_table, system_script_runner, write_gradient_table};

#[derive(Parser)]
#[command(name = "dmri-testkit")]
#[command(about = "Test-support tools for the diffusion-MRI pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that build a ScriptRunner
#[derive(Args, Debug, Clone)]
struct RunnerArgs {
    /// Top-level package name (also names the debug toggle variable)
    #[arg(long, env = "DMRI_TESTKIT_MODULE_SUBDIR", default_value = "afq")]
    module_subdir: String,

    /// Directory of the loaded package; unset means installed
    #[arg(long, env = "DMRI_TESTKIT_PACKAGE_DIR")]
    package_dir: Option<PathBuf>,

    /// Directory of the module package when it differs from --package-dir
    #[arg(long, env = "DMRI_TESTKIT_MODULE_PACKAGE_DIR")]
    module_package_dir: Option<PathBuf>,

    /// Directory compared with the package's parent (default: current directory)
    #[arg(long)]
    working_dir: Option<PathBuf>,

    /// Scripts directory of a development checkout
    #[arg(long, env = "DMRI_TESTKIT_SCRIPT_SUBDIR", default_value = DEFAULT_SCRIPT_SUBDIR)]
    script_subdir: String,

    /// Interpreter for development-tree scripts
    #[arg(long, env = "DMRI_TESTKIT_INTERPRETER", default_value = DEFAULT_INTERPRETER)]
    interpreter: PathBuf,

    /// Debug toggle variable (default: <MODULE_SUBDIR>_DEBUG_PRINT)
    #[arg(long, env = "DMRI_TESTKIT_DEBUG_PRINT_VAR")]
    debug_print_var: Option<String>,

    /// Strip surrounding whitespace from captured output
    #[arg(long)]
    trim: bool,
}

impl RunnerArgs {
    fn to_config(&self) -> RunnerConfig {
        let mut config = RunnerConfig::new(&self.module_subdir)
            .with_script_subdir(&self.script_subdir)
            .with_interpreter(&self.interpreter);

        if let Some(dir) = &self.package_dir {
            config = config.with_package_dir(dir);
        }
        if let Some(dir) = &self.module_package_dir {
            config = config.with_module_package_dir(dir);
        }
        if let Some(dir) = &self.working_dir {
            config = config.with_working_dir(dir);
        }
        if let Some(var) = &self.debug_print_var {
            config = config.with_debug_print_var(var);
        }
        if self.trim {
            config = config.with_output_processor(OutputProcessor::trim());
        }

        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command and report its exit code and output
    Run {
        #[command(flatten)]
        runner: RunnerArgs,

        /// Report a non-zero exit code instead of failing
        #[arg(long)]
        no_check: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Command name followed by its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        cmd: Vec<String>,
    },

    /// Show the resolved development paths
    Paths {
        #[command(flatten)]
        runner: RunnerArgs,
    },

    /// Copy a gradient table fixture, optionally as a two-shell acquisition
    Gradients {
        /// Input b-values
        #[arg(long)]
        bval: PathBuf,

        /// Input b-vectors
        #[arg(long)]
        bvec: PathBuf,

        /// Output b-values
        #[arg(long)]
        out_bval: PathBuf,

        /// Output b-vectors
        #[arg(long)]
        out_bvec: PathBuf,

        /// Append a second shell at twice the b-value
        #[arg(long)]
        two_shell: bool,
    },
}

#[derive(Serialize)]
struct RunReport<'a> {
    command: &'a str,
    #[serde(flatten)]
    result: &'a CommandResult,
}

fn render_json(command: &str, result: &CommandResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&RunReport { command, result })?)
}

/// Shell convention for the CLI's own exit status: a signal death (`-sig`) becomes `128 + sig`
fn process_exit_code(code: i32) -> i32 {
    if code < 0 {
        128i32.saturating_sub(code)
    } else {
        code
    }
}

/// Runner for the CLI; debug echo goes to stderr so stdout carries only the report
fn cli_runner(args: &RunnerArgs) -> ScriptRunner {
    system_script_runner(args.to_config()).with_debug_echo(|line| eprintln!("{}", line))
}

#[derive(Tabled)]
struct PathRow {
    setting: &'static str,
    value: String,
}

fn display_or_none(value: Option<&std::path::Path>) -> String {
    value
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string())
}

fn path_rows(runner: &ScriptRunner) -> Vec<PathRow> {
    let config = runner.config();
    vec![
        PathRow {
            setting: "local_script_dir",
            value: display_or_none(runner.paths().local_script_dir()),
        },
        PathRow {
            setting: "local_module_dir",
            value: display_or_none(runner.paths().local_module_dir()),
        },
        PathRow {
            setting: "debug_print_var",
            value: config.debug_print_var_name(),
        },
        PathRow {
            setting: "debug_print",
            value: runner.debug_print_enabled().to_string(),
        },
        PathRow {
            setting: "platform",
            value: config.platform.to_string(),
        },
    ]
}

async fn run(runner: &ScriptRunner, cmd: Vec<String>, check_code: bool, json: bool) -> Result<i32> {
    let command = runner.resolve(cmd.clone())?.to_string();

    let result = match runner.run_command(cmd, check_code).await {
        Ok(result) => result,
        Err(err @ RunnerError::CommandFailed { .. }) => {
            eprintln!("{} {}", "✗".red(), err);
            return Ok(err.exit_code().unwrap_or(1));
        }
        Err(err) => return Err(err).context("Failed to run command"),
    };

    if json {
        println!("{}", render_json(&command, &result)?);
    } else {
        let status = if result.success() {
            format!("✓ exit code {}", result.exit_code).green().bold()
        } else {
            format!("✗ exit code {}", result.exit_code).red().bold()
        };
        println!("{} {}", status, command.dimmed());
        println!("{}", "stdout".cyan().bold());
        println!("{}", result.stdout_text());
        println!("{}", "stderr".cyan().bold());
        println!("{}", result.stderr_text());
    }

    Ok(result.exit_code)
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            runner,
            no_check,
            json,
            cmd,
        } => {
            let runner = cli_runner(&runner);
            let code = run(&runner, cmd, !no_check, json).await?;
            if code != 0 {
                std::process::exit(process_exit_code(code));
            }
        }

        Commands::Paths { runner } => {
            let runner = cli_runner(&runner);

            println!("{}", "Resolved paths".cyan().bold());
            println!();
            println!("{}", Table::new(path_rows(&runner)));
        }

        Commands::Gradients {
            bval,
            bvec,
            out_bval,
            out_bvec,
            two_shell,
        } => {
            let table = read_gradient_table(&bval, &bvec)
                .with_context(|| format!("Failed to read {}", bval.display()))?;
            let table = if two_shell { table.two_shell() } else { table };

            write_gradient_table(&table, &out_bval, &out_bvec)
                .with_context(|| format!("Failed to write {}", out_bval.display()))?;

            println!(
                "{}",
                format!("✓ Wrote {} volumes", table.len()).green().bold()
            );
        }
    }

    Ok(())
}
