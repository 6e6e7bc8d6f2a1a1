//! Toolbridge CLI - drive an external, file-based tool from a config file

mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use toolbridge_core::application::{JsonFileMappings, TextFileMappings};
use toolbridge_core::domain::{AdapterConfig, PathStyle, Termination};
use toolbridge_core::port::time_provider::SystemTimeProvider;
use toolbridge_core::port::ProcessRunner;
use toolbridge_core::{Outcome, ToolAdapter};
use toolbridge_infra_system::ShellProcessRunner;

use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code when the adapter is not configured enough to act
const EXIT_NOT_CONFIGURED: u8 = 2;

#[derive(Parser)]
#[command(name = "toolbridge")]
#[command(about = "Run an external file-based tool through a configurable adapter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (toml, yaml or json)
    #[arg(short, long, env = "TOOLBRIDGE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Executable (may include leading arguments)
    #[arg(long, global = true)]
    executable: Option<String>,

    /// Input file passed to the tool
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Output file the tool's stdout is redirected to
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Options appended after the input path
    #[arg(long, global = true, allow_hyphen_values = true)]
    options: Option<String>,

    /// Scratch directory the tool runs in
    #[arg(long, global = true, conflicts_with = "temp_scratch")]
    scratch: Option<PathBuf>,

    /// Run in a temporary scratch directory
    #[arg(long, global = true)]
    temp_scratch: bool,

    /// Render paths exactly as configured instead of absolute
    #[arg(long, global = true)]
    as_given: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the assembled command line
    Command,

    /// Check that the executable resolves and the configured paths exist
    Check,

    /// Map input, run the tool, map output
    Run {
        /// File holding the domain object to translate
        #[arg(short, long)]
        domain: PathBuf,

        /// How the domain object and the tool's output are translated
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Write the domain file verbatim; read the output file as text
    Text,
    /// Write the domain file as JSON; parse the output file as JSON
    Json,
}

impl Cli {
    /// Apply command-line flags on top of loaded configuration
    fn apply_overrides(&self, config: &mut AdapterConfig) {
        if let Some(executable) = &self.executable {
            config.executable = Some(executable.clone());
        }
        if let Some(input) = &self.input {
            config.input_path = Some(settings::expand_path(input));
        }
        if let Some(output) = &self.output {
            config.output_path = Some(settings::expand_path(output));
        }
        if let Some(options) = &self.options {
            config.trailing_options = Some(options.clone());
        }
        if let Some(scratch) = &self.scratch {
            config.scratch_dir = Some(settings::expand_path(scratch));
        }
        if self.temp_scratch {
            config.scratch_dir = None;
            config.temporary_scratch = true;
        }
        if self.as_given {
            config.path_style = PathStyle::AsGiven;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    match dispatch(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<u8> {
    let Settings {
        adapter: mut adapter_config,
        runner: runner_config,
    } = settings::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut adapter_config);

    info!(
        version = VERSION,
        executable = ?adapter_config.executable,
        "Toolbridge starting"
    );

    let runner: Arc<dyn ProcessRunner> = Arc::new(ShellProcessRunner::new(
        Arc::new(SystemTimeProvider),
        runner_config,
    ));

    match cli.command {
        Commands::Command => print_command(&adapter_config, runner),
        Commands::Check => check(&adapter_config, runner),
        Commands::Run { domain, format } => {
            let text = std::fs::read_to_string(&domain)
                .with_context(|| format!("failed to read domain file {}", domain.display()))?;
            match format {
                Format::Text => run_text(&adapter_config, runner, text).await,
                Format::Json => {
                    let value: serde_json::Value = serde_json::from_str(&text)
                        .with_context(|| format!("{} is not valid JSON", domain.display()))?;
                    run_json(&adapter_config, runner, value).await
                }
            }
        }
    }
}

fn text_adapter(
    config: &AdapterConfig,
    runner: Arc<dyn ProcessRunner>,
) -> Result<ToolAdapter<String, (), String>> {
    Ok(ToolAdapter::builder()
        .config(config)
        .mapping_factory(TextFileMappings)
        .runner(runner)
        .build()?)
}

fn print_command(config: &AdapterConfig, runner: Arc<dyn ProcessRunner>) -> Result<u8> {
    let adapter = text_adapter(config, runner)?;
    match adapter.build_command() {
        Ok(command) => {
            println!("{}", command);
            Ok(0)
        }
        Err(missing) => {
            eprintln!("{} {}", "not configured:".yellow().bold(), missing);
            Ok(EXIT_NOT_CONFIGURED)
        }
    }
}

fn check(config: &AdapterConfig, runner: Arc<dyn ProcessRunner>) -> Result<u8> {
    let adapter = text_adapter(config, runner)?;
    let mut ready = true;

    match adapter.spec().program() {
        Some(program) if adapter.executable_available() => {
            println!("{} executable: {}", "ok".green(), program)
        }
        Some(program) => {
            ready = false;
            println!("{} executable: {} (not found)", "missing".red(), program)
        }
        None => {
            ready = false;
            println!("{} executable: not configured", "missing".red())
        }
    }

    if let Some(input) = adapter.input_location() {
        if adapter.input_exists() {
            println!("{} input: {}", "ok".green(), input.display());
        } else {
            println!(
                "{} input: {} (written by the input mapping)",
                "absent".yellow(),
                input.display()
            );
        }
    }

    if let Some(output) = adapter.output_location() {
        println!("{} output: {}", "info".blue(), output.display());
    }

    match adapter.scratch_dir() {
        Some(dir) if config.temporary_scratch && config.scratch_dir.is_none() => {
            println!("{} scratch: temporary ({})", "info".blue(), dir.display())
        }
        Some(dir) => println!("{} scratch: {}", "ok".green(), dir.display()),
        None => println!("{} scratch: caller's directory", "info".blue()),
    }

    Ok(if ready { 0 } else { EXIT_NOT_CONFIGURED })
}

async fn run_text(
    config: &AdapterConfig,
    runner: Arc<dyn ProcessRunner>,
    domain: String,
) -> Result<u8> {
    let adapter = text_adapter(config, runner)?;
    execute(&adapter, &domain, Ok).await
}

async fn run_json(
    config: &AdapterConfig,
    runner: Arc<dyn ProcessRunner>,
    domain: serde_json::Value,
) -> Result<u8> {
    let adapter: ToolAdapter<serde_json::Value, (), serde_json::Value> = ToolAdapter::builder()
        .config(config)
        .mapping_factory(JsonFileMappings::new())
        .runner(runner)
        .build()?;
    execute(&adapter, &domain, |value| {
        Ok(serde_json::to_string_pretty(&value)?)
    })
    .await
}

/// Drive the three adapter steps and report like the tool itself would
async fn execute<D: ?Sized, O>(
    adapter: &ToolAdapter<D, (), O>,
    domain: &D,
    render: impl Fn(O) -> Result<String>,
) -> Result<u8> {
    if adapter.spec().has_input_path() {
        adapter.map_input(domain).into_result()?;
    }

    let run = match adapter.run_command(None).await {
        Outcome::Success(run) => run,
        Outcome::NotConfigured(missing) => {
            eprintln!("{} {}", "not configured:".yellow().bold(), missing);
            return Ok(EXIT_NOT_CONFIGURED);
        }
        Outcome::Failed(e) => return Err(e.into()),
    };

    if !run.stderr.is_empty() {
        eprint!("{}", run.stderr_lossy().red());
    }

    if adapter.spec().has_output_path() {
        let mapped = adapter.map_output(domain).into_result()?;
        println!("{}", render(mapped)?);
    } else {
        print!("{}", run.stdout_lossy());
    }

    Ok(exit_code(&run.status))
}

/// Shell-style exit code for a termination status
fn exit_code(status: &Termination) -> u8 {
    match status {
        Termination::Exited(code) => u8::try_from(*code).unwrap_or(1),
        Termination::Signaled { signal, .. } => u8::try_from(128 + signal).unwrap_or(1),
        Termination::Unknown => 1,
    }
}
