mod commands;
mod config;
mod document;
mod errors;
mod output;
mod render;
mod validation;

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::{run_generate, run_validate, GenerateOptions, ValidateOptions};
use crate::config::Config;
use crate::errors::AppError;
use crate::output::{ConsoleSink, NullSink, OutputSink};
use crate::validation::Profile;

#[derive(Parser)]
#[command(
    name = "resume",
    version,
    about = "Validate structured resume data and render it to PDF"
)]
struct Cli {
    /// Print the full error source chain and enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the resume data has everything the PDF needs
    Validate(ValidateArgs),
    /// Render the resume data to a PDF file
    Generate(GenerateArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Resume JSON file [env: RESUME_DATA, default: data/resume.json]
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Rule set to validate against
    #[arg(short, long, default_value_t = Profile::Standard)]
    profile: Profile,

    /// Print a machine-readable report instead of progress lines
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Resume JSON file [env: RESUME_DATA, default: data/resume.json]
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Destination PDF [env: RESUME_OUTPUT, default: output/resume.pdf]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render deadline in seconds [env: RENDER_TIMEOUT_SECS, default: 30]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Validate the data before rendering and stop on the first failure
    #[arg(long)]
    validate: bool,

    /// Rule set used with --validate
    #[arg(short, long, default_value_t = Profile::Standard)]
    profile: Profile,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = ConsoleSink::detect();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            console.error(&format!("Invalid configuration: {e:#}"));
            return ExitCode::from(AppError::Internal(e).exit_code());
        }
    };
    let debug_mode = cli.debug || config.debug;
    init_tracing(&config, debug_mode);
    debug!(?config, "Configuration loaded");

    let result = block_on_detached(run(cli.command, &config, &console))
        .map_err(AppError::Internal)
        .and_then(|outcome| outcome);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = ExitCode::from(&err);
            console.error(&err.to_string());
            if debug_mode {
                eprintln!("{:?}", anyhow::Error::from(err));
            }
            code
        }
    }
}

/// Runs `future` on a fresh runtime, then shuts the runtime down without
/// waiting on blocking tasks. A render abandoned at its deadline may still
/// occupy a blocking thread; it must not keep the process alive.
fn block_on_detached<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

async fn run(command: Command, config: &Config, console: &ConsoleSink) -> Result<(), AppError> {
    match command {
        Command::Validate(args) => {
            let opts = ValidateOptions {
                data: args.data.unwrap_or_else(|| config.data_path.clone()),
                profile: args.profile,
                json: args.json,
            };
            let sink: &dyn OutputSink = if opts.json { &NullSink } else { console };
            run_validate(&opts, sink)?;
        }
        Command::Generate(args) => {
            let opts = GenerateOptions {
                data: args.data.unwrap_or_else(|| config.data_path.clone()),
                output: args.output.unwrap_or_else(|| config.output_path.clone()),
                timeout: args
                    .timeout
                    .map(Duration::from_secs)
                    .unwrap_or(config.render_timeout),
                validate_first: args.validate,
                profile: args.profile,
            };
            run_generate(&opts, console).await?;
        }
    }
    Ok(())
}

/// Structured logging to stderr so it never mixes with command output.
fn init_tracing(config: &Config, debug_mode: bool) {
    let env_directives = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(log_filter(env_directives.as_deref(), &config.rust_log, debug_mode))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `RUST_LOG` directives (or `resume=<level>`), with this crate raised to
/// debug on top when `--debug` / `DEBUG` is set.
fn log_filter(env_directives: Option<&str>, default_level: &str, debug_mode: bool) -> EnvFilter {
    let crate_name = env!("CARGO_PKG_NAME");
    let filter = env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("{crate_name}={default_level}")));

    if !debug_mode {
        return filter;
    }
    match format!("{crate_name}=debug").parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_to_file, PdfBackend, RenderError, ResumeLayout};
    use async_trait::async_trait;
    use std::time::Instant;
    use tempfile::tempdir;

    /// Never yields its blocking thread back within any sane deadline.
    struct WedgedBackend;

    #[async_trait]
    impl PdfBackend for WedgedBackend {
        fn name(&self) -> &'static str {
            "wedged"
        }

        async fn render(&self, _layout: &ResumeLayout) -> Result<Vec<u8>, RenderError> {
            tokio::task::spawn_blocking(|| {
                std::thread::sleep(Duration::from_secs(5));
                Vec::new()
            })
            .await
            .map_err(|e| RenderError::Backend {
                backend: "wedged",
                message: e.to_string(),
            })
        }
    }

    #[test]
    fn test_timed_out_blocking_render_does_not_delay_shutdown() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("resume.pdf");
        let started = Instant::now();

        let result = block_on_detached(render_to_file(
            &ResumeLayout::default(),
            &WedgedBackend,
            &output,
            Duration::from_millis(100),
            &NullSink,
        ))
        .unwrap();

        let elapsed = started.elapsed();
        assert!(matches!(result, Err(RenderError::Timeout(_))));
        assert!(
            elapsed < Duration::from_secs(2),
            "runtime shutdown waited {elapsed:?} for the abandoned render"
        );
        assert!(!output.exists());
    }

    #[test]
    fn test_block_on_detached_returns_output() {
        assert_eq!(block_on_detached(async { 40 + 2 }).unwrap(), 42);
    }

    #[test]
    fn test_log_filter_defaults_to_crate_level() {
        let filter = log_filter(None, "warn", false).to_string();
        assert!(filter.contains("resume=warn"), "{filter}");
    }

    #[test]
    fn test_debug_flag_raises_crate_level_over_rust_log() {
        let filter = log_filter(Some("info"), "warn", true).to_string();
        assert!(filter.contains("resume=debug"), "{filter}");
        assert!(filter.contains("info"), "{filter}");

        let plain = log_filter(Some("info"), "warn", false).to_string();
        assert!(!plain.contains("resume=debug"), "{plain}");
    }

    #[test]
    fn test_invalid_rust_log_falls_back_to_default() {
        let filter = log_filter(Some("resume=[[["), "warn", false).to_string();
        assert!(filter.contains("resume=warn"), "{filter}");
    }
}
