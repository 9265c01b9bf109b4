//! CLI entrypoint wiring for the `runbox` binary.

use crate::config::types::{ExecutionRequest, RunnerConfig};
use crate::engine::Engine;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "runbox", author, version, about, long_about = None)]
struct Cli {
    /// Override the scratch root directory
    #[arg(long, global = true)]
    scratch_dir: Option<PathBuf>,
    /// Wall-clock budget in milliseconds, compile phase included
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute source code and print the JSON result
    Run {
        /// Language identifier (javascript, python, java, cpp, c)
        #[arg(long)]
        language: String,
        /// Source file to execute
        file: Option<PathBuf>,
        /// Inline source code instead of a file
        #[arg(long, conflicts_with = "file")]
        code: Option<String>,
        /// Data fed to the program's stdin
        #[arg(long)]
        stdin: Option<String>,
    },
    /// Probe installed toolchains and print the capability report
    Languages {
        /// Bypass the availability cache and re-probe now
        #[arg(long)]
        refresh: bool,
    },
}

pub fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = RunnerConfig::default();
    if let Some(dir) = cli.scratch_dir {
        config.scratch_root = dir;
    }
    if let Some(ms) = cli.timeout_ms {
        config.wall_time_limit = Duration::from_millis(ms);
    }
    let engine = Engine::new(config);

    match cli.command {
        Commands::Run {
            language,
            file,
            code,
            stdin,
        } => {
            let source = match (file, code) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, Some(code)) => code,
                (None, None) => bail!("provide a source file or --code"),
            };

            let mut request = ExecutionRequest::new(source, language);
            if let Some(stdin) = stdin {
                request = request.with_stdin(stdin);
            }

            let result = engine.execute(&request);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Languages { refresh } => {
            let report = if refresh {
                engine.refresh_availability()
            } else {
                engine.availability_report()
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
