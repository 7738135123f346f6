//! vuecheck CLI
//!
//! Batch type checker for Vue single-file components.

mod check;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

use check::CheckOptions;

/// vuecheck - Type checker for Vue single-file components
#[derive(Parser)]
#[command(name = "vuecheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace root directory
    #[arg(long, value_name = "DIR")]
    root_dir: PathBuf,

    /// Source directory to check (defaults to the workspace root)
    #[arg(long, value_name = "DIR")]
    src_dir: Option<PathBuf>,

    /// Check template regions only, skipping script validation
    #[arg(long)]
    only_template: bool,

    /// Also select .ts/.tsx files and drop components without a typed
    /// script block
    #[arg(long)]
    only_typescript: bool,

    /// Directory subtree to exclude (repeatable)
    #[arg(long = "exclude-dir", value_name = "DIR")]
    exclude_dir: Vec<PathBuf>,

    /// Language server command performing the semantic analysis
    #[arg(long, value_name = "CMD", default_value = "vls")]
    server: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let workspace = std::path::absolute(&cli.root_dir).into_diagnostic()?;
    let src_dir = match cli.src_dir {
        Some(dir) => std::path::absolute(&dir).into_diagnostic()?,
        None => workspace.clone(),
    };

    let options = CheckOptions {
        workspace,
        src_dir,
        only_template: cli.only_template,
        only_typescript: cli.only_typescript,
        exclude_dir: cli.exclude_dir,
        server: cli.server,
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?
        .block_on(check::run_check(options))
}
