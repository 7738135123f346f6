//! The sequential validation driver.
//!
//! Documents are validated one at a time, in selection order; the only
//! parallelism in the run is the concurrent file loading. The first fatal
//! error aborts the remaining batch, and frames already printed stand.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use vuecheck_core::{FileSelector, RunContext, TextDocument, code_frame, filter_sources, load_files};
use vuecheck_service::{
    EnvironmentService, LanguageService, LspConnection, RegionValidator, ServiceError,
};

use crate::progress::ProgressBar;

pub struct CheckOptions {
    pub workspace: PathBuf,
    pub src_dir: PathBuf,
    pub only_template: bool,
    pub only_typescript: bool,
    pub exclude_dir: Vec<PathBuf>,
    pub server: String,
}

/// Runs the whole batch. Returns whether any diagnostic was produced.
pub async fn run_check(options: CheckOptions) -> Result<bool> {
    let context = RunContext::new(options.only_template, options.only_typescript);

    let selector =
        FileSelector::new(&options.src_dir, &context, &options.exclude_dir).into_diagnostic()?;
    let selected = selector.select().into_diagnostic()?;

    let mut sources = load_files(&selected).await.into_diagnostic()?;
    if context.only_typescript {
        sources = filter_sources(sources);
    }
    let documents: Vec<TextDocument> = sources
        .into_iter()
        .map(|source| source.into_document())
        .collect();

    // An empty batch is a clean run; no server is spawned for it.
    if documents.is_empty() {
        info!("Nothing to check");
        return Ok(false);
    }

    let env =
        EnvironmentService::resolve(&options.workspace, &options.src_dir).into_diagnostic()?;
    let (program, args) = parse_server_command(&options.server)?;
    let connection = LspConnection::spawn(&program, &args).into_diagnostic()?;
    let service = LanguageService::connect(connection, &env)
        .await
        .into_diagnostic()?;

    let template = service.template_validator();
    let script = service.script_validator();

    let enabled = io::stdout().is_terminal();
    let mut progress = ProgressBar::new(io::stdout(), documents.len(), enabled);
    let mut out = io::stdout();

    let outcome = drive(
        &documents,
        &template,
        script.as_ref(),
        context.only_template,
        &mut progress,
        &mut out,
    )
    .await;

    // Scoped release: the server and its document caches go down on the
    // failure path too.
    if let Err(error) = service.shutdown().await {
        debug!("Language server shutdown failed: {error}");
    }

    outcome.into_diagnostic()
}

/// Validates every document and renders frames for each diagnostic.
async fn drive<T, S, W, O>(
    documents: &[TextDocument],
    template: &T,
    script: Option<&S>,
    only_template: bool,
    progress: &mut ProgressBar<W>,
    out: &mut O,
) -> std::result::Result<bool, ServiceError>
where
    T: RegionValidator,
    S: RegionValidator,
    W: Write,
    O: Write,
{
    let mut has_error = false;

    progress.draw()?;
    for document in documents {
        let mut results = template.validate(document).await?;
        if !only_template && let Some(script) = script {
            results.extend(script.validate(document).await?);
        }

        if !results.is_empty() {
            has_error = true;
            progress.clear()?;
            for diagnostic in &results {
                write!(out, "{}", code_frame::render_frame(document, diagnostic))?;
            }
        }
        progress.tick()?;
    }
    progress.finish()?;

    Ok(has_error)
}

fn parse_server_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_owned);
    let program = parts
        .next()
        .ok_or_else(|| miette::miette!("--server command is empty"))?;
    Ok((program, parts.collect()))
}
