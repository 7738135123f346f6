//! The language-service session shared by both validators.
//!
//! One server connection is established per run. Both region validators
//! share it, together with the open-document cache, behind a single lock:
//! the server holds the workspace program state, so separate connections
//! would duplicate the type-checker's memory and lose cross-region
//! consistency.
//!
//! Diagnostics are pulled with `textDocument/diagnostic`, one request per
//! region. The region is carried in the request's `identifier` field; the
//! server may narrow the advertised regions through
//! `capabilities.experimental.diagnosticIdentifiers`. Without that list,
//! both regions are assumed.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use vuecheck_core::{Diagnostic, TextDocument};

use crate::ServiceError;
use crate::cache::DocumentCache;
use crate::connection::LspConnection;
use crate::env::EnvironmentService;
use crate::validator::RegionValidator;

/// Region identifier for template/interpolation diagnostics.
pub const TEMPLATE_REGION: &str = "template";

/// Region identifier for embedded-script diagnostics.
pub const SCRIPT_REGION: &str = "script";

struct Session {
    connection: LspConnection,
    open_documents: DocumentCache,
}

/// One run-scoped session with the external semantic engine.
pub struct LanguageService {
    session: Arc<Mutex<Session>>,
    regions: Vec<String>,
}

impl std::fmt::Debug for LanguageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageService")
            .field("regions", &self.regions)
            .finish_non_exhaustive()
    }
}

impl LanguageService {
    /// Performs the `initialize` handshake over an established connection.
    ///
    /// Fails when the server does not support pull diagnostics, or when an
    /// explicit region list omits the template region.
    pub async fn connect(
        mut connection: LspConnection,
        env: &EnvironmentService,
    ) -> Result<Self, ServiceError> {
        let folders = vec![json!({ "uri": env.root_uri(), "name": env.workspace_name() })];
        connection.set_workspace_folders(folders.clone());

        let params = json!({
            "processId": std::process::id(),
            "rootUri": env.root_uri(),
            "workspaceFolders": folders,
            "capabilities": {
                "textDocument": { "diagnostic": { "dynamicRegistration": false } },
                "workspace": { "configuration": true, "workspaceFolders": true },
            },
            "initializationOptions": env.initialization_options(),
        });

        let result = connection.request("initialize", params).await?;
        let capabilities = result.get("capabilities").cloned().unwrap_or(Value::Null);

        if capabilities.get("diagnosticProvider").is_none() {
            return Err(ServiceError::MissingCapability(
                "pull diagnostics (textDocument/diagnostic)".to_string(),
            ));
        }

        let regions = match capabilities.pointer("/experimental/diagnosticIdentifiers") {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => vec![TEMPLATE_REGION.to_string(), SCRIPT_REGION.to_string()],
        };
        if !regions.iter().any(|region| region == TEMPLATE_REGION) {
            return Err(ServiceError::MissingCapability(format!(
                "the {TEMPLATE_REGION} diagnostic region"
            )));
        }

        connection.notify("initialized", json!({})).await?;
        info!("Language server initialized ({} regions)", regions.len());

        Ok(Self {
            session: Arc::new(Mutex::new(Session {
                connection,
                open_documents: DocumentCache::with_defaults(),
            })),
            regions,
        })
    }

    /// The template-region validator. Always available.
    pub fn template_validator(&self) -> LspRegionValidator {
        LspRegionValidator {
            session: Arc::clone(&self.session),
            region: TEMPLATE_REGION,
        }
    }

    /// The script-region validator, when the server provides one.
    pub fn script_validator(&self) -> Option<LspRegionValidator> {
        self.regions
            .iter()
            .any(|region| region == SCRIPT_REGION)
            .then(|| LspRegionValidator {
                session: Arc::clone(&self.session),
                region: SCRIPT_REGION,
            })
    }

    /// Closes every cached document and shuts the server down.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        let mut session = self.session.lock().await;

        let uris = session.open_documents.drain();
        for uri in uris {
            if let Err(error) = close_document(&mut session.connection, &uri).await {
                warn!("Failed to close {uri}: {error}");
            }
        }

        session.connection.request("shutdown", Value::Null).await?;
        session.connection.notify("exit", Value::Null).await
    }
}

/// A pull-diagnostics view over the shared session.
pub struct LspRegionValidator {
    session: Arc<Mutex<Session>>,
    region: &'static str,
}

#[async_trait]
impl RegionValidator for LspRegionValidator {
    async fn validate(&self, document: &TextDocument) -> Result<Vec<Diagnostic>, ServiceError> {
        let mut session = self.session.lock().await;

        ensure_open(&mut session, document, Instant::now()).await?;

        let result = session
            .connection
            .request(
                "textDocument/diagnostic",
                json!({
                    "textDocument": { "uri": document.uri() },
                    "identifier": self.region,
                }),
            )
            .await?;

        parse_report(&result)
    }
}

async fn ensure_open(
    session: &mut Session,
    document: &TextDocument,
    now: Instant,
) -> Result<(), ServiceError> {
    let touch = session.open_documents.touch(document.uri(), now);

    for uri in &touch.evicted {
        close_document(&mut session.connection, uri).await?;
    }

    if touch.opened {
        debug!("Opening {}", document.uri());
        session
            .connection
            .notify(
                "textDocument/didOpen",
                json!({
                    "textDocument": {
                        "uri": document.uri(),
                        "languageId": document.language_id(),
                        "version": document.version(),
                        "text": document.text(),
                    }
                }),
            )
            .await?;
    }

    Ok(())
}

async fn close_document(connection: &mut LspConnection, uri: &str) -> Result<(), ServiceError> {
    debug!("Closing {uri}");
    connection
        .notify(
            "textDocument/didClose",
            json!({ "textDocument": { "uri": uri } }),
        )
        .await
}

/// Parses a document diagnostic report, accepting only full reports.
fn parse_report(result: &Value) -> Result<Vec<Diagnostic>, ServiceError> {
    match result.get("kind").and_then(Value::as_str) {
        Some("full") | None => {}
        Some("unchanged") => return Ok(Vec::new()),
        Some(other) => {
            return Err(ServiceError::protocol(format!(
                "unexpected diagnostic report kind '{other}'"
            )));
        }
    }

    match result.get("items") {
        Some(items) => Ok(serde_json::from_value(items.clone())?),
        None => Ok(Vec::new()),
    }
}
