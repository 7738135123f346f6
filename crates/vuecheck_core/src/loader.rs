//! Concurrent document loading.
//!
//! Files are read concurrently but the result preserves selection order.
//! Any read failure aborts the whole run; there is no per-file recovery.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;
use tracing::debug;

use crate::{CheckError, TextDocument};

/// A source file read into memory, before being wrapped as a document.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language_id: String,
    pub text: String,
}

impl SourceFile {
    /// Builds the addressable document handed to the validators.
    pub fn into_document(self) -> TextDocument {
        let uri = format!("file://{}", self.path.display());
        TextDocument::new(uri, self.language_id, self.text)
    }
}

fn language_id(path: &Path) -> Result<String, CheckError> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            CheckError::config(format!(
                "Cannot determine language of {} (no file extension)",
                path.display()
            ))
        })
}

/// Reads every selected file, all reads in flight at once.
pub async fn load_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>, CheckError> {
    let mut set = JoinSet::new();
    for (index, path) in paths.iter().enumerate() {
        let path = path.clone();
        let language_id = language_id(&path)?;
        set.spawn(async move {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| CheckError::Read {
                    path: path.clone(),
                    source,
                })?;
            Ok::<_, CheckError>((
                index,
                SourceFile {
                    path,
                    language_id,
                    text,
                },
            ))
        });
    }

    let mut slots: Vec<Option<SourceFile>> = paths.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (index, file) =
            joined.map_err(|e| CheckError::Internal(format!("Load task failed: {e}")))??;
        slots[index] = Some(file);
    }

    debug!("Loaded {} files", slots.len());
    Ok(slots.into_iter().flatten().collect())
}
