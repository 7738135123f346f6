//! File discovery and filtering.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{CheckError, RunContext};

/// Walks a source root and produces the ordered set of files to check.
pub struct FileSelector {
    root: PathBuf,
    include: GlobSet,
    excluded: Vec<PathBuf>,
}

impl FileSelector {
    /// Builds a selector for the run's language extensions and excluded
    /// subtrees. Excluded paths are resolved to absolute paths up front;
    /// a candidate under any of them is dropped.
    pub fn new(
        root: impl Into<PathBuf>,
        context: &RunContext,
        exclude_dirs: &[PathBuf],
    ) -> Result<Self, CheckError> {
        let mut builder = GlobSetBuilder::new();
        for extension in context.extensions() {
            let glob = Glob::new(&format!("**/*.{extension}"))
                .map_err(|e| CheckError::config(format!("Invalid glob pattern: {e}")))?;
            builder.add(glob);
        }
        let include = builder
            .build()
            .map_err(|e| CheckError::config(format!("Failed to build globset: {e}")))?;

        let excluded = exclude_dirs
            .iter()
            .map(|dir| {
                std::path::absolute(dir).map_err(|e| {
                    CheckError::config(format!(
                        "Cannot resolve excluded path {}: {e}",
                        dir.display()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.into(),
            include,
            excluded,
        })
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|prefix| path.starts_with(prefix))
    }

    /// Walks the root and returns the sorted, deduplicated matches.
    ///
    /// An empty result is not an error. Traversal failures are.
    pub fn select(&self) -> Result<Vec<PathBuf>, CheckError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !self.include.is_match(path) {
                continue;
            }
            if self.is_excluded(path) {
                debug!("Excluding {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        files.dedup();

        info!("Selected {} files to check", files.len());
        Ok(files)
    }
}
