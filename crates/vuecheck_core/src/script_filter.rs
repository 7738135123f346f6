//! Script-presence filtering for single-file components.
//!
//! In extended-language mode, components whose embedded script is plain
//! untyped JavaScript are dropped from the batch. The decision is a textual
//! heuristic over single lines, not a structural parse; unusual markup may
//! be misclassified and that is acceptable.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::SourceFile;
use crate::context::COMPONENT_EXTENSION;

static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("<script.*>").expect("script tag pattern compiles"));

static TYPED_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script.*lang="tsx?".*>"#).expect("typed script pattern compiles")
});

static EXTERNAL_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script.*src=".*".*>"#).expect("external source pattern compiles")
});

/// Whether a component stays in an extended-language batch.
///
/// The rules apply in this order:
/// 1. no script block at all — keep, the template still gets checked;
/// 2. a `lang="ts"` / `lang="tsx"` block — keep;
/// 3. a block delegating to an external file via `src` — keep;
/// 4. anything else is an untyped inline block — drop.
pub fn retains_component(text: &str) -> bool {
    if !SCRIPT_TAG.is_match(text) {
        return true;
    }
    if TYPED_SCRIPT.is_match(text) {
        return true;
    }
    EXTERNAL_SRC.is_match(text)
}

/// Applies the filter to component files; script-dialect files pass through.
pub fn filter_sources(files: Vec<SourceFile>) -> Vec<SourceFile> {
    files
        .into_iter()
        .filter(|file| {
            if file.language_id != COMPONENT_EXTENSION {
                return true;
            }
            let keep = retains_component(&file.text);
            if !keep {
                debug!("Skipping {} (untyped script block)", file.path.display());
            }
            keep
        })
        .collect()
}
