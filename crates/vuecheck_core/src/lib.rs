//! # vuecheck_core
//!
//! Core pipeline for the vuecheck batch checker.
//!
//! This crate provides:
//! - File selection and filtering
//! - Concurrent document loading
//! - The script-presence filter for single-file components
//! - Code-frame rendering for diagnostics
//!
//! Semantic analysis happens elsewhere: documents built here are handed to
//! the external validators in `vuecheck_service`, and the diagnostics they
//! return come back through the renderer in this crate.

pub mod code_frame;
mod context;
mod diagnostic;
mod document;
mod error;
mod loader;
mod script_filter;
mod selector;

pub use context::RunContext;
pub use diagnostic::{Diagnostic, Position, Range, Severity};
pub use document::TextDocument;
pub use error::CheckError;
pub use loader::{SourceFile, load_files};
pub use script_filter::{filter_sources, retains_component};
pub use selector::FileSelector;
