//! # vuecheck_service
//!
//! Binding to the external language service that performs the semantic
//! analysis of component documents.
//!
//! The engine itself lives outside this repository: it is a language-server
//! process spoken to over JSON-RPC stdio framing, using pull diagnostics
//! (`textDocument/diagnostic`). This crate supplies:
//! - workspace environment resolution (`tsconfig.json`, `package.json`)
//! - the framing transport and a strictly sequential connection
//! - the bounded, age-evicting open-document cache
//! - the [`RegionValidator`] contract and the [`LanguageService`] session
//!   that hands out the template validator (always) and the script
//!   validator (when the server provides one)

pub mod cache;
mod connection;
mod env;
mod error;
mod service;
pub mod transport;
mod validator;

pub use cache::DocumentCache;
pub use connection::LspConnection;
pub use env::EnvironmentService;
pub use error::ServiceError;
pub use service::{LanguageService, LspRegionValidator, SCRIPT_REGION, TEMPLATE_REGION};
pub use validator::RegionValidator;
