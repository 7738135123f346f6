//! The request/response contract implemented by the external validators.

use async_trait::async_trait;
use vuecheck_core::{Diagnostic, TextDocument};

use crate::ServiceError;

/// A validator for one region kind of a component document.
///
/// Given a document, returns the diagnostics for that region in the order
/// the underlying engine reports them. Implementations may keep shared
/// session state; calls are strictly sequential.
#[async_trait]
pub trait RegionValidator: Send + Sync {
    async fn validate(&self, document: &TextDocument) -> Result<Vec<Diagnostic>, ServiceError>;
}
