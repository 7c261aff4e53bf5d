use std::sync::Arc;

use crate::config::Config;
use crate::documents::service::DocumentService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Storage-agnostic document service; the concrete store is chosen in `main`.
    pub documents: Arc<DocumentService>,
}
