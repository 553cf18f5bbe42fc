use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::images::ImageResolver;
use crate::llm_client::ChatProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat provider chosen at startup from the configured preference order.
    pub llm: Arc<dyn ChatProvider>,
    pub images: Arc<ImageResolver>,
    pub catalog: Arc<Catalog>,
    pub config: Config,
}
