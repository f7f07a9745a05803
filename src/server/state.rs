use std::sync::Arc;

use crate::version::cache::CacheStore;
use crate::version::catalog::SourceCatalog;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub catalog: Arc<SourceCatalog>,
    /// Required bearer token; `None` leaves the API open
    pub auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        catalog: Arc<SourceCatalog>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            cache,
            catalog,
            auth_token: auth_token.map(Arc::from),
        }
    }
}
