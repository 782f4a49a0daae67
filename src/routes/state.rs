use std::sync::Arc;

use crate::{db::CatalogStore, services::ModelHandle};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub model: Arc<ModelHandle>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, model: ModelHandle) -> Self {
        Self {
            catalog,
            model: Arc::new(model),
        }
    }
}
