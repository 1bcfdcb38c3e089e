//! Application state for the web layer.

use std::sync::Arc;

use crate::service::SubwayService;
use crate::store::MemoryStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Subway operations over the in-process store
    pub service: Arc<SubwayService<MemoryStore>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: SubwayService<MemoryStore>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
