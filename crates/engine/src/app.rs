//! Application composition.

use std::sync::Arc;

use crate::results::ResultsSink;
use crate::session::GameRegistry;

/// Everything the API layer needs, wired together once at startup.
pub struct App {
    pub registry: GameRegistry,
    pub results: Arc<dyn ResultsSink>,
}

impl App {
    pub fn new(results: Arc<dyn ResultsSink>) -> Self {
        Self {
            registry: GameRegistry::new(),
            results,
        }
    }
}
