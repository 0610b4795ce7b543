//! Application state for the Roster Engine API.

use std::sync::Arc;

use crate::engine::Engine;

/// Shared application state.
///
/// Every handler reaches the same [`Engine`] through this handle.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
}

impl AppState {
    /// Creates a new application state owning `engine`.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
