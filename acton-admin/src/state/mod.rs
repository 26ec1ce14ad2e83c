//! Application state shared by the admin handlers
//!
//! Everything in here is fixed once the router is built. Per-request data
//! (the rendering context) is never stored on the state.

use std::sync::Arc;

use crate::registry::Registry;
use crate::store::AdminStore;

/// State handed to every admin handler
///
/// Cloning is cheap: all members are reference counted.
#[derive(Clone)]
pub struct AdminState {
    /// Registered models
    registry: Arc<Registry>,

    /// Backing store
    store: Arc<dyn AdminStore>,

    /// Fields never rendered
    hidden_fields: Arc<[String]>,
}

impl AdminState {
    /// Create state from a finished registry
    #[must_use]
    pub fn new(registry: Registry, store: Arc<dyn AdminStore>, hidden_fields: Vec<String>) -> Self {
        Self {
            registry: Arc::new(registry),
            store,
            hidden_fields: hidden_fields.into(),
        }
    }

    /// Registered models
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Backing store
    #[must_use]
    pub fn store(&self) -> &dyn AdminStore {
        self.store.as_ref()
    }

    /// Fields never rendered
    #[must_use]
    pub fn hidden_fields(&self) -> &[String] {
        &self.hidden_fields
    }
}

impl std::fmt::Debug for AdminState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminState")
            .field("models", &self.registry.names())
            .field("hidden_fields", &self.hidden_fields)
            .finish_non_exhaustive()
    }
}
