//! In-Memory Hub Registry
//!
//! A concrete [`HubRegistry`] for applications and tests that do not
//! obtain descriptors from a host framework. Registration order is
//! preserved (the generator emits hubs in it) and lookup is
//! case-insensitive on the declared name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::application::ports::HubRegistry;
use crate::domain::hubs::HubDescriptor;

// =============================================================================
// Errors
// =============================================================================

/// Registration failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A hub with the same name (ignoring case) is already registered.
    #[error("hub `{0}` is already registered")]
    DuplicateHub(String),
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug, Default)]
struct RegistryState {
    hubs: Vec<Arc<HubDescriptor>>,
    by_name: HashMap<String, usize>,
}

/// Thread-safe in-memory hub registry.
///
/// # Example
///
/// ```rust
/// use hub_stream_bridge::{HubDescriptor, HubRegistry, InMemoryHubRegistry};
///
/// let registry = InMemoryHubRegistry::new();
/// registry
///     .register(HubDescriptor::builder("Chat").method("Send", &["message"]).build())
///     .unwrap();
///
/// assert!(registry.hub("chat").is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryHubRegistry {
    state: RwLock<RegistryState>,
}

impl InMemoryHubRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hub descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateHub`] when a hub with the same
    /// name (ignoring case) is already registered.
    pub fn register(&self, hub: HubDescriptor) -> Result<(), RegistryError> {
        let key = hub.name().to_lowercase();
        let mut state = self.state.write();

        if state.by_name.contains_key(&key) {
            return Err(RegistryError::DuplicateHub(hub.name().to_string()));
        }

        let index = state.hubs.len();
        state.hubs.push(Arc::new(hub));
        state.by_name.insert(key, index);
        Ok(())
    }

    /// Number of registered hubs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().hubs.len()
    }

    /// Whether no hub is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().hubs.is_empty()
    }
}

impl HubRegistry for InMemoryHubRegistry {
    fn hubs(&self) -> Vec<Arc<HubDescriptor>> {
        self.state.read().hubs.clone()
    }

    fn hub(&self, name: &str) -> Option<Arc<HubDescriptor>> {
        let state = self.state.read();
        state
            .by_name
            .get(&name.to_lowercase())
            .map(|&index| Arc::clone(&state.hubs[index]))
    }
}

// =============================================================================
// Tests
// =============================================================================
