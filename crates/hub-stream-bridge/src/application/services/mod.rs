//! Application Services
//!
//! Services that route envelopes through the ports:
//!
//! - [`resolver::TargetResolver`]: resolves delivery scopes against the
//!   live hub registry
//! - [`bridge::StreamBridge`]: subscribes a server-side stream and
//!   republishes its events as envelopes
//! - [`raiser::HubRaiser`]: one-shot ad-hoc event raises

use std::sync::Arc;

use crate::application::ports::{ClientDelivery, HubRegistry};

/// Stream bridging.
pub mod bridge;

/// Ad-hoc event raising.
pub mod raiser;

/// Target resolution.
pub mod resolver;

// =============================================================================
// Hub Context
// =============================================================================

/// The wiring handed to every service at construction: the hub
/// registry and the client delivery interface of the host framework.
///
/// Built once at startup and cloned into each service, replacing any
/// process-wide mutable resolver state. Initialization order is
/// therefore explicit: a service cannot exist without its context.
#[derive(Clone)]
pub struct HubContext {
    registry: Arc<dyn HubRegistry>,
    delivery: Arc<dyn ClientDelivery>,
}

impl HubContext {
    /// Create a context from the host framework's registry and
    /// delivery interfaces.
    pub fn new(registry: Arc<dyn HubRegistry>, delivery: Arc<dyn ClientDelivery>) -> Self {
        Self { registry, delivery }
    }

    /// The hub registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<dyn HubRegistry> {
        &self.registry
    }

    /// The client delivery interface.
    #[must_use]
    pub fn delivery(&self) -> &Arc<dyn ClientDelivery> {
        &self.delivery
    }

    /// A resolver over this context's registry.
    #[must_use]
    pub fn resolver(&self) -> resolver::TargetResolver {
        resolver::TargetResolver::new(Arc::clone(&self.registry))
    }
}

impl std::fmt::Debug for HubContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubContext").finish_non_exhaustive()
    }
}
