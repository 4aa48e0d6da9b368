//! Port Interfaces
//!
//! The contracts between this crate and the host framework, following
//! the Hexagonal Architecture pattern.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`ClientDelivery`]: invoke a named client-side method on a
//!   resolved target with a JSON payload
//! - [`ScriptMinifier`]: post-process the generated proxy script
//!
//! ## Driver Ports (Inbound)
//!
//! - [`HubRegistry`]: enumerate and look up registered hub descriptors

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::hubs::HubDescriptor;
use crate::domain::target::ClientTarget;

// =============================================================================
// Errors
// =============================================================================

/// Failure reported by the host framework's delivery interface.
///
/// This layer performs no retry; delivery failures propagate unmodified
/// to the caller of a raise operation or terminate the owning bridge.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The underlying transport rejected or failed the invocation.
    #[error("delivery transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The target could not be routed by the host framework.
    #[error("no route to target: {0}")]
    Unroutable(String),
}

impl DeliveryError {
    /// Wrap a host framework transport error.
    pub fn transport(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(error))
    }
}

// =============================================================================
// Hub Registry Port
// =============================================================================

/// Enumeration and lookup of registered hub descriptors.
///
/// Implementations must return hubs in a stable order; the proxy
/// generator relies on it for byte-identical output across calls.
pub trait HubRegistry: Send + Sync {
    /// All registered hubs, in registration order.
    fn hubs(&self) -> Vec<Arc<HubDescriptor>>;

    /// Look up a hub by declared name, case-insensitively.
    fn hub(&self, name: &str) -> Option<Arc<HubDescriptor>>;
}

// =============================================================================
// Client Delivery Port
// =============================================================================

/// Invocation of a named client-side method on a resolved target.
///
/// The payload is a JSON value the host framework serializes onto the
/// wire as-is. One call performs exactly one delivery operation.
#[async_trait]
pub trait ClientDelivery: Send + Sync {
    /// Invoke `method` with `payload` on every client in `target`'s
    /// scope for the given hub.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] when the host framework fails or
    /// rejects the invocation.
    async fn deliver(
        &self,
        hub: &str,
        target: &ClientTarget,
        method: &str,
        payload: serde_json::Value,
    ) -> Result<(), DeliveryError>;
}

// =============================================================================
// Script Minifier Port
// =============================================================================

/// Post-processing pass over the generated proxy script.
pub trait ScriptMinifier: Send + Sync {
    /// Minify the script text. Must be deterministic.
    fn minify(&self, script: &str) -> String;
}

/// Pass-through minifier used when none is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMinifier;

impl ScriptMinifier for NoopMinifier {
    fn minify(&self, script: &str) -> String {
        script.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
