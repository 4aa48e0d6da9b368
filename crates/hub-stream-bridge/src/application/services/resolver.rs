//! Client Target Resolver
//!
//! Resolves a `(hub, target)` pair against the live hub registry. A
//! resolution is a pure lookup: handles are never cached across calls
//! because client and group membership is dynamic framework-side.

use std::sync::Arc;

use crate::application::ports::HubRegistry;
use crate::domain::target::ClientTarget;

// =============================================================================
// Errors
// =============================================================================

/// Target resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The hub is not registered with the host framework. This is a
    /// wiring bug in application code, not a runtime condition to
    /// retry; callers must not swallow it.
    #[error("hub `{0}` is not registered")]
    HubNotFound(String),
}

// =============================================================================
// Resolved Target
// =============================================================================

/// A resolved recipient scope: the hub's canonical declared name plus
/// the normalized delivery target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    hub: String,
    target: ClientTarget,
}

impl ResolvedTarget {
    /// The hub's canonical declared name.
    #[must_use]
    pub fn hub(&self) -> &str {
        &self.hub
    }

    /// The normalized delivery target.
    #[must_use]
    pub const fn target(&self) -> &ClientTarget {
        &self.target
    }
}

// =============================================================================
// Target Resolver
// =============================================================================

/// Resolves delivery targets against the hub registry.
pub struct TargetResolver {
    registry: Arc<dyn HubRegistry>,
}

impl TargetResolver {
    /// Create a resolver over the given registry.
    pub fn new(registry: Arc<dyn HubRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve a hub name and target into a concrete recipient scope.
    ///
    /// Empty client or group names collapse into the broadcast target.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::HubNotFound`] when the hub is not
    /// registered.
    pub fn resolve(
        &self,
        hub: &str,
        target: ClientTarget,
    ) -> Result<ResolvedTarget, ResolveError> {
        let Some(descriptor) = self.registry.hub(hub) else {
            return Err(ResolveError::HubNotFound(hub.to_string()));
        };

        Ok(ResolvedTarget {
            hub: descriptor.name().to_string(),
            target: target.normalized(),
        })
    }
}

impl std::fmt::Debug for TargetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetResolver").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
