#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Hub Stream Bridge - Reactive Stream Multiplexer
//!
//! An add-on for server-push hub frameworks that exposes server-side
//! reactive streams to remote clients through a uniform event envelope,
//! and generates the per-connection client proxy script describing each
//! hub's invokable methods and exposed streams.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure data types with no external collaborators
//!   - `envelope`: The wire-level event envelope and push constants
//!   - `target`: Delivery scopes (broadcast, named client, group)
//!   - `hubs`: Hub and method descriptors with explicit registration
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces to the host framework (registry, delivery, minifier)
//!   - `services`: Target resolution, stream bridging, event raising
//!
//! - **Infrastructure**: Adapters and generated artifacts
//!   - `registry`: In-memory hub registry
//!   - `scripts`: Script cache and proxy script generator
//!
//! # Data Flow
//!
//! ```text
//! Server stream ──┐
//!                 │     ┌─────────────┐     ┌─────────────┐
//!                 ├────►│   Stream    │────►│   Client    │──► Client 1
//! Ad-hoc raise ───┤     │   Bridge    │     │  Delivery   │──► Client 2
//!                 │     └─────────────┘     └─────────────┘──► Client N
//! Server stream ──┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Envelope, target, and descriptor types.
pub mod domain;

/// Application layer - Ports and bridging/raising services.
pub mod application;

/// Infrastructure layer - Registry adapter and script generation.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Envelope protocol
pub use domain::envelope::{Envelope, EventKind, PUSH_METHOD};

// Delivery targets
pub use domain::target::ClientTarget;

// Hub descriptors
pub use domain::hubs::{HubDescriptor, HubDescriptorBuilder, MethodDescriptor};

// Ports
pub use application::ports::{
    ClientDelivery, DeliveryError, HubRegistry, NoopMinifier, ScriptMinifier,
};

// Services
pub use application::services::HubContext;
pub use application::services::bridge::{BridgeError, BridgeHandle, StreamBridge};
pub use application::services::raiser::{HubRaiser, RaiseError};
pub use application::services::resolver::{ResolveError, ResolvedTarget, TargetResolver};

// Registry adapter
pub use infrastructure::registry::{InMemoryHubRegistry, RegistryError};

// Proxy generation
pub use infrastructure::scripts::{ProxyGenerator, ProxyGeneratorConfig, ScriptCache};
