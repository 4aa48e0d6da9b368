//! Domain Layer
//!
//! Pure data types for the event-bridging protocol. No dependency on
//! the host framework or any transport.

/// Wire-level event envelope and push constants.
pub mod envelope;

/// Hub and method descriptors with explicit registration.
pub mod hubs;

/// Delivery scopes for envelope routing.
pub mod target;
