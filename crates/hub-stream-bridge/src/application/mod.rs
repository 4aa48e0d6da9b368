//! Application Layer
//!
//! Port definitions (the seams to the host framework) and the services
//! that bridge streams and raise ad-hoc events through them.

/// Port interfaces consumed from the host framework.
pub mod ports;

/// Bridging, raising, and target resolution services.
pub mod services;
