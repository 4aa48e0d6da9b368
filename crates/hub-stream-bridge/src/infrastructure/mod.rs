//! Infrastructure Layer
//!
//! Concrete adapters: the in-memory hub registry and the proxy script
//! generator with its cache and packaged template.

/// In-memory hub registry adapter.
pub mod registry;

/// Script cache and proxy script generation.
pub mod scripts;
