//! Hub Descriptors
//!
//! Read-only descriptions of a hub's callable surface: its declared
//! name, its invokable methods (ordered parameter lists; duplicate
//! method names model overloads), and its exported stream members.
//!
//! # Design
//!
//! Discovery is an explicit registration step rather than runtime
//! reflection: hub authors declare methods and stream members through
//! [`HubDescriptor::builder`]. Descriptors are immutable once built,
//! so the proxy generator's output is deterministic for a fixed
//! registry.

// =============================================================================
// Method Descriptor
// =============================================================================

/// One invokable hub method: its declared name and ordered parameter
/// names. Two descriptors with the same name are overloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    parameters: Vec<String>,
}

impl MethodDescriptor {
    /// Create a method descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.iter().map(ToString::to_string).collect(),
        }
    }

    /// The declared method name (also its wire name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered parameter names.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

// =============================================================================
// Hub Descriptor
// =============================================================================

/// A hub's exported surface: name, methods, and stream members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubDescriptor {
    name: String,
    methods: Vec<MethodDescriptor>,
    streams: Vec<String>,
}

impl HubDescriptor {
    /// Start building a descriptor for the hub with the given declared
    /// name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> HubDescriptorBuilder {
        HubDescriptorBuilder {
            name: name.into(),
            methods: Vec::new(),
            streams: Vec::new(),
        }
    }

    /// The hub's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods in declaration order, overloads included.
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Exported stream member names in declaration order.
    #[must_use]
    pub fn streams(&self) -> &[String] {
        &self.streams
    }

    /// Whether the hub exports any stream member.
    #[must_use]
    pub fn has_streams(&self) -> bool {
        !self.streams.is_empty()
    }
}

/// Builder for [`HubDescriptor`].
///
/// # Example
///
/// ```rust
/// use hub_stream_bridge::HubDescriptor;
///
/// let chat = HubDescriptor::builder("Chat")
///     .method("Send", &["message"])
///     .stream("Updates")
///     .build();
///
/// assert_eq!(chat.methods().len(), 1);
/// assert!(chat.has_streams());
/// ```
#[derive(Debug)]
pub struct HubDescriptorBuilder {
    name: String,
    methods: Vec<MethodDescriptor>,
    streams: Vec<String>,
}

impl HubDescriptorBuilder {
    /// Declare an invokable method. Declaring the same name more than
    /// once registers an overload; the generator later selects the
    /// overload with the fewest parameters.
    #[must_use]
    pub fn method(mut self, name: impl Into<String>, parameters: &[&str]) -> Self {
        self.methods.push(MethodDescriptor::new(name, parameters));
        self
    }

    /// Declare an exported stream member.
    #[must_use]
    pub fn stream(mut self, name: impl Into<String>) -> Self {
        self.streams.push(name.into());
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> HubDescriptor {
        HubDescriptor {
            name: self.name,
            methods: self.methods,
            streams: self.streams,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
