//! Delivery Targets
//!
//! Identifies the recipient scope for one envelope delivery: every
//! client of a hub, a single named client, or a named group. Targets
//! are resolved fresh per call; group and client membership lives in
//! the host framework and may change between calls.

// =============================================================================
// Client Target
// =============================================================================

/// The recipient scope for an envelope delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ClientTarget {
    /// Every client connected to the hub.
    #[default]
    AllClients,
    /// A single named client.
    NamedClient(String),
    /// All clients in a named group.
    Group(String),
}

impl ClientTarget {
    /// Target a single named client. An empty name is the broadcast
    /// target, matching the convention that a missing client name
    /// addresses all clients.
    #[must_use]
    pub fn named(client: impl Into<String>) -> Self {
        let client = client.into();
        if client.is_empty() {
            Self::AllClients
        } else {
            Self::NamedClient(client)
        }
    }

    /// Target all clients in a named group. An empty name is the
    /// broadcast target.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::AllClients
        } else {
            Self::Group(name)
        }
    }

    /// Collapse empty client/group names into the broadcast target.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::NamedClient(name) => Self::named(name),
            Self::Group(name) => Self::group(name),
            Self::AllClients => Self::AllClients,
        }
    }

    /// Whether this is the broadcast target.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        matches!(self, Self::AllClients)
    }
}

// =============================================================================
// Tests
// =============================================================================
