//! Hub Event Raiser
//!
//! Lets hub-hosted code push ad-hoc named events through the same
//! envelope protocol as a bridged stream, without a persistent
//! subscription. Each call resolves its target fresh and performs
//! exactly one delivery; failures from the host framework propagate
//! unmodified.

use std::fmt::Display;

use serde::Serialize;

use crate::application::ports::DeliveryError;
use crate::application::services::HubContext;
use crate::application::services::resolver::ResolveError;
use crate::domain::envelope::{Envelope, PUSH_METHOD};
use crate::domain::target::ClientTarget;

// =============================================================================
// Errors
// =============================================================================

/// Failure to raise an event.
#[derive(Debug, thiserror::Error)]
pub enum RaiseError {
    /// Every envelope needs a non-empty event name.
    #[error("event name must not be empty")]
    EmptyEventName,

    /// Target resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The host framework's delivery interface failed; propagated
    /// unmodified, no retry.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The payload could not be serialized to JSON.
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// Hub Raiser
// =============================================================================

/// Ad-hoc event raiser bound to one hub.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo(context: hub_stream_bridge::HubContext) -> Result<(), hub_stream_bridge::RaiseError> {
/// use hub_stream_bridge::HubRaiser;
///
/// let raiser = HubRaiser::new(context, "Chat");
/// raiser.next("Updates", &"hi").await?;
/// raiser.next_to_group("Updates", "traders", &"hi").await?;
/// raiser.completed("Updates").await?;
/// # Ok(())
/// # }
/// ```
pub struct HubRaiser {
    context: HubContext,
    hub: String,
}

impl HubRaiser {
    /// Create a raiser for the given hub.
    pub fn new(context: HubContext, hub: impl Into<String>) -> Self {
        Self {
            context,
            hub: hub.into(),
        }
    }

    /// The hub this raiser is bound to.
    #[must_use]
    pub fn hub(&self) -> &str {
        &self.hub
    }

    // =========================================================================
    // onNext
    // =========================================================================

    /// Raise a value event to all clients of the hub.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn next<T: Serialize + Sync>(
        &self,
        event_name: &str,
        payload: &T,
    ) -> Result<(), RaiseError> {
        self.next_to(event_name, ClientTarget::AllClients, payload)
            .await
    }

    /// Raise a value event to one named client. An empty client name
    /// broadcasts.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn next_to_client<T: Serialize + Sync>(
        &self,
        event_name: &str,
        client: &str,
        payload: &T,
    ) -> Result<(), RaiseError> {
        self.next_to(event_name, ClientTarget::named(client), payload)
            .await
    }

    /// Raise a value event to a named group.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn next_to_group<T: Serialize + Sync>(
        &self,
        event_name: &str,
        group: &str,
        payload: &T,
    ) -> Result<(), RaiseError> {
        self.next_to(event_name, ClientTarget::group(group), payload)
            .await
    }

    /// Raise a value event to an explicit target.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn next_to<T: Serialize + Sync>(
        &self,
        event_name: &str,
        target: ClientTarget,
        payload: &T,
    ) -> Result<(), RaiseError> {
        Self::ensure_event_name(event_name)?;
        let data = serde_json::to_value(payload)?;
        self.deliver(Envelope::next(event_name, data), target).await
    }

    // =========================================================================
    // onError
    // =========================================================================

    /// Raise a terminal error event to all clients of the hub.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn error<E: Display + Sync>(
        &self,
        event_name: &str,
        error: &E,
    ) -> Result<(), RaiseError> {
        self.error_to(event_name, ClientTarget::AllClients, error)
            .await
    }

    /// Raise a terminal error event to one named client.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn error_to_client<E: Display + Sync>(
        &self,
        event_name: &str,
        client: &str,
        error: &E,
    ) -> Result<(), RaiseError> {
        self.error_to(event_name, ClientTarget::named(client), error)
            .await
    }

    /// Raise a terminal error event to a named group.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn error_to_group<E: Display + Sync>(
        &self,
        event_name: &str,
        group: &str,
        error: &E,
    ) -> Result<(), RaiseError> {
        self.error_to(event_name, ClientTarget::group(group), error)
            .await
    }

    /// Raise a terminal error event to an explicit target.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn error_to<E: Display + Sync>(
        &self,
        event_name: &str,
        target: ClientTarget,
        error: &E,
    ) -> Result<(), RaiseError> {
        Self::ensure_event_name(event_name)?;
        let data = serde_json::Value::String(error.to_string());
        self.deliver(Envelope::error(event_name, data), target)
            .await
    }

    // =========================================================================
    // onCompleted
    // =========================================================================

    /// Raise a terminal completion event to all clients of the hub.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn completed(&self, event_name: &str) -> Result<(), RaiseError> {
        self.completed_to(event_name, ClientTarget::AllClients).await
    }

    /// Raise a terminal completion event to one named client.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn completed_to_client(
        &self,
        event_name: &str,
        client: &str,
    ) -> Result<(), RaiseError> {
        self.completed_to(event_name, ClientTarget::named(client))
            .await
    }

    /// Raise a terminal completion event to a named group.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn completed_to_group(
        &self,
        event_name: &str,
        group: &str,
    ) -> Result<(), RaiseError> {
        self.completed_to(event_name, ClientTarget::group(group))
            .await
    }

    /// Raise a terminal completion event to an explicit target.
    ///
    /// # Errors
    ///
    /// See [`RaiseError`].
    pub async fn completed_to(
        &self,
        event_name: &str,
        target: ClientTarget,
    ) -> Result<(), RaiseError> {
        Self::ensure_event_name(event_name)?;
        self.deliver(Envelope::completed(event_name), target).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_event_name(event_name: &str) -> Result<(), RaiseError> {
        if event_name.is_empty() {
            return Err(RaiseError::EmptyEventName);
        }
        Ok(())
    }

    async fn deliver(&self, envelope: Envelope, target: ClientTarget) -> Result<(), RaiseError> {
        let resolved = self.context.resolver().resolve(&self.hub, target)?;
        tracing::debug!(
            hub = %resolved.hub(),
            event = %envelope.event_name(),
            kind = envelope.kind().as_str(),
            "raising hub event"
        );
        self.context
            .delivery()
            .deliver(
                resolved.hub(),
                resolved.target(),
                PUSH_METHOD,
                envelope.into_value(),
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for HubRaiser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubRaiser")
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::application::ports::ClientDelivery;
    use crate::domain::hubs::HubDescriptor;
    use crate::infrastructure::registry::InMemoryHubRegistry;

    #[derive(Default)]
    struct RecordingDelivery {
        sent: Mutex<Vec<(ClientTarget, String, serde_json::Value)>>,
        fail: bool,
    }

    #[async_trait]
    impl ClientDelivery for RecordingDelivery {
        async fn deliver(
            &self,
            _hub: &str,
            target: &ClientTarget,
            method: &str,
            payload: serde_json::Value,
        ) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Unroutable("test".to_string()));
            }
            self.sent
                .lock()
                .push((target.clone(), method.to_string(), payload));
            Ok(())
        }
    }

    fn raiser_with(delivery: Arc<RecordingDelivery>) -> HubRaiser {
        let registry = InMemoryHubRegistry::new();
        registry
            .register(HubDescriptor::builder("Chat").method("Send", &["message"]).build())
            .unwrap();
        HubRaiser::new(
            HubContext::new(Arc::new(registry), delivery as Arc<dyn ClientDelivery>),
            "Chat",
        )
    }

    #[tokio::test]
    async fn next_broadcasts_through_the_push_method() {
        let delivery = Arc::new(RecordingDelivery::default());
        let raiser = raiser_with(Arc::clone(&delivery));

        raiser.next("Updates", &"hi").await.unwrap();

        let sent = delivery.sent.lock();
        assert_eq!(sent.len(), 1);
        let (target, method, payload) = &sent[0];
        assert!(target.is_broadcast());
        assert_eq!(method, PUSH_METHOD);
        assert_eq!(
            payload,
            &json!({ "EventName": "Updates", "Type": "onNext", "Data": "hi" })
        );
    }

    #[tokio::test]
    async fn group_variant_resolves_group_target() {
        let delivery = Arc::new(RecordingDelivery::default());
        let raiser = raiser_with(Arc::clone(&delivery));

        raiser
            .next_to_group("Updates", "traders", &42)
            .await
            .unwrap();

        let sent = delivery.sent.lock();
        assert_eq!(sent[0].0, ClientTarget::Group("traders".to_string()));
    }

    #[tokio::test]
    async fn empty_client_name_broadcasts() {
        let delivery = Arc::new(RecordingDelivery::default());
        let raiser = raiser_with(Arc::clone(&delivery));

        raiser.next_to_client("Updates", "", &1).await.unwrap();

        assert!(delivery.sent.lock()[0].0.is_broadcast());
    }

    #[tokio::test]
    async fn completed_carries_no_data() {
        let delivery = Arc::new(RecordingDelivery::default());
        let raiser = raiser_with(Arc::clone(&delivery));

        raiser.completed("Updates").await.unwrap();

        let payload = &delivery.sent.lock()[0].2;
        assert_eq!(payload["Type"], "onCompleted");
        assert!(payload.get("Data").is_none());
    }

    #[tokio::test]
    async fn error_payload_is_display_string() {
        let delivery = Arc::new(RecordingDelivery::default());
        let raiser = raiser_with(Arc::clone(&delivery));

        let source = std::io::Error::other("stream torn down");
        raiser.error("Updates", &source).await.unwrap();

        let payload = &delivery.sent.lock()[0].2;
        assert_eq!(payload["Type"], "onError");
        assert_eq!(payload["Data"], "stream torn down");
    }

    #[tokio::test]
    async fn delivery_failure_propagates_unmodified() {
        let delivery = Arc::new(RecordingDelivery {
            fail: true,
            ..Default::default()
        });
        let raiser = raiser_with(delivery);

        let error = raiser.next("Updates", &1).await.unwrap_err();

        assert!(matches!(
            error,
            RaiseError::Delivery(DeliveryError::Unroutable(_))
        ));
    }

    #[tokio::test]
    async fn unknown_hub_fails_resolution() {
        let delivery = Arc::new(RecordingDelivery::default());
        let registry = InMemoryHubRegistry::new();
        let raiser = HubRaiser::new(
            HubContext::new(Arc::new(registry), delivery as Arc<dyn ClientDelivery>),
            "Chat",
        );

        let error = raiser.next("Updates", &1).await.unwrap_err();

        assert!(matches!(error, RaiseError::Resolve(_)));
    }

    #[tokio::test]
    async fn empty_event_name_is_rejected() {
        let delivery = Arc::new(RecordingDelivery::default());
        let raiser = raiser_with(Arc::clone(&delivery));

        let error = raiser.next("", &1).await.unwrap_err();

        assert!(matches!(error, RaiseError::EmptyEventName));
        assert!(delivery.sent.lock().is_empty());
    }
}
