//! Stream Bridge
//!
//! Subscribes to a server-side reactive stream and republishes each
//! event as an envelope to a resolved target. The stream grammar maps
//! onto the envelope protocol:
//!
//! - `Ok(value)`   → `onNext` envelope carrying the value as JSON
//! - `Err(error)`  → terminal `onError` envelope carrying the display
//!   string
//! - end of stream → terminal `onCompleted` envelope
//!
//! Each bridge runs in its own task and awaits every delivery before
//! pulling the next item, so envelopes for one bridge arrive in source
//! order. Exactly one terminal envelope is ever delivered per bridge;
//! after it, nothing else is, even if a misbehaving source keeps
//! producing.

use std::fmt::Display;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::ClientDelivery;
use crate::application::services::HubContext;
use crate::application::services::resolver::{ResolveError, ResolvedTarget};
use crate::domain::envelope::{Envelope, PUSH_METHOD};
use crate::domain::target::ClientTarget;

// =============================================================================
// Errors
// =============================================================================

/// Failure to establish a bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Every envelope needs a non-empty event name.
    #[error("event name must not be empty")]
    EmptyEventName,

    /// Target resolution failed before any subscription side effect.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

// =============================================================================
// Bridge Handle
// =============================================================================

/// Owner of one bridged subscription.
///
/// Disposing unsubscribes immediately and suppresses any envelope not
/// yet handed to the delivery interface; deliveries already in flight
/// cannot be recalled. Disposal is idempotent.
#[derive(Debug)]
pub struct BridgeHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl BridgeHandle {
    /// Stop the bridge. Safe to call more than once.
    pub fn dispose(&self) {
        self.cancel.cancel();
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the bridge task has stopped, either by disposal or by
    /// delivering its terminal envelope.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the bridge task to stop.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

// =============================================================================
// Stream Bridge
// =============================================================================

/// Bridges server-side streams onto the envelope protocol.
pub struct StreamBridge {
    context: HubContext,
}

impl StreamBridge {
    /// Create a bridge service over the given context.
    #[must_use]
    pub fn new(context: HubContext) -> Self {
        Self { context }
    }

    /// Subscribe `stream` and republish its events under `event_name`
    /// to the resolved target of `hub`.
    ///
    /// The returned handle exclusively owns the subscription; dropping
    /// it without disposing leaves the bridge running detached until
    /// the source terminates.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::EmptyEventName`] for an empty event name
    /// and [`BridgeError::Resolve`] when the hub is not registered.
    /// Both are reported before the stream is subscribed.
    pub fn bridge<S, T, E>(
        &self,
        stream: S,
        hub: &str,
        event_name: &str,
        target: ClientTarget,
    ) -> Result<BridgeHandle, BridgeError>
    where
        S: Stream<Item = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Display + Send + 'static,
    {
        if event_name.is_empty() {
            return Err(BridgeError::EmptyEventName);
        }

        let resolved = self.context.resolver().resolve(hub, target)?;
        let delivery = Arc::clone(self.context.delivery());
        let event = event_name.to_string();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            run_bridge(stream, resolved, event, delivery, token).await;
        });

        Ok(BridgeHandle { cancel, task })
    }
}

impl std::fmt::Debug for StreamBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBridge").finish_non_exhaustive()
    }
}

/// Pump one stream into the delivery interface until a terminal event,
/// a delivery failure, or cancellation.
async fn run_bridge<S, T, E>(
    stream: S,
    resolved: ResolvedTarget,
    event: String,
    delivery: Arc<dyn ClientDelivery>,
    token: CancellationToken,
) where
    S: Stream<Item = Result<T, E>> + Send,
    T: Serialize,
    E: Display,
{
    tokio::pin!(stream);

    loop {
        // Biased: a disposal racing an already-ready item must win, so
        // that disposing before any emission delivers zero envelopes.
        let item = tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!(event = %event, "bridge disposed");
                return;
            }
            item = stream.next() => item,
        };

        let (envelope, terminal) = match item {
            Some(Ok(value)) => match serde_json::to_value(&value) {
                Ok(data) => (Envelope::next(&event, data), false),
                // A value the host cannot serialize ends the stream the
                // same way a source error would.
                Err(error) => (
                    Envelope::error(&event, serde_json::Value::String(error.to_string())),
                    true,
                ),
            },
            Some(Err(error)) => (
                Envelope::error(&event, serde_json::Value::String(error.to_string())),
                true,
            ),
            None => (Envelope::completed(&event), true),
        };

        if let Err(error) = delivery
            .deliver(
                resolved.hub(),
                resolved.target(),
                PUSH_METHOD,
                envelope.into_value(),
            )
            .await
        {
            tracing::warn!(event = %event, error = %error, "envelope delivery failed, bridge stopped");
            return;
        }

        if terminal {
            tracing::debug!(event = %event, "bridge delivered terminal envelope");
            return;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::application::ports::DeliveryError;
    use crate::domain::envelope::EventKind;
    use crate::domain::hubs::HubDescriptor;
    use crate::infrastructure::registry::InMemoryHubRegistry;

    #[derive(Default)]
    struct RecordingDelivery {
        sent: Mutex<Vec<(String, ClientTarget, String, serde_json::Value)>>,
    }

    impl RecordingDelivery {
        fn envelopes(&self) -> Vec<Envelope> {
            self.sent
                .lock()
                .iter()
                .map(|(_, _, _, payload)| serde_json::from_value(payload.clone()).unwrap())
                .collect()
        }
    }

    #[async_trait]
    impl ClientDelivery for RecordingDelivery {
        async fn deliver(
            &self,
            hub: &str,
            target: &ClientTarget,
            method: &str,
            payload: serde_json::Value,
        ) -> Result<(), DeliveryError> {
            self.sent.lock().push((
                hub.to_string(),
                target.clone(),
                method.to_string(),
                payload,
            ));
            Ok(())
        }
    }

    fn chat_context() -> (HubContext, Arc<RecordingDelivery>) {
        let registry = InMemoryHubRegistry::new();
        registry
            .register(
                HubDescriptor::builder("Chat")
                    .method("Send", &["message"])
                    .stream("Updates")
                    .build(),
            )
            .unwrap();
        let delivery = Arc::new(RecordingDelivery::default());
        let context = HubContext::new(
            Arc::new(registry),
            Arc::clone(&delivery) as Arc<dyn ClientDelivery>,
        );
        (context, delivery)
    }

    #[tokio::test]
    async fn values_then_completion_in_order() {
        let (context, delivery) = chat_context();
        let bridge = StreamBridge::new(context);

        let stream = futures::stream::iter(
            vec![Ok::<_, std::io::Error>("a"), Ok("b"), Ok("c")],
        );
        let handle = bridge
            .bridge(stream, "Chat", "Updates", ClientTarget::AllClients)
            .unwrap();
        handle.join().await;

        let envelopes = delivery.envelopes();
        assert_eq!(envelopes.len(), 4);
        for (envelope, expected) in envelopes.iter().zip(["a", "b", "c"]) {
            assert_eq!(envelope.kind(), EventKind::Next);
            assert_eq!(envelope.data(), Some(&serde_json::json!(expected)));
        }
        assert_eq!(envelopes[3].kind(), EventKind::Completed);
        assert!(envelopes[3].data().is_none());
    }

    #[tokio::test]
    async fn source_error_becomes_single_terminal_envelope() {
        let (context, delivery) = chat_context();
        let bridge = StreamBridge::new(context);

        let stream = futures::stream::iter(vec![
            Ok::<&str, String>("a"),
            Err("boom".to_string()),
            // Misbehaving source keeps emitting after its error.
            Ok("never"),
        ]);
        let handle = bridge
            .bridge(stream, "Chat", "Updates", ClientTarget::AllClients)
            .unwrap();
        handle.join().await;

        let envelopes = delivery.envelopes();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[1].kind(), EventKind::Error);
        assert_eq!(envelopes[1].data(), Some(&serde_json::json!("boom")));
    }

    #[tokio::test]
    async fn empty_event_name_is_rejected_up_front() {
        let (context, delivery) = chat_context();
        let bridge = StreamBridge::new(context);

        let stream = futures::stream::iter(vec![Ok::<_, std::io::Error>(1)]);
        let error = bridge
            .bridge(stream, "Chat", "", ClientTarget::AllClients)
            .unwrap_err();

        assert!(matches!(error, BridgeError::EmptyEventName));
        assert!(delivery.envelopes().is_empty());
    }

    #[tokio::test]
    async fn unknown_hub_is_rejected_before_subscribing() {
        let (context, _) = chat_context();
        let bridge = StreamBridge::new(context);

        let stream = futures::stream::iter(vec![Ok::<_, std::io::Error>(1)]);
        let error = bridge
            .bridge(stream, "Billing", "Updates", ClientTarget::AllClients)
            .unwrap_err();

        assert!(matches!(
            error,
            BridgeError::Resolve(ResolveError::HubNotFound(_))
        ));
    }

    #[tokio::test]
    async fn dispose_is_idempotent() {
        let (context, _) = chat_context();
        let bridge = StreamBridge::new(context);

        let stream = futures::stream::pending::<Result<i32, std::io::Error>>();
        let handle = bridge
            .bridge(stream, "Chat", "Updates", ClientTarget::AllClients)
            .unwrap();

        handle.dispose();
        handle.dispose();
        assert!(handle.is_disposed());
        handle.join().await;
    }
}
