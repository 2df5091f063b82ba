use async_trait::async_trait;
use walkie_core::{ConnectionId, ServerEvent};

/// Implemented by the transport layer so the relay can deliver outbound
/// events to a single connection. Delivery is best-effort: events for
/// connections that no longer exist are dropped.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, conn_id: &ConnectionId, event: ServerEvent);
}
