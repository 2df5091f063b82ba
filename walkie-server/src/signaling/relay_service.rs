use crate::relay::RelayCommand;
use crate::signaling::EventSink;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};
use walkie_core::{ConnectionId, ServerEvent};

struct RelayServiceInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Clonable handle shared between the WebSocket handlers and the relay:
/// tracks the outbound sender of every live connection and carries the
/// relay's command channel.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayServiceInner>,
    pub(crate) relay_cmd_tx: mpsc::Sender<RelayCommand>,
}

impl RelayService {
    pub fn new(relay_cmd_tx: mpsc::Sender<RelayCommand>) -> Self {
        Self {
            inner: Arc::new(RelayServiceInner {
                connections: DashMap::new(),
            }),
            relay_cmd_tx,
        }
    }

    pub fn add_connection(&self, conn_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(conn_id, tx);
    }

    pub fn remove_connection(&self, conn_id: &ConnectionId) {
        self.inner.connections.remove(conn_id);
    }

    pub fn send_event(&self, conn_id: &ConnectionId, event: &ServerEvent) {
        if let Some(conn) = self.inner.connections.get(conn_id) {
            match serde_json::to_string(event) {
                Ok(json) => {
                    if let Err(e) = conn.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", conn_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize server event: {}", e),
            }
        } else {
            warn!("Dropped event for disconnected connection {}", conn_id);
        }
    }
}

#[async_trait]
impl EventSink for RelayService {
    async fn send(&self, conn_id: &ConnectionId, event: ServerEvent) {
        self.send_event(conn_id, &event);
    }
}
