use crate::registry::Registry;
use crate::relay::RelayCommand;
use crate::signaling::EventSink;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use walkie_core::{ClientEvent, ConnectionId, ServerEvent};

/// The signaling relay: a single event loop that owns the registry and
/// translates each inbound command into registry mutations plus zero or
/// more outbound events.
///
/// Commands are handled to completion one at a time, so registry
/// mutations are atomic with respect to each other by construction.
/// The relay holds no per-call state: answer/reject/end are forwarded
/// without checking that a matching initiate ever happened.
pub struct Relay {
    registry: Registry,
    command_rx: mpsc::Receiver<RelayCommand>,
    sink: Arc<dyn EventSink>,
}

impl Relay {
    pub fn new(command_rx: mpsc::Receiver<RelayCommand>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            registry: Registry::new(),
            command_rx,
            sink,
        }
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Relay event loop finished");
    }

    async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Connect { conn_id } => {
                info!("Connection registered: {}", conn_id);
                self.sink
                    .send(
                        &conn_id,
                        ServerEvent::Welcome {
                            user_id: conn_id.clone(),
                        },
                    )
                    .await;
            }

            RelayCommand::Inbound { conn_id, event } => self.handle_event(conn_id, event).await,

            RelayCommand::Disconnect { conn_id } => self.handle_disconnect(conn_id).await,
        }
    }

    async fn handle_event(&mut self, conn_id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::Join { username, room_id } => {
                self.handle_join(conn_id, username, room_id).await;
            }

            ClientEvent::Message { message } => {
                self.handle_message(conn_id, message).await;
            }

            ClientEvent::InitiateCall {
                target_user_id,
                offer,
            } => {
                self.handle_initiate_call(conn_id, target_user_id, offer)
                    .await;
            }

            ClientEvent::AnswerCall {
                target_user_id,
                answer,
            } => {
                self.sink
                    .send(
                        &target_user_id,
                        ServerEvent::CallAnswered {
                            from: conn_id,
                            answer,
                        },
                    )
                    .await;
            }

            ClientEvent::RejectCall { target_user_id } => {
                self.sink
                    .send(&target_user_id, ServerEvent::CallRejected { from: conn_id })
                    .await;
            }

            ClientEvent::EndCall { target_user_id } => {
                self.sink
                    .send(&target_user_id, ServerEvent::CallEnded { from: conn_id })
                    .await;
            }

            ClientEvent::IceCandidate {
                target_user_id,
                candidate,
            } => {
                self.sink
                    .send(
                        &target_user_id,
                        ServerEvent::IceCandidate {
                            from: conn_id,
                            candidate,
                        },
                    )
                    .await;
            }
        }
    }

    async fn handle_join(&mut self, conn_id: ConnectionId, username: String, room_id: String) {
        // Rejoining (same or different room) is not supported.
        if self.registry.get_user(&conn_id).is_some() {
            warn!("Duplicate join from {} ignored", conn_id);
            return;
        }

        info!("{} joined room {}", username, room_id);
        self.registry
            .add_user(conn_id.clone(), username.clone(), room_id.clone());

        let event = ServerEvent::UserJoined {
            user_id: conn_id,
            username,
            users_in_room: self.registry.room_members(&room_id),
        };
        self.broadcast(&room_id, event).await;
    }

    async fn handle_message(&mut self, conn_id: ConnectionId, message: String) {
        // Chat from a connection that never joined is dropped.
        let Some(user) = self.registry.get_user(&conn_id) else {
            return;
        };

        let room_id = user.room_id.clone();
        let event = ServerEvent::Message {
            user_id: conn_id,
            username: user.username.clone(),
            message,
            timestamp: Utc::now(),
        };
        self.broadcast(&room_id, event).await;
    }

    async fn handle_initiate_call(
        &mut self,
        conn_id: ConnectionId,
        target_user_id: ConnectionId,
        offer: serde_json::Value,
    ) {
        let Some(caller) = self.registry.get_user(&conn_id) else {
            warn!("initiateCall from unjoined connection {}", conn_id);
            return;
        };
        let from_username = caller.username.clone();

        // A vanished target is a legitimate race, not an error.
        if self.registry.get_user(&target_user_id).is_none() {
            return;
        }

        self.sink
            .send(
                &target_user_id,
                ServerEvent::IncomingCall {
                    from: conn_id,
                    from_username,
                    offer,
                },
            )
            .await;
    }

    async fn handle_disconnect(&mut self, conn_id: ConnectionId) {
        // Disconnect before join is legal and silent.
        let Some(user) = self.registry.remove_user(&conn_id) else {
            return;
        };

        info!("{} disconnected from room {}", user.username, user.room_id);
        let event = ServerEvent::UserLeft {
            user_id: conn_id,
            username: user.username,
        };
        self.broadcast(&user.room_id, event).await;
    }

    /// Room broadcast is unicast to each current member, in join order.
    async fn broadcast(&self, room_id: &str, event: ServerEvent) {
        for member in self.registry.room_connections(room_id) {
            self.sink.send(&member, event.clone()).await;
        }
    }
}
