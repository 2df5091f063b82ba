use crate::relay::RelayCommand;
use crate::signaling::RelayService;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use walkie_core::{ClientEvent, ConnectionId};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    let conn_id = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, conn_id, service))
}

async fn handle_socket(socket: WebSocket, conn_id: ConnectionId, service: RelayService) {
    info!("New WebSocket connection: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(conn_id.clone(), tx);

    let connect = RelayCommand::Connect {
        conn_id: conn_id.clone(),
    };
    if let Err(e) = service.relay_cmd_tx.send(connect).await {
        error!("Relay died: {}", e);
        service.remove_connection(&conn_id);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let conn_id = conn_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            let cmd = RelayCommand::Inbound {
                                conn_id: conn_id.clone(),
                                event,
                            };
                            if let Err(e) = service.relay_cmd_tx.send(cmd).await {
                                error!("Relay died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid client event from {}: {:?}", conn_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_connection(&conn_id);

    // Always runs, whichever side ended first, so membership cannot leak.
    let _ = service
        .relay_cmd_tx
        .send(RelayCommand::Disconnect {
            conn_id: conn_id.clone(),
        })
        .await;

    info!("WebSocket disconnected: {}", conn_id);
}
