use walkie_core::{ClientEvent, ConnectionId};

/// Commands fed to the relay by the transport layer (WebSocket handlers).
#[derive(Debug)]
pub enum RelayCommand {
    /// The upgrade finished and an outbound sender was registered.
    Connect { conn_id: ConnectionId },

    /// A parsed client event arrived on a connection.
    Inbound {
        conn_id: ConnectionId,
        event: ClientEvent,
    },

    /// The connection closed (client close, reset, or handler error).
    Disconnect { conn_id: ConnectionId },
}
