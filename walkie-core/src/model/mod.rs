mod connection;
mod event;

pub use connection::ConnectionId;
pub use event::{ClientEvent, RoomMember, ServerEvent};
