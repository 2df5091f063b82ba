use std::collections::HashMap;
use walkie_core::{ConnectionId, RoomMember};

/// A registered user. One per live connection; the connection id is the
/// user id.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub room_id: String,
}

/// In-memory source of truth for who is connected, under what name, in
/// what room. Owned by the relay task and mutated from that single
/// context only, so no locking is needed.
///
/// Rooms are created on first join and retained when they empty out.
#[derive(Debug, Default)]
pub struct Registry {
    users: HashMap<ConnectionId, User>,
    rooms: HashMap<String, Vec<ConnectionId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and append them to the room's member list.
    /// The caller must ensure `conn_id` is not already registered.
    pub fn add_user(&mut self, conn_id: ConnectionId, username: String, room_id: String) {
        self.rooms
            .entry(room_id.clone())
            .or_default()
            .push(conn_id.clone());
        self.users.insert(conn_id, User { username, room_id });
    }

    /// Remove a user, returning the dropped record so the caller can
    /// announce the departure. Unknown ids are a no-op: disconnecting
    /// before joining is legal.
    pub fn remove_user(&mut self, conn_id: &ConnectionId) -> Option<User> {
        let user = self.users.remove(conn_id)?;

        if let Some(members) = self.rooms.get_mut(&user.room_id) {
            members.retain(|id| id != conn_id);
        }

        Some(user)
    }

    pub fn get_user(&self, conn_id: &ConnectionId) -> Option<&User> {
        self.users.get(conn_id)
    }

    /// The room's roster in join order; empty for unknown rooms.
    pub fn room_members(&self, room_id: &str) -> Vec<RoomMember> {
        let Some(members) = self.rooms.get(room_id) else {
            return Vec::new();
        };

        members
            .iter()
            .filter_map(|id| {
                self.users.get(id).map(|user| RoomMember {
                    id: id.clone(),
                    username: user.username.clone(),
                })
            })
            .collect()
    }

    /// Connection ids of the room's members in join order.
    pub fn room_connections(&self, room_id: &str) -> Vec<ConnectionId> {
        self.rooms.get(room_id).cloned().unwrap_or_default()
    }
}
