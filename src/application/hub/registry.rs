//! Connection registry - channel -> user -> session -> connection.
//!
//! Channels are sharded across a `DashMap`. Every mutation of a channel
//! happens under that channel's shard lock, which gives three properties:
//!
//! - a connection is inserted already active and marked closed before it is
//!   removed, so snapshots only ever contain active connections
//! - a triple can hold at most one connection
//! - empty user maps and empty channels are pruned in the same critical section

use std::collections::hash_map::Entry as SessionEntry;
use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

use crate::domain::foundation::{ChannelId, SessionId, UserId};
use crate::domain::messaging::HubError;
use crate::ports::EventSink;

use super::connection::Connection;

type Sessions = HashMap<SessionId, Arc<Connection>>;
type Users = HashMap<UserId, Sessions>;

/// Concurrent map of live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    channels: DashMap<ChannelId, Users>,
    channel_emptied: Notify,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and activates a connection for the triple.
    ///
    /// # Errors
    ///
    /// `HubError::DuplicateSession` if the triple already has a connection.
    /// The existing connection is left untouched.
    pub fn register(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
        session_id: SessionId,
        sink: Arc<dyn EventSink>,
    ) -> Result<Arc<Connection>, HubError> {
        let mut users = self.channels.entry(channel_id.clone()).or_default();
        let sessions = users.entry(user_id.clone()).or_default();

        match sessions.entry(session_id.clone()) {
            SessionEntry::Occupied(_) => Err(HubError::DuplicateSession {
                channel_id,
                user_id,
                session_id,
            }),
            SessionEntry::Vacant(slot) => {
                let connection = Arc::new(Connection::new(channel_id, user_id, session_id, sink));
                let activated = connection.activate();
                debug_assert!(activated, "fresh connection must be pending");
                slot.insert(Arc::clone(&connection));
                Ok(connection)
            }
        }
    }

    /// Removes whatever connection holds the triple and closes it.
    ///
    /// Idempotent: returns `None` when nothing was registered.
    pub fn unregister(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Option<Arc<Connection>> {
        self.remove_where(channel_id, user_id, session_id, |_| true)
    }

    /// Removes this exact connection and closes it.
    ///
    /// A triple that has since been reused by a newer connection is left
    /// alone. The connection is closed either way. Returns true if this call
    /// removed it from the registry.
    pub fn deregister(&self, connection: &Arc<Connection>) -> bool {
        let removed = self
            .remove_where(
                connection.channel_id(),
                connection.user_id(),
                connection.session_id(),
                |current| Arc::ptr_eq(current, connection),
            )
            .is_some();

        if !removed {
            connection.close();
        }
        removed
    }

    /// Active connections of a channel at this instant.
    pub fn snapshot(&self, channel_id: &ChannelId) -> Vec<Arc<Connection>> {
        self.channels
            .get(channel_id)
            .map(|users| {
                users
                    .values()
                    .flat_map(|sessions| sessions.values().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every active connection across all channels.
    pub fn connections(&self) -> Vec<Arc<Connection>> {
        let mut all = Vec::new();
        for channel in self.channels.iter() {
            for sessions in channel.value().values() {
                all.extend(sessions.values().cloned());
            }
        }
        all
    }

    pub fn contains(&self, channel_id: &ChannelId, user_id: &UserId, session_id: &SessionId) -> bool {
        self.channels
            .get(channel_id)
            .and_then(|users| users.get(user_id).map(|sessions| sessions.contains_key(session_id)))
            .unwrap_or(false)
    }

    pub fn connection_count(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.value().values().map(HashMap::len).sum::<usize>())
            .sum()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Resolves the next time a channel loses its last connection.
    ///
    /// Call `enable` on the pinned future before checking the registry so a
    /// removal between the check and the await is not missed.
    pub fn channel_emptied(&self) -> Notified<'_> {
        self.channel_emptied.notified()
    }

    fn remove_where(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
        session_id: &SessionId,
        matches: impl FnOnce(&Arc<Connection>) -> bool,
    ) -> Option<Arc<Connection>> {
        let Entry::Occupied(mut channel) = self.channels.entry(channel_id.clone()) else {
            return None;
        };

        let users = channel.get_mut();
        let sessions = users.get_mut(user_id)?;
        if !sessions.get(session_id).is_some_and(matches) {
            return None;
        }

        let removed = sessions.remove(session_id)?;
        removed.close();

        if sessions.is_empty() {
            users.remove(user_id);
        }
        if users.is_empty() {
            channel.remove();
            self.channel_emptied.notify_waiters();
        }
        Some(removed)
    }
}
