//! A live subscriber connection.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::domain::foundation::{
    ChannelId, ConnectionId, SessionId, StateMachine, Timestamp, UserId,
};
use crate::domain::messaging::{ConnectionState, DeliveryError};
use crate::ports::{EventSink, SinkError};

/// One (channel, user, session) subscriber and the sink that feeds its stream.
///
/// State changes go through [`ConnectionState`]'s state machine. The registry
/// performs `Pending -> Active` and `Active -> Closed` while holding the
/// channel's shard lock, so a connection is visible there exactly while it
/// is active.
pub struct Connection {
    id: ConnectionId,
    channel_id: ChannelId,
    user_id: UserId,
    session_id: SessionId,
    sink: Arc<dyn EventSink>,
    state: Mutex<ConnectionState>,
    closed: CancellationToken,
    opened_at: Timestamp,
}

impl Connection {
    pub(crate) fn new(
        channel_id: ChannelId,
        user_id: UserId,
        session_id: SessionId,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            channel_id,
            user_id,
            session_id,
            sink,
            state: Mutex::new(ConnectionState::Pending),
            closed: CancellationToken::new(),
            opened_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn opened_at(&self) -> Timestamp {
        self.opened_at
    }

    /// The sink this connection pushes to.
    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.lock_state()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ConnectionState::Closed
    }

    /// Resolves once the connection has been closed, by any path.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    /// Push a frame to the sink if the connection is still active.
    ///
    /// A closed connection reports `AlreadyClosed` and never touches the sink.
    pub async fn deliver(&self, frame: Bytes) -> Result<(), DeliveryError> {
        if !self.state().is_active() {
            return Err(DeliveryError::AlreadyClosed);
        }

        self.sink.send(frame).await.map_err(|e| match e {
            SinkError::Closed => DeliveryError::SinkClosed,
            SinkError::Write(reason) => DeliveryError::Failed(reason),
        })
    }

    /// `Pending -> Active`. Returns false if the connection was not pending.
    pub(crate) fn activate(&self) -> bool {
        let mut state = self.lock_state();
        match state.transition_to(ConnectionState::Active) {
            Ok(next) => {
                *state = next;
                true
            }
            Err(_) => false,
        }
    }

    /// Move to `Closed`, wake waiters and close the sink.
    ///
    /// Returns true only for the call that performed the transition.
    pub(crate) fn close(&self) -> bool {
        {
            let mut state = self.lock_state();
            match state.transition_to(ConnectionState::Closed) {
                Ok(next) => *state = next,
                Err(_) => return false,
            }
        }

        self.closed.cancel();
        self.sink.close();
        true
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectionState> {
        // The guarded value is a plain enum, so a poisoned lock still holds a valid state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("channel_id", &self.channel_id)
            .field("user_id", &self.user_id)
            .field("session_id", &self.session_id)
            .field("state", &self.state())
            .finish()
    }
}
