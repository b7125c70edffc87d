//! Connection lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a subscriber connection.
///
/// `Pending -> Active` on successful registration, `-> Closed` on disconnect,
/// eviction after a failed send, or shutdown. A pending connection whose
/// registration is rejected goes straight to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Pending,
    Active,
    Closed,
}

impl ConnectionState {
    /// Returns true if the connection may receive frames.
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Active)
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Pending, Active) | (Pending, Closed) | (Active, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            Pending => vec![Active, Closed],
            Active => vec![Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Pending => "pending",
            ConnectionState::Active => "active",
            ConnectionState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
