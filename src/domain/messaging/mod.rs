//! Messaging domain: the posted event, its wire encoding, the connection
//! lifecycle status and the hub's error taxonomy.

mod connection_state;
mod encoder;
mod errors;
mod event;

pub use connection_state::ConnectionState;
pub use encoder::{EventEncoder, EVENT_NAME};
pub use errors::{DeliveryError, HubError};
pub use event::{Event, EventMessage, EventUser};
