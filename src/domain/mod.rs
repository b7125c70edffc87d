//! Domain layer containing hub vocabulary and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, state machine, errors)
//! - `messaging` - Events, wire encoding, connection states and hub errors

pub mod foundation;
pub mod messaging;
