//! Request and response payloads of the shared-expense HTTP endpoints.
//!
//! The engine never talks HTTP itself; a host service deserializes
//! requests into these types, runs the engine, and serializes the replies.
//! Balances and splits are keyed by member id with signed decimal strings.

pub mod requests;
pub mod responses;
pub mod snapshot;
