//! Wire protocol for the traybell notice stream.
//!
//! The notice service pushes JSON text frames over a WebSocket. The only
//! shape this client acts on is the notice envelope; everything else on
//! the wire is ignored without error.

pub mod constants;
pub mod envelope;

pub use envelope::{Notice, decode_notice};
