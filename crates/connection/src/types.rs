//! Public types for the connection manager.

use std::time::Duration;

use traybell_protocol::Notice;
use traybell_protocol::constants::{LIVENESS_WINDOW, PING_INTERVAL};

/// Connection state of the notice service link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live link.
    Disconnected,
    /// Dial in flight.
    Connecting,
    /// Link established; heartbeat active.
    Connected,
}

/// Events emitted by the connection manager.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    /// The link state changed. Drives the online/offline indicator.
    StateChanged(ConnectionState),
    /// A notice was decoded from the stream.
    Notice(Notice),
}

/// Heartbeat cadence and liveness window.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between heartbeat ticks.
    pub ping_interval: Duration,
    /// Maximum age of the last pong before the link counts as dead.
    pub liveness_window: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            ping_interval: PING_INTERVAL,
            liveness_window: LIVENESS_WINDOW,
        }
    }
}
