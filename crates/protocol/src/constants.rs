//! Protocol-level constants shared by the connection layer.

use std::time::Duration;

/// Payload carried in outbound heartbeat ping frames.
pub const PING_PAYLOAD: &[u8] = b"PING";

/// Cadence of the heartbeat timer. Every tick either pings or redials.
pub const PING_INTERVAL: Duration = Duration::from_secs(15);

/// Maximum age of the last pong before the link counts as dead.
///
/// Twice [`PING_INTERVAL`], so a responsive service sees two ping
/// cycles before a redial can fire.
pub const LIVENESS_WINDOW: Duration = Duration::from_secs(30);

/// Upper bound on a single connect attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum accepted inbound text frame size (1 MiB).
pub const WS_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Origin header prefix; the machine id is appended.
pub const ORIGIN_PREFIX: &str = "traybellApp:";

/// Query parameter carrying the machine id.
pub const MACHINE_ID_PARAM: &str = "uuid";

/// Prefix for the machine id inside the query parameter value.
pub const MACHINE_ID_VALUE_PREFIX: &str = "traybell:";
