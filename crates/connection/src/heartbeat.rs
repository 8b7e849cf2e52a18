//! Heartbeat policy: ping while live, otherwise redial.

use std::time::Duration;

use tokio::time::Instant;

use crate::types::ConnectionState;

/// What a heartbeat tick should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeartbeatAction {
    /// Link is live: send a ping frame.
    Ping,
    /// Link is down or the pong is stale: tear down and redial.
    Reconnect,
}

/// Decides the action for a heartbeat tick.
///
/// Pings only while Connected with a pong strictly younger than the
/// liveness window; a pong aged exactly the window redials. `last_pong`
/// is seeded at connect time, so a link that never delivers a pong is
/// redialed once the seed ages out.
pub(crate) fn heartbeat_action(
    state: ConnectionState,
    last_pong: Instant,
    now: Instant,
    liveness_window: Duration,
) -> HeartbeatAction {
    if state == ConnectionState::Connected && now < last_pong + liveness_window {
        HeartbeatAction::Ping
    } else {
        HeartbeatAction::Reconnect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(30);

    /// A reference instant far enough in the future that subtracting
    /// test offsets can never underflow.
    fn base() -> Instant {
        Instant::now() + Duration::from_secs(3600)
    }

    fn pong_aged(age: Duration) -> HeartbeatAction {
        let now = base();
        heartbeat_action(ConnectionState::Connected, now - age, now, WINDOW)
    }

    #[test]
    fn fresh_pong_pings() {
        assert_eq!(pong_aged(Duration::from_secs(0)), HeartbeatAction::Ping);
        assert_eq!(pong_aged(Duration::from_secs(10)), HeartbeatAction::Ping);
        assert_eq!(pong_aged(Duration::from_secs(25)), HeartbeatAction::Ping);
    }

    #[test]
    fn stale_pong_reconnects() {
        assert_eq!(pong_aged(Duration::from_secs(40)), HeartbeatAction::Reconnect);
        assert_eq!(pong_aged(Duration::from_secs(3600)), HeartbeatAction::Reconnect);
    }

    #[test]
    fn window_boundary_is_strict() {
        // A pong aged exactly the window is already stale.
        assert_eq!(pong_aged(WINDOW), HeartbeatAction::Reconnect);
        assert_eq!(
            pong_aged(WINDOW - Duration::from_millis(1)),
            HeartbeatAction::Ping
        );
    }

    #[test]
    fn not_connected_always_reconnects() {
        let now = base();
        for state in [ConnectionState::Disconnected, ConnectionState::Connecting] {
            assert_eq!(
                heartbeat_action(state, now, now, WINDOW),
                HeartbeatAction::Reconnect
            );
        }
    }

    #[test]
    fn documented_timeline() {
        // Pong at t=-10s. Ticks at t=0 and t=15 ping; the tick at t=30
        // (pong age 40 s) redials.
        let start = base();
        let last_pong = start - Duration::from_secs(10);

        let tick = |t: u64| {
            heartbeat_action(
                ConnectionState::Connected,
                last_pong,
                start + Duration::from_secs(t),
                WINDOW,
            )
        };

        assert_eq!(tick(0), HeartbeatAction::Ping);
        assert_eq!(tick(15), HeartbeatAction::Ping);
        assert_eq!(tick(30), HeartbeatAction::Reconnect);
    }
}
