//! Two-phase alert blink cycle for the tray icon.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::shell::{TrayIcon, TrayShell};

/// Period of one blink phase.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Alert indicator state.
///
/// PhaseA shows the alert icon, PhaseB the normal icon; Quiet is the
/// resting state outside a blink cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkState {
    #[default]
    Quiet,
    PhaseA,
    PhaseB,
}

impl BlinkState {
    /// Advances one timer tick while blinking.
    pub fn advance(self) -> BlinkState {
        match self {
            BlinkState::Quiet | BlinkState::PhaseB => BlinkState::PhaseA,
            BlinkState::PhaseA => BlinkState::PhaseB,
        }
    }

    /// Icon variant shown for this state.
    pub fn icon(self) -> TrayIcon {
        match self {
            BlinkState::PhaseA => TrayIcon::Alert,
            BlinkState::Quiet | BlinkState::PhaseB => TrayIcon::Normal,
        }
    }
}

/// Drives the blink cycle on a timer task.
pub struct Blinker {
    shell: Arc<dyn TrayShell>,
    state: Arc<Mutex<BlinkState>>,
    pump: Mutex<Option<(CancellationToken, tokio::task::JoinHandle<()>)>>,
}

impl Blinker {
    pub fn new(shell: Arc<dyn TrayShell>) -> Self {
        Self {
            shell,
            state: Arc::new(Mutex::new(BlinkState::Quiet)),
            pump: Mutex::new(None),
        }
    }

    /// Current indicator state.
    pub fn state(&self) -> BlinkState {
        *self.state.lock().unwrap()
    }

    /// Whether the blink pump is running (unacknowledged notices).
    pub fn is_blinking(&self) -> bool {
        self.pump.lock().unwrap().is_some()
    }

    /// Starts (or restarts) the blink cycle.
    ///
    /// Restarting resets the phase; the first toggle lands one period
    /// after this call.
    pub fn start(&self) {
        let mut pump = self.pump.lock().unwrap();
        if let Some((cancel, handle)) = pump.take() {
            cancel.cancel();
            handle.abort();
        }
        *self.state.lock().unwrap() = BlinkState::Quiet;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(blink_pump(
            self.shell.clone(),
            self.state.clone(),
            cancel.clone(),
        ));
        *pump = Some((cancel, handle));
    }

    /// Stops the cycle and restores the resting icon and empty tooltip.
    /// Safe to call while quiescent.
    pub fn acknowledge(&self) {
        if let Some((cancel, handle)) = self.pump.lock().unwrap().take() {
            cancel.cancel();
            handle.abort();
        }
        *self.state.lock().unwrap() = BlinkState::Quiet;
        self.shell.set_icon(TrayIcon::Normal);
        self.shell.set_tooltip("");
    }
}

impl Drop for Blinker {
    fn drop(&mut self) {
        if let Some((cancel, handle)) = self.pump.lock().unwrap().take() {
            cancel.cancel();
            handle.abort();
        }
    }
}

/// Toggles the icon every [`BLINK_PERIOD`] until cancelled.
async fn blink_pump(
    shell: Arc<dyn TrayShell>,
    state: Arc<Mutex<BlinkState>>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(BLINK_PERIOD);
    interval.tick().await; // Skip immediate first tick.

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let next = {
                    let mut s = state.lock().unwrap();
                    *s = s.advance();
                    *s
                };
                shell.set_icon(next.icon());
            }
        }
    }
}
