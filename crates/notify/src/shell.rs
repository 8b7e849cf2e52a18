//! Side-effect seam towards the platform tray/window shell.

/// Tray icon variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIcon {
    /// Resting icon.
    Normal,
    /// Attention icon shown during the blink cycle.
    Alert,
}

/// Platform shell operations the notification core drives.
///
/// Implementations are fire-and-forget: failures stay inside the shell
/// and never propagate back into the core.
pub trait TrayShell: Send + Sync {
    /// Swaps the tray icon variant.
    fn set_icon(&self, icon: TrayIcon);

    /// Sets the tray tooltip; empty clears it.
    fn set_tooltip(&self, text: &str);

    /// Plays the audible notice alert.
    fn play_bell(&self);

    /// Shows a toast-style alert.
    fn show_toast(&self, title: &str, body: &str);

    /// Updates the persistent status line; empty clears it.
    fn set_status(&self, text: &str);
}
