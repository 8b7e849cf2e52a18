//! Terminal-backed tray shell.
//!
//! Stands in for the platform tray: toasts and the status line are
//! printed, the bell is the terminal BEL byte, icon and tooltip changes
//! go to the debug log.

use std::io::Write;

use traybell_notify::{TrayIcon, TrayShell};

pub struct TerminalShell;

impl TrayShell for TerminalShell {
    fn set_icon(&self, icon: TrayIcon) {
        tracing::debug!(?icon, "tray icon");
    }

    fn set_tooltip(&self, text: &str) {
        tracing::debug!(tooltip = %text, "tray tooltip");
    }

    fn play_bell(&self) {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }

    fn show_toast(&self, title: &str, body: &str) {
        println!("[{title}] {body}");
    }

    fn set_status(&self, text: &str) {
        if text.is_empty() {
            tracing::debug!("status line cleared");
        } else {
            println!("{text}");
        }
    }
}
