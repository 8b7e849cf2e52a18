//! Shared test fakes.

use std::sync::Mutex;

use crate::shell::{TrayIcon, TrayShell};

/// One recorded shell side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCall {
    Icon(TrayIcon),
    Tooltip(String),
    Bell,
    Toast(String),
    Status(String),
}

/// Shell fake that records every call in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingShell {
    calls: Mutex<Vec<ShellCall>>,
}

impl RecordingShell {
    pub(crate) fn calls(&self) -> Vec<ShellCall> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: ShellCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl TrayShell for RecordingShell {
    fn set_icon(&self, icon: TrayIcon) {
        self.push(ShellCall::Icon(icon));
    }

    fn set_tooltip(&self, text: &str) {
        self.push(ShellCall::Tooltip(text.to_string()));
    }

    fn play_bell(&self) {
        self.push(ShellCall::Bell);
    }

    fn show_toast(&self, _title: &str, body: &str) {
        self.push(ShellCall::Toast(body.to_string()));
    }

    fn set_status(&self, text: &str) {
        self.push(ShellCall::Status(text.to_string()));
    }
}
