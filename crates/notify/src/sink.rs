//! Notification sink: log append plus user-visible alerting.

use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::info;

use crate::blinker::Blinker;
use crate::log::{NoticeLog, NoticeRecord};
use crate::shell::TrayShell;

/// Timestamp format used in the status line and toast titles.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Receives decoded notices and fans out the user-visible effects:
/// front-append to the log, bell, status line, toast, tooltip, blink.
///
/// Effects are fire-and-forget with no backpressure; the log is
/// unbounded.
pub struct NoticeSink {
    log: Mutex<NoticeLog>,
    shell: Arc<dyn TrayShell>,
    blinker: Blinker,
}

impl NoticeSink {
    pub fn new(shell: Arc<dyn TrayShell>) -> Self {
        Self {
            log: Mutex::new(NoticeLog::new()),
            blinker: Blinker::new(shell.clone()),
            shell,
        }
    }

    /// Handles one incoming notice. Returns the new record's id.
    pub fn receive(&self, text: &str) -> u64 {
        let received_at = Local::now();
        let id = self.log.lock().unwrap().push(text, received_at);

        let stamp = received_at.format(TIMESTAMP_FORMAT).to_string();
        info!(%stamp, "notice received: {text}");

        self.shell.play_bell();
        self.shell.set_status(&format!("updated {stamp}"));
        self.shell.show_toast(&stamp, text);
        self.shell.set_tooltip(text);
        self.blinker.start();
        id
    }

    /// Deletes one record; clears the status line when the log empties.
    pub fn delete(&self, id: u64) -> bool {
        let mut log = self.log.lock().unwrap();
        let removed = log.delete(id);
        if removed && log.is_empty() {
            self.shell.set_status("");
        }
        removed
    }

    /// Empties the log and clears the status line. The shell is
    /// expected to confirm with the user before calling this.
    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
        self.shell.set_status("");
    }

    /// The user viewed the notices: stop blinking, restore the icon.
    pub fn acknowledge(&self) {
        self.blinker.acknowledge();
    }

    /// Snapshot of the log, newest first.
    pub fn records(&self) -> Vec<NoticeRecord> {
        self.log.lock().unwrap().iter().cloned().collect()
    }

    /// Number of logged notices.
    pub fn len(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.log.lock().unwrap().is_empty()
    }

    /// Whether the blink cycle is active (unacknowledged notices).
    pub fn is_alerting(&self) -> bool {
        self.blinker.is_blinking()
    }
}
