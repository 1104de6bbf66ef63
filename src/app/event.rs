//! Event abstraction for the main loop.
//!
//! Terminal keys, directory-change notifications, idle-timer fires, and the
//! shell's exit all arrive over one channel so the session state is only
//! ever mutated from one place.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::UnboundedSender;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// The tracked working directory changed to this path.
    DirChanged(PathBuf),
    /// An idle-confirm timer fired. Stale generations are discarded.
    ConfirmTimer { generation: u64 },
    /// The wrapped shell process exited.
    ShellExited,
}

/// Spawns a background task that polls the terminal and forwards key-press
/// events onto `tx`. Release/repeat events and everything non-key are
/// dropped here so the handler only ever sees presses.
pub fn spawn_event_reader(tx: UnboundedSender<AppEvent>, poll_rate: Duration) {
    tokio::task::spawn_blocking(move || loop {
        let has_event = event::poll(poll_rate).unwrap_or(false);
        if !has_event {
            if tx.is_closed() {
                break;
            }
            continue;
        }
        if let Ok(CtEvent::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if tx.send(AppEvent::Key(key)).is_err() {
                break; // receiver dropped
            }
        }
    });
}
