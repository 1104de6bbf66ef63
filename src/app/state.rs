//! Per-session mutable state.
//!
//! One `SessionState` per wrapped shell; every handler takes `&mut` to it so
//! all mutation happens in one place on the event loop.

use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::core::{browse::BrowseState, ring::HistoryRing};
use crate::ui::decoration::Decoration;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot enable directory cycling: no live shell process attached")]
    NoShell,
}

/// A confirm scheduled to fire after the idle delay.
///
/// Superseded on every cursor move: the task is aborted and the generation
/// bumped, so a fire carrying an old generation can never confirm a stale
/// candidate.
pub struct PendingConfirm {
    pub generation: u64,
    /// The candidate this timer would confirm (logging / sanity checks).
    pub path: PathBuf,
    pub handle: JoinHandle<()>,
}

/// All mutable state for one wrapped shell session.
pub struct SessionState {
    /// Whether directory cycling is enabled on this session.
    pub enabled: bool,
    /// Visited-directory history; `None` until `enable()`.
    pub ring: Option<HistoryRing>,
    pub browse: BrowseState,
    /// The inline candidate display, owned here, painted by the UI.
    pub decoration: Option<Decoration>,
    pub pending_confirm: Option<PendingConfirm>,
    /// Monotonic id stamped onto timer tasks; stale fires are discarded.
    pub confirm_generation: u64,
    /// Stdin of the wrapped shell. `None` once the shell is gone.
    pub shell: Option<Box<dyn Write + Send>>,
    /// Tracked working directory of the shell.
    pub cwd: PathBuf,
    /// Input typed since the last Enter, not yet forwarded to the shell.
    pub input_line: String,
    /// An optional transient message shown above the input row.
    pub status_message: Option<String>,
    /// Set when an input line was forwarded; the draw loop consumes it to
    /// move past the submitted row.
    pub line_submitted: bool,
    /// Controls the main event loop.
    pub should_quit: bool,
    pub config: Config,
}

impl SessionState {
    pub fn new(cwd: PathBuf, shell: Option<Box<dyn Write + Send>>, config: Config) -> Self {
        Self {
            enabled: false,
            ring: None,
            browse: BrowseState::default(),
            decoration: None,
            pending_confirm: None,
            confirm_generation: 0,
            shell,
            cwd,
            input_line: String::new(),
            status_message: None,
            line_submitted: false,
            should_quit: false,
            config,
        }
    }

    /// Turn the feature on: fails fast without an attached shell process,
    /// otherwise creates the ring seeded with the current directory.
    pub fn enable(&mut self) -> Result<(), SessionError> {
        if self.shell.is_none() {
            return Err(SessionError::NoShell);
        }
        let mut ring = HistoryRing::new(self.config.history_capacity, self.cwd.clone());
        // The starting directory is history too; recording it keeps it
        // reachable once later changes push it back in the ring.
        ring.record(self.cwd.clone());
        tracing::debug!(
            "cycling enabled, seed {}, capacity {}",
            self.cwd.display(),
            ring.capacity()
        );
        self.ring = Some(ring);
        self.enabled = true;
        Ok(())
    }

    /// Turn the feature off, dropping the ring and any in-flight browse.
    pub fn disable(&mut self) {
        self.cancel_pending_confirm();
        self.ring = None;
        self.browse = BrowseState::default();
        self.decoration = None;
        self.enabled = false;
    }

    /// The path the current cursor points at, if a browse run is active.
    pub fn candidate(&self) -> Option<PathBuf> {
        let ring = self.ring.as_ref()?;
        let offset = self.browse.cursor?;
        Some(ring.peek(offset).to_path_buf())
    }

    /// Abort the pending timer task, if any. The generation counter is left
    /// alone; arming bumps it.
    pub fn cancel_pending_confirm(&mut self) {
        if let Some(pending) = self.pending_confirm.take() {
            pending.handle.abort();
        }
    }
}
