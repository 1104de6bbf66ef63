//! Spawning and watching the wrapped shell process.
//!
//! The shell gets a piped stdin (so we can forward input and inject `cd`
//! lines) and inherits our stdout/stderr. This is a pipe, not a PTY: the
//! shell's own line editing and job control are not emulated, and keyboard
//! interrupts (Ctrl+C) cannot be delivered to its foreground job.

use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{Context, Result};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::event::AppEvent;

/// Handle to the wrapped shell child.
pub struct ShellProc {
    child: Child,
}

impl ShellProc {
    /// Spawn `program` with piped stdin and inherited output streams.
    pub fn spawn(program: &str) -> Result<Self> {
        let child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn shell `{program}`"))?;
        tracing::debug!("spawned shell `{program}` (pid {})", child.id());
        Ok(Self { child })
    }

    /// Take the stdin pipe. Yields `Some` exactly once.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    /// Move the child into a blocking waiter task that reports its exit on
    /// the event channel.
    pub fn watch_exit(self, tx: UnboundedSender<AppEvent>) {
        let mut child = self.child;
        tokio::task::spawn_blocking(move || {
            match child.wait() {
                Ok(status) => tracing::debug!("shell exited: {status}"),
                Err(e) => tracing::warn!("failed to wait on shell: {e}"),
            }
            let _ = tx.send(AppEvent::ShellExited); // receiver may be gone
        });
    }
}
