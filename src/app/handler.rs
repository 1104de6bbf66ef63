//! Input handling — maps events to session-state mutations.
//!
//! This is the browse controller: stepping moves the cursor, repaints the
//! decoration value, and rearms the idle-confirm timer; confirm sends the
//! one `cd` line; abort sends nothing. Timer tasks are stamped with a
//! generation so a fire that raced its own cancellation is discarded.

use std::io::Write;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::Action;
use crate::core::browse::Direction;
use crate::shell::{sender, track};
use crate::ui::decoration::Decoration;

use super::event::AppEvent;
use super::state::{PendingConfirm, SessionState};

/// Process a key press.
pub fn handle_key(state: &mut SessionState, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    state.status_message = None;

    if let Some(action) = state.config.match_key(key) {
        match action {
            Action::StepPrev => return step(state, Direction::Prev, tx),
            Action::StepNext => return step(state, Direction::Next, tx),
            Action::Confirm if state.browse.active => return confirm(state),
            Action::Abort if state.browse.active => return abort(state),
            Action::Quit => {
                state.should_quit = true;
                return;
            }
            // Confirm/Abort outside a browse run are ordinary input.
            _ => {}
        }
    }

    // Any other key supersedes an active browse run.
    if state.browse.active {
        abort(state);
    }
    state.browse.last_action_was_step = false;

    match key.code {
        // Control-modified chars (Ctrl+C included) stop here: the shell sits
        // behind a pipe, not a PTY, so an interrupt cannot reach its
        // foreground job anyway.
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            state.input_line.push(c);
        }
        KeyCode::Backspace => {
            state.input_line.pop();
        }
        KeyCode::Enter => submit_input_line(state, tx),
        _ => {}
    }
}

/// Advance or retreat the cursor, repaint the candidate, rearm the timer.
fn step(state: &mut SessionState, direction: Direction, tx: &UnboundedSender<AppEvent>) {
    if !state.enabled {
        return;
    }
    let Some(ring) = state.ring.as_ref() else {
        return;
    };
    if ring.is_empty() {
        tracing::debug!("history empty, candidate is the seed directory");
    }
    let offset = state.browse.step(direction, ring.len());
    let candidate = ring.peek(offset).to_path_buf();
    state.decoration = Some(Decoration::for_candidate(&candidate));
    tracing::debug!("step {direction:?}: offset {offset} → {}", candidate.display());
    arm_confirm_timer(state, candidate, tx);
}

/// Cancel any pending timer, then arm a fresh one for `candidate`. Skipped
/// entirely when idle confirm is disabled.
fn arm_confirm_timer(state: &mut SessionState, candidate: PathBuf, tx: &UnboundedSender<AppEvent>) {
    state.cancel_pending_confirm();
    if !state.config.idle_confirm {
        return;
    }

    state.confirm_generation += 1;
    let generation = state.confirm_generation;
    let delay = state.config.idle_delay();
    let tx = tx.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(AppEvent::ConfirmTimer { generation }); // receiver may be gone
    });

    state.pending_confirm = Some(PendingConfirm {
        generation,
        path: candidate,
        handle,
    });
}

/// An idle-confirm timer fired. Only the generation of the currently pending
/// confirm may act; anything else is a superseded timer that raced its abort.
pub fn handle_timer(state: &mut SessionState, generation: u64) {
    let current = matches!(
        state.pending_confirm,
        Some(ref pending) if pending.generation == generation
    );
    if current && state.browse.active {
        if let Some(pending) = &state.pending_confirm {
            tracing::debug!("idle confirm (gen {generation}) → {}", pending.path.display());
        }
        confirm(state);
    } else {
        tracing::debug!("stale confirm timer (gen {generation}) ignored");
    }
}

/// Jump to the displayed candidate: send the `cd` line and return to idle.
pub fn confirm(state: &mut SessionState) {
    let candidate = state.candidate();
    leave_browse(state);
    let Some(candidate) = candidate else {
        return;
    };

    let sent = match state.shell.as_mut() {
        Some(writer) => sender::send_cd(writer.as_mut(), &candidate),
        None => Err(sender::SendError::NoProcess),
    };
    match sent {
        Ok(()) => handle_dir_changed(state, candidate),
        Err(e) => {
            tracing::warn!("cd to {} not sent: {e}", candidate.display());
            state.status_message = Some(format!("cd failed: {e}"));
        }
    }
}

/// Leave browsing without jumping.
pub fn abort(state: &mut SessionState) {
    tracing::debug!("browse aborted");
    leave_browse(state);
}

/// Common confirm/abort exit: no decoration, no timer, cursor gone.
fn leave_browse(state: &mut SessionState) {
    state.cancel_pending_confirm();
    state.decoration = None;
    state.browse.reset();
    state.browse.last_action_was_step = false;
}

/// A directory change was observed (sniffed from input or confirm-sent).
pub fn handle_dir_changed(state: &mut SessionState, path: PathBuf) {
    tracing::debug!("dir changed: {}", path.display());
    state.cwd = path.clone();
    if let Some(ring) = state.ring.as_mut() {
        ring.record(path);
    }
}

/// Forward the buffered input line to the shell. A line that changes the
/// directory is reported back through the event channel, like any other
/// directory-change notification.
fn submit_input_line(state: &mut SessionState, tx: &UnboundedSender<AppEvent>) {
    let line = std::mem::take(&mut state.input_line);
    state.line_submitted = true;

    match state.shell.as_mut() {
        Some(writer) => {
            if let Err(e) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
                tracing::warn!("input line not forwarded: {e}");
                state.status_message = Some(format!("shell write failed: {e}"));
                return;
            }
        }
        None => {
            state.status_message = Some("no shell process attached".into());
            return;
        }
    }

    let home = std::env::var_os("HOME").map(PathBuf::from);
    if let Some(target) = track::cd_target(&line, &state.cwd, home.as_deref()) {
        let _ = tx.send(AppEvent::DirChanged(target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    use crate::config::Config;
    use crate::core::browse::Direction;

    /// Shell stdin stand-in that records everything written to it.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn session(config: Config) -> (SessionState, SharedBuf) {
        let buf = SharedBuf::default();
        let mut state = SessionState::new(
            PathBuf::from("/a"),
            Some(Box::new(buf.clone())),
            config,
        );
        state.enable().unwrap();
        state.ring.as_mut().unwrap().record(PathBuf::from("/b"));
        state.ring.as_mut().unwrap().record(PathBuf::from("/c"));
        (state, buf)
    }

    fn channel() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
        unbounded_channel()
    }

    #[tokio::test]
    async fn step_shows_candidate_and_arms_one_timer() {
        let (mut state, _buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        assert_eq!(state.candidate(), Some(PathBuf::from("/c")));
        assert_eq!(
            state.decoration.as_ref().unwrap().text,
            "cd ⇒ /c"
        );
        let first_gen = state.pending_confirm.as_ref().unwrap().generation;

        step(&mut state, Direction::Prev, &tx);
        assert_eq!(state.candidate(), Some(PathBuf::from("/b")));
        let pending = state.pending_confirm.as_ref().unwrap();
        assert_eq!(pending.path, PathBuf::from("/b"));
        assert!(pending.generation > first_gen);
    }

    #[tokio::test]
    async fn stale_timer_fire_is_a_no_op() {
        let (mut state, buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        let stale = state.pending_confirm.as_ref().unwrap().generation;
        step(&mut state, Direction::Prev, &tx);

        handle_timer(&mut state, stale);
        assert!(state.browse.active, "stale fire must not confirm");
        assert!(buf.contents().is_empty());

        // The current generation does confirm.
        let current = state.pending_confirm.as_ref().unwrap().generation;
        handle_timer(&mut state, current);
        assert_eq!(buf.contents(), "cd /b; echo\n");
        assert!(!state.browse.active);
    }

    #[tokio::test]
    async fn confirm_sends_one_line_and_returns_to_idle() {
        let (mut state, buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        confirm(&mut state);

        assert_eq!(buf.contents(), "cd /c; echo\n");
        assert!(!state.browse.active);
        assert!(state.decoration.is_none());
        assert!(state.pending_confirm.is_none());
        // The jump itself is a directory change.
        assert_eq!(state.cwd, PathBuf::from("/c"));
        assert_eq!(state.ring.as_ref().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn abort_sends_nothing() {
        let (mut state, buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        abort(&mut state);

        assert!(buf.contents().is_empty());
        assert!(!state.browse.active);
        assert!(state.decoration.is_none());
        assert!(state.pending_confirm.is_none());
    }

    #[tokio::test]
    async fn idle_confirm_disabled_arms_no_timer() {
        let mut config = Config::default();
        config.idle_confirm = false;
        let (mut state, buf) = session(config);
        let (tx, mut rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        assert!(state.pending_confirm.is_none());
        assert!(rx.try_recv().is_err(), "no timer task may exist");
        assert!(buf.contents().is_empty());

        // Explicit confirm still works.
        confirm(&mut state);
        assert_eq!(buf.contents(), "cd /c; echo\n");
    }

    #[tokio::test]
    async fn seeded_scenario_prev_prev_next_confirm() {
        // Ring seeded with /a; record /b, /c.
        let (mut state, buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        assert_eq!(state.candidate(), Some(PathBuf::from("/c")));
        step(&mut state, Direction::Prev, &tx);
        assert_eq!(state.candidate(), Some(PathBuf::from("/b")));
        step(&mut state, Direction::Next, &tx);
        assert_eq!(state.candidate(), Some(PathBuf::from("/c")));

        confirm(&mut state);
        assert_eq!(buf.contents(), "cd /c; echo\n");
    }

    #[tokio::test]
    async fn starting_directory_is_reachable_by_cycling() {
        let (mut state, buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        step(&mut state, Direction::Prev, &tx);
        step(&mut state, Direction::Prev, &tx);
        assert_eq!(state.candidate(), Some(PathBuf::from("/a")));

        confirm(&mut state);
        assert_eq!(buf.contents(), "cd /a; echo\n");
    }

    #[tokio::test]
    async fn confirm_without_process_reports_and_still_resets() {
        let (mut state, _buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        state.shell = None; // shell died mid-browse

        confirm(&mut state);
        assert!(state.status_message.as_deref().unwrap().contains("cd failed"));
        assert!(!state.browse.active);
        assert!(state.decoration.is_none());
        assert!(state.pending_confirm.is_none());
    }

    #[tokio::test]
    async fn typing_mid_browse_aborts_first() {
        let (mut state, buf) = session(Config::default());
        let (tx, _rx) = channel();

        step(&mut state, Direction::Prev, &tx);
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE),
            &tx,
        );

        assert!(!state.browse.active);
        assert!(state.pending_confirm.is_none());
        assert_eq!(state.input_line, "l");
        assert!(buf.contents().is_empty());

        // Next step starts from the baseline again.
        step(&mut state, Direction::Prev, &tx);
        assert_eq!(state.candidate(), Some(PathBuf::from("/c")));
    }

    #[test]
    fn dir_change_appends_to_the_ring() {
        let buf = SharedBuf::default();
        let mut state = SessionState::new(
            PathBuf::from("/a"),
            Some(Box::new(buf)),
            Config::default(),
        );
        state.enable().unwrap();

        handle_dir_changed(&mut state, PathBuf::from("/a/sub"));
        assert_eq!(state.cwd, PathBuf::from("/a/sub"));
        let ring = state.ring.as_ref().unwrap();
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.peek(0), Path::new("/a/sub"));
        assert_eq!(ring.peek(1), Path::new("/a"));
    }

    #[test]
    fn submitted_cd_line_is_forwarded_and_notified() {
        let buf = SharedBuf::default();
        let (tx, mut rx) = channel();
        let mut state = SessionState::new(
            PathBuf::from("/work"),
            Some(Box::new(buf.clone())),
            Config::default(),
        );
        state.enable().unwrap();
        state.input_line = "cd proj".into();

        submit_input_line(&mut state, &tx);
        assert_eq!(buf.contents(), "cd proj\n");
        assert!(state.input_line.is_empty());
        assert!(state.line_submitted);

        // The sniffed target arrives as a notification, not a direct call.
        match rx.try_recv() {
            Ok(AppEvent::DirChanged(p)) => assert_eq!(p, PathBuf::from("/work/proj")),
            other => panic!("expected DirChanged, got {other:?}"),
        }
        // Only the starting directory is in the ring until the event lands.
        assert_eq!(state.ring.as_ref().unwrap().len(), 1);
    }
}
