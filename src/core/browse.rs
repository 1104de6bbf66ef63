//! Cursor state for stepping through the history ring.
//!
//! The cursor is an offset from the most-recent ring entry. `None` means no
//! candidate has been picked yet in the current browse run; the first step in
//! either direction lands on offset 0 (the most recent directory), after
//! which `prev` moves toward older entries and `next` toward newer ones,
//! clamped at the ring extremes.

/// Step direction through the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward older entries (cursor + 1).
    Prev,
    /// Toward newer entries (cursor - 1).
    Next,
}

/// Ephemeral browse-run state, reset to idle after every confirm or abort.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowseState {
    /// Whether a browse run is in progress (a candidate is displayed).
    pub active: bool,
    /// Offset from the ring head; `None` until the first step of a run.
    pub cursor: Option<usize>,
    /// Set by step, cleared by every other user action. A step after a
    /// non-step action starts over from the baseline.
    pub last_action_was_step: bool,
}

impl BrowseState {
    /// Apply one step and return the new cursor offset, clamped to
    /// `[0, ring_len - 1]`. `ring_len` of 0 pins the cursor at 0 (the ring
    /// answers with its seed there).
    pub fn step(&mut self, direction: Direction, ring_len: usize) -> usize {
        if !self.last_action_was_step {
            self.cursor = None;
        }
        let max = ring_len.saturating_sub(1);
        let next = match (self.cursor, direction) {
            (None, _) => 0,
            (Some(i), Direction::Prev) => (i + 1).min(max),
            (Some(i), Direction::Next) => i.saturating_sub(1),
        };
        self.cursor = Some(next);
        self.active = true;
        self.last_action_was_step = true;
        next
    }

    /// Back to idle. Does not touch `last_action_was_step`; the key handler
    /// owns that flag.
    pub fn reset(&mut self) {
        self.active = false;
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_lands_on_most_recent() {
        let mut b = BrowseState::default();
        assert_eq!(b.step(Direction::Prev, 3), 0);
        assert!(b.active);

        let mut b = BrowseState::default();
        assert_eq!(b.step(Direction::Next, 3), 0);
    }

    #[test]
    fn uninterrupted_prev_run_is_monotonic_and_clamped() {
        let mut b = BrowseState::default();
        let offsets: Vec<usize> = (0..6).map(|_| b.step(Direction::Prev, 4)).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn next_walks_back_toward_newest_and_clamps_at_zero() {
        let mut b = BrowseState::default();
        b.step(Direction::Prev, 4);
        b.step(Direction::Prev, 4);
        b.step(Direction::Prev, 4); // at offset 2
        assert_eq!(b.step(Direction::Next, 4), 1);
        assert_eq!(b.step(Direction::Next, 4), 0);
        assert_eq!(b.step(Direction::Next, 4), 0);
    }

    #[test]
    fn non_step_action_resets_the_baseline() {
        let mut b = BrowseState::default();
        b.step(Direction::Prev, 4);
        b.step(Direction::Prev, 4);
        assert_eq!(b.cursor, Some(1));

        // Something else happened in between.
        b.reset();
        b.last_action_was_step = false;

        assert_eq!(b.step(Direction::Prev, 4), 0);
    }

    #[test]
    fn empty_ring_pins_cursor_at_zero() {
        let mut b = BrowseState::default();
        assert_eq!(b.step(Direction::Prev, 0), 0);
        assert_eq!(b.step(Direction::Prev, 0), 0);
    }
}
