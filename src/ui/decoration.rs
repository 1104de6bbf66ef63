//! The inline candidate decoration and the input-row drawing.
//!
//! The decoration is a plain value owned by the session; nothing here keeps
//! terminal state. While a decoration exists it visually replaces the input
//! row; once it is dropped the row shows the prompt and the pending input
//! again.

use std::io::Write;
use std::path::Path;

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};

const PROMPT: &str = "❯ ";

/// An inline, non-input visual shown in place of the input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Column where the rendered text starts.
    pub start_col: u16,
    /// Column just past the rendered text.
    pub end_col: u16,
    pub text: String,
}

impl Decoration {
    /// Decoration for a candidate directory, e.g. `cd ⇒ /home/user/src`.
    pub fn for_candidate(path: &Path) -> Self {
        let text = format!("cd ⇒ {}", path.display());
        let end = text.chars().count().min(u16::MAX as usize) as u16;
        Self {
            start_col: 0,
            end_col: end,
            text,
        }
    }
}

/// Redraw the input row: the decoration when browsing, otherwise the prompt
/// and whatever the user has typed so far.
pub fn draw_input_row(
    out: &mut impl Write,
    decoration: Option<&Decoration>,
    input_line: &str,
) -> std::io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    match decoration {
        Some(dec) => {
            queue!(
                out,
                MoveToColumn(dec.start_col),
                SetAttribute(Attribute::Bold),
                Print(&dec.text),
                SetAttribute(Attribute::Reset),
                MoveToColumn(dec.end_col),
            )?;
        }
        None => {
            queue!(out, Print(PROMPT), Print(input_line))?;
        }
    }
    out.flush()
}

/// Wipe the input row. Used at teardown so no decoration or half-typed
/// input is left on screen.
pub fn clear_input_row(out: &mut impl Write) -> std::io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    out.flush()
}

/// Print a transient status line above the input row.
pub fn draw_status_line(out: &mut impl Write, message: &str) -> std::io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        SetAttribute(Attribute::Dim),
        Print(message),
        SetAttribute(Attribute::Reset),
        Print("\r\n"),
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_the_input_row_emits_a_line_clear() {
        let mut out = Vec::new();
        clear_input_row(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        // CSI 2K clears the whole line; nothing drawn before exit survives.
        assert!(written.contains("\u{1b}[2K"));
    }

    #[test]
    fn candidate_decoration_spans_its_text() {
        let dec = Decoration::for_candidate(Path::new("/tmp/x"));
        assert_eq!(dec.text, "cd ⇒ /tmp/x");
        assert_eq!(dec.start_col, 0);
        assert_eq!(dec.end_col as usize, dec.text.chars().count());
    }
}
