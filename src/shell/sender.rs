//! The single outbound wire: one `cd` line per confirmed candidate.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("no shell process attached")]
    NoProcess,
    #[error("failed to write to shell stdin: {0}")]
    Io(#[from] std::io::Error),
}

/// Write exactly one line, `cd <path>; echo`, to the shell's stdin and flush.
///
/// The trailing `echo` forces a fresh prompt after the directory change.
/// No quoting and no verification that the `cd` succeeded.
pub fn send_cd(writer: &mut dyn Write, path: &Path) -> Result<(), SendError> {
    writeln!(writer, "cd {}; echo", path.display())?;
    writer.flush()?;
    Ok(())
}
