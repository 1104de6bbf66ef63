//! Crude directory tracking over the input lines we forward to the shell.
//!
//! The wrapper line-buffers what the user types, so a `cd` typed at the
//! prompt passes through here before the shell sees it. We derive the target
//! lexically — no prompt parsing and no check that the shell's `cd` actually
//! succeeded. A `cd` performed inside a script or alias is invisible.

use std::path::{Component, Path, PathBuf};

/// If `line` is a `cd` command, return the directory it targets, resolved
/// against `cwd` (and `home` for `~` / bare `cd`). Returns `None` for
/// anything we cannot derive lexically, including `cd -`.
pub fn cd_target(line: &str, cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let trimmed = line.trim();
    let rest = match trimmed.strip_prefix("cd") {
        Some(r) if r.is_empty() => return home.map(Path::to_path_buf),
        Some(r) if r.starts_with(char::is_whitespace) => r.trim(),
        _ => return None,
    };

    // Only the single-argument form is tracked.
    if rest.contains(char::is_whitespace) || rest == "-" {
        return None;
    }

    let expanded = if let Some(suffix) = rest.strip_prefix('~') {
        // `~user` resolves against another user's home; not derivable here.
        if !suffix.is_empty() && !suffix.starts_with('/') {
            return None;
        }
        let home = home?;
        home.join(suffix.trim_start_matches('/'))
    } else if rest.starts_with('/') {
        PathBuf::from(rest)
    } else {
        cwd.join(rest)
    };

    Some(normalize(&expanded))
}

/// Lexical `.`/`..` resolution. Symlinks are not consulted.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // At the root, `..` is a no-op; in a relative path it is kept.
                if !out.pop() && out.as_os_str().is_empty() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
