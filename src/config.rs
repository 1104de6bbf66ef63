//! User configuration — key bindings and browse settings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/dircycle/config.toml` (default `~/.config/dircycle/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// The logical commands a key press can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Step toward an older directory in the ring.
    StepPrev,
    /// Step toward a newer directory in the ring.
    StepNext,
    /// Jump to the displayed candidate.
    Confirm,
    /// Leave browsing without jumping.
    Abort,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used when serialising the config).
    pub const ALL: &[Action] = &[
        Action::StepPrev,
        Action::StepNext,
        Action::Confirm,
        Action::Abort,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::StepPrev => "step_prev",
            Action::StepNext => "step_next",
            Action::Confirm => "confirm",
            Action::Abort => "abort",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "step_prev" => Some(Action::StepPrev),
            "step_next" => Some(Action::StepNext),
            "confirm" => Some(Action::Confirm),
            "abort" => Some(Action::Abort),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT are
    /// compared; platform-specific modifiers like SUPER are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Config-file / display form, e.g. `"Alt+Up"`, `"Ctrl+d"`, `"Esc"`.
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Alt+Up"`, `"Ctrl+d"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            s if s.len() == 1 => KeyCode::Char(s.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — key bindings and browse settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Ring size; older directories are evicted beyond this.
    pub history_capacity: usize,
    /// Whether a displayed candidate auto-confirms after the idle delay.
    pub idle_confirm: bool,
    /// Idle delay before auto-confirm, in seconds.
    pub idle_confirm_delay_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            history_capacity: 128,
            idle_confirm: true,
            idle_confirm_delay_secs: 1.0,
        }
    }
}

impl Config {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let alt = KeyModifiers::ALT;
        let mut m = HashMap::new();

        m.insert(StepPrev, vec![KeyBind::new(Up, alt), KeyBind::new(Char('p'), alt)]);
        m.insert(StepNext, vec![KeyBind::new(Down, alt), KeyBind::new(Char('n'), alt)]);
        m.insert(Confirm, vec![KeyBind::new(Enter, n)]);
        m.insert(Abort, vec![KeyBind::new(Esc, n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), KeyModifiers::CONTROL)]);

        m
    }

    /// Find the action matching a key event. When multiple bindings match,
    /// the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Idle delay as a [`Duration`].
    pub fn idle_delay(&self) -> Duration {
        Duration::from_secs_f64(self.idle_confirm_delay_secs)
    }

    /// Status-line hint built from the current bindings.
    pub fn hint(&self) -> String {
        let first = |a: Action| {
            self.bindings
                .get(&a)
                .and_then(|b| b.first())
                .map(|b| b.display())
                .unwrap_or_else(|| "?".into())
        };
        format!(
            "{}: older dir | {}: newer dir | {}: jump | {}: cancel",
            first(Action::StepPrev),
            first(Action::StepNext),
            first(Action::Confirm),
            first(Action::Abort),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk. On first run the defaults are written out so
    /// there is a file to edit.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => {
                let config = Self::default();
                if let Err(e) = config.save() {
                    tracing::debug!("could not write default config: {e}");
                }
                config
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "history_capacity" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.history_capacity = v.clamp(1, 4096);
                    }
                    continue;
                }
                "idle_confirm" => {
                    config.idle_confirm = value == "true";
                    continue;
                }
                "idle_confirm_delay_secs" => {
                    if let Ok(v) = value.parse::<f64>() {
                        // Keep this bounded for predictable behavior.
                        config.idle_confirm_delay_secs = v.clamp(0.1, 60.0);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# dircycle configuration".to_string(),
            String::new(),
            "# Browse settings".to_string(),
            format!("history_capacity = {}", self.history_capacity),
            format!("idle_confirm = {}", self.idle_confirm),
            format!("idle_confirm_delay_secs = {}", self.idle_confirm_delay_secs),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.display()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/dircycle/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("dircycle").join("config.toml")
}
