//! Cycle inline through your shell's directory history.
//!
//! `dircycle` wraps your shell: type as usual, press Alt+Up / Alt+Down to
//! cycle through previously-visited directories shown inline on the input
//! row, and Enter (or just pause) to jump there.

mod app;
mod config;
mod core;
mod shell;
mod ui;

use std::io::{self, stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::SessionState,
};
use crate::config::Config;
use crate::shell::proc::ShellProc;
use crate::ui::decoration;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Inline shell directory-history cycler")]
struct Cli {
    /// Shell to wrap (defaults to `$SHELL`, then `/bin/sh`).
    #[arg(long)]
    shell: Option<String>,

    /// Directory-history capacity.
    #[arg(long)]
    capacity: Option<usize>,

    /// Idle auto-confirm delay in seconds.
    #[arg(long)]
    idle_delay: Option<f64>,

    /// Disable idle auto-confirm; jumps require an explicit key.
    #[arg(long)]
    no_idle_confirm: bool,
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(capacity) = cli.capacity {
        config.history_capacity = capacity.clamp(1, 4096);
    }
    if let Some(delay) = cli.idle_delay {
        config.idle_confirm_delay_secs = delay.clamp(0.1, 60.0);
    }
    if cli.no_idle_confirm {
        config.idle_confirm = false;
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load();
    apply_cli_overrides(&mut config, &cli);

    // ── wrap the shell ────────────────────────────────────────
    let program = cli
        .shell
        .clone()
        .or_else(|| std::env::var("SHELL").ok())
        .unwrap_or_else(|| "/bin/sh".into());
    let mut proc = ShellProc::spawn(&program)?;
    let shell_stdin = proc
        .take_stdin()
        .map(|stdin| Box::new(stdin) as Box<dyn Write + Send>);

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut state = SessionState::new(cwd, shell_stdin, config);
    state
        .enable()
        .context("directory cycling requires an attached shell")?;

    // ── event plumbing ────────────────────────────────────────
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<AppEvent>();
    spawn_event_reader(tx.clone(), Duration::from_millis(100));
    proc.watch_exit(tx.clone());

    // ── event loop ────────────────────────────────────────────
    enable_raw_mode()?;
    let mut out = stdout();
    decoration::draw_status_line(&mut out, &state.config.hint())?;

    loop {
        if let Some(message) = state.status_message.take() {
            decoration::draw_status_line(&mut out, &message)?;
        }
        decoration::draw_input_row(&mut out, state.decoration.as_ref(), &state.input_line)?;

        let Some(event) = rx.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(key) => handler::handle_key(&mut state, key, &tx),
            AppEvent::DirChanged(path) => handler::handle_dir_changed(&mut state, path),
            AppEvent::ConfirmTimer { generation } => handler::handle_timer(&mut state, generation),
            AppEvent::ShellExited => {
                state.shell = None;
                state.should_quit = true;
            }
        }

        if state.line_submitted {
            state.line_submitted = false;
            // Move past the submitted row so shell output starts cleanly.
            write!(out, "\r\n")?;
            out.flush()?;
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.disable();
    decoration::clear_input_row(&mut out)?;
    disable_raw_mode()?;

    Ok(())
}
