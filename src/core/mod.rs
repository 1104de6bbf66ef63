//! Pure data structures — no I/O, no terminal, no process handles.

pub mod browse;
pub mod ring;
