//! Everything that touches the wrapped shell process: spawning it, writing
//! the `cd` line to its stdin, and sniffing directory changes from the input
//! we forward to it.

pub mod proc;
pub mod sender;
pub mod track;
