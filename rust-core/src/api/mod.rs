//! Public entry points for callers outside the library.

pub mod cli;

pub use cli::{exit_code, run, Cli};
