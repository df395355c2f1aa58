//! Line-oriented shell over the tracker: interactive via rustyline, or scripted from stdin.

pub mod commands;
pub mod context;
pub mod error;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub mod shell;
pub mod table;

pub use context::{CliMode, ShellContext};
pub use error::{CliError, CommandError};
pub use shell::run_cli;
