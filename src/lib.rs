//! Genie - conversational code generation shell
//!
//! This library provides the core functionality for the `genie` CLI tool:
//! prompt construction, fenced code extraction, execution dispatch, and
//! missing-package recovery, tied together by an interactive session loop.

pub mod cli;
pub mod config;
pub mod exec;
pub mod extract;
pub mod history;
pub mod output;
pub mod prompt;
pub mod providers;
pub mod recovery;
pub mod resources;
pub mod session;

// Re-export commonly used types
pub use cli::Cli;
pub use config::ModelConfig;
pub use exec::ExecOutput;
pub use history::{History, Turn};
pub use prompt::{Language, Message, Mode, Role};
pub use session::{Session, SessionFlags};
