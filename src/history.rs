//! Session history: one append-only record per completed turn.
//!
//! Turns are appended in task-submission order regardless of execution
//! outcome, both in memory and to a JSON-lines file keyed by session start
//! time. A persistence failure loses durability for that turn only; the
//! in-memory history still grows and the session continues.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::prompt::{Language, Mode};

/// One task-to-outcome record.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub timestamp: String,
    pub task: String,
    pub mode: Mode,
    pub os_name: String,
    pub language: Language,
    pub prompt: String,
    pub model: String,
    pub raw_output: String,
    pub code: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

/// Append-only session history backed by a JSON-lines file.
pub struct History {
    turns: Vec<Turn>,
    path: PathBuf,
}

impl History {
    /// Create a history writing to `dir/session_<start-time>.jsonl`.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create history directory {}", dir.display()))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("session_{stamp}.jsonl"));
        Ok(Self {
            turns: Vec::new(),
            path,
        })
    }

    /// Append a turn. The in-memory record always grows; a write failure
    /// is logged and swallowed.
    pub fn record(&mut self, turn: Turn) {
        if let Err(err) = self.persist(&turn) {
            warn!(path = %self.path.display(), error = %err, "failed to persist turn");
        }
        self.turns.push(turn);
    }

    fn persist(&self, turn: &Turn) -> Result<()> {
        let line = serde_json::to_string(turn).context("failed to serialize turn")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
