//! The interactive session loop.
//!
//! One iteration per user task: read, build prompt, complete, extract,
//! optionally save and execute, recover missing packages, open generated
//! artifacts, record the turn. Errors local to a turn (absent code,
//! execution failure, install failure, opener failure) are folded into the
//! turn or the log; transport and response-shape errors propagate and end
//! the session.

use anyhow::{Context, Result};
use chrono::Local;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::ModelConfig;
use crate::exec::{execute, ExecOutput};
use crate::extract::extract_code;
use crate::history::{History, Turn};
use crate::output;
use crate::prompt::{augment_prompt, build_messages, task_prompt, Language, Mode};
use crate::providers::{CompletionProvider, GenerationParams};
use crate::recovery::{install_package, is_missing_dependency, resolve_package};
use crate::resources::{clean_stale_resources, open_resource, RESOURCE_FILES};

/// Boolean switches resolved from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionFlags {
    /// Persist extracted code to a timestamped file before execution
    pub save_code: bool,
    /// Execute without the confirmation prompt
    pub auto_execute: bool,
    /// Echo extracted code before the execution gate
    pub display_code: bool,
}

/// One interactive session: fixed mode, language, model and config, an
/// append-only history, and a single blocking thread of control.
pub struct Session {
    mode: Mode,
    language: Language,
    os_name: String,
    model: String,
    config: ModelConfig,
    system_message: String,
    flags: SessionFlags,
    provider: Box<dyn CompletionProvider>,
    history: History,
    runtime: tokio::runtime::Runtime,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mode: Mode,
        language: Language,
        os_name: String,
        model: String,
        config: ModelConfig,
        system_message: String,
        flags: SessionFlags,
        provider: Box<dyn CompletionProvider>,
        history: History,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
        Ok(Self {
            mode,
            language,
            os_name,
            model,
            config,
            system_message,
            flags,
            provider,
            history,
            runtime,
        })
    }

    /// Run the read-eval loop until the user exits.
    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().context("failed to initialize line editor")?;
        let readline_history = readline_history_path();
        if let Some(path) = &readline_history {
            let _ = editor.load_history(path);
        }

        output::display_banner(
            &self.os_name,
            &self.language.to_string(),
            &self.mode.to_string(),
            self.provider.model_name(),
        );

        loop {
            let line = match editor.readline("> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err).context("failed to read input"),
            };

            let task = line.trim();
            if task.is_empty() {
                continue;
            }
            if task.eq_ignore_ascii_case("exit") || task.eq_ignore_ascii_case("quit") {
                break;
            }
            let _ = editor.add_history_entry(task);

            if let Err(err) = self.run_turn(task) {
                // No partial-turn recovery: a broken prompt/response cycle
                // ends the whole session.
                error!(error = %err, "session turn failed");
                return Err(err);
            }
        }

        if let Some(path) = &readline_history {
            let _ = editor.save_history(path);
        }
        info!(turns = self.history.len(), "session ended");
        Ok(())
    }

    /// One task-to-outcome iteration.
    pub fn run_turn(&mut self, task: &str) -> Result<()> {
        clean_stale_resources();

        let prompt = task_prompt(self.mode, task, &self.os_name, self.language);
        let prompt = augment_prompt(&prompt, self.language);
        info!(%prompt, "rendered prompt");

        let messages = build_messages(self.mode, &self.system_message, &prompt);
        let params = GenerationParams::from(&self.config);
        let raw = self
            .runtime
            .block_on(self.provider.complete(&messages, &params))?;

        let code = extract_code(
            &raw,
            &self.config.start_sep,
            &self.config.end_sep,
            self.config.skip_first_line,
        );

        let mut outcome = ExecOutput::skipped();
        if let Some(code) = &code {
            if self.flags.display_code {
                output::display_code(code);
            }

            if self.flags.save_code {
                if let Err(err) = self.save_code(code) {
                    warn!(error = %err, "failed to save generated code");
                    output::display_error(&format!("could not save code: {err}"));
                }
            }

            outcome = self.execute_gated(code);
            if let Some(stdout) = &outcome.stdout {
                info!(language = %self.language, "code executed successfully");
                output::display_code(stdout);
            } else if let Some(stderr) = &outcome.stderr {
                output::display_error(stderr);
                self.attempt_recovery(stderr);
            }

            for file in RESOURCE_FILES {
                if let Err(err) = open_resource(file, &self.os_name) {
                    warn!(file, error = %err, "failed to open resource file");
                    output::display_message(&format!("Error in opening files: {err}"));
                }
            }
        } else {
            info!("no code block found in model output");
        }

        self.history.record(Turn {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            task: task.to_string(),
            mode: self.mode,
            os_name: self.os_name.clone(),
            language: self.language,
            prompt,
            model: self.model.clone(),
            raw_output: raw,
            code,
            stdout: outcome.stdout,
            stderr: outcome.stderr,
        });

        Ok(())
    }

    /// Gate execution on confirmation unless auto-execute is set.
    fn execute_gated(&self, code: &str) -> ExecOutput {
        if self.flags.auto_execute || confirm_execution() {
            execute(self.mode, code, &self.os_name, self.language)
        } else {
            ExecOutput::skipped()
        }
    }

    /// Classify an execution error and install the missing package for the
    /// next task. Runs at most once per turn; the failed execution is not
    /// retried.
    fn attempt_recovery(&self, stderr: &str) {
        if !is_missing_dependency(stderr) {
            return;
        }
        let Some(package) = resolve_package(stderr, self.language) else {
            warn!("dependency error did not yield an installable package name");
            return;
        };

        output::display_message(&format!("Installing missing package **{package}**"));
        match install_package(&package, self.language) {
            Ok(()) => {
                output::display_message(&format!(
                    "Installed **{package}**; run the task again to use it."
                ));
            }
            Err(err) => output::display_error(&format!("install failed: {err}")),
        }
    }

    fn save_code(&self, code: &str) -> Result<()> {
        let dir = PathBuf::from("output");
        std::fs::create_dir_all(&dir).context("failed to create output directory")?;
        let stamp = Local::now().format("%H-%M-%S");
        let path = dir.join(format!(
            "code_generated_{stamp}.{}",
            self.language.extension()
        ));
        std::fs::write(&path, code)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "saved generated code");
        Ok(())
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

/// Blocking Y/N confirmation on stdin.
fn confirm_execution() -> bool {
    print!("Execute the code? (Y/N): ");
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}

fn readline_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".genie_history"))
}
