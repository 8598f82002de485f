//! Execution adapter for generated code, scripts and commands.
//!
//! Dispatch is strictly by the active [`Mode`]: Code runs a language-specific
//! runner, Script runs the OS-native script runner, Command runs a single
//! shell command. Every failure path, including a runner that cannot be
//! spawned at all, folds into the `stderr` side of [`ExecOutput`] so the
//! session loop never crashes on an execution failure.

use std::process::Command;
use tracing::{debug, warn};

use crate::prompt::{script_language, Language, Mode};

/// Outcome of one execution attempt.
///
/// Carries at most one of stdout/stderr; both absent means the user declined
/// to execute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl ExecOutput {
    /// Outcome for a turn where execution was declined.
    pub fn skipped() -> Self {
        Self::default()
    }

    fn from_error(message: String) -> Self {
        Self {
            stdout: None,
            stderr: Some(message),
        }
    }
}

/// Name of the current platform, normalized to the tags the prompt builder
/// and script-language mapping understand.
pub fn detect_os() -> &'static str {
    // std::env::consts::OS already uses "macos"/"linux"/"windows" on the
    // platforms we special-case; everything else passes through and takes
    // the python fallback.
    std::env::consts::OS
}

/// Interpreter binary and flag used to run source text in a language.
fn runner_invocation(language: Language, os_name: &str) -> (&'static str, &'static str) {
    match language {
        Language::Python => {
            if os_name.eq_ignore_ascii_case("windows") {
                ("python", "-c")
            } else {
                ("python3", "-c")
            }
        }
        Language::JavaScript => ("node", "-e"),
        Language::Bash => ("bash", "-c"),
        Language::PowerShell => ("powershell", "-Command"),
        Language::AppleScript => ("osascript", "-e"),
    }
}

/// Shell invocation for Command mode.
fn shell_invocation(os_name: &str) -> (&'static str, &'static str) {
    if os_name.eq_ignore_ascii_case("windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

/// Run extracted text under the runtime the mode calls for.
pub fn execute(mode: Mode, code: &str, os_name: &str, language: Language) -> ExecOutput {
    let (program, flag) = match mode {
        Mode::Code => runner_invocation(language, os_name),
        Mode::Script => runner_invocation(script_language(os_name), os_name),
        Mode::Command => shell_invocation(os_name),
    };

    debug!(%mode, program, "executing extracted code");

    let output = match Command::new(program).arg(flag).arg(code).output() {
        Ok(output) => output,
        Err(err) => {
            warn!(program, error = %err, "failed to spawn runner");
            return ExecOutput::from_error(format!("failed to run {program}: {err}"));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !stderr.trim().is_empty() {
        ExecOutput {
            stdout: None,
            stderr: Some(stderr),
        }
    } else if !output.status.success() {
        // Failed without writing to stderr; surface the status so the
        // failure is still observable.
        ExecOutput::from_error(format!("{program} exited with {}", output.status))
    } else if stdout.trim().is_empty() {
        ExecOutput::skipped()
    } else {
        ExecOutput {
            stdout: Some(stdout),
            stderr: None,
        }
    }
}
