//! Command-line interface definitions for `genie`.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::DEFAULT_MODEL;
use crate::prompt::{Language, Mode};

/// Conversational code generation shell
#[derive(Parser, Debug)]
#[command(
    name = "genie",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GENIE_GIT_SHA"), ")"),
    about,
    long_about = None
)]
#[command(
    after_help = "EXAMPLES:\n    genie --display-code\n    genie --mode script --exec\n    genie --model codellama/CodeLlama-7b-Instruct-hf --lang python"
)]
pub struct Cli {
    /// Session mode: generate code, an OS-native script, or a single command
    #[arg(long, short = 'M', value_enum, default_value_t = Mode::Code)]
    pub mode: Mode,

    /// Model identifier; ids containing "gpt" use the OpenAI-compatible
    /// backend, everything else goes to Hugging Face hosted inference
    #[arg(long, short = 'm', default_value = DEFAULT_MODEL, value_name = "ID")]
    pub model: String,

    /// Target language for Code mode (Script mode derives it from the OS)
    #[arg(long, short = 'l', value_enum, default_value_t = Language::Python)]
    pub lang: Language,

    /// Save extracted code to a timestamped file before execution
    #[arg(long, short = 's')]
    pub save_code: bool,

    /// Execute extracted code without asking for confirmation
    #[arg(long, short = 'e')]
    pub exec: bool,

    /// Display extracted code before the execution gate
    #[arg(long, short = 'd')]
    pub display_code: bool,

    /// Path to the Code-mode system message file
    #[arg(long, default_value = "system/system_message.txt", value_name = "PATH")]
    pub system_message: PathBuf,

    /// Directory for per-session history files
    #[arg(long, default_value = "history", value_name = "PATH")]
    pub history_dir: PathBuf,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["genie"]);
        assert_eq!(cli.mode, Mode::Code);
        assert_eq!(cli.model, DEFAULT_MODEL);
        assert_eq!(cli.lang, Language::Python);
        assert!(!cli.save_code);
        assert!(!cli.exec);
        assert!(!cli.display_code);
    }

    #[test]
    fn test_cli_parses_mode() {
        let cli = Cli::parse_from(["genie", "--mode", "script"]);
        assert_eq!(cli.mode, Mode::Script);
        let cli = Cli::parse_from(["genie", "--mode", "command"]);
        assert_eq!(cli.mode, Mode::Command);
    }

    #[test]
    fn test_cli_parses_model() {
        let cli = Cli::parse_from(["genie", "--model", "codellama/CodeLlama-7b-hf"]);
        assert_eq!(cli.model, "codellama/CodeLlama-7b-hf");
    }

    #[test]
    fn test_cli_parses_language() {
        let cli = Cli::parse_from(["genie", "--lang", "javascript"]);
        assert_eq!(cli.lang, Language::JavaScript);
    }

    #[test]
    fn test_cli_language_alias_js() {
        let cli = Cli::parse_from(["genie", "--lang", "js"]);
        assert_eq!(cli.lang, Language::JavaScript);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["genie", "--save-code", "--exec", "--display-code"]);
        assert!(cli.save_code);
        assert!(cli.exec);
        assert!(cli.display_code);
    }

    #[test]
    fn test_cli_parses_short_flags() {
        let cli = Cli::parse_from(["genie", "-s", "-e", "-d"]);
        assert!(cli.save_code);
        assert!(cli.exec);
        assert!(cli.display_code);
    }

    #[test]
    fn test_cli_parses_paths() {
        let cli = Cli::parse_from([
            "genie",
            "--system-message",
            "/etc/genie/persona.txt",
            "--history-dir",
            "/tmp/sessions",
        ]);
        assert_eq!(cli.system_message, PathBuf::from("/etc/genie/persona.txt"));
        assert_eq!(cli.history_dir, PathBuf::from("/tmp/sessions"));
    }

    #[test]
    fn test_cli_parses_completions() {
        let cli = Cli::parse_from(["genie", "--completions", "bash"]);
        assert_eq!(cli.completions, Some(Shell::Bash));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["genie", "--mode", "wizard"]).is_err());
    }
}
