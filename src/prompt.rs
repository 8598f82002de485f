//! Prompt construction and the Code/Script/Command mode machinery.
//!
//! A session runs in exactly one [`Mode`], fixed at startup. The mode decides
//! the system message, the shape of the per-task user prompt, and how the
//! execution adapter later dispatches. Rendered prompts additionally pick up
//! deterministic "render hints" when they mention graphs, charts or tables,
//! so generated code writes its artifact to a well-known file the session
//! can open afterwards.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-wide operating mode, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Generate code in the configured target language
    #[default]
    Code,
    /// Generate an OS-native script (language derived from the OS)
    Script,
    /// Generate a single terminal command
    Command,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Code => write!(f, "code"),
            Mode::Script => write!(f, "script"),
            Mode::Command => write!(f, "command"),
        }
    }
}

/// Target language tag driving both prompt phrasing and runner dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    #[value(name = "javascript", alias = "js")]
    JavaScript,
    Bash,
    #[value(name = "powershell")]
    PowerShell,
    #[value(name = "applescript")]
    AppleScript,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::JavaScript => write!(f, "javascript"),
            Language::Bash => write!(f, "bash"),
            Language::PowerShell => write!(f, "powershell"),
            Language::AppleScript => write!(f, "applescript"),
        }
    }
}

impl Language {
    /// File extension used when saving extracted code to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::Bash => "sh",
            Language::PowerShell => "ps1",
            Language::AppleScript => "scpt",
        }
    }
}

/// Script-mode language for an OS name. Unrecognized platforms fall back
/// to python, which is the most portable runner we ship.
pub fn script_language(os_name: &str) -> Language {
    match os_name.to_lowercase().as_str() {
        "macos" => Language::AppleScript,
        "linux" => Language::Bash,
        "windows" => Language::PowerShell,
        _ => Language::Python,
    }
}

/// Chat message role, serialized the way chat-completions APIs expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

/// One message in the sequence handed to the completion transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Instruction injected as an assistant turn so the model fences its output.
const WRAP_INSTRUCTION: &str =
    "Please generate code wrapped inside triple backticks known as codeblock.";

const SCRIPT_SYSTEM_MESSAGE: &str = "Please generate a well-written script that is precise, \
     easy to understand, and compatible with the current operating system.";

const COMMAND_SYSTEM_MESSAGE: &str = "Please generate a single line command that is precise, \
     easy to understand, and compatible with the current operating system.";

/// Render the per-mode user prompt for a task.
pub fn task_prompt(mode: Mode, task: &str, os_name: &str, language: Language) -> String {
    match mode {
        Mode::Code => format!(
            "Generate the code in {language} language for this task '{task}' \
             for Operating System: {os_name}."
        ),
        Mode::Script => {
            let script_type = match os_name.to_lowercase().as_str() {
                "macos" => "Apple script",
                "linux" => "Bash Shell script",
                "windows" => "Powershell script",
                _ => "script",
            };
            format!(
                "Generate {script_type} for this prompt and make this script easy to read \
                 and understand for this task '{task}' for Operating System is {os_name}."
            )
        }
        Mode::Command => format!(
            "Generate the single terminal command for this task '{task}' \
             for Operating System is {os_name}."
        ),
    }
}

/// Build the {system, assistant, user} message sequence for one task.
///
/// `system_message` is the configured Code-mode persona; Script and Command
/// modes carry fixed system messages of their own.
pub fn build_messages(mode: Mode, system_message: &str, user_prompt: &str) -> Vec<Message> {
    let system = match mode {
        Mode::Code => system_message,
        Mode::Script => SCRIPT_SYSTEM_MESSAGE,
        Mode::Command => COMMAND_SYSTEM_MESSAGE,
    };

    vec![
        Message::new(Role::System, system),
        Message::new(Role::Assistant, WRAP_INSTRUCTION),
        Message::new(Role::User, user_prompt),
    ]
}

/// One render-hint rule: keyword substrings mapped to per-language directives.
struct RenderHint {
    keywords: &'static [&'static str],
    python: &'static str,
    javascript: &'static str,
}

/// Keyword-to-directive table for generated artifacts.
///
/// Matching is plain case-insensitive substring matching on the rendered
/// prompt, so a task containing "telegraph" also matches "graph". That is
/// the documented behavior, not an oversight.
const RENDER_HINTS: &[RenderHint] = &[
    RenderHint {
        keywords: &["graph"],
        python: "using Python use Matplotlib save the graph in file called 'graph.png'",
        javascript: "using JavaScript use Chart.js save the graph in file called 'graph.png'",
    },
    RenderHint {
        keywords: &["chart", "plot"],
        python: "using Python use Plotly save the chart in file called 'chart.png'",
        javascript: "using JavaScript use Chart.js save the chart in file called 'chart.png'",
    },
    RenderHint {
        keywords: &["table"],
        python: "using Python use Pandas save the table in file called 'table.md'",
        javascript: "using JavaScript use DataTables save the table in file called 'table.html'",
    },
];

/// Append artifact directives to a rendered prompt based on its keywords.
///
/// Only python and javascript tasks get directives; other languages pass
/// through unchanged.
pub fn augment_prompt(prompt: &str, language: Language) -> String {
    let lowered = prompt.to_lowercase();
    let mut augmented = prompt.to_string();

    for hint in RENDER_HINTS {
        if hint.keywords.iter().any(|kw| lowered.contains(kw)) {
            let directive = match language {
                Language::Python => hint.python,
                Language::JavaScript => hint.javascript,
                _ => continue,
            };
            augmented.push('\n');
            augmented.push_str(directive);
        }
    }

    augmented
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(format!("{}", Mode::Code), "code");
        assert_eq!(format!("{}", Mode::Script), "script");
        assert_eq!(format!("{}", Mode::Command), "command");
    }

    #[test]
    fn test_mode_default_is_code() {
        assert_eq!(Mode::default(), Mode::Code);
    }

    #[test]
    fn test_language_display() {
        assert_eq!(format!("{}", Language::Python), "python");
        assert_eq!(format!("{}", Language::JavaScript), "javascript");
        assert_eq!(format!("{}", Language::PowerShell), "powershell");
    }

    #[test]
    fn test_script_language_mapping() {
        assert_eq!(script_language("macos"), Language::AppleScript);
        assert_eq!(script_language("linux"), Language::Bash);
        assert_eq!(script_language("windows"), Language::PowerShell);
        assert_eq!(script_language("freebsd"), Language::Python);
        assert_eq!(script_language("LINUX"), Language::Bash);
    }

    #[test]
    fn test_task_prompt_code_mode() {
        let prompt = task_prompt(Mode::Code, "reverse a string", "linux", Language::Python);
        assert!(prompt.contains("python"));
        assert!(prompt.contains("reverse a string"));
        assert!(prompt.contains("linux"));
    }

    #[test]
    fn test_task_prompt_script_mode_names_script_type() {
        let prompt = task_prompt(Mode::Script, "list files", "macos", Language::AppleScript);
        assert!(prompt.contains("Apple script"));
        assert!(prompt.contains("list files"));
    }

    #[test]
    fn test_task_prompt_command_mode() {
        let prompt = task_prompt(Mode::Command, "show disk usage", "linux", Language::Bash);
        assert!(prompt.contains("single terminal command"));
        assert!(prompt.contains("show disk usage"));
    }

    #[test]
    fn test_build_messages_order_and_roles() {
        let messages = build_messages(Mode::Code, "You are a coder.", "do the thing");
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "You are a coder.");
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(messages[1].content.contains("triple backticks"));
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(messages[2].content, "do the thing");
    }

    #[test]
    fn test_build_messages_script_mode_ignores_persona() {
        let messages = build_messages(Mode::Script, "persona text", "task");
        assert!(messages[0].content.contains("well-written script"));
        assert!(!messages[0].content.contains("persona text"));
    }

    #[test]
    fn test_augment_graph_python() {
        let out = augment_prompt("draw a graph of sales", Language::Python);
        assert!(out.contains("Matplotlib"));
        assert!(out.contains("graph.png"));
    }

    #[test]
    fn test_augment_plot_maps_to_chart() {
        let out = augment_prompt("plot sine wave", Language::Python);
        assert!(out.contains("Plotly"));
        assert!(out.contains("chart.png"));
    }

    #[test]
    fn test_augment_table_javascript() {
        let out = augment_prompt("make a table of results", Language::JavaScript);
        assert!(out.contains("DataTables"));
        assert!(out.contains("table.html"));
    }

    #[test]
    fn test_augment_substring_matching_is_literal() {
        // "telegraph" contains "graph"; documented substring semantics.
        let out = augment_prompt("history of the telegraph", Language::Python);
        assert!(out.contains("graph.png"));
    }

    #[test]
    fn test_augment_other_language_unchanged() {
        let prompt = "plot sine wave";
        assert_eq!(augment_prompt(prompt, Language::Bash), prompt);
    }

    #[test]
    fn test_augment_no_keyword_unchanged() {
        let prompt = "reverse a linked list";
        assert_eq!(augment_prompt(prompt, Language::Python), prompt);
    }

    #[test]
    fn test_augment_case_insensitive() {
        let out = augment_prompt("draw a GRAPH", Language::Python);
        assert!(out.contains("graph.png"));
    }

    #[test]
    fn test_augment_multiple_hints_stack() {
        let out = augment_prompt("graph and table please", Language::Python);
        assert!(out.contains("graph.png"));
        assert!(out.contains("table.md"));
    }
}
