//! Terminal output formatting.

use colored::Colorize;

/// Print a block of code with a dimmed frame.
pub fn display_code(code: &str) {
    println!("{}", "```".dimmed());
    for line in code.lines() {
        println!("{}", line.cyan());
    }
    println!("{}", "```".dimmed());
}

/// Print a short status or error message, rendering `**bold**` spans and
/// wrapping long lines.
pub fn display_message(text: &str) {
    for line in textwrap::wrap(&render_bold(text), 96) {
        println!("{line}");
    }
}

/// Print an inline error the way execution and resource failures are
/// surfaced to the user.
pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message.trim_end());
}

/// Session banner shown once at startup.
pub fn display_banner(os_name: &str, language: &str, mode: &str, model: &str) {
    println!(
        "{} OS: '{}', Language: '{}', Mode: '{}', Model: '{}'",
        "▸".magenta(),
        os_name.bright_white(),
        language.bright_white(),
        mode.bright_white(),
        model.bright_white()
    );
}

fn render_bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("**") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) => {
                out.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("**");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bold_replaces_markers() {
        colored::control::set_override(false);
        let out = render_bold("use **pip** to install");
        assert_eq!(out, "use pip to install");
    }

    #[test]
    fn test_render_bold_unbalanced_markers_kept() {
        colored::control::set_override(false);
        let out = render_bold("a ** b");
        assert_eq!(out, "a ** b");
    }

    #[test]
    fn test_render_bold_plain_text_untouched() {
        let out = render_bold("nothing special");
        assert_eq!(out, "nothing special");
    }
}
