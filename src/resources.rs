//! Generated resource files: cleanup before a turn, open after it.
//!
//! Tasks that mention graphs, charts or tables are steered toward writing
//! a well-known artifact file. Stale artifacts from earlier turns are
//! removed before each generation so a freshly opened file is always the
//! one this turn produced.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// Artifact files the render hints steer generated code toward.
pub const RESOURCE_FILES: &[&str] = &["graph.png", "chart.png", "table.md"];

/// Remove leftover artifact files from prior turns.
///
/// Idempotent: absent files are a silent no-op.
pub fn clean_stale_resources() {
    clean_stale_in(Path::new("."));
}

fn clean_stale_in(dir: &Path) {
    for file in RESOURCE_FILES {
        let path = dir.join(file);
        if !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(file, "removed stale resource file"),
            Err(err) => warn!(file, error = %err, "failed to remove stale resource file"),
        }
    }
}

/// The platform default-handler invocation for a file, or `None` when the
/// file does not exist. Pure decision logic; the spawn happens in
/// [`open_resource`].
fn opener_command(path: &Path, os_name: &str) -> Option<(&'static str, Vec<String>)> {
    if !path.is_file() {
        return None;
    }
    let file = path.to_string_lossy().into_owned();
    Some(match os_name.to_lowercase().as_str() {
        "windows" => (
            "cmd",
            vec!["/C".to_string(), "start".to_string(), String::new(), file],
        ),
        "macos" => ("open", vec![file]),
        _ => ("xdg-open", vec![file]),
    })
}

/// Open a file with the platform default handler.
///
/// Returns an error for the caller to surface; never fatal to the session.
pub fn open_resource(filename: &str, os_name: &str) -> Result<()> {
    let Some((program, args)) = opener_command(Path::new(filename), os_name) else {
        return Ok(());
    };

    let status = Command::new(program)
        .args(&args)
        .status()
        .with_context(|| format!("failed to open {filename}"))?;

    if status.success() {
        info!(filename, "opened resource file");
        Ok(())
    } else {
        anyhow::bail!("opener for {filename} exited with {status}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cleanup_with_no_files_is_a_noop() {
        let dir = std::env::temp_dir().join("genie-clean-noop");
        fs::create_dir_all(&dir).unwrap();

        // Twice in a row: must not error either time.
        clean_stale_in(&dir);
        clean_stale_in(&dir);
    }

    #[test]
    fn test_cleanup_removes_present_resources() {
        let dir = std::env::temp_dir().join("genie-clean-present");
        fs::create_dir_all(&dir).unwrap();
        for file in RESOURCE_FILES {
            fs::write(dir.join(file), b"stale").unwrap();
        }

        clean_stale_in(&dir);

        for file in RESOURCE_FILES {
            assert!(!dir.join(file).exists());
        }
    }

    #[test]
    fn test_open_missing_file_is_ok() {
        assert!(open_resource("definitely-not-here.png", "linux").is_ok());
    }

    #[test]
    fn test_opener_skips_missing_file() {
        assert_eq!(
            opener_command(Path::new("definitely-not-here.png"), "linux"),
            None
        );
    }

    #[test]
    fn test_opener_selected_for_generated_chart() {
        // A turn whose execution produced chart.png hands it to the
        // platform opener.
        let dir = std::env::temp_dir().join("genie-open-chart");
        fs::create_dir_all(&dir).unwrap();
        let chart = dir.join("chart.png");
        fs::write(&chart, b"png").unwrap();

        let (program, args) = opener_command(&chart, "linux").unwrap();
        assert_eq!(program, "xdg-open");
        assert!(args.last().unwrap().ends_with("chart.png"));
    }

    #[test]
    fn test_opener_dispatches_by_os() {
        let dir = std::env::temp_dir().join("genie-open-dispatch");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("graph.png");
        fs::write(&file, b"png").unwrap();

        let (program, _) = opener_command(&file, "macos").unwrap();
        assert_eq!(program, "open");

        let (program, args) = opener_command(&file, "windows").unwrap();
        assert_eq!(program, "cmd");
        assert_eq!(args[0], "/C");
        assert_eq!(args[1], "start");
    }
}
