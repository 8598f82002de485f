//! Missing-dependency detection and package installation.
//!
//! When executed code fails because a module is not installed, the error
//! text is classified against a fixed substring table, the offending module
//! name is pulled out of the message, and the matching package manager is
//! invoked so the *next* task can succeed. The failed execution is never
//! retried automatically.

use anyhow::{Context, Result};
use regex::Regex;
use std::process::Command;
use tracing::{info, warn};

use crate::prompt::Language;

/// Substrings that classify an execution error as a missing dependency.
/// Matching is case-sensitive; these are the literal tokens the Python and
/// Node runtimes emit.
pub const MISSING_DEPENDENCY_PATTERNS: &[&str] = &[
    "ModuleNotFound",
    "ImportError",
    "No module named",
    "Cannot find module",
];

/// Module names whose installable package is spelled differently.
const PACKAGE_ALIASES: &[(&str, &str)] = &[
    ("cv2", "opencv-python"),
    ("PIL", "Pillow"),
    ("sklearn", "scikit-learn"),
    ("bs4", "beautifulsoup4"),
    ("yaml", "PyYAML"),
    ("dotenv", "python-dotenv"),
];

/// True when the error text indicates a missing module or package.
pub fn is_missing_dependency(error_text: &str) -> bool {
    MISSING_DEPENDENCY_PATTERNS
        .iter()
        .any(|pattern| error_text.contains(pattern))
}

/// Map a source-level module name to its installable package name.
fn package_for_module(module: &str) -> String {
    PACKAGE_ALIASES
        .iter()
        .find(|(name, _)| *name == module)
        .map(|(_, package)| package.to_string())
        .unwrap_or_else(|| module.to_string())
}

/// Pull the offending package name out of a missing-dependency error.
///
/// Python errors quote the module name ("No module named 'requests'");
/// JavaScript errors quote a module or path token ("Cannot find module
/// 'express'"). Relative-path tokens are not installable and resolve to
/// `None`.
pub fn resolve_package(error_text: &str, language: Language) -> Option<String> {
    let pattern = match language {
        Language::Python => r"No module named '([^']+)'|ImportError: cannot import name '([^']+)'",
        Language::JavaScript => r"Cannot find module '([^']+)'",
        _ => return None,
    };

    // The patterns are fixed literals; a compile failure here is a bug.
    let re = Regex::new(pattern).ok()?;
    let captures = re.captures(error_text)?;
    let token = captures
        .iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str())?;

    if token.starts_with('.') || token.starts_with('/') {
        return None;
    }

    // "a.b.c" installs as its top-level distribution.
    let module = token.split('.').next().unwrap_or(token);
    Some(package_for_module(module))
}

/// Install a package with the language's package manager.
///
/// Failures are reported to the caller for display but must never abort
/// the session.
pub fn install_package(package: &str, language: Language) -> Result<()> {
    let mut command = match language {
        Language::Python => {
            let python = if cfg!(windows) { "python" } else { "python3" };
            let mut cmd = Command::new(python);
            cmd.args(["-m", "pip", "install", package]);
            cmd
        }
        Language::JavaScript => {
            let mut cmd = Command::new("npm");
            cmd.args(["install", package]);
            cmd
        }
        _ => anyhow::bail!("no package manager configured for {language}"),
    };

    info!(package, %language, "installing missing package");

    let output = command
        .output()
        .with_context(|| format!("failed to run package manager for {package}"))?;

    if output.status.success() {
        info!(package, "package installed");
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(package, error = %stderr.trim(), "package install failed");
        anyhow::bail!("install of {package} failed: {}", stderr.trim())
    }
}
