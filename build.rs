use std::process::Command;

fn main() {
    // Short git SHA for the --version string; "unknown" outside a checkout.
    let git_sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GENIE_GIT_SHA={git_sha}");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
