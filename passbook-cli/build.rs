use std::process::Command;

/// Stamps the binary with the workspace commit for `passbook --version`.
fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());

    let describe = Command::new("git")
        .current_dir(&manifest_dir)
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty());

    println!(
        "cargo:rustc-env=PASSBOOK_BUILD_SHA={}",
        describe.as_deref().unwrap_or("unknown")
    );
}
