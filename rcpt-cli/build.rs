use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn git_short_sha(repo: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let repo = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join("..");

    // Source tarballs have no .git; packagers can pass the sha in.
    let sha = env::var("RCPT_BUILD_SHA")
        .ok()
        .or_else(|| git_short_sha(&repo))
        .unwrap_or_else(|| "unknown".to_owned());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_owned());

    for (key, value) in [("RCPT_BUILD_SHA", &sha), ("RCPT_BUILD_TARGET", &target)] {
        println!("cargo:rustc-env={key}={value}");
    }
    println!("cargo:rerun-if-env-changed=RCPT_BUILD_SHA");
    println!("cargo:rerun-if-changed={}", repo.join(".git/HEAD").display());
}
