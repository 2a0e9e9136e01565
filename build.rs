// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    // Re-run build script if git HEAD changes
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");

    // Packagers can pin the version explicitly
    let version = if let Ok(v) = std::env::var("DEPTHCAM_VERSION") {
        v
    } else {
        get_git_version()
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

fn get_git_version() -> String {
    let pkg_version = env!("CARGO_PKG_VERSION");

    // "v0.1.0" at a tag, "v0.1.0-5-gabcdef1" after it
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string());

    let Some(described) = described else {
        // Not a git checkout (tarball or crates.io build)
        return pkg_version.to_string();
    };

    let described = described.strip_prefix('v').unwrap_or(&described);

    if described.contains('-') {
        // version-commits-ghash becomes version-dirty-hash
        let parts: Vec<&str> = described.rsplitn(3, '-').collect();
        if parts.len() >= 3 {
            let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
            return format!("{}-dirty-{}", parts[2], hash);
        }
        return described.to_string();
    }

    if described.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        // Exact tag - append the commit hash for traceability
        match get_commit_hash() {
            Some(hash) => format!("{}-{}", described, hash),
            None => described.to_string(),
        }
    } else {
        // No tags yet, `describe --always` returned a bare hash
        format!("{}-{}", pkg_version, described)
    }
}

fn get_commit_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
