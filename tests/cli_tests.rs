// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end tests of the `depthcam view` command

use depthcam::depth::{DepthBuffer, write_raw_depth};
use std::path::Path;
use std::process::{Command, Output};

/// 16×16 file of 1000 mm samples plus a config with small markers
fn setup(dir: &Path) {
    write_raw_depth(
        dir.join("frame"),
        &DepthBuffer::new(16, 16, vec![1000; 256]).unwrap(),
    )
    .unwrap();
    std::fs::write(dir.join("config.json"), r#"{ "marker_radius": 2 }"#).unwrap();
}

fn view(dir: &Path, markers: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depthcam"))
        .current_dir(dir)
        .args(["--config", "config.json", "view", "frame"])
        .args(["--width", "16", "--height", "16", "--output", "out.png"])
        .args(markers)
        .output()
        .unwrap()
}

#[test]
fn test_view_writes_png_with_markers() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    let output = view(dir.path(), &["blue", "4", "4", "red", "10", "-5"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("Skipped marker"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Saved: out.png"));

    let png = image::open(dir.path().join("out.png")).unwrap().to_rgb8();
    assert_eq!(png.dimensions(), (16, 16));
    assert_eq!(png.get_pixel(4, 4).0, [0, 0, 255]);
    assert_eq!(png.get_pixel(0, 15).0, [85, 85, 85]);
    // Nothing drawn for the off-image marker
    assert_eq!(png.get_pixel(10, 0).0, [85, 85, 85]);
}

#[test]
fn test_view_ignores_incomplete_markers() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    let output = view(dir.path(), &["red", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("Wrong number of arguments"));

    let png = image::open(dir.path().join("out.png")).unwrap().to_rgb8();
    assert!(png.pixels().all(|p| p.0 == [85, 85, 85]));
}

#[test]
fn test_view_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    std::fs::remove_file(dir.path().join("frame")).unwrap();

    let output = view(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(!dir.path().join("out.png").exists());
}
