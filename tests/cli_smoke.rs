//! Smoke tests for the `povframe` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn povframe(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_povframe"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .unwrap()
}

fn fixture_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/fonts/DejaVuSans-Bold.ttf")
}

/// Config using the fixture font and accepting small test backgrounds.
fn write_config(dir: &Path) {
    let config = format!(
        "[fonts]\npath = {:?}\npreferred = []\nfallbacks = []\n\n[library]\nmin_dimension = 0\n",
        fixture_font().display().to_string()
    );
    std::fs::write(dir.join("povframe.toml"), config).unwrap();
}

fn write_background(path: &Path) {
    image::RgbImage::from_pixel(216, 384, image::Rgb([20, 20, 30]))
        .save(path)
        .unwrap();
}

#[test]
fn gen_config_prints_a_loadable_config() {
    let tmp = TempDir::new().unwrap();
    let out = povframe(tmp.path(), &["gen-config"]);
    assert!(out.status.success());

    let text = String::from_utf8(out.stdout).unwrap();
    let value: toml::Value = toml::from_str(&text).unwrap();
    assert!(value.get("vignette").is_some());

    // The printed file is accepted as-is.
    std::fs::write(tmp.path().join("povframe.toml"), &text).unwrap();
    let check = povframe(tmp.path(), &["check"]);
    let stdout = String::from_utf8_lossy(&check.stdout);
    assert!(stdout.contains("Captions"), "{stdout}");
}

#[test]
fn render_writes_named_output() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path());
    write_background(&tmp.path().join("alley.png"));

    let out = povframe(
        tmp.path(),
        &["render", "alley.png", "Discipline beats motivation."],
    );
    assert!(
        out.status.success(),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );

    let written = tmp.path().join("output/alley_pov_quote_centered.jpg");
    let img = image::open(&written).unwrap();
    assert_eq!((img.width(), img.height()), (216, 384));
}

#[test]
fn render_single_mode_with_explicit_output() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path());
    write_background(&tmp.path().join("bg.png"));

    let out = povframe(
        tmp.path(),
        &["--mode", "single", "render", "bg.png", "Stay hard", "-o", "frames/one.png"],
    );
    assert!(
        out.status.success(),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(tmp.path().join("frames/one.png").is_file());
}

#[test]
fn render_rejects_empty_caption() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path());
    write_background(&tmp.path().join("bg.png"));

    let out = povframe(tmp.path(), &["render", "bg.png", "   "]);
    assert!(!out.status.success());
    assert!(!tmp.path().join("output/bg_pov_quote_centered.jpg").exists());
}

#[test]
fn unknown_config_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("povframe.toml"), "[style]\nglow = true\n").unwrap();
    let out = povframe(tmp.path(), &["check"]);
    assert!(!out.status.success());
}

#[test]
fn batch_renders_posts_and_manifest() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path());
    std::fs::create_dir_all(tmp.path().join("images")).unwrap();
    std::fs::create_dir_all(tmp.path().join("quotes")).unwrap();
    write_background(&tmp.path().join("images/night.png"));
    std::fs::write(
        tmp.path().join("quotes/quotes.txt"),
        "Discipline beats motivation.\n\nSmall steps every day\n",
    )
    .unwrap();

    let out = povframe(tmp.path(), &["batch", "-n", "2", "--seed", "7"]);
    assert!(
        out.status.success(),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(tmp.path().join("output/post_pov_001.jpg").is_file());
    assert!(tmp.path().join("output/post_pov_002.jpg").is_file());
    assert!(tmp.path().join("output/manifest.json").is_file());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Rendered 2 of 2 posts"), "{stdout}");
}
