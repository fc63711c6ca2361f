use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;

const CONFIG: &str = "class_names: [button, text, image]\n";

fn write_dataset(root: &Path) {
    common::write_png_image(&root.join("train/image/home.png"), 24, 16);
    common::write_label(&root.join("train/label/home.png"), 24, 16, &[(1, 2, 2, 8, 6)]);
    common::write_png_image(&root.join("train/image/feed.jpg.png"), 24, 16);
    common::write_label(&root.join("train/label/lonely.png"), 24, 16, &[]);
}

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("segui 0.1.0\n");
}

// Index subcommand tests

#[test]
fn index_reports_pairs_and_warnings() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path());

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("index").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Indexed 1 sample(s) in 'train'"))
        .stdout(predicates::str::contains("MissingImage"));
}

#[test]
fn index_strict_fails_on_warnings() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path());

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("index").arg(temp.path()).arg("--strict");
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("warning(s)"));
}

#[test]
fn index_json_output_format() {
    let temp = tempfile::tempdir().unwrap();
    write_dataset(temp.path());

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("index").arg(temp.path()).args(["--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"sample_count\": 1"))
        .stdout(predicates::str::contains("\"error_count\": 0"));
}

#[test]
fn index_missing_split_fails() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("index").arg(temp.path()).args(["--split", "test"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("MissingDirectory"));
}

// Prepare subcommand tests

#[test]
fn prepare_writes_transformed_labels() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("data");
    write_dataset(&root);
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, "class_names: [button]\nreduce_zero_label: true\n");
    let out = temp.path().join("prepared");

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("prepare")
        .arg(&root)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Prepared 1 sample(s)"));

    let label = image::open(out.join("train/label/home.png"))
        .unwrap()
        .into_luma8();
    assert_eq!(label.get_pixel(0, 0)[0], 255);
    assert_eq!(label.get_pixel(3, 3)[0], 0);
}

#[test]
fn prepare_reports_skipped_labels() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("data");
    for name in ["a", "b"] {
        common::write_png_image(&root.join(format!("train/image/{name}.png")), 8, 8);
    }
    for name in ["a", "b", "c"] {
        common::write_label(&root.join(format!("train/label/{name}.png")), 8, 8, &[]);
    }
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, CONFIG);

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("prepare")
        .arg(&root)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(temp.path().join("prepared"));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Prepared 2 sample(s)"))
        .stdout(predicates::str::contains("MissingImage"))
        .stdout(predicates::str::contains("c.png"))
        .stdout(predicates::str::contains("found 2 sample(s), skipped 1"));
}

#[test]
fn prepare_fails_on_missing_split() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, CONFIG);

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("prepare")
        .arg(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(temp.path().join("prepared"));
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("MissingDirectory"));
}

// Layout subcommand tests

#[test]
fn layout_prints_json_to_stdout() {
    let temp = tempfile::tempdir().unwrap();
    let prediction = temp.path().join("pred.png");
    common::write_label(&prediction, 40, 30, &[(2, 5, 5, 10, 8), (3, 30, 0, 2, 2)]);
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, CONFIG);

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("layout")
        .arg(&prediction)
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"type\": \"text\""))
        .stdout(predicates::str::contains("\"canvas_width\": 40"))
        .stdout(predicates::str::contains("\"image\"").not());
}

#[test]
fn layout_threshold_flags_override_config() {
    let temp = tempfile::tempdir().unwrap();
    let prediction = temp.path().join("pred.png");
    common::write_label(&prediction, 40, 30, &[(3, 30, 0, 2, 2)]);
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, CONFIG);

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("layout")
        .arg(&prediction)
        .arg("--config")
        .arg(&config)
        .args(["--min-width", "1", "--min-height", "1"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"type\": \"image\""));
}

#[test]
fn layout_writes_json_and_html_files() {
    let temp = tempfile::tempdir().unwrap();
    let prediction = temp.path().join("pred.png");
    common::write_label(&prediction, 40, 30, &[(1, 0, 0, 12, 12)]);
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, CONFIG);
    let out = temp.path().join("layout.json");
    let html = temp.path().join("site/index.html");

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("layout")
        .arg(&prediction)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .arg("--html")
        .arg(&html)
        .args(["--background", "shot.png"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Wrote 1 component(s)"));

    let page = std::fs::read_to_string(&html).unwrap();
    assert!(page.contains("class=\"component button\""));
    assert!(page.contains("url(\"shot.png\")"));
    assert!(std::fs::read_to_string(&out).unwrap().contains("\"style\": \"button\""));
}

#[test]
fn layout_rejects_undecodable_prediction() {
    let temp = tempfile::tempdir().unwrap();
    let prediction = temp.path().join("pred.png");
    std::fs::write(&prediction, b"not a png").unwrap();
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, CONFIG);

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("layout")
        .arg(&prediction)
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to decode image"));
}

#[test]
fn layout_rejects_invalid_config() {
    let temp = tempfile::tempdir().unwrap();
    let prediction = temp.path().join("pred.png");
    common::write_label(&prediction, 8, 8, &[]);
    let config = temp.path().join("classes.yaml");
    common::write_config(&config, "class_names: []\n");

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("layout")
        .arg(&prediction)
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Invalid configuration"));
}

// Rasterize subcommand tests

#[test]
fn rasterize_paints_layout_back() {
    let temp = tempfile::tempdir().unwrap();
    let layout = temp.path().join("layout.json");
    std::fs::write(
        &layout,
        r#"{"canvas_width": 20, "canvas_height": 10, "components": [
            {"type": "text", "class_id": 2, "bbox": {"x": 1, "y": 1, "width": 5, "height": 5}}
        ]}"#,
    )
    .unwrap();
    let mask = temp.path().join("mask.png");

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("rasterize").arg(&layout).arg("--out").arg(&mask);
    cmd.assert().success();

    let img = image::open(&mask).unwrap().into_luma8();
    assert_eq!(img.dimensions(), (20, 10));
    assert_eq!(img.get_pixel(3, 3)[0], 2);
    assert_eq!(img.get_pixel(10, 3)[0], 0);
}

// Mask subcommand tests

#[test]
fn mask_paints_bounds_annotation() {
    let temp = tempfile::tempdir().unwrap();
    let screenshot = temp.path().join("screen.png");
    common::write_png_image(&screenshot, 30, 20);
    let annotation = temp.path().join("screen.json");
    std::fs::write(
        &annotation,
        r#"{"bounds": [
            {"class": "Toolbar", "bounds": [0, 0, 30, 4]},
            {"class": "Button", "bounds": [5, 10, 8, 4]}
        ]}"#,
    )
    .unwrap();
    let mask = temp.path().join("masks/screen.png");

    let mut cmd = Command::cargo_bin("segui").unwrap();
    cmd.arg("mask")
        .arg(&annotation)
        .arg("--image")
        .arg(&screenshot)
        .arg("--out")
        .arg(&mask);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Painted 2 box(es)"))
        .stdout(predicates::str::contains("class_names: [Toolbar, Button]"));

    let img = image::open(&mask).unwrap().into_luma8();
    assert_eq!(img.dimensions(), (30, 20));
    assert_eq!(img.get_pixel(29, 3)[0], 1);
    assert_eq!(img.get_pixel(6, 12)[0], 2);
    assert_eq!(img.get_pixel(6, 15)[0], 0);
}
