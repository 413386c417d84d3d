//! End-to-end tests of the jmc commands against a module on disk

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use jmc_cli::{commands, run, Cli, SyncOptions};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const DESCRIPTION: &str = "\
Package: scatr
Title: Scatter Plots
Version: 2.1.0
Author: Ravi Selker, Jonathon Love
Maintainer: Ravi Selker <ravi@example.org>
Description: Scatter plots with marginal densities and
    regression lines.
";

const ANALYSIS: &str = "\
name: scat
title: Scatter Plot
menuGroup: Exploration
options:
  - name: data
    type: Data
  - name: x
    title: X-Axis
    type: Variable
  - name: line
    title: Regression Line
    type: Bool
    default: false
";

fn module() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("DESCRIPTION"), DESCRIPTION).unwrap();
    fs::create_dir(dir.path().join("jamovi")).unwrap();
    fs::write(dir.path().join("jamovi").join("scat.a.yaml"), ANALYSIS).unwrap();
    dir
}

fn sync(root: &Path, options: &SyncOptions) -> (usize, String) {
    let mut out = Vec::new();
    let written = commands::sync(root, options, &mut out).unwrap();
    (written, String::from_utf8(out).unwrap())
}

#[test]
fn first_sync_writes_layout() {
    let dir = module();
    let (written, output) = sync(dir.path(), &SyncOptions::default());

    assert_eq!(written, 1);
    assert!(output.contains("added: x (Variable)"));
    assert!(output.contains("added: line (Bool)"));
    assert!(output.ends_with("wrote: scat.u.yaml\n"));

    let layout = fs::read_to_string(dir.path().join("jamovi").join("scat.u.yaml")).unwrap();
    assert!(layout.contains("jus: '2.0'") || layout.contains("jus: \"2.0\""));
    assert!(layout.contains("VariableSupplier"));
    assert!(layout.contains("CheckBox"));
}

#[test]
fn second_sync_is_quiet() {
    let dir = module();
    sync(dir.path(), &SyncOptions::default());

    let (written, output) = sync(dir.path(), &SyncOptions::default());
    assert_eq!(written, 0);
    assert_eq!(output, "");
}

#[test]
fn dry_run_leaves_module_untouched() {
    let dir = module();
    let options = SyncOptions {
        dry_run: true,
        ..SyncOptions::default()
    };
    let (written, output) = sync(dir.path(), &options);

    assert_eq!(written, 0);
    assert!(output.ends_with("would write: scat.u.yaml\n"));
    assert!(!dir.path().join("jamovi").join("scat.u.yaml").exists());
}

#[test]
fn stale_controls_are_reported() {
    let dir = module();
    sync(dir.path(), &SyncOptions::default());

    let trimmed = ANALYSIS.replace(
        "  - name: line\n    title: Regression Line\n    type: Bool\n    default: false\n",
        "",
    );
    fs::write(dir.path().join("jamovi").join("scat.a.yaml"), trimmed).unwrap();

    let (written, output) = sync(dir.path(), &SyncOptions::default());
    assert_eq!(written, 1);
    assert_eq!(output, "removed: line (CheckBox, stale)\nwrote: scat.u.yaml\n");
}

#[test]
fn check_reports_missing_layout() {
    let dir = module();
    let mut out = Vec::new();
    let up_to_date = commands::check(dir.path(), None, &mut out).unwrap();

    assert!(!up_to_date);
    assert_eq!(String::from_utf8(out).unwrap(), "out of date: scat.u.yaml\n");
}

#[test]
fn check_passes_after_sync() {
    let dir = module();
    sync(dir.path(), &SyncOptions::default());

    let cli = Cli::try_parse_from(["jmc", "check", dir.path().to_str().unwrap()]).unwrap();
    let mut out = Vec::new();
    let code = run(cli, &mut out).unwrap();

    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
    assert_eq!(String::from_utf8(out).unwrap(), "all layouts up to date\n");
}

#[test]
fn inst_directory_is_found() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("DESCRIPTION"), DESCRIPTION).unwrap();
    let defs = dir.path().join("inst").join("jamovi");
    fs::create_dir_all(&defs).unwrap();
    fs::write(defs.join("scat.a.yaml"), ANALYSIS).unwrap();

    let (written, _) = sync(dir.path(), &SyncOptions::default());
    assert_eq!(written, 1);
    assert!(defs.join("scat.u.yaml").exists());
}

#[test]
fn unknown_analysis_is_an_error() {
    let dir = module();
    let options = SyncOptions {
        analysis: Some("anova".to_string()),
        ..SyncOptions::default()
    };
    let err = commands::sync(dir.path(), &options, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("no analysis named 'anova'"));
}

#[test]
fn missing_description_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("jamovi")).unwrap();

    let err = commands::sync(dir.path(), &SyncOptions::default(), &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("a DESCRIPTION file could not be found"));
}

#[test]
fn config_file_is_applied() {
    let dir = module();
    let with_slider = format!("{ANALYSIS}  - name: size\n    type: Slider\n");
    fs::write(dir.path().join("jamovi").join("scat.a.yaml"), with_slider).unwrap();

    let (_, output) = sync(dir.path(), &SyncOptions::default());
    assert!(output.contains("skipped: size (unknown type 'Slider')"));

    fs::write(dir.path().join("jmc.toml"), "[sync]\nstrict-types = true\n").unwrap();
    let err = commands::sync(dir.path(), &SyncOptions::default(), &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("option 'size' has unknown type 'Slider'"));
}

#[test]
fn obsolete_config_key_is_an_error() {
    let dir = module();
    fs::write(dir.path().join("jmc.toml"), "[sync]\ntarget-version = \"1.0\"\n").unwrap();

    let err = commands::sync(dir.path(), &SyncOptions::default(), &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("target-version"));
}

#[test]
fn legacy_layout_is_upgraded() {
    let dir = module();
    let legacy = "\
title: Scatter Plot
name: scat
jus: '1.0'
children:
  - type: CheckBox
    name: line
";
    fs::write(dir.path().join("jamovi").join("scat.u.yaml"), legacy).unwrap();

    let (written, output) = sync(dir.path(), &SyncOptions::default());
    assert_eq!(written, 1);
    assert!(output.starts_with("upgraded: from 1.0 => 2.0\n"));
    assert!(output.contains("added: x (Variable)"));
}

#[test]
fn elements_prints_json() {
    let dir = module();
    let definition = dir.path().join("jamovi").join("scat.a.yaml");
    let mut out = Vec::new();
    commands::elements(&definition, None, &mut out).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let controls = json["controls"].as_array().unwrap();
    assert!(!controls.is_empty());
    assert!(!dir.path().join("jamovi").join("scat.u.yaml").exists());
}
