#![forbid(unsafe_code)]

//! End-to-end runs of every subcommand against files on disk.
//!
//! Run:
//!   cargo test -p vacplot --test cli_end_to_end

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};
use vacplot::cli::{Cli, Commands, InputArgs, PlayArgs, RenderArgs, run_with};
use vacplot::{AppError, CoreError};

const DATA: &str = "\
Code,Name,Municipality,Ownership,Applications,Vacancies
08001,Escola Bressol Els Pins,Abrera,Public,25,20
08002,Llar d'Infants Sol,Abrera,Private,12,18
08003,Escola Bressol Mar,Badalona,Public,140,60
08004,Escola Bressol Riu,Badalona,Public,90,95
08005,Llar d'Infants Lluna,Badalona,Private,30,41
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("data.csv"), DATA).expect("write data");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn input(&self) -> InputArgs {
        InputArgs {
            data: self.path("data.csv"),
            config: None,
        }
    }

    fn run(&self, command: Commands) -> Result<String, AppError> {
        let mut out = Vec::new();
        run_with(
            Cli {
                log_json: false,
                command,
            },
            &mut out,
        )?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

#[test]
fn options_lists_municipalities_in_first_occurrence_order() {
    let fixture = Fixture::new();
    let out = fixture.run(Commands::Options(fixture.input())).unwrap();
    assert_eq!(out, "Abrera\nBadalona\n");
}

#[test]
fn legend_lists_ownership_colors() {
    let fixture = Fixture::new();
    let out = fixture.run(Commands::Legend(fixture.input())).unwrap();
    assert_eq!(out, "Public\t#f7d345\nPrivate\t#29b3c7\n");
}

#[test]
fn render_writes_settled_default_selection() {
    let fixture = Fixture::new();
    let output = fixture.path("out/abrera.svg");
    fixture
        .run(Commands::Render(RenderArgs {
            input: fixture.input(),
            select: None,
            at_ms: None,
            output: output.clone(),
        }))
        .unwrap();
    let svg = read(&output);
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<circle").count(), 2);
    assert!(svg.contains("r=\"3.5\""));
}

#[test]
fn render_mid_transition_shows_exiting_points() {
    let fixture = Fixture::new();
    let output = fixture.path("mid.svg");
    fixture
        .run(Commands::Render(RenderArgs {
            input: fixture.input(),
            select: Some("Badalona".into()),
            at_ms: Some(200),
            output: output.clone(),
        }))
        .unwrap();
    // Abrera points are shrinking; Badalona points have no position yet.
    let svg = read(&output);
    assert_eq!(svg.matches("<circle").count(), 2);
    assert!(!svg.contains("r=\"3.5\""));
}

#[test]
fn config_file_overrides_default_selection() {
    let fixture = Fixture::new();
    let config = fixture.path("chart.toml");
    fs::write(&config, "default_selection = \"Badalona\"\n").unwrap();
    let output = fixture.path("badalona.svg");
    fixture
        .run(Commands::Render(RenderArgs {
            input: InputArgs {
                data: fixture.path("data.csv"),
                config: Some(config),
            },
            select: None,
            at_ms: None,
            output: output.clone(),
        }))
        .unwrap();
    assert_eq!(read(&output).matches("<circle").count(), 3);
}

#[test]
fn invalid_config_lists_problems() {
    let fixture = Fixture::new();
    let config = fixture.path("bad.toml");
    fs::write(&config, "[style]\nradius = -1\npalette = []\n").unwrap();
    let error = fixture
        .run(Commands::Options(InputArgs {
            data: fixture.path("data.csv"),
            config: Some(config),
        }))
        .unwrap_err();
    match &error {
        AppError::InvalidConfig { problems } => {
            assert!(problems.iter().any(|p| p.contains("style.radius")));
            assert!(problems.iter().any(|p| p.contains("style.palette")));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn malformed_rows_follow_configured_policy() {
    let fixture = Fixture::new();
    let data = fixture.path("dirty.csv");
    fs::write(&data, format!("{DATA}08006,Broken,Abrera,Public,n/a,3\n")).unwrap();

    let error = fixture
        .run(Commands::Options(InputArgs {
            data: data.clone(),
            config: None,
        }))
        .unwrap_err();
    assert!(matches!(error, AppError::Core(CoreError::Validation(_))));
    assert_eq!(error.exit_code(), 3);

    let config = fixture.path("drop.toml");
    fs::write(&config, "[loader]\nmalformed_rows = \"drop\"\n").unwrap();
    let out = fixture
        .run(Commands::Options(InputArgs {
            data,
            config: Some(config),
        }))
        .unwrap();
    assert_eq!(out, "Abrera\nBadalona\n");
}

#[test]
fn play_writes_frames_and_summary() {
    let fixture = Fixture::new();
    let out_dir = fixture.path("frames");
    fixture
        .run(Commands::Play(PlayArgs {
            input: fixture.input(),
            sequence: vec!["Badalona".into(), "Abrera".into()],
            hold_ms: 1200,
            frame_ms: 200,
            out_dir: out_dir.clone(),
        }))
        .unwrap();

    let summary: serde_json::Value =
        serde_json::from_str(&read(&out_dir.join("frames.json"))).unwrap();
    assert_eq!(summary["legend"][0]["label"], "Public");
    assert_eq!(summary["legend"][0]["color"], "#f7d345");
    let frames = summary["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 12);
    for frame in frames {
        let file = frame["file"].as_str().unwrap();
        assert!(out_dir.join(file).exists(), "missing {file}");
    }

    // First frame of each key is taken right after the selection change.
    assert_eq!(frames[0]["selection"], "Badalona");
    assert_eq!(frames[0]["entering"], 3);
    assert_eq!(frames[0]["exiting"], 2);
    assert_eq!(frames[6]["selection"], "Abrera");
    assert_eq!(frames[6]["at_ms"].as_u64().unwrap() - frames[0]["at_ms"].as_u64().unwrap(), 1200);

    // 1200 ms after switching to Badalona everything has settled.
    assert_eq!(frames[5]["at_ms"].as_u64().unwrap() - frames[0]["at_ms"].as_u64().unwrap(), 1000);
    assert_eq!(frames[5]["exiting"], 0);
    assert_eq!(frames[5]["points"], 3);
}

#[test]
fn unknown_key_in_sequence_renders_empty_plot() {
    let fixture = Fixture::new();
    let out_dir = fixture.path("empty");
    fixture
        .run(Commands::Play(PlayArgs {
            input: fixture.input(),
            sequence: vec!["Nowhere".into()],
            hold_ms: 1000,
            frame_ms: 500,
            out_dir: out_dir.clone(),
        }))
        .unwrap();
    let summary: serde_json::Value =
        serde_json::from_str(&read(&out_dir.join("frames.json"))).unwrap();
    let frames = summary["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1]["points"], 2);
    assert_eq!(frames[1]["exiting"], 2);
    assert_eq!(read(&out_dir.join("frame_00001.svg")).matches("<circle").count(), 2);
}

#[test]
fn data_without_rows_is_an_error() {
    let fixture = Fixture::new();
    let data = fixture.path("empty.csv");
    fs::write(&data, "Code,Name,Municipality,Ownership,Applications,Vacancies\n").unwrap();
    let error = fixture
        .run(Commands::Options(InputArgs { data, config: None }))
        .unwrap_err();
    assert!(matches!(error, AppError::Core(CoreError::Configuration(_))));
}
