use serde_json::Value;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "crosswalk-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_crosswalk_in<I, S>(dir: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_crosswalk");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("crosswalk command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// Writes a controls export and an evidence-task export into `dir` using
/// the default file names.
fn write_sample_exports(dir: &Path) {
    let controls = [
        "Id,Name,Description,Owner,Status,Category,Frameworks,Policy,Notes,Codes",
        "1,CTRL-1,,,,,\"SOC 2\nISO 27001:2013\",,,\"CC1.1\nA.5.1\"",
        "2,CTRL-2,,,,,\"SOC 2\",,,\"CC2.1\"",
        "3,CTRL-3,,,,,\"ISO 27001:2013\",,,\"A.9.1\"",
    ];
    let tasks = [
        "Id,Name,Description,Owner,Status,Frequency,Notes,Controls,Frameworks",
        "ET-9,,,,,,,CTRL-1,\"SOC 2\nISO 27001:2013\"",
        "ET-10,,,,,,,\"CTRL-2\nCTRL-3\",\"SOC 2\nISO 27001:2013\"",
    ];
    fs::write(dir.join("controls_export.csv"), format!("{}\n", controls.join("\n")))
        .expect("controls export should be written");
    fs::write(
        dir.join("evidence_tasks_export.csv"),
        format!("{}\n", tasks.join("\n")),
    )
    .expect("evidence-task export should be written");
}

#[test]
fn map_prints_report_and_writes_csv() {
    let tmp = TempDirGuard::new("map");
    write_sample_exports(tmp.path());

    let output = run_crosswalk_in(tmp.path(), ["map"]);
    assert_success(&output);

    assert_eq!(
        stdout_text(&output),
        "ISO 27001:2013\nCC1.1\nCTRL-1\n\nCC2.1\nCTRL-3\n\n"
    );
    let csv_path = tmp.path().join("SOC 2 _ISO 27001:2013mapping.csv");
    let csv_text = fs::read_to_string(&csv_path).expect("mapping csv should exist");
    assert!(csv_text.starts_with("SOC Criteria,SOC controls,ISO 27001:2013 controls\r\n"));
    assert!(csv_text.contains("CC2.1,\"CTRL-2\n\",\"CTRL-3\n\""));
}

#[test]
fn map_json_smoke() {
    let tmp = TempDirGuard::new("map-json");
    write_sample_exports(tmp.path());

    let output = run_crosswalk_in(
        tmp.path(),
        [
            OsString::from("map"),
            OsString::from("--no-csv"),
            OsString::from("--json"),
        ],
    );
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert!(payload["csvPath"].is_null());
    assert_eq!(payload["report"]["framework"], "ISO 27001:2013");
    assert_eq!(payload["report"]["criteria"][0]["criterion"], "CC1.1");
    assert_eq!(
        payload["report"]["criteria"][0]["satisfiedControls"],
        serde_json::json!(["CTRL-1"])
    );
    assert_eq!(payload["report"]["summary"]["criteriaCount"], 2);
    assert!(!tmp.path().join("SOC 2 _ISO 27001:2013mapping.csv").exists());
}

#[test]
fn map_reads_inputs_and_framework_from_flags() {
    let tmp = TempDirGuard::new("map-flags");
    let inputs = tmp.path().join("inputs");
    let out = tmp.path().join("out");
    fs::create_dir_all(&inputs).expect("inputs dir should be created");
    fs::create_dir_all(&out).expect("out dir should be created");
    write_sample_exports(&inputs);

    let output = run_crosswalk_in(
        tmp.path(),
        [
            OsString::from("map"),
            OsString::from("--controls"),
            inputs.join("controls_export.csv").into_os_string(),
            OsString::from("--evidence-tasks"),
            inputs.join("evidence_tasks_export.csv").into_os_string(),
            OsString::from("--framework"),
            OsString::from("SOC 2"),
            OsString::from("--output-dir"),
            out.clone().into_os_string(),
        ],
    );
    assert_success(&output);

    assert!(stdout_text(&output).starts_with("SOC 2\nCC1.1\n"));
    assert!(out.join("SOC 2 _SOC 2mapping.csv").exists());
}

#[test]
fn map_uses_config_file_from_working_directory() {
    let tmp = TempDirGuard::new("map-config");
    write_sample_exports(tmp.path());
    fs::write(
        tmp.path().join("crosswalk.toml"),
        "framework = \"SOC 2\"\noutput_dir = \"reports\"\n",
    )
    .expect("config should be written");
    fs::create_dir_all(tmp.path().join("reports")).expect("reports dir should be created");

    let output = run_crosswalk_in(tmp.path(), ["map"]);
    assert_success(&output);
    assert!(tmp.path().join("reports/SOC 2 _SOC 2mapping.csv").exists());
}

#[test]
fn map_unknown_framework_fails() {
    let tmp = TempDirGuard::new("map-unknown");
    write_sample_exports(tmp.path());

    let output = run_crosswalk_in(tmp.path(), ["map", "--framework", "NIST 800-53"]);
    assert_failure(&output);
    let stderr = stderr_text(&output);
    assert!(stderr.contains("unknown framework `NIST 800-53`"), "{stderr}");
    assert!(stderr.contains("ISO 27001:2013"), "{stderr}");
}

#[test]
fn map_missing_export_fails() {
    let tmp = TempDirGuard::new("map-missing");

    let output = run_crosswalk_in(tmp.path(), ["map"]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("file not found"));
}

#[test]
fn frameworks_json_smoke() {
    let tmp = TempDirGuard::new("frameworks-json");
    write_sample_exports(tmp.path());

    let output = run_crosswalk_in(tmp.path(), ["frameworks", "--json"]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["criteriaCount"], 2);
    assert_eq!(payload["frameworks"][0]["label"], "ISO 27001:2013");
    assert_eq!(payload["frameworks"][0]["controlCount"], 2);
    assert_eq!(payload["frameworks"][1]["label"], "SOC 2");
    assert_eq!(payload["frameworks"][1]["evidenceTaskCount"], 2);
}

#[test]
fn frameworks_text_lists_each_label() {
    let tmp = TempDirGuard::new("frameworks-text");
    write_sample_exports(tmp.path());

    let output = run_crosswalk_in(tmp.path(), ["frameworks"]);
    assert_success(&output);
    let stdout = stdout_text(&output);
    assert!(stdout.contains("  - ISO 27001:2013 (controls=2, evidence_tasks=2)"), "{stdout}");
    assert!(stdout.contains("  - SOC 2 (controls=2, evidence_tasks=2)"), "{stdout}");
}

fn write_repeated_reference_tasks(dir: &Path) {
    let tasks = [
        "Id,Name,Description,Owner,Status,Frequency,Notes,Controls,Frameworks",
        "ET-9,,,,,,,\"CTRL-1\nCTRL-1\",\"SOC 2\nISO 27001:2013\"",
    ];
    fs::write(
        dir.join("evidence_tasks_export.csv"),
        format!("{}\n", tasks.join("\n")),
    )
    .expect("evidence-task export should be written");
}

fn map_json(dir: &Path, extra: &[&str]) -> Value {
    let mut args = vec!["map", "--no-csv", "--json"];
    args.extend_from_slice(extra);
    let output = run_crosswalk_in(dir, args);
    assert_success(&output);
    parse_json_stdout(&output)
}

#[test]
fn map_dedup_flag_collapses_repeated_references() {
    let tmp = TempDirGuard::new("map-dedup");
    write_sample_exports(tmp.path());
    write_repeated_reference_tasks(tmp.path());

    let kept = map_json(tmp.path(), &[]);
    assert_eq!(kept["report"]["summary"]["evidenceLinkCount"], 2);

    let collapsed = map_json(tmp.path(), &["--dedup"]);
    assert_eq!(collapsed["report"]["summary"]["evidenceLinkCount"], 1);
}

#[test]
fn map_no_dedup_flag_overrides_config() {
    let tmp = TempDirGuard::new("map-no-dedup");
    write_sample_exports(tmp.path());
    write_repeated_reference_tasks(tmp.path());
    fs::write(tmp.path().join("crosswalk.toml"), "dedup_evidence_tasks = true\n")
        .expect("config should be written");

    let from_config = map_json(tmp.path(), &[]);
    assert_eq!(from_config["report"]["summary"]["evidenceLinkCount"], 1);

    let overridden = map_json(tmp.path(), &["--no-dedup"]);
    assert_eq!(overridden["report"]["summary"]["evidenceLinkCount"], 2);
}

#[test]
fn map_soc_framework_flag_selects_membership_label() {
    let tmp = TempDirGuard::new("map-soc-framework");
    let controls = [
        "Id,Name,Description,Owner,Status,Category,Frameworks,Policy,Notes,Codes",
        "1,CTRL-1,,,,,\"SOC2\nISO 27001:2013\",,,CC1.1",
    ];
    let tasks = [
        "Id,Name,Description,Owner,Status,Frequency,Notes,Controls,Frameworks",
        "ET-9,,,,,,,CTRL-1,\"SOC2\nISO 27001:2013\"",
    ];
    fs::write(
        tmp.path().join("controls_export.csv"),
        format!("{}\n", controls.join("\n")),
    )
    .expect("controls export should be written");
    fs::write(
        tmp.path().join("evidence_tasks_export.csv"),
        format!("{}\n", tasks.join("\n")),
    )
    .expect("evidence-task export should be written");

    let default_label = map_json(tmp.path(), &[]);
    assert_eq!(default_label["report"]["summary"]["criteriaCount"], 0);

    let renamed = map_json(tmp.path(), &["--soc-framework", "SOC2"]);
    assert_eq!(renamed["report"]["criteria"][0]["criterion"], "CC1.1");
    assert_eq!(
        renamed["report"]["criteria"][0]["satisfiedControls"],
        serde_json::json!(["CTRL-1"])
    );
}

#[test]
fn map_annex_prefix_flag_changes_excluded_codes() {
    let tmp = TempDirGuard::new("map-annex-prefix");
    write_sample_exports(tmp.path());

    let payload = map_json(tmp.path(), &["--annex-prefix", "CC2"]);
    let codes: Vec<&str> = payload["report"]["criteria"]
        .as_array()
        .expect("criteria should be an array")
        .iter()
        .map(|c| c["criterion"].as_str().expect("criterion code"))
        .collect();
    assert_eq!(codes, vec!["A.5.1", "CC1.1"]);
}

#[test]
fn map_prints_report_before_csv_write_failure() {
    let tmp = TempDirGuard::new("map-csv-failure");
    write_sample_exports(tmp.path());

    let output = run_crosswalk_in(tmp.path(), ["map", "--output-dir", "missing/dir"]);
    assert_failure(&output);
    assert!(stdout_text(&output).starts_with("ISO 27001:2013\nCC1.1\nCTRL-1\n"));
    assert!(stderr_text(&output).contains("missing/dir"), "{}", stderr_text(&output));
}

#[test]
fn frameworks_rejects_dedup_flag() {
    let tmp = TempDirGuard::new("frameworks-dedup");
    write_sample_exports(tmp.path());

    let output = run_crosswalk_in(tmp.path(), ["frameworks", "--dedup"]);
    assert_failure(&output);
}
