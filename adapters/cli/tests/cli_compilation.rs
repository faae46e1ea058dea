use std::{
    io::Write,
    process::{Command, Stdio},
};

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "hex-tactics"])
        .status()
        .expect("failed to invoke cargo check for hex-tactics CLI binary");

    assert!(status.success(), "cargo check --bin hex-tactics should succeed");
}

fn run_script(role: &str, script: &str) -> String {
    let data = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");
    let mut child = Command::new(env!("CARGO_BIN_EXE_hex-tactics"))
        .args(["--data", data, "--map", "Skirmish", "--role", role])
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start hex-tactics");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(script.as_bytes())
        .expect("failed to write script");
    let output = child.wait_with_output().expect("hex-tactics output");
    assert!(output.status.success(), "hex-tactics exited with {}", output.status);
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn offline_script_prints_dialogs_without_replication() {
    let stdout = run_script(
        "offline",
        "SelectFocusedUnit coords=0,2\nStay\nHoldFire\nEndTurn\n!confirm\n\n",
    );
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.first(), Some(&"Welcome to Hex Tactics."));
    assert!(lines.iter().any(|line| line.starts_with("[End Turn?]")));
    assert!(lines.iter().any(|line| line.starts_with("[Player 2's turn]")));
    assert!(!lines.iter().any(|line| line.starts_with('>')));
}

#[test]
fn host_replicates_accepted_local_commands() {
    let stdout = run_script(
        "host",
        "< PlayerReady id=2\n\nSelectFocusedUnit coords=0,2\nMove coords=9,9\n",
    );
    let replicated: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.strip_prefix("> "))
        .collect();

    assert_eq!(
        replicated,
        vec!["PlayerReady id=1", "SelectFocusedUnit coords=0,2"]
    );
}
