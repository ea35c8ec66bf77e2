//! `dmri-testkit run --json` end-to-end: stdout carries only the report
#![cfg(unix)]

use std::process::Command;

fn dmri_testkit() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dmri-testkit"));
    cmd.env_remove("DMRI_TESTKIT_PACKAGE_DIR")
        .env_remove("DMRI_TESTKIT_DEBUG_PRINT_VAR")
        .env_remove("DMRI_TESTKIT_MODULE_SUBDIR")
        .env_remove("DMRI_TESTKIT_MODULE_PACKAGE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_json_report_survives_debug_echo() {
    let output = dmri_testkit()
        .args(["run", "--json", "echo", "hi"])
        .env("AFQ_DEBUG_PRINT", "1")
        .output()
        .unwrap();

    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["command"], "echo hi");
    assert_eq!(report["exit_code"], 0);
    assert_eq!(report["stdout"], "hi\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Running command 'echo hi'"));
}

#[test]
fn test_signal_death_exits_with_shell_code() {
    let output = dmri_testkit()
        .args(["run", "--no-check", "sh", "-c", "kill -TERM $$"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(143));
}
