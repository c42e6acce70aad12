//! Invocations that fail or finish before a browser is needed.

use std::path::{Path, PathBuf};
use std::process::Command;

fn wa_binary() -> PathBuf {
	let mut path = std::env::current_exe().unwrap();
	path.pop();
	path.pop();
	path.push("wa");
	path
}

struct Run {
	success: bool,
	stdout: String,
	stderr: String,
}

impl Run {
	fn json(&self) -> serde_json::Value {
		serde_json::from_str(self.stdout.trim()).unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
	}
}

fn wa(config: &Path, args: &[&str]) -> Run {
	let output = Command::new(wa_binary())
		.arg("--config")
		.arg(config)
		.args(args)
		.env_remove("WA_CHROME_PATH")
		.env_remove("CHROME_PATH")
		.env_remove("RUST_LOG")
		.output()
		.expect("failed to execute wa");
	Run {
		success: output.status.success(),
		stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
		stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
	}
}

#[test]
fn help_lists_commands() {
	let output = Command::new(wa_binary()).arg("--help").output().expect("failed to execute wa");
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	for command in ["open", "send", "send-media", "last-message", "run", "config"] {
		assert!(stdout.contains(command), "help is missing {command}:\n{stdout}");
	}
}

#[test]
fn send_media_missing_file_fails_before_launch() {
	let dir = tempfile::tempdir().unwrap();
	let session_dir = dir.path().join("session");
	let missing = dir.path().join("holiday.jpg");

	let run = wa(
		&dir.path().join("config.json"),
		&[
			"-f",
			"json",
			"--session-dir",
			session_dir.to_str().unwrap(),
			"send-media",
			"John Doe",
			missing.to_str().unwrap(),
		],
	);

	assert!(!run.success);
	assert!(run.stderr.contains("[FILE_NOT_FOUND]"), "stderr: {}", run.stderr);
	let json = run.json();
	assert_eq!(json["ok"], false);
	assert_eq!(json["command"], "send-media");
	assert_eq!(json["error"]["code"], "FILE_NOT_FOUND");
	assert!(!session_dir.exists(), "no browser profile should be created");
}

#[test]
fn blank_contact_is_invalid_input() {
	let dir = tempfile::tempdir().unwrap();
	let run = wa(&dir.path().join("config.json"), &["-f", "json", "send", "   ", "hello"]);

	assert!(!run.success);
	assert_eq!(run.json()["error"]["code"], "INVALID_INPUT");
}

#[test]
fn bad_cdp_endpoint_is_a_config_error() {
	let dir = tempfile::tempdir().unwrap();
	let run = wa(
		&dir.path().join("config.json"),
		&["-f", "json", "--cdp-endpoint", "http://127.0.0.1:9222", "last-message", "Team"],
	);

	assert!(!run.success);
	let json = run.json();
	assert_eq!(json["command"], "last-message");
	assert_eq!(json["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn browser_env_is_not_treated_as_explicit_path() {
	let dir = tempfile::tempdir().unwrap();
	let output = Command::new(wa_binary())
		.arg("--config")
		.arg(dir.path().join("config.json"))
		.args(["-vv", "-f", "json", "send-media", "Bob"])
		.arg(dir.path().join("missing.png"))
		.env("WA_CHROME_PATH", "/stale/chrome")
		.env_remove("RUST_LOG")
		.output()
		.expect("failed to execute wa");

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("resolved settings"), "stderr: {stderr}");
	assert!(!stderr.contains("/stale/chrome"), "env path leaked into settings: {stderr}");
}

#[test]
fn config_set_show_unset() {
	let dir = tempfile::tempdir().unwrap();
	let config = dir.path().join("wa").join("config.json");

	let run = wa(&config, &["-f", "json", "config", "set", "login-timeout-ms", "45000"]);
	assert!(run.success, "stderr: {}", run.stderr);
	assert!(config.exists());

	let json = wa(&config, &["-f", "json", "config", "show"]).json();
	assert_eq!(json["ok"], true);
	assert_eq!(json["command"], "config.show");
	assert_eq!(json["data"]["exists"], true);
	assert_eq!(json["data"]["config"]["loginTimeoutMs"], 45000);

	let run = wa(&config, &["-f", "json", "config", "unset", "login-timeout-ms"]);
	assert!(run.success, "stderr: {}", run.stderr);
	let json = wa(&config, &["-f", "json", "config", "show"]).json();
	assert_eq!(json["data"]["config"], serde_json::json!({}));
}

#[test]
fn config_set_rejects_unknown_key() {
	let dir = tempfile::tempdir().unwrap();
	let config = dir.path().join("config.json");

	let run = wa(&config, &["-f", "json", "config", "set", "theme", "dark"]);
	assert!(!run.success);
	assert!(run.stderr.contains("[CONFIG_ERROR]"), "stderr: {}", run.stderr);
	assert_eq!(run.json()["command"], "config.set");
	assert!(!config.exists());
}

#[test]
fn config_path_prints_explicit_path() {
	let dir = tempfile::tempdir().unwrap();
	let config = dir.path().join("custom.json");

	let run = wa(&config, &["-f", "text", "config", "path"]);
	assert!(run.success);
	assert_eq!(run.stdout.trim(), config.display().to_string());
}
