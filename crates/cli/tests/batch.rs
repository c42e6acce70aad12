//! `wa run` requests that never start a browser.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn wa_binary() -> PathBuf {
	let mut path = std::env::current_exe().unwrap();
	path.pop();
	path.pop();
	path.push("wa");
	path
}

fn run_batch(lines: &[&str]) -> Vec<serde_json::Value> {
	let dir = tempfile::tempdir().unwrap();
	let mut child = Command::new(wa_binary())
		.arg("--config")
		.arg(dir.path().join("config.json"))
		.arg("--session-dir")
		.arg(dir.path().join("session"))
		.arg("run")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("failed to spawn wa run");

	{
		let mut stdin = child.stdin.take().unwrap();
		for line in lines {
			writeln!(stdin, "{line}").unwrap();
		}
	}

	let output = child.wait_with_output().unwrap();
	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
	assert!(!dir.path().join("session").exists(), "batch started a browser");

	String::from_utf8_lossy(&output.stdout)
		.lines()
		.map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("bad response line ({e}): {line}")))
		.collect()
}

#[test]
fn ping_echoes_id() {
	let responses = run_batch(&[r#"{"id":"a1","command":"ping"}"#]);
	assert_eq!(responses.len(), 1);
	assert_eq!(responses[0]["id"], "a1");
	assert_eq!(responses[0]["ok"], true);
	assert_eq!(responses[0]["command"], "ping");
}

#[test]
fn quit_stops_reading() {
	let responses = run_batch(&[
		r#"{"id":1,"command":"ping"}"#,
		r#"{"id":2,"command":"quit"}"#,
		r#"{"id":3,"command":"ping"}"#,
	]);
	assert_eq!(responses.len(), 2);
	assert_eq!(responses[1]["id"], 2);
	assert_eq!(responses[1]["command"], "quit");
}

#[test]
fn errors_do_not_end_the_batch() {
	let responses = run_batch(&[
		"this is not json",
		"",
		r#"{"id":1,"command":"dance"}"#,
		r#"{"id":2,"command":"send","args":{"contact":"Bob"}}"#,
		r#"{"id":3,"command":"send-media","args":{"contact":"Bob","file":"/definitely/not/here.png"}}"#,
		r#"{"id":4,"command":"ping"}"#,
	]);

	let codes: Vec<_> = responses.iter().map(|r| r["error"]["code"].clone()).collect();
	assert_eq!(
		codes,
		vec![
			serde_json::json!("PARSE_ERROR"),
			serde_json::json!("UNKNOWN_COMMAND"),
			serde_json::json!("INVALID_INPUT"),
			serde_json::json!("FILE_NOT_FOUND"),
			serde_json::Value::Null,
		]
	);
	assert_eq!(responses[4]["ok"], true);
}
