//! Batch mode: NDJSON requests on stdin, one NDJSON response per line on stdout.
//!
//! ```text
//! $ wa run
//! {"id":1,"command":"send","args":{"contact":"John Doe","message":"Hello"}}
//! {"schemaVersion":1,"id":1,"ok":true,"command":"send","data":{...}}
//! {"command":"quit"}
//! {"schemaVersion":1,"ok":true,"command":"quit"}
//! ```
//!
//! | Command | Args |
//! |---------|------|
//! | `send` | `contact`, `message` |
//! | `send-media` | `contact`, `file` |
//! | `last-message` | `contact` |
//! | `ping` | - |
//! | `quit` / `exit` | - |
//!
//! The browser is started on the first request that needs it and reused
//! until stdin closes. A failed request does not end the batch.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

use super::{last_message, send, send_media};
use crate::context::CommandContext;
use crate::error::{Result, WaError};
use crate::output::{Artifact, CommandError, ErrorCode, SCHEMA_VERSION};
use crate::session::Session;

/// One line of batch input.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
	/// Echoed back unchanged.
	#[serde(default)]
	pub id: Option<serde_json::Value>,
	pub command: String,
	#[serde(default)]
	pub args: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
	pub schema_version: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<serde_json::Value>,
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub artifacts: Vec<Artifact>,
}

impl BatchResponse {
	fn success(id: Option<serde_json::Value>, command: &str, data: Option<serde_json::Value>) -> Self {
		Self {
			schema_version: SCHEMA_VERSION,
			id,
			ok: true,
			command: command.to_string(),
			data,
			error: None,
			artifacts: Vec::new(),
		}
	}

	fn failure(id: Option<serde_json::Value>, command: &str, error: CommandError) -> Self {
		Self {
			schema_version: SCHEMA_VERSION,
			id,
			ok: false,
			command: command.to_string(),
			data: None,
			error: Some(error),
			artifacts: Vec::new(),
		}
	}

	fn from_error(id: Option<serde_json::Value>, command: &str, err: WaError) -> Self {
		let artifacts = err.failure_with_artifacts().map(|f| f.artifacts.clone()).unwrap_or_default();
		let mut response = Self::failure(id, command, err.to_command_error());
		response.artifacts = artifacts;
		response
	}

	fn code(id: Option<serde_json::Value>, command: &str, code: ErrorCode, message: impl Into<String>) -> Self {
		Self::failure(
			id,
			command,
			CommandError {
				code,
				message: message.into(),
				details: None,
			},
		)
	}
}

/// What the loop should do after a line.
#[derive(Debug)]
enum Step {
	Reply(BatchResponse),
	Quit(BatchResponse),
}

/// Browser session shared across requests, started on first use.
struct LazySession<'a> {
	ctx: &'a CommandContext,
	session: Option<Session>,
}

impl<'a> LazySession<'a> {
	fn new(ctx: &'a CommandContext) -> Self {
		Self { ctx, session: None }
	}

	async fn get(&mut self, command: &'static str) -> Result<&Session> {
		if self.session.is_none() {
			let session = Session::start(self.ctx.settings.client.clone(), command, self.ctx.artifacts_dir()).await?;
			self.session = Some(session);
		}
		self.session
			.as_ref()
			.ok_or_else(|| WaError::Client(wa::Error::NotInitialized))
	}

	async fn close(self) {
		if let Some(session) = self.session {
			session.close().await;
		}
	}
}

pub async fn execute(ctx: &CommandContext) -> Result<()> {
	let mut reader = BufReader::new(tokio::io::stdin());
	let mut stdout = std::io::stdout();
	let mut session = LazySession::new(ctx);
	let mut line = String::new();

	loop {
		line.clear();
		match reader.read_line(&mut line).await {
			Ok(0) => break,
			Ok(_) => {}
			Err(e) => {
				error!(target = "wa", error = %e, "stdin read failed");
				break;
			}
		}

		let trimmed = line.trim();
		if trimmed.is_empty() {
			continue;
		}

		let request = match parse_request(trimmed) {
			Ok(request) => request,
			Err(response) => {
				write_response(&mut stdout, &response);
				continue;
			}
		};
		debug!(target = "wa", command = %request.command, "batch request");

		match handle(request, &mut session).await {
			Step::Reply(response) => write_response(&mut stdout, &response),
			Step::Quit(response) => {
				write_response(&mut stdout, &response);
				break;
			}
		}
	}

	session.close().await;
	Ok(())
}

fn parse_request(line: &str) -> std::result::Result<BatchRequest, BatchResponse> {
	serde_json::from_str(line).map_err(|e| BatchResponse::code(None, "unknown", ErrorCode::ParseError, e.to_string()))
}

async fn handle(request: BatchRequest, session: &mut LazySession<'_>) -> Step {
	let BatchRequest { id, command, args } = request;
	match command.as_str() {
		"ping" => Step::Reply(BatchResponse::success(id, "ping", None)),
		"quit" | "exit" => Step::Quit(BatchResponse::success(id, "quit", None)),
		"send" | "send-message" => {
			let name = "send";
			let outcome = async {
				let args = parse_args::<send::SendRaw>(args)?.resolve()?;
				let ctx = session.ctx;
				let dir = ctx.artifacts_dir();
				let session = session.get(name).await?;
				let outcome = send::execute_resolved(&args, session.client()).await;
				finish(session, name, dir, outcome).await
			}
			.await;
			Step::Reply(respond(id, name, outcome))
		}
		"send-media" => {
			let name = "send-media";
			let outcome = async {
				let args = parse_args::<send_media::SendMediaRaw>(args)?.resolve()?;
				let ctx = session.ctx;
				let dir = ctx.artifacts_dir();
				let session = session.get(name).await?;
				let outcome = send_media::execute_resolved(&args, session.client()).await;
				finish(session, name, dir, outcome).await
			}
			.await;
			Step::Reply(respond(id, name, outcome))
		}
		"last-message" | "last" => {
			let name = "last-message";
			let outcome = async {
				let args = parse_args::<last_message::LastMessageRaw>(args)?.resolve()?;
				let ctx = session.ctx;
				let dir = ctx.artifacts_dir();
				let session = session.get(name).await?;
				let outcome = last_message::execute_resolved(&args, session.client()).await;
				finish(session, name, dir, outcome).await
			}
			.await;
			Step::Reply(respond(id, name, outcome))
		}
		other => Step::Reply(BatchResponse::code(
			id,
			other,
			ErrorCode::UnknownCommand,
			format!("unknown batch command: {other}"),
		)),
	}
}

fn parse_args<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T> {
	let args = if args.is_null() { serde_json::json!({}) } else { args };
	serde_json::from_value(args).map_err(|e| WaError::InvalidInput(e.to_string()))
}

/// Attaches failure artifacts without closing the shared session.
async fn finish<T: Serialize>(
	session: &Session,
	command: &'static str,
	artifacts_dir: Option<&Path>,
	outcome: Result<T>,
) -> Result<serde_json::Value> {
	match outcome {
		Ok(data) => Ok(serde_json::to_value(data)?),
		Err(err) => Err(session.fail(command, artifacts_dir, err).await),
	}
}

fn respond(id: Option<serde_json::Value>, command: &str, outcome: Result<serde_json::Value>) -> BatchResponse {
	match outcome {
		Ok(data) => BatchResponse::success(id, command, Some(data)),
		Err(err) => BatchResponse::from_error(id, command, err),
	}
}

fn write_response(stdout: &mut std::io::Stdout, response: &BatchResponse) {
	if let Ok(json) = serde_json::to_string(response) {
		let _ = writeln!(stdout, "{json}");
		let _ = stdout.flush();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn response_json(response: &BatchResponse) -> serde_json::Value {
		serde_json::to_value(response).unwrap()
	}

	#[test]
	fn parses_request_with_numeric_id() {
		let request = parse_request(r#"{"id":7,"command":"send","args":{"contact":"Bob","message":"hi"}}"#).unwrap();
		assert_eq!(request.id, Some(serde_json::json!(7)));
		assert_eq!(request.command, "send");
		assert_eq!(request.args["contact"], "Bob");
	}

	#[test]
	fn args_default_to_null() {
		let request = parse_request(r#"{"command":"ping"}"#).unwrap();
		assert!(request.id.is_none());
		assert!(request.args.is_null());
	}

	#[test]
	fn malformed_line_is_a_parse_error() {
		let response = parse_request("{not json").unwrap_err();
		let json = response_json(&response);
		assert_eq!(json["ok"], false);
		assert_eq!(json["command"], "unknown");
		assert_eq!(json["error"]["code"], "PARSE_ERROR");
	}

	#[test]
	fn success_omits_empty_fields() {
		let json = response_json(&BatchResponse::success(Some("a".into()), "ping", None));
		assert_eq!(
			json,
			serde_json::json!({ "schemaVersion": SCHEMA_VERSION, "id": "a", "ok": true, "command": "ping" })
		);
	}

	#[test]
	fn null_args_parse_as_empty_object() {
		let err = parse_args::<send::SendRaw>(serde_json::Value::Null)
			.unwrap()
			.resolve()
			.unwrap_err();
		assert!(matches!(err, WaError::InvalidInput(m) if m.contains("contact")));
	}

	#[test]
	fn client_errors_keep_their_code() {
		let err = WaError::from(wa::Error::FileNotFound("/tmp/x.jpg".into()));
		let json = response_json(&BatchResponse::from_error(None, "send-media", err));
		assert_eq!(json["error"]["code"], "FILE_NOT_FOUND");
		assert_eq!(json["error"]["details"]["path"], "/tmp/x.jpg");
	}
}
