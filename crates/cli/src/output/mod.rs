//! Structured output envelope for all CLI commands.
//!
//! Every command produces a result envelope on stdout:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": true,
//!   "command": "last-message",
//!   "inputs": { "contact": "John Doe" },
//!   "data": { "kind": "text", "text": "see you", "summary": "Text message: see you" },
//!   "timings": { "durationMs": 9120 }
//! }
//! ```
//!
//! On failure `data` is absent and `error` carries a stable code:
//!
//! ```json
//! {
//!   "ok": false,
//!   "command": "send-media",
//!   "error": { "code": "FILE_NOT_FOUND", "message": "the file path does not exist: cat.jpg" }
//! }
//! ```

#[cfg(test)]
mod tests;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use colored::Colorize;
use serde::{Deserialize, Serialize};
use wa::MessageKind;

/// Bumped on breaking changes to the envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// TOON output (default, token-efficient for LLMs)
	#[default]
	Toon,
	/// JSON output
	Json,
	/// Newline-delimited JSON (streaming)
	Ndjson,
	/// Human-readable text
	Text,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"toon" => Ok(OutputFormat::Toon),
			"json" => Ok(OutputFormat::Json),
			"ndjson" => Ok(OutputFormat::Ndjson),
			"text" => Ok(OutputFormat::Text),
			_ => Err(format!("unknown format: {s}")),
		}
	}
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Toon => write!(f, "toon"),
			OutputFormat::Json => write!(f, "json"),
			OutputFormat::Ndjson => write!(f, "ndjson"),
			OutputFormat::Text => write!(f, "text"),
		}
	}
}

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,

	pub ok: bool,

	/// Command name (e.g., "send", "send-media", "last-message")
	pub command: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub inputs: Option<CommandInputs>,

	/// Command-specific result data (only present on success)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	/// Error information (only present on failure)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,

	/// Files written by the command (failure screenshots, page HTML)
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub artifacts: Vec<Artifact>,
}

/// Inputs that were used for the command (for traceability)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandInputs {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub contact: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub file: Option<PathBuf>,

	/// Additional command-specific inputs
	#[serde(flatten, skip_serializing_if = "Option::is_none")]
	pub extra: Option<serde_json::Value>,
}

/// Error information for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,

	pub message: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// No browser found, or it failed to start
	BrowserLaunchFailed,
	/// Opening the web app failed
	NavigationFailed,
	/// An expected element never appeared
	SelectorNotFound,
	/// Element present but not clickable
	ElementNotInteractable,
	/// Operation timed out
	Timeout,
	/// In-page script threw
	JsEvalFailed,
	/// Media file to send does not exist
	FileNotFound,
	/// The chat list never appeared; the QR code was not scanned
	LoginRequired,
	/// File I/O error
	IoError,
	/// DevTools connection or session error
	SessionError,
	/// Invalid input provided
	InvalidInput,
	/// Config file could not be read or written
	ConfigError,
	/// Batch line was not valid JSON
	ParseError,
	/// Batch command name not recognized
	UnknownCommand,
	/// Unknown/internal error
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let code = match self {
			ErrorCode::BrowserLaunchFailed => "BROWSER_LAUNCH_FAILED",
			ErrorCode::NavigationFailed => "NAVIGATION_FAILED",
			ErrorCode::SelectorNotFound => "SELECTOR_NOT_FOUND",
			ErrorCode::ElementNotInteractable => "ELEMENT_NOT_INTERACTABLE",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::JsEvalFailed => "JS_EVAL_FAILED",
			ErrorCode::FileNotFound => "FILE_NOT_FOUND",
			ErrorCode::LoginRequired => "LOGIN_REQUIRED",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::SessionError => "SESSION_ERROR",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::ConfigError => "CONFIG_ERROR",
			ErrorCode::ParseError => "PARSE_ERROR",
			ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		};
		f.write_str(code)
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

/// File produced by a command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
	#[serde(rename = "type")]
	pub artifact_type: ArtifactType,

	pub path: PathBuf,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
	Screenshot,
	Html,
}

/// Builder for constructing command results
pub struct ResultBuilder<T: Serialize> {
	command: String,
	inputs: Option<CommandInputs>,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Instant,
	artifacts: Vec<Artifact>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			inputs: None,
			data: None,
			error: None,
			start_time: Instant::now(),
			artifacts: Vec::new(),
		}
	}

	/// Measure the duration from `start` instead of from builder creation.
	pub fn started_at(mut self, start: Instant) -> Self {
		self.start_time = start;
		self
	}

	pub fn inputs(mut self, inputs: CommandInputs) -> Self {
		self.inputs = Some(inputs);
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
			details: None,
		});
		self
	}

	pub fn command_error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
		self.artifacts.extend(artifacts);
		self
	}

	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();

		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok,
			command: self.command,
			inputs: self.inputs,
			data: self.data,
			error: self.error,
			timings: Some(Timings::from(self.start_time.elapsed())),
			artifacts: self.artifacts,
		}
	}
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Toon => {
			if let Ok(json_value) = serde_json::to_value(result) {
				println!("{}", toon::encode(&json_value, None));
			}
		}
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => print_result_text(result),
	}
}

/// Text mode prints a `summary` field verbatim when the data has one.
fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();

	if result.ok {
		if let Some(data) = result.data.as_ref().and_then(|d| serde_json::to_value(d).ok()) {
			match data.get("summary").and_then(serde_json::Value::as_str) {
				Some(summary) => {
					let _ = writeln!(stdout, "{summary}");
				}
				None => {
					if let Ok(json) = serde_json::to_string_pretty(&data) {
						let _ = writeln!(stdout, "{json}");
					}
				}
			}
		}
	} else if let Some(ref error) = result.error {
		let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
		if let Some(ref details) = error.details {
			if let Ok(json) = serde_json::to_string_pretty(details) {
				let _ = writeln!(stdout, "Details: {json}");
			}
		}
	}

	for artifact in &result.artifacts {
		let _ = writeln!(stdout, "Saved {:?}: {}", artifact.artifact_type, artifact.path.display());
	}
}

/// Print an error to stderr in human-readable format
pub fn print_error_stderr(error: &CommandError) {
	if io::stderr().is_terminal() {
		eprintln!("{} [{}]: {}", "Error".red().bold(), error.code, error.message);
	} else {
		eprintln!("Error [{}]: {}", error.code, error.message);
	}
}

/// A command failure together with the artifacts captured for it.
#[derive(Debug)]
pub struct FailureWithArtifacts {
	pub error: CommandError,
	pub artifacts: Vec<Artifact>,
}

impl FailureWithArtifacts {
	pub fn new(error: CommandError) -> Self {
		Self {
			error,
			artifacts: Vec::new(),
		}
	}

	pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
		self.artifacts = artifacts;
		self
	}
}

/// Print a failure result with artifacts to stdout
pub fn print_failure_with_artifacts(command: &str, failure: &FailureWithArtifacts, format: OutputFormat) {
	let result: CommandResult<()> = ResultBuilder::new(command)
		.command_error(failure.error.clone())
		.artifacts(failure.artifacts.clone())
		.build();
	print_result(&result, format);
}

/// Result data for `open`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenData {
	pub url: String,
	pub session_dir: PathBuf,
	pub logged_in: bool,
	pub waited_ms: u64,
}

/// Result data for `send`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendData {
	pub contact: String,
	pub message: String,
	pub summary: String,
}

/// Result data for `send-media`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMediaData {
	pub contact: String,
	/// Absolute path that was uploaded
	pub file: PathBuf,
	pub summary: String,
}

/// Result data for `last-message`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageData {
	pub contact: String,
	#[serde(flatten)]
	pub message: MessageKind,
	/// Human label, e.g. `Text message: hi` or `Unknown message type`
	pub summary: String,
}

impl LastMessageData {
	pub fn new(contact: impl Into<String>, message: MessageKind) -> Self {
		Self {
			contact: contact.into(),
			summary: message.to_string(),
			message,
		}
	}
}

/// Result data for `config show|set|unset`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigData {
	pub path: PathBuf,
	pub exists: bool,
	pub config: crate::config::CliConfig,
}

/// Result data for `config path`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPathData {
	pub path: PathBuf,
	pub summary: String,
}
