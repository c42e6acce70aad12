use thiserror::Error;

use crate::output::{CommandError, ErrorCode, FailureWithArtifacts};

pub type Result<T> = std::result::Result<T, WaError>;

#[derive(Debug, Error)]
pub enum WaError {
	/// Failure that already carries captured artifacts.
	#[error("{}", .failure.error.message)]
	FailureWithArtifacts {
		command: &'static str,
		failure: FailureWithArtifacts,
	},

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("config error: {0:#}")]
	Config(anyhow::Error),

	#[error(transparent)]
	Client(#[from] wa::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl WaError {
	pub fn failure_with_artifacts(&self) -> Option<&FailureWithArtifacts> {
		match self {
			WaError::FailureWithArtifacts { failure, .. } => Some(failure),
			_ => None,
		}
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			WaError::FailureWithArtifacts { failure, .. } => return failure.error.clone(),
			WaError::InvalidInput(msg) => (ErrorCode::InvalidInput, msg.clone(), None),
			WaError::Config(err) => (ErrorCode::ConfigError, format!("{err:#}"), None),
			WaError::Client(err) => return client_error(err),
			WaError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			WaError::Json(err) => (ErrorCode::InternalError, format!("JSON error: {err}"), None),
		};

		CommandError { code, message, details }
	}
}

/// Maps a library error to its stable code, with details where they help.
pub fn client_error(err: &wa::Error) -> CommandError {
	use wa::Error as E;
	use wa::RuntimeError as R;

	let message = err.to_string();
	let (code, details) = match err {
		E::Runtime(runtime) => (
			match runtime {
				R::BrowserNotFound | R::LaunchFailed(_) => ErrorCode::BrowserLaunchFailed,
				R::Timeout(_) => ErrorCode::Timeout,
				R::Io(_) => ErrorCode::IoError,
				R::Json(_) => ErrorCode::InternalError,
				R::ConnectionFailed(_)
				| R::TransportError(_)
				| R::ProtocolError(_)
				| R::Remote { .. }
				| R::ChannelClosed => ErrorCode::SessionError,
			},
			None,
		),
		E::ElementNotFound { selector, ms } => (
			ErrorCode::SelectorNotFound,
			Some(serde_json::json!({ "selector": selector, "timeoutMs": ms })),
		),
		E::Timeout { ms, condition } => (
			ErrorCode::Timeout,
			Some(serde_json::json!({ "timeoutMs": ms, "condition": condition })),
		),
		E::Navigation { url, .. } => (ErrorCode::NavigationFailed, Some(serde_json::json!({ "url": url }))),
		E::JsException(_) => (ErrorCode::JsEvalFailed, None),
		E::NotInteractable(_) => (ErrorCode::ElementNotInteractable, None),
		E::FileNotFound(path) => (ErrorCode::FileNotFound, Some(serde_json::json!({ "path": path }))),
		E::LoginTimeout { ms } => (ErrorCode::LoginRequired, Some(serde_json::json!({ "timeoutMs": ms }))),
		E::NotInitialized | E::Protocol(_) => (ErrorCode::SessionError, None),
		E::Io(_) => (ErrorCode::IoError, None),
		E::Json(_) => (ErrorCode::InternalError, None),
	};

	CommandError { code, message, details }
}
