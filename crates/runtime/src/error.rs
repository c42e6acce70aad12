//! Error types for the browser runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating, launching or talking to the browser.
#[derive(Debug, Error)]
pub enum Error {
	/// No Chromium-family executable could be located.
	#[error("Chromium executable not found. Install Chrome/Chromium or set WA_CHROME_PATH.")]
	BrowserNotFound,

	/// Failed to launch the browser process.
	#[error("Failed to launch browser: {0}")]
	LaunchFailed(String),

	/// Failed to establish the DevTools WebSocket connection.
	#[error("Failed to connect to DevTools endpoint: {0}")]
	ConnectionFailed(String),

	/// Transport-level error (WebSocket read or write).
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Protocol-level error (unexpected frame or missing field).
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Error returned by the browser for a command.
	#[error("{method}: {message} ({code})")]
	Remote {
		/// Method that failed
		method: String,
		/// Protocol error code
		code: i64,
		/// Human-readable error message
		message: String,
	},

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A command got no response in time.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// Connection closed while a command was pending.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,
}

impl Error {
	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout(_))
	}

	/// Returns true when the browser side of the connection is gone.
	pub fn is_closed(&self) -> bool {
		match self {
			Error::ChannelClosed => true,
			Error::Remote { message, .. } => message.contains("Target closed") || message.contains("Session with given id not found"),
			_ => false,
		}
	}
}
