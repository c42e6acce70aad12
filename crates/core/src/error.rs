//! Error type for page automation and the WhatsApp client.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for `wa` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// Browser discovery, launch or connection failure.
	#[error(transparent)]
	Runtime(#[from] wa_runtime::Error),

	/// No element matched within the element timeout.
	#[error("element not found within {ms}ms: {selector}")]
	ElementNotFound { selector: String, ms: u64 },

	/// A bounded wait expired before its condition held.
	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	/// Navigation was rejected by the browser.
	#[error("navigation to {url} failed: {reason}")]
	Navigation { url: String, reason: String },

	/// Script evaluated in the page threw.
	#[error("javascript exception: {0}")]
	JsException(String),

	/// Element exists but cannot receive pointer input.
	#[error("element not interactable: {0}")]
	NotInteractable(String),

	/// Media file to upload does not exist.
	#[error("the file path does not exist: {}", .0.display())]
	FileNotFound(PathBuf),

	/// An operation ran before [`WhatsAppWeb::initialize_driver`](crate::whatsapp::WhatsAppWeb::initialize_driver).
	#[error("driver not initialized; call initialize_driver() first")]
	NotInitialized,

	/// The chat list never appeared after opening the web app.
	#[error("not logged in after {ms}ms; scan the QR code in the browser window and retry")]
	LoginTimeout { ms: u64 },

	/// Command result did not have the expected shape.
	#[error("unexpected protocol result: {0}")]
	Protocol(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl Error {
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Timeout { .. } | Error::LoginTimeout { .. } | Error::ElementNotFound { .. } => true,
			Error::Runtime(e) => e.is_timeout(),
			_ => false,
		}
	}
}
