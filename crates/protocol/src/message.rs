//! DevTools protocol frames.
//!
//! Every frame on the socket is a JSON object. Commands carry an `id` and are
//! answered by a response with the same `id`. Events carry a `method` and no
//! `id`. In flattened target mode both may carry a `sessionId` naming the
//! attached page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
	/// Unique request ID for correlating the response
	pub id: u64,
	/// Domain-qualified method name (e.g. `Page.navigate`)
	pub method: String,
	/// Method parameters as a JSON object
	#[serde(default)]
	pub params: Value,
	/// Target session the command is addressed to (flattened mode)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Response to a [`Request`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
	/// Request ID this response correlates to
	pub id: u64,
	/// Success result (mutually exclusive with error)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	/// Error result (mutually exclusive with result)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorPayload>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Error object carried by a failed [`Response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
	/// JSON-RPC style error code (e.g. -32000 for generic server errors)
	pub code: i64,
	/// Human-readable error message
	pub message: String,
	/// Optional extra detail
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<String>,
}

/// Event emitted by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	/// Event method name (e.g. `Page.loadEventFired`)
	pub method: String,
	/// Event parameters
	#[serde(default)]
	pub params: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Discriminated union of inbound frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	/// Response frame (has `id` field)
	Response(Response),
	/// Event frame (no `id` field)
	Event(Event),
	/// Unknown frame shape (forward-compatible catch-all)
	Unknown(Value),
}
