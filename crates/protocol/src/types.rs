//! Value types that appear inside command parameters and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mirror object referencing a JavaScript value in the page (`Runtime.RemoteObject`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	/// Object type (`object`, `string`, `number`, `undefined`, ...)
	#[serde(rename = "type")]
	pub kind: String,
	/// Object subtype hint (`node`, `array`, `null`, ...)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtype: Option<String>,
	/// Remote handle, present for non-primitive values
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub object_id: Option<String>,
	/// Primitive value or JSON value when requested by value
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

impl RemoteObject {
	/// Returns true when this object is a DOM node.
	pub fn is_node(&self) -> bool {
		self.subtype.as_deref() == Some("node")
	}
}

/// One entry of a `Runtime.getProperties` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
	pub name: String,
	#[serde(default)]
	pub value: Option<RemoteObject>,
	#[serde(default)]
	pub enumerable: bool,
}

/// Details of a thrown exception (`Runtime.ExceptionDetails`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	pub text: String,
	#[serde(default)]
	pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
	/// Best human-readable message: the exception description, else the summary text.
	pub fn message(&self) -> String {
		self.exception
			.as_ref()
			.and_then(|e| e.description.clone())
			.unwrap_or_else(|| self.text.clone())
	}
}

/// Description of a debuggable target (`Target.TargetInfo`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
	pub target_id: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub attached: bool,
}

impl TargetInfo {
	pub fn is_page(&self) -> bool {
		self.kind == "page"
	}
}

/// Mouse button for `Input.dispatchMouseEvent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
	None,
	#[default]
	Left,
	Middle,
	Right,
}

/// Mouse event type for `Input.dispatchMouseEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventType {
	#[serde(rename = "mouseMoved")]
	Moved,
	#[serde(rename = "mousePressed")]
	Pressed,
	#[serde(rename = "mouseReleased")]
	Released,
}

/// Key event type for `Input.dispatchKeyEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEventType {
	#[serde(rename = "keyDown")]
	KeyDown,
	#[serde(rename = "keyUp")]
	KeyUp,
	#[serde(rename = "rawKeyDown")]
	RawKeyDown,
	#[serde(rename = "char")]
	Char,
}

/// Screenshot image format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
	/// PNG format (lossless)
	#[default]
	Png,
	/// JPEG format (lossy, smaller)
	Jpeg,
}

/// Viewport point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}
