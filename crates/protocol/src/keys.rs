//! Keyboard key definitions for `Input.dispatchKeyEvent`.
//!
//! Chromium needs the DOM `key`, the physical `code` and the Windows virtual
//! key code to synthesize a key press that pages observe as real input.

use serde::{Deserialize, Serialize};

/// Named keys that can be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
	Enter,
}

/// Static description of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDefinition {
	pub key: &'static str,
	pub code: &'static str,
	pub key_code: u32,
	/// Text produced by the key, if any
	pub text: Option<&'static str>,
}

impl Key {
	pub fn definition(self) -> KeyDefinition {
		match self {
			Key::Enter => KeyDefinition {
				key: "Enter",
				code: "Enter",
				key_code: 13,
				text: Some("\r"),
			},
		}
	}
}

impl std::fmt::Display for Key {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.definition().key)
	}
}
