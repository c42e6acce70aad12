//! Keyboard and mouse input for [`Page`].

use serde_json::json;
use wa_protocol::{Key, KeyEventType, MouseButton, MouseEventType, Point};

use super::Page;
use crate::error::Result;

impl Page {
	/// Inserts `text` at the focused element as if typed or pasted.
	///
	/// Bypasses per-key dispatch, so emoji and other non-BMP characters arrive intact.
	pub async fn insert_text(&self, text: &str) -> Result<()> {
		self.send("Input.insertText", json!({ "text": text })).await?;
		Ok(())
	}

	/// Presses and releases `key` on the focused element.
	pub async fn press_key(&self, key: Key) -> Result<()> {
		let def = key.definition();
		let down_type = if def.text.is_some() {
			KeyEventType::KeyDown
		} else {
			KeyEventType::RawKeyDown
		};

		let mut down = json!({
			"type": down_type,
			"key": def.key,
			"code": def.code,
			"windowsVirtualKeyCode": def.key_code,
			"nativeVirtualKeyCode": def.key_code,
		});
		if let Some(text) = def.text {
			down["text"] = json!(text);
			down["unmodifiedText"] = json!(text);
		}
		self.send("Input.dispatchKeyEvent", down).await?;

		self.send(
			"Input.dispatchKeyEvent",
			json!({
				"type": KeyEventType::KeyUp,
				"key": def.key,
				"code": def.code,
				"windowsVirtualKeyCode": def.key_code,
				"nativeVirtualKeyCode": def.key_code,
			}),
		)
		.await?;
		Ok(())
	}

	/// Moves the mouse to `point` and clicks the left button once.
	pub async fn click_at(&self, point: Point) -> Result<()> {
		self.mouse_event(MouseEventType::Moved, point, MouseButton::None, 0).await?;
		self.mouse_event(MouseEventType::Pressed, point, MouseButton::Left, 1).await?;
		self.mouse_event(MouseEventType::Released, point, MouseButton::Left, 1).await
	}

	async fn mouse_event(&self, kind: MouseEventType, point: Point, button: MouseButton, click_count: u32) -> Result<()> {
		self.send(
			"Input.dispatchMouseEvent",
			json!({
				"type": kind,
				"x": point.x,
				"y": point.y,
				"button": button,
				"clickCount": click_count,
			}),
		)
		.await?;
		Ok(())
	}
}
