//! [`ElementHandle`] referencing a DOM node in a [`Page`].

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Value, json};
use wa_protocol::{Key, Point};

use crate::error::{Error, Result};
use crate::page::Page;
use crate::selector::Selector;

const SCROLL_AND_MEASURE_FN: &str = "function() { \
	this.scrollIntoView({ block: 'center', inline: 'center' }); \
	const r = this.getBoundingClientRect(); \
	return { x: r.left, y: r.top, width: r.width, height: r.height }; \
}";

/// Focuses the editing host containing the node; a no-op when it already has focus.
const FOCUS_FN: &str = "function() { \
	const host = (this.closest && this.closest('[contenteditable=\"true\"]')) || this; \
	if (document.activeElement !== host && typeof host.focus === 'function') host.focus(); \
}";

const CLEAR_FN: &str = "function() { \
	this.focus(); \
	if ('value' in this) { \
		this.value = ''; \
		this.dispatchEvent(new Event('input', { bubbles: true })); \
		return; \
	} \
	const selection = window.getSelection(); \
	const range = document.createRange(); \
	range.selectNodeContents(this); \
	selection.removeAllRanges(); \
	selection.addRange(range); \
	document.execCommand('delete'); \
}";

#[derive(Debug, Deserialize)]
struct BoundingBox {
	x: f64,
	y: f64,
	width: f64,
	height: f64,
}

/// A live reference to one element.
///
/// Becomes stale if the node is removed or after [`Page::release_handles`].
#[derive(Debug, Clone)]
pub struct ElementHandle {
	page: Page,
	object_id: String,
	description: Option<String>,
}

impl ElementHandle {
	pub(crate) fn new(page: Page, object_id: String, description: Option<String>) -> Self {
		Self {
			page,
			object_id,
			description,
		}
	}

	pub fn object_id(&self) -> &str {
		&self.object_id
	}

	/// Short node description, e.g. `div.message-in`.
	pub fn description(&self) -> &str {
		self.description.as_deref().unwrap_or("element")
	}

	/// Scrolls the element into view and clicks its center.
	pub async fn click(&self) -> Result<()> {
		let object = self
			.page
			.call_function_on(&self.object_id, SCROLL_AND_MEASURE_FN, &[], true)
			.await?;
		let rect: BoundingBox = serde_json::from_value(object.value.unwrap_or(Value::Null))?;
		if rect.width <= 0.0 || rect.height <= 0.0 {
			return Err(Error::NotInteractable(format!("{} has no visible area", self.description())));
		}

		self.page
			.click_at(Point {
				x: rect.x + rect.width / 2.0,
				y: rect.y + rect.height / 2.0,
			})
			.await
	}

	/// Focuses the element, or the contenteditable host it sits in.
	pub async fn focus(&self) -> Result<()> {
		self.page.call_function_on(&self.object_id, FOCUS_FN, &[], true).await?;
		Ok(())
	}

	/// Empties an input or contenteditable element.
	pub async fn clear(&self) -> Result<()> {
		self.page.call_function_on(&self.object_id, CLEAR_FN, &[], true).await?;
		Ok(())
	}

	/// Focuses the element and inserts `text` at the caret.
	pub async fn type_text(&self, text: &str) -> Result<()> {
		self.focus().await?;
		self.page.insert_text(text).await
	}

	pub async fn press(&self, key: Key) -> Result<()> {
		self.focus().await?;
		self.page.press_key(key).await
	}

	/// Sets the files of an `<input type="file">`, firing its change event.
	pub async fn set_input_files(&self, files: &[PathBuf]) -> Result<()> {
		let files: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
		self.page
			.send(
				"DOM.setFileInputFiles",
				json!({ "files": files, "objectId": self.object_id }),
			)
			.await?;
		Ok(())
	}

	/// Elements under this one matching `selector`. XPath expressions should be relative (`.//`).
	pub async fn query_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>> {
		let array = self
			.page
			.call_function_on(
				&self.object_id,
				selector.query_function(),
				&[Value::String(selector.expression().to_string())],
				false,
			)
			.await?;
		let Some(array_id) = array.object_id else {
			return Ok(Vec::new());
		};
		let nodes = self.page.array_elements(&array_id).await;
		self.page.release_object(&array_id).await;
		nodes
	}

	pub async fn query(&self, selector: &Selector) -> Result<Option<ElementHandle>> {
		Ok(self.query_all(selector).await?.into_iter().next())
	}

	/// Rendered text (`innerText`, falling back to `textContent`).
	pub async fn text(&self) -> Result<String> {
		let object = self
			.page
			.call_function_on(
				&self.object_id,
				"function() { return this.innerText ?? this.textContent ?? ''; }",
				&[],
				true,
			)
			.await?;
		Ok(object.value.and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default())
	}

	pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
		let object = self
			.page
			.call_function_on(
				&self.object_id,
				"function(name) { return this.getAttribute(name); }",
				&[Value::String(name.to_string())],
				true,
			)
			.await?;
		Ok(object.value.and_then(|v| v.as_str().map(str::to_string)))
	}
}
