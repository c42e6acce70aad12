//! Classification of a received message bubble by the markup it contains.

use std::fmt;
use std::future::Future;

use serde::Serialize;

use super::selectors::{DOCUMENT_THUMBNAIL, IMAGE_BLOB, TEXT_CONTENT, VIDEO_PLAY_ICON};
use crate::element::ElementHandle;
use crate::error::Result;
use crate::selector::Selector;

/// Kind of a received message, with the payload its rule extracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageKind {
	Text { text: String },
	Video,
	Image,
	Document { title: String },
	Unknown,
}

impl MessageKind {
	/// Short machine label: `text`, `video`, `image`, `document` or `unknown`.
	pub fn label(&self) -> &'static str {
		match self {
			MessageKind::Text { .. } => "text",
			MessageKind::Video => "video",
			MessageKind::Image => "image",
			MessageKind::Document { .. } => "document",
			MessageKind::Unknown => "unknown",
		}
	}
}

impl fmt::Display for MessageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MessageKind::Text { text } => write!(f, "Text message: {text}"),
			MessageKind::Video => f.write_str("Video message"),
			MessageKind::Image => f.write_str("Image message"),
			MessageKind::Document { title } => write!(f, "Document: {title}"),
			MessageKind::Unknown => f.write_str("Unknown message type"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
	Text,
	Video,
	Image,
	Document,
}

/// Tried in order; the first rule with any match decides.
const RULES: [(RuleKind, Selector); 4] = [
	(RuleKind::Text, TEXT_CONTENT),
	(RuleKind::Video, VIDEO_PLAY_ICON),
	(RuleKind::Image, IMAGE_BLOB),
	(RuleKind::Document, DOCUMENT_THUMBNAIL),
];

/// Subtree a message is classified within.
pub trait MessageScope: Sync {
	type Element: Send + Sync;

	/// First descendant matching `selector`, if any.
	fn find_first(&self, selector: &Selector) -> impl Future<Output = Result<Option<Self::Element>>> + Send;

	fn text_of(&self, element: &Self::Element) -> impl Future<Output = Result<String>> + Send;

	fn attribute_of(&self, element: &Self::Element, name: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}

impl MessageScope for ElementHandle {
	type Element = ElementHandle;

	async fn find_first(&self, selector: &Selector) -> Result<Option<ElementHandle>> {
		self.query(selector).await
	}

	async fn text_of(&self, element: &ElementHandle) -> Result<String> {
		element.text().await
	}

	async fn attribute_of(&self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
		element.attribute(name).await
	}
}

/// Classifies the message rooted at `scope`.
///
/// Payloads are read from the first element matching the winning rule.
pub async fn classify<S: MessageScope>(scope: &S) -> Result<MessageKind> {
	for (rule, selector) in &RULES {
		let Some(element) = scope.find_first(selector).await? else {
			continue;
		};
		tracing::debug!(target = "wa", rule = ?rule, "message rule matched");

		return Ok(match rule {
			RuleKind::Text => MessageKind::Text {
				text: scope.text_of(&element).await?,
			},
			RuleKind::Video => MessageKind::Video,
			RuleKind::Image => MessageKind::Image,
			RuleKind::Document => MessageKind::Document {
				title: scope.attribute_of(&element, "title").await?.unwrap_or_default(),
			},
		});
	}
	Ok(MessageKind::Unknown)
}
