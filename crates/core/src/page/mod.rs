//! [`Page`] handle for a single attached browser tab.

mod eval;
mod input;
mod screenshot;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::debug;
use wa_runtime::Connection;

use crate::element::ElementHandle;
use crate::error::{Error, Result};
use crate::selector::Selector;
use crate::wait::{DEFAULT_POLL_INTERVAL, poll_until};

/// Upper bound for a navigation to reach `document.readyState == "complete"`.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// A browser tab reached through a flattened DevTools session.
///
/// Cloning is cheap; clones share the connection and session.
#[derive(Clone)]
pub struct Page {
	connection: Arc<Connection>,
	session_id: Arc<str>,
	target_id: Arc<str>,
}

impl std::fmt::Debug for Page {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Page")
			.field("session_id", &self.session_id)
			.field("target_id", &self.target_id)
			.finish()
	}
}

impl Page {
	pub(crate) fn new(connection: Arc<Connection>, session_id: impl Into<Arc<str>>, target_id: impl Into<Arc<str>>) -> Self {
		Self {
			connection,
			session_id: session_id.into(),
			target_id: target_id.into(),
		}
	}

	pub fn session_id(&self) -> &str {
		&self.session_id
	}

	pub fn target_id(&self) -> &str {
		&self.target_id
	}

	/// Sends a command scoped to this page's session.
	pub async fn send(&self, method: &str, params: Value) -> Result<Value> {
		Ok(self.connection.send(Some(&self.session_id), method, params).await?)
	}

	/// Navigates to `url` and waits for the load to complete.
	pub async fn goto(&self, url: &str) -> Result<()> {
		self.goto_with_timeout(url, DEFAULT_NAVIGATION_TIMEOUT).await
	}

	pub async fn goto_with_timeout(&self, url: &str, timeout: Duration) -> Result<()> {
		debug!(target = "wa", url, "navigating");
		let result = self.send("Page.navigate", json!({ "url": url })).await?;

		if let Some(reason) = result.get("errorText").and_then(Value::as_str).filter(|s| !s.is_empty()) {
			return Err(Error::Navigation {
				url: url.to_string(),
				reason: reason.to_string(),
			});
		}

		poll_until(timeout, DEFAULT_POLL_INTERVAL, &format!("load of {url}"), || async {
			let state = self.evaluate("document.readyState").await?;
			Ok((state.as_str() == Some("complete")).then_some(()))
		})
		.await
	}

	/// All elements currently matching `selector`, in document order.
	pub async fn query_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>> {
		let array = self.evaluate_handle(&selector.document_query()).await?;
		let Some(object_id) = array.object_id else {
			return Ok(Vec::new());
		};
		let nodes = self.array_elements(&object_id).await;
		self.release_object(&object_id).await;
		nodes
	}

	/// First element matching `selector`, if any.
	pub async fn query(&self, selector: &Selector) -> Result<Option<ElementHandle>> {
		Ok(self.query_all(selector).await?.into_iter().next())
	}

	/// Waits up to `timeout` for `selector` to match and returns the first match.
	pub async fn wait_for_selector_with_timeout(&self, selector: &Selector, timeout: Duration) -> Result<ElementHandle> {
		poll_until(timeout, DEFAULT_POLL_INTERVAL, &selector.to_string(), || async {
			self.query(selector).await
		})
		.await
		.map_err(|e| not_found(e, selector))
	}

	/// Waits until `selector` matches at least one element and returns every match.
	pub async fn wait_for_all(&self, selector: &Selector, timeout: Duration) -> Result<Vec<ElementHandle>> {
		poll_until(timeout, DEFAULT_POLL_INTERVAL, &selector.to_string(), || async {
			let nodes = self.query_all(selector).await?;
			Ok((!nodes.is_empty()).then_some(nodes))
		})
		.await
		.map_err(|e| not_found(e, selector))
	}

	pub async fn url(&self) -> Result<String> {
		self.evaluate_string("location.href").await
	}

	pub async fn title(&self) -> Result<String> {
		self.evaluate_string("document.title").await
	}

	/// Full serialized HTML of the document.
	pub async fn content(&self) -> Result<String> {
		self.evaluate_string("document.documentElement ? document.documentElement.outerHTML : ''").await
	}

	async fn evaluate_string(&self, expression: &str) -> Result<String> {
		match self.evaluate(expression).await? {
			Value::String(s) => Ok(s),
			Value::Null => Ok(String::new()),
			other => Err(Error::Protocol(format!("{expression} evaluated to {other}"))),
		}
	}

	/// Splits a remote array into handles for its node elements.
	pub(crate) async fn array_elements(&self, array_id: &str) -> Result<Vec<ElementHandle>> {
		let result = self
			.send(
				"Runtime.getProperties",
				json!({ "objectId": array_id, "ownProperties": true }),
			)
			.await?;
		let properties: Vec<wa_protocol::PropertyDescriptor> =
			serde_json::from_value(result.get("result").cloned().unwrap_or(Value::Array(Vec::new())))?;

		let mut indexed: Vec<(usize, ElementHandle)> = properties
			.into_iter()
			.filter_map(|prop| {
				let index = prop.name.parse::<usize>().ok()?;
				let value = prop.value?;
				if !value.is_node() {
					return None;
				}
				let object_id = value.object_id?;
				Some((index, ElementHandle::new(self.clone(), object_id, value.description)))
			})
			.collect();
		indexed.sort_by_key(|(index, _)| *index);
		Ok(indexed.into_iter().map(|(_, handle)| handle).collect())
	}
}

fn not_found(err: Error, selector: &Selector) -> Error {
	match err {
		Error::Timeout { ms, .. } => Error::ElementNotFound {
			selector: selector.to_string(),
			ms,
		},
		other => other,
	}
}
