//! [`Browser`] owning the DevTools connection, the attached page and (when
//! launched by us) the browser process.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, warn};
use wa_protocol::TargetInfo;
use wa_runtime::{BrowserProcess, Connection, LaunchOptions};

use crate::error::{Error, Result};
use crate::page::Page;

/// Time given to the process to exit after `Browser.close` before it is killed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct Browser {
	connection: Arc<Connection>,
	process: Option<BrowserProcess>,
	page: Page,
}

impl std::fmt::Debug for Browser {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Browser")
			.field("pid", &self.process.as_ref().and_then(BrowserProcess::id))
			.field("page", &self.page)
			.finish()
	}
}

impl Browser {
	/// Launches a browser with `options` and attaches to its first page.
	pub async fn launch(options: &LaunchOptions) -> Result<Self> {
		let process = BrowserProcess::launch(options).await?;
		let connection = wa_runtime::connect(process.ws_endpoint()).await?;
		let page = attach_page(&connection).await?;
		Ok(Self {
			connection,
			process: Some(process),
			page,
		})
	}

	/// Attaches to an already running browser. [`close`](Self::close) leaves it running.
	pub async fn connect(ws_endpoint: &str) -> Result<Self> {
		let connection = wa_runtime::connect(ws_endpoint).await?;
		let page = attach_page(&connection).await?;
		Ok(Self {
			connection,
			process: None,
			page,
		})
	}

	pub fn page(&self) -> &Page {
		&self.page
	}

	/// Wraps an already attached page, leaving no process to manage.
	#[cfg(test)]
	pub(crate) fn attached(connection: Arc<Connection>, page: Page) -> Self {
		Self {
			connection,
			process: None,
			page,
		}
	}

	/// Closes the browser, or detaches when it was connected to.
	pub async fn close(self) -> Result<()> {
		let Some(process) = self.process else {
			let _ = self
				.connection
				.send(None, "Target.detachFromTarget", json!({ "sessionId": self.page.session_id() }))
				.await;
			debug!(target = "wa", "detached from external browser");
			return Ok(());
		};

		if let Err(e) = self.connection.send(None, "Browser.close", json!({})).await {
			// The socket usually drops before the reply arrives.
			if !e.is_closed() {
				warn!(target = "wa", error = %e, "Browser.close failed");
			}
		}
		process.shutdown(SHUTDOWN_GRACE).await?;
		Ok(())
	}
}

/// Picks an existing page target (or creates one) and attaches in flattened mode.
async fn attach_page(connection: &Arc<Connection>) -> Result<Page> {
	let targets = connection.send(None, "Target.getTargets", json!({})).await?;
	let infos: Vec<TargetInfo> =
		serde_json::from_value(targets.get("targetInfos").cloned().unwrap_or(Value::Array(Vec::new())))?;

	let target_id = match infos.into_iter().find(TargetInfo::is_page) {
		Some(info) => info.target_id,
		None => {
			let created = connection
				.send(None, "Target.createTarget", json!({ "url": "about:blank" }))
				.await?;
			string_field(&created, "targetId")?
		}
	};

	let attached = connection
		.send(
			None,
			"Target.attachToTarget",
			json!({ "targetId": target_id, "flatten": true }),
		)
		.await?;
	let session_id = string_field(&attached, "sessionId")?;
	debug!(target = "wa", %target_id, %session_id, "attached to page");

	let page = Page::new(Arc::clone(connection), session_id, target_id);
	page.send("Page.enable", json!({})).await?;
	Ok(page)
}

fn string_field(value: &Value, field: &str) -> Result<String> {
	value
		.get(field)
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| Error::Protocol(format!("missing {field}")))
}
