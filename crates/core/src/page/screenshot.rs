//! Screenshot capture for [`Page`].

use std::path::Path;

use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use wa_protocol::ScreenshotFormat;

use super::Page;
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct ScreenshotResponse {
	data: String,
}

impl Page {
	/// Captures the viewport and returns the encoded image bytes.
	pub async fn screenshot(&self, format: ScreenshotFormat) -> Result<Vec<u8>> {
		let result = self.send("Page.captureScreenshot", json!({ "format": format })).await?;
		let response: ScreenshotResponse = serde_json::from_value(result)?;

		base64::prelude::BASE64_STANDARD
			.decode(&response.data)
			.map_err(|e| Error::Protocol(format!("decode screenshot: {e}")))
	}

	/// Captures a PNG screenshot and writes it to `path`, creating parent directories.
	pub async fn screenshot_to_file(&self, path: &Path) -> Result<Vec<u8>> {
		let bytes = self.screenshot(ScreenshotFormat::Png).await?;
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(path, &bytes).await?;
		Ok(bytes)
	}
}
