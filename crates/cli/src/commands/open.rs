//! Open the web app and wait for login.

use std::time::{Duration, Instant};

use tracing::info;

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{CommandInputs, OpenData, ResultBuilder, print_result};
use crate::session::Session;

const NAME: &str = "open";

/// Logs in (scanning the QR code on first use) and keeps the window open for `wait_ms`.
pub async fn execute(ctx: &CommandContext, wait_ms: u64) -> Result<()> {
	let start = Instant::now();
	let config = ctx.settings.client.clone();

	let session = Session::start(config.clone(), NAME, ctx.artifacts_dir()).await?;
	if wait_ms > 0 {
		info!(target = "wa", wait_ms, "keeping the window open");
		tokio::time::sleep(Duration::from_millis(wait_ms)).await;
	}
	session.close().await;

	let result = ResultBuilder::new(NAME)
		.started_at(start)
		.inputs(CommandInputs {
			extra: Some(serde_json::json!({ "waitMs": wait_ms })),
			..Default::default()
		})
		.data(OpenData {
			url: config.web_url,
			session_dir: config.session_dir,
			logged_in: true,
			waited_ms: wait_ms,
		})
		.build();
	print_result(&result, ctx.format);
	Ok(())
}
