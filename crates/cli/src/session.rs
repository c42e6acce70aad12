//! One browser session per CLI invocation, closed exactly once.

use std::path::Path;

use tracing::{debug, warn};
use wa::{WhatsAppConfig, WhatsAppWeb};

use crate::error::WaError;
use crate::output::{Artifact, ArtifactType, FailureWithArtifacts};

/// A started and logged-in [`WhatsAppWeb`] client.
pub struct Session {
	client: WhatsAppWeb,
}

impl Session {
	/// Launches the browser and waits for login.
	///
	/// On failure the browser is closed before returning, with artifacts
	/// captured first when `artifacts_dir` is set.
	pub async fn start(
		config: WhatsAppConfig,
		command: &'static str,
		artifacts_dir: Option<&Path>,
	) -> Result<Self, WaError> {
		let mut client = WhatsAppWeb::new(config);
		if let Err(err) = client.run().await {
			let err = with_artifacts(&client, command, artifacts_dir, err.into()).await;
			close_client(&mut client).await;
			return Err(err);
		}
		Ok(Self { client })
	}

	pub fn client(&self) -> &WhatsAppWeb {
		&self.client
	}

	/// Wraps `err` with failure artifacts from the current page, if enabled.
	pub async fn fail(&self, command: &'static str, artifacts_dir: Option<&Path>, err: WaError) -> WaError {
		with_artifacts(&self.client, command, artifacts_dir, err).await
	}

	pub async fn close(mut self) {
		close_client(&mut self.client).await;
	}

	/// Attaches artifacts to a failed `outcome`, then closes the session.
	pub async fn finish<T>(
		self,
		command: &'static str,
		artifacts_dir: Option<&Path>,
		outcome: Result<T, WaError>,
	) -> Result<T, WaError> {
		let outcome = match outcome {
			Ok(value) => Ok(value),
			Err(err) => Err(self.fail(command, artifacts_dir, err).await),
		};
		self.close().await;
		outcome
	}
}

async fn close_client(client: &mut WhatsAppWeb) {
	if let Err(e) = client.close().await {
		warn!(target = "wa", error = %e, "browser did not close cleanly");
	}
}

async fn with_artifacts(
	client: &WhatsAppWeb,
	command: &'static str,
	artifacts_dir: Option<&Path>,
	err: WaError,
) -> WaError {
	let Some(dir) = artifacts_dir else {
		return err;
	};
	let artifacts = collect_failure_artifacts(client, dir, command).await;
	if artifacts.is_empty() {
		return err;
	}
	WaError::FailureWithArtifacts {
		command,
		failure: FailureWithArtifacts::new(err.to_command_error()).with_artifacts(artifacts),
	}
}

/// Saves `<command>-failure.png` and `<command>-failure.html` into `dir`.
///
/// Best effort: anything that cannot be captured is skipped.
pub async fn collect_failure_artifacts(client: &WhatsAppWeb, dir: &Path, command: &str) -> Vec<Artifact> {
	let Ok(page) = client.page() else {
		return Vec::new();
	};
	if let Err(e) = tokio::fs::create_dir_all(dir).await {
		warn!(target = "wa", dir = %dir.display(), error = %e, "cannot create artifacts dir");
		return Vec::new();
	}

	let stem = command.replace('.', "-");
	let mut artifacts = Vec::new();

	let screenshot_path = dir.join(format!("{stem}-failure.png"));
	match page.screenshot_to_file(&screenshot_path).await {
		Ok(bytes) => artifacts.push(Artifact {
			artifact_type: ArtifactType::Screenshot,
			path: screenshot_path,
			size_bytes: Some(bytes.len() as u64),
		}),
		Err(e) => debug!(target = "wa", error = %e, "failure screenshot skipped"),
	}

	let html_path = dir.join(format!("{stem}-failure.html"));
	match page.content().await {
		Ok(html) => match tokio::fs::write(&html_path, &html).await {
			Ok(()) => artifacts.push(Artifact {
				artifact_type: ArtifactType::Html,
				path: html_path,
				size_bytes: Some(html.len() as u64),
			}),
			Err(e) => debug!(target = "wa", error = %e, "failure HTML not written"),
		},
		Err(e) => debug!(target = "wa", error = %e, "failure HTML skipped"),
	}

	artifacts
}
