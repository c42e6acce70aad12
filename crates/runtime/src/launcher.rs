//! Browser process management
//!
//! Launches Chromium with a persistent profile directory and a DevTools port,
//! and owns the child process until the session is shut down.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Line prefix Chromium prints on stderr once DevTools is listening.
const DEVTOOLS_PREFIX: &str = "DevTools listening on ";

/// Options for launching a browser process.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
	/// Browser executable to run
	pub executable: PathBuf,
	/// Profile directory holding cookies and local storage across runs
	pub user_data_dir: PathBuf,
	/// Run without a visible window
	pub headless: bool,
	/// Additional command-line switches
	pub extra_args: Vec<String>,
	/// How long to wait for the DevTools endpoint to be announced
	pub startup_timeout: Duration,
}

impl LaunchOptions {
	pub fn new(executable: impl Into<PathBuf>, user_data_dir: impl Into<PathBuf>) -> Self {
		Self {
			executable: executable.into(),
			user_data_dir: user_data_dir.into(),
			headless: false,
			extra_args: Vec::new(),
			startup_timeout: Duration::from_secs(30),
		}
	}

	/// Command-line arguments passed to the browser.
	pub fn args(&self) -> Vec<String> {
		let mut args = vec![
			format!("--user-data-dir={}", self.user_data_dir.display()),
			"--remote-debugging-port=0".to_string(),
			"--no-first-run".to_string(),
			"--no-default-browser-check".to_string(),
			"--disable-background-networking".to_string(),
		];
		if self.headless {
			args.push("--headless=new".to_string());
		}
		args.extend(self.extra_args.iter().cloned());
		args.push("about:blank".to_string());
		args
	}
}

/// A running browser process and its browser-level DevTools endpoint.
#[derive(Debug)]
pub struct BrowserProcess {
	process: Child,
	ws_endpoint: String,
}

impl BrowserProcess {
	/// Launch the browser and wait for it to announce its DevTools endpoint.
	///
	/// # Errors
	///
	/// Returns `Error::LaunchFailed` if the process cannot be spawned, exits
	/// before announcing an endpoint, or stays silent past the startup timeout.
	pub async fn launch(options: &LaunchOptions) -> Result<Self> {
		let args = options.args();
		debug!(target = "wa", executable = %options.executable.display(), ?args, "launching browser");

		let mut child = Command::new(&options.executable)
			.args(&args)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::piped())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("failed to spawn {}: {e}", options.executable.display())))?;

		let stderr = child
			.stderr
			.take()
			.ok_or_else(|| Error::LaunchFailed("browser stderr was not captured".to_string()))?;

		let ws_endpoint = match tokio::time::timeout(options.startup_timeout, read_ws_endpoint(stderr)).await {
			Ok(Ok(endpoint)) => endpoint,
			Ok(Err(e)) => {
				let _ = child.start_kill();
				return Err(e);
			}
			Err(_) => {
				let _ = child.start_kill();
				return Err(Error::LaunchFailed(format!(
					"browser did not expose a DevTools endpoint within {}ms",
					options.startup_timeout.as_millis()
				)));
			}
		};

		debug!(target = "wa", pid = ?child.id(), endpoint = %ws_endpoint, "browser launched");
		Ok(Self { process: child, ws_endpoint })
	}

	/// Browser-level DevTools WebSocket URL.
	pub fn ws_endpoint(&self) -> &str {
		&self.ws_endpoint
	}

	pub fn id(&self) -> Option<u32> {
		self.process.id()
	}

	/// Wait for the process to exit on its own, killing it after `grace`.
	pub async fn shutdown(mut self, grace: Duration) -> Result<()> {
		match tokio::time::timeout(grace, self.process.wait()).await {
			Ok(Ok(status)) => {
				debug!(target = "wa", %status, "browser exited");
				Ok(())
			}
			Ok(Err(e)) => Err(Error::Io(e)),
			Err(_) => {
				debug!(target = "wa", "browser still running after close; killing");
				self.process
					.kill()
					.await
					.map_err(|e| Error::LaunchFailed(format!("failed to kill browser: {e}")))?;
				Ok(())
			}
		}
	}
}

/// Reads stderr until the DevTools line appears, then keeps draining it in the
/// background so the browser never blocks on a full pipe.
async fn read_ws_endpoint(stderr: ChildStderr) -> Result<String> {
	let mut lines = BufReader::new(stderr).lines();
	let mut tail = Vec::new();

	while let Some(line) = lines.next_line().await? {
		if let Some(endpoint) = parse_devtools_line(&line) {
			let endpoint = endpoint.to_string();
			tokio::spawn(async move {
				while let Ok(Some(line)) = lines.next_line().await {
					trace!(target = "wa::browser", "{line}");
				}
			});
			return Ok(endpoint);
		}
		trace!(target = "wa::browser", "{line}");
		tail.push(line);
		if tail.len() > 10 {
			tail.remove(0);
		}
	}

	Err(Error::LaunchFailed(format!(
		"browser exited before exposing a DevTools endpoint: {}",
		tail.join(" | ")
	)))
}

/// Extracts the WebSocket URL from a `DevTools listening on ws://...` line.
pub fn parse_devtools_line(line: &str) -> Option<&str> {
	let rest = line.trim().strip_prefix(DEVTOOLS_PREFIX)?;
	let url = rest.split_whitespace().next()?;
	(url.starts_with("ws://") || url.starts_with("wss://")).then_some(url)
}
