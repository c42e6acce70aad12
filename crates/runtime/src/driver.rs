//! Browser executable discovery
//!
//! Locates a Chromium-family browser to drive. Installing or updating the
//! browser is left to the system package manager.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Environment variables consulted for an explicit browser path, in order.
pub const BROWSER_PATH_ENV: [&str; 2] = ["WA_CHROME_PATH", "CHROME_PATH"];

/// Executable names searched on `PATH`, in order.
const EXECUTABLE_NAMES: &[&str] = &[
	"google-chrome-stable",
	"google-chrome",
	"chromium",
	"chromium-browser",
	"chrome",
	"microsoft-edge",
];

#[cfg(target_os = "macos")]
const INSTALL_LOCATIONS: &[&str] = &[
	"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
	"/Applications/Chromium.app/Contents/MacOS/Chromium",
	"/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
];

#[cfg(windows)]
const INSTALL_LOCATIONS: &[&str] = &[
	"C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
	"C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
	"C:\\Program Files (x86)\\Microsoft\\Edge\\Application\\msedge.exe",
];

#[cfg(all(unix, not(target_os = "macos")))]
const INSTALL_LOCATIONS: &[&str] = &[
	"/usr/bin/google-chrome",
	"/usr/bin/chromium",
	"/usr/bin/chromium-browser",
	"/snap/bin/chromium",
	"/opt/google/chrome/chrome",
];

/// Get the path to the browser executable
///
/// Resolution order:
/// 1. `explicit` (from CLI flag or config file); an absolute/relative path or a name on `PATH`
/// 2. `WA_CHROME_PATH`, then `CHROME_PATH` environment variables
/// 3. Well-known executable names on `PATH`
/// 4. Platform install locations
///
/// # Errors
///
/// Returns `Error::LaunchFailed` if `explicit` is given but does not resolve,
/// and `Error::BrowserNotFound` if nothing else does.
pub fn get_browser_executable(explicit: Option<&Path>) -> Result<PathBuf> {
	resolve_browser_executable(explicit, |name| std::env::var_os(name).map(PathBuf::from))
}

/// Resolution with an injectable environment lookup.
pub fn resolve_browser_executable<F>(explicit: Option<&Path>, env: F) -> Result<PathBuf>
where
	F: Fn(&str) -> Option<PathBuf>,
{
	if let Some(path) = explicit {
		return resolve_explicit(path)
			.ok_or_else(|| Error::LaunchFailed(format!("browser executable not found: {}", path.display())));
	}

	for name in BROWSER_PATH_ENV {
		if let Some(path) = env(name) {
			if path.is_file() {
				debug!(target = "wa", source = name, path = %path.display(), "using browser from environment");
				return Ok(path);
			}
			warn!(target = "wa", source = name, path = %path.display(), "browser path from environment does not exist; continuing search");
		}
	}

	if let Some(path) = EXECUTABLE_NAMES.iter().find_map(|name| which::which(name).ok()) {
		debug!(target = "wa", path = %path.display(), "using browser from PATH");
		return Ok(path);
	}

	INSTALL_LOCATIONS
		.iter()
		.map(PathBuf::from)
		.find(|path| path.is_file())
		.ok_or(Error::BrowserNotFound)
}

fn resolve_explicit(path: &Path) -> Option<PathBuf> {
	if path.is_file() {
		return Some(path.to_path_buf());
	}
	// Bare names ("chromium") are looked up on PATH.
	if path.components().count() == 1 {
		return which::which(path).ok();
	}
	None
}
