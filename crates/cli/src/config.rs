//! Persisted CLI defaults (`config.json`) and their merge with flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use wa::WhatsAppConfig;

use crate::cli::Cli;

/// Keys accepted by `wa config set|unset`.
pub const KEYS: [&str; 10] = [
	"session-dir",
	"headless",
	"chrome-path",
	"cdp-endpoint",
	"url",
	"timeout-ms",
	"login-timeout-ms",
	"chat-settle-ms",
	"login-settle-ms",
	"artifacts-dir",
];

/// Contents of `config.json`. Absent keys fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_dir: Option<PathBuf>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub headless: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chrome_path: Option<PathBuf>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cdp_endpoint: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub login_timeout_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chat_settle_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub login_settle_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub artifacts_dir: Option<PathBuf>,
}

impl CliConfig {
	/// Reads `path`. A missing file is an empty config; a malformed one is an error.
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
		};
		if content.trim().is_empty() {
			return Ok(Self::default());
		}
		serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
	}

	/// Writes pretty JSON to `path`, creating parent directories.
	pub fn save(&self, path: &Path) -> anyhow::Result<()> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
		}
		let json = serde_json::to_string_pretty(self)?;
		fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))
	}

	/// Sets `key` (kebab-case, see [`KEYS`]) from its string form.
	pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
		match key {
			"session-dir" => self.session_dir = Some(PathBuf::from(value)),
			"headless" => self.headless = Some(parse_bool(value)?),
			"chrome-path" => self.chrome_path = Some(PathBuf::from(value)),
			"cdp-endpoint" => self.cdp_endpoint = Some(validate_ws_url(value)?),
			"url" => self.url = Some(validate_http_url(value)?),
			"timeout-ms" => self.timeout_ms = Some(parse_ms(key, value)?),
			"login-timeout-ms" => self.login_timeout_ms = Some(parse_ms(key, value)?),
			"chat-settle-ms" => self.chat_settle_ms = Some(parse_ms(key, value)?),
			"login-settle-ms" => self.login_settle_ms = Some(parse_ms(key, value)?),
			"artifacts-dir" => self.artifacts_dir = Some(PathBuf::from(value)),
			_ => bail!("unknown config key '{key}' (expected one of: {})", KEYS.join(", ")),
		}
		Ok(())
	}

	pub fn unset(&mut self, key: &str) -> anyhow::Result<()> {
		match key {
			"session-dir" => self.session_dir = None,
			"headless" => self.headless = None,
			"chrome-path" => self.chrome_path = None,
			"cdp-endpoint" => self.cdp_endpoint = None,
			"url" => self.url = None,
			"timeout-ms" => self.timeout_ms = None,
			"login-timeout-ms" => self.login_timeout_ms = None,
			"chat-settle-ms" => self.chat_settle_ms = None,
			"login-settle-ms" => self.login_settle_ms = None,
			"artifacts-dir" => self.artifacts_dir = None,
			_ => bail!("unknown config key '{key}' (expected one of: {})", KEYS.join(", ")),
		}
		Ok(())
	}
}

/// `--config`, else `<config_dir>/wa/config.json`, else `./wa-config.json`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
	if let Some(path) = explicit {
		return path.to_path_buf();
	}
	dirs::config_dir()
		.map(|dir| dir.join("wa").join("config.json"))
		.unwrap_or_else(|| PathBuf::from("wa-config.json"))
}

/// `<data_local_dir>/wa/session`, else `./whatsapp_session`.
pub fn default_session_dir() -> PathBuf {
	dirs::data_local_dir()
		.map(|dir| dir.join("wa").join("session"))
		.unwrap_or_else(|| PathBuf::from(wa::whatsapp::DEFAULT_SESSION_DIR))
}

/// Effective settings after applying flag > file > default.
///
/// `WA_CHROME_PATH`/`CHROME_PATH` are not read here: executable discovery
/// consults them after any configured `chrome-path`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
	pub client: WhatsAppConfig,
	pub artifacts_dir: Option<PathBuf>,
}

impl Settings {
	pub fn resolve(cli: &Cli, file: &CliConfig) -> anyhow::Result<Self> {
		let defaults = WhatsAppConfig::default();

		let cdp_endpoint = match cli.cdp_endpoint.as_deref().or(file.cdp_endpoint.as_deref()) {
			Some(endpoint) => Some(validate_ws_url(endpoint)?),
			None => None,
		};
		let web_url = match cli.url.as_deref().or(file.url.as_deref()) {
			Some(url) => validate_http_url(url)?,
			None => defaults.web_url.clone(),
		};

		let ms = |flag: Option<u64>, stored: Option<u64>, fallback: Duration| {
			flag.or(stored).map(Duration::from_millis).unwrap_or(fallback)
		};

		let client = WhatsAppConfig {
			web_url,
			session_dir: cli
				.session_dir
				.clone()
				.or_else(|| file.session_dir.clone())
				.unwrap_or_else(default_session_dir),
			headless: cli.headless_override().or(file.headless).unwrap_or(defaults.headless),
			browser_executable: cli.chrome_path.clone().or_else(|| file.chrome_path.clone()),
			cdp_endpoint,
			element_timeout: ms(cli.timeout, file.timeout_ms, defaults.element_timeout),
			login_timeout: ms(cli.login_timeout, file.login_timeout_ms, defaults.login_timeout),
			chat_settle: ms(None, file.chat_settle_ms, defaults.chat_settle),
			login_settle: ms(None, file.login_settle_ms, defaults.login_settle),
		};

		Ok(Self {
			client,
			artifacts_dir: cli.artifacts_dir.clone().or_else(|| file.artifacts_dir.clone()),
		})
	}
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => bail!("expected true or false, got '{value}'"),
	}
}

fn parse_ms(key: &str, value: &str) -> anyhow::Result<u64> {
	value
		.trim()
		.parse()
		.with_context(|| format!("{key} must be a whole number of milliseconds, got '{value}'"))
}

fn validate_ws_url(value: &str) -> anyhow::Result<String> {
	let parsed = url::Url::parse(value).with_context(|| format!("invalid CDP endpoint '{value}'"))?;
	match parsed.scheme() {
		"ws" | "wss" => Ok(value.to_string()),
		other => bail!("CDP endpoint must be a ws:// or wss:// URL, got scheme '{other}'"),
	}
}

fn validate_http_url(value: &str) -> anyhow::Result<String> {
	let parsed = url::Url::parse(value).with_context(|| format!("invalid URL '{value}'"))?;
	match parsed.scheme() {
		"http" | "https" => Ok(value.to_string()),
		other => bail!("URL must be http or https, got scheme '{other}'"),
	}
}
