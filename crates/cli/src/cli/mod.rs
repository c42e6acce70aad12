use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "wa")]
#[command(about = "WhatsApp Web automation from the command line")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	/// Browser profile directory that keeps the login between runs
	#[arg(long, global = true, value_name = "DIR")]
	pub session_dir: Option<PathBuf>,

	/// Run the browser without a window (requires an already logged-in profile)
	#[arg(long, global = true, overrides_with = "no_headless")]
	pub headless: bool,

	/// Show the browser window even if the config file enables headless
	#[arg(long, global = true, overrides_with = "headless")]
	pub no_headless: bool,

	/// Chrome/Chromium executable (overrides WA_CHROME_PATH and CHROME_PATH)
	#[arg(long, global = true, value_name = "PATH")]
	pub chrome_path: Option<PathBuf>,

	/// Attach to a running browser's DevTools WebSocket instead of launching one
	#[arg(long, global = true, value_name = "URL")]
	pub cdp_endpoint: Option<String>,

	/// Web app URL
	#[arg(long, global = true, value_name = "URL")]
	pub url: Option<String>,

	/// Element wait timeout in milliseconds
	#[arg(long, global = true, value_name = "MS")]
	pub timeout: Option<u64>,

	/// How long to wait for the chat list (QR scan) in milliseconds
	#[arg(long, global = true, value_name = "MS")]
	pub login_timeout: Option<u64>,

	/// Directory to save artifacts (screenshot, HTML) on command failure
	#[arg(long, global = true, value_name = "DIR")]
	pub artifacts_dir: Option<PathBuf>,

	/// Config file to use instead of the default location
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Open WhatsApp Web and wait for login (scan the QR code on first run)
	Open(OpenArgs),

	/// Send a text message to a contact
	#[command(alias = "send-message")]
	Send(SendArgs),

	/// Send an image or video to a contact
	SendMedia(SendMediaArgs),

	/// Classify the last message received from a contact
	#[command(alias = "last")]
	LastMessage(LastMessageArgs),

	/// Run NDJSON commands from stdin against one browser session
	Run,

	/// Inspect or edit the config file
	#[command(subcommand)]
	Config(ConfigAction),
}

impl Cli {
	/// `Some` when `--headless` or `--no-headless` was given; the last one wins.
	pub fn headless_override(&self) -> Option<bool> {
		match (self.headless, self.no_headless) {
			(true, _) => Some(true),
			(_, true) => Some(false),
			_ => None,
		}
	}
}

impl Commands {
	/// Command name used in output envelopes.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Open(_) => "open",
			Commands::Send(_) => "send",
			Commands::SendMedia(_) => "send-media",
			Commands::LastMessage(_) => "last-message",
			Commands::Run => "run",
			Commands::Config(ConfigAction::Show) => "config.show",
			Commands::Config(ConfigAction::Path) => "config.path",
			Commands::Config(ConfigAction::Set { .. }) => "config.set",
			Commands::Config(ConfigAction::Unset { .. }) => "config.unset",
		}
	}
}

#[derive(Args, Debug)]
pub struct OpenArgs {
	/// Keep the window open this long after login, in milliseconds
	#[arg(long, value_name = "MS", default_value_t = 0)]
	pub wait_ms: u64,
}

#[derive(Args, Debug)]
pub struct SendArgs {
	/// Contact or group name as shown in the chat list
	pub contact: String,

	/// Message text (emoji are fine)
	pub message: String,
}

#[derive(Args, Debug)]
pub struct SendMediaArgs {
	/// Contact or group name as shown in the chat list
	pub contact: String,

	/// Image or video file to send
	pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct LastMessageArgs {
	/// Contact or group name as shown in the chat list
	pub contact: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
	/// Print the config file contents
	Show,
	/// Print the config file location
	Path,
	/// Set a config key
	Set {
		/// One of: session-dir, headless, chrome-path, cdp-endpoint, url, timeout-ms,
		/// login-timeout-ms, chat-settle-ms, login-settle-ms, artifacts-dir
		key: String,
		value: String,
	},
	/// Remove a config key
	Unset { key: String },
}
