//! Command context: resolved settings shared by every command.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{self, CliConfig, Settings};
use crate::error::{Result, WaError};
use crate::output::OutputFormat;

#[derive(Debug, Clone)]
pub struct CommandContext {
	pub settings: Settings,
	pub format: OutputFormat,
	config_path: PathBuf,
}

impl CommandContext {
	/// Loads the config file and applies flags and environment on top.
	pub fn from_cli(cli: &Cli) -> Result<Self> {
		let config_path = config::config_path(cli.config.as_deref());
		let file = CliConfig::load(&config_path).map_err(WaError::Config)?;
		let settings = Settings::resolve(cli, &file).map_err(WaError::Config)?;

		tracing::debug!(
			target = "wa",
			config = %config_path.display(),
			session_dir = %settings.client.session_dir.display(),
			browser = ?settings.client.browser_executable,
			"resolved settings"
		);

		Ok(Self {
			settings,
			format: cli.format,
			config_path,
		})
	}

	pub fn config_path(&self) -> &Path {
		&self.config_path
	}

	pub fn artifacts_dir(&self) -> Option<&Path> {
		self.settings.artifacts_dir.as_deref()
	}
}
