//! `wa config show|path|set|unset`.

use std::path::Path;

use tracing::info;

use crate::cli::ConfigAction;
use crate::config::CliConfig;
use crate::error::{Result, WaError};
use crate::output::{ConfigData, ConfigPathData, OutputFormat, ResultBuilder, print_result};

/// Runs against the file at `path` alone, so a malformed file can still be repaired.
pub fn execute(path: &Path, format: OutputFormat, action: ConfigAction) -> Result<()> {
	match action {
		ConfigAction::Show => {
			let config = CliConfig::load(path).map_err(WaError::Config)?;
			let data = ConfigData {
				path: path.to_path_buf(),
				exists: path.exists(),
				config,
			};
			print_result(&ResultBuilder::new("config.show").data(data).build(), format);
		}
		ConfigAction::Path => {
			let data = ConfigPathData {
				path: path.to_path_buf(),
				summary: path.display().to_string(),
			};
			print_result(&ResultBuilder::new("config.path").data(data).build(), format);
		}
		ConfigAction::Set { key, value } => {
			let mut config = load_for_edit(path)?;
			config.set(&key, &value).map_err(WaError::Config)?;
			config.save(path).map_err(WaError::Config)?;
			info!(target = "wa", key = %key, path = %path.display(), "config key set");
			print_saved("config.set", path, config, format);
		}
		ConfigAction::Unset { key } => {
			let mut config = load_for_edit(path)?;
			config.unset(&key).map_err(WaError::Config)?;
			config.save(path).map_err(WaError::Config)?;
			info!(target = "wa", key = %key, path = %path.display(), "config key removed");
			print_saved("config.unset", path, config, format);
		}
	}
	Ok(())
}

/// A malformed file is replaced rather than blocking edits.
fn load_for_edit(path: &Path) -> Result<CliConfig> {
	match CliConfig::load(path) {
		Ok(config) => Ok(config),
		Err(e) if path.exists() && e.downcast_ref::<serde_json::Error>().is_some() => {
			tracing::warn!(target = "wa", path = %path.display(), error = %format!("{e:#}"), "discarding malformed config");
			Ok(CliConfig::default())
		}
		Err(e) => Err(WaError::Config(e)),
	}
}

fn print_saved(command: &str, path: &Path, config: CliConfig, format: OutputFormat) {
	let data = ConfigData {
		path: path.to_path_buf(),
		exists: true,
		config,
	};
	print_result(&ResultBuilder::new(command).data(data).build(), format);
}
