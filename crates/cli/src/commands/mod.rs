//! Command implementations.
//!
//! Each command has a raw input type (from flags or a batch line), a
//! `resolve` step that validates it without touching the browser, and an
//! `execute_resolved` step that runs against a started [`WhatsAppWeb`](wa::WhatsAppWeb).

pub mod config;
pub mod last_message;
pub mod open;
pub mod run;
pub mod send;
pub mod send_media;

use crate::cli::{Cli, Commands};
use crate::context::CommandContext;
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
	if let Commands::Config(action) = cli.command {
		let path = crate::config::config_path(cli.config.as_deref());
		return config::execute(&path, cli.format, action);
	}

	let ctx = CommandContext::from_cli(&cli)?;
	match cli.command {
		Commands::Open(args) => open::execute(&ctx, args.wait_ms).await,
		Commands::Send(args) => send::execute(&ctx, send::SendRaw::from_cli(args.contact, args.message)).await,
		Commands::SendMedia(args) => {
			send_media::execute(&ctx, send_media::SendMediaRaw::from_cli(args.contact, args.file)).await
		}
		Commands::LastMessage(args) => {
			last_message::execute(&ctx, last_message::LastMessageRaw::from_cli(args.contact)).await
		}
		Commands::Run => run::execute(&ctx).await,
		Commands::Config(action) => config::execute(ctx.config_path(), ctx.format, action),
	}
}

/// Rejects blank contact names before any browser work.
pub(crate) fn require_contact(contact: Option<String>, command: &str) -> Result<String> {
	match contact.map(|c| c.trim().to_string()) {
		Some(contact) if !contact.is_empty() => Ok(contact),
		_ => Err(crate::error::WaError::InvalidInput(format!("{command}: contact is required"))),
	}
}
