//! Classify the last received message in a chat.

use std::time::Instant;

use serde::Deserialize;
use tracing::info;
use wa::WhatsAppWeb;

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{CommandInputs, LastMessageData, ResultBuilder, print_result};
use crate::session::Session;

const NAME: &str = "last-message";

/// Raw inputs from CLI or batch JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageRaw {
	#[serde(default)]
	pub contact: Option<String>,
}

impl LastMessageRaw {
	pub fn from_cli(contact: String) -> Self {
		Self { contact: Some(contact) }
	}

	pub fn resolve(self) -> Result<LastMessageResolved> {
		Ok(LastMessageResolved {
			contact: super::require_contact(self.contact, NAME)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastMessageResolved {
	pub contact: String,
}

impl LastMessageResolved {
	pub fn inputs(&self) -> CommandInputs {
		CommandInputs {
			contact: Some(self.contact.clone()),
			..Default::default()
		}
	}
}

pub async fn execute_resolved(args: &LastMessageResolved, client: &WhatsAppWeb) -> Result<LastMessageData> {
	let kind = client.last_message_kind(&args.contact).await?;
	Ok(LastMessageData::new(args.contact.clone(), kind))
}

pub async fn execute(ctx: &CommandContext, raw: LastMessageRaw) -> Result<()> {
	let start = Instant::now();
	let args = raw.resolve()?;
	info!(target = "wa", contact = %args.contact, "read last message");

	let session = Session::start(ctx.settings.client.clone(), NAME, ctx.artifacts_dir()).await?;
	let outcome = execute_resolved(&args, session.client()).await;
	let data = session.finish(NAME, ctx.artifacts_dir(), outcome).await?;

	let result = ResultBuilder::new(NAME).started_at(start).inputs(args.inputs()).data(data).build();
	print_result(&result, ctx.format);
	Ok(())
}
