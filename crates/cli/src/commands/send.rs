//! Send a text message.

use std::time::Instant;

use serde::Deserialize;
use tracing::info;
use wa::WhatsAppWeb;

use crate::context::CommandContext;
use crate::error::{Result, WaError};
use crate::output::{CommandInputs, ResultBuilder, SendData, print_result};
use crate::session::Session;

const NAME: &str = "send";

/// Raw inputs from CLI or batch JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRaw {
	#[serde(default)]
	pub contact: Option<String>,
	#[serde(default, alias = "text")]
	pub message: Option<String>,
}

impl SendRaw {
	pub fn from_cli(contact: String, message: String) -> Self {
		Self {
			contact: Some(contact),
			message: Some(message),
		}
	}

	pub fn resolve(self) -> Result<SendResolved> {
		let contact = super::require_contact(self.contact, NAME)?;
		let message = self
			.message
			.filter(|m| !m.is_empty())
			.ok_or_else(|| WaError::InvalidInput("send: message is required".into()))?;
		Ok(SendResolved { contact, message })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendResolved {
	pub contact: String,
	pub message: String,
}

impl SendResolved {
	pub fn inputs(&self) -> CommandInputs {
		CommandInputs {
			contact: Some(self.contact.clone()),
			message: Some(self.message.clone()),
			..Default::default()
		}
	}
}

pub async fn execute_resolved(args: &SendResolved, client: &WhatsAppWeb) -> Result<SendData> {
	client.send_message(&args.contact, &args.message).await?;
	Ok(SendData {
		contact: args.contact.clone(),
		message: args.message.clone(),
		summary: format!("Message sent to {}: {}", args.contact, args.message),
	})
}

pub async fn execute(ctx: &CommandContext, raw: SendRaw) -> Result<()> {
	let start = Instant::now();
	let args = raw.resolve()?;
	info!(target = "wa", contact = %args.contact, "send message");

	let session = Session::start(ctx.settings.client.clone(), NAME, ctx.artifacts_dir()).await?;
	let outcome = execute_resolved(&args, session.client()).await;
	let data = session.finish(NAME, ctx.artifacts_dir(), outcome).await?;

	let result = ResultBuilder::new(NAME).started_at(start).inputs(args.inputs()).data(data).build();
	print_result(&result, ctx.format);
	Ok(())
}
