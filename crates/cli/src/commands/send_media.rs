//! Send an image or video.

use std::path::PathBuf;
use std::time::Instant;

use serde::Deserialize;
use tracing::info;
use wa::WhatsAppWeb;

use crate::context::CommandContext;
use crate::error::{Result, WaError};
use crate::output::{CommandInputs, ResultBuilder, SendMediaData, print_result};
use crate::session::Session;

const NAME: &str = "send-media";

/// Raw inputs from CLI or batch JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMediaRaw {
	#[serde(default)]
	pub contact: Option<String>,
	#[serde(default, alias = "path", alias = "filePath")]
	pub file: Option<PathBuf>,
}

impl SendMediaRaw {
	pub fn from_cli(contact: String, file: PathBuf) -> Self {
		Self {
			contact: Some(contact),
			file: Some(file),
		}
	}

	/// Validates inputs; the file must exist before any browser is started.
	pub fn resolve(self) -> Result<SendMediaResolved> {
		let contact = super::require_contact(self.contact, NAME)?;
		let file = self
			.file
			.ok_or_else(|| WaError::InvalidInput("send-media: file is required".into()))?;
		let file = wa::whatsapp::validate_media_path(&file)?;
		Ok(SendMediaResolved { contact, file })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendMediaResolved {
	pub contact: String,
	/// Absolute path of an existing file
	pub file: PathBuf,
}

impl SendMediaResolved {
	pub fn inputs(&self) -> CommandInputs {
		CommandInputs {
			contact: Some(self.contact.clone()),
			file: Some(self.file.clone()),
			..Default::default()
		}
	}
}

pub async fn execute_resolved(args: &SendMediaResolved, client: &WhatsAppWeb) -> Result<SendMediaData> {
	client.send_media(&args.contact, &args.file).await?;
	Ok(SendMediaData {
		contact: args.contact.clone(),
		file: args.file.clone(),
		summary: format!("Media sent to {}: {}", args.contact, args.file.display()),
	})
}

pub async fn execute(ctx: &CommandContext, raw: SendMediaRaw) -> Result<()> {
	let start = Instant::now();
	let args = raw.resolve()?;
	info!(target = "wa", contact = %args.contact, file = %args.file.display(), "send media");

	let session = Session::start(ctx.settings.client.clone(), NAME, ctx.artifacts_dir()).await?;
	let outcome = execute_resolved(&args, session.client()).await;
	let data = session.finish(NAME, ctx.artifacts_dir(), outcome).await?;

	let result = ResultBuilder::new(NAME).started_at(start).inputs(args.inputs()).data(data).build();
	print_result(&result, ctx.format);
	Ok(())
}
