//! [`WhatsAppWeb`] session: browser bootstrap, login wait and chat actions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info, warn};
use wa_protocol::Key;
use wa_runtime::LaunchOptions;

use super::classify::{MessageKind, classify};
use super::selectors::{
	ATTACH_BUTTON, COMPOSER, INBOUND_MESSAGE, MEDIA_INPUT, SEARCH_BOX, SEARCH_BOX_EDITABLE, SEND_BUTTON, WEB_URL,
};
use crate::browser::Browser;
use crate::error::{Error, Result};
use crate::page::Page;
use crate::selector::Selector;
use crate::wait::DEFAULT_TIMEOUT;

/// Profile directory used when none is configured, relative to the working directory.
pub const DEFAULT_SESSION_DIR: &str = "whatsapp_session";

/// Settings for a [`WhatsAppWeb`] session.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatsAppConfig {
	pub web_url: String,
	/// Browser profile directory; keeps the login across runs
	pub session_dir: PathBuf,
	pub headless: bool,
	/// Explicit browser executable, bypassing discovery
	pub browser_executable: Option<PathBuf>,
	/// Attach to this DevTools WebSocket instead of launching a browser
	pub cdp_endpoint: Option<String>,
	/// Bound for each element wait
	pub element_timeout: Duration,
	/// Bound for the chat list to appear after opening the web app
	pub login_timeout: Duration,
	/// Pause after opening a chat before reading its messages
	pub chat_settle: Duration,
	/// Pause after login is detected
	pub login_settle: Duration,
}

impl Default for WhatsAppConfig {
	fn default() -> Self {
		Self {
			web_url: WEB_URL.to_string(),
			session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
			headless: false,
			browser_executable: None,
			cdp_endpoint: None,
			element_timeout: DEFAULT_TIMEOUT,
			login_timeout: Duration::from_secs(120),
			chat_settle: Duration::from_secs(3),
			login_settle: Duration::from_secs(5),
		}
	}
}

/// One automated WhatsApp Web session.
///
/// Operations run one after another against a single page. The browser is
/// started by [`initialize_driver`](Self::initialize_driver) and released by
/// [`close`](Self::close).
#[derive(Debug)]
pub struct WhatsAppWeb {
	config: WhatsAppConfig,
	browser: Option<Browser>,
}

impl WhatsAppWeb {
	/// Stores `config`. Nothing is launched yet.
	pub fn new(config: WhatsAppConfig) -> Self {
		Self { config, browser: None }
	}

	pub fn config(&self) -> &WhatsAppConfig {
		&self.config
	}

	pub fn is_initialized(&self) -> bool {
		self.browser.is_some()
	}

	pub fn browser(&self) -> Option<&Browser> {
		self.browser.as_ref()
	}

	/// The attached page, or [`Error::NotInitialized`].
	pub fn page(&self) -> Result<&Page> {
		self.browser.as_ref().map(Browser::page).ok_or(Error::NotInitialized)
	}

	/// Creates the profile directory and starts (or attaches to) the browser.
	pub async fn initialize_driver(&mut self) -> Result<()> {
		if self.browser.is_some() {
			warn!(target = "wa", "driver already initialized");
			return Ok(());
		}

		if let Some(endpoint) = self.config.cdp_endpoint.as_deref() {
			info!(target = "wa", endpoint, "connecting to running browser");
			self.browser = Some(Browser::connect(endpoint).await?);
			return Ok(());
		}

		tokio::fs::create_dir_all(&self.config.session_dir).await?;
		let session_dir = std::path::absolute(&self.config.session_dir)?;
		let executable = wa_runtime::get_browser_executable(self.config.browser_executable.as_deref())?;

		let mut options = LaunchOptions::new(executable, session_dir);
		options.headless = self.config.headless;

		info!(
			target = "wa",
			executable = %options.executable.display(),
			session_dir = %options.user_data_dir.display(),
			headless = options.headless,
			"starting browser"
		);
		self.browser = Some(Browser::launch(&options).await?);
		Ok(())
	}

	/// Opens the web app and waits for a logged-in chat list.
	pub async fn open(&self) -> Result<()> {
		let page = self.page()?;
		page.goto(&self.config.web_url).await?;
		info!(target = "wa", "Please scan the QR code if required...");

		let login = page.wait_for_selector_with_timeout(&SEARCH_BOX, self.config.login_timeout).await;
		page.release_handles().await;
		login.map_err(|e| match e {
			Error::ElementNotFound { ms, .. } => Error::LoginTimeout { ms },
			other => other,
		})?;

		tokio::time::sleep(self.config.login_settle).await;
		info!(target = "wa", "Logged in successfully!");
		Ok(())
	}

	/// Starts the browser and opens the web app, reporting any failure.
	pub async fn run(&mut self) -> Result<()> {
		let result = match self.initialize_driver().await {
			Ok(()) => self.open().await,
			Err(e) => Err(e),
		};
		if let Err(e) = &result {
			error!(target = "wa", error = %e, "An error occurred");
		}
		result
	}

	/// Opens the chat for `contact` and sends `message`.
	pub async fn send_message(&self, contact: &str, message: &str) -> Result<()> {
		let result = self.try_send_message(contact, message).await;
		self.release_handles().await;
		report(result, "sending the message", contact)
	}

	/// Opens the chat for `contact` and sends the image or video at `file_path`.
	pub async fn send_media(&self, contact: &str, file_path: &Path) -> Result<()> {
		let result = self.try_send_media(contact, file_path).await;
		self.release_handles().await;
		report(result, "sending the media", contact)
	}

	/// Opens the chat for `contact` and classifies its last received message.
	pub async fn last_message_kind(&self, contact: &str) -> Result<MessageKind> {
		let result = self.try_last_message_kind(contact).await;
		self.release_handles().await;
		report(result, "reading the last message", contact)
	}

	/// Frees the element handles an operation left behind.
	async fn release_handles(&self) {
		if let Ok(page) = self.page() {
			page.release_handles().await;
		}
	}

	async fn try_send_message(&self, contact: &str, message: &str) -> Result<()> {
		let page = self.page()?;
		self.open_chat(page, &SEARCH_BOX, false, contact).await?;

		let composer = page.wait_for_selector_with_timeout(&COMPOSER, self.config.element_timeout).await?;
		composer.click().await?;
		composer.type_text(message).await?;
		composer.press(Key::Enter).await?;
		info!(target = "wa", contact, message, "Message sent");
		Ok(())
	}

	async fn try_send_media(&self, contact: &str, file_path: &Path) -> Result<()> {
		let file = validate_media_path(file_path)?;
		let page = self.page()?;
		self.open_chat(page, &SEARCH_BOX_EDITABLE, true, contact).await?;

		let timeout = self.config.element_timeout;
		page.wait_for_selector_with_timeout(&ATTACH_BUTTON, timeout).await?.click().await?;
		page.wait_for_selector_with_timeout(&MEDIA_INPUT, timeout)
			.await?
			.set_input_files(std::slice::from_ref(&file))
			.await?;
		page.wait_for_selector_with_timeout(&SEND_BUTTON, timeout).await?.click().await?;
		info!(target = "wa", contact, file = %file.display(), "Media sent");
		Ok(())
	}

	async fn try_last_message_kind(&self, contact: &str) -> Result<MessageKind> {
		let page = self.page()?;
		self.open_chat(page, &SEARCH_BOX_EDITABLE, true, contact).await?;
		tokio::time::sleep(self.config.chat_settle).await;

		let inbound = page.wait_for_all(&INBOUND_MESSAGE, self.config.element_timeout).await?;
		let last = inbound
			.last()
			.ok_or_else(|| Error::Protocol("no inbound messages".into()))?;
		let kind = classify(last).await?;
		info!(target = "wa", contact, "{kind}");
		Ok(kind)
	}

	/// Closes the browser. Without a driver this only logs.
	pub async fn close(&mut self) -> Result<()> {
		match self.browser.take() {
			Some(browser) => {
				browser.close().await?;
				info!(target = "wa", "Browser closed.");
			}
			None => info!(target = "wa", "Driver not initialized."),
		}
		Ok(())
	}

	async fn open_chat(&self, page: &Page, search: &Selector, clear: bool, contact: &str) -> Result<()> {
		let search_box = page.wait_for_selector_with_timeout(search, self.config.element_timeout).await?;
		search_box.click().await?;
		if clear {
			search_box.clear().await?;
		}
		search_box.type_text(contact).await?;
		search_box.press(Key::Enter).await?;
		info!(target = "wa", contact, "Searching for contact");
		Ok(())
	}
}

fn report<T>(result: Result<T>, action: &str, contact: &str) -> Result<T> {
	if let Err(e) = &result {
		error!(target = "wa", contact, error = %e, "An error occurred while {action}");
	}
	result
}

/// Checks that `path` names an existing regular file and returns its absolute form.
pub fn validate_media_path(path: &Path) -> Result<PathBuf> {
	match std::fs::metadata(path) {
		Ok(meta) if meta.is_file() => Ok(std::path::absolute(path)?),
		_ => Err(Error::FileNotFound(path.to_path_buf())),
	}
}
