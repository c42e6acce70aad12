//! WhatsApp Web automation over the Chrome DevTools Protocol.
//!
//! [`WhatsAppWeb`] drives a persisted Chromium profile: it opens the web app,
//! finds a chat by contact name, sends text or media, and classifies the last
//! received message. The lower-level [`Browser`], [`Page`] and
//! [`ElementHandle`] types are usable on their own.
//!
//! ```ignore
//! use wa::{WhatsAppConfig, WhatsAppWeb};
//!
//! let mut client = WhatsAppWeb::new(WhatsAppConfig::default());
//! client.run().await?;
//! client.send_message("John Doe", "hello 👋").await?;
//! println!("{}", client.last_message_kind("John Doe").await?);
//! client.close().await?;
//! ```

mod browser;
mod element;
mod error;
mod page;
mod selector;
#[cfg(test)]
mod testing;
pub mod wait;
pub mod whatsapp;

pub use browser::Browser;
pub use element::ElementHandle;
pub use error::{Error, Result};
pub use page::{DEFAULT_NAVIGATION_TIMEOUT, Page};
pub use selector::{Selector, js_string};
pub use wa_protocol::{Key, ScreenshotFormat};
pub use wa_runtime::{Error as RuntimeError, LaunchOptions};
pub use whatsapp::{MessageKind, WhatsAppConfig, WhatsAppWeb};
