//! WhatsApp Web client built on [`Page`](crate::Page).

mod classify;
mod client;
pub mod selectors;

pub use classify::{MessageKind, MessageScope, classify};
pub use client::{DEFAULT_SESSION_DIR, WhatsAppConfig, WhatsAppWeb, validate_media_path};
