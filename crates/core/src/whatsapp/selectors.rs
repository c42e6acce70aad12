//! Page markup the client relies on.
//!
//! These track the live web app and break when its markup changes.

use crate::selector::Selector;

pub const WEB_URL: &str = "https://web.whatsapp.com/";

/// Chat-list search box as seen by [`send_message`](super::WhatsAppWeb::send_message).
/// Its presence also marks a logged-in session.
pub const SEARCH_BOX: Selector = Selector::css("p.selectable-text.copyable-text");

/// Chat-list search box as seen by media sending and message inspection.
pub const SEARCH_BOX_EDITABLE: Selector = Selector::xpath("//div[@contenteditable='true'][@data-tab='3']");

/// Message composer of the open chat.
pub const COMPOSER: Selector = Selector::css(r#"[aria-placeholder="Type a message"]"#);

pub const ATTACH_BUTTON: Selector = Selector::xpath(r#"//button[@aria-label="Attach"]"#);

/// Hidden file input behind the "Photos & videos" attach entry.
pub const MEDIA_INPUT: Selector = Selector::xpath(r#"//input[@accept="image/*,video/mp4,video/3gpp,video/quicktime"]"#);

pub const SEND_BUTTON: Selector = Selector::xpath(r#"//div[@aria-label="Send"]"#);

/// Inbound message bubbles of the open chat, oldest first.
pub const INBOUND_MESSAGE: Selector = Selector::css("div[class*='message-in']");

pub const TEXT_CONTENT: Selector = Selector::css("span.selectable-text.copyable-text");
pub const VIDEO_PLAY_ICON: Selector = Selector::css(r#"svg[data-icon="media-play"]"#);
pub const IMAGE_BLOB: Selector = Selector::css(r#"img[src^="blob:https://web.whatsapp.com"]"#);
pub const DOCUMENT_THUMBNAIL: Selector = Selector::css(r#"div[style*="background-image: url('blob:"]"#);
