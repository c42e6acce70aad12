//! Browser runtime for wa.
//!
//! Finds a Chromium-family executable, launches it with a persistent profile,
//! and speaks the DevTools protocol to it over a WebSocket.

pub mod connection;
pub mod driver;
pub mod error;
pub mod launcher;
pub mod transport;

pub use connection::{Connection, DEFAULT_COMMAND_TIMEOUT};
pub use driver::get_browser_executable;
pub use error::{Error, Result};
pub use launcher::{BrowserProcess, LaunchOptions};
pub use transport::connect;
