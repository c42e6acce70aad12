//! Wire types for the Chrome DevTools Protocol.
//!
//! This crate contains the serde-serializable frames and values exchanged
//! with a Chromium browser over its DevTools WebSocket. Only the subset of
//! the protocol that `wa` drives is modelled here.
//!
//! Types in this crate are pure data: no I/O and no behavior beyond
//! serialization. Connection handling lives in `wa-runtime` and the
//! ergonomic page API in `wa-rs`.

pub mod keys;
pub mod message;
pub mod types;

pub use keys::*;
pub use message::*;
pub use types::*;
