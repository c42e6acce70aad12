//! DevTools connection layer
//!
//! Implements request/response correlation on top of a frame transport:
//! - Generating unique request IDs
//! - Correlating responses with pending requests
//! - Failing pending requests when the transport closes
//!
//! # Message Flow
//!
//! 1. Caller invokes `send()` with an optional session ID, method and params
//! 2. Connection assigns an ID and registers a oneshot channel
//! 3. The serialized request is queued for the writer task
//! 4. The reader task hands each inbound frame to `dispatch()`
//! 5. The response is matched by ID and delivered through the oneshot channel

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex as TokioMutex;
use tokio::sync::{mpsc, oneshot};
use wa_protocol::{ErrorPayload, Message, Request};

use crate::error::{Error, Result};

/// Default deadline for a single command round-trip.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Pending request callbacks keyed by request ID.
type CallbackMap = Arc<TokioMutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

/// RAII guard ensuring callback cleanup when a request future is dropped.
struct CancelGuard {
	id: u64,
	callbacks: CallbackMap,
	completed: bool,
}

impl CancelGuard {
	fn new(id: u64, callbacks: CallbackMap) -> Self {
		Self {
			id,
			callbacks,
			completed: false,
		}
	}

	fn complete(&mut self) {
		self.completed = true;
	}
}

impl Drop for CancelGuard {
	fn drop(&mut self) {
		if self.completed {
			return;
		}

		let id = self.id;
		let callbacks = Arc::clone(&self.callbacks);

		if let Ok(handle) = tokio::runtime::Handle::try_current() {
			handle.spawn(async move {
				if callbacks.lock().await.remove(&id).is_some() {
					tracing::debug!(target = "wa", id, "removed orphaned callback");
				}
			});
		}
	}
}

/// Future returned by [`Connection::send`] with automatic cancellation cleanup.
struct ResponseFuture {
	rx: oneshot::Receiver<Result<Value>>,
	guard: CancelGuard,
}

impl Future for ResponseFuture {
	type Output = Result<Value>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match Pin::new(&mut self.rx).poll(cx) {
			Poll::Ready(result) => {
				self.guard.complete();
				Poll::Ready(result.map_err(|_| Error::ChannelClosed).and_then(|r| r))
			}
			Poll::Pending => Poll::Pending,
		}
	}
}

/// JSON connection to a browser's DevTools endpoint.
///
/// Owns no socket itself: outbound frames go to `outbound_tx` and inbound
/// frames arrive through [`Connection::dispatch`]. See
/// [`transport::connect`](crate::transport::connect) for the WebSocket wiring.
pub struct Connection {
	/// Sequential request ID counter
	last_id: AtomicU64,
	/// Pending request callbacks keyed by request ID
	callbacks: CallbackMap,
	/// Serialized outbound frames for the writer task
	outbound_tx: mpsc::UnboundedSender<String>,
	/// Set once the transport has gone away
	closed: AtomicBool,
}

impl Connection {
	pub fn new(outbound_tx: mpsc::UnboundedSender<String>) -> Self {
		Self {
			last_id: AtomicU64::new(1),
			callbacks: Arc::new(TokioMutex::new(HashMap::new())),
			outbound_tx,
			closed: AtomicBool::new(false),
		}
	}

	/// Sends a command and awaits its result with [`DEFAULT_COMMAND_TIMEOUT`].
	pub async fn send(&self, session_id: Option<&str>, method: &str, params: Value) -> Result<Value> {
		self.send_with_timeout(session_id, method, params, DEFAULT_COMMAND_TIMEOUT).await
	}

	/// Sends a command and awaits its result, failing after `timeout`.
	pub async fn send_with_timeout(&self, session_id: Option<&str>, method: &str, params: Value, timeout: Duration) -> Result<Value> {
		if self.is_closed() {
			return Err(Error::ChannelClosed);
		}

		let id = self.last_id.fetch_add(1, Ordering::SeqCst);
		tracing::debug!(target = "wa", id, method, session = ?session_id, "sending command");

		let (tx, rx) = oneshot::channel();
		self.callbacks.lock().await.insert(id, tx);
		let guard = CancelGuard::new(id, Arc::clone(&self.callbacks));

		let request = Request {
			id,
			method: method.to_string(),
			params,
			session_id: session_id.map(str::to_string),
		};
		let frame = serde_json::to_string(&request)?;

		if self.outbound_tx.send(frame).is_err() {
			tracing::error!(target = "wa", "failed to queue command: outbound channel closed");
			return Err(Error::ChannelClosed);
		}

		let response = ResponseFuture { rx, guard };
		match tokio::time::timeout(timeout, response).await {
			Ok(result) => result.map_err(|e| match e {
				Error::Remote { code, message, .. } => Error::Remote {
					method: method.to_string(),
					code,
					message,
				},
				other => other,
			}),
			Err(_) => Err(Error::Timeout(format!("{method} got no response within {}ms", timeout.as_millis()))),
		}
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// Routes an inbound response to its pending request. Events are dropped.
	pub async fn dispatch(&self, message: Message) -> Result<()> {
		match message {
			Message::Response(response) => {
				let callback = self.callbacks.lock().await.remove(&response.id).ok_or_else(|| {
					Error::ProtocolError(format!("Cannot find request to respond: id={}", response.id))
				})?;

				let result = match response.error {
					Some(payload) => Err(remote_error(payload)),
					None => Ok(response.result.unwrap_or(Value::Null)),
				};

				let _ = callback.send(result);
				Ok(())
			}
			Message::Event(event) => {
				tracing::trace!(target = "wa", method = %event.method, "ignoring event");
				Ok(())
			}
			Message::Unknown(value) => {
				tracing::debug!(target = "wa", frame = %value, "ignoring unrecognized frame");
				Ok(())
			}
		}
	}

	/// Marks the connection closed and fails every pending request.
	pub async fn close_pending(&self, reason: &str) {
		self.closed.store(true, Ordering::SeqCst);
		let mut callbacks = self.callbacks.lock().await;
		for (id, tx) in callbacks.drain() {
			tracing::debug!(target = "wa", id, reason, "failing pending command");
			let _ = tx.send(Err(Error::ChannelClosed));
		}
	}
}

/// Converts a protocol error payload; the method is filled in by the caller.
fn remote_error(payload: ErrorPayload) -> Error {
	let message = match payload.data {
		Some(data) => format!("{} {}", payload.message, data),
		None => payload.message,
	};
	Error::Remote {
		method: String::new(),
		code: payload.code,
		message,
	}
}
