//! WebSocket transport for the DevTools connection.
//!
//! Splits the socket into a writer task fed by the connection's outbound
//! channel and a reader task that parses frames and hands them to
//! [`Connection::dispatch`].

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, warn};
use wa_protocol::Message;

use crate::connection::Connection;
use crate::error::{Error, Result};

/// Connects to a DevTools WebSocket endpoint and starts the I/O tasks.
///
/// The tasks stop when the socket closes; pending commands then fail with
/// [`Error::ChannelClosed`].
pub async fn connect(ws_url: &str) -> Result<Arc<Connection>> {
	debug!(target = "wa", url = ws_url, "connecting to DevTools");

	let (socket, _) = tokio_tungstenite::connect_async(ws_url)
		.await
		.map_err(|e| Error::ConnectionFailed(format!("{ws_url}: {e}")))?;
	let (mut sink, mut stream) = socket.split();

	let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
	let connection = Arc::new(Connection::new(outbound_tx));

	tokio::spawn(async move {
		while let Some(frame) = outbound_rx.recv().await {
			if let Err(e) = sink.send(WsMessage::Text(frame.into())).await {
				warn!(target = "wa", error = %e, "DevTools write failed");
				break;
			}
		}
		let _ = sink.close().await;
	});

	let reader = Arc::clone(&connection);
	tokio::spawn(async move {
		while let Some(frame) = stream.next().await {
			let text = match frame {
				Ok(WsMessage::Text(text)) => text.to_string(),
				Ok(WsMessage::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
					Ok(text) => text,
					Err(_) => continue,
				},
				Ok(WsMessage::Close(_)) => {
					debug!(target = "wa", "DevTools socket closed by browser");
					break;
				}
				Ok(_) => continue,
				Err(e) => {
					warn!(target = "wa", error = %e, "DevTools read failed");
					break;
				}
			};

			match serde_json::from_str::<Message>(&text) {
				Ok(message) => {
					if let Err(e) = reader.dispatch(message).await {
						debug!(target = "wa", error = %e, "dropping frame");
					}
				}
				Err(e) => warn!(target = "wa", error = %e, "unparseable DevTools frame"),
			}
		}
		reader.close_pending("DevTools socket closed").await;
	});

	Ok(connection)
}
