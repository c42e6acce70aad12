use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use wa_protocol::{ErrorPayload, Event, Response};

use super::*;

fn create_test_connection() -> (Arc<Connection>, mpsc::UnboundedReceiver<String>) {
	let (tx, rx) = mpsc::unbounded_channel();
	(Arc::new(Connection::new(tx)), rx)
}

/// Reads the next outbound frame and returns its request ID.
async fn next_request(rx: &mut mpsc::UnboundedReceiver<String>) -> Request {
	let frame = rx.recv().await.expect("outbound frame");
	serde_json::from_str(&frame).expect("request JSON")
}

#[tokio::test]
async fn request_ids_increment() {
	let (connection, mut rx) = create_test_connection();

	let c1 = Arc::clone(&connection);
	let first = tokio::spawn(async move { c1.send(None, "Browser.getVersion", serde_json::json!({})).await });
	let r1 = next_request(&mut rx).await;

	let c2 = Arc::clone(&connection);
	let second = tokio::spawn(async move { c2.send(Some("S1"), "Page.enable", serde_json::json!({})).await });
	let r2 = next_request(&mut rx).await;

	assert_eq!(r2.id, r1.id + 1);
	assert_eq!(r2.session_id.as_deref(), Some("S1"));

	for id in [r1.id, r2.id] {
		connection
			.dispatch(Message::Response(Response {
				id,
				result: Some(serde_json::json!({})),
				error: None,
				session_id: None,
			}))
			.await
			.unwrap();
	}
	first.await.unwrap().unwrap();
	second.await.unwrap().unwrap();
}

#[tokio::test]
async fn dispatch_response_success() {
	let (connection, mut rx) = create_test_connection();

	let sender = Arc::clone(&connection);
	let pending = tokio::spawn(async move {
		sender
			.send(None, "Runtime.evaluate", serde_json::json!({"expression": "1 + 1"}))
			.await
	});

	let request = next_request(&mut rx).await;
	assert_eq!(request.method, "Runtime.evaluate");
	assert_eq!(request.params["expression"], "1 + 1");

	connection
		.dispatch(Message::Response(Response {
			id: request.id,
			result: Some(serde_json::json!({"result": {"type": "number", "value": 2}})),
			error: None,
			session_id: None,
		}))
		.await
		.unwrap();

	let result = pending.await.unwrap().unwrap();
	assert_eq!(result["result"]["value"], 2);
}

#[tokio::test]
async fn dispatch_response_error_names_method() {
	let (connection, mut rx) = create_test_connection();

	let sender = Arc::clone(&connection);
	let pending = tokio::spawn(async move { sender.send(Some("S"), "DOM.setFileInputFiles", serde_json::json!({})).await });

	let request = next_request(&mut rx).await;
	connection
		.dispatch(Message::Response(Response {
			id: request.id,
			result: None,
			error: Some(ErrorPayload {
				code: -32000,
				message: "Node is not a file input element".to_string(),
				data: None,
			}),
			session_id: Some("S".into()),
		}))
		.await
		.unwrap();

	let err = pending.await.unwrap().unwrap_err();
	match &err {
		Error::Remote { method, code, message } => {
			assert_eq!(method, "DOM.setFileInputFiles");
			assert_eq!(*code, -32000);
			assert!(message.contains("file input"));
		}
		other => panic!("expected remote error, got {other:?}"),
	}
}

#[tokio::test]
async fn unknown_response_id_is_a_protocol_error() {
	let (connection, _rx) = create_test_connection();

	let err = connection
		.dispatch(Message::Response(Response {
			id: 999,
			result: None,
			error: None,
			session_id: None,
		}))
		.await
		.unwrap_err();
	assert!(matches!(err, Error::ProtocolError(_)));
}

#[tokio::test]
async fn events_do_not_disturb_pending_requests() {
	let (connection, mut rx) = create_test_connection();

	let sender = Arc::clone(&connection);
	let pending = tokio::spawn(async move { sender.send(Some("S"), "Runtime.evaluate", serde_json::json!({})).await });
	let request = next_request(&mut rx).await;

	connection
		.dispatch(Message::Event(Event {
			method: "Runtime.consoleAPICalled".into(),
			params: serde_json::json!({"type": "log"}),
			session_id: Some("S".into()),
		}))
		.await
		.unwrap();
	connection
		.dispatch(Message::Response(Response {
			id: request.id,
			result: Some(serde_json::json!({"ok": true})),
			error: None,
			session_id: Some("S".into()),
		}))
		.await
		.unwrap();

	assert_eq!(pending.await.unwrap().unwrap()["ok"], true);
}

#[tokio::test]
async fn closing_fails_pending_and_future_requests() {
	let (connection, mut rx) = create_test_connection();

	let sender = Arc::clone(&connection);
	let pending = tokio::spawn(async move { sender.send(None, "Page.navigate", serde_json::json!({"url": "about:blank"})).await });
	let _ = next_request(&mut rx).await;

	connection.close_pending("socket closed").await;

	let err = pending.await.unwrap().unwrap_err();
	assert!(matches!(err, Error::ChannelClosed), "got {err:?}");
	assert!(connection.is_closed());

	let err = connection.send(None, "Page.enable", serde_json::json!({})).await.unwrap_err();
	assert!(matches!(err, Error::ChannelClosed));
}

#[tokio::test]
async fn unanswered_command_times_out() {
	let (connection, _rx) = create_test_connection();

	let err = connection
		.send_with_timeout(None, "Page.navigate", serde_json::json!({}), Duration::from_millis(20))
		.await
		.unwrap_err();
	assert!(err.is_timeout(), "got {err:?}");
	assert!(err.to_string().contains("Page.navigate"));
}
