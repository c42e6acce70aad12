//! Scripted DevTools peer answering commands from an in-memory DOM.
//!
//! Every command a [`Page`] sends is recorded, so tests can assert the exact
//! interaction sequence without a browser.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::time::Instant;
use wa_protocol::{Message, Request, Response};
use wa_runtime::Connection;

use crate::page::Page;
use crate::selector::Selector;

#[derive(Debug, Clone)]
pub(crate) struct FakeNode {
	pub text: String,
	pub attributes: HashMap<String, String>,
	pub width: f64,
	pub height: f64,
	/// Selector expression to the descendants it matches
	pub children: HashMap<String, Vec<String>>,
}

impl Default for FakeNode {
	fn default() -> Self {
		Self {
			text: String::new(),
			attributes: HashMap::new(),
			width: 120.0,
			height: 40.0,
			children: HashMap::new(),
		}
	}
}

/// Node ids reachable from the document, keyed by selector expression.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeDom {
	document: HashMap<String, Vec<String>>,
	nodes: HashMap<String, FakeNode>,
}

impl FakeDom {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes `selector` match `ids` from the document.
	pub fn matches(mut self, selector: &Selector, ids: &[&str]) -> Self {
		let ids = self.register(ids);
		self.document.insert(selector.expression().to_string(), ids);
		self
	}

	/// Makes `selector` match `ids` below `parent`.
	pub fn child(mut self, parent: &str, selector: &Selector, ids: &[&str]) -> Self {
		let ids = self.register(ids);
		self.nodes
			.entry(parent.to_string())
			.or_default()
			.children
			.insert(selector.expression().to_string(), ids);
		self
	}

	pub fn node(mut self, id: &str, edit: impl FnOnce(&mut FakeNode)) -> Self {
		edit(self.nodes.entry(id.to_string()).or_default());
		self
	}

	fn register(&mut self, ids: &[&str]) -> Vec<String> {
		ids.iter()
			.map(|id| {
				self.nodes.entry(id.to_string()).or_default();
				id.to_string()
			})
			.collect()
	}
}

/// One command as the peer received it.
#[derive(Debug, Clone)]
pub(crate) struct Call {
	pub method: String,
	pub params: Value,
	pub at: Instant,
}

/// A [`Connection`] whose far end is a [`FakeDom`].
pub(crate) struct FakeDevTools {
	pub connection: Arc<Connection>,
	pub page: Page,
	calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeDevTools {
	/// Spawns the peer task. Must run inside a tokio runtime.
	pub fn start(dom: FakeDom) -> Self {
		let (tx, mut rx) = mpsc::unbounded_channel::<String>();
		let connection = Arc::new(Connection::new(tx));
		let calls = Arc::new(Mutex::new(Vec::new()));

		let peer = Arc::clone(&connection);
		let log = Arc::clone(&calls);
		tokio::spawn(async move {
			let mut state = PeerState {
				dom,
				arrays: HashMap::new(),
				next_array: 0,
			};
			while let Some(frame) = rx.recv().await {
				let Ok(request) = serde_json::from_str::<Request>(&frame) else {
					continue;
				};
				let result = state.respond(&request.method, &request.params);
				log.lock().unwrap().push(Call {
					method: request.method,
					params: request.params,
					at: Instant::now(),
				});
				let _ = peer
					.dispatch(Message::Response(Response {
						id: request.id,
						result: Some(result),
						error: None,
						session_id: request.session_id,
					}))
					.await;
			}
		});

		let page = Page::new(Arc::clone(&connection), "S1", "T1");
		Self { connection, page, calls }
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}

	pub fn methods(&self) -> Vec<String> {
		self.calls().into_iter().map(|call| call.method).collect()
	}

	/// Page interactions in order, one line each, skipping handle bookkeeping.
	pub fn actions(&self) -> Vec<String> {
		self.calls().iter().filter_map(summarize).collect()
	}

	/// Time the first call whose summary equals `action` was received.
	pub fn time_of(&self, action: &str) -> Option<Instant> {
		self.calls()
			.iter()
			.find(|call| summarize(call).as_deref() == Some(action))
			.map(|call| call.at)
	}
}

struct PeerState {
	dom: FakeDom,
	arrays: HashMap<String, Vec<String>>,
	next_array: u32,
}

impl PeerState {
	fn respond(&mut self, method: &str, params: &Value) -> Value {
		match method {
			"Runtime.evaluate" => {
				let expression = params["expression"].as_str().unwrap_or_default();
				if let Some(query) = document_query_argument(expression) {
					let ids = self.dom.document.get(&query).cloned().unwrap_or_default();
					return self.array(ids);
				}
				if expression == "document.readyState" {
					return json!({ "result": { "type": "string", "value": "complete" } });
				}
				json!({ "result": { "type": "undefined" } })
			}
			"Runtime.getProperties" => {
				let ids = params["objectId"]
					.as_str()
					.and_then(|id| self.arrays.get(id))
					.cloned()
					.unwrap_or_default();
				let mut properties: Vec<Value> = ids
					.iter()
					.enumerate()
					.map(|(index, id)| {
						json!({
							"name": index.to_string(),
							"enumerable": true,
							"value": { "type": "object", "subtype": "node", "objectId": id, "description": id },
						})
					})
					.collect();
				properties.push(json!({ "name": "length", "value": { "type": "number", "value": ids.len() } }));
				json!({ "result": properties })
			}
			"Runtime.callFunctionOn" => self.call_on(params),
			_ => json!({}),
		}
	}

	fn call_on(&mut self, params: &Value) -> Value {
		let node_id = params["objectId"].as_str().unwrap_or_default();
		let node = self.dom.nodes.get(node_id).cloned().unwrap_or_default();
		let declaration = params["functionDeclaration"].as_str().unwrap_or_default();
		let argument = params["arguments"][0]["value"].as_str().unwrap_or_default();

		match function_kind(declaration) {
			"query" => {
				let ids = node.children.get(argument).cloned().unwrap_or_default();
				self.array(ids)
			}
			"measure" => json!({
				"result": {
					"type": "object",
					"value": { "x": 10.0, "y": 20.0, "width": node.width, "height": node.height },
				}
			}),
			"text" => json!({ "result": { "type": "string", "value": node.text } }),
			"attribute" => match node.attributes.get(argument) {
				Some(value) => json!({ "result": { "type": "string", "value": value } }),
				None => json!({ "result": { "type": "object", "subtype": "null", "value": null } }),
			},
			_ => json!({ "result": { "type": "undefined" } }),
		}
	}

	fn array(&mut self, ids: Vec<String>) -> Value {
		self.next_array += 1;
		let object_id = format!("array-{}", self.next_array);
		self.arrays.insert(object_id.clone(), ids);
		json!({ "result": { "type": "object", "subtype": "array", "objectId": object_id } })
	}
}

/// Selector expression embedded in a [`Selector::document_query`] expression.
fn document_query_argument(expression: &str) -> Option<String> {
	const CALL: &str = ".call(document, ";
	let start = expression.rfind(CALL)? + CALL.len();
	let literal = expression[start..].strip_suffix(')')?;
	serde_json::from_str(literal).ok()
}

fn function_kind(declaration: &str) -> &'static str {
	if declaration == Selector::css("").query_function() || declaration == Selector::xpath("").query_function() {
		"query"
	} else if declaration.contains("getBoundingClientRect") {
		"measure"
	} else if declaration.contains("execCommand") {
		"clear"
	} else if declaration.contains("closest(") {
		"focus"
	} else if declaration.contains("getAttribute") {
		"attribute"
	} else if declaration.contains("innerText") {
		"text"
	} else {
		"other"
	}
}

fn summarize(call: &Call) -> Option<String> {
	let params = &call.params;
	match call.method.as_str() {
		"Runtime.evaluate" => {
			document_query_argument(params["expression"].as_str()?).map(|query| format!("query {query}"))
		}
		"Runtime.callFunctionOn" => {
			let node = params["objectId"].as_str()?;
			let declaration = params["functionDeclaration"].as_str()?;
			match function_kind(declaration) {
				"query" => Some(format!("query {} in {node}", params["arguments"][0]["value"].as_str()?)),
				kind => Some(format!("{kind} {node}")),
			}
		}
		"Input.insertText" => Some(format!("insert {}", params["text"].as_str()?)),
		"Input.dispatchKeyEvent" if params["type"] != "keyUp" => Some(format!("key {}", params["key"].as_str()?)),
		"Input.dispatchMouseEvent" if params["type"] == "mousePressed" => Some("click".to_string()),
		"DOM.setFileInputFiles" => Some(format!("files {} {}", params["objectId"].as_str()?, params["files"])),
		"DOM.focus" => Some("dom-focus".to_string()),
		"Runtime.releaseObjectGroup" => Some(format!("release {}", params["objectGroup"].as_str()?)),
		_ => None,
	}
}
