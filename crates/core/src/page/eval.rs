//! JavaScript evaluation for [`Page`].

use serde_json::{Value, json};
use tracing::trace;
use wa_protocol::{ExceptionDetails, RemoteObject};

use super::Page;
use crate::error::{Error, Result};

/// Object group every remote object created through a [`Page`] is placed in.
pub(crate) const OBJECT_GROUP: &str = "wa";

impl Page {
	/// Evaluates `expression` in the page and returns its JSON value.
	///
	/// Promises are awaited. `undefined` comes back as `null`.
	pub async fn evaluate(&self, expression: &str) -> Result<Value> {
		let object = self.runtime_evaluate(expression, true).await?;
		Ok(object.value.unwrap_or(Value::Null))
	}

	/// Evaluates `expression` and keeps the result as a remote object.
	pub async fn evaluate_handle(&self, expression: &str) -> Result<RemoteObject> {
		self.runtime_evaluate(expression, false).await
	}

	/// Calls `declaration` with `this` bound to `object_id`.
	///
	/// A returned handle lives until [`Page::release_handles`].
	pub async fn call_function_on(
		&self,
		object_id: &str,
		declaration: &str,
		args: &[Value],
		return_by_value: bool,
	) -> Result<RemoteObject> {
		let arguments: Vec<Value> = args.iter().map(|v| json!({ "value": v })).collect();
		let result = self
			.send(
				"Runtime.callFunctionOn",
				json!({
					"objectId": object_id,
					"functionDeclaration": declaration,
					"arguments": arguments,
					"returnByValue": return_by_value,
					"awaitPromise": true,
					"objectGroup": OBJECT_GROUP,
				}),
			)
			.await?;
		remote_result(result)
	}

	/// Drops every remote object created since the previous call. Failures are ignored.
	///
	/// Outstanding [`ElementHandle`](crate::ElementHandle)s become stale.
	pub async fn release_handles(&self) {
		let params = json!({ "objectGroup": OBJECT_GROUP });
		if let Err(e) = self.send("Runtime.releaseObjectGroup", params).await {
			trace!(target = "wa", error = %e, "releaseObjectGroup failed");
		}
	}

	/// Drops a remote object reference. Failures are ignored.
	pub async fn release_object(&self, object_id: &str) {
		if let Err(e) = self.send("Runtime.releaseObject", json!({ "objectId": object_id })).await {
			trace!(target = "wa", error = %e, "releaseObject failed");
		}
	}

	async fn runtime_evaluate(&self, expression: &str, return_by_value: bool) -> Result<RemoteObject> {
		let result = self
			.send(
				"Runtime.evaluate",
				json!({
					"expression": expression,
					"returnByValue": return_by_value,
					"awaitPromise": true,
					"objectGroup": OBJECT_GROUP,
				}),
			)
			.await?;
		remote_result(result)
	}
}

/// Extracts the `result` object, turning `exceptionDetails` into [`Error::JsException`].
fn remote_result(mut result: Value) -> Result<RemoteObject> {
	if let Some(details) = result.get_mut("exceptionDetails").map(Value::take) {
		let details: ExceptionDetails = serde_json::from_value(details)?;
		return Err(Error::JsException(details.message()));
	}
	let object = result
		.get_mut("result")
		.map(Value::take)
		.ok_or_else(|| Error::Protocol("missing result object".into()))?;
	Ok(serde_json::from_value(object)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remote_result_reads_value() {
		let object = remote_result(json!({ "result": { "type": "string", "value": "complete" } })).unwrap();
		assert_eq!(object.kind, "string");
		assert_eq!(object.value, Some(json!("complete")));
	}

	#[test]
	fn remote_result_surfaces_exceptions() {
		let err = remote_result(json!({
			"result": { "type": "object", "subtype": "error" },
			"exceptionDetails": {
				"text": "Uncaught",
				"exception": { "type": "object", "description": "ReferenceError: foo is not defined" }
			}
		}))
		.unwrap_err();
		match err {
			Error::JsException(message) => assert_eq!(message, "ReferenceError: foo is not defined"),
			other => panic!("expected js exception, got {other:?}"),
		}
	}

	#[test]
	fn remote_result_requires_result() {
		assert!(matches!(remote_result(json!({})), Err(Error::Protocol(_))));
	}
}
