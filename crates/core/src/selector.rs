//! Element selectors and their lowering to in-page JavaScript.
//!
//! Both selector kinds compile to a function that is called with `this` bound
//! to the search root (the document or an element) and returns an array of
//! matching nodes in document order.

use std::borrow::Cow;
use std::fmt;

/// CSS or XPath element query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
	Css(Cow<'static, str>),
	XPath(Cow<'static, str>),
}

const CSS_QUERY_FN: &str = "function(selector) { return Array.from(this.querySelectorAll(selector)); }";

const XPATH_QUERY_FN: &str = "function(expression) { \
	const doc = this.ownerDocument || this; \
	const snapshot = doc.evaluate(expression, this, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
	const nodes = []; \
	for (let i = 0; i < snapshot.snapshotLength; i++) nodes.push(snapshot.snapshotItem(i)); \
	return nodes; \
}";

impl Selector {
	pub const fn css(expr: &'static str) -> Self {
		Selector::Css(Cow::Borrowed(expr))
	}

	pub const fn xpath(expr: &'static str) -> Self {
		Selector::XPath(Cow::Borrowed(expr))
	}

	pub fn expression(&self) -> &str {
		match self {
			Selector::Css(expr) | Selector::XPath(expr) => expr,
		}
	}

	/// Function declaration for `Runtime.callFunctionOn`, taking the expression as its only argument.
	pub fn query_function(&self) -> &'static str {
		match self {
			Selector::Css(_) => CSS_QUERY_FN,
			Selector::XPath(_) => XPATH_QUERY_FN,
		}
	}

	/// Standalone expression querying from `document`, for `Runtime.evaluate`.
	pub fn document_query(&self) -> String {
		format!("({}).call(document, {})", self.query_function(), js_string(self.expression()))
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Selector::Css(expr) => write!(f, "css={expr}"),
			Selector::XPath(expr) => write!(f, "xpath={expr}"),
		}
	}
}

/// Encodes a string as a JavaScript string literal.
pub fn js_string(value: &str) -> String {
	// JSON string literals are valid JavaScript apart from U+2028/U+2029.
	serde_json::Value::String(value.to_string())
		.to_string()
		.replace('\u{2028}', "\\u2028")
		.replace('\u{2029}', "\\u2029")
}
