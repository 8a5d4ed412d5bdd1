use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::types::{BlockLink, BlockNode, Dataset};

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DatasetError {
	#[error("failed to fetch dataset from {url}: {reason}")]
	Fetch { url: String, reason: String },
	#[error("dataset request for {url} returned HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("failed to read dataset body from {url}: {reason}")]
	Body { url: String, reason: String },
	#[error("malformed dataset: {0}")]
	Parse(String),
	#[error("node {position}: field `{field}` is missing or not {expected}")]
	NodeField {
		position: usize,
		field: &'static str,
		expected: &'static str,
	},
	#[error("link {index}: {end} {value} does not reference a node in 1..={count}")]
	LinkOutOfRange {
		index: usize,
		end: &'static str,
		value: usize,
		count: usize,
	},
}

#[derive(Deserialize)]
struct RawDataset {
	nodes: Vec<Map<String, Value>>,
	links: Vec<BlockLink>,
}

impl Dataset {
	/// Parses and validates a `{ nodes, links }` document, normalizing timestamps to seconds.
	pub fn from_json(text: &str) -> Result<Self, DatasetError> {
		let raw: RawDataset =
			serde_json::from_str(text).map_err(|e| DatasetError::Parse(e.to_string()))?;

		let mut nodes = raw
			.nodes
			.into_iter()
			.enumerate()
			.map(|(i, attributes)| node_from_attributes(i + 1, attributes))
			.collect::<Result<Vec<_>, _>>()?;

		let count = nodes.len();
		for (index, link) in raw.links.iter().enumerate() {
			for (end, value) in [("source", link.source), ("target", link.target)] {
				if value == 0 || value > count {
					return Err(DatasetError::LinkOutOfRange {
						index,
						end,
						value,
						count,
					});
				}
			}
		}

		normalize(&mut nodes);
		Ok(Self {
			nodes,
			links: raw.links,
		})
	}
}

fn node_from_attributes(
	position: usize,
	attributes: Map<String, Value>,
) -> Result<BlockNode, DatasetError> {
	let field = |field: &'static str, expected: &'static str| DatasetError::NodeField {
		position,
		field,
		expected,
	};
	let id = attributes
		.get("id")
		.and_then(Value::as_i64)
		.ok_or_else(|| field("id", "an integer"))?;
	let timestamp = attributes
		.get("timestamp")
		.and_then(Value::as_f64)
		.ok_or_else(|| field("timestamp", "a number"))?;
	let shard = attributes
		.get("shard")
		.and_then(Value::as_u64)
		.ok_or_else(|| field("shard", "a non-negative integer"))?;

	Ok(BlockNode {
		id,
		timestamp,
		shard,
		attributes,
	})
}

/// Converts millisecond timestamps to seconds, in the typed field and the attribute map alike.
pub fn normalize(nodes: &mut [BlockNode]) {
	for node in nodes {
		node.timestamp /= 1000.0;
		node.attributes
			.insert("timestamp".into(), seconds_value(node.timestamp));
	}
}

fn seconds_value(seconds: f64) -> Value {
	if seconds.fract() == 0.0 && seconds.abs() < MAX_EXACT_INT {
		Value::from(seconds as i64)
	} else {
		Number::from_f64(seconds).map_or(Value::Null, Value::Number)
	}
}

/// Fetches and parses the dataset at `url`. No retry, no timeout.
pub async fn load_dataset(url: &str) -> Result<Dataset, DatasetError> {
	let fetch_err = |reason: String| DatasetError::Fetch {
		url: url.to_string(),
		reason,
	};
	let body_err = |reason: String| DatasetError::Body {
		url: url.to_string(),
		reason,
	};

	let window = web_sys::window().ok_or_else(|| fetch_err("no window".into()))?;
	let resp_value = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| fetch_err(format!("{e:?}")))?;
	let resp: Response = resp_value
		.dyn_into()
		.map_err(|_| fetch_err("not a Response".into()))?;
	if !resp.ok() {
		return Err(DatasetError::Status {
			url: url.to_string(),
			status: resp.status(),
		});
	}

	let text = JsFuture::from(resp.text().map_err(|e| body_err(format!("{e:?}")))?)
		.await
		.map_err(|e| body_err(format!("{e:?}")))?
		.as_string()
		.ok_or_else(|| body_err("body is not text".into()))?;

	Dataset::from_json(&text)
}
