use serde::Deserialize;
use serde_json::{Map, Value};

/// A block record: where it sits in time and which shard produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockNode {
	pub id: i64,
	/// Seconds since the epoch, already normalized from milliseconds.
	pub timestamp: f64,
	pub shard: u64,
	/// Every attribute of the source record in document order, with `timestamp` normalized.
	pub attributes: Map<String, Value>,
}

impl BlockNode {
	/// JSON rendering shown in the info panel.
	pub fn info_text(&self) -> String {
		Value::Object(self.attributes.clone()).to_string()
	}
}

/// A directed reference between two blocks, both ends 1-based node positions.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct BlockLink {
	pub source: usize,
	pub target: usize,
}

impl BlockLink {
	/// Identifier of the gradient painting this link.
	pub fn gradient_id(&self) -> String {
		format!("s{}t{}", self.source, self.target)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
	pub nodes: Vec<BlockNode>,
	pub links: Vec<BlockLink>,
}

impl Dataset {
	/// Resolves a 1-based node position.
	pub fn node_at(&self, position: usize) -> Option<&BlockNode> {
		position.checked_sub(1).and_then(|i| self.nodes.get(i))
	}

	pub fn max_shard(&self) -> u64 {
		self.nodes.iter().map(|n| n.shard).max().unwrap_or(0)
	}
}
