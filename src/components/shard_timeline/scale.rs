//! Continuous linear scales mapping data values onto pixels.

use super::config::TimelineConfig;
use super::types::Dataset;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	pub domain: (f64, f64),
	pub range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// Maps a domain value to the range. A zero-width domain maps everything to the range midpoint.
	pub fn apply(&self, value: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		let t = if d1 - d0 == 0.0 {
			0.5
		} else {
			(value - d0) / (d1 - d0)
		};
		r0 + t * (r1 - r0)
	}

	/// Maps a range value back to the domain. A zero-width range maps to the domain midpoint.
	pub fn invert(&self, pixel: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		let t = if r1 - r0 == 0.0 {
			0.5
		} else {
			(pixel - r0) / (r1 - r0)
		};
		d0 + t * (d1 - d0)
	}

	pub fn with_range(self, range: (f64, f64)) -> Self {
		Self { range, ..self }
	}

	/// Same range, domain shifted so that `rescaled(v) == offset + k * self(v)`.
	pub fn rescale(&self, offset: f64, k: f64) -> Self {
		let (r0, r1) = self.range;
		let inverse = |p: f64| self.invert((p - offset) / k);
		Self {
			domain: (inverse(r0), inverse(r1)),
			range: self.range,
		}
	}
}

/// The time (x) and shard (y) scales of a dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scales {
	pub x: LinearScale,
	pub y: LinearScale,
}

impl Scales {
	/// Builds both scales in a single pass over the nodes.
	pub fn compute(data: &Dataset, config: &TimelineConfig, width: f64, height: f64) -> Self {
		let mut extent: Option<(f64, f64)> = None;
		let mut max_shard = 0;
		for node in &data.nodes {
			extent = Some(match extent {
				None => (node.timestamp, node.timestamp),
				Some((lo, hi)) => (lo.min(node.timestamp), hi.max(node.timestamp)),
			});
			max_shard = max_shard.max(node.shard);
		}

		let x_domain = match extent {
			None => (0.0, 1.0),
			Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
			Some(extent) => extent,
		};
		let y_domain = if max_shard == 0 {
			(1.0, 0.0)
		} else {
			(max_shard as f64, 0.0)
		};

		Self {
			x: LinearScale::new(x_domain, config.x_range(width)),
			y: LinearScale::new(y_domain, config.y_range(height)),
		}
	}

	/// New ranges for a viewport, domains untouched.
	pub fn resized(self, config: &TimelineConfig, width: f64, height: f64) -> Self {
		Self {
			x: self.x.with_range(config.x_range(width)),
			y: self.y.with_range(config.y_range(height)),
		}
	}
}
