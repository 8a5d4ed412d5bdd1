/// Layout and interaction constants of the shard timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineConfig {
	pub title: &'static str,
	pub info_placeholder: &'static str,
	/// Gap between the left edge and the earliest block.
	pub margin_left: f64,
	/// Gap between the latest block and the right edge.
	pub margin_right: f64,
	/// Vertical gap above the top shard and below shard zero.
	pub margin_vertical: f64,
	/// Axis placement as a fraction of the viewport, shared by both axes: the time axis sits this
	/// far above the bottom edge and the shard axis this far right of the left edge.
	pub axis_inset: f64,
	/// Initial zoom limits; the zoom behavior owns them once the chart exists.
	pub scale_extent: (f64, f64),
	pub wheel_sensitivity: f64,
	pub dblclick_factor: f64,
	pub node_radius: f64,
	pub link_width: f64,
	pub link_opacity: f64,
	pub gridline_opacity: f64,
	/// Used when the container has no measurable size.
	pub fallback_size: (f64, f64),
}

impl Default for TimelineConfig {
	fn default() -> Self {
		Self {
			title: "Blocks by Shard over Time",
			info_placeholder: "<click_node_to_get_data>",
			margin_left: 150.0,
			margin_right: 100.0,
			margin_vertical: 100.0,
			axis_inset: 0.05,
			scale_extent: (0.25, 100.0),
			wheel_sensitivity: 0.002,
			dblclick_factor: 2.0,
			node_radius: 4.0,
			link_width: 2.0,
			link_opacity: 0.5,
			gridline_opacity: 0.1,
			fallback_size: (800.0, 600.0),
		}
	}
}

impl TimelineConfig {
	pub fn x_range(&self, width: f64) -> (f64, f64) {
		(self.margin_left, width - self.margin_right)
	}

	pub fn y_range(&self, height: f64) -> (f64, f64) {
		(self.margin_vertical, height - self.margin_vertical)
	}

	/// Vertical position of the time axis, where gridlines end.
	pub fn axis_bottom(&self, height: f64) -> f64 {
		height - height * self.axis_inset
	}

	/// Horizontal position of the shard axis.
	pub fn axis_left(&self, width: f64) -> f64 {
		width * self.axis_inset
	}
}
