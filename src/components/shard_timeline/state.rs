use super::axis::{self, Tick};
use super::color::{color_for_shard, rainbow};
use super::config::TimelineConfig;
use super::scale::{LinearScale, Scales};
use super::types::Dataset;

/// Wheel delta multipliers for line and page delta modes; pixel mode uses the configured sensitivity.
const WHEEL_LINE: f64 = 0.05;
const WHEEL_PAGE: f64 = 1.0;

pub const NODE_STROKE: &str = "#ffffffaf";
pub const HIGHLIGHT: &str = "white";

/// Pan offset and zoom factor applied on top of the base scales.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn rescale_x(&self, scale: &LinearScale) -> LinearScale {
		scale.rescale(self.x, self.k)
	}

	pub fn rescale_y(&self, scale: &LinearScale) -> LinearScale {
		scale.rescale(self.y, self.k)
	}
}

/// Zoom gesture configuration, created once and kept across resizes.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomBehavior {
	pub scale_extent: (f64, f64),
	/// Viewport the gestures operate in, `(width, height)`.
	pub extent: (f64, f64),
}

impl ZoomBehavior {
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.scale_extent.0, self.scale_extent.1)
	}

	/// Scales `t` by `factor` (clamped to the scale extent) keeping `(px, py)` fixed on screen.
	pub fn zoom_at(&self, t: &ViewTransform, px: f64, py: f64, factor: f64) -> ViewTransform {
		let k = self.clamp(t.k * factor);
		let ratio = k / t.k;
		ViewTransform {
			x: px - (px - t.x) * ratio,
			y: py - (py - t.y) * ratio,
			k,
		}
	}

	/// Zooms about the middle of the extent.
	pub fn zoom_centered(&self, t: &ViewTransform, factor: f64) -> ViewTransform {
		self.zoom_at(t, self.extent.0 / 2.0, self.extent.1 / 2.0, factor)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	/// The view moved since the last `start_pan`; the click ending such a drag is not a selection.
	pub moved: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	/// 0-based node index.
	pub node: Option<usize>,
	/// Index into the link list.
	pub link: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	pub cx: f64,
	pub cy: f64,
	pub fill: String,
	pub stroke: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkGlyph {
	/// Shared by the line and its gradient.
	pub segment: Segment,
	pub stroke: String,
	pub opacity: f64,
}

/// Two-stop gradient of a link, from its source shard color to its target shard color.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientStops {
	pub id: String,
	pub from: String,
	pub to: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisFrame {
	/// Translation of the axis group.
	pub origin: (f64, f64),
	/// Extent of the domain line along the axis.
	pub span: (f64, f64),
	pub ticks: Vec<Tick>,
	/// Axis title position, relative to `origin`.
	pub label_at: (f64, f64),
}

/// Every screen position for one viewport and transform.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	pub width: f64,
	pub height: f64,
	pub title_at: (f64, f64),
	pub x_axis: AxisFrame,
	pub y_axis: AxisFrame,
	pub gridlines: Vec<Segment>,
	pub links: Vec<LinkGlyph>,
	/// Paint order of `links`; highlighted links last so they sit on top.
	pub link_order: Vec<usize>,
	pub nodes: Vec<NodeGlyph>,
}

pub struct TimelineState {
	pub data: Dataset,
	pub config: TimelineConfig,
	pub zoom: ZoomBehavior,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<usize>,
	pub width: f64,
	pub height: f64,
	scales: Scales,
	max_shard: u64,
	node_colors: Vec<String>,
	gradients: Vec<GradientStops>,
}

impl TimelineState {
	pub fn new(data: Dataset, config: TimelineConfig, width: f64, height: f64) -> Self {
		let scales = Scales::compute(&data, &config, width, height);
		let max_shard = data.max_shard();
		let node_colors = data
			.nodes
			.iter()
			.map(|n| color_for_shard(n.shard, max_shard))
			.collect::<Vec<_>>();
		let stop_color = |position: usize| {
			data.node_at(position)
				.map_or_else(|| rainbow(0.0), |n| color_for_shard(n.shard, max_shard))
		};
		let gradients = data
			.links
			.iter()
			.map(|l| GradientStops {
				id: l.gradient_id(),
				from: stop_color(l.source),
				to: stop_color(l.target),
			})
			.collect();
		let zoom = ZoomBehavior {
			scale_extent: config.scale_extent,
			extent: (width, height),
		};

		Self {
			data,
			config,
			zoom,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			scales,
			max_shard,
			node_colors,
			gradients,
		}
	}

	/// Viewport changed: new scale ranges and zoom extent, same transform.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.scales = self.scales.resized(&self.config, width, height);
		self.zoom.extent = (width, height);
	}

	/// Base scales rescaled by the current transform.
	pub fn view_scales(&self) -> Scales {
		Scales {
			x: self.transform.rescale_x(&self.scales.x),
			y: self.transform.rescale_y(&self.scales.y),
		}
	}

	pub fn gradients(&self) -> &[GradientStops] {
		&self.gradients
	}

	pub fn set_transform(&mut self, transform: ViewTransform) {
		let k = self.zoom.clamp(transform.k);
		self.transform = ViewTransform { k, ..transform };
	}

	/// Wheel zoom anchored at the pointer. `delta_mode` follows `WheelEvent.deltaMode`.
	pub fn wheel(&mut self, px: f64, py: f64, delta_y: f64, delta_mode: u32) {
		let per_unit = match delta_mode {
			0 => self.config.wheel_sensitivity,
			1 => WHEEL_LINE,
			_ => WHEEL_PAGE,
		};
		let factor = 2f64.powf(-delta_y * per_unit);
		self.transform = self.zoom.zoom_at(&self.transform, px, py, factor);
	}

	pub fn dblclick(&mut self, px: f64, py: f64) {
		self.transform = self
			.zoom
			.zoom_at(&self.transform, px, py, self.config.dblclick_factor);
	}

	/// Zooms about the viewport center, as the toolbar buttons do.
	pub fn zoom_by(&mut self, factor: f64) {
		self.transform = self.zoom.zoom_centered(&self.transform, factor);
	}

	pub fn reset_view(&mut self) {
		self.set_transform(ViewTransform::default());
		self.pan = PanState::default();
	}

	pub fn start_pan(&mut self, px: f64, py: f64) {
		self.pan = PanState {
			active: true,
			start_x: px,
			start_y: py,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
			moved: false,
		};
	}

	/// Moves the view with the pointer while a pan is in progress.
	pub fn pan_to(&mut self, px: f64, py: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (px - self.pan.start_x, py - self.pan.start_y);
		self.pan.moved |= dx != 0.0 || dy != 0.0;
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	pub fn hover_node(&mut self, node: Option<usize>) {
		self.hover.node = node;
	}

	pub fn hover_link(&mut self, link: Option<usize>) {
		self.hover.link = link;
	}

	pub fn select(&mut self, node: usize) {
		if self.pan.moved {
			return;
		}
		self.selected = Some(node);
	}

	/// Info panel contents: the clicked node as JSON, or the placeholder.
	pub fn info_text(&self) -> String {
		self.selected
			.and_then(|i| self.data.nodes.get(i))
			.map(|n| n.info_text())
			.unwrap_or_else(|| self.config.info_placeholder.to_string())
	}

	/// Links leaving the hovered node, matched on 1-based source position.
	pub fn is_link_highlighted(&self, link: usize) -> bool {
		if self.hover.link == Some(link) {
			return true;
		}
		match (self.hover.node, self.data.links.get(link)) {
			(Some(node), Some(l)) => l.source == node + 1,
			_ => false,
		}
	}

	pub fn frame(&self) -> Frame {
		let Scales { x, y } = self.view_scales();
		let (w, h) = (self.width, self.height);
		let bottom = self.config.axis_bottom(h);
		let point = |i: usize| {
			let n = &self.data.nodes[i];
			(x.apply(n.timestamp), y.apply(n.shard as f64))
		};

		let nodes = (0..self.data.nodes.len())
			.map(|i| {
				let (cx, cy) = point(i);
				let hovered = self.hover.node == Some(i);
				NodeGlyph {
					cx,
					cy,
					fill: if hovered {
						HIGHLIGHT.to_string()
					} else {
						self.node_colors[i].clone()
					},
					stroke: if hovered { "black" } else { NODE_STROKE },
				}
			})
			.collect::<Vec<_>>();

		let gridlines = nodes
			.iter()
			.map(|n| Segment {
				x1: n.cx,
				y1: n.cy,
				x2: n.cx,
				y2: bottom,
			})
			.collect();

		let links = self
			.data
			.links
			.iter()
			.enumerate()
			.map(|(i, l)| {
				let (a, b) = (&nodes[l.source - 1], &nodes[l.target - 1]);
				let segment = Segment {
					x1: a.cx,
					y1: a.cy,
					x2: b.cx,
					y2: b.cy,
				};
				if self.is_link_highlighted(i) {
					LinkGlyph {
						segment,
						stroke: HIGHLIGHT.to_string(),
						opacity: 1.0,
					}
				} else {
					LinkGlyph {
						segment,
						stroke: format!("url(#{})", self.gradients[i].id),
						opacity: self.config.link_opacity,
					}
				}
			})
			.collect();

		let (mut link_order, lifted): (Vec<usize>, Vec<usize>) =
			(0..self.data.links.len()).partition(|&i| !self.is_link_highlighted(i));
		link_order.extend(lifted);

		Frame {
			width: w,
			height: h,
			title_at: (w / 2.0, h * 0.05),
			x_axis: AxisFrame {
				origin: (0.0, bottom),
				span: x.range,
				ticks: axis::time_ticks(&x),
				label_at: (w / 2.0, h * 0.033),
			},
			y_axis: AxisFrame {
				origin: (self.config.axis_left(w), 0.0),
				span: y.range,
				ticks: axis::shard_ticks(&y, self.max_shard),
				label_at: (-w * 0.033, h / 2.0),
			},
			gridlines,
			links,
			link_order,
			nodes,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TWO: &str = r#"{
		"nodes": [
			{ "id": 1, "timestamp": 1000, "shard": 1 },
			{ "id": 2, "timestamp": 2000, "shard": 2, "miner": "m-7" }
		],
		"links": [ { "source": 1, "target": 2 } ]
	}"#;

	// Positions and ids deliberately disagree.
	const FAN: &str = r#"{
		"nodes": [
			{ "id": 10, "timestamp": 1000, "shard": 1 },
			{ "id": 20, "timestamp": 2000, "shard": 2 },
			{ "id": 30, "timestamp": 3000, "shard": 1 }
		],
		"links": [
			{ "source": 2, "target": 3 },
			{ "source": 1, "target": 2 },
			{ "source": 2, "target": 1 },
			{ "source": 3, "target": 2 }
		]
	}"#;

	fn state(text: &str) -> TimelineState {
		TimelineState::new(
			Dataset::from_json(text).unwrap(),
			TimelineConfig::default(),
			1000.0,
			800.0,
		)
	}

	#[test]
	fn link_endpoints_match_node_positions() {
		let frame = state(TWO).frame();
		let (a, b) = (&frame.nodes[0], &frame.nodes[1]);
		assert_eq!((a.cx, a.cy), (150.0, 400.0));
		assert_eq!((b.cx, b.cy), (900.0, 100.0));
		let seg = frame.links[0].segment;
		assert_eq!((seg.x1, seg.y1, seg.x2, seg.y2), (a.cx, a.cy, b.cx, b.cy));
	}

	#[test]
	fn gridlines_run_to_the_time_axis() {
		let frame = state(TWO).frame();
		let g = frame.gridlines[1];
		assert_eq!((g.x1, g.y1), (frame.nodes[1].cx, frame.nodes[1].cy));
		assert_eq!(g.x2, g.x1);
		assert_eq!(g.y2, 760.0);
	}

	#[test]
	fn idle_links_use_gradient_at_half_opacity() {
		let s = state(TWO);
		let frame = s.frame();
		assert_eq!(frame.links[0].stroke, "url(#s1t2)");
		assert_eq!(frame.links[0].opacity, 0.5);
		let g = &s.gradients()[0];
		assert_eq!(g.id, "s1t2");
		assert_eq!(g.from, color_for_shard(1, 2));
		assert_eq!(g.to, color_for_shard(2, 2));
	}

	#[test]
	fn hovering_a_node_lifts_links_from_its_position() {
		let mut s = state(FAN);
		s.hover_node(Some(1));
		let frame = s.frame();
		let opacities: Vec<_> = frame.links.iter().map(|l| l.opacity).collect();
		assert_eq!(opacities, [1.0, 0.5, 1.0, 0.5]);
		assert_eq!(frame.links[0].stroke, HIGHLIGHT);
		assert_eq!(frame.link_order, [1, 3, 0, 2]);
		assert_eq!(frame.nodes[1].fill, HIGHLIGHT);
		assert_eq!(frame.nodes[1].stroke, "black");

		s.hover_node(None);
		let frame = s.frame();
		assert!(frame.links.iter().all(|l| l.opacity == 0.5));
		assert_eq!(frame.link_order, [0, 1, 2, 3]);
		assert_eq!(frame.nodes[1].fill, color_for_shard(2, 2));
		assert_eq!(frame.nodes[1].stroke, NODE_STROKE);
	}

	#[test]
	fn hovering_a_link_lifts_only_that_link() {
		let mut s = state(FAN);
		s.hover_link(Some(2));
		let frame = s.frame();
		assert_eq!(frame.links[2].stroke, HIGHLIGHT);
		assert_eq!(frame.links[2].opacity, 1.0);
		assert_eq!(frame.links[0].opacity, 0.5);
		assert_eq!(frame.link_order, [0, 1, 3, 2]);
		s.hover_link(None);
		assert_eq!(s.frame().links[2].stroke, "url(#s2t1)");
	}

	#[test]
	fn clicking_shows_full_attributes() {
		let mut s = state(TWO);
		assert_eq!(s.info_text(), "<click_node_to_get_data>");
		s.select(1);
		assert_eq!(
			s.info_text(),
			r#"{"id":2,"timestamp":2,"shard":2,"miner":"m-7"}"#
		);
	}

	#[test]
	fn zoom_rescales_positions() {
		let mut s = state(TWO);
		let base = s.view_scales();
		s.transform = s.zoom.zoom_at(&s.transform, 300.0, 200.0, 4.0);
		let t = s.transform;
		assert_eq!(t.k, 4.0);
		let frame = s.frame();
		for (node, glyph) in s.data.nodes.iter().zip(&frame.nodes) {
			let want_x = t.x + t.k * base.x.apply(node.timestamp);
			let want_y = t.y + t.k * base.y.apply(node.shard as f64);
			assert!((glyph.cx - want_x).abs() < 1e-6);
			assert!((glyph.cy - want_y).abs() < 1e-6);
		}
		assert!((frame.nodes[0].cx - 150.0).abs() > 1.0);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let zoom = ZoomBehavior {
			scale_extent: (0.25, 100.0),
			extent: (1000.0, 800.0),
		};
		let t = zoom.zoom_at(&ViewTransform::default(), 300.0, 200.0, 2.0);
		assert_eq!((t.x + t.k * 300.0, t.y + t.k * 200.0), (300.0, 200.0));
		let c = zoom.zoom_centered(&ViewTransform::default(), 2.0);
		assert_eq!((c.x, c.y), (-500.0, -400.0));
	}

	#[test]
	fn scale_factor_is_clamped() {
		let mut s = state(TWO);
		s.wheel(0.0, 0.0, -1.0e6, 0);
		assert_eq!(s.transform.k, 100.0);
		s.wheel(0.0, 0.0, 1.0e6, 0);
		assert_eq!(s.transform.k, 0.25);
		assert_eq!(s.zoom.clamp(0.01), 0.25);
		s.set_transform(ViewTransform {
			x: 5.0,
			y: 5.0,
			k: 1000.0,
		});
		assert_eq!(s.transform.k, 100.0);
	}

	#[test]
	fn wheel_direction_and_modes() {
		let mut s = state(TWO);
		s.wheel(10.0, 10.0, -500.0, 0);
		assert_eq!(s.transform.k, 2.0);
		let mut s = state(TWO);
		s.wheel(10.0, 10.0, 20.0, 1);
		assert_eq!(s.transform.k, 0.5);
	}

	#[test]
	fn dblclick_doubles() {
		let mut s = state(TWO);
		s.dblclick(500.0, 400.0);
		assert_eq!(s.transform.k, 2.0);
	}

	#[test]
	fn toolbar_zoom_and_reset() {
		let mut s = state(TWO);
		s.zoom_by(2.0);
		assert_eq!(s.transform, ViewTransform { x: -500.0, y: -400.0, k: 2.0 });
		s.zoom_by(0.5);
		assert_eq!(s.transform, ViewTransform::default());
		s.zoom_by(1000.0);
		assert_eq!(s.transform.k, 100.0);
		s.reset_view();
		assert_eq!(s.transform, ViewTransform::default());
	}

	#[test]
	fn pan_follows_pointer() {
		let mut s = state(TWO);
		s.pan_to(10.0, 10.0);
		assert_eq!(s.transform, ViewTransform::default());
		s.start_pan(100.0, 100.0);
		s.pan_to(130.0, 80.0);
		assert_eq!((s.transform.x, s.transform.y), (30.0, -20.0));
		s.end_pan();
		s.pan_to(500.0, 500.0);
		assert_eq!((s.transform.x, s.transform.y), (30.0, -20.0));
	}

	#[test]
	fn click_ending_a_drag_does_not_select() {
		let mut s = state(TWO);
		s.start_pan(150.0, 400.0);
		s.pan_to(180.0, 420.0);
		s.end_pan();
		s.select(0);
		assert_eq!(s.info_text(), "<click_node_to_get_data>");

		s.start_pan(150.0, 400.0);
		s.end_pan();
		s.select(0);
		assert_eq!(s.info_text(), r#"{"id":1,"timestamp":1,"shard":1}"#);
	}

	#[test]
	fn pointer_returning_to_start_still_counts_as_drag() {
		let mut s = state(TWO);
		s.start_pan(10.0, 10.0);
		s.pan_to(40.0, 10.0);
		s.pan_to(10.0, 10.0);
		s.end_pan();
		s.select(1);
		assert_eq!(s.selected, None);
	}

	#[test]
	fn resize_moves_everything_but_keeps_zoom() {
		let mut s = state(TWO);
		s.transform = ViewTransform {
			x: 10.0,
			y: 0.0,
			k: 1.0,
		};
		s.resize(600.0, 400.0);
		assert_eq!(s.zoom.extent, (600.0, 400.0));
		assert_eq!(s.transform.x, 10.0);
		let frame = s.frame();
		assert_eq!((frame.width, frame.height), (600.0, 400.0));
		assert!((frame.nodes[0].cx - 160.0).abs() < 1e-9);
		assert!((frame.nodes[1].cx - 510.0).abs() < 1e-9);
		assert!((frame.nodes[1].cy - 100.0).abs() < 1e-9);
		assert_eq!(frame.x_axis.origin, (0.0, 380.0));
		assert_eq!(frame.gridlines[0].y2, 380.0);
		assert_eq!(frame.y_axis.origin, (30.0, 0.0));
	}

	#[test]
	fn shard_axis_has_one_tick_per_shard() {
		let frame = state(FAN).frame();
		let labels: Vec<_> = frame.y_axis.ticks.iter().map(|t| t.label.clone()).collect();
		assert_eq!(labels, ["1", "2"]);
		assert!(!frame.x_axis.ticks.is_empty());
	}
}
