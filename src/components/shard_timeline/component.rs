use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use log::{debug, error, info};
use web_sys::{HtmlDivElement, MouseEvent, WheelEvent};

use super::config::TimelineConfig;
use super::data::load_dataset;
use super::state::TimelineState;
use super::types::Dataset;

/// Loads the dataset at `source` and renders it as an interactive blocks-by-shard timeline.
///
/// While the fetch is pending a loading line is shown; a failed fetch or an invalid dataset
/// replaces the chart with the error message.
#[component]
pub fn ShardTimeline(
	#[prop(into)] source: Signal<String>,
	#[prop(optional)] config: Option<TimelineConfig>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let dataset = LocalResource::new(move || {
		let url = source.get();
		async move {
			let result = load_dataset(&url).await;
			match &result {
				Ok(data) => info!(
					"shard-timeline: loaded {} nodes, {} links from {url}",
					data.nodes.len(),
					data.links.len()
				),
				Err(e) => error!("shard-timeline: {e}"),
			}
			result
		}
	});

	view! {
		<div class="shard-timeline" style="position: relative; width: 100%; height: 100%; overflow: hidden;">
			{move || match dataset.get() {
				None => view! { <p class="timeline-status">"Loading blocks…"</p> }.into_any(),
				Some(Err(e)) => {
					view! {
						<div class="timeline-error" role="alert">
							<h2>"Could not render the block timeline"</h2>
							<p>{e.to_string()}</p>
						</div>
					}
						.into_any()
				}
				Some(Ok(data)) => view! { <TimelineChart data=data config=config.clone() /> }.into_any(),
			}}
		</div>
	}
}

fn window_size(fallback: (f64, f64)) -> (f64, f64) {
	web_sys::window()
		.and_then(|w| Some((w.inner_width().ok()?.as_f64()?, w.inner_height().ok()?.as_f64()?)))
		.unwrap_or(fallback)
}

fn container_size(el: &HtmlDivElement, fallback: (f64, f64)) -> (f64, f64) {
	let (w, h) = (el.client_width() as f64, el.client_height() as f64);
	if w > 0.0 && h > 0.0 { (w, h) } else { fallback }
}

fn pointer(container: NodeRef<Div>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = container.get_untracked()?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
fn TimelineChart(data: Dataset, config: TimelineConfig) -> impl IntoView {
	let container_ref = NodeRef::<Div>::new();
	let fallback = config.fallback_size;
	let (title, radius, link_width, grid_opacity) = (
		config.title,
		config.node_radius,
		config.link_width,
		config.gridline_opacity,
	);
	let node_count = data.nodes.len();

	let (w, h) = window_size(fallback);
	let state = RwSignal::new(TimelineState::new(data, config, w, h));
	let frame = Memo::new(move |_| state.with(|s| s.frame()));
	let info = Memo::new(move |_| state.with(|s| s.info_text()));
	let gradients = state.with_untracked(|s| s.gradients().to_vec());

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let (w, h) = container_size(&container, fallback);
		debug!("shard-timeline: zoom configured for {w}x{h}");
		state.update(|s| s.resize(w, h));
	});

	// Removed with the chart so a remount never leaves a listener behind.
	let resize_listener = window_event_listener(ev::resize, move |_| {
		let Some(container) = container_ref.get_untracked() else {
			return;
		};
		let (w, h) = container_size(&container, fallback);
		debug!("shard-timeline: viewport {w}x{h}");
		state.update(|s| s.resize(w, h));
	});
	on_cleanup(move || resize_listener.remove());

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer(container_ref, &ev) {
			state.update(|s| s.wheel(x, y, ev.delta_y(), ev.delta_mode()));
		}
	};
	let on_dblclick = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(container_ref, &ev) {
			state.update(|s| s.dblclick(x, y));
		}
	};
	let on_mousedown = move |ev: MouseEvent| {
		// Primary button only.
		if ev.button() != 0 {
			return;
		}
		if let Some((x, y)) = pointer(container_ref, &ev) {
			state.update(|s| s.start_pan(x, y));
		}
	};
	let on_mousemove = move |ev: MouseEvent| {
		if !state.with_untracked(|s| s.pan.active) {
			return;
		}
		if let Some((x, y)) = pointer(container_ref, &ev) {
			state.update(|s| s.pan_to(x, y));
		}
	};
	let end_pan = move |_: MouseEvent| {
		if state.with_untracked(|s| s.pan.active) {
			state.update(|s| s.end_pan());
		}
	};

	let gridlines = (0..node_count)
		.map(|i| {
			let seg = move || frame.with(|f| f.gridlines[i]);
			view! {
				<line
					x1=move || seg().x1
					y1=move || seg().y1
					x2=move || seg().x2
					y2=move || seg().y2
					style:stroke="white"
					style:stroke-opacity=grid_opacity.to_string()
					style:stroke-dasharray="1"
				/>
			}
		})
		.collect_view();

	let gradient_defs = gradients
		.into_iter()
		.enumerate()
		.map(|(i, g)| {
			let seg = move || frame.with(|f| f.links[i].segment);
			view! {
				<linearGradient
					id=g.id
					gradientUnits="userSpaceOnUse"
					x1=move || seg().x1
					y1=move || seg().y1
					x2=move || seg().x2
					y2=move || seg().y2
				>
					<stop offset="0" stop-color=g.from />
					<stop offset="1" stop-color=g.to />
				</linearGradient>
			}
		})
		.collect_view();

	let nodes = (0..node_count)
		.map(|i| {
			view! {
				<circle
					cx=move || frame.with(|f| f.nodes[i].cx)
					cy=move || frame.with(|f| f.nodes[i].cy)
					r=radius
					style:fill=move || frame.with(|f| f.nodes[i].fill.clone())
					style:stroke=move || frame.with(|f| f.nodes[i].stroke)
					style:cursor="pointer"
					on:mouseover=move |_| state.update(|s| s.hover_node(Some(i)))
					on:mouseout=move |_| state.update(|s| s.hover_node(None))
					on:click=move |_| state.update(|s| s.select(i))
				/>
			}
		})
		.collect_view();

	let x_axis = move || {
		frame.with(|f| {
			let a = &f.x_axis;
			let ticks = a
				.ticks
				.iter()
				.map(|t| {
					view! {
						<g class="tick" transform=format!("translate({}, 0)", t.offset)>
							<line stroke="currentColor" y2="6" />
							<text fill="currentColor" y="9" dy="0.71em">
								{t.label.clone()}
							</text>
						</g>
					}
				})
				.collect_view();
			view! {
				<g
					class="scale_x"
					transform=format!("translate({}, {})", a.origin.0, a.origin.1)
					fill="none"
					font-size="10"
					font-family="sans-serif"
					text-anchor="middle"
				>
					<path
						class="domain"
						stroke="currentColor"
						d=format!("M{},6V0H{}V6", a.span.0, a.span.1)
					/>
					{ticks}
					<text
						transform=format!("translate({}, {})", a.label_at.0, a.label_at.1)
						fill="currentColor"
						style:text-anchor="middle"
					>
						"Timestamp"
					</text>
				</g>
			}
		})
	};

	let y_axis = move || {
		frame.with(|f| {
			let a = &f.y_axis;
			let ticks = a
				.ticks
				.iter()
				.map(|t| {
					view! {
						<g class="tick" transform=format!("translate(0, {})", t.offset)>
							<line stroke="currentColor" x2="-6" />
							<text fill="currentColor" x="-9" dy="0.32em">
								{t.label.clone()}
							</text>
						</g>
					}
				})
				.collect_view();
			view! {
				<g
					class="scale_y"
					transform=format!("translate({}, {})", a.origin.0, a.origin.1)
					fill="none"
					font-size="10"
					font-family="sans-serif"
					text-anchor="end"
				>
					<path
						class="domain"
						stroke="currentColor"
						d=format!("M-6,{}H0V{}H-6", a.span.0, a.span.1)
					/>
					{ticks}
					<text
						transform=format!("translate({}, {})", a.label_at.0, a.label_at.1)
						fill="currentColor"
						style:text-anchor="middle"
					>
						"Shard"
					</text>
				</g>
			}
		})
	};

	view! {
		<div
			node_ref=container_ref
			class="timeline-viewport"
			style="position: relative; width: 100%; height: 100%;"
		>
			<svg
				width="100%"
				height="100%"
				viewBox=move || frame.with(|f| format!("0 0 {} {}", f.width, f.height))
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=end_pan
				on:mouseleave=end_pan
				style="display: block; cursor: grab; color: white;"
			>
				<g class="graph">
					<g class="title">
						<text
							transform=move || {
								frame.with(|f| format!("translate({}, {})", f.title_at.0, f.title_at.1))
							}
							fill="currentColor"
							style:text-anchor="middle"
							style:font-size="125%"
							style:text-decoration="underline"
						>
							{title}
						</text>
					</g>
					{x_axis}
					{y_axis}
					<g class="gridlines_x">{gridlines}</g>
					<g class="links">
						<defs>{gradient_defs}</defs>
						<For
							each=move || frame.with(|f| f.link_order.clone())
							key=|i| *i
							children=move |i| {
								view! {
									<line
										x1=move || frame.with(|f| f.links[i].segment.x1)
										y1=move || frame.with(|f| f.links[i].segment.y1)
										x2=move || frame.with(|f| f.links[i].segment.x2)
										y2=move || frame.with(|f| f.links[i].segment.y2)
										style:stroke-width=link_width.to_string()
										style:stroke=move || frame.with(|f| f.links[i].stroke.clone())
										style:stroke-opacity=move || {
											frame.with(|f| f.links[i].opacity.to_string())
										}
										on:mouseover=move |_| state.update(|s| s.hover_link(Some(i)))
										on:mouseout=move |_| state.update(|s| s.hover_link(None))
									/>
								}
							}
						/>
					</g>
					<g class="nodes">{nodes}</g>
				</g>
			</svg>
			<div
				class="info"
				style="position: absolute; top: 0; left: 0; padding: 1em; color: white; text-anchor: middle;"
			>
				{move || info.get()}
			</div>
			<div class="zoom-controls" style="position: absolute; top: 1em; right: 1em;">
				<button on:click=move |_| state.update(|s| s.zoom_by(2.0))>"+"</button>
				<button on:click=move |_| state.update(|s| s.zoom_by(0.5))>"−"</button>
				<button on:click=move |_| state.update(|s| s.reset_view())>"Reset"</button>
			</div>
		</div>
	}
}
