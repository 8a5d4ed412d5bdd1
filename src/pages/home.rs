use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::shard_timeline::ShardTimeline;

/// Dataset shown when the page has no `src` query parameter.
const DEFAULT_SOURCE: &str = "sample.json";

/// Default Home Page: the timeline of the dataset named by `?src=`.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let source = Signal::derive(move || {
		query
			.with(|q| q.get("src"))
			.filter(|s| !s.is_empty())
			.unwrap_or_else(|| DEFAULT_SOURCE.to_string())
	});

	view! {
		<div class="fullscreen-graph">
			<ShardTimeline source=source />
		</div>
	}
}
