use leptos::prelude::*;

use crate::components::infection_graph::{DataSources, InfectionGraph, load_dataset};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let sources = DataSources::default();
	let dataset = LocalResource::new(move || {
		let sources = sources.clone();
		async move { load_dataset(&sources).await }
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Could not load the infection chain"</h1>

				<p>"Errors: "</p>
				<ul class="load-errors">
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="graph-page">
				<div class="graph-header">
					<h1>"Infection Chain"</h1>
					<p class="subtitle">
						"Hover a case for details. Drag nodes to reposition. Scroll to zoom."
					</p>
				</div>
				<Suspense fallback=|| view! { <p class="loading">"Loading cases..."</p> }>
					{move || Suspend::new(async move {
						dataset.await.map(|data| view! { <InfectionGraph dataset=data /> })
					})}
				</Suspense>
			</div>
		</ErrorBoundary>
	}
}
