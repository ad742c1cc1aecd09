use leptos::prelude::*;

use crate::topology::{NodeId, node_def, node_detail};

fn tag_list(title: &'static str, items: &'static [&'static str]) -> impl IntoView {
	(!items.is_empty()).then(|| {
		view! {
			<div class="detail__section">
				<h4>{title}</h4>
				<ul class="tags">
					{items.iter().map(|item| view! { <li>{*item}</li> }).collect_view()}
				</ul>
			</div>
		}
	})
}

/// Static documentation of the selected node.
#[component]
pub fn DetailPanel(
	#[prop(into)] node_id: Signal<Option<NodeId>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	move || {
		let Some(detail) = node_id.get().and_then(node_detail) else {
			return view! {
				<section class="panel detail detail--empty">
					<p class="panel__empty">"Select a component on the map to see how it works."</p>
				</section>
			}
			.into_any();
		};
		let category = node_id
			.get()
			.and_then(node_def)
			.map(|n| n.category.label())
			.unwrap_or_default();

		view! {
			<section class="panel detail">
				<header class="panel__title">
					<div>
						<span class="detail__category">{category}</span>
						<h2>{detail.title}</h2>
						<p class="detail__subtitle">{detail.subtitle}</p>
					</div>
					<button class="button button--ghost" title="Close" on:click=move |_| on_close.run(())>
						"✕"
					</button>
				</header>
				<div class="panel__body">
					<p class="detail__content">{detail.content}</p>
					{tag_list("Algorithms", detail.algorithms)}
					{tag_list("Tech stack", detail.tech_stack)}
					{tag_list("Key concepts", detail.key_concepts)}
					{tag_list("KPIs", detail.kpis)}
					{detail.cross_domain_impact.map(|impact| view! {
						<div class="detail__section">
							<h4>"Cross-domain impact"</h4>
							<ul class="impact impact--in">
								{impact.inputs.iter().map(|i| view! {
									<li><strong>{i.source}</strong>" → "{i.benefit}</li>
								}).collect_view()}
							</ul>
							<ul class="impact impact--out">
								{impact.outputs.iter().map(|o| view! {
									<li><strong>{o.target}</strong>" ← "{o.improvement}</li>
								}).collect_view()}
							</ul>
						</div>
					})}
				</div>
			</section>
		}
		.into_any()
	}
}
