//! The scripted search session: catalog update, ingestion, retrieval,
//! reranking, RAG, caching and the analytics feedback loop.

use serde_json::{Value, json};

use crate::topology::{EdgeRef, NodeId, TopologyError, find_edge, node_def};

/// Cluster regions offered by the region selector.
pub const REGIONS: &[&str] = &[
	"US East (N. Virginia)",
	"EU West (Ireland)",
	"Asia Pacific (Tokyo)",
	"South America (São Paulo)",
];

/// Region selected on load.
pub const DEFAULT_REGION: &str = "US East (N. Virginia)";

/// Direction a metric moves in; drawn as an arrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
	/// Higher is reported.
	Up,
	/// Lower is reported.
	Down,
}

/// Business metric attached to a step.
#[derive(Clone, Debug, PartialEq)]
pub struct RoiMetric {
	/// Metric name.
	pub label: String,
	/// Display value, already formatted.
	pub value: String,
	/// Which way it moves.
	pub trend: Trend,
}

/// Inspector rendering of [`InspectorPayload::data`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualType {
	/// Pretty-printed JSON.
	#[default]
	Json,
	/// Ordered list built from the `results` array (`sku`, `score`).
	Ranking,
}

/// Content of the data inspector for one step.
#[derive(Clone, Debug, PartialEq)]
pub struct InspectorPayload {
	/// Heading.
	pub title: String,
	/// What happens at this stage.
	pub description: String,
	/// Why it matters to the business.
	pub impact: Option<String>,
	/// Headline metric, if any.
	pub roi_metric: Option<RoiMetric>,
	/// Illustrative data flowing through the stage.
	pub data: Value,
	/// How `data` is rendered.
	pub visual_type: VisualType,
}

/// One scripted step of the session.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationStep {
	/// Zero-based position in the script.
	pub step_id: usize,
	/// Node highlighted while the step is current.
	pub node: NodeId,
	/// Edge animated while the step is current.
	pub edge: Option<EdgeRef>,
	/// Console line pushed when the step is applied.
	pub log: String,
	/// Inspector content for the step.
	pub inspector: Option<InspectorPayload>,
}

struct StepBuilder {
	step: SimulationStep,
}

impl StepBuilder {
	fn new(step_id: usize, node: NodeId, log: impl Into<String>) -> Self {
		Self {
			step: SimulationStep {
				step_id,
				node,
				edge: None,
				log: log.into(),
				inspector: None,
			},
		}
	}

	fn edge(mut self, from: NodeId, to: NodeId) -> Self {
		self.step.edge = Some(EdgeRef::new(from, to));
		self
	}

	fn inspect(
		mut self,
		title: &str,
		description: &str,
		impact: &str,
		metric: (&str, &str, Trend),
		data: Value,
	) -> Self {
		let (label, value, trend) = metric;
		self.step.inspector = Some(InspectorPayload {
			title: title.into(),
			description: description.into(),
			impact: Some(impact.into()),
			roi_metric: Some(RoiMetric {
				label: label.into(),
				value: value.into(),
				trend,
			}),
			data,
			visual_type: VisualType::Json,
		});
		self
	}

	fn ranking(mut self) -> Self {
		if let Some(inspector) = self.step.inspector.as_mut() {
			inspector.visual_type = VisualType::Ranking;
		}
		self
	}

	fn build(self) -> SimulationStep {
		self.step
	}
}

/// Builds the step list. `region` only changes the log line of the sync step.
pub fn search_session_steps(region: &str) -> Vec<SimulationStep> {
	use NodeId::*;
	use Trend::{Down, Up};

	vec![
		// merchant action
		StepBuilder::new(0, MerchantDashboard, "Merchant: price update")
			.edge(MerchantDashboard, Connectors)
			.inspect(
				"Catalog Update",
				"The merchant opens the portal and applies a Black Friday discount to the gaming laptop, issuing an update against the relational catalog.",
				"Initial trigger for the ingestion and indexing pipeline.",
				("Time to Web", "< 2s", Down),
				json!({ "user": "merchant_123", "action": "update_price", "sku": "NB-GAMER-X", "new_price": 1150 }),
			)
			.build(),
		// ingestion
		StepBuilder::new(1, Connectors, format!("Sync: product catalog ({region})"))
			.edge(Connectors, KafkaStream)
			.inspect(
				"CDC Database Sync",
				"A price change is detected in the ERP. The connector publishes an update event to the Kafka pipeline.",
				"Guarantees the price shown in search matches the checkout price.",
				("Sync Lag", "< 200ms", Down),
				json!({ "source": "Postgres", "table": "products", "op": "UPDATE", "sku": "NB-GAMER-X", "price_old": 1200, "price_new": 1150 }),
			)
			.build(),
		StepBuilder::new(2, MlInference, "ML: generating embeddings")
			.edge(MlInference, Elasticsearch)
			.inspect(
				"Inference Pipeline",
				"The pipeline reprocesses the product, producing a dense vector (e5-base) and a sparse vector (ELSER) so semantic search stays current.",
				"Enables semantic matches (\"laptop for gaming\") even when the exact keyword is absent.",
				("Inference Time", "45ms", Down),
				json!({ "model": "ELSER v2 + e5-base", "embedding_dim": 1024, "tokens_generated": 128 }),
			)
			.build(),
		StepBuilder::new(3, Elasticsearch, "Elastic: hybrid indexing")
			.edge(MlInference, Elasticsearch)
			.inspect(
				"Indexing Document",
				"Stores a JSON document with price (float), description (text), dense vector (knn) and sparse vector (rank_features).",
				"Product searchable in under a second after the update.",
				("Refresh Rate", "1s", Up),
				json!({ "index": "products-v4", "shard": 2, "doc_id": "p_9982", "strategy": "Log Structured Merge" }),
			)
			.build(),
		// search
		StepBuilder::new(4, StorefrontUi, "User: searches \"best gaming laptop\"")
			.inspect(
				"User Intent",
				"The shopper types a natural-language query. The frontend captures keystroke events.",
				"Captures high-value purchase intent.",
				("Est. Ticket", "$1,200", Up),
				json!({ "query": "best value gaming laptop", "device": "Desktop", "session_id": "s_8821" }),
			)
			.build(),
		StepBuilder::new(5, SearchApi, "API: pre-processing")
			.edge(StorefrontUi, SearchApi)
			.inspect(
				"Query Expansion",
				"The API recognises \"gaming\" as a category and expands synonyms (notebook -> laptop). Stop words are removed.",
				"Raises recall: more relevant products are found.",
				("Zero Results", "0%", Down),
				json!({ "original": "gaming laptop", "expanded": "(notebook OR laptop) AND (category:gaming OR gpu:rtx)", "filters_extracted": [] }),
			)
			.build(),
		StepBuilder::new(6, Elasticsearch, "Elastic: hybrid vector search")
			.edge(SearchApi, Elasticsearch)
			.inspect(
				"Retrieval (RRF)",
				"Runs in parallel: 1. BM25 search (exact text). 2. kNN search (vector). 3. Merges both rankings with Reciprocal Rank Fusion.",
				"Best of both worlds: keyword precision plus contextual understanding.",
				("Recall@50", "98%", Up),
				json!({ "bm25_hits": 1400, "knn_hits": 100, "rrf_top_score": 0.95, "latency": "12ms" }),
			)
			.build(),
		StepBuilder::new(7, Reranker, "ML: semantic reranking")
			.edge(Elasticsearch, Reranker)
			.inspect(
				"Learning to Rank",
				"Scores the top 50 results with a heavy cross-encoder model and reorders them by strict relevance.",
				"Puts the product most likely to be bought in position #1.",
				("Precision@10", "+15%", Up),
				json!({
					"model": "ms-marco-MiniLM-L-12-v2",
					"input_count": 50,
					"output_count": 10,
					"results": [
						{ "sku": "NB-GAMER-X", "title": "Gamer X 15 RTX 4070", "score": 0.97 },
						{ "sku": "NB-GAMER-S", "title": "Gamer S 14 RTX 4060", "score": 0.91 },
						{ "sku": "NB-CREATOR-7", "title": "Creator 7 RTX 4050", "score": 0.84 },
						{ "sku": "NB-ULTRA-13", "title": "Ultra 13 (integrated)", "score": 0.41 }
					]
				}),
			)
			.ranking()
			.build(),
		// rag
		StepBuilder::new(8, GenaiGateway, "GenAI: purchase summary")
			.edge(Reranker, GenaiGateway)
			.inspect(
				"RAG Generation",
				"Sends the specs of the top 5 products to Gemini Pro to write a personalised buying guide.",
				"Builds shopper confidence by explaining technical differences in plain words.",
				("Time on Site", "+40s", Up),
				json!({ "prompt_tokens": 850, "model": "gemini-1.5-pro", "temperature": 0.2, "task": "summarize_comparison" }),
			)
			.build(),
		StepBuilder::new(9, RedisCache, "Redis: saving response")
			.edge(GenaiGateway, RedisCache)
			.inspect(
				"Semantic Cache Write",
				"Stores the LLM answer and the query embedding in Redis. Similar future searches are served instantly.",
				"Lower cost and latency for frequent questions.",
				("Cache Cost Save", "$0.002", Up),
				json!({ "key": "hash_9a8f...", "ttl": "24h", "embedding": "[0.1, -0.2, ...]", "size": "4KB" }),
			)
			.build(),
		StepBuilder::new(10, StorefrontUi, "UI: rendering results + AI")
			.edge(RedisCache, StorefrontUi)
			.inspect(
				"Hybrid SERP",
				"Shows the reranked product list plus the \"Our Recommendation\" AI widget (cached or live).",
				"Premium shopping experience.",
				("Conversion Rate", "3.2%", Up),
				json!({ "components": ["ProductGrid", "AI_Summary_Widget", "Filters"], "total_time": "185ms" }),
			)
			.build(),
		// analytics loop
		StepBuilder::new(11, KibanaAnalytics, "Kibana: conversion analytics")
			.edge(StorefrontUi, KafkaStream)
			.inspect(
				"Feedback Loop",
				"An \"Add to Cart\" event is captured. It updates the conversion dashboard and feeds the reranking model.",
				"Continuous improvement of the algorithm based on real behaviour.",
				("Revenue", "+$1200", Up),
				json!({ "event": "conversion", "term": "gaming laptop", "position_clicked": 1, "revenue": 1150 }),
			)
			.build(),
	]
}

/// Checks that every step targets a placed node and animates a known edge.
pub fn validate_steps(steps: &[SimulationStep]) -> Result<(), TopologyError> {
	for step in steps {
		if node_def(step.node).is_none() {
			return Err(TopologyError::UnknownStepNode {
				step: step.step_id,
				node: step.node,
			});
		}
		if let Some(edge) = step.edge {
			if find_edge(edge).is_none() {
				return Err(TopologyError::UnknownStepEdge {
					step: step.step_id,
					from: edge.from,
					to: edge.to,
				});
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn steps_are_numbered_in_order() {
		let steps = search_session_steps(DEFAULT_REGION);
		assert_eq!(steps.len(), 12);
		for (i, step) in steps.iter().enumerate() {
			assert_eq!(step.step_id, i);
			assert!(step.inspector.is_some());
		}
	}

	#[test]
	fn all_step_references_resolve() {
		for region in REGIONS {
			assert_eq!(validate_steps(&search_session_steps(region)), Ok(()));
		}
	}

	#[test]
	fn region_only_changes_the_sync_log_line() {
		let a = search_session_steps(REGIONS[0]);
		let b = search_session_steps(REGIONS[2]);
		for (x, y) in a.iter().zip(&b) {
			if x.step_id == 1 {
				assert_eq!(x.log, "Sync: product catalog (US East (N. Virginia))");
				assert_eq!(y.log, "Sync: product catalog (Asia Pacific (Tokyo))");
				assert_eq!(x.inspector, y.inspector);
			} else {
				assert_eq!(x, y);
			}
		}
	}

	#[test]
	fn broken_step_reference_is_reported() {
		let mut steps = search_session_steps(DEFAULT_REGION);
		steps[4].edge = Some(EdgeRef::new(NodeId::Reranker, NodeId::MobileApp));
		assert_eq!(
			validate_steps(&steps),
			Err(TopologyError::UnknownStepEdge {
				step: 4,
				from: NodeId::Reranker,
				to: NodeId::MobileApp,
			})
		);

		steps[4].edge = None;
		steps[2].node = NodeId::LogstashEtl;
		assert!(matches!(
			validate_steps(&steps),
			Err(TopologyError::UnknownStepNode { step: 2, .. })
		));
	}

	#[test]
	fn reranking_step_uses_ranking_view() {
		let steps = search_session_steps(DEFAULT_REGION);
		let visual = steps[7].inspector.as_ref().map(|i| i.visual_type);
		assert_eq!(visual, Some(VisualType::Ranking));
	}

	#[test]
	fn ranking_results_are_sorted_by_score() {
		let steps = search_session_steps(DEFAULT_REGION);
		let data = &steps[7].inspector.as_ref().map(|i| i.data.clone()).unwrap_or_default();
		let scores: Vec<f64> = data["results"]
			.as_array()
			.map(|r| r.iter().filter_map(|e| e["score"].as_f64()).collect())
			.unwrap_or_default();
		assert_eq!(scores.len(), 4);
		assert!(scores.windows(2).all(|w| w[0] >= w[1]));
	}
}
