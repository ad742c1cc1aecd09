//! Long-form documentation shown in the detail panel for a selected node.

use super::nodes::NodeId;

/// Something a neighbouring component provides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactInput {
	/// Providing component or team.
	pub source: &'static str,
	/// What it brings.
	pub benefit: &'static str,
}

/// Something this component improves downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactOutput {
	/// Receiving component or team.
	pub target: &'static str,
	/// What gets better for it.
	pub improvement: &'static str,
}

/// Which neighbours feed a component and what it improves downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossDomainImpact {
	/// Incoming contributions.
	pub inputs: &'static [ImpactInput],
	/// Outgoing improvements.
	pub outputs: &'static [ImpactOutput],
}

/// Everything the detail panel shows for one node. Empty lists are not drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeDetail {
	/// Panel heading.
	pub title: &'static str,
	/// Short role description under the heading.
	pub subtitle: &'static str,
	/// Prose explanation.
	pub content: &'static str,
	/// Algorithms the component runs.
	pub algorithms: &'static [&'static str],
	/// Products and libraries involved.
	pub tech_stack: &'static [&'static str],
	/// Concepts worth knowing.
	pub key_concepts: &'static [&'static str],
	/// Indicators the owners track.
	pub kpis: &'static [&'static str],
	/// Relationship to neighbouring components, when documented.
	pub cross_domain_impact: Option<CrossDomainImpact>,
}

const EMPTY: NodeDetail = NodeDetail {
	title: "",
	subtitle: "",
	content: "",
	algorithms: &[],
	tech_stack: &[],
	key_concepts: &[],
	kpis: &[],
	cross_domain_impact: None,
};

/// Documentation for `id`, or `None` for ids that are not placed on the canvas.
pub fn node_detail(id: NodeId) -> Option<NodeDetail> {
	let detail = match id {
		NodeId::StorefrontUi => NodeDetail {
			title: "Web Storefront",
			subtitle: "Search experience layer",
			content: "Captures the shopper's intent as they type, renders the hybrid result page and the AI recommendation widget, and emits behavioural events back into the platform.",
			algorithms: &["Debounced typeahead", "Client-side result caching"],
			tech_stack: &["Next.js", "React Server Components", "Edge CDN"],
			key_concepts: &["Search-as-you-type", "Core Web Vitals", "Event tracking"],
			kpis: &["Search conversion rate", "Time to first result"],
			cross_domain_impact: Some(CrossDomainImpact {
				inputs: &[ImpactInput {
					source: "Semantic Cache",
					benefit: "Instant AI summaries for popular queries",
				}],
				outputs: &[ImpactOutput {
					target: "Kafka Stream",
					improvement: "Click and cart signals for ranking feedback",
				}],
			}),
		},
		NodeId::MobileApp => NodeDetail {
			title: "Mobile App",
			subtitle: "Multimodal search client",
			content: "Adds voice and camera search on top of the same Search API, so spoken and visual queries go through the same hybrid retrieval pipeline.",
			algorithms: &["Speech-to-text", "Image embedding (CLIP)"],
			tech_stack: &["Swift", "Kotlin", "On-device ML"],
			key_concepts: &["Multimodal retrieval", "Offline-first UX"],
			kpis: &["Mobile search share", "Voice query success rate"],
			..EMPTY
		},
		NodeId::MerchantDashboard => NodeDetail {
			title: "Merchant Portal",
			subtitle: "Catalog and campaign management",
			content: "Merchants update prices and stock here, and review the queries that returned no results so they can fill catalog gaps.",
			algorithms: &["Zero-result clustering"],
			tech_stack: &["React", "Postgres", "REST"],
			key_concepts: &["Catalog freshness", "Search analytics for merchants"],
			kpis: &["Time to web", "Zero-result rate"],
			cross_domain_impact: Some(CrossDomainImpact {
				inputs: &[ImpactInput {
					source: "Kibana Analytics",
					benefit: "List of unmet search demand",
				}],
				outputs: &[ImpactOutput {
					target: "DB Connectors",
					improvement: "Price and stock changes reach search within seconds",
				}],
			}),
		},
		NodeId::SearchApi => NodeDetail {
			title: "Search API",
			subtitle: "Query understanding and orchestration",
			content: "Normalises the query, extracts filters and categories, expands synonyms and issues a single hybrid request combining lexical and vector retrieval.",
			algorithms: &["Synonym expansion", "Named entity filter extraction", "Stop word removal"],
			tech_stack: &["Rust / Go microservice", "Elasticsearch Query DSL"],
			key_concepts: &["Recall vs precision", "Query rewriting"],
			kpis: &["Zero-result rate", "p95 latency"],
			..EMPTY
		},
		NodeId::Reranker => NodeDetail {
			title: "Semantic Reranker",
			subtitle: "Learning to Rank",
			content: "Scores the top 50 candidates with a cross-encoder and business features, then keeps the 10 most relevant for display.",
			algorithms: &["Cross-encoder scoring", "LambdaMART", "Feature logging"],
			tech_stack: &["ms-marco-MiniLM", "Elasticsearch LTR plugin"],
			key_concepts: &["Two-stage retrieval", "Precision@10", "NDCG"],
			kpis: &["Precision@10", "Click-through rate"],
			cross_domain_impact: Some(CrossDomainImpact {
				inputs: &[ImpactInput {
					source: "Search Team",
					benefit: "Curated judgement lists and relevance tuning",
				}],
				outputs: &[ImpactOutput {
					target: "RAG Service",
					improvement: "Grounding context limited to the best products",
				}],
			}),
		},
		NodeId::GenaiGateway => NodeDetail {
			title: "RAG Service",
			subtitle: "Retrieval-augmented generation",
			content: "Sends the specifications of the top five products to an LLM to write a short, grounded buying guide comparing them.",
			algorithms: &["Prompt templating", "Context window packing", "Citation grounding"],
			tech_stack: &["Gemini Pro", "Prompt registry"],
			key_concepts: &["Hallucination control", "Token budgets", "Low temperature sampling"],
			kpis: &["Time on site", "Answer acceptance rate"],
			..EMPTY
		},
		NodeId::Connectors => NodeDetail {
			title: "DB Connectors",
			subtitle: "Change data capture",
			content: "Tails the relational catalog and publishes every product change as an event, keeping search prices identical to checkout prices.",
			algorithms: &["Log-based CDC", "Idempotent upserts"],
			tech_stack: &["Debezium", "Elastic connectors", "Postgres WAL"],
			key_concepts: &["Eventual consistency", "Sync lag"],
			kpis: &["Sync lag"],
			..EMPTY
		},
		NodeId::Elasticsearch => NodeDetail {
			title: "Elasticsearch",
			subtitle: "Hybrid vector and lexical engine",
			content: "Stores each product with lexical fields, a dense vector and sparse ELSER features, and answers queries by fusing BM25 and kNN rankings with Reciprocal Rank Fusion.",
			algorithms: &["BM25", "HNSW kNN", "Reciprocal Rank Fusion", "ELSER sparse retrieval"],
			tech_stack: &["Elasticsearch 8", "Lucene"],
			key_concepts: &["Inverted index", "Approximate nearest neighbours", "Shards and replicas"],
			kpis: &["Recall@50", "Query latency", "Index refresh time"],
			cross_domain_impact: Some(CrossDomainImpact {
				inputs: &[ImpactInput {
					source: "ML Inference",
					benefit: "Fresh embeddings for every catalog change",
				}],
				outputs: &[ImpactOutput {
					target: "Semantic Reranker",
					improvement: "High recall candidate set",
				}],
			}),
		},
		NodeId::MlInference => NodeDetail {
			title: "ML Inference",
			subtitle: "Embedding pipeline",
			content: "Turns product text into a dense e5 vector and a sparse ELSER expansion before indexing, so semantic queries match even without shared keywords.",
			algorithms: &["Transformer embeddings", "Learned sparse expansion"],
			tech_stack: &["ELSER v2", "e5-base", "Ingest pipelines"],
			key_concepts: &["Dense vs sparse vectors", "Embedding drift"],
			kpis: &["Inference time"],
			..EMPTY
		},
		NodeId::RedisCache => NodeDetail {
			title: "Semantic Cache",
			subtitle: "LLM answer cache",
			content: "Stores generated answers together with the query embedding; later queries close enough in vector space are served from the cache.",
			algorithms: &["Cosine similarity lookup", "TTL expiry"],
			tech_stack: &["Redis Stack", "RediSearch vectors"],
			key_concepts: &["Cache hit ratio", "Cost per answer"],
			kpis: &["Cache hit ratio", "LLM cost saved"],
			..EMPTY
		},
		NodeId::KafkaStream => NodeDetail {
			title: "Kafka Stream",
			subtitle: "Event backbone",
			content: "Buffers catalog changes and behavioural events so producers and consumers scale independently.",
			algorithms: &["Partitioned logs", "Consumer groups"],
			tech_stack: &["Apache Kafka", "Schema registry"],
			key_concepts: &["Back-pressure", "At-least-once delivery"],
			kpis: &["Consumer lag"],
			..EMPTY
		},
		NodeId::KibanaAnalytics => NodeDetail {
			title: "Kibana Analytics",
			subtitle: "Feedback loop",
			content: "Aggregates searches, clicks and conversions into dashboards and exports click models that feed back into ranking.",
			algorithms: &["Click models", "Funnel aggregation"],
			tech_stack: &["Kibana", "Elastic APM"],
			key_concepts: &["Implicit feedback", "A/B testing"],
			kpis: &["Revenue per search", "Conversion rate"],
			..EMPTY
		},
		NodeId::TeamSearch => NodeDetail {
			title: "Search Team",
			subtitle: "Relevance engineering",
			content: "Owns query understanding, ranking models and offline relevance evaluation.",
			kpis: &["NDCG", "Zero-result rate"],
			..EMPTY
		},
		NodeId::TeamMerchandising => NodeDetail {
			title: "Merchandising",
			subtitle: "Commercial strategy",
			content: "Defines boosts, campaigns and pricing using insights from search analytics.",
			kpis: &["Gross merchandise value"],
			..EMPTY
		},
		NodeId::TeamInfra => NodeDetail {
			title: "Platform / SRE",
			subtitle: "Infrastructure",
			content: "Runs the clusters, sizes shards, manages index lifecycle and keeps cost under control.",
			kpis: &["Availability", "Cost per query"],
			..EMPTY
		},
		NodeId::LogstashEtl => return None,
	};
	Some(detail)
}
