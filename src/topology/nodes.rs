use std::fmt;
use std::str::FromStr;

use super::TopologyError;

/// Every component the architecture diagram knows about.
///
/// Not every id is placed on the canvas: see [`NODES`] for the ones that are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
	// user interfaces
	/// Web storefront with the search bar.
	StorefrontUi,
	/// Native shopping app.
	MobileApp,
	/// Portal where merchants edit the catalog.
	MerchantDashboard,
	// data / infrastructure
	/// Event bus carrying catalog and behaviour events.
	KafkaStream,
	/// Declared for completeness; never placed on the canvas.
	LogstashEtl,
	/// Embedding pipeline (dense and sparse vectors).
	MlInference,
	/// The search cluster.
	Elasticsearch,
	/// Conversion dashboards.
	KibanaAnalytics,
	/// CDC connectors syncing the relational catalog.
	Connectors,
	/// Semantic cache for generated answers.
	RedisCache,
	// search intelligence
	/// Query orchestration layer.
	SearchApi,
	/// Cross-encoder reranking model.
	Reranker,
	/// LLM gateway used for RAG answers.
	GenaiGateway,
	// business units
	/// Search relevance team.
	TeamSearch,
	/// Merchandising team.
	TeamMerchandising,
	/// Platform and infrastructure team.
	TeamInfra,
}

impl NodeId {
	/// All declared ids, in declaration order.
	pub const ALL: [NodeId; 16] = [
		NodeId::StorefrontUi,
		NodeId::MobileApp,
		NodeId::MerchantDashboard,
		NodeId::KafkaStream,
		NodeId::LogstashEtl,
		NodeId::MlInference,
		NodeId::Elasticsearch,
		NodeId::KibanaAnalytics,
		NodeId::Connectors,
		NodeId::RedisCache,
		NodeId::SearchApi,
		NodeId::Reranker,
		NodeId::GenaiGateway,
		NodeId::TeamSearch,
		NodeId::TeamMerchandising,
		NodeId::TeamInfra,
	];

	/// Stable snake_case identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			NodeId::StorefrontUi => "storefront_ui",
			NodeId::MobileApp => "mobile_app",
			NodeId::MerchantDashboard => "merchant_dashboard",
			NodeId::KafkaStream => "kafka_stream",
			NodeId::LogstashEtl => "logstash_etl",
			NodeId::MlInference => "ml_inference",
			NodeId::Elasticsearch => "elasticsearch",
			NodeId::KibanaAnalytics => "kibana_analytics",
			NodeId::Connectors => "connectors",
			NodeId::RedisCache => "redis_cache",
			NodeId::SearchApi => "search_api",
			NodeId::Reranker => "reranker",
			NodeId::GenaiGateway => "genai_gateway",
			NodeId::TeamSearch => "team_search",
			NodeId::TeamMerchandising => "team_merchandising",
			NodeId::TeamInfra => "team_infra",
		}
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NodeId {
	type Err = TopologyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NodeId::ALL
			.into_iter()
			.find(|id| id.as_str() == s)
			.ok_or_else(|| TopologyError::UnknownNodeName(s.to_string()))
	}
}

/// Styling group of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
	/// Customer and merchant facing apps.
	Frontend,
	/// Retrieval, ranking and generation.
	SearchCore,
	/// Ingestion, storage and analytics infrastructure.
	DataOps,
	/// Teams that own parts of the pipeline.
	Business,
}

impl Category {
	/// Human readable name, as shown in the legend.
	pub const fn label(self) -> &'static str {
		match self {
			Category::Frontend => "Frontend",
			Category::SearchCore => "Search Core",
			Category::DataOps => "Infrastructure",
			Category::Business => "Business",
		}
	}
}

/// A node as authored: its initial world position never changes here,
/// the canvas keeps its own mutable copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeDef {
	/// Which component this is.
	pub id: NodeId,
	/// Title drawn inside the node box.
	pub label: &'static str,
	/// World x of the box's top-left corner.
	pub x: f64,
	/// World y of the box's top-left corner.
	pub y: f64,
	/// Emoji drawn above the label.
	pub icon: &'static str,
	/// One-line summary shown when the node is expanded.
	pub description: &'static str,
	/// Styling group.
	pub category: Category,
}

/// Nodes placed on the canvas, in drawing order.
pub const NODES: &[NodeDef] = &[
	// frontend (top row)
	NodeDef {
		id: NodeId::StorefrontUi,
		label: "Web Storefront",
		x: 100.0,
		y: 50.0,
		icon: "🌐",
		description: "Next.js app. Search bar with predictive typeahead and instant results.",
		category: Category::Frontend,
	},
	NodeDef {
		id: NodeId::MobileApp,
		label: "iOS/Android App",
		x: 400.0,
		y: 50.0,
		icon: "📱",
		description: "Integrated voice search and visual (image) search.",
		category: Category::Frontend,
	},
	NodeDef {
		id: NodeId::MerchantDashboard,
		label: "Merchant Portal",
		x: 900.0,
		y: 50.0,
		icon: "🏪",
		description: "Zero-result term analytics and catalog management.",
		category: Category::Frontend,
	},
	// search intelligence (middle row)
	NodeDef {
		id: NodeId::SearchApi,
		label: "Search API",
		x: 250.0,
		y: 220.0,
		icon: "🔍",
		description: "Query orchestrator. Query expansion, synonym handling and filter extraction.",
		category: Category::SearchCore,
	},
	NodeDef {
		id: NodeId::Reranker,
		label: "Semantic Reranker",
		x: 500.0,
		y: 220.0,
		icon: "⧩",
		description: "Learning to Rank (LTR). Reorders the top-N results by semantic relevance.",
		category: Category::SearchCore,
	},
	NodeDef {
		id: NodeId::GenaiGateway,
		label: "RAG Service",
		x: 750.0,
		y: 220.0,
		icon: "✨",
		description: "LLM gateway. Builds grounded buying guides from the top ranked products.",
		category: Category::SearchCore,
	},
	NodeDef {
		id: NodeId::Connectors,
		label: "DB Connectors",
		x: 1050.0,
		y: 220.0,
		icon: "🔗",
		description: "Change data capture from the ERP / Postgres catalog into the event stream.",
		category: Category::DataOps,
	},
	// data layer
	NodeDef {
		id: NodeId::Elasticsearch,
		label: "Elasticsearch",
		x: 250.0,
		y: 390.0,
		icon: "🗄",
		description: "Vector store and search engine. BM25 + kNN hybrid retrieval fused with RRF.",
		category: Category::SearchCore,
	},
	NodeDef {
		id: NodeId::MlInference,
		label: "ML Inference",
		x: 550.0,
		y: 390.0,
		icon: "🧠",
		description: "Inference pipeline producing dense (e5) and sparse (ELSER) embeddings.",
		category: Category::DataOps,
	},
	NodeDef {
		id: NodeId::RedisCache,
		label: "Semantic Cache",
		x: 750.0,
		y: 560.0,
		icon: "⚡",
		description: "Redis cache of LLM answers keyed by query embedding similarity.",
		category: Category::DataOps,
	},
	NodeDef {
		id: NodeId::KafkaStream,
		label: "Kafka Stream",
		x: 1050.0,
		y: 390.0,
		icon: "≋",
		description: "Event buffer for catalog changes and user behaviour signals.",
		category: Category::DataOps,
	},
	NodeDef {
		id: NodeId::KibanaAnalytics,
		label: "Kibana Analytics",
		x: 100.0,
		y: 560.0,
		icon: "📊",
		description: "Conversion dashboards and click-through feedback for ranking models.",
		category: Category::DataOps,
	},
	// business units (bottom row)
	NodeDef {
		id: NodeId::TeamSearch,
		label: "Search Team",
		x: 250.0,
		y: 730.0,
		icon: "👥",
		description: "Owns relevance tuning, ranking models and query understanding.",
		category: Category::Business,
	},
	NodeDef {
		id: NodeId::TeamMerchandising,
		label: "Merchandising",
		x: 550.0,
		y: 730.0,
		icon: "💼",
		description: "Boosts, campaigns and pricing decisions driven by search analytics.",
		category: Category::Business,
	},
	NodeDef {
		id: NodeId::TeamInfra,
		label: "Platform / SRE",
		x: 850.0,
		y: 730.0,
		icon: "⚙",
		description: "Cluster sizing, index lifecycle and cost control.",
		category: Category::Business,
	},
];

/// Looks up the placed definition of `id`, if it is on the canvas.
pub fn node_def(id: NodeId) -> Option<&'static NodeDef> {
	NODES.iter().find(|n| n.id == id)
}
