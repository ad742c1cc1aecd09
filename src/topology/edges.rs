use super::nodes::NodeId;

/// Directed edge between two placed nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeDef {
	/// Source node.
	pub from: NodeId,
	/// Target node; the arrow head points here.
	pub to: NodeId,
	/// Relationship name for support edges.
	pub label: Option<&'static str>,
	/// Part of the illustrated search session.
	pub active_in_flow: bool,
	/// Caption drawn at the edge midpoint.
	pub payload_info: Option<&'static str>,
}

impl EdgeDef {
	/// Key of this edge.
	pub fn edge_ref(&self) -> EdgeRef {
		EdgeRef::new(self.from, self.to)
	}
}

/// Names an edge by its endpoints, used to mark the edge being animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeRef {
	/// Source node.
	pub from: NodeId,
	/// Target node.
	pub to: NodeId,
}

impl EdgeRef {
	/// Names the edge `from -> to`.
	pub const fn new(from: NodeId, to: NodeId) -> Self {
		Self { from, to }
	}
}

const fn flow(from: NodeId, to: NodeId, payload: &'static str) -> EdgeDef {
	EdgeDef {
		from,
		to,
		label: None,
		active_in_flow: true,
		payload_info: Some(payload),
	}
}

const fn support(from: NodeId, to: NodeId, label: &'static str) -> EdgeDef {
	EdgeDef {
		from,
		to,
		label: Some(label),
		active_in_flow: false,
		payload_info: None,
	}
}

/// Every edge drawn on the canvas. Flow edges come first.
pub const EDGES: &[EdgeDef] = &[
	// query path
	flow(NodeId::StorefrontUi, NodeId::SearchApi, "query: text"),
	flow(NodeId::MobileApp, NodeId::SearchApi, "query: voice / image"),
	flow(NodeId::SearchApi, NodeId::Elasticsearch, "hybrid query (RRF)"),
	flow(NodeId::Elasticsearch, NodeId::Reranker, "top-50 hits"),
	flow(NodeId::Reranker, NodeId::GenaiGateway, "top-5 context"),
	flow(NodeId::GenaiGateway, NodeId::RedisCache, "LLM answer"),
	flow(NodeId::RedisCache, NodeId::StorefrontUi, "SERP + AI summary"),
	// ingestion path
	flow(NodeId::MerchantDashboard, NodeId::Connectors, "price update"),
	flow(NodeId::Connectors, NodeId::KafkaStream, "CDC event"),
	flow(NodeId::KafkaStream, NodeId::MlInference, "product doc"),
	flow(NodeId::MlInference, NodeId::Elasticsearch, "dense + sparse vectors"),
	// feedback loop
	flow(NodeId::StorefrontUi, NodeId::KafkaStream, "click / cart events"),
	support(NodeId::KafkaStream, NodeId::KibanaAnalytics, "conversion stream"),
	support(NodeId::Elasticsearch, NodeId::KibanaAnalytics, "search logs"),
	support(NodeId::KibanaAnalytics, NodeId::MerchantDashboard, "zero-result terms"),
	// ownership
	support(NodeId::TeamSearch, NodeId::Reranker, "relevance tuning"),
	support(NodeId::TeamMerchandising, NodeId::MerchantDashboard, "campaigns"),
	support(NodeId::TeamInfra, NodeId::Elasticsearch, "capacity"),
];

/// Finds the edge with exactly these endpoints, respecting direction.
pub fn find_edge(edge: EdgeRef) -> Option<&'static EdgeDef> {
	EDGES.iter().find(|e| e.from == edge.from && e.to == edge.to)
}
