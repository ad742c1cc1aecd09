//! Static description of the illustrated architecture: which components
//! exist, where they sit on the canvas and how they connect.

mod details;
mod edges;
mod nodes;

use thiserror::Error;

pub use details::{CrossDomainImpact, ImpactInput, ImpactOutput, NodeDetail, node_detail};
pub use edges::{EDGES, EdgeDef, EdgeRef, find_edge};
pub use nodes::{Category, NODES, NodeDef, NodeId, node_def};

/// Authoring mistakes in the static tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
	/// A string did not match any [`NodeId::as_str`].
	#[error("unknown node name `{0}`")]
	UnknownNodeName(String),
	/// An edge touches a node that has no canvas position.
	#[error("edge {from} -> {to} references node `{missing}` which is not placed")]
	UnknownEdgeEndpoint {
		/// Edge source.
		from: NodeId,
		/// Edge target.
		to: NodeId,
		/// The endpoint that is not placed.
		missing: NodeId,
	},
	/// A step activates a node that has no canvas position.
	#[error("step {step} targets node `{node}` which is not placed")]
	UnknownStepNode {
		/// Index of the step.
		step: usize,
		/// The unplaced node.
		node: NodeId,
	},
	/// A step animates an edge missing from [`EDGES`].
	#[error("step {step} animates edge {from} -> {to} which does not exist")]
	UnknownStepEdge {
		/// Index of the step.
		step: usize,
		/// Edge source.
		from: NodeId,
		/// Edge target.
		to: NodeId,
	},
}

/// Checks that every edge endpoint is a placed node.
pub fn validate_edges() -> Result<(), TopologyError> {
	for edge in EDGES {
		for endpoint in [edge.from, edge.to] {
			if node_def(endpoint).is_none() {
				return Err(TopologyError::UnknownEdgeEndpoint {
					from: edge.from,
					to: edge.to,
					missing: endpoint,
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
	fn all_edges_resolve() {
		assert_eq!(validate_edges(), Ok(()));
	}

	#[test]
	fn find_edge_is_directional() {
		let forward = EdgeRef::new(NodeId::SearchApi, NodeId::Elasticsearch);
		assert!(find_edge(forward).is_some());
		assert!(find_edge(EdgeRef::new(forward.to, forward.from)).is_none());
	}

	#[test]
	fn error_messages_name_the_nodes() {
		let err = TopologyError::UnknownStepEdge {
			step: 3,
			from: NodeId::Reranker,
			to: NodeId::MobileApp,
		};
		assert_eq!(
			err.to_string(),
			"step 3 animates edge reranker -> mobile_app which does not exist"
		);
	}
}
