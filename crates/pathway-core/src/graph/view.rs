//! Serializable views of the aggregate.
//!
//! Graph keys are structs, so graphs serialize as lists rather than maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use super::edge::{Edge, EdgeKey, IncomingCrossGraph, IncomingKey, NodeStats};
use super::registry::{Graph, GraphRegistry};
use crate::domain::{
    Action, PatientId, StateId, StratificationFactor, StratificationKey, TransitionOutcome,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub state: StateId,
    pub count: usize,
    pub patient_ids: Vec<PatientId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub from_state: StateId,
    pub action: Action,
    pub to_graph: StratificationKey,
    pub to_state: StateId,
    pub count: usize,
    pub patient_ids: Vec<PatientId>,
    pub mean_elapsed_months: Option<f64>,
    pub std_elapsed_months: Option<f64>,
    pub outcomes: BTreeMap<TransitionOutcome, usize>,
    pub is_cross_graph: bool,
    pub changed_factors: Vec<StratificationFactor>,
}

/// One cross-graph transition, seen from either end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossGraphView {
    pub from_graph: StratificationKey,
    pub from_state: StateId,
    pub action: Action,
    pub to_graph: StratificationKey,
    pub to_state: StateId,
    pub count: usize,
    pub changed_factors: Vec<StratificationFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    /// `age|gender|grade|location`
    pub id: String,
    pub key: StratificationKey,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub cross_graph_outgoing: Vec<CrossGraphView>,
    pub cross_graph_incoming: Vec<CrossGraphView>,
}

impl NodeView {
    fn new(state: StateId, stats: &NodeStats) -> Self {
        Self {
            state,
            count: stats.count,
            patient_ids: stats.patient_ids.iter().cloned().collect(),
        }
    }
}

impl EdgeView {
    fn new(key: &EdgeKey, edge: &Edge) -> Self {
        Self {
            from_state: key.from_state,
            action: key.action,
            to_graph: key.to_graph,
            to_state: key.to_state,
            count: edge.count,
            patient_ids: edge.patient_ids.iter().cloned().collect(),
            mean_elapsed_months: edge.mean_elapsed_months(),
            std_elapsed_months: edge.std_elapsed_months(),
            outcomes: edge.outcomes.clone(),
            is_cross_graph: edge.is_cross_graph,
            changed_factors: edge.changed_factors.clone(),
        }
    }
}

impl CrossGraphView {
    fn outgoing(from_graph: StratificationKey, key: &EdgeKey, edge: &Edge) -> Self {
        Self {
            from_graph,
            from_state: key.from_state,
            action: key.action,
            to_graph: key.to_graph,
            to_state: key.to_state,
            count: edge.count,
            changed_factors: edge.changed_factors.clone(),
        }
    }

    fn incoming(to_graph: StratificationKey, key: &IncomingKey, inc: &IncomingCrossGraph) -> Self {
        Self {
            from_graph: key.from_graph,
            from_state: key.from_state,
            action: key.action,
            to_graph,
            to_state: key.to_state,
            count: inc.count,
            changed_factors: inc.changed_factors.clone(),
        }
    }
}

impl From<&Graph> for GraphView {
    fn from(graph: &Graph) -> Self {
        Self {
            id: graph.key.to_string(),
            key: graph.key,
            nodes: graph
                .nodes
                .iter()
                .map(|(state, stats)| NodeView::new(*state, stats))
                .collect(),
            edges: graph
                .edges
                .iter()
                .map(|(key, edge)| EdgeView::new(key, edge))
                .collect(),
            cross_graph_outgoing: graph
                .cross_graph_edges()
                .map(|(key, edge)| CrossGraphView::outgoing(graph.key, key, edge))
                .collect(),
            cross_graph_incoming: graph
                .incoming
                .iter()
                .map(|(key, inc)| CrossGraphView::incoming(graph.key, key, inc))
                .collect(),
        }
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphView::from(self).serialize(serializer)
    }
}

impl Serialize for GraphRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(GraphView::from))
    }
}
