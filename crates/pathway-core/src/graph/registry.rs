//! The 90 per-stratification graphs and the aggregation fold.

use std::collections::BTreeMap;

use tracing::trace;

use super::edge::{Edge, EdgeKey, IncomingCrossGraph, IncomingKey, NodeStats};
use crate::domain::{NodeObservation, StateId, StratificationKey, Transition};

/// One MDP graph: nodes and the edges whose `from_graph` is this key.
///
/// `incoming` annotates cross-graph edges owned by other graphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub key: StratificationKey,
    pub nodes: BTreeMap<StateId, NodeStats>,
    pub edges: BTreeMap<EdgeKey, Edge>,
    pub incoming: BTreeMap<IncomingKey, IncomingCrossGraph>,
}

impl Graph {
    pub fn new(key: StratificationKey) -> Self {
        Self {
            key,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            incoming: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.incoming.is_empty()
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    /// Outgoing edges that leave this graph.
    pub fn cross_graph_edges(&self) -> impl Iterator<Item = (&EdgeKey, &Edge)> {
        self.edges.iter().filter(|(_, e)| e.is_cross_graph)
    }

    fn absorb(&mut self, transition: &Transition) {
        self.edges
            .entry(EdgeKey::of(transition))
            .and_modify(|edge| edge.absorb(transition))
            .or_insert_with(|| Edge::from_transition(transition));
    }

    fn annotate_incoming(&mut self, transition: &Transition) {
        self.incoming
            .entry(IncomingKey::of(transition))
            .and_modify(|inc| inc.absorb(transition))
            .or_insert_with(|| IncomingCrossGraph::from_transition(transition));
    }

    fn merge(&mut self, other: &Graph) {
        for (state, stats) in &other.nodes {
            self.nodes.entry(*state).or_default().merge(stats);
        }
        for (key, edge) in &other.edges {
            match self.edges.get_mut(key) {
                Some(existing) => existing.merge(edge),
                None => {
                    self.edges.insert(*key, edge.clone());
                }
            }
        }
        for (key, inc) in &other.incoming {
            match self.incoming.get_mut(key) {
                Some(existing) => existing.merge(inc),
                None => {
                    self.incoming.insert(*key, inc.clone());
                }
            }
        }
    }
}

/// All graphs of a run, created up front and passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRegistry {
    graphs: BTreeMap<StratificationKey, Graph>,
}

impl GraphRegistry {
    /// One empty graph for every stratification key.
    pub fn new() -> Self {
        let graphs = StratificationKey::all()
            .into_iter()
            .map(|key| (key, Graph::new(key)))
            .collect();
        Self { graphs }
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn get(&self, key: &StratificationKey) -> Option<&Graph> {
        self.graphs.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Graph> {
        self.graphs.values()
    }

    fn graph_mut(&mut self, key: StratificationKey) -> &mut Graph {
        self.graphs.entry(key).or_insert_with(|| Graph::new(key))
    }

    /// Fold one raw transition into the graph of its `from_graph`.
    pub fn add_transition(&mut self, transition: &Transition) {
        trace!(
            patient = %transition.patient_id,
            graph = %transition.from_graph,
            action = %transition.action,
            "fold transition"
        );
        self.graph_mut(transition.from_graph).absorb(transition);
        if transition.is_cross_graph {
            self.graph_mut(transition.to_graph)
                .annotate_incoming(transition);
        }
    }

    pub fn add_observation(&mut self, observation: &NodeObservation) {
        self.graph_mut(observation.graph)
            .nodes
            .entry(observation.state)
            .or_default()
            .observe(&observation.patient_id);
    }

    pub fn extend<'a>(&mut self, transitions: impl IntoIterator<Item = &'a Transition>) {
        for transition in transitions {
            self.add_transition(transition);
        }
    }

    /// Combine two partial aggregates.
    pub fn merge(&mut self, other: &GraphRegistry) {
        for (key, graph) in &other.graphs {
            self.graph_mut(*key).merge(graph);
        }
    }

    /// Distinct edges across all graphs.
    pub fn edge_count(&self) -> usize {
        self.graphs.values().map(|g| g.edges.len()).sum()
    }

    pub fn populated_count(&self) -> usize {
        self.graphs.values().filter(|g| !g.is_empty()).count()
    }
}

impl Default for GraphRegistry {
    fn default() -> Self {
        Self::new()
    }
}
