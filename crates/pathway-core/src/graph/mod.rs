//! Graph aggregator: raw transitions folded into the 90 stratification graphs.
//!
//! Edges are deduplicated by (from graph, from state, action, to graph, to state).
//! Everything else is accumulated. The fold is commutative and associative.

pub mod edge;
pub mod registry;
pub mod view;

pub use edge::{Edge, EdgeKey, IncomingCrossGraph, IncomingKey, NodeStats};
pub use registry::{Graph, GraphRegistry};
pub use view::{CrossGraphView, EdgeView, GraphView, NodeView};
