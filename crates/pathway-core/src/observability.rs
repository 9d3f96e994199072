use serde::{Deserialize, Serialize};

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub patients: usize,
    pub patients_failed: usize,
    /// Patients with at least one visit on the `grade_1` assumption.
    pub patients_grade_defaulted: usize,
    pub raw_transitions: usize,
    pub distinct_edges: usize,
    pub cross_graph_transitions: usize,
    pub populated_graphs: usize,
    pub warnings: usize,
}
