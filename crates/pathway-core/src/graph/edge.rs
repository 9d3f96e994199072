//! Aggregated edges and node statistics.
//!
//! Every accumulator here is order-independent: sets are ordered, elapsed
//! samples are kept sorted, and outcome counts live in an ordered map.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    Action, PatientId, StateId, StratificationFactor, StratificationKey, Transition,
    TransitionOutcome,
};

/// Deduplication key of an edge inside the graph of its `from_graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub from_state: StateId,
    pub action: Action,
    pub to_graph: StratificationKey,
    pub to_state: StateId,
}

impl EdgeKey {
    pub fn of(transition: &Transition) -> Self {
        Self {
            from_state: transition.from_state,
            action: transition.action,
            to_graph: transition.to_graph,
            to_state: transition.to_state,
        }
    }
}

/// Key of an incoming cross-graph annotation on the destination graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IncomingKey {
    pub from_graph: StratificationKey,
    pub from_state: StateId,
    pub action: Action,
    pub to_state: StateId,
}

impl IncomingKey {
    pub fn of(transition: &Transition) -> Self {
        Self {
            from_graph: transition.from_graph,
            from_state: transition.from_state,
            action: transition.action,
            to_state: transition.to_state,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStats {
    pub count: usize,
    pub patient_ids: BTreeSet<PatientId>,
}

impl NodeStats {
    pub fn observe(&mut self, patient_id: &PatientId) {
        self.count += 1;
        self.patient_ids.insert(patient_id.clone());
    }

    pub fn merge(&mut self, other: &NodeStats) {
        self.count += other.count;
        self.patient_ids.extend(other.patient_ids.iter().cloned());
    }
}

/// One deduplicated edge with accumulated metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub count: usize,
    pub patient_ids: BTreeSet<PatientId>,
    /// Sorted ascending.
    elapsed_months: Vec<f64>,
    pub outcomes: BTreeMap<TransitionOutcome, usize>,
    pub is_cross_graph: bool,
    pub changed_factors: Vec<StratificationFactor>,
}

impl Edge {
    pub fn from_transition(transition: &Transition) -> Self {
        let mut edge = Self {
            count: 0,
            patient_ids: BTreeSet::new(),
            elapsed_months: Vec::new(),
            outcomes: BTreeMap::new(),
            is_cross_graph: transition.is_cross_graph,
            changed_factors: transition.changed_factors.clone(),
        };
        edge.absorb(transition);
        edge
    }

    /// Accumulate one more raw observation of this edge.
    pub fn absorb(&mut self, transition: &Transition) {
        self.count += 1;
        self.patient_ids.insert(transition.patient_id.clone());
        self.insert_sample(transition.elapsed_months);
        *self.outcomes.entry(transition.outcome).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: &Edge) {
        self.count += other.count;
        self.patient_ids.extend(other.patient_ids.iter().cloned());
        for &sample in &other.elapsed_months {
            self.insert_sample(sample);
        }
        for (outcome, n) in &other.outcomes {
            *self.outcomes.entry(*outcome).or_insert(0) += n;
        }
    }

    fn insert_sample(&mut self, sample: f64) {
        let pos = self
            .elapsed_months
            .partition_point(|x| x.total_cmp(&sample).is_le());
        self.elapsed_months.insert(pos, sample);
    }

    pub fn elapsed_months(&self) -> &[f64] {
        &self.elapsed_months
    }

    pub fn mean_elapsed_months(&self) -> Option<f64> {
        if self.elapsed_months.is_empty() {
            return None;
        }
        let sum: f64 = self.elapsed_months.iter().sum();
        Some(sum / self.elapsed_months.len() as f64)
    }

    /// Population standard deviation of the elapsed samples.
    pub fn std_elapsed_months(&self) -> Option<f64> {
        let mean = self.mean_elapsed_months()?;
        let var: f64 = self
            .elapsed_months
            .iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>()
            / self.elapsed_months.len() as f64;
        Some(var.sqrt())
    }
}

/// Read-only reference to a cross-graph edge owned by another graph.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingCrossGraph {
    pub count: usize,
    pub patient_ids: BTreeSet<PatientId>,
    pub changed_factors: Vec<StratificationFactor>,
}

impl IncomingCrossGraph {
    pub fn from_transition(transition: &Transition) -> Self {
        Self {
            count: 1,
            patient_ids: BTreeSet::from([transition.patient_id.clone()]),
            changed_factors: transition.changed_factors.clone(),
        }
    }

    pub fn absorb(&mut self, transition: &Transition) {
        self.count += 1;
        self.patient_ids.insert(transition.patient_id.clone());
    }

    pub fn merge(&mut self, other: &IncomingCrossGraph) {
        self.count += other.count;
        self.patient_ids.extend(other.patient_ids.iter().cloned());
    }
}
