//! Treatment-phase state machine.
//!
//! Priority: recurrence > surgery > radiation > naive.
//! - recurrence: terminal once first noted; the detection time is kept.
//! - surgery: `early_postop` while `t - first_surgery <= window`, else `late_postop`.
//! - radiation: the same split into `early_postrad` / `late_postrad`.
//!
//! Interventions count from the visit that records them onward; a later visit
//! never changes the phase of an earlier one.

use crate::config::PipelineConfig;
use crate::domain::{ImputedVisit, TreatmentPhase, Visit};

/// Phase as a pure function of the visit time and the intervention history.
pub fn derive_phase(
    visit_months: f64,
    first_surgery_months: Option<f64>,
    first_radiation_months: Option<f64>,
    recurrence_detected: bool,
    early_window_months: f64,
) -> TreatmentPhase {
    if recurrence_detected {
        return TreatmentPhase::Recurrent;
    }
    if let Some(surgery) = first_surgery_months {
        return if visit_months - surgery <= early_window_months {
            TreatmentPhase::EarlyPostop
        } else {
            TreatmentPhase::LatePostop
        };
    }
    if let Some(radiation) = first_radiation_months {
        return if visit_months - radiation <= early_window_months {
            TreatmentPhase::EarlyPostrad
        } else {
            TreatmentPhase::LatePostrad
        };
    }
    TreatmentPhase::Naive
}

/// Per-patient intervention history, advanced one visit at a time.
#[derive(Debug, Clone, Default)]
pub struct PhaseTracker {
    first_surgery_months: Option<f64>,
    first_radiation_months: Option<f64>,
    recurrence_detected_at: Option<f64>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this visit's interventions and return its phase.
    pub fn advance(&mut self, visit: &ImputedVisit, config: &PipelineConfig) -> TreatmentPhase {
        if self.first_surgery_months.is_none() {
            self.first_surgery_months = visit.surgery_months;
        }
        if self.first_radiation_months.is_none() {
            self.first_radiation_months = visit.radiation_months;
        }
        if self.recurrence_detected_at.is_none() && visit.recurrence_noted {
            self.recurrence_detected_at = Some(visit.months);
        }

        let recurrence_detected = self
            .recurrence_detected_at
            .is_some_and(|detected| detected <= visit.months);

        derive_phase(
            visit.months,
            self.first_surgery_months,
            self.first_radiation_months,
            recurrence_detected,
            config.early_phase_window_months,
        )
    }
}

/// Attach a phase to every imputed visit.
pub fn assign_phases(visits: Vec<ImputedVisit>, config: &PipelineConfig) -> Vec<Visit> {
    let mut tracker = PhaseTracker::new();
    visits
        .into_iter()
        .map(|visit| {
            let phase = tracker.advance(&visit, config);
            Visit::new(visit, phase)
        })
        .collect()
}
