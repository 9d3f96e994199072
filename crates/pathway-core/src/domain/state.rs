//! State - the dynamic coordinates of a visit.
//!
//! A [`StateId`] is (tumor size, symptoms, growth velocity, treatment phase):
//! 3 x 2 x 3 x 6 = 108 possible states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tumor diameter bucket, half-open at 3.0 cm and 5.0 cm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TumorSize {
    Small,
    Medium,
    Large,
}

impl TumorSize {
    pub const ALL: [TumorSize; 3] = [TumorSize::Small, TumorSize::Medium, TumorSize::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            TumorSize::Small => "small",
            TumorSize::Medium => "medium",
            TumorSize::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptoms {
    None,
    Present,
}

impl Symptoms {
    pub const ALL: [Symptoms; 2] = [Symptoms::None, Symptoms::Present];

    pub fn as_str(self) -> &'static str {
        match self {
            Symptoms::None => "none",
            Symptoms::Present => "present",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthVelocity {
    Stable,
    SlowGrowth,
    FastGrowth,
}

impl GrowthVelocity {
    pub const ALL: [GrowthVelocity; 3] = [
        GrowthVelocity::Stable,
        GrowthVelocity::SlowGrowth,
        GrowthVelocity::FastGrowth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GrowthVelocity::Stable => "stable",
            GrowthVelocity::SlowGrowth => "slow_growth",
            GrowthVelocity::FastGrowth => "fast_growth",
        }
    }
}

/// Treatment phase.
///
/// # Transitions (per patient, one way)
/// - naive -> early_postop -> late_postop
/// - naive -> early_postrad -> late_postrad
/// - postrad -> postop when a surgery follows radiation
/// - any -> recurrent (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentPhase {
    Naive,
    EarlyPostop,
    LatePostop,
    EarlyPostrad,
    LatePostrad,
    Recurrent,
}

impl TreatmentPhase {
    pub const ALL: [TreatmentPhase; 6] = [
        TreatmentPhase::Naive,
        TreatmentPhase::EarlyPostop,
        TreatmentPhase::LatePostop,
        TreatmentPhase::EarlyPostrad,
        TreatmentPhase::LatePostrad,
        TreatmentPhase::Recurrent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TreatmentPhase::Naive => "naive",
            TreatmentPhase::EarlyPostop => "early_postop",
            TreatmentPhase::LatePostop => "late_postop",
            TreatmentPhase::EarlyPostrad => "early_postrad",
            TreatmentPhase::LatePostrad => "late_postrad",
            TreatmentPhase::Recurrent => "recurrent",
        }
    }

    /// Is this a terminal phase (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TreatmentPhase::Recurrent)
    }

    /// Has any treatment been delivered to reach this phase?
    pub fn is_treated(self) -> bool {
        matches!(
            self,
            TreatmentPhase::EarlyPostop
                | TreatmentPhase::LatePostop
                | TreatmentPhase::EarlyPostrad
                | TreatmentPhase::LatePostrad
        )
    }
}

/// One MDP state. Two states are equal iff all four components match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId {
    pub size: TumorSize,
    pub symptoms: Symptoms,
    pub velocity: GrowthVelocity,
    pub phase: TreatmentPhase,
}

impl StateId {
    pub const COUNT: usize = 108;

    pub fn new(
        size: TumorSize,
        symptoms: Symptoms,
        velocity: GrowthVelocity,
        phase: TreatmentPhase,
    ) -> Self {
        Self {
            size,
            symptoms,
            velocity,
            phase,
        }
    }

    pub fn all() -> Vec<StateId> {
        let mut states = Vec::with_capacity(Self::COUNT);
        for size in TumorSize::ALL {
            for symptoms in Symptoms::ALL {
                for velocity in GrowthVelocity::ALL {
                    for phase in TreatmentPhase::ALL {
                        states.push(StateId::new(size, symptoms, velocity, phase));
                    }
                }
            }
        }
        states
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{},{})",
            self.size.as_str(),
            self.symptoms.as_str(),
            self.velocity.as_str(),
            self.phase.as_str()
        )
    }
}
