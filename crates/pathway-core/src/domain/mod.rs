//! Domain model (keys, states, actions, visits, transitions, errors).

pub mod action;
pub mod errors;
pub mod ids;
pub mod record;
pub mod state;
pub mod strata;
pub mod transition;
pub mod visit;
pub mod warning;

pub use action::{Action, RadiationKind, SurgeryKind};
pub use errors::{ErrorKind, PatientError, PatientFailure};
pub use ids::{PatientId, RunId};
pub use record::{PatientRecord, RawVisit};
pub use state::{GrowthVelocity, StateId, Symptoms, TreatmentPhase, TumorSize};
pub use strata::{AgeBucket, Gender, Grade, Location, StratificationFactor, StratificationKey};
pub use transition::{NodeObservation, Transition, TransitionOutcome};
pub use visit::{GradeSource, ImputedVisit, SizeSource, Visit};
pub use warning::{Warning, WarningKind};
