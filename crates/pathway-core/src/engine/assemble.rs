//! State/action assembly for one step between two visits.
//!
//! The action of step (i, i+1) is taken from the interventions recorded on
//! visit i+1, the visit that closes the step:
//! surgery > radiation > supportive care > observation interval.
//! A visit that records both a new recurrence and a surgery yields a surgical
//! action; its phase is still `recurrent`.

use crate::classify::classify_interval;
use crate::domain::{Action, StateId, Visit};

pub fn assemble_state(visit: &Visit) -> StateId {
    visit.state()
}

pub fn assemble_action(from: &Visit, to: &Visit) -> Action {
    let closing = &to.observed;
    if let Some(kind) = closing.surgery {
        return kind.action();
    }
    if let Some(kind) = closing.radiation {
        return kind.action();
    }
    if closing.supportive_care {
        return Action::SupportiveCare;
    }
    classify_interval(to.months() - from.months())
}
