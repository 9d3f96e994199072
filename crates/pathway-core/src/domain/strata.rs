//! Stratification key: the immutable identity of one MDP graph.
//!
//! A key is (age, gender, grade, location). There are 3 x 2 x 3 x 5 = 90 keys,
//! all enumerated up front by [`StratificationKey::all`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Age at diagnosis, half-open at 50 and 65 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBucket {
    #[serde(rename = "<50")]
    Under50,
    #[serde(rename = "50-65")]
    From50To65,
    #[serde(rename = "≥65")]
    Over65,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 3] = [AgeBucket::Under50, AgeBucket::From50To65, AgeBucket::Over65];

    pub fn as_str(self) -> &'static str {
        match self {
            AgeBucket::Under50 => "<50",
            AgeBucket::From50To65 => "50-65",
            AgeBucket::Over65 => "≥65",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

/// WHO tumor grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "grade_1")]
    Grade1,
    #[serde(rename = "grade_2")]
    Grade2,
    #[serde(rename = "grade_3")]
    Grade3,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Grade1, Grade::Grade2, Grade::Grade3];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Grade1 => "grade_1",
            Grade::Grade2 => "grade_2",
            Grade::Grade3 => "grade_3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Convexity,
    SkullBase,
    Parasagittal,
    SphenoidWing,
    Other,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::Convexity,
        Location::SkullBase,
        Location::Parasagittal,
        Location::SphenoidWing,
        Location::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::Convexity => "convexity",
            Location::SkullBase => "skull_base",
            Location::Parasagittal => "parasagittal",
            Location::SphenoidWing => "sphenoid_wing",
            Location::Other => "other",
        }
    }
}

/// A stratification factor that can differ between the source and
/// destination graph of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StratificationFactor {
    TumorGrade,
}

/// Identity of one graph.
///
/// Keys are values: a grade change produces a new key via [`StratificationKey::with_grade`]
/// and leaves the old one untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StratificationKey {
    pub age: AgeBucket,
    pub gender: Gender,
    pub grade: Grade,
    pub location: Location,
}

impl StratificationKey {
    pub const COUNT: usize = 90;

    pub fn new(age: AgeBucket, gender: Gender, grade: Grade, location: Location) -> Self {
        Self {
            age,
            gender,
            grade,
            location,
        }
    }

    /// Replacement key with a different grade; every other factor is kept.
    pub fn with_grade(self, grade: Grade) -> Self {
        Self { grade, ..self }
    }

    /// Factors that differ between `self` and `other`.
    pub fn changed_factors(&self, other: &StratificationKey) -> Vec<StratificationFactor> {
        let mut changed = Vec::new();
        if self.grade != other.grade {
            changed.push(StratificationFactor::TumorGrade);
        }
        changed
    }

    /// Full Cartesian product of the four factor enumerations.
    pub fn all() -> Vec<StratificationKey> {
        let mut keys = Vec::with_capacity(Self::COUNT);
        for age in AgeBucket::ALL {
            for gender in Gender::ALL {
                for grade in Grade::ALL {
                    for location in Location::ALL {
                        keys.push(StratificationKey::new(age, gender, grade, location));
                    }
                }
            }
        }
        keys
    }
}

impl fmt::Display for StratificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.age.as_str(),
            self.gender.as_str(),
            self.grade.as_str(),
            self.location.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_keys_are_distinct_and_complete() {
        let keys = StratificationKey::all();
        assert_eq!(keys.len(), StratificationKey::COUNT);

        let unique: HashSet<_> = keys.iter().copied().collect();
        assert_eq!(unique.len(), StratificationKey::COUNT);
    }

    #[test]
    fn with_grade_only_replaces_grade() {
        let key = StratificationKey::new(
            AgeBucket::From50To65,
            Gender::Female,
            Grade::Grade1,
            Location::SkullBase,
        );
        let next = key.with_grade(Grade::Grade2);

        assert_eq!(key.grade, Grade::Grade1);
        assert_eq!(next.grade, Grade::Grade2);
        assert_eq!(next.age, key.age);
        assert_eq!(next.gender, key.gender);
        assert_eq!(next.location, key.location);
        assert_eq!(
            key.changed_factors(&next),
            vec![StratificationFactor::TumorGrade]
        );
        assert!(key.changed_factors(&key).is_empty());
    }

    #[test]
    fn labels_serialize_as_bucket_names() {
        assert_eq!(
            serde_json::to_string(&AgeBucket::Over65).unwrap(),
            "\"≥65\""
        );
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"F\"");
        assert_eq!(
            serde_json::to_string(&Grade::Grade2).unwrap(),
            "\"grade_2\""
        );
        assert_eq!(
            serde_json::to_string(&Location::SphenoidWing).unwrap(),
            "\"sphenoid_wing\""
        );
    }
}
