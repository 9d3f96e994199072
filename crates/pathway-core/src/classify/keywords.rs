//! Ordered keyword rules for the free-text classifiers.
//!
//! Each table is a list of (label, keywords) pairs evaluated top to bottom;
//! the first rule with a matching keyword wins. Reordering a table changes
//! classification results.
//!
//! Matching is on whole words of the normalized text: lowercase, every
//! non-alphanumeric character replaced by a space, whitespace collapsed.
//! So "Grade II" matches `grade ii` but not `grade i`.
//!
//! A keyword directly preceded by a negation word (`no`, `non`, `not`,
//! `denies`, `without`) does not match: "non-malignant" is not grade 3 and
//! "no headache" is not a symptom.

use crate::domain::{Grade, Location, RadiationKind, SurgeryKind, Symptoms};

/// One (label, keywords) pair.
#[derive(Debug)]
pub struct KeywordRule<L: 'static> {
    pub label: L,
    pub keywords: &'static [&'static str],
}

/// Lowercase, strip punctuation, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

const NEGATIONS: &[&str] = &["no", "non", "not", "denies", "without"];

fn negated(preceding: &str) -> bool {
    preceding
        .rsplit(' ')
        .next()
        .is_some_and(|word| NEGATIONS.contains(&word))
}

fn contains_phrase(padded_text: &str, phrase: &str) -> bool {
    let needle = format!(" {phrase} ");
    padded_text
        .match_indices(&needle)
        .any(|(at, _)| !negated(&padded_text[..at]))
}

/// First rule (in declared order) with a keyword present in `text`.
pub fn first_match<L: Copy>(text: &str, rules: &[KeywordRule<L>]) -> Option<L> {
    let padded = format!(" {} ", normalize(text));
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| contains_phrase(&padded, kw)))
        .map(|rule| rule.label)
}

/// Highest grade first.
pub const GRADE_RULES: &[KeywordRule<Grade>] = &[
    KeywordRule {
        label: Grade::Grade3,
        keywords: &[
            "grade 3",
            "grade iii",
            "who 3",
            "who iii",
            "anaplastic",
            "malignant",
        ],
    },
    KeywordRule {
        label: Grade::Grade2,
        keywords: &["grade 2", "grade ii", "who 2", "who ii", "atypical"],
    },
    KeywordRule {
        label: Grade::Grade1,
        keywords: &[
            "grade 1",
            "grade i",
            "who 1",
            "who i",
            "benign",
            "typical",
            "non malignant",
            "not malignant",
            "nonmalignant",
        ],
    },
];

pub const LOCATION_RULES: &[KeywordRule<Location>] = &[
    KeywordRule {
        label: Location::Convexity,
        keywords: &["convexity"],
    },
    KeywordRule {
        label: Location::SkullBase,
        keywords: &[
            "skull base",
            "petroclival",
            "clival",
            "olfactory groove",
            "tuberculum sellae",
            "planum sphenoidale",
            "cerebellopontine",
            "cp angle",
            "foramen magnum",
            "cavernous sinus",
            "petrous",
        ],
    },
    KeywordRule {
        label: Location::Parasagittal,
        keywords: &["parasagittal", "falcine", "falx", "sagittal sinus"],
    },
    KeywordRule {
        label: Location::SphenoidWing,
        keywords: &["sphenoid wing", "sphenoid", "clinoid", "spheno orbital", "sphenoorbital"],
    },
];

/// Asymptomatic phrases first: they short-circuit to `none`.
pub const SYMPTOM_RULES: &[KeywordRule<Symptoms>] = &[
    KeywordRule {
        label: Symptoms::None,
        keywords: &[
            "asymptomatic",
            "no symptoms",
            "symptom free",
            "no complaints",
            "no new symptoms",
            "incidental",
            "incidentally",
            "denies",
            "without symptoms",
        ],
    },
    KeywordRule {
        label: Symptoms::Present,
        keywords: &[
            "symptomatic",
            "headache",
            "headaches",
            "seizure",
            "seizures",
            "weakness",
            "visual",
            "vision",
            "diplopia",
            "hearing",
            "tinnitus",
            "cognitive",
            "memory",
            "numbness",
            "ataxia",
            "aphasia",
            "nausea",
            "vertigo",
            "deficit",
            "hemiparesis",
        ],
    },
];

/// Subtotal first: "simpson iv" must not fall through to a GTR keyword.
pub const SURGERY_RULES: &[KeywordRule<SurgeryKind>] = &[
    KeywordRule {
        label: SurgeryKind::Str,
        keywords: &[
            "str",
            "subtotal",
            "sub total",
            "partial",
            "debulking",
            "simpson iv",
            "simpson v",
            "simpson 4",
            "simpson 5",
            "simpson grade iv",
            "simpson grade v",
            "simpson grade 4",
            "simpson grade 5",
        ],
    },
    KeywordRule {
        label: SurgeryKind::Gtr,
        keywords: &[
            "gtr",
            "gross total",
            "complete",
            "simpson i",
            "simpson ii",
            "simpson iii",
            "simpson 1",
            "simpson 2",
            "simpson 3",
            "simpson grade i",
            "simpson grade ii",
            "simpson grade iii",
            "simpson grade 1",
            "simpson grade 2",
            "simpson grade 3",
        ],
    },
];

/// Fractionated first: "fractionated radiosurgery" is FSRT.
pub const RADIATION_RULES: &[KeywordRule<RadiationKind>] = &[
    KeywordRule {
        label: RadiationKind::Fsrt,
        keywords: &[
            "fsrt",
            "fractionated",
            "hypofractionated",
            "fractions",
            "imrt",
            "conformal",
        ],
    },
    KeywordRule {
        label: RadiationKind::Srs,
        keywords: &[
            "srs",
            "radiosurgery",
            "gamma knife",
            "gammaknife",
            "cyberknife",
            "single fraction",
        ],
    },
];
