//! Bucket classifiers: total, pure functions from a raw value to one label.
//!
//! Only `classify_gender` can fail. Every other classifier has an explicit
//! fallback label for input it does not recognize.

pub mod keywords;

use std::f64::consts::PI;

use crate::config::PipelineConfig;
use crate::domain::{
    Action, AgeBucket, Gender, Grade, GrowthVelocity, Location, PatientError, RadiationKind,
    RawVisit, SurgeryKind, Symptoms, TumorSize,
};

use self::keywords::{
    GRADE_RULES, LOCATION_RULES, RADIATION_RULES, SURGERY_RULES, SYMPTOM_RULES, first_match,
    normalize,
};

pub const AGE_MIDDLE_START: f64 = 50.0;
pub const AGE_OLDER_START: f64 = 65.0;

pub const SIZE_MEDIUM_START_CM: f64 = 3.0;
pub const SIZE_LARGE_START_CM: f64 = 5.0;

pub const OBSERVE_MEDIUM_START_MONTHS: f64 = 4.5;
pub const OBSERVE_LONG_START_MONTHS: f64 = 9.0;

/// `<50` / `50-65` / `≥65`; boundary values belong to the higher bucket.
pub fn classify_age(age_years: f64) -> AgeBucket {
    if age_years < AGE_MIDDLE_START {
        AgeBucket::Under50
    } else if age_years < AGE_OLDER_START {
        AgeBucket::From50To65
    } else {
        AgeBucket::Over65
    }
}

pub fn classify_gender(raw: &str) -> Result<Gender, PatientError> {
    match normalize(raw).as_str() {
        "m" | "male" | "man" | "boy" => Ok(Gender::Male),
        "f" | "female" | "woman" | "girl" => Ok(Gender::Female),
        _ => Err(PatientError::unrecognized("gender", raw)),
    }
}

/// Grade confirmed by a pathology text, if any keyword matches.
///
/// `None` means the text confirms nothing; the imputation engine decides
/// between carry-forward and the `grade_1` default.
pub fn classify_grade(pathology: &str) -> Option<Grade> {
    first_match(pathology, GRADE_RULES)
}

/// Convexity, skull base, parasagittal, sphenoid wing (first match wins), else `other`.
pub fn classify_location(raw: Option<&str>) -> Location {
    raw.and_then(|text| first_match(text, LOCATION_RULES))
        .unwrap_or(Location::Other)
}

/// Half-open at 3.0 cm and 5.0 cm.
pub fn classify_size(diameter_cm: f64) -> TumorSize {
    if diameter_cm < SIZE_MEDIUM_START_CM {
        TumorSize::Small
    } else if diameter_cm < SIZE_LARGE_START_CM {
        TumorSize::Medium
    } else {
        TumorSize::Large
    }
}

/// Diameter of the sphere with the given volume: `d = (6V/π)^(1/3)`.
pub fn diameter_from_volume(volume_cm3: f64) -> f64 {
    (6.0 * volume_cm3 / PI).cbrt()
}

/// Diameter recorded for a visit, in cm.
///
/// Precedence: explicit diameter, then the largest axis, then the
/// sphere-equivalent diameter of the volume.
pub fn resolve_diameter(visit: &RawVisit) -> Option<f64> {
    if let Some(d) = visit.tumor_size_cm.filter(|d| d.is_finite()) {
        return Some(d);
    }
    if let Some(axes) = &visit.tumor_dimensions_cm {
        let max_axis = axes
            .iter()
            .copied()
            .filter(|a| a.is_finite())
            .fold(None, |acc: Option<f64>, a| Some(acc.map_or(a, |m| m.max(a))));
        if max_axis.is_some() {
            return max_axis;
        }
    }
    visit
        .tumor_volume_cm3
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(diameter_from_volume)
}

/// Asymptomatic phrases short-circuit to `none`; unmatched text is `none`.
pub fn classify_symptoms(text: &str) -> Symptoms {
    first_match(text, SYMPTOM_RULES).unwrap_or(Symptoms::None)
}

/// Growth velocity between two measurements `interval_months` apart.
///
/// The caller guarantees a positive interval. Shrinking tumors are always `stable`.
pub fn classify_velocity(
    previous_cm: f64,
    current_cm: f64,
    interval_months: f64,
    config: &PipelineConfig,
) -> GrowthVelocity {
    if current_cm <= previous_cm {
        return GrowthVelocity::Stable;
    }
    let cm_per_year = (current_cm - previous_cm) * 12.0 / interval_months;
    if cm_per_year < config.slow_growth_cm_per_year {
        GrowthVelocity::Stable
    } else if cm_per_year < config.fast_growth_cm_per_year {
        GrowthVelocity::SlowGrowth
    } else {
        GrowthVelocity::FastGrowth
    }
}

/// Observation action for the literal gap to the next visit; half-open at 4.5 and 9 months.
pub fn classify_interval(interval_months: f64) -> Action {
    if interval_months < OBSERVE_MEDIUM_START_MONTHS {
        Action::ObserveShort
    } else if interval_months < OBSERVE_LONG_START_MONTHS {
        Action::ObserveMedium
    } else {
        Action::ObserveLong
    }
}

/// Resection extent; unspecified or unrecognized is GTR.
pub fn classify_surgery(surgery_type: Option<&str>) -> SurgeryKind {
    surgery_type
        .and_then(|text| first_match(text, SURGERY_RULES))
        .unwrap_or(SurgeryKind::Gtr)
}

/// Radiation modality; unspecified or unrecognized is SRS.
pub fn classify_radiation(radiation_type: Option<&str>) -> RadiationKind {
    radiation_type
        .and_then(|text| first_match(text, RADIATION_RULES))
        .unwrap_or(RadiationKind::Srs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, AgeBucket::Under50)]
    #[case(49.999, AgeBucket::Under50)]
    #[case(50.0, AgeBucket::From50To65)]
    #[case(64.99, AgeBucket::From50To65)]
    #[case(65.0, AgeBucket::Over65)]
    #[case(91.0, AgeBucket::Over65)]
    fn age_boundaries_belong_to_higher_bucket(#[case] age: f64, #[case] expected: AgeBucket) {
        assert_eq!(classify_age(age), expected);
    }

    #[rstest]
    #[case("M", Gender::Male)]
    #[case(" male ", Gender::Male)]
    #[case("Female", Gender::Female)]
    #[case("f", Gender::Female)]
    #[case("WOMAN", Gender::Female)]
    fn gender_synonyms(#[case] raw: &str, #[case] expected: Gender) {
        assert_eq!(classify_gender(raw).unwrap(), expected);
    }

    #[test]
    fn unknown_gender_is_an_error() {
        let err = classify_gender("unknown").unwrap_err();
        let PatientError::UnrecognizedCategory { field, .. } = &err else {
            panic!("expected an unrecognized category, got {err:?}");
        };
        assert_eq!(field, "gender");
    }

    #[rstest]
    #[case("WHO grade III anaplastic meningioma", Some(Grade::Grade3))]
    #[case("Atypical meningioma, WHO grade II", Some(Grade::Grade2))]
    #[case("meningothelial meningioma, WHO grade I", Some(Grade::Grade1))]
    #[case("grade_2", Some(Grade::Grade2))]
    #[case("specimen insufficient for grading", None)]
    #[case("Non-malignant meningioma", Some(Grade::Grade1))]
    fn grade_from_pathology(#[case] text: &str, #[case] expected: Option<Grade>) {
        assert_eq!(classify_grade(text), expected);
    }

    #[rstest]
    #[case(Some("left frontal convexity"), Location::Convexity)]
    #[case(Some("Skull-base, petroclival"), Location::SkullBase)]
    #[case(Some("parasagittal, invading sagittal sinus"), Location::Parasagittal)]
    #[case(Some("medial sphenoid wing"), Location::SphenoidWing)]
    #[case(Some("intraventricular"), Location::Other)]
    #[case(None, Location::Other)]
    fn location_priority(#[case] raw: Option<&str>, #[case] expected: Location) {
        assert_eq!(classify_location(raw), expected);
    }

    #[rstest]
    #[case(2.99, TumorSize::Small)]
    #[case(3.00, TumorSize::Medium)]
    #[case(4.99, TumorSize::Medium)]
    #[case(5.00, TumorSize::Large)]
    fn size_boundaries(#[case] d: f64, #[case] expected: TumorSize) {
        assert_eq!(classify_size(d), expected);
    }

    #[test]
    fn volume_converts_to_sphere_diameter() {
        // a 4 cm sphere has volume 4/3 * pi * 2^3
        let volume = 4.0 / 3.0 * PI * 8.0;
        assert!((diameter_from_volume(volume) - 4.0).abs() < 1e-9);

        let visit = RawVisit {
            tumor_volume_cm3: Some(volume),
            ..RawVisit::default()
        };
        assert_eq!(
            classify_size(resolve_diameter(&visit).unwrap()),
            TumorSize::Medium
        );
    }

    #[test]
    fn dimensions_bucket_on_largest_axis() {
        let visit = RawVisit {
            tumor_dimensions_cm: Some(vec![2.1, 5.2, 3.0]),
            tumor_volume_cm3: Some(1.0),
            ..RawVisit::default()
        };
        assert_eq!(resolve_diameter(&visit), Some(5.2));
    }

    #[test]
    fn explicit_diameter_wins() {
        let visit = RawVisit {
            tumor_size_cm: Some(1.5),
            tumor_dimensions_cm: Some(vec![6.0]),
            ..RawVisit::default()
        };
        assert_eq!(resolve_diameter(&visit), Some(1.5));
        assert_eq!(resolve_diameter(&RawVisit::default()), None);
    }

    #[rstest]
    #[case("Asymptomatic, routine follow-up", Symptoms::None)]
    #[case("new onset seizures", Symptoms::Present)]
    #[case("reports daily headaches", Symptoms::Present)]
    #[case("doing well", Symptoms::None)]
    #[case("no headaches reported", Symptoms::None)]
    fn symptoms(#[case] text: &str, #[case] expected: Symptoms) {
        assert_eq!(classify_symptoms(text), expected);
    }

    #[rstest]
    #[case(3.0, 2.0, 12.0, GrowthVelocity::Stable)]
    #[case(3.0, 3.1, 12.0, GrowthVelocity::Stable)]
    #[case(3.0, 3.5, 12.0, GrowthVelocity::SlowGrowth)]
    #[case(3.0, 4.5, 12.0, GrowthVelocity::FastGrowth)]
    #[case(3.0, 4.0, 6.0, GrowthVelocity::FastGrowth)]
    fn velocity_buckets(
        #[case] previous: f64,
        #[case] current: f64,
        #[case] interval: f64,
        #[case] expected: GrowthVelocity,
    ) {
        let config = PipelineConfig::default();
        assert_eq!(
            classify_velocity(previous, current, interval, &config),
            expected
        );
    }

    #[test]
    fn shrinking_tumors_are_never_growing() {
        let config = PipelineConfig::default();
        for (previous, current) in [(5.0, 4.9), (2.0, 0.1), (9.0, 3.0)] {
            for interval in [0.5, 3.0, 12.0, 60.0] {
                assert_eq!(
                    classify_velocity(previous, current, interval, &config),
                    GrowthVelocity::Stable
                );
            }
        }
    }

    #[rstest]
    #[case(1.0, Action::ObserveShort)]
    #[case(4.49, Action::ObserveShort)]
    #[case(4.5, Action::ObserveMedium)]
    #[case(8.99, Action::ObserveMedium)]
    #[case(9.0, Action::ObserveLong)]
    fn interval_boundaries(#[case] months: f64, #[case] expected: Action) {
        assert_eq!(classify_interval(months), expected);
    }

    #[rstest]
    #[case(None, SurgeryKind::Gtr)]
    #[case(Some("GTR"), SurgeryKind::Gtr)]
    #[case(Some("Simpson grade II"), SurgeryKind::Gtr)]
    #[case(Some("Simpson IV"), SurgeryKind::Str)]
    #[case(Some("subtotal resection"), SurgeryKind::Str)]
    #[case(Some("craniotomy"), SurgeryKind::Gtr)]
    fn surgery_subtype(#[case] text: Option<&str>, #[case] expected: SurgeryKind) {
        assert_eq!(classify_surgery(text), expected);
    }

    #[rstest]
    #[case(None, RadiationKind::Srs)]
    #[case(Some("Gamma Knife radiosurgery"), RadiationKind::Srs)]
    #[case(Some("FSRT 54 Gy in 30 fractions"), RadiationKind::Fsrt)]
    #[case(Some("fractionated radiosurgery"), RadiationKind::Fsrt)]
    fn radiation_subtype(#[case] text: Option<&str>, #[case] expected: RadiationKind) {
        assert_eq!(classify_radiation(text), expected);
    }
}
