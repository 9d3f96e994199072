use pathway_core::domain::{
    Action, AgeBucket, Gender, Grade, GrowthVelocity, Location, PatientError, PatientId,
    PatientRecord, RawVisit, RunId, SizeSource, StateId, StratificationFactor, StratificationKey,
    Symptoms, TreatmentPhase, TumorSize, WarningKind,
};
use pathway_core::graph::{EdgeKey, IncomingKey};
use pathway_core::{Pipeline, PipelineConfig, PipelineOutput, WorkerPool};

fn record(
    id: &str,
    age: f64,
    gender: &str,
    location: &str,
    visits: Vec<RawVisit>,
) -> PatientRecord {
    PatientRecord {
        patient_id: PatientId::new(id),
        age_at_diagnosis: age,
        gender: gender.to_string(),
        location: Some(location.to_string()),
        diagnosis_date: None,
        visits,
    }
}

fn run(records: &[PatientRecord]) -> PipelineOutput {
    Pipeline::new(PipelineConfig::default())
        .unwrap()
        .run(records)
}

/// Asymptomatic, stable-growth state.
fn state(size: TumorSize, phase: TreatmentPhase) -> StateId {
    StateId::new(size, Symptoms::None, GrowthVelocity::Stable, phase)
}

fn gtr_patient() -> PatientRecord {
    record(
        "GTR-1",
        55.0,
        "female",
        "right frontal convexity",
        vec![
            RawVisit::at(0.0)
                .with_size(4.0)
                .with_symptoms("asymptomatic, found incidentally"),
            RawVisit::at(6.0).with_surgery("GTR, Simpson grade I"),
            RawVisit::at(18.0)
                .with_size(2.0)
                .with_symptoms("no complaints"),
        ],
    )
}

fn grade_change_patient() -> PatientRecord {
    record(
        "XG-1",
        70.0,
        "M",
        "tuberculum sellae",
        vec![
            RawVisit::at(0.0)
                .with_size(2.5)
                .with_pathology("meningothelial meningioma, WHO grade I"),
            RawVisit::at(6.0).with_size(2.6),
            RawVisit::at(12.0).with_size(2.7),
            RawVisit::at(18.0).with_size(2.8),
            RawVisit::at(24.0)
                .with_size(3.1)
                .with_pathology("atypical meningioma, WHO grade II"),
        ],
    )
}

fn mixed_cohort() -> Vec<PatientRecord> {
    vec![
        gtr_patient(),
        grade_change_patient(),
        record(
            "NOBASE",
            40.0,
            "F",
            "falx",
            vec![RawVisit::at(0.0), RawVisit::at(6.0).with_size(3.0)],
        ),
        record(
            "BADGENDER",
            40.0,
            "x",
            "falx",
            vec![RawVisit::at(0.0).with_size(3.0)],
        ),
        record(
            "SRS-REC",
            66.0,
            "woman",
            "sphenoid wing",
            vec![
                RawVisit::at(0.0).with_size(3.2).with_symptoms("headaches"),
                RawVisit::at(4.0)
                    .with_size(3.3)
                    .with_radiation("gamma knife"),
                RawVisit::at(10.0).with_size(3.3),
                RawVisit::at(12.0).with_size(3.4),
                RawVisit::at(30.0).with_size(4.2).with_recurrence(),
                RawVisit::at(33.0).with_surgery("subtotal resection"),
            ],
        ),
        record(
            "STR-CAP",
            48.0,
            "male",
            "olfactory groove",
            vec![
                RawVisit::at(0.0).with_size(5.5),
                RawVisit::at(3.0).with_surgery("Simpson IV"),
                RawVisit::at(9.0).with_size(6.0),
                RawVisit::at(21.0).with_size(4.0),
            ],
        ),
        record("EMPTY", 30.0, "F", "convexity", Vec::new()),
    ]
}

#[test]
fn gtr_timeline_end_to_end() {
    let output = run(&[gtr_patient()]);
    assert!(output.errors.is_empty());

    let report = &output.patients[0];
    assert_eq!(report.visits[1].observed.diameter_cm, 2.0);
    assert_eq!(
        report.visits[1].observed.size_source,
        SizeSource::ResectionImputed
    );
    assert_eq!(report.visits[1].phase, TreatmentPhase::EarlyPostop);
    assert_eq!(report.visits[2].phase, TreatmentPhase::LatePostop);
    assert_eq!(report.visits[2].observed.velocity, GrowthVelocity::Stable);

    let t = &report.transitions;
    assert_eq!(t.len(), 2);
    assert_eq!(
        t[0].from_state,
        state(TumorSize::Medium, TreatmentPhase::Naive)
    );
    assert_eq!(t[0].action, Action::SurgeryGtr);
    assert_eq!(
        t[0].to_state,
        state(TumorSize::Small, TreatmentPhase::EarlyPostop)
    );
    assert_eq!(t[1].from_state, t[0].to_state);
    assert_eq!(t[1].action, Action::ObserveLong);
    assert_eq!(
        t[1].to_state,
        state(TumorSize::Small, TreatmentPhase::LatePostop)
    );

    let key = StratificationKey::new(
        AgeBucket::From50To65,
        Gender::Female,
        Grade::Grade1,
        Location::Convexity,
    );
    let graph = output.graphs.get(&key).unwrap();
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.nodes.len(), 3);
    assert!(output.warnings.is_empty());
    assert_eq!(output.summary.patients_grade_defaulted, 1);
}

#[test]
fn missing_baseline_is_reported_and_contributes_nothing() {
    let output = run(&[record(
        "NOBASE",
        40.0,
        "F",
        "falx",
        vec![
            RawVisit::at(0.0).with_symptoms("headache"),
            RawVisit::at(6.0).with_size(3.0),
        ],
    )]);

    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].error, PatientError::MissingBaseline);
    assert_eq!(output.summary.raw_transitions, 0);
    assert_eq!(output.summary.populated_graphs, 0);
    assert!(output.patients[0].failed);
}

#[test]
fn grade_change_crosses_graphs_at_the_confirming_visit() {
    let output = run(&[grade_change_patient()]);
    let transitions = &output.patients[0].transitions;
    assert_eq!(transitions.len(), 4);

    for t in &transitions[..3] {
        assert_eq!(t.from_graph.grade, Grade::Grade1);
        assert!(!t.is_cross_graph);
    }
    let cross = &transitions[3];
    assert_eq!(cross.from_visit, 3);
    assert_eq!(cross.from_graph.grade, Grade::Grade1);
    assert_eq!(cross.to_graph.grade, Grade::Grade2);
    assert!(cross.is_cross_graph);
    assert_eq!(
        cross.changed_factors,
        vec![StratificationFactor::TumorGrade]
    );

    let source = output.graphs.get(&cross.from_graph).unwrap();
    let edge = source.edge(&EdgeKey::of(cross)).unwrap();
    assert!(edge.is_cross_graph);

    let dest = output.graphs.get(&cross.to_graph).unwrap();
    assert!(dest.edges.is_empty());
    assert!(dest.incoming.contains_key(&IncomingKey::of(cross)));
    assert_eq!(output.summary.cross_graph_transitions, 1);
}

#[test]
fn contradictory_post_surgery_size_is_capped_with_a_warning() {
    let cohort = mixed_cohort();
    let output = run(&cohort[5..6]);
    let visits = &output.patients[0].visits;

    // 5.5 x 0.7 after STR, then 6.0 measured > 5.5 pre-surgery
    assert_eq!(visits[1].observed.size_source, SizeSource::ResectionImputed);
    assert_eq!(visits[2].observed.size_source, SizeSource::Capped);
    assert!((visits[2].observed.diameter_cm - 4.95).abs() < 1e-9);
    assert!(
        output
            .warnings
            .iter()
            .any(|w| matches!(w.detail, WarningKind::ContradictorySize { .. }))
    );
    assert!(output.errors.is_empty());
}

#[test]
fn recurrence_is_terminal_and_overrides_surgery() {
    let cohort = mixed_cohort();
    let output = run(&cohort[4..5]);
    let report = &output.patients[0];

    let phases: Vec<TreatmentPhase> = report.visits.iter().map(|v| v.phase).collect();
    assert_eq!(
        phases,
        vec![
            TreatmentPhase::Naive,
            TreatmentPhase::EarlyPostrad,
            TreatmentPhase::EarlyPostrad,
            TreatmentPhase::LatePostrad,
            TreatmentPhase::Recurrent,
            TreatmentPhase::Recurrent,
        ]
    );
    let last = report.transitions.last().unwrap();
    assert_eq!(last.action, Action::SurgeryStr);
    assert_eq!(last.to_state.phase, TreatmentPhase::Recurrent);

    // 10 -> 12 months is too short for a velocity
    assert!(
        output
            .warnings
            .iter()
            .any(|w| matches!(w.detail, WarningKind::IntervalTooShort { .. }))
    );
}

#[test]
fn reruns_are_identical() {
    let cohort = mixed_cohort();
    let run_id = RunId::generate();
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

    let first = pipeline.run_with_id(run_id, &cohort);
    let second = pipeline.run_with_id(run_id, &cohort);

    assert_eq!(first.graphs, second.graphs);
    assert_eq!(first.summary, second.summary);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_run_matches_sequential_run() {
    let mut cohort = Vec::new();
    for round in 0..8 {
        for mut r in mixed_cohort() {
            r.patient_id = PatientId::new(format!("{}-{round}", r.patient_id));
            cohort.push(r);
        }
    }
    let run_id = RunId::generate();

    let sequential = Pipeline::new(PipelineConfig::default())
        .unwrap()
        .run_with_id(run_id, &cohort);
    let concurrent = WorkerPool::new(PipelineConfig::default())
        .unwrap()
        .run_with_id(run_id, cohort)
        .await
        .unwrap();

    assert_eq!(sequential.graphs, concurrent.graphs);
    assert_eq!(sequential.patients, concurrent.patients);
    assert_eq!(sequential.errors, concurrent.errors);
    assert_eq!(sequential.warnings, concurrent.warnings);
    assert_eq!(sequential.summary, concurrent.summary);
    assert_eq!(sequential.summary.patients_failed, 16);
}

#[test]
fn output_serializes_all_graphs_and_errors() {
    let output = run(&mixed_cohort());
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["graphs"].as_array().unwrap().len(), 90);
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    assert_eq!(json["errors"][0]["error"]["kind"], "missing_baseline");
    assert_eq!(json["errors"][1]["error"]["kind"], "unrecognized_category");
    assert_eq!(json["summary"]["patients"], 7);
}
