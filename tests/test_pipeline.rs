//! Integration test: batches -> combine -> project -> group -> payload

use amu_pca::prelude::*;

fn scenario_batches(with_categories: bool) -> Vec<YearBatch> {
    let tag = |r: SourceRecord, c: &str| if with_categories { r.with_category(c) } else { r };
    vec![
        YearBatch::new(
            2021,
            vec![
                tag(SourceRecord::new("A", 120.0, 60.0), "Narrow"),
                tag(SourceRecord::new("B", 200.0, 75.0), "Broad"),
            ],
        ),
        YearBatch::new(
            2022,
            vec![
                tag(SourceRecord::new("A", 130.0, 65.0), "Narrow"),
                tag(SourceRecord::new("B", 210.0, 80.0), "Broad"),
            ],
        ),
    ]
}

#[test]
fn test_scenario_normalization_and_length() {
    let combined = combine(&scenario_batches(false), &PipelineConfig::default()).unwrap();
    assert_eq!(combined.len(), 4);
    assert!((combined[0].norm_a - 0.48).abs() < 1e-12);
    assert!((combined[0].norm_b - 0.60).abs() < 1e-12);
}

#[test]
fn test_scenario_full_run() {
    let run = Pipeline::default().run_detailed(&scenario_batches(true)).unwrap();

    assert_eq!(run.records.len(), 4);
    assert!(run.records.iter().all(|r| r.coord1.is_finite() && r.coord2.is_finite()));

    let clusters = run.clusters.expect("category variant should group");
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters.record_count(), 4);

    let scatter = &run.payload.scatter;
    assert_eq!(scatter.len(), 2);
    assert_eq!(scatter[0].label, "2021 Data");
    assert_eq!(scatter[0].points.len(), 2);
    assert_eq!(scatter[1].label, "2022 Data");
    assert_eq!(scatter[1].points.len(), 2);

    let doughnut = run.payload.doughnut.unwrap();
    assert_eq!(doughnut[0], CategoryCount { category: "Narrow".to_string(), count: 2 });
    assert_eq!(doughnut[1], CategoryCount { category: "Broad".to_string(), count: 2 });
}

#[test]
fn test_concatenation_length_property() {
    for (a, b) in [(0usize, 3usize), (1, 1), (3, 0), (5, 2)] {
        let batch = |year: i32, n: usize| {
            YearBatch::new(
                year,
                (0..n)
                    .map(|i| SourceRecord::new(format!("R{}", i), 10.0 * i as f64, i as f64))
                    .collect(),
            )
        };
        let combined = combine(&[batch(2021, a), batch(2022, b)], &PipelineConfig::default()).unwrap();
        assert_eq!(combined.len(), a + b);
        assert!(combined[..a].iter().all(|r| r.record.year == 2021));
        assert!(combined[a..].iter().all(|r| r.record.year == 2022));
    }
}

#[test]
fn test_repeated_runs_same_magnitudes() {
    let batches = scenario_batches(false);
    let first = run_pipeline(&batches).unwrap();
    let second = run_pipeline(&batches).unwrap();

    for (s1, s2) in first.scatter.iter().zip(second.scatter.iter()) {
        for (p, q) in s1.points.iter().zip(s2.points.iter()) {
            assert!((p.x.abs() - q.x.abs()).abs() < 1e-12);
            assert!((p.y.abs() - q.y.abs()).abs() < 1e-12);
        }
    }
}

#[test]
fn test_backends_agree_up_to_sign() {
    let batches = scenario_batches(false);
    let exact = Pipeline::default().run(&batches).unwrap();
    let power = Pipeline::default()
        .with_backend(BackendKind::PowerIteration.build())
        .run(&batches)
        .unwrap();

    for (s1, s2) in exact.scatter.iter().zip(power.scatter.iter()) {
        for (p, q) in s1.points.iter().zip(s2.points.iter()) {
            assert!((p.x.abs() - q.x.abs()).abs() < 1e-6);
            assert!((p.y.abs() - q.y.abs()).abs() < 1e-6);
        }
    }
}

#[test]
fn test_empty_batches_fail_cleanly() {
    let batches = vec![YearBatch::new(2021, vec![]), YearBatch::new(2022, vec![])];
    assert!(combine(&batches, &PipelineConfig::default()).unwrap().is_empty());

    match run_pipeline(&batches) {
        Err(AmuError::DecompositionError(_)) => {}
        other => panic!("expected DecompositionError, got {:?}", other),
    }
}

#[test]
fn test_missing_metric_aborts_run() {
    let mut batches = scenario_batches(false);
    batches[0].records[1].raw_metric_b = None;
    let err = run_pipeline(&batches).unwrap_err();
    assert!(matches!(err, AmuError::MissingField { field: "raw_metric_b", .. }));
}

#[test]
fn test_literal_tagging_mistags_uneven_batches() {
    let batches = vec![
        YearBatch::new(2021, vec![SourceRecord::new("A", 120.0, 60.0)]),
        YearBatch::new(
            2022,
            vec![SourceRecord::new("A", 130.0, 65.0), SourceRecord::new("B", 210.0, 80.0)],
        ),
    ];

    let literal = Pipeline::new(PipelineConfig::new().with_year_tagging(YearTagging::literal()))
        .run_detailed(&batches)
        .unwrap();
    let corrected = Pipeline::default().run_detailed(&batches).unwrap();

    // index rule puts the first 2022 record into 2021
    assert_eq!(literal.mistagged_years, 1);
    assert_eq!(literal.payload.series_for_year(2021).unwrap().points.len(), 2);
    assert_eq!(corrected.mistagged_years, 0);
    assert_eq!(corrected.payload.series_for_year(2021).unwrap().points.len(), 1);
    assert_eq!(corrected.payload.series_for_year(2022).unwrap().points.len(), 2);
}

#[test]
fn test_literal_tagging_on_two_by_two_reports_no_mistags() {
    let run = Pipeline::new(PipelineConfig::new().with_year_tagging(YearTagging::literal()))
        .run_detailed(&sample_batches())
        .unwrap();
    assert_eq!(run.mistagged_years, 0);
}

#[test]
fn test_dataset_json_drives_pipeline() {
    let json = r#"{
        "batches": [
            {"year": 2021, "records": [
                {"antimicrobial": "Antibiotic A", "pooledDays": 120, "percentageDays": 60, "category": "Narrow"},
                {"antimicrobial": "Antibiotic B", "pooledDays": 200, "percentageDays": 75, "category": "Broad"}
            ]},
            {"year": 2022, "records": [
                {"antimicrobial": "Antibiotic A", "pooledDays": 130, "percentageDays": 65, "category": "Narrow"},
                {"antimicrobial": "Antibiotic B", "pooledDays": 210, "percentageDays": 80, "category": "Broad"}
            ]}
        ]
    }"#;
    let dataset = DatasetConfig::from_json_str(json).unwrap();
    assert_eq!(dataset.batches, sample_batches_with_categories());

    let payload = run_pipeline(&dataset.batches).unwrap();
    assert_eq!(payload.doughnut.map(|d| d.len()), Some(2));
}
