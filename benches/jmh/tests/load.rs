use std::path::PathBuf;

use common::config::{BenchmarkDefinition, RunParams};
use jmh::{
    JmhError, LoadOptions, MetricMode, RunKey, aggregate_runs, load_runs,
    result::{JmhParams, JmhRecord, PrimaryMetric},
};

const VALUE_INI: &str = "encryption/encrypt-value.ini";
const ENTRY_INI: &str = "encryption/encrypt-entry.ini";

fn benchmark() -> BenchmarkDefinition {
    BenchmarkDefinition {
        file: PathBuf::from("jmh-encryption-read.json"),
        configs: [
            ("Accumulo".to_owned(), String::new()),
            ("CEABAC".to_owned(), VALUE_INI.to_owned()),
            ("CEABAC-Entry".to_owned(), ENTRY_INI.to_owned()),
        ]
        .into(),
    }
}

fn record(config_file: &str, params: RunParams, raw_data: Vec<Vec<f64>>) -> JmhRecord {
    JmhRecord {
        params: JmhParams {
            config_file: config_file.to_owned(),
            row_count: params.rows.to_string(),
            column_count: params.columns.to_string(),
            key_field_size: params.key_size.to_string(),
            value_field_size: params.value_size.to_string(),
        },
        primary_metric: PrimaryMetric {
            raw_data,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn ops_per_time_of_constant_samples() {
    let params = RunParams::new(10, 1, 100, 1000);
    let records = vec![record("", params, vec![vec![1.0, 1.0, 1.0]])];

    let runs = aggregate_runs(
        "Encryption (Read)",
        &benchmark(),
        &records,
        &labels(&["Accumulo"]),
        &[params],
        &LoadOptions {
            mode: MetricMode::OpsPerTime,
            scale: 1000.0,
            confidence: 0.95,
        },
    )
    .unwrap();

    assert_eq!(runs.len(), 1);
    let run = runs[&RunKey::new("", params)];
    assert!((run.score - 10_000.0).abs() < 1e-9, "{}", run.score);
    assert_eq!(run.error, 0.0);
}

#[test]
fn modes_transform_every_sample() {
    let params = RunParams::new(1000, 10, 100, 1000);
    let records = vec![record(VALUE_INI, params, vec![vec![200.0, 250.0], vec![300.0]])];
    let ops = params.ops();

    let mean_for = |mode| {
        let options = LoadOptions {
            mode,
            scale: 1.0,
            confidence: 0.95,
        };
        aggregate_runs(
            "Encryption (Read)",
            &benchmark(),
            &records,
            &labels(&["CEABAC"]),
            &[params],
            &options,
        )
        .unwrap()[&RunKey::new(VALUE_INI, params)]
    };

    let total = mean_for(MetricMode::TotalTime);
    let per_op = mean_for(MetricMode::TimePerOp);
    let per_time = mean_for(MetricMode::OpsPerTime);

    assert!((total.score - 250.0).abs() < 1e-9);
    assert!((per_op.score - total.score / ops).abs() < 1e-12);
    assert!((per_op.error - total.error / ops).abs() < 1e-9);
    let expected = (ops / 200.0 + ops / 250.0 + ops / 300.0) / 3.0;
    assert!((per_time.score - expected).abs() < 1e-9);
}

#[test]
fn filtering_is_exact() {
    let wanted = RunParams::new(100, 1, 100, 1000);
    let other = RunParams::new(1000, 1, 100, 1000);
    let records = vec![
        record("", wanted, vec![vec![2.0, 2.5]]),
        record("", other, vec![vec![5.0]]),
        record(VALUE_INI, wanted, vec![vec![3.0, 3.5]]),
        record(ENTRY_INI, wanted, vec![vec![4.0]]),
        record("signature/dsa.ini", wanted, vec![vec![9.0]]),
    ];

    let runs = aggregate_runs(
        "Encryption (Read)",
        &benchmark(),
        &records,
        &labels(&["Accumulo", "CEABAC"]),
        &[wanted],
        &LoadOptions::default(),
    )
    .unwrap();

    let mut keys = runs.keys().cloned().collect::<Vec<_>>();
    keys.sort();
    assert_eq!(
        keys,
        vec![RunKey::new("", wanted), RunKey::new(VALUE_INI, wanted)]
    );
}

#[test]
fn non_matching_records_may_have_bad_params() {
    let wanted = RunParams::new(10, 1, 100, 1000);
    let mut broken = record("signature/dsa.ini", wanted, vec![vec![1.0]]);
    broken.params.row_count = "lots".to_owned();
    let records = vec![broken, record("", wanted, vec![vec![1.0, 2.0]])];

    let runs = aggregate_runs(
        "Encryption (Read)",
        &benchmark(),
        &records,
        &labels(&["Accumulo"]),
        &[wanted],
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(runs.len(), 1);
}

#[test]
fn missing_combination_fails() {
    let present = RunParams::new(10, 1, 100, 1000);
    let absent = RunParams::new(1000, 10, 10, 10);
    let records = vec![
        record("", present, vec![vec![1.0]]),
        record("", absent, vec![vec![1.0]]),
        record(VALUE_INI, present, vec![vec![1.0]]),
    ];

    let err = aggregate_runs(
        "Encryption (Read)",
        &benchmark(),
        &records,
        &labels(&["Accumulo", "CEABAC"]),
        &[present, absent],
        &LoadOptions::default(),
    )
    .unwrap_err();

    match err {
        JmhError::MissingRun { config, params } => {
            assert_eq!(config, "CEABAC");
            assert_eq!(params, absent);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_configuration_label_fails() {
    let err = aggregate_runs(
        "Encryption (Read)",
        &benchmark(),
        &[],
        &labels(&["Searchable"]),
        &[RunParams::new(10, 1, 100, 1000)],
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, JmhError::UnknownConfig { config, .. } if config == "Searchable"));
}

#[test]
fn empty_samples_fail() {
    let params = RunParams::new(10, 1, 100, 1000);
    let err = aggregate_runs(
        "Encryption (Read)",
        &benchmark(),
        &[record("", params, vec![vec![]])],
        &labels(&["Accumulo"]),
        &[params],
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, JmhError::EmptySamples { .. }));
}

#[tokio::test]
async fn loads_result_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("jmh-encryption-read.json"),
        r#"[{
            "benchmark": "EncryptionReadBenchmark.benchmarkRead",
            "params": {
                "configFile": "",
                "rowCount": "10",
                "columnCount": "1",
                "keyFieldSize": "100",
                "valueFieldSize": "1000"
            },
            "primaryMetric": { "score": 1.0, "scoreError": 0.0, "rawData": [[1.0, 1.0, 1.0]] }
        }]"#,
    )
    .unwrap();

    let params = RunParams::new(10, 1, 100, 1000);
    let runs = load_runs(
        "Encryption (Read)",
        &benchmark(),
        dir.path(),
        &labels(&["Accumulo"]),
        &[params],
        &LoadOptions::default(),
    )
    .await
    .unwrap();
    assert!((runs[&RunKey::new("", params)].score - 10_000.0).abs() < 1e-9);
}

#[tokio::test]
async fn missing_file_and_lookup_errors_surface() {
    let dir = tempfile::tempdir().unwrap();
    let params = RunParams::new(10, 1, 100, 1000);

    let err = load_runs(
        "Encryption (Read)",
        &benchmark(),
        dir.path(),
        &labels(&["Accumulo"]),
        &[params],
        &LoadOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("jmh-encryption-read.json"));

    std::fs::write(dir.path().join("jmh-encryption-read.json"), "[]").unwrap();
    let err = load_runs(
        "Encryption (Read)",
        &benchmark(),
        dir.path(),
        &labels(&["Accumulo"]),
        &[params],
        &LoadOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<JmhError>(),
        Some(JmhError::MissingRun { .. })
    ));
}

#[test]
fn later_duplicate_record_wins() {
    let params = RunParams::new(100, 1, 100, 1000);
    let records = vec![
        record(VALUE_INI, params, vec![vec![1.0, 1.0]]),
        record(VALUE_INI, params, vec![vec![4.0, 4.0]]),
    ];

    let runs = aggregate_runs(
        "Encryption (Read)",
        &benchmark(),
        &records,
        &labels(&["CEABAC"]),
        &[params],
        &LoadOptions {
            mode: MetricMode::TotalTime,
            scale: 1.0,
            confidence: 0.95,
        },
    )
    .unwrap();

    assert_eq!(runs.len(), 1);
    let run = runs[&RunKey::new(VALUE_INI, params)];
    assert_eq!(run.score, 4.0);
    assert_eq!(run.error, 0.0);
}
