use common::config::RunParams;
use serde::{Deserialize, Serialize};

use crate::JmhError;

/// One entry of the JSON array JMH writes with `-rf json`
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JmhRecord {
    #[serde(default)]
    pub benchmark: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    pub params: JmhParams,
    pub primary_metric: PrimaryMetric,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JmhParams {
    pub config_file: String,
    pub row_count: String,
    pub column_count: String,
    pub key_field_size: String,
    pub value_field_size: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryMetric {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub score_error: Option<f64>,
    #[serde(default)]
    pub score_unit: Option<String>,
    /// Samples per fork
    pub raw_data: Vec<Vec<f64>>,
}

impl JmhParams {
    pub fn run_params(&self) -> Result<RunParams, JmhError> {
        fn parse(name: &'static str, value: &str) -> Result<u64, JmhError> {
            value
                .trim()
                .parse()
                .map_err(|_| JmhError::InvalidParam {
                    name,
                    value: value.to_owned(),
                })
        }

        Ok(RunParams {
            rows: parse("rowCount", &self.row_count)?,
            columns: parse("columnCount", &self.column_count)?,
            key_size: parse("keyFieldSize", &self.key_field_size)?,
            value_size: parse("valueFieldSize", &self.value_field_size)?,
        })
    }
}

impl PrimaryMetric {
    /// Samples of every fork, in order
    pub fn samples(&self) -> Vec<f64> {
        self.raw_data.iter().flatten().copied().collect()
    }
}

pub fn parse_results(contents: &str) -> Result<Vec<JmhRecord>, JmhError> {
    Ok(serde_json::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = r#"[
        {
            "jmhVersion": "1.19",
            "benchmark": "edu.mit.ll.pace.performance.EncryptionReadBenchmark.benchmarkRead",
            "mode": "avgt",
            "threads": 1,
            "forks": 2,
            "params": {
                "configFile": "encryption/encrypt-value.ini",
                "rowCount": "1000",
                "columnCount": "10",
                "keyFieldSize": "100",
                "valueFieldSize": "1000"
            },
            "primaryMetric": {
                "score": 12.5,
                "scoreError": 0.25,
                "scoreConfidence": [12.25, 12.75],
                "scoreUnit": "ms/op",
                "rawData": [[12.0, 13.0], [12.5]]
            },
            "secondaryMetrics": {}
        }
    ]"#;

    #[test]
    fn parses_jmh_output() {
        let records = parse_results(OUTPUT).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.mode.as_deref(), Some("avgt"));
        assert_eq!(record.params.config_file, "encryption/encrypt-value.ini");
        assert_eq!(
            record.params.run_params().unwrap(),
            RunParams::new(1000, 10, 100, 1000)
        );
        assert_eq!(record.primary_metric.score_unit.as_deref(), Some("ms/op"));
        assert_eq!(record.primary_metric.samples(), vec![12.0, 13.0, 12.5]);
    }

    #[test]
    fn rejects_non_numeric_params() {
        let params = JmhParams {
            row_count: "many".to_owned(),
            column_count: "1".to_owned(),
            key_field_size: "10".to_owned(),
            value_field_size: "10".to_owned(),
            ..Default::default()
        };
        match params.run_params() {
            Err(JmhError::InvalidParam { name, value }) => {
                assert_eq!(name, "rowCount");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(parse_results("{"), Err(JmhError::Parse(_))));
        assert!(matches!(
            parse_results(r#"[{"params": {}}]"#),
            Err(JmhError::Parse(_))
        ));
    }
}
