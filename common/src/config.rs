use std::{
    collections::HashSet,
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::read_to_string;
use tracing::debug;

use crate::{
    plot::Plot,
    util::{NumberLocale, Palette},
};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Unknown benchmark '{0}'")]
    UnknownBenchmark(String),
    #[error("Unknown parameter set '{0}'")]
    UnknownParamSet(String),
    #[error("Unknown configuration set '{0}'")]
    UnknownConfigSet(String),
    #[error("Invalid colour '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Empty palette")]
    EmptyPalette,
    #[error("Output filename '{0}' is used by more than one plot")]
    DuplicateFilename(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub number_locale: NumberLocale,
    /// Colour cycle as `#RRGGBB` strings, the ggplot cycle is used when unset
    #[serde(default)]
    pub palette: Option<Vec<String>>,
    pub benchmarks: IndexMap<String, BenchmarkDefinition>,
    #[serde(default)]
    pub config_sets: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub param_sets: IndexMap<String, Vec<RunParams>>,
    pub plots: Vec<Box<dyn Plot>>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("performance_graphs")
}

/// A JMH result file and the configurations it contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDefinition {
    pub file: PathBuf,
    /// Configuration label to the `configFile` parameter value used by the run
    pub configs: IndexMap<String, String>,
}

/// Workload shape of a single benchmark variant
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RunParams {
    pub rows: u64,
    pub columns: u64,
    pub key_size: u64,
    pub value_size: u64,
}

impl RunParams {
    pub fn new(rows: u64, columns: u64, key_size: u64, value_size: u64) -> Self {
        Self {
            rows,
            columns,
            key_size,
            value_size,
        }
    }

    /// Number of entries touched by one benchmark invocation
    pub fn ops(&self) -> f64 {
        self.rows as f64 * self.columns as f64
    }
}

impl Display for RunParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} columns={} key={} value={}",
            self.rows, self.columns, self.key_size, self.value_size
        )
    }
}

/// Either the name of an entry in `param_sets` or an inline list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamSetRef {
    Named(String),
    Inline(Vec<RunParams>),
}

/// Either the name of an entry in `config_sets` or an inline list of labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigSetRef {
    Named(String),
    Inline(Vec<String>),
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = read_to_string(path)
            .await
            .wrap_err_with(|| format!("Read config {}", path.display()))?;
        let config = Self::from_yaml(&contents)
            .wrap_err_with(|| format!("Parse config {}", path.display()))?;
        debug!(
            "Loaded {} benchmarks and {} plots from {}",
            config.benchmarks.len(),
            config.plots.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yml::from_str(contents)?)
    }

    pub fn benchmark(&self, name: &str) -> Result<&BenchmarkDefinition, ConfigError> {
        self.benchmarks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownBenchmark(name.to_owned()))
    }

    pub fn param_set<'a>(&'a self, params: &'a ParamSetRef) -> Result<&'a [RunParams], ConfigError> {
        match params {
            ParamSetRef::Named(name) => self
                .param_sets
                .get(name)
                .map(Vec::as_slice)
                .ok_or_else(|| ConfigError::UnknownParamSet(name.clone())),
            ParamSetRef::Inline(params) => Ok(params),
        }
    }

    pub fn config_set<'a>(&'a self, configs: &'a ConfigSetRef) -> Result<&'a [String], ConfigError> {
        match configs {
            ConfigSetRef::Named(name) => self
                .config_sets
                .get(name)
                .map(Vec::as_slice)
                .ok_or_else(|| ConfigError::UnknownConfigSet(name.clone())),
            ConfigSetRef::Inline(configs) => Ok(configs),
        }
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        match &self.palette {
            Some(colors) => Palette::from_hex(colors),
            None => Ok(Palette::default()),
        }
    }

    /// Checks every plot against the registry before anything is read from disk
    pub fn validate(&self) -> Result<()> {
        self.palette()?;
        let mut filenames = HashSet::new();
        for plot in &self.plots {
            if !filenames.insert(plot.filename()) {
                return Err(ConfigError::DuplicateFilename(plot.filename().to_owned()).into());
            }
            plot.validate(self)
                .wrap_err_with(|| format!("Invalid plot {}", plot.filename()))?;
        }
        Ok(())
    }
}
