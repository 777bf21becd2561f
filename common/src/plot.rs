use core::fmt::Debug;
use std::path::{Path, PathBuf};

use dyn_clone::{DynClone, clone_trait_object};
use eyre::Result;
use tokio::fs::create_dir_all;
use tracing::debug;

use crate::{config::Config, util::Palette};

/// Everything a plot needs besides its own options
#[derive(Debug, Clone, Copy)]
pub struct PlotContext<'a> {
    pub config: &'a Config,
    /// Directory the benchmark result files are resolved against
    pub data_dir: &'a Path,
    /// Directory the rendered images are written to
    pub output_dir: &'a Path,
    pub palette: &'a Palette,
}

#[typetag::serde(tag = "type")]
#[async_trait::async_trait]
pub trait Plot: Debug + DynClone + Send + Sync {
    /// File name of the rendered image, relative to the output directory
    fn filename(&self) -> &str;
    /// One line summary for listings
    fn describe(&self) -> String;
    /// Checks the plot against the benchmark registry without reading any result file
    fn validate(&self, config: &Config) -> Result<()>;
    /// Renders the plot
    ///
    /// Returns the path of the written image.
    async fn plot(&self, ctx: &PlotContext<'_>) -> Result<PathBuf>;
    /// Loads the plotted data and returns it as printable lines, without rendering
    async fn summary(&self, _ctx: &PlotContext<'_>) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
clone_trait_object!(Plot);

pub async fn ensure_plot_dirs(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        if !dir.exists() {
            debug!("Creating {}", dir.display());
        }
        create_dir_all(dir).await?;
    }
    Ok(())
}

/// Plots whose filename is in `only`, or every plot when `only` is empty
pub fn select_plots<'a>(plots: &'a [Box<dyn Plot>], only: &[String]) -> Vec<&'a dyn Plot> {
    plots
        .iter()
        .filter(|plot| only.is_empty() || only.iter().any(|name| name == plot.filename()))
        .map(|plot| plot.as_ref())
        .collect()
}
