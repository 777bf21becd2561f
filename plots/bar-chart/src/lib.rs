use std::path::PathBuf;

use common::{
    config::{Config, ConfigSetRef, ParamSetRef},
    plot::{Plot, PlotContext, ensure_plot_dirs},
};
use eyre::{Context, Result, bail};
use itertools::Itertools;
use jmh::{load_runs, resolve_configs};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod layout;
pub mod options;
pub mod render;

use layout::BarLayout;
use options::PlotOptions;

/// Mean and confidence interval of one benchmark, one bar per configuration and
/// parameter set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedBar {
    pub benchmark: String,
    pub configs: ConfigSetRef,
    pub params: ParamSetRef,
    pub options: PlotOptions,
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for GroupedBar {
    fn filename(&self) -> &str {
        &self.options.filename
    }

    fn describe(&self) -> String {
        let configs = match &self.configs {
            ConfigSetRef::Named(name) => name.clone(),
            ConfigSetRef::Inline(configs) => configs.join(", "),
        };
        let params = match &self.params {
            ParamSetRef::Named(name) => name.clone(),
            ParamSetRef::Inline(params) => format!("{} parameter sets", params.len()),
        };
        format!(
            "{} [{configs}] x [{params}] ({})",
            self.benchmark, self.options.mode
        )
    }

    fn validate(&self, config: &Config) -> Result<()> {
        let benchmark = config.benchmark(&self.benchmark)?;
        let configs = config.config_set(&self.configs)?;
        let params = config.param_set(&self.params)?;
        if configs.is_empty() {
            bail!("No configurations to plot");
        }
        if params.is_empty() {
            bail!("No parameter sets to plot");
        }
        resolve_configs(&self.benchmark, benchmark, configs)?;
        let ticks = self.options.x_tick_labels.len();
        if ticks != 0 && ticks != params.len() {
            bail!(
                "{ticks} tick labels for {} parameter sets",
                params.len()
            );
        }
        let confidence = self.options.confidence_interval;
        if !(confidence > 0.0 && confidence < 1.0) {
            bail!("Confidence level {confidence} is not between 0 and 1");
        }
        if self.options.legend_ncol == 0 {
            bail!("legend_ncol must be at least 1");
        }
        Ok(())
    }

    async fn plot(&self, ctx: &PlotContext<'_>) -> Result<PathBuf> {
        let config = ctx.config;
        let benchmark = config.benchmark(&self.benchmark)?;
        let configs = config.config_set(&self.configs)?;
        let params = config.param_set(&self.params)?;

        let runs = load_runs(
            &self.benchmark,
            benchmark,
            ctx.data_dir,
            configs,
            params,
            &self.options.load_options(),
        )
        .await
        .wrap_err_with(|| format!("Load runs of {}", self.benchmark))?;
        debug!("Loaded {} runs for {}", runs.len(), self.options.filename);

        let layout = BarLayout::new(
            &self.benchmark,
            benchmark,
            configs,
            params,
            &runs,
            &self.options,
            &config.number_locale,
        )?;

        let path = ctx.output_dir.join(&self.options.filename);
        ensure_parent(&path).await?;
        render::draw_bar_chart(
            &path,
            &layout,
            &self.options,
            ctx.palette,
            &config.number_locale,
        )
        .wrap_err_with(|| format!("Render {}", path.display()))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    async fn summary(&self, ctx: &PlotContext<'_>) -> Result<Vec<String>> {
        let config = ctx.config;
        let benchmark = config.benchmark(&self.benchmark)?;
        let configs = config.config_set(&self.configs)?;
        let params = config.param_set(&self.params)?;
        let runs = load_runs(
            &self.benchmark,
            benchmark,
            ctx.data_dir,
            configs,
            params,
            &self.options.load_options(),
        )
        .await?;

        let config_files = resolve_configs(&self.benchmark, benchmark, configs)?;
        let locale = &config.number_locale;
        let decimals = self.options.number_decimals.max(2);
        Ok(configs
            .iter()
            .zip(config_files)
            .cartesian_product(params)
            .filter_map(|((label, config_file), run_params)| {
                runs.get(&jmh::RunKey::new(config_file, *run_params))
                    .map(|run| {
                        format!(
                            "{label:<16} {run_params}: {} ± {}",
                            locale.format(run.score, decimals),
                            locale.format(run.error, decimals)
                        )
                    })
            })
            .collect())
    }
}

/// A legend on its own, for documents that lay out several charts sharing one legend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Legend {
    pub configs: ConfigSetRef,
    pub filename: String,
    /// Defaults to a single row
    #[serde(default)]
    pub ncol: Option<usize>,
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for Legend {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn describe(&self) -> String {
        match &self.configs {
            ConfigSetRef::Named(name) => format!("legend of {name}"),
            ConfigSetRef::Inline(configs) => format!("legend of {}", configs.join(", ")),
        }
    }

    fn validate(&self, config: &Config) -> Result<()> {
        if config.config_set(&self.configs)?.is_empty() {
            bail!("No configurations in legend");
        }
        if self.ncol == Some(0) {
            bail!("ncol must be at least 1");
        }
        Ok(())
    }

    async fn plot(&self, ctx: &PlotContext<'_>) -> Result<PathBuf> {
        let configs = ctx.config.config_set(&self.configs)?;
        let path = ctx.output_dir.join(&self.filename);
        ensure_parent(&path).await?;
        render::draw_standalone_legend(
            &path,
            configs,
            self.ncol.unwrap_or(configs.len()),
            ctx.palette,
        )
        .wrap_err_with(|| format!("Render {}", path.display()))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}

async fn ensure_parent(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_plot_dirs(&[parent.to_path_buf()]).await?;
    }
    Ok(())
}

/// Registers the plot types of this crate for config deserialization
pub fn init_plots() {
    _ = serde_json::to_string(&GroupedBar {
        benchmark: String::new(),
        configs: ConfigSetRef::Inline(Vec::new()),
        params: ParamSetRef::Inline(Vec::new()),
        options: PlotOptions::new(""),
    });
    _ = serde_json::to_string(&Legend {
        configs: ConfigSetRef::Inline(Vec::new()),
        filename: String::new(),
        ncol: None,
    });
}
