use std::path::{Path, PathBuf};

use common::{
    config::Config,
    plot::{PlotContext, ensure_plot_dirs, select_plots},
};
use eyre::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

fn progress_bar(len: usize, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    Ok(bar)
}

/// Renders the selected plots one after another, stopping at the first failure
pub async fn render_plots(
    config: &Config,
    data_dir: &Path,
    output_dir: &Path,
    only: &[String],
    no_progress: bool,
) -> Result<Vec<PathBuf>> {
    let plots = select_plots(&config.plots, only);
    if plots.is_empty() {
        bail!("No plots selected");
    }
    ensure_plot_dirs(&[output_dir.to_path_buf()]).await?;

    let palette = config.palette()?;
    let ctx = PlotContext {
        config,
        data_dir,
        output_dir,
        palette: &palette,
    };

    let bar = progress_bar(plots.len(), no_progress)?;
    let mut written = Vec::with_capacity(plots.len());
    for plot in plots {
        bar.set_message(plot.filename().to_owned());
        debug!("Rendering {}", plot.describe());
        let path = plot
            .plot(&ctx)
            .await
            .wrap_err_with(|| format!("Plot {}", plot.filename()))?;
        written.push(path);
        bar.inc(1);
    }
    bar.finish_and_clear();
    info!("Rendered {} plots", written.len());
    Ok(written)
}

/// Aggregated runs of the selected plots, keyed by file name
pub async fn summarize_plots(
    config: &Config,
    data_dir: &Path,
    output_dir: &Path,
    only: &[String],
) -> Result<Vec<(String, Vec<String>)>> {
    let palette = config.palette()?;
    let ctx = PlotContext {
        config,
        data_dir,
        output_dir,
        palette: &palette,
    };

    let mut summaries = Vec::new();
    for plot in select_plots(&config.plots, only) {
        let lines = plot
            .summary(&ctx)
            .await
            .wrap_err_with(|| format!("Summarize {}", plot.filename()))?;
        summaries.push((plot.filename().to_owned(), lines));
    }
    Ok(summaries)
}
