use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::config::Config;
use eyre::{Context, Result};
use tracing::error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod plot;

const MODULES: &[&str] = &["jmh_plot", "common", "jmh", "bar_chart"];

#[derive(Parser)]
#[command(about = "Grouped bar charts of JMH throughput results")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Plot configuration
    #[arg(short, long, global = true, default_value = "plots.yaml")]
    config_file: PathBuf,
    /// Directory the benchmark result files are read from
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,
    /// Overrides the output directory of the configuration
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    no_progress: bool,
    #[arg(short, long, global = true)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render plots
    Plot {
        /// Only render plots with these file names
        #[arg(long, num_args = 1..)]
        only: Vec<String>,
    },
    /// List benchmarks and configured plots
    Ls,
    /// Print the aggregated runs behind each plot without rendering
    Print {
        #[arg(long, num_args = 1..)]
        only: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "jmh-plot.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("jmh_plot={log_level}"));
    for log in &args.log {
        env_filter = env_filter.add_directive(log.parse()?);
    }
    for module in MODULES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking))
        .init();

    bar_chart::init_plots();

    if let Err(err) = run(args).await {
        error!("{err:#?}");
        return Err(err);
    }
    Ok(())
}

async fn run(args: Cli) -> Result<()> {
    let config = Config::load(&args.config_file).await?;
    config
        .validate()
        .wrap_err_with(|| format!("Invalid config {}", args.config_file.display()))?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    match args.command.unwrap_or(Commands::Plot { only: Vec::new() }) {
        Commands::Plot { only } => {
            let written = plot::render_plots(
                &config,
                &args.data_dir,
                &output_dir,
                &only,
                args.no_progress,
            )
            .await?;
            println!("Wrote {} plots to {}", written.len(), output_dir.display());
        }
        Commands::Ls => list(&config),
        Commands::Print { only } => {
            for (filename, lines) in
                plot::summarize_plots(&config, &args.data_dir, &output_dir, &only).await?
            {
                println!("{filename}");
                for line in lines {
                    println!("  {line}");
                }
            }
        }
    }
    Ok(())
}

fn list(config: &Config) {
    println!("Benchmarks:");
    for (name, benchmark) in &config.benchmarks {
        println!("  {name} -> {}", benchmark.file.display());
        for (label, config_file) in &benchmark.configs {
            println!("    {label:<20} '{config_file}'");
        }
    }
    println!("Plots:");
    for plot in &config.plots {
        println!("  {} -> {}", plot.filename(), plot.describe());
    }
}
