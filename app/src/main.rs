use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::{
    config::Config,
    plot::{ChartFilter, Plot},
    util::read_results,
};
use eyre::{Context, Result};
use tokio::fs::{read_to_string, remove_dir_all};
use tracing::{debug, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the charts a config renders
    Ls {
        #[arg(short, long, default_value = "config.yaml")]
        config_file: String,
    },
    /// Render charts from a results file
    Plot {
        #[arg(short, long, default_value = "config.yaml")]
        config_file: String,
        /// Results file, overrides the config
        #[arg(long)]
        results: Option<PathBuf>,
        /// Output folder, overrides the config
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only render charts whose id matches this regex
        #[arg(long)]
        only: Option<String>,
        /// Remove the output folder first
        #[arg(long, default_value_t = false)]
        clean: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("bench_charts={log_level}"));

    if !args.log.is_empty() {
        for log in &args.log {
            env_filter = env_filter.add_directive(log.parse()?);
        }
    }

    for module in ["common"].iter().chain(default_plots::PLOT_CRATES) {
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

    default_plots::init_plots();

    match args.command {
        Commands::Ls { config_file } => list_charts(&config_file).await?,
        Commands::Plot {
            config_file,
            results,
            output,
            only,
            clean,
        } => {
            if let Err(err) = plot(&config_file, results, output, only.as_deref(), clean).await {
                error!("{err:#?}");
                return Err(err);
            }
        }
    };

    Ok(())
}

async fn load_config(config_file: &str) -> Result<Config> {
    let mut config: Config = serde_yml::from_str(
        &read_to_string(config_file)
            .await
            .context(format!("Reading {config_file}"))?,
    )
    .context(format!("Parsing {config_file}"))?;

    if config.plots.is_empty() {
        debug!("No plots configured, using every plot");
        config.plots = default_plots::default_plots();
    }
    Ok(config)
}

async fn list_charts(config_file: &str) -> Result<()> {
    let config = load_config(config_file).await?;
    let results = read_results(&config.results).await?;
    for plot in &config.plots {
        for id in plot.chart_ids(&results)? {
            println!("{} -> {id}", plot.name());
        }
    }
    Ok(())
}

async fn plot(
    config_file: &str,
    results: Option<PathBuf>,
    output: Option<PathBuf>,
    only: Option<&str>,
    clean: bool,
) -> Result<()> {
    let config = load_config(config_file).await?;
    let results_path = results.unwrap_or(config.results.clone());
    let plot_path = output.unwrap_or(config.output.clone());
    let filter = ChartFilter::new(only)?;

    if clean {
        _ = remove_dir_all(&plot_path).await;
    }

    let results = read_results(&results_path).await?;
    debug!("Rendering {} from {}", config.name, results_path.display());
    let written =
        common::plot::plot(&config.plots, &results, &plot_path, &config.settings, &filter).await?;

    for file in &written {
        println!("{}", file.display());
    }
    if written.is_empty() {
        println!("No charts rendered");
    }
    Ok(())
}
