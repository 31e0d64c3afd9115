mod analyze;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bootplot_core::{service_url, AnalyzeCommand, BootMode, BootPlot, PlotConfig};
use bootplot_svg::{render_report, transform_plot};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bootplot",
    about = "Annotated boot timeline from `systemd-analyze plot`."
)]
struct Args {
    /// Analyze the calling user's service manager instead of the system one.
    #[arg(long)]
    user: bool,
    /// Read a saved plot instead of running the analyzer.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// JSON file overriding plot settings.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
    /// Write to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Summary line and recognised units.
    Summary,
    /// The transformed plot as JSON.
    Json,
    /// Annotated SVG markup only.
    Svg,
    /// Standalone HTML report.
    Html,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bootplot=info,bootplot_core=info,bootplot_svg=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PlotConfig> {
    let Some(path) = path else {
        return Ok(PlotConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {path:?}"))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid config {path:?}"))
}

fn render(
    plot: &BootPlot,
    format: OutputFormat,
    mode: BootMode,
    config: &PlotConfig,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Summary => format_summary(plot, config),
        OutputFormat::Json => {
            serde_json::to_string_pretty(plot).context("Could not serialize plot")? + "\n"
        }
        OutputFormat::Svg => format!("{}\n", plot.markup),
        OutputFormat::Html => {
            let title = match mode {
                BootMode::System => "Boot Info",
                BootMode::User => "Boot Info (user session)",
            };
            render_report(plot, title)
        }
    })
}

fn format_summary(plot: &BootPlot, config: &PlotConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        plot.summary.as_deref().unwrap_or("No boot summary available")
    );

    if plot.services.is_empty() {
        return out;
    }

    let width = plot
        .services
        .iter()
        .map(|label| label.service.len())
        .max()
        .unwrap_or_default();
    out.push('\n');
    for label in &plot.services {
        let elapsed = match (&label.elapsed, &label.unit) {
            (Some(elapsed), Some(unit)) => format!("{elapsed}{unit}"),
            _ => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:>9}  {}",
            label.service,
            elapsed,
            service_url(&config.services_path, &label.service),
        );
    }
    out
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let mode = if args.user {
        BootMode::User
    } else {
        BootMode::System
    };

    let svg = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Could not read plot {path:?}"))?,
        None => {
            let command = AnalyzeCommand::new(mode, &config);
            analyze::run_analyzer(&command)
                .await
                .with_context(|| format!("`{}` failed", command.argv().join(" ")))?
        }
    };

    let plot = transform_plot(&svg, &config).context("Could not transform boot plot")?;
    tracing::info!(
        units = plot.services.len(),
        summary = plot.summary.is_some(),
        "boot plot ready"
    );

    let rendered = render(&plot, args.format, mode, &config)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Could not write {path:?}"))?,
        None => print!("{rendered}"),
    }

    Ok(())
}
