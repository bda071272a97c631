use std::path::PathBuf;

use campaign::settings::default_settings_dir;
use campaign::{Overrides, init_logging, load_settings, run, write_report};
use campaign_core::model::{Parameter, Target};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "campaign")]
#[command(about = "Analyze the iteration log of an optimization campaign")]
struct Args {
    /// Comma-delimited iteration log with a header row
    input: PathBuf,

    /// Settings file (default: ~/.campaign/config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target to analyze (Yield, Impurity, ImpurityXRatio)
    #[arg(short, long)]
    target: Option<Target>,

    /// Parameter for the surrogate curve
    #[arg(short, long)]
    parameter: Option<Parameter>,

    /// Parameter pair for the local stability map, e.g. T1Celsius,T2Celsius
    #[arg(long, num_args = 2, value_delimiter = ',')]
    pair: Option<Vec<Parameter>>,

    /// |gradient| at or above which a segment is a boundary
    #[arg(long)]
    sensitivity_threshold: Option<f64>,

    /// Averaged bin variation below which a segment is a stability region
    #[arg(long)]
    stability_threshold: Option<f64>,

    /// Analyze only the first N iterations
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Number of surrogate curve sample points
    #[arg(long)]
    samples: Option<usize>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to campaign.log in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            target: self.target,
            parameter: self.parameter,
            pair: self.pair.as_deref().and_then(|pair| match pair {
                [a, b] => Some((*a, *b)),
                _ => None,
            }),
            sensitivity_threshold: self.sensitivity_threshold,
            stability_threshold: self.stability_threshold,
            active_iterations: self.iterations,
            surrogate_samples: self.samples,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    init_logging(args.log_dir.as_deref(), &args.log_level)?;

    let settings = load_settings(args.config.as_deref(), &default_settings_dir())?;
    let config = args.overrides().apply(settings);
    tracing::debug!(?config, "resolved analysis settings");

    let report = run(&args.input, &config)?;
    write_report(&report, args.output.as_deref())?;

    Ok(())
}
