use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, ValueEnum};
use crossbeam_channel::{bounded, RecvTimeoutError};
use log::info;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use mzdeiso::feature::FeatureRow;
use mzdeiso::feature_list::{FeatureList, Project, ResultSink};
use mzdeiso::grouper::{GroupingStats, RepresentativeIsotope};
use mzdeiso::io::{export_json, read_feature_table, save_grouped_table};
use mzdeiso::task::{GrouperParameters, IsotopeGrouperTask, TaskOutcome};
use mzdeiso::tolerance::{MobilityTolerance, MzTolerance, RtTolerance};

use super::config::Config;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Representative isotope of a merged group.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RepresentativeArg {
    /// Keep the most intense isotope
    MostIntense,
    /// Keep the lightest isotope
    LowestMz,
}

impl From<RepresentativeArg> for RepresentativeIsotope {
    fn from(arg: RepresentativeArg) -> Self {
        match arg {
            RepresentativeArg::MostIntense => RepresentativeIsotope::MostIntense,
            RepresentativeArg::LowestMz => RepresentativeIsotope::LowestMz,
        }
    }
}

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// CSV feature table with grouping columns
    #[default]
    Csv,
    /// JSON feature list including processing history
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Input feature table (CSV)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (defaults to INPUT_<suffix>.<format>)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Absolute m/z tolerance
    #[arg(long, value_name = "MZ")]
    mz_tol: Option<f64>,

    /// Relative m/z tolerance in ppm
    #[arg(long, value_name = "PPM")]
    ppm: Option<f64>,

    /// Retention time tolerance in minutes
    #[arg(long, value_name = "MIN")]
    rt_tol: Option<f64>,

    /// Highest charge state to try
    #[arg(long, value_name = "Z")]
    max_charge: Option<i32>,

    /// Only search isotopes heavier than the seed
    #[arg(long, conflicts_with = "both_directions")]
    monotonic: bool,

    /// Search isotopes on both sides of the seed
    #[arg(long)]
    both_directions: bool,

    /// Which isotope represents a merged group
    #[arg(long, value_enum)]
    representative: Option<RepresentativeArg>,

    /// Collect MS2 scans of every merged isotope
    #[arg(long)]
    keep_all_ms2: bool,

    /// Ion mobility tolerance (absolute)
    #[arg(long, value_name = "WIDTH")]
    mobility_tol: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

impl GroupArgs {
    /// Overlay command-line flags onto `parameters`.
    fn apply(&self, mut parameters: GrouperParameters) -> GrouperParameters {
        let grouping = &mut parameters.grouping;
        if self.mz_tol.is_some() || self.ppm.is_some() {
            grouping.mz_tolerance = MzTolerance::new(
                self.mz_tol.unwrap_or(grouping.mz_tolerance.absolute),
                self.ppm.unwrap_or(grouping.mz_tolerance.ppm),
            );
        }
        if let Some(rt) = self.rt_tol {
            grouping.rt_tolerance = RtTolerance::Absolute(rt);
        }
        if let Some(max_charge) = self.max_charge {
            grouping.max_charge = max_charge;
        }
        if self.monotonic {
            grouping.monotonic_shape = true;
        }
        if self.both_directions {
            grouping.monotonic_shape = false;
        }
        if let Some(representative) = self.representative {
            grouping.representative_isotope = representative.into();
        }
        if self.keep_all_ms2 {
            grouping.keep_all_ms2 = true;
        }
        if let Some(width) = self.mobility_tol {
            grouping.mobility_tolerance = Some(MobilityTolerance::new(width));
        }
        parameters
    }

    fn output_path(&self, suffix: &str) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let stem = self
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "features".to_string());
        let tag = if suffix.is_empty() {
            "grouped".to_string()
        } else {
            suffix.replace(' ', "_")
        };
        self.input
            .with_file_name(format!("{}_{}.{}", stem, tag, self.format.extension()))
    }
}

/// Deisotope a feature table
pub fn run(args: GroupArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    let parameters = args.apply(config.grouping.apply(GrouperParameters::default()));
    parameters
        .grouping
        .validate()
        .context("Invalid grouping parameters")?;

    let rows = read_feature_table(&args.input)
        .with_context(|| format!("Failed to read feature table: {}", args.input.display()))?;
    if rows.is_empty() {
        bail!("No features in {}", args.input.display());
    }

    let list = input_list(&args.input, rows);
    list.validate().context("Invalid feature table")?;
    info!("Read {} features from {}", list.len(), args.input.display());
    for (key, value) in parameters.to_parameter_map() {
        info!("  {}: {}", key, value);
    }

    let output = args.output_path(&parameters.suffix);
    let mut project = Project::new();
    project.register(list.clone())?;

    let task = IsotopeGrouperTask::new(list, parameters);
    let control = task.control();
    let (sender, receiver) = bounded(1);

    let handle = thread::Builder::new()
        .name("mzdeiso-grouper".to_string())
        .spawn(move || {
            let result = task.run(&mut project).map(|outcome| (outcome, project));
            // The receiver only goes away when the main thread bails out.
            let _ = sender.send(result);
        })
        .context("Failed to spawn grouping thread")?;

    let received = loop {
        match receiver.recv_timeout(PROGRESS_INTERVAL) {
            Ok(result) => break result,
            Err(RecvTimeoutError::Timeout) => {
                info!(
                    "Grouping: {:.1}% ({} seeds)",
                    control.finished_percentage() * 100.0,
                    control.processed()
                );
            }
            Err(RecvTimeoutError::Disconnected) => {
                bail!("Grouping thread exited without a result");
            }
        }
    };
    handle
        .join()
        .map_err(|_| anyhow!("Grouping thread panicked"))?;

    let (outcome, project) = received.context("Grouping failed")?;
    let (list_name, stats) = match outcome {
        TaskOutcome::Finished { list_name, stats } => (list_name, stats),
        TaskOutcome::Canceled { .. } => bail!("Grouping was canceled"),
    };
    let result = project
        .get(&list_name)
        .ok_or_else(|| anyhow!("Result list '{}' was not registered", list_name))?;

    let written = match args.format {
        OutputFormat::Csv => save_grouped_table(&output, &result.rows),
        OutputFormat::Json => export_json(&output, result),
    };
    written.with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} rows to {}", result.len(), output.display());
    println!("{}", format_summary(&stats, &output));

    Ok(())
}

fn input_list(path: &Path, rows: Vec<FeatureRow>) -> FeatureList {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "features".to_string());
    let sample = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    FeatureList::new(name, sample, rows)
}

fn format_summary(stats: &GroupingStats, output: &Path) -> String {
    let charges = stats
        .charge_counts
        .iter()
        .map(|(z, n)| format!("z={}: {}", z, n))
        .collect::<Vec<_>>()
        .join(", ");

    #[cfg(feature = "colorized_output")]
    {
        use console::style;

        format!(
            "{}\n  {}: {} -> {}\n  {}: {} ({} features merged)\n  {}: {}\n  {}: {}\n  {}: {}",
            style("Isotope grouping complete").bold().green(),
            style("Rows").bold(),
            stats.features_in,
            style(stats.rows_out()).cyan(),
            style("Groups").bold(),
            style(stats.groups_formed).cyan(),
            stats.features_merged,
            style("Pass-through").bold(),
            stats.pass_through,
            style("Charges").bold(),
            if charges.is_empty() { "-".to_string() } else { charges },
            style("Output").bold(),
            output.display()
        )
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        format!(
            "Isotope grouping complete\n  Rows: {} -> {}\n  Groups: {} ({} features merged)\n  Pass-through: {}\n  Charges: {}\n  Output: {}",
            stats.features_in,
            stats.rows_out(),
            stats.groups_formed,
            stats.features_merged,
            stats.pass_through,
            if charges.is_empty() { "-".to_string() } else { charges },
            output.display()
        )
    }
}
