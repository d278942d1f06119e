//! Application wiring: configuration, model loading, engine and writers.

use anyhow::{Context, Result};
use regsim_core::config::AppConfig;
use regsim_core::export::write_rules;
use regsim_core::simulation::{run_simulation, SimulationParams};
use regsim_core::{Metrics, Network, RunObserver};
use regsim_data::{FrequencySummary, OutputMode, UpdateScheme};
use regsim_io::{load_model, write_json_file, TraceWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Command line values that take precedence over `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub runs: Option<usize>,
    pub steps: Option<usize>,
    pub scheme: Option<UpdateScheme>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub output_mode: Option<OutputMode>,
    pub summary_json: Option<PathBuf>,
    pub parallel: bool,
}

/// Loads `path` if it exists, otherwise the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    AppConfig::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
}

/// Applies command line overrides and re-validates.
pub fn apply_overrides(config: &mut AppConfig, overrides: &Overrides) -> Result<()> {
    let sim = &mut config.simulation;
    if let Some(runs) = overrides.runs {
        sim.runs = runs;
    }
    if let Some(steps) = overrides.steps {
        sim.steps = steps;
    }
    if let Some(scheme) = overrides.scheme {
        sim.scheme = scheme;
    }
    if overrides.seed.is_some() {
        sim.seed = overrides.seed;
    }
    sim.parallel |= overrides.parallel;

    let out = &mut config.output;
    if let Some(path) = &overrides.output {
        out.path = path.clone();
    }
    if let Some(mode) = overrides.output_mode {
        out.mode = mode;
    }
    if overrides.summary_json.is_some() {
        out.summary_json = overrides.summary_json.clone();
    }
    config.validate()
}

fn params(config: &AppConfig) -> SimulationParams {
    SimulationParams {
        scheme: config.simulation.scheme,
        runs: config.simulation.runs,
        steps: config.simulation.steps,
        seed: config.simulation.seed,
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Runs the configured simulation and writes the trace.
pub fn simulate(config: &AppConfig, model: &Path) -> Result<FrequencySummary> {
    let mut network = load_model(model, &config.defaults)?;
    let metrics = Metrics::new();
    let mut writer = TraceWriter::new(create_output(&config.output.path)?, config.output.mode);

    let summary = if config.simulation.parallel {
        run_parallel_or_fallback(config, &mut network, &mut writer, &metrics)?
    } else {
        run_simulation(&mut network, &params(config), &mut writer, &metrics)?
    };

    tracing::info!(path = %config.output.path.display(), "Trace written");
    if let Some(json) = &config.output.summary_json {
        write_json_file(&summary, json)?;
        tracing::info!(path = %json.display(), "Summary JSON written");
    }
    Ok(summary)
}

/// Parallel runs produce no per-run traces, so they are only used when the
/// output needs nothing but the summary.
#[cfg(feature = "parallel")]
fn run_parallel_or_fallback(
    config: &AppConfig,
    network: &mut Network,
    writer: &mut TraceWriter<BufWriter<File>>,
    metrics: &Metrics,
) -> Result<FrequencySummary> {
    if config.output.mode != OutputMode::Summary {
        tracing::warn!(
            mode = ?config.output.mode,
            "Parallel runs only support summary output, running sequentially"
        );
        return Ok(run_simulation(network, &params(config), writer, metrics)?);
    }
    let summary = regsim_core::simulation::run_parallel(network, &params(config), metrics)?;
    writer.on_finish(network, &summary)?;
    Ok(summary)
}

#[cfg(not(feature = "parallel"))]
fn run_parallel_or_fallback(
    config: &AppConfig,
    network: &mut Network,
    writer: &mut TraceWriter<BufWriter<File>>,
    metrics: &Metrics,
) -> Result<FrequencySummary> {
    tracing::warn!("Built without the parallel feature, running sequentially");
    Ok(run_simulation(network, &params(config), writer, metrics)?)
}

/// Writes a single run as a Boolean bit trace.
pub fn check(config: &AppConfig, model: &Path) -> Result<()> {
    let mut single = config.clone();
    single.simulation.runs = 1;
    single.simulation.parallel = false;
    single.output.mode = OutputMode::Checker;
    single.output.summary_json = None;
    simulate(&single, model)?;
    Ok(())
}

/// Writes the truth-table rules of every regulated element.
pub fn export_rules(config: &AppConfig, model: &Path) -> Result<()> {
    let network = load_model(model, &config.defaults)?;
    let mut out = create_output(&config.output.path)?;
    write_rules(&network, config.export.max_truth_table_rows, &mut out)?;
    std::io::Write::flush(&mut out)?;
    tracing::info!(path = %config.output.path.display(), "Rules written");
    Ok(())
}
