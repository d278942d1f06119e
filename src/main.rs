use anyhow::Result;
use clap::Parser;
use regsim_data::{OutputMode, UpdateScheme};
use regsim_lib::app::{self, Overrides};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// What to do with the model
    #[arg(short, long, value_enum, default_value = "simulate")]
    mode: Mode,

    /// Model definition file (.toml or .json)
    #[arg(long)]
    model: PathBuf,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[arg(short, long)]
    runs: Option<usize>,

    #[arg(short, long)]
    steps: Option<usize>,

    /// Update scheme (random_async, random_async_grouped, synchronous)
    #[arg(long)]
    scheme: Option<UpdateScheme>,

    #[arg(long)]
    seed: Option<u64>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Trace layout (full, transposed, summary, checker)
    #[arg(long)]
    output_mode: Option<OutputMode>,

    /// Also write the frequency summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Distribute runs across threads
    #[arg(long)]
    parallel: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Simulate,
    Checker,
    Rules,
}

fn main() -> Result<()> {
    regsim_lib::init_logging();
    let args = Args::parse();

    let mut config = app::load_config(&args.config)?;
    app::apply_overrides(
        &mut config,
        &Overrides {
            runs: args.runs,
            steps: args.steps,
            scheme: args.scheme,
            seed: args.seed,
            output: args.output,
            output_mode: args.output_mode,
            summary_json: args.summary_json,
            parallel: args.parallel,
        },
    )?;

    match args.mode {
        Mode::Simulate => {
            let summary = app::simulate(&config, &args.model)?;
            tracing::info!(
                elements = summary.entries.len(),
                runs = summary.runs,
                "Simulation complete"
            );
        }
        Mode::Checker => app::check(&config, &args.model)?,
        Mode::Rules => app::export_rules(&config, &args.model)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing_defaults() {
        let args = Args::parse_from(["regsim", "--model", "net.toml"]);
        assert!(matches!(args.mode, Mode::Simulate));
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(args.runs.is_none());
        assert!(!args.parallel);
    }

    #[test]
    fn test_args_parsing_scheme_and_mode() {
        let args = Args::parse_from([
            "regsim",
            "--mode",
            "rules",
            "--model",
            "net.json",
            "--scheme",
            "sync",
            "--output-mode",
            "summary",
            "-r",
            "10",
        ]);
        assert!(matches!(args.mode, Mode::Rules));
        assert_eq!(args.scheme, Some(UpdateScheme::Synchronous));
        assert_eq!(args.output_mode, Some(OutputMode::Summary));
        assert_eq!(args.runs, Some(10));
    }
}
