use clap::Parser;
use regsim_io::{read_expected, read_summary, score_against_expected};
use std::path::PathBuf;

/// Score a written frequency summary against expected end values.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trace file containing a frequency summary
    #[arg(short, long, default_value = "trace.txt")]
    summary: PathBuf,

    /// Expected end values (`name = value` TOML or a JSON object)
    #[arg(short, long)]
    expected: PathBuf,

    /// Number of runs; read from the trace when omitted
    #[arg(short, long)]
    runs: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    regsim_core::init_logging();
    let args = Args::parse();

    let summary = read_summary(&args.summary, args.runs)?;
    let expected = read_expected(&args.expected)?;
    let report = score_against_expected(&summary, &expected);

    if args.json {
        let value = serde_json::json!({
            "score": report.score,
            "differences": report.differences,
            "missing": report.missing,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "Scored {} element(s) over {} run(s)",
        report.differences.len(),
        summary.runs
    );
    for (name, diff) in &report.differences {
        println!("  {name:<20} {diff:.4}");
    }
    if !report.missing.is_empty() {
        println!("Missing from summary: {}", report.missing.join(", "));
    }
    println!("Score: {:.4}", report.score);
    Ok(())
}
