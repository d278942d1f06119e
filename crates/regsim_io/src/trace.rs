//! Trace and frequency-summary writers.
//!
//! [`TraceWriter`] plugs into the engine as a [`RunObserver`] and streams
//! each run to the output as soon as it completes.

use regsim_core::export::bit_length;
use regsim_core::{Network, RunObserver, RunTrace};
use regsim_data::{FrequencySummary, OutputMode};
use std::io::{self, Write};

/// Header line preceding the per-element summary lines.
pub const SUMMARY_HEADER: &str = "Frequency Summary:";

pub struct TraceWriter<W: Write> {
    out: W,
    mode: OutputMode,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W, mode: OutputMode) -> Self {
        Self { out, mode }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_full_run(&mut self, network: &Network, trace: &RunTrace) -> io::Result<()> {
        writeln!(self.out, "Run #{}", trace.run)?;
        for id in network.registry().sorted_ids() {
            write!(self.out, "{}", network.element(id).name())?;
            for v in &trace.values[id] {
                write!(self.out, " {v}")?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn write_transposed_run(&mut self, network: &Network, trace: &RunTrace) -> io::Result<()> {
        let ids: Vec<usize> = network.registry().sorted_ids().collect();
        if trace.run == 0 {
            let names: Vec<&str> = ids.iter().map(|&id| network.element(id).name()).collect();
            writeln!(self.out, "# time {} step", names.join(" "))?;
        }
        let steps = trace.values.first().map_or(0, Vec::len);
        for step in 0..steps {
            let row: Vec<String> = ids
                .iter()
                .map(|&id| trace.values[id][step].to_string())
                .collect();
            writeln!(self.out, "{step}  {} {step}", row.join(" "))?;
        }
        Ok(())
    }

    /// Only the first run is written; each level becomes its bits, least
    /// significant first.
    fn write_checker_run(&mut self, network: &Network, trace: &RunTrace) -> io::Result<()> {
        if trace.run != 0 {
            return Ok(());
        }
        let columns: Vec<(usize, u32)> = network
            .registry()
            .sorted_ids()
            .map(|id| (id, bit_length(network.element(id).max_state())))
            .collect();

        write!(self.out, "# time ")?;
        for &(id, bits) in &columns {
            for bit in 0..bits {
                write!(self.out, "{}_{bit} ", network.element(id).name())?;
            }
        }
        writeln!(self.out, "step")?;

        let steps = trace.values.first().map_or(0, Vec::len);
        for step in 0..steps {
            write!(self.out, "{step}  ")?;
            for &(id, bits) in &columns {
                let value = trace.values[id][step];
                for bit in 0..bits {
                    write!(self.out, "{} ", (value >> bit) & 1)?;
                }
            }
            writeln!(self.out, "{step}")?;
        }
        Ok(())
    }
}

/// Writes the blank line, header and one `name|max| s0 s1 ...` line per element.
pub fn write_summary<W: Write>(out: &mut W, summary: &FrequencySummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{SUMMARY_HEADER}")?;
    for entry in &summary.entries {
        let sums: Vec<String> = entry.sums.iter().map(u64::to_string).collect();
        writeln!(out, "{}|{}| {}", entry.name, entry.max_state, sums.join(" "))?;
    }
    Ok(())
}

impl<W: Write> RunObserver for TraceWriter<W> {
    fn on_run(&mut self, network: &Network, trace: &RunTrace) -> io::Result<()> {
        match self.mode {
            OutputMode::Full => self.write_full_run(network, trace),
            OutputMode::Transposed => self.write_transposed_run(network, trace),
            OutputMode::Checker => self.write_checker_run(network, trace),
            OutputMode::Summary => Ok(()),
        }
    }

    fn on_finish(&mut self, _network: &Network, summary: &FrequencySummary) -> io::Result<()> {
        match self.mode {
            OutputMode::Full => write_summary(&mut self.out, summary)?,
            OutputMode::Summary => {
                writeln!(self.out, "Run #{}", summary.runs.saturating_sub(1))?;
                write_summary(&mut self.out, summary)?;
            }
            OutputMode::Transposed | OutputMode::Checker => {}
        }
        self.out.flush()
    }
}
