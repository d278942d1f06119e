//! Run orchestration: reset, step, record, accumulate.
//!
//! Every run `r` draws from its own generator, `ChaCha8Rng` seeded with the
//! base seed on stream `r`, so a run's trace depends only on the seed and
//! its index. That is what lets [`run_parallel`] reproduce the summary of
//! [`run_simulation`] exactly.

use crate::error::Result;
use crate::metrics::Metrics;
use crate::network::Network;
use crate::scheduler::{policy_for, UpdatePolicy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use regsim_data::{FrequencySummary, SummaryEntry, UpdateScheme};
use std::io;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParams {
    pub scheme: UpdateScheme,
    pub runs: usize,
    pub steps: usize,
    /// Base seed; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl SimulationParams {
    fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random();
                tracing::info!(seed = seed, "No seed configured, drew one from entropy");
                seed
            }
        }
    }
}

/// Values of every element at every step `0..=steps` of one run, indexed
/// `[element id][step]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTrace {
    pub run: usize,
    pub values: Vec<Vec<u32>>,
}

/// Receives each run as it completes, for writing traces.
pub trait RunObserver {
    fn on_run(&mut self, network: &Network, trace: &RunTrace) -> io::Result<()>;

    fn on_finish(&mut self, _network: &Network, _summary: &FrequencySummary) -> io::Result<()> {
        Ok(())
    }
}

impl RunObserver for () {
    fn on_run(&mut self, _network: &Network, _trace: &RunTrace) -> io::Result<()> {
        Ok(())
    }
}

/// Generator for run `run` under base seed `seed`.
#[must_use]
pub fn run_rng(seed: u64, run: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(run as u64);
    rng
}

/// Performs one run from a fresh reset. Toggles for a step are applied
/// after the policy has updated, so they override whatever it computed.
pub fn run_once(
    network: &mut Network,
    policy: &dyn UpdatePolicy,
    steps: usize,
    run: usize,
    rng: &mut ChaCha8Rng,
    metrics: &Metrics,
) -> Result<RunTrace> {
    network.reset(rng);
    let mut values: Vec<Vec<u32>> = network
        .values()
        .into_iter()
        .map(|v| {
            let mut trace = Vec::with_capacity(steps + 1);
            trace.push(v);
            trace
        })
        .collect();

    let mut selected = Vec::new();
    for step in 1..=steps {
        network.step(policy, rng, &mut selected, metrics)?;
        metrics.record_toggles(network.apply_toggles(step));
        for (id, trace) in values.iter_mut().enumerate() {
            trace.push(network.registry().value(id));
        }
    }
    Ok(RunTrace { run, values })
}

fn zero_sums(network: &Network, steps: usize) -> Vec<Vec<u64>> {
    vec![vec![0; steps + 1]; network.len()]
}

fn accumulate(sums: &mut [Vec<u64>], trace: &RunTrace) {
    for (row, values) in sums.iter_mut().zip(&trace.values) {
        for (sum, &v) in row.iter_mut().zip(values) {
            *sum += u64::from(v);
        }
    }
}

fn summarize(network: &Network, params: &SimulationParams, sums: Vec<Vec<u64>>) -> FrequencySummary {
    let mut sums: Vec<Option<Vec<u64>>> = sums.into_iter().map(Some).collect();
    let entries = network
        .registry()
        .sorted_ids()
        .map(|id| {
            let element = network.element(id);
            SummaryEntry {
                name: element.name().to_string(),
                max_state: element.max_state(),
                sums: sums[id].take().unwrap_or_default(),
            }
        })
        .collect();
    FrequencySummary {
        runs: params.runs,
        steps: params.steps,
        entries,
    }
}

/// Runs the simulation sequentially, handing every run to `observer`.
pub fn run_simulation(
    network: &mut Network,
    params: &SimulationParams,
    observer: &mut dyn RunObserver,
    metrics: &Metrics,
) -> Result<FrequencySummary> {
    let policy = policy_for(params.scheme);
    let seed = params.resolve_seed();
    tracing::info!(
        scheme = policy.name(),
        runs = params.runs,
        steps = params.steps,
        elements = network.len(),
        seed = seed,
        "Starting simulation"
    );

    let mut sums = zero_sums(network, params.steps);
    for run in 0..params.runs {
        let started = Instant::now();
        let mut rng = run_rng(seed, run);
        let trace = run_once(network, policy.as_ref(), params.steps, run, &mut rng, metrics)?;
        accumulate(&mut sums, &trace);
        observer.on_run(network, &trace)?;
        metrics.record_run(run, started.elapsed());
    }

    let summary = summarize(network, params, sums);
    observer.on_finish(network, &summary)?;
    metrics.log_summary();
    Ok(summary)
}

/// Runs the simulation across the rayon thread pool. Each worker owns a
/// clone of the network; per-worker sums are merged by addition.
#[cfg(feature = "parallel")]
pub fn run_parallel(
    network: &Network,
    params: &SimulationParams,
    metrics: &Metrics,
) -> Result<FrequencySummary> {
    use rayon::prelude::*;

    let policy = policy_for(params.scheme);
    let seed = params.resolve_seed();
    tracing::info!(
        scheme = policy.name(),
        runs = params.runs,
        steps = params.steps,
        elements = network.len(),
        seed = seed,
        threads = rayon::current_num_threads(),
        "Starting parallel simulation"
    );

    let policy = policy.as_ref();
    let sums = (0..params.runs)
        .into_par_iter()
        .try_fold(
            || (network.clone(), zero_sums(network, params.steps)),
            |(mut net, mut sums), run| -> Result<_> {
                let started = Instant::now();
                let mut rng = run_rng(seed, run);
                let trace = run_once(&mut net, policy, params.steps, run, &mut rng, metrics)?;
                accumulate(&mut sums, &trace);
                metrics.record_run(run, started.elapsed());
                Ok((net, sums))
            },
        )
        .map(|partial| partial.map(|(_, sums)| sums))
        .try_reduce(
            || zero_sums(network, params.steps),
            |mut total, partial| {
                for (row, other) in total.iter_mut().zip(partial) {
                    for (sum, v) in row.iter_mut().zip(other) {
                        *sum += v;
                    }
                }
                Ok(total)
            },
        )?;

    let summary = summarize(network, params, sums);
    metrics.log_summary();
    Ok(summary)
}
