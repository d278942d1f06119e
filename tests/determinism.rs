mod common;
use common::{params, summarize, NetworkBuilder};
use regsim_core::simulation::{run_once, run_rng};
use regsim_core::scheduler::policy_for;
use regsim_core::{Metrics, Network};
use regsim_data::UpdateScheme;

fn feedback_loop() -> Network {
    NetworkBuilder::new()
        .element("A", 3, "C", "B")
        .random_initial()
        .element("B", 3, "(A,C)", "")
        .random_initial()
        .spontaneous(None, Some(1))
        .element("C", 3, "{A}[B]", "!A")
        .random_initial()
        .spontaneous(Some(1), Some(2))
        .build()
}

#[test]
fn test_same_seed_same_summary() {
    for scheme in [
        UpdateScheme::RandomAsync,
        UpdateScheme::RandomAsyncGrouped,
        UpdateScheme::Synchronous,
    ] {
        let p = params(scheme, 25, 40, 12345);
        let first = summarize(&mut feedback_loop(), &p);
        let second = summarize(&mut feedback_loop(), &p);
        assert_eq!(first, second, "Summaries diverged under {scheme}");
    }
}

#[test]
fn test_run_depends_only_on_seed_and_index() {
    let policy = policy_for(UpdateScheme::RandomAsync);
    let metrics = Metrics::new();

    let mut net = feedback_loop();
    let mut rng = run_rng(99, 3);
    let direct = run_once(&mut net, policy.as_ref(), 30, 3, &mut rng, &metrics).unwrap();

    // Running other indices first must not disturb run 3.
    let mut net = feedback_loop();
    for run in 0..3 {
        let mut rng = run_rng(99, run);
        run_once(&mut net, policy.as_ref(), 30, run, &mut rng, &metrics).unwrap();
    }
    let mut rng = run_rng(99, 3);
    let after = run_once(&mut net, policy.as_ref(), 30, 3, &mut rng, &metrics).unwrap();

    assert_eq!(direct, after);
}

#[test]
fn test_different_seeds_differ() {
    let a = summarize(&mut feedback_loop(), &params(UpdateScheme::RandomAsync, 50, 50, 1));
    let b = summarize(&mut feedback_loop(), &params(UpdateScheme::RandomAsync, 50, 50, 2));
    assert_ne!(a, b);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    use regsim_core::simulation::run_parallel;

    let p = params(UpdateScheme::RandomAsyncGrouped, 64, 30, 2024);
    let sequential = summarize(&mut feedback_loop(), &p);
    let parallel = run_parallel(&feedback_loop(), &p, &Metrics::new()).unwrap();
    assert_eq!(sequential, parallel);
}
