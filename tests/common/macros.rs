/// Asserts the per-step cross-run sums recorded for a named element.
#[macro_export]
macro_rules! assert_sums {
    ($summary:expr, $name:expr, $expected:expr) => {{
        let summary = &$summary;
        let entry = summary
            .entry($name)
            .unwrap_or_else(|| panic!("Element {} missing from summary", $name));
        let expected: Vec<u64> = $expected.to_vec();
        assert_eq!(entry.sums, expected, "Sums mismatch for {}", $name);
    }};
}

/// Asserts the current level of a named element.
#[macro_export]
macro_rules! assert_level {
    ($network:expr, $name:expr, $level:expr) => {
        let id = $network
            .registry()
            .id($name)
            .unwrap_or_else(|| panic!("Element {} not found", $name));
        assert_eq!(
            $network.registry().value(id),
            $level,
            "Level mismatch for {}",
            $name
        );
    };
}

/// Asserts that every recorded sum lies within `[0, runs * (max_state - 1)]`.
#[macro_export]
macro_rules! assert_sums_bounded {
    ($summary:expr) => {
        for entry in &$summary.entries {
            let cap = $summary.runs as u64 * u64::from(entry.max_state - 1);
            for (step, &sum) in entry.sums.iter().enumerate() {
                assert!(
                    sum <= cap,
                    "{} sum {} at step {} exceeds {}",
                    entry.name,
                    sum,
                    step,
                    cap
                );
            }
        }
    };
}
