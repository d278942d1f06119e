use proptest::prelude::*;
use regsim_core::definition::ElementDefinition;
use regsim_core::element::{
    decide, transition_index, Direction, Element, Move, RegulatorKind, StepOutcome,
};
use regsim_core::Expr;
use regsim_data::SpontaneousDelays;

fn element(max_state: u32, act: &str, inh: &str, delays: Vec<u32>) -> Element {
    let mut def = ElementDefinition::new("X", max_state);
    def.activators = Expr::parse(act).unwrap();
    def.inhibitors = Expr::parse(inh).unwrap();
    if !delays.is_empty() {
        def.delays = delays;
    }
    Element::new(&def).unwrap()
}

fn arb_spontaneous() -> impl Strategy<Value = SpontaneousDelays> {
    (prop::option::of(0u32..4), prop::option::of(0u32..4))
        .prop_map(|(activation, inhibition)| SpontaneousDelays { activation, inhibition })
}

proptest! {
    #[test]
    fn test_unregulated_always_holds(
        max_state in 2u32..6,
        level in 0u32..6,
        act in 0u32..6,
        inh in 0u32..6,
        spontaneous in arb_spontaneous(),
    ) {
        let level = level.min(max_state - 1);
        let mv = decide(RegulatorKind::Neither, act, inh, level, max_state, spontaneous);
        prop_assert_eq!(mv, Move::Hold);
    }

    #[test]
    fn test_activators_only_never_rises_at_top(
        max_state in 2u32..6,
        act in 0u32..6,
        spontaneous in arb_spontaneous(),
    ) {
        let top = max_state - 1;
        let mv = decide(RegulatorKind::ActivatorsOnly, act, 0, top, max_state, spontaneous);
        prop_assert!(!matches!(mv, Move::Rise(_)));
    }

    #[test]
    fn test_inhibitors_only_never_falls_at_zero(
        max_state in 2u32..6,
        inh in 0u32..6,
        spontaneous in arb_spontaneous(),
    ) {
        let mv = decide(RegulatorKind::InhibitorsOnly, 0, inh, 0, max_state, spontaneous);
        prop_assert!(!matches!(mv, Move::Fall(_)));
    }

    #[test]
    fn test_moves_stay_in_range(
        max_state in 2u32..6,
        level in 0u32..6,
        act in 0u32..6,
        inh in 0u32..6,
        has_act in any::<bool>(),
        has_inh in any::<bool>(),
    ) {
        let level = level.min(max_state - 1);
        let e = element(
            max_state,
            if has_act { "A" } else { "" },
            if has_inh { "B" } else { "" },
            Vec::new(),
        );
        let next = e.next_value_ignoring_delays(level, act, inh);
        prop_assert!(next < max_state);
        prop_assert!(next.abs_diff(level) <= 1);
    }

    #[test]
    fn test_delay_needs_d_plus_one_updates(max_state in 2u32..6, d in 0u32..5) {
        let transitions = 2 * (max_state - 1) as usize;
        let mut delays = vec![0; transitions];
        delays[0] = d;
        let mut e = element(max_state, "A", "", delays);

        for _ in 0..d {
            prop_assert_eq!(e.apply(1, 0), StepOutcome::Delayed);
            prop_assert_eq!(e.value(), 0);
        }
        prop_assert_eq!(e.apply(1, 0), StepOutcome::Fired);
        prop_assert_eq!(e.value(), 1);
        prop_assert_eq!(e.delay_state().transition[0], 0);
    }

    #[test]
    fn test_transition_indices_are_distinct(max_state in 2u32..8) {
        let top = max_state - 1;
        let mut seen = std::collections::BTreeSet::new();
        for level in 0..top {
            prop_assert!(seen.insert(transition_index(Direction::Rising, level, max_state).unwrap()));
        }
        for level in 1..=top {
            prop_assert!(seen.insert(transition_index(Direction::Falling, level, max_state).unwrap()));
        }
        prop_assert_eq!(seen.len(), 2 * top as usize);
        prop_assert_eq!(seen.iter().max().copied(), Some(2 * top as usize - 1));
    }
}

#[test]
fn test_transition_index_boundaries() {
    assert_eq!(transition_index(Direction::Rising, 2, 3), None);
    assert_eq!(transition_index(Direction::Falling, 0, 3), None);
    assert_eq!(transition_index(Direction::Falling, 2, 3), Some(2));
    assert_eq!(transition_index(Direction::Falling, 1, 3), Some(3));
}

#[test]
fn test_counters_persist_across_updates_until_reset() {
    let mut e = element(3, "A", "", vec![2, 0, 0, 0]);
    assert_eq!(e.apply(1, 0), StepOutcome::Delayed);
    assert_eq!(e.apply(1, 0), StepOutcome::Delayed);
    assert_eq!(e.delay_state().transition[0], 2);

    e.reset(0);
    assert_eq!(e.delay_state().transition[0], 0);
    assert_eq!(e.apply(1, 0), StepOutcome::Delayed);
}
