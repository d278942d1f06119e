//! Update disciplines: which elements fire in a step, and in what order.
//!
//! Policies hold no state between steps. The only randomness comes from the
//! generator the caller passes in.

use crate::network::Network;
use rand::{Rng, RngCore};
use regsim_data::UpdateScheme;

/// Chooses the elements to update in one step.
pub trait UpdatePolicy: Send + Sync {
    /// Appends the ids to update, in update order, to `out`.
    fn select(&self, network: &Network, rng: &mut dyn RngCore, out: &mut Vec<usize>);

    fn name(&self) -> &'static str;
}

/// One element of the update list, chosen uniformly.
pub struct RandomAsync;

/// As [`RandomAsync`], followed by the rest of the chosen element's update
/// group in update-list order.
pub struct RandomAsyncGrouped;

/// Every element of the update list in registration order.
pub struct Synchronous;

fn pick(network: &Network, rng: &mut dyn RngCore) -> Option<usize> {
    let list = network.update_list();
    if list.is_empty() {
        return None;
    }
    Some(list[rng.gen_range(0..list.len())])
}

impl UpdatePolicy for RandomAsync {
    fn select(&self, network: &Network, rng: &mut dyn RngCore, out: &mut Vec<usize>) {
        out.extend(pick(network, rng));
    }

    fn name(&self) -> &'static str {
        "random_async"
    }
}

impl UpdatePolicy for RandomAsyncGrouped {
    fn select(&self, network: &Network, rng: &mut dyn RngCore, out: &mut Vec<usize>) {
        let Some(chosen) = pick(network, rng) else {
            return;
        };
        out.push(chosen);
        if let Some(group) = network.group(chosen) {
            out.extend(
                network
                    .update_list()
                    .iter()
                    .copied()
                    .filter(|&id| id != chosen && network.group(id) == Some(group)),
            );
        }
    }

    fn name(&self) -> &'static str {
        "random_async_grouped"
    }
}

impl UpdatePolicy for Synchronous {
    fn select(&self, network: &Network, _rng: &mut dyn RngCore, out: &mut Vec<usize>) {
        out.extend_from_slice(network.update_list());
    }

    fn name(&self) -> &'static str {
        "synchronous"
    }
}

/// The policy implementing a configured scheme.
#[must_use]
pub fn policy_for(scheme: UpdateScheme) -> Box<dyn UpdatePolicy> {
    match scheme {
        UpdateScheme::RandomAsync => Box::new(RandomAsync),
        UpdateScheme::RandomAsyncGrouped => Box::new(RandomAsyncGrouped),
        UpdateScheme::Synchronous => Box::new(Synchronous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use regsim_data::{Cell, ElementRow};

    fn network() -> Network {
        let mut rows = Vec::new();
        for (name, act, group) in [
            ("S", "", None),
            ("A", "S", Some("g")),
            ("B", "S", None),
            ("C", "S", Some("g")),
            ("D", "", Some("g")),
        ] {
            let mut row = ElementRow::new(name, act, "");
            row.initial = Some(Cell::Int(0));
            row.update_group = group.map(Cell::from);
            rows.push(row);
        }
        Network::from_rows(&rows, &DefaultsConfig::default()).unwrap()
    }

    #[test]
    fn test_synchronous_selects_update_list_in_order() {
        let net = network();
        let mut out = Vec::new();
        Synchronous.select(&net, &mut ChaCha8Rng::seed_from_u64(1), &mut out);
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_random_async_selects_one_candidate() {
        let net = network();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let mut out = Vec::new();
            RandomAsync.select(&net, &mut rng, &mut out);
            assert_eq!(out.len(), 1);
            assert!(net.update_list().contains(&out[0]));
        }
    }

    #[test]
    fn test_grouped_adds_regulated_group_members() {
        let net = network();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen_group = false;
        for _ in 0..200 {
            let mut out = Vec::new();
            RandomAsyncGrouped.select(&net, &mut rng, &mut out);
            match out[0] {
                1 => {
                    assert_eq!(out, vec![1, 3]);
                    seen_group = true;
                }
                3 => assert_eq!(out, vec![3, 1]),
                2 => assert_eq!(out, vec![2]),
                other => panic!("unexpected pick {other}"),
            }
        }
        assert!(seen_group);
    }

    #[test]
    fn test_policy_for_scheme() {
        assert_eq!(policy_for(UpdateScheme::Synchronous).name(), "synchronous");
        assert_eq!(policy_for(UpdateScheme::RandomAsync).name(), "random_async");
    }
}
