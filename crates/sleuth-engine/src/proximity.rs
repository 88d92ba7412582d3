//! Proximity propagation from seed wallets.
//!
//! Suspicion follows the direction of funds: wallets a few hops downstream
//! of a fan-out source inherit part of its weight. A wallet `d` hops from a
//! seed receives `max_hops - d + 1`; across seeds the strongest influence
//! wins. Each seed is searched independently, so seeds are processed in
//! parallel and merged with an element-wise `max`.

use std::collections::VecDeque;

use rayon::prelude::*;
use sleuth_core::constants::hop_influence;
use sleuth_core::graph::{NodeIx, TxGraph};
use tracing::debug;

use crate::detect::PatternFlags;

/// The first `max_seeds` fan-out wallets in discovery order.
pub fn select_seeds(flags: &[PatternFlags], max_seeds: usize) -> Vec<NodeIx> {
    flags
        .iter()
        .enumerate()
        .filter(|(_, f)| f.fan_out)
        .map(|(ix, _)| ix)
        .take(max_seeds)
        .collect()
}

/// Shortest directed hop distance from `seed` to every node within
/// `max_hops`, indexed by [`NodeIx`]. Unreached nodes are `None`.
pub fn hop_distances(graph: &TxGraph, seed: NodeIx, max_hops: u32) -> Vec<Option<u32>> {
    let mut dist = vec![None; graph.node_count()];
    let mut queue = VecDeque::new();
    dist[seed] = Some(0);
    queue.push_back((seed, 0u32));

    while let Some((node, d)) = queue.pop_front() {
        if d >= max_hops {
            continue;
        }
        for next in graph.successors(node) {
            if dist[next].is_none() {
                dist[next] = Some(d + 1);
                queue.push_back((next, d + 1));
            }
        }
    }
    dist
}

/// Influence of a single seed on every node.
pub fn seed_influence(graph: &TxGraph, seed: NodeIx, max_hops: u32) -> Vec<u32> {
    hop_distances(graph, seed, max_hops)
        .into_iter()
        .map(|d| d.map_or(0, |d| hop_influence(d, max_hops)))
        .collect()
}

fn merge_max(mut acc: Vec<u32>, other: Vec<u32>) -> Vec<u32> {
    for (a, b) in acc.iter_mut().zip(other) {
        *a = (*a).max(b);
    }
    acc
}

/// Combined influence of all seeds, indexed by [`NodeIx`]. Zero everywhere
/// when `seeds` is empty.
pub fn propagate(graph: &TxGraph, seeds: &[NodeIx], max_hops: u32) -> Vec<u32> {
    let n = graph.node_count();
    let influence = seeds
        .par_iter()
        .map(|&seed| seed_influence(graph, seed, max_hops))
        .reduce(|| vec![0; n], merge_max);

    debug!(
        seeds = seeds.len(),
        max_hops,
        reached = influence.iter().filter(|&&v| v > 0).count(),
        "proximity propagation complete"
    );
    influence
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sleuth_core::graph::EdgeMode;
    use sleuth_core::types::TxRecord;

    /// `w0 -> w1 -> ... -> w{len-1}`.
    fn chain(len: usize) -> TxGraph {
        let records: Vec<TxRecord> = (0..len.saturating_sub(1))
            .map(|i| TxRecord::new(format!("w{i}"), format!("w{}", i + 1), 1.0, 0))
            .collect();
        TxGraph::build(&records, EdgeMode::PerPair)
    }

    fn fan_out_at(n: usize, flagged: &[usize]) -> Vec<PatternFlags> {
        (0..n)
            .map(|i| PatternFlags {
                fan_out: flagged.contains(&i),
                ..PatternFlags::default()
            })
            .collect()
    }

    #[test]
    fn seeds_are_first_three_in_order() {
        let flags = fan_out_at(10, &[7, 2, 9, 4]);
        assert_eq!(select_seeds(&flags, 3), vec![2, 4, 7]);
    }

    #[test]
    fn fewer_candidates_than_seeds() {
        let flags = fan_out_at(4, &[1]);
        assert_eq!(select_seeds(&flags, 3), vec![1]);
        assert!(select_seeds(&fan_out_at(4, &[]), 3).is_empty());
    }

    #[test]
    fn other_flags_do_not_seed() {
        let flags = vec![PatternFlags {
            fan_in: true,
            peeling: true,
            fan_out: false,
        }];
        assert!(select_seeds(&flags, 3).is_empty());
    }

    #[test]
    fn influence_along_chain() {
        let g = chain(6);
        assert_eq!(seed_influence(&g, 0, 3), vec![4, 3, 2, 1, 0, 0]);
    }

    #[test]
    fn seed_influences_itself_maximally() {
        let g = chain(2);
        assert_eq!(propagate(&g, &[0], 3)[0], 4);
        assert_eq!(propagate(&g, &[1], 3), vec![0, 4]);
    }

    #[test]
    fn propagation_follows_direction() {
        let g = chain(4);
        assert_eq!(seed_influence(&g, 2, 3), vec![0, 0, 4, 3]);
    }

    #[test]
    fn shortest_path_wins() {
        // a -> b -> c -> d and a -> d
        let records = [
            TxRecord::new("a", "b", 1.0, 0),
            TxRecord::new("b", "c", 1.0, 0),
            TxRecord::new("c", "d", 1.0, 0),
            TxRecord::new("a", "d", 1.0, 0),
        ];
        let g = TxGraph::build(&records, EdgeMode::PerPair);
        let d = g.index_of("d").unwrap();
        assert_eq!(hop_distances(&g, 0, 3)[d], Some(1));
    }

    #[test]
    fn cycles_terminate() {
        let records = [
            TxRecord::new("a", "b", 1.0, 0),
            TxRecord::new("b", "a", 1.0, 0),
            TxRecord::new("b", "b", 1.0, 0),
        ];
        let g = TxGraph::build(&records, EdgeMode::PerPair);
        assert_eq!(seed_influence(&g, 0, 3), vec![4, 3]);
    }

    #[test]
    fn max_combines_seeds() {
        let g = chain(6);
        // Seed 0 reaches w3 with 1; seed 2 reaches it with 3.
        assert_eq!(propagate(&g, &[0, 2], 3), vec![4, 3, 4, 3, 2, 1]);
    }

    #[test]
    fn no_seeds_no_influence() {
        let g = chain(5);
        assert_eq!(propagate(&g, &[], 3), vec![0; 5]);
    }

    proptest! {
        #[test]
        fn seed_order_irrelevant(
            edges in prop::collection::vec((0u8..10, 0u8..10), 1..40),
            picks in prop::collection::vec(0usize..10, 1..4),
        ) {
            let records: Vec<TxRecord> = edges
                .iter()
                .map(|(f, t)| TxRecord::new(f.to_string(), t.to_string(), 1.0, 0))
                .collect();
            let g = TxGraph::build(&records, EdgeMode::PerPair);
            let seeds: Vec<NodeIx> = picks.iter().map(|p| p % g.node_count()).collect();
            let mut reversed = seeds.clone();
            reversed.reverse();
            prop_assert_eq!(propagate(&g, &seeds, 3), propagate(&g, &reversed, 3));
        }

        #[test]
        fn influence_bounded_by_seed_value(
            edges in prop::collection::vec((0u8..10, 0u8..10), 1..40),
        ) {
            let records: Vec<TxRecord> = edges
                .iter()
                .map(|(f, t)| TxRecord::new(f.to_string(), t.to_string(), 1.0, 0))
                .collect();
            let g = TxGraph::build(&records, EdgeMode::PerPair);
            let influence = propagate(&g, &[0], 3);
            prop_assert_eq!(influence[0], 4);
            prop_assert!(influence.iter().all(|&v| v <= 4));
        }
    }
}
