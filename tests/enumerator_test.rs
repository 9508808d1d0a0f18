// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for subset enumeration.

mod common;

use std::collections::HashSet;

use freqset_search::SubsetEnumerator;

fn binomial(n: u64, k: u64) -> u64 {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[test]
fn test_every_subset_exactly_once() {
    let pool: Vec<i32> = (0..10).map(|i| 5200 + 50 * i).collect();
    for test_count in 1..=10usize {
        let subsets: Vec<Vec<i32>> =
            SubsetEnumerator::new(pool.clone(), vec![], test_count).collect();
        let distinct: HashSet<&Vec<i32>> = subsets.iter().collect();
        assert_eq!(subsets.len() as u64, binomial(10, test_count as u64));
        assert_eq!(distinct.len(), subsets.len());
    }
}

#[test]
fn test_subsets_sorted_with_mandatory() {
    let pool = vec![5645, 5685, 5760, 5860, 5905];
    let mandatory = vec![5700, 5800];
    for subset in SubsetEnumerator::new(pool, mandatory.clone(), 3) {
        assert_eq!(subset.len(), 5);
        assert!(subset.windows(2).all(|w| w[0] < w[1]), "{:?}", subset);
        for m in &mandatory {
            assert!(subset.contains(m));
        }
    }
}

#[test]
fn test_scenario_b_subsets() {
    let pool = vec![5645, 5685, 5760, 5860, 5905];
    let subsets: Vec<Vec<i32>> = SubsetEnumerator::new(pool.clone(), vec![5800], 2).collect();
    assert_eq!(subsets.len(), 10);
    for subset in &subsets {
        assert_eq!(subset.len(), 3);
        assert!(subset.contains(&5800));
        let others: Vec<&i32> = subset.iter().filter(|f| **f != 5800).collect();
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|f| pool.contains(f)));
    }
}

#[test]
fn test_more_requested_than_pool_yields_nothing() {
    let mut enumerator = SubsetEnumerator::new(vec![5645, 5685, 5760], vec![5800], 4);
    assert_eq!(enumerator.next(), None);
}

#[test]
fn test_binary_order_not_lexicographic() {
    // Increasing mask order puts {b,c} (0b0110) before {a,d} (0b1001).
    let subsets: Vec<Vec<i32>> =
        SubsetEnumerator::new(vec![5100, 5200, 5300, 5400], vec![], 2).collect();
    assert_eq!(
        subsets,
        vec![
            vec![5100, 5200],
            vec![5100, 5300],
            vec![5200, 5300],
            vec![5100, 5400],
            vec![5200, 5400],
            vec![5300, 5400],
        ]
    );
}

#[test]
fn test_cursor_tracks_progress_on_wide_pool() {
    let mut enumerator = SubsetEnumerator::new(common::full_width_pool(), vec![], 3);
    assert_eq!(enumerator.cursor_max(), (1u64 << 62) - 1);
    enumerator.next();
    assert_eq!(enumerator.cursor(), 0b111);
    for _ in 0..1000 {
        enumerator.next();
    }
    assert!(enumerator.completion_ratio() < 0.001);
}
