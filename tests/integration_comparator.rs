//! Integration tests for the comparison contract.
//!
//! These go through the crate's public re-exports only:
//! - Distance boundary values
//! - Threshold checks and rejection of out-of-range thresholds
//! - Nearest-neighbour ordering, truncation and tie order

use phash_compare::core::comparator::{
    find_matching_pairs, nearest_neighbors, nearest_neighbors_par, within_radius,
    ThresholdStrategy,
};
use phash_compare::core::{distance, within_threshold, HashCollection, PerceptualHash};
use phash_compare::error::CompareError;

fn h(value: u64) -> PerceptualHash {
    PerceptualHash::new(value)
}

fn collection(pairs: &[(&'static str, u64)]) -> HashCollection<&'static str> {
    HashCollection::try_from_pairs(pairs.iter().map(|&(id, v)| (id, h(v)))).unwrap()
}

#[test]
fn complementary_hashes_are_maximally_distant() {
    assert_eq!(distance(h(0), h(u64::MAX)), 64);
    assert_eq!(
        distance(h(0x0F0F_0F0F_0F0F_0F0F), h(0xF0F0_F0F0_F0F0_F0F0)),
        64
    );
    assert_eq!(distance(h(0x8000_0000_0000_0001), h(0)), 2);
}

#[test]
fn hex_round_trip_preserves_distance() {
    let a: PerceptualHash = "0x8f373714acfcf4d0".parse().unwrap();
    let b: PerceptualHash = "8f373714acfcf4d1".parse().unwrap();

    assert_eq!(a.distance(b), 1);
    assert_eq!(a.to_string(), "8f373714acfcf4d0");
}

#[test]
fn within_threshold_is_inclusive() {
    let a = h(0b1111);
    let b = h(0);

    assert!(within_threshold(a, a, 0).unwrap());
    assert!(within_threshold(a, b, 4).unwrap());
    assert!(!within_threshold(a, b, 3).unwrap());
    assert!(within_threshold(h(0), h(u64::MAX), 64).unwrap());
}

#[test]
fn within_threshold_rejects_values_above_64() {
    assert_eq!(
        within_threshold(h(0), h(0), 65),
        Err(CompareError::InvalidThreshold { value: 65 })
    );
}

#[test]
fn nearest_three_of_five_sorted_ascending() {
    let hashes = collection(&[
        ("far", u64::MAX),
        ("two", 0b11),
        ("exact", 0),
        ("one", 0b1),
        ("eight", 0xFF),
    ]);

    let hits = nearest_neighbors(h(0), &hashes, 3);
    let ids: Vec<_> = hits.iter().map(|n| n.id).collect();
    let distances: Vec<_> = hits.iter().map(|n| n.distance).collect();

    assert_eq!(ids, vec!["exact", "one", "two"]);
    assert_eq!(distances, vec![0, 1, 2]);
}

#[test]
fn nearest_returns_whole_collection_when_smaller_than_k() {
    let hashes = collection(&[("a", 0xF0), ("b", 0x0F)]);
    let hits = nearest_neighbors(h(0), &hashes, 3);

    assert_eq!(hits.len(), 2);
    assert!(hits[0].distance <= hits[1].distance);
}

#[test]
fn nearest_on_empty_collection_is_empty() {
    let empty: HashCollection<&str> = HashCollection::new();
    assert!(nearest_neighbors(h(42), &empty, 5).is_empty());
    assert!(nearest_neighbors_par(h(42), &empty, 5).is_empty());
}

#[test]
fn nearest_with_zero_k_is_empty() {
    let hashes = collection(&[("a", 1), ("b", 2)]);
    assert!(nearest_neighbors(h(0), &hashes, 0).is_empty());
}

#[test]
fn identical_hashes_keep_insertion_order() {
    let hashes = collection(&[("id1", 0xABCD), ("id2", 0xABCD)]);
    let hits = nearest_neighbors(h(0xABCD), &hashes, 2);

    assert_eq!(hits[0].id, "id1");
    assert_eq!(hits[1].id, "id2");
    assert_eq!(hits[0].distance, hits[1].distance);
}

#[test]
fn parallel_search_agrees_with_linear_scan() {
    let mut hashes = HashCollection::with_capacity(20_000);
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for i in 0..20_000u32 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        // every 97th entry shares a hash with its neighbours to force ties
        let value = if i % 97 == 0 { 0x1234 } else { state };
        hashes.insert(i, h(value)).unwrap();
    }

    let query = h(0x1235);
    assert_eq!(
        nearest_neighbors(query, &hashes, 50),
        nearest_neighbors_par(query, &hashes, 50)
    );
}

#[test]
fn radius_search_returns_every_hit_in_order() {
    let hashes = collection(&[("b", 0b1), ("far", u64::MAX), ("a", 0), ("c", 0b1)]);
    let hits = within_radius(h(0), &hashes, 1).unwrap();
    let ids: Vec<_> = hits.iter().map(|n| n.id).collect();

    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn duplicate_identifiers_are_rejected() {
    let result = HashCollection::try_from_pairs(vec![("x", h(1)), ("x", h(2))]);
    assert!(matches!(
        result,
        Err(CompareError::DuplicateIdentifier { .. })
    ));
}

#[test]
fn matching_pairs_use_strategy_threshold() {
    let hashes = collection(&[("a", 0), ("b", 0b111), ("c", 0xFFFF_FFFF)]);

    let strict = find_matching_pairs(&hashes, &ThresholdStrategy::new(2).unwrap());
    assert!(strict.is_empty());

    let balanced = find_matching_pairs(&hashes, &ThresholdStrategy::balanced());
    assert_eq!(balanced.len(), 1);
    assert_eq!((balanced[0].a, balanced[0].b), ("a", "b"));
    assert_eq!(balanced[0].distance, 3);
}
