//! # Comparator Module
//!
//! Compares 64-bit perceptual hashes by Hamming distance.
//!
//! ## Operations
//! - [`distance`] - SWAR population count of `a ^ b`
//! - [`within_threshold`] - distance check against a validated threshold
//! - [`nearest_neighbors`] - stable top-k search over a [`HashCollection`]
//! - [`find_matching_pairs`] + [`TransitiveGrouper`] - duplicate clustering
//!
//! Everything here is pure: no I/O, no shared state, safe to call from any
//! number of threads.
//!
//! ## Comparison Thresholds
//! | Distance | Classification |
//! |----------|---------------|
//! | 0        | Exact match   |
//! | 1-4      | Near-exact    |
//! | 5-10     | Similar       |
//! | 11-15    | Maybe similar |
//! | 16+      | Different     |

mod collection;
mod distance;
mod grouper;
mod neighbors;
mod traits;

pub use collection::HashCollection;
pub use distance::{distance, distance_intrinsic, hamming_distance};
pub use grouper::TransitiveGrouper;
pub use neighbors::{nearest_neighbors, nearest_neighbors_par, within_radius, Neighbor};
pub use traits::{validate_threshold, within_threshold, ComparisonStrategy, ThresholdStrategy};

use crate::events::{CompareEvent, CompareProgress, Event, EventSender};
use crate::core::hasher::PerceptualHash;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Count of differing bits between two hashes, in `0..=64`
pub type HashDistance = u32;

/// Largest possible distance between two 64-bit hashes
pub const MAX_DISTANCE: HashDistance = 64;

/// Result of comparing two collection entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult<I> {
    pub a: I,
    pub b: I,
    /// Hamming distance between the hashes
    pub distance: HashDistance,
    /// Similarity as a percentage (0-100)
    pub similarity_percent: f64,
    pub match_type: MatchType,
}

/// Classification of a distance. Ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchType {
    /// Distance = 0, identical perceptual content
    Exact,
    /// Distance 1-4, virtually identical
    NearExact,
    /// Distance 5-10, likely duplicates
    Similar,
    /// Distance 11-15, possibly related
    MaybeSimilar,
    /// Distance 16+
    Different,
}

impl MatchType {
    /// Classify based on Hamming distance
    pub fn from_distance(distance: HashDistance) -> Self {
        match distance {
            0 => MatchType::Exact,
            1..=4 => MatchType::NearExact,
            5..=10 => MatchType::Similar,
            11..=15 => MatchType::MaybeSimilar,
            _ => MatchType::Different,
        }
    }

    /// Check if this match type is considered a duplicate
    pub fn is_duplicate(&self) -> bool {
        matches!(self, MatchType::Exact | MatchType::NearExact | MatchType::Similar)
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "Exact Match"),
            MatchType::NearExact => write!(f, "Near-Exact Match"),
            MatchType::Similar => write!(f, "Similar"),
            MatchType::MaybeSimilar => write!(f, "Possibly Similar"),
            MatchType::Different => write!(f, "Different"),
        }
    }
}

/// A cluster of matching entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup<I> {
    /// Unique identifier for this group
    pub id: Uuid,
    /// Members in collection order
    pub members: Vec<I>,
    /// The member to keep (the first one seen)
    pub representative: I,
    /// Best match type among the group's pairs
    pub match_type: MatchType,
    /// Average distance over the group's matching pairs
    pub average_distance: f64,
}

impl<I> DuplicateGroup<I> {
    /// Create a new duplicate group
    pub fn new(members: Vec<I>, representative: I, match_type: MatchType) -> Self {
        Self {
            id: Uuid::new_v4(),
            members,
            representative,
            match_type,
            average_distance: 0.0,
        }
    }

    /// Get the number of duplicates (excluding the representative)
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }
}

fn compare_pair<I: Clone>(
    (id_a, hash_a): &(I, PerceptualHash),
    (id_b, hash_b): &(I, PerceptualHash),
    strategy: &dyn ComparisonStrategy,
) -> Option<MatchResult<I>> {
    let distance = distance(*hash_a, *hash_b);
    if !strategy.is_match(distance) {
        return None;
    }

    Some(MatchResult {
        a: id_a.clone(),
        b: id_b.clone(),
        distance,
        similarity_percent: hash_a.similarity(*hash_b),
        match_type: strategy.classify(distance),
    })
}

/// Find all matching pairs `(i < j)` in collection order
pub fn find_matching_pairs<I>(
    collection: &HashCollection<I>,
    strategy: &dyn ComparisonStrategy,
) -> Vec<MatchResult<I>>
where
    I: Clone,
{
    let entries = collection.as_slice();
    let mut matches = Vec::new();

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            if let Some(m) = compare_pair(&entries[i], &entries[j], strategy) {
                matches.push(m);
            }
        }
    }

    matches
}

/// Find all matching pairs with progress events
///
/// Emits progress events every ~1000 comparisons.
pub fn find_matching_pairs_with_events<I>(
    collection: &HashCollection<I>,
    strategy: &dyn ComparisonStrategy,
    events: &EventSender,
) -> Vec<MatchResult<I>>
where
    I: Clone,
{
    let entries = collection.as_slice();
    let n = entries.len();
    let total_comparisons = n.saturating_sub(1) * n / 2;

    events.send(Event::Compare(CompareEvent::Started { total_hashes: n }));

    let mut matches = Vec::new();
    let mut comparisons_completed = 0;
    let mut last_progress_update = 0;

    // every 1000 comparisons or 2% of total, whichever is smaller
    let update_interval = std::cmp::min(1000, std::cmp::max(1, total_comparisons / 50));

    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(m) = compare_pair(&entries[i], &entries[j], strategy) {
                matches.push(m);
            }

            comparisons_completed += 1;
            if comparisons_completed - last_progress_update >= update_interval {
                events.send(Event::Compare(CompareEvent::Progress(CompareProgress {
                    comparisons_completed,
                    total_comparisons,
                    matches_found: matches.len(),
                })));
                last_progress_update = comparisons_completed;
            }
        }
    }

    events.send(Event::Compare(CompareEvent::Completed {
        total_matches: matches.len(),
    }));

    tracing::debug!(
        hashes = n,
        comparisons = total_comparisons,
        matches = matches.len(),
        "pairwise comparison finished"
    );

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(bits: u64) -> PerceptualHash {
        PerceptualHash::new(bits)
    }

    #[test]
    fn match_type_from_distance() {
        assert_eq!(MatchType::from_distance(0), MatchType::Exact);
        assert_eq!(MatchType::from_distance(3), MatchType::NearExact);
        assert_eq!(MatchType::from_distance(7), MatchType::Similar);
        assert_eq!(MatchType::from_distance(15), MatchType::MaybeSimilar);
        assert_eq!(MatchType::from_distance(16), MatchType::Different);
        assert_eq!(MatchType::from_distance(64), MatchType::Different);
    }

    #[test]
    fn match_type_is_duplicate() {
        assert!(MatchType::Exact.is_duplicate());
        assert!(MatchType::NearExact.is_duplicate());
        assert!(MatchType::Similar.is_duplicate());
        assert!(!MatchType::MaybeSimilar.is_duplicate());
        assert!(!MatchType::Different.is_duplicate());
    }

    #[test]
    fn match_type_orders_best_first() {
        assert!(MatchType::Exact < MatchType::Similar);
        assert!(MatchType::MaybeSimilar < MatchType::Different);
    }

    #[test]
    fn find_matching_pairs_empty_and_single() {
        let strategy = ThresholdStrategy::balanced();
        let empty: HashCollection<u32> = HashCollection::new();
        assert!(find_matching_pairs(&empty, &strategy).is_empty());

        let single = HashCollection::try_from_pairs([(1u32, h(0xFF))]).unwrap();
        assert!(find_matching_pairs(&single, &strategy).is_empty());
    }

    #[test]
    fn find_matching_pairs_finds_matches() {
        let strategy = ThresholdStrategy::conservative();
        let collection = HashCollection::try_from_pairs([
            ("a", h(0xFF)),
            ("b", h(0xFF)),
            ("c", h(0x00)), // 8 bits away from both
        ])
        .unwrap();

        let pairs = find_matching_pairs(&collection, &strategy);

        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), ("a", "b"));
        assert_eq!(pairs[0].distance, 0);
        assert_eq!(pairs[0].match_type, MatchType::Exact);
        assert_eq!(pairs[0].similarity_percent, 100.0);
    }

    #[test]
    fn find_matching_pairs_with_events_emits_progress() {
        use crate::events::EventChannel;

        let (sender, receiver) = EventChannel::new();
        let strategy = ThresholdStrategy::permissive();
        let collection =
            HashCollection::try_from_pairs((0..50u64).map(|i| (i, h(i)))).unwrap();

        let with_events = find_matching_pairs_with_events(&collection, &strategy, &sender);
        drop(sender);

        assert_eq!(with_events.len(), find_matching_pairs(&collection, &strategy).len());

        let events: Vec<_> = receiver.iter().collect();
        assert!(events.len() >= 3);

        match &events[0] {
            Event::Compare(CompareEvent::Started { total_hashes }) => {
                assert_eq!(*total_hashes, 50);
            }
            _ => panic!("Expected Started event"),
        }
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Compare(CompareEvent::Progress(_)))));
        match events.last().unwrap() {
            Event::Compare(CompareEvent::Completed { total_matches }) => {
                assert_eq!(*total_matches, with_events.len());
            }
            _ => panic!("Expected Completed event"),
        }
    }

    #[test]
    fn groups_from_matching_pairs() {
        let collection = HashCollection::try_from_pairs([
            ("x", h(0b0000)),
            ("y", h(0b0001)),
            ("z", h(u64::MAX)),
            ("w", h(0b0011)),
        ])
        .unwrap();

        let matches = find_matching_pairs(&collection, &ThresholdStrategy::conservative());
        let groups = TransitiveGrouper::new().group(&collection, &matches);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec!["x", "y", "w"]);
        assert_eq!(groups[0].match_type, MatchType::NearExact);
    }
}
