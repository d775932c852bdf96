//! Groups matching hashes into clusters using transitive relationships.
//!
//! If A matches B and B matches C, then {A, B, C} forms a single group
//! even if A doesn't directly match C.

use super::{DuplicateGroup, HashCollection, MatchResult, MatchType};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Union-find over collection positions
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Union keeping the smaller index as root, so roots are first members
    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (keep, attach) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[attach] = keep;
        }
    }
}

#[derive(Default)]
struct GroupStats {
    members: Vec<usize>,
    total_distance: u64,
    pair_count: usize,
    best_match: Option<MatchType>,
}

/// Groups matching pairs into duplicate clusters
pub struct TransitiveGrouper;

impl TransitiveGrouper {
    /// Create a new transitive grouper
    pub fn new() -> Self {
        Self
    }

    /// Group match results into clusters.
    ///
    /// Groups come back in order of their first member's position in the
    /// collection; members keep collection order and the first member is
    /// the representative. Pairs naming unknown identifiers are ignored.
    pub fn group<I>(
        &self,
        collection: &HashCollection<I>,
        matches: &[MatchResult<I>],
    ) -> Vec<DuplicateGroup<I>>
    where
        I: Eq + Hash + Clone + Debug,
    {
        if matches.is_empty() {
            return Vec::new();
        }

        let entries = collection.as_slice();
        let positions: HashMap<&I, usize> = entries
            .iter()
            .enumerate()
            .map(|(index, (id, _))| (id, index))
            .collect();

        let resolved: Vec<(usize, usize, &MatchResult<I>)> = matches
            .iter()
            .filter_map(|m| Some((*positions.get(&m.a)?, *positions.get(&m.b)?, m)))
            .collect();

        let mut sets = DisjointSet::new(entries.len());
        for (a, b, _) in &resolved {
            sets.union(*a, *b);
        }

        let mut stats: HashMap<usize, GroupStats> = HashMap::new();
        for (a, _, m) in &resolved {
            let entry = stats.entry(sets.find(*a)).or_default();
            entry.total_distance += u64::from(m.distance);
            entry.pair_count += 1;
            entry.best_match = Some(match entry.best_match {
                Some(best) => best.min(m.match_type),
                None => m.match_type,
            });
        }

        // Walking in collection order keeps members ordered.
        for index in 0..entries.len() {
            let root = sets.find(index);
            if let Some(group) = stats.get_mut(&root) {
                group.members.push(index);
            }
        }

        let mut roots: Vec<usize> = stats.keys().copied().collect();
        roots.sort_unstable();

        roots
            .into_iter()
            .filter_map(|root| stats.remove(&root))
            .filter(|group| group.members.len() >= 2)
            .map(|group| {
                let members: Vec<I> = group
                    .members
                    .iter()
                    .map(|&index| entries[index].0.clone())
                    .collect();
                let representative = members[0].clone();

                let mut duplicate_group = DuplicateGroup::new(
                    members,
                    representative,
                    group.best_match.unwrap_or(MatchType::Similar),
                );
                duplicate_group.average_distance =
                    group.total_distance as f64 / group.pair_count as f64;
                duplicate_group
            })
            .collect()
    }
}

impl Default for TransitiveGrouper {
    fn default() -> Self {
        Self::new()
    }
}
