//! Nearest-neighbour and range search over a `HashCollection`.
//!
//! Candidates are ranked by `(distance, insertion index)`, so equal
//! distances always come back in collection order.

use super::collection::HashCollection;
use super::distance::distance;
use super::traits::validate_threshold;
use super::HashDistance;
use crate::core::hasher::PerceptualHash;
use crate::error::CompareError;
use rayon::prelude::*;
use serde::Serialize;

/// Entries per rayon task in the parallel search
const PARALLEL_CHUNK: usize = 4096;

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor<I> {
    pub id: I,
    pub distance: HashDistance,
}

type Ranked = (HashDistance, usize);

/// Keep the `k` best candidates, sorted.
fn retain_top_k(ranked: &mut Vec<Ranked>, k: usize) {
    if ranked.len() > k {
        ranked.select_nth_unstable(k - 1);
        ranked.truncate(k);
    }
    ranked.sort_unstable();
}

fn resolve<I: Clone>(collection: &HashCollection<I>, ranked: Vec<Ranked>) -> Vec<Neighbor<I>> {
    let entries = collection.as_slice();
    ranked
        .into_iter()
        .map(|(distance, index)| Neighbor {
            id: entries[index].0.clone(),
            distance,
        })
        .collect()
}

/// The `k` entries closest to `query`, ascending by distance.
///
/// Returns `min(k, collection.len())` hits; `k == 0` or an empty collection
/// yields nothing.
pub fn nearest_neighbors<I: Clone>(
    query: PerceptualHash,
    collection: &HashCollection<I>,
    k: usize,
) -> Vec<Neighbor<I>> {
    if k == 0 || collection.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<Ranked> = collection
        .as_slice()
        .iter()
        .enumerate()
        .map(|(index, (_, hash))| (distance(query, *hash), index))
        .collect();

    retain_top_k(&mut ranked, k);
    resolve(collection, ranked)
}

/// Same result as [`nearest_neighbors`], computed as per-chunk top-k on the
/// rayon pool followed by a merge.
pub fn nearest_neighbors_par<I: Clone + Send + Sync>(
    query: PerceptualHash,
    collection: &HashCollection<I>,
    k: usize,
) -> Vec<Neighbor<I>> {
    if k == 0 || collection.is_empty() {
        return Vec::new();
    }

    let ranked = collection
        .as_slice()
        .par_chunks(PARALLEL_CHUNK)
        .enumerate()
        .map(|(chunk_index, chunk)| {
            let base = chunk_index * PARALLEL_CHUNK;
            let mut local: Vec<Ranked> = chunk
                .iter()
                .enumerate()
                .map(|(offset, (_, hash))| (distance(query, *hash), base + offset))
                .collect();
            retain_top_k(&mut local, k);
            local
        })
        .reduce(Vec::new, |mut merged, local| {
            merged.extend(local);
            retain_top_k(&mut merged, k);
            merged
        });

    resolve(collection, ranked)
}

/// Every entry within `radius` of `query`, ascending by distance.
pub fn within_radius<I: Clone>(
    query: PerceptualHash,
    collection: &HashCollection<I>,
    radius: u32,
) -> Result<Vec<Neighbor<I>>, CompareError> {
    validate_threshold(radius)?;

    let mut ranked: Vec<Ranked> = collection
        .as_slice()
        .iter()
        .enumerate()
        .map(|(index, (_, hash))| (distance(query, *hash), index))
        .filter(|(distance, _)| *distance <= radius)
        .collect();
    ranked.sort_unstable();

    Ok(resolve(collection, ranked))
}
