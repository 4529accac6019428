//! HNSW query simulation.
//!
//! Replays the two-phase search of Malkov & Yashunin (2016) on a synthetic
//! topology and records every step for playback:
//!
//! - **Greedy descent** from the entry point on the top layer down to layer 1:
//!   hop to the closest neighbour while it is strictly closer to the target,
//!   then drop one layer.
//! - **Beam search** on layer 0: expand the closest unexplored candidate until
//!   the frontier is empty or `ef_search` nodes have been expanded.
//!
//! "Distance to the query" is the angular-chord distance to the target node's
//! direction, so every layer compares like with like. Pacing the events is
//! left to the caller.

use crate::hnsw::topology::{Adjacency, HnswTopology, LAYER_RADII};
use crate::sphere::{self, Position, SpherePoint};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, BinaryHeap, HashSet};

/// The synthetic query sits this far outside the outermost layer.
const QUERY_RADIUS_FACTOR: f64 = 1.4;

/// Candidate node during the layer-0 beam search.
#[derive(Clone, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) id: usize,
    pub(crate) distance: f64,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-heap: smaller distance = higher priority, ties to the lower id.
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
            .reverse()
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// One step of a simulated search, in playback order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SearchEvent {
    /// The search touched a node (computed its distance).
    Visit { node: usize, layer: usize },
    /// Greedy hop or beam expansion along an edge.
    Traverse {
        source: usize,
        target: usize,
        layer: usize,
    },
    /// The current node drops one layer.
    Descend {
        node: usize,
        from_layer: usize,
        to_layer: usize,
    },
    /// A layer-0 candidate was popped and its neighbours expanded.
    Explore { node: usize, distance: f64 },
}

/// Full record of a simulated query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTrace {
    pub entry_point: usize,
    pub target: usize,
    pub query_position: Position,
    pub events: Vec<SearchEvent>,
    /// Layer-0 expansion order.
    pub explored: Vec<usize>,
    /// Every node whose distance was computed; matches the `Visit` events.
    pub visited: BTreeSet<usize>,
    /// Greedy hops taken on the upper layers.
    pub hops: usize,
    pub found: bool,
}

/// Simulate a query towards a randomly chosen target node.
///
/// Returns `None` for an empty topology.
pub fn simulate_search<R: Rng>(
    topology: &HnswTopology,
    ef_search: usize,
    rng: &mut R,
) -> Option<SearchTrace> {
    if topology.nodes.is_empty() {
        return None;
    }
    let target = rng.random_range(0..topology.nodes.len());
    simulate_towards(topology, target, ef_search)
}

/// Simulate a query whose true nearest neighbour is `target`.
///
/// Deterministic for a given topology, target, and `ef_search`. Returns
/// `None` when the topology is empty or `target` does not exist.
pub fn simulate_towards(
    topology: &HnswTopology,
    target: usize,
    ef_search: usize,
) -> Option<SearchTrace> {
    let target_node = topology.nodes.get(target)?;
    let entry_point = topology.entry_point()?;
    let top_layer = topology.nodes[entry_point].layer;

    let adjacency = Adjacency::build(topology);
    let target_dir = target_node.direction();
    let dist = |id: usize| -> f64 {
        sphere::distance(&topology.nodes[id].direction(), 1.0, &target_dir, 1.0)
    };

    let mut events = Vec::new();
    let mut visited = BTreeSet::new();
    let mut hops = 0;

    let mut current = entry_point;
    let mut current_dist = dist(current);
    visited.insert(current);
    events.push(SearchEvent::Visit {
        node: current,
        layer: top_layer,
    });

    // Phase 1: greedy descent.
    for layer in (1..=top_layer).rev() {
        loop {
            let mut best: Option<(usize, f64)> = None;
            for &n in adjacency.get(layer, current) {
                let d = dist(n);
                if visited.insert(n) {
                    events.push(SearchEvent::Visit { node: n, layer });
                }
                if d < current_dist && best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((n, d));
                }
            }
            let Some((next, next_dist)) = best else {
                break;
            };
            events.push(SearchEvent::Traverse {
                source: current,
                target: next,
                layer,
            });
            tracing::trace!(layer, from = current, to = next, "greedy hop");
            current = next;
            current_dist = next_dist;
            hops += 1;
        }
        events.push(SearchEvent::Descend {
            node: current,
            from_layer: layer,
            to_layer: layer - 1,
        });
    }

    // Phase 2: beam search on layer 0.
    // Never more expansions than nodes.
    let ef = ef_search.clamp(1, topology.nodes.len());
    let mut candidates = BinaryHeap::with_capacity(ef * 2);
    let mut queued: HashSet<usize> = HashSet::with_capacity(ef * 2);
    let mut explored = Vec::with_capacity(ef);

    candidates.push(Candidate {
        id: current,
        distance: current_dist,
    });
    queued.insert(current);

    while explored.len() < ef {
        let Some(candidate) = candidates.pop() else {
            break;
        };
        explored.push(candidate.id);
        events.push(SearchEvent::Explore {
            node: candidate.id,
            distance: candidate.distance,
        });

        for &n in adjacency.get(0, candidate.id) {
            if queued.insert(n) {
                let d = dist(n);
                events.push(SearchEvent::Traverse {
                    source: candidate.id,
                    target: n,
                    layer: 0,
                });
                if visited.insert(n) {
                    events.push(SearchEvent::Visit { node: n, layer: 0 });
                }
                candidates.push(Candidate { id: n, distance: d });
            }
        }
    }

    let found = visited.contains(&target);
    tracing::debug!(
        entry_point,
        target,
        hops,
        explored = explored.len(),
        visited = visited.len(),
        found,
        "hnsw search simulated"
    );

    Some(SearchTrace {
        entry_point,
        target,
        query_position: query_position(&target_dir),
        events,
        explored,
        visited,
        hops,
        found,
    })
}

/// Place the query just outside the outermost layer, above the target.
fn query_position(target: &SpherePoint) -> Position {
    sphere::scale(target, LAYER_RADII[0] * QUERY_RADIUS_FACTOR)
}
