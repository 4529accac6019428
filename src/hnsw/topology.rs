//! Synthetic HNSW topology.
//!
//! Builds a layered graph that looks like a real HNSW index without touching
//! vectors:
//!
//! 1. Points come from the sphere sampler.
//! 2. Each point draws a maximum layer from HNSW's insertion distribution,
//!    `floor(-ln(U) · mL)` with `mL = 1/ln(M)`, where `U` is a fixed hash of
//!    the node id rather than an RNG draw.
//! 3. Each layer gets a symmetric k-nearest-neighbour graph over the nodes
//!    present on it, `2M` wide on layer 0 and `M` wide above.
//!
//! ```text
//!   layer 3   ●                      (radius 2, entry point)
//!   layer 2   ●───●                  (radius 4)
//!   layer 1   ●───●───●───●          (radius 6, degree ≤ M)
//!   layer 0   ●─●─●─●─●─●─●─●─●      (radius 8, degree ≤ 2M)
//! ```
//!
//! Construction is brute force, O(s²) per layer for `s` nodes on it. That is
//! fine for the tens-to-hundreds of nodes a scene holds.

use crate::error::{Result, SimError};
use crate::sphere::{self, Position, SpherePoint};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

/// Number of layers drawn.
pub const MAX_LAYERS: usize = 4;

/// Sphere radius per layer. Layer 0 is outermost.
pub const LAYER_RADII: [f64; MAX_LAYERS] = [8.0, 6.0, 4.0, 2.0];

/// Above this many nodes, the top layer is always populated.
const TOP_LAYER_MIN_NODES: usize = 15;

/// An HNSW node and the highest layer it was inserted at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexNode {
    pub id: usize,
    pub layer: usize,
    pub nx: f64,
    pub ny: f64,
    pub nz: f64,
}

impl IndexNode {
    pub fn direction(&self) -> SpherePoint {
        SpherePoint {
            nx: self.nx,
            ny: self.ny,
            nz: self.nz,
        }
    }

    /// Whether the node is drawn on `layer` (it is on every layer up to its own).
    #[inline]
    pub fn exists_at(&self, layer: usize) -> bool {
        layer <= self.layer
    }

    /// Scaled position of this node on the given layer's sphere.
    pub fn position(&self, layer: usize) -> Position {
        sphere::scale(&self.direction(), layer_radius(layer))
    }
}

/// An undirected edge on one layer. Stored once per unordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexEdge {
    pub source: usize,
    pub target: usize,
    pub layer: usize,
}

/// Per-layer summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStats {
    pub layer: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub mean_degree: f64,
}

/// A generated HNSW graph: nodes plus per-layer edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HnswTopology {
    pub nodes: Vec<IndexNode>,
    pub edges: Vec<IndexEdge>,
}

/// Radius for a layer; layers past the top reuse the innermost radius.
#[inline]
pub fn layer_radius(layer: usize) -> f64 {
    LAYER_RADII[layer.min(MAX_LAYERS - 1)]
}

/// HNSW level multiplier `mL = 1/ln(max(M, 2))`.
#[inline]
pub fn level_multiplier(m: usize) -> f64 {
    1.0 / (m.max(2) as f64).ln()
}

/// Deterministic pseudo-random value in the open interval (0, 1) for a node id.
///
/// splitmix64 over a fixed seed: the same id maps to the same value forever.
pub fn layer_seed(id: usize) -> f64 {
    let mut z = (id as u64)
        .wrapping_add(0x5EED_4E5E_ED5E_ED00)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    // Top 53 bits, centred in their bucket so 0 and 1 are never produced.
    ((z >> 11) as f64 + 0.5) / (1u64 << 53) as f64
}

/// Assign a maximum layer to every point.
///
/// Layer is `floor(-ln(seed) · mL)` clamped to `[0, MAX_LAYERS)`. Afterwards
/// the node with the smallest seed (the naturally tallest one) is raised so
/// that layer 2 is always populated, and layer 3 too once there are more
/// than 15 nodes.
pub fn assign_layers(points: &[SpherePoint], m: usize) -> Vec<IndexNode> {
    let ml = level_multiplier(m);

    let mut nodes: Vec<IndexNode> = points
        .iter()
        .enumerate()
        .map(|(id, p)| {
            let level = (-layer_seed(id).ln() * ml).floor() as usize;
            IndexNode {
                id,
                layer: level.min(MAX_LAYERS - 1),
                nx: p.nx,
                ny: p.ny,
                nz: p.nz,
            }
        })
        .collect();

    let tallest = (0..nodes.len()).min_by(|&a, &b| layer_seed(a).total_cmp(&layer_seed(b)));
    if let Some(id) = tallest {
        let floor = if nodes.len() > TOP_LAYER_MIN_NODES {
            MAX_LAYERS - 1
        } else {
            2
        };
        nodes[id].layer = nodes[id].layer.max(floor);
    }

    nodes
}

/// Neighbour budget on a layer: `2M` on layer 0, `M` above.
#[inline]
pub fn degree_bound(layer: usize, m: usize) -> usize {
    if layer == 0 {
        m.saturating_mul(2)
    } else {
        m
    }
}

/// Generate per-layer nearest-neighbour edges.
///
/// On each layer, every node present picks its nearest `degree_bound`
/// neighbours (capped at the layer population minus one). An edge picked
/// from both ends is stored once.
pub fn generate_edges(nodes: &[IndexNode], m: usize) -> Vec<IndexEdge> {
    let m = m.max(2);
    let mut edges = Vec::new();

    for layer in 0..MAX_LAYERS {
        let members: Vec<&IndexNode> = nodes.iter().filter(|n| n.exists_at(layer)).collect();
        if members.len() < 2 {
            continue;
        }

        let bound = degree_bound(layer, m).min(members.len() - 1);
        let radius = layer_radius(layer);
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let before = edges.len();

        for node in &members {
            let a = node.direction();
            let mut candidates: Vec<(usize, f64)> = members
                .iter()
                .filter(|other| other.id != node.id)
                .map(|other| (other.id, sphere::distance(&a, radius, &other.direction(), radius)))
                .collect();
            candidates.sort_by(|x, y| x.1.total_cmp(&y.1));

            for &(other, _) in candidates.iter().take(bound) {
                let key = (node.id.min(other), node.id.max(other));
                if seen.insert(key) {
                    edges.push(IndexEdge {
                        source: key.0,
                        target: key.1,
                        layer,
                    });
                }
            }
        }

        tracing::trace!(
            layer,
            nodes = members.len(),
            edges = edges.len() - before,
            "layer edges generated"
        );
    }

    edges
}

/// Build a full topology of `n` nodes with degree parameter `m`.
pub fn generate_hnsw_data(n: usize, m: usize) -> HnswTopology {
    let points = sphere::generate(n);
    let nodes = assign_layers(&points, m);
    let edges = generate_edges(&nodes, m);

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        m,
        "hnsw topology generated"
    );

    HnswTopology { nodes, edges }
}

/// Nodes connected to `node_id` on exactly `layer`.
///
/// Empty when the node is absent or not present on that layer.
pub fn neighbors<'a>(
    node_id: usize,
    layer: usize,
    edges: &[IndexEdge],
    nodes: &'a [IndexNode],
) -> Vec<&'a IndexNode> {
    match nodes.get(node_id) {
        Some(node) if node.exists_at(layer) => {}
        _ => return Vec::new(),
    }

    edges
        .iter()
        .filter(|e| e.layer == layer)
        .filter_map(|e| {
            if e.source == node_id {
                Some(e.target)
            } else if e.target == node_id {
                Some(e.source)
            } else {
                None
            }
        })
        .filter_map(|id| nodes.get(id))
        .collect()
}

/// Neighbour lists indexed by `[layer][node]`.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency {
    lists: Vec<Vec<SmallVec<[usize; 16]>>>,
}

impl Adjacency {
    pub(crate) fn build(topology: &HnswTopology) -> Self {
        let n = topology.nodes.len();
        let mut lists = vec![vec![SmallVec::new(); n]; MAX_LAYERS];
        for e in &topology.edges {
            if e.layer < MAX_LAYERS && e.source < n && e.target < n {
                lists[e.layer][e.source].push(e.target);
                lists[e.layer][e.target].push(e.source);
            }
        }
        Self { lists }
    }

    #[inline]
    pub(crate) fn get(&self, layer: usize, node: usize) -> &[usize] {
        self.lists
            .get(layer)
            .and_then(|l| l.get(node))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl HnswTopology {
    /// Nodes connected to `node_id` on `layer`.
    pub fn neighbors(&self, node_id: usize, layer: usize) -> Vec<&IndexNode> {
        neighbors(node_id, layer, &self.edges, &self.nodes)
    }

    /// Like [`neighbors`](Self::neighbors), but an absent node is an error.
    pub fn try_neighbors(&self, node_id: usize, layer: usize) -> Result<Vec<&IndexNode>> {
        match self.nodes.get(node_id) {
            Some(node) if node.exists_at(layer) => Ok(self.neighbors(node_id, layer)),
            _ => Err(SimError::UnknownNode { id: node_id, layer }),
        }
    }

    pub fn nodes_at_layer(&self, layer: usize) -> impl Iterator<Item = &IndexNode> {
        self.nodes.iter().filter(move |n| n.exists_at(layer))
    }

    pub fn edges_at_layer(&self, layer: usize) -> impl Iterator<Item = &IndexEdge> {
        self.edges.iter().filter(move |e| e.layer == layer)
    }

    /// Highest populated layer, or `None` for an empty graph.
    pub fn max_layer(&self) -> Option<usize> {
        self.nodes.iter().map(|n| n.layer).max()
    }

    /// First node on the highest layer: where every search starts.
    pub fn entry_point(&self) -> Option<usize> {
        let top = self.max_layer()?;
        self.nodes.iter().find(|n| n.layer == top).map(|n| n.id)
    }

    pub fn layer_stats(&self) -> Vec<LayerStats> {
        (0..MAX_LAYERS)
            .map(|layer| {
                let node_count = self.nodes_at_layer(layer).count();
                let edge_count = self.edges_at_layer(layer).count();
                let mean_degree = if node_count == 0 {
                    0.0
                } else {
                    2.0 * edge_count as f64 / node_count as f64
                };
                LayerStats {
                    layer,
                    node_count,
                    edge_count,
                    mean_degree,
                }
            })
            .collect()
    }
}
