//! annscape: synthetic ANN index topologies for visualization.
//!
//! Builds graphs and cluster layouts that look like real indexes, replays
//! queries through them, and estimates index costs in closed form, all
//! without any vector data:
//!
//! - `sphere`: evenly spaced points on the unit sphere (the base of every layout)
//! - `hnsw/`: layered proximity graph, search simulation, cost model
//! - `ivf/`: centroid/cluster layout, probe simulation, cost model
//! - `params`: parameter sets with defaults and boundary validation
//!
//! # Determinism
//!
//! Topologies are pure functions of their parameters: node layers come from a
//! fixed hash of the node id, not from an RNG, so a node keeps its layer
//! across rebuilds. The only randomness (search targets, point offsets) comes
//! from a caller-supplied `rand::Rng`.
//!
//! # Critical Nuances
//!
//! ## These are not real indexes
//!
//! HNSW edges here come from a brute-force k-NN graph per layer, not from
//! incremental insertion with heuristic pruning. The result keeps the
//! properties worth drawing (layer-0 degree ≈ 2× upper layers, geometric
//! layer populations, a navigable hierarchy) at O(n²) build cost, which is
//! fine for the tens-to-hundreds of nodes a scene holds.
//!
//! ## Cost models are shapes, not benchmarks
//!
//! The metrics follow the asymptotic complexity of each algorithm and are
//! normalized to a nominal machine. Use them to compare parameter settings
//! against each other, not to predict wall-clock time.

pub mod error;
pub mod params;
pub mod sphere;

#[cfg(feature = "hnsw")]
pub mod hnsw;

#[cfg(feature = "ivf")]
pub mod ivf;

// Re-exports
pub use error::{Result, SimError};
pub use params::{HnswLayout, HnswParams, IvfLayout, IvfParams, MatryoshkaPreset};
pub use sphere::{Position, SpherePoint};
