//! Synthetic Hierarchical Navigable Small World (HNSW) indexes.
//!
//! Nothing here stores vectors. The goal is a graph that *looks* and
//! *navigates* like HNSW, for drawing and for walking through a query:
//!
//! - **Upper layers**: sparse, long-range links, few nodes
//! - **Layer 0**: every node, roughly twice the upper-layer degree
//! - **Search**: greedy descent from the top, then a beam search on layer 0
//!
//! # Usage
//!
//! ```rust
//! use annscape::hnsw::{generate_hnsw_data, simulate_towards};
//!
//! let topology = generate_hnsw_data(30, 4);
//! let trace = simulate_towards(&topology, 12, 16).unwrap();
//! assert!(trace.explored.len() <= 16);
//! ```
//!
//! # References
//!
//! - Malkov & Yashunin (2016): "Efficient and robust approximate nearest neighbor search
//!   using Hierarchical Navigable Small World graphs"

pub mod metrics;
mod search;
mod topology;

pub use metrics::HnswMetrics;
pub use search::{simulate_search, simulate_towards, SearchEvent, SearchTrace};
pub use topology::{
    assign_layers, degree_bound, generate_edges, generate_hnsw_data, layer_radius, layer_seed,
    level_multiplier, neighbors, HnswTopology, IndexEdge, IndexNode, LayerStats, LAYER_RADII,
    MAX_LAYERS,
};
