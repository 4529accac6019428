//! Synthetic Inverted File (IVF) indexes.
//!
//! IVF partitions space into cells around k-means centroids and only scans
//! the cells nearest the query:
//!
//! ```text
//!           Query
//!             |
//!     +-------+-------+
//!     |               |
//!   Cell A          Cell B      (probe 2 cells)
//!   |__|__|         |__|__|
//!   v  v  v         v  v  v
//!  [points]        [points]     (compare within cells)
//! ```
//!
//! This module lays out centroids and points for display, simulates the
//! probe step, and estimates costs. No clustering is actually run.
//!
//! ## Trade-offs
//!
//! | Parameter | ↑ Effect |
//! |-----------|----------|
//! | nprobe | Better recall, slower search |
//! | nlist | Smaller cells, slower training |

pub mod metrics;
mod search;
mod topology;

pub use metrics::IvfMetrics;
pub use search::{simulate_probe, simulate_random_probe, ProbeTrace};
pub use topology::{
    cluster_sizes, find_nearest_centroids, generate_centroids, generate_cluster_boundaries,
    generate_clustered_points, Centroid, ClusterBoundary, ClusterPoint, DEFAULT_CLUSTER_SPREAD,
    IVF_RADIUS, PALETTE,
};
