//! IVF probe simulation.
//!
//! An IVF query ranks centroids, scans only the points of the `nprobe`
//! closest cells, and returns the best point it saw. When the true nearest
//! point lives in an unprobed cell, the query misses it; that is the whole
//! recall story of IVF, and this module makes it visible.

use crate::ivf::topology::{
    find_nearest_centroids, random_direction, Centroid, ClusterPoint, IVF_RADIUS,
};
use crate::sphere::{self, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of probing an IVF layout with one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeTrace {
    pub query_position: Position,
    /// `(centroid_id, distance)` in probe order.
    pub probed: Vec<(usize, f64)>,
    /// Ids of points compared against the query.
    pub scanned: Vec<usize>,
    /// Best point among the scanned ones.
    pub best: Option<usize>,
    /// Exact nearest point over the whole layout.
    pub true_nearest: Option<usize>,
    pub found: bool,
}

impl ProbeTrace {
    /// Fraction of all points the query had to look at.
    pub fn scanned_fraction(&self, total_points: usize) -> f64 {
        if total_points == 0 {
            return 0.0;
        }
        self.scanned.len() as f64 / total_points as f64
    }
}

/// Probe the `nprobe` nearest cells and scan their points.
pub fn simulate_probe(
    query: &Position,
    centroids: &[Centroid],
    points: &[ClusterPoint],
    nprobe: usize,
) -> ProbeTrace {
    let probed = find_nearest_centroids(query, centroids, nprobe);
    let probed_ids: HashSet<usize> = probed.iter().map(|(id, _)| *id).collect();

    let scanned: Vec<usize> = points
        .iter()
        .filter(|p| probed_ids.contains(&p.centroid_id))
        .map(|p| p.id)
        .collect();

    let dist = |p: &ClusterPoint| sphere::euclidean(query, &p.position);
    let best = points
        .iter()
        .filter(|p| probed_ids.contains(&p.centroid_id))
        .min_by(|a, b| dist(a).total_cmp(&dist(b)))
        .map(|p| p.id);
    let true_nearest = points
        .iter()
        .min_by(|a, b| dist(a).total_cmp(&dist(b)))
        .map(|p| p.id);
    let found = best.is_some() && best == true_nearest;

    tracing::debug!(
        probed = probed.len(),
        scanned = scanned.len(),
        found,
        "ivf probe simulated"
    );

    ProbeTrace {
        query_position: *query,
        probed,
        scanned,
        best,
        true_nearest,
        found,
    }
}

/// Probe with a query placed at a random spot on the centroid sphere.
pub fn simulate_random_probe<R: Rng>(
    centroids: &[Centroid],
    points: &[ClusterPoint],
    nprobe: usize,
    rng: &mut R,
) -> ProbeTrace {
    let query = sphere::scale(&random_direction(rng), IVF_RADIUS);
    simulate_probe(&query, centroids, points, nprobe)
}
