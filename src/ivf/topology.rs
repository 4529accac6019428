//! Synthetic IVF cluster layout.
//!
//! Centroids are spread over a sphere, and points scatter around them as if
//! k-means had already converged. Cell boundaries are approximated by short
//! arcs between neighbouring centroids rather than a true spherical Voronoi
//! diagram.

use crate::sphere::{self, Position, SpherePoint};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::PI;

/// Radius of the sphere centroids sit on.
pub const IVF_RADIUS: f64 = 8.0;

/// Default maximum distance of a point from its centroid.
pub const DEFAULT_CLUSTER_SPREAD: f64 = 1.5;

/// Boundaries drawn per centroid.
const BOUNDARY_NEIGHBORS: usize = 4;

/// Boundary half-length as a fraction of the centroid gap.
const BOUNDARY_HALF_LENGTH: f64 = 0.25;

/// Cluster colours, cycled by centroid id.
pub const PALETTE: [&str; 12] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe", "#008080", "#e6beff",
];

/// A cluster centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub id: usize,
    pub nx: f64,
    pub ny: f64,
    pub nz: f64,
    pub color: String,
}

impl Centroid {
    pub fn direction(&self) -> SpherePoint {
        SpherePoint {
            nx: self.nx,
            ny: self.ny,
            nz: self.nz,
        }
    }

    pub fn position(&self) -> Position {
        sphere::scale(&self.direction(), IVF_RADIUS)
    }
}

/// A point assigned to one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPoint {
    pub id: usize,
    pub centroid_id: usize,
    /// Centroid position plus `offset`.
    pub position: Position,
    pub offset: Position,
}

/// A drawn boundary between two neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBoundary {
    pub source: usize,
    pub target: usize,
    /// Midpoint of the two centroids, pushed back onto the sphere.
    pub midpoint: Position,
    pub start: Position,
    pub end: Position,
}

/// Place `nlist` centroids evenly on the sphere.
pub fn generate_centroids(nlist: usize) -> Vec<Centroid> {
    sphere::generate(nlist)
        .into_iter()
        .enumerate()
        .map(|(id, p)| Centroid {
            id,
            nx: p.nx,
            ny: p.ny,
            nz: p.nz,
            color: PALETTE[id % PALETTE.len()].to_string(),
        })
        .collect()
}

/// Uniformly random unit direction.
pub(crate) fn random_direction<R: Rng>(rng: &mut R) -> SpherePoint {
    let y: f64 = rng.random_range(-1.0..=1.0);
    let theta: f64 = rng.random_range(0.0..(2.0 * PI));
    let r = (1.0 - y * y).max(0.0).sqrt();
    SpherePoint {
        nx: r * theta.cos(),
        ny: y,
        nz: r * theta.sin(),
    }
}

/// Scatter `total_points` around the centroids.
///
/// Each cluster gets `total / nlist` points, and the first `total % nlist`
/// clusters get one more. Offsets point in a uniform random direction with a
/// uniform random length in `[0, cluster_spread]`. A negative, NaN, or
/// infinite spread is treated as zero.
pub fn generate_clustered_points<R: Rng>(
    centroids: &[Centroid],
    total_points: usize,
    cluster_spread: f64,
    rng: &mut R,
) -> Vec<ClusterPoint> {
    if centroids.is_empty() {
        return Vec::new();
    }

    let spread = if cluster_spread.is_finite() {
        cluster_spread.max(0.0)
    } else {
        0.0
    };
    let per_cluster = total_points / centroids.len();
    let remainder = total_points % centroids.len();
    let mut points = Vec::with_capacity(total_points);

    for (i, centroid) in centroids.iter().enumerate() {
        let count = per_cluster + usize::from(i < remainder);
        let center = centroid.position();

        for _ in 0..count {
            let dir = random_direction(rng);
            let radius = if spread > 0.0 {
                rng.random_range(0.0..=spread)
            } else {
                0.0
            };
            let offset = sphere::scale(&dir, radius);
            points.push(ClusterPoint {
                id: points.len(),
                centroid_id: centroid.id,
                position: [
                    center[0] + offset[0],
                    center[1] + offset[1],
                    center[2] + offset[2],
                ],
                offset,
            });
        }
    }

    tracing::debug!(
        clusters = centroids.len(),
        points = points.len(),
        spread,
        "ivf points generated"
    );
    points
}

/// The `min(nprobe, nlist)` centroids nearest `query`, ascending by distance.
///
/// Returns `(centroid_id, distance)` pairs.
pub fn find_nearest_centroids(
    query: &Position,
    centroids: &[Centroid],
    nprobe: usize,
) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = centroids
        .iter()
        .map(|c| (c.id, sphere::euclidean(query, &c.position())))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(nprobe);
    ranked
}

/// Approximate Voronoi edges: each centroid links to its (up to) four
/// nearest centroids with a short arc across the shared cell wall.
///
/// A pair picked from both sides is drawn once.
pub fn generate_cluster_boundaries(centroids: &[Centroid]) -> Vec<ClusterBoundary> {
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut boundaries = Vec::new();

    for c in centroids {
        let nearest = find_nearest_centroids(&c.position(), centroids, BOUNDARY_NEIGHBORS + 1);
        for &(other, _) in nearest
            .iter()
            .filter(|(id, _)| *id != c.id)
            .take(BOUNDARY_NEIGHBORS)
        {
            let key = (c.id.min(other), c.id.max(other));
            if !seen.insert(key) {
                continue;
            }
            if let (Some(a), Some(b)) = (centroids.get(key.0), centroids.get(key.1)) {
                boundaries.push(boundary_between(a, b));
            }
        }
    }

    boundaries
}

fn boundary_between(a: &Centroid, b: &Centroid) -> ClusterBoundary {
    let pa = a.position();
    let pb = b.position();

    let mid_dir = SpherePoint::from_direction([
        (pa[0] + pb[0]) / 2.0,
        (pa[1] + pb[1]) / 2.0,
        (pa[2] + pb[2]) / 2.0,
    ]);
    let midpoint = sphere::scale(&mid_dir, IVF_RADIUS);

    // Tangent to the sphere and perpendicular to the centroid-to-centroid line.
    let ab = [pb[0] - pa[0], pb[1] - pa[1], pb[2] - pa[2]];
    let m = mid_dir.to_array();
    let tangent = SpherePoint::from_direction([
        ab[1] * m[2] - ab[2] * m[1],
        ab[2] * m[0] - ab[0] * m[2],
        ab[0] * m[1] - ab[1] * m[0],
    ]);

    let half = sphere::euclidean(&pa, &pb) * BOUNDARY_HALF_LENGTH;
    let along = |sign: f64| -> Position {
        let p = [
            midpoint[0] + sign * tangent.nx * half,
            midpoint[1] + sign * tangent.ny * half,
            midpoint[2] + sign * tangent.nz * half,
        ];
        sphere::scale(&SpherePoint::from_direction(p), IVF_RADIUS)
    };

    ClusterBoundary {
        source: a.id,
        target: b.id,
        midpoint,
        start: along(-1.0),
        end: along(1.0),
    }
}

/// Number of points in each of the `nlist` clusters.
pub fn cluster_sizes(points: &[ClusterPoint], nlist: usize) -> Vec<usize> {
    let mut sizes = vec![0; nlist];
    for p in points {
        if let Some(slot) = sizes.get_mut(p.centroid_id) {
            *slot += 1;
        }
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn norm(p: &Position) -> f64 {
        sphere::euclidean(p, &[0.0; 3])
    }

    #[test]
    fn test_centroids_and_palette() {
        let centroids = generate_centroids(25);
        assert_eq!(centroids.len(), 25);
        assert!(PALETTE.len() >= 10);
        for (i, c) in centroids.iter().enumerate() {
            assert_eq!(c.id, i);
            assert_eq!(c.color, PALETTE[i % PALETTE.len()]);
            assert!((norm(&c.position()) - IVF_RADIUS).abs() < 1e-9);
        }
        assert_eq!(centroids[0].color, centroids[PALETTE.len()].color);
        assert!(generate_centroids(0).is_empty());
    }

    #[test]
    fn test_even_split() {
        let centroids = generate_centroids(4);
        let mut rng = StdRng::seed_from_u64(42);
        let points = generate_clustered_points(&centroids, 100, DEFAULT_CLUSTER_SPREAD, &mut rng);
        assert_eq!(cluster_sizes(&points, 4), vec![25, 25, 25, 25]);
    }

    #[test]
    fn test_remainder_goes_to_first_clusters() {
        let centroids = generate_centroids(4);
        let mut rng = StdRng::seed_from_u64(42);
        let points = generate_clustered_points(&centroids, 102, DEFAULT_CLUSTER_SPREAD, &mut rng);
        assert_eq!(cluster_sizes(&points, 4), vec![26, 26, 25, 25]);

        let few = generate_clustered_points(&centroids, 3, DEFAULT_CLUSTER_SPREAD, &mut rng);
        assert_eq!(cluster_sizes(&few, 4), vec![1, 1, 1, 0]);
    }

    #[test]
    fn test_offsets_bounded_and_consistent() {
        let centroids = generate_centroids(8);
        let mut rng = StdRng::seed_from_u64(9);
        let points = generate_clustered_points(&centroids, 400, 2.0, &mut rng);

        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.id, i);
            assert!(norm(&p.offset) <= 2.0 + 1e-9);
            let c = centroids[p.centroid_id].position();
            for k in 0..3 {
                assert!((p.position[k] - (c[k] + p.offset[k])).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_degenerate_spread_and_empty() {
        let centroids = generate_centroids(3);
        let mut rng = StdRng::seed_from_u64(1);
        for spread in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            for p in generate_clustered_points(&centroids, 9, spread, &mut rng) {
                assert_eq!(p.offset, [0.0; 3]);
            }
        }
        assert!(generate_clustered_points(&[], 10, 1.5, &mut rng).is_empty());
    }

    #[test]
    fn test_nearest_centroids_sorted_and_clamped() {
        let centroids = generate_centroids(10);
        let query = centroids[3].position();

        let probed = find_nearest_centroids(&query, &centroids, 4);
        assert_eq!(probed.len(), 4);
        assert_eq!(probed[0].0, 3);
        assert!(probed[0].1 < 1e-9);
        assert!(probed.windows(2).all(|w| w[0].1 <= w[1].1));

        assert_eq!(find_nearest_centroids(&query, &centroids, 50).len(), 10);
        assert!(find_nearest_centroids(&query, &centroids, 0).is_empty());
        assert!(find_nearest_centroids(&query, &[], 3).is_empty());
    }

    #[test]
    fn test_boundaries() {
        let centroids = generate_centroids(20);
        let boundaries = generate_cluster_boundaries(&centroids);

        let mut keys = HashSet::new();
        let mut per_centroid = vec![0usize; centroids.len()];
        for b in &boundaries {
            assert!(b.source < b.target);
            assert!(keys.insert((b.source, b.target)));
            per_centroid[b.source] += 1;
            per_centroid[b.target] += 1;
            for p in [b.midpoint, b.start, b.end] {
                assert!((norm(&p) - IVF_RADIUS).abs() < 1e-9);
            }
        }
        // Every centroid drew its own four picks.
        assert!(per_centroid.iter().all(|&c| c >= 4));
        assert!(boundaries.len() <= centroids.len() * 4);
    }

    #[test]
    fn test_boundaries_small() {
        assert!(generate_cluster_boundaries(&generate_centroids(1)).is_empty());
        assert_eq!(generate_cluster_boundaries(&generate_centroids(2)).len(), 1);
        assert_eq!(generate_cluster_boundaries(&generate_centroids(3)).len(), 3);
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            assert!((random_direction(&mut rng).magnitude() - 1.0).abs() < 1e-9);
        }
    }
}
