//! Closed-form IVF cost model.
//!
//! IVF cost is driven by two numbers: `nlist` (cells built by k-means) and
//! `nprobe` (cells scanned per query). Query cost is the probed fraction of
//! the data; recall saturates once `nprobe` reaches about `√nlist`.

use serde::{Deserialize, Serialize};

const FLOAT_BYTES: u64 = 4;
/// Per-vector inverted-list entry (id + offset).
const LIST_ENTRY_BYTES: u64 = 8;
/// Fixed k-means iteration count.
const KMEANS_ITERATIONS: f64 = 10.0;
const MAX_RECALL: f64 = 0.99;

/// Estimated IVF costs for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvfMetrics {
    /// `N · d · 4`
    pub vector_storage_bytes: u64,
    /// `nlist · d · 4`
    pub centroid_storage_bytes: u64,
    /// `N · 8`
    pub inverted_lists_bytes: u64,
    pub total_storage_bytes: u64,
    pub build_time_seconds: f64,
    pub query_latency_ms: f64,
    /// Expected recall in [0, 0.99].
    pub recall: f64,
}

impl IvfMetrics {
    /// Mean number of vectors per cell.
    pub fn mean_list_length(vector_count: u64, nlist: usize) -> f64 {
        if nlist == 0 {
            return 0.0;
        }
        vector_count as f64 / nlist as f64
    }
}

/// Estimate IVF costs.
///
/// `nprobe` larger than `nlist` is treated as `nlist`: there are no more
/// cells to scan.
pub fn estimate(vector_count: u64, dimensions: usize, nlist: usize, nprobe: usize) -> IvfMetrics {
    let n = vector_count;
    let d = dimensions as u64;
    let nprobe = nprobe.min(nlist);

    let vector_storage_bytes = n.saturating_mul(d).saturating_mul(FLOAT_BYTES);
    let centroid_storage_bytes = (nlist as u64).saturating_mul(d).saturating_mul(FLOAT_BYTES);
    let inverted_lists_bytes = n.saturating_mul(LIST_ENTRY_BYTES);
    let total_storage_bytes = vector_storage_bytes
        .saturating_add(centroid_storage_bytes)
        .saturating_add(inverted_lists_bytes);

    let build_time_seconds =
        n as f64 * nlist as f64 * KMEANS_ITERATIONS * dimensions as f64 / 1e9;

    let (query_latency_ms, recall) = if nlist == 0 {
        (0.0, 0.0)
    } else {
        let probed_fraction = nprobe as f64 / nlist as f64;
        let latency = probed_fraction * (n as f64 / 1e6) * dimensions as f64 * 0.001;
        let recall = (1.0 - (-2.0 * nprobe as f64 / (nlist as f64).sqrt()).exp()).min(MAX_RECALL);
        (latency, recall)
    };

    IvfMetrics {
        vector_storage_bytes,
        centroid_storage_bytes,
        inverted_lists_bytes,
        total_storage_bytes,
        build_time_seconds,
        query_latency_ms,
        recall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_reference_point() {
        let m = estimate(100_000, 768, 100, 10);
        assert_eq!(m.vector_storage_bytes, 307_200_000);
        assert_eq!(m.centroid_storage_bytes, 307_200);
        assert_eq!(m.inverted_lists_bytes, 800_000);
        assert_eq!(m.total_storage_bytes, 307_200_000 + 307_200 + 800_000);
    }

    #[test]
    fn test_build_and_latency_formulas() {
        let m = estimate(1_000_000, 768, 1000, 10);
        assert!((m.build_time_seconds - 1e6 * 1000.0 * 10.0 * 768.0 / 1e9).abs() < 1e-9);
        assert!((m.query_latency_ms - 0.01 * 1.0 * 768.0 * 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_recall_monotone_and_capped() {
        let mut prev = 0.0;
        for nprobe in [0, 1, 2, 5, 10, 20, 50, 100] {
            let r = estimate(100_000, 768, 100, nprobe).recall;
            assert!(r >= prev);
            assert!(r <= 0.99);
            prev = r;
        }
        assert_eq!(prev, 0.99);
        assert_eq!(estimate(100_000, 768, 100, 0).recall, 0.0);
    }

    #[test]
    fn test_recall_saturates_near_sqrt_nlist() {
        let r = estimate(1_000_000, 768, 1024, 32).recall;
        assert!((r - (1.0 - (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_nprobe_clamped_to_nlist() {
        assert_eq!(estimate(10_000, 128, 16, 64), estimate(10_000, 128, 16, 16));
    }

    #[test]
    fn test_degenerate_inputs() {
        for (n, d, nlist, nprobe) in [
            (0, 0, 0, 0),
            (0, 768, 100, 10),
            (100, 0, 0, 5),
            (100, 768, 0, 0),
        ] {
            let m = estimate(n, d, nlist, nprobe);
            assert!(m.build_time_seconds.is_finite());
            assert!(m.query_latency_ms.is_finite());
            assert!(m.recall.is_finite());
        }
        assert_eq!(estimate(100, 768, 0, 10).recall, 0.0);
        assert_eq!(IvfMetrics::mean_list_length(1000, 0), 0.0);
        assert_eq!(IvfMetrics::mean_list_length(1000, 10), 100.0);
    }
}
