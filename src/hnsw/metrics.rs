//! Closed-form HNSW cost model.
//!
//! Estimates storage, build time, throughput, and recall from index
//! parameters alone. Nothing is simulated; the numbers follow the known
//! complexity of HNSW:
//!
//! - Graph memory: every node holds `2M` links on layer 0, and the expected
//!   population of layer `l` decays as `M^-l`, each holding `M` links.
//! - Build: `O(N · M · log N · efC)` distance computations.
//! - Query: cost grows linearly with `ef` and dimension, logarithmically with `N`.
//! - Recall: saturates in `M` and `ef`, and degrades with matryoshka truncation.
//!
//! All outputs stay finite for any input, including zeros.

use serde::{Deserialize, Serialize};

/// Bytes per stored float.
const FLOAT_BYTES: u64 = 4;
/// Bytes per neighbour link.
const LINK_BYTES: u64 = 4;
/// Per-list header (neighbour count).
const LIST_HEADER_BYTES: u64 = 4;
/// Fixed per-vector metadata (id, level, offsets).
const METADATA_BYTES: u64 = 16;
/// Runtime overhead on top of on-disk size.
const RAM_OVERHEAD: f64 = 1.3;
/// Upper layers counted in the graph-size estimate.
const UPPER_LAYERS: u32 = 3;
/// Baseline machine speed for build-time estimates.
const BASELINE_OPS_PER_SEC: f64 = 500_000.0;
/// Dimension the build-time model is normalized against.
const BUILD_REFERENCE_DIM: f64 = 768.0;
/// Recall ceiling: no approximate index is exact.
const MAX_RECALL: f64 = 0.995;

/// Estimated HNSW costs for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswMetrics {
    /// Raw (possibly truncated) vectors: `N · d · 4`.
    pub vector_storage_bytes: u64,
    /// Neighbour lists over all layers.
    pub graph_storage_bytes: u64,
    /// Vectors + graph + metadata.
    pub total_storage_bytes: u64,
    /// Working-set estimate, `total · 1.3`.
    pub ram_usage_bytes: u64,
    pub build_time_seconds: f64,
    pub query_latency_ms: f64,
    pub qps: f64,
    /// Expected recall@k in [0, 0.995].
    pub recall: f64,
}

impl HnswMetrics {
    /// Total bytes per vector, 0 for an empty index.
    pub fn bytes_per_vector(&self, vector_count: u64) -> f64 {
        if vector_count == 0 {
            return 0.0;
        }
        self.total_storage_bytes as f64 / vector_count as f64
    }

    /// Share of storage spent on the graph rather than vectors.
    pub fn graph_overhead_ratio(&self) -> f64 {
        if self.total_storage_bytes == 0 {
            return 0.0;
        }
        self.graph_storage_bytes as f64 / self.total_storage_bytes as f64
    }
}

/// Estimate HNSW costs.
///
/// * `vector_count` - N
/// * `dimensions` - full embedding dimension D
/// * `mrl_dimensions` - dimensions actually stored d (matryoshka truncation)
/// * `m` - upper-layer degree (layer 0 uses 2M)
/// * `ef_construction`, `ef_search` - build and query beam widths
pub fn estimate(
    vector_count: u64,
    dimensions: usize,
    mrl_dimensions: usize,
    m: usize,
    ef_construction: usize,
    ef_search: usize,
) -> HnswMetrics {
    let n = vector_count;
    let d = mrl_dimensions as u64;

    let vector_storage_bytes = n.saturating_mul(d).saturating_mul(FLOAT_BYTES);
    let graph_storage_bytes = graph_storage(n, m);
    let total_storage_bytes = vector_storage_bytes
        .saturating_add(graph_storage_bytes)
        .saturating_add(n.saturating_mul(METADATA_BYTES));
    let ram_usage_bytes = (total_storage_bytes as f64 * RAM_OVERHEAD).round() as u64;

    let build_time_seconds = build_time(n, m, ef_construction, mrl_dimensions);
    let qps = qps(n, mrl_dimensions, ef_search);
    let query_latency_ms = 1000.0 / qps.max(1.0);
    let recall = recall(dimensions, mrl_dimensions, m, ef_construction, ef_search);

    HnswMetrics {
        vector_storage_bytes,
        graph_storage_bytes,
        total_storage_bytes,
        ram_usage_bytes,
        build_time_seconds,
        query_latency_ms,
        qps,
        recall,
    }
}

/// Expected bytes of neighbour lists across all layers.
fn graph_storage(n: u64, m: usize) -> u64 {
    let m_links = m as u64;
    let layer0_list_bytes = m_links
        .saturating_mul(2 * LINK_BYTES)
        .saturating_add(LIST_HEADER_BYTES);
    let layer0 = n.saturating_mul(layer0_list_bytes);

    let decay = (m.max(2) as f64).ln();
    let upper_list_bytes = m_links
        .saturating_mul(LINK_BYTES)
        .saturating_add(LIST_HEADER_BYTES) as f64;
    let upper: f64 = (1..=UPPER_LAYERS)
        .map(|l| n as f64 * (-(l as f64) * decay).exp() * upper_list_bytes)
        .sum();

    layer0.saturating_add(upper.round() as u64)
}

fn build_time(n: u64, m: usize, ef_construction: usize, d: usize) -> f64 {
    // log2(1) = 0, so both 0 and 1 vectors cost nothing.
    let log_n = (n.max(1) as f64).log2();
    let ops = n as f64
        * m as f64
        * log_n
        * (ef_construction as f64 / 100.0)
        * (d as f64 / BUILD_REFERENCE_DIM);
    ops / BASELINE_OPS_PER_SEC
}

fn qps(n: u64, d: usize, ef_search: usize) -> f64 {
    let ef = ef_search.max(1) as f64;
    let d = d.max(1) as f64;
    let size_factor = 1e5_f64.ln() / (n.max(2) as f64).ln();
    10_000.0 * (10.0 / ef) * (128.0 / d) * size_factor
}

fn recall(
    dimensions: usize,
    mrl_dimensions: usize,
    m: usize,
    ef_construction: usize,
    ef_search: usize,
) -> f64 {
    if dimensions == 0 || mrl_dimensions == 0 {
        return 0.0;
    }
    let m_f = m as f64;
    let graph_quality = 1.0 - (-0.12 * m_f).exp();
    let beam_quality = 1.0 - (-0.08 * ef_search as f64).exp();
    let truncation = (mrl_dimensions as f64 / dimensions as f64).min(1.0).powf(0.25);
    let build_quality = (ef_construction as f64 / (10.0 * m.max(1) as f64)).min(1.0);

    (graph_quality * beam_quality * truncation * build_quality * 1.1).min(MAX_RECALL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_finite(m: &HnswMetrics) -> bool {
        m.build_time_seconds.is_finite()
            && m.query_latency_ms.is_finite()
            && m.qps.is_finite()
            && m.recall.is_finite()
    }

    #[test]
    fn test_vector_storage_exact() {
        let m = estimate(1_000_000, 1536, 512, 16, 200, 64);
        assert_eq!(m.vector_storage_bytes, 1_000_000 * 512 * 4);
    }

    #[test]
    fn test_graph_storage_formula() {
        let n = 100_000u64;
        let m = 16usize;
        let metrics = estimate(n, 768, 768, m, 200, 50);

        let layer0 = n as f64 * (2.0 * 16.0 * 4.0 + 4.0);
        let upper: f64 = (1..=3)
            .map(|l| n as f64 * (-(l as f64) * 16f64.ln()).exp() * (16.0 * 4.0 + 4.0))
            .sum();
        assert!((metrics.graph_storage_bytes as f64 - (layer0 + upper)).abs() <= 1.0);

        assert_eq!(
            metrics.total_storage_bytes,
            metrics.vector_storage_bytes + metrics.graph_storage_bytes + n * 16
        );
        let ram = metrics.total_storage_bytes as f64 * 1.3;
        assert!((metrics.ram_usage_bytes as f64 - ram).abs() <= 1.0);
    }

    #[test]
    fn test_build_time_formula() {
        let metrics = estimate(1_000_000, 768, 768, 16, 200, 50);
        let expected = 1e6 * 16.0 * 1e6_f64.log2() * 2.0 * 1.0 / 500_000.0;
        assert!((metrics.build_time_seconds - expected).abs() < 1e-6);
    }

    #[test]
    fn test_build_time_monotone() {
        let base = estimate(100_000, 768, 384, 16, 200, 50).build_time_seconds;
        assert!(estimate(200_000, 768, 384, 16, 200, 50).build_time_seconds > base);
        assert!(estimate(100_000, 768, 384, 32, 200, 50).build_time_seconds > base);
        assert!(estimate(100_000, 768, 384, 16, 400, 50).build_time_seconds > base);
        assert!(estimate(100_000, 768, 768, 16, 200, 50).build_time_seconds > base);
    }

    #[test]
    fn test_qps_decreases_with_ef() {
        let mut prev = f64::INFINITY;
        for ef in [1, 10, 50, 100, 400] {
            let m = estimate(100_000, 768, 768, 16, 200, ef);
            assert!(m.qps < prev);
            assert!((m.query_latency_ms - 1000.0 / m.qps.max(1.0)).abs() < 1e-9);
            prev = m.qps;
        }
    }

    #[test]
    fn test_qps_reference_point() {
        // N = 1e5, d = 128, ef = 10 is the model's unit point.
        let m = estimate(100_000, 128, 128, 16, 200, 10);
        assert!((m.qps - 10_000.0).abs() < 1e-6);
        assert!((m.query_latency_ms - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_recall_monotone_and_capped() {
        let mut prev = 0.0;
        for m in [2, 4, 8, 16, 32, 48] {
            let r = estimate(100_000, 768, 768, m, 500, 100).recall;
            assert!(r >= prev);
            assert!(r <= 0.995);
            prev = r;
        }

        let mut prev = 0.0;
        for ef in [0, 1, 10, 40, 100, 500] {
            let r = estimate(100_000, 768, 768, 16, 200, ef).recall;
            assert!(r >= prev);
            prev = r;
        }

        assert_eq!(estimate(100_000, 768, 768, 48, 1000, 500).recall, 0.995);
    }

    #[test]
    fn test_truncation_lowers_recall() {
        let full = estimate(100_000, 768, 768, 16, 200, 50).recall;
        let half = estimate(100_000, 768, 384, 16, 200, 50).recall;
        let tiny = estimate(100_000, 768, 64, 16, 200, 50).recall;
        assert!(full > half && half > tiny);
    }

    #[test]
    fn test_degenerate_inputs_are_finite() {
        for (n, dim, d, m, efc, ef) in [
            (0, 768, 768, 16, 200, 50),
            (100, 768, 0, 16, 200, 50),
            (100, 0, 0, 16, 200, 50),
            (1, 768, 768, 0, 0, 0),
            (0, 0, 0, 0, 0, 0),
            (u64::MAX, 4096, 4096, 64, 1000, 1000),
        ] {
            let metrics = estimate(n, dim, d, m, efc, ef);
            assert!(all_finite(&metrics), "{metrics:?}");
        }

        let empty = estimate(0, 768, 768, 16, 200, 50);
        assert_eq!(empty.total_storage_bytes, 0);
        assert_eq!(empty.build_time_seconds, 0.0);
        assert_eq!(estimate(100, 768, 0, 16, 200, 50).recall, 0.0);
    }

    #[test]
    fn test_huge_m_saturates() {
        for m in [usize::MAX / 4, usize::MAX] {
            let metrics = estimate(10, 768, 768, m, 200, 50);
            assert!(all_finite(&metrics), "{metrics:?}");
            assert!(metrics.graph_storage_bytes > 0);
            assert!(metrics.total_storage_bytes >= metrics.graph_storage_bytes);
        }
        let full = estimate(u64::MAX, 768, 768, usize::MAX, 200, 50);
        assert_eq!(full.graph_storage_bytes, u64::MAX);
    }

    #[test]
    fn test_ratios() {
        let m = estimate(10_000, 768, 768, 16, 200, 50);
        assert!(m.bytes_per_vector(10_000) > 768.0 * 4.0);
        assert!(m.graph_overhead_ratio() > 0.0 && m.graph_overhead_ratio() < 1.0);
        assert_eq!(HnswMetrics::default().graph_overhead_ratio(), 0.0);
    }
}
