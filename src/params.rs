//! Parameter sets.
//!
//! Generators and cost models take plain numbers. These types bundle them
//! with sensible defaults and check them once, at the boundary, so the core
//! never sees NaN or inconsistent values.

use crate::error::{check_non_negative, Result, SimError};
use serde::{Deserialize, Serialize};

/// Cost-model parameters for an HNSW index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswParams {
    pub vector_count: u64,
    /// Full embedding dimension.
    pub dimensions: usize,
    /// Dimensions kept after matryoshka truncation (`<= dimensions`).
    pub mrl_dimensions: usize,
    pub m: usize,
    pub ef_construction: usize,
    pub ef_search: usize,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            vector_count: 100_000,
            dimensions: 768,
            mrl_dimensions: 768,
            m: 16,
            ef_construction: 200,
            ef_search: 50,
        }
    }
}

impl HnswParams {
    /// Full-size embeddings of the given dimension, no truncation.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self.mrl_dimensions = dimensions;
        self
    }

    /// Keep only the first `mrl_dimensions` dimensions.
    pub fn truncated_to(mut self, mrl_dimensions: usize) -> Self {
        self.mrl_dimensions = mrl_dimensions;
        self
    }

    pub fn with_vector_count(mut self, vector_count: u64) -> Self {
        self.vector_count = vector_count;
        self
    }

    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    pub fn with_ef(mut self, ef_construction: usize, ef_search: usize) -> Self {
        self.ef_construction = ef_construction;
        self.ef_search = ef_search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.m < 2 {
            return Err(SimError::InvalidParameter(format!(
                "M must be at least 2, got {}",
                self.m
            )));
        }
        if self.mrl_dimensions > self.dimensions {
            return Err(SimError::InvalidParameter(format!(
                "truncated dimensions ({}) exceed full dimensions ({})",
                self.mrl_dimensions, self.dimensions
            )));
        }
        Ok(())
    }

    /// Validate, then run the cost model.
    #[cfg(feature = "hnsw")]
    pub fn estimate(&self) -> Result<crate::hnsw::HnswMetrics> {
        self.validate()?;
        Ok(crate::hnsw::metrics::estimate(
            self.vector_count,
            self.dimensions,
            self.mrl_dimensions,
            self.m,
            self.ef_construction,
            self.ef_search,
        ))
    }
}

/// Cost-model parameters for an IVF index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvfParams {
    pub vector_count: u64,
    pub dimensions: usize,
    pub nlist: usize,
    pub nprobe: usize,
}

impl Default for IvfParams {
    fn default() -> Self {
        Self {
            vector_count: 100_000,
            dimensions: 768,
            nlist: 100,
            nprobe: 10,
        }
    }
}

impl IvfParams {
    /// `nlist ≈ √N`, the usual starting point.
    pub fn for_vector_count(vector_count: u64) -> Self {
        let nlist = ((vector_count as f64).sqrt().round() as usize).max(1);
        Self {
            vector_count,
            nlist,
            nprobe: ((nlist as f64).sqrt().round() as usize).max(1),
            ..Self::default()
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_probes(mut self, nlist: usize, nprobe: usize) -> Self {
        self.nlist = nlist;
        self.nprobe = nprobe;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.nprobe > self.nlist {
            return Err(SimError::InvalidParameter(format!(
                "nprobe ({}) exceeds nlist ({})",
                self.nprobe, self.nlist
            )));
        }
        Ok(())
    }

    #[cfg(feature = "ivf")]
    pub fn estimate(&self) -> Result<crate::ivf::IvfMetrics> {
        self.validate()?;
        Ok(crate::ivf::metrics::estimate(
            self.vector_count,
            self.dimensions,
            self.nlist,
            self.nprobe,
        ))
    }
}

/// Matryoshka presets: full dimension and the truncations models ship with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatryoshkaPreset {
    pub full_dimension: usize,
    /// Sorted ascending; the last entry is the full dimension.
    pub supported_dimensions: Vec<usize>,
}

impl MatryoshkaPreset {
    /// sentence-transformers style models.
    pub fn sentence_transformers() -> Self {
        Self {
            full_dimension: 768,
            supported_dimensions: vec![64, 128, 256, 384, 512, 768],
        }
    }

    /// Cohere embed-v3 style models.
    pub fn cohere_style() -> Self {
        Self {
            full_dimension: 1024,
            supported_dimensions: vec![256, 512, 768, 1024],
        }
    }

    /// OpenAI text-embedding-3-small.
    pub fn openai_small() -> Self {
        Self {
            full_dimension: 1536,
            supported_dimensions: vec![256, 512, 1024, 1536],
        }
    }

    /// OpenAI text-embedding-3-large.
    pub fn openai_large() -> Self {
        Self {
            full_dimension: 3072,
            supported_dimensions: vec![256, 512, 1024, 1536, 3072],
        }
    }

    /// Smallest supported dimension `>= requested`, else the full dimension.
    pub fn find_dimension(&self, requested: usize) -> usize {
        self.supported_dimensions
            .iter()
            .copied()
            .find(|&d| d >= requested)
            .unwrap_or(self.full_dimension)
    }

    /// HNSW parameters for this model truncated to `requested` dimensions.
    pub fn hnsw_params(&self, requested: usize) -> HnswParams {
        HnswParams::default()
            .with_dimensions(self.full_dimension)
            .truncated_to(self.find_dimension(requested))
    }
}

/// Build-time parameters for an HNSW scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswLayout {
    pub node_count: usize,
    pub m: usize,
}

impl Default for HnswLayout {
    fn default() -> Self {
        Self {
            node_count: 50,
            m: 4,
        }
    }
}

impl HnswLayout {
    pub fn validate(&self) -> Result<()> {
        if self.m < 2 {
            return Err(SimError::InvalidParameter(format!(
                "M must be at least 2, got {}",
                self.m
            )));
        }
        Ok(())
    }

    #[cfg(feature = "hnsw")]
    pub fn build(&self) -> Result<crate::hnsw::HnswTopology> {
        self.validate()?;
        Ok(crate::hnsw::generate_hnsw_data(self.node_count, self.m))
    }
}

/// Build-time parameters for an IVF scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvfLayout {
    pub nlist: usize,
    pub total_points: usize,
    pub cluster_spread: f64,
    /// Seed for point offsets.
    pub seed: u64,
}

impl Default for IvfLayout {
    fn default() -> Self {
        Self {
            nlist: 8,
            total_points: 200,
            cluster_spread: 1.5,
            seed: 42,
        }
    }
}

impl IvfLayout {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("cluster_spread", self.cluster_spread)
    }

    /// Generate centroids and points.
    #[cfg(feature = "ivf")]
    pub fn build(&self) -> Result<(Vec<crate::ivf::Centroid>, Vec<crate::ivf::ClusterPoint>)> {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        self.validate()?;
        let centroids = crate::ivf::generate_centroids(self.nlist);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let points = crate::ivf::generate_clustered_points(
            &centroids,
            self.total_points,
            self.cluster_spread,
            &mut rng,
        );
        Ok((centroids, points))
    }
}
