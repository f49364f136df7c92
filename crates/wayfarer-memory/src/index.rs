//! Exact nearest-neighbour index.
//!
//! Vectors are stored densely and searched by brute force with squared L2
//! distance. Positions are stable: the i-th vector added is neighbour `i`.

use crate::error::MemoryError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

/// A search hit: position in the index and its squared L2 distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

/// Flat L2 index, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create an empty index for vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(MemoryError::Dimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Append vectors. Nothing is added if any vector has the wrong size.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        for vector in &vectors {
            self.check_dimension(vector)?;
        }
        self.vectors.extend(vectors);
        Ok(())
    }

    /// Return up to `k` nearest vectors, closest first.
    ///
    /// Ties are broken by insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dimension(query)?;
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| Neighbor {
                index,
                distance: squared_l2(query, vector),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }

    /// Atomically persist the index (write to tmp, then rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("tmp");
        let data = serde_json::to_string(self)?;
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load an index written by [`FlatIndex::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let index: Self = serde_json::from_str(&data)?;
        for vector in &index.vectors {
            index.check_dimension(vector)?;
        }
        Ok(index)
    }
}

/// Squared Euclidean distance.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
