//! Cosine similarity with memoized per-movie norms.
//!
//! A movie's feature vector never changes after load, so its Euclidean norm
//! is computed at most once and kept in a `NormCache` owned by the engine.
//! Synthetic vectors (a user's taste vector) have no stable identity and are
//! passed as `NormKey::Virtual`: their norm is recomputed on every call and
//! never stored.
//!
//! ## Degenerate input
//! Division is left unguarded. A zero vector has norm 0, so any similarity
//! involving it is `0 / 0 = NaN`, and that NaN is returned as-is.

use data_loader::FeatureStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Identity under which a vector's norm may be cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormKey<'a> {
    /// A movie's feature vector; its norm is cached under the name
    Movie(&'a str),
    /// A synthetic vector; its norm is never cached
    Virtual,
}

pub(crate) fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Write-once cache of feature-vector norms.
///
/// Safe to share between threads: lookups take the read lock, and a miss
/// computes and inserts under the write lock through the entry API, so each
/// movie's norm is computed exactly once even on a concurrent first access.
#[derive(Debug, Default)]
pub struct NormCache {
    norms: RwLock<HashMap<String, f64>>,
    computations: AtomicUsize,
}

impl NormCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Euclidean norm of `vector`, cached under `key` when it names a movie
    pub fn norm(&self, vector: &[f64], key: NormKey<'_>) -> f64 {
        let NormKey::Movie(movie) = key else {
            return self.compute(vector);
        };

        if let Some(&norm) = self
            .norms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(movie)
        {
            return norm;
        }

        // The map only ever holds finished f64 values, so a poisoned lock
        // still guards consistent data.
        let mut norms = self.norms.write().unwrap_or_else(PoisonError::into_inner);
        *norms
            .entry(movie.to_string())
            .or_insert_with(|| self.compute(vector))
    }

    fn compute(&self, vector: &[f64]) -> f64 {
        self.computations.fetch_add(1, Ordering::Relaxed);
        dot_product(vector, vector).sqrt()
    }

    /// Cached norm of a movie, if it has been computed
    pub fn get(&self, movie: &str) -> Option<f64> {
        self.norms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(movie)
            .copied()
    }

    /// Number of cached movie norms
    pub fn len(&self) -> usize {
        self.norms.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many norms have actually been computed (cached or virtual)
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }
}

/// Computes cosine similarity between feature vectors.
#[derive(Debug, Default)]
pub struct SimilarityEngine {
    cache: NormCache,
}

impl SimilarityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cosine similarity `dot(a, b) / (|a| * |b|)`.
    ///
    /// Both vectors must have the same length. The result lies in [-1, 1]
    /// unless one of them is the zero vector, which yields NaN.
    pub fn similarity(
        &self,
        vec_a: &[f64],
        key_a: NormKey<'_>,
        vec_b: &[f64],
        key_b: NormKey<'_>,
    ) -> f64 {
        debug_assert_eq!(vec_a.len(), vec_b.len(), "feature dimensions differ");

        let dot = dot_product(vec_a, vec_b);
        dot / (self.cache.norm(vec_a, key_a) * self.cache.norm(vec_b, key_b))
    }

    /// Similarity between two movies of `features`, `None` if either is unknown
    pub fn movie_similarity(
        &self,
        features: &FeatureStore,
        movie_a: &str,
        movie_b: &str,
    ) -> Option<f64> {
        let vec_a = features.get(movie_a)?;
        let vec_b = features.get(movie_b)?;
        Some(self.similarity(
            vec_a,
            NormKey::Movie(movie_a),
            vec_b,
            NormKey::Movie(movie_b),
        ))
    }

    pub fn norm_cache(&self) -> &NormCache {
        &self.cache
    }
}
