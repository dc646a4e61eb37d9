//! Item-item collaborative filtering score prediction.
//!
//! ## Algorithm
//! 1. Compare the target movie with every movie the user rated
//! 2. Keep the `k` most similar rated movies (all of them if fewer than `k`)
//! 3. Predict `sum(similarity * rating) / sum(similarity)` over those
//!
//! The weighted average is not clamped. Negative similarities may shrink,
//! zero or flip the denominator; the resulting large, infinite or NaN score
//! is returned unchanged.

use crate::error::{RecommendError, Result};
use crate::similarity::SimilarityEngine;
use data_loader::{DataIndex, MovieName};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A rated movie used to weight a prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub movie: MovieName,
    pub similarity: f64,
    pub rating: f64,
}

/// Predicts a user's rating of a movie from their k most similar ratings
#[derive(Clone)]
pub struct CfPredictor {
    /// Shared reference to the data index
    data_index: Arc<DataIndex>,

    /// Shared similarity engine (owns the norm cache)
    engine: Arc<SimilarityEngine>,
}

impl CfPredictor {
    pub fn new(data_index: Arc<DataIndex>, engine: Arc<SimilarityEngine>) -> Self {
        Self { data_index, engine }
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    /// The `k` rated movies most similar to `movie`, most similar first.
    ///
    /// Equal similarities keep the rated movies' name order. A NaN
    /// similarity (zero-norm features) ranks ahead of every number, whatever
    /// its sign bit, so it is always selected and the prediction is NaN.
    pub fn nearest_neighbors(&self, movie: &str, user: &str, k: usize) -> Result<Vec<Neighbor>> {
        if !self.data_index.features().contains(movie) {
            return Err(RecommendError::movie(movie));
        }
        let ratings = self
            .data_index
            .get_user_ratings(user)
            .ok_or_else(|| RecommendError::user(user))?;

        let mut neighbors = ratings
            .iter()
            .map(|(rated, &rating)| -> Result<Neighbor> {
                let similarity = self
                    .engine
                    .movie_similarity(self.data_index.features(), movie, rated)
                    .ok_or_else(|| RecommendError::movie(rated))?;
                Ok(Neighbor {
                    movie: rated.clone(),
                    similarity,
                    rating,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        neighbors.sort_by(|a, b| by_similarity_desc(a.similarity, b.similarity));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Predict `user`'s rating of `movie` from the `k` nearest rated movies.
    ///
    /// Fails with a not-found error if either the movie or the user is
    /// unknown. With no neighbors selected (no ratings, or `k == 0`) the
    /// prediction is `0 / 0 = NaN`.
    #[instrument(skip(self))]
    pub fn predict(&self, movie: &str, user: &str, k: usize) -> Result<f64> {
        let neighbors = self.nearest_neighbors(movie, user, k)?;

        let (weighted, total) = neighbors
            .iter()
            .fold((0.0, 0.0), |(weighted, total), n| {
                (weighted + n.similarity * n.rating, total + n.similarity)
            });
        let score = weighted / total;

        if !score.is_finite() {
            warn!(neighbors = neighbors.len(), score, "Degenerate predicted score");
        }
        debug!(neighbors = neighbors.len(), score, "Predicted score");
        Ok(score)
    }
}

/// Descending order on similarities with NaN first.
///
/// `f64::total_cmp` alone would split NaNs by sign bit, and `0.0 / 0.0`
/// yields a negative NaN on common targets.
fn by_similarity_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => b.total_cmp(&a),
    }
}
