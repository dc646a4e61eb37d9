//! Content-based recommendation.
//!
//! ## Algorithm
//! 1. Average the user's ratings
//! 2. Build a taste vector: sum of `(rating - average) * features` over
//!    every rated movie. Movies rated above the user's mean pull the vector
//!    toward their features, movies rated below push it away.
//! 3. Scan the movie order and score every unrated movie by its cosine
//!    similarity to the taste vector
//! 4. Return the best one; the first movie in order wins ties

use crate::error::{RecommendError, Result};
use crate::similarity::{NormKey, SimilarityEngine};
use data_loader::{DataIndex, FeatureVector, MovieName};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Below the smallest valid cosine similarity, so the first unrated movie
/// always becomes the initial candidate.
const INITIAL_SIMILARITY: f64 = -1.1;

/// Recommends the unrated movie closest to a user's taste vector
#[derive(Clone)]
pub struct ContentRecommender {
    /// Shared reference to the data index
    data_index: Arc<DataIndex>,

    /// Shared similarity engine (owns the norm cache)
    engine: Arc<SimilarityEngine>,
}

impl ContentRecommender {
    pub fn new(data_index: Arc<DataIndex>, engine: Arc<SimilarityEngine>) -> Self {
        Self { data_index, engine }
    }

    /// Build the user's taste vector.
    ///
    /// A user without ratings gets the zero vector (their mean is NaN but
    /// never used), which makes every later similarity NaN.
    pub fn taste_vector(&self, user: &str) -> Result<FeatureVector> {
        let ratings = self
            .data_index
            .get_user_ratings(user)
            .ok_or_else(|| RecommendError::user(user))?;

        let average = ratings.values().sum::<f64>() / ratings.len() as f64;

        let mut taste = vec![0.0; self.data_index.dimension()];
        for (movie, &rating) in ratings {
            let features = self
                .data_index
                .get_features(movie)
                .ok_or_else(|| RecommendError::movie(movie))?;

            let weight = rating - average;
            for (component, feature) in taste.iter_mut().zip(features) {
                *component += weight * feature;
            }
        }

        Ok(taste)
    }

    /// Recommend a movie for `user`.
    ///
    /// Returns `Ok(None)` when no unrated movie scores above the sentinel:
    /// the user rated everything, or every similarity is NaN.
    #[instrument(skip(self))]
    pub fn recommend(&self, user: &str) -> Result<Option<MovieName>> {
        let taste = self.taste_vector(user)?;

        let mut best_similarity = INITIAL_SIMILARITY;
        let mut best_movie: Option<&MovieName> = None;
        let mut candidates = 0usize;

        for movie in self.data_index.movie_order() {
            if self.data_index.has_rated(user, movie) {
                continue;
            }
            candidates += 1;
            let features = self
                .data_index
                .get_features(movie)
                .ok_or_else(|| RecommendError::movie(movie))?;

            let similarity =
                self.engine
                    .similarity(&taste, NormKey::Virtual, features, NormKey::Movie(movie));

            // Strict: an equal score later in the order never replaces the leader
            if similarity > best_similarity {
                best_similarity = similarity;
                best_movie = Some(movie);
            }
        }

        // Only NaN can lose to the sentinel
        if candidates > 0 && best_movie.is_none() {
            warn!(candidates, "Every candidate similarity is NaN");
        }
        debug!(?best_movie, best_similarity, "Content recommendation");
        Ok(best_movie.cloned())
    }
}
