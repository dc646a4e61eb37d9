//! Collaborative-filtering recommendation.
//!
//! Predicts a score for every movie the user has not rated and returns the
//! highest one. The running best starts at 0, so only a strictly positive
//! prediction can be recommended; NaN predictions never qualify.

use crate::error::{RecommendError, Result};
use crate::predictor::CfPredictor;
use data_loader::MovieName;
use tracing::{debug, instrument};

/// Score a prediction has to beat to be recommended
const MIN_SCORE: f64 = 0.0;

/// Recommends the unrated movie with the highest predicted score
#[derive(Clone)]
pub struct CfRecommender {
    predictor: CfPredictor,
}

impl CfRecommender {
    pub fn new(predictor: CfPredictor) -> Self {
        Self { predictor }
    }

    /// Recommend a movie for `user` using their `k` nearest rated movies.
    ///
    /// Returns `Ok(None)` if no unrated movie predicts above zero.
    #[instrument(skip(self))]
    pub fn recommend(&self, user: &str, k: usize) -> Result<Option<MovieName>> {
        let data_index = self.predictor.data_index();
        if !data_index.has_user(user) {
            return Err(RecommendError::user(user));
        }

        let mut best_score = MIN_SCORE;
        let mut best_movie: Option<&MovieName> = None;

        for movie in data_index.movie_order() {
            if data_index.has_rated(user, movie) {
                continue;
            }

            let score = self.predictor.predict(movie, user, k)?;
            // Strict: first movie in order wins ties
            if score > best_score {
                best_score = score;
                best_movie = Some(movie);
            }
        }

        debug!(?best_movie, best_score, "CF recommendation");
        Ok(best_movie.cloned())
    }
}
