//! Error types for the recommender crate.

use data_loader::DataLoadError;
use thiserror::Error;

/// Text printed by the command line for an unknown user
pub const USER_NOT_FOUND: &str = "USER NOT FOUND";

/// Score printed by the command line when a prediction's user or movie is
/// unknown. Lies outside any rating scale in use.
pub const NOT_FOUND_SCORE: f64 = -1.0;

/// Errors returned by the recommendation queries
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The user has no row in the ratings table
    #[error("User not found: {user}")]
    UserNotFound { user: String },

    /// The movie has no feature vector
    #[error("Movie not found: {movie}")]
    MovieNotFound { movie: String },

    /// The input tables could not be produced
    #[error("Failed to load data: {0}")]
    Load(#[from] DataLoadError),
}

impl RecommendError {
    pub(crate) fn user(user: &str) -> Self {
        Self::UserNotFound {
            user: user.to_string(),
        }
    }

    pub(crate) fn movie(movie: &str) -> Self {
        Self::MovieNotFound {
            movie: movie.to_string(),
        }
    }

    /// True for the unknown-user and unknown-movie cases
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound { .. } | Self::MovieNotFound { .. })
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
