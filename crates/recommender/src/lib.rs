//! # Recommender Crate
//!
//! Movie recommendation over a small in-memory rating matrix.
//!
//! ## Components
//!
//! ### SimilarityEngine
//! Cosine similarity between feature vectors, with each movie's norm
//! memoized in a thread-safe `NormCache`.
//!
//! ### ContentRecommender
//! Builds a taste vector from the user's ratings and recommends the unrated
//! movie most similar to it.
//!
//! ### CfPredictor / CfRecommender
//! Item-item collaborative filtering: predicts a rating from the `k` most
//! similar movies the user rated, and recommends the highest prediction.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::RecommenderSystem;
//! use std::path::Path;
//!
//! let system = RecommenderSystem::load(
//!     Path::new("data/movies_features.txt"),
//!     Path::new("data/ratings.txt"),
//! )?;
//!
//! let by_content = system.recommend_by_content("alice")?;
//! let score = system.predict_score("Titanic", "alice", 3)?;
//! let by_cf = system.recommend_by_cf("alice", 3)?;
//! ```
//!
//! ## Degenerate input
//!
//! Zero vectors, users without ratings and weights summing to zero are not
//! guarded: the arithmetic follows IEEE-754 and NaN or infinite values are
//! returned to the caller. A NaN score never wins a recommendation.

// Public modules
pub mod error;
pub mod similarity;
pub mod content;
pub mod predictor;
pub mod collaborative;
pub mod system;

// Re-export commonly used types
pub use collaborative::CfRecommender;
pub use content::ContentRecommender;
pub use error::{NOT_FOUND_SCORE, RecommendError, Result, USER_NOT_FOUND};
pub use predictor::{CfPredictor, Neighbor};
pub use similarity::{NormCache, NormKey, SimilarityEngine};
pub use system::{DEFAULT_K, RecommenderSystem, UserRecommendations};
