//! # Recommender System
//!
//! Facade over the three query operations. Owns the loaded data and one
//! similarity engine shared by every recommender, so a movie's norm is
//! computed once no matter which query needs it first.
//!
//! The system is cheap to clone and `Send + Sync`; clones share the data
//! and the norm cache.

use crate::collaborative::CfRecommender;
use crate::content::ContentRecommender;
use crate::error::Result;
use crate::predictor::{CfPredictor, Neighbor};
use crate::similarity::SimilarityEngine;
use data_loader::{DataIndex, MovieName, UserName};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Neighborhood size used when the caller does not choose one
pub const DEFAULT_K: usize = 3;

/// Both recommendations for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecommendations {
    pub user: UserName,
    pub by_content: Option<MovieName>,
    pub by_cf: Option<MovieName>,
}

/// Entry point for recommendations over one loaded dataset
#[derive(Clone)]
pub struct RecommenderSystem {
    data_index: Arc<DataIndex>,
    engine: Arc<SimilarityEngine>,
    content: ContentRecommender,
    predictor: CfPredictor,
    cf: CfRecommender,
    default_k: usize,
}

impl RecommenderSystem {
    /// Create a system over an already-loaded index
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        let engine = Arc::new(SimilarityEngine::new());
        let content = ContentRecommender::new(data_index.clone(), engine.clone());
        let predictor = CfPredictor::new(data_index.clone(), engine.clone());
        let cf = CfRecommender::new(predictor.clone());

        Self {
            data_index,
            engine,
            content,
            predictor,
            cf,
            default_k: DEFAULT_K,
        }
    }

    /// Load both input files and create a system over them
    pub fn load(attributes_path: &Path, ratings_path: &Path) -> Result<Self> {
        let data_index = DataIndex::load_from_files(attributes_path, ratings_path)?;
        Ok(Self::new(Arc::new(data_index)))
    }

    /// Configure the neighborhood size used by `recommend_all` (default: 3)
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    pub fn similarity_engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Content-based recommendation; `Ok(None)` when nothing qualifies
    pub fn recommend_by_content(&self, user: &str) -> Result<Option<MovieName>> {
        self.content.recommend(user)
    }

    /// Predicted rating of `movie` by `user` from their `k` nearest ratings
    pub fn predict_score(&self, movie: &str, user: &str, k: usize) -> Result<f64> {
        self.predictor.predict(movie, user, k)
    }

    /// The rated movies a prediction is built from
    pub fn explain_prediction(&self, movie: &str, user: &str, k: usize) -> Result<Vec<Neighbor>> {
        self.predictor.nearest_neighbors(movie, user, k)
    }

    /// Collaborative-filtering recommendation; `Ok(None)` when nothing predicts above zero
    pub fn recommend_by_cf(&self, user: &str, k: usize) -> Result<Option<MovieName>> {
        self.cf.recommend(user, k)
    }

    /// Run both recommenders for every user, in parallel, sorted by user name
    pub fn recommend_all(&self) -> Result<Vec<UserRecommendations>> {
        let users = self.data_index.user_names();
        info!(users = users.len(), k = self.default_k, "Recommending for all users");

        users
            .par_iter()
            .map(|&user| -> Result<UserRecommendations> {
                Ok(UserRecommendations {
                    user: user.to_string(),
                    by_content: self.recommend_by_content(user)?,
                    by_cf: self.recommend_by_cf(user, self.default_k)?,
                })
            })
            .collect()
    }
}
