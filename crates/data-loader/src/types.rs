//! Core domain types for the recommender's two input tables.
//!
//! - `FeatureStore`: movie name -> fixed-dimension feature vector
//! - `RatingStore`: user name -> sparse movie ratings, plus the movie order
//! - `DataIndex`: both stores, validated against each other
//!
//! Absence of a rating is meaningful (it is not a zero rating), so ratings
//! are kept as a two-level sparse map and never materialized as a matrix.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Movies are keyed by their (unique) name
pub type MovieName = String;

/// Users are keyed by their (unique) name
pub type UserName = String;

/// Ordered feature scores of one movie. Every movie shares the same length.
pub type FeatureVector = Vec<f64>;

// =============================================================================
// Parsed records
// =============================================================================

/// One record of the movie-attributes file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieFeatures {
    pub name: MovieName,
    pub features: FeatureVector,
}

/// A single rating given by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub movie: MovieName,
    pub value: f64,
}

/// One user row of the ratings file, with "no rating" columns already dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRatings {
    pub user: UserName,
    pub ratings: Vec<Rating>,
}

/// The whole ratings file: header columns in order, then every user row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingsTable {
    pub movie_order: Vec<MovieName>,
    pub users: Vec<UserRatings>,
}

// =============================================================================
// Feature Store
// =============================================================================

/// Every movie's feature vector.
///
/// Read-only once loaded; `DataIndex::validate` guarantees that every vector
/// has length `dimension()`.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    dimension: usize,
    vectors: HashMap<MovieName, FeatureVector>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a movie's features. The first insert fixes the dimension.
    pub fn insert(&mut self, name: impl Into<MovieName>, features: FeatureVector) {
        if self.vectors.is_empty() {
            self.dimension = features.len();
        }
        self.vectors.insert(name.into(), features);
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.vectors.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vectors.contains_key(name)
    }

    /// Shared length `D` of every feature vector
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.vectors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

// =============================================================================
// Rating Store
// =============================================================================

/// Every user's sparse ratings plus the canonical movie order.
///
/// The movie order is the header of the ratings file. Both recommenders
/// scan it front to back, so it also decides ties.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    movie_order: Vec<MovieName>,
    ratings: HashMap<UserName, BTreeMap<MovieName, f64>>,
}

impl RatingStore {
    pub fn new(movie_order: Vec<MovieName>) -> Self {
        Self {
            movie_order,
            ratings: HashMap::new(),
        }
    }

    /// Register a user, even one without any rating
    pub fn insert_user(&mut self, user: impl Into<UserName>) {
        self.ratings.entry(user.into()).or_default();
    }

    /// Insert (or overwrite) a single rating
    pub fn insert_rating(&mut self, user: &str, movie: impl Into<MovieName>, value: f64) {
        self.ratings
            .entry(user.to_string())
            .or_default()
            .insert(movie.into(), value);
    }

    /// Movie names in column order
    pub fn movie_order(&self) -> &[MovieName] {
        &self.movie_order
    }

    /// All ratings of a user, `None` if the user is unknown
    pub fn get_user_ratings(&self, user: &str) -> Option<&BTreeMap<MovieName, f64>> {
        self.ratings.get(user)
    }

    pub fn contains_user(&self, user: &str) -> bool {
        self.ratings.contains_key(user)
    }

    /// Set-membership test: did `user` rate `movie`?
    pub fn has_rated(&self, user: &str, movie: &str) -> bool {
        self.ratings
            .get(user)
            .is_some_and(|ratings| ratings.contains_key(movie))
    }

    /// User names, sorted so listings are stable
    pub fn user_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ratings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn user_count(&self) -> usize {
        self.ratings.len()
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.values().map(|r| r.len()).sum()
    }
}

// =============================================================================
// Data Index
// =============================================================================

/// Feature and rating stores, loaded once and read-only afterwards.
///
/// Build one with `DataIndex::load_from_files` or `DataIndex::from_tables`;
/// both validate the stores against each other.
#[derive(Debug, Clone, Default)]
pub struct DataIndex {
    pub(crate) features: FeatureStore,
    pub(crate) ratings: RatingStore,
}

impl DataIndex {
    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    /// Shared feature dimension `D`
    pub fn dimension(&self) -> usize {
        self.features.dimension()
    }

    pub fn movie_order(&self) -> &[MovieName] {
        self.ratings.movie_order()
    }

    pub fn get_features(&self, movie: &str) -> Option<&[f64]> {
        self.features.get(movie)
    }

    pub fn get_user_ratings(&self, user: &str) -> Option<&BTreeMap<MovieName, f64>> {
        self.ratings.get_user_ratings(user)
    }

    pub fn has_user(&self, user: &str) -> bool {
        self.ratings.contains_user(user)
    }

    pub fn has_rated(&self, user: &str, movie: &str) -> bool {
        self.ratings.has_rated(user, movie)
    }

    pub fn user_names(&self) -> Vec<&str> {
        self.ratings.user_names()
    }

    /// Get counts for debugging/validation: (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.ratings.user_count(),
            self.features.len(),
            self.ratings.rating_count(),
        )
    }
}
