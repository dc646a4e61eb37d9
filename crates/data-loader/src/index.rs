//! DataIndex building and validation.
//!
//! Turns the parsed tables into the feature and rating stores and checks
//! the invariants the recommenders rely on:
//! - every feature vector has the same, non-zero dimension
//! - movie names are unique in both files
//! - every header column names a movie that has features
//! - every rating is a finite number

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

impl DataIndex {
    /// Load both input files and build a validated index
    ///
    /// The two files are independent, so they are parsed in parallel.
    pub fn load_from_files(attributes_path: &Path, ratings_path: &Path) -> Result<Self> {
        info!(
            attributes = %attributes_path.display(),
            ratings = %ratings_path.display(),
            "Loading recommender data"
        );

        let (movies, table) = rayon::join(
            || parser::parse_movie_attributes(attributes_path),
            || parser::parse_user_ratings(ratings_path),
        );

        let index = Self::from_tables(movies?, table?)?;

        let (users, movies, ratings) = index.counts();
        info!(
            users,
            movies,
            ratings,
            dimension = index.dimension(),
            "DataIndex successfully built and validated"
        );
        Ok(index)
    }

    /// Build an index from already-parsed tables
    pub fn from_tables(movies: Vec<MovieFeatures>, table: RatingsTable) -> Result<Self> {
        let mut features = FeatureStore::new();
        for movie in movies {
            if features.contains(&movie.name) {
                return Err(DataLoadError::ValidationError(format!(
                    "duplicate movie {} in attributes",
                    movie.name
                )));
            }
            features.insert(movie.name, movie.features);
        }

        let mut ratings = RatingStore::new(table.movie_order);
        for row in table.users {
            ratings.insert_user(row.user.as_str());
            for rating in row.ratings {
                ratings.insert_rating(&row.user, rating.movie, rating.value);
            }
        }

        let index = Self { features, ratings };
        index.validate()?;
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Returns Ok(()) if valid, Err on the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(DataLoadError::ValidationError(
                "no movies in attributes".to_string(),
            ));
        }

        let dimension = self.features.dimension();
        if dimension == 0 {
            return Err(DataLoadError::ValidationError(
                "movies carry no feature scores".to_string(),
            ));
        }
        for (movie, vector) in self.features.iter() {
            if vector.len() != dimension {
                return Err(DataLoadError::DimensionMismatch {
                    movie: movie.to_string(),
                    expected: dimension,
                    found: vector.len(),
                });
            }
        }

        let mut seen = HashSet::new();
        for movie in self.ratings.movie_order() {
            if !seen.insert(movie.as_str()) {
                return Err(DataLoadError::ValidationError(format!(
                    "duplicate movie {} in ratings header",
                    movie
                )));
            }
            if !self.features.contains(movie) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    name: movie.clone(),
                });
            }
        }

        for user in self.ratings.user_names() {
            for (movie, &value) in self.ratings.get_user_ratings(user).into_iter().flatten() {
                if !self.features.contains(movie) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        name: movie.clone(),
                    });
                }
                if !value.is_finite() {
                    return Err(DataLoadError::InvalidValue {
                        field: "rating".to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        debug!(dimension, "Validated data index");
        Ok(())
    }
}
