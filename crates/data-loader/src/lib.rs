//! # Data Loader Crate
//!
//! This crate loads the two tables the recommenders read from:
//! the movie feature vectors and the users' sparse ratings.
//!
//! ## Main Components
//!
//! - **types**: FeatureStore, RatingStore and the combined DataIndex
//! - **parser**: Parse the whitespace-separated input files
//! - **index**: Build and validate a DataIndex
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(
//!     Path::new("data/movies_features.txt"),
//!     Path::new("data/ratings.txt"),
//! )?;
//!
//! let ratings = index.get_user_ratings("alice").unwrap();
//! println!("alice rated {} movies", ratings.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::NO_RATING;
pub use types::{
    // Type aliases
    FeatureVector,
    MovieName,
    UserName,
    // Parsed records
    MovieFeatures,
    Rating,
    RatingsTable,
    UserRatings,
    // Stores
    DataIndex,
    FeatureStore,
    RatingStore,
};
