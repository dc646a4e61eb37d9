//! Example: Recommend movies for one user
//!
//! Run with: cargo run --package recommender --example recommend_user -- alice
//!
//! This example shows how to:
//! 1. Load the movie attributes and user ratings
//! 2. Ask both recommenders for a movie
//! 3. Predict the user's score for every movie they have not rated

use recommender::{DEFAULT_K, RecommenderSystem};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,recommender=debug")
        .init();

    let user = std::env::args().nth(1).unwrap_or_else(|| "alice".to_string());

    println!("=== Movie Recommendation Example ===\n");

    let start = Instant::now();
    let system = RecommenderSystem::load(
        Path::new("data/movies_features.txt"),
        Path::new("data/ratings.txt"),
    )?;
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let by_content = system.recommend_by_content(&user)?;
    let by_cf = system.recommend_by_cf(&user, DEFAULT_K)?;
    println!("Target user: {}", user);
    println!("  By content: {}", by_content.as_deref().unwrap_or("(none)"));
    println!("  By CF (k = {}): {}\n", DEFAULT_K, by_cf.as_deref().unwrap_or("(none)"));

    println!("Predicted scores for unrated movies:");
    let index = system.data_index();
    for movie in index.movie_order() {
        if index.has_rated(&user, movie) {
            continue;
        }
        let score = system.predict_score(movie, &user, DEFAULT_K)?;
        println!("  {:<16} {:.3}", movie, score);
    }

    println!(
        "\nNorm cache holds {} movies",
        system.similarity_engine().norm_cache().len()
    );
    Ok(())
}
