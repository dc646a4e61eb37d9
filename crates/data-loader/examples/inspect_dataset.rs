//! Load a dataset and print what each user has rated.
//!
//! Usage: cargo run --example inspect_dataset -p data-loader [ATTRIBUTES] [RATINGS]

use data_loader::DataIndex;
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> data_loader::Result<()> {
    let mut args = env::args().skip(1);
    let attributes = PathBuf::from(args.next().unwrap_or_else(|| "data/movies_features.txt".into()));
    let ratings = PathBuf::from(args.next().unwrap_or_else(|| "data/ratings.txt".into()));

    let start = Instant::now();
    let index = DataIndex::load_from_files(&attributes, &ratings)?;
    let elapsed = start.elapsed();

    let (users, movies, rating_count) = index.counts();
    let cells = users * index.movie_order().len();

    println!("=== {} ===", ratings.display());
    println!("Loaded in {:?}", elapsed);
    println!("{} movies with {} features each", movies, index.dimension());
    println!(
        "{} users, {} ratings ({:.1}% of the table filled)",
        users,
        rating_count,
        100.0 * rating_count as f64 / cells.max(1) as f64
    );

    // One row per user, one column per header movie: rating or '.'
    println!();
    println!("{:<12} {}", "", index.movie_order().join(" "));
    for user in index.user_names() {
        let row: Vec<String> = index
            .movie_order()
            .iter()
            .map(|movie| {
                let cell = match index.get_user_ratings(user).and_then(|r| r.get(movie)) {
                    Some(value) => value.to_string(),
                    None => ".".to_string(),
                };
                format!("{:>width$}", cell, width = movie.len())
            })
            .collect();
        println!("{:<12} {}", user, row.join(" "));
    }

    // Movies nobody rated can only be reached through content similarity
    let unrated: Vec<&str> = index
        .movie_order()
        .iter()
        .filter(|movie| !index.user_names().iter().any(|user| index.has_rated(user, movie)))
        .map(String::as_str)
        .collect();
    if !unrated.is_empty() {
        println!("\nNo ratings yet: {}", unrated.join(", "));
    }

    Ok(())
}
