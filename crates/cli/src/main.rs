use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use recommender::{
    DEFAULT_K, NOT_FOUND_SCORE, RecommendError, RecommenderSystem, USER_NOT_FOUND,
    UserRecommendations,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// movie-recs - content-based and collaborative-filtering movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommend movies from feature vectors and user ratings", long_about = None)]
struct Cli {
    /// Movie attributes file: `name score1 ... scoreD` per line
    #[arg(short, long, default_value = "data/movies_features.txt")]
    attributes: PathBuf,

    /// User ratings file: header of movie names, then `user r1 r2 ...` (NA = unrated)
    #[arg(short, long, default_value = "data/ratings.txt")]
    ratings: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the unrated movie closest to the user's taste
    Content {
        /// User to recommend for
        #[arg(long)]
        user: String,
    },

    /// Predict a user's rating of a movie
    Predict {
        /// Movie to predict
        #[arg(long)]
        movie: String,

        /// User whose rating is predicted
        #[arg(long)]
        user: String,

        /// Number of most similar rated movies to use
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,

        /// Show the rated movies the prediction is built from
        #[arg(long)]
        explain: bool,
    },

    /// Recommend the unrated movie with the highest predicted rating
    Cf {
        /// User to recommend for
        #[arg(long)]
        user: String,

        /// Number of most similar rated movies to use
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,
    },

    /// List users with their rating counts
    Users,

    /// Run both recommenders for every user
    Batch {
        /// Number of most similar rated movies to use
        #[arg(short, long, default_value_t = DEFAULT_K)]
        k: usize,
    },
}

#[derive(Serialize)]
struct Recommendation<'a> {
    user: &'a str,
    method: &'a str,
    movie: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct Prediction<'a> {
    user: &'a str,
    movie: &'a str,
    k: usize,
    score: f64,
    error: Option<String>,
}

#[derive(Serialize)]
struct UserSummary<'a> {
    user: &'a str,
    ratings: usize,
    average: f64,
}

fn main() -> Result<()> {
    // Initialize tracing; quiet unless RUST_LOG asks for more
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let system = RecommenderSystem::load(&cli.attributes, &cli.ratings).with_context(|| {
        format!(
            "Failed to load {} and {}",
            cli.attributes.display(),
            cli.ratings.display()
        )
    })?;
    if !cli.json {
        let (users, movies, ratings) = system.data_index().counts();
        eprintln!(
            "{} Loaded {} movies, {} users, {} ratings in {:?}",
            "✓".green(),
            movies,
            users,
            ratings,
            start.elapsed()
        );
    }

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Content { user } => {
            let result = system.recommend_by_content(&user);
            print_recommendation(&user, "content", result, cli.json)?
        }
        Commands::Predict {
            movie,
            user,
            k,
            explain,
        } => handle_predict(&system, &movie, &user, k, explain, cli.json)?,
        Commands::Cf { user, k } => {
            let result = system.recommend_by_cf(&user, k);
            print_recommendation(&user, "cf", result, cli.json)?
        }
        Commands::Users => handle_users(&system, cli.json)?,
        Commands::Batch { k } => handle_batch(system.with_default_k(k), cli.json)?,
    }

    Ok(())
}

/// Print a single recommendation. An unknown user prints the legacy
/// `USER NOT FOUND` text rather than failing the command.
fn print_recommendation(
    user: &str,
    method: &str,
    result: recommender::Result<Option<String>>,
    json: bool,
) -> Result<()> {
    let (movie, error) = match result {
        Ok(movie) => (movie, None),
        Err(e @ RecommendError::UserNotFound { .. }) => (None, Some(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    if json {
        let rec = Recommendation {
            user,
            method,
            movie,
            error,
        };
        println!("{}", serde_json::to_string_pretty(&rec)?);
        return Ok(());
    }

    match (movie, error) {
        (Some(movie), _) => println!("{}", movie.bold()),
        (None, Some(_)) => println!("{}", USER_NOT_FOUND.red()),
        // Nothing qualified: an empty answer, not an error
        (None, None) => println!(),
    }
    Ok(())
}

/// Handle the 'predict' command
fn handle_predict(
    system: &RecommenderSystem,
    movie: &str,
    user: &str,
    k: usize,
    explain: bool,
    json: bool,
) -> Result<()> {
    let (score, error) = match system.predict_score(movie, user, k) {
        Ok(score) => (score, None),
        Err(e) if e.is_not_found() => (NOT_FOUND_SCORE, Some(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    if json {
        let prediction = Prediction {
            user,
            movie,
            k,
            score,
            error,
        };
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    match &error {
        Some(reason) => println!("{} ({})", score.to_string().red(), reason),
        None => println!("{}", score.to_string().bold()),
    }

    if explain && error.is_none() {
        for neighbor in system.explain_prediction(movie, user, k)? {
            println!(
                "   {} similarity {:.4}, rated {}",
                neighbor.movie.cyan(),
                neighbor.similarity,
                neighbor.rating
            );
        }
    }
    Ok(())
}

/// Handle the 'users' command
fn handle_users(system: &RecommenderSystem, json: bool) -> Result<()> {
    let index = system.data_index();
    let summaries: Vec<UserSummary> = index
        .user_names()
        .into_iter()
        .map(|user| {
            let ratings = index.get_user_ratings(user).map(|r| r.len()).unwrap_or(0);
            let total: f64 = index
                .get_user_ratings(user)
                .map(|r| r.values().sum())
                .unwrap_or(0.0);
            UserSummary {
                user,
                ratings,
                average: if ratings > 0 { total / ratings as f64 } else { 0.0 },
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", "Users:".bold().blue());
    for summary in &summaries {
        println!(
            "{}{}: {} ratings, average {:.2}",
            "• ".green(),
            summary.user,
            summary.ratings,
            summary.average
        );
    }
    Ok(())
}

/// Handle the 'batch' command
fn handle_batch(system: RecommenderSystem, json: bool) -> Result<()> {
    let start = Instant::now();
    let all: Vec<UserRecommendations> = system.recommend_all()?;
    let elapsed = start.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Recommendations (k = {}):", system.default_k()).bold().blue()
    );
    for rec in &all {
        println!(
            "{}: content {}, cf {}",
            rec.user.green(),
            rec.by_content.as_deref().unwrap_or("-"),
            rec.by_cf.as_deref().unwrap_or("-")
        );
    }
    println!(
        "{} users in {:?} ({} norms cached)",
        all.len(),
        elapsed,
        system.similarity_engine().norm_cache().len()
    );
    Ok(())
}
