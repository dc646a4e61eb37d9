//! Parser for the two whitespace-separated input files.
//!
//! - movie attributes: `movieName score1 score2 ... scoreD`
//! - user ratings: a header line of movie names, then
//!   `userName rating1 rating2 ...` with `NA` marking an unrated column

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::io::ErrorKind;
use std::path::Path;

/// Token marking a column the user did not rate
pub const NO_RATING: &str = "NA";

/// Read a file into lines, mapping a missing/unopenable file to `FileNotFound`
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let content = String::from_utf8_lossy(&bytes);

    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_score(token: &str, file: &str, line: usize, what: &str) -> Result<f64> {
    token.parse::<f64>().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {} '{}': {}", what, token, e),
    })
}

/// Parse the movie-attributes file
///
/// Format: movieName score1 score2 ... scoreD
///
/// Blank lines are skipped. Dimension checks happen in `DataIndex::validate`.
pub fn parse_movie_attributes(path: &Path) -> Result<Vec<MovieFeatures>> {
    let lines = read_lines(path)?;
    let file = file_label(path);
    let mut movies = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();

        let Some(name) = tokens.next() else {
            continue; // Skip empty lines
        };

        let features = tokens
            .map(|token| parse_score(token, &file, line_no, "feature score"))
            .collect::<Result<FeatureVector>>()?;

        movies.push(MovieFeatures {
            name: name.to_string(),
            features,
        });
    }

    Ok(movies)
}

/// Parse the user-ratings file
///
/// Format:
/// ```text
/// movieA movieB movieC
/// alice  5      NA     3
/// ```
///
/// Tokens beyond the last header column are ignored; a short row leaves its
/// trailing columns unrated. A user only exists once they rated something,
/// so a row of nothing but `NA` is dropped.
pub fn parse_user_ratings(path: &Path) -> Result<RatingsTable> {
    let lines = read_lines(path)?;
    let file = file_label(path);

    let mut rows = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let movie_order: Vec<MovieName> = rows
        .next()
        .map(|(_, header)| header.split_whitespace().map(str::to_string).collect())
        .ok_or_else(|| DataLoadError::ParseError {
            file: file.clone(),
            line: 1,
            reason: "Missing header of movie names".to_string(),
        })?;

    let mut users = Vec::new();
    for (idx, line) in rows {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();

        let Some(user) = tokens.next() else {
            continue;
        };

        let mut ratings = Vec::new();
        for (movie, token) in movie_order.iter().zip(tokens) {
            if token == NO_RATING {
                continue;
            }
            ratings.push(Rating {
                movie: movie.clone(),
                value: parse_score(token, &file, line_no, "rating")?,
            });
        }

        if ratings.is_empty() {
            continue;
        }
        users.push(UserRatings {
            user: user.to_string(),
            ratings,
        });
    }

    Ok(RatingsTable { movie_order, users })
}
