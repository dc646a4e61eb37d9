//! Integration tests for the recommender.
//!
//! These build small hand-made datasets and check the observable contract
//! of the three queries end to end through `RecommenderSystem`.

use data_loader::{DataIndex, MovieFeatures, Rating, RatingsTable, UserRatings};
use recommender::{NormKey, RecommendError, RecommenderSystem};
use std::fs;
use std::sync::Arc;

fn build_system(movies: &[(&str, &[f64])], users: &[(&str, &[(&str, f64)])]) -> RecommenderSystem {
    let features = movies
        .iter()
        .map(|(name, features)| MovieFeatures {
            name: name.to_string(),
            features: features.to_vec(),
        })
        .collect();

    let table = RatingsTable {
        movie_order: movies.iter().map(|(name, _)| name.to_string()).collect(),
        users: users
            .iter()
            .map(|(user, ratings)| UserRatings {
                user: user.to_string(),
                ratings: ratings
                    .iter()
                    .map(|(movie, value)| Rating {
                        movie: movie.to_string(),
                        value: *value,
                    })
                    .collect(),
            })
            .collect(),
    };

    RecommenderSystem::new(Arc::new(DataIndex::from_tables(features, table).unwrap()))
}

/// Six movies in a four-feature space and a handful of users
fn create_catalog() -> RecommenderSystem {
    build_system(
        &[
            ("Alien", &[9.0, 1.0, 2.0, 8.0]),
            ("Amelie", &[1.0, 9.0, 7.0, 1.0]),
            ("Heat", &[8.0, 2.0, 1.0, 6.0]),
            ("Notebook", &[1.0, 8.0, 9.0, 2.0]),
            ("Predator", &[9.0, 1.0, 1.0, 9.0]),
            ("Up", &[3.0, 7.0, 6.0, 2.0]),
        ],
        &[
            ("alice", &[("Alien", 5.0), ("Amelie", 1.0), ("Heat", 4.0)]),
            ("bob", &[("Amelie", 5.0), ("Notebook", 4.0), ("Predator", 1.0)]),
            ("carol", &[("Up", 3.0)]),
            (
                "dave",
                &[
                    ("Alien", 2.0),
                    ("Amelie", 3.0),
                    ("Heat", 4.0),
                    ("Notebook", 5.0),
                    ("Predator", 1.0),
                    ("Up", 2.0),
                ],
            ),
        ],
    )
}

#[test]
fn test_content_scenario_single_candidate() {
    let system = build_system(
        &[("A", &[1.0, 0.0]), ("B", &[0.0, 1.0]), ("C", &[1.0, 1.0])],
        &[("user", &[("A", 5.0), ("B", 1.0)])],
    );

    assert_eq!(system.recommend_by_content("user").unwrap().as_deref(), Some("C"));
}

#[test]
fn test_content_follows_taste() {
    let system = create_catalog();

    // alice likes action and dislikes romance
    let movie = system.recommend_by_content("alice").unwrap();
    assert_eq!(movie.as_deref(), Some("Predator"));

    // bob is the opposite
    let movie = system.recommend_by_content("bob").unwrap();
    assert_eq!(movie.as_deref(), Some("Up"));

    // A single rating equals its own mean, so the taste vector is zero
    assert_eq!(system.recommend_by_content("carol").unwrap(), None);
    assert_eq!(system.recommend_by_cf("carol", 3).unwrap().as_deref(), Some("Alien"));
}

#[test]
fn test_recommendations_skip_rated_movies() {
    let system = create_catalog();

    for user in ["alice", "bob", "carol"] {
        let ratings = system.data_index().get_user_ratings(user).unwrap();

        if let Some(movie) = system.recommend_by_content(user).unwrap() {
            assert!(!ratings.contains_key(&movie), "{user} already rated {movie}");
        }
        for k in 1..=4 {
            if let Some(movie) = system.recommend_by_cf(user, k).unwrap() {
                assert!(!ratings.contains_key(&movie), "{user} already rated {movie}");
                assert!(system.predict_score(&movie, user, k).unwrap() > 0.0);
            }
        }
    }
}

#[test]
fn test_user_who_rated_everything_gets_nothing() {
    let system = create_catalog();

    assert_eq!(system.recommend_by_content("dave").unwrap(), None);
    assert_eq!(system.recommend_by_cf("dave", 3).unwrap(), None);
}

#[test]
fn test_predict_single_neighbor() {
    // similarity(T, R) = 0.8
    let system = build_system(
        &[("T", &[1.0, 0.0]), ("R", &[0.8, 0.6])],
        &[("user", &[("R", 4.0)])],
    );

    assert_eq!(system.predict_score("T", "user", 1).unwrap(), 4.0);
}

#[test]
fn test_predict_large_k_uses_every_rating() {
    let system = create_catalog();
    let features = system.data_index().features();
    let engine = system.similarity_engine();

    let ratings = system.data_index().get_user_ratings("alice").unwrap();
    let (weighted, total) = ratings.iter().fold((0.0, 0.0), |(w, t), (movie, &rating)| {
        let s = engine.movie_similarity(features, "Up", movie).unwrap();
        (w + s * rating, t + s)
    });
    let expected = weighted / total;

    for k in [3, 4, 100] {
        let score = system.predict_score("Up", "alice", k).unwrap();
        assert!((score - expected).abs() < 1e-12, "k = {k}");
    }
}

#[test]
fn test_cf_requires_positive_score() {
    // Every rating is negative, so every prediction is negative too
    let system = build_system(
        &[("A", &[1.0, 0.2]), ("B", &[0.2, 1.0]), ("C", &[1.0, 1.0])],
        &[("grump", &[("A", -2.0), ("B", -3.0)])],
    );

    assert!(system.predict_score("C", "grump", 2).unwrap() < 0.0);
    assert_eq!(system.recommend_by_cf("grump", 2).unwrap(), None);
}

#[test]
fn test_tie_break_first_in_order() {
    // Twin and Clone share features, so they always score the same
    let movies: &[(&str, &[f64])] = &[
        ("Liked", &[1.0, 0.0]),
        ("Disliked", &[0.0, 1.0]),
        ("Twin", &[0.9, 0.2]),
        ("Clone", &[0.9, 0.2]),
    ];
    let users: &[(&str, &[(&str, f64)])] = &[("user", &[("Liked", 5.0), ("Disliked", 1.0)])];

    let system = build_system(movies, users);
    assert_eq!(system.recommend_by_content("user").unwrap().as_deref(), Some("Twin"));
    assert_eq!(system.recommend_by_cf("user", 2).unwrap().as_deref(), Some("Twin"));

    // Swapping the two in the movie order swaps the winner
    let swapped = [movies[0], movies[1], movies[3], movies[2]];
    let system = build_system(&swapped, users);
    assert_eq!(system.recommend_by_content("user").unwrap().as_deref(), Some("Clone"));
    assert_eq!(system.recommend_by_cf("user", 2).unwrap().as_deref(), Some("Clone"));
}

#[test]
fn test_unknown_user_and_movie() {
    let system = create_catalog();

    let err = system.recommend_by_content("ghost").unwrap_err();
    assert!(matches!(err, RecommendError::UserNotFound { .. }));

    let err = system.recommend_by_cf("ghost", 3).unwrap_err();
    assert!(matches!(err, RecommendError::UserNotFound { .. }));

    let err = system.predict_score("any", "ghost", 3).unwrap_err();
    assert!(err.is_not_found());

    let err = system.predict_score("ghostMovie", "alice", 3).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_user_without_ratings() {
    let system = build_system(
        &[("A", &[1.0, 0.0]), ("B", &[0.0, 1.0])],
        &[("newcomer", &[])],
    );

    assert_eq!(system.recommend_by_content("newcomer").unwrap(), None);
    assert!(system.predict_score("A", "newcomer", 3).unwrap().is_nan());
    assert_eq!(system.recommend_by_cf("newcomer", 3).unwrap(), None);
}

#[test]
fn test_loaded_user_with_only_no_rating_columns_is_unknown() {
    let dir = tempfile::TempDir::new().unwrap();
    let attributes = dir.path().join("movies_features.txt");
    let ratings = dir.path().join("ratings.txt");
    fs::write(&attributes, "A 1 0\nB 0 1\n").unwrap();
    fs::write(&ratings, "A B\nalice 5 NA\nbob NA NA\n").unwrap();

    let system = RecommenderSystem::load(&attributes, &ratings).unwrap();

    let err = system.recommend_by_content("bob").unwrap_err();
    assert!(matches!(err, RecommendError::UserNotFound { .. }));
    let err = system.recommend_by_cf("bob", 3).unwrap_err();
    assert!(matches!(err, RecommendError::UserNotFound { .. }));
    let err = system.predict_score("A", "bob", 3).unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(system.recommend_by_content("alice").unwrap().as_deref(), Some("B"));
}

#[test]
fn test_zero_feature_vector_never_recommended() {
    let system = build_system(
        &[("Blank", &[0.0, 0.0]), ("A", &[1.0, 0.0]), ("B", &[0.0, 1.0]), ("C", &[1.0, 1.0])],
        &[("user", &[("A", 5.0), ("B", 1.0)])],
    );

    let features = system.data_index().features();
    let sim = system.similarity_engine().movie_similarity(features, "Blank", "A").unwrap();
    assert!(sim.is_nan());

    // Blank comes first but its NaN similarity never beats the sentinel
    assert_eq!(system.recommend_by_content("user").unwrap().as_deref(), Some("C"));
}

#[test]
fn test_zero_weight_sum_is_infinite() {
    // Pos and Neg are equally similar to T with opposite signs
    let system = build_system(
        &[("T", &[1.0, 0.0]), ("Pos", &[1.0, 1.0]), ("Neg", &[-1.0, 1.0])],
        &[("user", &[("Pos", 5.0), ("Neg", 1.0)])],
    );

    let score = system.predict_score("T", "user", 2).unwrap();
    assert_eq!(score, f64::INFINITY);

    // +inf is above zero, so it is recommended
    assert_eq!(system.recommend_by_cf("user", 2).unwrap().as_deref(), Some("T"));
}

#[test]
fn test_norms_are_shared_and_memoized() {
    let system = create_catalog();
    let cache = system.similarity_engine().norm_cache();

    system.recommend_by_cf("alice", 2).unwrap();
    let cached = cache.len();
    let computed = cache.computations();
    assert!(cached <= 6);

    // Same query again: every movie norm comes from the cache
    system.recommend_by_cf("alice", 2).unwrap();
    assert_eq!(cache.len(), cached);
    assert_eq!(cache.computations(), computed);

    // The content query only adds its own taste vector computations
    let before = cache.computations();
    system.recommend_by_content("alice").unwrap();
    assert_eq!(cache.computations(), before + 3);
    assert_eq!(
        cache.norm(&[9.0, 1.0, 2.0, 8.0], NormKey::Movie("Alien")).to_bits(),
        cache.get("Alien").unwrap().to_bits()
    );
}

#[test]
fn test_recommend_all_matches_single_queries() {
    let system = create_catalog().with_default_k(2);
    let all = system.recommend_all().unwrap();

    let users: Vec<&str> = all.iter().map(|r| r.user.as_str()).collect();
    assert_eq!(users, vec!["alice", "bob", "carol", "dave"]);

    for rec in &all {
        assert_eq!(rec.by_content, system.recommend_by_content(&rec.user).unwrap());
        assert_eq!(rec.by_cf, system.recommend_by_cf(&rec.user, 2).unwrap());
    }
}
