use tracing::warn;

/// Genres the mood assistant is allowed to choose from.
pub const ASSISTANT_GENRES: &[&str] = &[
    "pop",
    "dance",
    "hip-hop",
    "party",
    "electronic",
    "happy",
    "energetic",
    "upbeat",
    "summer",
    "chill",
    "acoustic",
    "sad",
    "ambient",
    "melancholic",
    "jazz",
    "indie",
];

const DEFAULT_GENRES: &[&str] = &[
    "pop",
    "rock",
    "hip-hop",
    "electronic",
    "classical",
    "jazz",
    "indie",
    "r-n-b",
    "country",
    "metal",
];

pub fn assistant_genres() -> Vec<String> {
    ASSISTANT_GENRES.iter().map(|g| g.to_string()).collect()
}

/// Genre seeds that are known to work when the catalog's list is unavailable.
pub fn default_genres() -> Vec<String> {
    DEFAULT_GENRES.iter().map(|g| g.to_string()).collect()
}

/// Keeps the genres present in `available`, ignoring case.
///
/// An empty result is replaced by `pop` and `electronic`.
pub fn validate_genres(genres: &[String], available: &[String]) -> Vec<String> {
    let valid: Vec<String> = genres
        .iter()
        .filter(|genre| available.iter().any(|a| a.eq_ignore_ascii_case(genre)))
        .cloned()
        .collect();

    if valid.is_empty() {
        warn!(?genres, "no valid genres found, using defaults");
        return vec!["pop".to_string(), "electronic".to_string()];
    }
    valid
}
