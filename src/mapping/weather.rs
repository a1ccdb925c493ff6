use rand::{Rng, seq::SliceRandom};
use serde::Serialize;
use tracing::debug;

use super::Source;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherGenreMapping {
    pub genres: &'static [&'static str],
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
}

/// Target audio features passed to the recommendations endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioFeatures {
    pub valence: f64,
    pub energy: f64,
    pub tempo: f64,
}

const fn mapping(genres: &'static [&'static str], level: (f64, f64, f64)) -> WeatherGenreMapping {
    WeatherGenreMapping {
        genres,
        valence: level.0,
        energy: level.1,
        danceability: level.2,
    }
}

const CLEAR: WeatherGenreMapping = mapping(&["pop", "dance", "electronic"], (0.8, 0.8, 0.7));
const DEFAULT_CONDITION: &str = "clear sky";

/// Ordered: partial matching picks the first key contained in the input.
pub const WEATHER_MAPPINGS: &[(&str, WeatherGenreMapping)] = &[
    ("clear sky", CLEAR),
    ("clear", CLEAR),
    ("few clouds", mapping(&["indie", "pop", "electronic"], (0.6, 0.6, 0.6))),
    ("scattered clouds", mapping(&["indie", "pop", "electronic"], (0.5, 0.5, 0.5))),
    ("broken clouds", mapping(&["indie", "ambient", "electronic"], (0.4, 0.4, 0.4))),
    ("overcast clouds", mapping(&["indie", "ambient", "electronic"], (0.4, 0.4, 0.4))),
    ("light rain", mapping(&["chill", "ambient", "piano"], (0.4, 0.3, 0.3))),
    ("moderate rain", mapping(&["classical", "ambient", "piano"], (0.3, 0.3, 0.3))),
    ("heavy rain", mapping(&["classical", "ambient", "piano"], (0.2, 0.2, 0.2))),
    ("thunderstorm", mapping(&["rock", "electronic"], (0.6, 0.8, 0.4))),
    ("snow", mapping(&["classical", "ambient"], (0.4, 0.3, 0.3))),
    ("mist", mapping(&["ambient", "electronic"], (0.4, 0.4, 0.4))),
    ("fog", mapping(&["ambient", "electronic"], (0.4, 0.4, 0.4))),
];

const CATALOG_GENRES: &[(&str, &[&str])] = &[
    ("clear sky", &["pop", "dance", "electronic", "summer"]),
    ("few clouds", &["indie", "indie-pop", "chill"]),
    ("scattered clouds", &["alternative", "indie", "pop"]),
    ("broken clouds", &["indie", "folk", "chill"]),
    ("overcast clouds", &["ambient", "study", "chill"]),
    ("light rain", &["acoustic", "ambient", "piano"]),
    ("moderate rain", &["classical", "jazz", "rainy-day"]),
    ("heavy rain", &["sleep", "ambient", "piano"]),
    ("thunderstorm", &["rock", "electronic", "epic"]),
    ("snow", &["classical", "ambient", "piano"]),
    ("mist", &["ambient", "atmospheric", "ethereal"]),
    ("fog", &["ambient", "atmospheric", "ethereal"]),
];

const ASSISTANT_WEATHER_GENRES: &[(&str, &[&str])] = &[
    ("clear sky", &["pop", "happy", "summer"]),
    ("few clouds", &["indie", "pop", "upbeat"]),
    ("scattered clouds", &["chill", "electronic", "indie"]),
    ("broken clouds", &["indie", "electronic", "ambient"]),
    ("light rain", &["acoustic", "jazz", "melancholic"]),
    ("moderate rain", &["ambient", "jazz", "melancholic"]),
    ("heavy rain", &["electronic", "ambient", "melancholic"]),
    ("overcast clouds", &["indie", "ambient", "electronic"]),
];

const SEARCH_POOLS: &[(&str, [&str; 9])] = &[
    (
        "rain",
        [
            "indie acoustic 2024",
            "chill alternative",
            "mellow indie rock",
            "acoustic indie folk",
            "rainy day indie",
            "soft alternative rock",
            "indie ballads",
            "mellow acoustic music",
            "chill indie songs",
        ],
    ),
    (
        "drizzle",
        [
            "soft indie pop",
            "acoustic indie music",
            "mellow indie songs",
            "chill indie folk",
            "gentle alternative",
            "soft acoustic rock",
            "indie chill music",
            "mellow indie rock",
            "peaceful indie",
        ],
    ),
    (
        "cloud",
        [
            "indie alternative rock",
            "modern indie music",
            "alternative pop 2024",
            "atmospheric indie rock",
            "moody alternative",
            "indie rock 2024",
            "alternative indie music",
            "modern alternative rock",
            "atmospheric pop",
        ],
    ),
    (
        "overcast",
        [
            "moody indie rock",
            "alternative music",
            "atmospheric indie",
            "dark indie alternative",
            "brooding indie rock",
            "melancholic alternative",
            "indie rock atmospheric",
            "moody alternative rock",
            "introspective indie",
        ],
    ),
    (
        "clear",
        [
            "upbeat indie pop",
            "feel good indie",
            "modern pop rock",
            "energetic indie music",
            "happy indie songs",
            "uplifting alternative",
            "bright indie pop",
            "positive indie rock",
            "cheerful alternative",
        ],
    ),
    (
        "sunny",
        [
            "summer indie hits",
            "upbeat alternative",
            "feel good music 2024",
            "sunny indie pop",
            "energetic indie rock",
            "happy alternative music",
            "uplifting indie songs",
            "bright alternative rock",
            "positive indie",
        ],
    ),
    (
        "storm",
        [
            "intense indie rock",
            "powerful alternative",
            "energetic music",
            "dramatic indie rock",
            "intense alternative rock",
            "powerful indie music",
            "epic indie songs",
            "high energy alternative",
            "driving indie rock",
        ],
    ),
    (
        "snow",
        [
            "peaceful indie folk",
            "acoustic alternative music",
            "calm indie songs",
            "winter indie music",
            "serene acoustic",
            "peaceful alternative",
            "gentle indie folk",
            "tranquil indie music",
            "soft indie acoustic",
        ],
    ),
];

const DEFAULT_SEARCH_POOL: [&str; 9] = [
    "indie alternative 2024",
    "modern indie rock",
    "popular alternative music",
    "indie pop 2024",
    "alternative rock music",
    "contemporary indie",
    "indie music 2024",
    "modern alternative",
    "popular indie songs",
];

const QUERIES_PER_SEARCH: usize = 3;

fn lookup<'a, T>(table: &'a [(&str, T)], key: &str) -> Option<&'a T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
}

/// Genres and feature targets for a weather description.
///
/// Exact key first, then the first key contained in the description, then
/// `clear sky`.
pub fn weather_mapping(description: &str) -> WeatherGenreMapping {
    let normalized = description.trim().to_lowercase();

    if let Some(mapping) = lookup(WEATHER_MAPPINGS, &normalized) {
        debug!(%normalized, "exact weather match");
        return *mapping;
    }

    match WEATHER_MAPPINGS
        .iter()
        .find(|(key, _)| normalized.contains(key))
    {
        Some((key, mapping)) => {
            debug!(%normalized, matched = key, "partial weather match");
            *mapping
        }
        None => {
            debug!(%normalized, "no weather match, using {DEFAULT_CONDITION}");
            CLEAR
        }
    }
}

pub fn audio_features_for_weather(description: &str) -> AudioFeatures {
    let weather = description.to_lowercase();
    let (valence, energy, tempo) = if weather.contains("rain") || weather.contains("drizzle") {
        (0.3, 0.4, 100.0)
    } else if weather.contains("clear") || weather.contains("sunny") {
        (0.8, 0.7, 120.0)
    } else if weather.contains("storm") {
        (0.5, 0.9, 140.0)
    } else if weather.contains("snow") {
        (0.6, 0.3, 80.0)
    } else {
        (0.6, 0.6, 110.0)
    };
    AudioFeatures {
        valence,
        energy,
        tempo,
    }
}

/// Catalog genres for a weather description that the catalog actually accepts.
///
/// Falls back to whichever of `pop` and `rock` is available, which may be
/// nothing at all.
pub fn catalog_genres_for_weather(description: &str, available: &[String]) -> Vec<String> {
    let normalized = description.to_lowercase();
    let genres = lookup(CATALOG_GENRES, &normalized)
        .or_else(|| lookup(CATALOG_GENRES, DEFAULT_CONDITION))
        .copied()
        .unwrap_or_default();

    let valid = keep_available(genres, available);
    if valid.is_empty() {
        return keep_available(&["pop", "rock"], available);
    }
    valid
}

fn keep_available(genres: &[&str], available: &[String]) -> Vec<String> {
    genres
        .iter()
        .filter(|g| available.iter().any(|a| a == *g))
        .map(|g| g.to_string())
        .collect()
}

pub fn assistant_weather_genres(description: &str) -> Vec<String> {
    lookup(ASSISTANT_WEATHER_GENRES, description)
        .or_else(|| lookup(ASSISTANT_WEATHER_GENRES, DEFAULT_CONDITION))
        .map(|genres| genres.iter().map(|g| g.to_string()).collect())
        .unwrap_or_default()
}

/// Three keyword searches for a description.
///
/// Moods produce fixed queries around the mood word. Weather descriptions
/// pick the pool of the first matching condition and draw three queries at
/// random.
pub fn search_queries<R: Rng + ?Sized>(
    description: &str,
    source: Source,
    rng: &mut R,
) -> Vec<String> {
    let lowered = description.to_lowercase();

    if source == Source::Mood {
        return vec![
            format!("{lowered} music 2024"),
            format!("{lowered} songs"),
            format!("{lowered} indie"),
        ];
    }

    let pool = SEARCH_POOLS
        .iter()
        .find(|(condition, _)| lowered.contains(condition))
        .map(|(_, queries)| queries)
        .unwrap_or(&DEFAULT_SEARCH_POOL);

    let mut queries: Vec<&str> = pool.to_vec();
    queries.shuffle(rng);
    queries
        .into_iter()
        .take(QUERIES_PER_SEARCH)
        .map(str::to_string)
        .collect()
}

pub fn fallback_search_term(description: &str) -> &'static str {
    let weather = description.to_lowercase();
    if weather.contains("rain") {
        "indie acoustic 2024"
    } else if weather.contains("clear") {
        "upbeat indie pop"
    } else if weather.contains("sunny") {
        "summer indie hits"
    } else if weather.contains("storm") {
        "intense alternative rock"
    } else if weather.contains("snow") {
        "peaceful indie folk"
    } else if weather.contains("cloud") || weather.contains("overcast") {
        "modern indie alternative"
    } else {
        "indie alternative 2024"
    }
}

