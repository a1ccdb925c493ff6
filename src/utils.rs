use std::{cmp::Ordering, collections::HashSet, fmt};

use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};

use crate::types::{Track, TrackTableRow};

/// Random alphanumeric token used for the OAuth `state` parameter.
pub fn generate_state_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Key used to spot the same song released under different track ids.
pub fn track_key(track: &Track) -> String {
    let artist = track
        .artists
        .first()
        .map(|a| a.name.to_lowercase())
        .unwrap_or_default();
    format!("{}-{}", track.name.to_lowercase(), artist)
}

/// Drops tracks whose id or name/first-artist key was already seen.
///
/// The first occurrence wins and the relative order is kept.
pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    let mut seen_keys = HashSet::new();
    tracks.retain(|track| {
        let id_new = !seen_ids.contains(&track.id);
        let key = track_key(track);
        let key_new = !seen_keys.contains(&key);
        seen_ids.insert(track.id.clone());
        seen_keys.insert(key);
        id_new && key_new
    });
}

/// Location label shown in suggestion lists, e.g. "Austin, Texas, USA".
pub fn format_location(city: &str, state: Option<&str>, country: Option<&str>) -> String {
    if city.is_empty() {
        return String::new();
    }

    let mut parts = vec![city.to_string()];
    if let Some(state) = state.filter(|s| !s.trim().is_empty()) {
        parts.push(state.to_string());
    }
    match country {
        Some("United States of America") => parts.push("USA".to_string()),
        Some(c) if !c.trim().is_empty() => parts.push(c.to_string()),
        _ => {}
    }
    parts.join(", ")
}

/// Removes empty and repeated labels, keeping first occurrences in order.
pub fn dedupe_labels(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(l.clone()))
        .collect()
}

/// Filters labels to those containing `query` and ranks prefix matches first.
pub fn rank_suggestions(labels: Vec<String>, query: &str, max: usize) -> Vec<String> {
    let query = query.to_lowercase();
    let mut matches: Vec<String> = labels
        .into_iter()
        .filter(|l| l.to_lowercase().contains(&query))
        .collect();

    matches.sort_by(|a, b| {
        let a_starts = a.to_lowercase().starts_with(&query);
        let b_starts = b.to_lowercase().starts_with(&query);
        match (a_starts, b_starts) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.cmp(b),
        }
    });
    matches.truncate(max);
    matches
}

/// Trims a user supplied location and collapses inner whitespace.
pub fn clean_location(location: &str) -> String {
    location.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

pub fn track_table_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .map(|t| TrackTableRow {
            name: t.name.clone(),
            artists: t
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album: t.album.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
        })
        .collect()
}

/// Ordered, de-duplicated list of genre names given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreList(pub Vec<String>);

impl GenreList {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for GenreList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Parses `"pop, indie pop,jazz"` into `["pop", "indie-pop", "jazz"]`.
///
/// Names are lowercased and inner spaces become hyphens, matching the
/// catalog's genre seed spelling.
pub fn parse_genre_list(s: &str) -> Result<GenreList, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("genre list cannot be empty".to_string());
    }

    let mut out: Vec<String> = Vec::new();
    for raw in s.split(',') {
        let name = raw.trim();
        if name.is_empty() {
            return Err("empty segment in genre list".to_string());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ' || c == '&')
        {
            return Err(format!("invalid value '{name}'"));
        }
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    Ok(GenreList(out))
}
