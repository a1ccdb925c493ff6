use tabled::Table;

use crate::{info, mapping, types::MappingTableRow};

pub async fn mapping(description: String) {
    let genre_mapping = mapping::weather_mapping(&description);
    let features = mapping::audio_features_for_weather(&description);

    let row = MappingTableRow {
        genres: genre_mapping.genres.join(", "),
        valence: format!("{:.1}", genre_mapping.valence),
        energy: format!("{:.1}", genre_mapping.energy),
        danceability: format!("{:.1}", genre_mapping.danceability),
        tempo: format!("{:.0} bpm", features.tempo),
    };
    println!("{}", Table::new([row]));

    info!(
        "Assistant genres: {}",
        mapping::assistant_weather_genres(&description).join(", ")
    );
    info!(
        "Mood suggestions: {}",
        mapping::mood_suggestions(Some(&description)).join(", ")
    );
    info!(
        "Fallback search: {}",
        mapping::fallback_search_term(&description)
    );
}
