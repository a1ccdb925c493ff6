use moodmix::mapping::*;
use rand::{SeedableRng, rngs::StdRng};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const RAIN_POOL: &[&str] = &[
    "indie acoustic 2024",
    "chill alternative",
    "mellow indie rock",
    "acoustic indie folk",
    "rainy day indie",
    "soft alternative rock",
    "indie ballads",
    "mellow acoustic music",
    "chill indie songs",
];

const DEFAULT_POOL: &[&str] = &[
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

#[test]
fn test_weather_mapping_exact_match() {
    let mapping = weather_mapping("light rain");
    assert_eq!(mapping.genres, &["chill", "ambient", "piano"]);
    assert_eq!(mapping.valence, 0.4);
    assert_eq!(mapping.energy, 0.3);
    assert_eq!(mapping.danceability, 0.3);
}

#[test]
fn test_weather_mapping_normalizes_input() {
    assert_eq!(weather_mapping("  Heavy Rain "), weather_mapping("heavy rain"));
}

#[test]
fn test_weather_mapping_partial_match_uses_table_order() {
    // "clear" is listed before "few clouds"
    let mapping = weather_mapping("clear with few clouds");
    assert_eq!(mapping.genres, &["pop", "dance", "electronic"]);

    let mapping = weather_mapping("thunderstorm with light rain");
    assert_eq!(mapping.genres, &["chill", "ambient", "piano"]);
}

#[test]
fn test_weather_mapping_default() {
    let mapping = weather_mapping("volcanic ash");
    assert_eq!(mapping, weather_mapping("clear sky"));
    assert_eq!(mapping.valence, 0.8);
}

#[test]
fn test_weather_mappings_table() {
    let keys: Vec<&str> = WEATHER_MAPPINGS.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys.len(), 13);
    assert_eq!(keys[0], "clear sky");
    assert_eq!(keys[12], "fog");
}

#[test]
fn test_audio_features_for_weather() {
    let rain = audio_features_for_weather("light drizzle");
    assert_eq!((rain.valence, rain.energy, rain.tempo), (0.3, 0.4, 100.0));

    let sunny = audio_features_for_weather("Sunny");
    assert_eq!((sunny.valence, sunny.energy, sunny.tempo), (0.8, 0.7, 120.0));

    let storm = audio_features_for_weather("storm");
    assert_eq!((storm.valence, storm.energy, storm.tempo), (0.5, 0.9, 140.0));

    let snow = audio_features_for_weather("light snow");
    assert_eq!((snow.valence, snow.energy, snow.tempo), (0.6, 0.3, 80.0));

    let other = audio_features_for_weather("haze");
    assert_eq!((other.valence, other.energy, other.tempo), (0.6, 0.6, 110.0));
}

#[test]
fn test_catalog_genres_for_weather() {
    let available = strings(&["ambient", "piano", "pop", "rock"]);
    assert_eq!(
        catalog_genres_for_weather("light rain", &available),
        strings(&["ambient", "piano"])
    );

    // unknown descriptions use clear sky
    assert_eq!(
        catalog_genres_for_weather("sandstorm", &available),
        strings(&["pop"])
    );

    // nothing matches, fall back to pop/rock filtered by availability
    let available = strings(&["rock", "metal"]);
    assert_eq!(
        catalog_genres_for_weather("fog", &available),
        strings(&["rock"])
    );
    assert!(catalog_genres_for_weather("fog", &[]).is_empty());
}

#[test]
fn test_validate_genres() {
    let available = strings(&["Pop", "Jazz", "indie"]);
    assert_eq!(
        validate_genres(&strings(&["pop", "jazz", "polka"]), &available),
        strings(&["pop", "jazz"])
    );
    assert_eq!(
        validate_genres(&strings(&["polka"]), &available),
        strings(&["pop", "electronic"])
    );
}

#[test]
fn test_default_and_assistant_genres() {
    let defaults = default_genres();
    assert_eq!(defaults.len(), 10);
    assert_eq!(defaults[0], "pop");
    assert_eq!(defaults[9], "metal");

    let assistant = assistant_genres();
    assert_eq!(assistant.len(), 16);
    assert!(assistant.contains(&"melancholic".to_string()));
    assert!(!assistant.contains(&"rock".to_string()));
}

#[test]
fn test_assistant_weather_genres() {
    assert_eq!(
        assistant_weather_genres("moderate rain"),
        strings(&["ambient", "jazz", "melancholic"])
    );
    assert_eq!(
        assistant_weather_genres("snow"),
        strings(&["pop", "happy", "summer"])
    );
}

#[test]
fn test_search_queries_for_mood() {
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(
        search_queries("Happy", Source::Mood, &mut rng),
        strings(&["happy music 2024", "happy songs", "happy indie"])
    );
}

#[test]
fn test_search_queries_for_weather_pool() {
    let mut rng = StdRng::seed_from_u64(42);
    let queries = search_queries("Moderate Rain", Source::Weather, &mut rng);

    assert_eq!(queries.len(), 3);
    assert!(queries.iter().all(|q| RAIN_POOL.contains(&q.as_str())));

    let mut unique = queries.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 3);
}

#[test]
fn test_search_queries_default_pool() {
    let mut rng = StdRng::seed_from_u64(1);
    let queries = search_queries("haze", Source::Weather, &mut rng);
    assert_eq!(queries.len(), 3);
    assert!(queries.iter().all(|q| DEFAULT_POOL.contains(&q.as_str())));
}

#[test]
fn test_source_parse() {
    assert_eq!(Source::parse(Some("mood")), Source::Mood);
    assert_eq!(Source::parse(Some("weather")), Source::Weather);
    assert_eq!(Source::parse(None), Source::Weather);
}

#[test]
fn test_fallback_search_term() {
    assert_eq!(fallback_search_term("light rain"), "indie acoustic 2024");
    assert_eq!(fallback_search_term("clear sky"), "upbeat indie pop");
    assert_eq!(fallback_search_term("sunny"), "summer indie hits");
    assert_eq!(fallback_search_term("thunderstorm"), "intense alternative rock");
    assert_eq!(fallback_search_term("snow"), "peaceful indie folk");
    assert_eq!(fallback_search_term("overcast clouds"), "modern indie alternative");
    assert_eq!(fallback_search_term("haze"), "indie alternative 2024");
}

#[test]
fn test_activity_genres() {
    assert_eq!(
        activity_genres("Study"),
        strings(&["lo-fi", "instrumental", "focus", "ambient"])
    );
    // the message contains a key
    assert_eq!(
        activity_genres("baking cookies tonight"),
        strings(&["indie", "folk", "acoustic", "cozy"])
    );
    // a key contains the message
    assert_eq!(
        activity_genres("work"),
        strings(&["electronic", "pop", "high-energy", "motivational"])
    );
    assert_eq!(
        activity_genres("quantum physics"),
        strings(&["pop", "indie", "chill"])
    );
}

#[test]
fn test_mood_suggestions() {
    assert_eq!(
        mood_suggestions(None),
        strings(&["happy", "chill", "energetic", "focus"])
    );
    assert_eq!(
        mood_suggestions(Some("light rain")),
        strings(&["cozy", "relaxed", "jazz", "acoustic"])
    );
    assert_eq!(
        mood_suggestions(Some("mist")),
        strings(&["mysterious", "ethereal", "atmospheric", "ambient"])
    );
}

#[test]
fn test_chat_weather_genres() {
    assert_eq!(chat_weather_genres(None), strings(&["pop", "rock"]));
    assert_eq!(
        chat_weather_genres(Some("Snow")),
        strings(&["classical", "ambient", "piano", "peaceful", "winter"])
    );
}

#[test]
fn test_welcome_message() {
    assert_eq!(
        welcome_message(None, Some("Austin")),
        "Hello! I'm your music assistant. How can I help you with music today?"
    );
    assert_eq!(
        welcome_message(Some("light rain"), Some("Seattle, Washington, USA")),
        "Perfect rainy day in Seattle! ☔ Want some cozy music to match the weather?"
    );
    assert_eq!(
        welcome_message(Some("haze"), Some("Delhi, IN")),
        "Hey there! The weather in Delhi is haze. What kind of music fits your mood today? 🎵"
    );
}

#[test]
fn test_quick_actions() {
    let actions = quick_actions(&[], "light rain", true);
    assert_eq!(
        actions,
        strings(&[
            "Make it more upbeat",
            "Add some jazz",
            "More chill vibes",
            "Cozy rain music"
        ])
    );

    let actions = quick_actions(&[], "clear sky", false);
    assert_eq!(
        actions,
        strings(&[
            "Summer vibes",
            "Feel-good music",
            "Study playlist",
            "Workout music"
        ])
    );

    let actions = quick_actions(&[], "", false);
    assert_eq!(
        actions,
        strings(&["Study playlist", "Workout music", "Cooking tunes"])
    );
}

#[test]
fn test_follow_up_message() {
    assert_eq!(
        follow_up_message(None, Some("rain"), None, None),
        "Would you like to try a different genre of music?"
    );
    assert_eq!(
        follow_up_message(Some("chill"), Some("rain"), None, Some("study")),
        "Here's a focus-friendly playlist to help you concentrate 📚"
    );
    assert_eq!(
        follow_up_message(Some("Happy"), Some("rain"), Some("Austin"), None),
        "Here's your upbeat playlist for Austin! 🎵"
    );
    assert_eq!(
        follow_up_message(Some("dreamy"), Some("Light Rain"), None, None),
        "Here's a dreamy playlist that should match the current light rain weather! 🎵"
    );
}

#[test]
fn test_message_intent_detection() {
    assert!(is_song_info_request("Who is this artist?"));
    assert!(!is_song_info_request("play something happy"));

    assert!(is_playlist_modification("Make it more upbeat please"));
    assert!(is_playlist_modification("less sad stuff"));
    assert!(!is_playlist_modification("hello"));
}
