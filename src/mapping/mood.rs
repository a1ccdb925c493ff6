//! Helpers behind the chat box: mood chips, greetings, quick actions and
//! simple intent detection on user messages.

const ACTIVITY_GENRES: &[(&str, &[&str])] = &[
    // food
    ("cookies", &["indie", "folk", "acoustic", "cozy"]),
    ("baking", &["indie", "folk", "acoustic", "warm"]),
    ("cooking", &["upbeat", "pop", "funk", "energetic"]),
    ("coffee", &["indie", "acoustic", "chill", "morning"]),
    ("wine", &["jazz", "lounge", "sophisticated", "evening"]),
    // activities
    ("study", &["lo-fi", "instrumental", "focus", "ambient"]),
    ("workout", &["electronic", "pop", "high-energy", "motivational"]),
    ("cleaning", &["upbeat", "pop", "dance", "energetic"]),
    ("driving", &["rock", "pop", "road-trip", "classic"]),
    ("walking", &["indie", "pop", "moderate", "peaceful"]),
    ("running", &["electronic", "pop", "high-energy", "motivational"]),
    // emotions
    ("happy", &["pop", "dance", "upbeat", "cheerful"]),
    ("sad", &["acoustic", "indie", "melancholic", "emotional"]),
    ("angry", &["rock", "metal", "intense", "aggressive"]),
    ("calm", &["ambient", "classical", "peaceful", "relaxing"]),
    ("excited", &["electronic", "pop", "dance", "high-energy"]),
    ("romantic", &["r&b", "soul", "love", "intimate"]),
    // time of day
    ("morning", &["acoustic", "indie", "gentle", "awakening"]),
    ("evening", &["jazz", "lounge", "chill", "sophisticated"]),
    ("night", &["ambient", "electronic", "mysterious", "late-night"]),
    ("party", &["dance", "pop", "electronic", "party"]),
    ("dinner", &["jazz", "acoustic", "sophisticated", "elegant"]),
    // focus
    ("focus", &["instrumental", "ambient", "concentration", "minimal"]),
    ("creative", &["instrumental", "electronic", "inspiring", "artistic"]),
    ("meditation", &["ambient", "new-age", "peaceful", "spiritual"]),
    ("sleep", &["ambient", "classical", "peaceful", "lullaby"]),
];

const ACTIVITY_RESPONSES: &[(&str, &str)] = &[
    ("cookies", "Here's your cozy baking playlist! Perfect for making cookies 🍪"),
    ("study", "Here's a focus-friendly playlist to help you concentrate 📚"),
    ("workout", "Let's get that energy up! Here's your workout playlist 💪"),
    ("cooking", "Time to cook up something delicious with these upbeat tunes! 👨‍🍳"),
    ("cleaning", "Here's some energetic music to make cleaning fun! 🧹"),
];

const SONG_INFO_KEYWORDS: &[&str] = &[
    "who is",
    "tell me about",
    "what's this song",
    "artist info",
    "song meaning",
    "album info",
    "when was this",
    "genre of",
    "similar to",
    "more like this",
    "about this track",
];

const MODIFICATION_KEYWORDS: &[&str] = &[
    "make it more",
    "add some",
    "less",
    "remove",
    "change to",
    "switch to",
    "more upbeat",
    "more chill",
    "faster",
    "slower",
];

const MAX_QUICK_ACTIONS: usize = 4;

fn owned(genres: &[&str]) -> Vec<String> {
    genres.iter().map(|g| g.to_string()).collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Genres for an activity or feeling mentioned by the user.
///
/// A direct key match wins, then the first key where either string contains
/// the other. Unknown activities get `pop`, `indie` and `chill`.
pub fn activity_genres(activity: &str) -> Vec<String> {
    let normalized = activity.to_lowercase();

    if let Some((_, genres)) = ACTIVITY_GENRES.iter().find(|(key, _)| *key == normalized) {
        return owned(genres);
    }

    ACTIVITY_GENRES
        .iter()
        .find(|(key, _)| normalized.contains(key) || key.contains(normalized.as_str()))
        .map(|(_, genres)| owned(genres))
        .unwrap_or_else(|| owned(&["pop", "indie", "chill"]))
}

/// Mood chips offered for the current weather.
pub fn mood_suggestions(description: Option<&str>) -> Vec<String> {
    let Some(description) = description else {
        return owned(&["happy", "chill", "energetic", "focus"]);
    };
    let weather = description.to_lowercase();

    let moods: &[&str] = if contains_any(&weather, &["rain", "drizzle"]) {
        &["cozy", "relaxed", "jazz", "acoustic"]
    } else if weather.contains("cloud") {
        &["indie", "chill", "pop", "alt"]
    } else if contains_any(&weather, &["clear", "sunny"]) {
        &["upbeat", "happy", "dance", "summer"]
    } else if contains_any(&weather, &["thunder", "storm"]) {
        &["epic", "rock", "intense", "dramatic"]
    } else if weather.contains("snow") {
        &["peaceful", "gentle", "ambient", "classical"]
    } else if contains_any(&weather, &["fog", "mist"]) {
        &["mysterious", "ethereal", "atmospheric", "ambient"]
    } else {
        &["chill", "focus", "upbeat", "relax"]
    };
    owned(moods)
}

/// Broader genre palette for a weather description, used by the chat UI.
pub fn chat_weather_genres(description: Option<&str>) -> Vec<String> {
    let Some(description) = description else {
        return owned(&["pop", "rock"]);
    };
    let weather = description.to_lowercase();

    let genres: &[&str] = if contains_any(&weather, &["rain", "drizzle"]) {
        &["ambient", "jazz", "piano", "acoustic", "cozy"]
    } else if weather.contains("cloud") {
        &["indie", "chill", "lofi", "indie-pop", "mellow"]
    } else if contains_any(&weather, &["clear", "sunny"]) {
        &["pop", "dance", "upbeat", "happy", "summer"]
    } else if contains_any(&weather, &["thunder", "storm"]) {
        &["rock", "electronic", "epic", "intense", "dramatic"]
    } else if weather.contains("snow") {
        &["classical", "ambient", "piano", "peaceful", "winter"]
    } else if contains_any(&weather, &["fog", "mist"]) {
        &["ambient", "atmospheric", "ethereal", "cinematic", "mysterious"]
    } else {
        &["pop", "indie", "electronic", "chill"]
    };
    owned(genres)
}

/// Greeting shown when the chat opens.
pub fn welcome_message(description: Option<&str>, location: Option<&str>) -> String {
    let (Some(description), Some(location)) = (description, location) else {
        return "Hello! I'm your music assistant. How can I help you with music today?"
            .to_string();
    };
    let weather = description.to_lowercase();
    let city = location.split(',').next().unwrap_or(location);

    if contains_any(&weather, &["rain", "drizzle"]) {
        format!("Perfect rainy day in {city}! ☔ Want some cozy music to match the weather?")
    } else if contains_any(&weather, &["clear", "sunny"]) {
        format!(
            "Beautiful clear day in {city}! ☀️ Ready for some upbeat music to match the sunshine?"
        )
    } else if weather.contains("cloud") {
        format!("Nice cloudy day in {city}! ☁️ Want to switch up the vibes or get a fresh playlist?")
    } else if weather.contains("snow") {
        format!("Snowy day in {city}! ❄️ How about some peaceful winter music?")
    } else if contains_any(&weather, &["storm", "thunder"]) {
        format!("Stormy weather in {city}! ⛈️ Want some dramatic music to match the energy?")
    } else {
        format!(
            "Hey there! The weather in {city} is {description}. What kind of music fits your mood today? 🎵"
        )
    }
}

/// Up to four suggested prompts for the chat box.
pub fn quick_actions(_genres: &[String], description: &str, has_music: bool) -> Vec<String> {
    let mut actions: Vec<&str> = Vec::new();

    if has_music {
        actions.extend(["Make it more upbeat", "Add some jazz", "More chill vibes"]);
    }

    let weather = description.to_lowercase();
    if weather.contains("rain") {
        actions.extend(["Cozy rain music", "Jazz for rainy days"]);
    } else if contains_any(&weather, &["sunny", "clear"]) {
        actions.extend(["Summer vibes", "Feel-good music"]);
    }

    actions.extend(["Study playlist", "Workout music", "Cooking tunes"]);
    actions.truncate(MAX_QUICK_ACTIONS);
    owned(&actions)
}

/// Message posted after a playlist has been generated for a mood.
pub fn follow_up_message(
    mood: Option<&str>,
    description: Option<&str>,
    location: Option<&str>,
    activity: Option<&str>,
) -> String {
    let (Some(mood), Some(description)) = (mood, description) else {
        return "Would you like to try a different genre of music?".to_string();
    };

    if let Some(response) = activity.and_then(|activity| {
        ACTIVITY_RESPONSES
            .iter()
            .find(|(key, _)| *key == activity)
            .map(|(_, response)| *response)
    }) {
        return response.to_string();
    }

    let mood_lower = mood.to_lowercase();
    if contains_any(&mood_lower, &["happy", "upbeat"]) {
        format!(
            "Here's your upbeat playlist for {}! 🎵",
            location.unwrap_or("today")
        )
    } else if contains_any(&mood_lower, &["chill", "relax"]) {
        "Perfect! Here's some chill music to match your mood 🎵".to_string()
    } else if contains_any(&mood_lower, &["focus", "work"]) {
        "Here's a focus-friendly playlist to help you concentrate 🎵".to_string()
    } else {
        format!(
            "Here's a {mood} playlist that should match the current {} weather! 🎵",
            description.to_lowercase()
        )
    }
}

/// Whether the message asks about a song or artist rather than for music.
pub fn is_song_info_request(message: &str) -> bool {
    contains_any(&message.to_lowercase(), SONG_INFO_KEYWORDS)
}

pub fn is_playlist_modification(message: &str) -> bool {
    contains_any(&message.to_lowercase(), MODIFICATION_KEYWORDS)
}
