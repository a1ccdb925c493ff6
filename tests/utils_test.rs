use moodmix::types::{Track, TrackAlbum, TrackArtist};
use moodmix::utils::*;

// Helper function to create a test track
fn create_test_track(id: &str, name: &str, artist_name: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{}", id),
        artists: vec![TrackArtist {
            id: Some(format!("{}_artist_id", id)),
            name: artist_name.to_string(),
        }],
        album: Some(TrackAlbum {
            name: format!("{} album", name),
            images: Vec::new(),
        }),
        duration_ms: 180_000,
        preview_url: None,
        external_urls: Default::default(),
    }
}

#[test]
fn test_generate_state_token() {
    let token = generate_state_token();

    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

    let token2 = generate_state_token();
    assert_ne!(token, token2);
}

#[test]
fn test_track_key() {
    let track = create_test_track("1", "Here Comes The Sun", "The Beatles");
    assert_eq!(track_key(&track), "here comes the sun-the beatles");

    let mut no_artist = create_test_track("2", "Intro", "x");
    no_artist.artists.clear();
    assert_eq!(track_key(&no_artist), "intro-");
}

#[test]
fn test_remove_duplicate_tracks() {
    let mut tracks = vec![
        create_test_track("1", "Song A", "Artist"),
        create_test_track("2", "Song B", "Artist"),
        // same id as the first one
        create_test_track("1", "Song A (Remastered)", "Artist"),
        // same name and artist as the second, different id and case
        create_test_track("3", "SONG B", "artist"),
        create_test_track("4", "Song C", "Other"),
    ];

    remove_duplicate_tracks(&mut tracks);

    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "4"]);
}

#[test]
fn test_remove_duplicate_tracks_keeps_first_occurrence() {
    let mut tracks = vec![
        create_test_track("b", "Same", "Band"),
        create_test_track("a", "Same", "Band"),
    ];
    remove_duplicate_tracks(&mut tracks);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, "b");
}

#[test]
fn test_format_location() {
    assert_eq!(
        format_location("Austin", Some("Texas"), Some("United States of America")),
        "Austin, Texas, USA"
    );
    assert_eq!(format_location("Paris", None, Some("FR")), "Paris, FR");
    assert_eq!(format_location("Berlin", Some("  "), Some("")), "Berlin");
    assert_eq!(format_location("", Some("Texas"), Some("US")), "");
}

#[test]
fn test_dedupe_labels() {
    let labels = vec![
        "Austin, Texas, USA".to_string(),
        String::new(),
        "Austin, TX, US".to_string(),
        "Austin, Texas, USA".to_string(),
    ];
    assert_eq!(
        dedupe_labels(labels),
        vec!["Austin, Texas, USA".to_string(), "Austin, TX, US".to_string()]
    );
}

#[test]
fn test_rank_suggestions() {
    let labels = vec![
        "New York, USA".to_string(),
        "York, GB".to_string(),
        "Yorktown, Virginia, USA".to_string(),
        "Paris, FR".to_string(),
    ];

    let ranked = rank_suggestions(labels, "york", 6);
    assert_eq!(
        ranked,
        vec![
            "York, GB".to_string(),
            "Yorktown, Virginia, USA".to_string(),
            "New York, USA".to_string(),
        ]
    );
}

#[test]
fn test_rank_suggestions_truncates() {
    let labels: Vec<String> = (0..10).map(|i| format!("Springfield {}", i)).collect();
    let ranked = rank_suggestions(labels, "spring", 6);
    assert_eq!(ranked.len(), 6);
    assert_eq!(ranked[0], "Springfield 0");
}

#[test]
fn test_clean_location() {
    assert_eq!(clean_location("  New   York  "), "New York");
    assert_eq!(clean_location("Austin,\tTX"), "Austin, TX");
}

#[test]
fn test_today_format() {
    let today = today();
    assert_eq!(today.len(), 10);
    assert_eq!(&today[4..5], "-");
    assert_eq!(&today[7..8], "-");
}

#[test]
fn test_track_table_rows() {
    let mut track = create_test_track("1", "Song", "First");
    track.artists.push(TrackArtist {
        id: None,
        name: "Second".to_string(),
    });

    let rows = track_table_rows(&[track]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Song");
    assert_eq!(rows[0].artists, "First, Second");
    assert_eq!(rows[0].album, "Song album");
}

#[test]
fn test_parse_genre_list_valid_inputs() {
    let list = parse_genre_list("pop").unwrap();
    assert_eq!(list.0, vec!["pop".to_string()]);

    let list = parse_genre_list("Indie Pop, jazz ,hip-hop").unwrap();
    assert_eq!(
        list.into_vec(),
        vec!["indie-pop".to_string(), "jazz".to_string(), "hip-hop".to_string()]
    );

    let list = parse_genre_list("r&b").unwrap();
    assert_eq!(list.to_string(), "r&b");
}

#[test]
fn test_parse_genre_list_invalid_inputs() {
    assert_eq!(
        parse_genre_list("   ").unwrap_err(),
        "genre list cannot be empty"
    );
    assert_eq!(
        parse_genre_list("pop,,jazz").unwrap_err(),
        "empty segment in genre list"
    );
    assert_eq!(
        parse_genre_list("pop,rock!").unwrap_err(),
        "invalid value 'rock!'"
    );
}

#[test]
fn test_parse_genre_list_deduplication() {
    let list = parse_genre_list("pop,POP, Pop").unwrap();
    assert_eq!(list.0, vec!["pop".to_string()]);
    assert!(!list.is_empty());
    assert_eq!(list.iter().count(), 1);
}
