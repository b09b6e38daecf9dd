use tunebridge::{spotify, youtube};

#[test]
fn test_spotify_web_url() {
    let id = spotify::extract_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M");
    assert_eq!(id, Some("37i9dQZF1DXcBWIGoYBM5M".to_string()));
}

#[test]
fn test_spotify_web_url_with_query() {
    let id = spotify::extract_playlist_id(
        "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123",
    );
    assert_eq!(id, Some("37i9dQZF1DXcBWIGoYBM5M".to_string()));
}

#[test]
fn test_spotify_uri() {
    let id = spotify::extract_playlist_id("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M");
    assert_eq!(id, Some("37i9dQZF1DXcBWIGoYBM5M".to_string()));
}

#[test]
fn test_spotify_bare_id_rejected() {
    assert_eq!(spotify::extract_playlist_id("37i9dQZF1DXcBWIGoYBM5M"), None);
}

#[test]
fn test_spotify_non_playlist_url_rejected() {
    assert_eq!(
        spotify::extract_playlist_id("https://open.spotify.com/album/4aawyAB9vmqN3uQ7FjRGTy"),
        None
    );
    assert_eq!(spotify::extract_playlist_id("https://open.spotify.com/playlist/"), None);
}

#[test]
fn test_youtube_playlist_url() {
    let id = youtube::extract_playlist_id(
        "https://www.youtube.com/playlist?list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG",
    );
    assert_eq!(id, Some("PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG".to_string()));
}

#[test]
fn test_youtube_watch_url_with_list() {
    let id = youtube::extract_playlist_id(
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG",
    );
    assert_eq!(id, Some("PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG".to_string()));
}

#[test]
fn test_youtube_short_url_with_list() {
    let id = youtube::extract_playlist_id("https://youtu.be/dQw4w9WgXcQ?list=PLabc_-123");
    assert_eq!(id, Some("PLabc_-123".to_string()));
}

#[test]
fn test_youtube_bare_id_rejected() {
    assert_eq!(
        youtube::extract_playlist_id("PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG"),
        None
    );
}

#[test]
fn test_youtube_url_without_list_rejected() {
    assert_eq!(
        youtube::extract_playlist_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
        None
    );
    assert_eq!(youtube::extract_playlist_id("https://www.youtube.com/playlist?list="), None);
}
