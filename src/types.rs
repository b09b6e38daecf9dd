use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// The two platforms a playlist can be converted between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Spotify,
    YouTube,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Spotify => write!(f, "spotify"),
            Provider::YouTube => write!(f, "youtube"),
        }
    }
}

impl Provider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spotify" => Some(Provider::Spotify),
            "youtube" => Some(Provider::YouTube),
            _ => None,
        }
    }
}

/// The key under which tokens are stored and conversions are attributed.
///
/// Callers always pass a resolved identity into the lower layers; nothing in
/// the engine queries ambient authentication state. Conversions run under an
/// `Anonymous` identity are not persisted to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenIdentity {
    User(String),
    Anonymous(String),
}

impl TokenIdentity {
    /// The raw key fragment used in token store keys.
    pub fn key(&self) -> &str {
        match self {
            TokenIdentity::User(id) => id,
            TokenIdentity::Anonymous(session_id) => session_id,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, TokenIdentity::User(_))
    }
}

/// A pending browser authorization flow, shared between the CLI and the
/// local callback server.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub state: String,
    pub identity: TokenIdentity,
    pub completed: bool,
}

/// An OAuth token as stored per `(provider, identity)`.
///
/// `expires_at` is absolute unix seconds, derived at write time from the
/// provider's `expires_in`. Unknown provider fields are carried along opaquely
/// in `extra` so a refresh can merge without losing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenData {
    /// Merges a refresh response over this stored token.
    ///
    /// Providers may omit the `refresh_token` from a refresh response; the
    /// stored one is preserved in that case. All other fields from the fresh
    /// response win, and `expires_at` is left for the caller to recompute.
    pub fn merged_with(&self, fresh: TokenData) -> TokenData {
        let mut extra = self.extra.clone();
        for (k, v) in fresh.extra {
            extra.insert(k, v);
        }

        TokenData {
            access_token: fresh.access_token,
            refresh_token: fresh.refresh_token.or_else(|| self.refresh_token.clone()),
            expires_in: fresh.expires_in.or(self.expires_in),
            expires_at: None,
            extra,
        }
    }
}

/// A single playlist entry on the source platform, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: String,
    pub name: String,
    /// Secondary text used for query construction: the joined artist list on
    /// Spotify, the channel title on YouTube.
    pub secondary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl PlaylistItem {
    /// The text query used to search this item on the destination platform.
    pub fn search_query(&self) -> String {
        if self.secondary.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.secondary)
        }
    }
}

/// A playlist with its full, ordered item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub items: Vec<PlaylistItem>,
}

/// The single best match found on the destination platform for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

/// One entry of the per-item conversion ledger.
///
/// The entry sequence is append-only and its order equals source playlist
/// order; it is the authoritative audit trail of a conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionEntry {
    pub source: PlaylistItem,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Candidate>,
}

/// The summary of one conversion run, counts plus the full ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub source_provider: Provider,
    pub destination_provider: Provider,
    pub source_playlist_id: String,
    pub source_playlist_title: String,
    pub source_playlist_url: String,
    pub destination_playlist_id: String,
    pub destination_playlist_title: String,
    pub destination_playlist_url: String,
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
    pub results: Vec<ConversionEntry>,
}

/// A conversion record as persisted for an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredConversion {
    pub user_id: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub record: ConversionRecord,
}

#[derive(Tabled)]
pub struct HistoryTableRow {
    pub date: String,
    pub source: String,
    pub destination: String,
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
}

// --- Spotify wire types ---

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tracks: SpotifyTracksPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTracksPage {
    pub items: Vec<SpotifyPlaylistTrack>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistTrack {
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySearchResponse {
    pub tracks: SpotifySearchPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySearchPage {
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyUserProfile {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyCreatePlaylistResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyClientCredentialsResponse {
    pub access_token: String,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotifyAddTracksRequest {
    pub uris: Vec<String>,
}

// --- YouTube wire types ---

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubePlaylistListResponse {
    #[serde(default)]
    pub items: Vec<YouTubePlaylistResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubePlaylistResource {
    pub id: String,
    pub snippet: YouTubeSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub channel_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubePlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<YouTubePlaylistItemResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubePlaylistItemResource {
    pub snippet: YouTubeItemSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeItemSnippet {
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    pub resource_id: Option<YouTubeResourceId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YouTubeSearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearchResult {
    pub id: YouTubeSearchId,
    pub snippet: YouTubeSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSearchId {
    pub video_id: Option<String>,
}
