//! Spotify Web API adapter.
//!
//! Playlist reads use the app-level client-credentials token (no end-user
//! consent needed); playlist creation and writes require the user's own
//! delegated token resolved through the OAuth manager.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{
    config,
    error::ConvertError,
    oauth::OAuthManager,
    platform::PlatformAdapter,
    types::{
        Candidate, Playlist, PlaylistItem, Provider, SpotifyAddTracksRequest,
        SpotifyCreatePlaylistResponse, SpotifyPlaylistResponse, SpotifyPlaylistTrack,
        SpotifySearchResponse, SpotifyTrack, SpotifyTracksPage, SpotifyUserProfile, TokenIdentity,
    },
};

/// Spotify limits track additions to 100 URIs per request.
const APPEND_BATCH_SIZE: usize = 100;

/// Extracts a Spotify playlist id from a pasted URL or URI.
///
/// Recognized forms: `https://open.spotify.com/playlist/<id>` (with or
/// without query string) and the `spotify:playlist:<id>` URI. A bare id is
/// not accepted.
pub fn extract_playlist_id(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("spotify:playlist:") {
        let id: String = rest.chars().take_while(|c| c.is_ascii_alphanumeric()).collect();
        if !id.is_empty() {
            return Some(id);
        }
    }

    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "playlist" {
            let id: String = segments
                .next()?
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect();
            if !id.is_empty() {
                return Some(id);
            }
            return None;
        }
    }

    None
}

pub struct SpotifyAdapter {
    oauth: Arc<OAuthManager>,
    client: Client,
}

impl SpotifyAdapter {
    pub fn new(oauth: Arc<OAuthManager>) -> Self {
        Self {
            oauth,
            client: Client::new(),
        }
    }

    async fn user_token(&self, identity: &TokenIdentity) -> Result<String, ConvertError> {
        self.oauth
            .valid_access_token(identity)
            .await
            .ok_or(ConvertError::AuthorizationRequired {
                provider: Provider::Spotify,
            })
    }

    async fn user_profile(&self, token: &str) -> Result<SpotifyUserProfile, ConvertError> {
        let response = self
            .client
            .get(format!("{}/me", config::spotify_api_url()))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvertError::from_response(Provider::Spotify, response).await);
        }

        Ok(response.json::<SpotifyUserProfile>().await?)
    }

    fn item_from_track(track: SpotifyTrack) -> Option<PlaylistItem> {
        let id = track.id?;
        let artists: Vec<String> = track.artists.into_iter().map(|a| a.name).collect();
        Some(PlaylistItem {
            id,
            name: track.name,
            secondary: artists.join(" "),
            album: track.album.map(|a| a.name),
            duration_ms: track.duration_ms,
        })
    }
}

#[async_trait]
impl PlatformAdapter for SpotifyAdapter {
    fn provider(&self) -> Provider {
        Provider::Spotify
    }

    fn requires_read_token(&self) -> bool {
        false
    }

    async fn fetch_playlist(
        &self,
        id: &str,
        _identity: Option<&TokenIdentity>,
    ) -> Result<Playlist, ConvertError> {
        let token = self.oauth.app_access_token().await?;

        let api_url = format!(
            "{uri}/playlists/{id}?fields=id,name,description,tracks.items(track(id,name,artists(name),album(name),duration_ms)),tracks.next",
            uri = config::spotify_api_url(),
            id = id
        );
        let response = self.client.get(&api_url).bearer_auth(&token).send().await?;

        if !response.status().is_success() {
            return Err(ConvertError::from_response(Provider::Spotify, response).await);
        }

        let playlist = response.json::<SpotifyPlaylistResponse>().await?;
        let mut tracks: Vec<SpotifyPlaylistTrack> = playlist.tracks.items;

        // follow the tracks cursor until exhausted
        let mut next_url = playlist.tracks.next;
        while let Some(url) = next_url {
            let response = self.client.get(&url).bearer_auth(&token).send().await?;
            if !response.status().is_success() {
                return Err(ConvertError::from_response(Provider::Spotify, response).await);
            }

            let page = response.json::<SpotifyTracksPage>().await?;
            tracks.extend(page.items);
            next_url = page.next;
        }

        let items = tracks
            .into_iter()
            .filter_map(|entry| entry.track.and_then(Self::item_from_track))
            .collect();

        Ok(Playlist {
            id: playlist.id,
            title: playlist.name,
            description: playlist.description.unwrap_or_default(),
            items,
        })
    }

    async fn search_top_match(&self, query: &str) -> Result<Option<Candidate>, ConvertError> {
        let token = self.oauth.app_access_token().await?;

        let response = self
            .client
            .get(format!("{}/search", config::spotify_api_url()))
            .bearer_auth(&token)
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvertError::from_response(Provider::Spotify, response).await);
        }

        let result = response.json::<SpotifySearchResponse>().await?;
        let candidate = result.tracks.items.into_iter().next().and_then(|track| {
            let id = track.id?;
            let artists: Vec<String> = track.artists.into_iter().map(|a| a.name).collect();
            Some(Candidate {
                id,
                title: track.name,
                subtitle: artists.join(", "),
            })
        });

        Ok(candidate)
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        identity: &TokenIdentity,
    ) -> Result<Playlist, ConvertError> {
        let token = self.user_token(identity).await?;
        let profile = self.user_profile(&token).await?;

        let response = self
            .client
            .post(format!(
                "{}/users/{}/playlists",
                config::spotify_api_url(),
                profile.id
            ))
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "name": title,
                "description": description,
                "public": false,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvertError::from_response(Provider::Spotify, response).await);
        }

        let created = response.json::<SpotifyCreatePlaylistResponse>().await?;
        Ok(Playlist {
            id: created.id,
            title: created.name,
            description: created.description.unwrap_or_default(),
            items: Vec::new(),
        })
    }

    async fn append_items(
        &self,
        playlist_id: &str,
        item_ids: &[String],
        identity: &TokenIdentity,
    ) -> Result<bool, ConvertError> {
        let token = self.user_token(identity).await?;

        for chunk in item_ids.chunks(APPEND_BATCH_SIZE) {
            let request = SpotifyAddTracksRequest {
                uris: chunk
                    .iter()
                    .map(|id| format!("spotify:track:{}", id))
                    .collect(),
            };

            let response = self
                .client
                .post(format!(
                    "{}/playlists/{}/tracks",
                    config::spotify_api_url(),
                    playlist_id
                ))
                .bearer_auth(&token)
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn extract_id_from_url(&self, url: &str) -> Option<String> {
        extract_playlist_id(url)
    }

    fn playlist_url(&self, id: &str) -> String {
        format!("https://open.spotify.com/playlist/{}", id)
    }
}
