//! YouTube Data API adapter.
//!
//! Search runs with the API key alone; reading a user's playlist and all
//! writes require the end-user's delegated token resolved through the OAuth
//! manager. This asymmetry is why a YouTube-to-Spotify conversion needs a
//! source-read token identity while the reverse direction does not.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::{
    config,
    error::ConvertError,
    oauth::OAuthManager,
    platform::PlatformAdapter,
    types::{
        Candidate, Playlist, PlaylistItem, Provider, TokenIdentity, YouTubePlaylistItemsResponse,
        YouTubePlaylistListResponse, YouTubePlaylistResource, YouTubeSearchResponse,
    },
};

fn is_playlist_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Extracts a YouTube playlist id from a pasted URL.
///
/// Recognized forms are the `list` query parameter in any of:
/// `https://www.youtube.com/playlist?list=<id>`,
/// `https://youtu.be/<video>?list=<id>` and
/// `https://www.youtube.com/watch?v=<video>&list=<id>`. A bare id is not
/// accepted.
pub fn extract_playlist_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let (_, id) = parsed.query_pairs().find(|(key, _)| key == "list")?;
    if !id.is_empty() && id.chars().all(is_playlist_id_char) {
        Some(id.into_owned())
    } else {
        None
    }
}

pub struct YouTubeAdapter {
    oauth: Arc<OAuthManager>,
    client: Client,
}

impl YouTubeAdapter {
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
                provider: Provider::YouTube,
            })
    }

    async fn playlist_resource(
        &self,
        id: &str,
        token: &str,
    ) -> Result<YouTubePlaylistResource, ConvertError> {
        let response = self
            .client
            .get(format!("{}/playlists", config::youtube_api_url()))
            .bearer_auth(token)
            .query(&[("part", "snippet,contentDetails"), ("id", id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvertError::from_response(Provider::YouTube, response).await);
        }

        let list = response.json::<YouTubePlaylistListResponse>().await?;
        list.items
            .into_iter()
            .next()
            .ok_or_else(|| ConvertError::Adapter {
                provider: Provider::YouTube,
                status: 404,
                body: format!("playlist {} not found", id),
            })
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        token: &str,
    ) -> Result<Vec<PlaylistItem>, ConvertError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("part", "snippet,contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", "50"),
            ];
            if let Some(token_value) = page_token.as_deref() {
                query.push(("pageToken", token_value));
            }

            let response = self
                .client
                .get(format!("{}/playlistItems", config::youtube_api_url()))
                .bearer_auth(token)
                .query(&query)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ConvertError::from_response(Provider::YouTube, response).await);
            }

            let page = response.json::<YouTubePlaylistItemsResponse>().await?;
            for resource in page.items {
                let snippet = resource.snippet;
                if let Some(video_id) = snippet.resource_id.and_then(|r| r.video_id) {
                    items.push(PlaylistItem {
                        id: video_id,
                        name: snippet.title,
                        secondary: snippet.channel_title,
                        album: None,
                        duration_ms: None,
                    });
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl PlatformAdapter for YouTubeAdapter {
    fn provider(&self) -> Provider {
        Provider::YouTube
    }

    fn requires_read_token(&self) -> bool {
        true
    }

    async fn fetch_playlist(
        &self,
        id: &str,
        identity: Option<&TokenIdentity>,
    ) -> Result<Playlist, ConvertError> {
        let identity = identity.ok_or(ConvertError::AuthorizationRequired {
            provider: Provider::YouTube,
        })?;
        let token = self.user_token(identity).await?;

        let resource = self.playlist_resource(id, &token).await?;
        let items = self.playlist_items(id, &token).await?;

        Ok(Playlist {
            id: resource.id,
            title: resource.snippet.title,
            description: resource.snippet.description,
            items,
        })
    }

    async fn search_top_match(&self, query: &str) -> Result<Option<Candidate>, ConvertError> {
        let api_key = config::youtube_api_key();
        let response = self
            .client
            .get(format!("{}/search", config::youtube_api_url()))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", &api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvertError::from_response(Provider::YouTube, response).await);
        }

        let result = response.json::<YouTubeSearchResponse>().await?;
        let candidate = result.items.into_iter().next().and_then(|item| {
            let id = item.id.video_id?;
            Some(Candidate {
                id,
                title: item.snippet.title,
                subtitle: item.snippet.channel_title.unwrap_or_default(),
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

        let response = self
            .client
            .post(format!(
                "{}/playlists?part=snippet,status",
                config::youtube_api_url()
            ))
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "snippet": {
                    "title": title,
                    "description": description,
                },
                "status": {
                    "privacyStatus": "private",
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvertError::from_response(Provider::YouTube, response).await);
        }

        let created = response.json::<YouTubePlaylistResource>().await?;
        Ok(Playlist {
            id: created.id,
            title: created.snippet.title,
            description: created.snippet.description,
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

        for video_id in item_ids {
            let response = self
                .client
                .post(format!(
                    "{}/playlistItems?part=snippet",
                    config::youtube_api_url()
                ))
                .bearer_auth(&token)
                .json(&serde_json::json!({
                    "snippet": {
                        "playlistId": playlist_id,
                        "resourceId": {
                            "kind": "youtube#video",
                            "videoId": video_id,
                        },
                    },
                }))
                .send()
                .await?;

            if !response.status().is_success() {
                // the video already being in the playlist counts as success
                if response.status() == StatusCode::CONFLICT {
                    continue;
                }
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn extract_id_from_url(&self, url: &str) -> Option<String> {
        extract_playlist_id(url)
    }

    fn playlist_url(&self, id: &str) -> String {
        format!("https://www.youtube.com/playlist?list={}", id)
    }
}
