//! OAuth token lifecycle management.
//!
//! One [`OAuthManager`] exists per provider. It owns the full token lifecycle:
//! building authorization URLs, exchanging authorization codes, storing tokens
//! with a TTL, transparently refreshing expired tokens and revoking them. The
//! backing [`TokenStore`] is injected so production and tests can use
//! different stores.
//!
//! Failure semantics follow one rule: exchange failures surface as typed
//! errors (the caller must re-drive the authorization flow), while failures
//! during a lazy refresh degrade to "no valid token" so callers can uniformly
//! treat an absent token as "authorization required".

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use url::Url;

use crate::{
    config,
    error::ConvertError,
    token::TokenStore,
    types::{Provider, TokenData, TokenIdentity},
    warning,
};

const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Key fragment for the app-level (client credentials) token.
const APP_IDENTITY: &str = "app";

/// Static per-provider OAuth endpoints and credentials.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
}

impl OAuthConfig {
    pub fn spotify() -> Self {
        Self {
            client_id: config::spotify_client_id(),
            client_secret: config::spotify_client_secret(),
            redirect_uri: config::spotify_redirect_uri(),
            scope: config::spotify_scope(),
            auth_url: config::spotify_auth_url(),
            token_url: config::spotify_token_url(),
        }
    }

    pub fn youtube() -> Self {
        Self {
            client_id: config::youtube_client_id(),
            client_secret: config::youtube_client_secret(),
            redirect_uri: config::youtube_redirect_uri(),
            scope: config::youtube_scope(),
            auth_url: config::youtube_auth_url(),
            token_url: config::youtube_token_url(),
        }
    }
}

/// Per-provider manager for the OAuth access-token lifecycle.
///
/// Tokens are cached in the injected store under `"{provider}_token:{identity}"`
/// with a TTL equal to their remaining lifetime.
///
/// Concurrent refreshes of the same identity's token are not serialized: both
/// exchanges succeed independently and the last write wins. Providers tolerate
/// multiple refresh exchanges of the same refresh token in short succession,
/// but this remains a latent race.
pub struct OAuthManager {
    provider: Provider,
    config: OAuthConfig,
    store: Arc<dyn TokenStore>,
}

impl OAuthManager {
    pub fn new(provider: Provider, config: OAuthConfig, store: Arc<dyn TokenStore>) -> Self {
        Self {
            provider,
            config,
            store,
        }
    }

    pub fn spotify(store: Arc<dyn TokenStore>) -> Self {
        Self::new(Provider::Spotify, OAuthConfig::spotify(), store)
    }

    pub fn youtube(store: Arc<dyn TokenStore>) -> Self {
        Self::new(Provider::YouTube, OAuthConfig::youtube(), store)
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    fn store_key(&self, identity_key: &str) -> String {
        format!("{}_token:{}", self.provider, identity_key)
    }

    /// Builds the provider authorization URL for the given `state` parameter.
    ///
    /// Pure URL construction from static config; no side effects. YouTube
    /// requests offline access with a forced consent prompt so a refresh
    /// token is always issued.
    pub fn authorization_url(&self, state: &str, redirect_override: Option<&str>) -> String {
        let redirect_uri = redirect_override.unwrap_or(&self.config.redirect_uri);
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", &self.config.client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", &self.config.scope),
            ("state", state),
        ];

        match self.provider {
            Provider::Spotify => {
                params.push(("show_dialog", "false"));
            }
            Provider::YouTube => {
                params.push(("access_type", "offline"));
                params.push(("prompt", "consent"));
            }
        }

        match Url::parse_with_params(&self.config.auth_url, params) {
            Ok(url) => url.to_string(),
            Err(_) => self.config.auth_url.clone(),
        }
    }

    /// Exchanges an authorization code for a token.
    ///
    /// A non-success response surfaces as [`ConvertError::OAuthExchange`]
    /// carrying the provider's raw error body. The known redirect-URI
    /// mismatch signature is mapped to a clearer message since it is by far
    /// the most common misconfiguration.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_override: Option<&str>,
    ) -> Result<TokenData, ConvertError> {
        let redirect_uri = redirect_override
            .unwrap_or(&self.config.redirect_uri)
            .to_string();

        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &redirect_uri),
        ];

        let client = Client::new();
        let request = match self.provider {
            // Spotify authenticates the token endpoint with HTTP basic auth
            Provider::Spotify => client
                .post(&self.config.token_url)
                .basic_auth(&self.config.client_id, Some(&self.config.client_secret)),
            // Google expects the credentials as form fields
            Provider::YouTube => {
                form.push(("client_id", &self.config.client_id));
                form.push(("client_secret", &self.config.client_secret));
                client.post(&self.config.token_url)
            }
        };

        let response = request.form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = if body.contains("INVALID_CLIENT") || body.contains("redirect_uri") {
                format!(
                    "invalid redirect URI: ensure \"{}\" is registered in the {} app settings \
                     and matches exactly (protocol, host, port and path); provider said: {}",
                    redirect_uri, self.provider, body
                )
            } else {
                body
            };
            return Err(ConvertError::OAuthExchange {
                provider: self.provider,
                status,
                message,
            });
        }

        Ok(response.json::<TokenData>().await?)
    }

    /// Writes a token to the store under the given identity.
    ///
    /// Computes `expires_at` as `now + expires_in` (3600s default) when the
    /// provider did not send one, and uses the remaining lifetime as TTL.
    pub async fn store_token(
        &self,
        identity: &TokenIdentity,
        data: TokenData,
    ) -> Result<(), ConvertError> {
        self.write_record(identity.key(), data).await.map(|_| ())
    }

    async fn write_record(
        &self,
        identity_key: &str,
        mut data: TokenData,
    ) -> Result<TokenData, ConvertError> {
        let now = Utc::now().timestamp();
        let expires_at = data
            .expires_at
            .unwrap_or(now + data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN) as i64);
        data.expires_at = Some(expires_at);

        let json = serde_json::to_string(&data).map_err(|e| ConvertError::Storage(e.to_string()))?;
        let ttl = Duration::from_secs((expires_at - now).max(0) as u64);
        self.store.put(&self.store_key(identity_key), json, ttl).await;

        Ok(data)
    }

    /// Returns a currently valid access token for the identity, or `None`.
    ///
    /// An expired record with a refresh token gets exactly one refresh
    /// attempt; on failure (or with no refresh token) the record is evicted
    /// and `None` is returned. There is no retry loop.
    pub async fn valid_access_token(&self, identity: &TokenIdentity) -> Option<String> {
        let key = self.store_key(identity.key());
        let raw = self.store.get(&key).await?;
        let data: TokenData = serde_json::from_str(&raw).ok()?;

        if let Some(expires_at) = data.expires_at {
            if Utc::now().timestamp() >= expires_at {
                return match data.refresh_token.clone() {
                    Some(refresh_token) => {
                        self.refresh_access_token(identity, &data, &refresh_token)
                            .await
                    }
                    None => {
                        // expired and unrefreshable, never reuse
                        self.store.delete(&key).await;
                        None
                    }
                };
            }
        }

        Some(data.access_token)
    }

    /// Exchanges a refresh token for a new access token and stores the merged
    /// record. Evicts the record on any failure so a stale token is never
    /// left behind.
    async fn refresh_access_token(
        &self,
        identity: &TokenIdentity,
        stored: &TokenData,
        refresh_token: &str,
    ) -> Option<String> {
        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let client = Client::new();
        let request = match self.provider {
            Provider::Spotify => client
                .post(&self.config.token_url)
                .basic_auth(&self.config.client_id, Some(&self.config.client_secret)),
            Provider::YouTube => {
                form.push(("client_id", &self.config.client_id));
                form.push(("client_secret", &self.config.client_secret));
                client.post(&self.config.token_url)
            }
        };

        let key = self.store_key(identity.key());
        let response = match request.form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                warning!("{} token refresh failed: {}", self.provider, e);
                self.store.delete(&key).await;
                return None;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warning!(
                "{} token refresh rejected ({}): {}",
                self.provider,
                status,
                body
            );
            self.store.delete(&key).await;
            return None;
        }

        let fresh: TokenData = match response.json().await {
            Ok(fresh) => fresh,
            Err(_) => {
                self.store.delete(&key).await;
                return None;
            }
        };

        // providers may omit the refresh token on refresh, keep the old one
        let merged = stored.merged_with(fresh);
        let access_token = merged.access_token.clone();
        self.write_record(identity.key(), merged).await.ok()?;

        Some(access_token)
    }

    /// Explicit revoke: evicts the identity's token from the store.
    pub async fn clear_token(&self, identity: &TokenIdentity) {
        self.store.delete(&self.store_key(identity.key())).await;
    }

    /// Returns an app-level access token via the client-credentials grant.
    ///
    /// Used for Spotify playlist reads, which need no end-user consent. The
    /// token is cached in the store under the app identity until it expires.
    pub async fn app_access_token(&self) -> Result<String, ConvertError> {
        let key = self.store_key(APP_IDENTITY);
        if let Some(raw) = self.store.get(&key).await {
            if let Ok(data) = serde_json::from_str::<TokenData>(&raw) {
                if data
                    .expires_at
                    .is_some_and(|expires_at| Utc::now().timestamp() < expires_at)
                {
                    return Ok(data.access_token);
                }
            }
        }

        let client = Client::new();
        let response = client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ConvertError::OAuthExchange {
                provider: self.provider,
                status,
                message,
            });
        }

        let data: TokenData = response.json().await?;
        let stored = self.write_record(APP_IDENTITY, data).await?;

        Ok(stored.access_token)
    }
}
