use thiserror::Error;

use crate::types::Provider;

/// Error taxonomy of the conversion engine.
///
/// `AuthorizationRequired` is control flow rather than a failure: the caller
/// is expected to drive an OAuth redirect for the named provider and retry the
/// same conversion afterwards. It is a distinct variant so callers match on
/// the type instead of sniffing message strings.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("authorization required for {provider}")]
    AuthorizationRequired { provider: Provider },

    #[error("{provider} token exchange failed ({status}): {message}")]
    OAuthExchange {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("not a recognized {provider} playlist URL: {url}")]
    InvalidPlaylistUrl { provider: Provider, url: String },

    #[error("{provider} API call failed ({status}): {body}")]
    Adapter {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

impl ConvertError {
    /// Builds an adapter error from a non-success response, consuming its body
    /// for diagnostics.
    pub async fn from_response(provider: Provider, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ConvertError::Adapter {
            provider,
            status,
            body,
        }
    }
}
