//! Seams between the conversion orchestrator and the outside world.
//!
//! [`PlatformAdapter`] is the capability surface a provider integration must
//! expose; the orchestrator is symmetric in direction and only ever talks to
//! two adapters with the roles swapped. [`Pacer`] is the fixed-delay
//! rate-limit mechanism, injected so tests can substitute a no-op instead of
//! incurring real delays.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::{
    error::ConvertError,
    types::{Candidate, Playlist, Provider, TokenIdentity},
};

/// Thin capability surface over one music/video platform.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Whether reading a playlist's contents requires the end-user's own
    /// delegated token. True for YouTube, false for Spotify (app-level
    /// client-credentials authorization suffices there).
    fn requires_read_token(&self) -> bool;

    /// Fetches a playlist with its full ordered item list, following the
    /// provider's pagination until exhausted.
    async fn fetch_playlist(
        &self,
        id: &str,
        identity: Option<&TokenIdentity>,
    ) -> Result<Playlist, ConvertError>;

    /// Issues a single top-1 relevance search for the query.
    async fn search_top_match(&self, query: &str) -> Result<Option<Candidate>, ConvertError>;

    /// Creates a new private playlist owned by the identity.
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        identity: &TokenIdentity,
    ) -> Result<Playlist, ConvertError>;

    /// Appends items to a playlist, batching internally where the provider
    /// limits batch sizes. Returns whether all appends were accepted;
    /// duplicate-item responses count as accepted.
    async fn append_items(
        &self,
        playlist_id: &str,
        item_ids: &[String],
        identity: &TokenIdentity,
    ) -> Result<bool, ConvertError>;

    /// Extracts the platform playlist id from a pasted URL, or `None` when no
    /// recognized pattern matches.
    fn extract_id_from_url(&self, url: &str) -> Option<String>;

    /// The canonical public URL of a playlist id on this platform.
    fn playlist_url(&self, id: &str) -> String;
}

/// Fixed-delay pacing between outbound calls.
///
/// Serial processing with these delays is the engine's entire rate-limit
/// strategy; there is no adaptive backoff or quota-aware batching.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Called before every per-item search except the first.
    async fn before_search(&self);

    /// Called after every successful append.
    async fn after_append(&self);
}

/// The production pacer: 100ms between items, 50ms after a write.
pub struct FixedDelayPacer {
    between_items: Duration,
    after_append: Duration,
}

impl FixedDelayPacer {
    pub fn new(between_items: Duration, after_append: Duration) -> Self {
        Self {
            between_items,
            after_append,
        }
    }
}

impl Default for FixedDelayPacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_millis(50))
    }
}

#[async_trait]
impl Pacer for FixedDelayPacer {
    async fn before_search(&self) {
        sleep(self.between_items).await;
    }

    async fn after_append(&self) {
        sleep(self.after_append).await;
    }
}

/// Pacer without delays, for tests.
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn before_search(&self) {}

    async fn after_append(&self) {}
}
