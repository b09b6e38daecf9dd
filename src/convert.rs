//! The conversion orchestrator.
//!
//! [`Converter`] drives one end-to-end playlist conversion: it fetches the
//! full ordered source playlist, resolves a destination playlist (reuse by
//! URL or create new), searches every source item on the destination platform
//! with fixed inter-call pacing, appends matches and builds the per-item
//! result ledger. The same code runs both directions; only the adapter roles
//! swap.
//!
//! Processing is strictly sequential. Serial item handling plus the injected
//! [`Pacer`] delays is the engine's entire rate-limiting strategy, and the
//! whole `convert` call blocks its caller for the duration of the run.

use chrono::Utc;

use crate::{
    error::ConvertError,
    history::ConversionHistory,
    info,
    platform::{Pacer, PlatformAdapter},
    types::{ConversionEntry, ConversionRecord, StoredConversion, TokenIdentity},
    utils, warning,
};

/// Inputs of one conversion run.
///
/// The caller resolves identities up front; nothing in the engine queries
/// ambient authentication state. `source_identity` is only consulted when the
/// source platform requires a delegated read token (YouTube).
pub struct ConversionRequest<'a> {
    pub source_playlist_id: &'a str,
    pub source_identity: Option<&'a TokenIdentity>,
    pub destination_identity: &'a TokenIdentity,
    pub destination_url: Option<&'a str>,
}

pub struct Converter<'a> {
    source: &'a dyn PlatformAdapter,
    destination: &'a dyn PlatformAdapter,
    pacer: &'a dyn Pacer,
    history: Option<&'a ConversionHistory>,
}

impl<'a> Converter<'a> {
    pub fn new(
        source: &'a dyn PlatformAdapter,
        destination: &'a dyn PlatformAdapter,
        pacer: &'a dyn Pacer,
    ) -> Self {
        Self {
            source,
            destination,
            pacer,
            history: None,
        }
    }

    /// Attaches the persistence collaborator. Records are only persisted for
    /// `TokenIdentity::User` conversions.
    pub fn with_history(mut self, history: &'a ConversionHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Runs one conversion and returns its record.
    ///
    /// Playlist-level failures (source fetch, destination resolution, missing
    /// tokens) abort the run as typed errors before any item is processed.
    /// Per-item search and append failures are absorbed into the ledger as
    /// `found=false` and never abort the loop; the one exception is a token
    /// becoming invalid mid-run, which still surfaces as
    /// [`ConvertError::AuthorizationRequired`] since no later item could
    /// succeed either.
    pub async fn convert(
        &self,
        request: ConversionRequest<'_>,
    ) -> Result<ConversionRecord, ConvertError> {
        // validate a supplied destination URL before touching the network
        let destination_id = match request.destination_url {
            Some(url) => Some(self.destination.extract_id_from_url(url).ok_or_else(|| {
                ConvertError::InvalidPlaylistUrl {
                    provider: self.destination.provider(),
                    url: url.to_string(),
                }
            })?),
            None => None,
        };

        if self.source.requires_read_token() && request.source_identity.is_none() {
            return Err(ConvertError::AuthorizationRequired {
                provider: self.source.provider(),
            });
        }

        let source_playlist = self
            .source
            .fetch_playlist(request.source_playlist_id, request.source_identity)
            .await?;

        let total = source_playlist.items.len();
        info!(
            "Converting {} items ({} -> {}), estimated provider quota: {} units",
            total,
            self.source.provider(),
            self.destination.provider(),
            utils::estimate_quota(total)
        );

        let destination_playlist = match destination_id {
            Some(id) => {
                self.destination
                    .fetch_playlist(&id, Some(request.destination_identity))
                    .await?
            }
            None => {
                self.destination
                    .create_playlist(
                        &source_playlist.title,
                        &source_playlist.description,
                        request.destination_identity,
                    )
                    .await?
            }
        };

        let mut results: Vec<ConversionEntry> = Vec::with_capacity(total);

        for (index, item) in source_playlist.items.iter().enumerate() {
            if index > 0 {
                self.pacer.before_search().await;
            }

            let query = item.search_query();
            let candidate = match self.destination.search_top_match(&query).await {
                Ok(candidate) => candidate,
                Err(e @ ConvertError::AuthorizationRequired { .. }) => return Err(e),
                Err(e) => {
                    warning!("Search failed for \"{}\": {}", query, e);
                    None
                }
            };

            let entry = match candidate {
                Some(candidate) => {
                    let appended = match self
                        .destination
                        .append_items(
                            &destination_playlist.id,
                            std::slice::from_ref(&candidate.id),
                            request.destination_identity,
                        )
                        .await
                    {
                        Ok(appended) => appended,
                        Err(e @ ConvertError::AuthorizationRequired { .. }) => return Err(e),
                        Err(e) => {
                            warning!("Append failed for \"{}\": {}", candidate.title, e);
                            false
                        }
                    };

                    if appended {
                        self.pacer.after_append().await;
                        ConversionEntry {
                            source: item.clone(),
                            found: true,
                            destination: Some(candidate),
                        }
                    } else {
                        ConversionEntry {
                            source: item.clone(),
                            found: false,
                            destination: None,
                        }
                    }
                }
                None => {
                    warning!("No match found for \"{}\"", query);
                    ConversionEntry {
                        source: item.clone(),
                        found: false,
                        destination: None,
                    }
                }
            };

            results.push(entry);

            if (index + 1) % 10 == 0 {
                info!(
                    "Progress: {}/{} processed, {} matched",
                    index + 1,
                    total,
                    results.iter().filter(|r| r.found).count()
                );
            }
        }

        let converted = results.iter().filter(|r| r.found).count();
        let record = ConversionRecord {
            source_provider: self.source.provider(),
            destination_provider: self.destination.provider(),
            source_playlist_url: self.source.playlist_url(&source_playlist.id),
            source_playlist_id: source_playlist.id,
            source_playlist_title: source_playlist.title,
            destination_playlist_url: self.destination.playlist_url(&destination_playlist.id),
            destination_playlist_id: destination_playlist.id,
            destination_playlist_title: destination_playlist.title,
            total,
            converted,
            failed: total - converted,
            results,
        };

        // anonymous runs stay in memory only
        if let (Some(history), TokenIdentity::User(user_id)) =
            (self.history, request.destination_identity)
        {
            let stored = StoredConversion {
                user_id: user_id.clone(),
                created_at: Utc::now().timestamp(),
                record: record.clone(),
            };
            if let Err(e) = history.persist(stored).await {
                warning!("Failed to persist conversion record: {}", e);
            }
        }

        Ok(record)
    }
}
