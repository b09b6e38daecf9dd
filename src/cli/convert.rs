use std::{collections::HashSet, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::auth_flow,
    convert::{ConversionRequest, Converter},
    error,
    error::ConvertError,
    history::ConversionHistory,
    info,
    oauth::OAuthManager,
    platform::{FixedDelayPacer, PlatformAdapter},
    spotify::{self, SpotifyAdapter},
    success,
    token::{FileTokenStore, TokenStore},
    types::{Provider, TokenIdentity},
    utils, warning,
    youtube::{self, YouTubeAdapter},
};

/// Converts one playlist between the two platforms.
///
/// The direction is inferred from the source URL. When a provider reports
/// that authorization is required, the browser flow for that provider runs
/// inline and the conversion is retried; each provider gets at most one
/// authorization attempt per invocation.
pub async fn convert(source_url: String, destination_url: Option<String>, user: Option<String>) {
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new());
    let spotify_manager = Arc::new(OAuthManager::spotify(Arc::clone(&store)));
    let youtube_manager = Arc::new(OAuthManager::youtube(Arc::clone(&store)));

    let spotify_adapter = SpotifyAdapter::new(Arc::clone(&spotify_manager));
    let youtube_adapter = YouTubeAdapter::new(Arc::clone(&youtube_manager));

    let (source, destination, source_id): (&dyn PlatformAdapter, &dyn PlatformAdapter, String) =
        if let Some(id) = spotify::extract_playlist_id(&source_url) {
            (&spotify_adapter, &youtube_adapter, id)
        } else if let Some(id) = youtube::extract_playlist_id(&source_url) {
            (&youtube_adapter, &spotify_adapter, id)
        } else {
            error!("Unrecognized source playlist URL: {}", source_url);
        };

    let identity = match user {
        Some(id) => TokenIdentity::User(id),
        None => TokenIdentity::Anonymous(utils::generate_session_id()),
    };

    let pacer = FixedDelayPacer::default();
    let history = ConversionHistory::new();
    let converter = Converter::new(source, destination, &pacer).with_history(&history);

    let mut authorized: HashSet<Provider> = HashSet::new();

    loop {
        let pb = ProgressBar::new_spinner();
        pb.set_message("Converting playlist...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        let result = converter
            .convert(ConversionRequest {
                source_playlist_id: &source_id,
                source_identity: Some(&identity),
                destination_identity: &identity,
                destination_url: destination_url.as_deref(),
            })
            .await;

        pb.finish_and_clear();

        match result {
            Ok(record) => {
                success!(
                    "Converted {}/{} items ({} not found).",
                    record.converted,
                    record.total,
                    record.failed
                );
                for entry in record.results.iter().filter(|entry| !entry.found) {
                    warning!("Not converted: {}", entry.source.search_query());
                }
                println!("{}", record.destination_playlist_url);
                return;
            }
            Err(ConvertError::AuthorizationRequired { provider }) => {
                if !authorized.insert(provider) {
                    error!(
                        "Authorization with {} did not produce a usable token.",
                        provider
                    );
                }

                info!("Authorization with {} required, opening browser...", provider);
                let manager = match provider {
                    Provider::Spotify => Arc::clone(&spotify_manager),
                    Provider::YouTube => Arc::clone(&youtube_manager),
                };
                if !auth_flow(manager, identity.clone()).await {
                    error!("Authorization with {} failed or timed out.", provider);
                }
            }
            Err(e) => error!("Conversion failed: {}", e),
        }
    }
}
