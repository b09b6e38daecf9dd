use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tunebridge::convert::{ConversionRequest, Converter};
use tunebridge::error::ConvertError;
use tunebridge::platform::{NoopPacer, PlatformAdapter};
use tunebridge::types::{Candidate, Playlist, PlaylistItem, Provider, TokenIdentity};

// Helper function to create a test playlist item
fn create_test_item(n: usize) -> PlaylistItem {
    PlaylistItem {
        id: format!("src-{}", n),
        name: format!("Track {}", n),
        secondary: format!("Artist {}", n),
        album: None,
        duration_ms: Some(180_000),
    }
}

fn create_test_playlist(count: usize) -> Playlist {
    Playlist {
        id: "src-playlist".to_string(),
        title: "Road Trip".to_string(),
        description: "test mix".to_string(),
        items: (0..count).map(create_test_item).collect(),
    }
}

struct MockSource {
    playlist: Playlist,
    requires_token: bool,
    fetch_calls: AtomicUsize,
}

impl MockSource {
    fn with_items(count: usize) -> Self {
        Self {
            playlist: create_test_playlist(count),
            requires_token: false,
            fetch_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PlatformAdapter for MockSource {
    fn provider(&self) -> Provider {
        Provider::Spotify
    }

    fn requires_read_token(&self) -> bool {
        self.requires_token
    }

    async fn fetch_playlist(
        &self,
        _id: &str,
        _identity: Option<&TokenIdentity>,
    ) -> Result<Playlist, ConvertError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.playlist.clone())
    }

    async fn search_top_match(&self, _query: &str) -> Result<Option<Candidate>, ConvertError> {
        unreachable!("source adapter is never searched")
    }

    async fn create_playlist(
        &self,
        _title: &str,
        _description: &str,
        _identity: &TokenIdentity,
    ) -> Result<Playlist, ConvertError> {
        unreachable!("source adapter never creates playlists")
    }

    async fn append_items(
        &self,
        _playlist_id: &str,
        _item_ids: &[String],
        _identity: &TokenIdentity,
    ) -> Result<bool, ConvertError> {
        unreachable!("source adapter is never written to")
    }

    fn extract_id_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix("https://source/playlist/").map(str::to_string)
    }

    fn playlist_url(&self, id: &str) -> String {
        format!("https://source/playlist/{}", id)
    }
}

#[derive(Default)]
struct MockDestination {
    matches: Vec<Option<Candidate>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    appended: Mutex<Vec<String>>,
    reject_appends: bool,
    auth_fail_on_search: Option<usize>,
}

impl MockDestination {
    // one entry per expected search call: true scripts a match
    fn scripted(found: &[bool]) -> Self {
        let matches = found
            .iter()
            .enumerate()
            .map(|(n, hit)| {
                hit.then(|| Candidate {
                    id: format!("dst-{}", n),
                    title: format!("Track {}", n),
                    subtitle: "Some Channel".to_string(),
                })
            })
            .collect();

        Self {
            matches,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PlatformAdapter for MockDestination {
    fn provider(&self) -> Provider {
        Provider::YouTube
    }

    fn requires_read_token(&self) -> bool {
        true
    }

    async fn fetch_playlist(
        &self,
        id: &str,
        _identity: Option<&TokenIdentity>,
    ) -> Result<Playlist, ConvertError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Playlist {
            id: id.to_string(),
            title: "Existing".to_string(),
            description: String::new(),
            items: Vec::new(),
        })
    }

    async fn search_top_match(&self, _query: &str) -> Result<Option<Candidate>, ConvertError> {
        let n = self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.auth_fail_on_search == Some(n) {
            return Err(ConvertError::AuthorizationRequired {
                provider: Provider::YouTube,
            });
        }
        Ok(self.matches.get(n).cloned().flatten())
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        _identity: &TokenIdentity,
    ) -> Result<Playlist, ConvertError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Playlist {
            id: format!("created-{}", n),
            title: title.to_string(),
            description: description.to_string(),
            items: Vec::new(),
        })
    }

    async fn append_items(
        &self,
        _playlist_id: &str,
        item_ids: &[String],
        _identity: &TokenIdentity,
    ) -> Result<bool, ConvertError> {
        if self.reject_appends {
            return Ok(false);
        }
        self.appended.lock().unwrap().extend(item_ids.iter().cloned());
        Ok(true)
    }

    fn extract_id_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix("https://dest/playlist/").map(str::to_string)
    }

    fn playlist_url(&self, id: &str) -> String {
        format!("https://dest/playlist/{}", id)
    }
}

fn anonymous() -> TokenIdentity {
    TokenIdentity::Anonymous("test-session".to_string())
}

fn request<'a>(identity: &'a TokenIdentity, destination_url: Option<&'a str>) -> ConversionRequest<'a> {
    ConversionRequest {
        source_playlist_id: "src-playlist",
        source_identity: Some(identity),
        destination_identity: identity,
        destination_url,
    }
}

#[tokio::test]
async fn test_ledger_preserves_source_order() {
    let source = MockSource::with_items(3);
    let destination = MockDestination::scripted(&[true, false, true]);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let record = converter.convert(request(&identity, None)).await.unwrap();

    assert_eq!(record.total, 3);
    assert_eq!(record.converted, 2);
    assert_eq!(record.failed, 1);
    assert_eq!(record.results.len(), 3);

    // one ledger entry per source item, in source order
    for (n, entry) in record.results.iter().enumerate() {
        assert_eq!(entry.source.id, format!("src-{}", n));
    }
    assert!(record.results[0].found);
    assert!(!record.results[1].found);
    assert!(record.results[2].found);

    // exactly the matched items were appended, in source order
    let appended = destination.appended.lock().unwrap();
    assert_eq!(*appended, vec!["dst-0".to_string(), "dst-2".to_string()]);
}

#[tokio::test]
async fn test_converted_plus_failed_equals_total() {
    let script = [true, true, false, true, false];
    let source = MockSource::with_items(script.len());
    let destination = MockDestination::scripted(&script);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let record = converter.convert(request(&identity, None)).await.unwrap();

    assert_eq!(record.converted + record.failed, record.total);
    assert_eq!(record.converted, 3);
    assert_eq!(record.failed, 2);
}

#[tokio::test]
async fn test_empty_playlist_yields_empty_record() {
    let source = MockSource::with_items(0);
    let destination = MockDestination::scripted(&[]);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let record = converter.convert(request(&identity, None)).await.unwrap();

    assert_eq!(record.total, 0);
    assert_eq!(record.converted, 0);
    assert_eq!(record.failed, 0);
    assert!(record.results.is_empty());
    assert_eq!(destination.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_destination_url_rejected_before_any_call() {
    let source = MockSource::with_items(2);
    let destination = MockDestination::scripted(&[true, true]);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let result = converter
        .convert(request(&identity, Some("https://elsewhere/nope")))
        .await;

    match result {
        Err(ConvertError::InvalidPlaylistUrl { provider, url }) => {
            assert_eq!(provider, Provider::YouTube);
            assert_eq!(url, "https://elsewhere/nope");
        }
        other => panic!("expected InvalidPlaylistUrl, got {:?}", other.map(|r| r.total)),
    }

    // rejected before the first outbound call
    assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 0);
    assert_eq!(destination.fetch_calls.load(Ordering::SeqCst), 0);
    assert_eq!(destination.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(destination.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_existing_destination_playlist_is_reused() {
    let source = MockSource::with_items(1);
    let destination = MockDestination::scripted(&[true]);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let record = converter
        .convert(request(&identity, Some("https://dest/playlist/existing-1")))
        .await
        .unwrap();

    assert_eq!(record.destination_playlist_id, "existing-1");
    assert_eq!(destination.fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(destination.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_repeat_conversion_creates_independent_playlists() {
    let source = MockSource::with_items(1);
    let destination = MockDestination::scripted(&[true, true]);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let first = converter.convert(request(&identity, None)).await.unwrap();
    let second = converter.convert(request(&identity, None)).await.unwrap();

    assert_eq!(destination.create_calls.load(Ordering::SeqCst), 2);
    assert_ne!(first.destination_playlist_id, second.destination_playlist_id);
}

#[tokio::test]
async fn test_missing_source_identity_requires_authorization() {
    let mut source = MockSource::with_items(1);
    source.requires_token = true;
    let destination = MockDestination::scripted(&[true]);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let result = converter
        .convert(ConversionRequest {
            source_playlist_id: "src-playlist",
            source_identity: None,
            destination_identity: &identity,
            destination_url: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(ConvertError::AuthorizationRequired {
            provider: Provider::Spotify
        })
    ));
    assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_append_counts_as_failed() {
    let source = MockSource::with_items(2);
    let mut destination = MockDestination::scripted(&[true, true]);
    destination.reject_appends = true;
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let record = converter.convert(request(&identity, None)).await.unwrap();

    // a match the platform refused to append is not a conversion
    assert_eq!(record.converted, 0);
    assert_eq!(record.failed, 2);
    assert!(record.results.iter().all(|entry| !entry.found));
}

#[tokio::test]
async fn test_expired_authorization_mid_run_aborts() {
    let source = MockSource::with_items(3);
    let mut destination = MockDestination::scripted(&[true, true, true]);
    destination.auth_fail_on_search = Some(1);
    let identity = anonymous();

    let converter = Converter::new(&source, &destination, &NoopPacer);
    let result = converter.convert(request(&identity, None)).await;

    assert!(matches!(
        result,
        Err(ConvertError::AuthorizationRequired {
            provider: Provider::YouTube
        })
    ));

    // only the item processed before the failure was appended
    let appended = destination.appended.lock().unwrap();
    assert_eq!(*appended, vec!["dst-0".to_string()]);
}
