use std::{io::Error, path::PathBuf};

use crate::types::StoredConversion;

#[derive(Debug)]
pub enum HistoryError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for HistoryError {
    fn from(err: Error) -> Self {
        HistoryError::IoError(err)
    }
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::IoError(e) => write!(f, "io error: {}", e),
            HistoryError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Append-only store of completed conversion records.
///
/// Each conversion run owned by an authenticated user produces one new
/// record; records are never updated after creation. A repeat conversion of
/// the same playlist simply appends another record.
pub struct ConversionHistory {
    root: PathBuf,
}

impl ConversionHistory {
    pub fn new() -> Self {
        let mut root = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        root.push("tunebridge");
        Self { root }
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn path(&self) -> PathBuf {
        self.root.join("history.json")
    }

    pub async fn persist(&self, record: StoredConversion) -> Result<(), HistoryError> {
        let mut records = self.load_all().await?;
        records.push(record);

        let path = self.path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(HistoryError::IoError)?;
        }

        let json = serde_json::to_string_pretty(&records).map_err(HistoryError::SerdeError)?;
        async_fs::write(path, json)
            .await
            .map_err(HistoryError::IoError)
    }

    pub async fn load_all(&self) -> Result<Vec<StoredConversion>, HistoryError> {
        let content = match async_fs::read_to_string(self.path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryError::IoError(e)),
        };

        serde_json::from_str(&content).map_err(HistoryError::SerdeError)
    }
}

impl Default for ConversionHistory {
    fn default() -> Self {
        Self::new()
    }
}
