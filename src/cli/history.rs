use chrono::DateTime;
use tabled::Table;

use crate::{error, history::ConversionHistory, info, types::HistoryTableRow};

/// Prints all recorded conversions as a table, newest last.
pub async fn history() {
    let store = ConversionHistory::new();
    let records = match store.load_all().await {
        Ok(records) => records,
        Err(e) => error!("Failed to load conversion history: {}", e),
    };

    if records.is_empty() {
        info!("No conversions recorded yet.");
        return;
    }

    let rows: Vec<HistoryTableRow> = records
        .iter()
        .map(|stored| HistoryTableRow {
            date: DateTime::from_timestamp(stored.created_at, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            source: format!(
                "{} ({})",
                stored.record.source_playlist_title, stored.record.source_provider
            ),
            destination: format!(
                "{} ({})",
                stored.record.destination_playlist_title, stored.record.destination_provider
            ),
            total: stored.record.total,
            converted: stored.record.converted,
            failed: stored.record.failed,
        })
        .collect();

    let table = Table::new(rows);
    println!("{}", table);
}
