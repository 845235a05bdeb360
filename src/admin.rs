//! Export / clear-all utilities
//!
//! Independent of the submit flow; the page triggers them from its own
//! controls (see the `export_submissions` / `clear_all_submissions` wasm
//! exports).

use crate::clock::Clock;
use crate::storage::KeyValueStore;
use crate::store::{StoreError, SubmissionStore};
use crate::ui::{Page, UiError};

pub const NOTHING_TO_EXPORT: &str = "No submissions to export.";
pub const CONFIRM_CLEAR: &str =
    "Are you sure you want to clear all submissions? This action cannot be undone.";
pub const CLEARED: &str = "All submissions have been cleared.";

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("download failed: {0}")]
    Download(#[from] UiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing stored; the user was told so
    Empty,
    Downloaded { filename: String, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// User declined the confirmation
    Cancelled,
    Cleared,
}

/// Offer every stored submission as a dated JSON download
pub fn export_submissions<K: KeyValueStore>(
    store: &SubmissionStore<K>,
    page: &impl Page,
    clock: &dyn Clock,
) -> Result<ExportOutcome, AdminError> {
    let Some(file) = store.export(clock.now().date_naive())? else {
        page.alert(NOTHING_TO_EXPORT);
        return Ok(ExportOutcome::Empty);
    };

    page.download(&file)?;
    log::info!("Exported {} submissions to {}", file.count, file.filename);

    Ok(ExportOutcome::Downloaded {
        filename: file.filename,
        count: file.count,
    })
}

/// Erase every stored submission after the user confirms, then reload
pub fn clear_all_submissions<K: KeyValueStore>(
    store: &SubmissionStore<K>,
    page: &impl Page,
) -> Result<ClearOutcome, AdminError> {
    if !page.confirm(CONFIRM_CLEAR) {
        log::info!("Clear-all cancelled");
        return Ok(ClearOutcome::Cancelled);
    }

    store.clear()?;
    page.alert(CLEARED);
    page.reload();
    Ok(ClearOutcome::Cleared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::config::FormConfig;
    use crate::storage::MemoryStorage;
    use crate::submission::{FormValues, Submission};
    use crate::ui::headless::HeadlessPage;
    use chrono::{Duration, TimeZone, Utc};

    fn store_with(count: usize) -> SubmissionStore<MemoryStorage> {
        let store = SubmissionStore::new(MemoryStorage::new(), &FormConfig::default());
        for i in 0..count {
            let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, i as u32).unwrap();
            let values = FormValues::new("Asha", "a@b.com", "9876543210", "hi");
            store.append(&Submission::new(values, ts)).unwrap();
        }
        store
    }

    fn clock() -> SteppingClock {
        SteppingClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 23, 30, 0).unwrap(),
            Duration::seconds(1),
        )
    }

    #[test]
    fn test_export_empty_alerts_without_file() {
        let page = HeadlessPage::new(true);
        let outcome = export_submissions(&store_with(0), &page, &clock()).unwrap();
        assert_eq!(outcome, ExportOutcome::Empty);
        assert_eq!(page.alerts(), vec![NOTHING_TO_EXPORT]);
        assert!(page.downloads().is_empty());
    }

    #[test]
    fn test_export_downloads_everything() {
        let page = HeadlessPage::new(true);
        let store = store_with(3);
        let outcome = export_submissions(&store, &page, &clock()).unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Downloaded {
                filename: "contact_submissions_2024-06-15.json".to_string(),
                count: 3,
            }
        );
        let downloads = page.downloads();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].mime, "application/json");
        let parsed: Vec<Submission> = serde_json::from_str(&downloads[0].contents).unwrap();
        assert_eq!(parsed, store.load().unwrap());
        assert!(page.alerts().is_empty());
    }

    #[test]
    fn test_export_count_matches_downloaded_file() {
        let page = HeadlessPage::new(true);
        let store = store_with(0);
        store
            .storage()
            .set_item(
                store.key(),
                r#"[{"name":"Old","email":"o@x.in","phone":"9876543210","message":"hi","timestamp":1714558830123}]"#,
            )
            .unwrap();
        store
            .append(&Submission::new(
                FormValues::new("Asha", "a@b.com", "9876543210", "hi"),
                Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            ))
            .unwrap();

        let outcome = export_submissions(&store, &page, &clock()).unwrap();

        let downloads = page.downloads();
        let records: Vec<serde_json::Value> = serde_json::from_str(&downloads[0].contents).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(outcome, ExportOutcome::Downloaded { count: 2, .. }));
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let page = HeadlessPage::new(false);
        let store = store_with(2);
        let outcome = clear_all_submissions(&store, &page).unwrap();
        assert_eq!(outcome, ClearOutcome::Cancelled);
        assert_eq!(page.confirms(), vec![CONFIRM_CLEAR]);
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(page.reloads(), 0);
    }

    #[test]
    fn test_clear_erases_alerts_and_reloads() {
        let page = HeadlessPage::new(true);
        let store = store_with(2);
        let outcome = clear_all_submissions(&store, &page).unwrap();
        assert_eq!(outcome, ClearOutcome::Cleared);
        assert!(store.is_empty().unwrap());
        assert_eq!(page.alerts(), vec![CLEARED]);
        assert_eq!(page.reloads(), 1);
        // Clearing an already empty store is fine
        assert_eq!(clear_all_submissions(&store, &page).unwrap(), ClearOutcome::Cleared);
    }
}
