//! On-disk catalog snapshot written by imports and served by the web API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use taylor_core::{CatalogItem, ErrorContext, TaylorError, TaylorResult};
use tracing::{debug, info};

use crate::orchestrator::{ImportSummary, SourceStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<CatalogItem>,
}

impl CatalogSnapshot {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            generated_at: Utc::now(),
            items,
        }
    }

    /// Load a snapshot; a missing file is not an error
    pub fn load<P: AsRef<Path>>(path: P) -> TaylorResult<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No catalog snapshot at {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&content).map_err(|e| TaylorError::Storage {
            message: format!("Corrupt catalog snapshot {}: {}", path.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("catalog_snapshot")
                .with_operation("load")
                .with_suggestion("Re-run 'taylor import' to regenerate the snapshot"),
        })?;

        Ok(Some(snapshot))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> TaylorResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(
            "Wrote catalog snapshot with {} item(s) to {}",
            self.items.len(),
            path.display()
        );
        Ok(())
    }

    /// Combine a fresh import with the previous snapshot.
    ///
    /// Sources that succeeded are replaced wholesale. Sources that failed,
    /// timed out or were skipped keep their previous items. Retailers that
    /// were not part of this import are dropped.
    pub fn merge(previous: Option<&CatalogSnapshot>, summary: &ImportSummary) -> Self {
        let mut items = summary.items();

        if let Some(previous) = previous {
            let retained: Vec<&str> = summary
                .outcomes
                .iter()
                .filter(|outcome| !matches!(outcome.status, SourceStatus::Succeeded { .. }))
                .map(|outcome| outcome.source.as_str())
                .collect();

            let stale = previous
                .items
                .iter()
                .filter(|item| retained.contains(&item.retailer.as_str()))
                .cloned();
            items.extend(stale);
        }

        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::SourceOutcome;

    fn item(retailer: &str, id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: id.to_string(),
            brand: "Brand".to_string(),
            price: 1.0,
            category: String::new(),
            image_url: String::new(),
            retailer: retailer.to_string(),
            url: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_merge_keeps_previous_items_of_failed_sources() {
        let previous = CatalogSnapshot::new(vec![
            item("AlbeeBaby", "old-albee"),
            item("Impact", "old-impact"),
            item("Legacy", "old-legacy"),
        ]);

        let summary = ImportSummary {
            outcomes: vec![
                SourceOutcome {
                    source: "AlbeeBaby".to_string(),
                    status: SourceStatus::Succeeded {
                        item_count: 1,
                        items: vec![item("AlbeeBaby", "new-albee")],
                    },
                    duration_ms: 5,
                },
                SourceOutcome {
                    source: "Impact".to_string(),
                    status: SourceStatus::Failed {
                        error: "HTTP 500".to_string(),
                    },
                    duration_ms: 5,
                },
            ],
        };

        let merged = CatalogSnapshot::merge(Some(&previous), &summary);
        let ids: Vec<&str> = merged.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["new-albee", "old-impact"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("catalog.json");

        assert!(CatalogSnapshot::load(&path).unwrap().is_none());

        let snapshot = CatalogSnapshot::new(vec![item("SilverCross", "wave")]);
        snapshot.save(&path).unwrap();

        let loaded = CatalogSnapshot::load(&path).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_corrupt_snapshot_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            CatalogSnapshot::load(&path),
            Err(TaylorError::Storage { .. })
        ));
    }
}
