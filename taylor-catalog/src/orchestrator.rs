//! Catalog import orchestration
//!
//! Runs importers one after another and records a per-source outcome. Under
//! [`ImportPolicy::ContinueOnError`] every source is attempted; under
//! [`ImportPolicy::FailFast`] the first failure stops the batch and the
//! remaining sources are reported as skipped.

use serde::Serialize;
use std::time::Instant;
use taylor_core::{
    log_operation_error, log_operation_start, log_operation_success, with_timeout, CatalogItem,
    ImportPolicy, TaylorError,
};
use tracing::warn;

use crate::importer::CatalogImporter;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub policy: ImportPolicy,
    /// Per-source timeout in milliseconds
    pub source_timeout_ms: Option<u64>,
}

impl ImportOptions {
    pub fn from_config(config: &taylor_core::ImportConfig) -> Self {
        Self {
            policy: config.policy,
            source_timeout_ms: config.source_timeout_secs.map(|secs| secs * 1000),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Succeeded {
        item_count: usize,
        #[serde(skip)]
        items: Vec<CatalogItem>,
    },
    Failed {
        error: String,
    },
    TimedOut {
        timeout_ms: u64,
    },
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOutcome {
    pub source: String,
    #[serde(flatten)]
    pub status: SourceStatus,
    pub duration_ms: u64,
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, SourceStatus::Succeeded { .. })
    }
}

/// Result of one import batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub outcomes: Vec<SourceOutcome>,
}

impl ImportSummary {
    /// Items from every successful source, in source order
    pub fn items(&self) -> Vec<CatalogItem> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.status {
                SourceStatus::Succeeded { items, .. } => Some(items.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn succeeded_sources(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_success())
            .map(|outcome| outcome.source.as_str())
            .collect()
    }

    /// Sources that failed or timed out; skipped sources are not counted
    pub fn failed_sources(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| {
                matches!(
                    outcome.status,
                    SourceStatus::Failed { .. } | SourceStatus::TimedOut { .. }
                )
            })
            .map(|outcome| outcome.source.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(SourceOutcome::is_success)
    }
}

/// Import every source sequentially and aggregate the outcomes
pub async fn import_catalog_feeds(
    importers: &[Box<dyn CatalogImporter>],
    options: ImportOptions,
) -> ImportSummary {
    log_operation_start!("import_catalog_feeds", sources = importers.len());

    let mut summary = ImportSummary::default();
    let mut aborted = false;

    for importer in importers {
        let source = importer.source().to_string();

        if aborted {
            summary.outcomes.push(SourceOutcome {
                source,
                status: SourceStatus::Skipped,
                duration_ms: 0,
            });
            continue;
        }

        let started = Instant::now();
        let result = match options.source_timeout_ms {
            Some(timeout_ms) => with_timeout(importer.import(), timeout_ms, &source)
                .await
                .and_then(|inner| inner),
            None => importer.import().await,
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let status = match result {
            Ok(items) => {
                log_operation_success!("import_source", source = %source, items = items.len());
                SourceStatus::Succeeded {
                    item_count: items.len(),
                    items,
                }
            }
            Err(TaylorError::Timeout { duration_ms, .. }) => {
                warn!(source = %source, timeout_ms = duration_ms, "Catalog source timed out");
                SourceStatus::TimedOut {
                    timeout_ms: duration_ms,
                }
            }
            Err(error) => {
                log_operation_error!(
                    "import_source",
                    error,
                    source = %source,
                    recoverable = error.is_recoverable()
                );
                SourceStatus::Failed {
                    error: error.to_string(),
                }
            }
        };

        if !matches!(status, SourceStatus::Succeeded { .. })
            && options.policy == ImportPolicy::FailFast
        {
            aborted = true;
        }

        summary.outcomes.push(SourceOutcome {
            source,
            status,
            duration_ms,
        });
    }

    log_operation_success!(
        "import_catalog_feeds",
        succeeded = summary.succeeded_sources().len(),
        failed = summary.failed_sources().len()
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use taylor_core::{feed_error, TaylorResult};

    struct FakeImporter {
        name: &'static str,
        fail: bool,
        delay: Option<Duration>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeImporter {
        fn boxed(
            name: &'static str,
            fail: bool,
            calls: &Arc<AtomicUsize>,
        ) -> Box<dyn CatalogImporter> {
            Box::new(Self {
                name,
                fail,
                delay: None,
                calls: calls.clone(),
            })
        }
    }

    #[async_trait]
    impl CatalogImporter for FakeImporter {
        fn source(&self) -> &str {
            self.name
        }

        async fn import(&self) -> TaylorResult<Vec<CatalogItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(feed_error!("feed unavailable", self.name));
            }
            Ok(vec![CatalogItem {
                id: format!("{}-1", self.name.to_lowercase()),
                name: format!("{} item", self.name),
                brand: "Brand".to_string(),
                price: 10.0,
                category: "Gear".to_string(),
                image_url: String::new(),
                retailer: self.name.to_string(),
                url: String::new(),
                notes: String::new(),
            }])
        }
    }

    #[tokio::test]
    async fn test_failure_in_middle_source_does_not_stop_the_batch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let importers = vec![
            FakeImporter::boxed("AlbeeBaby", false, &calls),
            FakeImporter::boxed("Impact", true, &calls),
            FakeImporter::boxed("SilverCross", false, &calls),
        ];

        let summary = import_catalog_feeds(&importers, ImportOptions::default()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(summary.succeeded_sources(), vec!["AlbeeBaby", "SilverCross"]);
        assert_eq!(summary.failed_sources(), vec!["Impact"]);
        assert!(!summary.is_success());
        assert_eq!(summary.items().len(), 2);

        match &summary.outcomes[1].status {
            SourceStatus::Failed { error } => assert!(error.contains("feed unavailable")),
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fail_fast_skips_remaining_sources() {
        let calls = Arc::new(AtomicUsize::new(0));
        let importers = vec![
            FakeImporter::boxed("AlbeeBaby", false, &calls),
            FakeImporter::boxed("Impact", true, &calls),
            FakeImporter::boxed("SilverCross", false, &calls),
        ];

        let options = ImportOptions {
            policy: ImportPolicy::FailFast,
            source_timeout_ms: None,
        };
        let summary = import_catalog_feeds(&importers, options).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(summary.outcomes[2].status, SourceStatus::Skipped));
        assert_eq!(summary.failed_sources(), vec!["Impact"]);
        assert!(!summary.is_success());
    }

    #[tokio::test]
    async fn test_hung_source_times_out_without_blocking_others() {
        let calls = Arc::new(AtomicUsize::new(0));
        let importers: Vec<Box<dyn CatalogImporter>> = vec![
            Box::new(FakeImporter {
                name: "AlbeeBaby",
                fail: false,
                delay: Some(Duration::from_secs(5)),
                calls: calls.clone(),
            }),
            FakeImporter::boxed("SilverCross", false, &calls),
        ];

        let options = ImportOptions {
            policy: ImportPolicy::ContinueOnError,
            source_timeout_ms: Some(20),
        };
        let summary = import_catalog_feeds(&importers, options).await;

        assert!(matches!(
            summary.outcomes[0].status,
            SourceStatus::TimedOut { timeout_ms: 20 }
        ));
        assert!(summary.outcomes[1].is_success());
        assert_eq!(summary.failed_sources(), vec!["AlbeeBaby"]);
    }

    #[tokio::test]
    async fn test_all_sources_succeed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let importers = vec![
            FakeImporter::boxed("AlbeeBaby", false, &calls),
            FakeImporter::boxed("Impact", false, &calls),
        ];

        let summary = import_catalog_feeds(&importers, ImportOptions::default()).await;
        assert!(summary.is_success());
        assert!(summary.failed_sources().is_empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["outcomes"][0]["status"], "succeeded");
        assert_eq!(json["outcomes"][0]["item_count"], 1);
        assert_eq!(json["outcomes"][0]["source"], "AlbeeBaby");
    }
}
