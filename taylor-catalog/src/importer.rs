//! Importer abstraction and construction from configuration

use async_trait::async_trait;
use taylor_core::{CatalogItem, TaylorConfig, TaylorResult};
use tracing::info;

use crate::{AlbeeBabyImporter, ImpactImporter, SilverCrossImporter};

/// A single retailer feed that yields catalog items
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// Retailer name, used as the `retailer` field and in import summaries
    fn source(&self) -> &str;

    /// Fetch and normalize the retailer's full catalog
    async fn import(&self) -> TaylorResult<Vec<CatalogItem>>;
}

/// Factory for creating the configured importers
pub struct ImporterFactory;

impl ImporterFactory {
    /// Build every enabled importer, in the fixed order AlbeeBaby, Impact, SilverCross
    pub fn from_config(config: &TaylorConfig) -> TaylorResult<Vec<Box<dyn CatalogImporter>>> {
        let mut importers: Vec<Box<dyn CatalogImporter>> = Vec::new();
        let sources = &config.sources;

        if sources.albeebaby.enabled {
            importers.push(Box::new(AlbeeBabyImporter::new(
                &sources.albeebaby,
                &config.http,
            )?));
        }

        if sources.impact.enabled {
            importers.push(Box::new(ImpactImporter::new(&sources.impact, &config.http)?));
        }

        if sources.silvercross.enabled {
            importers.push(Box::new(SilverCrossImporter::new(
                &sources.silvercross,
                &config.http,
            )?));
        }

        info!(
            "Configured {} catalog importer(s): {}",
            importers.len(),
            importers
                .iter()
                .map(|importer| importer.source())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(importers)
    }
}
