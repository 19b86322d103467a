//! Catalog import jobs
//!
//! Per-retailer feed importers and the orchestrator that runs them and
//! aggregates their outcomes into a catalog snapshot.

pub mod albeebaby;
pub mod client;
pub mod impact;
pub mod importer;
pub mod orchestrator;
pub mod silvercross;
pub mod snapshot;


pub use albeebaby::AlbeeBabyImporter;
pub use client::{create_http_client, FeedClientConfig};
pub use impact::ImpactImporter;
pub use importer::{CatalogImporter, ImporterFactory};
pub use orchestrator::{
    import_catalog_feeds, ImportOptions, ImportSummary, SourceOutcome, SourceStatus,
};
pub use silvercross::SilverCrossImporter;
pub use snapshot::CatalogSnapshot;
