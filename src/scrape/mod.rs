// src/scrape/mod.rs
mod reconcile;
mod wikidata;
mod wikipedia;

use std::sync::Arc;

use crate::{
    config::{CountryConfig, HarvestOptions, SourceStrategy},
    data::{Acquisition, SourceKind},
    error::HarvestError,
    progress::Progress,
};

pub use reconcile::{Harvest, Reconciler, RicherSet, SelectionPolicy};
pub use wikidata::WikidataSource;
pub use wikipedia::WikipediaSource;

/// One place municipalities can come from.
pub trait AcquisitionSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Never fails as a whole: unreachable regions or pages end up in
    /// `Acquisition::failures`.
    fn acquire(&self, progress: &dyn Progress) -> Acquisition;
}

/// The sources a strategy stands for, configured from `options`.
pub fn sources_for(
    country: &CountryConfig,
    options: &HarvestOptions,
) -> Result<Reconciler, HarvestError> {
    let country = Arc::new(country.clone());
    let mut rec = Reconciler::default();
    if matches!(options.source, SourceStrategy::Both | SourceStrategy::Wikipedia) {
        rec = rec.with_source(Box::new(WikipediaSource::new(Arc::clone(&country), options)?));
    }
    if matches!(options.source, SourceStrategy::Both | SourceStrategy::Wikidata) {
        rec = rec.with_source(Box::new(WikidataSource::new(Arc::clone(&country), options)?));
    }
    Ok(rec)
}

/// Acquire `country` from the sources `options.source` names and keep the richer result.
pub fn harvest(
    country: &CountryConfig,
    options: &HarvestOptions,
    progress: &dyn Progress,
) -> Result<Harvest, HarvestError> {
    logf!("Harvesting {} ({:?})", country.name, options.source);
    let reconciler = sources_for(country, options)?;
    progress.begin(country.regions.len());
    let out = reconciler.run(progress);
    progress.finish();
    out
}
