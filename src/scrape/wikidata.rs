// src/scrape/wikidata.rs
//
// Paged SPARQL acquisition. One page at a time, deduplicated by label.

use std::{collections::HashSet, sync::Arc, thread, time::Duration};

use crate::{
    config::{CountryConfig, HarvestOptions},
    core::Fetcher,
    data::{Acquisition, RegionFailure, SourceKind},
    error::FetchError,
    progress::Progress,
    specs::wikidata::{build_query, decode_bindings, SparqlResponse, SPARQL_ACCEPT},
};

use super::AcquisitionSource;

pub struct WikidataSource {
    country: Arc<CountryConfig>,
    fetcher: Fetcher,
    endpoint: String,
    page_size: usize,
    page_pause: Duration,
}

impl WikidataSource {
    pub fn new(country: Arc<CountryConfig>, options: &HarvestOptions) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new("wikidata", options.wikidata_timeout, options.wikidata_retry_base)?;
        Ok(Self {
            country,
            fetcher,
            endpoint: options.wikidata_endpoint.clone(),
            page_size: options.page_size.max(1),
            page_pause: options.page_pause,
        })
    }

    /// Page through the query until a short page, an empty page or a failed page.
    pub fn collect(&self, progress: &dyn Progress) -> Acquisition {
        let expected = self.country.expected_municipalities;
        let language = self.country.language.as_str();
        logf!("Wikidata: {} (expected ~{expected} municipalities)", self.country.name);

        let mut acq = Acquisition::empty(SourceKind::Structured);
        let mut seen: HashSet<String> = HashSet::new();
        let mut offset = 0usize;
        let mut page = 0usize;

        loop {
            page += 1;
            progress.advance(acq.len(), expected, &format!("page {page}: offset {offset}"));

            let query = build_query(&self.country.wikidata, language, offset, self.page_size);
            let params = [("query", query.as_str()), ("format", "json")];

            let body = match self.fetcher.get_json(&self.endpoint, &params, Some(SPARQL_ACCEPT)) {
                Ok(v) => v,
                Err(e) => {
                    loge!("Wikidata: page {page} failed: {e}");
                    acq.failures.push(RegionFailure::new(
                        format!("page {page} (offset {offset})"),
                        e.to_string(),
                    ));
                    break;
                }
            };

            let resp: SparqlResponse = match serde_json::from_value(body) {
                Ok(r) => r,
                Err(e) => {
                    logw!("Wikidata: page {page} has no results block ({e}), stopping");
                    break;
                }
            };

            let raw = resp.results.bindings.len();
            if raw == 0 {
                break;
            }
            let fresh = decode_bindings(&resp.results.bindings, &mut seen);
            logd!("Wikidata: page {page}: {raw} bindings, {} new", fresh.len());
            acq.records.extend(fresh);

            if raw < self.page_size {
                break;
            }
            offset += self.page_size;
            thread::sleep(self.page_pause);
        }

        progress.advance(acq.len(), expected.max(acq.len()), "done");
        logf!("Wikidata: {} municipalities in {page} page(s)", acq.len());
        acq
    }
}

impl AcquisitionSource for WikidataSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Structured
    }

    fn acquire(&self, progress: &dyn Progress) -> Acquisition {
        self.collect(progress)
    }
}
