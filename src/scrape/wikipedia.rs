// src/scrape/wikipedia.rs
//
// Region-by-region acquisition from Wikipedia list pages: a small pool of
// worker threads pulls region indices from a shared counter and reports each
// outcome over a channel to the calling thread.

use std::{
    collections::HashSet,
    sync::{atomic::{AtomicUsize, Ordering}, mpsc, Arc},
    thread,
    time::Duration,
};

use crate::{
    config::{consts::JITTER_MS, CountryConfig, HarvestOptions},
    core::Fetcher,
    data::{Acquisition, Municipality, RegionFailure, SourceKind},
    error::FetchError,
    progress::Progress,
    specs::wikipedia::{api_error, decode_page, page_html, parse_params, resolve_locator},
};

use super::AcquisitionSource;

struct Outcome {
    index: usize,
    result: Result<Vec<Municipality>, String>,
}

/// Fetch and decode one region by name. `Err` carries the failure reason.
type RegionFetch = dyn Fn(&str) -> Result<Vec<Municipality>, String> + Send + Sync;

pub struct WikipediaSource {
    country: Arc<CountryConfig>,
    fetch: Arc<RegionFetch>,
    workers: usize,
    request_pause: Duration,
    sequential_pause: Duration,
}

impl WikipediaSource {
    pub fn new(country: Arc<CountryConfig>, options: &HarvestOptions) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new("wikipedia", options.wikipedia_timeout, options.wikipedia_retry_base)?;
        let target = Arc::clone(&country);
        let fetch: Arc<RegionFetch> = Arc::new(move |region: &str| fetch_region(&fetcher, &target, region));
        Ok(Self::with_fetch(country, options, fetch))
    }

    fn with_fetch(country: Arc<CountryConfig>, options: &HarvestOptions, fetch: Arc<RegionFetch>) -> Self {
        Self {
            country,
            fetch,
            workers: options.workers,
            request_pause: options.request_pause,
            sequential_pause: options.sequential_pause,
        }
    }

    /// Run the worker pool; regions it could not report on are redone sequentially.
    pub fn collect(&self, progress: &dyn Progress) -> Acquisition {
        let regions = &self.country.regions;
        let total = regions.len();
        logf!("Wikipedia: {} regions of {} with {} workers", total, self.country.name, self.workers);

        let mut slots: Vec<Option<Result<Vec<Municipality>, String>>> = vec![None; total];
        let mut completed = 0usize;

        let (res_tx, res_rx) = mpsc::channel::<Outcome>();
        let counter = Arc::new(AtomicUsize::new(0));
        let workers = self.workers.min(total).max(1);

        // Spawn workers
        let mut spawned = 0usize;
        for w in 0..workers {
            let tx = res_tx.clone();
            let idx = Arc::clone(&counter);
            let country = Arc::clone(&self.country);
            let fetch = Arc::clone(&self.fetch);
            let pause = self.request_pause;

            let spawn = thread::Builder::new()
                .name(format!("wikipedia-{w}"))
                .spawn(move || {
                    loop {
                        let i = idx.fetch_add(1, Ordering::Relaxed);
                        if i >= country.regions.len() {
                            break;
                        }
                        let result = fetch(&country.regions[i]);
                        if tx.send(Outcome { index: i, result }).is_err() {
                            break;
                        }
                        thread::sleep(polite_pause(pause, i)); // be polite
                    }
                });
            match spawn {
                Ok(_) => spawned += 1,
                Err(e) => loge!("Wikipedia: could not spawn worker {w}: {e}"),
            }
        }
        drop(res_tx); // calling thread is sole receiver now

        // Aggregate results
        if spawned > 0 {
            while completed < total {
                match res_rx.recv() {
                    Ok(Outcome { index, result }) => {
                        if slots[index].is_some() {
                            continue;
                        }
                        slots[index] = Some(result);
                        completed += 1;
                        progress.advance(completed, total, &regions[index]);
                    }
                    Err(_) => break, // every worker ended, some without reporting
                }
            }
        }

        // Sequential fallback for whatever never reported
        if completed < total {
            logw!(
                "Wikipedia: worker pool reported {completed}/{total} regions, finishing sequentially"
            );
            progress.log("Parallel fetch failed, continuing one region at a time");
            let mut first = true;
            for index in 0..total {
                if slots[index].is_some() {
                    continue;
                }
                if !first {
                    thread::sleep(self.sequential_pause);
                }
                first = false;
                slots[index] = Some((self.fetch)(&regions[index]));
                completed += 1;
                progress.advance(completed, total, &regions[index]);
            }
        }

        merge(slots, regions)
    }
}

impl AcquisitionSource for WikipediaSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Tabular
    }

    fn acquire(&self, progress: &dyn Progress) -> Acquisition {
        self.collect(progress)
    }
}

fn polite_pause(pause: Duration, i: usize) -> Duration {
    if pause.is_zero() {
        return pause;
    }
    let jitter = (i as u64 * 17) % JITTER_MS;
    pause + Duration::from_millis(jitter)
}

/// Resolve → fetch → decode one region.
fn fetch_region(fetcher: &Fetcher, country: &CountryConfig, region: &str) -> Result<Vec<Municipality>, String> {
    let title = resolve_locator(region, country);
    logd!("Wikipedia: {region} → {title}");

    let resp = fetcher
        .get_json(&country.wikipedia_api, &parse_params(&title), None)
        .map_err(|e| e.to_string())?;

    match page_html(&resp) {
        Some(html) => {
            let rows = decode_page(html, region);
            logd!("Wikipedia: {region}: {} rows", rows.len());
            Ok(rows)
        }
        None => {
            let reason = match api_error(&resp) {
                Some(e) => format!("no page content for '{title}' ({e})"),
                None => format!("no page content for '{title}'"),
            };
            logw!("Wikipedia: {region}: {reason}");
            Err(reason)
        }
    }
}

/// Flatten outcomes in region order. A repeated name keeps its first row, so
/// regions that share a list page do not count its municipalities twice.
fn merge(slots: Vec<Option<Result<Vec<Municipality>, String>>>, regions: &[String]) -> Acquisition {
    let mut acq = Acquisition::empty(SourceKind::Tabular);
    let mut seen: HashSet<String> = HashSet::new();

    for (slot, region) in slots.into_iter().zip(regions) {
        match slot {
            Some(Ok(rows)) => {
                for m in rows {
                    if seen.insert(m.name.clone()) {
                        acq.records.push(m);
                    }
                }
            }
            Some(Err(reason)) => acq.failures.push(RegionFailure::new(region.as_str(), reason)),
            None => acq.failures.push(RegionFailure::new(region.as_str(), "not processed")),
        }
    }

    if !acq.failures.is_empty() {
        let names: Vec<&str> = acq.failures.iter().map(|f| f.region.as_str()).collect();
        logw!("Wikipedia: failed regions: {}", names.join(", "));
    }
    logf!(
        "Wikipedia: {} municipalities, {}/{} regions ok",
        acq.records.len(),
        regions.len() - acq.failures.len(),
        regions.len()
    );
    acq
}
