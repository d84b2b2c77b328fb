// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use crate::equipment::AllocationRule;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AppOptions {
    pub harvest: HarvestOptions,
    pub allocation: AllocationRule,
    pub export: ExportOptions,
}

/// Which acquisition sources take part in a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceStrategy {
    Both,
    Wikipedia,
    Wikidata,
}

impl SourceStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "all" => Some(Self::Both),
            "wikipedia" | "wiki" => Some(Self::Wikipedia),
            "wikidata" | "sparql" => Some(Self::Wikidata),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HarvestOptions {
    pub source: SourceStrategy,
    /// Worker threads for the Wikipedia engine.
    pub workers: usize,
    pub wikipedia_retry_base: Duration,
    pub wikidata_retry_base: Duration,
    pub wikipedia_timeout: Duration,
    pub wikidata_timeout: Duration,
    pub wikidata_endpoint: String,
    /// Pause a worker takes after each region (plus jitter).
    pub request_pause: Duration,
    /// Pause between regions when the pool has fallen back to sequential mode.
    pub sequential_pause: Duration,
    pub page_pause: Duration,
    pub page_size: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            source: SourceStrategy::Both,
            workers: WORKERS,
            wikipedia_retry_base: WIKIPEDIA_RETRY_BASE,
            wikidata_retry_base: WIKIDATA_RETRY_BASE,
            wikipedia_timeout: WIKIPEDIA_TIMEOUT,
            wikidata_timeout: WIKIDATA_TIMEOUT,
            wikidata_endpoint: s!(WIKIDATA_ENDPOINT),
            request_pause: Duration::from_millis(REQUEST_PAUSE_MS),
            sequential_pause: Duration::from_millis(SEQUENTIAL_PAUSE_MS),
            page_pause: Duration::from_millis(WIKIDATA_PAGE_PAUSE_MS),
            page_size: WIKIDATA_PAGE_SIZE,
        }
    }
}

impl HarvestOptions {
    /// Same options with every sleep set to zero. Used against local mock servers.
    pub fn without_delays(mut self) -> Self {
        self.wikipedia_retry_base = Duration::ZERO;
        self.wikidata_retry_base = Duration::ZERO;
        self.request_pause = Duration::ZERO;
        self.sequential_pause = Duration::ZERO;
        self.page_pause = Duration::ZERO;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub out_dir: PathBuf,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// `<out_dir>/<stem>_<country>.<ext>`
    pub fn path_for(&self, stem: &str, country: &str) -> PathBuf {
        let country = crate::core::sanitize::sanitize_filename(country);
        self.out_dir.join(join!(stem, "_", &country, ".", self.format.ext()))
    }

    pub fn full_table_path(&self, country: &str) -> PathBuf {
        self.path_for(FULL_TABLE_STEM, country)
    }

    pub fn simple_table_path(&self, country: &str) -> PathBuf {
        self.path_for(SIMPLE_TABLE_STEM, country)
    }
}
