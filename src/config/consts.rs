// src/config/consts.rs
use std::time::Duration;

// Net config
pub const USER_AGENT: &str =
    "muni_scrape/0.4 (municipal population harvester; https://github.com/muni-scrape/muni_scrape)";
pub const WIKIDATA_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const WIKIPEDIA_TIMEOUT: Duration = Duration::from_secs(60);
pub const WIKIDATA_TIMEOUT: Duration = Duration::from_secs(120);

// Retry. The cap is fixed; only the base delay differs per source.
pub const MAX_ATTEMPTS: u32 = 3;
pub const WIKIPEDIA_RETRY_BASE: Duration = Duration::from_secs(2);
pub const WIKIDATA_RETRY_BASE: Duration = Duration::from_secs(5);

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 500; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
pub const SEQUENTIAL_PAUSE_MS: u64 = 300;

// Wikidata paging
pub const WIKIDATA_PAGE_SIZE: usize = 5000;
pub const WIKIDATA_PAGE_PAUSE_MS: u64 = 2000;

// Region resolution
pub const FULL_TITLE_PREFIXES: &[&str] = &["Lista_", "Liste_", "Anexo:", "Comuni_"];

// Table decoding
pub const DATA_TABLE_CLASS: &str = "wikitable";
pub const POPULATION_FLOOR: f64 = 10.0;
pub const AREA_CEILING: f64 = 2000.0;

// Equipment allocation
pub const POPULATION_THRESHOLD: u64 = 2000;
pub const RURAL_BASELINE: u64 = 2000;
pub const EQUIPMENT_DIVISOR_RURAL: f64 = 51.0;
pub const EQUIPMENT_DIVISOR_URBAN: f64 = 301.0;
pub const DEFAULT_URBAN_PERCENTAGE: f64 = 0.95;

// Local files
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const FULL_TABLE_STEM: &str = "municipalities_full";
pub const SIMPLE_TABLE_STEM: &str = "municipalities_equipment";
