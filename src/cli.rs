// src/cli.rs
//
// Command-line front end: argument parsing, terminal progress, run summary.

use std::{collections::HashMap, path::PathBuf, sync::Mutex, time::Instant};

use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::{
    config::{
        consts::{DEFAULT_OUT_DIR, POPULATION_THRESHOLD, WORKERS},
        country,
        options::{AppOptions, ExportFormat, SourceStrategy},
    },
    data::SourceKind,
    equipment::Statistics,
    error::ConfigError,
    file,
    progress::Progress,
    scrape,
};

const BAR_TEMPLATE: &str = "{prefix:>9} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

#[derive(Parser, Debug)]
#[command(name = "muni_scrape", version, about = "Municipality populations from Wikipedia and Wikidata, with equipment tables")]
pub struct Args {
    /// Country name or alias (see --list)
    #[arg(short, long, default_value = "España")]
    pub country: String,

    /// both | wikipedia | wikidata
    #[arg(short, long, default_value = "both", value_parser = parse_source)]
    pub source: SourceStrategy,

    /// Output directory for the tables
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// List available countries and exit
    #[arg(long)]
    pub list: bool,

    /// Parallel Wikipedia requests
    #[arg(long, default_value_t = WORKERS)]
    pub workers: usize,

    /// Population at which a municipality counts as urban
    #[arg(long, default_value_t = POPULATION_THRESHOLD)]
    pub threshold: u64,

    /// Tab-separated output instead of CSV
    #[arg(long)]
    pub tsv: bool,

    /// Omit the header row
    #[arg(long)]
    pub no_headers: bool,
}

fn parse_source(s: &str) -> Result<SourceStrategy, String> {
    SourceStrategy::parse(s).ok_or_else(|| format!("unknown source '{s}' (both, wikipedia, wikidata)"))
}

impl Args {
    pub fn to_options(&self) -> Result<AppOptions, ConfigError> {
        let mut opts = AppOptions::default();
        opts.harvest.source = self.source;
        opts.harvest.workers = self.workers.max(1);
        opts.allocation = opts.allocation.with_threshold(self.threshold)?;
        opts.export.out_dir = self.out.clone();
        opts.export.format = if self.tsv { ExportFormat::Tsv } else { ExportFormat::Csv };
        opts.export.include_headers = !self.no_headers;
        Ok(opts)
    }
}

/// One bar per source, created on first report.
pub struct BarProgress {
    mp: MultiProgress,
    bars: Mutex<HashMap<SourceKind, ProgressBar>>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self { mp: MultiProgress::new(), bars: Mutex::new(HashMap::new()) }
    }

    fn bar(&self, source: SourceKind, total: usize) -> Option<ProgressBar> {
        let mut bars = self.bars.lock().ok()?;
        let pb = bars.entry(source).or_insert_with(|| {
            let pb = self.mp.add(ProgressBar::new(total as u64));
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_prefix(source.label());
            pb
        });
        Some(pb.clone())
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for BarProgress {
    fn advance_from(&self, source: SourceKind, completed: usize, total: usize, message: &str) {
        if let Some(pb) = self.bar(source, total) {
            pb.set_length(total.max(completed) as u64);
            pb.set_position(completed as u64);
            pb.set_message(message.to_string());
        }
    }

    fn log(&self, msg: &str) {
        let _ = self.mp.println(msg);
    }

    fn finish(&self) {
        if let Ok(bars) = self.bars.lock() {
            for pb in bars.values() {
                pb.finish();
            }
        }
    }
}

fn list_countries() -> color_eyre::Result<()> {
    println!("\nAvailable countries:");
    println!("{}", "-".repeat(40));
    for c in country::builtin()? {
        println!("  • {} ({} regions, Wikipedia {})", c.name, c.regions.len(), c.language);
    }
    println!();
    Ok(())
}

pub fn run(args: Args) -> color_eyre::Result<()> {
    if args.list {
        return list_countries();
    }

    let country = country::find(&args.country)?;
    let opts = args.to_options()?;
    let started = Instant::now();

    let rule = &opts.allocation;
    println!("{}", "=".repeat(60));
    println!("  Country: {}", country.name);
    println!("  Urban: >= {0} hab | Rural: < {0} hab", rule.threshold);
    println!("  Fixed rural baseline for urban municipalities: {} hab", rule.rural_baseline);
    println!("  Urban equipment = population / {}", rule.urban_divisor);
    println!("  Rural equipment = population / {}", rule.rural_divisor);
    println!("{}", "=".repeat(60));

    println!("\n[1/2] Fetching municipality data...");
    let progress = BarProgress::new();
    let harvest = scrape::harvest(&country, &opts.harvest, &progress)?;

    for (kind, n) in &harvest.counts {
        println!("  {kind}: {n} municipalities");
    }
    println!("  Using {}", harvest.chosen_kind());
    for (kind, failures) in &harvest.failures_by_source {
        if !failures.is_empty() {
            let names: Vec<&str> = failures.iter().map(|f| f.region.as_str()).collect();
            println!("  {kind} failed: {}", names.join(", "));
        }
    }

    println!("\n  Statistics");
    print!("{}", Statistics::collect(&harvest.chosen.records, rule));

    println!("\n[2/2] Writing tables...");
    let [full, simple] = file::write_exports(
        &harvest.chosen.records,
        &country.name,
        &country.labels,
        rule,
        &opts.export,
    )?;
    println!("  1. {}", full.display());
    println!("  2. {}", simple.display());
    println!("\n  Done in {:.1?}", started.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_onto_options() {
        let args = Args::parse_from([
            "muni_scrape", "--country", "france", "--source", "wikidata", "--threshold", "3000", "--tsv",
        ]);
        let opts = args.to_options().unwrap();
        assert_eq!(opts.harvest.source, SourceStrategy::Wikidata);
        assert_eq!(opts.allocation.threshold, 3000);
        assert_eq!(opts.allocation.rural_baseline, 2000);
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert!(opts.export.include_headers);
    }

    #[test]
    fn threshold_below_baseline_is_rejected() {
        let args = Args::parse_from(["muni_scrape", "--threshold", "1500"]);
        assert!(args.to_options().is_err());
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!(Args::try_parse_from(["muni_scrape", "--source", "ftp"]).is_err());
    }
}
