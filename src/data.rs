// src/data.rs
//
// Records and per-run results shared by both acquisition engines.

use std::fmt;

use crate::equipment::round2;

/// Which kind of source produced an acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Wikipedia page tables.
    Tabular,
    /// Wikidata SPARQL.
    Structured,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Tabular => "Wikipedia",
            SourceKind::Structured => "Wikidata",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Municipality {
    pub name: String,
    /// Empty when the source does not know the subdivision.
    pub region: String,
    pub population: Option<u64>,
    /// km²
    pub area: Option<f64>,
    /// Share of inhabitants counted as urban, `[0, 1]`.
    pub urban_percentage: Option<f64>,
}

impl Municipality {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            population: None,
            area: None,
            urban_percentage: None,
        }
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_urban_percentage(mut self, pct: f64) -> Self {
        self.urban_percentage = Some(pct.clamp(0.0, 1.0));
        self
    }

    /// Inhabitants per km², rounded to two decimals.
    pub fn density(&self) -> Option<f64> {
        match (self.population, self.area) {
            (Some(p), Some(a)) if a > 0.0 => Some(round2(p as f64 / a)),
            _ => None,
        }
    }
}

/// A region (or Wikidata page) that produced no data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionFailure {
    pub region: String,
    pub reason: String,
}

impl RegionFailure {
    pub fn new(region: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { region: region.into(), reason: reason.into() }
    }
}

impl fmt::Display for RegionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.region, self.reason)
    }
}

/// Everything one source produced in one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Acquisition {
    pub kind: SourceKind,
    pub records: Vec<Municipality>,
    pub failures: Vec<RegionFailure>,
}

impl Acquisition {
    pub fn empty(kind: SourceKind) -> Self {
        Self { kind, records: Vec::new(), failures: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|m| m.name.as_str()).collect()
    }
}
