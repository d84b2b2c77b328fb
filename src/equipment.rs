// src/equipment.rs
//! Population → urban/rural split → equipment count.
//!
//! Below the threshold everything is rural. At or above it, a fixed rural
//! baseline is set aside and the excess is split by the municipality's urban
//! share. Each portion is divided by its own divisor and rounded to two
//! decimals before the total is summed and rounded again. All rounding is
//! half-to-even.

use std::fmt;

use crate::config::consts::{
    DEFAULT_URBAN_PERCENTAGE, EQUIPMENT_DIVISOR_RURAL, EQUIPMENT_DIVISOR_URBAN, POPULATION_THRESHOLD,
    RURAL_BASELINE,
};
use crate::data::Municipality;
use crate::error::ConfigError;

/// Round half to even at two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct AllocationRule {
    /// Urban at or above.
    pub threshold: u64,
    /// Rural population set aside before an urban municipality's excess is split.
    /// Never above `threshold`.
    pub rural_baseline: u64,
    pub rural_divisor: f64,
    pub urban_divisor: f64,
    /// Used when a municipality carries no urban share of its own.
    pub default_urban_ratio: f64,
}

impl Default for AllocationRule {
    fn default() -> Self {
        Self {
            threshold: POPULATION_THRESHOLD,
            rural_baseline: RURAL_BASELINE,
            rural_divisor: EQUIPMENT_DIVISOR_RURAL,
            urban_divisor: EQUIPMENT_DIVISOR_URBAN,
            default_urban_ratio: DEFAULT_URBAN_PERCENTAGE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
    Rural,
    Urban,
}

/// One row of the equipment table.
#[derive(Clone, Debug, PartialEq)]
pub struct Allocation {
    pub class: Class,
    pub population: u64,
    /// `None` for rural municipalities; the table leaves the cell empty.
    pub urban_population: Option<u64>,
    pub rural_population: u64,
    pub urban_equipment: f64,
    pub rural_equipment: f64,
    pub total_equipment: f64,
}

impl AllocationRule {
    pub fn with_threshold(mut self, threshold: u64) -> Result<Self, ConfigError> {
        self.threshold = threshold;
        self.validate()
    }

    pub fn with_rural_baseline(mut self, baseline: u64) -> Result<Self, ConfigError> {
        self.rural_baseline = baseline;
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.rural_baseline > self.threshold {
            return Err(ConfigError::Rule(format!(
                "rural baseline {} is above the urban threshold {}",
                self.rural_baseline, self.threshold
            )));
        }
        Ok(self)
    }

    pub fn classify(&self, population: Option<u64>) -> Class {
        if population.unwrap_or(0) >= self.threshold { Class::Urban } else { Class::Rural }
    }

    /// Allocate one population. Unknown population counts as zero.
    pub fn allocate(&self, population: Option<u64>, urban_percentage: Option<f64>) -> Allocation {
        let p = population.unwrap_or(0);

        if p < self.threshold {
            return Allocation {
                class: Class::Rural,
                population: p,
                urban_population: None,
                rural_population: p,
                urban_equipment: 0.0,
                rural_equipment: round2(p as f64 / self.rural_divisor),
                total_equipment: round2(p as f64 / self.rural_divisor),
            };
        }

        let ratio = urban_percentage.unwrap_or(self.default_urban_ratio).clamp(0.0, 1.0);
        let baseline = self.rural_baseline.min(self.threshold);
        let excess = p - baseline;
        let urban = ((excess as f64 * ratio).round_ties_even() as u64).min(excess);
        let rural_extra = excess - urban;

        let urban_equipment = round2(urban as f64 / self.urban_divisor);
        let rural_equipment = round2(
            baseline as f64 / self.rural_divisor + rural_extra as f64 / self.rural_divisor,
        );

        Allocation {
            class: Class::Urban,
            population: p,
            urban_population: Some(urban),
            rural_population: baseline + rural_extra,
            urban_equipment,
            rural_equipment,
            total_equipment: round2(urban_equipment + rural_equipment),
        }
    }

    pub fn allocate_record(&self, m: &Municipality) -> Allocation {
        self.allocate(m.population, m.urban_percentage)
    }
}

/// Counts and population totals over a result set.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Statistics {
    pub municipalities: usize,
    pub urban: usize,
    pub rural: usize,
    pub total_population: u64,
    pub urban_population: u64,
    pub rural_population: u64,
    pub total_equipment: f64,
}

impl Statistics {
    pub fn collect(records: &[Municipality], rule: &AllocationRule) -> Self {
        let mut st = Statistics { municipalities: records.len(), ..Default::default() };
        let mut equipment = 0.0;
        for m in records {
            let p = m.population.unwrap_or(0);
            st.total_population += p;
            match rule.classify(m.population) {
                Class::Urban => { st.urban += 1; st.urban_population += p; }
                Class::Rural => { st.rural += 1; st.rural_population += p; }
            }
            equipment += rule.allocate_record(m).total_equipment;
        }
        st.total_equipment = round2(equipment);
        st
    }

    fn pct(part: usize, whole: usize) -> f64 {
        if whole == 0 { 0.0 } else { (part as f64 / whole as f64 * 1000.0).round() / 10.0 }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.municipalities == 0 {
            return writeln!(f, "  No municipalities found.");
        }
        let n = self.municipalities;
        writeln!(f, "  Total municipalities: {n}")?;
        writeln!(f, "  Urban: {} ({}%)", self.urban, Self::pct(self.urban, n))?;
        writeln!(f, "  Rural: {} ({}%)", self.rural, Self::pct(self.rural, n))?;
        writeln!(f, "  Total population: {}", self.total_population)?;
        writeln!(f, "  Total equipment: {}", self.total_equipment)
    }
}
