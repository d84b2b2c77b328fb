// src/scrape/reconcile.rs
//
// Run every configured source, then let a selection policy pick the
// canonical result. No field-level merging: one source wins wholesale.

use std::thread;

use crate::{
    data::{Acquisition, RegionFailure, SourceKind},
    error::HarvestError,
    progress::{Progress, Tagged},
};

use super::AcquisitionSource;

/// Picks the canonical acquisition out of all non-empty candidates.
pub trait SelectionPolicy: Send + Sync {
    fn select(&self, candidates: Vec<Acquisition>) -> Option<Acquisition>;
}

/// Larger record count wins; ties go to the structured source.
#[derive(Clone, Copy, Debug, Default)]
pub struct RicherSet;

impl SelectionPolicy for RicherSet {
    fn select(&self, candidates: Vec<Acquisition>) -> Option<Acquisition> {
        candidates
            .into_iter()
            .max_by_key(|a| (a.len(), a.kind == SourceKind::Structured))
    }
}

/// Outcome of a reconciled run.
#[derive(Clone, Debug)]
pub struct Harvest {
    pub chosen: Acquisition,
    /// Record count of every source that ran, in source order.
    pub counts: Vec<(SourceKind, usize)>,
    /// Failure reports of every source, including the ones that lost.
    pub failures_by_source: Vec<(SourceKind, Vec<RegionFailure>)>,
}

impl Harvest {
    pub fn chosen_kind(&self) -> SourceKind {
        self.chosen.kind
    }
}

pub struct Reconciler {
    sources: Vec<Box<dyn AcquisitionSource>>,
    policy: Box<dyn SelectionPolicy>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(Box::new(RicherSet))
    }
}

impl Reconciler {
    pub fn new(policy: Box<dyn SelectionPolicy>) -> Self {
        Self { sources: Vec::new(), policy }
    }

    pub fn with_source(mut self, source: Box<dyn AcquisitionSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Run all sources concurrently and select. Zero records across every
    /// source is the one hard error.
    pub fn run(&self, progress: &dyn Progress) -> Result<Harvest, HarvestError> {
        let results: Vec<Acquisition> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .sources
                .iter()
                .map(|src| {
                    let kind = src.kind();
                    let handle = scope.spawn(move || {
                        let tagged = Tagged { source: kind, inner: progress };
                        src.acquire(&tagged)
                    });
                    (kind, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(kind, h)| {
                    h.join().unwrap_or_else(|_| {
                        loge!("{kind}: acquisition thread panicked");
                        let mut acq = Acquisition::empty(kind);
                        acq.failures.push(RegionFailure::new(kind.label(), "acquisition panicked"));
                        acq
                    })
                })
                .collect()
        });

        let counts: Vec<(SourceKind, usize)> = results.iter().map(|a| (a.kind, a.len())).collect();
        let failures_by_source: Vec<(SourceKind, Vec<RegionFailure>)> =
            results.iter().map(|a| (a.kind, a.failures.clone())).collect();

        for (kind, n) in &counts {
            logf!("{kind}: {n} municipalities");
        }

        let candidates: Vec<Acquisition> = results.into_iter().filter(|a| !a.is_empty()).collect();
        let Some(chosen) = self.policy.select(candidates) else {
            let sources = counts
                .iter()
                .zip(&failures_by_source)
                .map(|((kind, _), (_, f))| format!("{kind}: 0 records, {} failures", f.len()))
                .collect::<Vec<_>>()
                .join("; ");
            loge!("No data from any source ({sources})");
            return Err(HarvestError::NoData { sources });
        };

        logf!("Using {} ({} municipalities)", chosen.kind, chosen.len());
        Ok(Harvest { chosen, counts, failures_by_source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Municipality;
    use crate::progress::NullProgress;

    struct Fixed(SourceKind, usize);

    impl AcquisitionSource for Fixed {
        fn kind(&self) -> SourceKind {
            self.0
        }
        fn acquire(&self, _: &dyn Progress) -> Acquisition {
            let mut a = Acquisition::empty(self.0);
            a.records = (0..self.1).map(|i| Municipality::new(format!("M{i}"), "")).collect();
            a
        }
    }

    fn reconcile(tab: usize, st: usize) -> Result<Harvest, HarvestError> {
        Reconciler::default()
            .with_source(Box::new(Fixed(SourceKind::Tabular, tab)))
            .with_source(Box::new(Fixed(SourceKind::Structured, st)))
            .run(&NullProgress)
    }

    #[test]
    fn richer_set_wins() {
        let h = reconcile(120, 95).unwrap();
        assert_eq!(h.chosen_kind(), SourceKind::Tabular);
        assert_eq!(h.chosen.len(), 120);
        let h = reconcile(95, 120).unwrap();
        assert_eq!(h.chosen_kind(), SourceKind::Structured);
    }

    #[test]
    fn tie_goes_to_structured() {
        let h = reconcile(80, 80).unwrap();
        assert_eq!(h.chosen_kind(), SourceKind::Structured);
        assert_eq!(h.counts, vec![(SourceKind::Tabular, 80), (SourceKind::Structured, 80)]);
    }

    #[test]
    fn all_empty_is_no_data() {
        assert!(matches!(reconcile(0, 0), Err(HarvestError::NoData { .. })));
    }

    #[test]
    fn one_empty_source_does_not_matter() {
        let h = reconcile(0, 3).unwrap();
        assert_eq!(h.chosen_kind(), SourceKind::Structured);
    }
}
