// src/specs/mod.rs
//! # Source “specs” module
//!
//! This module hosts the **source-specific reading rules**: how a region
//! becomes a page title, which parameters a request carries, and where the
//! ground truth lives in each response.
//!
//! ## What lives here
//! - **Locator resolution** for Wikipedia list pages (`wikipedia::resolve_locator`),
//!   driven entirely by the country's override table.
//! - **Pure HTML parsing** of `action=parse` payloads into municipality rows,
//!   using `core::html` helpers (case-insensitive element blocks, tag stripping,
//!   entity decoding) and the `core::sanitize` normalizers.
//! - **SPARQL query text** and binding decoding for Wikidata.
//!
//! ## What does **not** live here
//! - **Networking, retry, pacing** – `core::net` and the engines in `scrape`.
//! - **Choosing between sources** – `scrape::reconcile`.
//! - **Equipment and export** – `equipment`, `file`.
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::harvest → scrape::{wikipedia, wikidata} engine
//!                           ↘  specs::<source> (resolve, decode)
//! ```
//!
//! ## Conventions & invariants
//! - Decoding never fails a whole page: a row that cannot be read is skipped.
//! - The population/area heuristic in `wikipedia::decode_row` is kept exactly
//!   as documented there; outlier regions misclassify and that is accepted.
//! - Everything here is testable **offline** against literal fixtures.
pub mod wikidata;
pub mod wikipedia;
