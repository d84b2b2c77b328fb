// src/specs/wikidata.rs
//
// SPARQL query text and result decoding for the Wikidata path.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::config::country::WikidataCodes;
use crate::data::Municipality;

pub const SPARQL_ACCEPT: &str = "application/sparql-results+json";

/// One page of municipalities of `codes.municipality_type` (or a subclass)
/// located in `codes.country`, labels in `language` with English fallback.
pub fn build_query(codes: &WikidataCodes, language: &str, offset: usize, limit: usize) -> String {
    format!(
        "SELECT DISTINCT ?municipality ?municipalityLabel ?population\n\
         WHERE {{\n  \
           ?municipality wdt:P31/wdt:P279* wd:{ty} .\n  \
           ?municipality wdt:P17 wd:{country} .\n  \
           OPTIONAL {{ ?municipality wdt:P1082 ?population . }}\n  \
           SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"{language},en\" . }}\n\
         }}\n\
         ORDER BY ?municipality\n\
         OFFSET {offset}\n\
         LIMIT {limit}",
        ty = codes.municipality_type,
        country = codes.country,
    )
}

#[derive(Debug, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
pub struct SparqlTerm {
    pub value: String,
}

/// `Q` followed by digits only: the label service found no label.
pub fn is_entity_id(label: &str) -> bool {
    label
        .strip_prefix('Q')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Records of one page, skipping labels already in `seen` and recording new
/// ones there. Unparsable populations become `None`.
pub fn decode_bindings(
    bindings: &[HashMap<String, SparqlTerm>],
    seen: &mut HashSet<String>,
) -> Vec<Municipality> {
    let mut out = Vec::new();
    for b in bindings {
        let Some(name) = b.get("municipalityLabel").map(|t| t.value.trim()) else {
            continue;
        };
        if name.is_empty() || is_entity_id(name) || seen.contains(name) {
            continue;
        }
        seen.insert(s!(name));

        let mut m = Municipality::new(name, "");
        m.population = b
            .get("population")
            .and_then(|t| t.value.trim().parse::<f64>().ok())
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(|p| p as u64);
        out.push(m);
    }
    out
}
