// tests/common/mod.rs
#![allow(dead_code)]

use muni_scrape::config::{CountryConfig, HarvestOptions};
use serde_json::{json, Value};

pub const API_PATH: &str = "/w/api.php";
pub const SPARQL_PATH: &str = "/sparql";

/// A small country whose Wikipedia API lives on `api_url`.
pub fn mock_country(api_url: &str, regions: &[&str], overrides: &str) -> CountryConfig {
    let regions = regions.iter().map(|r| format!("\"{r}\"")).collect::<Vec<_>>().join(", ");
    let text = format!(
        r#"
        name = "Testland"
        language = "es"
        wikipedia_api = "{api_url}"
        page_title_template = "Municipios_de_{{region}}"
        expected_municipalities = 10
        regions = [{regions}]

        [overrides]
        {overrides}

        [wikidata]
        country = "Q29"
        municipality_type = "Q2074737"
        "#
    );
    CountryConfig::from_toml_str("mock.toml", &text).unwrap()
}

pub fn fast_options(sparql_url: &str, page_size: usize) -> HarvestOptions {
    HarvestOptions {
        workers: 2,
        wikidata_endpoint: sparql_url.to_string(),
        page_size,
        ..HarvestOptions::default()
    }
    .without_delays()
}

/// `action=parse` response (formatversion 1) with one wikitable.
pub fn parse_page(rows: &[(&str, &str, &str)]) -> Value {
    let mut html = String::from(
        "<table class=\"wikitable sortable\"><tr><th>Municipio</th><th>Población</th><th>Superficie</th></tr>",
    );
    for (name, pop, area) in rows {
        html.push_str(&format!("<tr><td><a href=\"#\">{name}</a></td><td>{pop}</td><td>{area}</td></tr>"));
    }
    html.push_str("</table>");
    json!({ "parse": { "title": "x", "pageid": 1, "text": { "*": html } } })
}

pub fn missing_page() -> Value {
    json!({ "error": { "code": "missingtitle", "info": "The page you specified doesn't exist." } })
}

pub fn sparql_page(rows: &[(&str, Option<&str>)]) -> Value {
    let bindings: Vec<Value> = rows
        .iter()
        .map(|(label, pop)| {
            let mut b = json!({
                "municipality": { "type": "uri", "value": "http://www.wikidata.org/entity/Q1" },
                "municipalityLabel": { "type": "literal", "value": label }
            });
            if let Some(p) = pop {
                b["population"] = json!({ "type": "literal", "value": p });
            }
            b
        })
        .collect();
    json!({
        "head": { "vars": ["municipality", "municipalityLabel", "population"] },
        "results": { "bindings": bindings }
    })
}
