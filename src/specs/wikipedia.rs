// src/specs/wikipedia.rs
//
// Wikipedia list pages: region → page title, `action=parse` payload → rows.

use serde_json::Value;

use crate::config::consts::{AREA_CEILING, DATA_TABLE_CLASS, POPULATION_FLOOR};
use crate::config::country::{CountryConfig, RegionOverride};
use crate::core::html::{cell_text, elements_ci, has_class, open_tag, row_cells};
use crate::core::sanitize::{clean_number, clean_text};
use crate::data::Municipality;

/* ---------- region → page title ---------- */

/// Region name with spaces turned into underscores, run through the
/// country's default slug template.
pub fn default_slug(region: &str, country: &CountryConfig) -> String {
    country.default_slug_template.replace("{region}", &region.replace(' ', "_"))
}

/// Page title for one region. Overrides win; a verbatim override ignores the
/// template entirely.
pub fn resolve_locator(region: &str, country: &CountryConfig) -> String {
    let slug = match country.overrides.get(region) {
        Some(RegionOverride::Verbatim(title)) => return title.clone(),
        Some(RegionOverride::Slug(slug)) => slug.clone(),
        None => default_slug(region, country),
    };
    country.page_title_template.replace("{region}", &slug)
}

/// Query parameters for `action=parse` on one page.
pub fn parse_params(page: &str) -> [(&'static str, &str); 4] {
    [("action", "parse"), ("page", page), ("format", "json"), ("prop", "text")]
}

/// Rendered HTML of a parse response. Accepts both `text: {"*": …}`
/// (formatversion 1) and `text: "…"` (formatversion 2). `None` when the page
/// is missing or the response carries an API error instead.
pub fn page_html(resp: &Value) -> Option<&str> {
    let text = resp.get("parse")?.get("text")?;
    match text {
        Value::String(s) => Some(s.as_str()),
        Value::Object(o) => o.get("*")?.as_str(),
        _ => None,
    }
}

/// API-side error code, when the response is an error envelope.
pub fn api_error(resp: &Value) -> Option<String> {
    let err = resp.get("error")?;
    let code = err.get("code").and_then(Value::as_str).unwrap_or("unknown");
    match err.get("info").and_then(Value::as_str) {
        Some(info) => Some(format!("{code}: {info}")),
        None => Some(s!(code)),
    }
}

/* ---------- table decoding ---------- */

/// Every municipality row in every data table of the page.
pub fn decode_page(html: &str, region: &str) -> Vec<Municipality> {
    let mut out = Vec::new();
    for table in elements_ci(html, "table") {
        if !has_class(open_tag(table), DATA_TABLE_CLASS) {
            continue;
        }
        // first row is the header
        for tr in elements_ci(table, "tr").into_iter().skip(1) {
            let cells: Vec<String> = row_cells(tr).into_iter().map(cell_text).collect();
            if let Some(m) = decode_row(&cells, region) {
                out.push(m);
            }
        }
    }
    out
}

/// One row of already-extracted cell texts. `None` for header-like,
/// decorative or too-short rows.
///
/// The first number above 10 is the population; a first number in `(0, 10]`
/// is taken as the area. Once the population is known, the next number in
/// `(0, 2000)` is the area.
pub fn decode_row<S: AsRef<str>>(cells: &[S], region: &str) -> Option<Municipality> {
    if cells.len() < 2 {
        return None;
    }
    let name = clean_text(cells[0].as_ref());
    if name.chars().count() < 2 {
        return None;
    }

    let mut population: Option<u64> = None;
    let mut area: Option<f64> = None;

    for n in cells[1..].iter().filter_map(|c| clean_number(c.as_ref())) {
        if population.is_none() {
            if n > POPULATION_FLOOR {
                population = Some(n as u64);
            } else if n > 0.0 {
                area = Some(n);
            }
        } else if area.is_none() {
            if n > 0.0 && n < AREA_CEILING {
                area = Some(n);
            }
        } else {
            break;
        }
    }

    let mut m = Municipality::new(name, region);
    m.population = population;
    m.area = area;
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn springfield_row() {
        let m = decode_row(&["Springfield", "1500", "45.2"], "X").unwrap();
        assert_eq!(m.name, "Springfield");
        assert_eq!(m.population, Some(1500));
        assert_eq!(m.area, Some(45.2));
        assert_eq!(m.density(), Some(33.19));
    }

    #[test]
    fn empty_or_short_names_are_dropped() {
        assert!(decode_row(&["", "1500"], "X").is_none());
        assert!(decode_row(&["A", "1500"], "X").is_none());
        assert!(decode_row(&["[1]", "1500"], "X").is_none());
        assert!(decode_row(&["Solo"], "X").is_none());
    }

    #[test]
    fn small_first_number_is_area() {
        let m = decode_row(&["Tiny", "7,5", "320"], "X").unwrap();
        assert_eq!(m.area, Some(7.5));
        assert_eq!(m.population, Some(320));
    }

    #[test]
    fn large_area_after_population_is_ignored() {
        let m = decode_row(&["Big", "12.000", "2500", "12"], "X").unwrap();
        assert_eq!(m.population, Some(12000));
        assert_eq!(m.area, Some(12.0));
    }

    #[test]
    fn population_is_truncated() {
        let m = decode_row(&["Frac", "1500,9"], "X").unwrap();
        assert_eq!(m.population, Some(1500));
        assert_eq!(m.area, None);
    }

    #[test]
    fn non_numeric_cells_are_skipped() {
        let m = decode_row(&["Olite", "Navarra", "—", "3.911", "83,6"], "Navarra").unwrap();
        assert_eq!(m.population, Some(3911));
        assert_eq!(m.area, Some(83.6));
        assert_eq!(m.region, "Navarra");
    }

    #[test]
    fn only_wikitables_are_read_and_header_skipped() {
        let html = r#"
            <table class="infobox"><tr><th>h</th></tr><tr><td>Layout</td><td>99</td></tr></table>
            <table class="wikitable sortable">
              <tr><th>Municipio</th><th>Habitantes</th><th>Superficie</th></tr>
              <tr><td><a href="/wiki/Olite">Olite</a>[1]</td><td>3.911</td><td>83,6</td></tr>
              <tr><td>Tafalla</td><td>10&nbsp;582</td><td>98,1</td></tr>
              <tr><td colspan=3>Total</td></tr>
            </table>"#;
        let rows = decode_page(html, "Navarra");
        let names: Vec<&str> = rows.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Olite", "Tafalla"]);
        assert_eq!(rows[1].population, Some(10582));
    }

    #[test]
    fn payload_both_formatversions() {
        let v1 = serde_json::json!({"parse": {"title": "T", "text": {"*": "<p>x</p>"}}});
        let v2 = serde_json::json!({"parse": {"title": "T", "text": "<p>y</p>"}});
        let err = serde_json::json!({"error": {"code": "missingtitle", "info": "The page you specified doesn't exist."}});
        assert_eq!(page_html(&v1), Some("<p>x</p>"));
        assert_eq!(page_html(&v2), Some("<p>y</p>"));
        assert_eq!(page_html(&err), None);
        assert!(api_error(&err).unwrap().starts_with("missingtitle"));
    }
}
