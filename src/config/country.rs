// src/config/country.rs
//! Per-country region tables.
//!
//! Every country lives in its own TOML file under `countries/` and is compiled
//! into the binary. Loading turns a file into an immutable [`CountryConfig`];
//! nothing mutates it afterwards. Irregular page titles (grammatical articles,
//! merged provinces, city-states) are expressed as entries in the `overrides`
//! table, never as code.
//!
//! An override is either a plain string or an explicit table:
//!
//! ```toml
//! [overrides]
//! "La Spezia" = "della_Spezia"                      # slug, plugged into the template
//! "Berlin" = "Liste_der_Bezirke_und_Ortsteile_Berlins" # full title (known prefix)
//! "Aosta" = { verbatim = "Comuni_della_Valle_d'Aosta" }
//! ```
//!
//! Plain strings starting with one of the recognized full-title prefixes become
//! [`RegionOverride::Verbatim`], everything else [`RegionOverride::Slug`].

use std::collections::HashMap;

use serde::Deserialize;

use super::consts::FULL_TITLE_PREFIXES;
use crate::error::ConfigError;

const BUILTIN: &[(&str, &str)] = &[
    ("spain.toml", include_str!("../../countries/spain.toml")),
    ("france.toml", include_str!("../../countries/france.toml")),
    ("italy.toml", include_str!("../../countries/italy.toml")),
    ("portugal.toml", include_str!("../../countries/portugal.toml")),
    ("germany.toml", include_str!("../../countries/germany.toml")),
];

/// Special-case locator for one region.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionOverride {
    /// Replaces the whole page title.
    Verbatim(String),
    /// Replaces only the `{region}` part of the page-title template.
    Slug(String),
}

impl RegionOverride {
    /// Classify a bare override string against the recognized full-title prefixes.
    pub fn classify(value: &str, prefixes: &[String]) -> Self {
        if prefixes.iter().any(|p| value.starts_with(p.as_str())) {
            RegionOverride::Verbatim(s!(value))
        } else {
            RegionOverride::Slug(s!(value))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOverride {
    Tagged(RegionOverride),
    Plain(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WikidataCodes {
    /// Q-code of the country (`wdt:P17`).
    pub country: String,
    /// Q-code of "municipality of <country>" (`wdt:P31/wdt:P279*`).
    pub municipality_type: String,
}

/// Localized column and class labels for exported tables.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub municipality: String,
    pub total_hab: String,
    pub hab_urban: String,
    pub hab_rural: String,
    pub equipment_urban: String,
    pub equipment_rural: String,
    pub total_equipment: String,
    pub rural: String,
    pub urban: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            municipality: s!("Municipio"),
            total_hab: s!("TOTAL HAB"),
            hab_urban: s!("Nº HAB URBANO"),
            hab_rural: s!("Nº HAB RURAL"),
            equipment_urban: s!("EQUIPOS URBANO"),
            equipment_rural: s!("EQUIPOS RURAL"),
            total_equipment: s!("TOTAL EQUIPOS"),
            rural: s!("Núcleo Rural"),
            urban: s!("Núcleo Urbano"),
        }
    }
}

#[derive(Deserialize)]
struct RawCountry {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    language: String,
    wikipedia_api: String,
    page_title_template: String,
    #[serde(default = "default_slug_template")]
    default_slug_template: String,
    #[serde(default)]
    full_title_prefixes: Option<Vec<String>>,
    #[serde(default)]
    expected_municipalities: Option<usize>,
    regions: Vec<String>,
    #[serde(default)]
    overrides: HashMap<String, RawOverride>,
    wikidata: WikidataCodes,
    #[serde(default)]
    labels: Labels,
}

fn default_slug_template() -> String {
    s!("{region}")
}

/// Immutable description of one country: where its data lives and how its
/// region names map onto page titles.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryConfig {
    pub name: String,
    pub aliases: Vec<String>,
    /// Two-letter language code, also the first label language for Wikidata.
    pub language: String,
    pub wikipedia_api: String,
    /// Page title with a `{region}` placeholder.
    pub page_title_template: String,
    /// Applied to the region name (spaces → underscores) when no override exists.
    pub default_slug_template: String,
    pub full_title_prefixes: Vec<String>,
    pub expected_municipalities: usize,
    /// Ordered as in the source table.
    pub regions: Vec<String>,
    pub overrides: HashMap<String, RegionOverride>,
    pub wikidata: WikidataCodes,
    pub labels: Labels,
}

impl CountryConfig {
    /// Parse and validate one country table. `file` only labels errors.
    pub fn from_toml_str(file: &str, text: &str) -> Result<Self, ConfigError> {
        let raw: RawCountry = toml::from_str(text)
            .map_err(|source| ConfigError::Parse { file: s!(file), source })?;

        let invalid = |msg: String| ConfigError::Invalid { file: s!(file), msg };

        if raw.name.trim().is_empty() {
            return Err(invalid(s!("empty country name")));
        }
        if !raw.page_title_template.contains("{region}") {
            return Err(invalid(format!(
                "page_title_template '{}' has no {{region}} placeholder",
                raw.page_title_template
            )));
        }
        if !raw.default_slug_template.contains("{region}") {
            return Err(invalid(format!(
                "default_slug_template '{}' has no {{region}} placeholder",
                raw.default_slug_template
            )));
        }
        if raw.regions.is_empty() {
            return Err(invalid(s!("no regions listed")));
        }
        if let Some(stray) = raw.overrides.keys().find(|k| !raw.regions.contains(k)) {
            return Err(invalid(format!("override for unlisted region '{stray}'")));
        }

        let prefixes = raw
            .full_title_prefixes
            .unwrap_or_else(|| FULL_TITLE_PREFIXES.iter().map(|p| s!(*p)).collect());

        let overrides = raw
            .overrides
            .into_iter()
            .map(|(region, o)| {
                let o = match o {
                    RawOverride::Tagged(t) => t,
                    RawOverride::Plain(v) => RegionOverride::classify(&v, &prefixes),
                };
                (region, o)
            })
            .collect();

        Ok(Self {
            expected_municipalities: raw.expected_municipalities.unwrap_or(10_000),
            name: raw.name,
            aliases: raw.aliases,
            language: raw.language,
            wikipedia_api: raw.wikipedia_api,
            page_title_template: raw.page_title_template,
            default_slug_template: raw.default_slug_template,
            full_title_prefixes: prefixes,
            regions: raw.regions,
            overrides,
            wikidata: raw.wikidata,
            labels: raw.labels,
        })
    }

    /// Display name or any alias, case-insensitive.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name)
            || self.name.to_lowercase() == name.to_lowercase()
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// All countries shipped with the crate, in catalogue order.
pub fn builtin() -> Result<Vec<CountryConfig>, ConfigError> {
    BUILTIN
        .iter()
        .map(|(file, text)| CountryConfig::from_toml_str(file, text))
        .collect()
}

/// Look a country up by display name or alias.
pub fn find(name: &str) -> Result<CountryConfig, ConfigError> {
    builtin()?
        .into_iter()
        .find(|c| c.matches(name))
        .ok_or_else(|| ConfigError::UnknownCountry(s!(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINI: &str = r#"
        name = "Testland"
        language = "xx"
        wikipedia_api = "http://localhost/w/api.php"
        page_title_template = "Liste_der_Gemeinden_in_{region}"
        regions = ["North", "Old Town", "Capital"]

        [overrides]
        "Old Town" = "der_Altstadt"
        "Capital" = "Liste_der_Bezirke_der_Hauptstadt"

        [wikidata]
        country = "Q1"
        municipality_type = "Q2"
    "#;

    #[test]
    fn plain_overrides_are_classified_by_prefix() {
        let c = CountryConfig::from_toml_str("mini.toml", MINI).unwrap();
        assert_eq!(
            c.overrides.get("Capital"),
            Some(&RegionOverride::Verbatim(s!("Liste_der_Bezirke_der_Hauptstadt")))
        );
        assert_eq!(
            c.overrides.get("Old Town"),
            Some(&RegionOverride::Slug(s!("der_Altstadt")))
        );
        assert_eq!(c.default_slug_template, "{region}");
        assert_eq!(c.expected_municipalities, 10_000);
    }

    #[test]
    fn explicit_override_tables_win_over_classification() {
        let text = MINI.replace(
            r#""Old Town" = "der_Altstadt""#,
            r#""Old Town" = { verbatim = "Altstadt_Gemeinden" }"#,
        );
        let c = CountryConfig::from_toml_str("mini.toml", &text).unwrap();
        assert_eq!(
            c.overrides.get("Old Town"),
            Some(&RegionOverride::Verbatim(s!("Altstadt_Gemeinden")))
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let text = MINI.replace("Liste_der_Gemeinden_in_{region}", "Liste_der_Gemeinden");
        let err = CountryConfig::from_toml_str("mini.toml", &text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn override_for_unknown_region_is_rejected() {
        let text = MINI.replace(r#""Old Town" = "#, r#""Nowhere" = "#);
        let err = CountryConfig::from_toml_str("mini.toml", &text).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn builtin_catalogue_loads() {
        let all = builtin().unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["España", "France", "Italia", "Portugal", "Deutschland"]);
        for c in &all {
            assert!(!c.regions.is_empty(), "{} has no regions", c.name);
            assert_eq!(c.language.len(), 2);
        }
    }

    #[test]
    fn find_accepts_aliases() {
        assert_eq!(find("germany").unwrap().name, "Deutschland");
        assert_eq!(find("ESPAÑA").unwrap().name, "España");
        assert!(matches!(find("Atlantis"), Err(ConfigError::UnknownCountry(_))));
    }
}
