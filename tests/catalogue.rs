// tests/catalogue.rs
use muni_scrape::config::country::{self, RegionOverride};
use muni_scrape::specs::wikipedia::{default_slug, resolve_locator};

#[test]
fn every_region_resolves_to_a_title() {
    for c in country::builtin().unwrap() {
        for region in &c.regions {
            let title = resolve_locator(region, &c);
            assert!(!title.is_empty());
            assert!(!title.contains("{region}"), "{}: {title}", c.name);
            assert!(!title.contains(' '), "{}: {title}", c.name);
        }
    }
}

#[test]
fn berlin_resolves_to_its_own_list_verbatim() {
    let de = country::find("Deutschland").unwrap();
    assert_eq!(de.page_title_template, "Liste_der_Gemeinden_in_{region}");
    assert_eq!(
        de.overrides.get("Berlin"),
        Some(&RegionOverride::Verbatim("Liste_der_Bezirke_und_Ortsteile_Berlins".into()))
    );
    assert_eq!(resolve_locator("Berlin", &de), "Liste_der_Bezirke_und_Ortsteile_Berlins");
    assert_eq!(resolve_locator("Bayern", &de), "Liste_der_Gemeinden_in_Bayern");
}

#[test]
fn no_override_uses_default_slug() {
    let es = country::find("España").unwrap();
    assert!(es.overrides.get("Ciudad Real").is_none());
    assert_eq!(default_slug("Ciudad Real", &es), "la_provincia_de_Ciudad_Real");
    assert_eq!(
        resolve_locator("Ciudad Real", &es),
        es.page_title_template.replace("{region}", &default_slug("Ciudad Real", &es))
    );
}

#[test]
fn slug_overrides_go_through_the_template() {
    let es = country::find("España").unwrap();
    assert_eq!(resolve_locator("Girona", &es), "Anexo:Municipios_de_la_provincia_de_Gerona");
}
