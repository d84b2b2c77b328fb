// src/file.rs
//
// Equipment tables on disk. Two layouts: the full seven-column table and the
// two-column name/total table, both headed with the country's own labels.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::country::Labels;
use crate::config::options::ExportOptions;
use crate::data::Municipality;
use crate::equipment::AllocationRule;
use crate::error::HarvestError;

pub type Table = (Vec<String>, Vec<Vec<String>>);

fn num(x: f64) -> String {
    x.to_string()
}

/// Name, total, urban, rural, urban equipment, rural equipment, total equipment.
/// Rural municipalities leave the urban population cell empty.
pub fn full_table(records: &[Municipality], rule: &AllocationRule, labels: &Labels) -> Table {
    let headers = vec![
        labels.municipality.clone(),
        labels.total_hab.clone(),
        labels.hab_urban.clone(),
        labels.hab_rural.clone(),
        labels.equipment_urban.clone(),
        labels.equipment_rural.clone(),
        labels.total_equipment.clone(),
    ];
    let rows = records
        .iter()
        .map(|m| {
            let a = rule.allocate_record(m);
            vec![
                m.name.clone(),
                a.population.to_string(),
                a.urban_population.map(|u| u.to_string()).unwrap_or_default(),
                a.rural_population.to_string(),
                num(a.urban_equipment),
                num(a.rural_equipment),
                num(a.total_equipment),
            ]
        })
        .collect();
    (headers, rows)
}

pub fn simple_table(records: &[Municipality], rule: &AllocationRule, labels: &Labels) -> Table {
    let headers = vec![labels.municipality.clone(), labels.total_equipment.clone()];
    let rows = records
        .iter()
        .map(|m| vec![m.name.clone(), num(rule.allocate_record(m).total_equipment)])
        .collect();
    (headers, rows)
}

pub fn ensure_directory(dir: &Path) -> Result<(), HarvestError> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Write one table to `path`, creating parent directories as needed.
pub fn write_table(path: &Path, table: &Table, export: &ExportOptions) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(export.format.delim())
        .from_path(path)?;
    if export.include_headers {
        wtr.write_record(&table.0)?;
    }
    for row in &table.1 {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Both tables for one country. Returns `[full, simple]` paths.
pub fn write_exports(
    records: &[Municipality],
    country: &str,
    labels: &Labels,
    rule: &AllocationRule,
    export: &ExportOptions,
) -> Result<[PathBuf; 2], HarvestError> {
    let full = export.full_table_path(country);
    let simple = export.simple_table_path(country);

    write_table(&full, &full_table(records, rule, labels), export)?;
    logf!("Full table saved: {}", full.display());
    write_table(&simple, &simple_table(records, rule, labels), export)?;
    logf!("Simple table saved: {}", simple.display());

    Ok([full, simple])
}
