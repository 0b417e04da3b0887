use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::feature::{FeatureRow, GroupingKind};
use crate::feature_list::FeatureList;

use super::IoError;

const TABLE_HEADER: [&str; 9] = [
    "id",
    "mz",
    "rt",
    "height",
    "mobility",
    "charge",
    "comment",
    "identity",
    "fragment_scans",
];

const GROUPED_COLUMNS: [&str; 3] = ["kind", "source_ids", "isotopes"];

/// Value of the `kind` column for rows that absorbed an isotope pattern
pub const KIND_MERGED: &str = GroupingKind::Merged.as_str();

/// Value of the `kind` column for rows copied through unchanged
pub const KIND_PASS_THROUGH: &str = GroupingKind::PassThrough.as_str();

/// Write rows in the input feature-table layout
pub fn write_feature_table<W: Write>(writer: W, rows: &[FeatureRow]) -> Result<(), IoError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(TABLE_HEADER)?;
    for row in rows {
        csv_writer.write_record(table_cells(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write grouping output: the input layout plus `kind`, `source_ids` and
/// `isotopes` columns
pub fn write_grouped_table<W: Write>(writer: W, rows: &[FeatureRow]) -> Result<(), IoError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(TABLE_HEADER.iter().chain(GROUPED_COLUMNS.iter()))?;
    for row in rows {
        let mut cells = table_cells(row);
        cells.extend(grouped_cells(row));
        csv_writer.write_record(cells)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write rows to a CSV file in the input layout
pub fn save_feature_table<P: AsRef<Path>>(path: P, rows: &[FeatureRow]) -> Result<(), IoError> {
    write_feature_table(BufWriter::new(File::create(path)?), rows)
}

/// Write grouping output to a CSV file
pub fn save_grouped_table<P: AsRef<Path>>(path: P, rows: &[FeatureRow]) -> Result<(), IoError> {
    write_grouped_table(BufWriter::new(File::create(path)?), rows)
}

/// Export a whole feature list, history included, as JSON
pub fn export_json<P: AsRef<Path>>(path: P, list: &FeatureList) -> Result<(), IoError> {
    list.write_json(path)?;
    Ok(())
}

fn table_cells(row: &FeatureRow) -> Vec<String> {
    let feature = &row.feature;
    vec![
        row.id.to_string(),
        feature.mz.to_string(),
        feature.rt.to_string(),
        feature.height.to_string(),
        optional_cell(feature.mobility),
        optional_cell(row.charge),
        row.comment.clone().unwrap_or_default(),
        row.identity.clone().unwrap_or_default(),
        join(row.fragment_scans.iter()),
    ]
}

/// Cells from the row's grouping tag. Rows no grouping pass has seen get
/// empty cells.
fn grouped_cells(row: &FeatureRow) -> [String; 3] {
    let Some(tag) = &row.grouping else {
        return [String::new(), String::new(), String::new()];
    };

    let isotopes = match (&tag.kind, &row.isotope_pattern) {
        (GroupingKind::Merged, Some(pattern)) => pattern
            .entries
            .iter()
            .map(|e| format!("{}:{}", e.mz, e.height))
            .collect::<Vec<_>>()
            .join(";"),
        _ => String::new(),
    };

    [
        tag.kind.as_str().to_string(),
        join(tag.source_ids.iter()),
        isotopes,
    ]
}

fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn join<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(";")
}
