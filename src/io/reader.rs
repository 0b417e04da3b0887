use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::feature::{Feature, FeatureRow};

use super::IoError;

const REQUIRED_COLUMNS: [&str; 4] = ["id", "mz", "rt", "height"];

/// Read a feature table from a CSV file
pub fn read_feature_table<P: AsRef<Path>>(path: P) -> Result<Vec<FeatureRow>, IoError> {
    let file = File::open(path)?;
    parse_feature_table(BufReader::new(file))
}

/// Parse a feature table from any reader.
///
/// Columns are located by header name, so their order is free and unknown
/// columns are ignored. `id`, `mz`, `rt` and `height` are required.
pub fn parse_feature_table<R: Read>(reader: R) -> Result<Vec<FeatureRow>, IoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase(), i))
        .collect();

    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(required) {
            return Err(IoError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cells = Cells {
            record: &record,
            columns: &columns,
            line,
        };

        let mut feature = Feature::new(
            cells.required("mz")?,
            cells.required("rt")?,
            cells.required("height")?,
        );
        feature.mobility = cells.optional("mobility")?;

        let mut row = FeatureRow::new(cells.required("id")?, feature);
        row.charge = cells.optional("charge")?;
        row.comment = cells.text("comment");
        row.identity = cells.text("identity");
        if let Some(scans) = cells.text("fragment_scans") {
            row.fragment_scans = scans
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| cells.parse("fragment_scans", s))
                .collect::<Result<_, _>>()?;
        }
        rows.push(row);
    }

    Ok(rows)
}

struct Cells<'a> {
    record: &'a csv::StringRecord,
    columns: &'a HashMap<String, usize>,
    line: u64,
}

impl Cells<'_> {
    fn text(&self, column: &str) -> Option<String> {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn optional<T: FromStr>(&self, column: &str) -> Result<Option<T>, IoError> {
        self.text(column)
            .map(|value| self.parse(column, &value))
            .transpose()
    }

    fn required<T: FromStr>(&self, column: &str) -> Result<T, IoError> {
        self.optional(column)?.ok_or_else(|| IoError::InvalidValue {
            line: self.line,
            column: column.to_string(),
            value: String::new(),
        })
    }

    fn parse<T: FromStr>(&self, column: &str, value: &str) -> Result<T, IoError> {
        value.parse().map_err(|_| IoError::InvalidValue {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}
