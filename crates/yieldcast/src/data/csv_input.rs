//! CSV ingestion.
//!
//! Every header becomes a column name and every field a [`RawCell`]; empty
//! fields are [`RawCell::Empty`]. Numeric coercion happens later, during
//! schema resolution.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::record::{RawCell, RawRecord};

/// Read every row of a headed CSV stream.
///
/// # Errors
///
/// Malformed CSV (including rows whose field count differs from the header).
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(name, field)| (name.to_string(), RawCell::from(field)))
                .collect(),
        );
    }
    Ok(records)
}

/// Read a headed CSV file.
///
/// # Errors
///
/// I/O failure or malformed CSV.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, csv::Error> {
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headed_rows() {
        let input = "collection_days,visits,yield\n5, 50 ,20\n0,,n/a\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value("visits"), 50.0);
        assert_eq!(records[1].cell("visits"), Some(&RawCell::Empty));
        assert_eq!(records[1].value("yield"), 0.0);
    }

    #[test]
    fn ragged_rows_are_errors() {
        let input = "a,b\n1,2\n3\n";
        assert!(read_records(input.as_bytes()).is_err());
    }
}
