use std::io::{BufRead, BufReader, Read};

use crate::consts::CANDIDATE_DELIMITERS;
use crate::error::{Result, VelocityError};

/// Pick the delimiter of a table from its header line: the first candidate
/// that occurs, falling back to a comma.
pub fn sniff_delimiter(header: &str) -> u8 {
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .find(|&d| header.as_bytes().contains(&d))
        .unwrap_or(b',')
}

/// Open a delimited table with a header row.
///
/// The whole source is buffered so the header can be inspected for the
/// delimiter before handing it to the CSV parser.
pub fn open_table<R: Read>(reader: R) -> Result<csv::Reader<std::io::Cursor<Vec<u8>>>> {
    let mut buf = BufReader::new(reader);
    let mut contents = Vec::new();
    buf.read_to_end(&mut contents)?;

    let header_line = contents
        .as_slice()
        .lines()
        .next()
        .transpose()?
        .unwrap_or_default();
    let delimiter = sniff_delimiter(&header_line);

    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(std::io::Cursor::new(contents)))
}

/// Parse one numeric cell. `row` is 1-based over data rows.
pub fn parse_cell(
    record: &csv::StringRecord,
    column: usize,
    name: &str,
    row: usize,
) -> Result<f64> {
    let raw = record.get(column).ok_or_else(|| VelocityError::MalformedRow {
        row,
        reason: format!(
            "expected at least {} fields, found {} (missing {name})",
            column + 1,
            record.len()
        ),
    })?;
    if raw.is_empty() {
        return Err(VelocityError::MalformedRow {
            row,
            reason: format!("empty value for {name}"),
        });
    }
    raw.parse().map_err(|_| VelocityError::MalformedRow {
        row,
        reason: format!("invalid number {raw:?} for {name}"),
    })
}
