use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info};

use super::model::RawRow;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every record of a CSV resource.
///
/// `locator` is a filesystem path, or `-` for standard input. The delimiter
/// is chosen by extension: `.tsv` / `.tab` are tab-separated, anything else
/// is comma-separated. URLs are refused rather than fetched.
pub fn load(locator: &str) -> Result<Vec<RawRow>, LoadError> {
    if is_remote(locator) {
        return Err(LoadError::Remote(locator.to_string()));
    }
    if locator == "-" {
        debug!("reading CSV from stdin");
        return load_reader(io::stdin().lock(), b',');
    }

    let path = Path::new(locator);
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = load_reader(file, delimiter_for(path))?;
    info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse CSV from any reader. The first record is the header.
pub fn load_reader<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(LoadError::Header)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeader);
    }

    let mut rows = Vec::new();
    for (record_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| LoadError::Record {
            record: record_no,
            source,
        })?;

        let mut row = RawRow::new(record_no);
        for (name, value) in headers.iter().zip(record.iter()) {
            row.cells.insert(name.clone(), value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

// -- helpers --

fn is_remote(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn delimiter_for(path: &Path) -> u8 {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "tsv" | "tab" => b'\t',
        _ => b',',
    }
}
