use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::catalog::extract_group_label;
use super::error::ParseError;
use super::model::{CellValue, Table, COUNTRY_COLUMN, SOURCE_FILE_COLUMN};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one catalog file and tag its rows with provenance.
///
/// Never fails: any read or parse error is logged and yields an empty table,
/// so one bad file does not sink a batch load. Every row gets
/// `__source_file` = the file name and `country` = the label inferred from
/// it. A `country` column already in the file is overwritten.
pub fn load_file(path: &Path) -> Table {
    let mut table = match read_file(path) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("Skipping {}: {e}", path.display());
            return Table::empty();
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    table.set_constant_column(SOURCE_FILE_COLUMN, CellValue::String(file_name.clone()));
    table.set_constant_column(COUNTRY_COLUMN, CellValue::String(extract_group_label(&file_name)));

    log::debug!("Loaded {} rows from {}", table.len(), path.display());
    table
}

fn read_file(path: &Path) -> Result<Table, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// Parse comma-separated text with a header row into a [`Table`].
///
/// Headers are whitespace-trimmed and made unique (`a`, `a.1`, …). Short
/// rows are padded with nulls; long rows are an error. Cells are typed with
/// [`CellValue::guess`].
pub fn parse_csv<R: Read>(reader: R) -> Result<Table, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let raw_headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if raw_headers.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    let mut table = Table::with_columns(dedupe_headers(raw_headers));
    let width = table.columns().len();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(ParseError::RaggedRow {
                row: row_no + 1,
                expected: width,
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(CellValue::guess).collect());
    }

    Ok(table)
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .map(|h| {
            if seen.insert(h.clone()) {
                return h;
            }
            let mut n = 1;
            loop {
                let candidate = format!("{h}.{n}");
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_and_trims_headers() {
        let t = parse_csv(" GHI , site\n1.5,A\n2,B\n".as_bytes()).unwrap();
        assert_eq!(t.columns(), &["GHI", "site"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.value(0, "GHI"), Some(&CellValue::Float(1.5)));
        assert_eq!(t.value(1, "GHI"), Some(&CellValue::Integer(2)));
    }

    #[test]
    fn space_padded_numbers_stay_numeric() {
        let t = parse_csv("GHI, Tamb, site\n1, 2, A\n3, 4.5, B \n".as_bytes()).unwrap();
        assert_eq!(t.columns(), &["GHI", "Tamb", "site"]);
        assert_eq!(t.value(0, "Tamb"), Some(&CellValue::Integer(2)));
        assert_eq!(t.value(1, "Tamb"), Some(&CellValue::Float(4.5)));
        assert_eq!(t.value(0, "site"), Some(&CellValue::from(" A")));
        assert_eq!(t.value(1, "site"), Some(&CellValue::from(" B ")));
    }

    #[test]
    fn short_rows_are_padded() {
        let t = parse_csv("a,b\n1\n".as_bytes()).unwrap();
        assert_eq!(t.value(0, "b"), Some(&CellValue::Null));
    }

    #[test]
    fn long_rows_fail() {
        let err = parse_csv("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::RaggedRow { row: 1, expected: 2, found: 3 }));
    }

    #[test]
    fn empty_payload_fails() {
        assert!(matches!(parse_csv("".as_bytes()), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let t = parse_csv("a,a,a\n1,2,3\n".as_bytes()).unwrap();
        assert_eq!(t.columns(), &["a", "a.1", "a.2"]);
    }

    #[test]
    fn load_file_tags_provenance_and_overwrites_country() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("benin-malanville.csv");
        std::fs::write(&path, "country,GHI\nNiger,1\nMali,2\n").unwrap();

        let t = load_file(&path);
        assert_eq!(t.len(), 2);
        assert_eq!(t.columns(), &["country", "GHI", "__source_file"]);
        for row in 0..t.len() {
            assert_eq!(t.value(row, "country"), Some(&CellValue::from("Benin")));
            assert_eq!(
                t.value(row, "__source_file"),
                Some(&CellValue::from("benin-malanville.csv"))
            );
        }
    }

    #[test]
    fn load_file_swallows_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_file(&dir.path().join("missing.csv")).is_empty());

        let bad = dir.path().join("togo-bad.csv");
        std::fs::write(&bad, "a,b\n1,2,3\n").unwrap();
        assert!(load_file(&bad).is_empty());
    }
}
