use std::path::Path;

use crate::data::datetime;
use crate::data::model::{Dataset, Reading};
use crate::data::parser;
use crate::data::schema::ColumnMap;
use crate::error::LoadError;

/// How many leading rows are searched for the header.
const HEADER_SCAN_ROWS: usize = 50;

/// File extensions [`load_file`] understands.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx", "xlsm", "ods"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Load a CSV or Excel export and build the dataset.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match ext.as_str() {
        "csv" => {
            let content = std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_csv_rows(&content)?
        }
        "xls" | "xlsx" | "xlsm" | "ods" => read_excel_rows(path)?,
        _ => return Err(LoadError::UnsupportedFormat(ext)),
    };

    let dataset = parse_rows(&rows)?;
    tracing::info!("Loaded {} readings from {:?}", dataset.len(), path);
    Ok(dataset)
}

/// Split CSV bytes into string rows. Non UTF-8 input is read as Latin-1.
pub fn read_csv_rows(content: &[u8]) -> Result<Vec<Vec<String>>, LoadError> {
    let text = match std::str::from_utf8(content) {
        Ok(s) => s.to_string(),
        Err(_) => content.iter().map(|&b| b as char).collect(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

fn read_excel_rows(path: &Path) -> Result<Vec<Vec<String>>, LoadError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Workbook(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoData)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Workbook(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::String(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Bool(b) => b.to_string(),
                    Data::DateTime(dt) => datetime::excel_serial_to_datetime(dt.as_f64())
                        .map(datetime::to_cell_string)
                        .unwrap_or_default(),
                    Data::DateTimeIso(s) => s.clone(),
                    Data::DurationIso(s) => s.clone(),
                    Data::Error(e) => format!("{e:?}"),
                })
                .collect()
        })
        .collect();
    Ok(rows)
}

/// Build a dataset from raw string rows (header detection, column
/// resolution, timestamp and number parsing).
///
/// Rows whose timestamp cannot be parsed are skipped. Numeric cells that do
/// not parse are kept as NaN.
pub fn parse_rows(rows: &[Vec<String>]) -> Result<Dataset, LoadError> {
    if rows.is_empty() {
        return Err(LoadError::NoData);
    }

    let header_row = parser::detect_header_row(rows, HEADER_SCAN_ROWS);
    let headers: Vec<String> = rows[header_row].iter().map(|s| s.trim().to_string()).collect();
    let columns = ColumnMap::resolve(&headers)?;

    let data_rows: Vec<&Vec<String>> = rows[header_row + 1..]
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .collect();

    let timestamp_cells: Vec<String> = data_rows
        .iter()
        .map(|row| cell(row, columns.timestamp).to_string())
        .collect();
    let format = datetime::detect_date_format(&timestamp_cells).ok_or(LoadError::NoData)?;

    let mut readings = Vec::with_capacity(data_rows.len());
    let mut skipped = 0usize;
    for (row, ts) in data_rows.iter().zip(&timestamp_cells) {
        let Some(timestamp) = datetime::parse_datetime(ts, format) else {
            skipped += 1;
            continue;
        };
        readings.push(Reading {
            timestamp,
            magnetic_field: parse_number(cell(row, columns.magnetic_field)),
            electric_field: parse_number(cell(row, columns.electric_field)),
            power_density: parse_number(cell(row, columns.power_density)),
            source: cell(row, columns.source).trim().to_string(),
        });
    }

    if skipped > 0 {
        tracing::warn!("Skipped {skipped} rows with unparseable timestamps");
    }
    if readings.is_empty() {
        return Err(LoadError::NoData);
    }
    Ok(Dataset::new(readings))
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
index,datetime,mG,V/m,mW/m2,microW/m2,source
0,2023-01-06 12:00:00,0.4,1.5,0.0012,1.2,ambient
1,2023-01-06 12:00:01,0.5,1.4,0.0025,2.5,ambient
2,not a time,0.5,1.4,0.0025,2.5,ambient
3,2023-01-06 12:00:03,,1.3,0.7,700.0,phone
";

    #[test]
    fn parses_csv_export() {
        let rows = read_csv_rows(SAMPLE.as_bytes()).unwrap();
        let dataset = parse_rows(&rows).unwrap();
        assert_eq!(dataset.len(), 3);

        let last = &dataset.readings()[2];
        assert_eq!(last.power_density, 700.0);
        assert_eq!(last.source, "phone");
        assert!(last.magnetic_field.is_nan());
        assert_eq!(dataset.sources(), vec!["ambient", "phone"]);
    }

    #[test]
    fn missing_column_is_a_schema_mismatch() {
        let rows = read_csv_rows(b"datetime,mG,V/m\n2023-01-06 12:00:00,1,2\n").unwrap();
        assert!(matches!(parse_rows(&rows), Err(LoadError::SchemaMismatch { .. })));
    }

    #[test]
    fn header_only_has_no_data() {
        let rows = read_csv_rows(b"datetime,mG,V/m,microW/m2,source\n").unwrap();
        assert!(matches!(parse_rows(&rows), Err(LoadError::NoData)));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("readings.parquet")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "parquet"));
    }

    #[test]
    fn supported_extensions_ignore_case() {
        assert!(is_supported(Path::new("log.XLSX")));
        assert!(is_supported(Path::new("log.csv")));
        assert!(!is_supported(Path::new("log.txt")));
        assert!(!is_supported(Path::new("log")));
    }

    #[test]
    fn loads_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bedroom.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let dataset = load_file(&path).unwrap();
        assert_eq!(dataset.reference_date().unwrap().to_string(), "2023-01-06");
    }
}
