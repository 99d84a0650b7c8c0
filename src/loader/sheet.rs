//! Decoding fetched bytes into a header row plus string cells.
//!
//! Excel/ODS workbooks go through calamine (first worksheet only); anything
//! else is read as UTF-8 CSV.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Sheet {
    /// Index of the column named `name` (trimmed, case-insensitive).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    }

    /// Indexes of every column whose name starts with `prefix`
    /// (case-insensitive), in column order.
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<usize> {
        let prefix = prefix.to_lowercase();
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.to_lowercase().starts_with(&prefix))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Cell at `idx`, or "" when the row is short.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

pub fn detect_format(bytes: &[u8]) -> SheetFormat {
    match infer::get(bytes).map(|kind| kind.extension()) {
        Some("xlsx" | "xls" | "ods" | "zip") => SheetFormat::Workbook,
        _ => SheetFormat::Csv,
    }
}

pub fn parse_sheet(bytes: &[u8]) -> Result<Sheet, SheetError> {
    match detect_format(bytes) {
        SheetFormat::Workbook => parse_workbook(bytes),
        SheetFormat::Csv => parse_csv(bytes),
    }
}

fn parse_workbook(bytes: &[u8]) -> Result<Sheet, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

    let headers = rows.next().unwrap_or_default();

    Ok(Sheet {
        headers,
        rows: rows.collect(),
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Sheet, SheetError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = vec![];
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Sheet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_detected() {
        assert_eq!(detect_format(b"phrase,topics\n"), SheetFormat::Csv);
    }

    #[test]
    fn test_zip_detected_as_workbook() {
        let zip_header = b"PK\x03\x04\x14\x00\x00\x00\x08\x00";
        assert_eq!(detect_format(zip_header), SheetFormat::Workbook);
    }

    #[test]
    fn test_parse_csv() {
        let sheet = parse_sheet("phrase,topics,comment\nДа/Ага,Согласие,\n".as_bytes()).unwrap();

        assert_eq!(sheet.headers, vec!["phrase", "topics", "comment"]);
        assert_eq!(sheet.rows, vec![vec!["Да/Ага", "Согласие", ""]]);
    }

    #[test]
    fn test_parse_csv_strips_bom_and_keeps_short_rows() {
        let bytes = "\u{feff}phrase,topics 1,topics 2\nПривет,Приветствие\n".as_bytes();
        let sheet = parse_sheet(bytes).unwrap();

        assert_eq!(sheet.column("phrase"), Some(0));
        assert_eq!(sheet.rows[0].len(), 2);
        assert_eq!(cell(&sheet.rows[0], 2), "");
    }

    #[test]
    fn test_column_lookup() {
        let sheet = Sheet {
            headers: vec![
                " Phrase ".to_string(),
                "Topics".to_string(),
                "comment".to_string(),
                "topics_extra".to_string(),
            ],
            rows: vec![],
        };

        assert_eq!(sheet.column("phrase"), Some(0));
        assert_eq!(sheet.column("comment"), Some(2));
        assert_eq!(sheet.column("missing"), None);
        assert_eq!(sheet.columns_with_prefix("topics"), vec![1, 3]);
    }

    #[test]
    fn test_broken_workbook_is_an_error() {
        let result = parse_sheet(b"PK\x03\x04\x14\x00\x00\x00\x08\x00garbage");
        assert!(matches!(result, Err(SheetError::Workbook(_))));
    }
}
