use crate::{Error, Result};

/// Result of summing a CSV file
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSums {
    /// Sum of the requested column
    Scalar(f64),
    /// Sum of every numeric column, in header order
    Columns(Vec<(String, f64)>),
}

impl ColumnSums {
    /// Sum for a named column, if present
    pub fn get(&self, column: &str) -> Option<f64> {
        match self {
            ColumnSums::Scalar(_) => None,
            ColumnSums::Columns(columns) => columns
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, total)| *total),
        }
    }
}

/// Sums CSV columns
pub trait CsvColumnSummer: Send + Sync {
    fn sum_columns(&self, csv_bytes: &[u8], column: Option<&str>) -> Result<ColumnSums>;
}

/// Minimal CSV summer: header row plus comma-separated records with
/// double-quote escaping.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleCsvSummer;

impl CsvColumnSummer for SimpleCsvSummer {
    fn sum_columns(&self, csv_bytes: &[u8], column: Option<&str>) -> Result<ColumnSums> {
        let text = String::from_utf8_lossy(csv_bytes);
        let mut records = split_records(&text).into_iter();

        let headers: Vec<String> = records
            .next()
            .ok_or_else(|| Error::Parse("CSV has no header row".to_string()))?
            .into_iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let rows: Vec<Vec<String>> = records.collect();

        if let Some(name) = column {
            if let Some(idx) = headers.iter().position(|h| h == name) {
                let total = rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .filter_map(|cell| parse_cell(cell))
                    .sum();
                return Ok(ColumnSums::Scalar(total));
            }
            tracing::debug!("CSV column '{}' not found, summing numeric columns", name);
        }

        let mut columns = Vec::new();
        for (idx, name) in headers.iter().enumerate() {
            let cells: Vec<&str> = rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .collect();

            if cells.is_empty() {
                continue;
            }

            let parsed: Option<Vec<f64>> = cells.iter().map(|cell| parse_cell(cell)).collect();
            if let Some(values) = parsed {
                columns.push((name.clone(), values.iter().sum()));
            }
        }

        Ok(ColumnSums::Columns(columns))
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Split CSV text into records, honouring double-quoted fields.
///
/// Line breaks inside quotes belong to the field. Blank lines are dropped.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                push_record(&mut records, std::mem::take(&mut fields));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    push_record(&mut records, fields);
    records
}

fn push_record(records: &mut Vec<Vec<String>>, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_column_returns_scalar() {
        let csv = b"item,value\nA,5\nB,7\nC,8\n";
        let sums = SimpleCsvSummer.sum_columns(csv, Some("value")).unwrap();
        assert_eq!(sums, ColumnSums::Scalar(20.0));
    }

    #[test]
    fn test_missing_column_returns_numeric_columns_only() {
        let csv = b"item,value,weight\nA,5,1.5\nB,7,2\n";
        let sums = SimpleCsvSummer.sum_columns(csv, Some("price")).unwrap();
        assert_eq!(
            sums,
            ColumnSums::Columns(vec![("value".to_string(), 12.0), ("weight".to_string(), 3.5)])
        );
        assert_eq!(sums.get("weight"), Some(3.5));
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let csv = b"name,amount\n\"Smith, J\",\"1,000\"\n\"Doe \"\"JD\"\"\",250\n";
        let sums = SimpleCsvSummer.sum_columns(csv, Some("amount")).unwrap();
        assert_eq!(sums, ColumnSums::Scalar(1250.0));
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let csv = b"note,amount\r\n\"line one\nline two\",40\r\n\"single\",2\r\n";
        let sums = SimpleCsvSummer.sum_columns(csv, Some("amount")).unwrap();
        assert_eq!(sums, ColumnSums::Scalar(42.0));

        let records = split_records("a,b\n\"x\ny\",1\n\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], vec!["x\ny".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = SimpleCsvSummer.sum_columns(b"\n\n", None).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_blank_cells_are_ignored() {
        let csv = b"a,b\n1,\n2,x\n";
        let sums = SimpleCsvSummer.sum_columns(csv, None).unwrap();
        assert_eq!(sums, ColumnSums::Columns(vec![("a".to_string(), 3.0)]));
    }
}
