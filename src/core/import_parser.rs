use crate::domain::model::{CellValue, ImportRow};
use crate::utils::error::{PbnError, Result};
use crate::utils::validation::validate_file_extension;
use calamine::{Data, Reader};
use std::io::Cursor;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Xlsx,
    Xls,
}

impl ImportFormat {
    /// 只看副檔名決定格式，不支援的格式在解析前就拒絕
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        match validate_file_extension(file_name, &SUPPORTED_EXTENSIONS)?.as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "xlsx" => Ok(ImportFormat::Xlsx),
            _ => Ok(ImportFormat::Xls),
        }
    }
}

/// Reads every data row of the file. Either all rows come back or an error does.
pub fn parse_rows(format: ImportFormat, bytes: &[u8]) -> Result<Vec<ImportRow>> {
    let rows = match format {
        ImportFormat::Csv => parse_csv(bytes)?,
        ImportFormat::Xlsx | ImportFormat::Xls => parse_spreadsheet(bytes)?,
    };
    tracing::debug!("Parsed {} data rows from {:?} file", rows.len(), format);
    Ok(rows)
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let row: ImportRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_string(), CellValue::text(value)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<ImportRow>> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PbnError::ParseError {
            message: "workbook contains no sheets".to_string(),
        })??;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let row: ImportRow = headers
            .iter()
            .zip(cells.iter())
            .filter(|(name, _)| !name.is_empty())
            .filter_map(|(name, cell)| sheet_cell(cell).map(|value| (name.clone(), value)))
            .collect();

        // 空白列略過
        if row.values().all(CellValue::is_blank) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn sheet_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            Some(CellValue::Text(s.clone()))
        }
        Data::Bool(b) => Some(CellValue::Text(b.to_string())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::row_validator::validate_rows;
    use crate::domain::model::ValidationError;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(ImportFormat::from_file_name("domains.csv").unwrap(), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_file_name("Domains.XLSX").unwrap(), ImportFormat::Xlsx);
        assert_eq!(ImportFormat::from_file_name("old.xls").unwrap(), ImportFormat::Xls);

        let err = ImportFormat::from_file_name("domains.json").unwrap_err();
        assert!(matches!(err, PbnError::UnsupportedFileFormat { .. }));
    }

    #[test]
    fn test_parse_csv_uses_header_and_skips_empty_lines() {
        let csv = "domain_name,registrar,dr\nexample.com,GoDaddy,55\n\n,Namecheap,60\n";
        let rows = parse_rows(ImportFormat::Csv, csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("domain_name"), Some(&CellValue::text("example.com")));
        assert_eq!(rows[0].get("dr"), Some(&CellValue::text("55")));
        assert_eq!(rows[1].get("domain_name"), Some(&CellValue::text("")));
        assert_eq!(rows[1].get("registrar"), Some(&CellValue::text("Namecheap")));
    }

    #[test]
    fn test_parse_csv_short_rows_leave_columns_absent() {
        let csv = " domain_name , registrar ,dr\nshort.com,Dynadot\n";
        let rows = parse_rows(ImportFormat::Csv, csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("registrar"), Some(&CellValue::text("Dynadot")));
        assert!(rows[0].get("dr").is_none());
    }

    #[test]
    fn test_parse_csv_header_only() {
        let rows = parse_rows(ImportFormat::Csv, b"domain_name,registrar\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_csv_rejects_invalid_utf8() {
        let mut bytes = b"domain_name,registrar\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'x', b'\n']);

        let result = parse_rows(ImportFormat::Csv, &bytes);
        assert!(matches!(result, Err(PbnError::CsvError(_))));
    }

    #[test]
    fn test_parse_spreadsheet_rejects_garbage() {
        let result = parse_rows(ImportFormat::Xlsx, b"definitely not a workbook");
        assert!(result.is_err());
    }

    fn two_sheet_workbook() -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();

        let first = workbook.add_worksheet();
        for (col, header) in ["domain_name", "registrar", "dr", "price"].iter().enumerate() {
            first.write_string(0, col as u16, *header).unwrap();
        }
        first.write_string(1, 0, "x.com").unwrap();
        first.write_string(1, 1, "GoDaddy").unwrap();
        first.write_number(1, 2, 61).unwrap();
        // 第 3 列留空
        first.write_string(3, 0, "y.com").unwrap();
        first.write_string(3, 1, "Namecheap").unwrap();
        first.write_string(3, 2, "abc").unwrap();

        let second = workbook.add_worksheet();
        second.write_string(0, 0, "domain_name").unwrap();
        second.write_string(0, 1, "registrar").unwrap();
        second.write_string(1, 0, "ignored.com").unwrap();
        second.write_string(1, 1, "Dynadot").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_parse_xlsx_reads_first_sheet_only() {
        let rows = parse_rows(ImportFormat::Xlsx, &two_sheet_workbook()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("domain_name"), Some(&CellValue::text("x.com")));
        assert_eq!(rows[0].get("dr"), Some(&CellValue::Number(61.0)));
        assert!(rows[0].get("price").is_none());
        assert_eq!(rows[1].get("dr"), Some(&CellValue::text("abc")));
        assert!(rows
            .iter()
            .all(|row| row.get("domain_name") != Some(&CellValue::text("ignored.com"))));

        let batch = validate_rows(rows);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].domain_name, "x.com");
        assert_eq!(batch.records[0].dr, 61);
        assert_eq!(batch.records[0].price, 0);
        assert_eq!(
            batch.errors,
            vec![ValidationError::new(2, "dr", "dr must be a number")]
        );
    }

    #[test]
    fn test_sheet_cell_conversion() {
        assert_eq!(sheet_cell(&Data::Empty), None);
        assert_eq!(sheet_cell(&Data::Int(55)), Some(CellValue::Number(55.0)));
        assert_eq!(sheet_cell(&Data::Float(12.5)), Some(CellValue::Number(12.5)));
        assert_eq!(
            sheet_cell(&Data::String("GoDaddy".to_string())),
            Some(CellValue::text("GoDaddy"))
        );
        assert_eq!(sheet_cell(&Data::Bool(true)), Some(CellValue::text("true")));
    }
}
