use crate::domain::model::{
    CellValue, DomainStatus, ImportBatch, ImportRow, NormalizedDomainRecord, ValidationError,
};

pub const REQUIRED_FIELDS: [&str; 2] = ["domain_name", "registrar"];
pub const NUMERIC_FIELDS: [&str; 8] = ["da", "pa", "ur", "dr", "tf", "cf", "price", "age"];
const METRIC_MAX: i64 = 100;

/// Why a numeric cell could not be read as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    NotANumber,
    TooLarge,
}

/// 2^63 as f64; every truncated value strictly inside (-2^63, 2^63) fits in i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Leading-integer parse: `"55"` -> 55, `" 7 "` -> 7, `"12px"` -> 12, `"3.9"` -> 3, `"abc"` -> not a number.
/// Numeric cells truncate toward zero; NaN and infinities do not parse. Values outside `i64` are too large.
pub fn parse_leading_int(cell: &CellValue) -> std::result::Result<i64, NumberError> {
    match cell {
        CellValue::Number(n) if !n.is_finite() => Err(NumberError::NotANumber),
        CellValue::Number(n) => {
            let truncated = n.trunc();
            if truncated >= I64_BOUND || truncated <= -I64_BOUND {
                return Err(NumberError::TooLarge);
            }
            Ok(truncated as i64)
        }
        CellValue::Text(s) => {
            let s = s.trim_start();
            let (negative, rest) = match s.as_bytes().first() {
                Some(b'-') => (true, &s[1..]),
                Some(b'+') => (false, &s[1..]),
                _ => (false, s),
            };
            let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits_len == 0 {
                return Err(NumberError::NotANumber);
            }
            // 只剩數字，parse 失敗就是溢位
            let value: i64 = rest[..digits_len]
                .parse()
                .map_err(|_| NumberError::TooLarge)?;
            Ok(if negative { -value } else { value })
        }
    }
}

/// Non-blank cell of `row` under `field`.
fn present<'a>(row: &'a ImportRow, field: &str) -> Option<&'a CellValue> {
    row.get(field).filter(|cell| !cell.is_blank())
}

fn trimmed(row: &ImportRow, field: &str) -> Option<String> {
    present(row, field).map(CellValue::as_trimmed)
}

/// Validates one row; `row_index` is 1-based with the header excluded.
pub fn validate_row(
    row_index: usize,
    row: &ImportRow,
) -> std::result::Result<NormalizedDomainRecord, Vec<ValidationError>> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if present(row, field).is_none() {
            errors.push(ValidationError::new(row_index, field, format!("Missing {}", field)));
        }
    }

    let mut numbers = [0i64; NUMERIC_FIELDS.len()];
    for (slot, field) in numbers.iter_mut().zip(NUMERIC_FIELDS) {
        let Some(cell) = present(row, field) else {
            continue;
        };
        match parse_leading_int(cell) {
            Err(NumberError::NotANumber) => errors.push(ValidationError::new(
                row_index,
                field,
                format!("{} must be a number", field),
            )),
            Err(NumberError::TooLarge) => errors.push(ValidationError::new(
                row_index,
                field,
                format!("{} is too large", field),
            )),
            Ok(value) if value < 0 => errors.push(ValidationError::new(
                row_index,
                field,
                format!("{} must not be negative", field),
            )),
            Ok(value) if value > METRIC_MAX && field != "price" && field != "age" => {
                errors.push(ValidationError::new(
                    row_index,
                    field,
                    format!("{} must be between 0 and {}", field, METRIC_MAX),
                ))
            }
            Ok(value) => *slot = value,
        }
    }

    let status = match trimmed(row, "status") {
        None => DomainStatus::default(),
        Some(raw) => match DomainStatus::parse(&raw) {
            Some(status) => status,
            None => {
                errors.push(ValidationError::new(
                    row_index,
                    "status",
                    "status must be one of available, sold, reserved",
                ));
                DomainStatus::default()
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let [da, pa, ur, dr, tf, cf, price, age] = numbers;
    Ok(NormalizedDomainRecord {
        domain_name: trimmed(row, "domain_name").unwrap_or_default(),
        da,
        pa,
        ur,
        dr,
        tf,
        cf,
        price,
        web_archive_history: trimmed(row, "web_archive_history"),
        age,
        registrar: trimmed(row, "registrar").unwrap_or_default(),
        status,
        notes: trimmed(row, "notes"),
    })
}

/// Single pass over parsed rows. Rows with any error are excluded whole; errors are not capped.
pub fn validate_rows<I>(rows: I) -> ImportBatch
where
    I: IntoIterator<Item = ImportRow>,
{
    let mut batch = ImportBatch::default();

    for (index, row) in rows.into_iter().enumerate() {
        batch.rows_read += 1;
        match validate_row(index + 1, &row) {
            Ok(record) => batch.records.push(record),
            Err(errors) => batch.errors.extend(errors),
        }
    }

    if batch.errors.is_empty() {
        tracing::info!("✅ {} domains ready to import", batch.records.len());
    } else {
        tracing::warn!(
            "⚠️ Found {} validation errors in {} rows ({} domains valid)",
            batch.errors.len(),
            batch.rejected_rows(),
            batch.records.len()
        );
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import_parser::{parse_rows, ImportFormat};

    fn row(pairs: &[(&str, &str)]) -> ImportRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::text(*v)))
            .collect()
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int(&CellValue::text("55")), Ok(55));
        assert_eq!(parse_leading_int(&CellValue::text("  7 ")), Ok(7));
        assert_eq!(parse_leading_int(&CellValue::text("12px")), Ok(12));
        assert_eq!(parse_leading_int(&CellValue::text("3.9")), Ok(3));
        assert_eq!(parse_leading_int(&CellValue::text("-4")), Ok(-4));
        assert_eq!(parse_leading_int(&CellValue::text("abc")), Err(NumberError::NotANumber));
        assert_eq!(parse_leading_int(&CellValue::text("-")), Err(NumberError::NotANumber));
        assert_eq!(parse_leading_int(&CellValue::Number(42.8)), Ok(42));
        assert_eq!(
            parse_leading_int(&CellValue::Number(f64::NAN)),
            Err(NumberError::NotANumber)
        );
    }

    #[test]
    fn test_out_of_range_numbers_are_too_large() {
        assert_eq!(
            parse_leading_int(&CellValue::text("99999999999999999999")),
            Err(NumberError::TooLarge)
        );
        assert_eq!(
            parse_leading_int(&CellValue::Number(1e20)),
            Err(NumberError::TooLarge)
        );
        assert_eq!(
            parse_leading_int(&CellValue::text("9223372036854775807")),
            Ok(i64::MAX)
        );

        let csv = "domain_name,registrar,price,age\na.com,R,99999999999999999999,5\n";
        let batch = validate_rows(parse_rows(ImportFormat::Csv, csv.as_bytes()).unwrap());
        assert_eq!(
            batch.errors,
            vec![ValidationError::new(1, "price", "price is too large")]
        );

        let mut sheet_row = row(&[("domain_name", "b.com"), ("registrar", "R")]);
        sheet_row.insert("price".to_string(), CellValue::Number(1e19));
        let batch = validate_rows(vec![sheet_row]);
        assert!(batch.records.is_empty());
        assert_eq!(batch.errors[0].message, "price is too large");
    }

    #[test]
    fn test_scenario_from_csv() {
        let csv = "domain_name,registrar,dr\nexample.com,GoDaddy,55\n,Namecheap,60\nbad.com,Name,xyz";
        let rows = parse_rows(ImportFormat::Csv, csv.as_bytes()).unwrap();
        let batch = validate_rows(rows);

        assert_eq!(batch.rows_read, 3);
        assert_eq!(batch.records.len(), 1);
        let accepted = &batch.records[0];
        assert_eq!(accepted.domain_name, "example.com");
        assert_eq!(accepted.registrar, "GoDaddy");
        assert_eq!(accepted.dr, 55);
        assert_eq!(accepted.da, 0);
        assert_eq!(accepted.price, 0);
        assert_eq!(accepted.status, DomainStatus::Available);
        assert_eq!(accepted.notes, None);

        assert_eq!(
            batch.errors,
            vec![
                ValidationError::new(2, "domain_name", "Missing domain_name"),
                ValidationError::new(3, "dr", "dr must be a number"),
            ]
        );
        assert!(!batch.is_submittable());
    }

    #[test]
    fn test_missing_both_required_fields_in_check_order() {
        let batch = validate_rows(vec![row(&[("domain_name", "  "), ("dr", "10")])]);

        assert!(batch.records.is_empty());
        let fields: Vec<&str> = batch.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["domain_name", "registrar"]);
    }

    #[test]
    fn test_required_errors_precede_numeric_errors() {
        let batch = validate_rows(vec![row(&[
            ("registrar", "GoDaddy"),
            ("da", "x"),
            ("price", "mahal"),
        ])]);

        let fields: Vec<&str> = batch.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["domain_name", "da", "price"]);
        assert!(batch.errors.iter().all(|e| e.row_index == 1));
        assert_eq!(batch.rejected_rows(), 1);
    }

    #[test]
    fn test_numeric_error_independent_of_required_fields() {
        let batch = validate_rows(vec![row(&[
            ("domain_name", "ok.com"),
            ("registrar", "GoDaddy"),
            ("tf", "abc"),
        ])]);

        assert!(batch.records.is_empty());
        assert_eq!(batch.errors, vec![ValidationError::new(1, "tf", "tf must be a number")]);
    }

    #[test]
    fn test_range_and_status_checks() {
        let batch = validate_rows(vec![row(&[
            ("domain_name", "ok.com"),
            ("registrar", "GoDaddy"),
            ("dr", "150"),
            ("age", "-2"),
            ("status", "pending"),
        ])]);

        let messages: Vec<&str> = batch.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "dr must be between 0 and 100",
                "age must not be negative",
                "status must be one of available, sold, reserved",
            ]
        );
    }

    #[test]
    fn test_normalization_trims_and_defaults() {
        let batch = validate_rows(vec![row(&[
            ("domain_name", "  aged.id "),
            ("registrar", " Niagahoster "),
            ("price", "2500000"),
            ("age", " 12 "),
            ("status", "Sold"),
            ("web_archive_history", " https://web.archive.org/web/*/aged.id "),
            ("notes", "   "),
        ])]);

        assert!(batch.errors.is_empty());
        let record = &batch.records[0];
        assert_eq!(record.domain_name, "aged.id");
        assert_eq!(record.registrar, "Niagahoster");
        assert_eq!(record.price, 2_500_000);
        assert_eq!(record.age, 12);
        assert_eq!(record.status, DomainStatus::Sold);
        assert_eq!(
            record.web_archive_history.as_deref(),
            Some("https://web.archive.org/web/*/aged.id")
        );
        assert_eq!(record.notes, None);
        assert!(batch.is_submittable());
    }

    #[test]
    fn test_numeric_cells_from_spreadsheets() {
        let mut sheet_row = row(&[("domain_name", "xls.com")]);
        sheet_row.insert("registrar".to_string(), CellValue::Number(1.0));
        sheet_row.insert("dr".to_string(), CellValue::Number(61.0));
        sheet_row.insert("price".to_string(), CellValue::Number(7_500_000.0));

        let batch = validate_rows(vec![sheet_row]);
        assert!(batch.errors.is_empty());
        assert_eq!(batch.records[0].registrar, "1");
        assert_eq!(batch.records[0].dr, 61);
        assert_eq!(batch.records[0].price, 7_500_000);
    }

    #[test]
    fn test_row_accounting_is_consistent() {
        let rows = vec![
            row(&[("domain_name", "a.com"), ("registrar", "R")]),
            row(&[("domain_name", ""), ("registrar", ""), ("dr", "x")]),
            row(&[("domain_name", "c.com"), ("registrar", "R"), ("da", "10")]),
            row(&[("registrar", "R"), ("cf", "?")]),
            row(&[("domain_name", "e.com"), ("registrar", "R"), ("pa", "zz"), ("ur", "yy")]),
        ];
        let batch = validate_rows(rows);

        assert_eq!(batch.rows_read, 5);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.errors.len(), 7);
        assert_eq!(batch.rows_read, batch.records.len() + batch.rejected_rows());
        let names: Vec<&str> = batch.records.iter().map(|r| r.domain_name.as_str()).collect();
        assert_eq!(names, vec!["a.com", "c.com"]);
    }
}
