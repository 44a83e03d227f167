use crate::domain::ports::Storage;
use crate::utils::error::{PbnError, Result};

pub const TEMPLATE_FILE_NAME: &str = "domain_template.csv";

pub const TEMPLATE_HEADERS: [&str; 13] = [
    "domain_name",
    "da",
    "pa",
    "ur",
    "dr",
    "tf",
    "cf",
    "price",
    "age",
    "registrar",
    "web_archive_history",
    "status",
    "notes",
];

const EXAMPLE_ROW: [&str; 13] = [
    "example.com",
    "50",
    "45",
    "40",
    "55",
    "30",
    "35",
    "5000000",
    "8",
    "GoDaddy",
    "https://web.archive.org/web/*/example.com",
    "available",
    "High quality domain",
];

/// Header plus one example row, in the column order the importer expects.
pub fn render_template() -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEMPLATE_HEADERS)?;
    writer.write_record(EXAMPLE_ROW)?;
    writer.into_inner().map_err(|e| PbnError::IoError(e.into_error()))
}

pub async fn export_template<S: Storage>(storage: &S, path: &str) -> Result<()> {
    let bytes = render_template()?;
    storage.write_file(path, &bytes).await?;
    tracing::info!("📄 Import template written to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import_parser::{parse_rows, ImportFormat};
    use crate::core::row_validator::validate_rows;

    #[test]
    fn test_template_passes_its_own_validation() {
        let bytes = render_template().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("domain_name,da,pa,ur,dr,tf,cf,price,age,registrar,"));

        let batch = validate_rows(parse_rows(ImportFormat::Csv, &bytes).unwrap());
        assert!(batch.errors.is_empty());
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].price, 5_000_000);
        assert_eq!(batch.records[0].notes.as_deref(), Some("High quality domain"));
    }
}
