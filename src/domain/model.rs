use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single cell as read from a CSV or spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Trimmed string form; numbers render without a trailing `.0`.
    pub fn as_trimmed(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

/// Column name -> cell. Absent keys are empty cells or missing columns.
pub type ImportRow = HashMap<String, CellValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    #[default]
    Available,
    Sold,
    Reserved,
}

impl DomainStatus {
    pub const ALL: [DomainStatus; 3] = [
        DomainStatus::Available,
        DomainStatus::Sold,
        DomainStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStatus::Available => "available",
            DomainStatus::Sold => "sold",
            DomainStatus::Reserved => "reserved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clean domain row ready for `POST /admin/domains/import`.
///
/// The same shape is the create/update body of an aged domain listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDomainRecord {
    pub domain_name: String,
    pub da: i64,
    pub pa: i64,
    pub ur: i64,
    pub dr: i64,
    pub tf: i64,
    pub cf: i64,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_archive_history: Option<String>,
    pub age: i64,
    pub registrar: String,
    #[serde(default)]
    pub status: DomainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub type DomainListingInput = NormalizedDomainRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row_index: usize,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(row_index: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row_index,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_index, self.message)
    }
}

/// Result of one validation pass over an uploaded file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub records: Vec<NormalizedDomainRecord>,
    pub errors: Vec<ValidationError>,
    pub rows_read: usize,
}

impl ImportBatch {
    /// Rows that produced at least one error; a row counts once.
    pub fn rejected_rows(&self) -> usize {
        let mut rows: Vec<usize> = self.errors.iter().map(|e| e.row_index).collect();
        rows.dedup();
        rows.len()
    }

    pub fn is_submittable(&self) -> bool {
        self.errors.is_empty() && !self.records.is_empty()
    }

    /// First `limit` error lines plus a trailing `... and N more` when truncated.
    pub fn error_preview(&self, limit: usize) -> Vec<String> {
        let mut lines: Vec<String> = self.errors.iter().take(limit).map(|e| e.to_string()).collect();
        if self.errors.len() > limit {
            lines.push(format!("... and {} more", self.errors.len() - limit));
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainListing {
    pub id: String,
    #[serde(flatten)]
    pub fields: NormalizedDomainRecord,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbnSite {
    pub id: String,
    pub code: String,
    /// Hidden from the public listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_real: Option<String>,
    pub niche: String,
    pub dr: i64,
    pub da: i64,
    pub traffic: i64,
    pub spam_score: f64,
    pub age: i64,
    pub price_per_post: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbnSiteInput {
    pub code: String,
    pub domain_real: String,
    pub niche: String,
    pub dr: i64,
    pub da: i64,
    pub traffic: i64,
    pub spam_score: f64,
    pub age: i64,
    pub price_per_post: i64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    #[serde(flatten)]
    pub fields: PackageInput,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInput {
    pub name: String,
    pub slug: String,
    pub backlink_count: i64,
    pub price: i64,
    pub description: String,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    #[serde(flatten)]
    pub fields: BlogPostInput,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub id: String,
    #[serde(flatten)]
    pub fields: FaqInput,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPage {
    pub id: String,
    #[serde(flatten)]
    pub fields: StaticPageInput,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPageInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

/// Editable homepage/landing blocks keyed by page and section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub id: String,
    #[serde(flatten)]
    pub fields: PageContentInput,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContentInput {
    pub page_key: String,
    pub section: String,
    pub content: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub tagline: String,
    pub whatsapp_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_username: Option<String>,
    #[serde(default)]
    pub footer_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<HashMap<String, String>>,
}

fn default_true() -> bool {
    true
}

fn default_site_name() -> String {
    "DomainPBN".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_trimmed_forms() {
        assert_eq!(CellValue::text("  GoDaddy ").as_trimmed(), "GoDaddy");
        assert_eq!(CellValue::Number(55.0).as_trimmed(), "55");
        assert_eq!(CellValue::Number(2.5).as_trimmed(), "2.5");
        assert!(CellValue::text("   ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_domain_status_parse() {
        assert_eq!(DomainStatus::parse(" Sold "), Some(DomainStatus::Sold));
        assert_eq!(DomainStatus::parse("pending"), None);
        assert_eq!(DomainStatus::default(), DomainStatus::Available);
    }

    #[test]
    fn test_error_preview_is_capped() {
        let errors = (1..=13)
            .map(|i| ValidationError::new(i, "domain_name", "Missing domain_name"))
            .collect();
        let batch = ImportBatch {
            records: vec![],
            errors,
            rows_read: 13,
        };

        let preview = batch.error_preview(10);
        assert_eq!(preview.len(), 11);
        assert_eq!(preview[0], "Row 1: Missing domain_name");
        assert_eq!(preview[10], "... and 3 more");
        assert_eq!(batch.rejected_rows(), 13);
    }

    #[test]
    fn test_domain_listing_flattens_fields() {
        let json = serde_json::json!({
            "id": "d-1",
            "domain_name": "example.com",
            "da": 50, "pa": 45, "ur": 40, "dr": 55, "tf": 30, "cf": 35,
            "price": 5000000, "age": 8,
            "registrar": "GoDaddy",
            "status": "reserved",
            "created_at": "2024-05-01T10:00:00Z"
        });
        let listing: DomainListing = serde_json::from_value(json).unwrap();
        assert_eq!(listing.fields.dr, 55);
        assert_eq!(listing.fields.status, DomainStatus::Reserved);
        assert!(listing.fields.notes.is_none());
        assert!(listing.created_at.is_some());
    }
}
