use crate::domain::model::{
    BlogPost, DomainListing, ImportSummary, NormalizedDomainRecord, PbnSite, SiteSettings,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn admin_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn error_preview_limit(&self) -> usize;
}

/// Query parameters sent to the public listing endpoints; niche/DR filters run locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub sort_by: Option<String>,
    pub limit: Option<usize>,
    pub page: Option<usize>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(sort_by) = &self.sort_by {
            query.push(("sort_by", sort_by.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            query.push(("search", search.clone()));
        }
        query
    }
}

/// The slice of the backend the core logic depends on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_settings(&self) -> Result<SiteSettings>;
    async fn update_settings(&self, settings: &SiteSettings) -> Result<SiteSettings>;
    async fn list_domains(&self, params: &ListParams) -> Result<Vec<DomainListing>>;
    async fn list_pbn(&self, params: &ListParams) -> Result<Vec<PbnSite>>;
    async fn list_blog(&self, params: &ListParams) -> Result<Vec<BlogPost>>;
    async fn import_domains(&self, records: &[NormalizedDomainRecord]) -> Result<ImportSummary>;
}

/// Admin-side listing sizes, keyed by resource path (`pbn`, `packages`, ...).
#[async_trait]
pub trait AdminCatalog: Send + Sync {
    async fn admin_count(&self, path: &str) -> Result<usize>;
}

/// Content editor used by the blog and page forms.
pub trait RichTextEditor: Send + Sync {
    fn name(&self) -> &str;
    fn set_content(&mut self, raw: &str);
    fn to_html(&self) -> String;
    fn is_empty(&self) -> bool {
        self.to_html().trim().is_empty()
    }
}
