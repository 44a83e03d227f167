use crate::core::checkout::encode_component;
use crate::domain::model::{
    BlogPost, DomainListing, ImportSummary, NormalizedDomainRecord, PbnSite, SiteSettings,
};
use crate::domain::ports::{AdminCatalog, CatalogApi, ConfigProvider, ListParams};
use crate::domain::resources::{Blog, CatalogResource, Domains, PbnSites};
use crate::utils::error::{PbnError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001/api";

/// REST client for the catalog backend, public and admin surfaces.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    admin_token: Option<String>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, admin_token: Option<String>, timeout_seconds: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_token: admin_token.filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(
            config.api_base_url(),
            config.admin_token().map(str::to_string),
            config.timeout_seconds(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn public(&self, path: &str) -> RequestBuilder {
        tracing::debug!("📡 GET {}", self.url(path));
        self.client.get(self.url(path)).timeout(self.timeout)
    }

    fn admin(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(&format!("admin/{}", path));
        tracing::debug!("📡 {} {}", method, url);
        let request = self.client.request(method, url).timeout(self.timeout);
        match &self.admin_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn checked(request: RequestBuilder, resource: &str) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(PbnError::NotFound {
                resource: resource.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PbnError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder, resource: &str) -> Result<T> {
        let response = Self::checked(request, resource).await?;
        Ok(response.json().await?)
    }

    // Public listings

    pub async fn list_public<R: CatalogResource>(&self, params: &ListParams) -> Result<Vec<R::Item>> {
        let request = self.public(R::PATH).query(&params.to_query());
        Self::send_json(request, R::LABEL).await
    }

    /// `GET /{path}/{key}`; the key is a slug for blog and pages, a page key for page content.
    pub async fn get_public<R: CatalogResource>(&self, key: &str) -> Result<R::Item> {
        let path = format!("{}/{}", R::PATH, encode_component(key));
        Self::send_json(self.public(&path), R::LABEL).await
    }

    // Admin CRUD

    pub async fn admin_list<R: CatalogResource>(&self) -> Result<Vec<R::Item>> {
        Self::send_json(self.admin(Method::GET, R::PATH), R::LABEL).await
    }

    pub async fn create<R: CatalogResource>(&self, input: &R::Input) -> Result<R::Item> {
        input.validate()?;
        let request = self.admin(Method::POST, R::PATH).json(input);
        let item = Self::send_json::<R::Item>(request, R::LABEL).await?;
        tracing::info!("✅ {} created: {}", R::LABEL, R::id(&item));
        Ok(item)
    }

    pub async fn update<R: CatalogResource>(&self, id: &str, input: &R::Input) -> Result<R::Item> {
        input.validate()?;
        let path = format!("{}/{}", R::PATH, encode_component(id));
        let request = self.admin(Method::PUT, &path).json(input);
        let item = Self::send_json::<R::Item>(request, R::LABEL).await?;
        tracing::info!("✅ {} updated: {}", R::LABEL, id);
        Ok(item)
    }

    pub async fn delete<R: CatalogResource>(&self, id: &str) -> Result<()> {
        let path = format!("{}/{}", R::PATH, encode_component(id));
        Self::checked(self.admin(Method::DELETE, &path), R::LABEL).await?;
        tracing::info!("🗑️ {} deleted: {}", R::LABEL, id);
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn fetch_settings(&self) -> Result<SiteSettings> {
        Self::send_json(self.public("settings"), "Settings").await
    }

    async fn update_settings(&self, settings: &SiteSettings) -> Result<SiteSettings> {
        let request = self.admin(Method::PUT, "settings").json(settings);
        Self::send_json(request, "Settings").await
    }

    async fn list_domains(&self, params: &ListParams) -> Result<Vec<DomainListing>> {
        self.list_public::<Domains>(params).await
    }

    async fn list_pbn(&self, params: &ListParams) -> Result<Vec<PbnSite>> {
        self.list_public::<PbnSites>(params).await
    }

    async fn list_blog(&self, params: &ListParams) -> Result<Vec<BlogPost>> {
        self.list_public::<Blog>(params).await
    }

    async fn import_domains(&self, records: &[NormalizedDomainRecord]) -> Result<ImportSummary> {
        let request = self.admin(Method::POST, "domains/import").json(records);
        Self::send_json(request, "Domain import").await
    }
}

#[async_trait]
impl AdminCatalog for ApiClient {
    async fn admin_count(&self, path: &str) -> Result<usize> {
        let items: Vec<serde_json::Value> = Self::send_json(self.admin(Method::GET, path), path).await?;
        Ok(items.len())
    }
}
