use crate::domain::model::SiteSettings;
use crate::domain::ports::CatalogApi;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Process-wide site settings, fetched at most once and shared by reference.
///
/// Concurrent first readers wait on the same fetch instead of each calling
/// `GET /settings`.
#[derive(Debug, Default)]
pub struct SettingsCache {
    current: RwLock<Option<Arc<SiteSettings>>>,
    fetch_lock: Mutex<()>,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cached(&self) -> Option<Arc<SiteSettings>> {
        self.current.read().await.clone()
    }

    pub async fn get<A: CatalogApi + ?Sized>(&self, api: &A) -> Result<Arc<SiteSettings>> {
        if let Some(settings) = self.cached().await {
            return Ok(settings);
        }

        let _fetching = self.fetch_lock.lock().await;
        // 等鎖期間可能已經有人抓完
        if let Some(settings) = self.cached().await {
            return Ok(settings);
        }

        tracing::debug!("Fetching site settings");
        let settings = Arc::new(api.fetch_settings().await?);
        *self.current.write().await = Some(settings.clone());
        Ok(settings)
    }

    /// Saves new settings through the admin endpoint and replaces the cached copy.
    pub async fn update<A: CatalogApi + ?Sized>(
        &self,
        api: &A,
        settings: &SiteSettings,
    ) -> Result<Arc<SiteSettings>> {
        let _fetching = self.fetch_lock.lock().await;
        let saved = Arc::new(api.update_settings(settings).await?);
        *self.current.write().await = Some(saved.clone());
        tracing::info!("⚙️ Site settings updated");
        Ok(saved)
    }

    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }
}
