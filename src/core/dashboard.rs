use crate::domain::ports::AdminCatalog;
use crate::domain::resources::{Blog, CatalogResource, Faq, Packages, PbnSites};
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub pbn_sites: usize,
    pub packages: usize,
    pub blog_posts: usize,
    pub faqs: usize,
}

/// Fetches the four admin counters concurrently; any failure fails the whole load.
pub async fn load_dashboard<A: AdminCatalog + ?Sized>(api: &A) -> Result<DashboardStats> {
    let (pbn_sites, packages, blog_posts, faqs) = tokio::try_join!(
        api.admin_count(PbnSites::PATH),
        api.admin_count(Packages::PATH),
        api.admin_count(Blog::PATH),
        api.admin_count(Faq::PATH),
    )?;

    let stats = DashboardStats {
        pbn_sites,
        packages,
        blog_posts,
        faqs,
    };
    tracing::debug!("Dashboard stats: {:?}", stats);
    Ok(stats)
}
