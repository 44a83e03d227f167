use crate::domain::model::{BlogPost, DomainListing, PbnSite};
use crate::domain::ports::{CatalogApi, ListParams};
use crate::utils::error::{PbnError, Result};
use std::cmp::Ordering;
use std::str::FromStr;

pub const LISTING_PAGE_SIZE: usize = 12;
pub const BLOG_PAGE_SIZE: usize = 9;
/// Superset fetched once for the client-side paginated listings.
pub const LISTING_FETCH_LIMIT: usize = 100;

/// Fields the listing filters look at.
pub trait CatalogItem {
    fn dr(&self) -> i64;

    fn niche(&self) -> Option<&str> {
        None
    }
}

impl CatalogItem for PbnSite {
    fn dr(&self) -> i64 {
        self.dr
    }

    fn niche(&self) -> Option<&str> {
        Some(&self.niche)
    }
}

impl CatalogItem for DomainListing {
    fn dr(&self) -> i64 {
        self.fields.dr
    }
}

pub trait SortKey<T>: Copy + Default {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PbnSort {
    #[default]
    Dr,
    Da,
    Traffic,
    PriceAsc,
    PriceDesc,
}

impl SortKey<PbnSite> for PbnSort {
    fn compare(&self, a: &PbnSite, b: &PbnSite) -> Ordering {
        match self {
            PbnSort::Dr => b.dr.cmp(&a.dr),
            PbnSort::Da => b.da.cmp(&a.da),
            PbnSort::Traffic => b.traffic.cmp(&a.traffic),
            PbnSort::PriceAsc => a.price_per_post.cmp(&b.price_per_post),
            PbnSort::PriceDesc => b.price_per_post.cmp(&a.price_per_post),
        }
    }
}

impl FromStr for PbnSort {
    type Err = PbnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dr" => Ok(PbnSort::Dr),
            "da" => Ok(PbnSort::Da),
            "traffic" => Ok(PbnSort::Traffic),
            "price_asc" => Ok(PbnSort::PriceAsc),
            "price_desc" => Ok(PbnSort::PriceDesc),
            other => Err(invalid_sort(other, "dr, da, traffic, price_asc, price_desc")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainSort {
    #[default]
    Dr,
    Da,
    Age,
    PriceAsc,
    PriceDesc,
}

impl SortKey<DomainListing> for DomainSort {
    fn compare(&self, a: &DomainListing, b: &DomainListing) -> Ordering {
        let (a, b) = (&a.fields, &b.fields);
        match self {
            DomainSort::Dr => b.dr.cmp(&a.dr),
            DomainSort::Da => b.da.cmp(&a.da),
            DomainSort::Age => b.age.cmp(&a.age),
            DomainSort::PriceAsc => a.price.cmp(&b.price),
            DomainSort::PriceDesc => b.price.cmp(&a.price),
        }
    }
}

impl FromStr for DomainSort {
    type Err = PbnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dr" => Ok(DomainSort::Dr),
            "da" => Ok(DomainSort::Da),
            "age" => Ok(DomainSort::Age),
            "price_asc" => Ok(DomainSort::PriceAsc),
            "price_desc" => Ok(DomainSort::PriceDesc),
            other => Err(invalid_sort(other, "dr, da, age, price_asc, price_desc")),
        }
    }
}

fn invalid_sort(value: &str, allowed: &str) -> PbnError {
    PbnError::InvalidConfigValueError {
        field: "sort".to_string(),
        value: value.to_string(),
        reason: format!("Valid sort keys: {}", allowed),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the niche.
    pub niche: Option<String>,
    pub min_dr: Option<i64>,
}

impl CatalogFilter {
    pub fn matches<T: CatalogItem>(&self, item: &T) -> bool {
        if let Some(needle) = self.niche.as_deref().filter(|n| !n.is_empty()) {
            let needle = needle.to_lowercase();
            match item.niche() {
                Some(niche) if niche.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        self.min_dr.map_or(true, |min| item.dr() >= min)
    }
}

/// Filter, then stable sort. Ties keep fetch order.
pub fn filter_and_sort<'a, T, S>(items: &'a [T], filter: &CatalogFilter, sort: S) -> Vec<&'a T>
where
    T: CatalogItem,
    S: SortKey<T>,
{
    let mut visible: Vec<&T> = items.iter().filter(|item| filter.matches(*item)).collect();
    visible.sort_by(|a, b| sort.compare(a, b));
    visible
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a, T> {
    pub items: Vec<&'a T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Identifies one fetch; results carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Client-held catalog listing (PBN sites, aged domains): fetched once, then
/// filtered, sorted and sliced in memory.
#[derive(Debug)]
pub struct CatalogListing<T, S> {
    items: Vec<T>,
    filter: CatalogFilter,
    sort: S,
    page: usize,
    page_size: usize,
    generation: u64,
    closed: bool,
}

impl<T, S> CatalogListing<T, S>
where
    T: CatalogItem,
    S: SortKey<T>,
{
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            filter: CatalogFilter::default(),
            sort: S::default(),
            page: 1,
            page_size: page_size.max(1),
            generation: 0,
            closed: false,
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Stores fetched items unless the ticket is stale or the listing was closed.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, items: Vec<T>) -> bool {
        if self.closed || ticket.0 != self.generation {
            tracing::debug!("Discarding stale listing response (ticket {})", ticket.0);
            return false;
        }
        self.items = items;
        self.page = 1;
        true
    }

    /// The consuming view is gone; later responses are ignored.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn sort(&self) -> S {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_niche(&mut self, niche: Option<String>) {
        self.filter.niche = niche;
        self.page = 1;
    }

    pub fn set_min_dr(&mut self, min_dr: Option<i64>) {
        self.filter.min_dr = min_dr;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: S) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn visible(&self) -> Vec<&T> {
        filter_and_sort(&self.items, &self.filter, self.sort)
    }

    pub fn total_pages(&self) -> usize {
        self.visible().len().div_ceil(self.page_size).max(1)
    }

    /// Moves to `page`, clamped to the available range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn current_page(&self) -> PageView<'_, T> {
        let visible = self.visible();
        let total_items = visible.len();
        let total_pages = total_items.div_ceil(self.page_size).max(1);
        let page = self.page.min(total_pages);
        let items = visible
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect();

        PageView {
            items,
            page,
            total_pages,
            total_items,
        }
    }

    /// Distinct niches in fetch order, for the niche picker.
    pub fn niches(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for niche in self.items.iter().filter_map(|item| item.niche()) {
            if !seen.contains(&niche) {
                seen.push(niche);
            }
        }
        seen
    }
}

fn superset_params() -> ListParams {
    ListParams {
        sort_by: Some("dr".to_string()),
        limit: Some(LISTING_FETCH_LIMIT),
        ..ListParams::default()
    }
}

pub async fn load_pbn_listing<A: CatalogApi + ?Sized>(
    api: &A,
) -> Result<CatalogListing<PbnSite, PbnSort>> {
    let mut listing = CatalogListing::new(LISTING_PAGE_SIZE);
    let ticket = listing.begin_fetch();
    let sites = api.list_pbn(&superset_params()).await?;
    tracing::debug!("Fetched {} PBN sites", sites.len());
    listing.apply_fetch(ticket, sites);
    Ok(listing)
}

pub async fn load_domain_listing<A: CatalogApi + ?Sized>(
    api: &A,
) -> Result<CatalogListing<DomainListing, DomainSort>> {
    let mut listing = CatalogListing::new(LISTING_PAGE_SIZE);
    let ticket = listing.begin_fetch();
    let domains = api.list_domains(&superset_params()).await?;
    tracing::debug!("Fetched {} domains", domains.len());
    listing.apply_fetch(ticket, domains);
    Ok(listing)
}

/// Blog listing paginated by the backend: every page is a fresh request.
#[derive(Debug)]
pub struct BlogPager {
    search: String,
    page: usize,
    page_size: usize,
    posts: Vec<BlogPost>,
    generation: u64,
}

impl Default for BlogPager {
    fn default() -> Self {
        Self::new(BLOG_PAGE_SIZE)
    }
}

impl BlogPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
            posts: Vec::new(),
            generation: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_string();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// A full page suggests there may be another one.
    pub fn has_next(&self) -> bool {
        self.posts.len() == self.page_size
    }

    pub fn params(&self) -> ListParams {
        ListParams {
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            page: Some(self.page),
            limit: Some(self.page_size),
            ..ListParams::default()
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    pub fn apply_fetch(&mut self, ticket: FetchTicket, posts: Vec<BlogPost>) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.posts = posts;
        true
    }

    pub async fn load<A: CatalogApi + ?Sized>(&mut self, api: &A) -> Result<&[BlogPost]> {
        let ticket = self.begin_fetch();
        let posts = api.list_blog(&self.params()).await?;
        self.apply_fetch(ticket, posts);
        Ok(&self.posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DomainStatus, NormalizedDomainRecord};

    fn site(id: &str, niche: &str, dr: i64, traffic: i64, price: i64) -> PbnSite {
        PbnSite {
            id: id.to_string(),
            code: format!("PBN-{}", id),
            domain_real: None,
            niche: niche.to_string(),
            dr,
            da: dr - 5,
            traffic,
            spam_score: 1.0,
            age: 5,
            price_per_post: price,
            status: None,
            notes: None,
            created_at: None,
        }
    }

    fn domain(id: &str, dr: i64, age: i64, price: i64) -> DomainListing {
        DomainListing {
            id: id.to_string(),
            fields: NormalizedDomainRecord {
                domain_name: format!("{}.com", id),
                da: 10,
                pa: 10,
                ur: 10,
                dr,
                tf: 10,
                cf: 10,
                price,
                web_archive_history: None,
                age,
                registrar: "GoDaddy".to_string(),
                status: DomainStatus::Available,
                notes: None,
            },
            created_at: None,
        }
    }

    fn sample_sites() -> Vec<PbnSite> {
        vec![
            site("1", "Teknologi", 45, 1_000, 150_000),
            site("2", "Kesehatan", 60, 3_000, 250_000),
            site("3", "Teknologi Finansial", 52, 2_000, 200_000),
            site("4", "Otomotif", 70, 500, 300_000),
            site("5", "teknologi", 60, 800, 175_000),
        ]
    }

    #[test]
    fn test_min_dr_then_dr_desc() {
        let sites = sample_sites();
        let filter = CatalogFilter {
            niche: None,
            min_dr: Some(50),
        };
        let visible = filter_and_sort(&sites, &filter, PbnSort::Dr);

        assert!(visible.iter().all(|s| s.dr >= 50));
        assert!(visible.windows(2).all(|w| w[0].dr >= w[1].dr));
        let ids: Vec<&str> = visible.iter().map(|s| s.id.as_str()).collect();
        // 2 與 5 同分，保留原始順序
        assert_eq!(ids, vec!["4", "2", "5", "3"]);
    }

    #[test]
    fn test_niche_filter_is_case_insensitive_substring() {
        let sites = sample_sites();
        let filter = CatalogFilter {
            niche: Some("TEKNO".to_string()),
            min_dr: None,
        };
        let ids: Vec<&str> = filter_and_sort(&sites, &filter, PbnSort::Traffic)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "1", "5"]);
    }

    #[test]
    fn test_price_sorts() {
        let sites = sample_sites();
        let filter = CatalogFilter::default();
        let asc: Vec<i64> = filter_and_sort(&sites, &filter, PbnSort::PriceAsc)
            .iter()
            .map(|s| s.price_per_post)
            .collect();
        assert_eq!(asc, vec![150_000, 175_000, 200_000, 250_000, 300_000]);

        let domains = vec![domain("a", 30, 3, 900), domain("b", 40, 9, 100), domain("c", 35, 6, 500)];
        let by_age: Vec<&str> = filter_and_sort(&domains, &filter, DomainSort::Age)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(by_age, vec!["b", "c", "a"]);
        let desc: Vec<i64> = filter_and_sort(&domains, &filter, DomainSort::PriceDesc)
            .iter()
            .map(|d| d.fields.price)
            .collect();
        assert_eq!(desc, vec![900, 500, 100]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("traffic".parse::<PbnSort>().unwrap(), PbnSort::Traffic);
        assert_eq!("age".parse::<DomainSort>().unwrap(), DomainSort::Age);
        assert!("traffic".parse::<DomainSort>().is_err());
        assert!("name".parse::<PbnSort>().is_err());
    }

    #[test]
    fn test_pagination_slices_twelve_per_page() {
        let mut listing: CatalogListing<DomainListing, DomainSort> =
            CatalogListing::new(LISTING_PAGE_SIZE);
        let ticket = listing.begin_fetch();
        let domains = (0..30).map(|i| domain(&format!("d{}", i), i, 1, 100)).collect();
        assert!(listing.apply_fetch(ticket, domains));

        let first = listing.current_page();
        assert_eq!(first.total_items, 30);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 12);
        assert_eq!(first.items[0].fields.dr, 29);

        listing.set_page(3);
        assert_eq!(listing.current_page().items.len(), 6);
        listing.next_page();
        assert_eq!(listing.page(), 3);
        listing.set_page(0);
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn test_changing_filters_resets_page() {
        let mut listing: CatalogListing<PbnSite, PbnSort> = CatalogListing::new(2);
        let ticket = listing.begin_fetch();
        listing.apply_fetch(ticket, sample_sites());

        listing.set_page(3);
        assert_eq!(listing.page(), 3);
        listing.set_min_dr(Some(50));
        assert_eq!(listing.page(), 1);

        listing.set_page(2);
        listing.set_niche(Some("tek".to_string()));
        assert_eq!(listing.page(), 1);

        listing.set_page(2);
        listing.set_sort(PbnSort::PriceDesc);
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn test_stale_and_closed_responses_are_ignored() {
        let mut listing: CatalogListing<PbnSite, PbnSort> = CatalogListing::new(12);
        let old = listing.begin_fetch();
        let fresh = listing.begin_fetch();

        assert!(listing.apply_fetch(fresh, sample_sites()));
        assert!(!listing.apply_fetch(old, vec![]));
        assert_eq!(listing.visible().len(), 5);

        let late = listing.begin_fetch();
        listing.close();
        assert!(!listing.apply_fetch(late, vec![]));
        assert_eq!(listing.visible().len(), 5);
    }

    #[test]
    fn test_niches_are_distinct_in_fetch_order() {
        let mut listing: CatalogListing<PbnSite, PbnSort> = CatalogListing::new(12);
        let ticket = listing.begin_fetch();
        let mut sites = sample_sites();
        sites.push(site("6", "Kesehatan", 20, 10, 10));
        listing.apply_fetch(ticket, sites);

        assert_eq!(
            listing.niches(),
            vec!["Teknologi", "Kesehatan", "Teknologi Finansial", "Otomotif", "teknologi"]
        );
    }

    #[test]
    fn test_blog_pager_params_and_search_reset() {
        let mut pager = BlogPager::default();
        pager.set_page(3);
        assert_eq!(
            pager.params(),
            ListParams {
                page: Some(3),
                limit: Some(BLOG_PAGE_SIZE),
                ..ListParams::default()
            }
        );

        pager.set_search("  backlink ");
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.params().search.as_deref(), Some("backlink"));

        let stale = pager.begin_fetch();
        let _current = pager.begin_fetch();
        assert!(!pager.apply_fetch(stale, vec![]));
    }
}
