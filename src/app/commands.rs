use crate::adapters::ApiClient;
use crate::config::args::{Channel, CheckoutOrder, Command};
use crate::config::cli::LocalStorage;
use crate::config::AppConfig;
use crate::core::catalog_query::{
    load_domain_listing, load_pbn_listing, BlogPager, DomainSort, PbnSort,
};
use crate::core::checkout::{checkout_link, CheckoutChannel, OrderMessage};
use crate::core::dashboard::load_dashboard;
use crate::core::import_session::ImportSession;
use crate::core::import_template::export_template;
use crate::core::settings_cache::SettingsCache;
use crate::domain::ports::{ConfigProvider, ListParams, Storage};
use crate::domain::resources::{Blog, Faq, Packages, PageContents, Pages};
use crate::utils::error::{PbnError, Result};
use crate::utils::format::{format_idr, format_number};
use std::path::Path;
use std::sync::Arc;

/// Wires the configured backend client, local storage and settings cache to the CLI commands.
pub struct App {
    pub(crate) config: AppConfig,
    pub(crate) api: Arc<ApiClient>,
    pub(crate) storage: LocalStorage,
    pub(crate) settings: SettingsCache,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let api = Arc::new(ApiClient::from_config(&config));
        let storage = LocalStorage::new(config.base_path.clone());
        Self {
            config,
            api,
            storage,
            settings: SettingsCache::new(),
        }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        tracing::debug!("Running {:?} against {}", command, self.api.base_url());
        match command {
            Command::Import { file, dry_run } => self.import(&file, dry_run).await,
            Command::Template { output } => {
                export_template(&self.storage, &output).await?;
                println!("📄 Template saved to: {}", output);
                Ok(())
            }
            Command::Pbn {
                niche,
                min_dr,
                sort,
                page,
            } => self.pbn(niche, min_dr, sort, page).await,
            Command::Domains { min_dr, sort, page } => self.domains(min_dr, sort, page).await,
            Command::Blog { slug, search, page } => self.blog(slug, search, page).await,
            Command::Packages => self.packages().await,
            Command::Faq => {
                let faqs = self.api.list_public::<Faq>(&ListParams::default()).await?;
                for faq in faqs {
                    println!("❓ {}\n   {}\n", faq.fields.question, faq.fields.answer);
                }
                Ok(())
            }
            Command::Page { slug } => {
                let page = self.api.get_public::<Pages>(&slug).await?;
                println!("# {}\n\n{}", page.fields.title, page.fields.content);
                Ok(())
            }
            Command::PageContent { key } => {
                match key {
                    Some(key) => print_json(&self.api.get_public::<PageContents>(&key).await?)?,
                    None => print_json(
                        &self
                            .api
                            .list_public::<PageContents>(&ListParams::default())
                            .await?,
                    )?,
                }
                Ok(())
            }
            Command::Settings => {
                let settings = self.settings.get(self.api.as_ref()).await?;
                print_json(settings.as_ref())
            }
            Command::Checkout { channel, order } => self.checkout(channel, order).await,
            Command::Dashboard => {
                let stats = load_dashboard(self.api.as_ref()).await?;
                println!("📊 Dashboard");
                println!("  PBN sites:  {}", stats.pbn_sites);
                println!("  Packages:   {}", stats.packages);
                println!("  Blog posts: {}", stats.blog_posts);
                println!("  FAQs:       {}", stats.faqs);
                Ok(())
            }
            Command::Admin { action } => self.admin(action).await,
        }
    }

    async fn import(&self, file: &Path, dry_run: bool) -> Result<()> {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = self.storage.read_file(&file.to_string_lossy()).await?;
        let session = ImportSession::new(self.api.clone());
        let batch = session.load_file(&file_name, bytes).await?;

        println!("📄 {}: {} rows read", file_name, batch.rows_read);
        if batch.errors.is_empty() {
            println!("✅ {} domains ready to import", batch.records.len());
        } else {
            println!("⚠️ Found {} validation errors", batch.errors.len());
            for line in batch.error_preview(self.config.error_preview_limit()) {
                println!("  {}", line);
            }
        }

        if dry_run {
            tracing::info!("Dry run, nothing submitted");
            return Ok(());
        }

        let summary = session.submit().await?;
        println!("✅ {}", summary.message);
        Ok(())
    }

    async fn pbn(
        &self,
        niche: Option<String>,
        min_dr: Option<i64>,
        sort: PbnSort,
        page: usize,
    ) -> Result<()> {
        let (mut listing, settings) = tokio::try_join!(
            load_pbn_listing(self.api.as_ref()),
            self.settings.get(self.api.as_ref())
        )?;
        listing.set_niche(niche);
        listing.set_min_dr(min_dr);
        listing.set_sort(sort);
        listing.set_page(page);

        let view = listing.current_page();
        println!(
            "PBN sites: {} (page {}/{})",
            view.total_items, view.page, view.total_pages
        );
        for site in &view.items {
            println!(
                "{:<10} {:<16} DR {:>3}  DA {:>3}  traffic {:>9}  {}/post",
                site.code,
                site.niche,
                site.dr,
                site.da,
                format_number(site.traffic),
                format_idr(site.price_per_post)
            );
        }

        let link = checkout_link(
            &settings,
            CheckoutChannel::WhatsApp,
            &OrderMessage::CustomPbn { code: None },
        )?;
        println!("\n💬 Order: {}", link);
        Ok(())
    }

    async fn domains(&self, min_dr: Option<i64>, sort: DomainSort, page: usize) -> Result<()> {
        let mut listing = load_domain_listing(self.api.as_ref()).await?;
        listing.set_min_dr(min_dr);
        listing.set_sort(sort);
        listing.set_page(page);

        let view = listing.current_page();
        println!(
            "Aged domains: {} (page {}/{})",
            view.total_items, view.page, view.total_pages
        );
        for domain in &view.items {
            let d = &domain.fields;
            println!(
                "{:<28} DA {:>3} PA {:>3} DR {:>3} TF {:>3} CF {:>3}  {:>2}y  {:<9} {}",
                d.domain_name,
                d.da,
                d.pa,
                d.dr,
                d.tf,
                d.cf,
                d.age,
                d.status.as_str(),
                format_idr(d.price)
            );
        }
        Ok(())
    }

    async fn blog(&self, slug: Option<String>, search: Option<String>, page: usize) -> Result<()> {
        if let Some(slug) = slug {
            let post = self.api.get_public::<Blog>(&slug).await?;
            println!("# {}\n", post.fields.title);
            if let Some(published_at) = post.published_at {
                println!("{}\n", published_at.format("%d %B %Y"));
            }
            println!("{}", post.fields.content);
            return Ok(());
        }

        let mut pager = BlogPager::default();
        pager.set_search(search.as_deref().unwrap_or_default());
        pager.set_page(page);
        let posts = pager.load(self.api.as_ref()).await?;

        if posts.is_empty() {
            println!("No posts found");
        }
        for post in posts {
            println!("📝 {} ({})\n   {}", post.fields.title, post.fields.slug, post.fields.excerpt);
        }
        if pager.has_next() {
            println!("\nMore posts: --page {}", pager.page() + 1);
        }
        Ok(())
    }

    async fn packages(&self) -> Result<()> {
        let packages = self.api.list_public::<Packages>(&ListParams::default()).await?;
        for package in packages {
            let p = &package.fields;
            let badge = if p.is_popular { " ⭐" } else { "" };
            println!(
                "{}{} ({}) - {} backlink - {}",
                p.name,
                badge,
                p.slug,
                p.backlink_count,
                format_idr(p.price)
            );
        }
        Ok(())
    }

    async fn checkout(&self, channel: Channel, order: CheckoutOrder) -> Result<()> {
        let channel = match channel {
            Channel::Whatsapp => CheckoutChannel::WhatsApp,
            Channel::Telegram => CheckoutChannel::Telegram,
        };

        let message = match order {
            CheckoutOrder::Package {
                slug,
                target_url,
                anchor_text,
            } => {
                let packages = self.api.list_public::<Packages>(&ListParams::default()).await?;
                let package = packages
                    .into_iter()
                    .find(|p| p.fields.slug == slug)
                    .ok_or_else(|| PbnError::NotFound {
                        resource: format!("Package '{}'", slug),
                    })?;
                OrderMessage::Package {
                    name: package.fields.name,
                    backlink_count: package.fields.backlink_count,
                    target_url,
                    anchor_text,
                }
            }
            CheckoutOrder::CustomPbn { code } => OrderMessage::CustomPbn { code },
            CheckoutOrder::Domain { domain_name } => OrderMessage::Domain { domain_name },
            CheckoutOrder::Inquiry => OrderMessage::Inquiry,
        };

        let settings = self.settings.get(self.api.as_ref()).await?;
        let link = checkout_link(&settings, channel, &message)?;
        println!("{}", link);
        Ok(())
    }
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
