use super::{AppConfig, ConfigOverrides};
use crate::core::catalog_query::{DomainSort, PbnSort};
use crate::core::import_template::TEMPLATE_FILE_NAME;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "domainpbn")]
#[command(about = "DomainPBN catalog console: bulk domain import, catalog browsing and admin tools")]
pub struct CliConfig {
    #[arg(long, env = "DOMAINPBN_API_URL", global = true, help = "Backend base URL")]
    pub api_url: Option<String>,

    #[arg(
        long,
        env = "DOMAINPBN_ADMIN_TOKEN",
        global = true,
        hide_env_values = true,
        help = "Bearer token for admin endpoints"
    )]
    pub admin_token: Option<String>,

    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            admin_token: self.admin_token.clone(),
            timeout_seconds: self.timeout,
        }
    }

    pub fn app_config(&self) -> Result<AppConfig> {
        AppConfig::load(self.config.as_deref(), self.overrides())
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a CSV/XLSX/XLS file and bulk-import the domains
    Import {
        file: PathBuf,
        #[arg(long, help = "Validate only, do not submit")]
        dry_run: bool,
    },
    /// Write the CSV import template
    Template {
        #[arg(long, default_value = TEMPLATE_FILE_NAME)]
        output: String,
    },
    /// Browse PBN sites
    Pbn {
        #[arg(long)]
        niche: Option<String>,
        #[arg(long)]
        min_dr: Option<i64>,
        #[arg(long, default_value = "dr")]
        sort: PbnSort,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Browse aged domains
    Domains {
        #[arg(long)]
        min_dr: Option<i64>,
        #[arg(long, default_value = "dr")]
        sort: DomainSort,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Browse blog posts, or show one by slug
    Blog {
        slug: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List backlink packages
    Packages,
    /// List FAQ entries
    Faq,
    /// Show a static page
    Page { slug: String },
    /// Show page content blocks, all or by page key
    PageContent { key: Option<String> },
    /// Show site settings
    Settings,
    /// Build a WhatsApp or Telegram checkout link
    Checkout {
        #[arg(long, value_enum, default_value_t = Channel::Whatsapp)]
        channel: Channel,
        #[command(subcommand)]
        order: CheckoutOrder,
    },
    /// Admin dashboard counters
    Dashboard,
    /// Admin CRUD
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    Whatsapp,
    Telegram,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CheckoutOrder {
    /// Order a package by slug
    Package {
        slug: String,
        #[arg(long)]
        target_url: Option<String>,
        #[arg(long)]
        anchor_text: Option<String>,
    },
    /// Order backlinks on a chosen PBN
    CustomPbn { code: Option<String> },
    /// Ask about an aged domain
    Domain { domain_name: String },
    /// General question
    Inquiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Pbn,
    Packages,
    Domains,
    Blog,
    Faq,
    Pages,
    PageContent,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// List every record, including hidden fields
    List { entity: Entity },
    /// Create a record from a JSON file
    Create {
        entity: Entity,
        file: PathBuf,
        #[arg(long, help = "Plain text or HTML body for blog posts and pages")]
        content_file: Option<PathBuf>,
    },
    /// Replace a record from a JSON file
    Update {
        entity: Entity,
        id: String,
        file: PathBuf,
        #[arg(long, help = "Plain text or HTML body for blog posts and pages")]
        content_file: Option<PathBuf>,
    },
    /// Delete a record
    Delete { entity: Entity, id: String },
    /// Replace the site settings from a JSON file
    Settings { file: PathBuf },
    /// Print the slug generated from a title
    Slug { title: String },
}
