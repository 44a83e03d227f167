use crate::domain::model::{
    BlogPost, BlogPostInput, DomainListing, DomainListingInput, FaqInput, FaqItem, Package,
    PackageInput, PageContent, PageContentInput, PbnSite, PbnSiteInput, StaticPage,
    StaticPageInput,
};
use crate::utils::error::Result;
use crate::utils::validation::{require_fields, validate_range, Validate};
use serde::{de::DeserializeOwned, Serialize};

/// A server-owned catalog entity with the conventional public/admin REST surfaces.
pub trait CatalogResource {
    type Item: DeserializeOwned + Serialize + Send;
    type Input: DeserializeOwned + Serialize + Validate + Send + Sync;

    /// Path segment used under both `/{path}` and `/admin/{path}`.
    const PATH: &'static str;
    const LABEL: &'static str;

    fn id(item: &Self::Item) -> &str;
}

pub struct Packages;
pub struct PbnSites;
pub struct Domains;
pub struct Blog;
pub struct Faq;
pub struct Pages;
pub struct PageContents;

impl CatalogResource for Packages {
    type Item = Package;
    type Input = PackageInput;
    const PATH: &'static str = "packages";
    const LABEL: &'static str = "Package";

    fn id(item: &Package) -> &str {
        &item.id
    }
}

impl CatalogResource for PbnSites {
    type Item = PbnSite;
    type Input = PbnSiteInput;
    const PATH: &'static str = "pbn";
    const LABEL: &'static str = "PBN site";

    fn id(item: &PbnSite) -> &str {
        &item.id
    }
}

impl CatalogResource for Domains {
    type Item = DomainListing;
    type Input = DomainListingInput;
    const PATH: &'static str = "domains";
    const LABEL: &'static str = "Domain";

    fn id(item: &DomainListing) -> &str {
        &item.id
    }
}

impl CatalogResource for Blog {
    type Item = BlogPost;
    type Input = BlogPostInput;
    const PATH: &'static str = "blog";
    const LABEL: &'static str = "Blog post";

    fn id(item: &BlogPost) -> &str {
        &item.id
    }
}

impl CatalogResource for Faq {
    type Item = FaqItem;
    type Input = FaqInput;
    const PATH: &'static str = "faq";
    const LABEL: &'static str = "FAQ";

    fn id(item: &FaqItem) -> &str {
        &item.id
    }
}

impl CatalogResource for Pages {
    type Item = StaticPage;
    type Input = StaticPageInput;
    const PATH: &'static str = "pages";
    const LABEL: &'static str = "Page";

    fn id(item: &StaticPage) -> &str {
        &item.id
    }
}

impl CatalogResource for PageContents {
    type Item = PageContent;
    type Input = PageContentInput;
    const PATH: &'static str = "page-content";
    const LABEL: &'static str = "Page content";

    fn id(item: &PageContent) -> &str {
        &item.id
    }
}

impl Validate for PackageInput {
    fn validate(&self) -> Result<()> {
        require_fields(
            "package",
            &[("name", self.name.as_str()), ("slug", self.slug.as_str())],
            "Nama dan slug paket wajib diisi",
        )
    }
}

impl Validate for PbnSiteInput {
    fn validate(&self) -> Result<()> {
        require_fields(
            "pbn",
            &[
                ("code", self.code.as_str()),
                ("domain_real", self.domain_real.as_str()),
                ("niche", self.niche.as_str()),
            ],
            "Code, domain, dan niche wajib diisi",
        )?;
        validate_range("dr", self.dr, 0, 100)?;
        validate_range("da", self.da, 0, 100)
    }
}

impl Validate for DomainListingInput {
    fn validate(&self) -> Result<()> {
        require_fields(
            "domain",
            &[
                ("domain_name", self.domain_name.as_str()),
                ("registrar", self.registrar.as_str()),
            ],
            "Domain name dan registrar wajib diisi",
        )?;
        for (field, value) in [
            ("da", self.da),
            ("pa", self.pa),
            ("ur", self.ur),
            ("dr", self.dr),
            ("tf", self.tf),
            ("cf", self.cf),
        ] {
            validate_range(field, value, 0, 100)?;
        }
        validate_range("price", self.price, 0, i64::MAX)?;
        validate_range("age", self.age, 0, i64::MAX)
    }
}

impl Validate for BlogPostInput {
    fn validate(&self) -> Result<()> {
        require_fields(
            "blog",
            &[
                ("title", self.title.as_str()),
                ("slug", self.slug.as_str()),
                ("content", self.content.as_str()),
            ],
            "Title, slug, dan content wajib diisi",
        )
    }
}

impl Validate for FaqInput {
    fn validate(&self) -> Result<()> {
        require_fields(
            "faq",
            &[("question", self.question.as_str()), ("answer", self.answer.as_str())],
            "Question dan answer wajib diisi",
        )
    }
}

impl Validate for StaticPageInput {
    fn validate(&self) -> Result<()> {
        require_fields(
            "page",
            &[
                ("title", self.title.as_str()),
                ("slug", self.slug.as_str()),
                ("content", self.content.as_str()),
            ],
            "Title, slug, dan content wajib diisi",
        )
    }
}

impl Validate for PageContentInput {
    fn validate(&self) -> Result<()> {
        require_fields(
            "page_content",
            &[("page_key", self.page_key.as_str()), ("section", self.section.as_str())],
            "Page key dan section wajib diisi",
        )
    }
}
