use super::commands::{print_json, App};
use crate::config::args::{AdminCommand, Entity};
use crate::core::editor::{HtmlEditor, LazyEditor};
use crate::domain::model::SiteSettings;
use crate::domain::ports::Storage;
use crate::domain::resources::{
    Blog, CatalogResource, Domains, Faq, PageContents, Packages, Pages, PbnSites,
};
use crate::utils::error::{PbnError, Result};
use crate::utils::format::slugify;
use serde_json::Value;
use std::path::Path;

impl App {
    pub(crate) async fn admin(&self, action: AdminCommand) -> Result<()> {
        match action {
            AdminCommand::List { entity } => match entity {
                Entity::Pbn => self.list_all::<PbnSites>().await,
                Entity::Packages => self.list_all::<Packages>().await,
                Entity::Domains => self.list_all::<Domains>().await,
                Entity::Blog => self.list_all::<Blog>().await,
                Entity::Faq => self.list_all::<Faq>().await,
                Entity::Pages => self.list_all::<Pages>().await,
                Entity::PageContent => self.list_all::<PageContents>().await,
            },
            AdminCommand::Create {
                entity,
                file,
                content_file,
            } => {
                let body = self.form_body(entity, &file, content_file.as_deref()).await?;
                match entity {
                    Entity::Pbn => self.create::<PbnSites>(body).await,
                    Entity::Packages => self.create::<Packages>(body).await,
                    Entity::Domains => self.create::<Domains>(body).await,
                    Entity::Blog => self.create::<Blog>(body).await,
                    Entity::Faq => self.create::<Faq>(body).await,
                    Entity::Pages => self.create::<Pages>(body).await,
                    Entity::PageContent => self.create::<PageContents>(body).await,
                }
            }
            AdminCommand::Update {
                entity,
                id,
                file,
                content_file,
            } => {
                let body = self.form_body(entity, &file, content_file.as_deref()).await?;
                match entity {
                    Entity::Pbn => self.update::<PbnSites>(&id, body).await,
                    Entity::Packages => self.update::<Packages>(&id, body).await,
                    Entity::Domains => self.update::<Domains>(&id, body).await,
                    Entity::Blog => self.update::<Blog>(&id, body).await,
                    Entity::Faq => self.update::<Faq>(&id, body).await,
                    Entity::Pages => self.update::<Pages>(&id, body).await,
                    Entity::PageContent => self.update::<PageContents>(&id, body).await,
                }
            }
            AdminCommand::Delete { entity, id } => {
                match entity {
                    Entity::Pbn => self.api.delete::<PbnSites>(&id).await?,
                    Entity::Packages => self.api.delete::<Packages>(&id).await?,
                    Entity::Domains => self.api.delete::<Domains>(&id).await?,
                    Entity::Blog => self.api.delete::<Blog>(&id).await?,
                    Entity::Faq => self.api.delete::<Faq>(&id).await?,
                    Entity::Pages => self.api.delete::<Pages>(&id).await?,
                    Entity::PageContent => self.api.delete::<PageContents>(&id).await?,
                }
                println!("🗑️ Deleted {}", id);
                Ok(())
            }
            AdminCommand::Settings { file } => {
                let bytes = self.storage.read_file(&file.to_string_lossy()).await?;
                let settings: SiteSettings = serde_json::from_slice(&bytes)?;
                let saved = self.settings.update(self.api.as_ref(), &settings).await?;
                print_json(saved.as_ref())
            }
            AdminCommand::Slug { title } => {
                println!("{}", slugify(&title)?);
                Ok(())
            }
        }
    }

    async fn list_all<R: CatalogResource>(&self) -> Result<()> {
        let items = self.api.admin_list::<R>().await?;
        tracing::info!("{} {} records", items.len(), R::LABEL);
        print_json(&items)
    }

    async fn create<R: CatalogResource>(&self, body: Value) -> Result<()> {
        let input: R::Input = serde_json::from_value(body)?;
        let item = self.api.create::<R>(&input).await?;
        print_json(&item)
    }

    async fn update<R: CatalogResource>(&self, id: &str, body: Value) -> Result<()> {
        let input: R::Input = serde_json::from_value(body)?;
        let item = self.api.update::<R>(id, &input).await?;
        print_json(&item)
    }

    /// Reads the JSON form, fills the body from `content_file` through the editor
    /// and derives a missing slug from the title or name.
    async fn form_body(&self, entity: Entity, file: &Path, content_file: Option<&Path>) -> Result<Value> {
        let bytes = self.storage.read_file(&file.to_string_lossy()).await?;
        let mut body: Value = serde_json::from_slice(&bytes)?;
        let Some(form) = body.as_object_mut() else {
            return Err(PbnError::ParseError {
                message: format!("{} must contain a JSON object", file.display()),
            });
        };

        if let Some(content_file) = content_file {
            if !matches!(entity, Entity::Blog | Entity::Pages) {
                return Err(PbnError::InputValidation {
                    entity: format!("{:?}", entity).to_lowercase(),
                    message: "--content-file only applies to blog posts and pages".to_string(),
                });
            }
            let html = self.render_content(content_file).await?;
            form.insert("content".to_string(), Value::String(html));
        }

        if matches!(entity, Entity::Blog | Entity::Pages | Entity::Packages) {
            fill_slug(form)?;
        }
        Ok(body)
    }

    async fn render_content(&self, path: &Path) -> Result<String> {
        let raw = self.storage.read_file(&path.to_string_lossy()).await?;
        let raw = String::from_utf8(raw).map_err(|e| PbnError::ParseError {
            message: format!("{} is not UTF-8: {}", path.display(), e),
        })?;

        let mut editor: LazyEditor<HtmlEditor> = LazyEditor::new();
        editor.set_content(&raw);
        editor.load(|| async { Ok(HtmlEditor::new()) }).await?;
        editor.to_html()
    }
}

/// Slug from `title` (blog, pages) or `name` (packages) when the form left it blank.
fn fill_slug(form: &mut serde_json::Map<String, Value>) -> Result<()> {
    let has_slug = form
        .get("slug")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    if has_slug {
        return Ok(());
    }

    let Some(source) = form.get("title").or_else(|| form.get("name")).and_then(Value::as_str) else {
        return Ok(());
    };
    let slug = slugify(source)?;
    if !slug.is_empty() {
        tracing::debug!("Generated slug '{}'", slug);
        form.insert("slug".to_string(), Value::String(slug));
    }
    Ok(())
}
