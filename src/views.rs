use askama::Template;
use axum::response::Html;

use crate::models::CacheEntry;

/// The empty submission form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// A rendered paste. All fields are escaped by the template engine.
#[derive(Template)]
#[template(path = "paste.html")]
pub struct PasteTemplate {
    pub content: String,
    pub title: Option<String>,
    pub language: Option<String>,
    pub email: Option<String>,
    pub timestamp: Option<String>,
    pub delete_key: Option<String>,
}

impl PasteTemplate {
    /// Build the view of a paste projection for a given viewer.
    /// Attribution email is only rendered for authenticated viewers;
    /// `delete_key` carries the consumed deletion cookie, if any.
    pub fn for_viewer(entry: CacheEntry, authenticated: bool, delete_key: Option<String>) -> Self {
        let (email, timestamp) = match entry.attribution {
            Some(attribution) => (
                authenticated.then_some(attribution.email),
                Some(
                    attribution
                        .timestamp
                        .format("%Y-%m-%d %H:%M:%S UTC")
                        .to_string(),
                ),
            ),
            None => (None, None),
        };

        PasteTemplate {
            content: entry.content,
            title: entry.title,
            language: entry.language,
            email,
            timestamp,
            delete_key,
        }
    }
}

/// Render a template to an HTML response.
pub fn render<T: Template>(template: T) -> crate::ApiResult<Html<String>> {
    Ok(Html(template.render()?))
}
