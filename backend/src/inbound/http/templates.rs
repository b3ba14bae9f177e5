//! Parsed HTML template sets keyed by page name.
//!
//! Every `*.page.tmpl` file in the template directory becomes one [`Tera`]
//! instance that also holds every `*.layout.tmpl` and `*.partial.tmpl` file,
//! so pages can `{% extends %}` the layout and `{% include %}` partials. All
//! sets are parsed once at startup; any failure is fatal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::{Context, Tera, Value};

use crate::domain::{FormErrors, Snippet, SnippetForm};

/// Suffix of renderable page templates.
pub const PAGE_SUFFIX: &str = ".page.tmpl";
/// Suffix of layout templates shared by every page.
pub const LAYOUT_SUFFIX: &str = ".layout.tmpl";
/// Suffix of partial templates shared by every page.
pub const PARTIAL_SUFFIX: &str = ".partial.tmpl";

/// Failures while building or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template directory or one of its files could not be read.
    #[error("failed to read templates from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A template set failed to parse.
    #[error("failed to parse templates for {page}: {source}")]
    Parse {
        page: String,
        #[source]
        source: tera::Error,
    },
    /// No page with the requested name was loaded.
    #[error("template {0} does not exist")]
    NotFound(String),
    /// Rendering a page failed.
    #[error("failed to render {page}: {source}")]
    Render {
        page: String,
        #[source]
        source: tera::Error,
    },
}

/// Values a page template can read.
///
/// Unused fields stay empty; templates test them with `{% if %}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: FormValues,
    pub errors: HashMap<String, String>,
}

/// Previously submitted create-form values, echoed back on re-render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub title: String,
    pub content: String,
    pub expires: String,
}

impl From<&SnippetForm> for FormValues {
    fn from(form: &SnippetForm) -> Self {
        Self {
            title: form.title.clone().unwrap_or_default(),
            content: form.content.clone().unwrap_or_default(),
            expires: form.expires.clone().unwrap_or_default(),
        }
    }
}

impl TemplateData {
    /// Start a data set stamped with the year shown in the footer.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current_year: chrono::Datelike::year(&now),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    #[must_use]
    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = snippets;
        self
    }

    /// Attach a rejected form and the first message for each invalid field.
    #[must_use]
    pub fn with_form(mut self, form: &SnippetForm, errors: &FormErrors) -> Self {
        self.form = FormValues::from(form);
        self.errors = errors
            .first_messages()
            .into_iter()
            .map(|(field, message)| (field.to_owned(), message.to_owned()))
            .collect();
        self
    }
}

/// Format a serialized timestamp as `02 Jan 2006 at 15:04` in UTC.
fn human_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("human_date expects a timestamp string"))?;
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|err| tera::Error::msg(format!("human_date cannot parse {raw}: {err}")))?;
    Ok(Value::String(
        parsed
            .with_timezone(&Utc)
            .format("%d %b %Y at %H:%M")
            .to_string(),
    ))
}

/// Immutable map from page name to its parsed template set.
#[derive(Debug)]
pub struct TemplateCache {
    sets: HashMap<String, Tera>,
}

impl TemplateCache {
    /// Parse every page in `dir` together with the shared layouts and partials.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Io`] if the directory or a file cannot be read
    /// and [`TemplateError::Parse`] if any set fails to parse.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = dir.as_ref();
        let io_error = |source: std::io::Error| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        };
        let directory = Dir::open_ambient_dir(path, ambient_authority()).map_err(io_error)?;

        let mut pages = Vec::new();
        let mut shared = Vec::new();
        for entry in directory.entries().map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            if !entry.file_type().map_err(io_error)?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(PAGE_SUFFIX) {
                pages.push(name);
            } else if name.ends_with(LAYOUT_SUFFIX) || name.ends_with(PARTIAL_SUFFIX) {
                shared.push(name);
            }
        }
        pages.sort();
        shared.sort();

        let shared_sources = shared
            .into_iter()
            .map(|name| {
                let source = directory.read_to_string(&name).map_err(io_error)?;
                Ok((name, source))
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;

        let mut sets = HashMap::with_capacity(pages.len());
        for page in pages {
            let source = directory.read_to_string(&page).map_err(io_error)?;
            let mut sources = shared_sources.clone();
            sources.push((page.clone(), source));

            let mut tera = Tera::default();
            tera.autoescape_on(vec![".tmpl"]);
            tera.register_filter("human_date", human_date);
            tera.add_raw_templates(sources)
                .map_err(|source| TemplateError::Parse {
                    page: page.clone(),
                    source,
                })?;
            sets.insert(page, tera);
        }

        Ok(Self { sets })
    }

    /// Names of the loaded pages, in no particular order.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Render `page` with `data`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] for an unknown page and
    /// [`TemplateError::Render`] when execution fails.
    pub fn render(&self, page: &str, data: &TemplateData) -> Result<String, TemplateError> {
        let tera = self
            .sets
            .get(page)
            .ok_or_else(|| TemplateError::NotFound(page.to_owned()))?;
        let render_error = |source: tera::Error| TemplateError::Render {
            page: page.to_owned(),
            source,
        };
        let context = Context::from_serialize(data).map_err(render_error)?;
        tera.render(page, &context).map_err(render_error)
    }
}
