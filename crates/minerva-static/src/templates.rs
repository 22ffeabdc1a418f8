//! Theme templates and page rendering.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use minijinja::{path_loader, AutoEscape, Environment, ErrorKind, Value};

use minerva_mdx::{Metadata, TrustedHtml};

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::post::PostIndex;

/// Logical page templates every theme provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Index,
    Post,
    List,
    Search,
    NotFound,
}

impl TemplateKind {
    /// Every logical template.
    pub const ALL: [TemplateKind; 5] = [
        Self::Index,
        Self::Post,
        Self::List,
        Self::Search,
        Self::NotFound,
    ];

    /// File name of the template inside `themes/<theme>/templates`.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Index => "index.html.j2",
            Self::Post => "post.html.j2",
            Self::List => "list.html.j2",
            Self::Search => "search.html.j2",
            Self::NotFound => "404.html.j2",
        }
    }

    /// Templates a build needs. `search` is only required when the search page is built.
    pub fn required(search: bool) -> Vec<TemplateKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| search || *kind != Self::Search)
            .collect()
    }
}

/// Variables present in every render.
#[derive(Debug, Clone)]
pub struct TemplateDefaults {
    /// Display strings of the active language
    pub metadata: Value,
    /// The full `[settings]` table
    pub settings: Value,
}

impl TemplateDefaults {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            metadata: Value::from_serialize(config.metadata()),
            settings: Value::from_serialize(config.settings()),
        }
    }
}

/// A page to render, with the variables specific to it.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    Index {
        posts: &'a PostIndex,
    },
    Post {
        slug: &'a str,
        content: &'a TrustedHtml,
        post_metadata: &'a Metadata,
    },
    List {
        posts: &'a PostIndex,
    },
    Search,
    NotFound,
}

impl Page<'_> {
    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Index { .. } => TemplateKind::Index,
            Self::Post { .. } => TemplateKind::Post,
            Self::List { .. } => TemplateKind::List,
            Self::Search => TemplateKind::Search,
            Self::NotFound => TemplateKind::NotFound,
        }
    }

    /// Call-specific template variables.
    pub fn variables(&self) -> BTreeMap<String, Value> {
        let mut vars = BTreeMap::new();

        match self {
            Self::Index { posts } | Self::List { posts } => {
                vars.insert("posts".to_string(), Value::from_serialize(posts));
            }
            Self::Post {
                slug,
                content,
                post_metadata,
            } => {
                vars.insert("slug".to_string(), Value::from(*slug));
                vars.insert("content".to_string(), trusted((*content).clone()));
                vars.insert(
                    "post_metadata".to_string(),
                    Value::from_serialize(post_metadata),
                );
            }
            Self::Search | Self::NotFound => {}
        }

        vars
    }
}

/// Insert renderer output into a template without escaping it.
pub fn trusted(html: TrustedHtml) -> Value {
    Value::from_safe_string(html.into_string())
}

/// The templates of one theme, loaded for a single build.
pub struct TemplateSet {
    env: Environment<'static>,
    dir: PathBuf,
    defaults: TemplateDefaults,
}

impl TemplateSet {
    /// Load a theme's templates from `templates_dir`.
    ///
    /// Each template in `required` is compiled up front so a missing or broken
    /// template fails the build before any page is written.
    pub fn load(
        templates_dir: &Path,
        required: &[TemplateKind],
        defaults: TemplateDefaults,
    ) -> Result<Self, BuildError> {
        let mut env = Environment::new();
        env.set_loader(path_loader(templates_dir));
        // Themes only produce HTML, whatever the template file extension.
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        for kind in required {
            env.get_template(kind.file_name())
                .map_err(|e| template_error(templates_dir, kind.file_name(), e))?;
        }

        tracing::debug!(
            "Loaded {} templates from {}",
            required.len(),
            templates_dir.display()
        );

        Ok(Self {
            env,
            dir: templates_dir.to_path_buf(),
            defaults,
        })
    }

    /// Render a page.
    pub fn render(&self, page: &Page<'_>) -> Result<String, BuildError> {
        self.render_with(page.kind(), page.variables())
    }

    /// Render a template with arbitrary call-specific variables.
    ///
    /// `vars` take precedence over the `metadata` and `settings` defaults.
    pub fn render_with(
        &self,
        kind: TemplateKind,
        vars: BTreeMap<String, Value>,
    ) -> Result<String, BuildError> {
        let name = kind.file_name();
        let tmpl = self
            .env
            .get_template(name)
            .map_err(|e| template_error(&self.dir, name, e))?;

        let mut context = BTreeMap::new();
        context.insert("metadata".to_string(), self.defaults.metadata.clone());
        context.insert("settings".to_string(), self.defaults.settings.clone());
        context.extend(vars);

        tmpl.render(Value::from(context))
            .map_err(|e| template_error(&self.dir, name, e))
    }
}

fn template_error(dir: &Path, name: &str, err: minijinja::Error) -> BuildError {
    let name = dir.join(name).display().to_string();
    if err.kind() == ErrorKind::TemplateNotFound {
        BuildError::TemplateNotFound { name }
    } else {
        BuildError::Template { name, source: err }
    }
}
