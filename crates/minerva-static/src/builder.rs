//! Static blog builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use minerva_mdx::{extract_metadata, FrontmatterError, MarkdownRenderer};

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::post::{slug_for, Post, PostIndex};
use crate::stage::{self, OutputTree};
use crate::templates::{Page, TemplateDefaults, TemplateKind, TemplateSet};

/// Name of the output directory under the site root.
pub const OUTPUT_DIR: &str = "build";

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of posts rendered
    pub posts: usize,

    /// Whether `search.html` was written
    pub search_page: bool,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Static blog builder.
///
/// Owns the configuration and the Markdown renderer for the builds it runs.
/// Builds are sequential; two builders must not target the same tree at once.
pub struct SiteBuilder {
    root: PathBuf,
    config: SiteConfig,
    renderer: MarkdownRenderer,
}

impl SiteBuilder {
    /// Create a builder for the site rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, config: SiteConfig) -> Self {
        Self {
            root: root.into(),
            config,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Use a specific Markdown renderer.
    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Directory the site is written to.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    fn theme_dir(&self) -> PathBuf {
        self.root.join("themes").join(self.config.theme())
    }

    fn posts_source_dir(&self) -> PathBuf {
        self.root.join("posts")
    }

    /// Build the site.
    ///
    /// Stops at the first error. Files written before the error stay in place.
    pub fn build(&self, clean: bool) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        tracing::info!("Building blog");

        let theme_dir = self.theme_dir();
        if !theme_dir.is_dir() {
            return Err(BuildError::Configuration(format!(
                "Theme '{}' not found at {}",
                self.config.theme(),
                theme_dir.display()
            )));
        }

        let tree = stage::prepare(&self.output_dir(), &theme_dir.join("assets"), clean)?;

        let templates = TemplateSet::load(
            &theme_dir.join("templates"),
            &TemplateKind::required(self.config.enable_search_index()),
            TemplateDefaults::from_config(&self.config),
        )?;

        let posts = self.build_posts(&templates, &tree)?;
        stage::stage_post_data(&self.root, &tree)?;

        tracing::info!("Building blog index page");
        write_page(&tree, "index.html", &templates, &Page::Index { posts: &posts })?;

        tracing::info!("Building posts list");
        write_page(&tree, "list.html", &templates, &Page::List { posts: &posts })?;

        let search_page = self.config.enable_search_index();
        if search_page {
            tracing::info!("Building search page");
            write_page(&tree, "search.html", &templates, &Page::Search)?;
        }

        tracing::info!("Building 404 page");
        write_page(&tree, "404.html", &templates, &Page::NotFound)?;

        Ok(BuildResult {
            posts: posts.len(),
            search_page,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: tree.root().to_path_buf(),
        })
    }

    /// Render every post file directly under `posts/`, in directory order.
    fn build_posts(
        &self,
        templates: &TemplateSet,
        tree: &OutputTree,
    ) -> Result<PostIndex, BuildError> {
        tracing::info!("Building blog articles");

        let source_dir = self.posts_source_dir();
        let entries = fs::read_dir(&source_dir).map_err(|e| BuildError::Read {
            path: source_dir.clone(),
            source: e,
        })?;

        let mut posts = PostIndex::new();
        for entry in entries {
            let entry = entry.map_err(|e| BuildError::Read {
                path: source_dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            tracing::info!("Building {}", path.display());
            let post = self.render_post(&path)?;

            let html = templates.render(&Page::Post {
                slug: &post.slug,
                content: &post.rendered_html,
                post_metadata: &post.metadata,
            })?;
            let output = tree.post(&post.slug);
            fs::write(&output, html).map_err(|e| BuildError::write(&output, e))?;

            posts.insert(post.slug, post.metadata);
        }

        Ok(posts)
    }

    /// Read a post and render its Markdown.
    pub fn render_post(&self, path: &Path) -> Result<Post, BuildError> {
        let slug = slug_for(path).ok_or_else(|| {
            BuildError::Configuration(format!(
                "Post file name is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        let source = fs::read_to_string(path).map_err(|e| BuildError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let metadata = extract_metadata(&source).map_err(|e| match e {
            FrontmatterError::Missing => BuildError::MissingMetadata {
                path: path.to_path_buf(),
            },
            FrontmatterError::Malformed { line } => BuildError::MalformedMetadata {
                path: path.to_path_buf(),
                line,
            },
        })?;

        Ok(Post {
            slug,
            metadata,
            rendered_html: self.renderer.render(&source),
        })
    }
}

fn write_page(
    tree: &OutputTree,
    file_name: &str,
    templates: &TemplateSet,
    page: &Page<'_>,
) -> Result<(), BuildError> {
    let html = templates.render(page)?;
    let output = tree.page(file_name);
    fs::write(&output, html).map_err(|e| BuildError::write(&output, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};
    use walkdir::WalkDir;

    const POST_TEMPLATE: &str = "<title>{{ metadata.title }}</title>\
<h2>{{ post_metadata.title }} ({{ post_metadata.date }})</h2>\
<article>{{ content }}</article>";

    fn config(pagefind: bool) -> SiteConfig {
        SiteConfig::from_toml_str(&format!(
            r#"
[settings]
theme = "plain"
language = "en"
pagefind = {}

[settings.metadata.en]
title = "Test Blog"
"#,
            pagefind
        ))
        .unwrap()
    }

    fn site() -> TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();

        let templates = root.join("themes/plain/templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("post.html.j2"), POST_TEMPLATE).unwrap();
        fs::write(
            templates.join("index.html.j2"),
            "{% for slug, meta in posts|items %}<a href=\"posts/{{ slug }}.html\">{{ meta.title }}</a>{% endfor %}",
        )
        .unwrap();
        fs::write(
            templates.join("list.html.j2"),
            "{{ posts|length }} posts",
        )
        .unwrap();
        fs::write(templates.join("search.html.j2"), "<div id=\"search\"></div>").unwrap();
        fs::write(templates.join("404.html.j2"), "{{ metadata.title }}: not found").unwrap();

        let assets = root.join("themes/plain/assets");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("style.css"), "body { margin: 0 }").unwrap();

        let posts = root.join("posts");
        fs::create_dir_all(posts.join("data")).unwrap();
        fs::write(
            posts.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-01\n---\n# Hi\n\nBody.\n",
        )
        .unwrap();
        fs::write(
            posts.join("second.md"),
            "---\ntitle: Second\ndate: 2024-02-01\n---\nMore text.\n",
        )
        .unwrap();
        fs::write(posts.join("data/photo.jpg"), "jpeg").unwrap();

        temp
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(dir)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let relative = e.path().strip_prefix(dir).unwrap().to_path_buf();
                (relative, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    #[test]
    fn builds_simple_site() {
        let temp = site();
        let builder = SiteBuilder::new(temp.path(), config(false));

        let result = builder.build(true).unwrap();

        let out = temp.path().join("build");
        assert_eq!(result.posts, 2);
        assert_eq!(result.output_dir, out);
        assert!(out.join("index.html").exists());
        assert!(out.join("list.html").exists());
        assert!(out.join("404.html").exists());
        assert_eq!(fs::read_to_string(out.join(".gitignore")).unwrap(), "*");
        assert_eq!(
            fs::read_to_string(out.join("assets/style.css")).unwrap(),
            "body { margin: 0 }"
        );
        assert_eq!(
            fs::read_to_string(out.join("posts/data/photo.jpg")).unwrap(),
            "jpeg"
        );
    }

    #[test]
    fn renders_post_into_template() {
        let temp = site();
        SiteBuilder::new(temp.path(), config(false)).build(true).unwrap();

        let html = fs::read_to_string(temp.path().join("build/posts/hello.html")).unwrap();

        assert_eq!(
            html,
            "<title>Test Blog</title><h2>Hello (2024-01-01)</h2>\
<article><h1>Hi</h1>\n<p>Body.</p>\n</article>"
        );
    }

    #[test]
    fn index_and_list_receive_all_posts() {
        let temp = site();
        SiteBuilder::new(temp.path(), config(false)).build(true).unwrap();

        let index = fs::read_to_string(temp.path().join("build/index.html")).unwrap();
        let list = fs::read_to_string(temp.path().join("build/list.html")).unwrap();

        assert!(index.contains("<a href=\"posts/hello.html\">Hello</a>"));
        assert!(index.contains("<a href=\"posts/second.html\">Second</a>"));
        assert_eq!(list, "2 posts");
    }

    #[test]
    fn writes_exactly_one_file_per_post() {
        let temp = site();
        SiteBuilder::new(temp.path(), config(false)).build(true).unwrap();

        let mut html_files: Vec<String> = fs::read_dir(temp.path().join("build/posts"))
            .unwrap()
            .map(|e| e.unwrap())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        html_files.sort();

        assert_eq!(html_files, vec!["hello.html", "second.html"]);
    }

    #[test]
    fn search_page_follows_config() {
        let temp = site();

        let result = SiteBuilder::new(temp.path(), config(false)).build(true).unwrap();
        assert!(!result.search_page);
        assert!(!temp.path().join("build/search.html").exists());

        let result = SiteBuilder::new(temp.path(), config(true)).build(true).unwrap();
        assert!(result.search_page);
        assert_eq!(
            fs::read_to_string(temp.path().join("build/search.html")).unwrap(),
            "<div id=\"search\"></div>"
        );
    }

    #[test]
    fn search_template_only_required_when_enabled() {
        let temp = site();
        fs::remove_file(temp.path().join("themes/plain/templates/search.html.j2")).unwrap();

        assert!(SiteBuilder::new(temp.path(), config(false)).build(true).is_ok());

        let err = SiteBuilder::new(temp.path(), config(true)).build(true).unwrap_err();
        assert!(matches!(err, BuildError::TemplateNotFound { .. }));
    }

    #[test]
    fn clean_builds_are_identical() {
        let temp = site();
        let builder = SiteBuilder::new(temp.path(), config(true));

        builder.build(true).unwrap();
        let first = snapshot(&builder.output_dir());
        builder.build(true).unwrap();
        let second = snapshot(&builder.output_dir());

        assert_eq!(first, second);
    }

    #[test]
    fn missing_metadata_aborts_without_output() {
        let temp = site();
        fs::write(temp.path().join("posts/broken.md"), "# No front matter\n").unwrap();

        let err = SiteBuilder::new(temp.path(), config(false))
            .build(true)
            .unwrap_err();

        assert!(
            matches!(err, BuildError::MissingMetadata { ref path } if path.ends_with("broken.md"))
        );
        assert!(!temp.path().join("build/posts/broken.html").exists());
        assert!(!temp.path().join("build/index.html").exists());
    }

    #[test]
    fn malformed_metadata_is_fatal() {
        let temp = site();
        fs::write(
            temp.path().join("posts/broken.md"),
            "---\ntitle: Ok\nno colon here\n---\nBody\n",
        )
        .unwrap();

        let err = SiteBuilder::new(temp.path(), config(false))
            .build(true)
            .unwrap_err();

        assert!(
            matches!(err, BuildError::MalformedMetadata { ref line, .. } if line == "no colon here")
        );
        assert!(!temp.path().join("build/posts/broken.html").exists());
    }

    #[test]
    fn unclean_build_keeps_previous_output() {
        let temp = site();
        let builder = SiteBuilder::new(temp.path(), config(false));
        builder.build(true).unwrap();
        fs::write(temp.path().join("build/assets/extra.css"), "old").unwrap();
        fs::remove_file(temp.path().join("posts/second.md")).unwrap();

        builder.build(false).unwrap();

        assert!(temp.path().join("build/assets/extra.css").exists());
        assert!(temp.path().join("build/posts/second.html").exists());
    }

    #[test]
    fn failed_unclean_build_keeps_staged_assets() {
        let temp = site();
        let builder = SiteBuilder::new(temp.path(), config(false));
        builder.build(true).unwrap();
        let assets = temp.path().join("build/assets");
        fs::write(assets.join("old.js"), "old").unwrap();
        fs::create_dir_all(assets.join("blocker")).unwrap();
        fs::write(temp.path().join("themes/plain/assets/blocker"), "file").unwrap();

        let err = builder.build(false).unwrap_err();

        assert!(
            matches!(err, BuildError::AssetIo { ref path, .. } if path.ends_with("assets/blocker"))
        );
        assert_eq!(fs::read_to_string(assets.join("old.js")).unwrap(), "old");
        assert_eq!(
            fs::read_to_string(assets.join("style.css")).unwrap(),
            "body { margin: 0 }"
        );
        assert!(temp.path().join("build/posts/hello.html").exists());
    }

    #[test]
    fn injected_renderers_give_identical_output() {
        let first = site();
        let second = site();

        SiteBuilder::new(first.path(), config(true))
            .with_renderer(MarkdownRenderer::new())
            .build(true)
            .unwrap();
        SiteBuilder::new(second.path(), config(true))
            .with_renderer(MarkdownRenderer::default())
            .build(true)
            .unwrap();

        assert_eq!(
            snapshot(&first.path().join("build")),
            snapshot(&second.path().join("build"))
        );
    }

    #[test]
    fn missing_post_data_is_not_fatal() {
        let temp = site();
        fs::remove_dir_all(temp.path().join("posts/data")).unwrap();

        let result = SiteBuilder::new(temp.path(), config(false)).build(true).unwrap();

        assert_eq!(result.posts, 2);
        assert!(!temp.path().join("build/posts/data").exists());
    }

    #[test]
    fn unknown_theme_fails_before_output() {
        let temp = site();
        let config = SiteConfig::from_toml_str(
            "[settings]\ntheme = \"missing\"\nlanguage = \"en\"\n[settings.metadata.en]\ntitle = \"x\"\n",
        )
        .unwrap();

        let err = SiteBuilder::new(temp.path(), config).build(true).unwrap_err();

        assert!(matches!(err, BuildError::Configuration(_)));
        assert!(!temp.path().join("build").exists());
    }

    #[test]
    fn missing_template_fails_before_posts() {
        let temp = site();
        fs::remove_file(temp.path().join("themes/plain/templates/list.html.j2")).unwrap();

        let err = SiteBuilder::new(temp.path(), config(false))
            .build(true)
            .unwrap_err();

        assert!(matches!(err, BuildError::TemplateNotFound { ref name } if name.ends_with("list.html.j2")));
        assert!(!temp.path().join("build/posts/hello.html").exists());
    }

    #[test]
    fn render_post_returns_metadata_and_html() {
        let temp = site();
        let builder = SiteBuilder::new(temp.path(), config(false));

        let post = builder.render_post(&temp.path().join("posts/hello.md")).unwrap();

        assert_eq!(post.slug, "hello");
        assert_eq!(post.metadata["title"], "Hello");
        assert_eq!(post.metadata["date"], "2024-01-01");
        assert!(post.rendered_html.as_str().contains("<h1>Hi</h1>"));
    }
}
