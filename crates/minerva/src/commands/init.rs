//! Initialize a blog folder.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Files of the starter blog, relative to the blog folder.
const SCAFFOLD: &[(&str, &str)] = &[
    ("settings.toml", DEFAULT_CONFIG),
    ("posts/hello.md", DEFAULT_POST),
    ("themes/default/templates/base.html.j2", BASE_TEMPLATE),
    ("themes/default/templates/index.html.j2", INDEX_TEMPLATE),
    ("themes/default/templates/post.html.j2", POST_TEMPLATE),
    ("themes/default/templates/list.html.j2", LIST_TEMPLATE),
    ("themes/default/templates/search.html.j2", SEARCH_TEMPLATE),
    ("themes/default/templates/404.html.j2", NOT_FOUND_TEMPLATE),
    ("themes/default/assets/style.css", DEFAULT_CSS),
];

/// Run the init command.
///
/// Existing files are kept unless `yes` is set.
pub async fn run(folder: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing minerva blog in {}", folder.display());

    for (relative, content) in SCAFFOLD {
        let path = folder.join(relative);
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", relative);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'minerva build --serve' to preview the blog.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"[settings]
# Theme directory under themes/
theme = "default"

# Key of the [settings.metadata.*] table used for display strings
language = "en"

# Render search.html for the pagefind indexer
pagefind = false

# Prefix of every link in the theme
base_url = "/"

[settings.metadata.en]
title = "My Blog"
description = "Notes and articles"
all_posts = "All posts"
search = "Search"
not_found = "Page not found"
back_home = "Back to the front page"
footer = "Built with minerva"
"#;

const DEFAULT_POST: &str = r#"---
title: Hello, world
date: 2024-01-01
summary: The first post of this blog.
---
# Hello, world

This blog is built with **minerva**.
Lines in a paragraph keep their breaks.

![The minerva logo](data/logo.png)

Footnotes work too.[^1]

[^1]: Put images and files for posts in `posts/data/`.
"#;

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ settings.language }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% block title %}{{ metadata.title }}{% endblock %}</title>
  <meta name="description" content="{{ metadata.description }}">
  <link rel="stylesheet" href="{{ settings.base_url }}assets/style.css">
  {% block head %}{% endblock %}
</head>
<body>
  <header class="site-header">
    <a class="site-title" href="{{ settings.base_url }}index.html">{{ metadata.title }}</a>
    <nav>
      <a href="{{ settings.base_url }}list.html">{{ metadata.all_posts }}</a>
      {% if settings.pagefind %}<a href="{{ settings.base_url }}search.html">{{ metadata.search }}</a>{% endif %}
    </nav>
  </header>
  <main>
    {% block content %}{% endblock %}
  </main>
  <footer class="site-footer">{{ metadata.footer }}</footer>
</body>
</html>
"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html.j2" %}

{% block content %}
<p class="lead">{{ metadata.description }}</p>
{% for slug, post in posts|items %}
<article class="summary">
  <h2><a href="{{ settings.base_url }}posts/{{ slug }}.html">{{ post.title }}</a></h2>
  {% if post.date %}<time>{{ post.date }}</time>{% endif %}
  {% if post.summary %}<p>{{ post.summary }}</p>{% endif %}
</article>
{% endfor %}
{% endblock %}
"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html.j2" %}

{% block title %}{{ post_metadata.title }} - {{ metadata.title }}{% endblock %}

{% block content %}
<article class="post" data-pagefind-body>
  {% if post_metadata.date %}<time>{{ post_metadata.date }}</time>{% endif %}
  {{ content }}
</article>
{% endblock %}
"##;

const LIST_TEMPLATE: &str = r##"{% extends "base.html.j2" %}

{% block title %}{{ metadata.all_posts }} - {{ metadata.title }}{% endblock %}

{% block content %}
<h1>{{ metadata.all_posts }}</h1>
<ul class="post-list">
{% for slug, post in posts|items %}
  <li>{% if post.date %}<time>{{ post.date }}</time> {% endif %}<a href="{{ settings.base_url }}posts/{{ slug }}.html">{{ post.title }}</a></li>
{% endfor %}
</ul>
{% endblock %}
"##;

const SEARCH_TEMPLATE: &str = r##"{% extends "base.html.j2" %}

{% block title %}{{ metadata.search }} - {{ metadata.title }}{% endblock %}

{% block head %}
<link rel="stylesheet" href="{{ settings.base_url }}pagefind/pagefind-ui.css">
<script src="{{ settings.base_url }}pagefind/pagefind-ui.js"></script>
{% endblock %}

{% block content %}
<h1>{{ metadata.search }}</h1>
<div id="search"></div>
<script>
  window.addEventListener("DOMContentLoaded", () => {
    new PagefindUI({ element: "#search", showSubResults: true });
  });
</script>
{% endblock %}
"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html.j2" %}

{% block title %}{{ metadata.not_found }} - {{ metadata.title }}{% endblock %}

{% block content %}
<h1>{{ metadata.not_found }}</h1>
<p><a href="{{ settings.base_url }}index.html">{{ metadata.back_home }}</a></p>
{% endblock %}
"##;

const DEFAULT_CSS: &str = r#"* {
  box-sizing: border-box;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.6;
  max-width: 46rem;
  margin: 0 auto;
  padding: 0 1rem;
  color: #1f2328;
}

.site-header {
  display: flex;
  justify-content: space-between;
  align-items: baseline;
  padding: 1.5rem 0;
  border-bottom: 1px solid #d0d7de;
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: inherit;
  text-decoration: none;
}

.site-header nav a {
  margin-left: 1rem;
}

.summary time,
.post time,
.post-list time {
  color: #656d76;
  font-size: 0.875rem;
}

figure {
  margin: 1.5rem 0;
  text-align: center;
}

figure img {
  max-width: 100%;
}

figcaption {
  color: #656d76;
  font-size: 0.875rem;
}

pre {
  background: #f6f8fa;
  padding: 1rem;
  overflow-x: auto;
}

.footnote-definition {
  font-size: 0.875rem;
}

.site-footer {
  margin: 3rem 0 1.5rem;
  color: #656d76;
  font-size: 0.875rem;
}
"#;
