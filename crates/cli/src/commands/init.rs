use anyhow::{Context, Result};
use blog_kit_core::config::parse_site_toml_str;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use super::SITE_TOML;

/// Escape a string for safe inclusion in a TOML basic string
///
/// The site.toml template is written by hand so it can carry comments,
/// which serializing through the toml crate would drop.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Escape a string for a double-quoted YAML scalar
fn yaml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Initialize a new site directory.
///
/// Creates:
/// - site.toml with the default collections and static pages
/// - content/blog/hello-world.mdx, a first post dated today
/// - content/projects/example/about.mdx, a first project page
///
/// # Errors
///
/// Returns an error if the directory doesn't exist, site.toml is already
/// there, or a file cannot be written.
pub async fn run(path: PathBuf, title: Option<String>, site_url: Option<String>) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_TOML);
    if site_toml_path.exists() {
        anyhow::bail!(
            "site.toml already exists at {}\nHint: Delete it first or use a different directory",
            site_toml_path.display()
        );
    }

    generate_site_toml(&path, title.as_deref(), site_url.as_deref())?;
    generate_sample_content(&path)?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml              ← Site title, page size, collections");
    println!("  └── content/");
    println!("      ├── blog/");
    println!("      │   └── hello-world.mdx");
    println!("      └── projects/");
    println!("          └── example/");
    println!("              └── about.mdx");

    println!("\nNext steps:");
    println!("  1. Edit site.toml (set title and site_url)");
    println!("  2. Write posts in content/blog/ (each needs a 'slug')");
    println!("  3. Check routes: blog-kit routes {}", path.display());

    Ok(())
}

fn generate_site_toml(base: &Path, title: Option<&str>, site_url: Option<&str>) -> Result<()> {
    let site_title = toml_escape_string(title.unwrap_or("My Blog"));
    let url = toml_escape_string(site_url.unwrap_or("https://example.com/"));

    let title_comment = if title.is_some() {
        ""
    } else {
        "  # TODO: Set site title"
    };
    let url_comment = if site_url.is_some() {
        ""
    } else {
        "  # TODO: Set site URL"
    };

    let toml = format!(
        "# Generated by blog-kit init\n\
# Edit this file to customize your site\n\
\n\
[site]\n\
title = \"{site_title}\"{title_comment}\n\
description = \"\"\n\
site_url = \"{url}\"{url_comment}\n\
\n\
[build]\n\
content_dir = \"content\"\n\
page_size = 30\n\
# Route documents without a front matter slug by their file path\n\
slug_fallback = false\n\
\n\
[collections.blog]\n\
root = \"blog\"\n\
pattern = \"^blog/\"\n\
sort_key = \"date\"\n\
order = \"desc\"\n\
\n\
[collections.projects]\n\
root = \"projects\"\n\
pattern = '^projects/.+about\\.mdx$'\n\
sort_key = \"startDate\"\n\
order = \"desc\"\n\
suffix = \"-about\"\n\
\n\
[[pages]]\n\
path = \"/about\"\n\
name = \"about\"\n\
\n\
[[pages]]\n\
path = \"/projects\"\n\
name = \"projects\"\n\
"
    );

    // Validate the generated config can be parsed
    parse_site_toml_str(&toml)
        .context("Generated site.toml is invalid - this is a bug in the template generator")?;

    fs::write(base.join(SITE_TOML), toml)?;

    Ok(())
}

fn generate_sample_content(base: &Path) -> Result<()> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let blog_dir = base.join("content").join("blog");
    let project_dir = base.join("content").join("projects").join("example");
    fs::create_dir_all(&blog_dir)?;
    fs::create_dir_all(&project_dir)?;

    let post = format!(
        "---\n\
title: \"{}\"\n\
slug: /hello-world\n\
date: {today}\n\
excerpt: \"The first post on this blog.\"\n\
---\n\
\n\
Write your first post here.\n",
        yaml_escape_string("Hello, world")
    );
    fs::write(blog_dir.join("hello-world.mdx"), post)?;

    let project = format!(
        "---\n\
title: Example project\n\
slug: example\n\
startDate: {today}\n\
ongoing: true\n\
excerpt: \"What this project is about.\"\n\
---\n\
\n\
Describe the project here.\n"
    );
    fs::write(project_dir.join("about.mdx"), project)?;

    Ok(())
}
