use crate::error::{Error, Result};
use crate::query::{ContentQuery, FieldFilter, SortOrder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PAGE_SIZE: usize = 30;
pub const DEFAULT_CONTENT_DIR: &str = "content";
pub const PROJECT_ABOUT_SUFFIX: &str = "-about";

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    site: SiteMetadata,
    #[serde(default)]
    build: RawBuild,
    #[serde(default)]
    collections: RawCollections,
    #[serde(default)]
    pages: Vec<StaticPage>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawBuild {
    content_dir: String,
    page_size: usize,
    slug_fallback: bool,
}

impl Default for RawBuild {
    fn default() -> Self {
        Self {
            content_dir: DEFAULT_CONTENT_DIR.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            slug_fallback: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCollections {
    blog: Option<RawCollection>,
    projects: Option<RawCollection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCollection {
    root: Option<String>,
    pattern: Option<String>,
    sort_key: Option<String>,
    order: Option<SortOrder>,
    suffix: Option<String>,
    #[serde(default)]
    filter: Vec<FieldFilter>,
}

/// Site-wide metadata handed to the renderer untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "site_url")]
    pub site_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// A fixed page that always exists, independent of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticPage {
    pub path: String,
    pub name: String,
}

/// Whether a document without a front matter slug may fall back to one
/// derived from its file path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlugPolicy {
    #[default]
    Strict,
    FallbackToPath,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Relative to the site directory
    pub content_dir: PathBuf,
    pub page_size: NonZeroUsize,
    pub slug_policy: SlugPolicy,
}

/// One queried content category
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub name: String,
    pub query: ContentQuery,
    /// Directory under the content root that path-derived slugs are
    /// relative to
    pub root: PathBuf,
    /// Appended to each document slug to form its URL path
    pub suffix: String,
}

/// Complete, validated site configuration. Loaded once per build.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site: SiteMetadata,
    pub build: BuildConfig,
    pub blog: CollectionConfig,
    pub projects: CollectionConfig,
    pub pages: Vec<StaticPage>,
}

struct CollectionDefaults {
    name: &'static str,
    root: &'static str,
    pattern: &'static str,
    sort_key: &'static str,
    suffix: &'static str,
}

const BLOG_DEFAULTS: CollectionDefaults = CollectionDefaults {
    name: "blog",
    root: "blog",
    pattern: "^blog/",
    sort_key: "date",
    suffix: "",
};

const PROJECT_DEFAULTS: CollectionDefaults = CollectionDefaults {
    name: "projects",
    root: "projects",
    pattern: r"^projects/.+about\.mdx$",
    sort_key: "startDate",
    suffix: PROJECT_ABOUT_SUFFIX,
};

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let content_dir = validate_path(&raw.build.content_dir, "build.content_dir")?;
    let page_size = NonZeroUsize::new(raw.build.page_size)
        .ok_or_else(|| Error::ConfigParse("build.page_size must be at least 1".to_string()))?;
    let slug_policy = if raw.build.slug_fallback {
        SlugPolicy::FallbackToPath
    } else {
        SlugPolicy::Strict
    };

    let blog = build_collection(raw.collections.blog.unwrap_or_default(), &BLOG_DEFAULTS)?;
    let projects = build_collection(
        raw.collections.projects.unwrap_or_default(),
        &PROJECT_DEFAULTS,
    )?;

    for page in &raw.pages {
        if !page.path.starts_with('/') {
            return Err(Error::ConfigParse(format!(
                "Static page '{}' path must start with '/': '{}'",
                page.name, page.path
            )));
        }
        if page.name.trim().is_empty() {
            return Err(Error::ConfigParse(format!(
                "Static page at '{}' needs a name",
                page.path
            )));
        }
    }

    Ok(SiteConfig {
        site: raw.site,
        build: BuildConfig {
            content_dir,
            page_size,
            slug_policy,
        },
        blog,
        projects,
        pages: raw.pages,
    })
}

fn build_collection(raw: RawCollection, defaults: &CollectionDefaults) -> Result<CollectionConfig> {
    let root = validate_path(
        raw.root.as_deref().unwrap_or(defaults.root),
        &format!("collections.{}.root", defaults.name),
    )?;
    let pattern = raw.pattern.as_deref().unwrap_or(defaults.pattern);
    let sort_key = raw.sort_key.unwrap_or_else(|| defaults.sort_key.to_string());

    let mut query = ContentQuery::new(pattern)?.sorted_by(sort_key, raw.order.unwrap_or_default());
    for filter in raw.filter {
        query = query.with_filter(filter);
    }

    Ok(CollectionConfig {
        name: defaults.name.to_string(),
        query,
        root,
        suffix: raw.suffix.unwrap_or_else(|| defaults.suffix.to_string()),
    })
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and `..` components so a site.toml cannot point
/// the indexer outside the site directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    // Ensure path is not empty
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    // Reject absolute paths
    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    // Check for parent directory references
    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}
