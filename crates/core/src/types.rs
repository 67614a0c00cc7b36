use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// A scalar front matter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    String(String),
}

impl FieldValue {
    /// Interpret a front matter string, promoting `YYYY-MM-DD` and RFC 3339
    /// timestamps to dates.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return FieldValue::Date(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return FieldValue::Date(timestamp.date_naive());
        }
        FieldValue::String(text.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Integer(_) | FieldValue::Float(_) => 1,
            FieldValue::Date(_) => 2,
            FieldValue::String(_) => 3,
        }
    }

    /// Total ordering used when sorting documents by a field.
    ///
    /// Integers and floats compare numerically; values of unrelated kinds
    /// order by kind so mixed collections still sort deterministically.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Front matter block of a content document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(BTreeMap<String, FieldValue>);

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Explicit slug, if present. Any scalar counts, so `slug: 404` is the
    /// slug `"404"`.
    pub fn slug(&self) -> Option<String> {
        self.get("slug").map(FieldValue::to_string)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(FieldValue::as_str)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.get("date").and_then(FieldValue::as_date)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Frontmatter(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Opaque, stable document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Identifier derived from the document's content-relative path, so the
    /// same file keeps its id across builds.
    pub fn from_path(file_path: &str) -> Self {
        DocumentId(format!("{:x}", Sha256::digest(file_path.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document read from the content directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDocument {
    pub id: DocumentId,
    /// Path relative to the content root, `/`-separated
    pub file_path: PathBuf,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl ContentDocument {
    pub fn new(file_path: impl Into<PathBuf>, frontmatter: Frontmatter, body: String) -> Self {
        let file_path = file_path.into();
        let id = DocumentId::from_path(&file_path.to_string_lossy());
        Self {
            id,
            file_path,
            frontmatter,
            body,
        }
    }
}

/// Which renderer template handles a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateKind {
    ListingPage,
    BlogPostPage,
    ProjectAboutPage,
    StaticPage,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::ListingPage => "listing",
            TemplateKind::BlogPostPage => "blog-post",
            TemplateKind::ProjectAboutPage => "project-about",
            TemplateKind::StaticPage => "static",
        };
        f.write_str(name)
    }
}

/// Parameters for one page of the post listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingContext {
    pub skip: usize,
    pub limit: usize,
    pub num_pages: usize,
    /// 1-based
    pub current_page: usize,
}

impl ListingContext {
    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.num_pages
    }

    pub fn prev_page(&self) -> Option<String> {
        if self.is_first() {
            None
        } else {
            Some(listing_path(self.current_page - 1))
        }
    }

    pub fn next_page(&self) -> Option<String> {
        if self.is_last() {
            None
        } else {
            Some(listing_path(self.current_page + 1))
        }
    }

    /// The slice of the ordered collection shown on this page.
    pub fn page_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.skip.min(items.len());
        let end = (self.skip + self.limit).min(items.len());
        &items[start..end]
    }
}

/// Parameters for a page rendered from a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailContext {
    pub id: DocumentId,
    pub slug: String,
}

/// Parameters for a fixed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticContext {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteContext {
    Listing(ListingContext),
    Detail(DetailContext),
    Static(StaticContext),
}

/// A static URL path plus the template and data needed to render it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub url_path: String,
    pub template: TemplateKind,
    pub context: RouteContext,
    /// Document the route was planned from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Route {
    /// Human-readable description of where this route came from.
    pub fn origin(&self) -> String {
        if let Some(source) = &self.source {
            return format!("'{}'", source.display());
        }
        match &self.context {
            RouteContext::Listing(ctx) => format!("listing page {}", ctx.current_page),
            RouteContext::Static(ctx) => format!("static page '{}'", ctx.name),
            RouteContext::Detail(ctx) => format!("document {}", ctx.id),
        }
    }
}

/// URL of a 1-based listing page: `/`, `/2`, `/3`, ...
pub fn listing_path(page_number: usize) -> String {
    if page_number <= 1 {
        "/".to_string()
    } else {
        format!("/{}", page_number)
    }
}

/// How a sequence of posts is split across listing pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPlan {
    pub total_count: usize,
    pub page_size: NonZeroUsize,
    /// Always at least 1, so an empty blog still gets a root listing page.
    pub num_pages: usize,
}

impl PaginationPlan {
    pub fn new(total_count: usize, page_size: NonZeroUsize) -> Self {
        let num_pages = total_count.div_ceil(page_size.get()).max(1);
        Self {
            total_count,
            page_size,
            num_pages,
        }
    }

    /// Context for the 0-based page `index`.
    pub fn context(&self, index: usize) -> ListingContext {
        ListingContext {
            skip: index * self.page_size.get(),
            limit: self.page_size.get(),
            num_pages: self.num_pages,
            current_page: index + 1,
        }
    }

    pub fn url_path(&self, index: usize) -> String {
        listing_path(index + 1)
    }
}
