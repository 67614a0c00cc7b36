use crate::error::Result;
use crate::types::{ContentDocument, FieldValue, Frontmatter};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Front matter field to sort on, e.g. `date` or `startDate`
    pub key: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    /// Field is present and equal to the value
    Eq,
    /// Field is absent or different from the value
    Ne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: FieldValue,
}

impl FieldFilter {
    pub fn matches(&self, frontmatter: &Frontmatter) -> bool {
        let actual = frontmatter.get(&self.field);
        match self.op {
            FilterOp::Eq => actual == Some(&self.value),
            FilterOp::Ne => actual != Some(&self.value),
        }
    }
}

/// A request for all documents whose content-relative path matches
/// `pattern`, optionally filtered on front matter fields and sorted.
#[derive(Debug, Clone)]
pub struct ContentQuery {
    pub pattern: Regex,
    pub sort: Option<SortSpec>,
    pub filter: Vec<FieldFilter>,
}

impl ContentQuery {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            sort: None,
            filter: Vec::new(),
        })
    }

    pub fn sorted_by(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortSpec {
            key: key.into(),
            order,
        });
        self
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filter.push(filter);
        self
    }

    /// Path patterns always see `/` separators, whatever the platform.
    pub fn matches_path(&self, file_path: &std::path::Path) -> bool {
        let normalized = file_path.to_string_lossy().replace('\\', "/");
        self.pattern.is_match(&normalized)
    }

    pub fn matches(&self, doc: &ContentDocument) -> bool {
        self.matches_path(&doc.file_path) && self.filter.iter().all(|f| f.matches(&doc.frontmatter))
    }

    /// Select, filter and sort documents.
    ///
    /// Documents missing the sort key go last in either order; ties fall
    /// back to `file_path` so results are deterministic.
    pub fn apply<'a, I>(&self, docs: I) -> Vec<ContentDocument>
    where
        I: IntoIterator<Item = &'a ContentDocument>,
    {
        let mut selected: Vec<ContentDocument> =
            docs.into_iter().filter(|d| self.matches(d)).cloned().collect();

        match &self.sort {
            Some(spec) => selected.sort_by(|a, b| {
                let ordering = match (a.frontmatter.get(&spec.key), b.frontmatter.get(&spec.key)) {
                    (Some(x), Some(y)) => match spec.order {
                        SortOrder::Asc => x.sort_cmp(y),
                        SortOrder::Desc => y.sort_cmp(x),
                    },
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                ordering.then_with(|| a.file_path.cmp(&b.file_path))
            }),
            None => selected.sort_by(|a, b| a.file_path.cmp(&b.file_path)),
        }

        selected
    }
}

/// One diagnostic reported by a content source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub file_path: Option<PathBuf>,
    pub message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            file_path: None,
            message: message.into(),
        }
    }

    pub fn in_file(file_path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// All diagnostics a failed query produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<QueryError>);

impl ErrorList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<QueryError>> for ErrorList {
    fn from(errors: Vec<QueryError>) -> Self {
        ErrorList(errors)
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", err)?;
        }
        Ok(())
    }
}

/// Anything that can answer content queries for a build.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn query(
        &self,
        query: &ContentQuery,
    ) -> std::result::Result<Vec<ContentDocument>, ErrorList>;
}
