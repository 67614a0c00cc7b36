use crate::frontmatter::parse_document;
use async_trait::async_trait;
use blog_kit_core::{
    ContentDocument, ContentQuery, ContentSource, Error, ErrorList, QueryError, Result,
};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Content index backed by a directory of front matter documents.
///
/// The directory is read once; queries are answered from memory. Files
/// that cannot be read or parsed are kept as load errors and reported by
/// every query whose pattern would have selected them.
#[derive(Debug)]
pub struct FsContentIndex {
    root: PathBuf,
    documents: Vec<ContentDocument>,
    load_errors: Vec<QueryError>,
}

impl FsContentIndex {
    /// Load the content root on a blocking task.
    pub async fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::task::spawn_blocking(move || Self::load_blocking(&root))
            .await
            .map_err(|e| Error::IoError(std::io::Error::other(e)))?
    }

    pub fn load_blocking(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::InvalidData(format!(
                "Content directory does not exist: {}",
                root.display()
            )));
        }

        let mut documents = Vec::new();
        let mut load_errors = Vec::new();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    let error = match err.path().and_then(|p| p.strip_prefix(root).ok()) {
                        Some(rel) => QueryError::in_file(relative_path(rel), err.to_string()),
                        None => QueryError::new(err.to_string()),
                    };
                    load_errors.push(error);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_content_file(entry.path()) {
                continue;
            }

            let rel = match entry.path().strip_prefix(root) {
                Ok(rel) => relative_path(rel),
                Err(_) => continue,
            };

            let parsed = fs::read_to_string(entry.path())
                .map_err(|e| e.to_string())
                .and_then(|source| parse_document(&rel, &source));

            match parsed {
                Ok(doc) => {
                    debug!("Indexed {} ({} fields)", rel, doc.frontmatter.len());
                    documents.push(doc);
                }
                Err(message) => {
                    warn!("Failed to load {}: {}", rel, message);
                    load_errors.push(QueryError::in_file(rel, message));
                }
            }
        }

        info!(
            "Indexed {} documents under {} ({} failed)",
            documents.len(),
            root.display(),
            load_errors.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            documents,
            load_errors,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &[ContentDocument] {
        &self.documents
    }

    pub fn load_errors(&self) -> &[QueryError] {
        &self.load_errors
    }

    /// Synchronous form of [`ContentSource::query`].
    pub fn run_query(&self, query: &ContentQuery) -> std::result::Result<Vec<ContentDocument>, ErrorList> {
        let errors = ErrorList::from(
            self.load_errors
                .iter()
                .filter(|e| match &e.file_path {
                    Some(path) => query.matches_path(path),
                    None => true,
                })
                .cloned()
                .collect::<Vec<_>>(),
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        let results = query.apply(&self.documents);
        debug!(
            "Query '{}' matched {} documents",
            query.pattern.as_str(),
            results.len()
        );
        Ok(results)
    }
}

#[async_trait]
impl ContentSource for FsContentIndex {
    async fn query(
        &self,
        query: &ContentQuery,
    ) -> std::result::Result<Vec<ContentDocument>, ErrorList> {
        self.run_query(query)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            CONTENT_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str())
        })
        .unwrap_or(false)
}

/// `/`-separated form of a path relative to the content root
fn relative_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_kit_core::query::SortOrder;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(slug: &str, date: &str) -> String {
        format!("---\ntitle: {slug}\nslug: {slug}\ndate: {date}\n---\n\nBody of {slug}.\n")
    }

    fn create_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "blog/first.mdx", &post("first", "2020-01-10"));
        write(root, "blog/second/index.mdx", &post("second", "2021-05-02"));
        write(root, "blog/third.md", &post("third", "2022-08-30"));
        write(
            root,
            "projects/robot/about.mdx",
            "---\ntitle: Robot\nslug: robot\nstartDate: 2021-01-01\n---\nAbout.\n",
        );
        write(
            root,
            "projects/robot/part-1.mdx",
            "---\ntitle: Part 1\nslug: robot-part-1\n---\n",
        );
        write(root, "blog/notes.txt", "not content");
        write(root, ".drafts/secret.mdx", &post("secret", "2023-01-01"));
        dir
    }

    #[test]
    fn test_load_indexes_content_files_only() {
        let dir = create_site();
        let index = FsContentIndex::load_blocking(dir.path()).unwrap();
        let mut paths: Vec<_> = index
            .documents()
            .iter()
            .map(|d| d.file_path.to_string_lossy().into_owned())
            .collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "blog/first.mdx",
                "blog/second/index.mdx",
                "blog/third.md",
                "projects/robot/about.mdx",
                "projects/robot/part-1.mdx",
            ]
        );
        assert!(index.load_errors().is_empty());
    }

    #[test]
    fn test_query_blog_sorted_by_date_desc() {
        let dir = create_site();
        let index = FsContentIndex::load_blocking(dir.path()).unwrap();
        let query = ContentQuery::new("^blog/")
            .unwrap()
            .sorted_by("date", SortOrder::Desc);
        let slugs: Vec<_> = index
            .run_query(&query)
            .unwrap()
            .iter()
            .map(|d| d.frontmatter.slug().unwrap())
            .collect();
        assert_eq!(slugs, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_query_projects_about_only() {
        let dir = create_site();
        let index = FsContentIndex::load_blocking(dir.path()).unwrap();
        let query = ContentQuery::new(r"^projects/.+about\.mdx$").unwrap();
        let docs = index.run_query(&query).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].frontmatter.slug().as_deref(), Some("robot"));
        assert_eq!(docs[0].body.trim(), "About.");
    }

    #[test]
    fn test_broken_document_fails_matching_query_only() {
        let dir = create_site();
        write(dir.path(), "blog/broken.mdx", "---\ntitle: [oops\n---\nbody\n");
        let index = FsContentIndex::load_blocking(dir.path()).unwrap();
        assert_eq!(index.load_errors().len(), 1);

        let blog = ContentQuery::new("^blog/").unwrap();
        let errors = index.run_query(&blog).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.to_string().contains("blog/broken.mdx"));

        let projects = ContentQuery::new("^projects/").unwrap();
        assert_eq!(index.run_query(&projects).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let err = FsContentIndex::load_blocking(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_async_load_and_query() {
        let dir = create_site();
        let index = FsContentIndex::load(dir.path()).await.unwrap();
        let query = ContentQuery::new("^blog/").unwrap();
        let docs = index.query(&query).await.unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn test_document_ids_follow_paths() {
        let dir = create_site();
        let first = FsContentIndex::load_blocking(dir.path()).unwrap();
        let second = FsContentIndex::load_blocking(dir.path()).unwrap();
        let ids = |index: &FsContentIndex| -> Vec<String> {
            index
                .documents()
                .iter()
                .map(|d| d.id.to_string())
                .collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }
}
