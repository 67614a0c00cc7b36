//! Slug derivation and URL path checks.

use std::path::{Component, Path};

/// Derive a URL path from a document's location relative to its
/// collection's `root` directory.
///
/// The extension is dropped and an `index` file takes its directory's
/// name, so `blog/my-post/index.mdx` and `blog/my-post.mdx` under the root
/// `blog` both become `/my-post/`. Each segment is lowercased, whitespace
/// becomes `-`, and anything else that is not URL-safe is removed. Paths
/// outside `root` are used as they are.
pub fn derive_slug(file_path: &Path, root: &Path) -> String {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.pop() {
        let stem = match last.rfind('.') {
            Some(dot) if dot > 0 => last[..dot].to_string(),
            _ => last,
        };
        if stem != "index" {
            segments.push(stem);
        }
    }

    let cleaned: Vec<String> = segments
        .iter()
        .map(|s| slugify_segment(s))
        .filter(|s| !s.is_empty())
        .collect();

    if cleaned.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", cleaned.join("/"))
    }
}

fn slugify_segment(segment: &str) -> String {
    segment
        .to_lowercase()
        .replace(char::is_whitespace, "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Whether `slug` can be used verbatim as (part of) a URL path.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '~'))
        && !slug.split('/').any(|segment| segment == "..")
}

/// Canonical form of a URL path used to detect collisions: a leading `/`
/// is added and trailing slashes dropped, so `hello`, `/hello` and
/// `/hello/` are the same page.
pub fn normalize_url_path(url_path: &str) -> String {
    let trimmed = url_path.trim_matches('/');
    format!("/{}", trimmed)
}
