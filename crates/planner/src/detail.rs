use crate::route_set::RouteSet;
use crate::slug::{derive_slug, is_url_safe};
use blog_kit_core::config::SlugPolicy;
use blog_kit_core::{
    ContentDocument, DetailContext, Error, Result, Route, RouteContext, TemplateKind,
};
use log::debug;
use std::path::Path;

/// Plan one route per document at `slug + suffix`.
///
/// `root` is the collection directory path-derived slugs are relative to.
/// Fails without emitting anything if any document lacks a usable slug
/// or two documents land on the same URL path.
pub fn plan_detail_routes(
    docs: &[ContentDocument],
    root: &Path,
    suffix: &str,
    template: TemplateKind,
    slug_policy: SlugPolicy,
) -> Result<Vec<Route>> {
    let mut routes = RouteSet::new();

    for doc in docs {
        let slug = resolve_slug(doc, root, slug_policy)?;
        let url_path = format!("{}{}", slug, suffix);
        debug!("{} -> {} ({})", doc.file_path.display(), url_path, template);

        routes.insert(Route {
            url_path,
            template,
            context: RouteContext::Detail(DetailContext {
                id: doc.id.clone(),
                slug,
            }),
            source: Some(doc.file_path.clone()),
        })?;
    }

    Ok(routes.into_routes())
}

/// The slug a document is routed under. An explicit front matter slug
/// always wins; the path-derived one is only used when allowed.
pub fn resolve_slug(
    doc: &ContentDocument,
    root: &Path,
    slug_policy: SlugPolicy,
) -> Result<String> {
    let explicit = doc
        .frontmatter
        .slug()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let slug = match (explicit, slug_policy) {
        (Some(slug), _) => slug,
        (None, SlugPolicy::FallbackToPath) => derive_slug(&doc.file_path, root),
        (None, SlugPolicy::Strict) => {
            return Err(Error::MissingSlug {
                file_path: doc.file_path.clone(),
            });
        }
    };

    if !is_url_safe(&slug) {
        return Err(Error::InvalidSlug {
            file_path: doc.file_path.clone(),
            slug,
        });
    }

    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_kit_core::{FieldValue, Frontmatter};
    use chrono::NaiveDate;

    fn blog() -> &'static Path {
        Path::new("blog")
    }

    fn projects() -> &'static Path {
        Path::new("projects")
    }

    fn plan_strict_posts(docs: &[ContentDocument]) -> Result<Vec<Route>> {
        plan_detail_routes(
            docs,
            blog(),
            "",
            TemplateKind::BlogPostPage,
            SlugPolicy::Strict,
        )
    }

    fn doc(path: &str, slug: Option<&str>) -> ContentDocument {
        let mut fm = Frontmatter::new();
        fm.insert("title", FieldValue::String("Title".into()));
        if let Some(slug) = slug {
            fm.insert("slug", FieldValue::String(slug.into()));
        }
        ContentDocument::new(path, fm, String::new())
    }

    #[test]
    fn test_blog_post_routes_use_slug() {
        let docs = vec![doc("blog/a.mdx", Some("/first")), doc("blog/b.mdx", Some("/second"))];
        let routes = plan_detail_routes(
            &docs,
            blog(),
            "",
            TemplateKind::BlogPostPage,
            SlugPolicy::Strict,
        )
        .unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].url_path, "/first");
        assert_eq!(routes[1].url_path, "/second");
        assert_eq!(
            routes[0].context,
            RouteContext::Detail(DetailContext {
                id: docs[0].id.clone(),
                slug: "/first".into(),
            })
        );
    }

    #[test]
    fn test_project_suffix() {
        let docs = vec![doc("projects/x/about.mdx", Some("x"))];
        let routes = plan_detail_routes(
            &docs,
            projects(),
            "-about",
            TemplateKind::ProjectAboutPage,
            SlugPolicy::Strict,
        )
        .unwrap();
        assert_eq!(routes[0].url_path, "x-about");
        assert_eq!(routes[0].template, TemplateKind::ProjectAboutPage);
        match &routes[0].context {
            RouteContext::Detail(ctx) => assert_eq!(ctx.slug, "x"),
            other => panic!("unexpected context {:?}", other),
        }
    }

    #[test]
    fn test_missing_slug_fails_whole_batch() {
        let docs = vec![doc("blog/ok.mdx", Some("/ok")), doc("blog/no-slug.mdx", None)];
        let err = plan_strict_posts(&docs).unwrap_err();
        match err {
            Error::MissingSlug { file_path } => {
                assert_eq!(file_path.to_string_lossy(), "blog/no-slug.mdx")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_slug_is_missing() {
        let docs = vec![doc("blog/blank.mdx", Some("   "))];
        let err = plan_strict_posts(&docs).unwrap_err();
        assert!(matches!(err, Error::MissingSlug { .. }));
    }

    #[test]
    fn test_fallback_derives_from_path() {
        let docs = vec![
            doc("blog/my-post/index.mdx", None),
            doc("blog/explicit.mdx", Some("/chosen")),
        ];
        let routes = plan_detail_routes(
            &docs,
            blog(),
            "",
            TemplateKind::BlogPostPage,
            SlugPolicy::FallbackToPath,
        )
        .unwrap();
        assert_eq!(routes[0].url_path, "/my-post/");
        assert_eq!(routes[1].url_path, "/chosen");
    }

    #[test]
    fn test_non_string_scalar_slugs_are_slugs() {
        let mut dated = Frontmatter::new();
        dated.insert(
            "slug",
            FieldValue::Date(NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()),
        );
        let mut numbered = Frontmatter::new();
        numbered.insert("slug", FieldValue::Integer(404));
        let docs = vec![
            ContentDocument::new("projects/p/about.mdx", dated, String::new()),
            ContentDocument::new("projects/q/about.mdx", numbered, String::new()),
        ];

        let routes = plan_detail_routes(
            &docs,
            projects(),
            "-about",
            TemplateKind::ProjectAboutPage,
            SlugPolicy::Strict,
        )
        .unwrap();
        assert_eq!(routes[0].url_path, "2021-03-14-about");
        assert_eq!(routes[1].url_path, "404-about");
    }

    #[test]
    fn test_project_fallback_keeps_trailing_slash() {
        let docs = vec![doc("projects/robot/about.mdx", None)];
        let routes = plan_detail_routes(
            &docs,
            projects(),
            "-about",
            TemplateKind::ProjectAboutPage,
            SlugPolicy::FallbackToPath,
        )
        .unwrap();
        assert_eq!(routes[0].url_path, "/robot/about/-about");
    }

    #[test]
    fn test_duplicate_slug_names_both_documents() {
        let docs = vec![doc("blog/a.mdx", Some("/same")), doc("blog/b.mdx", Some("same/"))];
        let err = plan_strict_posts(&docs).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::DuplicateRoute { .. }));
        assert!(msg.contains("blog/a.mdx"));
        assert!(msg.contains("blog/b.mdx"));
    }

    #[test]
    fn test_unsafe_slug_rejected() {
        let docs = vec![doc("blog/a.mdx", Some("/hello world"))];
        let err = plan_strict_posts(&docs).unwrap_err();
        match err {
            Error::InvalidSlug { slug, .. } => assert_eq!(slug, "/hello world"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let routes = plan_detail_routes(
            &[],
            projects(),
            "-about",
            TemplateKind::ProjectAboutPage,
            SlugPolicy::Strict,
        )
        .unwrap();
        assert!(routes.is_empty());
    }
}
