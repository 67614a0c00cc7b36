use blog_kit_core::{ContentDocument, PaginationPlan, Route, RouteContext, TemplateKind};
use log::debug;
use std::num::NonZeroUsize;

/// Plan the paginated post listing.
///
/// `posts` must already be in display order (newest first); pages only
/// carry offsets into that order, so it is preserved as long as the
/// renderer issues the same query. An empty blog still gets the root
/// listing page.
pub fn plan_listing_routes(posts: &[ContentDocument], page_size: NonZeroUsize) -> Vec<Route> {
    let plan = PaginationPlan::new(posts.len(), page_size);
    debug!(
        "Paginating {} posts into {} pages of {}",
        plan.total_count, plan.num_pages, page_size
    );

    (0..plan.num_pages)
        .map(|index| Route {
            url_path: plan.url_path(index),
            template: TemplateKind::ListingPage,
            context: RouteContext::Listing(plan.context(index)),
            source: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_kit_core::{Frontmatter, ListingContext};

    fn posts(n: usize) -> Vec<ContentDocument> {
        (0..n)
            .map(|i| ContentDocument::new(format!("blog/post-{i}.mdx"), Frontmatter::new(), String::new()))
            .collect()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn listing(route: &Route) -> &ListingContext {
        match &route.context {
            RouteContext::Listing(ctx) => ctx,
            other => panic!("expected listing context, got {:?}", other),
        }
    }

    #[test]
    fn test_thirty_five_posts_two_pages() {
        let routes = plan_listing_routes(&posts(35), size(30));
        assert_eq!(routes.len(), 2);

        assert_eq!(routes[0].url_path, "/");
        assert_eq!(routes[0].template, TemplateKind::ListingPage);
        assert_eq!(
            listing(&routes[0]),
            &ListingContext {
                skip: 0,
                limit: 30,
                num_pages: 2,
                current_page: 1,
            }
        );

        assert_eq!(routes[1].url_path, "/2");
        assert_eq!(
            listing(&routes[1]),
            &ListingContext {
                skip: 30,
                limit: 30,
                num_pages: 2,
                current_page: 2,
            }
        );
    }

    #[test]
    fn test_no_posts_one_root_page() {
        let routes = plan_listing_routes(&[], size(30));
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].url_path, "/");
        let ctx = listing(&routes[0]);
        assert_eq!(ctx.num_pages, 1);
        assert_eq!(ctx.skip, 0);
        assert!(ctx.is_first() && ctx.is_last());
    }

    #[test]
    fn test_page_count_matches_ceiling() {
        for page_size in 1..=7 {
            for n in 0..=40 {
                let routes = plan_listing_routes(&posts(n), size(page_size));
                let expected = if n == 0 { 1 } else { n.div_ceil(page_size) };
                assert_eq!(routes.len(), expected, "n={n} page_size={page_size}");
            }
        }
    }

    #[test]
    fn test_pages_contiguous_and_skips_increase() {
        let page_size = 4;
        let routes = plan_listing_routes(&posts(17), size(page_size));
        let num_pages = routes.len();
        for (i, route) in routes.iter().enumerate() {
            let ctx = listing(route);
            assert_eq!(ctx.current_page, i + 1);
            assert_eq!(ctx.skip, i * page_size);
            assert_eq!(ctx.limit, page_size);
            assert_eq!(ctx.num_pages, num_pages);
        }
    }

    #[test]
    fn test_url_paths_unique() {
        let routes = plan_listing_routes(&posts(100), size(3));
        let mut paths: Vec<_> = routes.iter().map(|r| r.url_path.as_str()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), routes.len());
    }
}
