use crate::detail::plan_detail_routes;
use crate::listing::plan_listing_routes;
use crate::route_set::RouteSet;
use blog_kit_core::config::{CollectionConfig, StaticPage};
use blog_kit_core::{
    ContentDocument, ContentSource, Error, Result, Route, RouteContext, SiteConfig,
    StaticContext, TemplateKind,
};
use log::info;
use serde::Serialize;

/// The complete route set for one build
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub routes: Vec<Route>,
    /// Blog posts in listing order
    #[serde(skip)]
    pub posts: Vec<ContentDocument>,
    #[serde(skip)]
    pub projects: Vec<ContentDocument>,
}

impl RoutePlan {
    pub fn routes_of(&self, template: TemplateKind) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |r| r.template == template)
    }

    pub fn count(&self, template: TemplateKind) -> usize {
        self.routes_of(template).count()
    }
}

pub fn plan_static_routes(pages: &[StaticPage]) -> Vec<Route> {
    pages
        .iter()
        .map(|page| Route {
            url_path: page.path.clone(),
            template: TemplateKind::StaticPage,
            context: RouteContext::Static(StaticContext {
                name: page.name.clone(),
            }),
            source: None,
        })
        .collect()
}

/// Combine listing, blog post, project and static routes, rejecting any
/// URL path produced twice across the whole set.
pub fn plan_routes(
    posts: Vec<ContentDocument>,
    projects: Vec<ContentDocument>,
    config: &SiteConfig,
) -> Result<RoutePlan> {
    let policy = config.build.slug_policy;

    let listing = plan_listing_routes(&posts, config.build.page_size);
    let post_routes = plan_detail_routes(
        &posts,
        &config.blog.root,
        &config.blog.suffix,
        TemplateKind::BlogPostPage,
        policy,
    )?;
    let project_routes = plan_detail_routes(
        &projects,
        &config.projects.root,
        &config.projects.suffix,
        TemplateKind::ProjectAboutPage,
        policy,
    )?;
    let static_routes = plan_static_routes(&config.pages);

    let mut routes = RouteSet::new();
    routes.extend(listing)?;
    routes.extend(post_routes)?;
    routes.extend(project_routes)?;
    routes.extend(static_routes)?;
    let routes = routes.into_routes();

    info!(
        "Planned {} routes from {} posts and {} projects",
        routes.len(),
        posts.len(),
        projects.len()
    );

    Ok(RoutePlan {
        routes,
        posts,
        projects,
    })
}

async fn fetch(
    source: &dyn ContentSource,
    collection: &CollectionConfig,
) -> Result<Vec<ContentDocument>> {
    source
        .query(&collection.query)
        .await
        .map_err(|errors| Error::ContentQuery {
            collection: collection.name.clone(),
            errors,
        })
}

/// Query the blog and project collections once each, concurrently, then
/// plan the full route set.
pub async fn plan_build(source: &dyn ContentSource, config: &SiteConfig) -> Result<RoutePlan> {
    let (posts, projects) =
        tokio::try_join!(fetch(source, &config.blog), fetch(source, &config.projects))?;
    plan_routes(posts, projects, config)
}
