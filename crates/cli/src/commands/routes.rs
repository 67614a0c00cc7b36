use anyhow::{Context, Result};
use blog_kit_core::{ContentDocument, ListingContext, Route, RouteContext};
use std::path::PathBuf;

use super::load_site;

/// Print the planned route table
pub async fn run(path: PathBuf, json: bool) -> Result<()> {
    let site = load_site(&path).await?;

    if json {
        let out = serde_json::to_string_pretty(&site.plan.routes)
            .context("Failed to serialize routes")?;
        println!("{}", out);
        return Ok(());
    }

    let width = site
        .plan
        .routes
        .iter()
        .map(|r| r.url_path.len())
        .max()
        .unwrap_or(0);

    for route in &site.plan.routes {
        println!("{}", describe(route, width));
        if let RouteContext::Listing(ctx) = &route.context {
            for entry in listing_entries(ctx, &site.plan.posts) {
                println!("    · {}", entry);
            }
        }
    }
    println!("\n{} routes", site.plan.routes.len());

    Ok(())
}

/// The posts shown on one listing page, by slug
fn listing_entries(ctx: &ListingContext, posts: &[ContentDocument]) -> Vec<String> {
    ctx.page_items(posts)
        .iter()
        .map(|doc| {
            doc.frontmatter
                .slug()
                .unwrap_or_else(|| doc.file_path.display().to_string())
        })
        .collect()
}

fn describe(route: &Route, width: usize) -> String {
    let detail = match &route.context {
        RouteContext::Listing(ctx) => {
            let mut line = format!(
                "page {}/{} (skip {}, limit {})",
                ctx.current_page, ctx.num_pages, ctx.skip, ctx.limit
            );
            if let Some(prev) = ctx.prev_page() {
                line.push_str(&format!(" prev {}", prev));
            }
            if let Some(next) = ctx.next_page() {
                line.push_str(&format!(" next {}", next));
            }
            line
        }
        RouteContext::Detail(_) => route.origin(),
        RouteContext::Static(ctx) => ctx.name.clone(),
    };
    format!(
        "{:<width$}  {:<13}  {}",
        route.url_path,
        route.template.to_string(),
        detail,
        width = width
    )
}
