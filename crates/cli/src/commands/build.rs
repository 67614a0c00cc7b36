use anyhow::{Context, Result};
use blog_kit_core::config::SiteMetadata;
use blog_kit_core::{Route, TemplateKind};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::load_site;

pub const MANIFEST_FILE: &str = "routes.json";

/// What the page renderer reads: every route with its template and context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteManifest<'a> {
    site: &'a SiteMetadata,
    page_size: usize,
    routes: &'a [Route],
}

/// Plan the site and write the route manifest for the renderer
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Planning static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let site = load_site(&path).await?;
    let plan = &site.plan;

    println!("✓ Loaded: {}", site.config.site.title);
    println!("  Posts: {}", plan.posts.len());
    println!("  Projects: {}", plan.projects.len());
    println!();

    println!("🧭 Routes:");
    println!("   {} listing pages", plan.count(TemplateKind::ListingPage));
    println!("   {} blog posts", plan.count(TemplateKind::BlogPostPage));
    println!("   {} project pages", plan.count(TemplateKind::ProjectAboutPage));
    println!("   {} static pages", plan.count(TemplateKind::StaticPage));

    let manifest = RouteManifest {
        site: &site.config.site,
        page_size: site.config.build.page_size.get(),
        routes: &plan.routes,
    };
    let manifest_path = write_manifest(&output, &manifest)?;
    println!("   ✓ Wrote {}", manifest_path.display());

    println!();
    println!("✅ Build complete!");
    println!("   {} routes planned", plan.routes.len());
    println!();

    Ok(())
}

fn write_manifest(output: &Path, manifest: &RouteManifest<'_>) -> Result<PathBuf> {
    fs::create_dir_all(output).context("Failed to create output directory")?;
    let json = serde_json::to_string_pretty(manifest).context("Failed to serialize routes")?;
    let manifest_path = output.join(MANIFEST_FILE);
    fs::write(&manifest_path, json)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;
    Ok(manifest_path)
}
