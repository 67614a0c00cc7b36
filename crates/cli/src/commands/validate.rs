use blog_kit_core::TemplateKind;
use std::path::PathBuf;

use super::load_site;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let site = load_site(&path).await?;
    let plan = &site.plan;

    println!("✓ site.toml valid");
    println!("  Site: {}", site.config.site.title);
    println!(
        "  Content: {} documents indexed in {}",
        site.index.documents().len(),
        site.index.root().display()
    );
    println!(
        "  Posts: {} ({} listing pages of {})",
        plan.posts.len(),
        plan.count(TemplateKind::ListingPage),
        site.config.build.page_size
    );
    println!("  Projects: {}", plan.projects.len());
    println!("  Static pages: {}", plan.count(TemplateKind::StaticPage));
    println!("✓ {} routes, no collisions", plan.routes.len());

    // Broken files outside every collection do not fail the build
    for error in site.index.load_errors() {
        println!("⚠ Ignored: {}", error);
    }

    Ok(())
}
