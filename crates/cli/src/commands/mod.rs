pub mod build;
pub mod init;
pub mod routes;
pub mod validate;

use anyhow::{Context, Result};
use blog_kit_core::{SiteConfig, parse_site_toml};
use blog_kit_indexer::FsContentIndex;
use blog_kit_planner::{RoutePlan, plan_build};
use log::debug;
use std::path::Path;

pub const SITE_TOML: &str = "site.toml";

/// Everything a command needs about one site
pub struct LoadedSite {
    pub config: SiteConfig,
    pub index: FsContentIndex,
    pub plan: RoutePlan,
}

/// Load site.toml, index the content directory and plan every route.
///
/// Any failure aborts the whole command; nothing is written before this
/// returns successfully.
pub async fn load_site(path: &Path) -> Result<LoadedSite> {
    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let config_path = path.join(SITE_TOML);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'blog-kit init {}' first",
            SITE_TOML,
            path.display(),
            path.display()
        );
    }

    let config = parse_site_toml(&config_path).context("Failed to parse site.toml")?;
    debug!("Loaded {}", config_path.display());

    let content_root = path.join(&config.build.content_dir);
    let index = FsContentIndex::load(&content_root)
        .await
        .with_context(|| format!("Failed to index {}", content_root.display()))?;

    let plan = plan_build(&index, &config)
        .await
        .context("Failed to plan routes")?;

    Ok(LoadedSite {
        config,
        index,
        plan,
    })
}
