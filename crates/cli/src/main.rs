mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use env_logger::Env;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-kit")]
#[command(version, about = "Route planner for static blog builds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize new site directory
    Init {
        /// Path to the site directory
        path: PathBuf,

        /// Site title
        #[arg(long)]
        title: Option<String>,

        /// Public URL of the site
        #[arg(long)]
        site_url: Option<String>,
    },

    /// Validate site configuration and content
    Validate {
        /// Path to the site directory
        path: PathBuf,
    },

    /// List every route the build would produce
    Routes {
        /// Path to the site directory
        path: PathBuf,

        /// Print routes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Plan the site and write the route manifest
    Build {
        /// Path to the site directory
        path: PathBuf,

        /// Output directory for routes.json
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or("BLOG_KIT_LOG", "warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            title,
            site_url,
        } => commands::init::run(path, title, site_url).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Routes { path, json } => commands::routes::run(path, json).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blog-kit", &mut io::stdout());
            Ok(())
        }
    }
}
