pub mod config;
pub mod error;
pub mod query;
pub mod types;

pub use config::{SiteConfig, parse_site_toml};
pub use error::{Error, Result};
pub use query::{ContentQuery, ContentSource, ErrorList, QueryError};
pub use types::*;
