//! Route planning for a static blog build.
//!
//! Turns the results of the content queries into the complete, ordered set
//! of routes the page renderer materializes: paginated listing pages, one
//! page per blog post, one "about" page per project, and the fixed pages
//! named in `site.toml`. Everything except [`plan_build`] is a pure
//! function of its inputs.

pub mod detail;
pub mod listing;
pub mod route_set;
pub mod site;
pub mod slug;

pub use detail::{plan_detail_routes, resolve_slug};
pub use listing::plan_listing_routes;
pub use route_set::RouteSet;
pub use site::{RoutePlan, plan_build, plan_routes, plan_static_routes};
pub use slug::derive_slug;
