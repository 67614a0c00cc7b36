use crate::slug::normalize_url_path;
use blog_kit_core::{Error, Result, Route};
use std::collections::HashMap;

/// Ordered set of routes that refuses two routes with the same URL path.
#[derive(Debug, Default)]
pub struct RouteSet {
    routes: Vec<Route>,
    by_path: HashMap<String, usize>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route: Route) -> Result<()> {
        let key = normalize_url_path(&route.url_path);
        if let Some(&existing) = self.by_path.get(&key) {
            return Err(Error::DuplicateRoute {
                url_path: route.url_path.clone(),
                first: self.routes[existing].origin(),
                second: route.origin(),
            });
        }
        self.by_path.insert(key, self.routes.len());
        self.routes.push(route);
        Ok(())
    }

    pub fn extend(&mut self, routes: impl IntoIterator<Item = Route>) -> Result<()> {
        for route in routes {
            self.insert(route)?;
        }
        Ok(())
    }

    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }
}
