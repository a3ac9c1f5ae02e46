//! Ordered route pools and the lookup over them.
//!
//! Every registration scope (the router itself and each layout) owns a [`RouteRegistry`] with two
//! pools: page routes and not-found routes. Registrations carry a sequence number handed out by
//! the router, so lookups across several scopes can still pick the most recently registered
//! match. Registration order breaks ties, pattern specificity plays no part.
//!
//! [`RouteRegistry`]: struct.RouteRegistry.html

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::layout::LayoutId;
use crate::path::{concat_paths, split_path, NOT_FOUND_SEGMENT};
use crate::route::Route;

pub(crate) struct Entry<P> {
    pub(crate) seq: u64,
    pub(crate) route: Rc<Route<P>>,
}

/// The routes registered by one scope, in registration order.
pub struct RouteRegistry<P> {
    routes: Vec<Entry<P>>,
    not_found_routes: Vec<Entry<P>>,
}

impl<P> Default for RouteRegistry<P> {
    fn default() -> Self {
        RouteRegistry {
            routes: vec![],
            not_found_routes: vec![],
        }
    }
}

impl<P> RouteRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route to the pool matching its path kind.
    pub(crate) fn push(&mut self, seq: u64, route: Rc<Route<P>>) {
        let entry = Entry { seq, route };
        if entry.route.is_not_found() {
            self.not_found_routes.push(entry);
        } else {
            self.routes.push(entry);
        }
    }

    /// Remove a route by identity. Returns false if it was not registered here.
    pub fn remove(&mut self, route: &Rc<Route<P>>) -> bool {
        let pool = if route.is_not_found() {
            &mut self.not_found_routes
        } else {
            &mut self.routes
        };

        match pool.iter().position(|entry| Rc::ptr_eq(&entry.route, route)) {
            Some(index) => {
                pool.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, route: &Rc<Route<P>>) -> bool {
        self.routes
            .iter()
            .chain(self.not_found_routes.iter())
            .any(|entry| Rc::ptr_eq(&entry.route, route))
    }

    /// Page routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Rc<Route<P>>> {
        self.routes.iter().map(|entry| &entry.route)
    }

    /// Not-found routes in registration order.
    pub fn not_found_routes(&self) -> impl Iterator<Item = &Rc<Route<P>>> {
        self.not_found_routes.iter().map(|entry| &entry.route)
    }

    pub fn len(&self) -> usize {
        self.routes.len() + self.not_found_routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry<P>> {
        self.routes.iter()
    }

    /// Most recently registered page route matching the path.
    pub(crate) fn find(&self, path: &str) -> Option<&Entry<P>> {
        self.routes.iter().rev().find(|entry| entry.route.path().matches(path))
    }

    /// Most recently registered not-found route matching the lookup key.
    pub(crate) fn find_not_found(&self, key: &str) -> Option<&Entry<P>> {
        self.not_found_routes
            .iter()
            .rev()
            .find(|entry| entry.route.path().matches(key))
    }

    /// Empty both pools, returning the routes that were registered.
    pub(crate) fn drain(&mut self) -> Vec<Rc<Route<P>>> {
        self.routes
            .drain(..)
            .chain(self.not_found_routes.drain(..))
            .map(|entry| entry.route)
            .collect()
    }
}

/// A route picked by resolution, with the scope it was registered in.
pub struct Resolved<P> {
    pub route: Rc<Route<P>>,
    pub layout: Option<LayoutId>,
}

/// A registry and the layout owning it, `None` for the router.
pub(crate) type Scoped<'a, P> = (Option<LayoutId>, &'a RouteRegistry<P>);

/// Find the route for a concrete path.
///
/// The most recently registered page route matching the path wins. Without one, the closest
/// not-found route is used.
pub(crate) fn resolve<P>(scopes: &[Scoped<P>], path: &str) -> Result<Resolved<P>> {
    match latest(scopes, |registry| registry.find(path)) {
        Some(resolved) => Ok(resolved),
        None => closest_not_found(scopes, path),
    }
}

/// Find the not-found route nearest to the path.
///
/// Walks from the full path up to the root, at each depth looking for a not-found route
/// registered under that prefix.
pub(crate) fn closest_not_found<P>(scopes: &[Scoped<P>], path: &str) -> Result<Resolved<P>> {
    let parts = split_path(path);

    (0..=parts.len())
        .rev()
        .find_map(|depth| {
            let key = concat_paths(&parts[..depth].join("/"), &[NOT_FOUND_SEGMENT]);
            latest(scopes, |registry| registry.find_not_found(&key))
        })
        .ok_or_else(|| Error::NoNotFoundRoute {
            path: path.to_string(),
        })
}

fn latest<'a, P, F>(scopes: &[Scoped<'a, P>], find: F) -> Option<Resolved<P>>
where
    F: Fn(&'a RouteRegistry<P>) -> Option<&'a Entry<P>>,
{
    scopes
        .iter()
        .filter_map(|&(layout, registry)| find(registry).map(|entry| (layout, entry)))
        .max_by_key(|(_, entry)| entry.seq)
        .map(|(layout, entry)| Resolved {
            route: Rc::clone(&entry.route),
            layout,
        })
}
