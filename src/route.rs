//! Registered routes and the snapshot of the route currently shown.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use url::Url;

use crate::error::{Error, Result};
use crate::layout::LayoutId;
use crate::path::RoutePath;

/// Parameter name to value.
pub type Params = BTreeMap<String, String>;

/// A route in the application, not necessarily the active one.
///
/// Routes are shared as `Rc<Route<P>>` and identified by pointer, two routes with the same
/// pattern are still different routes. The payload is whatever the host needs to render the
/// route and is never inspected here.
pub struct Route<P> {
    path: RoutePath,
    name: Option<String>,
    title: Option<String>,
    parents: Vec<String>,
    payload: P,
}

impl<P> Route<P> {
    /// A page route for the given pattern, e.g. `/users/:userId`.
    pub fn new(pattern: &str, payload: P) -> Self {
        Route::from_path(RoutePath::from_string(pattern, false), payload)
    }

    /// A not-found route taking over for unmatched paths below `prefix`.
    pub fn not_found(prefix: &str, payload: P) -> Self {
        Route::from_path(RoutePath::not_found_at(prefix), payload)
    }

    pub fn from_path(path: RoutePath, payload: P) -> Self {
        Route {
            path,
            name: None,
            title: None,
            parents: vec![],
            payload,
        }
    }

    /// Name the route so it can be found with `route_by_name` and `url_for`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Page title to show while this route is active.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Names of the routes above this one, outermost first.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn is_not_found(&self) -> bool {
        self.path.is_not_found()
    }
}

impl<P> fmt::Debug for Route<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path.to_string())
            .field("not_found", &self.path.is_not_found())
            .field("name", &self.name)
            .finish()
    }
}

/// The resolved navigation state.
///
/// A new value is built for every navigation, so observers can compare the old and new
/// snapshot by pointer to detect a change.
pub struct ActiveRoute<P> {
    pub(crate) route: Rc<Route<P>>,
    pub(crate) layout: Option<LayoutId>,
    pub(crate) path: String,
    pub(crate) params: Params,
    pub(crate) query_params: Params,
    pub(crate) url: Url,
}

impl<P> ActiveRoute<P> {
    /// The matched route, a not-found route when nothing else matched.
    pub fn route(&self) -> &Rc<Route<P>> {
        &self.route
    }

    /// The layout the matched route was registered in, `None` for the router itself.
    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    /// The requested path, relative to the base path.
    ///
    /// This differs from the route's own pattern when the route is a not-found route.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameters declared with `:name` in the pattern.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Parameters from the query string.
    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    /// The full url written to history.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_not_found(&self) -> bool {
        self.route.is_not_found()
    }

    /// A route parameter by name.
    ///
    /// Asking for a name the matched pattern does not declare is an error, the names are known
    /// from the pattern.
    pub fn param(&self, name: &str) -> Result<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownRouteParam {
                name: name.to_string(),
                pattern: self.route.path().to_string(),
            })
    }

    /// A query parameter by name, query parameters are optional.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// The app relative path with query string and fragment, as `refresh` replays it.
    pub(crate) fn target(&self) -> String {
        let mut target = self.path.clone();
        if let Some(query) = self.url.query() {
            target.push('?');
            target.push_str(query);
        }
        if let Some(fragment) = self.url.fragment() {
            target.push('#');
            target.push_str(fragment);
        }
        target
    }
}

impl<P> PartialEq for ActiveRoute<P> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.route, &other.route)
            && self.layout == other.layout
            && self.path == other.path
            && self.params == other.params
            && self.query_params == other.query_params
            && self.url == other.url
    }
}

impl<P> fmt::Debug for ActiveRoute<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ActiveRoute")
            .field("route", &self.route)
            .field("layout", &self.layout)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("query_params", &self.query_params)
            .field("url", &self.url.as_str())
            .finish()
    }
}
