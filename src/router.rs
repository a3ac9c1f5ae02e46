//! The navigation controller.
//!
//! A [`Router`] owns every registration scope, tracks the single active route and talks to
//! session history. It is either *uninitialized*, before any path resolved, or *resolved*, with
//! an [`ActiveRoute`] consistent with the registered routes and the current location.
//!
//! Resolution is never cached. Each navigation looks at the registries as they are at that
//! moment, so registering a route and navigating right after always sees the new route.
//!
//! [`Router`]: struct.Router.html
//! [`ActiveRoute`]: ../route/struct.ActiveRoute.html

use std::rc::Rc;

use log::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::history::History;
use crate::layout::{Layout, LayoutId, Layouts};
use crate::query;
use crate::registry::{self, Resolved, RouteRegistry, Scoped};
use crate::route::{ActiveRoute, Params, Route};

/// Frozen router configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterOptions {
    /// Title used when the active route has none.
    pub default_title: String,
    /// Prefix the app is served under, empty or starting with `/` without a trailing `/`.
    pub base_path: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        RouterOptions {
            default_title: "App".to_string(),
            base_path: String::new(),
        }
    }
}

/// Struct used to configure and build a [`Router`].
///
/// [`Router`]: struct.Router.html
#[derive(Debug, Clone, Default)]
pub struct RouterBuilder {
    options: RouterOptions,
}

impl RouterBuilder {
    /// Title shown for routes without a title of their own.
    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.options.default_title = title.into();
        self
    }

    /// Serve the app under a path prefix such as `/app`.
    pub fn base_path(mut self, base_path: &str) -> Self {
        let base_path = base_path.trim_matches('/');
        self.options.base_path = if base_path.is_empty() {
            String::new()
        } else {
            format!("/{}", base_path)
        };
        self
    }

    /// Build a router on top of the given history.
    pub fn build<P, H: History>(self, history: H) -> Router<P, H> {
        Router::new(self.options, history)
    }
}

/// Where a route is registered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Directly on the router.
    Router,
    /// In a layout.
    Layout(LayoutId),
}

impl From<LayoutId> for Scope {
    fn from(id: LayoutId) -> Self {
        Scope::Layout(id)
    }
}

/// Handle returned by [`Router::subscribe`].
///
/// [`Router::subscribe`]: struct.Router.html#method.subscribe
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Observer<P> = Box<dyn FnMut(Option<&ActiveRoute<P>>, &ActiveRoute<P>)>;

/// A router used to switch between routes in an application.
pub struct Router<P, H> {
    options: RouterOptions,
    history: H,
    root: RouteRegistry<P>,
    layouts: Layouts<P>,
    current: Option<Rc<ActiveRoute<P>>>,
    next_seq: u64,
    observers: Vec<(SubscriptionId, Observer<P>)>,
    next_subscription: usize,
}

impl<P, H: History> Router<P, H> {
    pub fn new(options: RouterOptions, history: H) -> Self {
        Router {
            options,
            history,
            root: RouteRegistry::new(),
            layouts: Layouts::new(),
            current: None,
            next_seq: 0,
            observers: vec![],
            next_subscription: 0,
        }
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Direct access to history, e.g. to move a [`MemoryHistory`] back before calling [`sync`].
    ///
    /// [`MemoryHistory`]: ../history/struct.MemoryHistory.html
    /// [`sync`]: #method.sync
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Register a page route.
    ///
    /// If nothing is active yet, or the active route is a not-found route, the current path is
    /// resolved again so a late route can claim it.
    pub fn register_route(&mut self, scope: impl Into<Scope>, route: Rc<Route<P>>) -> Result<()> {
        if route.is_not_found() {
            return Err(Error::WrongPool {
                pattern: route.path().to_string(),
                expected: "page",
            });
        }

        if route.path().has_reserved_segment() {
            return Err(Error::ReservedSegment {
                pattern: route.path().to_string(),
            });
        }

        let scope = scope.into();
        self.insert(scope, Rc::clone(&route))?;
        debug!("registered route {} in {:?}", route.path(), scope);

        if self.showing_not_found() {
            self.reresolve();
        }
        Ok(())
    }

    /// Register a not-found route, built with [`Route::not_found`].
    ///
    /// Registered in a layout, it also becomes that layout's not-found route.
    ///
    /// [`Route::not_found`]: ../route/struct.Route.html#method.not_found
    pub fn register_route_404(&mut self, scope: impl Into<Scope>, route: Rc<Route<P>>) -> Result<()> {
        if !route.is_not_found() {
            return Err(Error::WrongPool {
                pattern: route.path().to_string(),
                expected: "not-found",
            });
        }

        let scope = scope.into();
        self.insert(scope, Rc::clone(&route))?;
        if let Scope::Layout(id) = scope {
            if let Some(layout) = self.layouts.get_mut(id) {
                layout.set_not_found_route(Some(Rc::clone(&route)));
            }
        }
        debug!("registered not-found route {} in {:?}", route.path(), scope);

        if self.showing_not_found() {
            self.reresolve();
        }
        Ok(())
    }

    /// Remove a route from whichever scope holds it. Returns false if it was not registered.
    ///
    /// If the route is the active one, the current path is resolved again and usually ends up
    /// on a not-found route.
    pub fn unregister_route(&mut self, route: &Rc<Route<P>>) -> bool {
        let removed = self.root.remove(route)
            || self.layouts.iter_mut().any(|layout| {
                if !layout.registry_mut().remove(route) {
                    return false;
                }
                let still_current = layout
                    .not_found_route()
                    .map_or(false, |nf| !Rc::ptr_eq(nf, route));
                if !still_current {
                    let fallback = layout.registry().not_found_routes().last().cloned();
                    layout.set_not_found_route(fallback);
                }
                true
            });

        if !removed {
            return false;
        }
        debug!("unregistered route {}", route.path());

        let was_active = self
            .current
            .as_ref()
            .map_or(false, |active| Rc::ptr_eq(active.route(), route));
        if was_active {
            self.reresolve();
        }
        true
    }

    /// Create a layout scope under `parent`, or at the top when `parent` is `None`.
    pub fn create_layout(&mut self, parent: Option<LayoutId>, path: &str, payload: Option<P>) -> Result<LayoutId> {
        let id = self
            .layouts
            .insert(parent, path, payload)
            .ok_or(Error::UnknownLayout)?;
        debug!("created layout {:?} at {}", id, path);
        Ok(id)
    }

    /// Destroy a layout and drop every route registered in it.
    ///
    /// Sibling and child layouts keep their routes. If the active route came from this layout
    /// the current path is resolved again.
    pub fn destroy_layout(&mut self, id: LayoutId) -> Result<()> {
        let mut layout = self.layouts.remove(id).ok_or(Error::UnknownLayout)?;
        let routes = layout.registry_mut().drain();
        debug!("destroyed layout {:?} with {} routes", id, routes.len());

        let was_active = self
            .current
            .as_ref()
            .map_or(false, |active| active.layout() == Some(id));
        if was_active {
            self.reresolve();
        }
        Ok(())
    }

    pub fn layout(&self, id: LayoutId) -> Option<&Layout<P>> {
        self.layouts.get(id)
    }

    pub fn layouts(&self) -> &Layouts<P> {
        &self.layouts
    }

    /// The live layouts from the outermost down to `id`.
    pub fn layout_chain(&self, id: LayoutId) -> Vec<LayoutId> {
        self.layouts.chain(id)
    }

    /// Resolve a path to a route and the scope holding it.
    pub fn resolve(&self, path: &str) -> Result<Resolved<P>> {
        registry::resolve(&self.scopes(), path)
    }

    /// Get a route by path, falling back to the closest not-found route.
    pub fn get_route(&self, path: &str) -> Result<Rc<Route<P>>> {
        self.resolve(path).map(|resolved| resolved.route)
    }

    /// Every registered page route in registration order. Not-found routes are left out.
    pub fn get_all_routes(&self) -> Vec<Rc<Route<P>>> {
        let mut entries: Vec<_> = std::iter::once(&self.root)
            .chain(self.layouts.iter().map(|(_, layout)| layout.registry()))
            .flat_map(RouteRegistry::entries)
            .collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| Rc::clone(&entry.route)).collect()
    }

    /// The most recently registered page route with this name.
    pub fn route_by_name(&self, name: &str) -> Result<Rc<Route<P>>> {
        self.get_all_routes()
            .into_iter()
            .rev()
            .find(|route| route.name() == Some(name))
            .ok_or_else(|| Error::UnknownRouteName(name.to_string()))
    }

    /// Build the path of a named route.
    pub fn url_for(&self, name: &str, params: &Params) -> Result<String> {
        self.route_by_name(name)?.path().format(params)
    }

    /// Extract the route parameters the given path would produce.
    pub fn create_params(&self, path: &str) -> Result<Params> {
        Ok(self.get_route(path)?.path().params(path))
    }

    /// Switch to a route.
    ///
    /// `path` is relative to the base path and may carry a query string. Keys in `query_params`
    /// replace the same keys from that query string, other keys are kept. With
    /// `push_new_state` the new url is pushed to history, otherwise the switch is silent.
    pub fn switch_to<I, K, V>(&mut self, path: &str, query_params: I, push_new_state: bool) -> Result<Rc<ActiveRoute<P>>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut url = self.build_url(path)?;
        let path = self.strip_base(url.path()).to_string();
        let Resolved { route, layout } = self.resolve(&path)?;

        query::set_query(&mut url, query_params);

        let active = Rc::new(ActiveRoute {
            params: route.path().params(&path),
            query_params: query::query_params(&url),
            route,
            layout,
            path,
            url,
        });

        if push_new_state {
            self.history.push_state(active.url())?;
        }

        let title = active.route().title().unwrap_or(self.options.default_title.as_str());
        if let Err(e) = self.history.set_title(title) {
            warn!("failed to set title '{}': {}", title, e);
        }

        debug!(
            "switched to {} ({}{})",
            active.url(),
            active.route().path(),
            if push_new_state { ", pushed" } else { "" }
        );

        self.publish(Rc::clone(&active));
        Ok(active)
    }

    /// Switch to a path and push it to history.
    pub fn navigate(&mut self, path: &str) -> Result<Rc<ActiveRoute<P>>> {
        self.switch_to(path, Params::new(), true)
    }

    /// Switch to the current route again. A quick refresh does not push to history.
    pub fn refresh(&mut self, quick: bool) -> Result<Rc<ActiveRoute<P>>> {
        let current = self.current.clone().ok_or(Error::NoActiveRoute)?;
        // the target already carries the query string as it was
        self.switch_to(&current.target(), Params::new(), !quick)
    }

    /// Switch to whatever history currently points at, without pushing.
    ///
    /// This is what a `popstate` event does: history has already moved.
    pub fn sync(&mut self) -> Result<Rc<ActiveRoute<P>>> {
        let location = self.history.location()?;
        let target = self.location_target(&location);
        self.switch_to(&target, Params::new(), false)
    }

    /// The active route, `None` before the first resolution.
    pub fn current_route(&self) -> Option<&Rc<ActiveRoute<P>>> {
        self.current.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.current.is_some()
    }

    /// A parameter of the active route's pattern.
    pub fn get_route_param(&self, name: &str) -> Result<&str> {
        self.active()?.param(name)
    }

    /// A query parameter of the active route, `Ok(None)` when absent.
    pub fn get_query_param(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.active()?.query_param(name))
    }

    /// Call `observer` with the old and new route after every switch.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(Option<&ActiveRoute<P>>, &ActiveRoute<P>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer, _)| *observer != id);
        self.observers.len() != before
    }

    fn active(&self) -> Result<&ActiveRoute<P>> {
        self.current.as_deref().ok_or(Error::NoActiveRoute)
    }

    fn showing_not_found(&self) -> bool {
        self.current
            .as_ref()
            .map_or(true, |active| active.is_not_found())
    }

    fn scopes(&self) -> Vec<Scoped<P>> {
        std::iter::once((None, &self.root))
            .chain(
                self.layouts
                    .iter()
                    .map(|(id, layout)| (Some(id), layout.registry())),
            )
            .collect()
    }

    fn insert(&mut self, scope: Scope, route: Rc<Route<P>>) -> Result<()> {
        let registry = match scope {
            Scope::Router => &mut self.root,
            Scope::Layout(id) => self
                .layouts
                .get_mut(id)
                .ok_or(Error::UnknownLayout)?
                .registry_mut(),
        };
        registry.push(self.next_seq, route);
        self.next_seq += 1;
        Ok(())
    }

    /// Resolve the current path again without pushing to history.
    fn reresolve(&mut self) {
        let target = match &self.current {
            Some(active) => Ok(active.target()),
            None => self
                .history
                .location()
                .map(|location| self.location_target(&location)),
        };

        match target.and_then(|target| self.switch_to(&target, Params::new(), false)) {
            Ok(_) => {}
            Err(Error::NoNotFoundRoute { ref path }) if self.current.is_none() => {
                debug!("'{}' stays unresolved until a not-found route is registered", path);
            }
            Err(e) => warn!("failed to resolve the current path again: {}", e),
        }
    }

    /// Build the url for an app relative target on the current origin.
    fn build_url(&self, target: &str) -> Result<Url> {
        let (target, fragment) = match target.split_once('#') {
            Some((target, fragment)) => (target, Some(fragment)),
            None => (target, None),
        };
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        let mut url = self.history.location()?;
        if path.starts_with('/') {
            url.set_path(&format!("{}{}", self.options.base_path, path));
        } else {
            url.set_path(&format!("{}/{}", self.options.base_path, path));
        }
        url.set_query(query);
        url.set_fragment(fragment);
        Ok(url)
    }

    /// Strip the base path. Paths outside the base are left alone.
    fn strip_base<'a>(&self, path: &'a str) -> &'a str {
        let base = self.options.base_path.as_str();
        if base.is_empty() {
            return path;
        }
        match path.strip_prefix(base) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }

    /// The app relative target of a location.
    fn location_target(&self, location: &Url) -> String {
        let mut target = self.strip_base(location.path()).to_string();
        if let Some(query) = location.query() {
            target.push('?');
            target.push_str(query);
        }
        if let Some(fragment) = location.fragment() {
            target.push('#');
            target.push_str(fragment);
        }
        target
    }

    fn publish(&mut self, active: Rc<ActiveRoute<P>>) {
        let old = self.current.replace(Rc::clone(&active));
        for (_, observer) in self.observers.iter_mut() {
            observer(old.as_deref(), active.as_ref());
        }
    }
}
