//! Drive a shared router from browser event handlers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::warn;

use crate::error::{Error, Result};
use crate::history::History;
use crate::route::{ActiveRoute, Route};
use crate::router::{Router, Scope};

/// A request queued on a [`Navigator`].
///
/// [`Navigator`]: struct.Navigator.html
pub enum Request<P> {
    /// See [`Router::switch_to`](../router/struct.Router.html#method.switch_to).
    SwitchTo {
        path: String,
        query: Vec<(String, String)>,
        push: bool,
    },
    /// See [`Router::refresh`](../router/struct.Router.html#method.refresh).
    Refresh { quick: bool },
    /// See [`Router::sync`](../router/struct.Router.html#method.sync).
    Sync,
    Register { scope: Scope, route: Rc<Route<P>> },
    Register404 { scope: Scope, route: Rc<Route<P>> },
    Unregister(Rc<Route<P>>),
}

/// A shared router handle.
///
/// Event handlers, popstate listeners and route observers all need to reach the router, and an
/// observer runs while the router is busy switching. Requests made while the router is borrowed
/// are queued and run, in order, by whoever currently holds it.
pub struct Navigator<P, H> {
    router: Rc<RefCell<Router<P, H>>>,
    pending: Rc<RefCell<VecDeque<Request<P>>>>,
}

impl<P, H> Clone for Navigator<P, H> {
    fn clone(&self) -> Self {
        Navigator {
            router: Rc::clone(&self.router),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<P, H> From<Router<P, H>> for Navigator<P, H> {
    fn from(router: Router<P, H>) -> Self {
        Navigator {
            router: Rc::new(RefCell::new(router)),
            pending: Rc::new(RefCell::new(VecDeque::new())),
        }
    }
}

impl<P, H: History> Navigator<P, H> {
    pub fn new(router: Router<P, H>) -> Self {
        Navigator::from(router)
    }

    /// Run a request now, or queue it if the router is busy.
    pub fn dispatch(&self, request: Request<P>) {
        // queue the request
        self.pending.borrow_mut().push_back(request);

        // try to borrow the router
        let mut router = match self.router.try_borrow_mut() {
            Ok(router) => router,
            // already borrowed, the current borrower will process the queue
            Err(_) => return,
        };

        // now process queued requests
        self.drain(&mut router);
    }

    /// Run queued requests until the queue is empty.
    fn drain(&self, router: &mut Router<P, H>) {
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let request = match next {
                Some(request) => request,
                None => break,
            };

            if let Err(e) = Self::run(router, request) {
                warn!("navigation request failed: {}", e);
            }
        }
    }

    fn run(router: &mut Router<P, H>, request: Request<P>) -> Result<()> {
        match request {
            Request::SwitchTo { path, query, push } => router.switch_to(&path, query, push).map(drop),
            Request::Refresh { quick } => router.refresh(quick).map(drop),
            Request::Sync => router.sync().map(drop),
            Request::Register { scope, route } => router.register_route(scope, route),
            Request::Register404 { scope, route } => router.register_route_404(scope, route),
            Request::Unregister(route) => {
                router.unregister_route(&route);
                Ok(())
            }
        }
    }

    pub fn switch_to<I, K, V>(&self, path: &str, query: I, push: bool)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.dispatch(Request::SwitchTo {
            path: path.to_string(),
            query: query.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            push,
        });
    }

    /// Switch to a path and push it to history, what a link click does.
    pub fn navigate(&self, path: &str) {
        self.switch_to(path, Vec::<(String, String)>::new(), true);
    }

    pub fn refresh(&self, quick: bool) {
        self.dispatch(Request::Refresh { quick });
    }

    /// Follow history after it moved on its own.
    pub fn sync(&self) {
        self.dispatch(Request::Sync);
    }

    pub fn register_route(&self, scope: impl Into<Scope>, route: Rc<Route<P>>) {
        self.dispatch(Request::Register {
            scope: scope.into(),
            route,
        });
    }

    pub fn register_route_404(&self, scope: impl Into<Scope>, route: Rc<Route<P>>) {
        self.dispatch(Request::Register404 {
            scope: scope.into(),
            route,
        });
    }

    pub fn unregister_route(&self, route: Rc<Route<P>>) {
        self.dispatch(Request::Unregister(route));
    }

    /// Use the router directly. Fails with [`Error::Busy`] while a request is running.
    ///
    /// Requests queued while `f` runs are processed before this returns.
    ///
    /// [`Error::Busy`]: ../error/enum.Error.html#variant.Busy
    pub fn with<R>(&self, f: impl FnOnce(&mut Router<P, H>) -> R) -> Result<R> {
        let mut router = self.router.try_borrow_mut().map_err(|_| Error::Busy)?;
        let result = f(&mut router);
        self.drain(&mut router);
        Ok(result)
    }

    /// The active route, `Ok(None)` before the first resolution.
    pub fn current_route(&self) -> Result<Option<Rc<ActiveRoute<P>>>> {
        let router = self.router.try_borrow().map_err(|_| Error::Busy)?;
        Ok(router.current_route().cloned())
    }
}
