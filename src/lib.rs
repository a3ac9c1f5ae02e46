//! Client side routing for single page apps.
//!
//! Routes are registered with path patterns like `/users/:userId`. Navigating resolves the
//! requested path to the most recently registered matching route, extracts route and query
//! parameters and publishes a new [`ActiveRoute`] for the rest of the app to render.
//!
//! Paths nothing matches go to the nearest not-found route: a not-found route registered
//! under `/docs` handles `/docs/missing/page`, while `/other/missing` falls back to the root
//! not-found route. Every app must register a root not-found route.
//!
//! Routes come and go as the components declaring them mount and unmount. They can be
//! registered directly on the [`Router`] or in a [`Layout`], a nested scope that is torn down
//! with all of its routes.
//!
//! ```
//! use std::rc::Rc;
//! use switchboard::{MemoryHistory, Route, RouterBuilder, Scope};
//!
//! let mut router = RouterBuilder::default().build(MemoryHistory::default());
//! router.register_route_404(Scope::Router, Rc::new(Route::not_found("/", "not found"))).unwrap();
//! router.register_route(Scope::Router, Rc::new(Route::new("/users/:userId", "user"))).unwrap();
//!
//! let active = router.switch_to("/users/42", vec![("tab", "posts")], true).unwrap();
//! assert_eq!(*active.route().payload(), "user");
//! assert_eq!(router.get_route_param("userId").unwrap(), "42");
//! assert_eq!(router.get_query_param("tab").unwrap(), Some("posts"));
//! ```
//!
//! In the browser, [`RouterBuilder::attach`] builds a router over `window.history` that follows
//! the back and forward buttons.
//!
//! [`ActiveRoute`]: route/struct.ActiveRoute.html
//! [`Router`]: router/struct.Router.html
//! [`Layout`]: layout/struct.Layout.html
//! [`RouterBuilder::attach`]: router/struct.RouterBuilder.html#method.attach

pub mod browser;
pub mod detach;
pub mod error;
pub mod history;
pub mod layout;
pub mod navigator;
pub mod path;
pub mod query;
pub mod registry;
pub mod route;
pub mod router;

pub use crate::browser::{BrowserHistory, PopstateListener};
pub use crate::detach::Detach;
pub use crate::error::{Error, Result};
pub use crate::history::{History, MemoryHistory};
pub use crate::layout::{Layout, LayoutId};
pub use crate::navigator::{Navigator, Request};
pub use crate::path::{RoutePath, Segment, NOT_FOUND_SEGMENT};
pub use crate::registry::{Resolved, RouteRegistry};
pub use crate::route::{ActiveRoute, Params, Route};
pub use crate::router::{Router, RouterBuilder, RouterOptions, Scope, SubscriptionId};
