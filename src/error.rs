//! Errors raised while registering routes and navigating.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while routing.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A page pattern uses the segment reserved for not-found routes.
    #[error("route '{pattern}' uses the reserved not-found segment")]
    ReservedSegment { pattern: String },

    /// An accessor was used before the first navigation resolved.
    #[error("no active route, the router has not resolved a path yet")]
    NoActiveRoute,

    /// Resolution walked up to the root without finding a not-found route.
    #[error("no not-found route registered for '{path}', register a root not-found route before navigating")]
    NoNotFoundRoute { path: String },

    /// The matched pattern does not declare this parameter.
    #[error("route '{pattern}' has no parameter named '{name}'")]
    UnknownRouteParam { name: String, pattern: String },

    /// A declared parameter was not given a value while building a url.
    #[error("no value given for parameter '{name}' of route '{pattern}'")]
    MissingRouteParam { name: String, pattern: String },

    /// No registered route carries this name.
    #[error("no route named '{0}'")]
    UnknownRouteName(String),

    /// The layout handle is stale or belongs to another router.
    #[error("unknown layout")]
    UnknownLayout,

    /// A route was handed to the wrong pool.
    #[error("route '{pattern}' cannot be registered here, expected a {expected} path")]
    WrongPool { pattern: String, expected: &'static str },

    /// The navigation target could not be turned into a url.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A call into the browser failed.
    #[error("browser error: {0}")]
    Browser(String),

    /// The shared router is already borrowed.
    #[error("router is busy")]
    Busy,
}

impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Browser(format!("{:?}", value))
    }
}
