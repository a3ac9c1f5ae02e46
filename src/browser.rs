//! Web browser integration.
//!
//! [`BrowserHistory`] reads `window.location`, pushes to `window.history` and sets
//! `document.title`. [`PopstateListener`] resolves the router again whenever the user moves
//! through history with the back and forward buttons. Only one router should listen to
//! `popstate` at a time.
//!
//! [`BrowserHistory`]: struct.BrowserHistory.html
//! [`PopstateListener`]: struct.PopstateListener.html

use log::{debug, warn};
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::detach::Detach;
use crate::error::{Error, Result};
use crate::history::History;
use crate::navigator::Navigator;
use crate::router::RouterBuilder;

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| Error::Browser("couldn't get window handle".to_string()))
}

/// Session history of the browser window.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
    window: web_sys::Window,
}

impl BrowserHistory {
    pub fn new() -> Result<Self> {
        Ok(BrowserHistory { window: window()? })
    }
}

impl History for BrowserHistory {
    fn location(&self) -> Result<Url> {
        let href = self.window.location().href()?;
        Ok(Url::parse(&href)?)
    }

    fn push_state(&mut self, url: &Url) -> Result<()> {
        self.window
            .history()?
            .push_state_with_url(&JsValue::NULL, "", Some(url.as_str()))?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        match self.window.document() {
            Some(document) => document.set_title(title),
            None => warn!("couldn't get document handle, title not set"),
        }
        Ok(())
    }
}

/// A `popstate` listener syncing a router with the browser.
///
/// The listener is removed when detached or dropped.
pub struct PopstateListener {
    window: web_sys::Window,
    closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl PopstateListener {
    /// Start listening. Every `popstate` event calls [`Navigator::sync`].
    ///
    /// [`Navigator::sync`]: ../navigator/struct.Navigator.html#method.sync
    pub fn listen<P, H>(navigator: &Navigator<P, H>) -> Result<Self>
    where
        P: 'static,
        H: History + 'static,
    {
        let window = window()?;
        let navigator = navigator.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.prevent_default();
            navigator.sync();
        }) as Box<dyn FnMut(web_sys::Event)>);

        window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
        debug!("listening for popstate");

        Ok(PopstateListener {
            window,
            closure: Some(closure),
        })
    }
}

impl Detach for PopstateListener {
    fn detach(&mut self) {
        if let Some(closure) = self.closure.take() {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
            {
                warn!("failed to remove popstate listener: {:?}", e);
            }
        }
    }
}

impl Drop for PopstateListener {
    fn drop(&mut self) {
        self.detach();
    }
}

impl RouterBuilder {
    /// Build a router over the browser's history and listen for `popstate`.
    ///
    /// The router resolves the current location as soon as routes are registered. Keep the
    /// returned listener alive for as long as the router should follow the back and forward
    /// buttons.
    pub fn attach<P: 'static>(self) -> Result<(Navigator<P, BrowserHistory>, PopstateListener)> {
        let navigator = Navigator::new(self.build(BrowserHistory::new()?));
        let listener = PopstateListener::listen(&navigator)?;
        Ok((navigator, listener))
    }
}
