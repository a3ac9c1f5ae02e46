#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use switchboard::{BrowserHistory, Detach, History, Route, RouterBuilder, Scope};
use wasm_bindgen_test::*;

use wasm_bindgen_test::wasm_bindgen_test_configure;
wasm_bindgen_test_configure!(run_in_browser);

type Page = &'static str;

fn init_logging() {
    // a second init fails, which is fine
    let _ = console_log::init_with_level(log::Level::Trace);
}

fn window() -> web_sys::Window {
    web_sys::window().expect("couldn't get window handle")
}

fn fire_popstate() {
    let event = web_sys::Event::new("popstate").expect("couldn't create popstate event");
    window()
        .dispatch_event(&event)
        .expect("couldn't dispatch popstate event");
}

#[wasm_bindgen_test]
fn push_state_changes_location() {
    init_logging();

    let mut history = BrowserHistory::new().expect("browser history");
    let url = history
        .location()
        .expect("location")
        .join("/switchboard/pushed?tab=one")
        .expect("valid url");
    history.push_state(&url).expect("push state");

    let location = history.location().expect("location");
    assert_eq!(location.path(), "/switchboard/pushed");
    assert_eq!(location.query(), Some("tab=one"));
}

#[wasm_bindgen_test]
fn set_title_changes_document_title() {
    init_logging();

    let mut history = BrowserHistory::new().expect("browser history");
    history.set_title("Switchboard").expect("set title");

    let document = window().document().expect("couldn't get document handle");
    assert_eq!(document.title(), "Switchboard");
}

#[wasm_bindgen_test]
fn popstate_syncs_the_router() {
    init_logging();

    let (navigator, mut listener) = RouterBuilder::default()
        .default_title("Browser")
        .attach::<Page>()
        .expect("attach");
    navigator.register_route_404(Scope::Router, Rc::new(Route::not_found("/", "404")));
    navigator.register_route(Scope::Router, Rc::new(Route::new("/browser/:id", "item")));

    navigator.navigate("/browser/7");
    let active = navigator.current_route().unwrap().expect("active route");
    assert_eq!(*active.route().payload(), "item");
    assert_eq!(active.param("id"), Ok("7"));
    assert_eq!(window().location().pathname().unwrap(), "/browser/7");

    // move history behind the router's back, then tell it
    let mut history = BrowserHistory::new().expect("browser history");
    let url = active.url().join("/browser/9").expect("valid url");
    history.push_state(&url).expect("push state");
    fire_popstate();

    let active = navigator.current_route().unwrap().expect("active route");
    assert_eq!(active.param("id"), Ok("9"));

    // a detached listener no longer follows history
    listener.detach();
    let url = active.url().join("/browser/11").expect("valid url");
    history.push_state(&url).expect("push state");
    fire_popstate();

    let active = navigator.current_route().unwrap().expect("active route");
    assert_eq!(active.param("id"), Ok("9"));
}

#[wasm_bindgen_test]
fn unmatched_path_shows_not_found() {
    init_logging();

    let (navigator, _listener) = RouterBuilder::default().attach::<Page>().expect("attach");
    navigator.register_route_404(Scope::Router, Rc::new(Route::not_found("/", "404")));
    navigator.navigate("/browser/nowhere/at/all");

    let active = navigator.current_route().unwrap().expect("active route");
    assert!(active.is_not_found());
    assert_eq!(active.path(), "/browser/nowhere/at/all");
}
