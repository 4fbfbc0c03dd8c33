//! Browser entry points.
//!
//! The page calls [`start_backdrop`] once, then drives theme changes through
//! [`set_backdrop_theme`] / [`toggle_backdrop_theme`]. Both forward into the
//! running event loop as [`BackdropEvent`]s.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use winit::event_loop::EventLoopProxy;

use super::{BackdropApp, BackdropEvent};
use crate::errors::{BackdropError, Result};
use crate::settings::BackdropSettings;
use crate::theme::{LocalStorageThemeStore, Theme};

const THEME_STORAGE_KEY: &str = "backdrop-theme";

thread_local! {
    static PROXY: RefCell<Option<EventLoopProxy<BackdropEvent>>> = const { RefCell::new(None) };
}

pub(crate) fn install_proxy(proxy: EventLoopProxy<BackdropEvent>) {
    PROXY.with(|slot| *slot.borrow_mut() = Some(proxy));
}

fn send(event: BackdropEvent) {
    PROXY.with(|slot| match slot.borrow().as_ref() {
        Some(proxy) => {
            if proxy.send_event(event).is_err() {
                log::warn!("Backdrop event loop closed; dropping {event:?}");
            }
        }
        None => log::warn!("Backdrop not started; dropping {event:?}"),
    });
}

/// Looks up the output canvas by element id.
pub(crate) fn find_canvas(id: &str) -> Result<web_sys::HtmlCanvasElement> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or_else(|| BackdropError::SurfaceMissing(id.to_string()))
}

/// The `data-theme` attribute of `<body>`, if the page sets one.
fn body_theme_attribute() -> Option<String> {
    web_sys::window()?.document()?.body()?.get_attribute("data-theme")
}

/// Starts the background with default settings. The initial theme comes from
/// the stored preference, else from `<body data-theme>`.
#[wasm_bindgen(js_name = startBackdrop)]
pub fn start_backdrop() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second call finds the logger already set.
    let _ = console_log::init_with_level(log::Level::Info);

    let fallback = Theme::from_attribute(body_theme_attribute().as_deref());
    let store = LocalStorageThemeStore::new(THEME_STORAGE_KEY);

    BackdropApp::new(BackdropSettings::default(), store, fallback)
        .run()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Switches to the named theme. Unknown names select the light theme.
#[wasm_bindgen(js_name = setBackdropTheme)]
pub fn set_backdrop_theme(name: &str) {
    send(BackdropEvent::SetTheme(Theme::parse(name)));
}

#[wasm_bindgen(js_name = toggleBackdropTheme)]
pub fn toggle_backdrop_theme() {
    send(BackdropEvent::ToggleTheme);
}
