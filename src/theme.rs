// Mirrors the system light/dark preference onto <html data-color-scheme="...">

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Window};

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";
const ATTRIBUTE: &str = "data-color-scheme";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn from_prefers_dark(prefers_dark: bool) -> ColorScheme {
        if prefers_dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

// Browsers without matchMedia fall back to light
fn preferred_scheme(window: &Window) -> ColorScheme {
    let prefers_dark = match window.match_media(DARK_QUERY) {
        Ok(Some(query)) => query.matches(),
        _ => false,
    };
    ColorScheme::from_prefers_dark(prefers_dark)
}

fn apply(window: &Window) -> Result<ColorScheme, JsValue> {
    let root = window
        .document()
        .and_then(|d| d.document_element())
        .ok_or_else(|| JsValue::from_str("no document element"))?;
    let scheme = preferred_scheme(window);
    root.set_attribute(ATTRIBUTE, scheme.as_str())?;
    Ok(scheme)
}

#[wasm_bindgen]
pub fn detect_theme() -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let scheme = apply(&window)?;
    console::log_1(&format!("color scheme: {}", scheme.as_str()).into());
    Ok(scheme.as_str().to_owned())
}

// Applies the current preference and re-applies it whenever the system setting flips
#[wasm_bindgen]
pub fn watch_theme() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    apply(&window)?;

    let query = match window.match_media(DARK_QUERY)? {
        Some(query) => query,
        None => return Ok(()),
    };
    let on_change = Closure::wrap(Box::new(move || {
        if let Err(e) = apply(&window) {
            console::error_2(&"failed to apply color scheme:".into(), &e);
        }
    }) as Box<dyn FnMut()>);
    query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}
