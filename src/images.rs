// Image states: lazy images get `loaded` once scrolled into view, every image
// shows a spinner until it settles, and broken images are greyed out with a notice.

use crate::reveal::{self, ObserveOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, Event, HtmlElement, HtmlImageElement};

pub const LAZY_SELECTOR: &str = "img[loading=\"lazy\"]";
pub const LAZY_CLASS: &str = "loaded";
pub const ERROR_TEXT: &str = "Image indisponible";

const SPIN_STYLE_ID: &str = "image-spinner-keyframes";
const SPIN_KEYFRAMES: &str = "
    @keyframes spin {
        0% { transform: translate(-50%, -50%) rotate(0deg); }
        100% { transform: translate(-50%, -50%) rotate(360deg); }
    }
";

const SPINNER_CSS: &str = "
    position: absolute;
    top: 50%;
    left: 50%;
    transform: translate(-50%, -50%);
    width: 40px;
    height: 40px;
    border: 3px solid var(--color-secondary);
    border-top: 3px solid var(--color-primary);
    border-radius: 50%;
    animation: spin 1s linear infinite;
    z-index: 5;
";

const ERROR_CSS: &str = "
    position: absolute;
    top: 50%;
    left: 50%;
    transform: translate(-50%, -50%);
    background: var(--color-surface);
    padding: 10px;
    border-radius: 6px;
    font-size: 12px;
    color: var(--color-error);
    text-align: center;
    border: 1px solid var(--color-error);
    z-index: 10;
";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

impl LoadOutcome {
    pub fn from_event(event_type: &str) -> Option<LoadOutcome> {
        match event_type {
            "load" => Some(LoadOutcome::Loaded),
            "error" => Some(LoadOutcome::Failed),
            _ => None,
        }
    }

    // Inline style applied to the image itself once it settles
    pub fn image_style(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            LoadOutcome::Loaded => &[],
            LoadOutcome::Failed => &[("opacity", "0.3"), ("filter", "grayscale(100%)")],
        }
    }

    pub fn shows_notice(&self) -> bool {
        *self == LoadOutcome::Failed
    }
}

// An image that has already finished decoding fires no further load event
fn already_loaded(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0
}

fn ensure_spin_keyframes(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(SPIN_STYLE_ID).is_some() {
        return Ok(());
    }
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?;
    let style = document.create_element("style")?;
    style.set_id(SPIN_STYLE_ID);
    style.set_text_content(Some(SPIN_KEYFRAMES));
    head.append_child(&style)?;
    Ok(())
}

fn settle(
    document: &Document,
    img: &HtmlElement,
    spinner: Option<&Element>,
    outcome: LoadOutcome,
) -> Result<(), JsValue> {
    if let Some(spinner) = spinner {
        spinner.remove();
    }
    let style = img.style();
    for (property, value) in outcome.image_style() {
        style.set_property(property, value)?;
    }
    if outcome.shows_notice() {
        if let Some(container) = img.parent_element() {
            let notice = document.create_element("div")?;
            notice.set_attribute("style", ERROR_CSS)?;
            notice.set_text_content(Some(ERROR_TEXT));
            set_relative(&container)?;
            container.append_child(&notice)?;
        }
    }
    Ok(())
}

fn set_relative(container: &Element) -> Result<(), JsValue> {
    match container.dyn_ref::<HtmlElement>() {
        Some(el) => el.style().set_property("position", "relative"),
        None => Ok(()),
    }
}

// Spinner plus load/error handlers for one image
pub fn track(document: &Document, img: &HtmlImageElement) -> Result<(), JsValue> {
    let spinner = match img.parent_element() {
        Some(container) if !already_loaded(img) => {
            let spinner = document.create_element("div")?;
            spinner.set_attribute("style", SPINNER_CSS)?;
            set_relative(&container)?;
            container.append_child(&spinner)?;
            Some(spinner)
        }
        _ => None,
    };

    for event_type in ["load", "error"].iter() {
        let document = document.clone();
        let target: HtmlElement = img.clone().into();
        let spinner = spinner.clone();
        let handler = Closure::wrap(Box::new(move |event: Event| {
            let outcome = match LoadOutcome::from_event(&event.type_()) {
                Some(outcome) => outcome,
                None => return,
            };
            if let Err(e) = settle(&document, &target, spinner.as_ref(), outcome) {
                console::error_2(&"image state update failed:".into(), &e);
            }
        }) as Box<dyn FnMut(Event)>);
        img.add_event_listener_with_callback(event_type, handler.as_ref().unchecked_ref())?;
        handler.forget();
    }
    Ok(())
}

#[wasm_bindgen]
pub fn install_images() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let lazy = reveal::elements(&document, LAZY_SELECTOR)?;
    reveal::observe_once(&lazy, &ObserveOptions::browser_default(), LAZY_CLASS)?;

    ensure_spin_keyframes(&document)?;
    let images = reveal::elements(&document, "img")?;
    for img in &images {
        if let Some(img) = img.dyn_ref::<HtmlImageElement>() {
            track(&document, img)?;
        }
    }
    console::log_1(&format!("tracking {} images, {} lazy", images.len(), lazy.len()).into());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_map_to_outcomes() {
        assert_eq!(LoadOutcome::from_event("load"), Some(LoadOutcome::Loaded));
        assert_eq!(LoadOutcome::from_event("error"), Some(LoadOutcome::Failed));
        assert_eq!(LoadOutcome::from_event("abort"), None);
    }

    #[test]
    fn only_failures_are_greyed_out() {
        assert!(LoadOutcome::Loaded.image_style().is_empty());
        assert!(!LoadOutcome::Loaded.shows_notice());
        assert_eq!(
            LoadOutcome::Failed.image_style(),
            &[("opacity", "0.3"), ("filter", "grayscale(100%)")]
        );
        assert!(LoadOutcome::Failed.shows_notice());
    }
}
