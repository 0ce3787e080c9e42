// Scroll-triggered reveal: content blocks get `animate-on-scroll` the first time
// they enter the viewport, after which they are no longer watched.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    console, Document, Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

pub const REVEAL_SELECTORS: [&str; 6] = [
    ".character-content",
    ".timeline-item",
    ".achievement-card",
    ".ambition-item",
    ".technique-card",
    ".section-header",
];

pub const REVEAL_CLASS: &str = "animate-on-scroll";

// One selector group matching every animated block
pub fn selector_list() -> String {
    REVEAL_SELECTORS.join(", ")
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObserveOptions {
    pub threshold: Option<f64>,
    pub root_margin: Option<&'static str>,
}

impl ObserveOptions {
    // Browser defaults: any visible pixel, no margin
    pub fn browser_default() -> Self {
        ObserveOptions {
            threshold: None,
            root_margin: None,
        }
    }

    // A tenth of the block visible, and at least 50px above the bottom edge
    pub fn reveal() -> Self {
        ObserveOptions {
            threshold: Some(0.1),
            root_margin: Some("0px 0px -50px 0px"),
        }
    }

    pub fn to_init(&self) -> IntersectionObserverInit {
        let init = IntersectionObserverInit::new();
        if let Some(threshold) = self.threshold {
            init.set_threshold(&JsValue::from_f64(threshold));
        }
        if let Some(margin) = self.root_margin {
            init.set_root_margin(margin);
        }
        init
    }
}

// Adds `class` to each element the first time it intersects, then unobserves it
pub fn observe_once(
    elements: &[Element],
    options: &ObserveOptions,
    class: &'static str,
) -> Result<IntersectionObserver, JsValue> {
    let on_intersect = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry = match entry.dyn_into::<IntersectionObserverEntry>() {
                    Ok(entry) => entry,
                    Err(_) => continue,
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Err(e) = target.class_list().add_1(class) {
                    console::error_2(&"failed to mark element:".into(), &e);
                }
                observer.unobserve(&target);
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let observer = IntersectionObserver::new_with_options(
        on_intersect.as_ref().unchecked_ref(),
        &options.to_init(),
    )?;
    on_intersect.forget();

    for el in elements {
        observer.observe(el);
    }
    Ok(observer)
}

pub fn elements(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

#[wasm_bindgen]
pub fn install_reveal() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let blocks = elements(&document, &selector_list())?;
    observe_once(&blocks, &ObserveOptions::reveal(), REVEAL_CLASS)?;
    console::log_1(&format!("watching {} blocks for reveal", blocks.len()).into());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_list_covers_every_block() {
        assert_eq!(
            selector_list(),
            ".character-content, .timeline-item, .achievement-card, \
             .ambition-item, .technique-card, .section-header"
        );
    }

    #[test]
    fn reveal_waits_for_a_tenth_above_the_fold() {
        let options = ObserveOptions::reveal();
        assert_eq!(options.threshold, Some(0.1));
        assert_eq!(options.root_margin, Some("0px 0px -50px 0px"));
    }

    #[test]
    fn default_options_leave_browser_defaults() {
        assert_eq!(
            ObserveOptions::browser_default(),
            ObserveOptions {
                threshold: None,
                root_margin: None,
            }
        );
    }
}
