// Scroll-linked parallax for the hero block and the decorative particles

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlElement};

const HERO_RATE: f64 = -0.5;
const PARTICLE_BASE_RATE: f64 = 0.1;
const PARTICLE_RATE_STEP: f64 = 0.05;
const PARTICLE_SPIN: f64 = 0.1;

pub fn hero_transform(scroll_y: f64) -> String {
    format!("translateY({}px)", unsigned_zero(scroll_y * HERO_RATE))
}

// Deeper particles (higher index) drift faster
pub fn particle_transform(scroll_y: f64, index: usize) -> String {
    let rate = scroll_y * (PARTICLE_BASE_RATE + index as f64 * PARTICLE_RATE_STEP);
    format!(
        "translateY({}px) rotate({}deg)",
        rate,
        scroll_y * PARTICLE_SPIN
    )
}

// -0 would otherwise render as "-0px"
fn unsigned_zero(value: f64) -> f64 {
    value + 0.0
}

#[wasm_bindgen]
pub fn apply_parallax() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let scroll_y = window.page_y_offset()?;

    if let Some(hero) = document
        .query_selector(".hero")?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        hero.style()
            .set_property("transform", &hero_transform(scroll_y))?;
    }

    let particles = document.query_selector_all(".particle")?;
    for i in 0..particles.length() {
        if let Some(el) = particles
            .item(i)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        {
            el.style()
                .set_property("transform", &particle_transform(scroll_y, i as usize))?;
        }
    }
    Ok(())
}

#[wasm_bindgen]
pub fn install_parallax() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let on_scroll = Closure::wrap(Box::new(move || {
        if let Err(e) = apply_parallax() {
            console::error_2(&"parallax failed:".into(), &e);
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}
