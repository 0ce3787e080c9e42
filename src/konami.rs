// Konami code easter egg: watches keydown codes and, once the sequence is typed,
// turns every particle gold and shows a short greeting.

use crate::color::Color;
use std::collections::VecDeque;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CssStyleDeclaration, Document, HtmlElement, KeyboardEvent};

pub const SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

pub const MESSAGE: &str = "🌟 Les esprits des ancêtres Aonagi vous saluent! 🌟";
const MESSAGE_DURATION_MS: i32 = 3000;

const MESSAGE_CSS: &str = "
    position: fixed;
    top: 50%;
    left: 50%;
    transform: translate(-50%, -50%);
    background: var(--color-surface);
    color: var(--color-primary);
    padding: 20px 40px;
    border-radius: 15px;
    font-family: 'Noto Serif JP', serif;
    font-size: 18px;
    border: 2px solid var(--color-primary);
    box-shadow: 0 10px 30px rgba(0,0,0,0.3);
    z-index: 10000;
    animation: fadeInUp 0.5s ease-out;
";

// Sliding window over the last SEQUENCE.len() key codes
#[derive(Default)]
pub struct KonamiDetector {
    window: VecDeque<String>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        KonamiDetector {
            window: VecDeque::with_capacity(SEQUENCE.len()),
        }
    }

    // Returns true exactly when `code` completes the sequence; the window is cleared then
    pub fn push(&mut self, code: &str) -> bool {
        self.window.push_back(code.to_owned());
        if self.window.len() > SEQUENCE.len() {
            self.window.pop_front();
        }
        let matched = self.window.len() == SEQUENCE.len()
            && self.window.iter().zip(SEQUENCE.iter()).all(|(a, b)| a == b);
        if matched {
            self.window.clear();
        }
        matched
    }

    pub fn pending(&self) -> usize {
        self.window.len()
    }
}

pub fn apply_gold(style: &CssStyleDeclaration) -> Result<(), JsValue> {
    let gold = Color::GOLD;
    style.set_property("background", &gold.radial_glow(0.8))?;
    style.set_property(
        "box-shadow",
        &format!("0 0 20px {}", gold.rgba(0.5)),
    )
}

fn celebrate(document: &Document) -> Result<(), JsValue> {
    let particles = document.query_selector_all(".particle")?;
    for i in 0..particles.length() {
        if let Some(el) = particles
            .item(i)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        {
            apply_gold(&el.style())?;
        }
    }

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let message = document.create_element("div")?;
    message.set_text_content(Some(MESSAGE));
    message.set_attribute("style", MESSAGE_CSS)?;
    body.append_child(&message)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let remove = Closure::once_into_js(move || message.remove());
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        remove.unchecked_ref(),
        MESSAGE_DURATION_MS,
    )?;
    Ok(())
}

// Registers the keydown listener for the lifetime of the page
#[wasm_bindgen]
pub fn install_konami() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mut detector = KonamiDetector::new();
    let target = document.clone();
    let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if detector.push(&event.code()) {
            console::log_1(&"konami code entered".into());
            if let Err(e) = celebrate(&target) {
                console::error_2(&"konami effect failed:".into(), &e);
            }
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);

    document.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
    on_keydown.forget();
    Ok(())
}
