mod utils;
pub mod color;
pub mod field;
pub mod images;
pub mod konami;
pub mod nav;
pub mod parallax;
pub mod particle;
pub mod reveal;
pub mod theme;
pub mod viewport;

use field::{FieldConfig, ParticleField, Tick};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use viewport::Viewport;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Element, HtmlElement, Window};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// Delay before the particle layer starts, so it doesn't compete with first paint
const PARTICLE_START_DELAY_MS: i32 = 1000;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

// Owns the particle divs inside `.particles-container` and keeps them in sync
// with the simulated field. The frame loop belongs to whoever calls `tick`.
#[wasm_bindgen]
pub struct ParticleLayer {
    window: Window,
    field: ParticleField,
    elements: Vec<HtmlElement>,
    viewport: Viewport,
    rng: StdRng,
    profile: bool,
}

#[wasm_bindgen]
impl ParticleLayer {
    pub fn new(container: &Element) -> Result<ParticleLayer, JsValue> {
        ParticleLayer::build(container, FieldConfig::default(), StdRng::from_entropy())
    }

    pub fn with_seed(container: &Element, seed: u64) -> Result<ParticleLayer, JsValue> {
        ParticleLayer::build(container, FieldConfig::default(), StdRng::seed_from_u64(seed))
    }

    pub fn with_config(
        container: &Element,
        count: usize,
        life_decay: f64,
        max_speed: f64,
    ) -> Result<ParticleLayer, JsValue> {
        let config = FieldConfig {
            count,
            life_decay,
            max_speed,
            ..FieldConfig::default()
        };
        ParticleLayer::build(container, config, StdRng::from_entropy())
    }

    // Wraps every tick in a console timer
    pub fn set_profile(&mut self, profile: bool) {
        self.profile = profile;
    }

    // Advances one frame; false once the layer has been stopped
    pub fn tick(&mut self) -> bool {
        let _timer = if self.profile {
            Some(Timer::new("ParticleLayer::tick"))
        } else {
            None
        };
        // A failed read keeps the last known size
        if let Ok(viewport) = Viewport::from_window(&self.window) {
            self.viewport = viewport;
        }
        if self.field.step(self.viewport, &mut self.rng) == Tick::Stop {
            return false;
        }
        for (frame, el) in self.field.frames().iter().zip(&self.elements) {
            // Writes to a detached element are harmless, ignore failures
            let style = el.style();
            let _ = style.set_property("left", &format!("{}px", frame.pos[0]));
            let _ = style.set_property("top", &format!("{}px", frame.pos[1]));
            let _ = style.set_property("opacity", &frame.opacity.to_string());
        }
        true
    }

    // Pulls elements whose drawn offset ended up outside a shrunken window back to the edge
    pub fn resize(&mut self) -> Result<(), JsValue> {
        self.viewport = Viewport::from_window(&self.window)?;
        let bounds = [("left", self.viewport.width), ("top", self.viewport.height)];
        for el in &self.elements {
            let style = el.style();
            for &(property, extent) in bounds.iter() {
                let offset = parse_px(&style.get_property_value(property)?);
                if offset.map_or(false, |offset| offset > extent) {
                    style.set_property(property, "0px")?;
                }
            }
        }
        Ok(())
    }

    pub fn celebrate(&self) -> Result<(), JsValue> {
        for el in &self.elements {
            konami::apply_gold(&el.style())?;
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        self.field.stop();
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }
}

impl ParticleLayer {
    pub fn attach() -> Result<Option<ParticleLayer>, JsValue> {
        let document = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        match document.query_selector(".particles-container")? {
            Some(container) => ParticleLayer::new(&container).map(Some),
            None => Ok(None),
        }
    }

    fn build(container: &Element, config: FieldConfig, mut rng: StdRng) -> Result<ParticleLayer, JsValue> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let viewport = Viewport::from_window(&window)?;
        let field = ParticleField::new(config, viewport, &mut rng);

        let mut elements = Vec::with_capacity(field.len());
        for (p, frame) in field.particles().iter().zip(field.frames()) {
            let el = document
                .create_element("div")?
                .dyn_into::<HtmlElement>()?;
            el.set_class_name("particle dynamic-particle");
            let style = el.style();
            style.set_property("position", "absolute")?;
            style.set_property("width", &format!("{}px", p.size))?;
            style.set_property("height", &format!("{}px", p.size))?;
            style.set_property("background", &p.color.radial_glow(p.alpha))?;
            style.set_property("border-radius", "50%")?;
            style.set_property("left", &format!("{}px", frame.pos[0]))?;
            style.set_property("top", &format!("{}px", frame.pos[1]))?;
            style.set_property("pointer-events", "none")?;
            container.append_child(&el)?;
            elements.push(el);
        }

        console::log_1(&format!("particle layer attached with {} particles", elements.len()).into());
        Ok(ParticleLayer {
            window,
            field,
            elements,
            viewport,
            rng,
            profile: false,
        })
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }
}

// "12.5px" -> 12.5; anything else (empty, percentages) is None
fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

fn request_animation_frame(window: &Window, f: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window.request_animation_frame(f.as_ref().unchecked_ref())
}

// Attaches the layer and drives it from requestAnimationFrame until it is stopped.
// Returns false when the page has no particle container.
#[wasm_bindgen]
pub fn start_particles() -> Result<bool, JsValue> {
    let layer = match ParticleLayer::attach()? {
        Some(layer) => Rc::new(RefCell::new(layer)),
        None => {
            console::warn_1(&"no .particles-container on this page".into());
            return Ok(false);
        }
    };
    let window = window()?;

    let on_resize = {
        let layer = layer.clone();
        Closure::wrap(Box::new(move || {
            if let Err(e) = layer.borrow_mut().resize() {
                console::error_2(&"particle resize failed:".into(), &e);
            }
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let frame_window = window.clone();
    *next.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !layer.borrow_mut().tick() {
            // Dropping the closure ends the loop
            let _ = frame.borrow_mut().take();
            return;
        }
        if let Some(f) = frame.borrow().as_ref() {
            if let Err(e) = request_animation_frame(&frame_window, f) {
                console::error_2(&"requestAnimationFrame failed:".into(), &e);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(f) = next.borrow().as_ref() {
        request_animation_frame(&window, f)?;
    }
    Ok(true)
}

// Page entry point, called once the DOM is ready
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    initialize();
    nav::install_navigation()?;
    parallax::install_parallax()?;
    reveal::install_reveal()?;
    images::install_images()?;
    theme::watch_theme()?;
    konami::install_konami()?;

    let window = window()?;
    if let Some(body) = window.document().and_then(|d| d.body()) {
        body.class_list().add_1("loaded")?;
    }

    let delayed = Closure::once_into_js(|| {
        if let Err(e) = start_particles() {
            console::error_2(&"particle layer failed to start:".into(), &e);
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        delayed.unchecked_ref(),
        PARTICLE_START_DELAY_MS,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pixel_offsets() {
        assert_eq!(parse_px("12.5px"), Some(12.5));
        assert_eq!(parse_px(" -3px "), Some(-3.0));
        assert_eq!(parse_px("0px"), Some(0.0));
        assert_eq!(parse_px(""), None);
        assert_eq!(parse_px("40%"), None);
    }
}
