// Size of the visible page area in CSS pixels, read from the window once per frame

use rand::Rng;
use wasm_bindgen::JsValue;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Viewport {
        Viewport { width, height }
    }

    // Reads innerWidth/innerHeight; both are plain numbers on every browser we target
    pub fn from_window(window: &web_sys::Window) -> Result<Viewport, JsValue> {
        let width = window
            .inner_width()?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("innerWidth is not a number"))?;
        let height = window
            .inner_height()?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("innerHeight is not a number"))?;
        Ok(Viewport { width, height })
    }

    pub fn extent(&self, axis: usize) -> f64 {
        match axis {
            0 => self.width,
            _ => self.height,
        }
    }

    // Uniform point in [0, width) x [0, height)
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 2] {
        [
            rng.gen::<f64>() * self.width,
            rng.gen::<f64>() * self.height,
        ]
    }

    pub fn contains(&self, point: [f64; 2]) -> bool {
        point[0] >= 0.0 && point[0] < self.width && point[1] >= 0.0 && point[1] < self.height
    }
}
