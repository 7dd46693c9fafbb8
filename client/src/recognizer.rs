use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;

use gesturedock_core::holds::Recognizer;
use gesturedock_core::TouchSample;

#[wasm_bindgen]
extern "C" {
    /// The page's gesture recognizer: an event bus with an on/off switch.
    #[derive(Clone, Debug)]
    pub type GestureRecognizer;

    #[wasm_bindgen(method, catch)]
    fn on(this: &GestureRecognizer, name: &str, callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn enable(this: &GestureRecognizer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn disable(this: &GestureRecognizer) -> Result<(), JsValue>;
}

impl GestureRecognizer {
    pub fn subscribe(&self, name: &str, callback: &Function) -> Result<(), JsValue> {
        self.on(name, callback)
    }
}

pub struct JsRecognizer(GestureRecognizer);

impl JsRecognizer {
    pub fn new(inner: GestureRecognizer) -> Self {
        Self(inner)
    }
}

impl Recognizer for JsRecognizer {
    fn enable(&mut self) {
        if let Err(err) = self.0.enable() {
            log::error!("recognizer enable() failed: {err:?}");
        }
    }

    fn disable(&mut self) {
        if let Err(err) = self.0.disable() {
            log::error!("recognizer disable() failed: {err:?}");
        }
    }
}

fn number_field(value: &JsValue, name: &str) -> Option<f64> {
    Reflect::get(value, &JsValue::from_str(name))
        .ok()?
        .as_f64()
        .filter(|number| number.is_finite())
}

/// Reads `{touches: [{identifier, pageX, pageY}]}`. Entries missing a field
/// are skipped.
pub fn touches_from_payload(payload: &JsValue) -> Vec<TouchSample> {
    if payload.is_undefined() || payload.is_null() {
        return Vec::new();
    }
    let Ok(touches) = Reflect::get(payload, &JsValue::from_str("touches")) else {
        return Vec::new();
    };
    if touches.is_undefined() || touches.is_null() {
        return Vec::new();
    }
    Array::from(&touches)
        .iter()
        .filter_map(|touch| {
            let id = number_field(&touch, "identifier")?;
            let x = number_field(&touch, "pageX")?;
            let y = number_field(&touch, "pageY")?;
            Some(TouchSample::new(id as i32, x, y))
        })
        .collect()
}
