use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use gesturedock_core::{DockOffset, Size};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// The configured mount point, or the page body.
pub fn mount_point(document: &Document, id: Option<&str>) -> Result<HtmlElement, JsValue> {
    match id {
        Some(id) => get_element(document, id),
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("Missing document body")),
    }
}

pub fn create_node<T: JsCast>(
    document: &Document,
    tag: &str,
    class: &str,
    parent: &Element,
) -> Result<T, JsValue> {
    let node = document.create_element(tag)?;
    node.set_class_name(class);
    parent.append_child(&node)?;
    node.dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {tag}")))
}

pub fn set_style(element: &HtmlElement, name: &str, value: &str) {
    let _ = element.style().set_property(name, value);
}

pub fn set_shown(element: &HtmlElement, shown: bool, display: &str) {
    set_style(element, "display", if shown { display } else { "none" });
}

pub fn px(value: f64) -> String {
    format!("{value}px")
}

pub fn viewport_size(document: &Document) -> Size {
    match document.document_element() {
        Some(root) => Size::new(root.client_width() as f64, root.client_height() as f64),
        None => Size::default(),
    }
}

pub fn place_dock(dock: &HtmlElement, offset: DockOffset) {
    set_style(
        dock,
        "transform",
        &format!("translate({}px,{}px)", offset.x, offset.y),
    );
}

pub fn set_dock_transition(dock: &HtmlElement, duration_ms: Option<u32>) {
    let transition = match duration_ms {
        Some(ms) => format!("transform {ms}ms ease-in-out"),
        None => "none".to_string(),
    };
    set_style(dock, "transition", &transition);
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}
