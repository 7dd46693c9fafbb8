use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Response, Window};

use gesturedock_core::catalog::{
    read_catalog_response, EnterAnimation, GestureDescriptor, OverlayPlacement,
};
use gesturedock_core::error::CatalogError;

use crate::dom::{create_node, px, set_shown, set_style};

pub const ENTRY_CLASS: &str = "gk-helper-gesture";
pub const TITLE_CLASS: &str = "gk-helper-title";
const IMAGE_SIZE: u32 = 60;

/// DOM side of the catalog overlay.
pub struct CatalogView {
    document: Document,
    container: HtmlElement,
}

impl CatalogView {
    pub fn new(document: &Document, parent: &Element, title: &str) -> Result<Self, JsValue> {
        let container: HtmlElement =
            create_node(document, "div", "gk-helper-container gk-helper-hide", parent)?;
        set_shown(&container, false, "block");
        let heading: HtmlElement = create_node(document, "h2", TITLE_CLASS, &container)?;
        heading.set_text_content(Some(title));
        Ok(Self {
            document: document.clone(),
            container,
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn append_entries(&self, descriptors: &[GestureDescriptor]) -> Result<(), JsValue> {
        for descriptor in descriptors {
            let wrapper: Element = create_node(
                &self.document,
                "div",
                "gk-helper-gesture-container",
                &self.container,
            )?;
            let entry: Element = create_node(&self.document, "div", ENTRY_CLASS, &wrapper)?;
            let image: HtmlImageElement = create_node(&self.document, "img", "", &entry)?;
            image.set_src(&descriptor.image_src());
            image.set_width(IMAGE_SIZE);
            image.set_height(IMAGE_SIZE);
            let text: HtmlElement =
                create_node(&self.document, "p", "gk-helper-gestureDescription", &entry)?;
            text.set_text_content(Some(&descriptor.description));
            set_shown(&text, false, "block");
        }
        Ok(())
    }

    fn entries(&self) -> Vec<Element> {
        let Ok(nodes) = self
            .container
            .query_selector_all(&format!(".{ENTRY_CLASS}"))
        else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// Shows every entry's picture with its description folded away.
    pub fn reset_entries(&self) {
        for entry in self.entries() {
            set_entry_expanded(&entry, false);
        }
    }

    pub fn show(&self, placement: &OverlayPlacement) {
        self.reset_entries();
        let container = &self.container;
        set_style(container, "position", "fixed");
        set_style(container, "top", &px(placement.top));
        set_style(container, "left", &px(placement.left));
        set_style(container, "width", &px(placement.width));
        set_style(container, "padding-left", &px(placement.padding_left));
        set_style(container, "padding-right", &px(placement.padding_right));
        set_shown(container, true, "block");
        play_enter_animation(container, &placement.animation);
    }

    pub fn hide(&self) {
        set_shown(&self.container, false, "block");
    }
}

fn entry_part(entry: &Element, selector: &str) -> Option<HtmlElement> {
    entry
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|node| node.dyn_into::<HtmlElement>().ok())
}

fn set_entry_expanded(entry: &Element, expanded: bool) {
    if let Some(image) = entry_part(entry, "img") {
        set_shown(&image, !expanded, "inline-block");
    }
    if let Some(text) = entry_part(entry, "p") {
        set_shown(&text, expanded, "block");
    }
}

/// Flips an entry between its picture and its description.
pub fn toggle_entry(entry: &Element) {
    let expanded = entry_part(entry, "img")
        .map(|image| image.style().get_property_value("display").ok().as_deref() == Some("none"))
        .unwrap_or(false);
    set_entry_expanded(entry, !expanded);
}

fn keyframe(width: f64, left: Option<f64>) -> Object {
    let frame = Object::new();
    let _ = Reflect::set(&frame, &"width".into(), &px(width).into());
    if let Some(left) = left {
        let _ = Reflect::set(&frame, &"left".into(), &px(left).into());
    }
    frame
}

/// Plays the panel's enter animation through `Element.animate` when the
/// browser has it.
fn play_enter_animation(element: &HtmlElement, animation: &EnterAnimation) {
    let animate = Reflect::get(element.as_ref(), &JsValue::from_str("animate"))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok());
    let Some(animate) = animate else {
        log::debug!("Element.animate unavailable, panel shown without animation");
        return;
    };
    let keyframes = Array::of2(
        &keyframe(animation.from_width, animation.from_left),
        &keyframe(animation.to_width, animation.to_left),
    );
    let options = Object::new();
    let _ = Reflect::set(
        &options,
        &"duration".into(),
        &JsValue::from_f64(animation.duration_ms as f64),
    );
    let _ = Reflect::set(&options, &"easing".into(), &"ease-out".into());
    if let Err(err) = animate.call2(element.as_ref(), &keyframes, &options) {
        log::warn!("catalog enter animation failed: {err:?}");
    }
}

fn network_error(err: JsValue) -> CatalogError {
    CatalogError::Network(
        err.as_string()
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

/// Fetches and parses the gesture catalog at `url`.
pub async fn fetch_catalog(
    window: &Window,
    url: &str,
) -> Result<Vec<GestureDescriptor>, CatalogError> {
    let value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(network_error)?;
    let response: Response = value.dyn_into().map_err(network_error)?;
    let status = response.status();
    let body = JsFuture::from(response.text().map_err(network_error)?)
        .await
        .map_err(network_error)?
        .as_string()
        .unwrap_or_default();
    read_catalog_response(status, &body)
}
