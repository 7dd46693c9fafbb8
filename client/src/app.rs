use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlCanvasElement, HtmlElement,
    PointerEvent, Window,
};

use gesturedock_core::bridge::{
    ContactPhase, GestureEventBridge, HostCommand, Metrics, RecognizerEvent,
};
use gesturedock_core::config::WidgetConfig;
use gesturedock_core::trail::TrailSurface;
use gesturedock_core::{DockOffset, ViewportPoint};

use crate::catalog::{fetch_catalog, toggle_entry, CatalogView, ENTRY_CLASS, TITLE_CLASS};
use crate::dom::{
    create_node, debug_enabled, mount_point, place_dock, set_dock_transition, set_shown,
    viewport_size,
};
use crate::recognizer::{touches_from_payload, GestureRecognizer, JsRecognizer};
use crate::render::CanvasSurface;

type Bridge = GestureEventBridge<JsRecognizer, CanvasSurface>;
type Shared = Rc<RefCell<Widget>>;

const DOCK_STYLE: &str = "background-color: #999999; background-size: cover; \
    border-radius: 10px; position: fixed; top: 0; left: 0; z-index: 999; touch-action: none;";

struct Widget {
    window: Window,
    document: Document,
    container: HtmlElement,
    dock: HtmlCanvasElement,
    catalog: CatalogView,
    bridge: Bridge,
    config: WidgetConfig,
    /// Last placed offset, readable while the widget is borrowed.
    offset: Rc<Cell<DockOffset>>,
    trail_timer: Option<i32>,
    transition_timer: Option<i32>,
}

impl Widget {
    fn metrics(&self) -> Metrics {
        Metrics {
            viewport: viewport_size(&self.document),
            container_width: self.container.offset_width() as f64,
        }
    }
}

/// Runs `handler` against the widget unless it is already borrowed, which
/// happens when the recognizer emits synchronously from `enable()`/`disable()`.
fn with_widget<T>(shared: &Shared, handler: impl FnOnce(&mut Widget) -> T) -> Option<T> {
    match shared.try_borrow_mut() {
        Ok(mut widget) => Some(handler(&mut widget)),
        Err(_) => {
            log::warn!("gesture dock busy, dropping re-entrant event");
            None
        }
    }
}

fn dispatch(shared: &Shared, handler: impl FnOnce(&mut Widget) -> Vec<HostCommand>) {
    with_widget(shared, |widget| {
        let commands = handler(widget);
        apply_commands(shared, widget, commands);
    });
}

fn cancel_timer(window: &Window, slot: &mut Option<i32>) {
    if let Some(handle) = slot.take() {
        window.clear_timeout_with_handle(handle);
    }
}

fn schedule(window: &Window, delay_ms: u32, callback: impl FnOnce() + 'static) -> Option<i32> {
    let callback = Closure::once_into_js(callback);
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms as i32,
    ) {
        Ok(handle) => Some(handle),
        Err(err) => {
            log::error!("setTimeout failed: {err:?}");
            None
        }
    }
}

fn apply_commands(shared: &Shared, widget: &mut Widget, commands: Vec<HostCommand>) {
    for command in commands {
        match command {
            HostCommand::PlaceDock {
                offset,
                transition_ms,
            } => {
                if transition_ms.is_some() {
                    set_dock_transition(&widget.dock, transition_ms);
                }
                place_dock(&widget.dock, offset);
                widget.offset.set(offset);
            }
            HostCommand::ClearDockTransition => {
                cancel_timer(&widget.window, &mut widget.transition_timer);
                set_dock_transition(&widget.dock, None);
            }
            HostCommand::ScheduleTransitionReset { ticket, delay_ms } => {
                cancel_timer(&widget.window, &mut widget.transition_timer);
                let weak = Rc::downgrade(shared);
                widget.transition_timer = schedule(&widget.window, delay_ms, move || {
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    dispatch(&shared, move |widget| {
                        widget.transition_timer = None;
                        widget.bridge.finish_transition(ticket)
                    });
                });
            }
            HostCommand::ScheduleTrailClear { ticket, delay_ms } => {
                cancel_timer(&widget.window, &mut widget.trail_timer);
                let weak = Rc::downgrade(shared);
                widget.trail_timer = schedule(&widget.window, delay_ms, move || {
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    dispatch(&shared, move |widget| {
                        widget.trail_timer = None;
                        widget.bridge.finish_trail_clear(ticket);
                        Vec::new()
                    });
                });
            }
            HostCommand::ShowCatalog(placement) => widget.catalog.show(&placement),
            HostCommand::HideCatalog => widget.catalog.hide(),
            HostCommand::SetDockVisible(visible) => set_shown(&widget.dock, visible, "block"),
        }
    }
}

fn subscribe_recognizer(shared: &Shared, recognizer: &GestureRecognizer) -> Result<(), JsValue> {
    for name in RecognizerEvent::NAMES {
        let weak = Rc::downgrade(shared);
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Some(event) = RecognizerEvent::from_name(name, touches_from_payload(&payload))
            else {
                return;
            };
            dispatch(&shared, move |widget| {
                let metrics = widget.metrics();
                let commands = widget.bridge.handle_event(event, metrics);
                if !widget.bridge.trail().has_pending_clear() {
                    cancel_timer(&widget.window, &mut widget.trail_timer);
                }
                commands
            });
        });
        recognizer.subscribe(name, callback.as_ref().unchecked_ref())?;
        callback.forget();
    }
    Ok(())
}

fn contact_point(event: &PointerEvent) -> ViewportPoint {
    ViewportPoint {
        x: event.client_x() as f64,
        y: event.client_y() as f64,
    }
}

fn listen_dock(shared: &Shared, dock: &HtmlCanvasElement) -> Result<(), JsValue> {
    let active_pointer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let bindings = [
        ("pointerdown", ContactPhase::Start),
        ("pointermove", ContactPhase::Move),
        ("pointerup", ContactPhase::End),
        ("pointercancel", ContactPhase::Cancel),
    ];
    for (name, phase) in bindings {
        let weak = Rc::downgrade(shared);
        let target = dock.clone();
        let active_pointer = active_pointer.clone();
        let listener = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let pointer_id = event.pointer_id();
            match phase {
                ContactPhase::Start => {
                    if active_pointer.get().is_some() {
                        return;
                    }
                    active_pointer.set(Some(pointer_id));
                    let _ = target.set_pointer_capture(pointer_id);
                    event.prevent_default();
                }
                ContactPhase::Move => {
                    if active_pointer.get() != Some(pointer_id) {
                        return;
                    }
                }
                ContactPhase::End | ContactPhase::Cancel => {
                    if active_pointer.get() != Some(pointer_id) {
                        return;
                    }
                    active_pointer.set(None);
                    if target.has_pointer_capture(pointer_id) {
                        let _ = target.release_pointer_capture(pointer_id);
                    }
                }
            }
            let point = contact_point(&event);
            dispatch(&shared, |widget| {
                if phase == ContactPhase::Move && widget.bridge.dock().is_dragging() {
                    event.prevent_default();
                }
                let metrics = widget.metrics();
                widget.bridge.handle_contact(phase, point, metrics)
            });
        });
        dock.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        listener.forget();
    }
    Ok(())
}

fn listen_catalog(shared: &Shared, container: &HtmlElement) -> Result<(), JsValue> {
    let weak = Rc::downgrade(shared);
    let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Some(target) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };
        if let Ok(Some(_)) = target.closest(&format!(".{TITLE_CLASS}")) {
            dispatch(&shared, |widget| widget.bridge.hide_catalog());
            return;
        }
        if let Ok(Some(entry)) = target.closest(&format!(".{ENTRY_CLASS}")) {
            toggle_entry(&entry);
        }
    });
    container.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}

fn load_catalog(shared: &Shared, gid: &str) {
    let Some((window, url)) = with_widget(shared, |widget| {
        (widget.window.clone(), widget.config.catalog_url_for(gid))
    }) else {
        return;
    };
    let weak = Rc::downgrade(shared);
    wasm_bindgen_futures::spawn_local(async move {
        let gestures = match fetch_catalog(&window, &url).await {
            Ok(gestures) => gestures,
            Err(err) => {
                log::warn!("gesture catalog unavailable from {url}: {err}");
                return;
            }
        };
        log::info!("loaded {} gestures from {url}", gestures.len());
        let Some(shared) = weak.upgrade() else {
            return;
        };
        with_widget(&shared, |widget| {
            let Widget {
                bridge, catalog, ..
            } = widget;
            let added = bridge.add_gestures(gestures);
            if let Err(err) = catalog.append_entries(added) {
                log::error!("failed to render gesture catalog: {err:?}");
            }
        });
    });
}

fn init_logging(window: &Window, debug: bool) {
    let level = if debug || debug_enabled(window) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A second dock on the page finds the logger already installed.
    let _ = console_log::init_with_level(level);
}

/// Splits an element passed as `container` off the options object; the rest
/// is read as [`WidgetConfig`].
fn parse_options(options: &JsValue) -> Result<(WidgetConfig, Option<HtmlElement>), JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok((WidgetConfig::default(), None));
    }
    let plain = Object::assign(&Object::new(), options.unchecked_ref());
    let container_key = JsValue::from_str("container");
    let element = Reflect::get(&plain, &container_key)
        .ok()
        .and_then(|value| value.dyn_into::<HtmlElement>().ok());
    if element.is_some() {
        Reflect::delete_property(&plain, &container_key)?;
    }
    let text = String::from(js_sys::JSON::stringify(&plain)?);
    let config =
        WidgetConfig::from_json(&text).map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok((config, element))
}

/// Floating gesture trail display with its catalog overlay.
#[wasm_bindgen]
pub struct GestureDock {
    widget: Shared,
    offset: Rc<Cell<DockOffset>>,
}

#[wasm_bindgen]
impl GestureDock {
    #[wasm_bindgen(constructor)]
    pub fn new(recognizer: GestureRecognizer, options: JsValue) -> Result<GestureDock, JsValue> {
        console_error_panic_hook::set_once();

        let (config, container_element) = parse_options(&options)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
        init_logging(&window, config.debug);
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Missing document"))?;
        let container = match container_element {
            Some(element) => element,
            None => mount_point(&document, config.container.as_deref())?,
        };

        let dock: HtmlCanvasElement =
            create_node(&document, "canvas", "gk-helper-display", &container)?;
        dock.set_width(config.size);
        dock.set_height(config.size);
        dock.style().set_css_text(DOCK_STYLE);
        place_dock(&dock, config.initial_offset);
        let ctx = dock
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let catalog = CatalogView::new(&document, &container, &config.title)?;
        let catalog_element = catalog.container().clone();

        let mut surface = CanvasSurface::new(dock.clone(), ctx, &config.background_image);
        surface.set_background_visible(true);
        let bridge = GestureEventBridge::new(JsRecognizer::new(recognizer.clone()), surface, &config);

        let gid = config.gid.clone();
        let drag_enabled = config.drag;
        let offset = Rc::new(Cell::new(config.initial_offset));
        log::info!(
            "gesture dock mounted at ({}, {}) size={} drag={} snap={}",
            config.initial_offset.x,
            config.initial_offset.y,
            config.size,
            config.drag,
            config.snap
        );
        let widget = Rc::new(RefCell::new(Widget {
            window,
            document,
            container,
            dock: dock.clone(),
            catalog,
            bridge,
            config,
            offset: offset.clone(),
            trail_timer: None,
            transition_timer: None,
        }));

        subscribe_recognizer(&widget, &recognizer)?;
        if drag_enabled {
            listen_dock(&widget, &dock)?;
        }
        listen_catalog(&widget, &catalog_element)?;

        if let Some(gid) = gid {
            load_catalog(&widget, &gid);
        }

        Ok(GestureDock { widget, offset })
    }

    /// Shows the dock.
    pub fn show(&self) {
        dispatch(&self.widget, |widget| widget.bridge.show_dock());
    }

    /// Hides the dock, ending any drag in progress.
    pub fn hide(&self) {
        dispatch(&self.widget, |widget| widget.bridge.hide_dock());
    }

    #[wasm_bindgen(js_name = showCatalog)]
    pub fn show_catalog(&self) {
        dispatch(&self.widget, |widget| {
            let metrics = widget.metrics();
            widget.bridge.show_catalog(metrics)
        });
    }

    #[wasm_bindgen(js_name = hideCatalog)]
    pub fn hide_catalog(&self) {
        dispatch(&self.widget, |widget| widget.bridge.hide_catalog());
    }

    /// Fetches the gestures of catalog `gid` and appends them to the overlay.
    #[wasm_bindgen(js_name = loadCatalog)]
    pub fn load_catalog(&self, gid: &str) {
        load_catalog(&self.widget, gid);
    }

    #[wasm_bindgen(getter, js_name = offsetX)]
    pub fn offset_x(&self) -> f64 {
        self.offset.get().x
    }

    #[wasm_bindgen(getter, js_name = offsetY)]
    pub fn offset_y(&self) -> f64 {
        self.offset.get().y
    }
}
