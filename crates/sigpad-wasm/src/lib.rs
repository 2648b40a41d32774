//! WASM bridge for the signature pad: binds the core pad to a `<canvas>`.
//!
//! Compiled via `wasm-pack build --target web`:
//!
//! ```js
//! const pad = new SignaturePad(canvas, { lineWidth: 3, type: "image/jpeg" });
//! pad.clear();
//! const url = pad.generateImage(400, 200);
//! ```

mod surface;

use sigpad_core::{
    DeviceClass, HostEnvironment, InputEvent, ListenTarget, PadAction, PadError, PadOptions,
    PointerPosition, TouchPoint,
};
use std::cell::RefCell;
use std::rc::Rc;
use surface::WebSurface;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, TouchEvent, Window};

type CorePad = sigpad_core::SignaturePad<WebSurface>;

/// An installed DOM listener, kept so it can be removed again.
struct BoundListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// The JS-facing signature pad.
///
/// Owns the core pad and the DOM listeners feeding it. Listeners are
/// removed on `destroy()` or when the object is freed.
#[wasm_bindgen]
pub struct SignaturePad {
    pad: Rc<RefCell<CorePad>>,
    listeners: Vec<BoundListener>,
}

#[wasm_bindgen]
impl SignaturePad {
    /// Bind a pad to `canvas`. `options` is an optional plain object:
    /// `{ bgColor, lineWidth, color, type, quality }`.
    ///
    /// Throws if the canvas has no 2D context or the options are malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: JsValue) -> Result<SignaturePad, JsValue> {
        console_error_panic_hook_setup();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let options = js_options(&options)?;
        let env = probe_environment(&window);

        let surface = WebSurface::new(canvas.clone(), document.clone());
        let pad = CorePad::new(surface, &env, options.as_ref()).map_err(to_js)?;
        let pad = Rc::new(RefCell::new(pad));
        let listeners = bind_listeners(&pad, &canvas, &document)?;

        Ok(Self { pad, listeners })
    }

    /// Whether touch listeners were bound instead of mouse listeners.
    #[wasm_bindgen(js_name = isMobileDevice)]
    pub fn is_mobile_device(&self) -> bool {
        self.pad.borrow().is_mobile_device()
    }

    /// Scale factor applied to the canvas backing buffer.
    #[wasm_bindgen(js_name = getPixelRatio)]
    pub fn get_pixel_ratio(&self) -> f64 {
        self.pad.borrow().pixel_ratio()
    }

    /// Repaint the background, discarding all strokes.
    pub fn clear(&self) {
        self.pad.borrow_mut().clear();
    }

    /// Export as a data URI, optionally resized.
    #[wasm_bindgen(js_name = generateImage)]
    pub fn generate_image(&self, width: Option<f64>, height: Option<f64>) -> Result<String, JsValue> {
        self.pad
            .borrow()
            .generate_image(width, height)
            .map_err(to_js)
    }

    /// Remove every DOM listener. The pad stops reacting to input.
    pub fn destroy(&mut self) {
        for l in self.listeners.drain(..) {
            if let Err(e) = l
                .target
                .remove_event_listener_with_callback(l.event, l.closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove {} listener: {e:?}", l.event);
            }
        }
    }
}

impl Drop for SignaturePad {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ─── Host probing ────────────────────────────────────────────────────────

fn probe_environment(window: &Window) -> HostEnvironment {
    let has = |key: &str| js_sys::Reflect::has(window, &JsValue::from_str(key)).unwrap_or(false);
    let device_pixel_ratio = has("devicePixelRatio").then(|| window.device_pixel_ratio());
    let orientation = js_sys::Reflect::get(window, &JsValue::from_str("orientation"))
        .ok()
        .and_then(|v| v.as_f64());
    HostEnvironment {
        device_pixel_ratio,
        has_touch_start: has("ontouchstart"),
        orientation,
    }
}

// ─── Options ─────────────────────────────────────────────────────────────

fn js_options(value: &JsValue) -> Result<Option<PadOptions>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let json = js_sys::JSON::stringify(value)?;
    parse_options(&String::from(json))
        .map(Some)
        .map_err(|e| JsValue::from_str(&e))
}

/// Parse options from their JSON form.
fn parse_options(json: &str) -> Result<PadOptions, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid signature pad options: {e}"))
}

fn to_js(e: PadError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ─── Listener wiring ─────────────────────────────────────────────────────

fn bind_listeners(
    pad: &Rc<RefCell<CorePad>>,
    canvas: &HtmlCanvasElement,
    document: &Document,
) -> Result<Vec<BoundListener>, JsValue> {
    let plan = pad.borrow().listeners();
    let mut bound = Vec::with_capacity(plan.len());

    for listener in plan {
        let target: EventTarget = match listener.target {
            ListenTarget::Surface => canvas.clone().into(),
            ListenTarget::Document => document.clone().into(),
        };
        let action = listener.action;
        let pad = pad.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            dispatch(&pad, action, &event);
        });
        target.add_event_listener_with_callback(listener.event, closure.as_ref().unchecked_ref())?;
        bound.push(BoundListener {
            target,
            event: listener.event,
            closure,
        });
    }

    log::debug!("bound {} listeners", bound.len());
    Ok(bound)
}

fn dispatch(pad: &RefCell<CorePad>, action: PadAction, event: &Event) {
    let Ok(mut pad) = pad.try_borrow_mut() else {
        log::warn!("re-entrant {} event dropped", event.type_());
        return;
    };
    let device = pad.device_class();
    let input = match action {
        PadAction::Down => InputEvent::PointerDown {
            position: pointer_position(event, device),
        },
        PadAction::Move => InputEvent::PointerMove {
            position: pointer_position(event, device),
        },
        PadAction::Up => InputEvent::PointerUp,
        PadAction::Cancel => InputEvent::PointerCancel,
    };
    pad.handle(&input);
}

/// Read the pointer position out of a DOM event. Touch listeners are only
/// bound on mobile, mouse listeners only on desktop, so the device class
/// tells which event interface to read.
fn pointer_position(event: &Event, device: DeviceClass) -> PointerPosition {
    match device {
        DeviceClass::Mobile => {
            let list = event.unchecked_ref::<TouchEvent>().touches();
            touch_position(
                (0..list.length())
                    .filter_map(|i| list.get(i))
                    .map(|t| move |key: &str| read_f64(&t, key)),
            )
        }
        DeviceClass::Desktop => mouse_position(|key| read_f64(event, key)),
    }
}

/// Numeric DOM property at full precision. The typed web-sys getters for
/// `offsetX` and `clientX` return whole pixels.
fn read_f64(target: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()?
        .as_f64()
}

fn mouse_position(read: impl Fn(&str) -> Option<f64>) -> PointerPosition {
    let coord = |key| {
        read(key).unwrap_or_else(|| {
            log::debug!("mouse event without {key}, using 0");
            0.0
        })
    };
    PointerPosition::mouse(coord("offsetX"), coord("offsetY"))
}

/// Contacts missing either client coordinate are skipped.
fn touch_position<R>(touches: impl IntoIterator<Item = R>) -> PointerPosition
where
    R: Fn(&str) -> Option<f64>,
{
    let touches = touches
        .into_iter()
        .filter_map(|read| {
            Some(TouchPoint {
                client_x: read("clientX")?,
                client_y: read("clientY")?,
            })
        })
        .collect();
    PointerPosition::Touch { touches }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sigpad WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
