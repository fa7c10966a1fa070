use crate::app::AppHandles;
use crate::dom;
use crate::frame::LoopHandle;
use crate::keys::{key_action, stepped_count, KeyAction};
use cake_core::constants::MAX_CANDLES;
use cake_core::share::clamp_candles;
use cake_core::ThemeId;
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const ORBIT_RADIANS_PER_PX: f32 = 0.005;
const ZOOM_PER_WHEEL_UNIT: f32 = 0.001;

pub fn wire_creator_controls(app: &AppHandles) {
    let doc = &app.document;
    {
        let app = app.clone();
        dom::add_input_listener(doc, "candle-count", move |value| {
            let count = value.trim().parse::<usize>().unwrap_or(1);
            app.set_candle_count(count);
            dom::set_text(&app.document, "candle-count-label", &clamp_candles(count).to_string());
        });
    }
    {
        let app = app.clone();
        dom::add_input_listener(doc, "theme-select", move |value| match value.parse::<ThemeId>() {
            Ok(id) => app.set_theme(id),
            Err(e) => log::warn!("[ui] {}", e),
        });
    }
    for (id, field) in [
        ("recipient-name", Field::Recipient),
        ("sender-name", Field::Sender),
        ("message", Field::Message),
    ] {
        let app = app.clone();
        dom::add_input_listener(doc, id, move |value| {
            let mut config = app.config.borrow_mut();
            match field {
                Field::Recipient => config.recipient_name = value,
                Field::Sender => config.sender_name = value,
                Field::Message => config.message = value,
            }
        });
    }
    {
        let app = app.clone();
        dom::add_click_listener(doc, "generate-link", move || generate_link(&app));
    }
}

#[derive(Clone, Copy)]
enum Field {
    Recipient,
    Sender,
    Message,
}

fn generate_link(app: &AppHandles) {
    let Some(location) = web::window().map(|w| w.location()) else {
        return;
    };
    let origin = location.origin().unwrap_or_default();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    match app.config.borrow().share_url(&origin, &path) {
        Ok(url) => {
            dom::set_value(&app.document, "share-link", &url);
            crate::overlay::show(&app.document, "share-panel");
            log::info!("[share] link generated ({} bytes)", url.len());
        }
        Err(e) => log::error!("[share] encode failed: {}", e),
    }
}

pub fn wire_receiver_controls(app: &AppHandles) {
    let doc = &app.document;
    {
        let app = app.clone();
        dom::add_click_listener(doc, "mic-btn", move || app.toggle_mic());
    }
    {
        let app = app.clone();
        dom::add_click_listener(doc, "blow-btn", move || app.blow_once());
    }
    {
        let app = app.clone();
        dom::add_click_listener(doc, "reset-btn", move || app.reset_round());
    }
    {
        let app = app.clone();
        dom::add_click_listener(doc, "blow-again", move || app.reset_round());
    }
}

/// Controls present in both modes.
pub fn wire_common_controls(app: &AppHandles) {
    let doc = app.document.clone();
    let app = app.clone();
    dom::add_input_listener(&doc, "auto-rotate", move |_| {
        let on = dom::is_checked(&app.document, "auto-rotate");
        app.set_auto_rotate(on);
    });
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, app: &AppHandles) {
    // Typing into the creator form must not trigger shortcuts.
    if let Some(target) = ev.target() {
        if target.dyn_ref::<web::HtmlInputElement>().is_some()
            || target.dyn_ref::<web::HtmlTextAreaElement>().is_some()
            || target.dyn_ref::<web::HtmlSelectElement>().is_some()
        {
            return;
        }
    }
    let Some(action) = key_action(&ev.key(), app.mode) else {
        return;
    };
    if action.prevents_default() {
        ev.prevent_default();
    }
    match action {
        KeyAction::BlowOnce => app.blow_once(),
        KeyAction::ResetRound => app.reset_round(),
        KeyAction::ToggleMic => app.toggle_mic(),
        KeyAction::ToggleAutoRotate => {
            let on = !app.view.borrow().inputs().auto_rotate;
            app.set_auto_rotate(on);
            dom::set_checked(&app.document, "auto-rotate", on);
        }
        KeyAction::NextTheme => {
            let next = app.view.borrow().inputs().theme.next();
            app.set_theme(next);
            dom::set_value(&app.document, "theme-select", next.as_str());
        }
        KeyAction::MoreCandles | KeyAction::FewerCandles => {
            let current = app.view.borrow().inputs().candle_count;
            let count = stepped_count(current, action == KeyAction::MoreCandles, MAX_CANDLES);
            app.set_candle_count(count);
            dom::set_value(&app.document, "candle-count", &count.to_string());
            dom::set_text(&app.document, "candle-count-label", &count.to_string());
        }
    }
}

pub fn wire_keyboard(app: &AppHandles) {
    let app_k = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &app_k);
    }) as Box<dyn FnMut(_)>);
    if let Some(w) = web::window() {
        let _ = w.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Drag to orbit, wheel to zoom.
pub fn wire_pointer(app: &AppHandles, canvas: &web::HtmlCanvasElement) {
    let last: Rc<RefCell<Option<Vec2>>> = Rc::new(RefCell::new(None));
    {
        let last = last.clone();
        let canvas_d = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            *last.borrow_mut() = Some(Vec2::new(ev.client_x() as f32, ev.client_y() as f32));
            let _ = canvas_d.set_pointer_capture(ev.pointer_id());
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let last = last.clone();
        let view = app.view.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let mut last = last.borrow_mut();
            let Some(prev) = *last else {
                return;
            };
            let pos = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            let delta = (pos - prev) * ORBIT_RADIANS_PER_PX;
            view.borrow_mut().camera_mut().orbit(-delta.x, -delta.y);
            *last = Some(pos);
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    for event in ["pointerup", "pointercancel", "pointerleave"] {
        let last = last.clone();
        dom::add_listener(canvas, event, move || *last.borrow_mut() = None);
    }
    {
        let view = app.view.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
            let factor = 1.0 + ev.delta_y() as f32 * ZOOM_PER_WHEEL_UNIT;
            view.borrow_mut().camera_mut().zoom(factor.clamp(0.5, 1.5));
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ =
            canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Resize only marks the canvas; the frame loop applies it.
pub fn wire_resize(resize_pending: Rc<Cell<bool>>) {
    if let Some(w) = web::window() {
        dom::add_listener(&w, "resize", move || resize_pending.set(true));
    }
}

/// Page teardown: stop the loop, the sampler and release the scene.
pub fn wire_pagehide(app: &AppHandles, handle: Rc<LoopHandle>) {
    let app = app.clone();
    if let Some(w) = web::window() {
        dom::add_listener(&w, "pagehide", move || {
            handle.cancel();
            app.shutdown();
        });
    }
}
