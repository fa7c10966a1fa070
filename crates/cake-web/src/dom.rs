use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Wrap a `JsValue` error for `anyhow`.
pub fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

pub fn add_listener(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut() + 'static,
) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        add_listener(&el, "click", handler);
    } else {
        log::warn!("[dom] missing #{}", element_id);
    }
}

/// `input` listener on a form control; the handler receives its current value.
pub fn add_input_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(String) + 'static,
) {
    let Some(el) = document.get_element_by_id(element_id) else {
        log::warn!("[dom] missing #{}", element_id);
        return;
    };
    let source = el.clone();
    add_listener(&el, "input", move || handler(control_value(&source)));
}

/// Value of an `<input>`, `<select>` or `<textarea>`; empty for anything else.
pub fn control_value(el: &web::Element) -> String {
    if let Some(input) = el.dyn_ref::<web::HtmlInputElement>() {
        input.value()
    } else if let Some(select) = el.dyn_ref::<web::HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = el.dyn_ref::<web::HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

pub fn value_of(document: &web::Document, element_id: &str) -> String {
    document
        .get_element_by_id(element_id)
        .map(|el| control_value(&el))
        .unwrap_or_default()
}

pub fn set_value(document: &web::Document, element_id: &str, value: &str) {
    let Some(el) = document.get_element_by_id(element_id) else {
        return;
    };
    if let Some(input) = el.dyn_ref::<web::HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = el.dyn_ref::<web::HtmlSelectElement>() {
        select.set_value(value);
    } else if let Some(area) = el.dyn_ref::<web::HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

pub fn is_checked(document: &web::Document, element_id: &str) -> bool {
    document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
        .map(|input| input.checked())
        .unwrap_or(false)
}

pub fn set_checked(document: &web::Document, element_id: &str, on: bool) {
    if let Some(input) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    {
        input.set_checked(on);
    }
}

#[inline]
pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
    (canvas.width(), canvas.height())
}

/// Few cores or a phone/tablet user agent.
pub fn device_is_constrained(window: &web::Window) -> bool {
    let navigator = window.navigator();
    let cores = navigator.hardware_concurrency();
    let mobile = navigator
        .user_agent()
        .map(|ua| {
            let ua = ua.to_ascii_lowercase();
            ["android", "iphone", "ipad", "mobile"]
                .iter()
                .any(|needle| ua.contains(needle))
        })
        .unwrap_or(false);
    mobile || (cores > 0.0 && cores <= 4.0)
}
