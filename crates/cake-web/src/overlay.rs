use crate::dom::set_text;
use cake_core::blow::{strength_bar_percent, strength_label};
use cake_core::LitState;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document, element_id: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document, element_id: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let _ = el.set_attribute("style", "display:none");
    }
}

/// "n of m blown" plus the progress bar width.
pub fn update_stats(document: &web::Document, lit: &LitState) {
    set_text(
        document,
        "stats",
        &format!("{} of {} candles blown out", lit.blown_count(), lit.len()),
    );
    if let Some(el) = document.get_element_by_id("progress-bar") {
        let _ = el.set_attribute("style", &format!("width:{}%", lit.progress_percent()));
    }
}

pub fn update_strength(document: &web::Document, strength: f32) {
    if let Some(el) = document.get_element_by_id("strength-bar") {
        let _ = el.set_attribute(
            "style",
            &format!("width:{:.0}%", strength_bar_percent(strength)),
        );
    }
    set_text(document, "strength-label", strength_label(strength));
}

pub fn set_mic_status(document: &web::Document, text: &str) {
    set_text(document, "mic-status", text);
}

pub fn show_celebration(document: &web::Document, wish: &str) {
    set_text(document, "wish", wish);
    show(document, "celebration");
}

pub fn hide_celebration(document: &web::Document) {
    hide(document, "celebration");
}
