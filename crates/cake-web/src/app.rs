use crate::keys::Mode;
use crate::mic::MicSampler;
use crate::overlay;
use cake_core::share::clamp_candles;
use cake_core::{BlowSession, CakeView, SessionEvent, ShareConfig, ThemeId};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// State shared by the frame loop, the sampler and the DOM handlers.
#[derive(Clone)]
pub struct AppHandles {
    pub document: web::Document,
    pub mode: Mode,
    pub view: Rc<RefCell<CakeView>>,
    pub session: Rc<RefCell<BlowSession>>,
    pub config: Rc<RefCell<ShareConfig>>,
    pub mic: Rc<RefCell<Option<MicSampler>>>,
}

impl AppHandles {
    /// Push the session's lit flags into the view and refresh the overlay.
    fn publish(&self, event: Option<SessionEvent>) {
        {
            let session = self.session.borrow();
            self.view.borrow_mut().sync_lit(session.lit().as_slice());
            overlay::update_stats(&self.document, session.lit());
        }
        if let Some(SessionEvent::AllOut { wish }) = event {
            self.stop_mic();
            overlay::show_celebration(&self.document, wish);
        }
    }

    pub fn on_strength(&self, raw: f32) {
        let event = self.session.borrow_mut().on_strength(raw);
        overlay::update_strength(&self.document, self.session.borrow().strength());
        if event.is_some() {
            self.publish(event);
        }
    }

    pub fn blow_once(&self) {
        let event = self.session.borrow_mut().blow_once();
        if event.is_some() {
            self.publish(event);
        }
    }

    /// Relight everything and start a new round.
    pub fn reset_round(&self) {
        self.session.borrow_mut().reset();
        overlay::hide_celebration(&self.document);
        overlay::update_strength(&self.document, 0.0);
        self.publish(None);
    }

    pub fn set_candle_count(&self, count: usize) {
        let count = clamp_candles(count);
        self.config.borrow_mut().candles = count;
        self.session.borrow_mut().set_candle_count(count);
        self.view.borrow_mut().set_candle_count(count);
        overlay::hide_celebration(&self.document);
        self.publish(None);
    }

    pub fn set_theme(&self, id: ThemeId) {
        self.config.borrow_mut().theme = id.as_str().to_string();
        self.view.borrow_mut().set_theme(id);
        apply_page_background(&self.document, id);
    }

    pub fn set_auto_rotate(&self, on: bool) {
        self.view.borrow_mut().set_auto_rotate(on);
    }

    pub fn toggle_mic(&self) {
        let running = self
            .mic
            .borrow()
            .as_ref()
            .map(MicSampler::is_running)
            .unwrap_or(false);
        if running {
            self.stop_mic();
            overlay::set_mic_status(&self.document, "Microphone off");
            return;
        }
        if self.session.borrow().celebrated() {
            return;
        }
        let app = self.clone();
        spawn_local(async move {
            let sink = app.clone();
            match MicSampler::start(move |raw| sink.on_strength(raw)).await {
                Ok(sampler) => {
                    app.session.borrow_mut().start_listening();
                    // Replacing a stopped sampler here is outside its callback.
                    *app.mic.borrow_mut() = Some(sampler);
                    overlay::set_mic_status(&app.document, "Listening... blow!");
                }
                Err(e) => {
                    log::error!("[mic] unavailable: {:?}", e);
                    overlay::set_mic_status(
                        &app.document,
                        "Microphone unavailable. Use the Blow button instead.",
                    );
                }
            }
        });
    }

    pub fn stop_mic(&self) {
        self.session.borrow_mut().stop_listening();
        if let Some(mic) = self.mic.borrow_mut().as_mut() {
            mic.stop();
        }
        overlay::update_strength(&self.document, 0.0);
    }

    /// Stop everything that runs on its own and release the scene.
    pub fn shutdown(&self) {
        self.stop_mic();
        self.view.borrow_mut().unmount();
    }
}

pub fn apply_page_background(document: &web::Document, id: ThemeId) {
    if let Some(body) = document.body() {
        let _ = body.set_attribute(
            "style",
            &format!("background:{}", id.theme().background_css()),
        );
    }
}
