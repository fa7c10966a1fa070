#![cfg(target_arch = "wasm32")]
use cake_core::{BlowSession, CakeError, CakeView, SceneInputs, ShareConfig, ThemeId};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod dom;
mod events;
mod frame;
mod keys;
mod loop_slot;
mod mic;
mod overlay;

use app::AppHandles;
use keys::Mode;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("cake-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Share config from the page URL, and the mode it implies.
fn read_config(window: &web::Window) -> (ShareConfig, Mode) {
    let search = window.location().search().unwrap_or_default();
    match ShareConfig::from_query(&search) {
        Ok(config) => (config, Mode::Receiver),
        Err(CakeError::MissingConfig) => (ShareConfig::default(), Mode::Creator),
        Err(e) => {
            log::warn!("[share] ignoring link: {}", e);
            (ShareConfig::default(), Mode::Creator)
        }
    }
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("cake-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #cake-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let (width, height) = dom::sync_canvas_backing_size(&canvas);

    let (config, mode) = read_config(&window);
    let theme = config.theme_id().unwrap_or_default();
    let device_constrained = dom::device_is_constrained(&window);
    log::info!(
        "[init] {:?} mode, {} candles, theme {}, constrained={}",
        mode,
        config.candles,
        theme,
        device_constrained
    );

    let mut view = CakeView::new(SceneInputs {
        candle_count: config.candles,
        theme,
        auto_rotate: true,
        device_constrained,
    });
    view.mount();

    let app = AppHandles {
        document: document.clone(),
        mode,
        view: Rc::new(RefCell::new(view)),
        session: Rc::new(RefCell::new(BlowSession::new(config.candles))),
        config: Rc::new(RefCell::new(config)),
        mic: Rc::new(RefCell::new(None)),
    };
    prepare_page(&app, theme);

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let gpu = cake_render::GpuState::new(&instance, surface, width, height).await?;

    let resize_pending = Rc::new(Cell::new(false));
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        view: app.view.clone(),
        gpu,
        canvas: canvas.clone(),
        resize_pending: resize_pending.clone(),
        last_instant: Instant::now(),
        slow_frames: 0,
    }));
    let handle = Rc::new(frame::start_loop(frame_ctx));

    match mode {
        Mode::Creator => events::wire_creator_controls(&app),
        Mode::Receiver => events::wire_receiver_controls(&app),
    }
    events::wire_common_controls(&app);
    events::wire_keyboard(&app);
    events::wire_pointer(&app, &canvas);
    events::wire_resize(resize_pending);
    events::wire_pagehide(&app, handle);
    Ok(())
}

/// Show the panel for `app.mode` and fill it from the current config.
fn prepare_page(app: &AppHandles, theme: ThemeId) {
    let doc = &app.document;
    app::apply_page_background(doc, theme);
    dom::set_checked(doc, "auto-rotate", true);
    overlay::hide_celebration(doc);
    let config = app.config.borrow();
    match app.mode {
        Mode::Creator => {
            overlay::hide(doc, "receiver-panel");
            overlay::hide(doc, "share-panel");
            overlay::show(doc, "creator-panel");
            let count = config.candles.to_string();
            dom::set_value(doc, "candle-count", &count);
            dom::set_text(doc, "candle-count-label", &count);
            dom::set_value(doc, "theme-select", theme.as_str());
            dom::set_value(doc, "recipient-name", &config.recipient_name);
            dom::set_value(doc, "sender-name", &config.sender_name);
            dom::set_value(doc, "message", &config.message);
        }
        Mode::Receiver => {
            overlay::hide(doc, "creator-panel");
            overlay::show(doc, "receiver-panel");
            let greeting = if config.recipient_name.trim().is_empty() {
                "Happy Birthday!".to_string()
            } else {
                format!("Happy Birthday, {}!", config.recipient_name.trim())
            };
            dom::set_text(doc, "greeting", &greeting);
            dom::set_text(doc, "greeting-message", &config.message);
            if !config.sender_name.trim().is_empty() {
                dom::set_text(doc, "greeting-sender", &format!("From {}", config.sender_name.trim()));
            }
            overlay::update_stats(doc, app.session.borrow().lit());
            overlay::update_strength(doc, 0.0);
            overlay::set_mic_status(doc, "Tap the microphone to blow with your breath");
        }
    }
}
