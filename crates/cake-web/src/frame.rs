use crate::dom;
use crate::loop_slot::LoopSlot;
use cake_core::CakeView;
use cake_render::GpuState;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const FRAME_BUDGET: Duration = Duration::from_millis(50);

pub struct FrameContext<'a> {
    pub view: Rc<RefCell<CakeView>>,
    pub gpu: GpuState<'a>,
    pub canvas: web::HtmlCanvasElement,
    /// Set by the resize listener; applied at the start of the next frame.
    pub resize_pending: Rc<Cell<bool>>,
    pub last_instant: Instant,
    pub slow_frames: u32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        if dt > FRAME_BUDGET {
            self.slow_frames += 1;
            if self.slow_frames % 60 == 1 {
                log::warn!(
                    "[frame] {:.1} ms frame ({} slow so far)",
                    dt.as_secs_f64() * 1000.0,
                    self.slow_frames
                );
            }
        }

        if self.resize_pending.replace(false) {
            let (w, h) = dom::sync_canvas_backing_size(&self.canvas);
            self.gpu.resize_if_needed(w, h);
        }

        if let Err(e) = self.view.borrow_mut().frame(&mut self.gpu) {
            log::error!("[frame] present failed: {:?}", e);
        }
    }
}

type FrameSlot = LoopSlot<Closure<dyn FnMut()>>;

/// Handle to a running requestAnimationFrame loop.
pub struct LoopHandle {
    slot: Rc<FrameSlot>,
}

impl LoopHandle {
    /// Stop scheduling, cancel the pending frame and drop the frame context.
    /// Idempotent.
    pub fn cancel(&self) {
        if !self.slot.stop() {
            return;
        }
        if let (Some(id), Some(w)) = (self.slot.take_pending(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        if let Some(tick) = self.slot.release() {
            if self.slot.in_frame() {
                // still executing; drop once the frame returns
                spawn_local(async move { drop(tick) });
            } else {
                drop(tick);
            }
        }
        log::info!("[frame] loop stopped");
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) -> LoopHandle {
    let slot: Rc<FrameSlot> = Rc::new(LoopSlot::default());

    let slot_tick = slot.clone();
    slot.install(Closure::wrap(Box::new(move || {
        if !slot_tick.begin_frame() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        // The frame may have torn the view down.
        if slot_tick.end_frame() {
            slot_tick.set_pending(request_frame(&slot_tick));
        }
    }) as Box<dyn FnMut()>));

    slot.set_pending(request_frame(&slot));
    LoopHandle { slot }
}

fn request_frame(slot: &FrameSlot) -> Option<i32> {
    let w = web::window()?;
    slot.with_callback(|cb| w.request_animation_frame(cb.as_ref().unchecked_ref()).ok())
        .flatten()
}
