use std::cell::{Cell, RefCell};

/// Owner of a self-rescheduling frame callback and the state around it.
///
/// The callback usually captures the slot it lives in, so dropping the loop
/// means taking the callback out with [`LoopSlot::release`].
pub struct LoopSlot<F> {
    running: Cell<bool>,
    in_frame: Cell<bool>,
    pending: Cell<Option<i32>>,
    callback: RefCell<Option<F>>,
}

impl<F> Default for LoopSlot<F> {
    fn default() -> Self {
        Self {
            running: Cell::new(true),
            in_frame: Cell::new(false),
            pending: Cell::new(None),
            callback: RefCell::new(None),
        }
    }
}

impl<F> LoopSlot<F> {
    pub fn install(&self, callback: F) {
        *self.callback.borrow_mut() = Some(callback);
    }

    pub fn with_callback<R>(&self, f: impl FnOnce(&F) -> R) -> Option<R> {
        self.callback.borrow().as_ref().map(f)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    #[inline]
    pub fn in_frame(&self) -> bool {
        self.in_frame.get()
    }

    pub fn set_pending(&self, id: Option<i32>) {
        self.pending.set(id);
    }

    pub fn take_pending(&self) -> Option<i32> {
        self.pending.take()
    }

    /// Called when a scheduled frame fires. False once stopped.
    pub fn begin_frame(&self) -> bool {
        self.pending.set(None);
        let running = self.running.get();
        self.in_frame.set(running);
        running
    }

    /// Called after the frame body. True when another frame should be scheduled.
    pub fn end_frame(&self) -> bool {
        self.in_frame.set(false);
        self.running.get()
    }

    /// Stop the loop. Returns false if it was already stopped.
    pub fn stop(&self) -> bool {
        self.running.replace(false)
    }

    /// Hand the callback back to the caller so it and its captures can drop.
    pub fn release(&self) -> Option<F> {
        self.callback.borrow_mut().take()
    }
}
