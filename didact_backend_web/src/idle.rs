// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestIdleCallback` slice source.
//!
//! [`IdleLoop`] calls back on every browser idle period and hands the callback
//! the browser's [`IdleDeadline`][mdn]. [`IdleBudget`] adapts that deadline to
//! the work loop's [`Deadline`] contract.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/IdleDeadline

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::time::Duration;

use didact_core::deadline::Deadline;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::IdleDeadline;

// Direct global bindings; `catch` turns a missing `requestIdleCallback` into
// an `Err` instead of a thrown exception.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = "requestIdleCallback")]
    fn request_idle_callback(callback: &JsValue) -> Result<u32, JsValue>;

    #[wasm_bindgen(js_name = "cancelIdleCallback")]
    fn cancel_idle_callback(handle: u32);
}

/// The browser does not provide `requestIdleCallback`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("requestIdleCallback is not available in this environment")]
pub struct IdleUnavailable;

/// A [`Deadline`] backed by the browser's [`IdleDeadline`].
#[derive(Debug)]
pub struct IdleBudget<'a>(pub &'a IdleDeadline);

impl Deadline for IdleBudget<'_> {
    fn time_remaining(&self) -> Duration {
        ms_to_duration(self.0.time_remaining())
    }
}

/// Converts a `DOMHighResTimeStamp` span in milliseconds, clamping negative
/// and non-finite values to zero.
pub(crate) fn ms_to_duration(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

/// A `requestIdleCallback` loop.
///
/// Create with [`IdleLoop::new`], then call [`start`](Self::start). The loop
/// re-registers itself after every invocation until [`stop`](Self::stop) is
/// called or the `IdleLoop` is dropped.
pub struct IdleLoop {
    inner: Rc<IdleInner>,
}

type IdleClosure = Closure<dyn FnMut(IdleDeadline)>;

struct IdleInner {
    /// The JS closure registered with `requestIdleCallback`. Separate from
    /// `callback` so the closure can re-register itself while running.
    closure: RefCell<Option<IdleClosure>>,
    callback: RefCell<Box<dyn FnMut(&IdleDeadline)>>,
    invocations: Cell<u64>,
    running: Cell<bool>,
    /// Handle of the most recent registration, for `cancelIdleCallback`.
    handle: Cell<u32>,
}

impl IdleLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(&IdleDeadline) + 'static) -> Self {
        Self {
            inner: Rc::new(IdleInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                invocations: Cell::new(0),
                running: Cell::new(false),
                handle: Cell::new(0),
            }),
        }
    }

    /// Starts the loop. A no-op if already running.
    ///
    /// # Errors
    ///
    /// Returns [`IdleUnavailable`] if the first registration fails.
    pub fn start(&self) -> Result<(), IdleUnavailable> {
        if self.inner.running.get() {
            return Ok(());
        }

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |deadline: IdleDeadline| {
            if !inner.running.get() {
                return;
            }
            inner.invocations.set(inner.invocations.get() + 1);

            inner.callback.borrow_mut()(&deadline);

            // Ask for the next idle period whether or not work remains.
            if inner.running.get()
                && let Some(ref closure) = *inner.closure.borrow()
            {
                match request_idle_callback(closure.as_ref().unchecked_ref()) {
                    Ok(handle) => inner.handle.set(handle),
                    Err(err) => {
                        log::error!("requestIdleCallback failed, stopping: {err:?}");
                        inner.running.set(false);
                    }
                }
            }
        }) as Box<dyn FnMut(IdleDeadline)>);

        let handle =
            request_idle_callback(closure.as_ref().unchecked_ref()).map_err(|_| IdleUnavailable)?;
        self.inner.handle.set(handle);
        self.inner.running.set(true);
        *self.inner.closure.borrow_mut() = Some(closure);
        Ok(())
    }

    /// Stops the loop and cancels the pending callback. Can be restarted.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_idle_callback(self.inner.handle.get());
    }

    /// Returns `true` if the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Returns how many idle callbacks have run.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.inner.invocations.get()
    }
}

impl Drop for IdleLoop {
    fn drop(&mut self) {
        self.stop();
        // Break the closure's reference cycle.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for IdleLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdleLoop")
            .field("running", &self.inner.running.get())
            .field("invocations", &self.inner.invocations.get())
            .finish_non_exhaustive()
    }
}
