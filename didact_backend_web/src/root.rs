// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render roots driven by idle callbacks.
//!
//! A [`Scheduled`] owns a work loop together with its host. Calls to
//! [`Scheduled::render`] that arrive while a slice is running (from a host
//! side effect or an error callback) land in a single pending slot; the latest
//! one wins and is applied before the slice returns.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use didact_core::deadline::Deadline;
use didact_core::host::Host;
use didact_core::trace::{TraceSink, Tracer};
use didact_core::{Element, LoopStatus, RenderError, WorkLoop, WorkLoopConfig};
use web_sys::Node;

use crate::host::DomHost;
use crate::idle::{IdleBudget, IdleLoop, IdleUnavailable};

type ErrorHandler<E> = Box<dyn FnMut(RenderError<E>)>;

struct State<H: Host> {
    work_loop: WorkLoop<H::Node>,
    host: H,
    on_error: ErrorHandler<H::Error>,
    sink: Option<Box<dyn TraceSink>>,
}

/// A work loop, its host, and a one-slot queue for re-entrant renders.
pub struct Scheduled<H: Host> {
    state: RefCell<State<H>>,
    pending: RefCell<Option<(Element, H::Node)>>,
}

impl<H: Host> core::fmt::Debug for Scheduled<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduled")
            .field("busy", &self.state.try_borrow().is_err())
            .field("pending", &self.pending.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl<H> Scheduled<H>
where
    H: Host,
    H::Error: core::fmt::Debug,
{
    /// Creates an idle root. Render failures are logged until
    /// [`on_error`](Self::on_error) installs a handler.
    pub fn new(host: H, config: WorkLoopConfig) -> Self {
        Self {
            state: RefCell::new(State {
                work_loop: WorkLoop::new(config),
                host,
                on_error: Box::new(|err: RenderError<H::Error>| {
                    log::error!(
                        "render {} failed at {:?}: {:?}",
                        err.render_index,
                        err.fiber,
                        err.error
                    );
                }),
                sink: None,
            }),
            pending: RefCell::new(None),
        }
    }
}

impl<H: Host> Scheduled<H> {
    /// Starts rendering `element` into `container`, abandoning any render in
    /// flight. Construction happens in later [`slice`](Self::slice) calls.
    pub fn render(&self, element: Element, container: H::Node) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.work_loop.render(element, container),
            Err(_) => *self.pending.borrow_mut() = Some((element, container)),
        }
    }

    /// Replaces the render failure handler.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a slice.
    pub fn on_error(&self, handler: impl FnMut(RenderError<H::Error>) + 'static) {
        self.state.borrow_mut().on_error = Box::new(handler);
    }

    /// Installs a trace sink, or removes it with `None`.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a slice.
    pub fn set_trace_sink(&self, sink: Option<Box<dyn TraceSink>>) {
        self.state.borrow_mut().sink = sink;
    }

    /// Runs one slice against `deadline` and reports whether work remains.
    ///
    /// A nested call from inside a running slice does nothing and reports
    /// [`LoopStatus::Working`].
    pub fn slice(&self, deadline: &dyn Deadline) -> LoopStatus {
        let Ok(mut guard) = self.state.try_borrow_mut() else {
            return LoopStatus::Working;
        };
        self.apply_pending(&mut guard);

        let state = &mut *guard;
        let mut tracer = match state.sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        if let Err(err) = state.work_loop.run(&mut state.host, deadline, &mut tracer) {
            (state.on_error)(err);
        }

        self.apply_pending(state);
        state.work_loop.status()
    }

    /// Returns whether work is pending.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a slice.
    pub fn status(&self) -> LoopStatus {
        if self.pending.borrow().is_some() {
            return LoopStatus::Working;
        }
        self.state.borrow().work_loop.status()
    }

    /// Runs `f` with the host.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a slice.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.state.borrow().host)
    }

    fn apply_pending(&self, state: &mut State<H>) {
        if let Some((element, container)) = self.pending.borrow_mut().take() {
            state.work_loop.render(element, container);
        }
    }
}

/// A DOM render root scheduled on `requestIdleCallback`.
///
/// The idle loop keeps running for the lifetime of the root; dropping the root
/// cancels it. Nodes already attached to the document stay.
#[derive(Debug)]
pub struct DomRoot {
    scheduled: Rc<Scheduled<DomHost>>,
    idle: IdleLoop,
}

impl DomRoot {
    /// Creates a root over `host` and starts its idle loop.
    ///
    /// # Errors
    ///
    /// Returns [`IdleUnavailable`] if the browser has no
    /// `requestIdleCallback`.
    pub fn new(host: DomHost, config: WorkLoopConfig) -> Result<Self, IdleUnavailable> {
        let scheduled = Rc::new(Scheduled::new(host, config));
        let idle = IdleLoop::new({
            let scheduled = Rc::clone(&scheduled);
            move |deadline| {
                scheduled.slice(&IdleBudget(deadline));
            }
        });
        idle.start()?;
        Ok(Self { scheduled, idle })
    }

    /// Starts rendering `element` into `container`.
    pub fn render(&self, element: Element, container: &Node) {
        self.scheduled.render(element, container.clone());
    }

    /// Replaces the render failure handler.
    pub fn on_error(&self, handler: impl FnMut(RenderError<wasm_bindgen::JsValue>) + 'static) {
        self.scheduled.on_error(handler);
    }

    /// Installs a trace sink, or removes it with `None`.
    pub fn set_trace_sink(&self, sink: Option<Box<dyn TraceSink>>) {
        self.scheduled.set_trace_sink(sink);
    }

    /// Returns whether work is pending.
    pub fn status(&self) -> LoopStatus {
        self.scheduled.status()
    }

    /// Returns `true` while the idle loop is registered.
    pub fn is_scheduling(&self) -> bool {
        self.idle.is_running()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Weak;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::cell::Cell;

    use didact_core::deadline::Unbounded;
    use didact_core::trace::SliceEndEvent;
    use didact_core::{Child, ElementKind, PropValue, Props, create_element, text};

    use super::*;

    #[derive(Debug)]
    struct Rejected;

    fn none() -> [Child; 0] {
        []
    }

    /// Nodes are indices into a tag list; appends are recorded as pairs.
    #[derive(Default)]
    struct ListHost {
        tags: Vec<String>,
        appends: Vec<(u32, u32)>,
    }

    impl ListHost {
        fn with_container() -> Self {
            Self {
                tags: alloc::vec!["root".to_string()],
                appends: Vec::new(),
            }
        }
    }

    impl Host for ListHost {
        type Node = u32;
        type Error = Rejected;

        fn create_node(&mut self, kind: &ElementKind) -> Result<u32, Rejected> {
            let tag = kind.tag().unwrap_or("#text");
            if tag == "bad" {
                return Err(Rejected);
            }
            self.tags.push(tag.to_string());
            u32::try_from(self.tags.len() - 1).map_err(|_| Rejected)
        }

        fn set_property(&mut self, _: &u32, _: &str, _: &PropValue) -> Result<(), Rejected> {
            Ok(())
        }

        fn append_child(&mut self, parent: &u32, child: &u32) -> Result<(), Rejected> {
            self.appends.push((*parent, *child));
            Ok(())
        }
    }

    fn tags_under_root(s: &Scheduled<ListHost>) -> Vec<String> {
        s.with_host(|h| {
            h.appends
                .iter()
                .filter(|(parent, _)| *parent == 0)
                .map(|(_, child)| h.tags[*child as usize].clone())
                .collect()
        })
    }

    #[test]
    fn render_waits_for_a_slice() {
        let s = Scheduled::new(ListHost::with_container(), WorkLoopConfig::headless());
        s.render(create_element("p", Props::new(), [text("hi")]), 0);
        assert_eq!(s.status(), LoopStatus::Working);
        assert!(s.with_host(|h| h.appends.is_empty()));

        assert_eq!(s.slice(&Unbounded), LoopStatus::Idle);
        assert_eq!(tags_under_root(&s), ["p"]);
        assert_eq!(s.with_host(|h| h.appends.len()), 2);
    }

    #[test]
    fn render_from_inside_a_slice_is_deferred_latest_wins() {
        let s = Rc::new(Scheduled::new(
            ListHost::with_container(),
            WorkLoopConfig::headless(),
        ));
        let weak: Weak<Scheduled<ListHost>> = Rc::downgrade(&s);
        let failures = Rc::new(Cell::new(0));
        s.on_error({
            let failures = Rc::clone(&failures);
            move |_| {
                failures.set(failures.get() + 1);
                if let Some(s) = weak.upgrade() {
                    s.render(create_element("first", Props::new(), none()), 0);
                    s.render(create_element("second", Props::new(), none()), 0);
                }
            }
        });

        s.render(create_element("bad", Props::new(), none()), 0);
        // The failing slice applies the deferred render before returning.
        assert_eq!(s.slice(&Unbounded), LoopStatus::Working);
        assert_eq!(failures.get(), 1);

        assert_eq!(s.slice(&Unbounded), LoopStatus::Idle);
        assert_eq!(tags_under_root(&s), ["second"]);
    }

    #[test]
    fn nested_slice_is_a_no_op() {
        let s = Rc::new(Scheduled::new(
            ListHost::with_container(),
            WorkLoopConfig::headless(),
        ));
        let weak = Rc::downgrade(&s);
        let nested = Rc::new(Cell::new(None));
        s.on_error({
            let nested = Rc::clone(&nested);
            move |_| {
                if let Some(s) = weak.upgrade() {
                    nested.set(Some(s.slice(&Unbounded)));
                }
            }
        });
        s.render(create_element("bad", Props::new(), none()), 0);
        assert_eq!(s.slice(&Unbounded), LoopStatus::Idle);
        assert_eq!(nested.get(), Some(LoopStatus::Working));
    }

    #[test]
    fn trace_sink_sees_slices() {
        struct Ends(Rc<Cell<u32>>);
        impl TraceSink for Ends {
            fn on_slice_end(&mut self, _: &SliceEndEvent) {
                self.0.set(self.0.get() + 1);
            }
        }

        let ends = Rc::new(Cell::new(0));
        let s = Scheduled::new(
            ListHost::with_container(),
            WorkLoopConfig::throttled(core::num::NonZeroU32::MIN),
        );
        s.set_trace_sink(Some(Box::new(Ends(Rc::clone(&ends)))));
        s.render(create_element("div", Props::new(), [text("a")]), 0);
        while s.slice(&Unbounded) == LoopStatus::Working {}

        let expected = if didact_core::trace::ENABLED { 3 } else { 0 };
        assert_eq!(ends.get(), expected);
        assert_eq!(tags_under_root(&s), ["div"]);
    }
}
