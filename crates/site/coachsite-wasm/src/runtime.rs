//! Shared page state and the JS closures that feed it.
//!
//! Every closure holds a `Weak` to the runtime and turns its browser callback
//! into a [`PageEvent`] before handing it to [`Site::handle`]. A callback that
//! arrives while the runtime is already borrowed is dropped.

use std::cell::RefCell;
use std::rc::Weak;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, MouseEvent, TouchEvent,
};

use coachsite_core::{
    EventKind, ListenTarget, ObserverKind, ObserverOptions, PageEvent, Propagation, Site,
    TimerHandle, TimerKey,
};

use crate::host::WebHost;

pub(crate) struct Runtime {
    pub(crate) host: WebHost,
    pub(crate) site: Option<Site>,
}

impl Runtime {
    pub(crate) fn dispatch(&mut self, event: &PageEvent) -> Propagation {
        match self.site.as_mut() {
            Some(site) => site.handle(&mut self.host, event),
            None => Propagation::Continue,
        }
    }
}

pub(crate) type SharedRuntime = Weak<RefCell<Runtime>>;

/// Run `f` against the live runtime, if it still exists and is not busy.
pub(crate) fn with_runtime<R>(weak: &SharedRuntime, f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    let runtime = weak.upgrade()?;
    let Ok(mut guard) = runtime.try_borrow_mut() else {
        log::warn!("callback raised during dispatch, dropped");
        return None;
    };
    guard.host.release_spent();
    Some(f(&mut guard))
}

/// One visibility observer per [`ObserverKind`].
pub(crate) struct Observer {
    pub(crate) observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

pub(crate) fn timer_callback(
    weak: SharedRuntime,
    handle: TimerHandle,
    key: TimerKey,
) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        with_runtime(&weak, |rt| {
            rt.host.retire_timer(handle);
            rt.dispatch(&PageEvent::Timer(key));
        });
    }) as Box<dyn FnMut()>)
}

pub(crate) fn event_callback(
    weak: SharedRuntime,
    target: ListenTarget,
    kind: EventKind,
) -> Closure<dyn FnMut(Event)> {
    Closure::wrap(Box::new(move |event: Event| {
        let outcome = with_runtime(&weak, |rt| {
            let page_event = translate(&mut rt.host, target, kind, &event)?;
            Some(rt.dispatch(&page_event))
        })
        .flatten();
        if outcome == Some(Propagation::PreventDefault) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(Event)>)
}

pub(crate) fn observer(
    weak: SharedRuntime,
    kind: ObserverKind,
    options: ObserverOptions,
) -> Result<Observer, JsValue> {
    let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            with_runtime(&weak, |rt| {
                let node = rt.host.node_for(&target);
                rt.dispatch(&PageEvent::Visible { node, kind });
            });
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin());
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    Ok(Observer {
        observer,
        _callback: callback,
    })
}

fn touch_x(event: &Event, changed: bool) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?;
    let list = if changed {
        touch.changed_touches()
    } else {
        touch.touches()
    };
    list.get(0).map(|t| t.client_x() as f64)
}

fn page_x(event: &Event) -> Option<f64> {
    event.dyn_ref::<MouseEvent>().map(|m| m.page_x() as f64)
}

/// Flatten a DOM event into the core's event type. `None` when the event
/// lacks what the kind needs (no touch point, wrong interface, ...).
fn translate(
    host: &mut WebHost,
    target: ListenTarget,
    kind: EventKind,
    event: &Event,
) -> Option<PageEvent> {
    let node = match target {
        ListenTarget::Node(node) => Some(node),
        ListenTarget::Window | ListenTarget::Document => None,
    };
    let page_event = match kind {
        EventKind::Scroll => PageEvent::Scroll,
        EventKind::Resize => PageEvent::Resize,
        EventKind::Click => {
            let origin = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map(|el| host.node_for(&el));
            let (client_x, client_y) = event
                .dyn_ref::<MouseEvent>()
                .map(|m| (m.client_x() as f64, m.client_y() as f64))
                .unwrap_or_default();
            PageEvent::Click {
                node,
                origin,
                client_x,
                client_y,
            }
        }
        EventKind::Submit => PageEvent::Submit { form: node? },
        EventKind::KeyDown => PageEvent::KeyDown {
            key: event.dyn_ref::<KeyboardEvent>()?.key(),
        },
        EventKind::TouchStart => PageEvent::TouchStart {
            node: node?,
            client_x: touch_x(event, false)?,
        },
        EventKind::TouchEnd => PageEvent::TouchEnd {
            node: node?,
            client_x: touch_x(event, true)?,
        },
        EventKind::MouseDown => PageEvent::MouseDown {
            node: node?,
            page_x: page_x(event)?,
        },
        EventKind::MouseMove => PageEvent::MouseMove {
            node: node?,
            page_x: page_x(event)?,
        },
        EventKind::MouseUp => PageEvent::MouseUp { node: node? },
        EventKind::MouseEnter => PageEvent::MouseEnter { node: node? },
        EventKind::MouseLeave => PageEvent::MouseLeave { node: node? },
    };
    Some(page_event)
}
