//! [`Host`] over the live DOM via `web-sys`.

use hashbrown::{HashMap, HashSet};
use js_sys::WeakMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, FormData, HtmlElement,
    HtmlFormElement, NodeList, ScrollBehavior, ScrollIntoViewOptions, ScrollToOptions, Window,
};

use coachsite_core::{
    EventKind, Host, Layout, ListenTarget, NodeId, ObserverKind, ObserverOptions, Rect,
    TimerHandle, TimerKey, Viewport,
};

use crate::runtime::{self, Observer, SharedRuntime};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

struct Timer {
    id: i32,
    repeating: bool,
    callback: Closure<dyn FnMut()>,
}

struct Listener {
    key: (ListenTarget, EventKind),
    target: EventTarget,
    name: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Scroll => "scroll",
        EventKind::Resize => "resize",
        EventKind::Click => "click",
        EventKind::Submit => "submit",
        EventKind::KeyDown => "keydown",
        EventKind::TouchStart => "touchstart",
        EventKind::TouchEnd => "touchend",
        EventKind::MouseDown => "mousedown",
        EventKind::MouseMove => "mousemove",
        EventKind::MouseUp => "mouseup",
        EventKind::MouseEnter => "mouseenter",
        EventKind::MouseLeave => "mouseleave",
    }
}

/// Events that never need `preventDefault` are registered passive.
fn is_passive(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::Scroll | EventKind::TouchStart | EventKind::TouchEnd
    )
}

pub(crate) struct WebHost {
    window: Window,
    document: Document,
    /// `NodeId(i)` is `nodes[i]`; removed elements leave an empty slot so
    /// stale handles never alias a newer element.
    nodes: Vec<Option<Element>>,
    /// Element to slot index, without keeping elements alive.
    ids: WeakMap,
    timers: HashMap<TimerHandle, Timer>,
    /// Callbacks of finished or cleared timers and released listeners. One
    /// may still be on the stack, so they are freed when the next callback
    /// enters the runtime.
    spent: Vec<Closure<dyn FnMut()>>,
    spent_listeners: Vec<Closure<dyn FnMut(Event)>>,
    next_timer: u32,
    listening: HashSet<(ListenTarget, EventKind)>,
    listeners: Vec<Listener>,
    observers: HashMap<ObserverKind, Observer>,
    runtime: SharedRuntime,
}

impl WebHost {
    pub(crate) fn new(window: Window, document: Document, runtime: SharedRuntime) -> Self {
        Self {
            window,
            document,
            nodes: Vec::new(),
            ids: WeakMap::new(),
            timers: HashMap::new(),
            spent: Vec::new(),
            spent_listeners: Vec::new(),
            next_timer: 0,
            listening: HashSet::new(),
            listeners: Vec::new(),
            observers: HashMap::new(),
            runtime,
        }
    }

    /// Handle for `element`, registering it on first sight.
    pub(crate) fn node_for(&mut self, element: &Element) -> NodeId {
        let key: &js_sys::Object = element.as_ref();
        if let Some(index) = self.ids.get(key).as_f64() {
            return NodeId(index as u32);
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(element.clone()));
        self.ids.set(key, &JsValue::from(id.0));
        id
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0 as usize)?.as_ref()
    }

    fn html(&self, node: NodeId) -> Option<&HtmlElement> {
        self.element(node)?.dyn_ref::<HtmlElement>()
    }

    fn collect(&mut self, list: NodeList) -> Vec<NodeId> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .map(|el| self.node_for(&el))
            .collect()
    }

    /// Free callbacks parked by earlier dispatches. Only called on entry to
    /// the runtime, when none of them can be running.
    pub(crate) fn release_spent(&mut self) {
        self.spent.clear();
        self.spent_listeners.clear();
    }

    /// Called first thing when a timer fires. One-shot timers leave the
    /// table; intervals stay until cleared.
    pub(crate) fn retire_timer(&mut self, handle: TimerHandle) {
        if self.timers.get(&handle).is_some_and(|t| !t.repeating) {
            if let Some(timer) = self.timers.remove(&handle) {
                self.spent.push(timer.callback);
            }
        }
    }

    fn schedule(&mut self, delay_ms: u32, key: TimerKey, repeating: bool) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        let callback = runtime::timer_callback(self.runtime.clone(), handle, key);
        let delay = delay_ms.min(i32::MAX as u32) as i32;
        let function = callback.as_ref().unchecked_ref();
        let id = if repeating {
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_0(function, delay)
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(function, delay)
        };
        match id {
            Ok(id) => {
                self.timers.insert(
                    handle,
                    Timer {
                        id,
                        repeating,
                        callback,
                    },
                );
            }
            Err(err) => log::warn!("timer for {key:?} not scheduled: {err:?}"),
        }
        handle
    }

    fn cancel_browser_timer(&self, timer: &Timer) {
        if timer.repeating {
            self.window.clear_interval_with_handle(timer.id);
        } else {
            self.window.clear_timeout_with_handle(timer.id);
        }
    }

    /// Forget every registered node inside `root`: their listeners are
    /// detached and their slots emptied so the elements can be collected.
    fn release_subtree(&mut self, root: &Element) {
        let released: HashSet<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| {
                slot.as_ref()
                    .is_some_and(|el| root.contains(Some(el.as_ref())))
            })
            .map(|(index, _)| NodeId(index as u32))
            .collect();
        if released.is_empty() {
            return;
        }

        let (dropped, kept): (Vec<Listener>, Vec<Listener>) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(|l| matches!(l.key.0, ListenTarget::Node(n) if released.contains(&n)));
        self.listeners = kept;
        for listener in dropped {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.name,
                listener.callback.as_ref().unchecked_ref(),
            );
            self.listening.remove(&listener.key);
            self.spent_listeners.push(listener.callback);
        }

        for node in released {
            let Some(el) = self.nodes.get_mut(node.0 as usize).and_then(Option::take) else {
                continue;
            };
            self.ids.delete(AsRef::<js_sys::Object>::as_ref(&el));
            for observer in self.observers.values() {
                observer.observer.unobserve(&el);
            }
        }
    }

    fn event_target(&self, target: ListenTarget) -> Option<EventTarget> {
        match target {
            ListenTarget::Window => Some(AsRef::<EventTarget>::as_ref(&self.window).clone()),
            ListenTarget::Document => Some(AsRef::<EventTarget>::as_ref(&self.document).clone()),
            ListenTarget::Node(node) => self
                .element(node)
                .map(|el| AsRef::<EventTarget>::as_ref(el).clone()),
        }
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        for listener in &self.listeners {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.name,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        for timer in self.timers.values() {
            self.cancel_browser_timer(timer);
        }
        for observer in self.observers.values() {
            observer.observer.disconnect();
        }
    }
}

impl Host for WebHost {
    fn query_all(&mut self, selector: &str) -> Vec<NodeId> {
        match self.document.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                log::warn!("bad selector {selector}: {err:?}");
                Vec::new()
            }
        }
    }

    fn query_within(&mut self, root: NodeId, selector: &str) -> Option<NodeId> {
        let found = self.element(root)?.query_selector(selector).ok()??;
        Some(self.node_for(&found))
    }

    fn by_id(&mut self, id: &str) -> Option<NodeId> {
        let found = self.document.get_element_by_id(id)?;
        Some(self.node_for(&found))
    }

    fn parent(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.element(node)?.parent_element()?;
        Some(self.node_for(&parent))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(a), Some(n)) => a.contains(Some(n.as_ref())),
            _ => false,
        }
    }

    fn body(&mut self) -> Option<NodeId> {
        let body = self.document.body()?;
        Some(self.node_for(body.as_ref()))
    }

    fn head(&mut self) -> Option<NodeId> {
        let head = self.document.head()?;
        Some(self.node_for(head.as_ref()))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn layout(&self, node: NodeId) -> Layout {
        let Some(el) = self.element(node) else {
            return Layout::default();
        };
        let r = el.get_bounding_client_rect();
        let rect = Rect {
            left: r.left(),
            top: r.top(),
            width: r.width(),
            height: r.height(),
        };
        let (offset_width, offset_top, offset_left) = match el.dyn_ref::<HtmlElement>() {
            Some(html) => (
                html.offset_width() as f64,
                html.offset_top() as f64,
                html.offset_left() as f64,
            ),
            None => (0.0, 0.0, 0.0),
        };
        Layout {
            offset_width,
            offset_top,
            offset_left,
            client_height: el.client_height() as f64,
            rect,
        }
    }

    fn gap_px(&self, node: NodeId) -> Option<f64> {
        let el = self.element(node)?;
        let style = self.window.get_computed_style(el).ok()??;
        let gap = style.get_property_value("gap").ok()?;
        gap.trim().trim_end_matches("px").parse().ok()
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self
                .window
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or_default(),
            scroll_y: self.window.scroll_y().unwrap_or_default(),
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        matches!(
            self.window.match_media(REDUCED_MOTION_QUERY),
            Ok(Some(query)) if query.matches()
        )
    }

    fn form_value(&self, form: NodeId, field: &str) -> Option<String> {
        let form = self.element(form)?.dyn_ref::<HtmlFormElement>()?;
        FormData::new_with_form(form).ok()?.get(field).as_string()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(html) = self.html(node) {
            let _ = html.style().set_property(property, value);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().toggle(class);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.element(node) {
            el.set_text_content(Some(text));
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        let el = self.document.create_element(tag).ok()?;
        Some(self.node_for(&el))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(p), Some(c)) = (self.element(parent), self.element(child)) {
            let _ = p.append_child(c);
        }
    }

    fn remove(&mut self, node: NodeId) {
        let Some(el) = self.element(node).cloned() else {
            return;
        };
        self.release_subtree(&el);
        el.remove();
    }

    fn reset_form(&mut self, form: NodeId) {
        if let Some(form) = self
            .element(form)
            .and_then(|el| el.dyn_ref::<HtmlFormElement>())
        {
            form.reset();
        }
    }

    fn scroll_to(&mut self, top: f64, smooth: bool) {
        let opts = ScrollToOptions::new();
        opts.set_top(top);
        opts.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        self.window.scroll_to_with_scroll_to_options(&opts);
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if let Some(el) = self.element(node) {
            let opts = ScrollIntoViewOptions::new();
            opts.set_behavior(ScrollBehavior::Smooth);
            el.scroll_into_view_with_scroll_into_view_options(&opts);
        }
    }

    fn set_timeout(&mut self, delay_ms: u32, key: TimerKey) -> TimerHandle {
        self.schedule(delay_ms, key, false)
    }

    fn set_interval(&mut self, period_ms: u32, key: TimerKey) -> TimerHandle {
        self.schedule(period_ms, key, true)
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        if let Some(timer) = self.timers.remove(&handle) {
            self.cancel_browser_timer(&timer);
            // May be the interval that is running right now.
            self.spent.push(timer.callback);
        }
    }

    fn listen(&mut self, target: ListenTarget, kind: EventKind) {
        if self.listening.contains(&(target, kind)) {
            return;
        }
        let Some(event_target) = self.event_target(target) else {
            return;
        };
        let name = event_name(kind);
        let callback = runtime::event_callback(self.runtime.clone(), target, kind);
        let function = callback.as_ref().unchecked_ref();
        let added = if is_passive(kind) {
            let opts = AddEventListenerOptions::new();
            opts.set_passive(true);
            event_target.add_event_listener_with_callback_and_add_event_listener_options(
                name, function, &opts,
            )
        } else {
            event_target.add_event_listener_with_callback(name, function)
        };
        match added {
            Ok(()) => {
                self.listening.insert((target, kind));
                self.listeners.push(Listener {
                    key: (target, kind),
                    target: event_target,
                    name,
                    callback,
                });
            }
            Err(err) => log::warn!("could not listen for {name}: {err:?}"),
        }
    }

    fn observe(&mut self, node: NodeId, kind: ObserverKind, options: ObserverOptions) {
        let Some(el) = self.element(node).cloned() else {
            return;
        };
        if !self.observers.contains_key(&kind) {
            // Options are fixed per kind by the first registration.
            match runtime::observer(self.runtime.clone(), kind, options) {
                Ok(observer) => {
                    self.observers.insert(kind, observer);
                }
                Err(err) => {
                    log::warn!("{kind:?} observer unavailable: {err:?}");
                    return;
                }
            }
        }
        if let Some(observer) = self.observers.get(&kind) {
            observer.observer.observe(&el);
        }
    }

    fn unobserve(&mut self, node: NodeId, kind: ObserverKind) {
        if let (Some(el), Some(observer)) = (self.element(node), self.observers.get(&kind)) {
            observer.observer.unobserve(el);
        }
    }
}
