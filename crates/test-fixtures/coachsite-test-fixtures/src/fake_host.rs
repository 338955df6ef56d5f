//! In-memory [`Host`] with a tiny DOM, fixed layout metrics and a virtual clock.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use serde::Deserialize;

use coachsite_core::{
    EventKind, Host, Layout, ListenTarget, NodeId, ObserverKind, ObserverOptions, TimerHandle,
    TimerKey, Viewport,
};

use crate::selector::{AttrMatch, Compound, SelectorList};

/// Node description as written in page fixtures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub layout: Layout,
    pub gap: Option<f64>,
    pub text: String,
    pub children: Vec<NodeSpec>,
}

/// Whole-page fixture: `<html>` root plus window state.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub reduced_motion: bool,
    pub root: NodeSpec,
}

#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub layout: Layout,
    pub gap: Option<f64>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub attached: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    key: TimerKey,
    period: Option<u32>,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    nodes: Vec<FakeNode>,
    root: Option<NodeId>,
    viewport: Viewport,
    reduced_motion: bool,
    now_ms: u64,
    seq: u64,
    next_timer: u32,
    timers: BTreeMap<(u64, u64), PendingTimer>,
    listeners: HashSet<(ListenTarget, EventKind)>,
    observers: HashMap<(NodeId, ObserverKind), ObserverOptions>,
    scroll_calls: Vec<(f64, bool)>,
    scrolled_into_view: Vec<NodeId>,
}

impl FakeHost {
    pub fn from_page(page: &PageSpec) -> Self {
        let mut host = FakeHost {
            viewport: page.viewport,
            reduced_motion: page.reduced_motion,
            ..Default::default()
        };
        let root = host.build(&page.root, None);
        host.root = Some(root);
        host
    }

    fn build(&mut self, spec: &NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut attrs = spec.attrs.clone();
        if let Some(dom_id) = &spec.id {
            attrs.insert("id".to_string(), dom_id.clone());
        }
        self.nodes.push(FakeNode {
            tag: spec.tag.to_ascii_lowercase(),
            attrs,
            classes: spec.classes.clone(),
            text: spec.text.clone(),
            layout: spec.layout,
            gap: spec.gap,
            parent,
            attached: true,
            ..Default::default()
        });
        let children: Vec<NodeId> = spec.children.iter().map(|c| self.build(c, Some(id))).collect();
        self.nodes[id.0 as usize].children = children;
        id
    }

    fn node(&self, id: NodeId) -> Option<&FakeNode> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut FakeNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Attached nodes under `from` in document order, `from` included.
    fn walk(&self, from: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.node(from) else {
            return;
        };
        out.push(from);
        for &child in &node.children {
            self.walk(child, out);
        }
    }

    fn matches(&self, id: NodeId, compound: &Compound) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if let Some(tag) = &compound.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(want) = &compound.id {
            if node.attrs.get("id") != Some(want) {
                return false;
            }
        }
        if !compound.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        compound.attrs.iter().all(|(name, m)| match (node.attrs.get(name), m) {
            (Some(_), AttrMatch::Present) => true,
            (Some(v), AttrMatch::Equals(want)) => v == want,
            (Some(v), AttrMatch::Prefix(want)) => v.starts_with(want.as_str()),
            (None, _) => false,
        })
    }

    fn select(&self, scope: NodeId, selector: &str, include_scope: bool) -> Vec<NodeId> {
        let list = match SelectorList::parse(selector) {
            Ok(list) => list,
            Err(err) => panic!("fake host cannot parse selector '{selector}': {err}"),
        };
        let mut all = Vec::new();
        self.walk(scope, &mut all);
        all.into_iter()
            .filter(|&id| include_scope || id != scope)
            .filter(|&id| list.0.iter().any(|c| self.matches(id, c)))
            .collect()
    }

    // --- inspection helpers for tests ---

    pub fn find(&self, selector: &str) -> Option<NodeId> {
        self.find_all(selector).into_iter().next()
    }

    pub fn find_all(&self, selector: &str) -> Vec<NodeId> {
        match self.root {
            Some(root) => self.select(root, selector, true),
            None => Vec::new(),
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)?.style.get(property).map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.text.as_str())
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.node(node).map(|n| n.classes.clone()).unwrap_or_default()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if Some(id) == self.root {
                return true;
            }
            match self.node(id) {
                Some(n) if n.attached => cur = n.parent,
                _ => return false,
            }
        }
        false
    }

    pub fn set_layout(&mut self, node: NodeId, layout: Layout) {
        if let Some(n) = self.node_mut(node) {
            n.layout = layout;
        }
    }

    pub fn set_gap(&mut self, node: NodeId, gap: Option<f64>) {
        if let Some(n) = self.node_mut(node) {
            n.gap = gap;
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport.width = width;
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.viewport.scroll_y = y;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Type into the control named `field` inside `form`.
    pub fn set_form_value(&mut self, form: NodeId, field: &str, value: &str) {
        if let Some(control) = self.named_control(form, field) {
            if let Some(n) = self.node_mut(control) {
                n.attrs.insert("value".to_string(), value.to_string());
            }
        }
    }

    fn named_control(&self, form: NodeId, field: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.walk(form, &mut all);
        all.into_iter()
            .find(|&id| self.node(id).and_then(|n| n.attrs.get("name")).map(String::as_str) == Some(field))
    }

    pub fn is_listening(&self, target: ListenTarget, kind: EventKind) -> bool {
        self.listeners.contains(&(target, kind))
    }

    /// Number of live `(target, kind)` subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn observer(&self, node: NodeId, kind: ObserverKind) -> Option<ObserverOptions> {
        self.observers.get(&(node, kind)).copied()
    }

    pub fn observed(&self, kind: ObserverKind) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .observers
            .keys()
            .filter(|(_, k)| *k == kind)
            .map(|(n, _)| *n)
            .collect();
        nodes.sort_by_key(|n| n.0);
        nodes
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_timers(&self) -> Vec<TimerKey> {
        self.timers.values().map(|t| t.key).collect()
    }

    pub fn scroll_calls(&self) -> &[(f64, bool)] {
        &self.scroll_calls
    }

    pub fn scrolled_into_view(&self) -> &[NodeId] {
        &self.scrolled_into_view
    }

    /// Pop the earliest timer due at or before `deadline`, moving the clock to it.
    pub fn pop_due(&mut self, deadline: u64) -> Option<TimerKey> {
        let (&(due, seq), _) = self.timers.iter().next()?;
        if due > deadline {
            return None;
        }
        let timer = self.timers.remove(&(due, seq))?;
        self.now_ms = due;
        if let Some(period) = timer.period {
            self.seq += 1;
            self.timers
                .insert((due + period.max(1) as u64, self.seq), timer);
        }
        Some(timer.key)
    }

    pub fn set_clock(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    fn schedule(&mut self, delay_ms: u32, key: TimerKey, period: Option<u32>) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        self.seq += 1;
        self.timers.insert(
            (self.now_ms + delay_ms as u64, self.seq),
            PendingTimer {
                handle,
                key,
                period,
            },
        );
        handle
    }
}

impl Host for FakeHost {
    fn query_all(&mut self, selector: &str) -> Vec<NodeId> {
        self.find_all(selector)
    }

    fn query_within(&mut self, root: NodeId, selector: &str) -> Option<NodeId> {
        self.select(root, selector, false).into_iter().next()
    }

    fn by_id(&mut self, id: &str) -> Option<NodeId> {
        let root = self.root?;
        let mut all = Vec::new();
        self.walk(root, &mut all);
        all.into_iter()
            .find(|&n| self.node(n).and_then(|n| n.attrs.get("id")).map(String::as_str) == Some(id))
    }

    fn parent(&mut self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn body(&mut self) -> Option<NodeId> {
        self.find("body")
    }

    fn head(&mut self) -> Option<NodeId> {
        self.find("head")
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)?.attrs.get(name).cloned()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn layout(&self, node: NodeId) -> Layout {
        self.node(node).map(|n| n.layout).unwrap_or_default()
    }

    fn gap_px(&self, node: NodeId) -> Option<f64> {
        self.node(node)?.gap
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn form_value(&self, form: NodeId, field: &str) -> Option<String> {
        let control = self.named_control(form, field)?;
        self.attribute(control, "value")
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            if value.is_empty() {
                n.style.remove(property);
            } else {
                n.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            self.remove_class(node, class);
        } else {
            self.add_class(node, class);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_string();
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FakeNode {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        });
        Some(id)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        if let Some(old) = self.node(child).and_then(|n| n.parent) {
            if let Some(p) = self.node_mut(old) {
                p.children.retain(|c| *c != child);
            }
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
            c.attached = true;
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        let mut subtree = Vec::new();
        self.walk(node, &mut subtree);
        self.listeners.retain(|(target, _)| match target {
            ListenTarget::Node(n) => !subtree.contains(n),
            _ => true,
        });
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != node);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
            n.attached = false;
        }
    }

    fn reset_form(&mut self, form: NodeId) {
        let mut all = Vec::new();
        self.walk(form, &mut all);
        for id in all {
            if let Some(n) = self.node_mut(id) {
                if n.attrs.contains_key("name") {
                    n.attrs.insert("value".to_string(), String::new());
                }
            }
        }
    }

    fn scroll_to(&mut self, top: f64, smooth: bool) {
        self.scroll_calls.push((top, smooth));
        self.viewport.scroll_y = top.max(0.0);
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        self.scrolled_into_view.push(node);
    }

    fn set_timeout(&mut self, delay_ms: u32, key: TimerKey) -> TimerHandle {
        self.schedule(delay_ms, key, None)
    }

    fn set_interval(&mut self, period_ms: u32, key: TimerKey) -> TimerHandle {
        self.schedule(period_ms, key, Some(period_ms))
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        self.timers.retain(|_, t| t.handle != handle);
    }

    fn listen(&mut self, target: ListenTarget, kind: EventKind) {
        self.listeners.insert((target, kind));
    }

    fn observe(&mut self, node: NodeId, kind: ObserverKind, options: ObserverOptions) {
        self.observers.insert((node, kind), options);
    }

    fn unobserve(&mut self, node: NodeId, kind: ObserverKind) {
        self.observers.remove(&(node, kind));
    }
}
