//! Capability interface between the controllers and whatever renders the page.
//!
//! Controllers only ever talk to a [`Host`]: they query nodes, read layout
//! metrics, mutate classes/styles, schedule timers and subscribe to events.
//! The browser adapter lives in `coachsite-wasm`; tests drive an in-memory
//! implementation from `coachsite-test-fixtures`.

use serde::{Deserialize, Serialize};

use crate::events::TimerKey;

/// Opaque handle to a DOM node. Stable for the lifetime of the page.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Opaque handle to a scheduled timeout or interval.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u32);

/// Where an event listener is attached.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ListenTarget {
    Window,
    Document,
    Node(NodeId),
}

/// Browser events the controllers subscribe to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    Click,
    Submit,
    KeyDown,
    TouchStart,
    TouchEnd,
    MouseDown,
    MouseMove,
    MouseUp,
    MouseEnter,
    MouseLeave,
}

/// Visibility observers. Each kind maps to one observer instance on the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ObserverKind {
    RevealElement,
    RevealSection,
    Counter,
    LazyImage,
}

/// Trigger region for a visibility observer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Fraction of the target that must be visible, `0.0..=1.0`.
    pub threshold: f64,
    /// Amount the bottom edge of the root is pulled in, in pixels.
    pub bottom_margin_px: f64,
}

impl ObserverOptions {
    pub fn new(threshold: f64, bottom_margin_px: f64) -> Self {
        Self {
            threshold,
            bottom_margin_px,
        }
    }

    /// `rootMargin` string as the browser expects it.
    pub fn root_margin(&self) -> String {
        if self.bottom_margin_px == 0.0 {
            "0px".to_string()
        } else {
            format!("0px 0px -{}px 0px", self.bottom_margin_px)
        }
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Bounding client rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Layout metrics of a single node. Unrendered nodes report zeros.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub offset_width: f64,
    pub offset_top: f64,
    pub offset_left: f64,
    pub client_height: f64,
    pub rect: Rect,
}

/// Window-level metrics shared by every controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub scroll_y: f64,
}

/// Whether the host should suppress the browser's default action.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Propagation {
    #[default]
    Continue,
    PreventDefault,
}

impl Propagation {
    /// Combine two outcomes; prevention wins.
    pub fn merge(self, other: Propagation) -> Propagation {
        if self == Propagation::PreventDefault || other == Propagation::PreventDefault {
            Propagation::PreventDefault
        } else {
            Propagation::Continue
        }
    }
}

/// Everything a controller may ask of the page.
///
/// Lookups that fail return `None`/empty and writes to unknown nodes are
/// ignored, so a page missing some markup simply loses that enhancement.
pub trait Host {
    // --- queries ---
    fn query_all(&mut self, selector: &str) -> Vec<NodeId>;

    fn query(&mut self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// First descendant of `root` matching `selector`.
    fn query_within(&mut self, root: NodeId, selector: &str) -> Option<NodeId>;
    fn by_id(&mut self, id: &str) -> Option<NodeId>;
    fn parent(&mut self, node: NodeId) -> Option<NodeId>;
    /// True when `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
    fn body(&mut self) -> Option<NodeId>;
    fn head(&mut self) -> Option<NodeId>;

    // --- reads ---
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn layout(&self, node: NodeId) -> Layout;
    /// Computed `gap` of a flex/grid container, if it parses as pixels.
    fn gap_px(&self, node: NodeId) -> Option<f64>;
    fn viewport(&self) -> Viewport;
    fn prefers_reduced_motion(&self) -> bool;
    /// Current value of a named control inside `form`.
    fn form_value(&self, form: NodeId, field: &str) -> Option<String>;

    // --- writes ---
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn toggle_class(&mut self, node: NodeId, class: &str);
    fn set_text(&mut self, node: NodeId, text: &str);
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn create_element(&mut self, tag: &str) -> Option<NodeId>;
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    /// Detach `node` from the document. Listeners on it and its descendants
    /// are dropped with it, and their handles must not be reused.
    fn remove(&mut self, node: NodeId);
    fn reset_form(&mut self, form: NodeId);
    fn scroll_to(&mut self, top: f64, smooth: bool);
    fn scroll_into_view(&mut self, node: NodeId);

    // --- scheduling ---
    fn set_timeout(&mut self, delay_ms: u32, key: TimerKey) -> TimerHandle;
    fn set_interval(&mut self, period_ms: u32, key: TimerKey) -> TimerHandle;
    fn clear_timer(&mut self, handle: TimerHandle);

    // --- subscriptions ---
    /// Idempotent per `(target, kind)`; a second call is a no-op.
    fn listen(&mut self, target: ListenTarget, kind: EventKind);
    fn observe(&mut self, node: NodeId, kind: ObserverKind, options: ObserverOptions);
    fn unobserve(&mut self, node: NodeId, kind: ObserverKind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_shrinks_bottom_edge() {
        assert_eq!(ObserverOptions::new(0.1, 50.0).root_margin(), "0px 0px -50px 0px");
        assert_eq!(ObserverOptions::default().root_margin(), "0px");
    }

    #[test]
    fn prevent_default_wins_merge() {
        use Propagation::*;
        assert_eq!(Continue.merge(Continue), Continue);
        assert_eq!(Continue.merge(PreventDefault), PreventDefault);
        assert_eq!(PreventDefault.merge(Continue), PreventDefault);
    }
}
