//! Event contracts delivered by the host into [`crate::Site::handle`].

use serde::{Deserialize, Serialize};

use crate::host::{NodeId, ObserverKind};

/// Identifier of a live toast notification.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ToastId(pub u32);

/// Continuation tag carried by a scheduled timer. The host hands it back
/// unchanged when the timer fires.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TimerKey {
    RevealElement(NodeId),
    CounterTick(NodeId),
    GalleryResize,
    ReferencesResize,
    NavbarThrottle,
    ToastEnter(ToastId),
    ToastExit(ToastId),
    ToastRemove(ToastId),
    RippleRemove(NodeId),
    /// Keyed by the modal root it removes.
    ModalRemove(NodeId),
    ReflowResize,
    ReflowRestore,
}

/// A browser callback, flattened into plain data.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    Scroll,
    Resize,
    /// `node` is the element the listener was attached to (`None` for the
    /// document); `origin` is the innermost element that was clicked.
    Click {
        node: Option<NodeId>,
        origin: Option<NodeId>,
        client_x: f64,
        client_y: f64,
    },
    Submit {
        form: NodeId,
    },
    KeyDown {
        key: String,
    },
    TouchStart {
        node: NodeId,
        client_x: f64,
    },
    TouchEnd {
        node: NodeId,
        client_x: f64,
    },
    MouseDown {
        node: NodeId,
        page_x: f64,
    },
    MouseMove {
        node: NodeId,
        page_x: f64,
    },
    MouseUp {
        node: NodeId,
    },
    MouseEnter {
        node: NodeId,
    },
    MouseLeave {
        node: NodeId,
    },
    /// `node` crossed the threshold of observer `kind`.
    Visible {
        node: NodeId,
        kind: ObserverKind,
    },
    Timer(TimerKey),
}

impl PageEvent {
    /// Click on a specific node with no pointer coordinates.
    pub fn click(node: NodeId) -> Self {
        PageEvent::Click {
            node: Some(node),
            origin: Some(node),
            client_x: 0.0,
            client_y: 0.0,
        }
    }

    /// The node a click listener was attached to, if any.
    pub fn clicked_node(&self) -> Option<NodeId> {
        match self {
            PageEvent::Click { node, .. } => *node,
            _ => None,
        }
    }
}
