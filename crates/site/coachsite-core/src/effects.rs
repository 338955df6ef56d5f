//! Decorative behaviours: parallax, ripples, load-in stagger, hover
//! transitions, lazy images and the post-resize reflow nudge.

use hashbrown::HashSet;

use crate::config::EffectsConfig;
use crate::events::{PageEvent, TimerKey};
use crate::host::{EventKind, Host, ListenTarget, NodeId, ObserverKind, ObserverOptions};
use crate::motion::MotionPreference;
use crate::styles::translate_y;
use crate::timing::Debouncer;

const HOVER_SELECTOR: &str = ".btn, .service-card, .feature-item, .testimonial-card, .gallery-item";

#[derive(Debug)]
pub struct Parallax {
    background: NodeId,
    speed: f64,
}

impl Parallax {
    /// Disabled under reduced motion or when there is no hero background.
    pub fn init<H: Host + ?Sized>(
        host: &mut H,
        cfg: &EffectsConfig,
        motion: MotionPreference,
    ) -> Option<Self> {
        if motion.reduced() {
            return None;
        }
        let background = host.query(".hero-background")?;
        host.listen(ListenTarget::Window, EventKind::Scroll);
        Some(Self {
            background,
            speed: cfg.parallax_speed,
        })
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        if *event != PageEvent::Scroll {
            return false;
        }
        let offset = host.viewport().scroll_y * self.speed;
        host.set_style(self.background, "transform", &translate_y(offset));
        true
    }
}

/// Click ripple on `.btn` elements.
#[derive(Debug)]
pub struct Ripple {
    buttons: Vec<NodeId>,
    live: HashSet<NodeId>,
    lifetime_ms: u32,
}

impl Ripple {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &EffectsConfig) -> Self {
        let buttons = host.query_all(".btn");
        for &button in &buttons {
            host.listen(ListenTarget::Node(button), EventKind::Click);
        }
        Self {
            buttons,
            live: HashSet::new(),
            lifetime_ms: cfg.ripple_ms,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn spawn<H: Host + ?Sized>(&mut self, host: &mut H, button: NodeId, client_x: f64, client_y: f64) {
        let rect = host.layout(button).rect;
        let size = rect.width.max(rect.height);
        let x = client_x - rect.left - size / 2.0;
        let y = client_y - rect.top - size / 2.0;
        let Some(ripple) = host.create_element("span") else {
            return;
        };
        for (prop, value) in [
            ("position", "absolute".to_string()),
            ("width", format!("{size}px")),
            ("height", format!("{size}px")),
            ("left", format!("{x}px")),
            ("top", format!("{y}px")),
            ("background", "rgba(255, 255, 255, 0.3)".to_string()),
            ("border-radius", "50%".to_string()),
            ("transform", "scale(0)".to_string()),
            ("animation", "ripple 0.6s linear".to_string()),
            ("pointer-events", "none".to_string()),
        ] {
            host.set_style(ripple, prop, &value);
        }
        host.set_style(button, "position", "relative");
        host.set_style(button, "overflow", "hidden");
        host.append_child(button, ripple);
        host.set_timeout(self.lifetime_ms, TimerKey::RippleRemove(ripple));
        self.live.insert(ripple);
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match *event {
            PageEvent::Click {
                node: Some(node),
                client_x,
                client_y,
                ..
            } if self.buttons.contains(&node) => {
                self.spawn(host, node, client_x, client_y);
                true
            }
            PageEvent::Timer(TimerKey::RippleRemove(ripple)) if self.live.remove(&ripple) => {
                host.remove(ripple);
                true
            }
            _ => false,
        }
    }
}

/// Staggered load-in for the hero text and image.
pub fn stagger_loading<H: Host + ?Sized>(host: &mut H, cfg: &EffectsConfig) -> usize {
    let nodes = host.query_all(".hero-text, .hero-image");
    for (i, &node) in nodes.iter().enumerate() {
        host.add_class(node, "loading");
        let delay = i as u64 * cfg.loading_stagger_ms as u64;
        host.set_style(node, "animation-delay", &format!("{delay}ms"));
    }
    nodes.len()
}

/// Transition applied to interactive cards and buttons while hovered.
#[derive(Debug)]
pub struct HoverTransitions {
    nodes: Vec<NodeId>,
    transition: String,
}

impl HoverTransitions {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &EffectsConfig) -> Self {
        let nodes = host.query_all(HOVER_SELECTOR);
        for &node in &nodes {
            host.listen(ListenTarget::Node(node), EventKind::MouseEnter);
            host.listen(ListenTarget::Node(node), EventKind::MouseLeave);
        }
        Self {
            nodes,
            transition: cfg.hover_transition.clone(),
        }
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match *event {
            PageEvent::MouseEnter { node } | PageEvent::MouseLeave { node }
                if self.nodes.contains(&node) =>
            {
                host.set_style(node, "transition", &self.transition);
                true
            }
            _ => false,
        }
    }
}

/// `img[loading="lazy"]` swaps in `data-src` on first visibility.
#[derive(Debug, Default)]
pub struct LazyImages {
    pending: HashSet<NodeId>,
}

impl LazyImages {
    pub fn init<H: Host + ?Sized>(host: &mut H) -> Self {
        let mut pending = HashSet::new();
        for img in host.query_all("img[loading=\"lazy\"]") {
            host.observe(img, ObserverKind::LazyImage, ObserverOptions::default());
            pending.insert(img);
        }
        Self { pending }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        let PageEvent::Visible {
            node,
            kind: ObserverKind::LazyImage,
        } = *event
        else {
            return false;
        };
        if !self.pending.remove(&node) {
            return false;
        }
        if let Some(src) = host.attribute(node, "data-src").or_else(|| host.attribute(node, "src")) {
            host.set_attribute(node, "src", &src);
        }
        host.remove_class(node, "lazy");
        host.unobserve(node, ObserverKind::LazyImage);
        true
    }
}

/// After resizing settles, briefly drop gallery item transforms so the
/// browser recomputes their responsive layout.
#[derive(Debug)]
pub struct ResizeReflow {
    items: Vec<NodeId>,
    debounce: Debouncer,
    restore_ms: u32,
}

impl ResizeReflow {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &EffectsConfig) -> Self {
        host.listen(ListenTarget::Window, EventKind::Resize);
        Self {
            items: host.query_all(".gallery-item"),
            debounce: Debouncer::new(cfg.reflow_debounce_ms, TimerKey::ReflowResize),
            restore_ms: cfg.reflow_restore_ms,
        }
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match *event {
            PageEvent::Resize => {
                self.debounce.schedule(host);
                true
            }
            PageEvent::Timer(key) if self.debounce.settle(key) => {
                for &item in &self.items {
                    host.set_style(item, "transform", "none");
                }
                host.set_timeout(self.restore_ms, TimerKey::ReflowRestore);
                true
            }
            PageEvent::Timer(TimerKey::ReflowRestore) => {
                for &item in &self.items {
                    host.set_style(item, "transform", "");
                }
                true
            }
            _ => false,
        }
    }
}
