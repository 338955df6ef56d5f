//! Single-card references (testimonials) carousel with swipe and drag input.

use crate::config::ReferencesConfig;
use crate::events::{PageEvent, TimerKey};
use crate::host::{EventKind, Host, ListenTarget, NodeId, Propagation};
use crate::styles::translate_x;
use crate::timing::Debouncer;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ReferencesState {
    current_index: usize,
    card_count: usize,
}

impl ReferencesState {
    pub fn new(card_count: usize) -> Self {
        Self {
            current_index: 0,
            card_count,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn max_index(&self) -> usize {
        self.card_count.saturating_sub(1)
    }

    pub fn clamp(&mut self, index: usize) -> usize {
        self.current_index = index.min(self.max_index());
        self.current_index
    }

    pub fn next_target(&self) -> usize {
        if self.current_index < self.max_index() {
            self.current_index + 1
        } else {
            0
        }
    }

    pub fn prev_target(&self) -> usize {
        if self.current_index > 0 {
            self.current_index - 1
        } else {
            self.max_index()
        }
    }
}

/// Direction decided by a completed swipe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SwipeDirection {
    Next,
    Prev,
}

/// Touch start/end pair. Consumed by [`SwipeGesture::finish`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SwipeGesture {
    start_x: Option<f64>,
}

impl SwipeGesture {
    pub fn begin(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Close the gesture at `end_x`. Travel must strictly exceed
    /// `threshold_px`; a finger moving left (`start > end`) means next.
    pub fn finish(&mut self, end_x: f64, threshold_px: f64) -> Option<SwipeDirection> {
        let start = self.start_x.take().unwrap_or(0.0);
        let diff = start - end_x;
        if diff.abs() <= threshold_px {
            None
        } else if diff > 0.0 {
            Some(SwipeDirection::Next)
        } else {
            Some(SwipeDirection::Prev)
        }
    }
}

/// Mouse drag on the track. Only feeds visual feedback, never navigation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DragState {
    dragging: bool,
    start_x: f64,
    last_walk: f64,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn last_walk(&self) -> f64 {
        self.last_walk
    }
}

#[derive(Debug, Clone)]
struct ReferencesNodes {
    track: NodeId,
    prev: NodeId,
    next: NodeId,
    dots: Vec<NodeId>,
    cards: Vec<NodeId>,
}

#[derive(Debug)]
pub struct ReferencesCarousel {
    nodes: ReferencesNodes,
    state: ReferencesState,
    swipe: SwipeGesture,
    drag: DragState,
    cfg: ReferencesConfig,
    resize: Debouncer,
}

impl ReferencesCarousel {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &ReferencesConfig) -> Option<Self> {
        let track = host.query(".references-carousel-track")?;
        let prev = host.query(".references-carousel-btn-prev")?;
        let next = host.query(".references-carousel-btn-next")?;
        let nodes = ReferencesNodes {
            track,
            prev,
            next,
            dots: host.query_all(".references-carousel-dot"),
            cards: host.query_all(".reference-card"),
        };

        host.listen(ListenTarget::Node(prev), EventKind::Click);
        host.listen(ListenTarget::Node(next), EventKind::Click);
        for &dot in &nodes.dots {
            host.listen(ListenTarget::Node(dot), EventKind::Click);
        }
        for kind in [
            EventKind::TouchStart,
            EventKind::TouchEnd,
            EventKind::MouseDown,
            EventKind::MouseMove,
            EventKind::MouseUp,
            EventKind::MouseLeave,
        ] {
            host.listen(ListenTarget::Node(track), kind);
        }
        host.listen(ListenTarget::Window, EventKind::Resize);

        let mut carousel = Self {
            state: ReferencesState::new(nodes.cards.len()),
            nodes,
            swipe: SwipeGesture::default(),
            drag: DragState::default(),
            cfg: cfg.clone(),
            resize: Debouncer::new(cfg.resize_debounce_ms, TimerKey::ReferencesResize),
        };
        carousel.move_to_index(host, 0, true);
        log::debug!("references: {} cards", carousel.state.card_count());
        Some(carousel)
    }

    pub fn state(&self) -> &ReferencesState {
        &self.state
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Width of one page: the track's parent viewport, else the first card.
    fn page_width<H: Host + ?Sized>(&self, host: &mut H) -> Option<f64> {
        let viewport = host
            .parent(self.nodes.track)
            .map(|p| host.layout(p).offset_width)
            .filter(|w| *w > 0.0);
        viewport.or_else(|| {
            self.nodes
                .cards
                .first()
                .map(|&c| host.layout(c).offset_width)
                .filter(|w| *w > 0.0)
        })
    }

    pub fn move_to_index<H: Host + ?Sized>(&mut self, host: &mut H, index: usize, smooth: bool) {
        let current = self.state.clamp(index);

        if let Some(width) = self.page_width(host) {
            let transition = if smooth {
                self.cfg.slide_transition.as_str()
            } else {
                "none"
            };
            host.set_style(self.nodes.track, "transition", transition);
            host.set_style(
                self.nodes.track,
                "transform",
                &translate_x(-(current as f64 * width)),
            );
        }

        for (i, &dot) in self.nodes.dots.iter().enumerate() {
            if i == current {
                host.add_class(dot, "active");
            } else {
                host.remove_class(dot, "active");
            }
        }
    }

    pub fn next_slide<H: Host + ?Sized>(&mut self, host: &mut H) {
        let target = self.state.next_target();
        self.move_to_index(host, target, true);
    }

    pub fn prev_slide<H: Host + ?Sized>(&mut self, host: &mut H) {
        let target = self.state.prev_target();
        self.move_to_index(host, target, true);
    }

    pub fn dot_click<H: Host + ?Sized>(&mut self, host: &mut H, dot: usize) {
        self.move_to_index(host, dot, true);
    }

    fn end_drag<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.drag.dragging = false;
        host.set_style(self.nodes.track, "cursor", "grab");
    }

    /// Returns whether the event was ours and what the host should do with it.
    pub fn handle<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: &PageEvent,
    ) -> Option<Propagation> {
        let track = self.nodes.track;
        match *event {
            PageEvent::Click { node: Some(node), .. } => {
                if node == self.nodes.next {
                    self.next_slide(host);
                } else if node == self.nodes.prev {
                    self.prev_slide(host);
                } else if let Some(dot) = self.nodes.dots.iter().position(|d| *d == node) {
                    self.dot_click(host, dot);
                } else {
                    return None;
                }
            }
            PageEvent::TouchStart { node, client_x } if node == track => {
                self.swipe.begin(client_x);
            }
            PageEvent::TouchEnd { node, client_x } if node == track => {
                match self.swipe.finish(client_x, self.cfg.swipe_threshold_px) {
                    Some(SwipeDirection::Next) => self.next_slide(host),
                    Some(SwipeDirection::Prev) => self.prev_slide(host),
                    None => {}
                }
            }
            PageEvent::MouseDown { node, page_x } if node == track => {
                self.drag.dragging = true;
                self.drag.start_x = page_x - host.layout(track).offset_left;
                self.drag.last_walk = 0.0;
                host.set_style(track, "cursor", "grabbing");
            }
            PageEvent::MouseMove { node, page_x } if node == track => {
                if !self.drag.dragging {
                    return Some(Propagation::Continue);
                }
                let x = page_x - host.layout(track).offset_left;
                self.drag.last_walk = (x - self.drag.start_x) * self.cfg.drag_multiplier;
                return Some(Propagation::PreventDefault);
            }
            PageEvent::MouseUp { node } | PageEvent::MouseLeave { node } if node == track => {
                self.end_drag(host);
            }
            PageEvent::Resize => {
                self.resize.schedule(host);
            }
            PageEvent::Timer(key) if self.resize.settle(key) => {
                let current = self.state.current_index();
                self.move_to_index(host, current, false);
            }
            _ => return None,
        }
        Some(Propagation::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_wrap_both_ends() {
        let mut s = ReferencesState::new(4);
        assert_eq!(s.prev_target(), 3);
        s.clamp(3);
        assert_eq!(s.next_target(), 0);
        s.clamp(1);
        assert_eq!(s.next_target(), 2);
        assert_eq!(s.prev_target(), 0);
    }

    #[test]
    fn clamp_stays_in_card_range() {
        let mut s = ReferencesState::new(3);
        assert_eq!(s.clamp(10), 2);
        let mut empty = ReferencesState::new(0);
        assert_eq!(empty.clamp(4), 0);
        assert_eq!(empty.next_target(), 0);
        assert_eq!(empty.prev_target(), 0);
    }

    #[test]
    fn swipe_threshold_is_strict() {
        let mut g = SwipeGesture::default();
        g.begin(200.0);
        assert_eq!(g.finish(140.0, 50.0), Some(SwipeDirection::Next));
        g.begin(200.0);
        assert_eq!(g.finish(170.0, 50.0), None);
        g.begin(200.0);
        assert_eq!(g.finish(150.0, 50.0), None);
        g.begin(100.0);
        assert_eq!(g.finish(180.0, 50.0), Some(SwipeDirection::Prev));
    }
}
