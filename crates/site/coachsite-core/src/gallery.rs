//! Multi-item gallery carousel with responsive items-per-view and paged dots.
//!
//! Navigation jumps a whole page (`items_per_view` items) and wraps from the
//! last valid start index back to 0, unlike the references carousel which
//! steps one card at a time.

use crate::config::{Breakpoints, GalleryConfig};
use crate::events::{PageEvent, TimerKey};
use crate::host::{EventKind, Host, ListenTarget, NodeId};
use crate::styles::translate_x;
use crate::timing::Debouncer;

/// Items shown side by side at a given viewport width.
pub fn items_per_view_for(width: f64, bp: &Breakpoints) -> usize {
    if width <= bp.phone_max {
        1
    } else if width <= bp.tablet_max {
        2
    } else {
        3
    }
}

/// Index state of the gallery. All navigation goes through [`GalleryState::clamp`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GalleryState {
    current_index: usize,
    items_per_view: usize,
    item_count: usize,
}

impl GalleryState {
    pub fn new(item_count: usize, items_per_view: usize) -> Self {
        Self {
            current_index: 0,
            items_per_view: items_per_view.max(1),
            item_count,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn set_items_per_view(&mut self, n: usize) {
        self.items_per_view = n.max(1);
    }

    /// Last valid start index; 0 when everything fits on one page.
    pub fn max_index(&self) -> usize {
        self.item_count.saturating_sub(self.items_per_view)
    }

    /// Number of reachable start positions, and so of visible dots.
    pub fn total_pages(&self) -> usize {
        (self.max_index() + 1).max(1)
    }

    pub fn active_page(&self) -> usize {
        (self.current_index / self.items_per_view).min(self.total_pages() - 1)
    }

    /// Move to `index`, clamped into `[0, max_index]`. Returns the new index.
    pub fn clamp(&mut self, index: usize) -> usize {
        self.current_index = index.min(self.max_index());
        self.current_index
    }

    pub fn next_target(&self) -> usize {
        let max = self.max_index();
        if self.current_index < max {
            (self.current_index + self.items_per_view).min(max)
        } else {
            0
        }
    }

    pub fn prev_target(&self) -> usize {
        if self.current_index > 0 {
            self.current_index.saturating_sub(self.items_per_view)
        } else {
            self.max_index()
        }
    }

    pub fn dot_target(&self, dot: usize) -> usize {
        dot.saturating_mul(self.items_per_view).min(self.max_index())
    }
}

#[derive(Debug, Clone)]
struct GalleryNodes {
    track: NodeId,
    prev: NodeId,
    next: NodeId,
    dots: Vec<NodeId>,
    items: Vec<NodeId>,
}

#[derive(Debug)]
pub struct GalleryCarousel {
    nodes: GalleryNodes,
    state: GalleryState,
    breakpoints: Breakpoints,
    fallback_gap_px: f64,
    resize: Debouncer,
}

impl GalleryCarousel {
    /// Wire up the carousel. `None` if the track or either button is missing.
    pub fn init<H: Host + ?Sized>(
        host: &mut H,
        cfg: &GalleryConfig,
        breakpoints: &Breakpoints,
    ) -> Option<Self> {
        let track = host.query(".gallery-carousel-track")?;
        let prev = host.query(".carousel-btn-prev")?;
        let next = host.query(".carousel-btn-next")?;
        let nodes = GalleryNodes {
            track,
            prev,
            next,
            dots: host.query_all(".carousel-dot"),
            items: host.query_all(".gallery-item"),
        };

        host.listen(ListenTarget::Node(prev), EventKind::Click);
        host.listen(ListenTarget::Node(next), EventKind::Click);
        for &dot in &nodes.dots {
            host.listen(ListenTarget::Node(dot), EventKind::Click);
        }
        host.listen(ListenTarget::Window, EventKind::Resize);

        let per_view = items_per_view_for(host.viewport().width, breakpoints);
        let mut carousel = Self {
            state: GalleryState::new(nodes.items.len(), per_view),
            nodes,
            breakpoints: breakpoints.clone(),
            fallback_gap_px: cfg.fallback_gap_px,
            resize: Debouncer::new(cfg.resize_debounce_ms, TimerKey::GalleryResize),
        };
        carousel.update_dots(host);
        carousel.move_to_index(host, 0);
        log::debug!(
            "gallery: {} items, {} per view",
            carousel.state.item_count(),
            carousel.state.items_per_view()
        );
        Some(carousel)
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    fn refresh_items_per_view<H: Host + ?Sized>(&mut self, host: &H) {
        self.state
            .set_items_per_view(items_per_view_for(host.viewport().width, &self.breakpoints));
    }

    pub fn move_to_index<H: Host + ?Sized>(&mut self, host: &mut H, index: usize) {
        self.refresh_items_per_view(host);
        let current = self.state.clamp(index);

        // Unrendered items report no width; keep the old offset until layout exists.
        if let Some(&first) = self.nodes.items.first() {
            let item_width = host.layout(first).offset_width;
            if item_width > 0.0 {
                let gap = host
                    .gap_px(self.nodes.track)
                    .filter(|g| *g > 0.0)
                    .unwrap_or(self.fallback_gap_px);
                let offset = -(current as f64 * (item_width + gap));
                host.set_style(self.nodes.track, "transform", &translate_x(offset));
            }
        }

        let pages = self.state.total_pages();
        let active = self.state.active_page();
        for (i, &dot) in self.nodes.dots.iter().enumerate().take(pages) {
            if i == active {
                host.add_class(dot, "active");
            } else {
                host.remove_class(dot, "active");
            }
        }
    }

    fn update_dots<H: Host + ?Sized>(&self, host: &mut H) {
        let pages = self.state.total_pages();
        for (i, &dot) in self.nodes.dots.iter().enumerate() {
            host.set_style(dot, "display", if i < pages { "block" } else { "none" });
        }
    }

    pub fn next_slide<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.refresh_items_per_view(host);
        let target = self.state.next_target();
        self.move_to_index(host, target);
    }

    pub fn prev_slide<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.refresh_items_per_view(host);
        let target = self.state.prev_target();
        self.move_to_index(host, target);
    }

    pub fn dot_click<H: Host + ?Sized>(&mut self, host: &mut H, dot: usize) {
        self.refresh_items_per_view(host);
        let target = self.state.dot_target(dot);
        self.move_to_index(host, target);
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match event {
            PageEvent::Click { node: Some(node), .. } => {
                if *node == self.nodes.next {
                    self.next_slide(host);
                } else if *node == self.nodes.prev {
                    self.prev_slide(host);
                } else if let Some(dot) = self.nodes.dots.iter().position(|d| d == node) {
                    self.dot_click(host, dot);
                } else {
                    return false;
                }
                true
            }
            PageEvent::Resize => {
                self.resize.schedule(host);
                true
            }
            PageEvent::Timer(key) if self.resize.settle(*key) => {
                self.refresh_items_per_view(host);
                self.update_dots(host);
                let current = self.state.current_index();
                self.move_to_index(host, current);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_pick_items_per_view() {
        let bp = Breakpoints::default();
        assert_eq!(items_per_view_for(320.0, &bp), 1);
        assert_eq!(items_per_view_for(480.0, &bp), 1);
        assert_eq!(items_per_view_for(481.0, &bp), 2);
        assert_eq!(items_per_view_for(768.0, &bp), 2);
        assert_eq!(items_per_view_for(1440.0, &bp), 3);
    }

    #[test]
    fn clamp_holds_for_all_small_states() {
        for count in 0..8 {
            for per_view in 1..=3 {
                let mut s = GalleryState::new(count, per_view);
                for target in 0..12 {
                    let idx = s.clamp(target);
                    assert!(idx <= count.saturating_sub(per_view));
                    assert!(s.active_page() < s.total_pages());
                }
            }
        }
    }

    #[test]
    fn next_wraps_after_last_page() {
        // 7 items, 3 per view: starts 0 -> 3 -> 4 -> 0
        let mut s = GalleryState::new(7, 3);
        let mut seen = vec![s.current_index()];
        for _ in 0..3 {
            let t = s.next_target();
            s.clamp(t);
            seen.push(s.current_index());
        }
        assert_eq!(seen, vec![0, 3, 4, 0]);
    }

    #[test]
    fn prev_from_zero_wraps_to_max() {
        let mut s = GalleryState::new(7, 3);
        let t = s.prev_target();
        assert_eq!(s.clamp(t), 4);
        let t = s.prev_target();
        assert_eq!(s.clamp(t), 1);
        let t = s.prev_target();
        assert_eq!(s.clamp(t), 0);
    }

    #[test]
    fn dots_map_to_pages() {
        let s = GalleryState::new(7, 2);
        assert_eq!(s.total_pages(), 6);
        assert_eq!(s.dot_target(0), 0);
        assert_eq!(s.dot_target(2), 4);
        assert_eq!(s.dot_target(5), 5);
    }

    #[test]
    fn fewer_items_than_view_never_scrolls() {
        let mut s = GalleryState::new(2, 3);
        assert_eq!(s.max_index(), 0);
        assert_eq!(s.total_pages(), 1);
        assert_eq!(s.next_target(), 0);
        assert_eq!(s.prev_target(), 0);
        assert_eq!(s.clamp(5), 0);
    }
}
