//! Navigation bar state, mobile menu and in-page anchor scrolling.

use crate::config::NavConfig;
use crate::events::{PageEvent, TimerKey};
use crate::host::{EventKind, Host, ListenTarget, NodeId, Propagation};
use crate::timing::Throttle;

/// `scrolled` class on the bar plus `active` on the link of the current section.
#[derive(Debug)]
pub struct Navbar {
    bar: Option<NodeId>,
    links: Vec<NodeId>,
    sections: Vec<NodeId>,
    cfg: NavConfig,
    throttle: Throttle,
    current: Option<String>,
}

impl Navbar {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &NavConfig) -> Self {
        let bar = host.by_id("navbar");
        let links = host.query_all(".nav-link");
        let sections = host.query_all("section[id]");
        host.listen(ListenTarget::Window, EventKind::Scroll);
        Self {
            bar,
            links,
            sections,
            cfg: cfg.clone(),
            throttle: Throttle::new(cfg.scroll_throttle_ms, TimerKey::NavbarThrottle),
            current: None,
        }
    }

    /// Id of the section currently highlighted, if any.
    pub fn current_section(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn update_scrolled<H: Host + ?Sized>(&self, host: &mut H) {
        let Some(bar) = self.bar else {
            return;
        };
        if host.viewport().scroll_y > self.cfg.scrolled_offset_px {
            host.add_class(bar, "scrolled");
        } else {
            host.remove_class(bar, "scrolled");
        }
    }

    fn update_active_link<H: Host + ?Sized>(&mut self, host: &mut H) {
        let scroll_y = host.viewport().scroll_y;
        let mut current = None;
        for &section in &self.sections {
            if scroll_y >= host.layout(section).offset_top - self.cfg.active_section_offset_px {
                current = host.attribute(section, "id");
            }
        }
        let wanted = current.as_ref().map(|id| format!("#{id}"));
        for &link in &self.links {
            host.remove_class(link, "active");
            if wanted.is_some() && host.attribute(link, "href") == wanted {
                host.add_class(link, "active");
            }
        }
        self.current = current;
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match *event {
            PageEvent::Scroll => {
                if self.throttle.try_pass(host) {
                    self.update_scrolled(host);
                }
                self.update_active_link(host);
                true
            }
            PageEvent::Timer(key) => match self.throttle.reopen(key) {
                Some(trailing) => {
                    if trailing {
                        self.update_scrolled(host);
                    }
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

/// Hamburger toggle for narrow layouts.
#[derive(Debug)]
pub struct MobileMenu {
    toggle: NodeId,
    menu: NodeId,
    links: Vec<NodeId>,
}

impl MobileMenu {
    pub fn init<H: Host + ?Sized>(host: &mut H) -> Option<Self> {
        let toggle = host.by_id("nav-toggle")?;
        let menu = host.by_id("nav-menu")?;
        let links = host.query_all(".nav-link");
        host.listen(ListenTarget::Node(toggle), EventKind::Click);
        for &link in &links {
            host.listen(ListenTarget::Node(link), EventKind::Click);
        }
        host.listen(ListenTarget::Document, EventKind::Click);
        Some(Self {
            toggle,
            menu,
            links,
        })
    }

    pub fn is_open<H: Host + ?Sized>(&self, host: &H) -> bool {
        host.has_class(self.menu, "active")
    }

    fn close<H: Host + ?Sized>(&self, host: &mut H) {
        host.remove_class(self.menu, "active");
        host.remove_class(self.toggle, "active");
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        let PageEvent::Click { node, origin, .. } = *event else {
            return false;
        };
        match node {
            Some(node) if node == self.toggle => {
                host.toggle_class(self.menu, "active");
                host.toggle_class(self.toggle, "active");
                true
            }
            Some(node) if self.links.contains(&node) => {
                self.close(host);
                true
            }
            None => {
                let inside = origin.is_some_and(|o| {
                    host.contains(self.toggle, o) || host.contains(self.menu, o)
                });
                if !inside {
                    self.close(host);
                }
                true
            }
            Some(_) => false,
        }
    }
}

/// Smooth scrolling for `a[href^="#"]` links and the hero scroll arrow.
#[derive(Debug)]
pub struct AnchorScroll {
    anchors: Vec<NodeId>,
    arrow: Option<(NodeId, NodeId)>,
    offset_px: f64,
}

impl AnchorScroll {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &NavConfig) -> Self {
        let anchors = host.query_all("a[href^=\"#\"]");
        for &anchor in &anchors {
            host.listen(ListenTarget::Node(anchor), EventKind::Click);
        }
        let arrow = match (host.query(".scroll-arrow"), host.by_id("next-section")) {
            (Some(arrow), Some(target)) => {
                host.set_style(arrow, "cursor", "pointer");
                host.listen(ListenTarget::Node(arrow), EventKind::Click);
                Some((arrow, target))
            }
            _ => None,
        };
        Self {
            anchors,
            arrow,
            offset_px: cfg.anchor_offset_px,
        }
    }

    pub fn handle<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: &PageEvent,
    ) -> Option<Propagation> {
        let node = event.clicked_node()?;
        if let Some((arrow, target)) = self.arrow {
            if node == arrow {
                host.scroll_into_view(target);
                return Some(Propagation::PreventDefault);
            }
        }
        if !self.anchors.contains(&node) {
            return None;
        }
        let target = host
            .attribute(node, "href")
            .and_then(|href| href.strip_prefix('#').map(str::to_owned))
            .filter(|id| !id.is_empty())
            .and_then(|id| host.by_id(&id));
        if let Some(target) = target {
            let top = host.layout(target).offset_top - self.offset_px;
            host.scroll_to(top, true);
        }
        Some(Propagation::PreventDefault)
    }
}
