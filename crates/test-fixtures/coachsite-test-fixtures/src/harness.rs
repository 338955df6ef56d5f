//! Drives a [`Site`] against a [`FakeHost`] the way a browser would:
//! clicks bubble to listening ancestors and then the document, timers fire
//! in due order on a virtual clock.

use anyhow::{anyhow, Result};

use coachsite_core::{
    EventKind, Host, ListenTarget, NodeId, ObserverKind, PageEvent, Propagation, Site, SiteConfig,
};

use crate::fake_host::FakeHost;

pub struct Harness {
    pub host: FakeHost,
    pub site: Site,
}

impl Harness {
    pub fn new(mut host: FakeHost, cfg: &SiteConfig) -> Self {
        let site = Site::init(&mut host, cfg);
        Self { host, site }
    }

    pub fn dispatch(&mut self, event: PageEvent) -> Propagation {
        self.site.handle(&mut self.host, &event)
    }

    pub fn node(&self, selector: &str) -> Result<NodeId> {
        self.host
            .find(selector)
            .ok_or_else(|| anyhow!("no node matches '{selector}'"))
    }

    pub fn nodes(&self, selector: &str) -> Vec<NodeId> {
        self.host.find_all(selector)
    }

    /// Click `origin` at client coordinates, bubbling to every listening
    /// ancestor and finally the document. Returns the merged outcome.
    pub fn click_at(&mut self, origin: NodeId, client_x: f64, client_y: f64) -> Propagation {
        let mut chain = Vec::new();
        let mut cur = Some(origin);
        while let Some(id) = cur {
            chain.push(id);
            cur = self.host.parent(id);
        }
        let mut outcome = Propagation::Continue;
        for node in chain {
            if self.host.is_listening(ListenTarget::Node(node), EventKind::Click) {
                outcome = outcome.merge(self.dispatch(PageEvent::Click {
                    node: Some(node),
                    origin: Some(origin),
                    client_x,
                    client_y,
                }));
            }
        }
        if self.host.is_listening(ListenTarget::Document, EventKind::Click) {
            outcome = outcome.merge(self.dispatch(PageEvent::Click {
                node: None,
                origin: Some(origin),
                client_x,
                client_y,
            }));
        }
        outcome
    }

    pub fn click_node(&mut self, node: NodeId) -> Propagation {
        self.click_at(node, 0.0, 0.0)
    }

    pub fn click(&mut self, selector: &str) -> Result<Propagation> {
        let node = self.node(selector)?;
        Ok(self.click_node(node))
    }

    /// Click the `index`-th match of `selector`.
    pub fn click_nth(&mut self, selector: &str, index: usize) -> Result<Propagation> {
        let node = *self
            .nodes(selector)
            .get(index)
            .ok_or_else(|| anyhow!("no match #{index} for '{selector}'"))?;
        Ok(self.click_node(node))
    }

    /// Run the clock forward `ms`, firing every timer that comes due.
    pub fn advance(&mut self, ms: u64) {
        let deadline = self.host.now_ms() + ms;
        while let Some(key) = self.host.pop_due(deadline) {
            self.dispatch(PageEvent::Timer(key));
        }
        self.host.set_clock(deadline);
    }

    pub fn resize(&mut self, width: f64) {
        self.host.set_viewport_width(width);
        if self.host.is_listening(ListenTarget::Window, EventKind::Resize) {
            self.dispatch(PageEvent::Resize);
        }
    }

    pub fn scroll(&mut self, y: f64) {
        self.host.set_scroll_y(y);
        if self.host.is_listening(ListenTarget::Window, EventKind::Scroll) {
            self.dispatch(PageEvent::Scroll);
        }
    }

    /// Report `node` as visible to observer `kind`. Returns false (and
    /// delivers nothing) if the node is not currently observed.
    pub fn make_visible(&mut self, node: NodeId, kind: ObserverKind) -> bool {
        if self.host.observer(node, kind).is_none() {
            return false;
        }
        self.dispatch(PageEvent::Visible { node, kind });
        true
    }

    pub fn press(&mut self, key: &str) -> Propagation {
        self.dispatch(PageEvent::KeyDown {
            key: key.to_string(),
        })
    }

    pub fn swipe(&mut self, node: NodeId, start_x: f64, end_x: f64) {
        self.dispatch(PageEvent::TouchStart {
            node,
            client_x: start_x,
        });
        self.dispatch(PageEvent::TouchEnd {
            node,
            client_x: end_x,
        });
    }

    pub fn submit(&mut self, form: NodeId) -> Propagation {
        self.dispatch(PageEvent::Submit { form })
    }
}
