//! Full-screen viewer for gallery images.

use crate::config::ModalConfig;
use crate::events::{PageEvent, TimerKey};
use crate::host::{EventKind, Host, ListenTarget, NodeId};
use crate::styles::{inject_style, MODAL_CSS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenModal {
    root: NodeId,
    overlay: NodeId,
    close: NodeId,
    style: Option<NodeId>,
    closing: bool,
}

#[derive(Debug)]
pub struct ImageModal {
    items: Vec<NodeId>,
    open: Option<OpenModal>,
    fade_ms: u32,
}

impl ImageModal {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &ModalConfig) -> Self {
        let items = host.query_all(".gallery-item");
        for &item in &items {
            host.listen(ListenTarget::Node(item), EventKind::Click);
        }
        host.listen(ListenTarget::Document, EventKind::KeyDown);
        Self {
            items,
            open: None,
            fade_ms: cfg.fade_ms,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Root node of the modal currently shown.
    pub fn root(&self) -> Option<NodeId> {
        self.open.map(|m| m.root)
    }

    fn open_for<H: Host + ?Sized>(&mut self, host: &mut H, item: NodeId) -> Option<()> {
        let img = host.query_within(item, "img")?;
        let src = host.attribute(img, "src").unwrap_or_default();
        let alt = host.attribute(img, "alt").unwrap_or_default();

        // A modal that is still fading out is dropped right away.
        if let Some(prev) = self.open.take() {
            Self::detach(host, prev);
        }

        let body = host.body()?;
        let root = host.create_element("div")?;
        let overlay = host.create_element("div")?;
        let content = host.create_element("div")?;
        let close = host.create_element("span")?;
        let image = host.create_element("img")?;
        host.add_class(root, "image-modal");
        host.add_class(overlay, "modal-overlay");
        host.add_class(content, "modal-content");
        host.add_class(close, "modal-close");
        host.set_text(close, "\u{d7}");
        host.set_attribute(image, "src", &src);
        host.set_attribute(image, "alt", &alt);
        host.append_child(content, close);
        host.append_child(content, image);
        host.append_child(overlay, content);
        host.append_child(root, overlay);

        let style = inject_style(host, MODAL_CSS);
        host.append_child(body, root);
        host.listen(ListenTarget::Node(close), EventKind::Click);
        host.listen(ListenTarget::Node(overlay), EventKind::Click);

        self.open = Some(OpenModal {
            root,
            overlay,
            close,
            style,
            closing: false,
        });
        log::debug!("modal opened for {src}");
        Some(())
    }

    pub fn close<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(modal) = self.open.as_mut() else {
            return;
        };
        if modal.closing {
            return;
        }
        modal.closing = true;
        host.set_style(modal.root, "animation", "fadeOut 0.3s ease-out");
        host.set_timeout(self.fade_ms, TimerKey::ModalRemove(modal.root));
    }

    fn detach<H: Host + ?Sized>(host: &mut H, modal: OpenModal) {
        host.remove(modal.root);
        if let Some(style) = modal.style {
            host.remove(style);
        }
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match event {
            PageEvent::Click {
                node: Some(node),
                origin,
                ..
            } => {
                if self.items.contains(node) {
                    self.open_for(host, *node);
                    return true;
                }
                let Some(modal) = self.open else {
                    return false;
                };
                if *node == modal.close || (*node == modal.overlay && *origin == Some(modal.overlay)) {
                    self.close(host);
                    return true;
                }
                false
            }
            PageEvent::KeyDown { key } if key == "Escape" && self.open.is_some() => {
                self.close(host);
                true
            }
            PageEvent::Timer(TimerKey::ModalRemove(root)) => {
                // Ignore timers of a modal that was already replaced.
                match self.open {
                    Some(modal) if modal.closing && modal.root == *root => {
                        self.open = None;
                        Self::detach(host, modal);
                    }
                    _ => {}
                }
                true
            }
            _ => false,
        }
    }
}
