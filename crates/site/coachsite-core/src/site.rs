//! Page-level aggregate: initializes every controller and routes events.

use crate::config::SiteConfig;
use crate::counter::CounterController;
use crate::effects::{stagger_loading, HoverTransitions, LazyImages, Parallax, ResizeReflow, Ripple};
use crate::events::{PageEvent, ToastId};
use crate::form::ContactForm;
use crate::gallery::GalleryCarousel;
use crate::host::{Host, Propagation};
use crate::modal::ImageModal;
use crate::motion::MotionPreference;
use crate::nav::{AnchorScroll, MobileMenu, Navbar};
use crate::notify::{NotificationController, ToastKind};
use crate::references::ReferencesCarousel;
use crate::reveal::RevealController;
use crate::styles::{inject_style, ANIMATION_CSS, RIPPLE_CSS};

/// Every behaviour on the page. Controllers whose markup is missing stay `None`.
#[derive(Debug)]
pub struct Site {
    pub motion: MotionPreference,
    pub navbar: Navbar,
    pub reveal: RevealController,
    pub counters: CounterController,
    pub contact: Option<ContactForm>,
    pub toasts: NotificationController,
    pub menu: Option<MobileMenu>,
    pub anchors: AnchorScroll,
    pub parallax: Option<Parallax>,
    pub modal: ImageModal,
    pub gallery: Option<GalleryCarousel>,
    pub references: Option<ReferencesCarousel>,
    pub ripple: Ripple,
    pub hover: HoverTransitions,
    pub lazy: LazyImages,
    pub reflow: ResizeReflow,
}

impl Site {
    /// Run every initializer against the loaded document.
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &SiteConfig) -> Self {
        let motion = MotionPreference::read(host);
        inject_style(host, ANIMATION_CSS);

        let navbar = Navbar::init(host, &cfg.nav);
        let reveal = RevealController::init(host, &cfg.reveal, motion);
        let counters = CounterController::init(host, &cfg.counter);
        let contact = ContactForm::init(host, &cfg.messages);
        let toasts = NotificationController::new(&cfg.toast);
        let menu = MobileMenu::init(host);
        let anchors = AnchorScroll::init(host, &cfg.nav);
        let parallax = Parallax::init(host, &cfg.effects, motion);
        let modal = ImageModal::init(host, &cfg.modal);
        stagger_loading(host, &cfg.effects);
        let gallery = GalleryCarousel::init(host, &cfg.gallery, &cfg.breakpoints);
        let references = ReferencesCarousel::init(host, &cfg.references);
        let lazy = LazyImages::init(host);
        let reflow = ResizeReflow::init(host, &cfg.effects);
        let hover = HoverTransitions::init(host, &cfg.effects);
        let ripple = Ripple::init(host, &cfg.effects);
        inject_style(host, RIPPLE_CSS);

        for (name, present) in [
            ("contact form", contact.is_some()),
            ("mobile menu", menu.is_some()),
            ("parallax", parallax.is_some()),
            ("gallery carousel", gallery.is_some()),
            ("references carousel", references.is_some()),
        ] {
            if !present {
                log::debug!("{name}: markup missing or disabled, skipped");
            }
        }

        Self {
            motion,
            navbar,
            reveal,
            counters,
            contact,
            toasts,
            menu,
            anchors,
            parallax,
            modal,
            gallery,
            references,
            ripple,
            hover,
            lazy,
            reflow,
        }
    }

    /// Show a toast outside of the contact form flow.
    pub fn notify<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        message: &str,
        kind: ToastKind,
    ) -> Option<ToastId> {
        self.toasts.show(host, message, kind)
    }

    /// Offer `event` to every controller. Each decides whether it is theirs.
    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> Propagation {
        let mut outcome = Propagation::Continue;

        self.navbar.handle(host, event);
        self.reveal.handle(host, event);
        self.counters.handle(host, event);
        if let Some(contact) = self.contact.as_mut() {
            if let Some(p) = contact.handle(host, &mut self.toasts, event) {
                outcome = outcome.merge(p);
            }
        }
        self.toasts.handle(host, event);
        if let Some(menu) = self.menu.as_mut() {
            menu.handle(host, event);
        }
        if let Some(p) = self.anchors.handle(host, event) {
            outcome = outcome.merge(p);
        }
        if let Some(parallax) = self.parallax.as_mut() {
            parallax.handle(host, event);
        }
        self.modal.handle(host, event);
        if let Some(gallery) = self.gallery.as_mut() {
            gallery.handle(host, event);
        }
        if let Some(references) = self.references.as_mut() {
            if let Some(p) = references.handle(host, event) {
                outcome = outcome.merge(p);
            }
        }
        self.lazy.handle(host, event);
        self.reflow.handle(host, event);
        self.hover.handle(host, event);
        self.ripple.handle(host, event);

        outcome
    }
}
