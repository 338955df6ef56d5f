//! Coach site interaction core (engine-agnostic)
//!
//! Controllers for the single-page coaching site: navigation state, scroll
//! reveals, statistic counters, the gallery and references carousels, the
//! contact form with its toasts, and a handful of decorative effects.
//!
//! Nothing here touches a browser directly. Controllers talk to a [`Host`]
//! and react to [`PageEvent`]s; `coachsite-wasm` provides the browser host.

pub mod config;
pub mod counter;
pub mod effects;
pub mod error;
pub mod events;
pub mod form;
pub mod gallery;
pub mod host;
pub mod modal;
pub mod motion;
pub mod nav;
pub mod notify;
pub mod references;
pub mod reveal;
pub mod site;
pub mod styles;
pub mod timing;

// Re-exports for hosts
pub use config::SiteConfig;
pub use counter::{CounterController, CounterRamp};
pub use error::{ConfigError, ValidationError};
pub use events::{PageEvent, TimerKey, ToastId};
pub use form::{ContactForm, ContactSubmission};
pub use gallery::{items_per_view_for, GalleryCarousel, GalleryState};
pub use host::{
    EventKind, Host, Layout, ListenTarget, NodeId, ObserverKind, ObserverOptions, Propagation,
    Rect, TimerHandle, Viewport,
};
pub use motion::MotionPreference;
pub use notify::{NotificationController, ToastKind};
pub use references::{ReferencesCarousel, ReferencesState, SwipeDirection, SwipeGesture};
pub use reveal::{AnimationKind, RevealController};
pub use site::Site;
pub use timing::{Debouncer, Throttle};
