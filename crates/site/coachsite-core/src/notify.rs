//! Transient toast notifications.
//!
//! A toast lives through three timers: slide in after `enter_delay_ms`,
//! slide out after `display_ms`, and detach `exit_ms` later.

use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::ToastConfig;
use crate::events::{PageEvent, TimerKey, ToastId};
use crate::host::{Host, NodeId};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ToastKind::Success),
            "error" => Ok(ToastKind::Error),
            "info" => Ok(ToastKind::Info),
            "warning" => Ok(ToastKind::Warning),
            _ => Err(()),
        }
    }
}

/// Lifecycle phase of a live toast.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ToastPhase {
    Entering,
    Shown,
    Leaving,
}

#[derive(Copy, Clone, Debug)]
pub struct Toast {
    pub node: NodeId,
    pub kind: ToastKind,
    pub phase: ToastPhase,
}

const OFFSCREEN: &str = "translateX(100%)";
const ONSCREEN: &str = "translateX(0)";

#[derive(Debug)]
pub struct NotificationController {
    cfg: ToastConfig,
    live: HashMap<ToastId, Toast>,
    next_id: u32,
}

impl NotificationController {
    pub fn new(cfg: &ToastConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            live: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn live(&self) -> impl Iterator<Item = (&ToastId, &Toast)> {
        self.live.iter()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Build the toast node, attach it to the body and start its timers.
    pub fn show<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        message: &str,
        kind: ToastKind,
    ) -> Option<ToastId> {
        let body = host.body()?;
        let node = host.create_element("div")?;
        host.add_class(node, "notification");
        host.add_class(node, &format!("notification-{kind}"));
        host.set_text(node, message);
        for (prop, value) in [
            ("position", "fixed"),
            ("top", "20px"),
            ("right", "20px"),
            ("padding", "15px 20px"),
            ("border-radius", "8px"),
            ("color", "white"),
            ("font-weight", "500"),
            ("z-index", "10000"),
            ("transform", OFFSCREEN),
            ("transition", "transform 0.3s ease-in-out"),
            ("max-width", "300px"),
            ("box-shadow", "0 4px 12px rgba(0, 0, 0, 0.15)"),
        ] {
            host.set_style(node, prop, value);
        }
        host.set_style(node, "background-color", self.cfg.color(kind));
        host.append_child(body, node);

        let id = ToastId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        host.set_timeout(self.cfg.enter_delay_ms, TimerKey::ToastEnter(id));
        host.set_timeout(self.cfg.display_ms, TimerKey::ToastExit(id));
        self.live.insert(
            id,
            Toast {
                node,
                kind,
                phase: ToastPhase::Entering,
            },
        );
        log::debug!("toast {:?} ({kind}) shown", id);
        Some(id)
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        let PageEvent::Timer(key) = *event else {
            return false;
        };
        match key {
            TimerKey::ToastEnter(id) => {
                let Some(toast) = self.live.get_mut(&id) else {
                    return false;
                };
                if toast.phase == ToastPhase::Entering {
                    host.set_style(toast.node, "transform", ONSCREEN);
                    toast.phase = ToastPhase::Shown;
                }
                true
            }
            TimerKey::ToastExit(id) => {
                let Some(toast) = self.live.get_mut(&id) else {
                    return false;
                };
                host.set_style(toast.node, "transform", OFFSCREEN);
                toast.phase = ToastPhase::Leaving;
                host.set_timeout(self.cfg.exit_ms, TimerKey::ToastRemove(id));
                true
            }
            TimerKey::ToastRemove(id) => match self.live.remove(&id) {
                Some(toast) => {
                    host.remove(toast.node);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_names() {
        for kind in [
            ToastKind::Success,
            ToastKind::Error,
            ToastKind::Info,
            ToastKind::Warning,
        ] {
            assert_eq!(kind.as_str().parse::<ToastKind>(), Ok(kind));
        }
        assert!("fatal".parse::<ToastKind>().is_err());
        assert_eq!(ToastKind::default(), ToastKind::Info);
    }
}
