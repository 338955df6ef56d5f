//! One-shot scroll reveals for `[data-aos]` elements and `section[id]` blocks.

use std::str::FromStr;

use hashbrown::HashSet;

use crate::config::RevealConfig;
use crate::events::{PageEvent, TimerKey};
use crate::host::{Host, NodeId, ObserverKind, ObserverOptions};
use crate::motion::MotionPreference;

pub const KIND_ATTR: &str = "data-aos";
pub const DELAY_ATTR: &str = "data-aos-delay";
pub const ANIMATE_CLASS: &str = "aos-animate";
pub const REVEALED_CLASS: &str = "revealed";

/// Animation flavour named by the `data-aos` attribute.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AnimationKind {
    FadeUp,
    FadeDown,
    FadeLeft,
    FadeRight,
    ZoomIn,
    SlideUp,
}

impl AnimationKind {
    /// Transform the element settles on once revealed.
    pub fn terminal_transform(self) -> &'static str {
        match self {
            AnimationKind::FadeUp | AnimationKind::FadeDown | AnimationKind::SlideUp => {
                "translateY(0)"
            }
            AnimationKind::FadeLeft | AnimationKind::FadeRight => "translateX(0)",
            AnimationKind::ZoomIn => "scale(1)",
        }
    }
}

impl FromStr for AnimationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fade-up" => Ok(AnimationKind::FadeUp),
            "fade-down" => Ok(AnimationKind::FadeDown),
            "fade-left" => Ok(AnimationKind::FadeLeft),
            "fade-right" => Ok(AnimationKind::FadeRight),
            "zoom-in" => Ok(AnimationKind::ZoomIn),
            "slide-up" => Ok(AnimationKind::SlideUp),
            _ => Err(()),
        }
    }
}

/// Parse a `data-aos-delay` value in milliseconds. Anything unusable is 0.
pub fn parse_delay(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| ms.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

#[derive(Debug, Default)]
pub struct RevealController {
    /// Elements still waiting to enter the viewport.
    watching: HashSet<NodeId>,
    sections: HashSet<NodeId>,
    /// Elements whose delay timer is running.
    scheduled: HashSet<NodeId>,
    revealed: HashSet<NodeId>,
}

impl RevealController {
    pub fn init<H: Host + ?Sized>(
        host: &mut H,
        cfg: &RevealConfig,
        motion: MotionPreference,
    ) -> Self {
        let mut ctl = Self::default();
        let elements = host.query_all("[data-aos]");
        let sections = host.query_all("section[id]");

        if motion.reduced() {
            for el in elements {
                host.set_style(el, "opacity", "1");
                host.set_style(el, "transform", "none");
                ctl.revealed.insert(el);
            }
            for section in sections {
                host.add_class(section, REVEALED_CLASS);
                ctl.revealed.insert(section);
            }
            log::debug!("reveal: reduced motion, {} nodes snapped", ctl.revealed.len());
            return ctl;
        }

        let element_opts = ObserverOptions::new(cfg.element_threshold, cfg.element_bottom_margin_px);
        for el in elements {
            host.observe(el, ObserverKind::RevealElement, element_opts);
            ctl.watching.insert(el);
        }
        let section_opts = ObserverOptions::new(cfg.section_threshold, cfg.section_bottom_margin_px);
        for section in sections {
            host.observe(section, ObserverKind::RevealSection, section_opts);
            ctl.sections.insert(section);
        }
        log::debug!(
            "reveal: watching {} elements, {} sections",
            ctl.watching.len(),
            ctl.sections.len()
        );
        ctl
    }

    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.revealed.contains(&node)
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match *event {
            PageEvent::Visible {
                node,
                kind: ObserverKind::RevealElement,
            } => {
                if !self.watching.remove(&node) {
                    return false;
                }
                host.unobserve(node, ObserverKind::RevealElement);
                let delay = parse_delay(host.attribute(node, DELAY_ATTR).as_deref());
                host.set_timeout(delay, TimerKey::RevealElement(node));
                self.scheduled.insert(node);
                true
            }
            PageEvent::Visible {
                node,
                kind: ObserverKind::RevealSection,
            } => {
                if !self.sections.remove(&node) {
                    return false;
                }
                host.unobserve(node, ObserverKind::RevealSection);
                host.add_class(node, REVEALED_CLASS);
                self.revealed.insert(node);
                true
            }
            PageEvent::Timer(TimerKey::RevealElement(node)) => {
                if !self.scheduled.remove(&node) {
                    return false;
                }
                self.apply_terminal(host, node);
                true
            }
            _ => false,
        }
    }

    fn apply_terminal<H: Host + ?Sized>(&mut self, host: &mut H, node: NodeId) {
        host.add_class(node, ANIMATE_CLASS);
        let kind = host
            .attribute(node, KIND_ATTR)
            .and_then(|raw| raw.parse::<AnimationKind>().ok());
        if let Some(kind) = kind {
            host.set_style(node, "transform", kind.terminal_transform());
            host.set_style(node, "opacity", "1");
        }
        self.revealed.insert(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_and_settle() {
        assert_eq!("zoom-in".parse::<AnimationKind>(), Ok(AnimationKind::ZoomIn));
        assert_eq!(AnimationKind::ZoomIn.terminal_transform(), "scale(1)");
        assert_eq!(AnimationKind::FadeRight.terminal_transform(), "translateX(0)");
        assert!("spin".parse::<AnimationKind>().is_err());
    }

    #[test]
    fn delay_parsing_tolerates_junk() {
        assert_eq!(parse_delay(None), 0);
        assert_eq!(parse_delay(Some("200")), 200);
        assert_eq!(parse_delay(Some(" 150.4 ")), 150);
        assert_eq!(parse_delay(Some("soon")), 0);
        assert_eq!(parse_delay(Some("-40")), 0);
    }
}
