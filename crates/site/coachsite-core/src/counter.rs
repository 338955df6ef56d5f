//! Statistic counters that ramp from 0 to their `data-count` target once visible.

use hashbrown::HashMap;

use crate::config::CounterConfig;
use crate::events::{PageEvent, TimerKey};
use crate::host::{Host, NodeId, ObserverKind, ObserverOptions, TimerHandle};

pub const COUNT_ATTR: &str = "data-count";

/// Linear integer ramp sampled in `steps` equal increments.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CounterRamp {
    target: u64,
    steps: u32,
    step: u32,
}

impl CounterRamp {
    pub fn new(target: u64, steps: u32) -> Self {
        Self {
            target,
            steps: steps.max(1),
            step: 0,
        }
    }

    /// Advance one step. Returns the floored value to display and whether the
    /// ramp has reached its target.
    pub fn tick(&mut self) -> (u64, bool) {
        self.step = (self.step + 1).min(self.steps);
        let value = (self.target as u128 * self.step as u128 / self.steps as u128) as u64;
        (value, self.step == self.steps)
    }

    pub fn target(&self) -> u64 {
        self.target
    }
}

/// Leading decimal digits of `raw`, the way the page markup writes targets
/// (`"250"`, `"98+"`). Returns `None` if there are none.
pub fn parse_target(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[derive(Debug)]
struct Running {
    ramp: CounterRamp,
    timer: TimerHandle,
}

#[derive(Debug, Default)]
pub struct CounterController {
    watching: Vec<NodeId>,
    running: HashMap<NodeId, Running>,
    steps: u32,
    step_ms: u32,
}

impl CounterController {
    pub fn init<H: Host + ?Sized>(host: &mut H, cfg: &CounterConfig) -> Self {
        let watching = host.query_all(".stat-number");
        let opts = ObserverOptions::new(cfg.threshold, 0.0);
        for &node in &watching {
            host.observe(node, ObserverKind::Counter, opts);
        }
        Self {
            watching,
            running: HashMap::new(),
            steps: cfg.steps.max(1),
            step_ms: cfg.step_ms(),
        }
    }

    pub fn is_running(&self, node: NodeId) -> bool {
        self.running.contains_key(&node)
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &PageEvent) -> bool {
        match *event {
            PageEvent::Visible {
                node,
                kind: ObserverKind::Counter,
            } => {
                let Some(pos) = self.watching.iter().position(|n| *n == node) else {
                    return false;
                };
                self.watching.swap_remove(pos);
                host.unobserve(node, ObserverKind::Counter);
                match host.attribute(node, COUNT_ATTR).as_deref().and_then(parse_target) {
                    Some(target) => {
                        let timer = host.set_interval(self.step_ms, TimerKey::CounterTick(node));
                        self.running.insert(
                            node,
                            Running {
                                ramp: CounterRamp::new(target, self.steps),
                                timer,
                            },
                        );
                    }
                    None => log::debug!("counter {:?}: no numeric target", node),
                }
                true
            }
            PageEvent::Timer(TimerKey::CounterTick(node)) => {
                let Some(run) = self.running.get_mut(&node) else {
                    return false;
                };
                let (value, done) = run.ramp.tick();
                host.set_text(node, &value.to_string());
                if done {
                    host.clear_timer(run.timer);
                    self.running.remove(&node);
                }
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
    fn ramp_ends_exactly_on_target() {
        let mut ramp = CounterRamp::new(250, 100);
        let mut last = 0;
        let mut done = false;
        let mut ticks = 0;
        while !done {
            let (v, d) = ramp.tick();
            assert!(v >= last && v <= 250);
            last = v;
            done = d;
            ticks += 1;
        }
        assert_eq!(last, 250);
        assert_eq!(ticks, 100);
    }

    #[test]
    fn small_targets_floor() {
        let mut ramp = CounterRamp::new(3, 100);
        assert_eq!(ramp.tick(), (0, false));
        for _ in 0..32 {
            ramp.tick();
        }
        // step 34 of 100 -> 1.02
        assert_eq!(ramp.tick(), (1, false));
    }

    #[test]
    fn targets_parse_leading_digits() {
        assert_eq!(parse_target("250"), Some(250));
        assert_eq!(parse_target(" 98+"), Some(98));
        assert_eq!(parse_target("n/a"), None);
        assert_eq!(parse_target("-5"), None);
    }
}
