use approx::assert_relative_eq;

use coachsite_core::{EventKind, Host, ListenTarget, Propagation, SiteConfig, TimerKey};
use coachsite_test_fixtures::{pages, Harness};

fn landing() -> Harness {
    let host = pages::host("landing").expect("load landing page");
    Harness::new(host, &SiteConfig::default())
}

fn has_class(h: &Harness, selector: &str, class: &str) -> bool {
    let node = h.node(selector).expect("node in fixture");
    h.host.classes(node).iter().any(|c| c == class)
}

fn active_links(h: &Harness) -> Vec<String> {
    h.nodes(".nav-link")
        .into_iter()
        .filter(|l| h.host.classes(*l).iter().any(|c| c == "active"))
        .filter_map(|l| h.host.attribute(l, "href"))
        .collect()
}

#[test]
fn navbar_scrolled_state_is_throttled() {
    let mut h = landing();
    h.scroll(120.0);
    assert!(has_class(&h, "#navbar", "scrolled"));

    // Inside the throttle window the bar keeps its state.
    h.scroll(0.0);
    assert!(has_class(&h, "#navbar", "scrolled"));

    // The dropped scroll is replayed when the window closes.
    h.advance(16);
    assert!(!has_class(&h, "#navbar", "scrolled"));
}

#[test]
fn navbar_settles_on_last_scroll_position_when_idle() {
    let mut h = landing();
    h.scroll(120.0);
    h.scroll(0.0);
    h.advance(1000);
    assert!(!has_class(&h, "#navbar", "scrolled"));
    assert!(!h.host.pending_timers().contains(&TimerKey::NavbarThrottle));

    h.scroll(10.0);
    h.scroll(400.0);
    h.scroll(900.0);
    assert!(!has_class(&h, "#navbar", "scrolled"));
    h.advance(16);
    assert!(has_class(&h, "#navbar", "scrolled"));
}

#[test]
fn quiet_throttle_window_has_no_trailing_run() {
    let mut h = landing();
    h.scroll(120.0);
    assert!(has_class(&h, "#navbar", "scrolled"));

    // Scroll position changes without a scroll event: nothing to replay.
    h.host.set_scroll_y(0.0);
    h.advance(16);
    assert!(has_class(&h, "#navbar", "scrolled"));
}

#[test]
fn active_link_follows_current_section() {
    let mut h = landing();
    h.scroll(700.0);
    assert_eq!(active_links(&h), vec!["#about".to_string()]);
    assert_eq!(h.site.navbar.current_section(), Some("about"));

    h.advance(16);
    h.scroll(2250.0);
    assert_eq!(active_links(&h), vec!["#references".to_string()]);

    h.advance(16);
    h.scroll(0.0);
    assert_eq!(active_links(&h), vec!["#home".to_string()]);
}

#[test]
fn anchor_click_scrolls_below_fixed_bar() {
    let mut h = landing();
    let link = h
        .nodes(".nav-link")
        .into_iter()
        .find(|l| h.host.attribute(*l, "href").as_deref() == Some("#gallery"))
        .unwrap();

    assert_eq!(h.click_node(link), Propagation::PreventDefault);
    let &(top, smooth) = h.host.scroll_calls().last().expect("scrolled");
    assert_relative_eq!(top, 1530.0);
    assert!(smooth);
}

#[test]
fn bare_hash_link_is_swallowed() {
    let mut h = landing();
    assert_eq!(h.click(".nav-logo").unwrap(), Propagation::PreventDefault);
    assert!(h.host.scroll_calls().is_empty());
}

#[test]
fn scroll_arrow_brings_next_section_into_view() {
    let mut h = landing();
    let arrow = h.node(".scroll-arrow").unwrap();
    let target = h.node("#next-section").unwrap();
    assert_eq!(h.host.style(arrow, "cursor"), Some("pointer"));

    h.click_node(arrow);
    assert_eq!(h.host.scrolled_into_view(), &[target]);
}

#[test]
fn mobile_menu_toggles_and_closes() {
    let mut h = landing();
    assert!(h.host.is_listening(ListenTarget::Document, EventKind::Click));

    // Clicking a bar inside the toggle bubbles up to it.
    h.click(".bar").unwrap();
    assert!(has_class(&h, "#nav-menu", "active"));
    assert!(has_class(&h, "#nav-toggle", "active"));

    h.click(".nav-link").unwrap();
    assert!(!has_class(&h, "#nav-menu", "active"));
    assert!(!has_class(&h, "#nav-toggle", "active"));

    h.click("#nav-toggle").unwrap();
    h.click("#nav-menu").unwrap();
    assert!(has_class(&h, "#nav-menu", "active"), "click inside keeps it open");

    h.click("#about").unwrap();
    assert!(!has_class(&h, "#nav-menu", "active"));
    assert!(!h.site.menu.as_ref().unwrap().is_open(&h.host));
}
