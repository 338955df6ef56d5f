use approx::assert_relative_eq;

use coachsite_core::{ObserverKind, SiteConfig, TimerKey};
use coachsite_test_fixtures::{pages, Harness};

fn landing() -> Harness {
    let host = pages::host("landing").expect("load landing page");
    Harness::new(host, &SiteConfig::default())
}

#[test]
fn reveal_targets_are_observed_with_their_margins() {
    let h = landing();
    let hero = h.node(".hero-text").unwrap();
    let about = h.node("#about").unwrap();

    let el = h.host.observer(hero, ObserverKind::RevealElement).expect("observed");
    assert_relative_eq!(el.threshold, 0.1);
    assert_eq!(el.root_margin(), "0px 0px -50px 0px");

    let section = h.host.observer(about, ObserverKind::RevealSection).expect("observed");
    assert_relative_eq!(section.threshold, 0.15);
    assert_eq!(section.root_margin(), "0px 0px -100px 0px");

    assert_eq!(h.host.observed(ObserverKind::RevealElement).len(), 4);
    assert_eq!(h.host.observed(ObserverKind::RevealSection).len(), 5);
}

#[test]
fn element_reveals_after_its_delay_only_once() {
    let mut h = landing();
    let image = h.node(".hero-image").unwrap();

    assert!(h.make_visible(image, ObserverKind::RevealElement));
    assert!(h.host.observer(image, ObserverKind::RevealElement).is_none());
    h.advance(199);
    assert!(!h.host.classes(image).contains(&"aos-animate".to_string()));

    h.advance(1);
    assert!(h.host.classes(image).contains(&"aos-animate".to_string()));
    assert_eq!(h.host.style(image, "transform"), Some("scale(1)"));
    assert_eq!(h.host.style(image, "opacity"), Some("1"));
    assert!(h.site.reveal.is_revealed(image));

    assert!(!h.make_visible(image, ObserverKind::RevealElement));
}

#[test]
fn zero_delay_reveal_still_goes_through_the_clock() {
    let mut h = landing();
    let text = h.node(".hero-text").unwrap();
    h.make_visible(text, ObserverKind::RevealElement);
    assert!(h.host.pending_timers().contains(&TimerKey::RevealElement(text)));
    h.advance(0);
    assert_eq!(h.host.style(text, "transform"), Some("translateY(0)"));
}

#[test]
fn sections_gain_revealed_class() {
    let mut h = landing();
    let gallery = h.node("#gallery").unwrap();
    assert!(h.make_visible(gallery, ObserverKind::RevealSection));
    assert!(h.host.classes(gallery).contains(&"revealed".to_string()));
    assert!(h.host.observer(gallery, ObserverKind::RevealSection).is_none());
}

#[test]
fn reduced_motion_snaps_everything_visible() {
    let mut host = pages::host("landing").unwrap();
    host.set_reduced_motion(true);
    let h = Harness::new(host, &SiteConfig::default());

    for el in h.nodes("[data-aos]") {
        assert_eq!(h.host.style(el, "opacity"), Some("1"));
        assert_eq!(h.host.style(el, "transform"), Some("none"));
        assert!(h.site.reveal.is_revealed(el));
    }
    for section in h.nodes("section[id]") {
        assert!(h.host.classes(section).contains(&"revealed".to_string()));
    }
    assert!(h.host.observed(ObserverKind::RevealElement).is_empty());
    assert!(h.host.observed(ObserverKind::RevealSection).is_empty());
    assert!(h.site.parallax.is_none());
}

#[test]
fn counter_ramps_to_exact_target() {
    let mut h = landing();
    let stat = h.node(".stat-number").unwrap();

    let opts = h.host.observer(stat, ObserverKind::Counter).expect("observed");
    assert_relative_eq!(opts.threshold, 0.5);

    assert!(h.make_visible(stat, ObserverKind::Counter));
    assert!(h.site.counters.is_running(stat));

    h.advance(1000);
    assert_eq!(h.host.text(stat), Some("125"));

    h.advance(1000);
    assert_eq!(h.host.text(stat), Some("250"));
    assert!(!h.site.counters.is_running(stat));
    assert!(!h
        .host
        .pending_timers()
        .contains(&TimerKey::CounterTick(stat)));

    h.advance(1000);
    assert_eq!(h.host.text(stat), Some("250"));
}

#[test]
fn counter_reads_leading_digits_and_runs_once() {
    let mut h = landing();
    let stats = h.nodes(".stat-number");
    let plus = stats[1];

    h.make_visible(plus, ObserverKind::Counter);
    h.advance(2000);
    assert_eq!(h.host.text(plus), Some("15"));
    assert!(!h.make_visible(plus, ObserverKind::Counter));
    // The other counter never became visible.
    assert_eq!(h.host.text(stats[0]), Some("0"));
}
