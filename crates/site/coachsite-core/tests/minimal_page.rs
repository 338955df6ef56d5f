//! A page with none of the expected markup must load and ignore input.

use coachsite_core::{NodeId, PageEvent, Propagation, SiteConfig, ToastKind};
use coachsite_test_fixtures::{pages, Harness};

fn minimal() -> Harness {
    let host = pages::host("minimal").expect("load minimal page");
    Harness::new(host, &SiteConfig::default())
}

#[test]
fn optional_controllers_are_skipped() {
    let h = minimal();
    assert!(h.site.contact.is_none());
    assert!(h.site.menu.is_none());
    assert!(h.site.gallery.is_none());
    assert!(h.site.references.is_none());
    assert!(h.site.parallax.is_none());
    assert_eq!(h.site.lazy.pending_count(), 0);
}

#[test]
fn events_without_targets_are_harmless() {
    let mut h = minimal();
    let body = h.node("body").unwrap();

    h.scroll(300.0);
    h.resize(400.0);
    assert_eq!(h.click_node(body), Propagation::Continue);
    assert_eq!(h.press("Escape"), Propagation::Continue);
    h.dispatch(PageEvent::Submit { form: NodeId(999) });
    h.dispatch(PageEvent::TouchEnd {
        node: NodeId(999),
        client_x: 0.0,
    });
    h.advance(10_000);

    assert!(h.host.pending_timers().is_empty());
    assert!(!h.site.modal.is_open());
}

#[test]
fn notifications_still_work() {
    let mut h = minimal();
    assert!(h.site.notify(&mut h.host, "Merhaba", ToastKind::Warning).is_some());
    let toast = h.node(".notification-warning").unwrap();
    assert_eq!(h.host.style(toast, "background-color"), Some("#f59e0b"));
}

#[test]
fn every_manifest_page_loads() {
    for key in pages::keys() {
        let json = pages::json(&key).expect("fixture readable");
        assert!(!json.is_empty());
        pages::host(&key).unwrap_or_else(|e| panic!("page {key} failed: {e:#}"));
    }
}
