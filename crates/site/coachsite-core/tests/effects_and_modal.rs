use coachsite_core::{Host, ObserverKind, PageEvent, SiteConfig, TimerKey};
use coachsite_test_fixtures::{pages, Harness};

fn landing() -> Harness {
    let host = pages::host("landing").expect("load landing page");
    Harness::new(host, &SiteConfig::default())
}

#[test]
fn parallax_moves_hero_background_at_half_speed() {
    let mut h = landing();
    let bg = h.node(".hero-background").unwrap();
    h.scroll(400.0);
    assert_eq!(h.host.style(bg, "transform"), Some("translateY(200px)"));
}

#[test]
fn global_styles_are_injected_once() {
    let h = landing();
    assert_eq!(h.nodes("style").len(), 2);
}

#[test]
fn ripple_is_centred_on_click_and_removed() {
    let mut h = landing();
    let btn = h.node("a.btn").unwrap();
    let before = h.host.children(btn).len();

    h.click_at(btn, 150.0, 430.0);
    let children = h.host.children(btn);
    assert_eq!(children.len(), before + 1);
    let ripple = *children.last().unwrap();
    assert_eq!(h.host.tag(ripple), Some("span"));
    assert_eq!(h.host.style(ripple, "width"), Some("180px"));
    assert_eq!(h.host.style(ripple, "left"), Some("-40px"));
    assert_eq!(h.host.style(ripple, "top"), Some("-60px"));
    assert_eq!(h.host.style(btn, "position"), Some("relative"));
    assert_eq!(h.host.style(btn, "overflow"), Some("hidden"));
    assert_eq!(h.site.ripple.live_count(), 1);

    h.advance(599);
    assert!(h.host.is_attached(ripple));
    h.advance(1);
    assert!(!h.host.is_attached(ripple));
    assert_eq!(h.site.ripple.live_count(), 0);
}

#[test]
fn hero_blocks_load_in_staggered() {
    let h = landing();
    let text = h.node(".hero-text").unwrap();
    let image = h.node(".hero-image").unwrap();
    assert!(h.host.classes(text).contains(&"loading".to_string()));
    assert_eq!(h.host.style(text, "animation-delay"), Some("0ms"));
    assert_eq!(h.host.style(image, "animation-delay"), Some("200ms"));
}

#[test]
fn hover_sets_transition() {
    let mut h = landing();
    let card = h.node(".service-card").unwrap();
    assert_eq!(h.host.style(card, "transition"), None);
    h.dispatch(PageEvent::MouseEnter { node: card });
    assert_eq!(h.host.style(card, "transition"), Some("all 0.3s ease-in-out"));
}

#[test]
fn lazy_image_swaps_source_once_visible() {
    let mut h = landing();
    let img = h.node("img[loading=\"lazy\"]").unwrap();
    assert_eq!(h.host.observed(ObserverKind::LazyImage), vec![img]);
    assert_eq!(h.site.lazy.pending_count(), 1);

    assert!(h.make_visible(img, ObserverKind::LazyImage));
    assert_eq!(
        h.host.attribute(img, "src").as_deref(),
        Some("images/gallery-7.jpg")
    );
    assert!(!h.host.classes(img).contains(&"lazy".to_string()));
    assert!(h.host.observed(ObserverKind::LazyImage).is_empty());
    assert_eq!(h.site.lazy.pending_count(), 0);
}

#[test]
fn resize_briefly_resets_gallery_item_transforms() {
    let mut h = landing();
    let item = h.node(".gallery-item").unwrap();
    h.resize(1100.0);
    h.advance(250);
    assert_eq!(h.host.style(item, "transform"), Some("none"));
    h.advance(10);
    assert_eq!(h.host.style(item, "transform"), None);
}

#[test]
fn gallery_image_opens_modal() {
    let mut h = landing();
    let items = h.nodes(".gallery-item");
    let thumb = h.host.children(items[1])[0];

    h.click_node(thumb);
    assert!(h.site.modal.is_open());
    let root = h.site.modal.root().unwrap();
    assert!(h.host.is_attached(root));
    assert!(h.host.classes(root).contains(&"image-modal".to_string()));
    assert_eq!(h.nodes("style").len(), 3);

    let close = h.node(".modal-close").unwrap();
    assert_eq!(h.host.text(close), Some("\u{d7}"));
    let img = h.node(".modal-content").map(|c| h.host.children(c)).unwrap()[1];
    assert_eq!(h.host.attribute(img, "src").as_deref(), Some("images/gallery-2.jpg"));
    assert_eq!(h.host.attribute(img, "alt").as_deref(), Some("Antrenman 2"));
}

#[test]
fn escape_fades_then_removes_modal() {
    let mut h = landing();
    h.click_nth(".gallery-item", 0).unwrap();
    let root = h.site.modal.root().unwrap();

    h.press("Escape");
    h.press("Escape");
    assert_eq!(h.host.style(root, "animation"), Some("fadeOut 0.3s ease-out"));
    let removals = h
        .host
        .pending_timers()
        .into_iter()
        .filter(|k| matches!(k, TimerKey::ModalRemove(_)))
        .count();
    assert_eq!(removals, 1);

    h.advance(299);
    assert!(h.host.is_attached(root));
    h.advance(1);
    assert!(!h.host.is_attached(root));
    assert!(!h.site.modal.is_open());
    assert_eq!(h.nodes("style").len(), 2);
}

#[test]
fn stale_removal_timer_spares_the_next_modal() {
    let mut h = landing();
    h.click_nth(".gallery-item", 0).unwrap();
    let first = h.site.modal.root().unwrap();
    h.press("Escape");
    h.advance(250);

    // Opening another image drops the fading modal at once.
    h.click_nth(".gallery-item", 1).unwrap();
    let second = h.site.modal.root().unwrap();
    assert_ne!(first, second);
    assert!(!h.host.is_attached(first));
    h.press("Escape");

    // The first modal's timer fires 50ms into the second one's fade.
    h.advance(50);
    assert!(h.host.is_attached(second));
    assert!(h.site.modal.is_open());

    h.advance(250);
    assert!(!h.host.is_attached(second));
    assert!(!h.site.modal.is_open());
    assert_eq!(h.nodes("style").len(), 2);
}

#[test]
fn modal_cycles_do_not_accumulate_listeners() {
    let mut h = landing();
    let baseline = h.host.listener_count();

    for i in 0..5 {
        h.click_nth(".gallery-item", i).unwrap();
        assert_eq!(h.host.listener_count(), baseline + 2);
        h.click(".modal-close").unwrap();
        h.advance(300);
        assert!(!h.site.modal.is_open());
        assert_eq!(h.host.listener_count(), baseline);
    }

    // Replacing an open modal releases the old one's listeners too.
    h.click_nth(".gallery-item", 0).unwrap();
    h.click_nth(".gallery-item", 1).unwrap();
    assert_eq!(h.host.listener_count(), baseline + 2);
}

#[test]
fn overlay_closes_only_on_direct_click() {
    let mut h = landing();
    h.click_nth(".gallery-item", 0).unwrap();
    let root = h.site.modal.root().unwrap();

    let content = h.node(".modal-content").unwrap();
    let img = h.host.children(content)[1];
    h.click_node(img);
    assert_eq!(h.host.style(root, "animation"), None);

    h.click(".modal-overlay").unwrap();
    assert_eq!(h.host.style(root, "animation"), Some("fadeOut 0.3s ease-out"));
}

#[test]
fn close_button_and_other_keys() {
    let mut h = landing();
    h.press("Escape");
    assert!(!h.site.modal.is_open());

    h.click_nth(".gallery-item", 2).unwrap();
    let root = h.site.modal.root().unwrap();
    h.press("Enter");
    assert_eq!(h.host.style(root, "animation"), None);

    h.click(".modal-close").unwrap();
    h.advance(300);
    assert!(!h.host.is_attached(root));
}
