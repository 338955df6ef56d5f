#![cfg(target_arch = "wasm32")]
use coachsite_wasm::{abi_version, CoachSite};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Attach `html` inside a fresh container on the body; remove it when done.
fn mount_markup(html: &str) -> Element {
    let doc = document();
    let container = doc.create_element("div").unwrap();
    container.set_inner_html(html);
    doc.body().unwrap().append_child(&container).unwrap();
    container
}

fn click(selector: &str) {
    document()
        .query_selector(selector)
        .unwrap()
        .expect("element present")
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn constructs_with_defaults() {
    assert!(CoachSite::new(JsValue::UNDEFINED).is_ok());
    assert!(CoachSite::new(JsValue::NULL).is_ok());
}

#[wasm_bindgen_test]
fn partial_config_is_merged_with_defaults() {
    let cfg = js_sys::JSON::parse(r#"{ "references": { "swipe_threshold_px": 40 } }"#).unwrap();
    let site = CoachSite::new(cfg).expect("partial config accepted");
    let effective: serde_json::Value = serde_wasm_bindgen::from_value(site.config().unwrap()).unwrap();
    assert_eq!(effective["references"]["swipe_threshold_px"], 40.0);
    assert_eq!(effective["breakpoints"]["tablet_max"], 768.0);
}

#[wasm_bindgen_test]
fn malformed_config_is_rejected() {
    let cfg = js_sys::JSON::parse(r#"{ "nav": 3 }"#).unwrap();
    assert!(CoachSite::new(cfg).is_err());
}

#[wasm_bindgen_test]
fn mount_is_idempotent_without_markup() {
    let site = CoachSite::new(JsValue::UNDEFINED).unwrap();
    assert!(!site.mounted());
    site.mount().unwrap();
    site.mount().unwrap();
    assert!(site.mounted());
    assert_eq!(site.gallery_index(), None);
    assert_eq!(site.references_index(), None);
}

#[wasm_bindgen_test]
fn notifications_need_a_mounted_site() {
    let site = CoachSite::new(JsValue::UNDEFINED).unwrap();
    assert!(site.show_notification("early".into(), None).is_err());

    site.mount().unwrap();
    assert!(site
        .show_notification("bad kind".into(), Some("fatal".into()))
        .is_err());
    site.show_notification("Kaydedildi".into(), Some("success".into()))
        .unwrap();

    let toast = document()
        .query_selector(".notification.notification-success")
        .unwrap()
        .expect("toast attached to body");
    assert_eq!(toast.text_content().as_deref(), Some("Kaydedildi"));
    toast.remove();
}

#[wasm_bindgen_test]
fn carousel_buttons_are_wired() {
    let items: String = (0..7)
        .map(|i| format!(r#"<div class="gallery-item"><img src="g{i}.jpg" alt=""></div>"#))
        .collect();
    let container = mount_markup(&format!(
        r#"<div class="gallery-carousel-track" style="display:flex;gap:24px">{items}</div>
           <button class="carousel-btn-prev">prev</button>
           <button class="carousel-btn-next">next</button>
           <div class="references-carousel"><div class="references-carousel-track">
             <div class="reference-card">a</div><div class="reference-card">b</div>
           </div></div>
           <button class="references-carousel-btn-prev">prev</button>
           <button class="references-carousel-btn-next">next</button>"#
    ));

    let site = CoachSite::new(JsValue::UNDEFINED).unwrap();
    site.mount().unwrap();
    assert_eq!(site.gallery_index(), Some(0));
    assert_eq!(site.references_index(), Some(0));

    click(".carousel-btn-next");
    assert!(site.gallery_index().unwrap() > 0);

    click(".references-carousel-btn-next");
    assert_eq!(site.references_index(), Some(1));
    click(".references-carousel-btn-next");
    assert_eq!(site.references_index(), Some(0));

    drop(site);
    container.remove();
}
