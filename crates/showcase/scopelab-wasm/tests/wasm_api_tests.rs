#![cfg(target_arch = "wasm32")]
use serde_json::{json, Value};
use serde_wasm_bindgen as swb;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

use scopelab_wasm::{abi_version, format_message, ScopelabSession};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Insert `<div id=..>` into the body, replacing any earlier one.
fn mount(id: &str, inner_html: &str) -> web_sys::Element {
    let doc = document();
    if let Some(old) = doc.get_element_by_id(id) {
        old.remove();
    }
    let el = doc.create_element("div").unwrap();
    el.set_id(id);
    el.set_inner_html(inner_html);
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

fn session(config: Value) -> ScopelabSession {
    ScopelabSession::new(swb::to_value(&config).unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn format_uses_icons_and_falls_back_to_info() {
    assert!(format_message("ok", Some("success".into())).starts_with("✅ ["));
    assert!(format_message("hm", Some("loud".into())).starts_with("ℹ️ ["));
    assert!(format_message("plain", None).ends_with("] plain"));
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    assert!(ScopelabSession::new(JsValue::UNDEFINED).is_ok());
}

#[wasm_bindgen_test]
fn log_is_bounded_in_the_dom() {
    let results = mount("results", "");
    let s = session(json!({ "log_capacity": 3 }));
    for i in 0..5 {
        s.log(format!("line {i}"), None, None).unwrap();
    }
    assert_eq!(results.child_element_count(), 3);
    let first = results.first_element_child().unwrap();
    assert!(first.text_content().unwrap().ends_with("line 2"));
    assert!(first.class_list().contains("log-info"));
}

#[wasm_bindgen_test]
fn log_eviction_and_clear_skip_non_log_children() {
    let results = mount("results", "<h3>Log</h3>");
    let s = session(json!({}));
    for i in 1..=11 {
        s.log(format!("line {i}"), None, None).unwrap();
    }
    let heading = results.first_element_child().unwrap();
    assert_eq!(heading.tag_name(), "H3");
    assert_eq!(results.query_selector_all(".log-entry").unwrap().length(), 10);
    let oldest = results.query_selector(".log-entry").unwrap().unwrap();
    assert!(oldest.text_content().unwrap().ends_with("line 2"));

    s.clear_log(None).unwrap();
    assert_eq!(results.child_element_count(), 1);
    assert_eq!(results.first_element_child().unwrap().tag_name(), "H3");
}

#[wasm_bindgen_test]
async fn run_sequence_logs_and_cleans_markers() {
    let results = mount("results", "");
    let target = mount("wasm-box", "");
    let s = session(json!({}));

    let promise = s
        .run_sequence(
            "wasm-box".into(),
            swb::to_value(&["pulse", "shake"]).unwrap(),
            Some(5),
        )
        .unwrap();
    let summary = JsFuture::from(promise).await.unwrap();
    let summary: Value = swb::from_value(summary).unwrap();
    assert_eq!(summary["steps_completed"], 2);

    assert_eq!(results.child_element_count(), 3);
    assert_eq!(target.class_list().length(), 0);
}

#[wasm_bindgen_test]
async fn missing_target_rejects_and_records_diagnostic() {
    mount("results", "");
    let s = session(json!({}));
    let promise = s
        .run_sequence("nowhere".into(), swb::to_value(&["flip"]).unwrap(), Some(1))
        .unwrap();
    assert!(JsFuture::from(promise).await.is_err());

    let diags: Value = swb::from_value(s.diagnostics().unwrap()).unwrap();
    assert_eq!(diags[0]["kind"], "NotFound");
}

#[wasm_bindgen_test]
fn unknown_animation_name_is_rejected_up_front() {
    let s = session(json!({}));
    assert!(s
        .run_sequence("x".into(), swb::to_value(&["wobble"]).unwrap(), None)
        .is_err());
}

#[wasm_bindgen_test]
async fn modal_toggle_locks_scroll_and_resets_content() {
    let modal = mount(
        "wasm-modal",
        r#"<div class="modal-content" style="opacity: 1"></div>"#,
    );
    let s = session(json!({ "modal_animation_ms": 1 }));

    s.set_modal_visible("wasm-modal".into(), true).unwrap();
    assert!(modal.class_list().contains("active"));
    let body = document().body().unwrap();
    assert_eq!(body.style().get_property_value("overflow").unwrap(), "hidden");

    let promise = s
        .dispatch(swb::to_value(&json!({ "action": "close_modal", "modal": "wasm-modal" })).unwrap())
        .unwrap();
    JsFuture::from(promise).await.unwrap();
    assert!(!modal.class_list().contains("active"));
    assert_eq!(body.style().get_property_value("overflow").unwrap(), "");

    let content: web_sys::HtmlElement = modal
        .query_selector(".modal-content")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(content.style().get_property_value("opacity").unwrap(), "0");
    assert_eq!(
        content.style().get_property_value("transform").unwrap(),
        "scale(0.7)"
    );
}

#[wasm_bindgen_test]
fn loader_message_and_hidden_marker() {
    let loader = mount("wasm-loader", r#"<span class="loader-message"></span>"#);
    let s = session(json!({}));
    s.set_loader_visible("wasm-loader".into(), true, Some("Fetching".into()))
        .unwrap();
    assert!(!loader.class_list().contains("hidden"));
    let msg = loader.query_selector(".loader-message").unwrap().unwrap();
    assert_eq!(msg.text_content().unwrap(), "Fetching");

    s.set_loader_visible("wasm-loader".into(), false, None).unwrap();
    assert!(loader.class_list().contains("hidden"));
    assert_eq!(msg.text_content().unwrap(), "Loading...");
}

#[wasm_bindgen_test]
fn validate_input_returns_structured_result() {
    let s = session(json!({}));
    let res: Value = swb::from_value(s.validate_input(String::new(), None).unwrap()).unwrap();
    assert_eq!(
        res,
        json!({ "success": false, "error": "Input cannot be empty", "data": null })
    );
    let res: Value =
        swb::from_value(s.validate_input("hello world".into(), Some(50)).unwrap()).unwrap();
    assert_eq!(res["data"]["words"], 2);
    assert_eq!(res["data"]["uppercase"], "HELLO WORLD");
}
