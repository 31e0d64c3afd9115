#![cfg(target_arch = "wasm32")]

use bootplot_svg::PANEL_STYLES;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-bootplot-ui]";

/// Injects the panel stylesheet into `<head>` once per document.
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head> element"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-bootplot-ui", "v1")?;
    style_el.set_text_content(Some(PANEL_STYLES));
    head.append_child(&style_el.dyn_into::<Node>()?)?;

    Ok(())
}
