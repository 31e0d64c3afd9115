#![cfg(target_arch = "wasm32")]

//! Calls into the Cockpit page API (`window.cockpit`).

use std::cell::RefCell;
use std::rc::Rc;

use bootplot_core::{AnalyzeCommand, BootError, OutputBuffer};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

fn cockpit() -> Result<JsValue, JsValue> {
    let cockpit = Reflect::get(&js_sys::global(), &JsValue::from_str("cockpit"))?;
    if cockpit.is_undefined() || cockpit.is_null() {
        return Err(JsValue::from_str("cockpit API is not available on this page"));
    }
    Ok(cockpit)
}

fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("cockpit `{name}` is not callable")))
}

/// Best-effort `String(err)`, which is what the console shows for process failures.
fn error_text(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    match err.dyn_ref::<Object>() {
        Some(object) => String::from(object.to_string()),
        None => format!("{err:?}"),
    }
}

fn invocation_error(err: JsValue) -> BootError {
    BootError::Invocation(error_text(&err))
}

/// Runs the analyzer through `cockpit.spawn`, collecting its streamed stdout. Stderr is
/// folded into the rejection message so failures carry the tool's own text.
pub async fn run_analyzer(command: &AnalyzeCommand) -> Result<String, BootError> {
    let cockpit = cockpit().map_err(invocation_error)?;

    let argv: Array = command.argv().iter().map(|arg| JsValue::from_str(arg)).collect();
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("err"), &JsValue::from_str("message"))
        .map_err(invocation_error)?;

    let process = method(&cockpit, "spawn")
        .map_err(invocation_error)?
        .call2(&cockpit, &argv, &options)
        .map_err(invocation_error)?;

    let buffer = Rc::new(RefCell::new(OutputBuffer::default()));
    let sink = Rc::clone(&buffer);
    let on_chunk = Closure::<dyn FnMut(JsValue)>::new(move |chunk: JsValue| {
        if let Some(text) = chunk.as_string() {
            sink.borrow_mut().push_str(&text);
        }
    });
    method(&process, "stream")
        .map_err(invocation_error)?
        .call1(&process, on_chunk.as_ref())
        .map_err(invocation_error)?;

    JsFuture::from(Promise::resolve(&process))
        .await
        .map_err(invocation_error)?;
    drop(on_chunk);

    let output = buffer.take();
    tracing::debug!(
        bytes = output.len(),
        chunks = output.chunk_count(),
        "analyzer output received"
    );
    output.finish()
}

/// `cockpit.jump(path, cockpit.transport.host)`: navigate within the same host session.
pub fn jump(path: &str) -> Result<(), JsValue> {
    let cockpit = cockpit()?;
    let transport = Reflect::get(&cockpit, &JsValue::from_str("transport"))?;
    let host = Reflect::get(&transport, &JsValue::from_str("host"))?;
    method(&cockpit, "jump")?.call2(&cockpit, &JsValue::from_str(path), &host)?;
    Ok(())
}
