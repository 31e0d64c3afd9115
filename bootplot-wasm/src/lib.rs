//! Framework-neutral WASM <-> JavaScript bridge for the boot plot converter.

use bootplot_core::{BootError, PlotConfig};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsPlotConfig {
    #[serde(default)]
    analyzer: Option<String>,
    #[serde(default)]
    title_y: Option<String>,
    #[serde(default)]
    summary_y: Option<String>,
    /// `null` disables scaling, a missing key keeps the default.
    #[serde(default, deserialize_with = "explicit_option")]
    scale: Option<Option<f32>>,
    #[serde(default)]
    services_path: Option<String>,
}

fn explicit_option<'de, D>(deserializer: D) -> Result<Option<Option<f32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f32>::deserialize(deserializer).map(Some)
}

impl From<JsPlotConfig> for PlotConfig {
    fn from(cfg: JsPlotConfig) -> Self {
        let mut base = PlotConfig::default();
        if let Some(analyzer) = cfg.analyzer {
            base.analyzer = analyzer;
        }
        if let Some(title_y) = cfg.title_y {
            base.title_y = title_y;
        }
        if let Some(summary_y) = cfg.summary_y {
            base.summary_y = summary_y;
        }
        if let Some(scale) = cfg.scale {
            base.scale = scale;
        }
        if let Some(services_path) = cfg.services_path {
            base.services_path = services_path;
        }
        base
    }
}

fn read_config(config: Option<JsValue>) -> Result<PlotConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsPlotConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            Ok(PlotConfig::from(cfg))
        }
        _ => Ok(PlotConfig::default()),
    }
}

/// Reshape a complete `systemd-analyze plot` document; resolves to a serialized `BootPlot`.
#[wasm_bindgen]
pub fn transform_plot(svg: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    let plot = bootplot_svg::transform_plot(svg, &cfg)
        .map_err(|err| JsValue::from_str(&format_boot_error(err)))?;

    to_value(&plot).map_err(|err| JsValue::from_str(&format!("Could not serialize plot: {err}")))
}

/// `{ service, elapsed, unit }` for a unit label, `null` otherwise.
#[wasm_bindgen]
pub fn parse_service_label(text: &str) -> Result<JsValue, JsValue> {
    match bootplot_core::parse_service_label(text) {
        Some(label) => to_value(&label)
            .map_err(|err| JsValue::from_str(&format!("Could not serialize label: {err}"))),
        None => Ok(JsValue::NULL),
    }
}

/// Console URL of a unit's detail page.
#[wasm_bindgen]
pub fn service_url(service: &str) -> String {
    bootplot_core::service_url(&PlotConfig::default().services_path, service)
}

fn format_boot_error(err: BootError) -> String {
    err.to_string()
}
