use std::fs;

use bootplot_core::{BootError, PlotConfig};
use bootplot_svg::transform_plot;
use pretty_assertions::assert_eq;
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn system_plot() -> String {
    fs::read_to_string(fixture_path("system_plot.svg")).expect("could not read plot fixture")
}

#[test]
fn annotated_units_match_golden() {
    let plot = transform_plot(&system_plot(), &PlotConfig::default()).expect("transform failed");

    let actual = serde_json::to_value(&plot.services).expect("serialize services");
    let expected: Value = serde_json::from_str(
        &fs::read_to_string(fixture_path("system_plot_services.json"))
            .expect("could not read golden services"),
    )
    .expect("golden is not valid JSON");

    assert_eq!(actual, expected);
}

#[test]
fn summary_is_extracted_once() {
    let plot = transform_plot(&system_plot(), &PlotConfig::default()).expect("transform failed");

    let summary = plot.summary.expect("summary present");
    assert!(summary.starts_with("Startup finished in 1.204s (kernel) + 3.981s (userspace)"));
    assert!(!plot.markup.contains("Startup finished"));
}

#[test]
fn decorations_and_source_legend_are_dropped() {
    let plot = transform_plot(&system_plot(), &PlotConfig::default()).expect("transform failed");

    assert!(!plot.markup.contains(r#"class="background""#));
    assert!(!plot.markup.contains("Fedora Linux 40"));
    assert!(!plot.markup.contains("Setting up security module"));
    assert!(!plot.markup.contains("Loading unit files"));
    assert!(!plot.markup.contains("<!DOCTYPE"));
    assert_eq!(plot.markup.matches("<g ").count(), 1);
}

#[test]
fn unit_labels_carry_data_attributes() {
    let plot = transform_plot(&system_plot(), &PlotConfig::default()).expect("transform failed");

    assert!(plot.markup.contains(
        r#"<text class="left clickable-service" x="155.100" y="54.000" data-service="systemd-journald.service" data-time="120">systemd-journald.service (120ms)</text>"#
    ));
    assert!(plot.markup.contains(
        r#"<text class="left clickable-service" x="305.000" y="74.000" data-service="network.target">network.target</text>"#
    ));
    assert!(plot.markup.contains(
        r#"<text class="right clickable-service" x="895.000" y="94.000" data-service="NetworkManager-wait-online.service" data-time="3.001">"#
    ));
}

#[test]
fn non_unit_labels_stay_inert() {
    let plot = transform_plot(&system_plot(), &PlotConfig::default()).expect("transform failed");

    assert!(plot
        .markup
        .contains(r#"<text class="left" x="5.000" y="14.000">kernel</text>"#));
    assert!(plot
        .markup
        .contains(r#"<text class="left" x="125.400" y="34.000">systemd</text>"#));
    assert!(plot
        .markup
        .contains(r#"<text class="sec" x="0.000" y="-5.000">0.0s</text>"#));
}

#[test]
fn root_is_scaled_down() {
    let plot = transform_plot(&system_plot(), &PlotConfig::default()).expect("transform failed");

    assert!(plot.markup.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="1370px" height="420px" version="1.1" style="scale: 0.5">"#
    ));
}

#[test]
fn transform_is_idempotent_on_its_output() {
    let config = PlotConfig::default();
    let first = transform_plot(&system_plot(), &config).expect("first pass");
    let second = transform_plot(&first.markup, &config).expect("second pass");

    assert_eq!(second.summary, None);
    assert_eq!(second.markup, first.markup);
    assert_eq!(second.services, first.services);
}

#[test]
fn truncated_stream_fails_to_parse() {
    let svg = system_plot();
    let truncated = &svg[..svg.len() / 2];

    let err = transform_plot(truncated, &PlotConfig::default()).expect_err("truncated output");
    assert!(matches!(err, BootError::Parse(_)));
}
