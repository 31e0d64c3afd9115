//! `systemd-analyze plot` SVG to [`BootPlot`] converter.
//!
//! The analyzer output is reshaped for embedding in the console: decorations that the
//! panel renders itself (background, title, summary, legend) are stripped and unit
//! labels are annotated so a click can be traced back to the unit.

mod report;
mod serialize;
mod styles;

use std::collections::{HashMap, HashSet};

use bootplot_core::{parse_service_label, BootError, BootPlot, PlotConfig, ServiceLabel};
use roxmltree::{Document, Node, NodeId, ParsingOptions};

pub use report::render_report;
pub use styles::PANEL_STYLES;

/// Reshape a complete analyzer document.
pub fn transform_plot(svg: &str, config: &PlotConfig) -> Result<BootPlot, BootError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc =
        Document::parse_with_options(svg, options).map_err(|err| BootError::Parse(err.to_string()))?;

    let root = doc.root_element();
    if !root.has_tag_name("svg") {
        return Err(BootError::Structure(format!(
            "expected <svg> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut plan = EditPlan {
        root_style: config.scale.map(|scale| format!("scale: {scale}")),
        ..EditPlan::default()
    };

    if let Some(background) = root
        .descendants()
        .find(|node| node.has_tag_name("rect") && has_class(*node, "background"))
    {
        plan.dropped.insert(background.id());
    }

    if let Some(title) = find_text_at(root, &config.title_y) {
        plan.dropped.insert(title.id());
    }

    let summary = find_text_at(root, &config.summary_y).map(|node| {
        plan.dropped.insert(node.id());
        text_content(node)
    });

    let mut groups = root.children().filter(|node| node.has_tag_name("g"));
    let plot = groups
        .next()
        .ok_or_else(|| BootError::Structure("plot group <g> is missing".to_string()))?;
    match groups.next() {
        Some(legend) => {
            plan.dropped.insert(legend.id());
        }
        None => tracing::debug!("analyzer output has no legend group"),
    }

    let mut services = Vec::new();
    for label in plot.descendants().filter(|node| is_unit_label(*node)) {
        if plan.dropped.contains(&label.id()) {
            continue;
        }
        let text = text_content(label);
        match parse_service_label(&text) {
            Some(service) => {
                plan.annotations.insert(label.id(), service.clone());
                services.push(service);
            }
            None => tracing::trace!(label = %text, "plot label does not name a unit"),
        }
    }
    tracing::debug!(
        annotated = services.len(),
        summary = summary.is_some(),
        "boot plot transformed"
    );

    let markup = serialize::element_to_string(root, &plan);
    Ok(BootPlot::new(summary, markup, services))
}

/// Edits applied while serializing the parsed document.
#[derive(Default)]
pub(crate) struct EditPlan {
    pub(crate) dropped: HashSet<NodeId>,
    pub(crate) annotations: HashMap<NodeId, ServiceLabel>,
    pub(crate) root_style: Option<String>,
}

fn find_text_at<'a, 'input>(root: Node<'a, 'input>, y: &str) -> Option<Node<'a, 'input>> {
    root.descendants()
        .find(|node| node.has_tag_name("text") && node.attribute("y") == Some(y))
}

fn is_unit_label(node: Node) -> bool {
    node.has_tag_name("text") && (has_class(node, "left") || has_class(node, "right"))
}

pub(crate) fn has_class(node: Node, class: &str) -> bool {
    node.attribute("class")
        .map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
}

fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(body: &str) -> String {
        format!(r#"<svg xmlns="http://www.w3.org/2000/svg">{body}<g id="plot"/><g id="legend"/></svg>"#)
    }

    fn unscaled() -> PlotConfig {
        PlotConfig {
            scale: None,
            ..PlotConfig::default()
        }
    }

    #[test]
    fn summary_is_lifted_out_of_markup() {
        let svg = wrap(r#"<text y="50">Startup finished in 5.2s</text>"#);
        let plot = transform_plot(&svg, &unscaled()).expect("transform");

        assert_eq!(plot.summary.as_deref(), Some("Startup finished in 5.2s"));
        assert!(!plot.markup.contains("Startup finished"));
    }

    #[test]
    fn decorations_are_optional() {
        let plot = transform_plot(&wrap(""), &unscaled()).expect("transform");
        assert_eq!(plot.summary, None);
        assert_eq!(
            plot.markup,
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="plot"/></svg>"#
        );
    }

    #[test]
    fn missing_plot_group_is_structural_error() {
        let err = transform_plot(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#, &unscaled())
            .expect_err("no plot group");
        assert!(matches!(err, BootError::Structure(_)));
    }

    #[test]
    fn non_svg_root_is_rejected() {
        let err = transform_plot("<html><g/></html>", &unscaled()).expect_err("not svg");
        assert!(matches!(err, BootError::Structure(_)));
    }

    #[test]
    fn malformed_output_is_parse_error() {
        let err = transform_plot("<svg><g>", &unscaled()).expect_err("truncated");
        assert!(matches!(err, BootError::Parse(_)));
    }

    #[test]
    fn scale_is_applied_to_root() {
        let plot = transform_plot(&wrap(""), &PlotConfig::default()).expect("transform");
        assert!(plot
            .markup
            .starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" style="scale: 0.5">"#));
    }
}
