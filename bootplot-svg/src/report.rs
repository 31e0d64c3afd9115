use std::fmt::Write as _;

use bootplot_core::{BootPlot, LEGEND};

use crate::serialize::push_escaped;
use crate::styles::PANEL_STYLES;

/// Standalone HTML page with the same layout as the console panel: summary, static legend
/// and the annotated plot, followed by a table of the recognised units.
pub fn render_report(plot: &BootPlot, title: &str) -> String {
    let mut html = String::with_capacity(plot.markup.len() + PANEL_STYLES.len() + 4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>");
    push_escaped(&mut html, title, false);
    html.push_str("</title>\n<style>");
    html.push_str(PANEL_STYLES);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"bootplot-section\">\n<section class=\"bootplot-card\">\n<h2>");
    push_escaped(&mut html, title, false);
    html.push_str("</h2>\n");

    if let Some(summary) = &plot.summary {
        html.push_str("<p class=\"bootplot-summary\">");
        push_escaped(&mut html, summary, false);
        html.push_str("</p>\n");
    }

    html.push_str("<ul class=\"legend\">\n");
    for entry in LEGEND {
        let _ = writeln!(
            html,
            "<li><div class=\"legendColor {}\"></div>{}</li>",
            entry.class, entry.label
        );
    }
    html.push_str("</ul>\n<div class=\"chart-container\">\n<div class=\"chart\" role=\"presentation\">\n");
    html.push_str(&plot.markup);
    html.push_str("\n</div>\n</div>\n");

    if !plot.services.is_empty() {
        html.push_str("<table class=\"bootplot-units\">\n<thead><tr><th>Unit</th><th>Time</th></tr></thead>\n<tbody>\n");
        for service in &plot.services {
            html.push_str("<tr><td>");
            push_escaped(&mut html, &service.service, false);
            html.push_str("</td><td>");
            if let (Some(elapsed), Some(unit)) = (&service.elapsed, &service.unit) {
                push_escaped(&mut html, elapsed, false);
                push_escaped(&mut html, unit, false);
            }
            html.push_str("</td></tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
    }

    let _ = writeln!(
        html,
        "<p class=\"bootplot-generated\">Generated at {}</p>",
        plot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    html.push_str("</section>\n</div>\n</body>\n</html>\n");
    html
}
