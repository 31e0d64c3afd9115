use std::fmt::Write as _;

use bootplot_core::{MARKER_CLASS, SERVICE_ATTR, TIME_ATTR};
use roxmltree::{Node, NodeType};

use crate::EditPlan;

const XML_PREFIX: &str = "xml";

/// Writes `root` and its subtree as XML markup, applying `plan` on the way.
pub(crate) fn element_to_string(root: Node, plan: &EditPlan) -> String {
    let mut out = String::with_capacity(root.range().len());
    write_node(&mut out, root, plan, true);
    out
}

fn write_node(out: &mut String, node: Node, plan: &EditPlan, is_root: bool) {
    if plan.dropped.contains(&node.id()) {
        return;
    }

    match node.node_type() {
        NodeType::Element => write_element(out, node, plan, is_root),
        NodeType::Text => push_escaped(out, node.text().unwrap_or_default(), false),
        NodeType::Comment => {
            let _ = write!(out, "<!--{}-->", node.text().unwrap_or_default());
        }
        NodeType::PI => {
            if let Some(pi) = node.pi() {
                match pi.value {
                    Some(value) => {
                        let _ = write!(out, "<?{} {}?>", pi.target, value);
                    }
                    None => {
                        let _ = write!(out, "<?{}?>", pi.target);
                    }
                }
            }
        }
        NodeType::Root => {
            for child in node.children() {
                write_node(out, child, plan, false);
            }
        }
    }
}

fn write_element(out: &mut String, node: Node, plan: &EditPlan, is_root: bool) {
    let name = qualified_name(node, node.tag_name().namespace(), node.tag_name().name());
    out.push('<');
    out.push_str(&name);

    write_namespace_declarations(out, node, is_root);

    let annotation = plan.annotations.get(&node.id());
    let root_style = plan.root_style.as_deref().filter(|_| is_root);
    let mut style_written = false;

    for attr in node.attributes() {
        let attr_name = qualified_name(node, attr.namespace(), attr.name());
        let value = match attr_name.as_str() {
            "class" if annotation.is_some() => with_marker_class(attr.value()),
            "style" if root_style.is_some() => {
                style_written = true;
                merge_style(attr.value(), root_style.unwrap_or_default())
            }
            SERVICE_ATTR | TIME_ATTR if annotation.is_some() => continue,
            _ => attr.value().to_string(),
        };
        write_attribute(out, &attr_name, &value);
    }

    if let Some(style) = root_style.filter(|_| !style_written) {
        write_attribute(out, "style", style);
    }

    if let Some(label) = annotation {
        if node.attribute("class").is_none() {
            write_attribute(out, "class", MARKER_CLASS);
        }
        write_attribute(out, SERVICE_ATTR, &label.service);
        if let Some(elapsed) = &label.elapsed {
            write_attribute(out, TIME_ATTR, elapsed);
        }
    }

    let mut children = node
        .children()
        .filter(|child| !plan.dropped.contains(&child.id()))
        .peekable();
    if children.peek().is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in children {
        write_node(out, child, plan, false);
    }
    let _ = write!(out, "</{name}>");
}

/// Declares the namespaces that come into scope at `node`. The root repeats everything it
/// sees, since the markup gets lifted out of its original document.
fn write_namespace_declarations(out: &mut String, node: Node, is_root: bool) {
    let parent = node.parent_element().filter(|_| !is_root);
    for ns in node.namespaces() {
        if ns.name() == Some(XML_PREFIX) {
            continue;
        }
        let inherited = parent.map_or(false, |parent| {
            parent
                .namespaces()
                .any(|p| p.name() == ns.name() && p.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        match ns.name() {
            Some(prefix) => write_attribute(out, &format!("xmlns:{prefix}"), ns.uri()),
            None => write_attribute(out, "xmlns", ns.uri()),
        }
    }
}

fn qualified_name(node: Node, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn with_marker_class(classes: &str) -> String {
    if classes.split_whitespace().any(|class| class == MARKER_CLASS) {
        classes.to_string()
    } else {
        format!("{classes} {MARKER_CLASS}")
    }
}

/// Replaces any `scale` declaration in an inline style with `extra`.
fn merge_style(existing: &str, extra: &str) -> String {
    let mut declarations: Vec<&str> = existing
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty() && !decl.starts_with("scale:"))
        .collect();
    declarations.push(extra);
    declarations.join("; ")
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    push_escaped(out, value, true);
    out.push('"');
}

pub(crate) fn push_escaped(out: &mut String, text: &str, in_attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    fn roundtrip(xml: &str) -> String {
        let doc = Document::parse(xml).expect("parse");
        element_to_string(doc.root_element(), &EditPlan::default())
    }

    #[test]
    fn keeps_prefixed_namespaces_and_escapes() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><a xlink:href="/x?a=1&amp;b=2"><text>a &lt; b</text></a></svg>"#;
        assert_eq!(roundtrip(xml), xml);
    }

    #[test]
    fn keeps_comments_and_whitespace() {
        let xml = "<svg>\n<!-- generated -->\n<g/>\n</svg>";
        assert_eq!(roundtrip(xml), xml);
    }

    #[test]
    fn style_merge_replaces_scale() {
        assert_eq!(
            merge_style("opacity: 1; scale: 2;", "scale: 0.5"),
            "opacity: 1; scale: 0.5"
        );
        assert_eq!(merge_style("", "scale: 0.5"), "scale: 0.5");
    }

    #[test]
    fn marker_class_added_once() {
        assert_eq!(with_marker_class("left"), "left clickable-service");
        assert_eq!(
            with_marker_class("left clickable-service"),
            "left clickable-service"
        );
    }
}
