//! Recognising unit labels in the analyzer's plot.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A plot label that names a unit, e.g. `network.target (120ms)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceLabel {
    pub service: String,
    /// Elapsed time exactly as printed, without the unit (`"120"`, `"5.2"`).
    pub elapsed: Option<String>,
    pub unit: Option<String>,
}

impl ServiceLabel {
    pub fn elapsed_value(&self) -> Option<f64> {
        self.elapsed.as_deref()?.parse().ok()
    }
}

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<service>.+\.[a-z._-]+)(?:\s+\((?P<time>[0-9]+(?:\.[0-9]+)?)(?P<unit>[0-9A-Za-z_]+)\))?$",
        )
        .expect("service label pattern is valid")
    })
}

/// Splits a label into unit name and optional duration. Labels that don't end in a
/// `.suffix` unit type (kernel, initrd, loader rows...) give `None`.
pub fn parse_service_label(text: &str) -> Option<ServiceLabel> {
    let captures = label_pattern().captures(text)?;
    let service = captures.name("service")?.as_str().to_string();
    let elapsed = captures.name("time").map(|m| m.as_str().to_string());
    let unit = captures.name("unit").map(|m| m.as_str().to_string());

    Some(ServiceLabel {
        service,
        elapsed,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("network.target (120ms)", "network.target", Some("120"), Some("ms"))]
    #[case("systemd-journald.service (5.2s)", "systemd-journald.service", Some("5.2"), Some("s"))]
    #[case("dev-disk-by\\x2duuid-1234.device (1min)", "dev-disk-by\\x2duuid-1234.device", Some("1"), Some("min"))]
    #[case("sys-kernel-debug.mount", "sys-kernel-debug.mount", None, None)]
    #[case("user@1000.service (37ms)", "user@1000.service", Some("37"), Some("ms"))]
    #[case("systemd-tmpfiles-setup_dev.early.service (3ms)", "systemd-tmpfiles-setup_dev.early.service", Some("3"), Some("ms"))]
    fn captures_unit_and_duration(
        #[case] text: &str,
        #[case] service: &str,
        #[case] elapsed: Option<&str>,
        #[case] unit: Option<&str>,
    ) {
        let label = parse_service_label(text).expect("label should match");
        assert_eq!(label.service, service);
        assert_eq!(label.elapsed.as_deref(), elapsed);
        assert_eq!(label.unit.as_deref(), unit);
    }

    #[rstest]
    #[case("kernel")]
    #[case("initrd")]
    #[case("Startup finished in 5.2s")]
    #[case("firmware (3.1s)")]
    #[case("Foo.SERVICE")]
    #[case("")]
    fn rejects_labels_without_unit_suffix(#[case] text: &str) {
        assert_eq!(parse_service_label(text), None);
    }

    #[test]
    fn elapsed_value_is_numeric() {
        let label = parse_service_label("network.target (120ms)").expect("label should match");
        assert_eq!(label.elapsed_value(), Some(120.0));

        let label = parse_service_label("sys-kernel-debug.mount").expect("label should match");
        assert_eq!(label.elapsed_value(), None);
    }
}
