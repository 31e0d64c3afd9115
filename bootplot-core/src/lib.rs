//! Core model for the boot timeline panel: modes, service labels, load state and configuration.

mod label;
mod load;

pub use label::{parse_service_label, ServiceLabel};
pub use load::{LoadState, LoadTicket, LoadTracker, OutputBuffer};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Class added to plot labels that were recognised as a unit.
pub const MARKER_CLASS: &str = "clickable-service";
/// Attribute carrying the unit name of an annotated label.
pub const SERVICE_ATTR: &str = "data-service";
/// Attribute carrying the elapsed time of an annotated label, unit stripped.
pub const TIME_ATTR: &str = "data-time";

/// Tunables for invoking the analyzer and reshaping its plot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    /// Analyzer executable.
    pub analyzer: String,
    /// `y` offset of the host/kernel title line that gets dropped.
    pub title_y: String,
    /// `y` offset of the "Startup finished in ..." line.
    pub summary_y: String,
    /// CSS scale applied to the root `<svg>`; `None` leaves the plot at full size.
    pub scale: Option<f32>,
    /// Page of the host console listing services.
    pub services_path: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            analyzer: "systemd-analyze".to_string(),
            title_y: "30".to_string(),
            summary_y: "50".to_string(),
            scale: Some(0.5),
            services_path: "/system/services".to_string(),
        }
    }
}

/// Which service manager instance gets analyzed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum BootMode {
    #[default]
    System,
    User,
}

impl BootMode {
    /// The console passes `"system"` for the system manager; any other value means the
    /// user's own session manager.
    pub fn from_user(user: &str) -> Self {
        if user == "system" {
            BootMode::System
        } else {
            BootMode::User
        }
    }

    pub fn is_user(self) -> bool {
        matches!(self, BootMode::User)
    }
}

/// Argument vector for one analyzer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeCommand {
    argv: Vec<String>,
}

impl AnalyzeCommand {
    pub fn new(mode: BootMode, config: &PlotConfig) -> Self {
        let mut argv = vec![config.analyzer.clone()];
        if mode.is_user() {
            argv.push("--user".to_string());
        }
        argv.push("plot".to_string());
        Self { argv }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

/// One swatch of the static legend rendered next to the plot.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LegendEntry {
    pub class: &'static str,
    pub label: &'static str,
}

/// The legend shown instead of the one embedded in the analyzer output.
pub const LEGEND: [LegendEntry; 6] = [
    LegendEntry {
        class: "activating",
        label: "Activating",
    },
    LegendEntry {
        class: "active",
        label: "Active",
    },
    LegendEntry {
        class: "deactivating",
        label: "Deactivating",
    },
    LegendEntry {
        class: "security",
        label: "Setting up security module",
    },
    LegendEntry {
        class: "generators",
        label: "Generators",
    },
    LegendEntry {
        class: "unitsload",
        label: "Loading unit files",
    },
];

/// A plot ready to be rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BootPlot {
    pub generated_at: DateTime<Utc>,
    /// The "Startup finished in ..." line, lifted out of the markup.
    pub summary: Option<String>,
    /// Serialized `<svg>` element.
    pub markup: String,
    /// Annotated labels in document order.
    pub services: Vec<ServiceLabel>,
}

impl BootPlot {
    pub fn new(summary: Option<String>, markup: String, services: Vec<ServiceLabel>) -> Self {
        Self {
            generated_at: Utc::now(),
            summary,
            markup,
            services,
        }
    }
}

/// Detail page of a single unit inside the host console.
pub fn service_url(services_path: &str, service: &str) -> String {
    format!("{services_path}#/{service}")
}

/// Maps the `data-service` attribute of a clicked element to a navigation target.
pub fn navigation_for(service_attr: Option<&str>, config: &PlotConfig) -> Option<String> {
    match service_attr {
        Some(service) if !service.is_empty() => Some(service_url(&config.services_path, service)),
        _ => None,
    }
}

/// Failure while obtaining or reshaping the plot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootError {
    /// The analyzer could not be run or exited abnormally; holds its own message.
    #[error("{0}")]
    Invocation(String),
    #[error("Could not parse analyzer output: {0}")]
    Parse(String),
    #[error("Unexpected plot layout: {0}")]
    Structure(String),
}
