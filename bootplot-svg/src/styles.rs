/// Stylesheet for the boot info panel and the standalone report. Legend swatches use the
/// same fills as the analyzer's own plot.
pub const PANEL_STYLES: &str = r#"
:root {
  --bootplot-font-family: 'Red Hat Text', system-ui, -apple-system, 'Segoe UI', sans-serif;
  --bootplot-text: #151515;
  --bootplot-muted: #6a6e73;
  --bootplot-card-bg: #ffffff;
  --bootplot-card-border: #d2d2d2;
  --bootplot-code-bg: #f0f0f0;
  --bootplot-link: #0066cc;
}

.bootplot-section {
  font-family: var(--bootplot-font-family);
  color: var(--bootplot-text);
  padding: 24px;
}

.bootplot-empty {
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 12px;
  text-align: center;
  padding: 32px 16px;
}

.bootplot-empty h4 {
  margin: 0;
  font-size: 1.1rem;
}

.bootplot-spinner {
  width: 48px;
  height: 48px;
  border-radius: 50%;
  border: 4px solid var(--bootplot-card-border);
  border-top-color: var(--bootplot-link);
  animation: bootplot-spin 0.9s linear infinite;
}

@keyframes bootplot-spin {
  to { transform: rotate(360deg); }
}

.bootplot-code {
  font-family: 'Red Hat Mono', ui-monospace, monospace;
  background: var(--bootplot-code-bg);
  border-radius: 4px;
  padding: 12px 16px;
  text-align: left;
  white-space: pre-wrap;
  max-width: 60rem;
}

.bootplot-card {
  background: var(--bootplot-card-bg);
  border: 1px solid var(--bootplot-card-border);
  border-radius: 8px;
  padding: 16px 24px;
}

.bootplot-card h2 {
  margin: 0 0 12px;
  font-size: 1.25rem;
}

.legend {
  display: flex;
  flex-wrap: wrap;
  gap: 8px 20px;
  list-style: none;
  margin: 12px 0;
  padding: 0;
}

.legend li {
  display: flex;
  align-items: center;
  gap: 6px;
  color: var(--bootplot-muted);
}

.legendColor {
  width: 14px;
  height: 14px;
  border-radius: 2px;
  opacity: 0.7;
}

.legendColor.activating { background: rgb(255, 0, 0); }
.legendColor.active { background: rgb(200, 150, 150); }
.legendColor.deactivating { background: rgb(150, 100, 100); }
.legendColor.security { background: rgb(144, 238, 144); }
.legendColor.generators { background: rgb(102, 204, 255); }
.legendColor.unitsload { background: rgb(82, 184, 255); }

.chart-container {
  overflow: auto;
}

.chart > svg {
  transform-origin: top left;
}

.chart text.clickable-service {
  cursor: pointer;
}

.chart text.clickable-service:hover {
  fill: var(--bootplot-link);
  text-decoration: underline;
}
"#;
