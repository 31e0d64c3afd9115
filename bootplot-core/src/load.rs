//! Load lifecycle of the panel: streamed output and guarded state transitions.

use crate::{BootError, BootMode, BootPlot};

/// What the panel currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(BootPlot),
    /// Raw error text, shown verbatim.
    Failed(String),
}

impl LoadState {
    pub fn from_result(result: Result<BootPlot, BootError>) -> Self {
        match result {
            Ok(plot) => LoadState::Ready(plot),
            Err(err) => LoadState::Failed(err.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn plot(&self) -> Option<&BootPlot> {
        match self {
            LoadState::Ready(plot) => Some(plot),
            _ => None,
        }
    }

    pub fn error_text(&self) -> Option<&str> {
        match self {
            LoadState::Failed(text) => Some(text),
            _ => None,
        }
    }
}

/// Identifies one load started by [`LoadTracker::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    mode: BootMode,
}

impl LoadTicket {
    pub fn mode(&self) -> BootMode {
        self.mode
    }
}

/// Holds the panel state and drops results of loads that were superseded by a newer one
/// (e.g. a mode switch while the previous analyzer run is still streaming).
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    state: LoadState,
}

impl LoadTracker {
    pub fn begin(&mut self, mode: BootMode) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        tracing::debug!(generation = self.generation, ?mode, "boot plot load started");
        LoadTicket {
            generation: self.generation,
            mode,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies the outcome of `ticket`'s load. Returns `false` when the result was stale
    /// and got discarded.
    pub fn finish(&mut self, ticket: LoadTicket, result: Result<BootPlot, BootError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded boot plot load"
            );
            return false;
        }

        if let Err(err) = &result {
            tracing::warn!(error = %err, mode = ?ticket.mode, "boot plot load failed");
        }
        self.state = LoadState::from_result(result);
        true
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }
}

/// Accumulates analyzer output chunks in arrival order. The text only becomes a
/// well-formed document once the stream has ended.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
    chunks: usize,
}

impl OutputBuffer {
    pub fn push_bytes(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
        self.chunks += 1;
    }

    pub fn push_str(&mut self, chunk: &str) {
        self.push_bytes(chunk.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn finish(self) -> Result<String, BootError> {
        String::from_utf8(self.bytes).map_err(|err| {
            BootError::Invocation(format!("analyzer output is not valid UTF-8: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plot(summary: &str) -> BootPlot {
        BootPlot::new(Some(summary.to_string()), "<svg/>".to_string(), Vec::new())
    }

    #[test]
    fn load_goes_from_loading_to_ready() {
        let mut tracker = LoadTracker::default();
        assert!(tracker.state().is_loading());

        let ticket = tracker.begin(BootMode::System);
        assert!(tracker.finish(ticket, Ok(plot("Startup finished in 5.2s"))));
        assert_eq!(
            tracker.state().plot().and_then(|p| p.summary.as_deref()),
            Some("Startup finished in 5.2s")
        );
    }

    #[test]
    fn invocation_failure_keeps_literal_text() {
        let mut tracker = LoadTracker::default();
        let ticket = tracker.begin(BootMode::User);
        tracker.finish(
            ticket,
            Err(BootError::Invocation("command not found".to_string())),
        );
        assert_eq!(tracker.state().error_text(), Some("command not found"));
    }

    #[test]
    fn superseded_result_is_discarded() {
        let mut tracker = LoadTracker::default();
        let system = tracker.begin(BootMode::System);
        let user = tracker.begin(BootMode::User);
        assert_eq!(user.mode(), BootMode::User);

        assert!(tracker.finish(user, Ok(plot("user"))));
        assert!(!tracker.finish(system, Ok(plot("system"))));
        assert_eq!(
            tracker.state().plot().and_then(|p| p.summary.as_deref()),
            Some("user")
        );
    }

    #[test]
    fn begin_resets_to_loading() {
        let mut tracker = LoadTracker::default();
        let ticket = tracker.begin(BootMode::System);
        tracker.finish(ticket, Err(BootError::Parse("eof".to_string())));
        assert!(tracker.state().error_text().is_some());

        tracker.begin(BootMode::User);
        assert!(tracker.state().is_loading());
    }

    #[test]
    fn buffer_joins_chunks_in_order() {
        let mut buffer = OutputBuffer::default();
        assert!(buffer.is_empty());
        buffer.push_str("<svg>");
        // "é" split across two chunks
        buffer.push_bytes(&[b'<', b't', b'>', 0xC3]);
        buffer.push_bytes(&[0xA9, b'<', b'/', b't', b'>']);
        buffer.push_str("</svg>");

        assert_eq!(buffer.chunk_count(), 4);
        assert_eq!(buffer.finish().as_deref(), Ok("<svg><t>é</t></svg>"));
    }

    #[test]
    fn buffer_rejects_invalid_utf8() {
        let mut buffer = OutputBuffer::default();
        buffer.push_bytes(&[0xFF, 0xFE]);
        assert!(matches!(buffer.finish(), Err(BootError::Invocation(_))));
    }
}
