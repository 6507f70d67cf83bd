use std::io::Write;

use thiserror::Error;

/// Failure to deliver a diagnostic record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("diagnostic sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for human-readable diagnostic text.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, message: &str) -> Result<(), SinkError>;
}

/// Writes each record as a line on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn record(&self, message: &str) -> Result<(), SinkError> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{message}")?;
        Ok(())
    }
}

/// Forwards records to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, message: &str) -> Result<(), SinkError> {
        tracing::info!(target: "cgau::diagnostics", "{message}");
        Ok(())
    }
}

/// Borrowed handle used by the decoder to emit diagnostics.
///
/// Records go to the configured sink; if there is none, or it fails, the text
/// is written to the fallback (stderr unless overridden). Errors from the
/// fallback are dropped.
#[derive(Clone, Copy)]
pub struct Diagnostics<'a> {
    sink: Option<&'a dyn DiagnosticSink>,
    fallback: &'a dyn DiagnosticSink,
}

impl Default for Diagnostics<'_> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<'a> Diagnostics<'a> {
    pub fn new(sink: Option<&'a dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            fallback: &StderrSink,
        }
    }

    pub fn with_fallback(mut self, fallback: &'a dyn DiagnosticSink) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn log(&self, message: &str) {
        if let Some(sink) = self.sink {
            match sink.record(message) {
                Ok(()) => return,
                Err(err) => {
                    tracing::debug!(error = %err, "diagnostic sink failed, using fallback");
                }
            }
        }
        let _ = self.fallback.record(message);
    }
}
