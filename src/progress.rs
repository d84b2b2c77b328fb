// src/progress.rs
use crate::data::SourceKind;

/// Lightweight progress reporting used by long-running operations (acquisition, export).
/// Frontends implement this to surface status to users.
///
/// Sinks are shared between concurrently running sources, so every method
/// takes `&self`.
pub trait Progress: Send + Sync {
    /// Called at the start with the total number of items (an estimate for paged sources).
    fn begin(&self, _total: usize) {}

    /// `completed` never decreases within one source.
    fn advance(&self, _completed: usize, _total: usize, _message: &str) {}

    /// Same as `advance`, tagged with the reporting source. Sinks that show
    /// sources side by side override this one.
    fn advance_from(&self, _source: SourceKind, completed: usize, total: usize, message: &str) {
        self.advance(completed, total, message)
    }

    /// Free-form status line for human eyes.
    fn log(&self, _msg: &str) {}

    /// Called at the end, successful or not.
    fn finish(&self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Adapts a plain `(completed, total, message)` callback.
pub struct FnProgress<F>(pub F);

impl<F> Progress for FnProgress<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn advance(&self, completed: usize, total: usize, message: &str) {
        (self.0)(completed, total, message)
    }
}

/// What one source sees: its `advance` calls arrive at the shared sink as
/// `advance_from(source, …)`.
pub struct Tagged<'a> {
    pub source: SourceKind,
    pub inner: &'a dyn Progress,
}

impl Progress for Tagged<'_> {
    fn advance(&self, completed: usize, total: usize, message: &str) {
        self.inner.advance_from(self.source, completed, total, message)
    }

    fn log(&self, msg: &str) {
        self.inner.log(&join!(self.source.label(), ": ", msg))
    }
}
