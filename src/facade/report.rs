//! Failure reporting sink

/// Receives one human-readable message per failed operation.
pub trait Reporter {
    fn report(&self, message: &str);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, message: &str) {
        (**self).report(message)
    }
}

/// Emits failures as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
