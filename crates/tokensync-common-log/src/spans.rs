//! Span helpers for sync runs and remote calls.

use std::future::Future;
use tracing::{info_span, Instrument, Span};

/// Span wrapping one sync run.
pub fn sync_span(run_id: &str) -> Span {
    info_span!("sync", run = %run_id, outcome = tracing::field::Empty)
}

/// Span wrapping one call to the remote repository.
pub fn remote_span(operation: &str, path: &str) -> Span {
    info_span!("remote", op = %operation, path = %path, error = tracing::field::Empty)
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Measures how long a pipeline stage takes.
pub struct Timer {
    start: std::time::Instant,
    stage: &'static str,
}

impl Timer {
    pub fn start(stage: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            stage,
        }
    }

    /// Log the elapsed time and return it.
    pub fn finish(self) -> std::time::Duration {
        let elapsed = self.start.elapsed();
        tracing::debug!(
            stage = %self.stage,
            duration_ms = %elapsed.as_millis(),
            "stage completed"
        );
        elapsed
    }
}

/// Time a block with a [`Timer`].
#[macro_export]
macro_rules! timed {
    ($stage:expr, $body:expr) => {{
        let timer = $crate::spans::Timer::start($stage);
        let result = $body;
        timer.finish();
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    fn with_subscriber<F>(f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::new("trace"))
            .finish();

        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_nested_spans_record_fields() {
        with_subscriber(|| {
            let sync = sync_span("run-1");
            let _sync = sync.enter();

            let remote = remote_span("fetch", "tokens/src/foundation/color.json");
            let _remote = remote.enter();

            let error = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline elapsed");
            record_error(&error);
            sync.record("outcome", "failed");
        });
    }

    #[tokio::test]
    async fn test_instrument_future_passes_output_through() {
        let value = instrument_future(async { 42 }, sync_span("async")).await;
        assert_eq!(value, 42);
    }

    #[test]
    fn test_timed_macro_returns_body() {
        with_subscriber(|| {
            let result = crate::timed!("extract", {
                std::thread::sleep(std::time::Duration::from_millis(2));
                "done"
            });
            assert_eq!(result, "done");
        });
    }

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = Timer::start("validate");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.finish() >= std::time::Duration::from_millis(5));
    }
}
