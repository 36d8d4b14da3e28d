//! Thin front-end over [`tracing`] macros with stage and dry-run targets.

/// Target used for stage headers.
pub const STAGE_TARGET: &str = "eazfuscator::stage";

/// Target used for dry-run action messages.
pub const DRY_RUN_TARGET: &str = "eazfuscator::dry_run";

/// Structured logger used by the command layer.
///
/// Every method emits a single [`tracing`] event; formatting and filtering
/// are left to the subscriber installed by
/// [`init_subscriber`](super::init_subscriber).
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

#[allow(clippy::unused_self)]
impl Logger {
    /// Create a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "eazfuscator::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "eazfuscator::dry_run", "{msg}");
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt as _;

    /// Records `(level, target, message)` for every event.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(tracing::Level, String, String)>>>);

    struct Message(String);

    impl tracing::field::Visit for Message {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Recorder {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut msg = Message(String::new());
            event.record(&mut msg);
            self.0.lock().unwrap().push((
                *event.metadata().level(),
                event.metadata().target().to_string(),
                msg.0,
            ));
        }
    }

    fn capture(f: impl FnOnce(&Logger)) -> Vec<(tracing::Level, String, String)> {
        let recorder = Recorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        tracing::subscriber::with_default(subscriber, || f(&Logger::new()));
        let events = recorder.0.lock().unwrap().clone();
        events
    }

    #[test]
    fn stage_uses_stage_target() {
        let events = capture(|log| log.stage("Resolving executable"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, tracing::Level::INFO);
        assert_eq!(events[0].1, STAGE_TARGET);
        assert_eq!(events[0].2, "Resolving executable");
    }

    #[test]
    fn dry_run_uses_dry_run_target() {
        let events = capture(|log| log.dry_run("would run obfuscator"));
        assert_eq!(events[0].1, DRY_RUN_TARGET);
    }

    #[test]
    fn levels_match_methods() {
        let events = capture(|log| {
            log.error("e");
            log.warn("w");
            log.info("i");
            log.debug("d");
        });
        let levels: Vec<_> = events.iter().map(|e| e.0).collect();
        assert_eq!(
            levels,
            vec![
                tracing::Level::ERROR,
                tracing::Level::WARN,
                tracing::Level::INFO,
                tracing::Level::DEBUG,
            ]
        );
    }
}
