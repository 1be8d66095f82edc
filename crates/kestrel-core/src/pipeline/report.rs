//! Log and progress collaborators injected into the pipeline.
//!
//! The pipeline never prints. Every user-facing message goes through the
//! log function with a [`LogLevel`], and completion is reported as a
//! percentage through the progress function, in pipeline order.

use std::sync::Arc;

use crate::types::LogLevel;

/// Receives user-facing log lines.
pub type LogFn = Arc<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Receives overall completion, 0.0 - 100.0.
pub type ProgressFn = Arc<dyn Fn(f32) + Send + Sync>;

/// Bundles the two collaborators handed to every stage.
#[derive(Clone)]
pub struct Reporter {
    log: LogFn,
    progress: ProgressFn,
}

impl Reporter {
    pub fn new(log: LogFn, progress: ProgressFn) -> Self {
        Self { log, progress }
    }

    /// Forward log lines to `tracing` and ignore progress.
    pub fn tracing() -> Self {
        Self::new(Arc::new(log_to_tracing), Arc::new(|_: f32| {}))
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        (self.log)(level, message);
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn progress(&self, percent: f32) {
        (self.progress)(percent.clamp(0.0, 100.0));
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::tracing()
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

/// Default log sink: map severities onto tracing levels.
pub fn log_to_tracing(level: LogLevel, message: &str) {
    match level {
        LogLevel::Success => tracing::info!(status = "success", "{message}"),
        LogLevel::Info => tracing::info!("{message}"),
        LogLevel::Warning => tracing::warn!("{message}"),
        LogLevel::Error => tracing::error!("{message}"),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Reporter that records everything it receives.
    #[derive(Clone, Default)]
    pub struct Recorder {
        pub lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
        pub progress: Arc<Mutex<Vec<f32>>>,
    }

    impl Recorder {
        pub fn reporter(&self) -> Reporter {
            let lines = self.lines.clone();
            let progress = self.progress.clone();
            Reporter::new(
                Arc::new(move |level: LogLevel, msg: &str| {
                    lines.lock().unwrap().push((level, msg.to_string()))
                }),
                Arc::new(move |pct: f32| progress.lock().unwrap().push(pct)),
            )
        }

        pub fn count(&self, level: LogLevel) -> usize {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| *l == level)
                .count()
        }

        pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .any(|(l, m)| *l == level && m.contains(needle))
        }
    }
}
