//! Structured logging for ud-core.
//!
//! Two output modes, both on stderr:
//! - human-readable console lines for interactive use
//! - JSONL for scripts and agents
//!
//! stdout is reserved for the command payload.
//!
//! ```ignore
//! use ud_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new(generate_run_id());
//! ud_core::log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting");
//! ```

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogContext, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Call once at startup. A second call is ignored.
pub fn init_logging(config: &LogConfig) {
    // Event targets are dotted names ("infer.posterior"), not module paths,
    // so the filter is a bare level.
    let filter = EnvFilter::new(config.level.to_string());

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(JsonlLayer::stderr())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Unique ID for one invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &uuid[..12])
}

/// Emit a structured event carrying the context's correlation IDs.
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting");
/// log_event!(ctx, DEBUG, event_names::CONFIG_LOADED, Stage::Config, "model loaded",
///     source = %location.source);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, INFO, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::info!(
            target: $event,
            run_id = %$ctx.run_id,
            evaluation_id = %$ctx.evaluation_label(),
            stage = %$stage,
            $($($fields)+,)?
            message = $msg
        )
    };
    ($ctx:expr, DEBUG, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::debug!(
            target: $event,
            run_id = %$ctx.run_id,
            evaluation_id = %$ctx.evaluation_label(),
            stage = %$stage,
            $($($fields)+,)?
            message = $msg
        )
    };
    ($ctx:expr, WARN, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::warn!(
            target: $event,
            run_id = %$ctx.run_id,
            evaluation_id = %$ctx.evaluation_label(),
            stage = %$stage,
            $($($fields)+,)?
            message = $msg
        )
    };
    ($ctx:expr, ERROR, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::error!(
            target: $event,
            run_id = %$ctx.run_id,
            evaluation_id = %$ctx.evaluation_label(),
            stage = %$stage,
            $($($fields)+,)?
            message = $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_ne!(id1, id2);
        // run- + 12 hex chars
        assert_eq!(id1.len(), 16);
        assert!(id1[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Warn);
    }

    #[test]
    fn test_log_event_macro_fields() {
        use std::io::{self, Write};
        use std::sync::{Arc, Mutex};

        struct BufWriter(Arc<Mutex<Vec<u8>>>);
        impl Write for BufWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().write(buf)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let subscriber =
            tracing_subscriber::registry().with(JsonlLayer::new(BufWriter(buffer.clone())));
        let ctx = LogContext::new("run-abc").with_evaluation_id("ud-20261017-101500-a7xq");

        tracing::subscriber::with_default(subscriber, || {
            crate::log_event!(
                ctx,
                INFO,
                event_names::RUN_FINISHED,
                Stage::Render,
                "done",
                exit_code = 1
            );
        });

        let output = buffer.lock().unwrap();
        let line: serde_json::Value =
            serde_json::from_str(String::from_utf8_lossy(&output).trim()).unwrap();
        assert_eq!(line["event"], "run.finished");
        assert_eq!(line["run_id"], "run-abc");
        assert_eq!(line["evaluation_id"], "ud-20261017-101500-a7xq");
        assert_eq!(line["stage"], "render");
        assert_eq!(line["message"], "done");
        assert_eq!(line["fields"]["exit_code"], 1);
    }
}
