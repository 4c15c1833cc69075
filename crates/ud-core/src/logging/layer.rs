//! JSONL tracing layer.
//!
//! Writes one JSON object per event to stderr so stdout stays reserved
//! for the command payload. Correlation fields (`run_id`,
//! `evaluation_id`, `stage`) are lifted to the top level whether they
//! come from an enclosing span or from the event itself.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::Level;

#[derive(Debug, Clone, Default)]
struct Correlation {
    run_id: Option<String>,
    evaluation_id: Option<String>,
    stage: Option<String>,
}

impl Correlation {
    /// Take a correlation field. Returns false for ordinary fields.
    fn record(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "run_id" => &mut self.run_id,
            "evaluation_id" => &mut self.evaluation_id,
            "stage" => &mut self.stage,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Fill unset fields from an outer scope.
    fn inherit(&mut self, outer: &Correlation) {
        if self.run_id.is_none() {
            self.run_id.clone_from(&outer.run_id);
        }
        if self.evaluation_id.is_none() {
            self.evaluation_id.clone_from(&outer.evaluation_id);
        }
        if self.stage.is_none() {
            self.stage.clone_from(&outer.stage);
        }
    }
}

struct JsonFieldVisitor {
    correlation: Correlation,
    fields: serde_json::Map<String, serde_json::Value>,
    message: Option<String>,
}

impl JsonFieldVisitor {
    fn new() -> Self {
        JsonFieldVisitor {
            correlation: Correlation::default(),
            fields: serde_json::Map::new(),
            message: None,
        }
    }

    fn record_text(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else if !self.correlation.record(field.name(), value.clone()) {
            self.fields
                .insert(field.name().to_string(), serde_json::Value::String(value));
        }
    }
}

impl Visit for JsonFieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_text(field, format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // JSON has no infinities; keep them readable instead of dropping them.
        let json = match serde_json::Number::from_f64(value) {
            Some(n) => serde_json::Value::Number(n),
            None => serde_json::Value::String(value.to_string()),
        };
        self.fields.insert(field.name().to_string(), json);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::Bool(value));
    }
}

/// JSONL tracing layer.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        JsonlLayer {
            writer: Mutex::new(io::stderr()),
        }
    }
}

impl<W: Write> JsonlLayer<W> {
    /// Create a layer over a custom writer.
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = JsonFieldVisitor::new();
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(visitor.correlation);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let ts = Utc::now();

        let mut visitor = JsonFieldVisitor::new();
        event.record(&mut visitor);

        // Event fields win; spans fill the gaps, innermost first.
        let mut correlation = visitor.correlation;
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(outer) = span.extensions().get::<Correlation>() {
                    correlation.inherit(outer);
                }
            }
        }

        let level: Level = (*event.metadata().level()).into();
        let mut obj = serde_json::Map::new();
        obj.insert("ts".to_string(), serde_json::json!(ts.to_rfc3339()));
        obj.insert("level".to_string(), serde_json::json!(level));
        obj.insert(
            "event".to_string(),
            serde_json::json!(event.metadata().target()),
        );

        if let Some(id) = correlation.run_id {
            obj.insert("run_id".to_string(), serde_json::json!(id));
        }
        if let Some(id) = correlation.evaluation_id {
            obj.insert("evaluation_id".to_string(), serde_json::json!(id));
        }
        if let Some(stage) = correlation.stage {
            obj.insert("stage".to_string(), serde_json::json!(stage));
        }
        if let Some(msg) = visitor.message {
            obj.insert("message".to_string(), serde_json::json!(msg));
        }
        if !visitor.fields.is_empty() {
            obj.insert(
                "fields".to_string(),
                serde_json::Value::Object(visitor.fields),
            );
        }

        let json = serde_json::Value::Object(obj).to_string();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<serde_json::Value> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = JsonlLayer::new(BufWriter(buffer.clone()));
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);

        let output = buffer.lock().unwrap();
        String::from_utf8_lossy(&output)
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid JSON line"))
            .collect()
    }

    #[test]
    fn test_jsonl_layer_output() {
        let lines = capture(|| {
            tracing::info!(target: "test.event", message = "test message");
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["event"], "test.event");
        assert_eq!(lines[0]["message"], "test message");
        assert!(lines[0]["ts"].is_string());
    }

    #[test]
    fn correlation_fields_lifted_from_event() {
        let lines = capture(|| {
            tracing::warn!(
                target: "decide.recommended",
                run_id = "run-1",
                evaluation_id = "ud-20261017-101500-a7xq",
                stage = "decide",
                eu_umbrella = 51.5,
                message = "scored"
            );
        });
        let line = &lines[0];
        assert_eq!(line["level"], "warn");
        assert_eq!(line["run_id"], "run-1");
        assert_eq!(line["evaluation_id"], "ud-20261017-101500-a7xq");
        assert_eq!(line["stage"], "decide");
        assert_eq!(line["fields"]["eu_umbrella"], 51.5);
        assert!(line["fields"].get("run_id").is_none());
    }

    #[test]
    fn correlation_inherited_from_span() {
        let lines = capture(|| {
            let span = tracing::info_span!("run", run_id = "run-outer", stage = "infer");
            let _guard = span.enter();
            tracing::info!(target: "infer.posterior", posterior_rain = 0.25, message = "updated");
        });
        assert_eq!(lines[0]["run_id"], "run-outer");
        assert_eq!(lines[0]["stage"], "infer");
        assert_eq!(lines[0]["fields"]["posterior_rain"], 0.25);
    }

    #[test]
    fn event_fields_beat_span_fields() {
        let lines = capture(|| {
            let span = tracing::info_span!("run", stage = "config");
            let _guard = span.enter();
            tracing::info!(target: "x", stage = "render", message = "m");
        });
        assert_eq!(lines[0]["stage"], "render");
    }

    #[test]
    fn layer_records_typed_fields() {
        let lines = capture(|| {
            tracing::error!(target: "t", count = 42, active = true, ratio = f64::INFINITY, message = "hi");
        });
        let fields = &lines[0]["fields"];
        assert_eq!(lines[0]["level"], "error");
        assert_eq!(fields["count"], 42);
        assert_eq!(fields["active"], true);
        assert_eq!(fields["ratio"], "inf");
    }

    #[test]
    fn display_fields_are_strings() {
        let lines = capture(|| {
            let observation = "good";
            tracing::info!(target: "t", observation = %observation, message = "m");
        });
        assert_eq!(lines[0]["fields"]["observation"], "good");
    }
}
