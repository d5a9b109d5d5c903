use std::time::{Duration, Instant};

use dashmap::DashMap;
use opentelemetry::KeyValue;
use opentelemetry::metrics::Meter;
use parking_lot::Mutex;

/// Prefix shared by every metric this crate emits.
pub const NAMESPACE: &str = "solitude";

/// Counter and timer sink. Implementations must tolerate concurrent use.
pub trait MetricsSink: Send + Sync {
    /// Fire-and-forget counter increment.
    fn incr(&self, name: &str);

    /// Records the wall time spent in a named call.
    fn timing(&self, name: &str, elapsed: Duration);
}

/// Starts a timer that reports to `sink` when dropped.
pub fn timer<'a>(sink: &'a dyn MetricsSink, name: String) -> Timer<'a> {
    Timer {
        sink,
        name,
        started: Instant::now(),
    }
}

/// Scoped wall-time measurement. The sample is emitted on drop, so an early
/// return through `?` is still timed.
pub struct Timer<'a> {
    sink: &'a dyn MetricsSink,
    name: String,
    started: Instant,
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink.timing(&self.name, self.started.elapsed());
    }
}

/// Emits metrics as `tracing` events. This is the default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MetricsSink for LogSink {
    fn incr(&self, name: &str) {
        tracing::debug!(metric = name, "incr");
    }

    fn timing(&self, name: &str, elapsed: Duration) {
        tracing::debug!(
            metric = name,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "timing"
        );
    }
}

/// Forwards metrics to an OpenTelemetry meter.
///
/// Counters become `u64` counters and timings become second-valued
/// histograms, both named after the dotted metric name.
#[derive(Debug, Clone)]
pub struct OtelSink {
    meter: Meter,
    attributes: Vec<KeyValue>,
}

impl OtelSink {
    #[must_use]
    pub fn new(meter: Meter) -> Self {
        Self {
            meter,
            attributes: Vec::new(),
        }
    }

    /// Uses the globally installed meter provider.
    #[must_use]
    pub fn global() -> Self {
        Self::new(opentelemetry::global::meter(NAMESPACE))
    }

    /// Attaches attributes (e.g. environment) to every recorded value.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<KeyValue>) -> Self {
        self.attributes = attributes;
        self
    }
}

impl MetricsSink for OtelSink {
    fn incr(&self, name: &str) {
        self.meter
            .u64_counter(name.to_owned())
            .build()
            .add(1, &self.attributes);
    }

    fn timing(&self, name: &str, elapsed: Duration) {
        self.meter
            .f64_histogram(name.to_owned())
            .with_unit("s")
            .build()
            .record(elapsed.as_secs_f64(), &self.attributes);
    }
}

/// Keeps everything in memory. Useful in tests and for ad-hoc diagnostics.
#[derive(Debug, Default)]
pub struct RecordingSink {
    counters: DashMap<String, u64>,
    timings: Mutex<Vec<(String, Duration)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self, name: &str) -> u64 {
        self.counters.get(name).map_or(0, |c| *c)
    }

    /// Names of recorded timings, in recording order.
    #[must_use]
    pub fn timer_names(&self) -> Vec<String> {
        self.timings.lock().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl MetricsSink for RecordingSink {
    fn incr(&self, name: &str) {
        *self.counters.entry(name.to_owned()).or_insert(0) += 1;
    }

    fn timing(&self, name: &str, elapsed: Duration) {
        self.timings.lock().push((name.to_owned(), elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_records_on_drop() {
        let sink = RecordingSink::new();
        {
            let _t = timer(&sink, "solitude.bango.create.package".to_owned());
            assert!(sink.timer_names().is_empty());
        }
        assert_eq!(sink.timer_names(), vec!["solitude.bango.create.package"]);
    }

    #[test]
    fn test_timer_records_on_early_return() {
        fn failing(sink: &dyn MetricsSink) -> Result<(), String> {
            let _t = timer(sink, "solitude.bango.update.rating".to_owned());
            Err::<(), _>("boom".to_owned())?;
            Ok(())
        }

        let sink = RecordingSink::new();
        assert!(failing(&sink).is_err());
        assert_eq!(sink.timer_names(), vec!["solitude.bango.update.rating"]);
    }

    #[test]
    fn test_counters() {
        let sink = RecordingSink::new();
        sink.incr("solitude.bango.ok");
        sink.incr("solitude.bango.ok");
        assert_eq!(sink.count("solitude.bango.ok"), 2);
        assert_eq!(sink.count("solitude.bango.wat"), 0);
    }

    #[test]
    fn test_otel_sink_without_provider_is_noop() {
        let sink = OtelSink::global();
        sink.incr("solitude.bango.ok");
        sink.timing("solitude.bango.create.package", Duration::from_millis(3));
    }
}
