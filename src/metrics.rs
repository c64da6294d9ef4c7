//! Prometheus metrics collection for chatd.
//!
//! Metrics are exposed on an optional HTTP endpoint (see [`crate::http`]).
//! Every handle is a process-global `OnceLock`; recording before [`init`] is
//! a silent no-op, which keeps unit tests free of setup.
//!
//! - `chat_connected_sessions` - open connections (gauge)
//! - `chat_registered_sessions` - sessions holding a display name (gauge)
//! - `chat_command_total{command}` - commands processed by type
//! - `chat_command_duration_seconds{command}` - command latency histogram
//! - `chat_command_errors_total{command,error}` - rejected commands
//! - `chat_message_fanout` - recipients per broadcast (histogram)

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Lines written to client sockets.
pub static MESSAGES_SENT: OnceLock<IntCounter> = OnceLock::new();

/// Lines dropped because the recipient's outbound queue was full.
pub static MESSAGES_DROPPED: OnceLock<IntCounter> = OnceLock::new();

/// Failed `accept()` calls on the listener.
pub static ACCEPT_ERRORS: OnceLock<IntCounter> = OnceLock::new();

/// Commands processed by type (NICK, BC, MSG, LIST, INVALID).
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command errors by type and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges
// ========================================================================

pub static CONNECTED_SESSIONS: OnceLock<IntGauge> = OnceLock::new();

pub static REGISTERED_SESSIONS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Command processing latency by command type.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Recipients per broadcast.
pub static MESSAGE_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(MESSAGES_SENT, IntCounter::new("chat_messages_sent_total", "Lines written to clients"));
    register!(MESSAGES_DROPPED, IntCounter::new("chat_messages_dropped_total", "Lines dropped due to a full outbound queue"));
    register!(ACCEPT_ERRORS, IntCounter::new("chat_accept_errors_total", "Failed accept calls"));
    register!(CONNECTED_SESSIONS, IntGauge::new("chat_connected_sessions", "Open client connections"));
    register!(REGISTERED_SESSIONS, IntGauge::new("chat_registered_sessions", "Sessions holding a display name"));
    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("chat_command_total", "Commands processed by type"), &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("chat_command_errors_total", "Command errors by type"), &["command", "error"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("chat_command_duration_seconds", "Command latency by type")
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["command"]));
    register!(MESSAGE_FANOUT, Histogram::with_opts(
        HistogramOpts::new("chat_message_fanout", "Recipients per broadcast")
            .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

#[inline]
fn inc(counter: &OnceLock<IntCounter>) {
    if let Some(c) = counter.get() {
        c.inc();
    }
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

/// Record how many sessions received a broadcast.
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = MESSAGE_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

#[inline]
pub fn record_sent(lines: usize) {
    if let Some(c) = MESSAGES_SENT.get() {
        c.inc_by(lines as u64);
    }
}

#[inline]
pub fn record_dropped() {
    inc(&MESSAGES_DROPPED);
}

#[inline]
pub fn record_accept_error() {
    inc(&ACCEPT_ERRORS);
}

#[inline]
pub fn session_opened() {
    if let Some(g) = CONNECTED_SESSIONS.get() {
        g.inc();
    }
}

#[inline]
pub fn session_closed() {
    if let Some(g) = CONNECTED_SESSIONS.get() {
        g.dec();
    }
}

#[inline]
pub fn set_registered(count: usize) {
    if let Some(g) = REGISTERED_SESSIONS.get() {
        g.set(count as i64);
    }
}
