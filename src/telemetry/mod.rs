//! Telemetry aggregation
//!
//! Records command executions, errors, warnings, user actions, and timed
//! measurements into a bounded event log, and keeps running counters that
//! survive eviction. [`TelemetryAggregator::summary`] derives the
//! analytics shown in the status report.

mod summary;

pub use summary::{AnalyticsSummary, TrendPoint};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use uuid::Uuid;

/// Performance metric names with a trend series in the summary.
pub const CPU_METRIC: &str = "cpu";
pub const MEMORY_METRIC: &str = "memory";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryKind {
    Command,
    Error,
    Warning,
    UserAction,
    Performance,
}

impl TelemetryKind {
    pub const ALL: [TelemetryKind; 5] = [
        TelemetryKind::Command,
        TelemetryKind::Error,
        TelemetryKind::Warning,
        TelemetryKind::UserAction,
        TelemetryKind::Performance,
    ];
}

/// One flat telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: TelemetryKind,
    /// Command name, error source, action name, or metric name
    pub name: String,
    /// Milliseconds for commands, the sample for performance events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TelemetryEvent {
    fn new(kind: TelemetryKind, name: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            name: name.into(),
            value: None,
            success: None,
            detail: None,
        }
    }
}

/// Bounded telemetry log with running statistics.
#[derive(Debug, Clone)]
pub struct TelemetryAggregator {
    events: VecDeque<TelemetryEvent>,
    capacity: usize,
    command_count: u64,
    error_count: u64,
    /// Running mean of command execution time in milliseconds
    average_execution_ms: f64,
    session_id: Uuid,
    dirty: bool,
}

impl TelemetryAggregator {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            command_count: 0,
            error_count: 0,
            average_execution_ms: 0.0,
            session_id: Uuid::new_v4(),
            dirty: false,
        }
    }

    fn push(&mut self, event: TelemetryEvent) {
        if self.capacity == 0 {
            return;
        }
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
        self.dirty = true;
    }

    /// Record a finished command. A failure also counts as an error.
    pub fn track_command(&mut self, name: &str, execution_ms: f64, success: bool) {
        if success {
            self.record_command(name, execution_ms, true);
        } else {
            self.track_command_failure(name, execution_ms, "command failed");
        }
    }

    /// Record a failed command together with its error message.
    pub fn track_command_failure(&mut self, name: &str, execution_ms: f64, message: impl Into<String>) {
        self.record_command(name, execution_ms, false);
        self.track_error(name, message);
    }

    fn record_command(&mut self, name: &str, execution_ms: f64, success: bool) {
        self.command_count += 1;
        let n = self.command_count as f64;
        self.average_execution_ms = (self.average_execution_ms * (n - 1.0) + execution_ms) / n;

        let mut event = TelemetryEvent::new(TelemetryKind::Command, name);
        event.value = Some(execution_ms);
        event.success = Some(success);
        self.push(event);
    }

    pub fn track_error(&mut self, source: &str, message: impl Into<String>) {
        self.error_count += 1;
        let mut event = TelemetryEvent::new(TelemetryKind::Error, source);
        event.detail = Some(message.into());
        self.push(event);
    }

    pub fn track_warning(&mut self, source: &str, message: impl Into<String>) {
        let mut event = TelemetryEvent::new(TelemetryKind::Warning, source);
        event.detail = Some(message.into());
        self.push(event);
    }

    pub fn track_user_action(&mut self, action: &str) {
        self.push(TelemetryEvent::new(TelemetryKind::UserAction, action));
    }

    pub fn track_performance(&mut self, metric: &str, value: f64) {
        let mut event = TelemetryEvent::new(TelemetryKind::Performance, metric);
        event.value = Some(value);
        self.push(event);
    }

    /// Time `f`, recording a performance sample and, on failure, an error.
    ///
    /// The closure's result is returned untouched.
    pub fn measure<T, E, F>(&mut self, name: &str, f: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let start = Instant::now();
        let result = f();
        self.record_measurement(name, start, &result);
        result
    }

    /// Async counterpart of [`measure`](Self::measure).
    pub async fn measure_async<T, E, Fut>(&mut self, name: &str, fut: Fut) -> Result<T, E>
    where
        E: Display,
        Fut: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let result = fut.await;
        self.record_measurement(name, start, &result);
        result
    }

    fn record_measurement<T, E: Display>(&mut self, name: &str, start: Instant, result: &Result<T, E>) {
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.track_performance(name, elapsed_ms);
        if let Err(e) = result {
            self.track_error(name, e.to_string());
        }
    }

    /// Replace the event log with previously saved events.
    ///
    /// Counters are per session and are not rebuilt from the log.
    pub fn restore(&mut self, events: Vec<TelemetryEvent>) {
        self.events = events.into();
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
        self.dirty = false;
        log::info!("Restored {} telemetry events", self.events.len());
    }

    pub fn summary(&self) -> AnalyticsSummary {
        self.summary_at(Utc::now())
    }

    /// Summary with trend windows measured back from `now`.
    pub fn summary_at(&self, now: DateTime<Utc>) -> AnalyticsSummary {
        AnalyticsSummary::build(self, now)
    }

    pub fn events(&self) -> &VecDeque<TelemetryEvent> {
        &self.events
    }

    pub fn command_count(&self) -> u64 {
        self.command_count
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn average_execution_ms(&self) -> f64 {
        self.average_execution_ms
    }

    /// Errors per command; zero before any command ran.
    pub fn error_rate(&self) -> f64 {
        if self.command_count == 0 {
            0.0
        } else {
            self.error_count as f64 / self.command_count as f64
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
