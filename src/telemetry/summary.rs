//! Derived analytics over the telemetry log.

use super::{CPU_METRIC, MEMORY_METRIC, TelemetryAggregator, TelemetryEvent, TelemetryKind};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

const TOP_COMMANDS: usize = 10;
const RECENT_ERRORS: usize = 10;
const TREND_WINDOW_MINUTES: i64 = 60;

/// One point of a performance trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub session_id: Uuid,
    /// Events per kind, in [`TelemetryKind::ALL`] order
    pub counts: Vec<(TelemetryKind, usize)>,
    pub command_count: u64,
    pub error_count: u64,
    pub error_rate: f64,
    pub average_execution_ms: f64,
    /// Most frequent commands; ties keep first-seen order
    pub top_commands: Vec<(String, usize)>,
    /// Newest first
    pub recent_errors: Vec<TelemetryEvent>,
    pub cpu_trend: Vec<TrendPoint>,
    pub memory_trend: Vec<TrendPoint>,
}

impl AnalyticsSummary {
    pub(super) fn build(telemetry: &TelemetryAggregator, now: DateTime<Utc>) -> Self {
        let events = telemetry.events();

        let counts = TelemetryKind::ALL
            .iter()
            .map(|&kind| (kind, events.iter().filter(|e| e.kind == kind).count()))
            .collect();

        let mut top_commands: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for event in events.iter().filter(|e| e.kind == TelemetryKind::Command) {
            match index.get(event.name.as_str()) {
                Some(&i) => top_commands[i].1 += 1,
                None => {
                    index.insert(&event.name, top_commands.len());
                    top_commands.push((event.name.clone(), 1));
                }
            }
        }
        top_commands.sort_by(|a, b| b.1.cmp(&a.1));
        top_commands.truncate(TOP_COMMANDS);

        let recent_errors = events
            .iter()
            .rev()
            .filter(|e| e.kind == TelemetryKind::Error)
            .take(RECENT_ERRORS)
            .cloned()
            .collect();

        let since = now - Duration::minutes(TREND_WINDOW_MINUTES);
        let trend = |metric: &str| -> Vec<TrendPoint> {
            events
                .iter()
                .filter(|e| {
                    e.kind == TelemetryKind::Performance
                        && e.name == metric
                        && e.timestamp >= since
                        && e.timestamp <= now
                })
                .filter_map(|e| {
                    e.value.map(|value| TrendPoint {
                        timestamp: e.timestamp,
                        value,
                    })
                })
                .collect()
        };

        Self {
            session_id: telemetry.session_id(),
            counts,
            command_count: telemetry.command_count(),
            error_count: telemetry.error_count(),
            error_rate: telemetry.error_rate(),
            average_execution_ms: telemetry.average_execution_ms(),
            top_commands,
            recent_errors,
            cpu_trend: trend(CPU_METRIC),
            memory_trend: trend(MEMORY_METRIC),
        }
    }

    pub fn count_of(&self, kind: TelemetryKind) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }
}
