//! Tests for the telemetry aggregator and its analytics summary

use chrono::{Duration, Utc};
use par_shell::error::ExecutionError;
use par_shell::telemetry::{CPU_METRIC, MEMORY_METRIC, TelemetryAggregator, TelemetryKind};

#[test]
fn test_average_and_error_rate_track_commands() {
    let mut telemetry = TelemetryAggregator::new(1000);
    for ms in [100.0, 200.0, 300.0] {
        telemetry.track_command("build", ms, true);
    }
    telemetry.track_command_failure("deploy", 400.0, "connection refused");

    assert_eq!(telemetry.command_count(), 4);
    assert_eq!(telemetry.error_count(), 1);
    assert!((telemetry.average_execution_ms() - 250.0).abs() < 1e-9);
    assert!((telemetry.error_rate() - 0.25).abs() < 1e-9);

    let last = telemetry.events().back().unwrap();
    assert_eq!(last.kind, TelemetryKind::Error);
    assert_eq!(last.name, "deploy");
    assert_eq!(last.detail.as_deref(), Some("connection refused"));
}

#[test]
fn test_non_command_events_do_not_move_counters() {
    let mut telemetry = TelemetryAggregator::new(1000);
    telemetry.track_user_action("new_tab");
    telemetry.track_warning("clipboard", "denied");
    telemetry.track_performance(CPU_METRIC, 12.5);

    assert_eq!(telemetry.command_count(), 0);
    assert_eq!(telemetry.error_count(), 0);
    assert_eq!(telemetry.error_rate(), 0.0);
    assert_eq!(telemetry.events().len(), 3);
}

#[test]
fn test_zero_capacity_keeps_counters_only() {
    let mut telemetry = TelemetryAggregator::new(0);
    telemetry.track_command("ls", 5.0, false);
    assert!(telemetry.events().is_empty());
    assert_eq!(telemetry.command_count(), 1);
    assert_eq!(telemetry.error_count(), 1);
}

#[test]
fn test_summary_counts_and_top_commands() {
    let mut telemetry = TelemetryAggregator::new(1000);
    for name in ["git", "ls", "git", "make", "ls", "git"] {
        telemetry.track_command(name, 1.0, true);
    }
    telemetry.track_user_action("cycle_theme");

    let summary = telemetry.summary();
    assert_eq!(
        summary.top_commands,
        vec![
            ("git".to_string(), 3),
            ("ls".to_string(), 2),
            ("make".to_string(), 1)
        ]
    );
    assert_eq!(summary.count_of(TelemetryKind::Command), 6);
    assert_eq!(summary.count_of(TelemetryKind::UserAction), 1);
    assert_eq!(summary.count_of(TelemetryKind::Error), 0);
    assert_eq!(summary.counts.len(), TelemetryKind::ALL.len());
    assert_eq!(summary.session_id, telemetry.session_id());
}

#[test]
fn test_top_commands_limited_to_ten() {
    let mut telemetry = TelemetryAggregator::new(1000);
    for i in 0..15 {
        telemetry.track_command(&format!("cmd{i}"), 1.0, true);
    }
    let summary = telemetry.summary();
    assert_eq!(summary.top_commands.len(), 10);
    assert_eq!(summary.top_commands[0].0, "cmd0");
}

#[test]
fn test_recent_errors_newest_first() {
    let mut telemetry = TelemetryAggregator::new(1000);
    for i in 0..12 {
        telemetry.track_error("processor", format!("error {i}"));
    }
    let summary = telemetry.summary();
    assert_eq!(summary.recent_errors.len(), 10);
    assert_eq!(summary.recent_errors[0].detail.as_deref(), Some("error 11"));
    assert_eq!(summary.recent_errors[9].detail.as_deref(), Some("error 2"));
}

#[test]
fn test_trends_cover_last_hour_only() {
    let mut telemetry = TelemetryAggregator::new(1000);
    telemetry.track_performance(CPU_METRIC, 40.0);
    telemetry.track_performance(MEMORY_METRIC, 55.0);
    telemetry.track_performance(CPU_METRIC, 42.0);
    telemetry.track_performance("render", 3.0);

    let now = Utc::now();
    let summary = telemetry.summary_at(now);
    let cpu: Vec<f64> = summary.cpu_trend.iter().map(|p| p.value).collect();
    assert_eq!(cpu, vec![40.0, 42.0]);
    assert_eq!(summary.memory_trend.len(), 1);

    let later = telemetry.summary_at(now + Duration::minutes(61));
    assert!(later.cpu_trend.is_empty());
    assert!(later.memory_trend.is_empty());

    let earlier = telemetry.summary_at(now - Duration::minutes(5));
    assert!(earlier.cpu_trend.is_empty());
}

#[test]
fn test_restore_trims_and_keeps_counters() {
    let mut source = TelemetryAggregator::new(1000);
    for i in 0..8 {
        source.track_command(&format!("c{i}"), 1.0, true);
    }

    let mut restored = TelemetryAggregator::new(5);
    restored.restore(source.events().iter().cloned().collect());
    assert_eq!(restored.events().len(), 5);
    assert_eq!(restored.events().front().unwrap().name, "c3");
    assert_eq!(restored.command_count(), 0);
    assert!(!restored.is_dirty());
}

#[test]
fn test_measure_passes_value_through() {
    let mut telemetry = TelemetryAggregator::new(100);
    let result: Result<u32, ExecutionError> = telemetry.measure("parse", || Ok(7));
    assert_eq!(result, Ok(7));
    assert_eq!(telemetry.error_count(), 0);
    assert_eq!(telemetry.events()[0].kind, TelemetryKind::Performance);
    assert_eq!(telemetry.events()[0].name, "parse");
}

#[tokio::test]
async fn test_measure_async_reraises_original_error() {
    let mut telemetry = TelemetryAggregator::new(100);
    let result: Result<(), ExecutionError> = telemetry
        .measure_async("fetch", async {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            Err(ExecutionError::CommandNotFound("curl".to_string()))
        })
        .await;

    assert_eq!(
        result,
        Err(ExecutionError::CommandNotFound("curl".to_string()))
    );
    let kinds: Vec<TelemetryKind> = telemetry.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![TelemetryKind::Performance, TelemetryKind::Error]);
    assert!(telemetry.events()[0].value.unwrap() >= 5.0);
    assert_eq!(
        telemetry.events()[1].detail.as_deref(),
        Some("command not found: curl")
    );
}

#[tokio::test]
async fn test_measure_async_success_records_sample_only() {
    let mut telemetry = TelemetryAggregator::new(100);
    let value = telemetry
        .measure_async("compute", async { Ok::<_, ExecutionError>("done") })
        .await;
    assert_eq!(value, Ok("done"));
    assert_eq!(telemetry.events().len(), 1);
    assert_eq!(telemetry.error_count(), 0);
}
