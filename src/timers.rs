//! Session timers: periodic metrics refresh and idle UI hiding.
//!
//! Both run as tokio tasks owned by a [`Ticker`]. Dropping the ticker
//! aborts them, so a session that shuts down never leaks a timer.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// One CPU/memory reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSample {
    /// Global CPU usage (0.0 - 100.0)
    pub cpu_percent: f32,
    /// Used share of physical memory (0.0 - 100.0)
    pub memory_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    MetricsRefresh(MetricsSample),
    /// No input arrived for the idle timeout
    IdleHide,
}

/// Owner of the timer tasks.
pub struct Ticker {
    last_input: Arc<Mutex<Instant>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn both timers. Must be called from within a tokio runtime.
    pub fn start(
        metrics_interval: Duration,
        idle_timeout: Duration,
        events: UnboundedSender<TimerEvent>,
    ) -> Self {
        let last_input = Arc::new(Mutex::new(Instant::now()));
        let tasks = vec![
            tokio::spawn(metrics_task(metrics_interval, events.clone())),
            tokio::spawn(idle_task(idle_timeout, Arc::clone(&last_input), events)),
        ];
        log::debug!(
            "Timers started (metrics every {:?}, idle after {:?})",
            metrics_interval,
            idle_timeout
        );
        Self { last_input, tasks }
    }

    /// Record user input, restarting the idle countdown.
    pub fn touch(&self) {
        *self.last_input.lock() = Instant::now();
    }

    pub fn stop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        log::debug!("Timers stopped");
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sample(sys: &mut System) -> MetricsSample {
    sys.refresh_cpu_all();
    sys.refresh_memory();
    let total = sys.total_memory();
    let memory_percent = if total == 0 {
        0.0
    } else {
        (sys.used_memory() as f64 / total as f64 * 100.0) as f32
    };
    MetricsSample {
        cpu_percent: sys.global_cpu_usage(),
        memory_percent,
    }
}

async fn metrics_task(interval: Duration, events: UnboundedSender<TimerEvent>) {
    let mut sys = System::new_with_specifics(
        RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything()),
    );
    // First CPU poll is always 0%; prime it before the first tick.
    sys.refresh_cpu_all();

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if events.send(TimerEvent::MetricsRefresh(sample(&mut sys))).is_err() {
            break;
        }
    }
}

async fn idle_task(
    timeout: Duration,
    last_input: Arc<Mutex<Instant>>,
    events: UnboundedSender<TimerEvent>,
) {
    // Input instant the last IdleHide was sent for
    let mut fired_for: Option<Instant> = None;

    loop {
        let last = *last_input.lock();
        let deadline = last + timeout;

        if Instant::now() < deadline {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            continue;
        }

        if fired_for != Some(last) {
            if events.send(TimerEvent::IdleHide).is_err() {
                break;
            }
            fired_for = Some(last);
        }
        tokio::time::sleep(timeout.min(Duration::from_secs(1))).await;
    }
}
