//! Per-tab bounded output buffer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

pub type LineId = u64;

static NEXT_LINE_ID: AtomicU64 = AtomicU64::new(1);

/// Severity / category tag of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Success,
    Error,
    Warning,
    Info,
    System,
    Debug,
}

impl LineKind {
    pub fn label(self) -> &'static str {
        match self {
            LineKind::Success => "ok",
            LineKind::Error => "error",
            LineKind::Warning => "warn",
            LineKind::Info => "info",
            LineKind::System => "system",
            LineKind::Debug => "debug",
        }
    }
}

/// One immutable line of tab output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLine {
    id: LineId,
    kind: LineKind,
    text: String,
    timestamp: DateTime<Utc>,
}

impl OutputLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            id: NEXT_LINE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(LineKind::Warning, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LineKind::Info, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(LineKind::System, text)
    }

    pub fn debug(text: impl Into<String>) -> Self {
        Self::new(LineKind::Debug, text)
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Ring buffer of output lines; the oldest line is evicted once full.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    lines: VecDeque<OutputLine>,
    max_lines: usize,
}

impl OutputBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines.min(1024)),
            max_lines,
        }
    }

    /// Append a line, returning how many old lines were evicted.
    pub fn push(&mut self, line: OutputLine) -> usize {
        if self.max_lines == 0 {
            return 1;
        }
        self.lines.push_back(line);
        self.trim()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
        self.trim();
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.back()
    }

    fn trim(&mut self) -> usize {
        let excess = self.lines.len().saturating_sub(self.max_lines);
        self.lines.drain(..excess);
        excess
    }
}
