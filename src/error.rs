//! Error and outcome types shared across the session core.
//!
//! Rejected user actions are values, not errors: they come back inside
//! [`ActionOutcome::Rejected`] and never unwind. Real failures from
//! collaborators (command processor, platform services, persistence) use
//! the `thiserror` enums below.

use crate::split::{Orientation, SplitId};
use crate::tab::TabId;
use std::path::PathBuf;
use thiserror::Error;

/// Result of a state-machine operation that the user may be refused.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ActionOutcome<T = ()> {
    Applied(T),
    Rejected(RejectReason),
}

impl<T> ActionOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            ActionOutcome::Applied(value) => Some(value),
            ActionOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            ActionOutcome::Applied(_) => None,
            ActionOutcome::Rejected(reason) => Some(reason),
        }
    }
}

/// Why a user action was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("tab {0} is pinned")]
    PinnedTab(TabId),
    #[error("tab {0} is the last remaining tab")]
    LastTab(TabId),
    #[error("tab {0} does not exist")]
    UnknownTab(TabId),
    #[error(transparent)]
    Split(#[from] SplitError),
}

/// Split layout failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("cannot create {orientation:?} split: limit of {limit} splits reached")]
    CapacityExceeded {
        orientation: Orientation,
        limit: usize,
    },
    #[error("split {0} does not exist")]
    UnknownSplit(SplitId),
    #[error("a split needs at least one tab")]
    NoSeedTabs,
}

/// A broken structural invariant. Seeing one of these is a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("tab {0} appears in more than one split")]
    DuplicateTab(TabId),
    #[error("open tab {0} is not in any split")]
    MissingTab(TabId),
    #[error("split references closed tab {0}")]
    StrayTab(TabId),
    #[error("tabs exist but none is active")]
    NoActiveTab,
    #[error("active tab {0} is not open")]
    ActiveTabMissing(TabId),
    #[error("split {0} is empty")]
    EmptySplit(SplitId),
}

/// Failure reported by a command processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("command not found: {0}")]
    CommandNotFound(String),
    #[error("{0}")]
    Failed(String),
}

/// Failure of a platform service (clipboard, fullscreen, file access).
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("fullscreen unavailable: {0}")]
    Fullscreen(String),
    #[error("cannot list {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure loading or saving history and telemetry records.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("unsupported record file version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
