//! User-facing notifications emitted by the selection store.
//!
//! The store fires one notification per transition outcome. Delivery is
//! fire-and-forget: a sink that fails is logged and ignored, the store's state has
//! already been committed by the time a sink runs.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};

use crate::error::NotifyError;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Outcome of a selection-store operation, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Added { name: String },
    AlreadyPresent { name: String },
    LimitReached { max: usize },
    Removed { name: String },
    Cleared,
}

impl Notification {
    pub fn severity(&self) -> Severity {
        match self {
            Notification::Added { .. } => Severity::Success,
            Notification::LimitReached { .. } => Severity::Error,
            Notification::AlreadyPresent { .. }
            | Notification::Removed { .. }
            | Notification::Cleared => Severity::Info,
        }
    }

    /// Stable name for logs and machine consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Added { .. } => "added",
            Notification::AlreadyPresent { .. } => "already_present",
            Notification::LimitReached { .. } => "limit_reached",
            Notification::Removed { .. } => "removed",
            Notification::Cleared => "cleared",
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::Added { name } => write!(f, "{name} added to comparison"),
            Notification::AlreadyPresent { name } => {
                write!(f, "{name} is already in comparison")
            }
            Notification::LimitReached { max } => {
                write!(f, "You can compare up to {max} vehicles only")
            }
            Notification::Removed { name } => write!(f, "{name} removed from comparison"),
            Notification::Cleared => write!(f, "Comparison cleared"),
        }
    }
}

/// A surface that presents notifications (toast host, console, log).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl NotificationSink for NoOpSink {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Writes notifications to the `tracing` pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification.severity() {
            Severity::Error => error!(kind = notification.kind(), "{notification}"),
            Severity::Success | Severity::Info => {
                info!(kind = notification.kind(), "{notification}")
            }
        }
        Ok(())
    }
}

/// Records every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}
