//! Ephemeral notifications
//!
//! Fire-and-forget toasts with independent expiry. Expiry is two-phase:
//! once its duration elapses a toast turns `Leaving`, and it is only
//! removed when the renderer reports that its exit transition finished.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(self) -> char {
        match self {
            Severity::Success => '✓',
            Severity::Error => '✕',
            Severity::Warning => '!',
            Severity::Info => 'i',
        }
    }
}

/// Identifier of a queued toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

/// Visual phase of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Leaving { since: Instant },
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
    pub duration: Duration,
    pub phase: Phase,
}

impl Toast {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.duration
    }

    pub fn is_leaving(&self) -> bool {
        matches!(self.phase, Phase::Leaving { .. })
    }
}

/// Default durations and exit-transition length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimings {
    pub default: Duration,
    pub error: Duration,
    pub exit: Duration,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            default: Duration::from_millis(3000),
            error: Duration::from_millis(5000),
            exit: Duration::from_millis(250),
        }
    }
}

/// Queue of active toasts, oldest first
#[derive(Debug)]
pub struct NotificationQueue {
    toasts: VecDeque<Toast>,
    next_id: u64,
    timings: ToastTimings,
}

impl NotificationQueue {
    pub fn new(timings: ToastTimings) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 0,
            timings,
        }
    }

    pub fn timings(&self) -> ToastTimings {
        self.timings
    }

    /// Duration used when `show` gets none
    pub fn default_duration(&self, severity: Severity) -> Duration {
        match severity {
            Severity::Error => self.timings.error,
            _ => self.timings.default,
        }
    }

    /// Queue a toast starting now
    pub fn show(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Option<Duration>,
    ) -> ToastId {
        self.show_at(message, severity, duration, Instant::now())
    }

    /// Queue a toast that was shown at `now`
    pub fn show_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Option<Duration>,
        now: Instant,
    ) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;

        let message = message.into();
        let duration = duration.unwrap_or_else(|| self.default_duration(severity));
        debug!("Toast {:?} ({:?}): {}", id, severity, message);

        self.toasts.push_back(Toast {
            id,
            message,
            severity,
            shown_at: now,
            duration,
            phase: Phase::Visible,
        });
        id
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.show(message, Severity::Error, None)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> ToastId {
        self.show(message, Severity::Warning, None)
    }

    pub fn info(&mut self, message: impl Into<String>) -> ToastId {
        self.show(message, Severity::Info, None)
    }

    /// Move every expired toast into the leaving phase
    ///
    /// Returns the number of toasts that started leaving.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut started = 0;
        for toast in &mut self.toasts {
            if toast.phase == Phase::Visible && now >= toast.expires_at() {
                toast.phase = Phase::Leaving { since: now };
                started += 1;
            }
        }
        started
    }

    /// Leaving toasts whose exit transition has fully played at `now`
    pub fn exit_settled(&self, now: Instant) -> Vec<ToastId> {
        self.toasts
            .iter()
            .filter_map(|toast| match toast.phase {
                Phase::Leaving { since } if now.duration_since(since) >= self.timings.exit => {
                    Some(toast.id)
                }
                _ => None,
            })
            .collect()
    }

    /// Remove a toast whose exit transition completed
    ///
    /// Visible toasts are never removed here.
    pub fn finish_exit(&mut self, id: ToastId) -> bool {
        let Some(index) = self.toasts.iter().position(|t| t.id == id) else {
            return false;
        };
        if !self.toasts[index].is_leaving() {
            return false;
        }
        self.toasts.remove(index);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Drop every pending toast
    pub fn dispose(&mut self) {
        self.toasts.clear();
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(ToastTimings::default())
    }
}
