//! Transient status notifications: an in-progress toast that later turns into
//! a success or failure.

use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastStyle {
    Animated,
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub style: ToastStyle,
    pub title: String,
    pub message: Option<String>,
}

impl Toast {
    pub fn animated(title: impl Into<String>) -> Self {
        Self::new(ToastStyle::Animated, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastStyle::Success, title)
    }

    pub fn failure(title: impl Into<String>) -> Self {
        Self::new(ToastStyle::Failure, title)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn new(style: ToastStyle, title: impl Into<String>) -> Self {
        Self {
            style,
            title: title.into(),
            message: None,
        }
    }
}

pub trait Notifier {
    fn show(&mut self, toast: Toast);
}

/// Failure title for an error: its message chain, or `fallback` when blank.
pub fn failure_title(err: &anyhow::Error, fallback: &str) -> String {
    let msg = format!("{:#}", err);
    if msg.trim().is_empty() {
        fallback.to_string()
    } else {
        msg
    }
}

/// CLI notifier: one line per toast on stderr.
#[derive(Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn show(&mut self, toast: Toast) {
        let marker = match toast.style {
            ToastStyle::Animated => "...",
            ToastStyle::Success => "ok:",
            ToastStyle::Failure => "error:",
        };
        let mut err = std::io::stderr().lock();
        let _ = match &toast.message {
            Some(m) => writeln!(err, "{} {} ({})", marker, toast.title, m),
            None => writeln!(err, "{} {}", marker, toast.title),
        };
    }
}

/// Toasts kept by a [`ToastLog`]; older ones are dropped.
pub const TOAST_HISTORY: usize = 100;

/// Recent toasts, oldest first; the last one is the current status.
#[derive(Debug, Default)]
pub struct ToastLog {
    pub toasts: Vec<Toast>,
}

impl ToastLog {
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.toasts.iter().map(|t| t.title.as_str()).collect()
    }
}

impl Notifier for ToastLog {
    fn show(&mut self, toast: Toast) {
        tracing::debug!(style = ?toast.style, title = %toast.title, "toast");
        self.toasts.push(toast);
        if self.toasts.len() > TOAST_HISTORY {
            let excess = self.toasts.len() - TOAST_HISTORY;
            self.toasts.drain(..excess);
        }
    }
}

/// Error for a failure that was already shown as a toast.
///
/// The CLI exits non-zero on it without printing again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("action failed")
    }
}

impl std::error::Error for Reported {}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;
