//! Deduplicated engine warnings.
//!
//! Box definitions are derived again for every element instance on every
//! page, so one unsupported value in a shared style would otherwise be
//! reported thousands of times per report. Warnings are keyed by component
//! and message and reach [`log::warn!`] only the first time they occur in a
//! report run.

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static REPORTED: LazyLock<Mutex<HashSet<(String, String)>>> = LazyLock::new(Mutex::default);

fn reported() -> MutexGuard<'static, HashSet<(String, String)>> {
    REPORTED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Log `message` for `component` at warn level unless this run already did.
///
/// ```ignore
/// warn_once("style", "percentage values are not supported for padding-top, using 0");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if reported().insert((component.to_owned(), message.to_owned())) {
        log::warn!("[{component}] {message}");
    }
}

/// Distinct warnings logged in the current run.
#[must_use]
pub fn reported_count() -> usize {
    reported().len()
}

/// Start a new report run: every warning is logged again once.
pub fn clear_warnings() {
    reported().clear();
}
