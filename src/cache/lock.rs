use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Lock a cache mutex, taking over the state if another thread panicked with it held.
pub(crate) fn lock_or_recover<'a, T>(
    lock: &'a Mutex<T>,
    target: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!(
            op,
            target_module = target,
            result = "poisoned_recovered",
            "Recovered from poisoned cache lock"
        );
        poisoned.into_inner()
    })
}
