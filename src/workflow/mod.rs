pub mod debounce;
pub mod form;
pub mod freshness;
pub mod list;
pub mod refresh;
pub mod stats;

pub use form::{FormController, FormView};
pub use list::{ListController, ListView};
pub use refresh::RefreshBus;
pub use stats::{StatsController, StatsView};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Controller state is only ever touched between awaits, so a poisoned lock
/// still holds consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
