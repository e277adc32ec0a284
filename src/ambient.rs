//! Process-wide default [`EnvSet`] for top-level convenience.
//!
//! The ambient set is named after the running program and exits the process
//! on error. It exists for `main`-style code that wants one global registry;
//! library code should build its own [`EnvSet`] and pass it around.
//!
//! Registered cells must live for the rest of the program, hence the
//! `&'static mut` parameters (a `static`, or a leaked `Box`).

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use crate::env::{EnvSet, ErrorHandling};
use crate::error::EnvError;

static ENVIRONMENT: LazyLock<Mutex<EnvSet<'static>>> = LazyLock::new(|| {
    let name = std::env::args().next().unwrap_or_default();
    Mutex::new(EnvSet::new(name, ErrorHandling::ExitOnError))
});

/// Lock the ambient set for direct use.
///
/// A panic under [`ErrorHandling::PanicOnError`] poisons the lock; the set
/// itself is still consistent, so poisoning is ignored.
pub fn environment() -> MutexGuard<'static, EnvSet<'static>> {
    ENVIRONMENT.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn init(name: &str, error_handling: ErrorHandling) {
    environment().init(name, error_handling);
}

pub fn set_prefix(prefix: &str) -> Result<(), EnvError> {
    environment().set_prefix(prefix)
}

pub fn int64_var(cell: &'static mut i64, name: &str) -> Result<(), EnvError> {
    environment().int64_var(cell, name)
}

pub fn string_var(cell: &'static mut String, name: &str) -> Result<(), EnvError> {
    environment().string_var(cell, name)
}

pub fn parse() -> Result<(), EnvError> {
    environment().parse()
}

pub fn parsed() -> bool {
    environment().parsed()
}

pub fn is_set(name: &str) -> Result<bool, EnvError> {
    environment().is_set(name)
}
