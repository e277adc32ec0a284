//! Where environment values come from.
//!
//! [`EnvSet::parse`](crate::EnvSet::parse) reads the process environment;
//! [`EnvSet::parse_from`](crate::EnvSet::parse_from) accepts any
//! [`EnvSource`], so tests can feed synthetic variables instead of mutating
//! the real environment.

use std::collections::{BTreeMap, HashMap};

/// A read-only view of environment variables.
pub trait EnvSource {
    /// Value of `name`, or `None` if it is not defined.
    fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment.
///
/// Variables whose value is not valid Unicode are treated as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: std::hash::BuildHasher> EnvSource for HashMap<String, String, S> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

impl EnvSource for [(&str, &str)] {
    fn get(&self, name: &str) -> Option<String> {
        self.iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_owned())
    }
}

impl<const N: usize> EnvSource for [(&str, &str); N] {
    fn get(&self, name: &str) -> Option<String> {
        EnvSource::get(self.as_slice(), name)
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}
