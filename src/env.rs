//! Environment variable registry and parser.
//!
//! An [`EnvSet`] works like a flag set for environment variables: fields are
//! registered under a name, [`parse`](EnvSet::parse) looks each name up
//! (optionally as `PREFIX_NAME`) and converts the value into the bound field.
//!
//! ```
//! use simpleconf::{EnvSet, ErrorHandling};
//!
//! let mut port = 80i64;
//! let mut envs = EnvSet::new("server", ErrorHandling::ContinueOnError);
//! envs.set_prefix("APP")?;
//! envs.int64_var(&mut port, "PORT")?;
//! envs.parse_from(&[("APP_PORT", "0x1F90")])?;
//! assert!(envs.is_set("PORT")?);
//! drop(envs);
//! assert_eq!(port, 8080);
//! # Ok::<(), simpleconf::EnvError>(())
//! ```
//!
//! Known limitation: an empty value is indistinguishable from an undefined
//! variable. Both leave the field untouched.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{EnvError, ValueError};
use crate::source::{EnvSource, StdEnv};
use crate::value::{Kind, Value};

/// Pattern every variable name and prefix must match.
pub const IDENTIFIER_PATTERN: &str = "^[a-zA-Z_][a-zA-Z0-9_]*$";

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// What an [`EnvSet`] does when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Print the error to stderr and exit with status 2.
    ExitOnError,
    /// Panic with the error message.
    PanicOnError,
}

/// One registered variable.
#[derive(Debug)]
pub struct Env<'a> {
    name: String,
    value: Value<'a>,
    is_set: bool,
}

impl<'a> Env<'a> {
    /// Unprefixed name the variable was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound field.
    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    /// The bound field, for writing outside a parse pass.
    pub fn value_mut(&mut self) -> &mut Value<'a> {
        &mut self.value
    }

    /// Whether the last parse found a non-empty value and stored it.
    pub fn is_set(&self) -> bool {
        self.is_set
    }
}

/// Serializable snapshot of one registration, as returned by
/// [`EnvSet::entries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvEntry {
    pub name: String,
    pub variable: String,
    pub kind: &'static str,
    pub value: String,
    pub is_set: bool,
}

/// A named set of environment variable registrations.
///
/// Registrations borrow their fields for `'a`; the fields become readable
/// again once the set is dropped.
#[derive(Debug)]
pub struct EnvSet<'a> {
    name: String,
    prefix: String,
    error_handling: ErrorHandling,
    envs: Vec<Env<'a>>,
    index: HashMap<String, usize>,
    parsed: bool,
}

impl<'a> EnvSet<'a> {
    pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> Self {
        Self {
            name: name.into(),
            prefix: String::new(),
            error_handling,
            envs: Vec::new(),
            index: HashMap::new(),
            parsed: false,
        }
    }

    /// Reset the set's name and error policy.
    ///
    /// Registrations, the prefix and the parsed flag are kept, so parsing
    /// again re-reads the same variables.
    pub fn init(&mut self, name: impl Into<String>, error_handling: ErrorHandling) {
        self.name = name.into();
        self.error_handling = error_handling;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// The current prefix, empty if none was set.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Look variables up as `{prefix}_{name}` from now on.
    ///
    /// May be called before or after registering variables; the prefix is
    /// applied only when parsing.
    pub fn set_prefix(&mut self, prefix: &str) -> Result<(), EnvError> {
        if !is_identifier(prefix) {
            return self.fail(EnvError::InvalidName {
                what: "prefix",
                name: prefix.to_owned(),
            });
        }
        tracing::debug!(set = %self.name, prefix, "environment prefix set");
        self.prefix = prefix.to_owned();
        Ok(())
    }

    /// Register `value` under `name`.
    pub fn var(&mut self, value: impl Into<Value<'a>>, name: &str) -> Result<(), EnvError> {
        if !is_identifier(name) {
            return self.fail(EnvError::InvalidName {
                what: "variable name",
                name: name.to_owned(),
            });
        }
        if self.index.contains_key(name) {
            return self.fail(EnvError::DuplicateName {
                set: self.name.clone(),
                name: name.to_owned(),
            });
        }

        let value = value.into();
        tracing::debug!(set = %self.name, name, kind = %value.kind(), "environment variable registered");
        self.index.insert(name.to_owned(), self.envs.len());
        self.envs.push(Env {
            name: name.to_owned(),
            value,
            is_set: false,
        });
        Ok(())
    }

    pub fn int64_var(&mut self, cell: &'a mut i64, name: &str) -> Result<(), EnvError> {
        self.var(cell, name)
    }

    pub fn string_var(&mut self, cell: &'a mut String, name: &str) -> Result<(), EnvError> {
        self.var(cell, name)
    }

    /// Name looked up for the variable registered as `name`.
    pub fn qualified_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{}_{name}", self.prefix)
        }
    }

    /// Parse all registered variables from the process environment.
    pub fn parse(&mut self) -> Result<(), EnvError> {
        self.parse_from(&StdEnv)
    }

    /// Parse all registered variables from `source`, in registration order.
    ///
    /// Undefined and empty variables leave their field alone. The first value
    /// that fails to convert is routed through the error policy; under
    /// [`ErrorHandling::ContinueOnError`] the pass stops there, so variables
    /// registered after it are not read and those before it stay applied.
    pub fn parse_from<S: EnvSource + ?Sized>(&mut self, source: &S) -> Result<(), EnvError> {
        let mut failure = None;
        for i in 0..self.envs.len() {
            let variable = self.qualified_name(&self.envs[i].name);
            let env = &mut self.envs[i];
            let raw = match source.get(&variable) {
                Some(raw) if !raw.is_empty() => raw,
                _ => {
                    tracing::trace!(variable = %variable, "environment variable not set");
                    continue;
                }
            };
            match env.value.set(&raw) {
                Ok(()) => {
                    tracing::debug!(variable = %variable, value = %env.value, "environment variable applied");
                    env.is_set = true;
                }
                Err(err) => {
                    failure = Some(parse_error(variable, err));
                    break;
                }
            }
        }

        self.parsed = true;
        match failure {
            Some(err) => self.fail(err),
            None => Ok(()),
        }
    }

    /// Whether a parse pass has been attempted. It may have failed.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Whether the variable registered as `name` was found by the last parse.
    pub fn is_set(&self, name: &str) -> Result<bool, EnvError> {
        match self.lookup(name) {
            Some(env) => Ok(env.is_set),
            None => self.fail(EnvError::NotFound(name.to_owned())),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Env<'a>> {
        self.index.get(name).map(|&i| &self.envs[i])
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Env<'a>> {
        self.index.get(name).map(|&i| &mut self.envs[i])
    }

    /// Registrations in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = &Env<'a>> {
        self.envs.iter()
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    /// Snapshot of every registration with its current value.
    pub fn entries(&self) -> Vec<EnvEntry> {
        self.envs
            .iter()
            .map(|env| EnvEntry {
                name: env.name.clone(),
                variable: self.qualified_name(&env.name),
                kind: match env.value.kind() {
                    Kind::Text => "string",
                    Kind::Int64 => "int64",
                },
                value: env.value.to_string(),
                is_set: env.is_set,
            })
            .collect()
    }

    /// Human-readable listing of the registered variables.
    pub fn usage(&self) -> Usage<'_, 'a> {
        Usage(self)
    }

    fn fail<T>(&self, err: EnvError) -> Result<T, EnvError> {
        tracing::warn!(set = %self.name, policy = ?self.error_handling, error = %err, "environment error");
        match self.error_handling {
            ErrorHandling::ContinueOnError => Err(err),
            ErrorHandling::ExitOnError => {
                eprintln!("{err}");
                std::process::exit(2);
            }
            ErrorHandling::PanicOnError => panic!("{err}"),
        }
    }
}

fn parse_error(name: String, source: ValueError) -> EnvError {
    EnvError::Parse { name, source }
}

/// Display adapter returned by [`EnvSet::usage`].
pub struct Usage<'s, 'a>(&'s EnvSet<'a>);

impl fmt::Display for Usage<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = self.0;
        let width = set
            .envs
            .iter()
            .map(|env| set.qualified_name(&env.name).len())
            .max()
            .unwrap_or(0);
        for (i, env) in set.envs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let variable = set.qualified_name(&env.name);
            write!(f, "  {variable:width$}  {}", env.value.kind())?;
            if !env.value.to_string().is_empty() {
                write!(f, " (default {:?})", env.value.to_string())?;
            }
        }
        Ok(())
    }
}
