use thiserror::Error;

use crate::env::IDENTIFIER_PATTERN;

/// Failure to convert a raw string into a bound value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid integer syntax: {0:?}")]
    Syntax(String),

    #[error("integer out of range: {0:?}")]
    Range(String),
}

/// Errors raised by an [`EnvSet`](crate::EnvSet).
///
/// Every variant is routed through the set's
/// [`ErrorHandling`](crate::ErrorHandling) policy before it reaches the caller.
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum EnvError {
    #[error("{what} {name:?} does not match {}", IDENTIFIER_PATTERN)]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(simpleconf::invalid_name),
            help("use letters, digits and underscores, not starting with a digit")
        )
    )]
    InvalidName { what: &'static str, name: String },

    #[error("{set}: variable redefined: {name}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(simpleconf::duplicate_name)))]
    DuplicateName { set: String, name: String },

    #[error("variable not defined: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(simpleconf::not_found)))]
    NotFound(String),

    #[error("failed to parse environment variable {name}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(simpleconf::parse)))]
    Parse { name: String, source: ValueError },
}

/// Errors returned by [`Parser`](crate::Parser).
///
/// Flag errors come straight from clap, so `err.exit()` and `err.kind()`
/// behave exactly as they do for a hand-written clap command.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Flag(#[from] clap::Error),

    #[error(transparent)]
    Env(#[from] EnvError),
}
