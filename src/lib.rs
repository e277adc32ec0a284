//! Bind one configuration struct to command-line flags and environment
//! variables.
//!
//! Describe which fields come from where, once, and let simpleconf do the
//! parsing:
//!
//! ```no_run
//! struct Settings {
//!     host: String,
//!     port: i64,
//!     api_token: String,
//! }
//!
//! simpleconf::record!(Settings {
//!     host => { flag: "host", env: "HOST", usage: "address to bind" },
//!     port => { flag: "port", env: "PORT", usage: "port to listen on" },
//!     api_token => { env: "API_TOKEN" },
//! });
//!
//! let mut settings = Settings {
//!     host: "localhost".into(),
//!     port: 8080,
//!     api_token: String::new(),
//! };
//! simpleconf::Parser::new(&mut settings)
//!     .set_env_prefix("MYAPP")
//!     .parse()?;
//! # Ok::<(), simpleconf::Error>(())
//! ```
//!
//! That call accepts `--host` and `--port` on the command line, then reads
//! `MYAPP_HOST`, `MYAPP_PORT` and `MYAPP_API_TOKEN` from the environment.
//! Whatever the struct held beforehand is the default.
//!
//! # Two pieces
//!
//! - [`EnvSet`] is a flag-set style registry for environment variables:
//!   register fields by name, optionally set a prefix, parse, then ask which
//!   variables were set. It knows nothing about structs and is usable on its
//!   own.
//! - [`Parser`] walks a [`Record`] and feeds each field to clap (for flags)
//!   and to an [`EnvSet`] (for variables).
//!
//! # Precedence
//!
//! ```text
//! Field value before parsing     the default
//!        ↑ overridden by
//! Command-line flag              --port 9000
//!        ↑ overridden by
//! Environment variable           MYAPP_PORT=9001
//! ```
//!
//! Flags are parsed first and variables second, both writing into the same
//! field, so a set variable beats a flag. An **empty** variable counts as
//! unset: it cannot be used to clear a default.
//!
//! # Field kinds
//!
//! Only `String` and `i64` fields can be bound. Integers accept an optional
//! sign and the `0x`, `0o`/`0` and `0b` base prefixes, on the command line
//! and in the environment alike. Binding any other type is a compile error.
//!
//! # Names
//!
//! Variable names and prefixes must match [`IDENTIFIER_PATTERN`]
//! (`^[a-zA-Z_][a-zA-Z0-9_]*$`). A prefix is joined with `_`: prefix `APP`
//! and name `PORT` read `APP_PORT`.
//!
//! # Error handling
//!
//! Every [`EnvSet`] carries an [`ErrorHandling`] policy that applies to all
//! of its fallible operations: return the error, print it and exit with
//! status 2, or panic. [`Parser`] returns errors by default; flag errors are
//! clap's own [`clap::Error`], wrapped in [`Error::Flag`] unchanged.
//!
//! # Ambient set
//!
//! The [`ambient`] module offers a process-wide [`EnvSet`] with free
//! functions, for `main`-level code. Libraries should create their own sets.

pub mod ambient;
pub mod error;

mod env;
mod parser;
mod record;
mod source;
mod value;

#[cfg(test)]
mod fixtures;

pub use env::{Env, EnvEntry, EnvSet, ErrorHandling, IDENTIFIER_PATTERN, Usage};
pub use error::{EnvError, Error, ValueError};
pub use parser::Parser;
pub use record::{Field, Record};
pub use source::{EnvSource, StdEnv};
pub use value::{Kind, Value, parse_int64};
