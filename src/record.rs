//! Configuration records: structs whose fields can be bound to flags and
//! environment variables.
//!
//! A record lists its bindable fields through [`Record::fields`]. Each
//! [`Field`] carries the metadata (flag name, environment name, usage text)
//! and a mutable borrow of the field itself. Fields that are not listed, or
//! listed without a flag or environment name, are never touched.
//!
//! The [`record!`](crate::record!) macro writes the impl from a compact table:
//!
//! ```
//! struct Settings {
//!     host: String,
//!     port: i64,
//!     build_id: String,
//! }
//!
//! simpleconf::record!(Settings {
//!     host => { flag: "host", env: "HOST", usage: "address to bind" },
//!     port => { flag: "port", env: "PORT", usage: "port to listen on" },
//! });
//! ```

use crate::value::Value;

/// A struct that can be bound by a [`Parser`](crate::Parser).
///
/// Flag names must be unique within a record and must not be `help`;
/// the parser panics otherwise. Environment names must be unique too, but a
/// clash there is an ordinary [`EnvError`](crate::EnvError).
pub trait Record {
    /// Bindable fields, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Name used for the flag command and the environment set.
    ///
    /// Defaults to the type's own name, without module path or generics.
    fn record_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Metadata and storage for one record field.
#[derive(Debug)]
pub struct Field<'a> {
    pub(crate) flag: Option<&'static str>,
    pub(crate) env: Option<&'static str>,
    pub(crate) usage: &'static str,
    pub(crate) value: Value<'a>,
}

impl<'a> Field<'a> {
    /// Start describing a field. Only `&mut String` and `&mut i64` convert
    /// into a [`Value`], so unsupported field types fail to compile here.
    pub fn new(value: impl Into<Value<'a>>) -> Self {
        Self {
            flag: None,
            env: None,
            usage: "",
            value: value.into(),
        }
    }

    /// Bind the field to `--{name}`. An empty name means no flag.
    pub fn flag(mut self, name: &'static str) -> Self {
        self.flag = Some(name).filter(|n| !n.is_empty());
        self
    }

    /// Bind the field to the environment variable `name`. An empty name
    /// means no variable.
    pub fn env(mut self, name: &'static str) -> Self {
        self.env = Some(name).filter(|n| !n.is_empty());
        self
    }

    pub fn usage(mut self, text: &'static str) -> Self {
        self.usage = text;
        self
    }

    pub fn flag_name(&self) -> Option<&'static str> {
        self.flag
    }

    pub fn env_name(&self) -> Option<&'static str> {
        self.env
    }

    pub fn usage_text(&self) -> &'static str {
        self.usage
    }

    pub fn value(&self) -> &Value<'a> {
        &self.value
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Implement [`Record`] for a struct from a per-field metadata table.
///
/// Each entry names a field and any of `flag`, `env` and `usage`. Fields
/// left out of the table stay inert.
#[macro_export]
macro_rules! record {
    ($ty:ty { $( $field:ident => { $( $key:ident : $val:expr ),* $(,)? } ),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $( $crate::Field::new(&mut self.$field) $( .$key($val) )* ),*
                ]
            }
        }
    };
}
