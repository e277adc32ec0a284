//! Bind a [`Record`] to command-line flags and environment variables.
//!
//! [`Parser`] walks the record's fields once, registering a clap long flag
//! for every field with a flag name and an [`EnvSet`] variable for every
//! field with an environment name. Parsing then runs in two passes over the
//! same fields:
//!
//! 1. flags, through clap;
//! 2. environment variables, through the [`EnvSet`].
//!
//! Both passes write into the record's own fields, so the later pass wins:
//! **an environment variable that is set overrides a flag given on the
//! command line.** Fields mentioned by neither source keep the value they had
//! before parsing, which doubles as the flag's displayed default.
//!
//! Flag parsing stops at the first operand (or after `--`); that operand and
//! everything following it are returned untouched by the parse call.

use std::collections::HashSet;
use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::env::{EnvSet, ErrorHandling};
use crate::error::{EnvError, Error};
use crate::record::{Field, Record};
use crate::source::{EnvSource, StdEnv};
use crate::value::{Kind, Value, parse_int64};

/// Flag and environment binder for one record.
///
/// ```
/// #[derive(Default)]
/// struct Settings {
///     port: i64,
/// }
///
/// simpleconf::record!(Settings {
///     port => { flag: "port", env: "PORT", usage: "port to listen on" },
/// });
///
/// let mut settings = Settings { port: 80 };
/// let operands = simpleconf::Parser::new(&mut settings)
///     .set_env_prefix("APP")
///     .parse_from(["app", "--port", "8080", "input.txt"], &[("APP_PORT", "")])?;
/// assert_eq!(settings.port, 8080);
/// assert_eq!(operands, ["input.txt"]);
/// # Ok::<(), simpleconf::Error>(())
/// ```
pub struct Parser<'a, R: Record> {
    record: &'a mut R,
    envs: EnvSet<'a>,
    error_handling: ErrorHandling,
    pending: Option<EnvError>,
}

impl<'a, R: Record> Parser<'a, R> {
    /// Create a binder named after the record's type. Errors are returned to
    /// the caller until [`error_handling`](Self::error_handling) says
    /// otherwise.
    pub fn new(record: &'a mut R) -> Self {
        let name = record.record_name();
        Self {
            record,
            envs: EnvSet::new(name, ErrorHandling::ContinueOnError),
            error_handling: ErrorHandling::ContinueOnError,
            pending: None,
        }
    }

    /// Use one policy for both flag and environment errors.
    ///
    /// With [`ErrorHandling::ExitOnError`], flag errors go through
    /// [`clap::Error::exit`]: help requests exit with status 0, usage errors
    /// with status 2.
    pub fn error_handling(mut self, error_handling: ErrorHandling) -> Self {
        let name = self.envs.name().to_owned();
        self.envs.init(name, error_handling);
        self.error_handling = error_handling;
        self
    }

    /// Look environment variables up as `{prefix}_{name}`.
    ///
    /// An invalid prefix is reported by the next parse, before anything is
    /// read.
    pub fn set_env_prefix(mut self, prefix: &str) -> Self {
        if let Err(err) = self.envs.set_prefix(prefix) {
            self.pending = Some(err);
        }
        self
    }

    /// Parse the process arguments, then the process environment.
    ///
    /// Returns the operands left after the flags.
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Parser::parse_from`].
    pub fn parse(self) -> Result<Vec<String>, Error> {
        self.parse_from(std::env::args_os(), &StdEnv)
    }

    /// Parse `args`, then `source`.
    ///
    /// As with clap, the first item of `args` is the program name. Returns
    /// the operands left after the flags.
    ///
    /// # Panics
    ///
    /// If two fields share a flag name, or a field uses the reserved flag
    /// `help`.
    pub fn parse_from<I, T, S>(self, args: I, source: &S) -> Result<Vec<String>, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        S: EnvSource + ?Sized,
    {
        let Parser {
            record,
            mut envs,
            error_handling,
            pending,
        } = self;

        if let Some(err) = pending {
            return Err(settle(error_handling, err.into()));
        }

        let mut command = Command::new(envs.name().to_owned());
        let mut direct: Vec<(&'static str, Value<'a>)> = Vec::new();
        let mut shared: Vec<(&'static str, &'static str)> = Vec::new();
        let mut seen = HashSet::new();

        for field in record.fields() {
            let Field {
                flag,
                env,
                usage,
                value,
            } = field;

            if let Some(flag) = flag {
                if flag == "help" || flag == OPERANDS || !seen.insert(flag) {
                    panic!("{}: flag redefined: {flag}", envs.name());
                }
                command = command.arg(flag_arg(flag, usage, &value));
            }
            match (flag, env) {
                (flag, Some(env)) => {
                    envs.var(value, env)?;
                    if let Some(flag) = flag {
                        shared.push((flag, env));
                    }
                }
                (Some(flag), None) => direct.push((flag, value)),
                (None, None) => {}
            }
        }

        command = command.arg(
            Arg::new(OPERANDS)
                .num_args(0..)
                .action(ArgAction::Append)
                .trailing_var_arg(true)
                .hide(true),
        );
        if !envs.is_empty() {
            command = command.after_help(format!("Environment variables:\n{}", envs.usage()));
        }

        tracing::debug!(
            record = envs.name(),
            flags = direct.len() + shared.len(),
            variables = envs.len(),
            "parsing flags"
        );
        let matches = command
            .try_get_matches_from(args)
            .map_err(|err| settle(error_handling, err.into()))?;

        for (flag, value) in direct.iter_mut() {
            apply_flag(&matches, flag, value);
        }
        for (flag, env) in shared {
            if let Some(entry) = envs.lookup_mut(env) {
                apply_flag(&matches, flag, entry.value_mut());
            }
        }

        let operands = matches
            .get_many::<String>(OPERANDS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        envs.parse_from(source)?;
        Ok(operands)
    }
}

/// Id of the hidden positional that collects operands.
const OPERANDS: &str = "__operands";

fn flag_arg(flag: &'static str, usage: &'static str, value: &Value<'_>) -> Arg {
    let mut arg = Arg::new(flag)
        .long(flag)
        .help(usage)
        .action(ArgAction::Set);

    let default = value.to_string();
    if !default.is_empty() {
        arg = arg.default_value(default);
    }

    match value.kind() {
        Kind::Text => arg
            .value_parser(clap::value_parser!(String))
            .allow_hyphen_values(true),
        Kind::Int64 => arg
            .value_parser(parse_int64)
            .allow_negative_numbers(true)
            .value_name("INT"),
    }
}

/// Copy a flag into its field, but only if it was given on the command line.
fn apply_flag(matches: &ArgMatches, flag: &str, value: &mut Value<'_>) {
    if matches.value_source(flag) != Some(ValueSource::CommandLine) {
        return;
    }
    match value {
        Value::Text(cell) => {
            if let Some(raw) = matches.get_one::<String>(flag) {
                **cell = raw.clone();
            }
        }
        Value::Int64(cell) => {
            if let Some(n) = matches.get_one::<i64>(flag) {
                **cell = *n;
            }
        }
    }
    tracing::debug!(flag, value = %value, "flag applied");
}

fn settle(error_handling: ErrorHandling, err: Error) -> Error {
    match (error_handling, err) {
        (ErrorHandling::ContinueOnError, err) => err,
        (ErrorHandling::ExitOnError, Error::Flag(err)) => err.exit(),
        (ErrorHandling::ExitOnError, err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        (ErrorHandling::PanicOnError, err) => panic!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use crate::fixtures::test::{Clashing, Generic, Reserved, ServerConfig, Split, Twice};
    use clap::error::ErrorKind;

    const NO_ENV: [(&str, &str); 0] = [];

    fn parse<R: Record>(
        record: &mut R,
        args: &[&str],
        vars: &[(&str, &str)],
    ) -> Result<Vec<String>, Error> {
        Parser::new(record).parse_from(args.iter().copied(), vars)
    }

    #[test]
    fn defaults_survive_without_input() {
        let mut config = ServerConfig::default();
        parse(&mut config, &["server"], &NO_ENV).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn flags_are_applied() {
        let mut config = ServerConfig::default();
        parse(
            &mut config,
            &["server", "--host", "0.0.0.0", "--port=0x1F90", "--workers", "-2"],
            &NO_ENV,
        )
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, -2);
    }

    #[test]
    fn environment_is_applied() {
        let mut config = ServerConfig::default();
        parse(
            &mut config,
            &["server"],
            &[("HOST", "example.org"), ("PORT", "9000"), ("TOKEN", "s3cr3t")],
        )
        .unwrap();
        assert_eq!(config.host, "example.org");
        assert_eq!(config.port, 9000);
        assert_eq!(config.token, "s3cr3t");
    }

    #[test]
    fn environment_overrides_flags() {
        let mut split = Split::default();
        parse(&mut split, &["split", "--x=1"], &[("X", "2")]).unwrap();
        assert_eq!(split.x, 2);
    }

    #[test]
    fn flag_wins_when_variable_is_empty() {
        let mut split = Split::default();
        parse(&mut split, &["split", "--x=1"], &[("X", "")]).unwrap();
        assert_eq!(split.x, 1);
    }

    #[test]
    fn inert_fields_are_untouched() {
        let mut config = ServerConfig::default();
        parse(&mut config, &["server"], &[("BUILD_ID", "ci")]).unwrap();
        assert_eq!(config.build_id, "dev");
    }

    #[test]
    fn flag_only_and_env_only_fields_stay_separate() {
        let mut config = ServerConfig::default();
        let err = parse(&mut config, &["server", "--token", "x"], &NO_ENV).unwrap_err();
        assert!(matches!(err, Error::Flag(ref e) if e.kind() == ErrorKind::UnknownArgument));

        parse(&mut config, &["server"], &[("WORKERS", "9")]).unwrap();
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn env_prefix_is_forwarded() {
        let mut config = ServerConfig::default();
        Parser::new(&mut config)
            .set_env_prefix("APP")
            .parse_from(["server"], &[("APP_PORT", "1"), ("PORT", "2")])
            .unwrap();
        assert_eq!(config.port, 1);
    }

    #[test]
    fn invalid_prefix_is_reported_before_parsing() {
        let mut config = ServerConfig::default();
        let err = Parser::new(&mut config)
            .set_env_prefix("BAD!NAME")
            .parse_from(["server", "--port", "1"], &NO_ENV)
            .unwrap_err();
        assert!(matches!(err, Error::Env(EnvError::InvalidName { .. })));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn bad_flag_value_is_clap_error() {
        let mut config = ServerConfig::default();
        let err = parse(&mut config, &["server", "--port", "eighty"], &NO_ENV).unwrap_err();
        match err {
            Error::Flag(e) => assert_eq!(e.kind(), ErrorKind::ValueValidation),
            other => panic!("expected flag error, got {other:?}"),
        }
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn bad_env_value_is_env_error() {
        let mut config = ServerConfig::default();
        let err = parse(&mut config, &["server", "--host", "h"], &[("PORT", "not_a_number")])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Env(EnvError::Parse { ref name, source: ValueError::Syntax(_) }) if name == "PORT"
        ));
        assert_eq!(config.port, 8080);
        // Flags were already applied when the environment pass failed.
        assert_eq!(config.host, "h");
    }

    #[test]
    fn duplicate_variable_in_record() {
        let mut clashing = Clashing::default();
        let err = parse(&mut clashing, &["clashing"], &NO_ENV).unwrap_err();
        assert!(matches!(err, Error::Env(EnvError::DuplicateName { ref set, .. }) if set == "Clashing"));
    }

    #[test]
    fn help_lists_flags_and_variables() {
        let mut config = ServerConfig::default();
        let err = Parser::new(&mut config)
            .set_env_prefix("APP")
            .parse_from(["server", "--help"], &NO_ENV)
            .unwrap_err();
        let Error::Flag(err) = err else {
            panic!("expected clap help");
        };
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        let help = err.to_string();
        assert!(help.contains("--port <INT>"));
        assert!(help.contains("port to listen on"));
        assert!(help.contains("[default: 8080]"));
        assert!(help.contains("Environment variables:"));
        assert!(help.contains("APP_TOKEN"));
    }

    #[test]
    fn generic_record_binds() {
        let mut generic = Generic::<u8>::default();
        parse(&mut generic, &["prog", "--name", "flag"], &[("NAME", "env")]).unwrap();
        assert_eq!(generic.name, "env");
    }

    #[test]
    fn text_flag_takes_hyphenated_value() {
        let mut config = ServerConfig::default();
        parse(&mut config, &["server", "--host", "-weird"], &NO_ENV).unwrap();
        assert_eq!(config.host, "-weird");
    }

    #[test]
    fn operands_end_flag_parsing() {
        let mut config = ServerConfig::default();
        let operands = parse(
            &mut config,
            &["server", "--port", "1", "input.txt", "--workers", "9"],
            &NO_ENV,
        )
        .unwrap();
        assert_eq!(operands, ["input.txt", "--workers", "9"]);
        assert_eq!(config.port, 1);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn double_dash_ends_flag_parsing() {
        let mut config = ServerConfig::default();
        let operands = parse(&mut config, &["server", "--", "--port", "1"], &NO_ENV).unwrap();
        assert_eq!(operands, ["--port", "1"]);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn no_operands_is_empty() {
        let mut config = ServerConfig::default();
        let operands = parse(&mut config, &["server", "--port", "1"], &NO_ENV).unwrap();
        assert!(operands.is_empty());
    }

    #[test]
    #[should_panic(expected = "Twice: flag redefined: dup")]
    fn duplicate_flag_names_panic() {
        let mut twice = Twice::default();
        let _ = parse(&mut twice, &["twice"], &NO_ENV);
    }

    #[test]
    #[should_panic(expected = "Reserved: flag redefined: help")]
    fn help_flag_is_reserved() {
        let mut reserved = Reserved::default();
        let _ = parse(&mut reserved, &["reserved"], &NO_ENV);
    }

    #[test]
    #[should_panic(expected = "invalid value")]
    fn panic_policy_applies_to_flags() {
        let mut config = ServerConfig::default();
        let _ = Parser::new(&mut config)
            .error_handling(ErrorHandling::PanicOnError)
            .parse_from(["server", "--port", "x"], &NO_ENV);
    }
}
