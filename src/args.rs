//! Turns the raw argument list into an [`Invocation`].

use {
    clap::Parser,
    lazy_regex::regex_captures,
    tracing::debug,
    crate::Error,
};

/// Options accepted after the command name.
#[derive(Debug, Parser)]
#[command(name = "odate", no_binary_name = true, disable_version_flag = true, args_override_self = true)]
struct Flags {
    /// Unix timestamp in seconds to convert to a date.
    #[arg(long, allow_hyphen_values = true)]
    ts: Option<String>,
    /// Date in `YYYY/MM/DD HH:MM:SS` form to convert to a timestamp.
    #[arg(long, allow_hyphen_values = true)]
    tm: Option<String>,
    /// Everything from the first positional argument on; not interpreted.
    #[arg(trailing_var_arg = true, hide = true)]
    rest: Vec<String>,
}

/// One run of the program, as selected by its arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The command name, if one was given. Not checked against a registry.
    pub command: Option<String>,
    /// Value of `-ts`, if given and non-empty.
    pub ts: Option<String>,
    /// Value of `-tm`, if given and non-empty.
    pub tm: Option<String>,
}

impl Invocation {
    /// Parses a full argument list, including the executable name in first position.
    ///
    /// With no command name, the options are not looked at. Options may be spelled `-ts=1`, `-ts 1`, `--ts=1` or `--ts 1`.
    pub fn parse<S: Into<String>, I: IntoIterator<Item = S>>(args: I) -> Result<Invocation, Error> {
        let mut args = args.into_iter().map(Into::<String>::into).skip(1); // ignore executable name
        let Some(command) = args.next() else { return Ok(Invocation::default()) };
        let flags = Flags::try_parse_from(args.map(|arg| single_dash_to_long(&arg)))?;
        if !flags.rest.is_empty() {
            debug!(ignored = ?flags.rest, "ignoring arguments after the options");
        }
        Ok(Invocation {
            command: Some(command),
            ts: flags.ts.filter(|ts| !ts.is_empty()),
            tm: flags.tm.filter(|tm| !tm.is_empty()),
        })
    }
}

/// Rewrites Go-style `-name` and `-name=value` options to the `--name` form clap expects.
fn single_dash_to_long(arg: &str) -> String {
    match regex_captures!("(?s)^-([A-Za-z][A-Za-z0-9_-]+)(=.*)?$", arg) {
        Some((_, name, value)) => format!("--{name}{value}"),
        None => arg.to_owned(),
    }
}
