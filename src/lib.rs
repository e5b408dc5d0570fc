//! `odate` prints the current time in several forms and converts between Unix timestamps and dates.
//!
//! The program is a dispatcher over a fixed set of commands. An [`Invocation`] is parsed from the argument list, its command name is looked up in a [`Registry`], and the selected [`Command`] writes its output. A missing or unknown command name runs [`Command::Now`].
//!
//! All human-readable dates are rendered in the timezone of the `now` value passed to [`dispatch`]; the binary uses the host's local timezone.

#![deny(missing_docs, rust_2018_idioms, unused, unused_import_braces, unused_lifetimes, unused_qualifications, warnings)]
#![forbid(unsafe_code)]

use {
    std::{
        collections::BTreeMap,
        fmt,
        io::{
            self,
            prelude::*,
        },
    },
    chrono::prelude::*,
    tracing::debug,
    crate::layout::Stamp,
};
pub use crate::args::Invocation;

mod args;
pub mod layout;
pub mod tran;

/// Name of the executable, as shown in the help text.
pub const PROGRAM: &str = "odate";
/// Printed by the `v` command.
pub const VERSION: &str = "v1.0";

const OPTIONS: [&str; 2] = [
    "-ts\t 时间戳转换为日期格式, 单位为秒(s)",
    "-tm\t 日期格式转换为时间戳, 格式如：2006/01/02 15:04:05",
];

const EXAMPLES: [&str; 5] = [
    "odate",
    "odate help",
    "odate now",
    "odate tran -ts=1553745472",
    "odate tran -tm='2006/01/02 15:04:05'",
];

/// An error that stops the program.
///
/// Bad `-ts` or `-tm` values are not errors; they are reported in the regular output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The options after the command name could not be parsed.
    #[error(transparent)] Args(#[from] clap::Error),
    /// Writing the output failed.
    #[error(transparent)] Io(#[from] io::Error),
}

/// The commands the program knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `v`: print the version.
    Version,
    /// `help`: print usage, commands, options and examples.
    Help,
    /// `now`: print the current time as timestamps and dates.
    Now,
    /// `tran`: convert between a timestamp and a date.
    Tran,
}

impl Command {
    /// Every command, in declaration order.
    pub const ALL: [Command; 4] = [Command::Version, Command::Help, Command::Now, Command::Tran];

    /// The name this command is invoked by.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Version => "v",
            Command::Help => "help",
            Command::Now => "now",
            Command::Tran => "tran",
        }
    }

    /// The one-line description shown by `help`.
    pub fn detail(&self) -> &'static str {
        match self {
            Command::Version => "查看当前版本号",
            Command::Help => "查看帮助信息",
            Command::Now => "输出当前时间信息",
            Command::Tran => "时间戳转换为时间格式",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.name(), self.detail())
    }
}

/// Maps command names to commands. Built once and not modified afterwards.
#[derive(Debug, Clone)]
pub struct Registry {
    commands: BTreeMap<&'static str, Command>,
}

impl Registry {
    /// The registry with all four commands.
    pub fn register() -> Registry {
        Registry::from_commands(Command::ALL)
    }

    /// A registry containing only the given commands.
    pub fn from_commands<I: IntoIterator<Item = Command>>(commands: I) -> Registry {
        Registry {
            commands: commands.into_iter().map(|command| (command.name(), command)).collect(),
        }
    }

    /// Looks up a command by name.
    pub fn get(&self, name: &str) -> Option<Command> {
        self.commands.get(name).copied()
    }

    /// The registered commands, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        self.commands.values().copied()
    }
}

/// Runs the command selected by `invocation` and writes its output to `out`.
///
/// `now` is the current time; its timezone is the one all dates are rendered and parsed in.
pub fn dispatch<Tz: TimeZone, W: Write>(registry: &Registry, invocation: &Invocation, now: DateTime<Tz>, out: &mut W) -> Result<(), Error>
where Tz::Offset: fmt::Display {
    let command = match invocation.command.as_deref() {
        Some(name) => registry.get(name).unwrap_or_else(|| {
            debug!(name, "unknown command, running now");
            Command::Now
        }),
        None => Command::Now,
    };
    debug!(command = command.name(), "dispatching");
    match command {
        Command::Version => writeln!(out, "{}", VERSION)?,
        Command::Help => write_help(registry, out)?,
        Command::Now => write_now(&now, out)?,
        Command::Tran => if let Some(ts) = &invocation.ts {
            tran::from_timestamp(out, &now.timezone(), ts)?
        } else if let Some(tm) = &invocation.tm {
            tran::from_date(out, &now.timezone(), tm)?
        },
    }
    Ok(())
}

/// Parses a full argument list (executable name first) and runs it against the full registry in the local timezone.
pub fn run<S: Into<String>, I: IntoIterator<Item = S>, W: Write>(args: I, out: &mut W) -> Result<(), Error> {
    let invocation = Invocation::parse(args)?;
    dispatch(&Registry::register(), &invocation, Local::now(), out)
}

fn write_now<Tz: TimeZone, W: Write>(now: &DateTime<Tz>, out: &mut W) -> io::Result<()>
where Tz::Offset: fmt::Display {
    writeln!(out, "当前时间戳: ")?;
    write!(out, "{}", Stamp::of(now))?;
    writeln!(out)?;
    writeln!(out, "当前日期: ")?;
    layout::write_full(out, now)?;
    layout::write_dates(out, now)
}

fn write_help<W: Write>(registry: &Registry, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, " Usage: {} <command>", PROGRAM)?;
    write_section(out, "Commands", registry.iter())?;
    write_section(out, "Options", OPTIONS)?;
    write_section(out, "Examples", EXAMPLES)?;
    writeln!(out)
}

fn write_section<T: fmt::Display, I: IntoIterator<Item = T>, W: Write>(out: &mut W, title: &str, lines: I) -> io::Result<()> {
    let mut lines = lines.into_iter().peekable();
    if lines.peek().is_some() {
        writeln!(out)?;
        writeln!(out, " {}:", title)?;
        for line in lines {
            writeln!(out, "\t{}", line)?;
        }
    }
    Ok(())
}
