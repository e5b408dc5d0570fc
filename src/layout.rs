//! Fixed date layouts and the seconds/milliseconds/nanoseconds triple printed for an instant.

use {
    std::{
        fmt,
        io::{
            self,
            prelude::*,
        },
    },
    chrono::prelude::*,
};

/// The four layouts every rendered date is printed in, in output order.
///
/// The `%I` layouts use the 12-hour clock hour without an AM/PM marker, so `15:04` and `03:04` render the same hour digits. This is the shipped output format and is kept as is.
pub const DATE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %I:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %I:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// The only layout accepted by `tran -tm`, 24-hour clock.
pub const INPUT_LAYOUT: &str = "%Y/%m/%d %H:%M:%S";

/// An instant as integer counts since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    /// Whole seconds.
    pub secs: i64,
    /// Nanoseconds divided by one million, truncated toward zero.
    pub millis: i64,
    /// Seconds times 10⁹ plus the subsecond part. Wraps around for instants outside roughly 1678–2262.
    pub nanos: i64,
}

impl Stamp {
    /// Computes the stamp of a datetime in any timezone.
    pub fn of<Tz: TimeZone>(date_time: &DateTime<Tz>) -> Stamp {
        let secs = date_time.timestamp();
        let nanos = secs.wrapping_mul(1_000_000_000).wrapping_add(i64::from(date_time.timestamp_subsec_nanos()));
        Stamp {
            secs,
            millis: nanos / 1_000_000,
            nanos,
        }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "s: {} ", self.secs)?;
        writeln!(f, "ms: {} ", self.millis)?;
        writeln!(f, "ns: {} ", self.nanos)
    }
}

/// Renders `date_time` in each of the [`DATE_LAYOUTS`].
pub fn render<Tz: TimeZone>(date_time: &DateTime<Tz>) -> [String; 4]
where Tz::Offset: fmt::Display {
    DATE_LAYOUTS.map(|layout| date_time.format(layout).to_string())
}

pub(crate) fn write_dates<Tz: TimeZone, W: Write>(out: &mut W, date_time: &DateTime<Tz>) -> io::Result<()>
where Tz::Offset: fmt::Display {
    for line in render(date_time) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// The subsecond part with a leading dot and no trailing zeros, or nothing for a whole second.
fn fraction(nanos: u32) -> String {
    if nanos == 0 {
        String::default()
    } else {
        format!(".{:09}", nanos).trim_end_matches('0').to_owned()
    }
}

/// Writes the full `CST:` line. The label is fixed; the zone is shown as a numeric offset only.
pub(crate) fn write_full<Tz: TimeZone, W: Write>(out: &mut W, date_time: &DateTime<Tz>) -> io::Result<()>
where Tz::Offset: fmt::Display {
    writeln!(out, "CST: {}{} {}", date_time.format("%Y-%m-%d %H:%M:%S"), fraction(date_time.timestamp_subsec_nanos()), date_time.format("%z"))
}
