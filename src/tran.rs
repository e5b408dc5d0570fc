//! Conversions behind the `tran` command.
//!
//! Bad input never aborts a conversion: the error message is printed and the conversion continues with a zero value, so the output is still produced in full.

use {
    std::{
        fmt,
        io::{
            self,
            prelude::*,
        },
    },
    chrono::{
        ParseError,
        prelude::*,
    },
    lazy_regex::regex_is_match,
    tracing::debug,
    crate::layout::{
        self,
        INPUT_LAYOUT,
        Stamp,
    },
};

/// Printed when `-ts` is not a base-10 integer.
pub const INVALID_TIMESTAMP: &str = "输入的时间戳格式不合法，例：1553759492";
/// Printed when `-ts` is an integer but no date can represent it.
pub const TIMESTAMP_OUT_OF_RANGE: &str = "输入的时间戳超出可表示范围";
/// Printed when `-tm` does not match [`INPUT_LAYOUT`].
pub const INVALID_DATE: &str = "输入日期格式不合法，例：2006/01/02 15:04:05";

/// Why a conversion input was rejected.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// `-ts` did not parse as an integer.
    #[error(transparent)] ParseInt(#[from] std::num::ParseIntError),
    /// `-ts` was an integer outside chrono's supported range.
    #[error("timestamp {0} out of range")]
    Timestamp(i64),
    /// `-tm` is not exactly four-digit year and two-digit fields with single separators.
    #[error("{0:?} does not match YYYY/MM/DD HH:MM:SS")]
    Layout(String),
    /// `-tm` has the right shape but is not a valid date or time.
    #[error(transparent)] ParseDate(#[from] ParseError),
    /// `-tm` named a wall-clock time the local zone skips.
    #[error("{0} does not exist in the local timezone")]
    Nonexistent(NaiveDateTime),
}

impl InputError {
    fn message(&self) -> &'static str {
        match self {
            InputError::ParseInt(_) => INVALID_TIMESTAMP,
            InputError::Timestamp(_) => TIMESTAMP_OUT_OF_RANGE,
            InputError::Layout(_) | InputError::ParseDate(_) | InputError::Nonexistent(_) => INVALID_DATE,
        }
    }
}

/// Interprets `ts` as whole seconds since the epoch and returns that instant in `zone`.
pub fn parse_timestamp<Tz: TimeZone>(zone: &Tz, ts: &str) -> Result<DateTime<Tz>, InputError> {
    let secs = ts.parse::<i64>()?;
    let utc = DateTime::<Utc>::from_timestamp(secs, 0).ok_or(InputError::Timestamp(secs))?;
    Ok(utc.with_timezone(zone))
}

/// Parses `tm` in [`INPUT_LAYOUT`] as a wall-clock time in `zone`.
///
/// If the wall-clock time occurs twice (a backward offset change), the earlier instant is used.
pub fn parse_date<Tz: TimeZone>(zone: &Tz, tm: &str) -> Result<DateTime<Tz>, InputError> {
    // chrono alone accepts single-digit fields and extra or missing whitespace
    if !regex_is_match!("^[0-9]{4}/[0-9]{2}/[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$", tm) {
        return Err(InputError::Layout(tm.to_owned()))
    }
    let naive = NaiveDateTime::parse_from_str(tm, INPUT_LAYOUT)?;
    zone.from_local_datetime(&naive).earliest().ok_or(InputError::Nonexistent(naive))
}

/// The instant used after a rejected `-tm`: midnight UTC on 1 January of year 1.
pub fn zero_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).single().expect("year 1 is within chrono's range")
}

/// `tran -ts`: prints the date of a Unix timestamp in every layout.
pub fn from_timestamp<Tz: TimeZone, W: Write>(out: &mut W, zone: &Tz, ts: &str) -> io::Result<()>
where Tz::Offset: fmt::Display {
    let date_time = match parse_timestamp(zone, ts) {
        Ok(date_time) => date_time,
        Err(e) => {
            debug!(input = ts, error = %e, "rejected timestamp, converting 0 instead");
            writeln!(out, "{}", e.message())?;
            DateTime::<Utc>::default().with_timezone(zone)
        }
    };
    writeln!(out, "转换后日期: ")?;
    layout::write_dates(out, &date_time)
}

/// `tran -tm`: echoes the input and prints its Unix timestamp.
pub fn from_date<Tz: TimeZone, W: Write>(out: &mut W, zone: &Tz, tm: &str) -> io::Result<()> {
    writeln!(out, "{}", tm)?;
    let stamp = match parse_date(zone, tm) {
        Ok(date_time) => Stamp::of(&date_time),
        Err(e) => {
            debug!(input = tm, error = %e, "rejected date, converting 0001-01-01 00:00:00 UTC instead");
            writeln!(out, "{}", e.message())?;
            Stamp::of(&zero_date())
        }
    };
    writeln!(out, "转换后时间戳: ")?;
    write!(out, "{}", stamp)
}

#[cfg(test)]
mod tests {
    use {
        chrono_tz::Asia::Shanghai,
        super::*,
    };

    fn timestamp_output<Tz: TimeZone>(zone: &Tz, ts: &str) -> String
    where Tz::Offset: fmt::Display {
        let mut out = Vec::new();
        from_timestamp(&mut out, zone, ts).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn date_output<Tz: TimeZone>(zone: &Tz, tm: &str) -> String {
        let mut out = Vec::new();
        from_date(&mut out, zone, tm).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn timestamp_to_dates() {
        assert_eq!(timestamp_output(&Shanghai, "1553759492"), "转换后日期: \n2019-03-28 03:51:32\n2019-03-28 15:51:32\n2019/03/28 03:51:32\n2019/03/28 15:51:32\n");
    }

    #[test]
    fn negative_timestamp() {
        assert!(timestamp_output(&Utc, "-1").contains("1969-12-31 23:59:59\n"));
    }

    #[test]
    fn bad_timestamp_reports_and_converts_epoch() {
        let output = timestamp_output(&Utc, "notanumber");
        assert!(output.starts_with(&format!("{INVALID_TIMESTAMP}\n转换后日期: \n")));
        assert!(output.contains("1970-01-01 00:00:00\n"));
    }

    #[test]
    fn huge_timestamp_reports_and_converts_epoch() {
        let output = timestamp_output(&Utc, &i64::MAX.to_string());
        assert!(output.starts_with(TIMESTAMP_OUT_OF_RANGE));
        assert!(output.contains("1970/01/01 00:00:00\n"));
    }

    #[test]
    fn date_to_timestamp() {
        assert_eq!(date_output(&Shanghai, "2019/03/28 10:30:00"), "2019/03/28 10:30:00\n转换后时间戳: \ns: 1553740200 \nms: 1553740200000 \nns: 1553740200000000000 \n");
    }

    #[test]
    fn bad_date_reports_and_converts_year_one() {
        let output = date_output(&Shanghai, "2019-03-28 10:30:00");
        assert!(output.starts_with(&format!("2019-03-28 10:30:00\n{INVALID_DATE}\n转换后时间戳: \n")));
        assert!(output.contains("s: -62135596800 \n"));
        assert!(output.contains("ns: -6795364578871345152 \n"));
    }

    #[test]
    fn date_without_time_is_rejected() {
        assert!(matches!(parse_date(&Utc, "2019/03/28"), Err(InputError::Layout(_))));
    }

    #[test]
    fn loose_layouts_are_rejected() {
        for tm in ["2019/3/8 1:2:3", "2019/03/2810:30:00", " 2019/ 03/ 28 10:30:00", "2019/03/28    10:30:00", "2019/03/28 10:30:00\n"] {
            assert!(matches!(parse_date(&Utc, tm), Err(InputError::Layout(_))), "{tm:?} accepted");
            let output = date_output(&Utc, tm);
            assert!(output.contains(&format!("\n{INVALID_DATE}\n")), "{tm:?}: {output}");
            assert!(output.contains("s: -62135596800 \n"), "{tm:?}: {output}");
        }
    }

    #[test]
    fn well_shaped_but_invalid_date_is_rejected() {
        assert!(matches!(parse_date(&Utc, "2019/02/30 10:30:00"), Err(InputError::ParseDate(_))));
        assert!(matches!(parse_date(&Utc, "2019/03/28 24:00:00"), Err(InputError::ParseDate(_))));
    }

    #[test]
    fn skipped_wall_clock_time_is_rejected() {
        // 02:30 did not happen in New York on 2019-03-10
        let result = parse_date(&chrono_tz::America::New_York, "2019/03/10 02:30:00");
        assert!(matches!(result, Err(InputError::Nonexistent(_))));
    }

    #[test]
    fn repeated_wall_clock_time_takes_earlier_instant() {
        let date_time = parse_date(&chrono_tz::America::New_York, "2019/11/03 01:30:00").unwrap();
        assert_eq!(date_time.timestamp(), 1572759000);
    }

    #[test]
    fn timestamp_round_trips_through_layouts() {
        for secs in [0, 1, 1553759492, 4102444799, -86400] {
            let date_time = parse_timestamp(&Shanghai, &secs.to_string()).unwrap();
            let [_, twenty_four, _, slashed] = layout::render(&date_time);
            let reparsed = Shanghai.from_local_datetime(&NaiveDateTime::parse_from_str(&twenty_four, "%Y-%m-%d %H:%M:%S").unwrap()).unwrap();
            assert_eq!(reparsed.timestamp(), secs);
            assert_eq!(parse_date(&Shanghai, &slashed).unwrap().timestamp(), secs);
        }
    }

    #[test]
    fn zero_date_is_year_one() {
        assert_eq!(zero_date(), Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap());
    }
}
