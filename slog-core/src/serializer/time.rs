//! Fixed-width calendar formatting for timestamp values.

use chrono::{Datelike, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::alloc::OutputBuffer;
use crate::error::SlogError;
use crate::field::Timestamp;

/// Fractional-second digits appended after `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePrecision {
    #[default]
    Millis,
    Nanos,
}

/// Zone the calendar fields are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

/// Writes `YYYY-MM-DD HH:MM:SS.fff` (or `.fffffffff`), unquoted.
pub(crate) fn write_timestamp(
    out: &mut OutputBuffer,
    ts: Timestamp,
    zone: TimeZoneMode,
    precision: TimePrecision,
) -> Result<(), SlogError> {
    match zone {
        TimeZoneMode::Local => write_calendar(out, ts, &Local)?,
        TimeZoneMode::Utc => write_calendar(out, ts, &Utc)?,
    }
    match precision {
        TimePrecision::Millis => out.append_fmt(format_args!(".{:03}", ts.millis())),
        TimePrecision::Nanos => out.append_fmt(format_args!(".{:09}", ts.nanos())),
    }
}

fn write_calendar<Tz: TimeZone>(
    out: &mut OutputBuffer,
    ts: Timestamp,
    tz: &Tz,
) -> Result<(), SlogError> {
    match ts.to_datetime(tz) {
        Some(dt) => out.append_fmt(format_args!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
        )),
        // Outside the representable calendar range: fall back to epoch seconds.
        None => out.append_fmt(format_args!("{}", ts.secs())),
    }
}
