//! Calendar dates and epochs.
//!
//! Scenario dates are written as `YYYY-MM-DD` and interpreted as **midnight TDB**, the time scale
//! used by the planetary ephemerides. All spans are expressed in days.

use hifitime::{Duration, Epoch, TimeScale};
use nom::{
    bytes::complete::tag,
    character::complete::{digit1, space0},
    combinator::{all_consuming, map_res},
    sequence::{delimited, tuple},
    IResult,
};

use crate::constants::{Days, JDTOMJD, MJD, SECONDS_PER_DAY};
use crate::porkchop_errors::PorkchopError;

/// MJD of the Unix epoch 1970-01-01
const MJD_UNIX_EPOCH: i64 = 40_587;

fn number<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, |s: &str| s.parse::<T>())(input)
}

fn calendar_date(input: &str) -> IResult<&str, (i32, u8, u8)> {
    let (rest, (year, _, month, _, day)) = all_consuming(delimited(
        space0,
        tuple((number::<i32>, tag("-"), number::<u8>, tag("-"), number::<u8>)),
        space0,
    ))(input)?;
    Ok((rest, (year, month, day)))
}

/// Parse a `YYYY-MM-DD` calendar date into an epoch at midnight TDB.
///
/// Arguments
/// -----------------
/// * `date`: the calendar date, e.g. `"2005-04-30"`
///
/// Return
/// ----------
/// * The epoch at 00:00:00 TDB of that day, or [`PorkchopError::InvalidDate`]
///   if the string is malformed or the day does not exist.
pub fn parse_date(date: &str) -> Result<Epoch, PorkchopError> {
    let (_, (year, month, day)) =
        calendar_date(date).map_err(|e| PorkchopError::InvalidDate(format!("{date}: {e}")))?;

    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
        return Err(PorkchopError::InvalidDate(format!(
            "{date}: day or month out of range"
        )));
    }

    Ok(Epoch::from_gregorian_at_midnight(
        year,
        month,
        day,
        TimeScale::TDB,
    ))
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Signed span `latest - earliest` in days.
pub fn span_days(earliest: Epoch, latest: Epoch) -> Days {
    (latest - earliest).to_seconds() / SECONDS_PER_DAY
}

/// Duration of `days` days.
pub fn days(days: Days) -> Duration {
    Duration::from_seconds(days * SECONDS_PER_DAY)
}

/// Modified Julian Date of an epoch in the TDB scale.
pub fn epoch_to_mjd_tdb(epoch: Epoch) -> MJD {
    epoch.to_jde_tdb_days() - JDTOMJD
}

/// Calendar date (TDB) of an epoch, rounded to the nearest second first.
pub fn calendar_of(epoch: Epoch) -> (i32, u8, u8) {
    let mjd = epoch_to_mjd_tdb(epoch) + 0.5 / SECONDS_PER_DAY;
    let z = mjd.floor() as i64 - MJD_UNIX_EPOCH + 719_468;

    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;

    (year, month, day)
}

/// Format an epoch as `YYYY-MM-DD` (TDB).
pub fn format_date(epoch: Epoch) -> String {
    let (y, m, d) = calendar_of(epoch);
    format!("{y:04}-{m:02}-{d:02}")
}
