//! Billing-period resolution.
//!
//! A billing period is the half-open interval `[anchor, next_anchor)` where
//! the anchor is the user's billing day-of-month at local midnight in the
//! user's timezone. Billing days are constrained to 1-28 so the anchor exists
//! in every month. All functions are pure over an injected `now_utc`; the
//! wall clock is never read here.

use crate::errors::{Error, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Half-open UTC interval `[start_utc, end_utc)`, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    /// Inclusive start of the period
    pub start_utc: DateTime<Utc>,
    /// Exclusive end of the period
    pub end_utc: DateTime<Utc>,
}

/// Which period the caller wants resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodQuery {
    /// The billing period containing `now_utc`.
    Current,
    /// An explicit local-date range. A missing `from` means the Unix epoch;
    /// a missing `to` means `now_utc`. `to` is inclusive of its whole local
    /// day.
    Explicit {
        /// First local day of the range
        from: Option<NaiveDate>,
        /// Last local day of the range (inclusive)
        to: Option<NaiveDate>,
    },
}

fn parse_timezone(timezone_name: &str) -> Result<Tz> {
    timezone_name
        .parse::<Tz>()
        .map_err(|_| Error::InvalidConfiguration {
            message: format!("unresolvable timezone '{timezone_name}'"),
        })
}

fn validate_billing_day(billing_day: i32) -> Result<u32> {
    if !(1..=28).contains(&billing_day) {
        return Err(Error::InvalidConfiguration {
            message: format!("billing_day must be between 1 and 28, got {billing_day}"),
        });
    }
    // Range checked above, the cast is total.
    #[allow(clippy::cast_sign_loss)]
    Ok(billing_day as u32)
}

/// Maps a local calendar date at midnight into a UTC instant.
///
/// A DST fold resolves to the earlier instant; a DST gap that removes the
/// local midnight entirely is reported as `InvalidConfiguration`.
fn local_midnight_utc(tz: Tz, year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    tz.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidConfiguration {
            message: format!("local midnight {year:04}-{month:02}-{day:02} does not exist in {tz}"),
        })
}

/// `(year, month)` one calendar month after the given one.
fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// `(year, month)` one calendar month before the given one.
fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Resolves the requested period into a half-open UTC interval.
///
/// For [`PeriodQuery::Current`], the anchor is the billing day of the month
/// containing `now_utc` in the user's timezone: when the local day has
/// reached the billing day the period starts at that anchor and ends one
/// calendar month later, otherwise the anchor is the period end and the
/// start is one calendar month earlier. Billing days never exceed 28, so the
/// month shift is always well-defined.
pub fn resolve_period_range_utc(
    billing_day: i32,
    timezone_name: &str,
    query: &PeriodQuery,
    now_utc: DateTime<Utc>,
) -> Result<PeriodRange> {
    let tz = parse_timezone(timezone_name)?;
    let billing_day = validate_billing_day(billing_day)?;

    match *query {
        PeriodQuery::Current => {
            let now_local = now_utc.with_timezone(&tz);
            let year = now_local.year();
            let month = now_local.month();

            let (start, end) = if now_local.day() >= billing_day {
                let (ny, nm) = next_month(year, month);
                (
                    local_midnight_utc(tz, year, month, billing_day)?,
                    local_midnight_utc(tz, ny, nm, billing_day)?,
                )
            } else {
                let (py, pm) = prev_month(year, month);
                (
                    local_midnight_utc(tz, py, pm, billing_day)?,
                    local_midnight_utc(tz, year, month, billing_day)?,
                )
            };

            Ok(PeriodRange {
                start_utc: start,
                end_utc: end,
            })
        }
        PeriodQuery::Explicit { from, to } => {
            let start_utc = match from {
                Some(date) => local_midnight_utc(tz, date.year(), date.month(), date.day())?,
                None => DateTime::UNIX_EPOCH,
            };

            let end_utc = match to {
                Some(date) => {
                    let next = date.succ_opt().ok_or_else(|| Error::InvalidConfiguration {
                        message: format!("date {date} is out of range"),
                    })?;
                    local_midnight_utc(tz, next.year(), next.month(), next.day())?
                }
                None => now_utc,
            };

            Ok(PeriodRange {
                start_utc,
                end_utc,
            })
        }
    }
}

/// Resolves the last `periods` billing periods, newest first.
///
/// Repeatedly resolves the current period and rewinds the clock to just
/// before its start, producing contiguous non-overlapping intervals:
/// `result[i].end_utc == result[i - 1].start_utc`.
pub fn last_n_period_ranges_utc(
    billing_day: i32,
    timezone_name: &str,
    periods: usize,
    now_utc: DateTime<Utc>,
) -> Result<Vec<PeriodRange>> {
    let mut ranges = Vec::with_capacity(periods);
    let mut cursor = now_utc;

    for _ in 0..periods {
        let range = resolve_period_range_utc(billing_day, timezone_name, &PeriodQuery::Current, cursor)?;
        cursor = range.start_utc - Duration::microseconds(1);
        ranges.push(range);
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_current_period_before_billing_day() {
        // 2024-03-05T10:00Z is March 5th local in Warsaw (UTC+1), before day 10,
        // so the period is [Feb 10 local midnight, Mar 10 local midnight).
        let range = resolve_period_range_utc(
            10,
            "Europe/Warsaw",
            &PeriodQuery::Current,
            utc("2024-03-05T10:00:00Z"),
        )
        .unwrap();

        assert_eq!(range.start_utc, utc("2024-02-09T23:00:00Z"));
        assert_eq!(range.end_utc, utc("2024-03-09T23:00:00Z"));
    }

    #[test]
    fn test_current_period_on_billing_day() {
        let range = resolve_period_range_utc(
            10,
            "Europe/Warsaw",
            &PeriodQuery::Current,
            utc("2024-03-10T12:00:00Z"),
        )
        .unwrap();

        assert_eq!(range.start_utc, utc("2024-03-09T23:00:00Z"));
        // April 10 local midnight is UTC+2 after the spring DST change.
        assert_eq!(range.end_utc, utc("2024-04-09T22:00:00Z"));
    }

    #[test]
    fn test_current_period_year_rollover_forward() {
        // December 20th with billing day 15: period ends January 15 next year.
        let range = resolve_period_range_utc(
            15,
            "UTC",
            &PeriodQuery::Current,
            utc("2024-12-20T00:00:00Z"),
        )
        .unwrap();

        assert_eq!(range.start_utc, utc("2024-12-15T00:00:00Z"));
        assert_eq!(range.end_utc, utc("2025-01-15T00:00:00Z"));
    }

    #[test]
    fn test_current_period_year_rollover_backward() {
        // January 5th with billing day 15: period started December 15 last year.
        let range = resolve_period_range_utc(
            15,
            "UTC",
            &PeriodQuery::Current,
            utc("2025-01-05T00:00:00Z"),
        )
        .unwrap();

        assert_eq!(range.start_utc, utc("2024-12-15T00:00:00Z"));
        assert_eq!(range.end_utc, utc("2025-01-15T00:00:00Z"));
    }

    #[test]
    fn test_current_period_contains_now_for_all_billing_days() {
        let now = utc("2024-07-17T09:30:00Z");
        for billing_day in 1..=28 {
            let range = resolve_period_range_utc(
                billing_day,
                "Europe/Warsaw",
                &PeriodQuery::Current,
                now,
            )
            .unwrap();
            assert!(range.start_utc <= now, "day {billing_day}");
            assert!(now < range.end_utc, "day {billing_day}");
        }
    }

    #[test]
    fn test_explicit_range_defaults() {
        let now = utc("2024-06-01T08:00:00Z");
        let range = resolve_period_range_utc(
            10,
            "Europe/Warsaw",
            &PeriodQuery::Explicit {
                from: None,
                to: None,
            },
            now,
        )
        .unwrap();

        assert_eq!(range.start_utc, DateTime::UNIX_EPOCH);
        assert_eq!(range.end_utc, now);
    }

    #[test]
    fn test_explicit_range_to_date_is_inclusive() {
        let range = resolve_period_range_utc(
            10,
            "Europe/Warsaw",
            &PeriodQuery::Explicit {
                from: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
                to: Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            },
            utc("2024-07-15T00:00:00Z"),
        )
        .unwrap();

        // Warsaw is UTC+2 in June; end covers the whole local June 30.
        assert_eq!(range.start_utc, utc("2024-05-31T22:00:00Z"));
        assert_eq!(range.end_utc, utc("2024-06-30T22:00:00Z"));
    }

    #[test]
    fn test_last_n_periods_are_contiguous() {
        let ranges =
            last_n_period_ranges_utc(10, "Europe/Warsaw", 6, utc("2024-07-17T09:30:00Z")).unwrap();

        assert_eq!(ranges.len(), 6);
        for window in ranges.windows(2) {
            assert_eq!(window[1].end_utc, window[0].start_utc);
        }
        // Newest first.
        assert!(ranges[0].start_utc > ranges[5].start_utc);
    }

    #[test]
    fn test_last_n_periods_span_dst_transitions() {
        // Six periods back from July cross the March DST change in Warsaw;
        // contiguity must survive the offset shift.
        let ranges =
            last_n_period_ranges_utc(1, "Europe/Warsaw", 6, utc("2024-07-02T12:00:00Z")).unwrap();
        for window in ranges.windows(2) {
            assert_eq!(window[1].end_utc, window[0].start_utc);
        }
    }

    #[test]
    fn test_billing_day_out_of_range() {
        for bad in [0, 29, 31, -3] {
            let result = resolve_period_range_utc(
                bad,
                "UTC",
                &PeriodQuery::Current,
                utc("2024-01-01T00:00:00Z"),
            );
            assert!(matches!(
                result,
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_unresolvable_timezone() {
        let result = resolve_period_range_utc(
            10,
            "Mars/Olympus_Mons",
            &PeriodQuery::Current,
            utc("2024-01-01T00:00:00Z"),
        );
        assert!(matches!(
            result,
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_period_is_one_calendar_month_in_local_time() {
        // Anchors stay on the billing day even across months of different
        // lengths (Jan 31 days, Feb 29 in 2024).
        let range = resolve_period_range_utc(
            28,
            "UTC",
            &PeriodQuery::Current,
            utc("2024-02-10T00:00:00Z"),
        )
        .unwrap();
        assert_eq!(range.start_utc, utc("2024-01-28T00:00:00Z"));
        assert_eq!(range.end_utc, utc("2024-02-28T00:00:00Z"));
    }
}
