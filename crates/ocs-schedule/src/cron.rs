//! # Cron Schedule Calculator
//!
//! Standard 5-field cron expressions (minute, hour, day-of-month, month,
//! weekday; Sunday = 0) evaluated against UTC timestamps. Two operations:
//!
//! - [`next_run`]: the next instant strictly after a reference at which all
//!   five fields match, found by minute-stepping from the reference with a
//!   hard search bound of one non-leap year of minutes. Exhausting the bound
//!   is a deliberate refusal to search further on unsatisfiable expressions
//!   (e.g. day 31 of a 30-day month pinned to a weekday that never aligns)
//!   rather than looping indefinitely.
//! - [`describe`]: best-effort human-readable rendering of the common
//!   canonical patterns. Presentation convenience only; scheduling
//!   correctness never depends on it.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use thiserror::Error;

/// Hard cap on the minute-stepping search: one non-leap year.
pub const SEARCH_BOUND_MINUTES: u32 = 525_600;

/// Errors from cron parsing and next-run calculation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The expression does not have exactly five fields.
    #[error("malformed cron expression \"{expr}\": expected 5 fields, found {found}")]
    MalformedExpression {
        /// The offending expression.
        expr: String,
        /// The number of fields found.
        found: usize,
    },

    /// A field could not be parsed.
    #[error("invalid cron field \"{field}\": {reason}")]
    InvalidField {
        /// The offending field text.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No matching minute exists within the search bound.
    #[error("could not calculate next run time for \"{expr}\"")]
    SearchExhausted {
        /// The expression whose search was exhausted.
        expr: String,
    },
}

// ---------------------------------------------------------------------------
// Field patterns
// ---------------------------------------------------------------------------

/// One parsed cron field. Fields are evaluated independently and combined
/// with logical AND by [`CronExpression::matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldPattern {
    /// `*` — any value.
    Any,
    /// A bare integer — exact match.
    Exact(u32),
    /// `a-b` — inclusive range (`*` as range start means the field minimum).
    Range { start: u32, end: u32 },
    /// `a,b,c` — membership list.
    List(Vec<u32>),
    /// `expr/step` — from `*`: `value % step == 0`; from a start value:
    /// `value >= start && (value - start) % step == 0`. The upper bound of a
    /// range start is not enforced in step mode.
    Step { start: Option<u32>, step: u32 },
}

impl FieldPattern {
    fn parse(text: &str, field_min: u32) -> Result<Self, ScheduleError> {
        let invalid = |reason: String| ScheduleError::InvalidField {
            field: text.to_string(),
            reason,
        };
        let number = |s: &str| {
            s.parse::<u32>()
                .map_err(|_| invalid(format!("not a number: \"{s}\"")))
        };

        if text == "*" {
            return Ok(Self::Any);
        }

        if let Some((base, step)) = text.split_once('/') {
            let step = number(step)?;
            if step == 0 {
                return Err(invalid("step must be at least 1".to_string()));
            }
            let start = if base == "*" {
                None
            } else if let Some((start, _end)) = base.split_once('-') {
                Some(if start == "*" { field_min } else { number(start)? })
            } else {
                Some(number(base)?)
            };
            return Ok(Self::Step { start, step });
        }

        if text.contains(',') {
            let values = text
                .split(',')
                .map(number)
                .collect::<Result<Vec<u32>, _>>()?;
            return Ok(Self::List(values));
        }

        if let Some((start, end)) = text.split_once('-') {
            let start = if start == "*" { field_min } else { number(start)? };
            return Ok(Self::Range {
                start,
                end: number(end)?,
            });
        }

        Ok(Self::Exact(number(text)?))
    }

    fn matches(&self, value: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(n) => value == *n,
            Self::Range { start, end } => value >= *start && value <= *end,
            Self::List(values) => values.contains(&value),
            Self::Step { start: None, step } => value % step == 0,
            Self::Step {
                start: Some(start),
                step,
            } => value >= *start && (value - start) % step == 0,
        }
    }
}

// ---------------------------------------------------------------------------
// CronExpression
// ---------------------------------------------------------------------------

/// A parsed 5-field cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    expr: String,
    minute: FieldPattern,
    hour: FieldPattern,
    day_of_month: FieldPattern,
    month: FieldPattern,
    weekday: FieldPattern,
}

impl CronExpression {
    /// Parse an expression. Field count is checked before anything else;
    /// malformed expressions never reach the search.
    pub fn parse(expr: &str) -> Result<Self, ScheduleError> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::MalformedExpression {
                expr: expr.to_string(),
                found: fields.len(),
            });
        }
        Ok(Self {
            expr: expr.to_string(),
            minute: FieldPattern::parse(fields[0], 0)?,
            hour: FieldPattern::parse(fields[1], 0)?,
            day_of_month: FieldPattern::parse(fields[2], 1)?,
            month: FieldPattern::parse(fields[3], 1)?,
            weekday: FieldPattern::parse(fields[4], 0)?,
        })
    }

    /// The original expression text.
    pub fn as_str(&self) -> &str {
        &self.expr
    }

    /// Whether all five fields match the given instant.
    pub fn matches(&self, at: DateTime<Utc>) -> bool {
        self.minute.matches(at.minute())
            && self.hour.matches(at.hour())
            && self.day_of_month.matches(at.day())
            && self.month.matches(at.month())
            && self.weekday.matches(at.weekday().num_days_from_sunday())
    }

    /// The next matching instant strictly after `from`, rounded to a whole
    /// minute.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::SearchExhausted`] when no match exists within
    /// [`SEARCH_BOUND_MINUTES`].
    pub fn next_run(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        let mut candidate = from
            .with_nanosecond(0)
            .and_then(|d| d.with_second(0))
            .expect("zeroing sub-minute fields of a valid timestamp cannot fail")
            + Duration::minutes(1);

        for _ in 0..SEARCH_BOUND_MINUTES {
            if self.matches(candidate) {
                return Ok(candidate);
            }
            candidate += Duration::minutes(1);
        }
        tracing::warn!(expr = %self.expr, "cron next-run search bound exhausted");
        Err(ScheduleError::SearchExhausted {
            expr: self.expr.clone(),
        })
    }
}

/// Parse `expr` and compute the next matching instant strictly after `from`.
pub fn next_run(expr: &str, from: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    CronExpression::parse(expr)?.next_run(from)
}

// ---------------------------------------------------------------------------
// Description rendering
// ---------------------------------------------------------------------------

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Render a human-readable description of the expression.
///
/// Recognizes the common canonical patterns (every-minute, every-N-minutes,
/// hourly, daily, weekly, monthly, quarterly, annual) and falls back to a
/// generic composed phrase. All times are UTC.
pub fn describe(expr: &str) -> Result<String, ScheduleError> {
    // Validate before rendering so malformed expressions fail the same way
    // everywhere.
    CronExpression::parse(expr)?;
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let (minute, hour, dom, month, dow) = (fields[0], fields[1], fields[2], fields[3], fields[4]);

    let num = |s: &str| s.parse::<u32>().ok();
    let time = |h: u32, m: u32| format!("{h:02}:{m:02} UTC");

    if [minute, hour, dom, month, dow].iter().all(|f| *f == "*") {
        return Ok("every minute".to_string());
    }

    if let Some(step) = minute.strip_prefix("*/").and_then(num) {
        if [hour, dom, month, dow].iter().all(|f| *f == "*") {
            return Ok(format!("every {step} minutes"));
        }
    }

    if let Some(m) = num(minute) {
        if [hour, dom, month, dow].iter().all(|f| *f == "*") {
            return Ok(if m == 0 {
                "hourly on the hour".to_string()
            } else {
                format!("hourly at minute {m}")
            });
        }
        if let Some(h) = num(hour) {
            match (num(dom), month, num(dow)) {
                (None, "*", None) if dom == "*" && dow == "*" => {
                    return Ok(format!("daily at {}", time(h, m)));
                }
                (None, "*", Some(d)) if dom == "*" && (d as usize) < WEEKDAY_NAMES.len() => {
                    return Ok(format!("weekly on {} at {}", WEEKDAY_NAMES[d as usize], time(h, m)));
                }
                (Some(day), "*", None) if dow == "*" => {
                    return Ok(format!("monthly on day {day} at {}", time(h, m)));
                }
                (Some(day), "*/3", None) if dow == "*" => {
                    return Ok(format!("quarterly on day {day} at {}", time(h, m)));
                }
                (Some(day), mon, None) if dow == "*" => {
                    if let Some(mon) = num(mon).filter(|n| (1..=12).contains(n)) {
                        return Ok(format!(
                            "annually on {} {day} at {}",
                            MONTH_NAMES[(mon - 1) as usize],
                            time(h, m)
                        ));
                    }
                }
                _ => {}
            }
        }
    }

    Ok(format!(
        "at minute {minute}, hour {hour}, day-of-month {dom}, month {month}, weekday {dow}"
    ))
}
