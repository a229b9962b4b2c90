//! # ocs-schedule — Report Scheduling
//!
//! Cron arithmetic and the report-schedule registry for the Orbital
//! Compliance Stack. The calculator is a pure function from a 5-field cron
//! expression and a reference instant to the next matching instant; the
//! registry layers schedule lifecycle (active flag, last/next run) on top.
//!
//! Everything here is synchronous, single-threaded, and side-effect-free,
//! safe to call from any number of tasks concurrently.

pub mod cron;
pub mod report;

pub use cron::{describe, next_run, CronExpression, ScheduleError, SEARCH_BOUND_MINUTES};
pub use report::{ReportSchedule, ReportScheduler};
