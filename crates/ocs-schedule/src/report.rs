//! # Report Schedule Registry
//!
//! Recurring compliance-report schedules driven by the cron calculator.
//! Each schedule carries its expression, an active flag, and the
//! last/next run timestamps; the registry answers "what is due now" and
//! rolls schedules forward after a run.
//!
//! A schedule whose expression becomes unsatisfiable (next-run search
//! exhausted) is deactivated rather than retried indefinitely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cron::{next_run, CronExpression, ScheduleError};

/// A recurring report schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchedule {
    /// Unique schedule identifier.
    pub schedule_id: String,
    /// Human-readable schedule name.
    pub name: String,
    /// The 5-field cron expression.
    pub cron_expression: String,
    /// Whether this schedule is currently active.
    pub active: bool,
    /// Last time a report was generated for this schedule.
    pub last_run: Option<DateTime<Utc>>,
    /// Next time a report is due (None once deactivated as unsatisfiable).
    pub next_run: Option<DateTime<Utc>>,
}

impl ReportSchedule {
    /// Create a schedule, validating the expression and computing the first
    /// due time from `now`.
    ///
    /// # Errors
    ///
    /// Propagates parse errors and [`ScheduleError::SearchExhausted`] for
    /// expressions with no run within the search bound — the caller flags
    /// the schedule as unsatisfiable instead of registering it.
    pub fn new(
        name: impl Into<String>,
        cron_expression: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ScheduleError> {
        let cron_expression = cron_expression.into();
        let first_run = CronExpression::parse(&cron_expression)?.next_run(now)?;
        Ok(Self {
            schedule_id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            cron_expression,
            active: true,
            last_run: None,
            next_run: Some(first_run),
        })
    }

    /// Whether this schedule is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.active && self.next_run.is_some_and(|t| t <= now)
    }
}

/// Registry of report schedules.
#[derive(Debug, Default)]
pub struct ReportScheduler {
    schedules: Vec<ReportSchedule>,
}

impl ReportScheduler {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schedule and return its identifier.
    pub fn add(&mut self, schedule: ReportSchedule) -> String {
        let id = schedule.schedule_id.clone();
        self.schedules.push(schedule);
        id
    }

    /// Deactivate a schedule by identifier.
    ///
    /// Returns `true` if the schedule was found and active.
    pub fn deactivate(&mut self, schedule_id: &str) -> bool {
        if let Some(schedule) = self
            .schedules
            .iter_mut()
            .find(|s| s.schedule_id == schedule_id)
        {
            if schedule.active {
                schedule.active = false;
                return true;
            }
        }
        false
    }

    /// Get a schedule by identifier.
    pub fn get(&self, schedule_id: &str) -> Option<&ReportSchedule> {
        self.schedules.iter().find(|s| s.schedule_id == schedule_id)
    }

    /// All schedules due at `now`.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<&ReportSchedule> {
        self.schedules.iter().filter(|s| s.is_due(now)).collect()
    }

    /// Record a run and roll the schedule forward to its next due time.
    ///
    /// A schedule whose expression yields no further run within the search
    /// bound is deactivated. Returns `false` for unknown identifiers.
    pub fn mark_run(&mut self, schedule_id: &str, now: DateTime<Utc>) -> bool {
        let Some(schedule) = self
            .schedules
            .iter_mut()
            .find(|s| s.schedule_id == schedule_id)
        else {
            return false;
        };
        schedule.last_run = Some(now);
        match next_run(&schedule.cron_expression, now) {
            Ok(next) => schedule.next_run = Some(next),
            Err(e) => {
                tracing::warn!(
                    schedule_id,
                    expression = %schedule.cron_expression,
                    error = %e,
                    "schedule has no further run; deactivating"
                );
                schedule.next_run = None;
                schedule.active = false;
            }
        }
        true
    }

    /// All registered schedules.
    pub fn schedules(&self) -> &[ReportSchedule] {
        &self.schedules
    }

    /// Number of registered schedules.
    pub fn schedule_count(&self) -> usize {
        self.schedules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn new_schedule_computes_first_due_time() {
        let now = at(2026, 1, 15, 10, 30);
        let schedule = ReportSchedule::new("Monthly compliance report", "0 6 1 * *", now).unwrap();
        assert!(schedule.active);
        assert!(schedule.last_run.is_none());
        assert_eq!(schedule.next_run, Some(at(2026, 2, 1, 6, 0)));
        assert!(!schedule.schedule_id.is_empty());
    }

    #[test]
    fn new_schedule_rejects_malformed_expression() {
        let err = ReportSchedule::new("Broken", "0 6 1", at(2026, 1, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedExpression { .. }));
    }

    #[test]
    fn new_schedule_rejects_unsatisfiable_expression() {
        let err = ReportSchedule::new("Never", "0 0 31 2 *", at(2026, 1, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, ScheduleError::SearchExhausted { .. }));
    }

    #[test]
    fn schedule_is_due_once_next_run_passes() {
        let now = at(2026, 1, 15, 10, 30);
        let schedule = ReportSchedule::new("Daily digest", "0 6 * * *", now).unwrap();
        assert!(!schedule.is_due(now));
        assert!(schedule.is_due(at(2026, 1, 16, 6, 0)));
        assert!(schedule.is_due(at(2026, 1, 16, 7, 0)));
    }

    #[test]
    fn inactive_schedule_is_never_due() {
        let now = at(2026, 1, 15, 10, 30);
        let mut schedule = ReportSchedule::new("Daily digest", "0 6 * * *", now).unwrap();
        schedule.active = false;
        assert!(!schedule.is_due(at(2026, 1, 16, 6, 0)));
    }

    #[test]
    fn scheduler_due_and_mark_run_roll_forward() {
        let now = at(2026, 1, 15, 10, 30);
        let mut scheduler = ReportScheduler::new();
        let id = scheduler.add(ReportSchedule::new("Daily digest", "0 6 * * *", now).unwrap());

        let later = at(2026, 1, 16, 6, 0);
        let due = scheduler.due(later);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].schedule_id, id);

        assert!(scheduler.mark_run(&id, later));
        let schedule = scheduler.get(&id).unwrap();
        assert_eq!(schedule.last_run, Some(later));
        assert_eq!(schedule.next_run, Some(at(2026, 1, 17, 6, 0)));
        assert!(scheduler.due(later).is_empty());
    }

    #[test]
    fn mark_run_unknown_id_returns_false() {
        let mut scheduler = ReportScheduler::new();
        assert!(!scheduler.mark_run("nonexistent", at(2026, 1, 1, 0, 0)));
    }

    #[test]
    fn deactivate_lifecycle() {
        let now = at(2026, 1, 15, 10, 30);
        let mut scheduler = ReportScheduler::new();
        let id = scheduler.add(ReportSchedule::new("Weekly report", "0 8 * * 1", now).unwrap());

        assert!(scheduler.deactivate(&id));
        assert!(!scheduler.get(&id).unwrap().active);
        // Deactivating again reports false.
        assert!(!scheduler.deactivate(&id));
        assert!(!scheduler.deactivate("nonexistent"));
    }

    #[test]
    fn scheduler_counts_and_accessors() {
        let now = at(2026, 1, 15, 10, 30);
        let mut scheduler = ReportScheduler::new();
        assert_eq!(scheduler.schedule_count(), 0);
        scheduler.add(ReportSchedule::new("A", "0 6 * * *", now).unwrap());
        scheduler.add(ReportSchedule::new("B", "0 7 * * *", now).unwrap());
        assert_eq!(scheduler.schedule_count(), 2);
        assert_eq!(scheduler.schedules().len(), 2);
        assert!(scheduler.get("missing").is_none());
    }

    #[test]
    fn schedule_serde_roundtrip() {
        let schedule =
            ReportSchedule::new("Monthly report", "0 6 1 * *", at(2026, 1, 15, 10, 30)).unwrap();
        let json = serde_json::to_string(&schedule).unwrap();
        let back: ReportSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }
}
