//! One-shot and weekly job scheduling
//!
//! The scheduler is an explicitly owned instance with an init/shutdown
//! lifecycle; everything that schedules jobs holds a clone of it. Jobs are
//! process-local tokio tasks: a restart forgets them, and the campaign
//! engine re-arms reminder chains from the durable `next_reminder_at`
//! timestamps instead.
//!
//! Firing guarantees are "no earlier than": a job fires at or after its
//! fire time, exactly once, and is then discarded.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDateTime, NaiveTime, Utc, Weekday};
use dashmap::DashMap;
use log::{debug, info};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Process-wide scheduled-job facility
///
/// Cheap to clone; all clones share the same job registry.
#[derive(Clone, Default)]
pub struct ReminderScheduler {
    jobs: Arc<DashMap<String, JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-shot job firing at or after `fire_at`.
    ///
    /// The job id is advisory bookkeeping for [`cancel`](Self::cancel):
    /// duplicate ids are not rejected, both jobs still fire, and the
    /// registry entry is last-writer-wins.
    pub fn schedule_at<F>(&self, fire_at: DateTime<Utc>, job_id: &str, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = (fire_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        debug!("Scheduling job {job_id} in {}s", delay.as_secs());

        let registry = Arc::clone(&self.jobs);
        let id = job_id.to_string();
        let handle = tokio::spawn({
            let id = id.clone();
            async move {
                tokio::time::sleep(delay).await;
                job.await;
                registry.remove(&id);
            }
        });

        // Dropping a replaced handle detaches the older task; it runs on
        if self.jobs.insert(id, handle).is_some() {
            debug!("Job id {job_id} re-registered; previous entry replaced");
        }
    }

    /// Register a repeating job firing weekly at `weekday` `hour:minute`
    /// (UTC). Used for the cron-style campaign trigger.
    pub fn schedule_weekly<F, Fut>(
        &self,
        weekday: Weekday,
        hour: u32,
        minute: u32,
        job_id: &str,
        job: F,
    ) where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                let next = next_occurrence(Utc::now(), weekday, hour, minute);
                let delay = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                debug!("Next weekly firing at {next} (in {}s)", delay.as_secs());
                tokio::time::sleep(delay).await;
                job().await;
            }
        });

        self.jobs.insert(job_id.to_string(), handle);
    }

    /// Abort a registered job. Returns whether one was found.
    pub fn cancel(&self, job_id: &str) -> bool {
        match self.jobs.remove(job_id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of jobs currently registered
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Abort every outstanding job. Pending reminders are recovered on the
    /// next start from the contacts' durable next-fire timestamps.
    pub fn shutdown(&self) {
        let outstanding = self.jobs.len();
        self.jobs.retain(|_, handle| {
            handle.abort();
            false
        });
        if outstanding > 0 {
            info!("Scheduler shut down, {outstanding} pending job(s) aborted");
        }
    }
}

/// Next occurrence of `weekday` at `hour:minute` strictly after `after`.
///
/// Out-of-range hour/minute values are clamped.
pub fn next_occurrence(
    after: DateTime<Utc>,
    weekday: Weekday,
    hour: u32,
    minute: u32,
) -> DateTime<Utc> {
    let days_ahead = (weekday.num_days_from_monday() + 7
        - after.weekday().num_days_from_monday())
        % 7;
    let date = after.date_naive() + ChronoDuration::days(days_ahead as i64);
    let time = NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or(NaiveTime::MIN);
    let candidate = NaiveDateTime::new(date, time).and_utc();

    if candidate <= after {
        candidate + ChronoDuration::days(7)
    } else {
        candidate
    }
}

/// Parse a `mon`..`sun` (or full-name) weekday argument
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
