//! Scheduled random-quote posts.
//!
//! A cron schedule in a fixed timezone fires a trigger; each trigger picks a
//! random quote, waits a jittered delay and posts it to the quotes room.
//! Triggers run as detached tasks, so a pending delay is simply lost on
//! restart.

mod jitter;

pub use jitter::Jitter;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::notify::{RoomNotifier, RoomSender};
use crate::plugins::quotes::SPEAKER;
use crate::quotes::QuoteQuery;

/// Cron expression bound to a timezone.
#[derive(Debug, Clone)]
pub struct QuoteSchedule {
    schedule: Schedule,
    timezone: Tz,
}

impl QuoteSchedule {
    /// Parse a cron expression (sec min hour dom month dow [year]) and an
    /// IANA timezone name.
    pub fn parse(expr: &str, timezone: &str) -> anyhow::Result<Self> {
        let schedule = Schedule::from_str(expr)
            .map_err(|e| anyhow::anyhow!("Invalid cron '{}': {}", expr, e))?;
        let timezone = Tz::from_str(timezone)
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", timezone, e))?;
        Ok(Self { schedule, timezone })
    }

    /// First occurrence strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
    }

    /// Next trigger to wait for, never at or before `last_fired`.
    ///
    /// A sleep can wake slightly before the instant it aimed at, so the
    /// clock alone would hand back the occurrence that just fired.
    pub fn next_trigger(
        &self,
        now: DateTime<Utc>,
        last_fired: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        let from = last_fired.map_or(now, |fired| now.max(fired));
        self.next_after(from).map(|next| next.with_timezone(&Utc))
    }
}

/// One scheduled post: pick, wait, send.
#[derive(Clone)]
pub struct ScheduledPost<S> {
    query: QuoteQuery,
    notifier: RoomNotifier<S>,
    jitter: Jitter,
    skip_when_quiet: bool,
}

impl<S: RoomSender> ScheduledPost<S> {
    pub fn new(
        query: QuoteQuery,
        notifier: RoomNotifier<S>,
        jitter: Jitter,
        skip_when_quiet: bool,
    ) -> Self {
        Self {
            query,
            notifier,
            jitter,
            skip_when_quiet,
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let line = self.query.random_line().await?;

        let delay = self.jitter.sample(&mut rand::thread_rng());
        info!("Scheduled quote will be posted in {:?}", delay);
        tokio::time::sleep(delay).await;

        let text = format!("{SPEAKER}{line}");
        if self.skip_when_quiet {
            if !self.notifier.avoid_spam_send(&text).await? {
                info!("Scheduled quote skipped, bot spoke last");
            }
        } else {
            self.notifier.send(&text).await?;
        }
        Ok(())
    }
}

/// Drives [`ScheduledPost`]s from a [`QuoteSchedule`].
pub struct QuoteScheduler<S> {
    schedule: QuoteSchedule,
    post: ScheduledPost<S>,
}

impl<S> QuoteScheduler<S>
where
    S: RoomSender + Clone + 'static,
{
    pub fn new(schedule: QuoteSchedule, post: ScheduledPost<S>) -> Self {
        Self { schedule, post }
    }

    /// Run the trigger loop in the background.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut last_fired = None;

        loop {
            let Some(next) = self.schedule.next_trigger(Utc::now(), last_fired) else {
                warn!("Quote schedule has no future occurrence, scheduler stopped");
                return;
            };

            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            info!("Next quote trigger at {} (in {:?})", next, wait);

            tokio::time::sleep(wait).await;
            last_fired = Some(next);

            let post = self.post.clone();
            tokio::spawn(async move {
                if let Err(e) = post.run().await {
                    error!("Scheduled quote failed: {}", e);
                }
            });
        }
    }
}
