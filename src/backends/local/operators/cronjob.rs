// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use cron::Schedule;
use serde::Deserialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::collect_or_cancel;
use crate::config::decode_operator_config;
use crate::engine::NodeContext;
use crate::traits::{Message, Operator};

#[derive(Debug, Deserialize)]
struct CronjobConfig {
    #[serde(default)]
    jobs: Vec<JobConfig>,
}

#[derive(Debug, Deserialize)]
struct JobConfig {
    cronjob: String,
    #[serde(default)]
    tag: String,
}

/// One parsed schedule and the tag it emits.
#[derive(Debug, Clone)]
pub struct CronJob {
    expression: String,
    schedule: Schedule,
    tag: String,
}

impl CronJob {
    /// Parse a six-field expression (seconds first) or a descriptor such as `@hourly`.
    pub fn parse(expression: &str, tag: impl Into<String>) -> anyhow::Result<Self> {
        let schedule = Schedule::from_str(expression)
            .map_err(|e| anyhow::anyhow!("invalid crontab '{}': {}", expression, e))?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
            tag: tag.into(),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// First fire time strictly after `at`, if the schedule has one.
    pub fn next_after<Z: TimeZone>(&self, at: &DateTime<Z>) -> Option<DateTime<Z>> {
        self.schedule.after(at).next()
    }
}

/// Source emitting each job's tag whenever its schedule fires.
///
/// Schedules are evaluated in local time. Jobs due at the same instant fire
/// in configured order.
#[derive(Debug, Clone)]
pub struct CronjobTimer {
    jobs: Vec<CronJob>,
}

impl CronjobTimer {
    pub fn new(jobs: Vec<CronJob>) -> Self {
        Self { jobs }
    }

    pub fn from_config(config: &serde_yaml::Value) -> anyhow::Result<Self> {
        let config: CronjobConfig = decode_operator_config(config)
            .map_err(|e| anyhow::anyhow!("invalid timer/cronjob configuration: {}", e))?;
        let jobs = config
            .jobs
            .into_iter()
            .map(|job| CronJob::parse(&job.cronjob, job.tag))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| anyhow::anyhow!("invalid timer/cronjob configuration: {}", e))?;
        Ok(Self::new(jobs))
    }

    pub fn jobs(&self) -> &[CronJob] {
        &self.jobs
    }
}

#[async_trait]
impl Operator for CronjobTimer {
    async fn run(&self, cancel: CancellationToken, ctx: NodeContext) -> anyhow::Result<()> {
        let now = Local::now();
        let mut pending: Vec<(DateTime<Local>, &CronJob)> = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            ctx.logger().trace(
                &ctx,
                format_args!("added cronjob, crontab: [{}], tag: [{}]", job.expression, job.tag),
            );
            if let Some(at) = job.next_after(&now) {
                pending.push((at, job));
            }
        }

        loop {
            let Some(due) = pending.iter().map(|(at, _)| *at).min() else {
                cancel.cancelled().await;
                return Ok(());
            };
            let delay = (due - Local::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep_until(Instant::now() + delay) => {}
            }

            let mut rescheduled = Vec::with_capacity(pending.len());
            for (at, job) in pending {
                if at > due {
                    rescheduled.push((at, job));
                    continue;
                }
                ctx.logger().trace(
                    &ctx,
                    format_args!("cronjob triggered, crontab: [{}], tag: [{}]", job.expression, job.tag),
                );
                if !collect_or_cancel(&cancel, &ctx, Message::from(job.tag.as_str())).await {
                    return Ok(());
                }
                if let Some(next) = job.next_after(&at) {
                    rescheduled.push((next, job));
                }
            }
            pending = rescheduled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_jobs_decode_in_order() {
        let blob: serde_yaml::Value = serde_yaml::from_str(
            r#"
jobs:
  - cronjob: "*/1 * * * * *"
    tag: hello
  - cronjob: "0 0 12 * * *"
    tag: noon
"#,
        )
        .unwrap();

        let timer = CronjobTimer::from_config(&blob).unwrap();
        let tags: Vec<&str> = timer.jobs().iter().map(CronJob::tag).collect();
        assert_eq!(tags, vec!["hello", "noon"]);
        assert_eq!(timer.jobs()[0].expression(), "*/1 * * * * *");
    }

    #[test]
    fn test_missing_jobs_is_an_idle_timer() {
        let timer = CronjobTimer::from_config(&serde_yaml::Value::Null).unwrap();
        assert!(timer.jobs().is_empty());
    }

    #[test]
    fn test_bad_expression_is_rejected() {
        let blob: serde_yaml::Value = serde_yaml::from_str(
            r#"
jobs:
  - cronjob: "*/1 * * * * *"
    tag: fine
  - cronjob: "every tuesday"
    tag: broken
"#,
        )
        .unwrap();

        let err = CronjobTimer::from_config(&blob).unwrap_err();
        assert!(err.to_string().contains("timer/cronjob"));
        assert!(err.to_string().contains("every tuesday"));
    }

    #[test]
    fn test_job_without_expression_is_rejected() {
        let blob: serde_yaml::Value = serde_yaml::from_str("jobs: [{ tag: orphan }]").unwrap();
        assert!(CronjobTimer::from_config(&blob).is_err());
    }

    #[test]
    fn test_next_fire_time() {
        let job = CronJob::parse("0 0 12 * * *", "noon").unwrap();
        let morning = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap();

        assert_eq!(
            job.next_after(&morning),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(
            job.next_after(&evening),
            Some(Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_every_second_schedule_advances_by_one_second() {
        let job = CronJob::parse("*/1 * * * * *", "tick").unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 10).unwrap();
        assert_eq!(
            job.next_after(&at),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 11).unwrap())
        );
    }
}
