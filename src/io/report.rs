/*!
 * Scheduler Report
 * Human-readable and JSON renditions of a completed schedule
 */

use crate::core::errors::ReportError;
use crate::core::types::Pid;
use crate::scheduler::{RunStats, Schedule, SchedulingPolicy};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One completed record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub pid: Pid,
    pub name: String,
    pub priority: u8,
    pub estimated_time: u32,
    pub rounds: u32,
    pub burst_secs: f64,
    pub completion_secs: f64,
    pub scheduler_secs: f64,
}

/// Report over a whole run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: String,
    pub file: String,
    pub policy: SchedulingPolicy,
    pub entries: Vec<ReportEntry>,
    pub scheduler_secs: f64,
    pub total_completion_secs: f64,
    pub stats: RunStats,
}

impl Report {
    /// Build from a schedule. `scheduler_time` is the overall wall time
    /// reported in the footer.
    pub fn new(schedule: &Schedule, input: &Path, scheduler_time: Duration) -> Self {
        let entries = schedule
            .completed
            .iter()
            .map(|record| ReportEntry {
                pid: record.pid(),
                name: record.name().to_string(),
                priority: record.priority(),
                estimated_time: record.estimated_time(),
                rounds: record.rounds(),
                burst_secs: record.burst_time().as_secs_f64(),
                completion_secs: record.completion_time().as_secs_f64(),
                scheduler_secs: record.scheduler_time().as_secs_f64(),
            })
            .collect();

        Self {
            run_id: schedule.run_id.clone(),
            file: input.display().to_string(),
            policy: schedule.policy,
            entries,
            scheduler_secs: scheduler_time.as_secs_f64(),
            total_completion_secs: schedule.total_completion_time().as_secs_f64(),
            stats: schedule.stats,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the text rendition to `path`
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_string()).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the JSON rendition to `<path>.json`, returning that path
    pub fn write_json_beside(&self, path: &Path) -> Result<PathBuf, ReportError> {
        let mut json_path = path.as_os_str().to_owned();
        json_path.push(".json");
        let json_path = PathBuf::from(json_path);

        fs::write(&json_path, self.to_json()?).map_err(|source| ReportError::Write {
            path: json_path.clone(),
            source,
        })?;
        Ok(json_path)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FILE: {}\nPOLICY: {}\n\n\n", self.file, self.policy.label())?;

        for entry in &self.entries {
            write!(
                f,
                "PID {} - CMD: {}\n--------------------------------\n",
                entry.pid, entry.name
            )?;
            write!(
                f,
                "Burst time: {:.3} secs\nCompletion time: {:.3} secs\nScheduler time: {:.3} secs\n\n",
                entry.burst_secs, entry.completion_secs, entry.scheduler_secs
            )?;
        }

        write!(
            f,
            "SCHEDULER TIME: {:.3} secs\nTOTAL PROCESS COMPLETION TIME: {:.3} secs\n\n",
            self.scheduler_secs, self.total_completion_secs
        )
    }
}
