/*!
 * Configuration
 * Command-line arguments and environment settings
 */

use crate::core::limits::DEFAULT_REPORT_PATH;
use crate::scheduler::{SchedulingPolicy, TimeQuantum};
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Usage text printed for any invalid invocation
pub const USAGE: &str = "\
Usage: scheduler <policy> [quantum_ms] <input_file>

Policies:
  fcfs | batch   first-come-first-served            scheduler fcfs jobs.txt
  sjf            shortest-job-first                 scheduler sjf jobs.txt
  rr             round-robin, quantum in ms         scheduler rr 500 jobs.txt
  prio           priority round-robin, quantum in ms scheduler prio 500 jobs.txt

Environment:
  SCHEDULER_REPORT_PATH    report file (default: scheduler_information.txt)
  SCHEDULER_REPORT_FORMAT  set to 'json' to also write <report>.json
  SCHEDULER_TRACE_JSON     set to 1 for JSON logs
  RUST_LOG                 log filter (default: info)";

/// Invalid invocation, detected before any scheduling
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Insert a scheduling policy.")]
    #[diagnostic(code(config::missing_policy))]
    MissingPolicy,

    #[error("Insert a filename.")]
    #[diagnostic(code(config::missing_filename))]
    MissingFilename,

    #[error("{0} policy only needs the filename")]
    #[diagnostic(code(config::extra_arguments))]
    OnlyFilename(String),

    #[error("{0} policy needs a quantum and the filename")]
    #[diagnostic(code(config::missing_quantum))]
    NeedsQuantum(String),

    #[error("{0} policy only needs a quantum and the filename")]
    #[diagnostic(code(config::extra_arguments))]
    OnlyQuantumAndFilename(String),

    #[error("Not a valid policy!")]
    #[diagnostic(code(config::invalid_policy))]
    InvalidPolicy(String),

    #[error("Invalid quantum '{0}': expected a positive number of milliseconds")]
    #[diagnostic(code(config::invalid_quantum))]
    InvalidQuantum(String),
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub policy: SchedulingPolicy,
    pub quantum: Option<TimeQuantum>,
    pub input: PathBuf,
    pub report_path: PathBuf,
    pub json_report: bool,
}

impl Config {
    /// Parse positional arguments (program name excluded)
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (raw_policy, rest) = args.split_first().ok_or(ConfigError::MissingPolicy)?;

        let policy = raw_policy
            .parse::<SchedulingPolicy>()
            .map_err(|_| ConfigError::InvalidPolicy(raw_policy.clone()))?;
        let name = policy.as_str().to_uppercase();

        let (quantum, input) = if policy.is_preemptive() {
            match rest {
                [quantum, input] => (Some(parse_quantum(quantum)?), input),
                [] | [_] => return Err(ConfigError::NeedsQuantum(name)),
                _ => return Err(ConfigError::OnlyQuantumAndFilename(name)),
            }
        } else {
            match rest {
                [input] => (None, input),
                [] => return Err(ConfigError::MissingFilename),
                _ => return Err(ConfigError::OnlyFilename(name)),
            }
        };

        Ok(Self {
            policy,
            quantum,
            input: PathBuf::from(input),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            json_report: false,
        })
    }

    /// Apply `SCHEDULER_REPORT_PATH` / `SCHEDULER_REPORT_FORMAT` style values
    pub fn with_report_settings(mut self, path: Option<String>, format: Option<String>) -> Self {
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            self.report_path = PathBuf::from(path);
        }
        self.json_report = format
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        self
    }

    /// Process arguments plus environment
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::from_args(std::env::args().skip(1))?.with_report_settings(
            std::env::var("SCHEDULER_REPORT_PATH").ok(),
            std::env::var("SCHEDULER_REPORT_FORMAT").ok(),
        ))
    }
}

fn parse_quantum(raw: &str) -> Result<TimeQuantum, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(|ms| TimeQuantum::from_millis(ms).ok())
        .ok_or_else(|| ConfigError::InvalidQuantum(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fcfs_and_batch() {
        for name in ["fcfs", "FCFS", "batch", "Batch"] {
            let config = Config::from_args([name, "jobs.txt"]).unwrap();
            assert_eq!(config.policy, SchedulingPolicy::Fcfs);
            assert_eq!(config.quantum, None);
            assert_eq!(config.input, PathBuf::from("jobs.txt"));
        }
    }

    #[test]
    fn test_rr_with_quantum() {
        let config = Config::from_args(["rr", "500", "jobs.txt"]).unwrap();
        assert_eq!(config.policy, SchedulingPolicy::RoundRobin);
        assert_eq!(config.quantum.map(|q| q.as_millis()), Some(500));
        assert_eq!(config.report_path, PathBuf::from(DEFAULT_REPORT_PATH));
    }

    #[test]
    fn test_usage_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(Config::from_args(empty), Err(ConfigError::MissingPolicy));
        assert_eq!(Config::from_args(["sjf"]), Err(ConfigError::MissingFilename));
        assert_eq!(
            Config::from_args(["sjf", "a", "b"]),
            Err(ConfigError::OnlyFilename("SJF".into()))
        );
        assert_eq!(
            Config::from_args(["prio", "jobs.txt"]),
            Err(ConfigError::NeedsQuantum("PRIO".into()))
        );
        assert_eq!(
            Config::from_args(["rr", "1", "a", "b"]),
            Err(ConfigError::OnlyQuantumAndFilename("RR".into()))
        );
        assert_eq!(
            Config::from_args(["lottery", "a"]),
            Err(ConfigError::InvalidPolicy("lottery".into()))
        );
        assert_eq!(
            Config::from_args(["rr", "0", "a"]),
            Err(ConfigError::InvalidQuantum("0".into()))
        );
        assert_eq!(
            Config::from_args(["rr", "fast", "a"]),
            Err(ConfigError::InvalidQuantum("fast".into()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ConfigError::MissingPolicy.to_string(), "Insert a scheduling policy.");
        assert_eq!(
            ConfigError::OnlyFilename("FCFS".into()).to_string(),
            "FCFS policy only needs the filename"
        );
        assert_eq!(
            ConfigError::NeedsQuantum("RR".into()).to_string(),
            "RR policy needs a quantum and the filename"
        );
    }

    #[test]
    fn test_report_settings() {
        let config = Config::from_args(["fcfs", "jobs.txt"])
            .unwrap()
            .with_report_settings(Some("out/report.txt".into()), Some("JSON".into()));
        assert_eq!(config.report_path, PathBuf::from("out/report.txt"));
        assert!(config.json_report);

        let config = Config::from_args(["fcfs", "jobs.txt"])
            .unwrap()
            .with_report_settings(Some("  ".into()), None);
        assert_eq!(config.report_path, PathBuf::from(DEFAULT_REPORT_PATH));
        assert!(!config.json_report);
    }
}
