/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::process::types::ProcessError;

/// Input file errors
#[derive(Error, Debug, Diagnostic)]
pub enum InputError {
    #[error("Failed to open input file {path}")]
    #[diagnostic(
        code(input::open_failed),
        help("Check that the file exists and is readable.")
    )]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read input file {path}")]
    #[diagnostic(code(input::read_failed))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Line {line}: field {field} is not an integer: '{value}'")]
    #[diagnostic(
        code(input::invalid_field),
        help("Fields are tab separated: <executable>\\t<priority|estimate>[\\t<estimate>]")
    )]
    InvalidField {
        line: usize,
        field: usize,
        value: String,
    },
}

/// Report output errors
#[derive(Error, Debug, Diagnostic)]
pub enum ReportError {
    #[error("Failed to write report to {path}")]
    #[diagnostic(
        code(report::write_failed),
        help("Check permissions of the report directory or set SCHEDULER_REPORT_PATH.")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    #[diagnostic(code(report::serialize_failed))]
    Serialize(#[from] serde_json::Error),
}

/// Unified scheduler error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SchedulerError {
    #[error("Process error: {0}")]
    #[diagnostic(
        code(scheduler::process),
        help("A process control call failed; the scheduler cannot continue.")
    )]
    Process(#[from] ProcessError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),
}
