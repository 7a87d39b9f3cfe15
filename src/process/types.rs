/*!
 * Process Types
 * Common types for process control and the record state machine
 */

use crate::core::types::Pid;
use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Spawn failed for '{name}': {errno}")]
    SpawnFailed { name: String, errno: Errno },

    #[error("Invalid command '{0}': contains an interior NUL byte")]
    InvalidCommand(String),

    #[error("Failed to suspend PID {pid}: {errno}")]
    SuspendFailed { pid: Pid, errno: Errno },

    #[error("Failed to resume PID {pid}: {errno}")]
    ResumeFailed { pid: Pid, errno: Errno },

    #[error("Failed to wait for PID {pid}: {errno}")]
    WaitFailed { pid: Pid, errno: Errno },

    #[error("Failed to install child exit handler: {0}")]
    SignalHandlerFailed(Errno),

    #[error("Sleep failed: {0}")]
    SleepFailed(Errno),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Execution error: {0}")]
    ExecutionError(String),
}

/// Process state
///
/// Ready -> Running -> {Stopped <-> Running} -> Exited
///
/// Stopped -> Exited covers a child whose exit raced its stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Parsed, never launched
    Ready,
    /// The child is executing
    Running,
    /// Preempted with a stop signal, waiting in its queue
    Stopped,
    /// Terminated and reaped (terminal)
    Exited,
}

impl ProcessState {
    /// Whether the state machine allows `self -> to`
    #[inline]
    pub const fn can_transition_to(self, to: ProcessState) -> bool {
        matches!(
            (self, to),
            (ProcessState::Ready, ProcessState::Running)
                | (ProcessState::Running, ProcessState::Stopped)
                | (ProcessState::Running, ProcessState::Exited)
                | (ProcessState::Stopped, ProcessState::Running)
                | (ProcessState::Stopped, ProcessState::Exited)
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Exited => "exited",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of letting a child run for one quantum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    /// The full quantum elapsed
    Elapsed,
    /// The sleep was cut short because a child exited
    ChildExited,
}

/// Result of sending a continue signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// The stopped child is running again
    Resumed,
    /// The child exited and was reaped while it sat in the queue
    AlreadyExited,
}
