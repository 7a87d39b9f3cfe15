/*!
 * Process Traits
 * Process control abstraction consumed by the policy engine
 */

use super::types::{ProcessResult, ResumeOutcome, SleepOutcome};
use crate::core::clock::Clock;
use crate::core::types::Pid;
use std::time::Duration;

/// Launch, preempt and reap child processes.
///
/// Every failing call is fatal to the scheduler; implementations report the
/// failure and the engine propagates it.
pub trait ProcessController: Clock {
    /// Create a child running `name` with no arguments, inheriting the
    /// environment and standard streams. Returns the OS pid.
    fn launch(&mut self, name: &str) -> ProcessResult<Pid>;

    /// Send a stop signal. A child that already exited and was reaped is not
    /// an error; the child-finished indicator reports it instead.
    fn suspend(&mut self, pid: Pid) -> ProcessResult<()>;

    /// Send a continue signal. A child that exited while stopped, and whose
    /// exit notification was already consumed, is reported as
    /// [`ResumeOutcome::AlreadyExited`].
    fn resume(&mut self, pid: Pid) -> ProcessResult<ResumeOutcome>;

    /// Block until `pid` terminates, returning its exit status
    fn wait_for_exit(&mut self, pid: Pid) -> ProcessResult<i32>;

    /// Block for up to `duration`, returning early if a watched child exits
    fn sleep_or_interrupt(&mut self, duration: Duration) -> ProcessResult<SleepOutcome>;

    /// Consume the one-shot "child finished" indicator
    fn take_child_finished(&mut self) -> bool;

    /// Install the asynchronous child-exit notification
    fn watch_children(&mut self) -> ProcessResult<()>;

    /// Remove the asynchronous child-exit notification
    fn unwatch_children(&mut self) -> ProcessResult<()>;
}
