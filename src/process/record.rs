/*!
 * Process Record
 * Descriptor for one schedulable executable and its accumulated statistics
 */

use super::types::{ProcessError, ProcessResult, ProcessState};
use crate::core::limits::{clamp_priority, MIN_PRIORITY};
use crate::core::types::{Pid, Priority, Timestamp};
use crate::scheduler::types::SchedulingPolicy;
use serde::Serialize;
use std::time::Duration;

/// One schedulable unit of work.
///
/// A record is moved, never cloned, between queues: whichever container holds
/// it owns its `name`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    name: String,
    pid: Pid,
    priority: Priority,
    estimated_time: u32,
    burst_time: Duration,
    #[serde(skip)]
    created_at: Timestamp,
    completion_time: Duration,
    scheduler_time: Duration,
    rounds: u32,
    state: ProcessState,
}

impl ProcessRecord {
    /// Create a ready record. `priority` is clamped to the bucket range.
    pub fn new(name: String, priority: i64, estimated_time: u32, created_at: Timestamp) -> Self {
        Self {
            name,
            pid: 0,
            priority: clamp_priority(priority),
            estimated_time,
            burst_time: Duration::ZERO,
            created_at,
            completion_time: Duration::ZERO,
            scheduler_time: Duration::ZERO,
            rounds: 0,
            state: ProcessState::Ready,
        }
    }

    /// Build a record from the numeric fields of one input line.
    ///
    /// With a single numeric field its meaning depends on the policy: priority
    /// for PRIO, estimated time otherwise. With two, the first is the priority
    /// and the second the estimated time.
    pub fn from_fields(
        name: String,
        numbers: &[i64],
        policy: SchedulingPolicy,
        created_at: Timestamp,
    ) -> Self {
        let (priority, estimated) = match numbers {
            [] => (MIN_PRIORITY as i64, 0),
            [second] if policy.is_priority_based() => (*second, 0),
            [second] => (MIN_PRIORITY as i64, *second),
            [second, third, ..] => (*second, *third),
        };
        let estimated = estimated.clamp(0, u32::MAX as i64) as u32;
        Self::new(name, priority, estimated, created_at)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn estimated_time(&self) -> u32 {
        self.estimated_time
    }

    /// Time actually spent running, summed over every run segment
    pub fn burst_time(&self) -> Duration {
        self.burst_time
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Creation to exit; zero until the record has exited
    pub fn completion_time(&self) -> Duration {
        self.completion_time
    }

    /// Scheduler start to exit; zero until the record has exited
    pub fn scheduler_time(&self) -> Duration {
        self.scheduler_time
    }

    /// Number of times the record was launched or resumed
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_launched(&self) -> bool {
        self.pid != 0
    }

    fn transition(&mut self, expected: ProcessState, to: ProcessState) -> ProcessResult<()> {
        if self.state != expected || !self.state.can_transition_to(to) {
            return Err(ProcessError::InvalidStateTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Ready -> Running once the OS process exists
    pub fn mark_launched(&mut self, pid: Pid) -> ProcessResult<()> {
        self.transition(ProcessState::Ready, ProcessState::Running)?;
        self.pid = pid;
        self.rounds += 1;
        Ok(())
    }

    /// Stopped -> Running after a continue signal
    pub fn mark_resumed(&mut self) -> ProcessResult<()> {
        self.transition(ProcessState::Stopped, ProcessState::Running)?;
        self.rounds += 1;
        Ok(())
    }

    /// Running -> Stopped, crediting the segment that just ended
    pub fn mark_preempted(&mut self, ran: Duration) -> ProcessResult<()> {
        self.transition(ProcessState::Running, ProcessState::Stopped)?;
        self.burst_time += ran;
        Ok(())
    }

    /// Running (or Stopped, for a child found already reaped) -> Exited,
    /// finalizing every timing field
    pub fn mark_exited(
        &mut self,
        ran: Duration,
        exited_at: Timestamp,
        scheduler_started: Timestamp,
    ) -> ProcessResult<()> {
        let from = match self.state {
            ProcessState::Stopped => ProcessState::Stopped,
            _ => ProcessState::Running,
        };
        self.transition(from, ProcessState::Exited)?;
        self.burst_time += ran;
        self.completion_time = exited_at.saturating_sub(self.created_at);
        self.scheduler_time = exited_at.saturating_sub(scheduler_started);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(priority: i64) -> ProcessRecord {
        ProcessRecord::new("./job".to_string(), priority, 0, Duration::ZERO)
    }

    #[test]
    fn test_new_record_defaults() {
        let rec = ProcessRecord::new("./a".to_string(), 3, 40, Duration::from_millis(5));
        assert_eq!(rec.state(), ProcessState::Ready);
        assert_eq!(rec.pid(), 0);
        assert!(!rec.is_launched());
        assert_eq!(rec.burst_time(), Duration::ZERO);
        assert_eq!(rec.scheduler_time(), Duration::ZERO);
        assert_eq!(rec.created_at(), Duration::from_millis(5));
        assert_eq!(rec.priority(), 3);
        assert_eq!(rec.estimated_time(), 40);
    }

    #[test]
    fn test_priority_clamped() {
        assert_eq!(record(-1).priority(), 0);
        assert_eq!(record(99).priority(), 15);
    }

    #[test]
    fn test_two_fields_depend_on_policy() {
        let prio = ProcessRecord::from_fields(
            "./a".into(),
            &[7],
            SchedulingPolicy::Priority,
            Duration::ZERO,
        );
        assert_eq!((prio.priority(), prio.estimated_time()), (7, 0));

        for policy in [
            SchedulingPolicy::Fcfs,
            SchedulingPolicy::Sjf,
            SchedulingPolicy::RoundRobin,
        ] {
            let rec = ProcessRecord::from_fields("./a".into(), &[7], policy, Duration::ZERO);
            assert_eq!((rec.priority(), rec.estimated_time()), (0, 7));
        }
    }

    #[test]
    fn test_three_fields_ignore_policy() {
        for policy in [SchedulingPolicy::Sjf, SchedulingPolicy::Priority] {
            let rec = ProcessRecord::from_fields("./a".into(), &[20, 5], policy, Duration::ZERO);
            assert_eq!((rec.priority(), rec.estimated_time()), (15, 5));
        }
    }

    #[test]
    fn test_negative_estimate_clamped() {
        let rec = ProcessRecord::from_fields(
            "./a".into(),
            &[-10],
            SchedulingPolicy::Sjf,
            Duration::ZERO,
        );
        assert_eq!(rec.estimated_time(), 0);
    }

    #[test]
    fn test_full_lifecycle_accumulates_burst() {
        let mut rec = ProcessRecord::new("./a".into(), 0, 0, Duration::from_millis(10));
        rec.mark_launched(1234).unwrap();
        rec.mark_preempted(Duration::from_millis(100)).unwrap();
        rec.mark_resumed().unwrap();
        rec.mark_exited(
            Duration::from_millis(30),
            Duration::from_millis(500),
            Duration::from_millis(2),
        )
        .unwrap();

        assert_eq!(rec.state(), ProcessState::Exited);
        assert_eq!(rec.pid(), 1234);
        assert_eq!(rec.rounds(), 2);
        assert_eq!(rec.burst_time(), Duration::from_millis(130));
        assert_eq!(rec.completion_time(), Duration::from_millis(490));
        assert_eq!(rec.scheduler_time(), Duration::from_millis(498));
    }

    #[test]
    fn test_cannot_launch_twice() {
        let mut rec = record(0);
        rec.mark_launched(10).unwrap();
        rec.mark_preempted(Duration::from_millis(1)).unwrap();
        assert!(rec.mark_launched(11).is_err());
        assert_eq!(rec.pid(), 10);
    }

    #[test]
    fn test_exited_is_terminal() {
        let mut rec = record(0);
        rec.mark_launched(1).unwrap();
        rec.mark_exited(Duration::ZERO, Duration::ZERO, Duration::ZERO)
            .unwrap();

        let err = rec.mark_resumed().unwrap_err();
        assert_eq!(
            err,
            ProcessError::InvalidStateTransition {
                from: ProcessState::Exited,
                to: ProcessState::Running,
            }
        );
        assert!(rec
            .mark_exited(Duration::ZERO, Duration::ZERO, Duration::ZERO)
            .is_err());
    }

    #[test]
    fn test_cannot_resume_ready_record() {
        let mut rec = record(0);
        assert!(rec.mark_resumed().is_err());
        assert!(rec.mark_preempted(Duration::ZERO).is_err());
        assert_eq!(rec.state(), ProcessState::Ready);
        assert_eq!(rec.rounds(), 0);
    }

    #[test]
    fn test_stopped_record_can_exit_without_running() {
        let mut rec = record(0);
        assert!(rec
            .mark_exited(Duration::ZERO, Duration::ZERO, Duration::ZERO)
            .is_err());

        rec.mark_launched(5).unwrap();
        rec.mark_preempted(Duration::from_millis(40)).unwrap();
        rec.mark_exited(Duration::ZERO, Duration::from_millis(60), Duration::ZERO)
            .unwrap();

        assert_eq!(rec.state(), ProcessState::Exited);
        assert_eq!(rec.rounds(), 1);
        assert_eq!(rec.burst_time(), Duration::from_millis(40));
        assert_eq!(rec.completion_time(), Duration::from_millis(60));
    }
}
