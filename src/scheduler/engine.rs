/*!
 * Policy Engine
 *
 * Drives a [`ProcessController`] through FCFS, SJF, round-robin and priority
 * round-robin, producing the completed records in exit order.
 */

use super::loader::Workload;
use super::queue::ProcessQueue;
use super::stats::RunStats;
use super::table::PriorityTable;
use super::types::{SchedulingPolicy, TimeQuantum};
use crate::core::limits::EXEC_FAILURE_STATUS;
use crate::core::types::Timestamp;
use crate::monitoring::generate_run_id;
use crate::process::{
    ProcessController, ProcessError, ProcessRecord, ProcessResult, ProcessState, ResumeOutcome,
    SleepOutcome,
};
use std::time::Duration;
use tracing::{debug, info, info_span, warn};

/// Per-run state owned by the engine.
///
/// The child-exit indicator is not here: the controller owns it, since the
/// OS notification path has to reach it without going through the engine.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerContext {
    started_at: Timestamp,
    stats: RunStats,
}

impl SchedulerContext {
    pub fn new(started_at: Timestamp) -> Self {
        Self {
            started_at,
            stats: RunStats::default(),
        }
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }
}

/// Outcome of a scheduling run
#[derive(Debug)]
pub struct Schedule {
    pub run_id: String,
    pub policy: SchedulingPolicy,
    /// Exited records in the order they exited (bucket order for PRIO)
    pub completed: ProcessQueue,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub stats: RunStats,
}

impl Schedule {
    /// Scheduler wall-clock time for the whole run
    pub fn elapsed(&self) -> Duration {
        self.finished_at.saturating_sub(self.started_at)
    }

    /// Completion time of the last record to exit
    pub fn total_completion_time(&self) -> Duration {
        self.completed
            .back()
            .map(ProcessRecord::completion_time)
            .unwrap_or_default()
    }
}

/// Runs the scheduling policies over a process controller
pub struct PolicyEngine<C: ProcessController> {
    controller: C,
    context: SchedulerContext,
}

impl<C: ProcessController> PolicyEngine<C> {
    /// Create an engine; the scheduler start time is sampled now
    pub fn new(controller: C) -> Self {
        let started_at = controller.now();
        Self {
            controller,
            context: SchedulerContext::new(started_at),
        }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn context(&self) -> &SchedulerContext {
        &self.context
    }

    pub fn into_controller(self) -> C {
        self.controller
    }

    /// Run `workload` under `policy`. Preemptive policies need a quantum.
    pub fn run(
        &mut self,
        workload: Workload,
        policy: SchedulingPolicy,
        quantum: Option<TimeQuantum>,
    ) -> ProcessResult<Schedule> {
        let run_id = generate_run_id();
        let span = info_span!("schedule", policy = policy.as_str(), run_id = %run_id);
        let _entered = span.enter();

        info!(records = workload.len(), "Scheduling started");

        let completed = match (workload, policy) {
            (Workload::Queue(queue), SchedulingPolicy::Fcfs) => self.fcfs(queue)?,
            (Workload::Queue(queue), SchedulingPolicy::Sjf) => self.sjf(queue)?,
            (Workload::Queue(queue), SchedulingPolicy::RoundRobin) => {
                self.round_robin(queue, Self::require_quantum(policy, quantum)?)?
            }
            (Workload::Table(table), SchedulingPolicy::Priority) => {
                self.priority(table, Self::require_quantum(policy, quantum)?)?
            }
            (_, policy) => {
                return Err(ProcessError::ExecutionError(format!(
                    "workload shape does not match policy {}",
                    policy
                )))
            }
        };

        let stats = self.context.stats;
        info!(
            completed = completed.len(),
            launches = stats.launches,
            preemptions = stats.preemptions,
            context_switches = stats.context_switches(),
            "Scheduling finished"
        );

        Ok(Schedule {
            run_id,
            policy,
            completed,
            started_at: self.context.started_at,
            finished_at: self.controller.now(),
            stats,
        })
    }

    fn require_quantum(
        policy: SchedulingPolicy,
        quantum: Option<TimeQuantum>,
    ) -> ProcessResult<Duration> {
        quantum.map(|q| q.as_duration()).ok_or_else(|| {
            ProcessError::ExecutionError(format!("{} policy needs a quantum", policy))
        })
    }

    /// First-come-first-served: run each record to completion in queue order
    pub fn fcfs(&mut self, queue: ProcessQueue) -> ProcessResult<ProcessQueue> {
        self.run_to_completion(queue)
    }

    /// Shortest-job-first: same discipline as FCFS over an estimate-sorted queue
    pub fn sjf(&mut self, queue: ProcessQueue) -> ProcessResult<ProcessQueue> {
        self.run_to_completion(queue)
    }

    fn run_to_completion(&mut self, mut queue: ProcessQueue) -> ProcessResult<ProcessQueue> {
        let mut completed = ProcessQueue::new();

        while let Some(mut record) = queue.pop_front() {
            let pid = self.controller.launch(record.name())?;
            record.mark_launched(pid)?;
            self.context.stats.inc_launches();
            info!(pid, name = record.name(), "Currently running");

            let started = self.controller.now();
            let status = self.controller.wait_for_exit(pid)?;
            if status == EXEC_FAILURE_STATUS {
                warn!(pid, name = record.name(), "Child could not execute its image");
            }

            let exited_at = self.controller.now();
            self.finish(&mut record, exited_at.saturating_sub(started), exited_at)?;
            completed.append(record);
        }

        Ok(completed)
    }

    /// Round-robin: give each record up to `quantum`, re-queueing it at the
    /// tail when the quantum expires first
    pub fn round_robin(
        &mut self,
        mut queue: ProcessQueue,
        quantum: Duration,
    ) -> ProcessResult<ProcessQueue> {
        self.controller.watch_children()?;
        let result = self.drain_round_robin(&mut queue, quantum);
        let unwatched = self.controller.unwatch_children();
        let completed = result?;
        unwatched?;
        Ok(completed)
    }

    fn drain_round_robin(
        &mut self,
        queue: &mut ProcessQueue,
        quantum: Duration,
    ) -> ProcessResult<ProcessQueue> {
        let mut completed = ProcessQueue::new();

        while let Some(mut record) = queue.pop_front() {
            if self.controller.take_child_finished() {
                debug!("Discarding stale child exit notification");
            }
            if !self.dispatch(&mut record)? {
                // Exited while stopped; its notification was already consumed
                let exited_at = self.controller.now();
                self.finish(&mut record, Duration::ZERO, exited_at)?;
                completed.append(record);
                continue;
            }

            let started = self.controller.now();
            let outcome = self.controller.sleep_or_interrupt(quantum)?;
            let stopped_at = self.controller.now();
            let ran = stopped_at.saturating_sub(started);

            let exited = match outcome {
                SleepOutcome::ChildExited => true,
                SleepOutcome::Elapsed => {
                    self.controller.suspend(record.pid())?;
                    // The child may have exited between the sleep and the stop
                    self.controller.take_child_finished()
                }
            };

            if exited {
                self.finish(&mut record, ran, stopped_at)?;
                completed.append(record);
            } else {
                record.mark_preempted(ran)?;
                self.context.stats.inc_preemptions();
                info!(
                    pid = record.pid(),
                    name = record.name(),
                    ran_ms = ran.as_secs_f64() * 1000.0,
                    "Quantum expired, process stopped"
                );
                queue.append(record);
            }
        }

        Ok(completed)
    }

    /// Launch a ready record or resume a stopped one. Returns `false` when a
    /// stopped record turns out to have exited already.
    fn dispatch(&mut self, record: &mut ProcessRecord) -> ProcessResult<bool> {
        match record.state() {
            ProcessState::Ready => {
                let pid = self.controller.launch(record.name())?;
                record.mark_launched(pid)?;
                self.context.stats.inc_launches();
            }
            ProcessState::Stopped => match self.controller.resume(record.pid())? {
                ResumeOutcome::Resumed => {
                    record.mark_resumed()?;
                    self.context.stats.inc_resumes();
                }
                ResumeOutcome::AlreadyExited => {
                    warn!(
                        pid = record.pid(),
                        name = record.name(),
                        "Stopped process already exited"
                    );
                    return Ok(false);
                }
            },
            state => {
                return Err(ProcessError::InvalidStateTransition {
                    from: state,
                    to: ProcessState::Running,
                })
            }
        }
        info!(
            pid = record.pid(),
            name = record.name(),
            round = record.rounds(),
            "Currently running"
        );
        Ok(true)
    }

    /// Priority round-robin: drain bucket 0 completely, then bucket 1, ...
    pub fn priority(
        &mut self,
        table: PriorityTable,
        quantum: Duration,
    ) -> ProcessResult<ProcessQueue> {
        let mut completed = ProcessQueue::new();

        for (level, bucket) in table.into_buckets() {
            if bucket.is_empty() {
                continue;
            }
            debug!(priority = level, records = bucket.len(), "Servicing priority bucket");
            completed.concat(self.round_robin(bucket, quantum)?);
        }

        Ok(completed)
    }

    fn finish(
        &mut self,
        record: &mut ProcessRecord,
        ran: Duration,
        exited_at: Timestamp,
    ) -> ProcessResult<()> {
        record.mark_exited(ran, exited_at, self.context.started_at)?;
        self.context.stats.inc_completions();
        info!(
            pid = record.pid(),
            name = record.name(),
            ran_ms = ran.as_secs_f64() * 1000.0,
            burst_ms = record.burst_time().as_secs_f64() * 1000.0,
            rounds = record.rounds(),
            "Process exited"
        );
        Ok(())
    }
}
