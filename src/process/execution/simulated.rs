/*!
 * Simulated Process Controller
 *
 * Deterministic stand-in for the OS: a simulated clock, scripted run times
 * per executable and an event log. Never spawns a real process.
 */

use crate::core::clock::Clock;
use crate::core::types::{Pid, Timestamp};
use crate::process::traits::ProcessController;
use crate::process::types::{ProcessError, ProcessResult, ResumeOutcome, SleepOutcome};
use nix::errno::Errno;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Observable controller activity, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Launched { pid: Pid, name: String, at: Timestamp },
    Suspended { pid: Pid, at: Timestamp },
    Resumed { pid: Pid, at: Timestamp },
    Exited { pid: Pid, at: Timestamp },
}

/// Shared handle to the event log, readable after the controller moved into
/// an engine
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<ControllerEvent>>>);

impl EventLog {
    fn push(&self, event: ControllerEvent) {
        self.0.lock().push(event);
    }

    pub fn snapshot(&self) -> Vec<ControllerEvent> {
        self.0.lock().clone()
    }

    /// Names in launch order
    pub fn launched_names(&self) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::Launched { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimState {
    Running,
    Stopped,
    Exited,
}

#[derive(Debug)]
struct SimProcess {
    name: String,
    remaining: Duration,
    state: SimState,
}

/// Deterministic [`ProcessController`] for engine tests
#[derive(Debug)]
pub struct SimulatedController {
    now: Timestamp,
    default_runtime: Duration,
    runtimes: HashMap<String, Duration>,
    spawn_failures: HashSet<String>,
    exit_races: HashSet<String>,
    late_exits: HashSet<String>,
    processes: HashMap<Pid, SimProcess>,
    next_pid: Pid,
    watching: bool,
    child_finished: bool,
    late_notification: bool,
    events: EventLog,
}

impl SimulatedController {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            default_runtime: Duration::from_millis(10),
            runtimes: HashMap::new(),
            spawn_failures: HashSet::new(),
            exit_races: HashSet::new(),
            late_exits: HashSet::new(),
            processes: HashMap::new(),
            next_pid: 1000,
            watching: false,
            child_finished: false,
            late_notification: false,
            events: EventLog::default(),
        }
    }

    /// Run time for executables without a scripted one
    pub fn with_default_runtime(mut self, runtime: Duration) -> Self {
        self.default_runtime = runtime;
        self
    }

    /// Script how long `name` runs before exiting
    pub fn with_runtime(mut self, name: impl Into<String>, runtime: Duration) -> Self {
        self.runtimes.insert(name.into(), runtime);
        self
    }

    /// Make launching `name` fail like an exhausted fork
    pub fn with_spawn_failure(mut self, name: impl Into<String>) -> Self {
        self.spawn_failures.insert(name.into());
        self
    }

    /// When `name` finishes exactly as a quantum expires, deliver the exit
    /// after the sleep returned instead of interrupting it
    pub fn with_exit_race(mut self, name: impl Into<String>) -> Self {
        self.exit_races.insert(name.into());
        self
    }

    /// When `name` finishes exactly as a quantum expires, deliver the exit
    /// notification only after the post-stop check, so the engine re-queues
    /// a child that is already gone
    pub fn with_late_exit(mut self, name: impl Into<String>) -> Self {
        self.late_exits.insert(name.into());
        self
    }

    /// Start the simulated clock at `at`
    pub fn starting_at(mut self, at: Timestamp) -> Self {
        self.now = at;
        self
    }

    pub fn events(&self) -> EventLog {
        self.events.clone()
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Move the simulated clock without running anything
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    fn running_pid(&self) -> Option<Pid> {
        self.processes
            .iter()
            .find(|(_, p)| p.state == SimState::Running)
            .map(|(pid, _)| *pid)
    }

    fn ensure_idle(&self) -> ProcessResult<()> {
        match self.running_pid() {
            Some(pid) => Err(ProcessError::ExecutionError(format!(
                "PID {} is still running",
                pid
            ))),
            None => Ok(()),
        }
    }

    fn exit(&mut self, pid: Pid) {
        if let Some(process) = self.processes.get_mut(&pid) {
            self.now += process.remaining;
            process.remaining = Duration::ZERO;
            process.state = SimState::Exited;
            self.events.push(ControllerEvent::Exited { pid, at: self.now });
        }
    }
}

impl Default for SimulatedController {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimulatedController {
    fn now(&self) -> Timestamp {
        self.now
    }
}

impl ProcessController for SimulatedController {
    fn launch(&mut self, name: &str) -> ProcessResult<Pid> {
        if self.spawn_failures.contains(name) {
            return Err(ProcessError::SpawnFailed {
                name: name.to_string(),
                errno: Errno::EAGAIN,
            });
        }
        self.ensure_idle()?;

        let pid = self.next_pid;
        self.next_pid += 1;
        let remaining = self
            .runtimes
            .get(name)
            .copied()
            .unwrap_or(self.default_runtime);
        self.processes.insert(
            pid,
            SimProcess {
                name: name.to_string(),
                remaining,
                state: SimState::Running,
            },
        );
        self.events.push(ControllerEvent::Launched {
            pid,
            name: name.to_string(),
            at: self.now,
        });
        Ok(pid)
    }

    fn suspend(&mut self, pid: Pid) -> ProcessResult<()> {
        let process = self.processes.get_mut(&pid).ok_or(ProcessError::SuspendFailed {
            pid,
            errno: Errno::ESRCH,
        })?;
        // Already-exited children are not an error, as with a reaped OS child
        if process.state == SimState::Running {
            process.state = SimState::Stopped;
            self.events.push(ControllerEvent::Suspended { pid, at: self.now });
        }
        Ok(())
    }

    fn resume(&mut self, pid: Pid) -> ProcessResult<ResumeOutcome> {
        self.ensure_idle()?;
        match self.processes.get_mut(&pid) {
            Some(process) if process.state == SimState::Stopped => {
                process.state = SimState::Running;
                self.events.push(ControllerEvent::Resumed { pid, at: self.now });
                Ok(ResumeOutcome::Resumed)
            }
            Some(process) if process.state == SimState::Exited => Ok(ResumeOutcome::AlreadyExited),
            _ => Err(ProcessError::ResumeFailed {
                pid,
                errno: Errno::ESRCH,
            }),
        }
    }

    fn wait_for_exit(&mut self, pid: Pid) -> ProcessResult<i32> {
        match self.processes.get(&pid) {
            Some(process) if process.state != SimState::Exited => {
                self.exit(pid);
                Ok(0)
            }
            _ => Err(ProcessError::WaitFailed {
                pid,
                errno: Errno::ECHILD,
            }),
        }
    }

    fn sleep_or_interrupt(&mut self, duration: Duration) -> ProcessResult<SleepOutcome> {
        if std::mem::take(&mut self.child_finished) {
            return Ok(SleepOutcome::ChildExited);
        }

        let Some(pid) = self.running_pid() else {
            self.now += duration;
            return Ok(SleepOutcome::Elapsed);
        };

        let (remaining, racy, late) = {
            let process = &self.processes[&pid];
            (
                process.remaining,
                self.exit_races.contains(&process.name),
                self.late_exits.contains(&process.name),
            )
        };

        if remaining == duration && late {
            self.exit(pid);
            self.late_notification = self.watching;
            return Ok(SleepOutcome::Elapsed);
        }

        if remaining == duration && racy {
            self.exit(pid);
            self.child_finished = self.watching;
            return Ok(SleepOutcome::Elapsed);
        }

        if remaining <= duration {
            self.exit(pid);
            if self.watching {
                return Ok(SleepOutcome::ChildExited);
            }
            // Nobody is notified; the sleep runs to its end
            self.now += duration - remaining;
            return Ok(SleepOutcome::Elapsed);
        }

        self.now += duration;
        if let Some(process) = self.processes.get_mut(&pid) {
            process.remaining -= duration;
        }
        Ok(SleepOutcome::Elapsed)
    }

    fn take_child_finished(&mut self) -> bool {
        let finished = std::mem::take(&mut self.child_finished);
        // A late notification lands right after this check
        self.child_finished |= std::mem::take(&mut self.late_notification);
        finished
    }

    fn watch_children(&mut self) -> ProcessResult<()> {
        self.watching = true;
        self.child_finished = false;
        Ok(())
    }

    fn unwatch_children(&mut self) -> ProcessResult<()> {
        self.watching = false;
        Ok(())
    }
}
