/*!
 * OS Process Controller
 *
 * Real process control through fork/execv, SIGSTOP/SIGCONT, waitpid and an
 * interruptible clock_nanosleep raced against the SIGCHLD indicator.
 */

use crate::core::clock::{Clock, SystemClock};
use crate::core::limits::EXEC_FAILURE_STATUS;
use crate::core::types::{Pid, Timestamp};
use crate::process::traits::ProcessController;
use crate::process::types::{ProcessError, ProcessResult, ResumeOutcome, SleepOutcome};
use crate::signals::{child_exit_flag, ChildExitWatch};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::time::{clock_gettime, clock_nanosleep, ClockId, ClockNanosleepFlags};
use nix::sys::time::TimeSpec;
use nix::unistd::{execv, fork, ForkResult, Pid as NixPid};
use std::ffi::CString;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Process controller backed by real OS primitives.
///
/// Child-exit notification interrupts the thread that called
/// [`watch_children`](ProcessController::watch_children), so the quantum
/// sleep must run on that same thread.
pub struct OsController {
    clock: SystemClock,
    watch: Option<ChildExitWatch>,
}

impl OsController {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: SystemClock) -> Self {
        Self { clock, watch: None }
    }

    /// Whether the SIGCHLD handler is currently installed
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    #[inline]
    fn nix_pid(pid: Pid) -> NixPid {
        NixPid::from_raw(pid as i32)
    }
}

impl Default for OsController {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for OsController {
    #[inline]
    fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

impl ProcessController for OsController {
    fn launch(&mut self, name: &str) -> ProcessResult<Pid> {
        let path =
            CString::new(name).map_err(|_| ProcessError::InvalidCommand(name.to_string()))?;
        // argv[0] only; everything the child touches is built before fork
        let argv = [path.as_c_str()];

        // SAFETY: the child calls nothing but execv and libc::_exit before its
        // image is replaced, so no lock or allocator state from other threads
        // is used. _exit skips atexit handlers and stdio flushing inherited
        // from the parent.
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                let pid = child.as_raw() as Pid;
                info!(pid, name, "Launched process");
                Ok(pid)
            }
            Ok(ForkResult::Child) => {
                let _ = execv(&path, &argv);
                unsafe { nix::libc::_exit(EXEC_FAILURE_STATUS) }
            }
            Err(errno) => Err(ProcessError::SpawnFailed {
                name: name.to_string(),
                errno,
            }),
        }
    }

    fn suspend(&mut self, pid: Pid) -> ProcessResult<()> {
        match kill(Self::nix_pid(pid), Signal::SIGSTOP) {
            Ok(()) => {
                debug!(pid, "Sent SIGSTOP");
                Ok(())
            }
            Err(Errno::ESRCH) => {
                debug!(pid, "SIGSTOP target already reaped");
                Ok(())
            }
            Err(errno) => Err(ProcessError::SuspendFailed { pid, errno }),
        }
    }

    fn resume(&mut self, pid: Pid) -> ProcessResult<ResumeOutcome> {
        match kill(Self::nix_pid(pid), Signal::SIGCONT) {
            Ok(()) => {
                debug!(pid, "Sent SIGCONT");
                Ok(ResumeOutcome::Resumed)
            }
            Err(Errno::ESRCH) => {
                debug!(pid, "SIGCONT target already reaped");
                Ok(ResumeOutcome::AlreadyExited)
            }
            Err(errno) => Err(ProcessError::ResumeFailed { pid, errno }),
        }
    }

    fn wait_for_exit(&mut self, pid: Pid) -> ProcessResult<i32> {
        loop {
            match waitpid(Self::nix_pid(pid), None) {
                Ok(WaitStatus::Exited(_, code)) => return Ok(code),
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    warn!(pid, signal = %signal, "Process terminated by signal");
                    return Ok(128 + signal as i32);
                }
                Ok(status) => trace!(pid, ?status, "Ignoring non-terminal wait status"),
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(ProcessError::WaitFailed { pid, errno }),
            }
        }
    }

    fn sleep_or_interrupt(&mut self, duration: Duration) -> ProcessResult<SleepOutcome> {
        let flag = child_exit_flag();
        if flag.take() {
            return Ok(SleepOutcome::ChildExited);
        }

        // Absolute deadline so an unrelated signal does not stretch the quantum
        let deadline = clock_gettime(ClockId::CLOCK_MONOTONIC).map_err(ProcessError::SleepFailed)?
            + TimeSpec::from(duration);

        loop {
            match clock_nanosleep(
                ClockId::CLOCK_MONOTONIC,
                ClockNanosleepFlags::TIMER_ABSTIME,
                &deadline,
            ) {
                Ok(_) => break,
                Err(Errno::EINTR) => {
                    if flag.take() {
                        return Ok(SleepOutcome::ChildExited);
                    }
                    trace!("Quantum sleep interrupted by unrelated signal");
                }
                Err(errno) => return Err(ProcessError::SleepFailed(errno)),
            }
        }

        if flag.take() {
            Ok(SleepOutcome::ChildExited)
        } else {
            Ok(SleepOutcome::Elapsed)
        }
    }

    fn take_child_finished(&mut self) -> bool {
        child_exit_flag().take()
    }

    fn watch_children(&mut self) -> ProcessResult<()> {
        if self.watch.is_none() {
            self.watch = Some(ChildExitWatch::install()?);
        }
        Ok(())
    }

    fn unwatch_children(&mut self) -> ProcessResult<()> {
        if let Some(mut watch) = self.watch.take() {
            watch.restore()?;
        }
        Ok(())
    }
}
