/*!
 * Child Exit Notification
 *
 * SIGCHLD handler for the preemptive policies. The handler only reaps the
 * exited child and raises a one-shot atomic indicator; it never touches the
 * scheduler's queues.
 *
 * The kernel may run the handler on any thread that does not block SIGCHLD.
 * When that is not the thread that installed the watch, the handler re-sends
 * SIGCHLD to the installing thread so its quantum sleep is interrupted.
 */

use crate::process::types::{ProcessError, ProcessResult};
use nix::errno::Errno;
use nix::sys::pthread::{pthread_kill, pthread_self, Pthread};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::ffi::c_int;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, warn};

/// One-shot "child finished" indicator
#[derive(Debug)]
pub struct ChildExitFlag {
    finished: AtomicBool,
}

impl ChildExitFlag {
    pub const fn new() -> Self {
        Self {
            finished: AtomicBool::new(false),
        }
    }

    /// Set the indicator (async-signal-safe)
    #[inline]
    pub fn raise(&self) {
        self.finished.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Read and clear the indicator
    #[inline]
    pub fn take(&self) -> bool {
        self.finished.swap(false, Ordering::AcqRel)
    }
}

impl Default for ChildExitFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// The handler must be reachable from a plain `extern "C"` function, so the
/// indicator it raises lives here.
static CHILD_EXIT: ChildExitFlag = ChildExitFlag::new();

/// Thread that installed the handler, 0 when none is installed
static WATCHING_THREAD: AtomicU64 = AtomicU64::new(0);

/// Indicator raised by the installed SIGCHLD handler
pub fn child_exit_flag() -> &'static ChildExitFlag {
    &CHILD_EXIT
}

extern "C" fn on_child_exit(_signal: c_int) {
    let saved = Errno::last_raw();
    let mut reaped = false;
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(_) => break,
            Ok(_) => {
                CHILD_EXIT.raise();
                reaped = true;
            }
        }
    }

    let watcher = WATCHING_THREAD.load(Ordering::Acquire);
    if reaped && watcher != 0 && watcher != pthread_self() as u64 {
        // Interrupt the watcher's sleep; it finds nothing left to reap
        let _ = pthread_kill(watcher as Pthread, Signal::SIGCHLD);
    }
    Errno::set_raw(saved);
}

/// Installed SIGCHLD handler; the previous disposition is restored on
/// [`ChildExitWatch::restore`] or drop.
pub struct ChildExitWatch {
    previous: Option<SigAction>,
}

impl ChildExitWatch {
    /// Install the handler with SA_NOCLDSTOP so stopping a child does not
    /// look like an exit. Clears any stale indicator first. The calling
    /// thread becomes the one whose sleep a child exit interrupts.
    pub fn install() -> ProcessResult<Self> {
        CHILD_EXIT.take();
        WATCHING_THREAD.store(pthread_self() as u64, Ordering::Release);

        let action = SigAction::new(
            SigHandler::Handler(on_child_exit),
            SaFlags::SA_NOCLDSTOP,
            SigSet::empty(),
        );
        // SAFETY: the handler only calls waitpid, pthread_self and
        // pthread_kill and touches atomics, all async-signal-safe.
        let previous = match unsafe { sigaction(Signal::SIGCHLD, &action) } {
            Ok(previous) => previous,
            Err(errno) => {
                WATCHING_THREAD.store(0, Ordering::Release);
                return Err(ProcessError::SignalHandlerFailed(errno));
            }
        };

        debug!("SIGCHLD handler installed");
        Ok(Self {
            previous: Some(previous),
        })
    }

    /// Put back the disposition that was active before [`install`](Self::install)
    pub fn restore(&mut self) -> ProcessResult<()> {
        if let Some(previous) = self.previous.take() {
            WATCHING_THREAD.store(0, Ordering::Release);
            // SAFETY: restoring a disposition previously returned by sigaction.
            unsafe { sigaction(Signal::SIGCHLD, &previous) }
                .map_err(ProcessError::SignalHandlerFailed)?;
            debug!("SIGCHLD handler removed");
        }
        Ok(())
    }
}

impl Drop for ChildExitWatch {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "Failed to restore SIGCHLD disposition");
        }
    }
}
