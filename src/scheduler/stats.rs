/*!
 * Scheduler Statistics
 * Counters describing one scheduling run
 */

use serde::Serialize;

/// Per-run scheduling counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub launches: u64,
    pub resumes: u64,
    pub preemptions: u64,
    pub completions: u64,
}

impl RunStats {
    /// Launches plus resumes: every time a child was given the CPU
    #[inline]
    pub fn context_switches(&self) -> u64 {
        self.launches + self.resumes
    }

    #[inline]
    pub(super) fn inc_launches(&mut self) {
        self.launches += 1;
    }

    #[inline]
    pub(super) fn inc_resumes(&mut self) {
        self.resumes += 1;
    }

    #[inline]
    pub(super) fn inc_preemptions(&mut self) {
        self.preemptions += 1;
    }

    #[inline]
    pub(super) fn inc_completions(&mut self) {
        self.completions += 1;
    }
}
