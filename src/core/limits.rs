/*!
 * Scheduler Limits and Constants
 *
 * Centralized location for the scheduler's fixed bounds and magic numbers.
 */

use super::types::Priority;

// =============================================================================
// PRIORITY TABLE
// =============================================================================

/// Number of priority buckets in the priority table
pub const PRIORITY_LEVELS: usize = 16;

/// Highest-numbered (last serviced) priority
pub const MAX_PRIORITY: Priority = (PRIORITY_LEVELS - 1) as Priority;

/// Lowest-numbered (first serviced) priority
pub const MIN_PRIORITY: Priority = 0;

// =============================================================================
// PROCESS EXECUTION
// =============================================================================

/// Exit status of a child whose image replacement failed.
/// Matches the shell convention for "command not found / not executable".
pub const EXEC_FAILURE_STATUS: i32 = 127;

// =============================================================================
// OUTPUT
// =============================================================================

/// Default report file, written next to the working directory
pub const DEFAULT_REPORT_PATH: &str = "scheduler_information.txt";

/// Clamp a parsed priority into the valid bucket range
#[inline]
pub fn clamp_priority(raw: i64) -> Priority {
    raw.clamp(MIN_PRIORITY as i64, MAX_PRIORITY as i64) as Priority
}
