/*!
 * Core Types
 * Common types used across the scheduler
 */

use std::time::Duration;

/// OS process ID type (0 until the record is launched)
pub type Pid = u32;

/// Priority level (0-15, 0 is serviced first)
pub type Priority = u8;

/// Offset from the epoch of the active [`Clock`](super::clock::Clock)
pub type Timestamp = Duration;

/// Common result type for scheduler operations
pub type SchedulerResult<T> = Result<T, super::errors::SchedulerError>;
