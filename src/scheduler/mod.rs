/*!
 * Scheduler Module
 * Queues, priority table and the policy engine
 */

pub mod engine;
pub mod loader;
pub mod queue;
pub mod stats;
pub mod table;
pub mod types;

// Re-export public API
pub use engine::{PolicyEngine, Schedule, SchedulerContext};
pub use loader::Workload;
pub use queue::ProcessQueue;
pub use stats::RunStats;
pub use table::PriorityTable;
pub use types::{SchedulingPolicy, TimeQuantum};
