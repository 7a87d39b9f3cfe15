/*!
 * Process Scheduler Library
 * Schedules real OS processes under FCFS, SJF, round-robin and priority
 * round-robin, measuring their timing behaviour
 */

pub mod config;
pub mod core;
pub mod io;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod signals;

// Re-exports
pub use config::{Config, ConfigError};
pub use core::{Clock, InputError, ReportError, SchedulerError, SchedulerResult, SystemClock};
pub use io::{read_workload, Report};
pub use monitoring::init_tracing;
pub use process::{
    OsController, ProcessController, ProcessError, ProcessRecord, ProcessState,
    SimulatedController,
};
pub use scheduler::{
    PolicyEngine, PriorityTable, ProcessQueue, Schedule, SchedulingPolicy, TimeQuantum, Workload,
};
