/*!
 * Process Module
 * Process records, state machine and process control
 */

pub mod execution;
pub mod record;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use execution::{ControllerEvent, EventLog, OsController, SimulatedController};
pub use record::ProcessRecord;
pub use traits::ProcessController;
pub use types::{ProcessError, ProcessResult, ProcessState, ResumeOutcome, SleepOutcome};
