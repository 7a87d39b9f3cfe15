/*!
 * Process Execution
 * Process controller implementations
 */

pub mod os;
pub mod simulated;

pub use os::OsController;
pub use simulated::{ControllerEvent, EventLog, SimulatedController};
