/*!
 * Signals Module
 * Asynchronous child-exit notification
 */

pub mod child;

pub use child::{child_exit_flag, ChildExitFlag, ChildExitWatch};
