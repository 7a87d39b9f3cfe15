/*!
 * Core Module
 * Fundamental scheduler types, time source and error handling
 */

pub mod clock;
pub mod errors;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use clock::{Clock, SystemClock};
pub use errors::*;
pub use limits::*;
pub use types::*;
