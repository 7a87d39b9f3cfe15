/*!
 * I/O Module
 * Workload input and report output
 */

pub mod reader;
pub mod report;

pub use reader::{parse_line, parse_records, read_workload};
pub use report::{Report, ReportEntry};
