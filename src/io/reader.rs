/*!
 * Input Reader
 * Turns a tab-separated workload file into process records
 */

use crate::core::clock::Clock;
use crate::core::errors::InputError;
use crate::core::types::Timestamp;
use crate::process::ProcessRecord;
use crate::scheduler::SchedulingPolicy;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Parse one line: `<executable>\t<n>[\t<m>]`.
///
/// Returns `Ok(None)` for blank lines. Empty fields (repeated tabs) are
/// ignored, as are fields past the third.
pub fn parse_line(
    line: &str,
    line_no: usize,
    policy: SchedulingPolicy,
    created_at: Timestamp,
) -> Result<Option<ProcessRecord>, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split('\t').filter(|f| !f.trim().is_empty());

    let Some(name) = fields.next() else {
        return Ok(None);
    };

    let numbers = fields
        .take(2)
        .enumerate()
        .map(|(i, raw)| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| InputError::InvalidField {
                    line: line_no,
                    field: i + 2,
                    value: raw.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(ProcessRecord::from_fields(
        name.to_string(),
        &numbers,
        policy,
        created_at,
    )))
}

/// Read every well-formed record from `reader`. Malformed lines are skipped
/// with a warning.
pub fn parse_records<R: BufRead>(
    reader: R,
    path: &Path,
    policy: SchedulingPolicy,
    clock: &impl Clock,
) -> Result<Vec<ProcessRecord>, InputError> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match parse_line(&line, index + 1, policy, clock.now()) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Skipping malformed input line"),
        }
    }

    debug!(count = records.len(), path = %path.display(), "Workload parsed");
    Ok(records)
}

/// Open `path` and read its records
pub fn read_workload(
    path: &Path,
    policy: SchedulingPolicy,
    clock: &impl Clock,
) -> Result<Vec<ProcessRecord>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(BufReader::new(file), path, policy, clock)
}
