/*!
 * Workload Construction
 * Builds the queue or priority table a policy consumes
 */

use super::queue::ProcessQueue;
use super::table::PriorityTable;
use super::types::SchedulingPolicy;
use crate::process::ProcessRecord;

/// Pending work in the shape its policy consumes
#[derive(Debug)]
pub enum Workload {
    Queue(ProcessQueue),
    Table(PriorityTable),
}

impl Workload {
    /// Arrival order for FCFS and RR, estimated-time order for SJF,
    /// priority buckets for PRIO
    pub fn build<I>(records: I, policy: SchedulingPolicy) -> Self
    where
        I: IntoIterator<Item = ProcessRecord>,
    {
        match policy {
            SchedulingPolicy::Fcfs | SchedulingPolicy::RoundRobin => {
                Workload::Queue(records.into_iter().collect())
            }
            SchedulingPolicy::Sjf => {
                let mut queue = ProcessQueue::new();
                for record in records {
                    queue.insert_sorted(record);
                }
                Workload::Queue(queue)
            }
            SchedulingPolicy::Priority => {
                let mut table = PriorityTable::new();
                for record in records {
                    table.route(record);
                }
                Workload::Table(table)
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Workload::Queue(queue) => queue.len(),
            Workload::Table(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn records() -> Vec<ProcessRecord> {
        vec![
            ProcessRecord::new("a".into(), 3, 30, Duration::ZERO),
            ProcessRecord::new("b".into(), 1, 10, Duration::ZERO),
            ProcessRecord::new("c".into(), 3, 20, Duration::ZERO),
        ]
    }

    fn queue_names(workload: &Workload) -> Vec<String> {
        match workload {
            Workload::Queue(q) => q.iter().map(|r| r.name().to_string()).collect(),
            Workload::Table(_) => panic!("expected a queue"),
        }
    }

    #[test]
    fn test_fcfs_and_rr_keep_arrival_order() {
        for policy in [SchedulingPolicy::Fcfs, SchedulingPolicy::RoundRobin] {
            let workload = Workload::build(records(), policy);
            assert_eq!(queue_names(&workload), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_sjf_sorts_by_estimate() {
        let workload = Workload::build(records(), SchedulingPolicy::Sjf);
        assert_eq!(queue_names(&workload), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_prio_routes_into_table() {
        let workload = Workload::build(records(), SchedulingPolicy::Priority);
        match workload {
            Workload::Table(table) => {
                assert_eq!(table.len(), 3);
                assert_eq!(table.bucket(1).map(|q| q.len()), Some(1));
                assert_eq!(table.bucket(3).map(|q| q.len()), Some(2));
            }
            Workload::Queue(_) => panic!("expected a table"),
        }
    }
}
