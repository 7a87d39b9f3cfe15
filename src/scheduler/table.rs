/*!
 * Priority Table
 * One ordered queue per priority level, serviced bucket 0 first
 */

use super::queue::ProcessQueue;
use crate::core::limits::PRIORITY_LEVELS;
use crate::core::types::Priority;
use crate::process::ProcessRecord;

/// Fixed array of per-priority queues
#[derive(Debug, Default)]
pub struct PriorityTable {
    buckets: [ProcessQueue; PRIORITY_LEVELS],
}

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the bucket matching its (already clamped) priority
    pub fn route(&mut self, record: ProcessRecord) {
        let level = usize::from(record.priority()).min(PRIORITY_LEVELS - 1);
        self.buckets[level].append(record);
    }

    pub fn bucket(&self, priority: Priority) -> Option<&ProcessQueue> {
        self.buckets.get(usize::from(priority))
    }

    /// Total records across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(ProcessQueue::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(ProcessQueue::is_empty)
    }

    /// Consume the table, yielding `(priority, queue)` from bucket 0 to 15
    pub fn into_buckets(self) -> impl Iterator<Item = (Priority, ProcessQueue)> {
        self.buckets
            .into_iter()
            .enumerate()
            .map(|(level, queue)| (level as Priority, queue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn rec(name: &str, priority: i64) -> ProcessRecord {
        ProcessRecord::new(name.to_string(), priority, 0, Duration::ZERO)
    }

    #[test]
    fn test_route_by_priority() {
        let mut table = PriorityTable::new();
        table.route(rec("low", 9));
        table.route(rec("high", 0));
        table.route(rec("low2", 9));

        assert_eq!(table.len(), 3);
        assert_eq!(table.bucket(0).map(ProcessQueue::len), Some(1));
        assert_eq!(table.bucket(9).map(ProcessQueue::len), Some(2));
        assert_eq!(table.bucket(5).map(ProcessQueue::len), Some(0));
        assert!(table.bucket(16).is_none());
    }

    #[test]
    fn test_clamped_priorities_land_in_edge_buckets() {
        let mut table = PriorityTable::new();
        table.route(rec("neg", -3));
        table.route(rec("huge", 40));
        assert_eq!(table.bucket(0).map(ProcessQueue::len), Some(1));
        assert_eq!(table.bucket(15).map(ProcessQueue::len), Some(1));
    }

    #[test]
    fn test_into_buckets_order() {
        let mut table = PriorityTable::new();
        table.route(rec("c", 15));
        table.route(rec("a", 0));
        table.route(rec("b", 4));

        let order: Vec<(Priority, Vec<String>)> = table
            .into_buckets()
            .filter(|(_, q)| !q.is_empty())
            .map(|(p, q)| (p, q.into_iter().map(|r| r.name().to_string()).collect()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, vec!["a".to_string()]),
                (4, vec!["b".to_string()]),
                (15, vec!["c".to_string()]),
            ]
        );
    }

    #[test]
    fn test_empty_table() {
        let table = PriorityTable::new();
        assert!(table.is_empty());
        assert_eq!(table.into_buckets().count(), PRIORITY_LEVELS);
    }
}
