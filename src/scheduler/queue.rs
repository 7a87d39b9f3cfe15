/*!
 * Ordered Queue
 * Double-ended sequence of process records with arrival-order and
 * estimated-time-order insertion
 */

use crate::process::ProcessRecord;
use std::collections::vec_deque::{IntoIter, Iter};
use std::collections::VecDeque;

/// Sequence of owned process records
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessQueue {
    records: VecDeque<ProcessRecord>,
}

impl ProcessQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add at the tail (arrival order)
    pub fn append(&mut self, record: ProcessRecord) {
        self.records.push_back(record);
    }

    /// Insert before the first record with a strictly greater estimated time.
    ///
    /// Equal keys keep insertion order, so a queue built only through this
    /// call is non-decreasing in estimated time.
    pub fn insert_sorted(&mut self, record: ProcessRecord) {
        let key = record.estimated_time();
        let at = self
            .records
            .partition_point(|existing| existing.estimated_time() <= key);
        self.records.insert(at, record);
    }

    /// Remove and return the head, `None` when empty
    pub fn pop_front(&mut self) -> Option<ProcessRecord> {
        self.records.pop_front()
    }

    /// Append every record of `other` in order, consuming it
    pub fn concat(&mut self, other: ProcessQueue) {
        self.records.extend(other.records);
    }

    pub fn front(&self) -> Option<&ProcessRecord> {
        self.records.front()
    }

    pub fn back(&self) -> Option<&ProcessRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Head-to-tail iteration; `.rev()` walks tail-to-head
    pub fn iter(&self) -> Iter<'_, ProcessRecord> {
        self.records.iter()
    }
}

impl FromIterator<ProcessRecord> for ProcessQueue {
    fn from_iter<I: IntoIterator<Item = ProcessRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<ProcessRecord> for ProcessQueue {
    fn extend<I: IntoIterator<Item = ProcessRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl IntoIterator for ProcessQueue {
    type Item = ProcessRecord;
    type IntoIter = IntoIter<ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProcessQueue {
    type Item = &'a ProcessRecord;
    type IntoIter = Iter<'a, ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn rec(name: &str, estimate: u32) -> ProcessRecord {
        ProcessRecord::new(name.to_string(), 0, estimate, Duration::ZERO)
    }

    fn names(queue: &ProcessQueue) -> Vec<&str> {
        queue.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_append_keeps_arrival_order() {
        let mut queue = ProcessQueue::new();
        queue.append(rec("a", 30));
        queue.append(rec("b", 10));
        queue.append(rec("c", 20));
        assert_eq!(names(&queue), vec!["a", "b", "c"]);
        assert_eq!(queue.front().map(|r| r.name()), Some("a"));
        assert_eq!(queue.back().map(|r| r.name()), Some("c"));
    }

    #[test]
    fn test_insert_sorted_orders_by_estimate() {
        let mut queue = ProcessQueue::new();
        queue.insert_sorted(rec("a", 30));
        queue.insert_sorted(rec("b", 10));
        queue.insert_sorted(rec("c", 20));
        assert_eq!(names(&queue), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_insert_sorted_is_stable() {
        let mut queue = ProcessQueue::new();
        queue.insert_sorted(rec("first", 5));
        queue.insert_sorted(rec("small", 1));
        queue.insert_sorted(rec("second", 5));
        queue.insert_sorted(rec("third", 5));
        assert_eq!(names(&queue), vec!["small", "first", "second", "third"]);
    }

    #[test]
    fn test_pop_front_empty() {
        let mut queue = ProcessQueue::new();
        assert!(queue.pop_front().is_none());
        queue.append(rec("a", 0));
        assert_eq!(queue.pop_front().map(|r| r.name().to_string()), Some("a".into()));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concat_preserves_order() {
        let mut left: ProcessQueue = vec![rec("a", 0), rec("b", 0)].into_iter().collect();
        let right: ProcessQueue = vec![rec("c", 0), rec("d", 0)].into_iter().collect();
        left.concat(right);
        assert_eq!(names(&left), vec!["a", "b", "c", "d"]);
        assert_eq!(left.len(), 4);
    }

    #[test]
    fn test_reverse_traversal() {
        let queue: ProcessQueue = vec![rec("a", 0), rec("b", 0), rec("c", 0)]
            .into_iter()
            .collect();
        let reversed: Vec<&str> = queue.iter().rev().map(|r| r.name()).collect();
        assert_eq!(reversed, vec!["c", "b", "a"]);
    }
}
