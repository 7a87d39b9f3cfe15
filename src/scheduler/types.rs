/*!
 * Scheduler Types
 * Policy selection and quantum configuration
 */

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulingPolicy {
    /// First-come-first-served (a.k.a. batch), run to completion
    Fcfs,
    /// Shortest-job-first by estimated time, run to completion
    Sjf,
    /// Round-robin with a fixed time quantum
    RoundRobin,
    /// Round-robin within strict priority buckets, bucket 0 first
    Priority,
}

impl FromStr for SchedulingPolicy {
    type Err = String;

    /// Parse from string representation (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "batch" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "rr" => Ok(Self::RoundRobin),
            "prio" => Ok(Self::Priority),
            _ => Err(format!("Invalid policy '{}'. Valid: fcfs, batch, sjf, rr, prio", s)),
        }
    }
}

impl SchedulingPolicy {
    /// Short lowercase name, as accepted on the command line
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::RoundRobin => "rr",
            Self::Priority => "prio",
        }
    }

    /// Heading used in the report
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::RoundRobin => "RR",
            Self::Priority => "PRIORITY",
        }
    }

    /// Whether the policy preempts with a quantum
    #[inline]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin | Self::Priority)
    }

    /// Whether a lone numeric input field means priority
    #[inline]
    pub const fn is_priority_based(&self) -> bool {
        matches!(self, Self::Priority)
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Time quantum for the preemptive policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeQuantum {
    millis: u64,
}

impl TimeQuantum {
    /// Create a quantum of `millis` milliseconds (must be positive)
    pub fn from_millis(millis: u64) -> Result<Self, String> {
        if millis == 0 {
            return Err("Invalid quantum: must be at least 1 ms".to_string());
        }
        Ok(Self { millis })
    }

    #[inline(always)]
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    #[inline]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

impl<'de> Deserialize<'de> for TimeQuantum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Inner {
            millis: u64,
        }

        let inner = Inner::deserialize(deserializer)?;
        Self::from_millis(inner.millis).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("fcfs".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Fcfs);
        assert_eq!("BATCH".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Fcfs);
        assert_eq!("Sjf".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Sjf);
        assert_eq!("RR".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::RoundRobin);
        assert_eq!("prio".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Priority);
        assert!("fair".parse::<SchedulingPolicy>().is_err());
        assert_eq!(SchedulingPolicy::from_str("rr"), Ok(SchedulingPolicy::RoundRobin));
    }

    #[test]
    fn test_policy_flags() {
        assert!(!SchedulingPolicy::Fcfs.is_preemptive());
        assert!(!SchedulingPolicy::Sjf.is_preemptive());
        assert!(SchedulingPolicy::RoundRobin.is_preemptive());
        assert!(SchedulingPolicy::Priority.is_preemptive());
        assert!(SchedulingPolicy::Priority.is_priority_based());
        assert!(!SchedulingPolicy::RoundRobin.is_priority_based());
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&SchedulingPolicy::RoundRobin).unwrap();
        assert_eq!(json, "\"rr\"");
        let back: SchedulingPolicy = serde_json::from_str("\"batch\"").unwrap();
        assert_eq!(back, SchedulingPolicy::Fcfs);
    }

    #[test]
    fn test_time_quantum_validation() {
        assert!(TimeQuantum::from_millis(0).is_err());
        let q = TimeQuantum::from_millis(500).unwrap();
        assert_eq!(q.as_millis(), 500);
        assert_eq!(q.as_duration(), Duration::from_millis(500));
        assert!(serde_json::from_str::<TimeQuantum>(r#"{"millis":0}"#).is_err());
    }
}
