//! Batching and scheduling options.

use serde::{Deserialize, Serialize};

/// How the engine forms batches.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchingType {
    /// Requests batched once and run to completion together.
    Static = 0,
    /// In-flight batching: requests join and leave between iterations.
    #[default]
    Inflight = 1,
}

/// Capacity policy used by the engine's scheduler.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapacitySchedulerPolicy {
    /// Pack as many requests as possible; may pause running requests.
    MaxUtilization = 0,
    /// Only admit requests whose KV cache can be reserved up front.
    #[default]
    GuaranteedNoEvict = 1,
    /// Static batching semantics.
    StaticBatch = 2,
}

/// Scheduler options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Admission policy.
    /// Default: guaranteed-no-evict
    pub capacity_policy: CapacitySchedulerPolicy,
}
