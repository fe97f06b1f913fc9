//! Pool usage accounting

use std::fmt;

/// Running counters for one pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Capacity when the pool was created
    pub start_size: usize,
    /// Instances added through `grow_by` / `ensure_pool`
    pub init_added: usize,
    /// Instances added by the grow-on-empty policy
    pub grow_objects: usize,
    /// Spawn requests that returned nothing
    pub failed_spawns: usize,
    /// Active instances reclaimed for a new spawn
    pub reused_objects: usize,
    /// Most instances active at once
    pub most_active: usize,
}

impl PoolStats {
    pub(crate) fn new(start_size: usize) -> Self {
        Self {
            start_size,
            ..Self::default()
        }
    }

    pub(crate) fn record_active(&mut self, active: usize) {
        self.most_active = self.most_active.max(active);
    }
}

/// Usage snapshot of one pool, for tuning initial sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolReport {
    /// Pool key
    pub key: String,
    /// Capacity when the pool was created
    pub start_size: usize,
    /// Instances added through `grow_by` / `ensure_pool`
    pub init_added: usize,
    /// Instances added by the grow-on-empty policy
    pub grow_objects: usize,
    /// Capacity at the time of the report
    pub end_size: usize,
    /// Spawn requests that returned nothing
    pub failed_spawns: usize,
    /// Active instances reclaimed for a new spawn
    pub reused_objects: usize,
    /// Most instances active at once
    pub most_active: usize,
}

impl PoolReport {
    pub(crate) fn new(key: &str, stats: &PoolStats, end_size: usize) -> Self {
        Self {
            key: key.to_string(),
            start_size: stats.start_size,
            init_added: stats.init_added,
            grow_objects: stats.grow_objects,
            end_size,
            failed_spawns: stats.failed_spawns,
            reused_objects: stats.reused_objects,
            most_active: stats.most_active,
        }
    }
}

impl fmt::Display for PoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: start {} | init added {} | grown {} | end {} | failed {} | reused {} | most active {}",
            self.key,
            self.start_size,
            self.init_added,
            self.grow_objects,
            self.end_size,
            self.failed_spawns,
            self.reused_objects,
            self.most_active,
        )
    }
}
