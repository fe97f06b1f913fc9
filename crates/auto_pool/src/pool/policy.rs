//! Spawn policies for empty and full pools

use serde::{Deserialize, Serialize};

/// Policy applied when a spawn finds no free instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmptyBehavior {
    /// Create one more instance, unless that would pass the pool's max size
    #[default]
    Grow,
    /// Refuse the spawn
    Fail,
    /// Reclaim the oldest active instance
    ReuseOldest,
}

/// Policy applied when growing would pass the pool's max size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaxEmptyBehavior {
    /// Refuse the spawn
    #[default]
    Fail,
    /// Reclaim the oldest active instance
    ReuseOldest,
}
