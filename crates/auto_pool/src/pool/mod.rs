//! Keyed object pools
//!
//! A [`Pool`] owns every instance built from one [`PoolTemplate`] and hands
//! them out under an empty/max-empty policy. Instances never leave their pool;
//! callers hold [`InstanceHandle`]s.
//!
//! # Architecture
//!
//! ```text
//! Pool
//!   ├── instances (SlotMap<InstanceId, Instance>)
//!   ├── free list   (most recently returned at the tail)
//!   ├── active set  (ordered by spawn time, oldest first)
//!   └── DespawnScheduler (delayed releases, keyed by instance)
//! ```
//!
//! # Instance lifecycle
//!
//! ```text
//! Free ──spawn──> Active ──despawn──────────────> Free
//!                   │                              ^
//!                   └──despawn_after──> PendingDespawn ──timer / forced──┘
//! ```
//!
//! A pending instance can also be reclaimed straight back to `Active` by a
//! reuse policy; its timer is cancelled when that happens.

mod instance;
mod object_pool;
mod placement;
mod policy;
mod scheduler;
mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use instance::{Instance, InstanceHandle, InstanceState, PoolTemplate, Poolable};
pub use object_pool::Pool;
pub use placement::{ParentId, Placement};
pub use policy::{EmptyBehavior, MaxEmptyBehavior};
pub use scheduler::{DespawnScheduler, DueDespawn};
pub use stats::{PoolReport, PoolStats};
