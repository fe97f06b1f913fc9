//! # Auto Pool
//!
//! Keyed pools of reusable game objects: spawn and despawn instances without
//! constructing and destroying them every time.
//!
//! ## Features
//!
//! - **Keyed Registry**: One pool per template name, resolved lazily
//! - **Capacity Policies**: Grow, fail, or reuse the oldest active instance
//! - **Delayed Despawn**: Timed release driven by the host's update loop
//! - **Usage Reports**: Per-pool counters for tuning pool sizes
//!
//! ## Quick Start
//!
//! ```rust
//! use auto_pool::prelude::*;
//! use std::sync::Arc;
//!
//! struct Bullet;
//!
//! impl PoolTemplate for Bullet {
//!     type Instance = BulletState;
//!
//!     fn name(&self) -> &str {
//!         "bullet"
//!     }
//!
//!     fn instantiate(&self) -> BulletState {
//!         BulletState::default()
//!     }
//! }
//!
//! #[derive(Default)]
//! struct BulletState {
//!     live: bool,
//! }
//!
//! impl Poolable for BulletState {
//!     fn on_spawn(&mut self, _placement: &Placement) {
//!         self.live = true;
//!     }
//!
//!     fn on_despawn(&mut self) {
//!         self.live = false;
//!     }
//! }
//!
//! let mut registry = PoolRegistry::init(RegistryConfig::default());
//! let bullet = Arc::new(Bullet);
//! assert!(registry.ensure_pool(&bullet, 0.0, 8, EmptyBehavior::Grow, MaxEmptyBehavior::Fail));
//!
//! let handle = registry.spawn("bullet", &Placement::default()).unwrap();
//! assert!(registry.despawn_after(handle, 0.5));
//! registry.update(1.0);
//! assert_eq!(registry.available_count("bullet"), 8);
//!
//! registry.teardown();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod pool;

mod error;
mod registry;

pub use error::{PoolError, PoolResult};
pub use registry::{EnsurePool, PoolRegistry};

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PoolConfig, RegistryConfig},
        foundation::{
            collections::{InstanceId, PoolId},
            math::{Quat, Vec3},
            time::{GameClock, Timer},
        },
        pool::{
            EmptyBehavior, InstanceHandle, InstanceState, MaxEmptyBehavior, ParentId, Placement,
            Pool, PoolReport, PoolStats, PoolTemplate, Poolable,
        },
        EnsurePool, PoolError, PoolRegistry, PoolResult,
    };
}
