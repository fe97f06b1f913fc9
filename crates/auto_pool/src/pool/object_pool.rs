//! Single-template object pool
//!
//! Owns every instance of one template and applies the empty/max-empty
//! policies on spawn.
//!
//! # Usage
//!
//! ```rust
//! # use auto_pool::prelude::*;
//! # use std::sync::Arc;
//! # struct Spark;
//! # #[derive(Default)] struct SparkState;
//! # impl Poolable for SparkState {
//! #     fn on_spawn(&mut self, _: &Placement) {}
//! #     fn on_despawn(&mut self) {}
//! # }
//! # impl PoolTemplate for Spark {
//! #     type Instance = SparkState;
//! #     fn name(&self) -> &str { "spark" }
//! #     fn instantiate(&self) -> SparkState { SparkState }
//! # }
//! let config = PoolConfig::new(2, 2).with_behaviors(EmptyBehavior::Grow, MaxEmptyBehavior::ReuseOldest);
//! let mut pool = Pool::new(Arc::new(Spark), config);
//!
//! let first = pool.spawn(&Placement::default()).unwrap();
//! let _second = pool.spawn(&Placement::default()).unwrap();
//!
//! // Full: the oldest spawn is reclaimed and its handle goes stale.
//! let third = pool.spawn(&Placement::default()).unwrap();
//! assert_eq!(third.instance(), first.instance());
//! assert!(!pool.despawn(first));
//! ```

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::foundation::collections::{InstanceId, PoolId, SlotMap};
use crate::pool::{
    DespawnScheduler, EmptyBehavior, Instance, InstanceHandle, InstanceState, MaxEmptyBehavior,
    Placement, PoolReport, PoolStats, PoolTemplate,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Pool of reusable instances built from one template
pub struct Pool<T: PoolTemplate> {
    /// Registry slot; null for a pool not (yet) held by a registry
    id: PoolId,
    key: String,
    template: Arc<T>,

    instances: SlotMap<InstanceId, Instance<T::Instance>>,
    /// Free instances, most recently returned last
    free_list: Vec<InstanceId>,
    /// In-use instances keyed by spawn order, oldest first
    active: BTreeMap<u64, InstanceId>,
    next_spawn_order: u64,

    max_size: usize,
    empty_behavior: EmptyBehavior,
    max_empty_behavior: MaxEmptyBehavior,

    scheduler: DespawnScheduler,
    stats: PoolStats,
}

impl<T: PoolTemplate> Pool<T> {
    /// Create a pool and pre-build `config.initial_size` free instances
    ///
    /// A non-zero `max_size` below `initial_size` is raised to `initial_size`.
    pub fn new(template: Arc<T>, config: PoolConfig) -> Self {
        let key = template.name().to_string();
        let mut max_size = config.max_size;
        if max_size > 0 && max_size < config.initial_size {
            log::warn!(
                "Pool '{}': max size {} is below initial size {}, raising it",
                key,
                max_size,
                config.initial_size
            );
            max_size = config.initial_size;
        }

        let mut pool = Self {
            id: PoolId::default(),
            key,
            template,
            instances: SlotMap::with_capacity_and_key(config.initial_size),
            free_list: Vec::with_capacity(config.initial_size),
            active: BTreeMap::new(),
            next_spawn_order: 0,
            max_size,
            empty_behavior: config.empty_behavior,
            max_empty_behavior: config.max_empty_behavior,
            scheduler: DespawnScheduler::new(),
            stats: PoolStats::new(config.initial_size),
        };
        for _ in 0..config.initial_size {
            let id = pool.create_instance();
            pool.free_list.push(id);
        }

        log::info!(
            "Created pool '{}' with {} instances (max {}, {:?}/{:?})",
            pool.key,
            config.initial_size,
            pool.max_size,
            pool.empty_behavior,
            pool.max_empty_behavior
        );
        pool
    }

    pub(crate) fn bind(&mut self, id: PoolId) {
        self.id = id;
    }

    /// Registry slot of this pool
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Pool key (the template's name)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Template the pool builds from
    pub fn template(&self) -> &Arc<T> {
        &self.template
    }

    /// Total instances, active and free
    pub fn capacity(&self) -> usize {
        self.instances.len()
    }

    /// Instances currently handed out, including pending despawns
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Instances on the free list
    pub fn available_count(&self) -> usize {
        self.free_list.len()
    }

    /// Delayed despawns not yet fired
    pub fn pending_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Capacity ceiling for growth; 0 means unbounded
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set the capacity ceiling; a non-zero value below the current capacity
    /// is raised to the capacity
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = if max_size > 0 && max_size < self.capacity() {
            log::debug!(
                "Pool '{}': max size {} is below capacity {}, clamping",
                self.key,
                max_size,
                self.capacity()
            );
            self.capacity()
        } else {
            max_size
        };
    }

    /// Policy for spawns that find no free instance
    pub fn empty_behavior(&self) -> EmptyBehavior {
        self.empty_behavior
    }

    /// Change the empty policy
    pub fn set_empty_behavior(&mut self, behavior: EmptyBehavior) {
        self.empty_behavior = behavior;
    }

    /// Policy for growth that would pass the max size
    pub fn max_empty_behavior(&self) -> MaxEmptyBehavior {
        self.max_empty_behavior
    }

    /// Change the max-empty policy
    pub fn set_max_empty_behavior(&mut self, behavior: MaxEmptyBehavior) {
        self.max_empty_behavior = behavior;
    }

    /// Usage counters
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Usage snapshot
    pub fn report(&self) -> PoolReport {
        PoolReport::new(&self.key, &self.stats, self.capacity())
    }

    /// Payload behind a live handle
    pub fn get(&self, handle: InstanceHandle) -> Option<&T::Instance> {
        self.live_instance(handle).ok().map(Instance::payload)
    }

    /// Payload behind a live handle, mutably
    pub fn get_mut(&mut self, handle: InstanceHandle) -> Option<&mut T::Instance> {
        self.live_instance(handle).ok()?;
        self.instances.get_mut(handle.instance()).map(Instance::payload_mut)
    }

    /// State of the instance behind a live handle
    pub fn state(&self, handle: InstanceHandle) -> Option<InstanceState> {
        self.live_instance(handle).ok().map(Instance::state)
    }

    /// State of an instance by id, whatever its activation
    pub fn instance_state(&self, instance: InstanceId) -> Option<InstanceState> {
        self.instances.get(instance).map(Instance::state)
    }

    /// Active instances in spawn order, oldest first
    pub fn iter_active(&self) -> impl Iterator<Item = (InstanceHandle, &T::Instance)> + '_ {
        self.active.values().map(move |&id| {
            let instance = &self.instances[id];
            (InstanceHandle::new(self.id, id, instance.activation()), instance.payload())
        })
    }

    /// Hand out an instance, or `None` when the policies refuse
    pub fn spawn(&mut self, placement: &Placement) -> Option<InstanceHandle> {
        self.try_spawn(placement).ok()
    }

    /// Hand out an instance, reporting why a refused spawn failed
    pub fn try_spawn(&mut self, placement: &Placement) -> PoolResult<InstanceHandle> {
        if let Some(id) = self.free_list.pop() {
            return Ok(self.activate(id, placement));
        }

        let spawned = match self.empty_behavior {
            EmptyBehavior::Grow if self.can_grow() => {
                let id = self.create_instance();
                self.stats.grow_objects += 1;
                log::debug!("Pool '{}' grew to {} instances", self.key, self.capacity());
                Some(self.activate(id, placement))
            }
            EmptyBehavior::Grow => match self.max_empty_behavior {
                MaxEmptyBehavior::Fail => None,
                MaxEmptyBehavior::ReuseOldest => self.reclaim_oldest(placement),
            },
            EmptyBehavior::Fail => None,
            EmptyBehavior::ReuseOldest => self.reclaim_oldest(placement),
        };

        if let Some(handle) = spawned {
            return Ok(handle);
        }

        self.stats.failed_spawns += 1;
        log::warn!(
            "Pool '{}' refused a spawn ({} instances, max {})",
            self.key,
            self.capacity(),
            self.max_size
        );
        Err(PoolError::CapacityExceeded {
            key: self.key.clone(),
            capacity: self.capacity(),
            max_size: self.max_size,
        })
    }

    /// Return an instance to the free list now
    pub fn despawn(&mut self, handle: InstanceHandle) -> bool {
        self.despawn_after(handle, -1.0)
    }

    /// Return an instance after `delay_seconds` of [`Pool::update`] time
    ///
    /// A negative (or non-finite) delay despawns immediately. Despawning a
    /// pending instance again replaces its timer.
    pub fn despawn_after(&mut self, handle: InstanceHandle, delay_seconds: f32) -> bool {
        match self.try_despawn_after(handle, delay_seconds) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("Pool '{}': despawn rejected: {}", self.key, err);
                false
            }
        }
    }

    /// Like [`Pool::despawn_after`], reporting why a despawn was rejected
    pub fn try_despawn_after(&mut self, handle: InstanceHandle, delay_seconds: f32) -> PoolResult<()> {
        self.live_instance(handle)?;
        let id = handle.instance();

        if self.scheduler.schedule(id, handle.activation(), delay_seconds) {
            self.instances[id].mark_pending();
            log::trace!("Pool '{}': despawn of {:?} in {}s", self.key, id, delay_seconds);
        } else {
            self.release(id);
        }
        Ok(())
    }

    /// Add `count` free instances, ignoring the spawn policies
    ///
    /// A bounded max size is raised if the pool outgrows it.
    pub fn grow_by(&mut self, count: usize) {
        for _ in 0..count {
            let id = self.create_instance();
            self.free_list.push(id);
        }
        self.stats.init_added += count;

        if self.max_size > 0 && self.capacity() > self.max_size {
            self.max_size = self.capacity();
        }
        if count > 0 {
            log::debug!("Pool '{}' pre-warmed by {} to {} instances", self.key, count, self.capacity());
        }
    }

    /// Advance the pool clock and fire due delayed despawns
    ///
    /// Returns how many instances were released. Timers whose instance was
    /// reclaimed or force-despawned in the meantime are skipped.
    pub fn update(&mut self, delta_seconds: f32) -> usize {
        let mut released = 0;
        for due in self.scheduler.advance(delta_seconds) {
            let still_pending = self.instances.get(due.instance).is_some_and(|instance| {
                instance.state() == InstanceState::PendingDespawn && instance.activation() == due.activation
            });
            if still_pending {
                self.release(due.instance);
                released += 1;
            } else {
                log::trace!("Pool '{}': skipping stale despawn timer for {:?}", self.key, due.instance);
            }
        }
        released
    }

    /// Release every active and pending instance now, cancelling timers
    ///
    /// Returns how many instances were released.
    pub fn despawn_all(&mut self) -> usize {
        self.scheduler.clear();
        let in_use: Vec<InstanceId> = self.active.values().copied().collect();
        for &id in &in_use {
            self.release(id);
        }
        in_use.len()
    }

    /// Release everything, then destroy every instance
    pub fn destroy_all(&mut self) {
        self.despawn_all();
        self.free_list.clear();
        let destroyed = self.instances.len();
        for (_, instance) in self.instances.drain() {
            instance.destroy();
        }
        log::debug!("Pool '{}' destroyed {} instances", self.key, destroyed);
    }

    fn can_grow(&self) -> bool {
        self.max_size == 0 || self.capacity() < self.max_size
    }

    fn create_instance(&mut self) -> InstanceId {
        let payload = self.template.instantiate();
        self.instances.insert(Instance::new(payload))
    }

    fn activate(&mut self, id: InstanceId, placement: &Placement) -> InstanceHandle {
        let order = self.next_spawn_order;
        self.next_spawn_order += 1;

        let activation = self.instances[id].activate(order, placement);
        self.active.insert(order, id);
        self.stats.record_active(self.active.len());

        log::trace!("Pool '{}': spawned {:?} ({} active)", self.key, id, self.active.len());
        InstanceHandle::new(self.id, id, activation)
    }

    /// Take the oldest in-use instance back for a new spawn
    fn reclaim_oldest(&mut self, placement: &Placement) -> Option<InstanceHandle> {
        let (_, id) = self.active.pop_first()?;
        self.scheduler.cancel(id);
        self.instances[id].release();
        self.stats.reused_objects += 1;

        log::debug!("Pool '{}': reclaimed oldest instance {:?}", self.key, id);
        Some(self.activate(id, placement))
    }

    /// Complete the transition to `Free`
    fn release(&mut self, id: InstanceId) {
        let instance = &mut self.instances[id];
        self.active.remove(&instance.spawn_order());
        instance.release();
        self.scheduler.cancel(id);
        self.free_list.push(id);

        log::trace!("Pool '{}': despawned {:?}", self.key, id);
    }

    fn live_instance(&self, handle: InstanceHandle) -> PoolResult<&Instance<T::Instance>> {
        if handle.pool() != self.id {
            return Err(PoolError::InvalidHandle { reason: "handle belongs to another pool" });
        }
        let instance = self
            .instances
            .get(handle.instance())
            .ok_or(PoolError::InvalidHandle { reason: "instance no longer exists" })?;
        if instance.activation() != handle.activation() {
            return Err(PoolError::InvalidHandle { reason: "handle is stale" });
        }
        if !instance.state().is_in_use() {
            return Err(PoolError::InvalidHandle { reason: "instance is already free" });
        }
        Ok(instance)
    }
}

impl<T: PoolTemplate> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("key", &self.key)
            .field("capacity", &self.capacity())
            .field("active", &self.active_count())
            .field("available", &self.available_count())
            .field("max_size", &self.max_size)
            .field("empty_behavior", &self.empty_behavior)
            .field("max_empty_behavior", &self.max_empty_behavior)
            .finish_non_exhaustive()
    }
}
