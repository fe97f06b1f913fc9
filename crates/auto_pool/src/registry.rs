//! Pool Registry
//!
//! Single entry point for spawning: maps template names to pools, creates
//! pools on request, routes despawns by handle, and drives delayed despawns
//! from the host's update loop.
//!
//! # Architecture
//!
//! ```text
//! Application → PoolRegistry → name index ──> Pool containers (SlotMap<PoolId, Pool>)
//!      |              |              |                    |
//!   spawn(key)   resolve key    lazy scan for       policy + instances
//!      |              |         unindexed pools            |
//!   Handle ←──────────┴──────────────────────────── InstanceHandle
//! ```
//!
//! Pools created through the registry are indexed immediately. Pools attached
//! with [`PoolRegistry::attach_pool`] are found by name on first lookup. An
//! index entry whose pool was destroyed by id is pruned the next time the key
//! is looked up.
//!
//! Lookups on unknown keys never fail loudly: they report `None`, `false` or
//! `0`. The `try_*` variants say why.

use crate::config::{PoolConfig, RegistryConfig};
use crate::error::{PoolError, PoolResult};
use crate::foundation::collections::{PoolId, SlotMap};
use crate::pool::{
    EmptyBehavior, InstanceHandle, MaxEmptyBehavior, Placement, Pool, PoolReport, PoolTemplate,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Growth and policy request for [`PoolRegistry::ensure_pool_with`]
///
/// `add` below 1 grows by that fraction of the current capacity; 1 or more
/// adds that many instances. `min_size` tops the pool up to at least that
/// many instances on top of the `add` growth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnsurePool {
    add_amount: f32,
    min_size: usize,
    behaviors: Option<(EmptyBehavior, MaxEmptyBehavior)>,
}

impl EnsurePool {
    /// Resolve or create the pool without growing it
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow by a fraction (< 1) of the capacity or by a count (>= 1)
    pub fn add(mut self, amount: f32) -> Self {
        self.add_amount = amount;
        self
    }

    /// Make sure the pool holds at least this many instances
    pub fn min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Behaviors for a new pool, also written to an existing pool when it grows
    pub fn behaviors(mut self, empty: EmptyBehavior, max_empty: MaxEmptyBehavior) -> Self {
        self.behaviors = Some((empty, max_empty));
        self
    }

    fn requests_growth(&self) -> bool {
        self.add_amount > 0.0 || self.min_size > 0
    }

    /// Instances to add to a pool currently holding `capacity`
    ///
    /// A count of 1 or more is added even to an empty pool, so `add` alone
    /// can size a fresh pool; a fraction of an empty pool is 0.
    #[allow(clippy::cast_precision_loss)]
    pub fn growth(&self, capacity: usize) -> usize {
        let add = if self.add_amount.is_finite() { self.add_amount } else { 0.0 };
        let scaled = if (0.0..1.0).contains(&add) {
            round_count(capacity as f32 * add)
        } else if add >= 1.0 {
            round_count(add)
        } else {
            0
        };
        scaled + self.min_size.saturating_sub(capacity)
    }
}

/// Round half to even, clamping negatives to zero
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_count(value: f32) -> usize {
    value.round_ties_even().max(0.0) as usize
}

/// Registry of pools keyed by template name
pub struct PoolRegistry<T: PoolTemplate> {
    config: RegistryConfig,
    pools: SlotMap<PoolId, Pool<T>>,
    index: HashMap<String, PoolId>,
}

impl<T: PoolTemplate> PoolRegistry<T> {
    /// Create an empty registry
    pub fn init(config: RegistryConfig) -> Self {
        log::info!(
            "Initialized pool registry (create: {}, modify: {}, {} presets)",
            config.allow_create,
            config.allow_modify,
            config.pools.len()
        );
        Self {
            config,
            pools: SlotMap::with_key(),
            index: HashMap::new(),
        }
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of pool containers, indexed or not
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Create and index a pool for `template`
    pub fn create_pool(&mut self, template: Arc<T>, config: PoolConfig) -> PoolResult<PoolId> {
        if self.resolve(template.name()).is_ok() {
            return Err(PoolError::DuplicatePool { key: template.name().to_string() });
        }
        Ok(self.insert_indexed(Pool::new(template, config)))
    }

    /// Create a pool using the configured preset for the template's name
    pub fn create_pool_preset(&mut self, template: Arc<T>) -> PoolResult<PoolId> {
        let config = self.config.pool_config(template.name());
        self.create_pool(template, config)
    }

    /// Register a pool built elsewhere without indexing it
    ///
    /// The pool is found by name on first lookup. If a pool already answers to
    /// the same key, the new one is destroyed and `DuplicatePool` returned.
    pub fn attach_pool(&mut self, mut pool: Pool<T>) -> PoolResult<PoolId> {
        if self.resolve(pool.key()).is_ok() {
            log::warn!("Rejected attached pool '{}': key already registered", pool.key());
            let key = pool.key().to_string();
            pool.destroy_all();
            return Err(PoolError::DuplicatePool { key });
        }
        let id = self.pools.insert(pool);
        self.pools[id].bind(id);
        Ok(id)
    }

    /// Destroy a pool container by id, leaving its name index entry behind
    ///
    /// This is how a host tears down a pool it owns the id of; the stale index
    /// entry is pruned on the next lookup of its key.
    pub fn destroy_pool_by_id(&mut self, id: PoolId) -> bool {
        match self.pools.remove(id) {
            Some(mut pool) => {
                pool.destroy_all();
                log::info!("Destroyed pool container '{}'", pool.key());
                true
            }
            None => false,
        }
    }

    /// Resolve or create the pool for `template` and apply growth and policy
    ///
    /// See [`PoolRegistry::ensure_pool_with`].
    pub fn ensure_pool(
        &mut self,
        template: &Arc<T>,
        add_amount: f32,
        min_size: usize,
        empty_behavior: EmptyBehavior,
        max_empty_behavior: MaxEmptyBehavior,
    ) -> bool {
        let request = EnsurePool::new()
            .add(add_amount)
            .min_size(min_size)
            .behaviors(empty_behavior, max_empty_behavior);
        self.ensure_pool_with(template, request)
    }

    /// Resolve or create the pool for `template` and apply `request`
    ///
    /// Returns `false` only when the pool is unknown and creation is
    /// disallowed. Growth and policy changes are applied to a fresh pool
    /// always, and to an existing one only when the registry allows modifying.
    pub fn ensure_pool_with(&mut self, template: &Arc<T>, request: EnsurePool) -> bool {
        self.try_ensure_pool(template, request).is_ok()
    }

    /// Like [`PoolRegistry::ensure_pool_with`], reporting why it failed
    pub fn try_ensure_pool(&mut self, template: &Arc<T>, request: EnsurePool) -> PoolResult<PoolId> {
        let key = template.name();
        let (id, created) = match self.resolve(key) {
            Ok(id) => (id, false),
            Err(_) if self.config.allow_create => {
                let (empty, max_empty) = request.behaviors.unwrap_or_default();
                let pool = Pool::new(Arc::clone(template), PoolConfig::empty(empty, max_empty));
                (self.insert_indexed(pool), true)
            }
            Err(_) => {
                log::warn!("Pool creation disallowed for '{}'", key);
                return Err(PoolError::CreationDisallowed { key: key.to_string() });
            }
        };

        if !(self.config.allow_modify || created) || !request.requests_growth() {
            return Ok(id);
        }

        let pool = &mut self.pools[id];
        let growth = request.growth(pool.capacity());
        pool.grow_by(growth);
        pool.set_max_size(pool.capacity() * 2);
        if let Some((empty, max_empty)) = request.behaviors {
            pool.set_empty_behavior(empty);
            pool.set_max_empty_behavior(max_empty);
        }
        log::debug!(
            "Ensured pool '{}': +{} to {} instances, max {}",
            pool.key(),
            growth,
            pool.capacity(),
            pool.max_size()
        );
        Ok(id)
    }

    /// Spawn from the pool registered under `key`
    pub fn spawn(&mut self, key: &str, placement: &Placement) -> Option<InstanceHandle> {
        match self.try_spawn(key, placement) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::debug!("Spawn from '{}' failed: {}", key, err);
                None
            }
        }
    }

    /// Spawn from the pool registered under `key`, reporting why it failed
    pub fn try_spawn(&mut self, key: &str, placement: &Placement) -> PoolResult<InstanceHandle> {
        let id = self.resolve(key)?;
        self.pools[id].try_spawn(placement)
    }

    /// Despawn immediately
    pub fn despawn(&mut self, handle: InstanceHandle) -> bool {
        self.despawn_after(handle, -1.0)
    }

    /// Despawn after `delay_seconds` of update time; negative means now
    pub fn despawn_after(&mut self, handle: InstanceHandle, delay_seconds: f32) -> bool {
        self.pools
            .get_mut(handle.pool())
            .is_some_and(|pool| pool.despawn_after(handle, delay_seconds))
    }

    /// Like [`PoolRegistry::despawn_after`], reporting why it was rejected
    pub fn try_despawn_after(&mut self, handle: InstanceHandle, delay_seconds: f32) -> PoolResult<()> {
        self.pools
            .get_mut(handle.pool())
            .ok_or(PoolError::InvalidHandle { reason: "pool no longer exists" })?
            .try_despawn_after(handle, delay_seconds)
    }

    /// Payload behind a live handle
    pub fn get(&self, handle: InstanceHandle) -> Option<&T::Instance> {
        self.pools.get(handle.pool())?.get(handle)
    }

    /// Payload behind a live handle, mutably
    pub fn get_mut(&mut self, handle: InstanceHandle) -> Option<&mut T::Instance> {
        self.pools.get_mut(handle.pool())?.get_mut(handle)
    }

    /// Pool registered under `key`
    pub fn pool(&mut self, key: &str) -> Option<&Pool<T>> {
        let id = self.resolve(key).ok()?;
        self.pools.get(id)
    }

    /// Pool registered under `key`, mutably
    pub fn pool_mut(&mut self, key: &str) -> Option<&mut Pool<T>> {
        let id = self.resolve(key).ok()?;
        self.pools.get_mut(id)
    }

    /// Whether a pool answers to `key`
    pub fn contains_pool(&mut self, key: &str) -> bool {
        self.resolve(key).is_ok()
    }

    /// In-use instances of the pool under `key`, or 0 if there is none
    pub fn active_count(&mut self, key: &str) -> usize {
        self.pool(key).map_or(0, Pool::active_count)
    }

    /// Free instances of the pool under `key`, or 0 if there is none
    pub fn available_count(&mut self, key: &str) -> usize {
        self.pool(key).map_or(0, Pool::available_count)
    }

    /// Release every instance of the pool under `key` now
    pub fn despawn_pool(&mut self, key: &str) -> bool {
        match self.pool_mut(key) {
            Some(pool) => {
                let released = pool.despawn_all();
                log::debug!("Despawned {} instances of '{}'", released, key);
                true
            }
            None => false,
        }
    }

    /// Release every instance of every pool now
    ///
    /// Returns `false` if stale index entries had to be pruned on the way.
    pub fn despawn_all(&mut self) -> bool {
        let clean = self.prune_stale() == 0;
        let released: usize = self.pools.values_mut().map(Pool::despawn_all).sum();
        log::debug!("Despawned {} instances across {} pools", released, self.pools.len());
        clean
    }

    /// Destroy the pool under `key` and drop it from the registry
    pub fn remove_pool(&mut self, key: &str) -> bool {
        let Ok(id) = self.resolve(key) else {
            return false;
        };
        self.index.remove(key);
        if let Some(mut pool) = self.pools.remove(id) {
            pool.destroy_all();
        }
        log::info!("Removed pool '{}'", key);
        true
    }

    /// Destroy every pool
    ///
    /// Returns `false` if stale index entries had to be pruned on the way.
    pub fn remove_all(&mut self) -> bool {
        let clean = self.prune_stale() == 0;
        let ids: Vec<PoolId> = self.pools.keys().collect();
        for id in ids {
            if let Some(mut pool) = self.pools.remove(id) {
                pool.destroy_all();
                log::info!("Removed pool '{}'", pool.key());
            }
        }
        self.index.clear();
        clean
    }

    /// Advance every pool by one host tick and fire due delayed despawns
    ///
    /// Returns how many instances were released.
    pub fn update(&mut self, delta_seconds: f32) -> usize {
        self.pools.values_mut().map(|pool| pool.update(delta_seconds)).sum()
    }

    /// Usage snapshot of every pool, sorted by key
    pub fn report(&self) -> Vec<PoolReport> {
        let mut reports: Vec<PoolReport> = self.pools.values().map(Pool::report).collect();
        reports.sort_by(|a, b| a.key.cmp(&b.key));
        reports
    }

    /// Log every pool's usage report
    pub fn log_reports(&self) {
        for report in self.report() {
            log::info!("{}", report);
        }
    }

    /// Shut the registry down, destroying every pool
    ///
    /// Returns the final usage reports; they are also logged when the
    /// configuration asks for it.
    pub fn teardown(mut self) -> Vec<PoolReport> {
        let reports = self.report();
        if self.config.report_on_teardown {
            self.log_reports();
        }
        self.remove_all();
        log::info!("Pool registry torn down ({} pools)", reports.len());
        reports
    }

    fn insert_indexed(&mut self, pool: Pool<T>) -> PoolId {
        let key = pool.key().to_string();
        let id = self.pools.insert(pool);
        self.pools[id].bind(id);
        self.index.insert(key, id);
        id
    }

    /// Find the pool for `key`, healing the index on the way
    fn resolve(&mut self, key: &str) -> PoolResult<PoolId> {
        let mut stale = false;
        if let Some(&id) = self.index.get(key) {
            if self.pools.contains_key(id) {
                return Ok(id);
            }
            log::warn!("Pruning stale pool reference for '{}'", key);
            self.index.remove(key);
            stale = true;
        }

        let found = self
            .pools
            .iter()
            .find(|(_, pool)| pool.key() == key)
            .map(|(id, _)| id);
        match found {
            Some(id) => {
                self.index.insert(key.to_string(), id);
                Ok(id)
            }
            None if stale => Err(PoolError::StaleReference { key: key.to_string() }),
            None => Err(PoolError::NotFound { key: key.to_string() }),
        }
    }

    /// Drop index entries whose pool is gone; returns how many were dropped
    fn prune_stale(&mut self) -> usize {
        let before = self.index.len();
        let pools = &self.pools;
        self.index.retain(|key, id| {
            let live = pools.contains_key(*id);
            if !live {
                log::warn!("Pruning stale pool reference for '{}'", key);
            }
            live
        });
        before - self.index.len()
    }
}

impl<T: PoolTemplate> std::fmt::Debug for PoolRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("config", &self.config)
            .field("pools", &self.pools.len())
            .field("indexed", &self.index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::test_support::{Counters, Rock};

    fn registry() -> PoolRegistry<Rock> {
        PoolRegistry::init(RegistryConfig::default())
    }

    #[test]
    fn test_growth_fraction_and_count() {
        assert_eq!(EnsurePool::new().add(0.5).growth(10), 5);
        assert_eq!(EnsurePool::new().add(0.5).growth(5), 2);
        assert_eq!(EnsurePool::new().add(0.5).growth(7), 4);
        assert_eq!(EnsurePool::new().add(3.4).growth(10), 3);
        assert_eq!(EnsurePool::new().add(2.5).growth(0), 2);
        assert_eq!(EnsurePool::new().add(-2.0).growth(10), 0);
        assert_eq!(EnsurePool::new().add(f32::NAN).growth(10), 0);
    }

    #[test]
    fn test_growth_adds_min_size_shortfall() {
        assert_eq!(EnsurePool::new().min_size(10).growth(4), 6);
        assert_eq!(EnsurePool::new().add(0.5).min_size(10).growth(4), 8);
        assert_eq!(EnsurePool::new().add(0.5).min_size(10).growth(10), 5);
    }

    #[test]
    fn test_ensure_pool_end_to_end() {
        let mut registry = registry();
        let rock = Arc::new(Rock::new("rock"));
        registry.create_pool(Arc::clone(&rock), PoolConfig::new(10, 0)).unwrap();

        assert!(registry.ensure_pool(&rock, 0.5, 10, EmptyBehavior::Grow, MaxEmptyBehavior::Fail));
        let pool = registry.pool("rock").unwrap();
        assert_eq!(pool.capacity(), 15);
        assert_eq!(pool.max_size(), 30);
        assert_eq!(pool.stats().init_added, 5);
    }

    #[test]
    fn test_ensure_pool_creates_fresh_pool() {
        let mut registry = registry();
        let rock = Arc::new(Rock::new("rock"));

        assert!(registry.ensure_pool(&rock, 0.0, 4, EmptyBehavior::Fail, MaxEmptyBehavior::ReuseOldest));
        let pool = registry.pool("rock").unwrap();
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.max_size(), 8);
        assert_eq!(pool.stats().start_size, 0);
        assert_eq!(pool.empty_behavior(), EmptyBehavior::Fail);
        assert_eq!(pool.max_empty_behavior(), MaxEmptyBehavior::ReuseOldest);
    }

    #[test]
    fn test_ensure_pool_without_growth_is_unbounded() {
        let mut registry = registry();
        let rock = Arc::new(Rock::new("rock"));

        assert!(registry.ensure_pool_with(&rock, EnsurePool::new()));
        assert_eq!(registry.pool("rock").unwrap().max_size(), 0);
        for _ in 0..3 {
            assert!(registry.spawn("rock", &Placement::default()).is_some());
        }
        assert_eq!(registry.active_count("rock"), 3);
    }

    #[test]
    fn test_ensure_pool_keeps_behaviors_when_not_given() {
        let mut registry = registry();
        let rock = Arc::new(Rock::new("rock"));
        let config = PoolConfig::new(2, 4).with_behaviors(EmptyBehavior::ReuseOldest, MaxEmptyBehavior::Fail);
        registry.create_pool(Arc::clone(&rock), config).unwrap();

        assert!(registry.ensure_pool_with(&rock, EnsurePool::new().add(2.0).min_size(3)));
        let pool = registry.pool("rock").unwrap();
        assert_eq!(pool.capacity(), 5);
        assert_eq!(pool.max_size(), 10);
        assert_eq!(pool.empty_behavior(), EmptyBehavior::ReuseOldest);
    }

    #[test]
    fn test_ensure_pool_creation_disallowed() {
        let mut registry = PoolRegistry::init(RegistryConfig {
            allow_create: false,
            ..RegistryConfig::default()
        });
        let rock = Arc::new(Rock::new("rock"));

        assert!(!registry.ensure_pool(&rock, 1.0, 1, EmptyBehavior::Grow, MaxEmptyBehavior::Fail));
        assert_eq!(
            registry.try_ensure_pool(&rock, EnsurePool::new()),
            Err(PoolError::CreationDisallowed { key: "rock".to_string() })
        );
        assert_eq!(registry.pool_count(), 0);
    }

    #[test]
    fn test_ensure_pool_modify_disallowed() {
        let mut registry = PoolRegistry::init(RegistryConfig {
            allow_modify: false,
            ..RegistryConfig::default()
        });
        let rock = Arc::new(Rock::new("rock"));

        // A fresh pool is always shaped by the request.
        assert!(registry.ensure_pool(&rock, 0.0, 4, EmptyBehavior::Grow, MaxEmptyBehavior::Fail));
        assert_eq!(registry.pool("rock").unwrap().capacity(), 4);

        // An existing one is left alone.
        assert!(registry.ensure_pool(&rock, 10.0, 0, EmptyBehavior::Fail, MaxEmptyBehavior::Fail));
        let pool = registry.pool("rock").unwrap();
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.empty_behavior(), EmptyBehavior::Grow);
    }

    #[test]
    fn test_create_pool_rejects_duplicate() {
        let mut registry = registry();
        let rock = Arc::new(Rock::new("rock"));
        registry.create_pool(Arc::clone(&rock), PoolConfig::new(1, 0)).unwrap();

        assert_eq!(
            registry.create_pool(rock, PoolConfig::new(1, 0)),
            Err(PoolError::DuplicatePool { key: "rock".to_string() })
        );
    }

    #[test]
    fn test_create_pool_preset() {
        let config = RegistryConfig::default().with_pool("rock", PoolConfig::new(3, 6));
        let mut registry = PoolRegistry::init(config);

        registry.create_pool_preset(Arc::new(Rock::new("rock"))).unwrap();
        registry.create_pool_preset(Arc::new(Rock::new("dust"))).unwrap();

        assert_eq!(registry.available_count("rock"), 3);
        assert_eq!(registry.pool("rock").unwrap().max_size(), 6);
        assert_eq!(registry.available_count("dust"), PoolConfig::default().initial_size);
    }

    #[test]
    fn test_unknown_key_reports_nothing() {
        let mut registry = registry();
        assert!(registry.spawn("ghost", &Placement::default()).is_none());
        assert_eq!(
            registry.try_spawn("ghost", &Placement::default()),
            Err(PoolError::NotFound { key: "ghost".to_string() })
        );
        assert_eq!(registry.active_count("ghost"), 0);
        assert_eq!(registry.available_count("ghost"), 0);
        assert!(!registry.despawn_pool("ghost"));
        assert!(!registry.remove_pool("ghost"));
    }

    #[test]
    fn test_spawn_and_despawn_route_by_handle() {
        let mut registry = registry();
        registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(2, 0)).unwrap();
        registry.create_pool(Arc::new(Rock::new("dust")), PoolConfig::new(2, 0)).unwrap();

        let rock = registry.spawn("rock", &Placement::default()).unwrap();
        let dust = registry.spawn("dust", &Placement::default()).unwrap();
        assert_eq!(registry.active_count("rock"), 1);
        assert!(registry.get(rock).unwrap().live);

        assert!(registry.despawn(rock));
        assert!(!registry.despawn(rock));
        assert_eq!(registry.active_count("rock"), 0);
        assert_eq!(registry.active_count("dust"), 1);
        assert!(registry.get_mut(dust).is_some());
    }

    #[test]
    fn test_attached_pool_is_resolved_by_name() {
        let mut registry = registry();
        let pool = Pool::new(Arc::new(Rock::new("rock")), PoolConfig::new(2, 0));
        let id = registry.attach_pool(pool).unwrap();

        let handle = registry.spawn("rock", &Placement::default()).unwrap();
        assert_eq!(handle.pool(), id);
        assert_eq!(registry.available_count("rock"), 1);
    }

    #[test]
    fn test_attach_duplicate_is_destroyed() {
        let counters = Counters::default();
        let mut registry = registry();
        registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(1, 0)).unwrap();

        let duplicate = Pool::new(Arc::new(Rock::with_counters("rock", counters.clone())), PoolConfig::new(2, 0));
        assert!(registry.attach_pool(duplicate).is_err());
        assert_eq!(counters.destroyed.get(), 2);
        assert_eq!(registry.pool_count(), 1);
    }

    #[test]
    fn test_stale_reference_is_pruned() {
        let mut registry = registry();
        let id = registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(1, 0)).unwrap();
        let handle = registry.spawn("rock", &Placement::default()).unwrap();

        assert!(registry.destroy_pool_by_id(id));
        assert!(!registry.despawn(handle));
        assert_eq!(
            registry.try_spawn("rock", &Placement::default()),
            Err(PoolError::StaleReference { key: "rock".to_string() })
        );
        // The entry is gone now; the key is simply unknown.
        assert_eq!(
            registry.try_spawn("rock", &Placement::default()),
            Err(PoolError::NotFound { key: "rock".to_string() })
        );
    }

    #[test]
    fn test_stale_reference_re_resolves_to_attached_pool() {
        let mut registry = registry();
        let old = registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(1, 0)).unwrap();
        registry.destroy_pool_by_id(old);

        let new = registry
            .attach_pool(Pool::new(Arc::new(Rock::new("rock")), PoolConfig::new(3, 0)))
            .unwrap();
        assert_ne!(old, new);
        assert_eq!(registry.available_count("rock"), 3);
        assert_eq!(registry.spawn("rock", &Placement::default()).unwrap().pool(), new);
    }

    #[test]
    fn test_despawn_all_cancels_delays() {
        let mut registry = registry();
        registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(2, 0)).unwrap();
        let a = registry.spawn("rock", &Placement::default()).unwrap();
        registry.spawn("rock", &Placement::default()).unwrap();
        assert!(registry.despawn_after(a, 5.0));

        assert!(registry.despawn_all());
        assert_eq!(registry.active_count("rock"), 0);
        assert_eq!(registry.available_count("rock"), 2);
        assert_eq!(registry.update(10.0), 0);
    }

    #[test]
    fn test_despawn_all_reports_stale_entries() {
        let mut registry = registry();
        let id = registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(1, 0)).unwrap();
        registry.destroy_pool_by_id(id);
        assert!(!registry.despawn_all());
        assert!(registry.despawn_all());
    }

    #[test]
    fn test_update_fires_delayed_despawn() {
        let mut registry = registry();
        registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(1, 0)).unwrap();
        let handle = registry.spawn("rock", &Placement::default()).unwrap();

        assert!(registry.despawn_after(handle, 5.0));
        assert_eq!(registry.update(2.0), 0);
        assert_eq!(registry.active_count("rock"), 1);
        assert_eq!(registry.update(3.0), 1);
        assert_eq!(registry.available_count("rock"), 1);
    }

    #[test]
    fn test_remove_pool_destroys_instances() {
        let counters = Counters::default();
        let mut registry = registry();
        let rock = Arc::new(Rock::with_counters("rock", counters.clone()));
        registry.create_pool(rock, PoolConfig::new(3, 0)).unwrap();
        let handle = registry.spawn("rock", &Placement::default()).unwrap();

        assert!(registry.remove_pool("rock"));
        assert_eq!(counters.destroyed.get(), 3);
        assert!(!registry.contains_pool("rock"));
        assert!(!registry.despawn(handle));
        assert!(registry.spawn("rock", &Placement::default()).is_none());
    }

    #[test]
    fn test_remove_all() {
        let mut registry = registry();
        registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(1, 0)).unwrap();
        registry
            .attach_pool(Pool::new(Arc::new(Rock::new("dust")), PoolConfig::new(1, 0)))
            .unwrap();

        assert!(registry.remove_all());
        assert_eq!(registry.pool_count(), 0);
        assert!(!registry.contains_pool("rock"));
        assert!(!registry.contains_pool("dust"));
    }

    #[test]
    fn test_report_sorted_by_key() {
        let mut registry = registry();
        registry.create_pool(Arc::new(Rock::new("rock")), PoolConfig::new(1, 0)).unwrap();
        registry.create_pool(Arc::new(Rock::new("dust")), PoolConfig::new(2, 0)).unwrap();
        registry.spawn("rock", &Placement::default()).unwrap();

        let keys: Vec<_> = registry.report().into_iter().map(|report| report.key).collect();
        assert_eq!(keys, vec!["dust".to_string(), "rock".to_string()]);
    }

    #[test]
    fn test_teardown_returns_final_reports() {
        let counters = Counters::default();
        let mut registry = PoolRegistry::init(RegistryConfig {
            report_on_teardown: true,
            ..RegistryConfig::default()
        });
        registry
            .create_pool(Arc::new(Rock::with_counters("rock", counters.clone())), PoolConfig::new(2, 0))
            .unwrap();
        registry.spawn("rock", &Placement::default()).unwrap();

        let reports = registry.teardown();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].most_active, 1);
        assert_eq!(reports[0].end_size, 2);
        assert_eq!(counters.destroyed.get(), 2);
    }
}
