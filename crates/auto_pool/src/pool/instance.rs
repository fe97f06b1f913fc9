//! Pooled instances and the handles that address them

use crate::foundation::collections::{InstanceId, PoolId};
use crate::pool::Placement;

/// Blueprint a pool builds its instances from
///
/// The template is shared read-only by its pool; its name is the pool key.
pub trait PoolTemplate {
    /// Payload type of every instance built from this template
    type Instance: Poolable;

    /// Key under which the template's pool is registered
    fn name(&self) -> &str;

    /// Build one new, inactive instance
    fn instantiate(&self) -> Self::Instance;
}

/// Lifecycle hooks for a pooled payload
pub trait Poolable {
    /// Called when the instance is handed out
    fn on_spawn(&mut self, placement: &Placement);

    /// Called when the instance returns to the free list; reset to a neutral,
    /// inactive state here
    fn on_despawn(&mut self);

    /// Called once before the instance is destroyed with its pool
    fn on_destroy(&mut self) {}
}

/// State of an instance in its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceState {
    /// On the free list, available for spawning
    Free,
    /// Handed out to a caller
    Active,
    /// Handed out, with a delayed despawn scheduled
    PendingDespawn,
}

impl InstanceState {
    /// Whether the instance counts towards the active set
    pub fn is_in_use(self) -> bool {
        !matches!(self, Self::Free)
    }
}

/// An instance owned by a pool
#[derive(Debug)]
pub struct Instance<P> {
    payload: P,
    state: InstanceState,
    /// Bumped on every spawn so handles from earlier spawns go stale
    activation: u32,
    /// Position in the pool's active order while in use
    spawn_order: u64,
}

impl<P: Poolable> Instance<P> {
    pub(crate) fn new(payload: P) -> Self {
        Self {
            payload,
            state: InstanceState::Free,
            activation: 0,
            spawn_order: 0,
        }
    }

    /// The payload
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The payload, mutably
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Current lifecycle state
    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// How many times the instance has been spawned
    pub fn activation(&self) -> u32 {
        self.activation
    }

    pub(crate) fn spawn_order(&self) -> u64 {
        self.spawn_order
    }

    pub(crate) fn activate(&mut self, spawn_order: u64, placement: &Placement) -> u32 {
        self.activation = self.activation.wrapping_add(1);
        self.spawn_order = spawn_order;
        self.state = InstanceState::Active;
        self.payload.on_spawn(placement);
        self.activation
    }

    pub(crate) fn mark_pending(&mut self) {
        self.state = InstanceState::PendingDespawn;
    }

    pub(crate) fn release(&mut self) {
        self.state = InstanceState::Free;
        self.payload.on_despawn();
    }

    pub(crate) fn destroy(mut self) {
        self.payload.on_destroy();
    }
}

/// Handle to one activation of a pooled instance
///
/// The handle names its pool, so despawns route without a key. Once the
/// instance is despawned or reclaimed the handle is stale for good, even
/// though the same instance may be handed out again under a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle {
    pool: PoolId,
    instance: InstanceId,
    activation: u32,
}

impl InstanceHandle {
    pub(crate) fn new(pool: PoolId, instance: InstanceId, activation: u32) -> Self {
        Self { pool, instance, activation }
    }

    /// Pool that owns the instance
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// Instance within the pool
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Activation this handle was issued for
    pub fn activation(&self) -> u32 {
        self.activation
    }
}
