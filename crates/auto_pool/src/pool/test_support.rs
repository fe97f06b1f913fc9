//! Shared fixtures for pool and registry tests

use crate::foundation::math::Vec3;
use crate::pool::{Placement, PoolTemplate, Poolable};
use std::cell::Cell;
use std::rc::Rc;

/// Counters shared by every instance of a template
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub destroyed: Rc<Cell<usize>>,
}

#[derive(Debug)]
pub struct Rock {
    name: String,
    counters: Counters,
}

impl Rock {
    pub fn new(name: &str) -> Self {
        Self::with_counters(name, Counters::default())
    }

    pub fn with_counters(name: &str, counters: Counters) -> Self {
        Self { name: name.to_string(), counters }
    }
}

#[derive(Debug)]
pub struct RockState {
    pub live: bool,
    pub spawns: u32,
    pub despawns: u32,
    pub variant: Option<usize>,
    pub position: Vec3,
    counters: Counters,
}

impl PoolTemplate for Rock {
    type Instance = RockState;

    fn name(&self) -> &str {
        &self.name
    }

    fn instantiate(&self) -> RockState {
        RockState {
            live: false,
            spawns: 0,
            despawns: 0,
            variant: None,
            position: Vec3::zeros(),
            counters: self.counters.clone(),
        }
    }
}

impl Poolable for RockState {
    fn on_spawn(&mut self, placement: &Placement) {
        self.live = true;
        self.spawns += 1;
        self.variant = placement.variant;
        self.position = placement.position.unwrap_or_else(Vec3::zeros);
    }

    fn on_despawn(&mut self) {
        self.live = false;
        self.despawns += 1;
        self.variant = None;
    }

    fn on_destroy(&mut self) {
        self.counters.destroyed.set(self.counters.destroyed.get() + 1);
    }
}
