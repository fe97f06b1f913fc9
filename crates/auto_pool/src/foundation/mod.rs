//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the pool system:
//! - Math aliases for spawn placement
//! - Slot-map key types for pools and instances
//! - Simulation and frame clocks
//! - Logging setup

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
