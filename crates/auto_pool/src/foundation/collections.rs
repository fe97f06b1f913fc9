//! Handle types for pooled storage
//!
//! Pools and instances live in slot maps, so every key carries a generation
//! and a key from a destroyed slot never resolves to a newer occupant.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Identifies a pool container inside a registry
    pub struct PoolId;

    /// Identifies an instance inside its pool
    pub struct InstanceId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_key_does_not_resolve() {
        let mut map: SlotMap<InstanceId, u32> = SlotMap::with_key();
        let first = map.insert(1);
        map.remove(first);
        let second = map.insert(2);

        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&2));
    }
}
