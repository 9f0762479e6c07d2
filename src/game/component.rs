//! Component Storage
//!
//! `ComponentStorage<T>` is a sparse array indexed by entity slot. Each slot
//! remembers which entity owns it, so lookups with a stale handle miss
//! instead of returning the component of whatever took the slot over.
//!
//! A level holds a few hundred entities at most; a flat `Vec<Option<_>>` per
//! component type is all we need.

use super::entity::Entity;

pub struct ComponentStorage<T> {
    data: Vec<Option<(Entity, T)>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Attach (or replace) the component for `entity`.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some((entity, component));
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        match self.data.get(entity.index() as usize) {
            Some(Some((owner, c))) if *owner == entity => Some(c),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match self.data.get_mut(entity.index() as usize) {
            Some(Some((owner, c))) if *owner == entity => Some(c),
            _ => None,
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Iterate `(owner, component)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.data
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(e, c)| (*e, c)))
    }

    /// Empty a slot regardless of owner. Used by despawn.
    pub fn clear_slot(&mut self, index: u32) {
        if let Some(slot) = self.data.get_mut(index as usize) {
            *slot = None;
        }
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        storage.insert(entity, 42);
        assert_eq!(storage.get(entity), Some(&42));
        assert!(storage.contains(entity));
        assert!(!storage.contains(Entity::new(4, 0)));
    }

    #[test]
    fn test_stale_handle_misses() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        let old = Entity::new(2, 0);
        let new = Entity::new(2, 1);

        storage.insert(new, "mushroom");
        assert_eq!(storage.get(old), None);
        assert!(!storage.contains(old));
        assert_eq!(storage.get(new), Some(&"mushroom"));
    }

    #[test]
    fn test_clear_slot_drops_any_owner() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new();
        let entity = Entity::new(3, 4);

        storage.insert(entity, 100);
        storage.clear_slot(3);
        assert!(!storage.contains(entity));
        assert_eq!(storage.iter().count(), 0);
    }

    #[test]
    fn test_iteration_yields_owners() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        storage.insert(Entity::new(0, 0), "brick");
        storage.insert(Entity::new(7, 3), "coin");

        let items: Vec<_> = storage.iter().collect();
        assert_eq!(items, vec![(Entity::new(0, 0), &"brick"), (Entity::new(7, 3), &"coin")]);
    }
}
