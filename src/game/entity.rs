//! Entity handles with generational indices
//!
//! Everything in a level (bricks, boxes, coins, shrooms, the player, the HUD
//! labels) is an entity. Handles are index + generation, so a collision event
//! that still names a coin the player already picked up can never resolve to
//! whatever entity reused that slot afterwards.

/// Handle to an entity living in a [`World`](super::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Only the allocator hands these out.
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address component storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Handle that never refers to a live entity.
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Hands out entity slots and recycles them with a bumped generation.
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    /// Freed slots, reused LIFO
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_indices: Vec::new(),
            alive_count: 0,
        }
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            let idx = index as usize;
            self.alive[idx] = true;
            Entity::new(index, self.generations[idx])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            Entity::new(index, 0)
        }
    }

    /// Release an entity. Returns false if it was already gone.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let idx = entity.index as usize;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.alive[idx] = false;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let idx = entity.index as usize;
        idx < self.generations.len() && self.alive[idx] && self.generations[idx] == entity.generation
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
