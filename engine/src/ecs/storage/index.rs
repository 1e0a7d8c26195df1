use crate::ecs::{entity, storage::row::Row};

/// A block-based sparse index mapping entity indices to dense column rows.
///
/// The entity index space is divided into fixed-size blocks and memory is only allocated for
/// blocks holding at least one entry. Within a block a dense vector stores the mapping, so a
/// lookup is two bounds checks and a load.
///
/// Entity indices are allocated lowest-first and recycled, so ids stay locally dense and most
/// columns touch a handful of blocks.
///
/// | Operation | Time | Memory |
/// |-----------|------|--------|
/// | `insert()` | O(1) amortized | Allocates block on first use |
/// | `get()` | O(1) | No allocation |
/// | `remove()` | O(1) | No deallocation (leaves `None`) |
#[derive(Debug)]
pub struct DynamicIndex {
    /// The number of slots per block.
    block_size: usize,

    /// Outer Vec is indexed by `entity_index / block_size`.
    /// Inner Vec is indexed by `entity_index % block_size`.
    maps: Vec<Option<Vec<Option<Row>>>>,
}

impl DynamicIndex {
    pub const DEFAULT_BLOCK_SIZE: usize = 256;

    /// Create a new DynamicIndex with the default block size.
    #[inline]
    pub const fn new() -> Self {
        Self::new_with_block_size(Self::DEFAULT_BLOCK_SIZE)
    }

    /// Create a new DynamicIndex with a custom block size.
    ///
    /// # Panics
    ///
    /// Debug builds panic if block_size is 0.
    #[inline]
    pub const fn new_with_block_size(block_size: usize) -> Self {
        debug_assert!(block_size > 0, "block_size must be greater than 0");
        Self {
            block_size,
            maps: Vec::new(),
        }
    }

    #[inline]
    fn indices(&self, entity: entity::Entity) -> (usize, usize) {
        let entity_index = entity.index();
        (entity_index / self.block_size, entity_index % self.block_size)
    }

    /// Get the number of block slots (allocated or not).
    #[cfg(test)]
    #[inline]
    pub fn block_count(&self) -> usize {
        self.maps.len()
    }

    /// Get the number of blocks that have been allocated.
    #[cfg(test)]
    pub fn allocated_block_count(&self) -> usize {
        self.maps.iter().filter(|b| b.is_some()).count()
    }

    /// Map the entity's index to `row`, replacing any previous mapping.
    pub fn insert(&mut self, entity: entity::Entity, row: Row) {
        let (block_index, within_block_index) = self.indices(entity);

        if block_index >= self.maps.len() {
            self.maps.resize_with(block_index + 1, || None);
        }

        let block_size = self.block_size;
        let block = self.maps[block_index].get_or_insert_with(|| vec![None; block_size]);
        block[within_block_index] = Some(row);
    }

    /// Get the row mapped to the entity's index.
    pub fn get(&self, entity: entity::Entity) -> Option<Row> {
        let (block_index, within_block_index) = self.indices(entity);
        let block = self.maps.get(block_index)?.as_ref()?;
        block[within_block_index]
    }

    /// Remove and return the row mapped to the entity's index.
    pub fn remove(&mut self, entity: entity::Entity) -> Option<Row> {
        let (block_index, within_block_index) = self.indices(entity);
        let block = self.maps.get_mut(block_index)?.as_mut()?;
        block[within_block_index].take()
    }
}

impl Default for DynamicIndex {
    /// Custom default to ensure we get the default block size.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::entity::Entity;

    use super::*;

    fn entity(id: u32) -> Entity {
        Entity::new(id)
    }

    fn row(index: usize) -> Option<Row> {
        Some(Row::new(index))
    }

    #[test]
    fn dynamic_index_single_block() {
        // Given
        let mut index = DynamicIndex::new_with_block_size(10);

        // When
        index.insert(entity(0), 10.into());
        index.insert(entity(5), 40.into());
        index.insert(entity(9), 80.into());

        // Then
        assert_eq!(index.block_count(), 1);
        assert_eq!(index.get(entity(0)), row(10));
        assert_eq!(index.get(entity(1)), None);
        assert_eq!(index.get(entity(5)), row(40));
        assert_eq!(index.get(entity(9)), row(80));
    }

    #[test]
    fn dynamic_index_block_skipping() {
        // Given
        let mut index = DynamicIndex::new_with_block_size(4);

        // When
        index.insert(entity(0), 10.into());
        index.insert(entity(9), 80.into());

        // Then - Three block slots with the middle one unallocated
        assert_eq!(index.block_count(), 3);
        assert_eq!(index.allocated_block_count(), 2);
        assert_eq!(index.maps[1], None);
        assert_eq!(index.get(entity(5)), None);
    }

    #[test]
    fn dynamic_index_overwrite_and_remove() {
        // Given
        let mut index = DynamicIndex::new();
        index.insert(entity(3), 1.into());

        // When
        index.insert(entity(3), 7.into());

        // Then
        assert_eq!(index.get(entity(3)), row(7));
        assert_eq!(index.remove(entity(3)), row(7));
        assert_eq!(index.remove(entity(3)), None);
        assert_eq!(index.remove(entity(100_000)), None);
    }

    #[test]
    fn dynamic_index_ignores_generation() {
        // Given
        let mut index = DynamicIndex::new();
        let old = entity(2);

        // When
        index.insert(old, 4.into());

        // Then - Lookups are by slot index only
        assert_eq!(index.get(old.genned()), row(4));
    }
}
