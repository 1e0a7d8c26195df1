use std::any::Any;

use crate::ecs::{
    component::Component,
    entity::Entity,
    storage::{index::DynamicIndex, row::Row},
};

/// Dense storage for every value of one component type.
///
/// Values and their owning entities live in two parallel vecs so iteration over all holders of
/// the type is a linear walk. The [`DynamicIndex`] maps an entity's slot index to its row.
/// Removal swaps the last row into the hole, which is O(1) but does not preserve order.
#[derive(Debug)]
pub struct Column<C> {
    /// The entity owning each row.
    entities: Vec<Entity>,

    /// The component value of each row.
    values: Vec<C>,

    /// Entity index to row.
    index: DynamicIndex,
}

impl<C> Default for Column<C> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            values: Vec::new(),
            index: DynamicIndex::new(),
        }
    }
}

impl<C: Component> Column<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` for the entity, returning the value it replaced.
    pub fn insert(&mut self, entity: Entity, value: C) -> Option<C> {
        if let Some(row) = self.index.get(entity) {
            // The slot's previous owner must have been released before the index was reused.
            debug_assert_eq!(self.entities[row.index()], entity);
            return Some(std::mem::replace(&mut self.values[row.index()], value));
        }

        self.index.insert(entity, Row::new(self.values.len()));
        self.entities.push(entity);
        self.values.push(value);
        None
    }

    /// Remove the entity's value, moving the last row into its place.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let row = self.index.remove(entity)?;
        let last = self.values.len() - 1;
        if row.index() != last {
            let moved = self.entities[last];
            self.index.insert(moved, row);
        }
        self.entities.swap_remove(row.index());
        Some(self.values.swap_remove(row.index()))
    }

    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        let row = self.index.get(entity)?;
        self.values.get(row.index())
    }

    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        let row = self.index.get(entity)?;
        self.values.get_mut(row.index())
    }

    /// Iterate `(entity, value)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities.iter().copied().zip(self.values.iter())
    }
}

/// Type-erased view of a [`Column`], so the world can release and audit an entity's
/// components knowing only their ids.
pub trait AnyColumn: Any {
    /// Drop the entity's value. Returns `false` if it held none.
    fn release(&mut self, entity: Entity) -> bool;

    /// Whether the entity holds a value in this column.
    fn contains(&self, entity: Entity) -> bool;

    /// The entity owning each row, in row order.
    fn entities(&self) -> &[Entity];

    /// Verify that rows and the index map agree, describing the first mismatch.
    fn audit(&self) -> Result<(), String>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> AnyColumn for Column<C> {
    fn release(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.index
            .get(entity)
            .is_some_and(|row| self.entities.get(row.index()) == Some(&entity))
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn audit(&self) -> Result<(), String> {
        if self.entities.len() != self.values.len() {
            return Err(format!(
                "{} rows hold {} entities and {} values",
                std::any::type_name::<C>(),
                self.entities.len(),
                self.values.len()
            ));
        }
        for (row, entity) in self.entities.iter().enumerate() {
            if self.index.get(*entity) != Some(Row::new(row)) {
                return Err(format!(
                    "{} row {row} belongs to {entity} but the index disagrees",
                    std::any::type_name::<C>()
                ));
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
