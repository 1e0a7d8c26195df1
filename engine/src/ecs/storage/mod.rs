//! Component storage: one dense [`Column`] per component type.
//!
//! ```text
//! Storage
//!   ├── columns[Position] ─► entities: [E0, E3, E1]   values: [P0, P3, P1]
//!   ├── columns[Life]     ─► entities: [E3]           values: [L3]
//!   └── columns[Sprite]   ─► entities: [E1, E0]       values: [S1, S0]
//! ```
//!
//! Columns are created lazily the first time a value of their type is inserted and are
//! addressed by [`component::Id`]. Which entity holds which type is recorded separately by the
//! composition index; the world keeps the two in lockstep.

mod column;
mod index;
mod row;

pub use column::{AnyColumn, Column};

use crate::ecs::{
    component::{self, Component},
    entity::Entity,
};

/// Every component column of one world, indexed by component id.
#[derive(Default)]
pub struct Storage {
    columns: Vec<Option<Box<dyn AnyColumn>>>,
}

impl Storage {
    /// Get the typed column for `id`, if one has been created.
    ///
    /// Returns `None` as well if `id` was registered for a different type.
    #[inline]
    pub fn column<C: Component>(&self, id: component::Id) -> Option<&Column<C>> {
        self.columns
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<Column<C>>()
    }

    /// Get the typed column for `id`.
    #[inline]
    pub fn column_mut<C: Component>(&mut self, id: component::Id) -> Option<&mut Column<C>> {
        self.columns
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Column<C>>()
    }

    /// Get the typed column for `id`, creating it if this is the first value of its type.
    pub fn column_or_insert<C: Component>(
        &mut self,
        id: component::Id,
    ) -> Option<&mut Column<C>> {
        let index = id.index();
        if index >= self.columns.len() {
            self.columns.resize_with(index + 1, || None);
        }
        self.columns[index]
            .get_or_insert_with(|| Box::new(Column::<C>::new()))
            .as_any_mut()
            .downcast_mut::<Column<C>>()
    }

    /// Get the type-erased column for `id`.
    #[inline]
    pub fn erased(&self, id: component::Id) -> Option<&dyn AnyColumn> {
        self.columns.get(id.index())?.as_deref()
    }

    /// Drop the entity's value from column `id`. Returns `false` if there was nothing to drop.
    pub fn release(&mut self, id: component::Id, entity: Entity) -> bool {
        match self.columns.get_mut(id.index()) {
            Some(Some(column)) => column.release(entity),
            _ => false,
        }
    }

    /// Iterate `(id, column)` for every column created so far.
    pub fn columns(&self) -> impl Iterator<Item = (component::Id, &dyn AnyColumn)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(index, column)| Some((component::Id::from(index), column.as_deref()?)))
    }
}
