use std::{any::TypeId, collections::HashMap};

use crate::ecs::component::{Component, Id};

/// Maps Rust component types to the dense ids used by one world.
///
/// Registration happens once per type, the first time it is attached or named by a query
/// resolved against the world. Ids are handed out sequentially and never reused.
#[derive(Debug, Default)]
pub struct Registry {
    /// Map from Rust type to component id.
    type_map: HashMap<TypeId, Id>,

    /// Type names indexed by component id, for diagnostics.
    names: Vec<&'static str>,
}

impl Registry {
    /// Create a new, empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register component type `C` and get its id. Registering twice returns the same id.
    #[inline]
    pub fn register<C: Component>(&mut self) -> Id {
        self.register_raw(TypeId::of::<C>(), std::any::type_name::<C>())
    }

    /// Register a type by its Rust `TypeId` and name.
    pub fn register_raw(&mut self, type_id: TypeId, name: &'static str) -> Id {
        let names = &mut self.names;
        *self.type_map.entry(type_id).or_insert_with(|| {
            let id = Id::from(names.len());
            names.push(name);
            log::debug!("registered component `{name}` as {id:?}");
            id
        })
    }

    /// Get the id for component type `C`, if registered.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        self.type_map.get(&TypeId::of::<C>()).copied()
    }

    /// Get the type name registered under `id`.
    #[inline]
    pub fn name(&self, id: Id) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no component type has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
