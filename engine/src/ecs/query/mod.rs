//! Queries select entities by the component types they hold.
//!
//! A [`Query`] is a plain descriptor built from Rust types:
//!
//! ```rust,ignore
//! let query = Query::new()
//!     .with::<Position>()    // must hold Position
//!     .without::<Life>()     // must not hold Life
//!     .any_of::<Sprite>();   // must hold at least one of the any-of types
//! ```
//!
//! Descriptors carry no world state. Resolving one against a world validates it (no type may
//! be both required and excluded) and produces a [`Filter`]: three bitsets over that world's
//! component ids. A filter tests a composition in a few word-wide operations:
//!
//! ```text
//! required ⊆ composition  &&  excluded ∩ composition = ∅  &&  (any_of = ∅ || any_of ∩ composition ≠ ∅)
//! ```
//!
//! Two ways of producing matches exist and always agree:
//! - [`Matches`] scans the composition index lazily in ascending entity index order.
//! - [`Cache`] keeps a match set per system and only re-evaluates entities whose composition
//!   changed in a type the filter references.

mod cache;

use std::{any::TypeId, borrow::Cow};

use fixedbitset::FixedBitSet;

pub use cache::{Cache, Changes};

use crate::ecs::{
    component::{self, Component},
    composition::Compositions,
    entity::{self, Entity},
    error::{Error, Result},
};

/// One component type named by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Term {
    type_id: TypeId,
    name: &'static str,
}

impl Term {
    fn of<C: Component>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }
}

/// An immutable description of which compositions match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    required: Vec<Term>,
    excluded: Vec<Term>,
    any_of: Vec<Term>,
}

impl Query {
    /// A query matching every live entity.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require component `C`.
    pub fn with<C: Component>(mut self) -> Self {
        push_unique(&mut self.required, Term::of::<C>());
        self
    }

    /// Exclude entities holding component `C`.
    pub fn without<C: Component>(mut self) -> Self {
        push_unique(&mut self.excluded, Term::of::<C>());
        self
    }

    /// Add `C` to the any-of set. A non-empty any-of set requires at least one of its types.
    pub fn any_of<C: Component>(mut self) -> Self {
        push_unique(&mut self.any_of, Term::of::<C>());
        self
    }

    /// Check that no type is both required and excluded.
    pub fn validate(&self) -> Result<()> {
        let overlap: Vec<&'static str> = self
            .required
            .iter()
            .filter(|term| self.excluded.contains(term))
            .map(|term| term.name)
            .collect();

        if overlap.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidQuery { overlap })
        }
    }
}

fn push_unique(terms: &mut Vec<Term>, term: Term) {
    if !terms.contains(&term) {
        terms.push(term);
    }
}

/// A [`Query`] resolved against one world's component registry.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    required: FixedBitSet,
    excluded: FixedBitSet,
    any_of: FixedBitSet,

    /// Union of the three sets.
    referenced: FixedBitSet,
}

impl Filter {
    /// Validate `query` and map its types to component ids, registering unseen types.
    pub(crate) fn resolve(query: &Query, registry: &mut component::Registry) -> Result<Self> {
        query.validate()?;

        let mut ids = |terms: &[Term]| -> FixedBitSet {
            let mut set = FixedBitSet::with_capacity(registry.len());
            for term in terms {
                let id = registry.register_raw(term.type_id, term.name);
                set.grow(id.index() + 1);
                set.insert(id.index());
            }
            set
        };

        let required = ids(&query.required);
        let excluded = ids(&query.excluded);
        let any_of = ids(&query.any_of);

        let mut referenced = required.clone();
        referenced.union_with(&excluded);
        referenced.union_with(&any_of);

        Ok(Self {
            required,
            excluded,
            any_of,
            referenced,
        })
    }

    /// Test a composition against this filter.
    #[inline]
    pub fn matches(&self, composition: &FixedBitSet) -> bool {
        self.required.is_subset(composition)
            && self.excluded.is_disjoint(composition)
            && (self.any_of.is_clear() || !self.any_of.is_disjoint(composition))
    }

    /// Whether a change to component `id` can change this filter's verdict.
    #[inline]
    pub fn references(&self, id: component::Id) -> bool {
        self.referenced.contains(id.index())
    }
}

/// Lazy enumeration of the live entities matching a filter, in ascending index order.
///
/// Borrows the world, so the set it enumerates cannot change underneath it.
pub struct Matches<'w> {
    entities: &'w entity::Allocator,
    compositions: &'w Compositions,
    filter: Cow<'w, Filter>,
    next: usize,
}

impl<'w> Matches<'w> {
    pub(crate) fn new(
        entities: &'w entity::Allocator,
        compositions: &'w Compositions,
        filter: Cow<'w, Filter>,
    ) -> Self {
        Self {
            entities,
            compositions,
            filter,
            next: 0,
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.entities.slots() {
            let index = self.next;
            self.next += 1;
            if let Some(entity) = self.entities.entity_at(index)
                && self.compositions.matches(entity, &self.filter)
            {
                return Some(entity);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entities.slots().saturating_sub(self.next)))
    }
}
