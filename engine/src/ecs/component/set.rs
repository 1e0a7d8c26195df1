use crate::{
    ecs::component::Component,
    impl_for_tuples,
};

/// Something that accepts component values one at a time, e.g. a freshly created entity.
pub trait Target {
    fn apply<C: Component>(&mut self, value: C);
}

/// A bundle of component values that can be applied to a [`Target`] in one call.
///
/// Implemented for single components, `()` and nested tuples of sets, so
/// `world.spawn((Position::default(), Sprite::default()))` creates an entity with both.
pub trait Set: Sized + 'static {
    /// Apply the component values in this set to the given target. This takes ownership of self.
    fn apply<T: Target>(self, target: &mut T);
}

impl<C: Component> Set for C {
    fn apply<T: Target>(self, target: &mut T) {
        target.apply::<C>(self);
    }
}

impl Set for () {
    fn apply<T: Target>(self, _target: &mut T) {}
}

macro_rules! tuple_set {
    ($($name: ident),*) => {
        impl<$($name: Set),*> Set for ($($name,)*) {
            fn apply<CT: Target>(self, target: &mut CT) {
                #[allow(non_snake_case)]
                let ( $($name,)* ) = self;
                $(<$name as Set>::apply($name, target);)*
            }
        }
    }
}

impl_for_tuples!(tuple_set);
