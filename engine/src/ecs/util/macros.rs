/// Invoke a macro once for every suffix of a list of type idents, longest first.
#[macro_export]
macro_rules! for_each_tuple {
    ($m:ident !! $head_ty:ident) => {
        $m!($head_ty);
    };
    ($m:ident !! $head_ty:ident, $($tail_ty:ident),*) => (
        $m!($head_ty, $( $tail_ty ),*);
        $crate::for_each_tuple!($m !! $( $tail_ty ),*);
    );
}

/// Apply a macro to tuples of arity 1 through 16.
#[macro_export]
macro_rules! impl_for_tuples {
    ($m:ident) => {
        $crate::for_each_tuple!($m !! A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);
    };
}
