/// deriving SomeWalker by an inner walker
/// format is:
///```ignore
/// derive_SomeWalker! {walker,
///     impl<'a, K: Ord, V> SomeWalker<K, V> for TreapWalker<'a, K, V> {
///         fn go_up(&mut self) -> Result<Side, ()> {
///             ...
///         }
///     }
/// }
///```
/// expects the `go_up` method to be implemented
macro_rules! derive_SomeWalker {
    ($accessor:ident, impl<$lifetime:lifetime, $key:ident: Ord, $val:ident> SomeWalker<K, V> for $self:ty
        { $($token:tt)* }
    ) => {
        impl<$lifetime, $key: Ord, $val> SomeWalker<$key, $val> for $self {
            fn go_left(&mut self) -> Result<(), ()> {
                self.$accessor.go_left()
            }

            fn go_right(&mut self) -> Result<(), ()> {
                self.$accessor.go_right()
            }

            fn depth(&self) -> usize {
                self.$accessor.depth()
            }

            fn far_left_count(&self) -> usize {
                self.$accessor.far_left_count()
            }

            fn far_right_count(&self) -> usize {
                self.$accessor.far_right_count()
            }

            $($token)*
        }
    };
}

/// deriving SomeEntry by an inner tree or walker
/// format is:
///```ignore
/// derive_SomeEntry! {tree,
///     impl<K: Ord, V> SomeEntry<K, V> for AVLTree<K, V> {}
/// }
///```
macro_rules! derive_SomeEntry {
    ($accessor:ident, impl<$($lifetime:lifetime,)? $key:ident : Ord, $val:ident> SomeEntry<K, V> for $self:ty
        { $($token:tt)* }
    ) => {
        impl<$($lifetime,)? $key: Ord, $val> SomeEntry<$key, $val> for $self {
            fn key(&self) -> Option<&$key> {
                self.$accessor.key()
            }

            fn value(&self) -> Option<&$val> {
                self.$accessor.value()
            }

            fn with_value<F, R>(&mut self, f: F) -> Option<R>
            where
                F: FnOnce(&mut $val) -> R,
            {
                self.$accessor.with_value(f)
            }

            fn subtree_size(&self) -> usize {
                self.$accessor.subtree_size()
            }

            fn left_subtree_size(&self) -> Option<usize> {
                self.$accessor.left_subtree_size()
            }

            fn right_subtree_size(&self) -> Option<usize> {
                self.$accessor.right_subtree_size()
            }

            $($token)*
        }
    };
}
