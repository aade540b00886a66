/// Implements the `start` constructor for a leaf writer type in terms of an
/// [`Obj`](crate::object::Obj) handed out by a dictionary, array, chunk, or
/// another writer.
///
/// The same writer type is used whether the object is top-level and
/// indirectly referenceable (e.g. [`Chunk::page`](crate::Chunk::page)) or
/// nested inside another dictionary's value (e.g.
/// [`Pages::kids`](crate::Pages) writing a kid inline) -- `Obj` already knows
/// how to close itself correctly in both cases.
macro_rules! writer {
    ($ty:ident: |$obj:ident| $body:expr) => {
        impl<'a> $ty<'a> {
            pub(crate) fn start($obj: Obj<'a>) -> Self {
                $body
            }
        }

        impl<'a> crate::object::Writer<'a> for $ty<'a> {
            fn start(obj: Obj<'a>) -> Self {
                <$ty<'a>>::start(obj)
            }
        }
    };
}

/// Implements `Deref` and `DerefMut` by delegating to a field of a struct.
macro_rules! deref {
    ($a:lifetime, $from:ty => $to:ty, $field:ident) => {
        impl<$a> std::ops::Deref for $from {
            type Target = $to;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.$field
            }
        }

        impl<$a> std::ops::DerefMut for $from {
            #[inline]
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.$field
            }
        }
    };
}
