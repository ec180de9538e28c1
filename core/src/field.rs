//! Typed field descriptors.
//!
//! A [`Field<E, F>`] names one field of an entity `E` holding an `F` and
//! carries its accessors. Fields are the identity the schema and the query
//! builder agree on: a column is found by the field's name, never by the
//! value currently stored in it.

use core::marker::PhantomData;

/// Field `F` of entity `E`.
pub struct Field<E, F> {
    name: &'static str,
    get: fn(&E) -> &F,
    get_mut: fn(&mut E) -> &mut F,
    _entity: PhantomData<fn() -> E>,
}

impl<E, F> Field<E, F> {
    pub const fn new(name: &'static str, get: fn(&E) -> &F, get_mut: fn(&mut E) -> &mut F) -> Self {
        Self {
            name,
            get,
            get_mut,
            _entity: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'e>(&self, entity: &'e E) -> &'e F {
        (self.get)(entity)
    }

    pub fn set(&self, entity: &mut E, value: F) {
        *(self.get_mut)(entity) = value;
    }
}

impl<E, F> Clone for Field<E, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, F> Copy for Field<E, F> {}

impl<E, F> core::fmt::Debug for Field<E, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Type-erased view of a field, for configuration that spans fields of
/// different types (composite keys, indexes).
pub trait AnyField<E> {
    fn field_name(&self) -> &'static str;
}

impl<E, F> AnyField<E> for Field<E, F> {
    fn field_name(&self) -> &'static str {
        self.name
    }
}

/// Declares `Field` constants on a struct.
///
/// ```ignore
/// fields!(Product {
///     PRODUCT_ID => product_id: i32,
///     PRODUCT_NAME => product_name: String,
/// });
///
/// assert_eq!(Product::PRODUCT_NAME.name(), "product_name");
/// ```
#[macro_export]
macro_rules! fields {
    ($entity:ty { $($(#[$meta:meta])* $konst:ident => $field:ident : $ty:ty),* $(,)? }) => {
        impl $entity {
            $(
                $(#[$meta])*
                pub const $konst: $crate::Field<$entity, $ty> = {
                    fn get(entity: &$entity) -> &$ty {
                        &entity.$field
                    }
                    fn get_mut(entity: &mut $entity) -> &mut $ty {
                        &mut entity.$field
                    }
                    $crate::Field::new(stringify!($field), get, get_mut)
                };
            )*
        }
    };
}
