//! `Described` / `Traceable` implementations for standard library types.
//!
//! Primitives are leaves the tracer never records; `String` is a testable
//! leaf; containers are tested as a unit (elements are not walked as
//! individual graph nodes, matching how the codec treats them as one
//! payload); `Box` and `Arc` are transparent, with `Arc` delegating identity
//! to the shared allocation so that two clones count as duplicate
//! references.
//!
//! Container round trips delegate to their element types through
//! [`Described::round_trip`], which keeps the implementations free of serde
//! bounds: a container of a non-codec-capable element type still implements
//! `Traceable` and reports an "unsupported" failure instead of refusing to
//! compile — that is the regression the tracer exists to surface.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::analysis::{TypeArg, TypeSpec};
use crate::codec::{self, CodecFailure, SerdeProbe};
use crate::error::Result;
use crate::traceable::{Described, FieldDescriptor, FieldRef, Identity, Traceable};

// --- Primitives ---

/// Implements both traits for language-native scalar primitives.
macro_rules! impl_primitive_traceable {
    ($($t:ty),* $(,)?) => {$(
        impl Described for $t {
            fn type_spec() -> TypeSpec {
                TypeSpec::new::<$t>(SerdeProbe::<$t>::new().supported())
            }

            fn round_trip(value: &Self) -> std::result::Result<(), CodecFailure> {
                codec::round_trip(value)
            }
        }

        impl Traceable for $t {
            fn type_spec(&self) -> TypeSpec {
                <$t as Described>::type_spec()
            }

            fn try_round_trip(&self) -> std::result::Result<(), CodecFailure> {
                codec::round_trip(self)
            }

            fn is_primitive(&self) -> bool {
                true
            }
        }
    )*};
}

impl_primitive_traceable!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char
);

// --- String ---

// Not a primitive: it is a real heap value that gets visited, tested and
// recorded like any other leaf.
impl Described for String {
    fn type_spec() -> TypeSpec {
        TypeSpec::new::<String>(SerdeProbe::<String>::new().supported())
    }

    fn round_trip(value: &Self) -> std::result::Result<(), CodecFailure> {
        codec::round_trip(value)
    }
}

impl Traceable for String {
    fn type_spec(&self) -> TypeSpec {
        <String as Described>::type_spec()
    }

    fn try_round_trip(&self) -> std::result::Result<(), CodecFailure> {
        codec::round_trip(self)
    }
}

// --- Option ---

// `Described` only: the derive surfaces `Option` fields as nullable, so an
// `Option` itself never reaches the tracer as a value. The spec of an
// `Option<T>` is the spec of `T` (a nullable declared type), and its round
// trip is its payload's.
impl<T: Described> Described for Option<T> {
    fn type_spec() -> TypeSpec {
        T::type_spec()
    }

    fn round_trip(value: &Self) -> std::result::Result<(), CodecFailure> {
        match value {
            Some(inner) => T::round_trip(inner),
            None => Ok(()),
        }
    }
}

// --- Sequences ---

/// Implements both traits for sequence containers with one element type.
macro_rules! impl_sequence_traceable {
    ($($t:ident),* $(,)?) => {$(
        impl<T: Described + 'static> Described for $t<T> {
            fn type_spec() -> TypeSpec {
                let element = T::type_spec();
                TypeSpec::new::<$t<T>>(element.is_serializable())
                    .with_arg(TypeArg::concrete(element))
            }

            fn round_trip(value: &Self) -> std::result::Result<(), CodecFailure> {
                for item in value {
                    T::round_trip(item)?;
                }
                Ok(())
            }
        }

        impl<T: Described + 'static> Traceable for $t<T> {
            fn type_spec(&self) -> TypeSpec {
                <Self as Described>::type_spec()
            }

            fn try_round_trip(&self) -> std::result::Result<(), CodecFailure> {
                <Self as Described>::round_trip(self)
            }

            fn is_empty_container(&self) -> bool {
                self.is_empty()
            }
        }
    )*};
}

impl_sequence_traceable!(Vec, VecDeque, HashSet, BTreeSet);

// --- Maps ---

/// Implements both traits for map containers with key and value types.
macro_rules! impl_map_traceable {
    ($($t:ident),* $(,)?) => {$(
        impl<K: Described + 'static, V: Described + 'static> Described for $t<K, V> {
            fn type_spec() -> TypeSpec {
                let key = K::type_spec();
                let value = V::type_spec();
                TypeSpec::new::<$t<K, V>>(key.is_serializable() && value.is_serializable())
                    .with_arg(TypeArg::concrete(key))
                    .with_arg(TypeArg::concrete(value))
            }

            fn round_trip(value: &Self) -> std::result::Result<(), CodecFailure> {
                for (k, v) in value {
                    K::round_trip(k)?;
                    V::round_trip(v)?;
                }
                Ok(())
            }
        }

        impl<K: Described + 'static, V: Described + 'static> Traceable for $t<K, V> {
            fn type_spec(&self) -> TypeSpec {
                <Self as Described>::type_spec()
            }

            fn try_round_trip(&self) -> std::result::Result<(), CodecFailure> {
                <Self as Described>::round_trip(self)
            }

            fn is_empty_container(&self) -> bool {
                self.is_empty()
            }
        }
    )*};
}

impl_map_traceable!(HashMap, BTreeMap);

// --- Smart Pointers ---

/// Implements both traits for pointer types by full delegation, including
/// identity: the pointee's allocation is the identity, so `Arc` clones at
/// different paths are recognized as the same object.
macro_rules! impl_pointer_traceable {
    ($($t:ident),* $(,)?) => {$(
        impl<T: Described> Described for $t<T> {
            fn type_spec() -> TypeSpec {
                T::type_spec()
            }

            fn round_trip(value: &Self) -> std::result::Result<(), CodecFailure> {
                T::round_trip(value)
            }
        }

        impl<T: Traceable> Traceable for $t<T> {
            fn type_name(&self) -> &'static str {
                (**self).type_name()
            }

            fn runtime_type_name(&self) -> &'static str {
                (**self).runtime_type_name()
            }

            fn type_spec(&self) -> TypeSpec {
                (**self).type_spec()
            }

            fn fields(&self) -> Vec<FieldDescriptor> {
                (**self).fields()
            }

            fn field_value(&self, index: usize) -> Result<FieldRef<'_>> {
                (**self).field_value(index)
            }

            fn try_round_trip(&self) -> std::result::Result<(), CodecFailure> {
                (**self).try_round_trip()
            }

            fn is_primitive(&self) -> bool {
                (**self).is_primitive()
            }

            fn is_empty_container(&self) -> bool {
                (**self).is_empty_container()
            }

            fn identity(&self) -> Identity {
                (**self).identity()
            }
        }
    )*};
}

impl_pointer_traceable!(Box, Arc);
