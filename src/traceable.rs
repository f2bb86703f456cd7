//! The introspection capability: how the tracer sees values.
//!
//! Rust has no runtime reflection, so the tracer walks values through a pair
//! of traits instead:
//!
//! - [`Described`] is the *static* half, answering questions about a type
//!   with no instance at hand (its [`TypeSpec`], and how to round-trip one of
//!   its values). Containers delegate to their element types here.
//! - [`Traceable`] is the *dynamic*, object-safe half the tracer actually
//!   drives: enumerate fields, read a field's value, attempt the round trip,
//!   report identity.
//!
//! `#[derive(Traceable)]` implements both for named-field structs. Standard
//! library types are covered in `traceable_impls`.

use std::any::Any;
use std::any::TypeId;

use crate::analysis::{TypeSpec, simple_type_name};
use crate::codec::CodecFailure;
use crate::error::{Result, SertraceError};

// --- Static Capability ---

/// Static description of a type, available without an instance.
///
/// Implementations must report serializability truthfully; the derive macro
/// and the macros in this crate do so via the compile-time
/// [`SerdeProbe`](crate::codec::SerdeProbe).
pub trait Described {
    /// The type's spec: simple name, codec-capability verdict, generic
    /// arguments.
    fn type_spec() -> TypeSpec;

    /// Attempts an encode/decode cycle for one value of this type.
    fn round_trip(value: &Self) -> std::result::Result<(), CodecFailure>
    where
        Self: Sized;
}

// --- Dynamic Capability ---

/// Per-field metadata reported by [`Traceable::fields`].
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// The field name as it appears in a field path.
    pub name: &'static str,
    /// The *declared* type of the field. For `Option<T>` fields this is `T`;
    /// a `None` value is reported as null, not as a value of type `Option`.
    pub declared: TypeSpec,
    /// The field is marked non-serializing and must be excluded.
    pub is_transient: bool,
    /// The field is class-level/shared state, not instance state.
    pub is_static: bool,
}

/// The current value of a field, as read through the introspection
/// capability.
pub enum FieldRef<'a> {
    /// The field holds no value (an `Option` field holding `None`).
    Null,
    /// The field holds this value.
    Value(&'a dyn Traceable),
}

/// The identity of a value during one trace: reference identity, not value
/// equality.
///
/// The data pointer alone is not enough in Rust — a struct and its first
/// field occupy the same address — so the runtime `TypeId` disambiguates.
/// Two value-equal but distinct objects always compare unequal; two paths
/// reaching the same allocation (e.g. through `Arc` clones) compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    addr: usize,
    ty: TypeId,
}

impl Identity {
    /// Creates an identity from a data address and runtime type.
    pub fn new(addr: usize, ty: TypeId) -> Self {
        Self { addr, ty }
    }
}

/// A value the tracer can walk.
///
/// Most methods have defaults suitable for leaf values; implementations
/// override what applies. The derive macro generates `type_spec`, `fields`,
/// `field_value` and `try_round_trip`; containers additionally override
/// `is_empty_container`, primitives `is_primitive`, and smart pointers
/// delegate everything (including `identity`) to their pointee.
pub trait Traceable: Any {
    /// The simple runtime type name, used as the root of field paths.
    fn type_name(&self) -> &'static str {
        simple_type_name(std::any::type_name::<Self>())
    }

    /// The full runtime type name, fed to the closure predicate.
    fn runtime_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The runtime [`TypeSpec`], used when an empty container falls back to
    /// static analysis.
    fn type_spec(&self) -> TypeSpec;

    /// The declared fields of this value, in declaration order. Leaf values
    /// have none.
    fn fields(&self) -> Vec<FieldDescriptor> {
        Vec::new()
    }

    /// Reads the field at `index` (an index into [`fields`](Self::fields)).
    ///
    /// An out-of-range index is a broken introspection capability and must
    /// return [`SertraceError::Introspection`]; the tracer treats it as
    /// fatal.
    fn field_value(&self, index: usize) -> Result<FieldRef<'_>> {
        Err(SertraceError::Introspection(format!(
            "{} has no field at index {index}",
            self.type_name()
        )))
    }

    /// Attempts a full encode/decode cycle for this value.
    fn try_round_trip(&self) -> std::result::Result<(), CodecFailure>;

    /// Language-native scalar primitives are never tested, never recorded and
    /// never descended into; there is nothing below a primitive.
    fn is_primitive(&self) -> bool {
        false
    }

    /// Whether this value is a container with no elements. Empty containers
    /// round-trip trivially, so the tracer follows up with static analysis
    /// of the runtime type.
    fn is_empty_container(&self) -> bool {
        false
    }

    /// Reference identity of this value for duplicate/cycle detection.
    fn identity(&self) -> Identity {
        Identity::new((self as *const Self).cast::<()>() as usize, self.type_id())
    }
}
