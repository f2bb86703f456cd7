//! Static serializability analysis.
//!
//! Dynamic round-trip testing needs a value. A null field has none, and an
//! empty container has nothing inside to exercise its element types, so both
//! fall back to this module: a verdict computed from the *type* alone, as
//! captured in a [`TypeSpec`].
//!
//! The decision rule: the type itself must satisfy the codec capability, and
//! if it is generic, every actual type argument must independently satisfy it
//! too. Non-concrete arguments ([`TypeArg::Opaque`]) are conservatively NOT
//! serializable, since their true runtime type is unknown.

use crate::outcome::{SerializationOutcome, SerializationResult};

// --- Type Description ---

/// A static description of a type: its simple name, whether it satisfies the
/// codec capability, and its actual generic type arguments.
///
/// Specs are produced by [`Described`](crate::Described) implementations
/// (derived or hand-written); the serializability verdict comes from the
/// compile-time [`SerdeProbe`](crate::codec::SerdeProbe) and is therefore
/// truthful, not declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    name: &'static str,
    serializable: bool,
    args: Vec<TypeArg>,
}

impl TypeSpec {
    /// Creates a spec for `T`, deriving the simple name from
    /// `std::any::type_name`.
    pub fn new<T: ?Sized>(serializable: bool) -> Self {
        Self {
            name: simple_type_name(std::any::type_name::<T>()),
            serializable,
            args: Vec::new(),
        }
    }

    /// Creates a spec with an explicit name. Useful in hand-written
    /// [`Described`](crate::Described) implementations and test fixtures.
    pub fn named(name: &'static str, serializable: bool) -> Self {
        Self {
            name,
            serializable,
            args: Vec::new(),
        }
    }

    /// Appends one generic type argument.
    pub fn with_arg(mut self, arg: TypeArg) -> Self {
        self.args.push(arg);
        self
    }

    /// The simple (unqualified, ungenericized) type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the type itself satisfies the codec capability. Generic
    /// arguments are judged separately by [`analyze`].
    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    /// The actual generic type arguments.
    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }
}

/// One actual generic type argument of a [`TypeSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArg {
    /// A concrete argument with its own spec.
    Concrete(TypeSpec),
    /// A non-concrete argument (trait object, unnameable type); treated as
    /// NOT serializable because its runtime type is unknown.
    Opaque,
}

impl TypeArg {
    /// Shorthand for `TypeArg::Concrete(spec)`.
    pub fn concrete(spec: TypeSpec) -> Self {
        Self::Concrete(spec)
    }
}

// --- Analysis ---

/// Analyzes `spec` without an instance to test.
///
/// The outcome variant (`NULL_*` vs `EMPTY_*`) is selected purely by
/// `empty_container`; the pass/fail half by whether the type and every
/// argument passed. The diagnostic text lists each verdict, e.g.
/// `"Vec is Serializable. Handle is NOT Serializable."`.
pub fn analyze(spec: &TypeSpec, empty_container: bool) -> SerializationResult {
    let mut info = String::new();
    let mut passed = spec.is_serializable();

    push_verdict(&mut info, spec.name(), spec.is_serializable());

    for arg in spec.args() {
        match arg {
            TypeArg::Concrete(arg_spec) => {
                push_verdict(&mut info, arg_spec.name(), arg_spec.is_serializable());
                passed &= arg_spec.is_serializable();
            }
            TypeArg::Opaque => {
                push_verdict(&mut info, "?", false);
                passed = false;
            }
        }
    }

    SerializationResult::with_info(outcome_for(empty_container, passed), info)
}

fn outcome_for(empty_container: bool, passed: bool) -> SerializationOutcome {
    match (empty_container, passed) {
        (false, true) => SerializationOutcome::NullPassedStaticAnalysis,
        (false, false) => SerializationOutcome::NullFailedStaticAnalysis,
        (true, true) => SerializationOutcome::EmptyPassedStaticAnalysis,
        (true, false) => SerializationOutcome::EmptyFailedStaticAnalysis,
    }
}

fn push_verdict(info: &mut String, name: &str, serializable: bool) {
    if !info.is_empty() {
        info.push(' ');
    }
    info.push_str(name);
    if serializable {
        info.push_str(" is Serializable.");
    } else {
        info.push_str(" is NOT Serializable.");
    }
}

// --- Names ---

/// Reduces a full `std::any::type_name` to its simple name: generic
/// parameters are cut, then the last path segment is taken.
///
/// ## Examples
///
/// ```rust
/// use sertrace::analysis::simple_type_name;
///
/// assert_eq!(simple_type_name("alloc::vec::Vec<u32>"), "Vec");
/// assert_eq!(simple_type_name("my_crate::Player"), "Player");
/// assert_eq!(simple_type_name("u32"), "u32");
/// ```
pub fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    match base.rsplit("::").next() {
        Some(last) if !last.is_empty() => last,
        _ => base,
    }
}
