//! Round-trip codec invocation and failure classification.
//!
//! The codec itself is bincode behind serde, invoked as
//! `encode_to_vec` followed by `decode_from_slice` with the standard
//! configuration. What this module adds on top:
//!
//! - [`CodecFailure`]: a *typed* failure carrying a structured root-cause
//!   chain ([`CauseFrame`]s ordered outermost to innermost), built by walking
//!   `std::error::Error::source`. Classification downstream is a pure
//!   function over this chain, never over a raised panic or call stack.
//! - [`SerdeProbe`] / [`CodecProxy`]: compile-time capability detection. Both
//!   use method-resolution shadowing: an inherent method exists only when the
//!   probed type implements `Serialize + DeserializeOwned`, and a blanket
//!   fallback trait answers for every other type. The answer is resolved at
//!   the (always concrete) macro-expansion site, so a type that silently lost
//!   its serde support turns into an "unsupported" failure instead of a
//!   compile error in generated code.
//! - [`caused_by_encoded_closure`]: the known-artifact check. Some codecs
//!   encode closures as a wrapper type that fails a naive decode-then-cast
//!   even when the capture itself round-trips; a decode failure whose cause
//!   chain mentions the closure marker is reclassified as a pass.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

// --- Failure Structure ---

/// The codec stage at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecStage {
    /// The value could not be encoded to bytes.
    Encode,
    /// The encoded bytes could not be decoded back.
    Decode,
}

/// One link in a failure's root-cause chain.
///
/// `label` is a type identifier for the error (for source errors reached
/// through the type-erased `Error::source` chain it is the literal
/// `"source"`), `message` its rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseFrame {
    /// Type identifier of the error producing this frame.
    pub label: String,
    /// The error's display text.
    pub message: String,
}

/// A typed encode/decode failure with its root-cause chain.
///
/// Frames are ordered outermost to innermost; [`CodecFailure::root_cause`]
/// returns the innermost one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecFailure {
    stage: CodecStage,
    causes: Vec<CauseFrame>,
}

impl CodecFailure {
    /// Creates a failure from an explicit cause chain.
    ///
    /// `causes` must be non-empty and ordered outermost to innermost; an
    /// empty chain is replaced with a single placeholder frame so that
    /// [`message`](Self::message) and [`root_cause`](Self::root_cause) stay
    /// total.
    pub fn new(stage: CodecStage, causes: Vec<CauseFrame>) -> Self {
        let causes = if causes.is_empty() {
            vec![CauseFrame {
                label: "unknown".to_string(),
                message: "unspecified codec failure".to_string(),
            }]
        } else {
            causes
        };
        Self { stage, causes }
    }

    /// Builds a failure by walking an error's `source` chain.
    pub fn from_error(stage: CodecStage, label: &str, err: &dyn std::error::Error) -> Self {
        let mut causes = vec![CauseFrame {
            label: label.to_string(),
            message: err.to_string(),
        }];
        let mut current = err.source();
        while let Some(source) = current {
            causes.push(CauseFrame {
                label: "source".to_string(),
                message: source.to_string(),
            });
            current = source.source();
        }
        Self { stage, causes }
    }

    /// The failure recorded for a type that does not satisfy the codec
    /// capability (`Serialize + DeserializeOwned`).
    pub fn unsupported(type_name: &str) -> Self {
        Self::new(
            CodecStage::Encode,
            vec![CauseFrame {
                label: "sertrace::codec::Unsupported".to_string(),
                message: format!("{type_name} does not satisfy the codec capability (Serialize + DeserializeOwned)"),
            }],
        )
    }

    /// The stage at which the failure occurred.
    pub fn stage(&self) -> CodecStage {
        self.stage
    }

    /// The cause chain, outermost first. Never empty.
    pub fn causes(&self) -> &[CauseFrame] {
        &self.causes
    }

    /// The outermost message; this is what gets recorded as diagnostic info.
    pub fn message(&self) -> &str {
        self.causes.first().map(|c| c.message.as_str()).unwrap_or("")
    }

    /// The innermost cause frame.
    pub fn root_cause(&self) -> &CauseFrame {
        // `new` guarantees at least one frame.
        self.causes.last().unwrap_or(&PLACEHOLDER_FRAME)
    }
}

// Fallback for the (unreachable) empty-chain case, so root_cause needs no panic.
static PLACEHOLDER_FRAME: CauseFrame = CauseFrame {
    label: String::new(),
    message: String::new(),
};

impl fmt::Display for CodecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            CodecStage::Encode => "encode",
            CodecStage::Decode => "decode",
        };
        write!(f, "{stage} failed: {}", self.message())
    }
}

// --- Round Trip ---

/// Attempts a full encode/decode cycle for `value` through bincode.
///
/// The decoded value is dropped; only success or a typed failure is reported.
pub fn round_trip<T>(value: &T) -> Result<(), CodecFailure>
where
    T: Serialize + DeserializeOwned,
{
    let bytes = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| CodecFailure::from_error(CodecStage::Encode, "bincode::error::EncodeError", &e))?;

    bincode::serde::decode_from_slice::<T, _>(&bytes, bincode::config::standard())
        .map_err(|e| CodecFailure::from_error(CodecStage::Decode, "bincode::error::DecodeError", &e))?;

    Ok(())
}

// --- Capability Probes ---

/// Compile-time probe answering "does `T` satisfy the codec capability?".
///
/// Resolution happens where the probe is *written*, so it must be
/// instantiated with a concrete type (derive-generated code and the macro
/// expansions in this crate do exactly that). With a generic `T` the fallback
/// always answers.
///
/// ## Examples
///
/// ```rust
/// use sertrace::codec::{ProbeFallback, SerdeProbe};
///
/// struct Opaque;
///
/// assert!(SerdeProbe::<u32>::new().supported());
/// assert!(!SerdeProbe::<Opaque>::new().supported());
/// ```
pub struct SerdeProbe<T: ?Sized>(PhantomData<fn() -> T>);

impl<T: ?Sized> SerdeProbe<T> {
    /// Creates the probe.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for SerdeProbe<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SerdeProbe<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Inherent answer: shadows the fallback when the bounds hold.
    pub fn supported(&self) -> bool {
        true
    }
}

/// Fallback answer for types without codec support.
///
/// Import this trait (typically `as _`) wherever a [`SerdeProbe`] is used.
pub trait ProbeFallback {
    /// Answers `false`; shadowed by the inherent method when `T` qualifies.
    fn supported(&self) -> bool;
}

impl<T: ?Sized> ProbeFallback for SerdeProbe<T> {
    fn supported(&self) -> bool {
        false
    }
}

/// Round-trip dispatcher built on the same shadowing technique as
/// [`SerdeProbe`]: codec-capable types get the real [`round_trip`], every
/// other type gets a structured [`CodecFailure::unsupported`] — which the
/// tracer records as `FAIL`. That is the exact regression this crate exists
/// to catch, reported as data instead of breaking the build of test code.
pub struct CodecProxy<'a, T: ?Sized>(pub &'a T);

impl<'a, T> CodecProxy<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    /// Inherent dispatch: performs the real encode/decode cycle.
    pub fn round_trip(&self) -> Result<(), CodecFailure> {
        round_trip(self.0)
    }
}

/// Fallback dispatch for types without codec support.
///
/// Import this trait (typically `as _`) wherever a [`CodecProxy`] is used.
pub trait ProxyFallback {
    /// Produces an "unsupported" failure; shadowed by the inherent method
    /// when `T` qualifies.
    fn round_trip(&self) -> Result<(), CodecFailure>;
}

impl<'a, T: ?Sized> ProxyFallback for CodecProxy<'a, T> {
    fn round_trip(&self) -> Result<(), CodecFailure> {
        Err(CodecFailure::unsupported(std::any::type_name::<T>()))
    }
}

// --- Classification ---

/// Returns true if `failure` is the known closure-encoding artifact: a
/// decode-stage failure whose cause chain mentions the closure marker.
///
/// `is_closure_marker` is the same pluggable predicate the tracer uses to
/// recognize closure runtime type names, applied here to each cause frame's
/// label and message.
pub fn caused_by_encoded_closure(failure: &CodecFailure, is_closure_marker: fn(&str) -> bool) -> bool {
    failure.stage() == CodecStage::Decode
        && failure
            .causes()
            .iter()
            .any(|frame| is_closure_marker(&frame.label) || is_closure_marker(&frame.message))
}
