// The host-specific parameters an embedder must supply: numeric bounds, a
// decimal decoder, a location type with `nextloc`, an opaque answer type,
// and the `arbitrarily` equality oracle. Bundled into one trait so `eval`
// is generic over exactly these knobs and nothing else.

use std::fmt::Debug;
use std::hash::Hash;

use crate::loc::Location;

/// Everything the core needs from its embedder. Implement this once per
/// host; [`DefaultConfig`] is a ready-made instance for programs that don't
/// need anything unusual.
pub trait Config: Clone + Default {
    /// An opaque store address with decidable equality and a successor.
    type Location: Copy + Eq + Ord + Hash + Debug;
    /// The top-level result of a run: `Ok` for a value delivered to an
    /// ordinary continuation, `Err` for an object-language exception that
    /// reached the top-level handler uncaught. The interpreter never
    /// inspects the payload of either side; it only ever constructs this
    /// by invoking a function denotation and threading whatever it
    /// returns back out through the trampoline.
    type Answer;

    const MIN_INT: i64;
    const MAX_INT: i64;
    const MIN_REAL: f64;
    const MAX_REAL: f64;

    /// Decode a decimal literal as it appears in `Value::Real`.
    fn string2real(s: &str) -> f64;

    /// The store location that always holds the current exception handler.
    fn handler_ref(&self) -> Self::Location;

    /// The successor of a location, used by `alloc`.
    fn next_loc(loc: Self::Location) -> Self::Location;

    /// The first location a fresh store hands out.
    fn zero_loc(&self) -> Self::Location;

    /// The nondeterministic equality oracle: for structurally equal
    /// non-empty heap objects, implementations may return either operand.
    /// A deterministic config (for tests) should always pick the same one;
    /// a "real" config may pick based on pointer identity or similar.
    fn arbitrarily<A>(&self, a: A, b: A) -> A;
}

/// A ready-to-use [`Config`] backed by native `i64`/`f64` bounds and the
/// process-wide monotonic location counter in [`crate::loc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfig;

impl Config for DefaultConfig {
    type Location = Location;
    type Answer =
        Result<crate::value::DenotableValue<DefaultConfig>, crate::value::DenotableValue<DefaultConfig>>;

    const MIN_INT: i64 = i64::MIN;
    const MAX_INT: i64 = i64::MAX;
    const MIN_REAL: f64 = f64::MIN;
    const MAX_REAL: f64 = f64::MAX;

    fn string2real(s: &str) -> f64 {
        s.parse().unwrap_or(f64::NAN)
    }

    fn handler_ref(&self) -> Location {
        Location::zero()
    }

    fn next_loc(loc: Location) -> Location {
        loc.nextloc()
    }

    fn zero_loc(&self) -> Location {
        // Location::zero() is reserved for handler_ref; allocation starts
        // one past it.
        Location::zero().nextloc()
    }

    fn arbitrarily<A>(&self, a: A, _b: A) -> A {
        // Deterministic: always the first operand. Good enough as a
        // default; embedders who need pointer-identity semantics supply
        // their own `Config`.
        a
    }
}
