// Locations are opaque store addresses. The only operation required of
// them is a total successor `nextloc`, used by `alloc` to hand out a
// strictly increasing address on every call.

/// An opaque store address with decidable equality and a total successor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location(u64);

impl Location {
    /// The first location a fresh store hands out.
    pub const fn zero() -> Location {
        Location(0)
    }

    /// The location one past `self`. Never wraps in practice: a run would
    /// need 2^64 allocations first.
    pub fn nextloc(self) -> Location {
        Location(self.0 + 1)
    }
}
