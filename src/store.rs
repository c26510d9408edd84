// The store: an append-only map from locations to denotable values, a
// parallel map to machine integers (the "unboxed" side used by
// `UnboxedArray`/`makerefunboxed`), and the fixed location of the current
// exception handler. Modeled as a persistent structure (`im::HashMap`) so
// that `upd`/`updi`/`alloc` can return a new logical version in O(1)
// amortized time without invalidating any store value still held
// elsewhere. Store versions are immutable.

use im::HashMap;

use crate::config::Config;
use crate::value::DenotableValue;

/// A single version of the store. Cloning is cheap (structural sharing);
/// every mutator here takes `self` by value and returns a new version
/// through `upd`/`updi`/`alloc`.
#[derive(Clone)]
pub struct Store<C: Config> {
    next: C::Location,
    values: HashMap<C::Location, DenotableValue<C>>,
    ints: HashMap<C::Location, i64>,
    handler: C::Location,
}

impl<C: Config> Store<C> {
    /// A fresh store with no bindings except the handler location, which
    /// must already hold a `Function` denotation: the handler location
    /// always maps to a function.
    pub fn new(config: &C, initial_handler: DenotableValue<C>) -> Store<C> {
        let handler = config.handler_ref();
        let mut values = HashMap::new();
        values.insert(handler, initial_handler);
        Store {
            next: config.zero_loc(),
            values,
            ints: HashMap::new(),
            handler,
        }
    }

    pub fn handler_loc(&self) -> C::Location {
        self.handler
    }

    /// `fetch(s, l)`. Undefined (here: panics) if `l` was never written.
    pub fn fetch(&self, l: C::Location) -> DenotableValue<C> {
        self.values
            .get(&l)
            .cloned()
            .unwrap_or_else(|| panic!("fetch: uninitialized location"))
    }

    /// `fetchi(s, l)`. Undefined (here: panics) if `l` was never written.
    pub fn fetchi(&self, l: C::Location) -> i64 {
        *self
            .ints
            .get(&l)
            .unwrap_or_else(|| panic!("fetchi: uninitialized location"))
    }

    /// `upd(s, l, d)`: a new store with the value map updated at `l`.
    pub fn upd(&self, l: C::Location, d: DenotableValue<C>) -> Store<C> {
        let mut next = self.clone();
        next.values.insert(l, d);
        next
    }

    /// `updi(s, l, i)`: a new store with the integer map updated at `l`.
    pub fn updi(&self, l: C::Location, i: i64) -> Store<C> {
        let mut next = self.clone();
        next.ints.insert(l, i);
        next
    }

    /// `alloc(s)`: a fresh location strictly greater than any previously
    /// allocated one, and the store advanced past it. Neither map is
    /// touched; the caller writes through `upd`/`updi` afterward.
    pub fn alloc(&self) -> (C::Location, Store<C>) {
        let l = self.next;
        let mut next = self.clone();
        next.next = C::next_loc(l);
        (l, next)
    }
}
