// Continuation application is always a tail call. Rather than
// let `E` recurse through the host call stack on every `App` and every
// primop continuation invocation, each such point returns a `Bounce`
// describing the next step instead of taking it, and `run_trampoline` is
// the only place that actually drives the computation forward. This keeps
// the evaluator's Rust stack usage independent of how deep the CPS program
// recurses.

use crate::config::Config;
use crate::store::Store;

/// `E(e)(env)`, once applied to a store, either is finished (an `Answer`)
/// or names the next store-to-answer function to run and the store to run
/// it against.
pub enum Bounce<C: Config> {
    Done(C::Answer),
    Call(StoreFn<C>, Store<C>),
}

/// A store-to-answer function: the meaning of a continuation expression,
/// still awaiting a store.
pub type StoreFn<C> = Box<dyn FnOnce(Store<C>) -> Bounce<C>>;

/// Drive a `StoreFn` to completion, iteratively rather than recursively.
pub fn run_trampoline<C: Config>(thunk: StoreFn<C>, store: Store<C>) -> C::Answer {
    let mut thunk = thunk;
    let mut store = store;
    loop {
        match thunk(store) {
            Bounce::Done(answer) => return answer,
            Bounce::Call(next_thunk, next_store) => {
                thunk = next_thunk;
                store = next_store;
            }
        }
    }
}
