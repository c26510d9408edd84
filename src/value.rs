// The denotable value domain: what a CPS variable can be bound to at
// runtime. This is the teacher's own `Value` enum, generalized from pan's
// dynamic value space to a fixed set for the CPS machine: records with an
// offset, machine integers and reals, strings, the three flavors of
// store-backed collection (boxed array, unboxed array, byte array),
// function denotations, and exception tags.

use std::fmt;
use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::config::Config;
use crate::trampoline::StoreFn;
use crate::types::rope::Rope;

/// A function denotation: given the actual arguments, produce the
/// store-to-answer function for the call. This is the payload of
/// `DenotableValue::Function`, see `ir.rs`'s `IrClosure::run` in the
/// teacher for the same "closure over code plus environment" shape, here
/// collapsed to a plain Rust closure since the environment capture is
/// handled by the closure itself rather than by a separate struct.
pub type Meaning<C> = Rc<dyn Fn(&[DenotableValue<C>]) -> StoreFn<C>>;

/// A runtime value of the CPS machine.
#[derive(Clone)]
pub enum DenotableValue<C: Config> {
    /// A record: its elements, and the base offset currently in effect
    /// (nonzero only as the result of an `Offset` instruction's `F`
    /// rebasing, never from a fresh `Record` allocation).
    Record(Rc<Vec<DenotableValue<C>>>, i64),
    Integer(i64),
    Real(OrderedFloat<f64>),
    String(Rope),
    ByteArray(Rc<Vec<C::Location>>),
    Array(Rc<Vec<C::Location>>),
    UnboxedArray(Rc<Vec<C::Location>>),
    Function(Meaning<C>),
    /// A sentinel exception tag, as used by the built-in `overflow_exn` and
    /// `div_exn`. User `raise` can propagate any `DenotableValue`, not just
    /// these; `Exception` exists purely so the two built-ins have a home
    /// that isn't easily confused with ordinary data.
    Exception(Rc<str>),
}

impl<C: Config> DenotableValue<C> {
    pub fn overflow_exn() -> DenotableValue<C> {
        DenotableValue::Exception(Rc::from("overflow"))
    }

    pub fn div_exn() -> DenotableValue<C> {
        DenotableValue::Exception(Rc::from("div"))
    }

    /// `boxed(v)`: false for `Integer`, true for everything else.
    pub fn is_boxed(&self) -> bool {
        !matches!(self, DenotableValue::Integer(_))
    }
}

impl<C: Config> fmt::Debug for DenotableValue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenotableValue::Record(els, base) => {
                f.debug_tuple("Record").field(els).field(base).finish()
            }
            DenotableValue::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            DenotableValue::Real(r) => f.debug_tuple("Real").field(r).finish(),
            DenotableValue::String(s) => f.debug_tuple("String").field(s).finish(),
            DenotableValue::ByteArray(a) => f.debug_tuple("ByteArray").field(a).finish(),
            DenotableValue::Array(a) => f.debug_tuple("Array").field(a).finish(),
            DenotableValue::UnboxedArray(a) => f.debug_tuple("UnboxedArray").field(a).finish(),
            DenotableValue::Function(_) => write!(f, "Function(..)"),
            DenotableValue::Exception(tag) => f.debug_tuple("Exception").field(tag).finish(),
        }
    }
}
