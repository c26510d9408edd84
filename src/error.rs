// Implementation-level failures: a malformed CPS program. These are
// distinct from object-language exceptions (`overflow_exn`, `div_exn`, user
// `raise`), which never produce an `InterpError`. Those are ordinary
// `DenotableValue`s threaded through the current handler.

use failure_derive::Fail;

use crate::var::Variable;

/// Something the CPS program did that a well-formed program, post front
/// end, should never do. Recovering from these is not defined by the
/// language: they indicate the interpreter was handed a buggy tree.
#[derive(Debug, Fail)]
pub enum InterpError {
    #[fail(display = "unbound variable: {}", _0)]
    UnboundVariable(String),

    #[fail(display = "selected into a non-record denotable value")]
    SelectOnNonRecord,

    #[fail(display = "offset into a non-record denotable value")]
    OffsetOnNonRecord,

    #[fail(display = "access path projection out of range")]
    AccessPathOutOfRange,

    #[fail(display = "applied a non-function denotable value")]
    AppliedNonFunction,

    #[fail(display = "switch on a non-integer denotable value")]
    SwitchOnNonInteger,

    #[fail(display = "switch arm index {} out of range (0..{})", index, len)]
    SwitchOutOfRange { index: i64, len: usize },

    #[fail(display = "primop {} arity mismatch", _0)]
    PrimopArity(&'static str),

    #[fail(display = "primop {} applied to ill-typed operands", _0)]
    PrimopType(&'static str),

    #[fail(display = "byte store value {} outside [0, 256)", _0)]
    ByteOutOfRange(i64),

    #[fail(display = "equality on function denotations is undefined")]
    FunctionEquality,

    #[fail(display = "bindn: {} formals but {} arguments", formals, args)]
    ArityMismatch { formals: usize, args: usize },
}

impl InterpError {
    pub fn unbound(v: &Variable) -> InterpError {
        InterpError::UnboundVariable(v.name().to_owned())
    }
}
