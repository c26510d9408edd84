// The CPS abstract syntax: values, access paths, primops and continuation
// expressions. This is the tree the evaluator in `eval` consumes; nothing in
// this module runs anything, it only describes a program.

use ordered_float::OrderedFloat;

use crate::var::Variable;

/// A syntactic value occurring in operand position: either a reference into
/// the environment, or a literal to be coerced directly into a denotable
/// value by `V`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A reference to a variable bound earlier in the enclosing scope.
    Variable(Variable),
    /// A reference to a function label, resolved through the environment
    /// exactly like `Variable`. The distinction exists in the source
    /// language, not in how the evaluator treats it.
    Label(Variable),
    Integer(i64),
    /// Decimal literal text, decoded lazily by the host's `string2real`.
    Real(String),
    String(String),
}

/// A static description of how to project out of a record: offset the
/// pointer, or select a field and keep going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPath {
    Off(i64),
    Sel(i64, Box<AccessPath>),
}

impl AccessPath {
    /// Concatenate two access paths so that `F(F(r, p1), p2) == F(r,
    /// p1.then(p2))`. `Off` addition, `Sel` associativity.
    pub fn then(&self, other: &AccessPath) -> AccessPath {
        match self {
            AccessPath::Off(k) => match other {
                AccessPath::Off(j) => AccessPath::Off(k + j),
                AccessPath::Sel(j, p) => AccessPath::Sel(k + j, p.clone()),
            },
            AccessPath::Sel(k, p) => AccessPath::Sel(*k, Box::new(p.then(other))),
        }
    }
}

/// The fixed, closed set of primitive operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primop {
    // integer arithmetic
    IAdd,
    ISub,
    IMul,
    IDiv,
    INeg,
    // integer comparisons
    ILt,
    ILe,
    IGt,
    IGe,
    IEql,
    INeq,
    RangeChk,
    // typed discriminator
    Boxed,
    // dereference / subscript
    Deref,
    Subscript,
    Ordof,
    // assignment / update
    Assign,
    Update,
    UnboxedAssign,
    UnboxedUpdate,
    Store,
    // allocation
    MakeRef,
    MakeRefUnboxed,
    // length
    ALength,
    SLength,
    // handler
    GetHdlr,
    SetHdlr,
    // float arithmetic and comparison
    FAdd,
    FSub,
    FMul,
    FDiv,
    FEql,
    FNeq,
    FLt,
    FLe,
    FGt,
    FGe,
    // bitwise
    RShift,
    LShift,
    Orb,
    Andb,
    Xorb,
    Notb,
}

impl Primop {
    /// The number of continuations this primop expects: 1 for data-result
    /// primops, 2 ([t, f]) for branching ones.
    pub fn num_conts(self) -> usize {
        use Primop::*;
        match self {
            ILt | ILe | IGt | IGe | IEql | INeq | RangeChk | Boxed | FEql | FNeq | FLt | FLe
            | FGt | FGe => 2,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        use Primop::*;
        match self {
            IAdd => "+",
            ISub => "-",
            IMul => "*",
            IDiv => "/",
            INeg => "~",
            ILt => "<",
            ILe => "<=",
            IGt => ">",
            IGe => ">=",
            IEql => "ieql",
            INeq => "ineq",
            RangeChk => "rangechk",
            Boxed => "boxed",
            Deref => "!",
            Subscript => "subscript",
            Ordof => "ordof",
            Assign => ":=",
            Update => "update",
            UnboxedAssign => "unboxedassign",
            UnboxedUpdate => "unboxedupdate",
            Store => "store",
            MakeRef => "makeref",
            MakeRefUnboxed => "makerefunboxed",
            ALength => "alength",
            SLength => "slength",
            GetHdlr => "gethdlr",
            SetHdlr => "sethdlr",
            FAdd => "fadd",
            FSub => "fsub",
            FMul => "fmul",
            FDiv => "fdiv",
            FEql => "feql",
            FNeq => "fneq",
            FLt => "flt",
            FLe => "fle",
            FGt => "fgt",
            FGe => "fge",
            RShift => "rshift",
            LShift => "lshift",
            Orb => "orb",
            Andb => "andb",
            Xorb => "xorb",
            Notb => "notb",
        }
    }
}

/// A binding for a mutually recursive function group introduced by `Fix`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunDef {
    pub name: Variable,
    pub formals: Vec<Variable>,
    pub body: Box<CExp>,
}

/// A continuation expression: the body of the interpreter's recursion.
#[derive(Debug, Clone, PartialEq)]
pub enum CExp {
    /// Allocate a record from `fields` (each an operand plus the access
    /// path to project through it), bind `w`, continue into `body`.
    Record {
        fields: Vec<(Value, AccessPath)>,
        w: Variable,
        body: Box<CExp>,
    },
    /// Select field `i` of record `v`, bind `w`, continue.
    Select {
        i: i64,
        v: Value,
        w: Variable,
        body: Box<CExp>,
    },
    /// Rebase record `v` by offset `i`, bind `w`, continue.
    Offset {
        i: i64,
        v: Value,
        w: Variable,
        body: Box<CExp>,
    },
    /// Tail-apply function `f` to `args`.
    App { f: Value, args: Vec<Value> },
    /// Bind a mutually recursive group of functions, then continue.
    Fix { defs: Vec<FunDef>, body: Box<CExp> },
    /// Dispatch on an integer value to one of `arms`.
    Switch { v: Value, arms: Vec<CExp> },
    /// Evaluate a primop over `args`, binding each arm's result list to
    /// that arm's `binders` before continuing into it.
    Primop {
        op: Primop,
        args: Vec<Value>,
        binders: Vec<Vec<Variable>>,
        arms: Vec<CExp>,
    },
}

/// Host-decoded float payload of `DenotableValue::Real`, kept distinct
/// from the syntactic `Value::Real` decimal string. Not part of the
/// syntax tree; used by the denotable value domain.
pub type RealBits = OrderedFloat<f64>;
