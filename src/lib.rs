// A denotational interpreter for Appel's CPS intermediate language
// (_Compiling with Continuations_). Given a closed `CExp` and an initial
// environment, `eval::eval` computes an answer: the value delivered to a
// top-level continuation, or an exception propagated through the current
// handler. No parser, no pretty-printer, no optimizer, no codegen. The
// core consumes a tree built elsewhere and produces an answer.

pub mod access;
pub mod config;
pub mod driver;
pub mod env;
pub mod error;
pub mod eval;
pub mod loc;
pub mod primop;
pub mod store;
pub mod syntax;
pub mod trampoline;
pub mod types;
pub mod value;
pub mod var;

pub use config::{Config, DefaultConfig};
pub use error::InterpError;
pub use eval::eval;
pub use store::Store;
pub use syntax::{AccessPath, CExp, FunDef, Primop, Value};
pub use value::DenotableValue;
pub use var::Variable;
