// The expression evaluator: `E(e)(env) : Store -> Answer`, and the
// top-level driver `eval`. `E` is split here into `eval_expr`, which builds
// the store-to-answer function eagerly, failing fast with an
// `InterpError` on anything checkable without a store (an unbound
// variable, a `Select` into a value that obviously isn't a record, an
// out-of-range `Switch`), and the `StoreFn` it returns, which runs once a
// store is finally supplied.
//
// Once evaluation is inside a `Function` or continuation meaning (i.e.
// inside a closure built here and handed to `primop::evalprim` or stored
// in a `DenotableValue::Function`), a later `InterpError` can no longer be
// threaded back through `Result`. The `Meaning` signature doesn't allow
// it: these are host-level aborts with no defined recovery. Those spots
// panic, mirroring the teacher's own `ir.rs`, which panics on invalid
// `DeBruijnPair` addressing rather than returning a `Result`.

use ordered_float::OrderedFloat;
use std::cell::RefCell;
use std::rc::Rc;

use crate::access;
use crate::config::Config;
use crate::env::Environment;
use crate::error::InterpError;
use crate::primop;
use crate::store::Store;
use crate::syntax::{CExp, Value};
use crate::trampoline::{run_trampoline, Bounce, StoreFn};
use crate::types::rope::Rope;
use crate::value::{DenotableValue, Meaning};
use crate::var::Variable;

/// `V(env, value)`: the syntactic-to-denotable coercion.
fn coerce<C: Config>(env: &Environment<C>, v: &Value) -> Result<DenotableValue<C>, InterpError> {
    match v {
        Value::Variable(x) | Value::Label(x) => env.lookup(x),
        Value::Integer(i) => Ok(DenotableValue::Integer(*i)),
        Value::Real(s) => Ok(DenotableValue::Real(OrderedFloat(C::string2real(s)))),
        Value::String(s) => Ok(DenotableValue::String(Rope::from_str(s))),
    }
}

fn coerce_all<C: Config>(
    env: &Environment<C>,
    vs: &[Value],
) -> Result<Vec<DenotableValue<C>>, InterpError> {
    vs.iter().map(|v| coerce(env, v)).collect()
}

/// `E(e)(env)`.
pub fn eval_expr<C: Config>(
    e: &CExp,
    env: &Environment<C>,
) -> Result<StoreFn<C>, InterpError> {
    log::trace!("evaluating {}", cexp_tag(e));
    match e {
        CExp::Record { fields, w, body } => {
            let mut elements = Vec::with_capacity(fields.len());
            for (v, path) in fields {
                let base = coerce(env, v)?;
                elements.push(access::resolve(&base, path)?);
            }
            let record = DenotableValue::Record(Rc::new(elements), 0);
            let env2 = env.bind(w.clone(), record);
            eval_expr(body, &env2)
        }

        CExp::Select { i, v, w, body } => {
            let dv = coerce(env, v)?;
            match dv {
                DenotableValue::Record(els, base) => {
                    let idx = base + i;
                    let el = if idx >= 0 {
                        els.get(idx as usize)
                    } else {
                        None
                    };
                    let el = el.cloned().ok_or(InterpError::AccessPathOutOfRange)?;
                    let env2 = env.bind(w.clone(), el);
                    eval_expr(body, &env2)
                }
                _ => Err(InterpError::SelectOnNonRecord),
            }
        }

        CExp::Offset { i, v, w, body } => {
            let dv = coerce(env, v)?;
            match dv {
                DenotableValue::Record(els, base) => {
                    let env2 = env.bind(w.clone(), DenotableValue::Record(els, base + i));
                    eval_expr(body, &env2)
                }
                _ => Err(InterpError::OffsetOnNonRecord),
            }
        }

        CExp::App { f, args } => {
            let fv = coerce(env, f)?;
            let argvs = coerce_all(env, args)?;
            match fv {
                DenotableValue::Function(g) => Ok(Box::new(move |store: Store<C>| {
                    let thunk = g(&argvs);
                    Bounce::Call(thunk, store)
                })),
                _ => Err(InterpError::AppliedNonFunction),
            }
        }

        CExp::Switch { v, arms } => {
            let dv = coerce(env, v)?;
            match dv {
                DenotableValue::Integer(i) => {
                    if i < 0 || i as usize >= arms.len() {
                        return Err(InterpError::SwitchOutOfRange {
                            index: i,
                            len: arms.len(),
                        });
                    }
                    eval_expr(&arms[i as usize], env)
                }
                _ => Err(InterpError::SwitchOnNonInteger),
            }
        }

        CExp::Primop {
            op,
            args,
            binders,
            arms,
        } => {
            let argvs = coerce_all(env, args)?;
            let mut conts: Vec<Meaning<C>> = Vec::with_capacity(arms.len());
            for (binder, arm) in binders.iter().zip(arms.iter()) {
                let binder = binder.clone();
                let arm = arm.clone();
                let env = env.clone();
                let cont: Meaning<C> = Rc::new(move |al: &[DenotableValue<C>]| {
                    let env2 = env
                        .bindn(&binder, al)
                        .unwrap_or_else(|e| panic!("primop continuation: {}", e));
                    eval_expr(&arm, &env2).unwrap_or_else(|e| panic!("primop arm: {}", e))
                });
                conts.push(cont);
            }
            primop::evalprim(*op, &argvs, &conts)
        }

        CExp::Fix { defs, body } => {
            // Closure cycles via Fix: build every def's meaning first,
            // closing over a shared cell that is still empty, then patch
            // the cell with the completed group environment once every
            // name is bound. No partially built environment is ever
            // copied, only this one cell is ever mutated, exactly once.
            let cell: Rc<RefCell<Option<Environment<C>>>> = Rc::new(RefCell::new(None));

            let mut rec_env = env.clone();
            for def in defs {
                let cell = cell.clone();
                let formals = def.formals.clone();
                let body = def.body.clone();
                let meaning: Meaning<C> = Rc::new(move |al: &[DenotableValue<C>]| {
                    let group_env = cell
                        .borrow()
                        .clone()
                        .expect("fix group environment read before it was patched");
                    let call_env = group_env
                        .bindn(&formals, al)
                        .unwrap_or_else(|e| panic!("fix call: {}", e));
                    eval_expr(&body, &call_env).unwrap_or_else(|e| panic!("fix body: {}", e))
                });
                rec_env = rec_env.bind(def.name.clone(), DenotableValue::Function(meaning));
            }
            *cell.borrow_mut() = Some(rec_env.clone());

            eval_expr(body, &rec_env)
        }
    }
}

fn cexp_tag(e: &CExp) -> &'static str {
    match e {
        CExp::Record { .. } => "Record",
        CExp::Select { .. } => "Select",
        CExp::Offset { .. } => "Offset",
        CExp::App { .. } => "App",
        CExp::Switch { .. } => "Switch",
        CExp::Primop { .. } => "Primop",
        CExp::Fix { .. } => "Fix",
    }
}

/// `eval(formals, e)(args)(store) : Answer`. Binds the initial
/// formals to the initial arguments in the empty environment, then runs
/// `E(e)` against the given store via the trampoline.
pub fn eval<C: Config>(
    formals: &[Variable],
    e: &CExp,
    args: &[DenotableValue<C>],
    store: Store<C>,
) -> C::Answer {
    let env = Environment::empty()
        .bindn(formals, args)
        .unwrap_or_else(|err| panic!("eval: {}", err));
    let thunk = eval_expr(e, &env).unwrap_or_else(|err| panic!("eval: {}", err));
    run_trampoline(thunk, store)
}
