// The primitive-operator evaluator, `evalprim`. Each rule takes the
// already-resolved operand denotable values and the continuation meanings
// available to this primop application, and produces a store-to-answer
// function. Convention: `c` is the single successor continuation; `[t, f]`
// is the Boolean branching pair, each invoked with no arguments.

use std::rc::Rc;

use crate::config::Config;
use crate::error::InterpError;
use crate::store::Store;
use crate::syntax::Primop;
use crate::trampoline::{Bounce, StoreFn};
use crate::value::{DenotableValue, Meaning};

/// Tail-call a continuation with no need for the trampoline to revisit
/// this frame: build its thunk and hand it to the trampoline as the next
/// step, store included.
fn call<C: Config>(k: &Meaning<C>, args: &[DenotableValue<C>]) -> StoreFn<C> {
    let thunk = k(args);
    Box::new(move |store: Store<C>| Bounce::Call(thunk, store))
}

/// `do_raise(exn)`: fetch the current handler and tail-call it with the
/// exception. The handler location invariant guarantees this is always a
/// `Function`; violating it is a host-level failure, not an
/// object-language one, so it panics rather than returning an `InterpError`.
pub fn do_raise<C: Config>(exn: DenotableValue<C>) -> StoreFn<C> {
    Box::new(move |store: Store<C>| {
        log::warn!("object-language exception raised");
        match store.fetch(store.handler_loc()) {
            DenotableValue::Function(handler) => {
                let thunk = handler(&[exn]);
                Bounce::Call(thunk, store)
            }
            _ => panic!("handler location does not hold a function denotation"),
        }
    })
}

fn overflow<C: Config>(exn_kind: &'static str) -> StoreFn<C> {
    let exn = if exn_kind == "overflow" {
        DenotableValue::overflow_exn()
    } else {
        DenotableValue::div_exn()
    };
    do_raise(exn)
}

fn int_in_range<C: Config>(x: i128) -> bool {
    x >= C::MIN_INT as i128 && x <= C::MAX_INT as i128
}

fn real_in_range<C: Config>(x: f64) -> bool {
    x.is_finite() && x >= C::MIN_REAL && x <= C::MAX_REAL
}

fn as_int<C: Config>(v: &DenotableValue<C>, op: &'static str) -> Result<i64, InterpError> {
    match v {
        DenotableValue::Integer(i) => Ok(*i),
        _ => Err(InterpError::PrimopType(op)),
    }
}

fn as_real<C: Config>(v: &DenotableValue<C>, op: &'static str) -> Result<f64, InterpError> {
    match v {
        DenotableValue::Real(r) => Ok(r.into_inner()),
        _ => Err(InterpError::PrimopType(op)),
    }
}

/// Deep content comparison, ignoring the `arbitrarily` oracle: used only to
/// decide *whether* two heap objects are structurally equal before asking
/// the oracle whether that counts as `eq`, the nondeterministic equality
/// rule for heap objects. Two `Function`s are compared by closure identity
/// here purely as an input to that decision. `ieql`/`ineq` on a pair of
/// functions still raises below, regardless of what this returns.
fn content_eq<C: Config>(a: &DenotableValue<C>, b: &DenotableValue<C>) -> bool {
    use DenotableValue::*;
    match (a, b) {
        (String(x), String(y)) => x.as_str() == y.as_str(),
        (Record(xs, xb), Record(ys, yb)) => {
            xb == yb && xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(p, q)| content_eq(p, q))
        }
        (Array(x), Array(y)) | (UnboxedArray(x), UnboxedArray(y)) | (ByteArray(x), ByteArray(y)) => {
            x.as_ref() == y.as_ref()
        }
        (Function(f), Function(g)) => Rc::ptr_eq(f, g),
        (Exception(x), Exception(y)) => x == y,
        _ => false,
    }
}

fn heap_object_len<C: Config>(v: &DenotableValue<C>) -> Option<usize> {
    use DenotableValue::*;
    match v {
        String(s) => Some(s.code_unit_len()),
        Record(xs, _) => Some(xs.len()),
        Array(locs) | UnboxedArray(locs) | ByteArray(locs) => Some(locs.len()),
        _ => None,
    }
}

/// `ieql`/`ineq` on a pair of heap objects: not structurally equal is
/// always `false`; structurally equal and empty is always `true`;
/// structurally equal and non-empty consults the `arbitrarily` oracle,
/// modeling unspecified pointer identity. Function denotations always
/// raise, matching the rule that equality on functions is undefined.
fn struct_eq<C: Config>(a: &DenotableValue<C>, b: &DenotableValue<C>) -> Result<bool, InterpError> {
    if matches!((a, b), (DenotableValue::Function(_), DenotableValue::Function(_))) {
        return Err(InterpError::FunctionEquality);
    }
    if !content_eq(a, b) {
        return Ok(false);
    }
    match heap_object_len(a) {
        Some(0) => Ok(true),
        Some(_) => Ok(C::default().arbitrarily(true, false)),
        // Equal by content but not one of the oracle-eligible heap object
        // kinds (e.g. two `Exception` tags): content equality is decisive.
        None => Ok(true),
    }
}

/// `rangechk(i, j)`, spelled out per the unsigned-compare identity rather
/// than relying on host unsigned casts directly, since `i`/`j` are modeled
/// as ordinary `i64`s that may be negative.
fn rangechk(i: i64, j: i64) -> bool {
    if j < 0 {
        if i < 0 {
            i < j
        } else {
            true
        }
    } else if i < 0 {
        false
    } else {
        i < j
    }
}

/// `evalprim(p, operands, conts)`. Fails fast, before ever touching the
/// store, on arity or type mismatches: these indicate a malformed CPS
/// program and are treated as an implementation abort.
pub fn evalprim<C: Config>(
    op: Primop,
    operands: &[DenotableValue<C>],
    conts: &[Meaning<C>],
) -> Result<StoreFn<C>, InterpError> {
    if conts.len() != op.num_conts() {
        return Err(InterpError::PrimopArity(op.name()));
    }

    use Primop::*;
    match op {
        IAdd | ISub | IMul | IDiv => {
            let [a, b] = two(operands, op.name())?;
            let x = as_int(a, op.name())?;
            let y = as_int(b, op.name())?;
            let c = conts[0].clone();
            Ok(Box::new(move |store: Store<C>| {
                if op == IDiv && y == 0 {
                    return overflow::<C>("div")(store);
                }
                let result: i128 = match op {
                    IAdd => x as i128 + y as i128,
                    ISub => x as i128 - y as i128,
                    IMul => x as i128 * y as i128,
                    IDiv => x as i128 / y as i128,
                    _ => unreachable!(),
                };
                if int_in_range::<C>(result) {
                    call(&c, &[DenotableValue::Integer(result as i64)])(store)
                } else {
                    overflow::<C>("overflow")(store)
                }
            }))
        }

        INeg => {
            let [a] = one(operands, op.name())?;
            let x = as_int(a, op.name())?;
            let c = conts[0].clone();
            Ok(Box::new(move |store: Store<C>| {
                let result = -(x as i128);
                if int_in_range::<C>(result) {
                    call(&c, &[DenotableValue::Integer(result as i64)])(store)
                } else {
                    overflow::<C>("overflow")(store)
                }
            }))
        }

        ILt | ILe | IGt | IGe => {
            let [a, b] = two(operands, op.name())?;
            let x = as_int(a, op.name())?;
            let y = as_int(b, op.name())?;
            let truth = match op {
                ILt => x < y,
                ILe => x <= y,
                IGt => x > y,
                IGe => x >= y,
                _ => unreachable!(),
            };
            Ok(branch(truth, &conts[0], &conts[1]))
        }

        // `ieql`/`ineq` on two Integers compares directly; on a matching
        // pair of heap objects (Record/String/Array/UnboxedArray/
        // ByteArray/Function) it falls to the nondeterministic equality
        // rule in `struct_eq`. Anything else (mismatched variants, a
        // Real operand) is a malformed-program type error: `ieql`'s core
        // domain is Integers, extended here only to the heap objects
        // that are named as oracle-equality candidates.
        IEql | INeq => {
            let [a, b] = two(operands, op.name())?;
            let truth = match (a, b) {
                (DenotableValue::Integer(x), DenotableValue::Integer(y)) => x == y,
                (DenotableValue::Real(_), _) | (_, DenotableValue::Real(_)) => {
                    return Err(InterpError::PrimopType(op.name()));
                }
                _ => struct_eq(a, b)?,
            };
            let truth = if op == INeq { !truth } else { truth };
            Ok(branch(truth, &conts[0], &conts[1]))
        }

        RangeChk => {
            let [a, b] = two(operands, op.name())?;
            let i = as_int(a, op.name())?;
            let j = as_int(b, op.name())?;
            Ok(branch(rangechk(i, j), &conts[0], &conts[1]))
        }

        Boxed => {
            let [a] = one(operands, op.name())?;
            Ok(branch(a.is_boxed(), &conts[0], &conts[1]))
        }

        Deref => {
            let [a] = one(operands, op.name())?;
            evalprim(Subscript, &[a.clone(), DenotableValue::Integer(0)], conts)
        }

        Subscript => {
            let [a, b] = two(operands, op.name())?;
            let n = as_int(b, op.name())?;
            let c = conts[0].clone();
            match a {
                DenotableValue::Record(els, base) => {
                    let idx = base + n;
                    let v = els
                        .get(idx as usize)
                        .cloned()
                        .ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(call(&c, &[v]))
                }
                DenotableValue::Array(locs) => {
                    let loc = *locs.get(n as usize).ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(Box::new(move |store: Store<C>| {
                        let v = store.fetch(loc);
                        call(&c, &[v])(store)
                    }))
                }
                DenotableValue::UnboxedArray(locs) => {
                    let loc = *locs.get(n as usize).ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(Box::new(move |store: Store<C>| {
                        let i = store.fetchi(loc);
                        call(&c, &[DenotableValue::Integer(i)])(store)
                    }))
                }
                _ => Err(InterpError::PrimopType(op.name())),
            }
        }

        Ordof => {
            let [a, b] = two(operands, op.name())?;
            let i = as_int(b, op.name())? as usize;
            let c = conts[0].clone();
            match a {
                DenotableValue::String(s) => {
                    let code = s.code_unit_at(i).ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(call(&c, &[DenotableValue::Integer(code as i64)]))
                }
                DenotableValue::ByteArray(locs) => {
                    let loc = *locs.get(i).ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(Box::new(move |store: Store<C>| {
                        let v = store.fetchi(loc);
                        call(&c, &[DenotableValue::Integer(v)])(store)
                    }))
                }
                _ => Err(InterpError::PrimopType(op.name())),
            }
        }

        Assign => {
            let [a, v] = two(operands, op.name())?;
            evalprim(Update, &[a.clone(), DenotableValue::Integer(0), v.clone()], conts)
        }

        UnboxedAssign => {
            let [a, v] = two(operands, op.name())?;
            evalprim(
                UnboxedUpdate,
                &[a.clone(), DenotableValue::Integer(0), v.clone()],
                conts,
            )
        }

        Update => {
            let [a, b, v] = three(operands, op.name())?;
            let n = as_int(b, op.name())?;
            let c = conts[0].clone();
            match a {
                DenotableValue::Array(locs) => {
                    let loc = *locs.get(n as usize).ok_or(InterpError::AccessPathOutOfRange)?;
                    let v = v.clone();
                    Ok(Box::new(move |store: Store<C>| {
                        let store = store.upd(loc, v);
                        call(&c, &[])(store)
                    }))
                }
                DenotableValue::UnboxedArray(locs) => {
                    let loc = *locs.get(n as usize).ok_or(InterpError::AccessPathOutOfRange)?;
                    let i = as_int(v, op.name())?;
                    Ok(Box::new(move |store: Store<C>| {
                        let store = store.updi(loc, i);
                        call(&c, &[])(store)
                    }))
                }
                _ => Err(InterpError::PrimopType(op.name())),
            }
        }

        UnboxedUpdate => {
            let [a, b, v] = three(operands, op.name())?;
            let n = as_int(b, op.name())?;
            let i = as_int(v, op.name())?;
            let c = conts[0].clone();
            match a {
                DenotableValue::Array(locs) => {
                    let loc = *locs.get(n as usize).ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(Box::new(move |store: Store<C>| {
                        let store = store.upd(loc, DenotableValue::Integer(i));
                        call(&c, &[])(store)
                    }))
                }
                DenotableValue::UnboxedArray(locs) => {
                    let loc = *locs.get(n as usize).ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(Box::new(move |store: Store<C>| {
                        let store = store.updi(loc, i);
                        call(&c, &[])(store)
                    }))
                }
                _ => Err(InterpError::PrimopType(op.name())),
            }
        }

        Store => {
            let [a, b, v] = three(operands, op.name())?;
            let i = as_int(b, op.name())?;
            let val = as_int(v, op.name())?;
            if !(0..256).contains(&val) {
                return Err(InterpError::ByteOutOfRange(val));
            }
            let c = conts[0].clone();
            match a {
                DenotableValue::ByteArray(locs) => {
                    let loc = *locs.get(i as usize).ok_or(InterpError::AccessPathOutOfRange)?;
                    Ok(Box::new(move |store: Store<C>| {
                        let store = store.updi(loc, val);
                        call(&c, &[])(store)
                    }))
                }
                _ => Err(InterpError::PrimopType(op.name())),
            }
        }

        MakeRef => {
            let [v] = one(operands, op.name())?;
            let v = v.clone();
            let c = conts[0].clone();
            Ok(Box::new(move |store: Store<C>| {
                let (loc, store) = store.alloc();
                log::debug!("makeref allocated a fresh location");
                let store = store.upd(loc, v);
                call(&c, &[DenotableValue::Array(Rc::new(vec![loc]))])(store)
            }))
        }

        MakeRefUnboxed => {
            let [v] = one(operands, op.name())?;
            let i = as_int(v, op.name())?;
            let c = conts[0].clone();
            Ok(Box::new(move |store: Store<C>| {
                let (loc, store) = store.alloc();
                log::debug!("makerefunboxed allocated a fresh location");
                let store = store.updi(loc, i);
                call(&c, &[DenotableValue::UnboxedArray(Rc::new(vec![loc]))])(store)
            }))
        }

        ALength => {
            let [a] = one(operands, op.name())?;
            let len = match a {
                DenotableValue::Array(locs) | DenotableValue::UnboxedArray(locs) => locs.len(),
                _ => return Err(InterpError::PrimopType(op.name())),
            };
            Ok(call(&conts[0], &[DenotableValue::Integer(len as i64)]))
        }

        SLength => {
            let [a] = one(operands, op.name())?;
            let len = match a {
                DenotableValue::ByteArray(locs) => locs.len(),
                DenotableValue::String(s) => s.code_unit_len(),
                _ => return Err(InterpError::PrimopType(op.name())),
            };
            Ok(call(&conts[0], &[DenotableValue::Integer(len as i64)]))
        }

        GetHdlr => {
            let c = conts[0].clone();
            Ok(Box::new(move |store: Store<C>| {
                let h = store.fetch(store.handler_loc());
                call(&c, &[h])(store)
            }))
        }

        SetHdlr => {
            let [h] = one(operands, op.name())?;
            let h = h.clone();
            let c = conts[0].clone();
            // Writes the handler argument `h` itself, not a placeholder:
            // anything else would make sethdlr/gethdlr round-tripping
            // impossible.
            Ok(Box::new(move |store: Store<C>| {
                let loc = store.handler_loc();
                let store = store.upd(loc, h);
                call(&c, &[])(store)
            }))
        }

        FAdd | FSub | FMul | FDiv => {
            let [a, b] = two(operands, op.name())?;
            let x = as_real(a, op.name())?;
            let y = as_real(b, op.name())?;
            let c = conts[0].clone();
            Ok(Box::new(move |store: Store<C>| {
                if op == FDiv && y == 0.0 {
                    return overflow::<C>("div")(store);
                }
                let result = match op {
                    FAdd => x + y,
                    FSub => x - y,
                    FMul => x * y,
                    FDiv => x / y,
                    _ => unreachable!(),
                };
                if real_in_range::<C>(result) {
                    call(&c, &[DenotableValue::Real(result.into())])(store)
                } else {
                    overflow::<C>("overflow")(store)
                }
            }))
        }

        FEql | FNeq | FLt | FLe | FGt | FGe => {
            let [a, b] = two(operands, op.name())?;
            let x = as_real(a, op.name())?;
            let y = as_real(b, op.name())?;
            let truth = match op {
                FEql => x == y,
                FNeq => x != y,
                FLt => x < y,
                FLe => x <= y,
                FGt => x > y,
                FGe => x >= y,
                _ => unreachable!(),
            };
            Ok(branch(truth, &conts[0], &conts[1]))
        }

        RShift | LShift | Orb | Andb | Xorb => {
            let [a, b] = two(operands, op.name())?;
            let x = as_int(a, op.name())?;
            let y = as_int(b, op.name())?;
            let result = match op {
                RShift => x >> (y & 63),
                LShift => x << (y & 63),
                Orb => x | y,
                Andb => x & y,
                Xorb => x ^ y,
                _ => unreachable!(),
            };
            Ok(call(&conts[0], &[DenotableValue::Integer(result)]))
        }

        Notb => {
            let [a] = one(operands, op.name())?;
            let x = as_int(a, op.name())?;
            Ok(call(&conts[0], &[DenotableValue::Integer(!x)]))
        }
    }
}

/// `[t, f]` branching: call `t` if `truth`, else `f`. Both take no
/// arguments.
fn branch<C: Config>(truth: bool, t: &Meaning<C>, f: &Meaning<C>) -> StoreFn<C> {
    if truth {
        call(t, &[])
    } else {
        call(f, &[])
    }
}

fn one<'a, C: Config>(
    ops: &'a [DenotableValue<C>],
    op: &'static str,
) -> Result<[&'a DenotableValue<C>; 1], InterpError> {
    match ops {
        [a] => Ok([a]),
        _ => Err(InterpError::PrimopArity(op)),
    }
}

fn two<'a, C: Config>(
    ops: &'a [DenotableValue<C>],
    op: &'static str,
) -> Result<[&'a DenotableValue<C>; 2], InterpError> {
    match ops {
        [a, b] => Ok([a, b]),
        _ => Err(InterpError::PrimopArity(op)),
    }
}

fn three<'a, C: Config>(
    ops: &'a [DenotableValue<C>],
    op: &'static str,
) -> Result<[&'a DenotableValue<C>; 3], InterpError> {
    match ops {
        [a, b, c] => Ok([a, b, c]),
        _ => Err(InterpError::PrimopArity(op)),
    }
}
