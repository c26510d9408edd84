// A thin convenience layer around `eval::eval` for `DefaultConfig`
// embedders: assemble an initial store whose handler location is already
// seeded with a denotation that turns an uncaught object-language
// exception into `Err`, so that the crate's own tests don't need to
// hand-build a store every time.

use std::rc::Rc;

use crate::config::DefaultConfig;
use crate::eval;
use crate::store::Store;
use crate::syntax::CExp;
use crate::trampoline::{Bounce, StoreFn};
use crate::value::{DenotableValue, Meaning};
use crate::var::Variable;

/// The answer type `DefaultConfig` runs produce: the value delivered to
/// whatever top continuation the program's initial environment supplies,
/// or the exception value that reached the top-level handler uncaught.
pub type RunResult = Result<DenotableValue<DefaultConfig>, DenotableValue<DefaultConfig>>;

fn top_level_handler() -> Meaning<DefaultConfig> {
    Rc::new(|args: &[DenotableValue<DefaultConfig>]| -> StoreFn<DefaultConfig> {
        let exn = args.first().cloned().unwrap_or(DenotableValue::Integer(0));
        Box::new(move |_store| Bounce::Done(Err(exn)))
    })
}

/// Run a closed CPS expression with `DefaultConfig`. `formals`/`args` seed
/// the initial environment exactly as `eval::eval` expects. The caller
/// is responsible for binding whatever top continuation the program's
/// `App`s tail-call into `Ok`, typically by supplying it as one of the
/// initial formals.
pub fn run(
    formals: &[Variable],
    e: &CExp,
    args: &[DenotableValue<DefaultConfig>],
) -> RunResult {
    let config = DefaultConfig;
    let store = Store::new(&config, DenotableValue::Function(top_level_handler()));
    eval::eval(formals, e, args, store)
}
