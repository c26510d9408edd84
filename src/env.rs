// The environment: an immutable mapping from CPS variables to denotable
// values, extended by `bind`/`bindn`. Implemented as a persistent map so
// that `bind` is O(1) amortized and never disturbs any environment still
// referenced elsewhere, the same structural-sharing discipline the store
// uses.

use im::HashMap;

use crate::config::Config;
use crate::error::InterpError;
use crate::value::DenotableValue;
use crate::var::Variable;

#[derive(Clone)]
pub struct Environment<C: Config>(HashMap<Variable, DenotableValue<C>>);

impl<C: Config> Environment<C> {
    /// `empty_env`: unbound everywhere.
    pub fn empty() -> Environment<C> {
        Environment(HashMap::new())
    }

    /// `env(v)`. Undefined if `v` is unbound; surfaced here as an
    /// `InterpError` rather than a panic, since lookup is the one place a
    /// malformed program is easy to catch without cost in the hot path.
    pub fn lookup(&self, v: &Variable) -> Result<DenotableValue<C>, InterpError> {
        self.0.get(v).cloned().ok_or_else(|| InterpError::unbound(v))
    }

    /// `bind(env, v, d)`.
    pub fn bind(&self, v: Variable, d: DenotableValue<C>) -> Environment<C> {
        Environment(self.0.update(v, d))
    }

    /// `bindn(env, vs, ds)`. Requires `vs.len() == ds.len()`.
    pub fn bindn(
        &self,
        vs: &[Variable],
        ds: &[DenotableValue<C>],
    ) -> Result<Environment<C>, InterpError> {
        if vs.len() != ds.len() {
            return Err(InterpError::ArityMismatch {
                formals: vs.len(),
                args: ds.len(),
            });
        }
        let mut env = self.0.clone();
        for (v, d) in vs.iter().zip(ds.iter()) {
            env.insert(v.clone(), d.clone());
        }
        Ok(Environment(env))
    }
}
