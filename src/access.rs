// Access-path resolution, `F`: the static description of how to project
// out of a record, applied to an actual runtime value.

use crate::config::Config;
use crate::error::InterpError;
use crate::syntax::AccessPath;
use crate::value::DenotableValue;

/// `F(x, p)`.
pub fn resolve<C: Config>(
    x: &DenotableValue<C>,
    path: &AccessPath,
) -> Result<DenotableValue<C>, InterpError> {
    match path {
        // F(x, Off(0)) = x, for any x.
        AccessPath::Off(0) => Ok(x.clone()),
        AccessPath::Off(j) => match x {
            DenotableValue::Record(els, i) => Ok(DenotableValue::Record(els.clone(), i + j)),
            _ => Err(InterpError::OffsetOnNonRecord),
        },
        AccessPath::Sel(j, p) => match x {
            DenotableValue::Record(els, i) => {
                let idx = i + j;
                let el = if idx >= 0 {
                    els.get(idx as usize)
                } else {
                    None
                };
                let el = el.cloned().ok_or(InterpError::AccessPathOutOfRange)?;
                resolve(&el, p)
            }
            _ => Err(InterpError::SelectOnNonRecord),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultConfig;
    use std::rc::Rc;

    fn record(n: i64) -> DenotableValue<DefaultConfig> {
        let els: Vec<_> = (0..5).map(DenotableValue::Integer).collect();
        DenotableValue::Record(Rc::new(els), n)
    }

    #[test]
    fn off_zero_is_identity() {
        let r = record(0);
        let out = resolve(&r, &AccessPath::Off(0)).unwrap();
        match out {
            DenotableValue::Record(_, base) => assert_eq!(base, 0),
            _ => panic!("expected record"),
        }
    }

    #[test]
    fn offset_then_select_matches_path_concatenation() {
        let r = record(0);
        let p1 = AccessPath::Off(2);
        let p2 = AccessPath::Sel(1, Box::new(AccessPath::Off(0)));

        let step_by_step = resolve(&resolve(&r, &p1).unwrap(), &p2).unwrap();
        let concatenated = resolve(&r, &p1.then(&p2)).unwrap();

        match (step_by_step, concatenated) {
            (DenotableValue::Integer(a), DenotableValue::Integer(b)) => assert_eq!(a, b),
            _ => panic!("expected matching integers"),
        }
    }

    #[test]
    fn select_out_of_range_is_an_error() {
        let r = record(0);
        let p = AccessPath::Sel(100, Box::new(AccessPath::Off(0)));
        assert!(resolve(&r, &p).is_err());
    }
}
