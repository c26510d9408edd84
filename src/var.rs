// CPS variables are opaque binder tokens. Equality is by identity of the
// underlying name, which is all the environment and access-path machinery
// need.

use std::rc::Rc;

/// A CPS variable: the unique identifier of a binder introduced by `Record`,
/// `Select`, `Offset`, `Fix`, or a `Primop`'s result binders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(Rc<str>);

impl Variable {
    pub fn new<S: Into<Rc<str>>>(name: S) -> Variable {
        Variable(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Variable {
        Variable::new(s)
    }
}

impl From<String> for Variable {
    fn from(s: String) -> Variable {
        Variable::new(s)
    }
}
