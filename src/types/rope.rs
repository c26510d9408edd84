// The internal representation of strings held by DenotableValue::String.
// `O(log(n))` all the things! (TODO: back this with an actual rope; a plain
// `Rc<str>` is a placeholder that keeps cloning cheap in the meantime.)

use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rope(Rc<str>);

impl Rope {
    pub fn from_str(s: &str) -> Rope {
        Rope(Rc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of UTF-16 code units, what `slength` reports for a string
    /// rather than byte length or `char` count.
    pub fn code_unit_len(&self) -> usize {
        self.0.encode_utf16().count()
    }

    /// The code unit at index `i`, as `ordof` on strings expects.
    pub fn code_unit_at(&self, i: usize) -> Option<u16> {
        self.0.encode_utf16().nth(i)
    }
}
