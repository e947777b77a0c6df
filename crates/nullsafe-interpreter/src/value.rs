//! Run-time values.

use fxhash::FxHashMap;
use nullsafe_runtime::SafeArray;
use nullsafe_syntax::Symbol;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An instance of a class.
#[derive(Debug)]
pub struct Object {
    /// Class the object was constructed as
    pub class: Symbol,
    /// Field values
    pub fields: RefCell<FxHashMap<Symbol, Value>>,
}

/// A value produced by evaluation.
///
/// Objects and arrays have reference semantics: clones share storage.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null value
    Nil,
    /// Result of statements and blocks without a tail
    Unit,
    /// Integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// String
    Str(Rc<str>),
    /// Class instance
    Object(Rc<Object>),
    /// Plain array; out-of-range reads yield `nil`
    Array(Rc<RefCell<Vec<Value>>>),
    /// Array with checked reads that yield [`Value::Optional`]
    SafeArray(Rc<RefCell<SafeArray<Value>>>),
    /// Result of a checked read: absent, or present (possibly a stored nil)
    Optional(Option<Box<Value>>),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    /// Creates a plain array.
    #[must_use]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Creates a safe array.
    #[must_use]
    pub fn safe_array(items: Vec<Value>) -> Self {
        Value::SafeArray(Rc::new(RefCell::new(SafeArray::from(items))))
    }

    /// Returns `true` for `nil` and for an absent optional.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil | Value::Optional(None))
    }

    /// Views the value as optional: `nil` and absent are `None`, a present
    /// optional unwraps one level, everything else is `Some(self)`.
    #[must_use]
    pub fn into_option(self) -> Option<Value> {
        match self {
            Value::Nil | Value::Optional(None) => None,
            Value::Optional(Some(inner)) => Some(*inner),
            other => Some(other),
        }
    }

    /// Name of the value's type, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Unit => "Unit",
            Value::Int(_) => "Int",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "String",
            Value::Object(_) => "Object",
            Value::Array(_) => "Array",
            Value::SafeArray(_) => "SafeArray",
            Value::Optional(_) => "Optional",
        }
    }

    /// Host equality: scalars by value, objects and arrays by identity.
    #[must_use]
    pub fn host_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Optional(Some(a)), Value::Optional(Some(b))) => a.host_eq(b),
            (a, b) if a.is_nil() || b.is_nil() => a.is_nil() && b.is_nil(),
            (Value::Optional(Some(a)), b) | (b, Value::Optional(Some(a))) => a.host_eq(b),
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::SafeArray(a), Value::SafeArray(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.host_eq(other)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

fn write_list<'a>(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = &'a Value>) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Unit => f.write_str("()"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(object) => write!(f, "<object {}>", object.class.as_u32()),
            Value::Array(items) => write_list(f, items.borrow().iter()),
            Value::SafeArray(items) => write_list(f, items.borrow().iter()),
            Value::Optional(None) => f.write_str("absent"),
            Value::Optional(Some(inner)) => write!(f, "present({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_equality() {
        assert_eq!(Value::Nil, Value::Optional(None));
        assert_ne!(Value::Nil, Value::Int(0));
        assert_ne!(Value::Optional(Some(Box::new(Value::Nil))), Value::Nil);
        assert_eq!(Value::Optional(Some(Box::new(Value::Int(2)))), Value::Int(2));
    }

    #[test]
    fn test_present_nil_is_reflexive() {
        let stored = Value::Optional(Some(Box::new(Value::Nil)));
        assert_eq!(stored, stored.clone());
        assert_ne!(stored, Value::Optional(None));
    }

    #[test]
    fn test_reference_identity() {
        let a = Value::array(vec![Value::Int(1)]);
        let b = Value::array(vec![Value::Int(1)]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_into_option() {
        assert_eq!(Value::Nil.into_option(), None);
        assert_eq!(Value::Optional(Some(Box::new(Value::Nil))).into_option(), Some(Value::Nil));
        assert_eq!(Value::str("x").into_option(), Some(Value::str("x")));
    }

    #[test]
    fn test_display() {
        let array = Value::safe_array(vec![Value::Int(1), Value::Nil]);
        assert_eq!(array.to_string(), "[1, nil]");
        assert_eq!(Value::Optional(Some(Box::new(Value::Int(3)))).to_string(), "present(3)");
    }
}
