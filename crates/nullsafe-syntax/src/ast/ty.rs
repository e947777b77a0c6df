//! Type annotation nodes.
//!
//! The host distinguishes nullable from non-nullable types purely through
//! annotations: `T?` ([`Type::Optional`]) and the generic wrappers `Null<T>`
//! and `Nullable<T>` admit `nil`, everything else does not. Nothing at
//! runtime enforces the difference.

use crate::span::{Span, Spanned};
use crate::symbol::{StringInterner, Symbol};

/// Generic wrapper names the host treats as nullable.
pub const NULLABLE_WRAPPERS: &[&str] = &["Null", "Nullable"];

/// A type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Simple type identifier: `Int`, `String`, `Job`
    Simple {
        /// Type name
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// Generic type: `Map<K, V>`, `Null<String>`
    Generic {
        /// Base type name
        name: Symbol,
        /// Type arguments
        params: Vec<Type>,
        /// Source location
        span: Span,
    },

    /// Array type: `[T]`
    Array {
        /// Element type
        element: Box<Type>,
        /// Source location
        span: Span,
    },

    /// Function type: `(T1, T2) -> R`
    Function {
        /// Parameter types
        params: Vec<Type>,
        /// Return type
        return_type: Box<Type>,
        /// Source location
        span: Span,
    },

    /// Optional type: `T?`
    Optional {
        /// Inner type
        inner: Box<Type>,
        /// Source location
        span: Span,
    },

    /// Left to inference: `_`
    Inferred {
        /// Source location
        span: Span,
    },
}

/// How a declared type relates to the null sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullability {
    /// The annotation admits `nil`.
    Nullable,
    /// The annotation promises a value is always present.
    NonNullable,
    /// No annotation to go on (`_`).
    Unknown,
}

impl Type {
    /// Classifies the annotation according to the host's optionality rules.
    ///
    /// ```
    /// use nullsafe_syntax::ast::{Nullability, Type};
    /// use nullsafe_syntax::{Span, StringInterner};
    ///
    /// let mut interner = StringInterner::new();
    /// let string = Type::Simple { name: interner.intern("String"), span: Span::synthetic() };
    /// let maybe = Type::Generic {
    ///     name: interner.intern("Null"),
    ///     params: vec![string.clone()],
    ///     span: Span::synthetic(),
    /// };
    ///
    /// assert_eq!(string.nullability(&interner), Nullability::NonNullable);
    /// assert_eq!(maybe.nullability(&interner), Nullability::Nullable);
    /// ```
    #[must_use]
    pub fn nullability(&self, interner: &StringInterner) -> Nullability {
        match self {
            Type::Optional { .. } => Nullability::Nullable,
            Type::Generic { name, .. }
                if interner
                    .resolve(*name)
                    .is_some_and(|n| NULLABLE_WRAPPERS.contains(&n)) =>
            {
                Nullability::Nullable
            }
            Type::Inferred { .. } => Nullability::Unknown,
            Type::Simple { .. }
            | Type::Generic { .. }
            | Type::Array { .. }
            | Type::Function { .. } => Nullability::NonNullable,
        }
    }
}

impl Spanned for Type {
    fn span(&self) -> Span {
        match self {
            Self::Simple { span, .. }
            | Self::Generic { span, .. }
            | Self::Array { span, .. }
            | Self::Function { span, .. }
            | Self::Optional { span, .. }
            | Self::Inferred { span } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(interner: &mut StringInterner, name: &str) -> Type {
        Type::Simple {
            name: interner.intern(name),
            span: Span::synthetic(),
        }
    }

    #[test]
    fn test_optional_is_nullable() {
        let mut interner = StringInterner::new();
        let inner = simple(&mut interner, "Int");
        let ty = Type::Optional {
            inner: Box::new(inner),
            span: Span::synthetic(),
        };
        assert_eq!(ty.nullability(&interner), Nullability::Nullable);
    }

    #[test]
    fn test_nullable_wrapper_names() {
        let mut interner = StringInterner::new();
        let inner = simple(&mut interner, "String");
        let nullable = Type::Generic {
            name: interner.intern("Nullable"),
            params: vec![inner.clone()],
            span: Span::synthetic(),
        };
        let list = Type::Generic {
            name: interner.intern("List"),
            params: vec![inner],
            span: Span::synthetic(),
        };
        assert_eq!(nullable.nullability(&interner), Nullability::Nullable);
        assert_eq!(list.nullability(&interner), Nullability::NonNullable);
    }

    #[test]
    fn test_inferred_is_unknown() {
        let interner = StringInterner::new();
        let ty = Type::Inferred {
            span: Span::synthetic(),
        };
        assert_eq!(ty.nullability(&interner), Nullability::Unknown);
    }

    #[test]
    fn test_arrays_and_functions_are_non_nullable() {
        let mut interner = StringInterner::new();
        let int = simple(&mut interner, "Int");
        let array = Type::Array {
            element: Box::new(Type::Optional {
                inner: Box::new(int.clone()),
                span: Span::synthetic(),
            }),
            span: Span::synthetic(),
        };
        let func = Type::Function {
            params: vec![int.clone()],
            return_type: Box::new(int),
            span: Span::synthetic(),
        };
        assert_eq!(array.nullability(&interner), Nullability::NonNullable);
        assert_eq!(func.nullability(&interner), Nullability::NonNullable);
    }
}
