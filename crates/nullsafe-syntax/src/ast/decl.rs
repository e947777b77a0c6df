//! Declaration nodes and compilation units.
//!
//! Every declaration can report its fully-qualified path relative to the
//! package of the unit it lives in; that path is what scope activations are
//! matched against.

use crate::ast::expr::Expr;
use crate::ast::ty::Type;
use crate::path::DotPath;
use crate::span::{Span, Spanned};
use crate::symbol::{StringInterner, Symbol};

/// One source file worth of declarations, all in the same package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompilationUnit {
    /// Package the unit declares (`package app.util;`)
    pub package: DotPath,
    /// Top-level declarations in source order
    pub decls: Vec<Decl>,
}

impl CompilationUnit {
    /// Creates a unit.
    #[must_use]
    pub fn new(package: DotPath, decls: Vec<Decl>) -> Self {
        Self { package, decls }
    }

    /// Calls `visit` with the fully-qualified path of every package, type
    /// and function the unit declares, including ancestor packages.
    pub fn for_each_declared_path(&self, interner: &StringInterner, mut visit: impl FnMut(DotPath)) {
        for ancestor in self.package.ancestors() {
            visit(ancestor);
        }

        for decl in &self.decls {
            let path = self.package.child(interner.display(decl.name()));
            match decl {
                Decl::Class { methods, .. } | Decl::Impl { methods, .. } => {
                    for method in methods {
                        visit(path.child(interner.display(method.name)));
                    }
                }
                Decl::Fn(_) | Decl::Const { .. } => {}
            }
            visit(path);
        }
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    /// Free function: `pub fn job(s: String) -> Int { ... }`
    Fn(FnDecl),

    /// Class with fields and methods: `pub class Job { ... }`
    Class {
        /// Class name
        name: Symbol,
        /// Field declarations
        fields: Vec<FieldDecl>,
        /// Methods
        methods: Vec<FnDecl>,
        /// Visibility
        visibility: Visibility,
        /// Source location
        span: Span,
    },

    /// Implementation block adding methods to a type: `impl Job { ... }`
    Impl {
        /// Type being extended
        type_name: Symbol,
        /// Methods
        methods: Vec<FnDecl>,
        /// Source location
        span: Span,
    },

    /// Constant: `pub const LIMIT: Int = 10;`
    Const {
        /// Constant name
        name: Symbol,
        /// Type annotation
        type_annotation: Type,
        /// Value
        value: Expr,
        /// Visibility
        visibility: Visibility,
        /// Source location
        span: Span,
    },
}

impl Decl {
    /// Name of the declaration; for `impl` blocks, the extended type.
    #[must_use]
    pub fn name(&self) -> Symbol {
        match self {
            Decl::Fn(func) => func.name,
            Decl::Class { name, .. } | Decl::Const { name, .. } => *name,
            Decl::Impl { type_name, .. } => *type_name,
        }
    }
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Self::Fn(func) => func.span,
            Self::Class { span, .. } | Self::Impl { span, .. } | Self::Const { span, .. } => *span,
        }
    }
}

/// Visibility modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Exposed to other packages: `pub`
    Public,
    /// Package-private (the default)
    Private,
}

impl Visibility {
    /// Returns `true` for [`Visibility::Public`].
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// A function or method declaration with its body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnDecl {
    /// Function name
    pub name: Symbol,
    /// Whether this is a static method (no `self`)
    pub is_static: bool,
    /// Parameters in declaration order
    pub params: Vec<FnParam>,
    /// Return type
    pub return_type: Option<Type>,
    /// Function body, normally an [`Expr::Block`]
    pub body: Expr,
    /// Visibility
    pub visibility: Visibility,
    /// Source location
    pub span: Span,
}

/// A function parameter: `name: Type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnParam {
    /// Parameter name
    pub name: Symbol,
    /// Declared type
    pub type_annotation: Type,
    /// Source location
    pub span: Span,
}

/// A class field: `name: Type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    /// Field name
    pub name: Symbol,
    /// Declared type
    pub type_annotation: Type,
    /// Source location
    pub span: Span,
}
