//! Programmatic AST construction.
//!
//! [`AstBuilder`] owns a [`StringInterner`] and hands out nodes with distinct,
//! monotonically increasing spans, so trees built in tests and benchmarks
//! look like parser output to the rest of the pipeline.
//!
//! ```
//! use nullsafe_syntax::build::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! let access = b.safe_field(b.ident("user"), "name");
//! assert!(access.is_safe_access());
//! ```

use crate::ast::{
    BinaryOp, CallArg, CompilationUnit, Decl, Expr, FieldDecl, FieldInit, FnDecl, FnParam, Stmt,
    Type, UnaryOp, Visibility,
};
use crate::path::DotPath;
use crate::span::Span;
use crate::symbol::{StringInterner, Symbol};
use std::cell::{Cell, RefCell};

/// Builds AST nodes against an owned interner.
///
/// Methods take `&self` so nested calls like `b.field(b.ident("a"), "x")`
/// compile; the interner and span counter use interior mutability.
#[derive(Debug, Default)]
pub struct AstBuilder {
    interner: RefCell<StringInterner>,
    offset: Cell<usize>,
}

impl AstBuilder {
    /// Creates a builder with an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the builder, returning the interner holding every name used.
    #[must_use]
    pub fn into_interner(self) -> StringInterner {
        self.interner.into_inner()
    }

    /// Interns `name`.
    pub fn sym(&self, name: &str) -> Symbol {
        self.interner.borrow_mut().intern(name)
    }

    /// Returns a fresh span one column past the previous one.
    pub fn span(&self) -> Span {
        let at = self.offset.get();
        self.offset.set(at + 1);
        Span::new(at, at + 1, 1, at + 1)
    }

    // ===== Expressions =====

    /// `42`
    pub fn int(&self, value: i64) -> Expr {
        Expr::IntegerLiteral {
            value,
            span: self.span(),
        }
    }

    /// `"text"`
    pub fn string(&self, value: &str) -> Expr {
        Expr::StringLiteral {
            value: self.sym(value),
            span: self.span(),
        }
    }

    /// `true` / `false`
    pub fn bool(&self, value: bool) -> Expr {
        Expr::BoolLiteral {
            value,
            span: self.span(),
        }
    }

    /// `nil`
    pub fn nil(&self) -> Expr {
        Expr::Nil { span: self.span() }
    }

    /// `name`
    pub fn ident(&self, name: &str) -> Expr {
        Expr::Identifier {
            name: self.sym(name),
            span: self.span(),
        }
    }

    /// `a::b::c`
    pub fn path(&self, segments: &[&str]) -> Expr {
        Expr::Path {
            segments: segments.iter().map(|s| self.sym(s)).collect(),
            span: self.span(),
        }
    }

    /// `op operand`
    pub fn unary(&self, op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
            span: self.span(),
        }
    }

    /// `left op right`
    pub fn binary(&self, left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: self.span(),
        }
    }

    /// `left == right`
    pub fn eq(&self, left: Expr, right: Expr) -> Expr {
        self.binary(left, BinaryOp::Eq, right)
    }

    /// `left + right`
    pub fn add(&self, left: Expr, right: Expr) -> Expr {
        self.binary(left, BinaryOp::Add, right)
    }

    /// `if condition { then } else { otherwise }`
    pub fn if_else(&self, condition: Expr, then: Expr, otherwise: Option<Expr>) -> Expr {
        Expr::If {
            condition: Box::new(condition),
            then_branch: Box::new(then),
            else_branch: otherwise.map(Box::new),
            span: self.span(),
        }
    }

    /// `{ stmts; tail }`
    pub fn block(&self, stmts: Vec<Stmt>, tail: Option<Expr>) -> Expr {
        Expr::Block {
            stmts,
            expr: tail.map(Box::new),
            span: self.span(),
        }
    }

    /// `callee(args)`
    pub fn call(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            args: args.into_iter().map(CallArg::positional).collect(),
            span: self.span(),
        }
    }

    /// `name(args)`
    pub fn call_named(&self, name: &str, args: Vec<Expr>) -> Expr {
        let callee = self.ident(name);
        self.call(callee, args)
    }

    /// `object.field`
    pub fn field(&self, object: Expr, field: &str) -> Expr {
        self.access(object, field, false)
    }

    /// `object?.field`
    pub fn safe_field(&self, object: Expr, field: &str) -> Expr {
        self.access(object, field, true)
    }

    fn access(&self, object: Expr, field: &str, safe: bool) -> Expr {
        Expr::Field {
            object: Box::new(object),
            field: self.sym(field),
            safe,
            span: self.span(),
        }
    }

    /// `receiver.method(args)`
    pub fn method(&self, receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
        self.method_call(receiver, method, args, false)
    }

    /// `receiver?.method(args)`
    pub fn safe_method(&self, receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
        self.method_call(receiver, method, args, true)
    }

    fn method_call(&self, receiver: Expr, method: &str, args: Vec<Expr>, safe: bool) -> Expr {
        Expr::MethodCall {
            receiver: Box::new(receiver),
            method: self.sym(method),
            args: args.into_iter().map(CallArg::positional).collect(),
            safe,
            span: self.span(),
        }
    }

    /// `collection[index]`
    pub fn index(&self, collection: Expr, index: Expr) -> Expr {
        Expr::Index {
            collection: Box::new(collection),
            index: Box::new(index),
            span: self.span(),
        }
    }

    /// `[elements]`
    pub fn array(&self, elements: Vec<Expr>) -> Expr {
        Expr::Array {
            elements,
            span: self.span(),
        }
    }

    /// `Name { field: value, .. }`
    pub fn construct(&self, name: &str, fields: Vec<(&str, Expr)>) -> Expr {
        Expr::Struct {
            name: self.sym(name),
            fields: fields
                .into_iter()
                .map(|(field, value)| FieldInit {
                    name: self.sym(field),
                    value,
                })
                .collect(),
            span: self.span(),
        }
    }

    /// `(expr)`
    pub fn paren(&self, expr: Expr) -> Expr {
        Expr::Paren {
            expr: Box::new(expr),
            span: self.span(),
        }
    }

    // ===== Statements =====

    /// `let name: ty = init;`
    pub fn let_stmt(&self, name: &str, ty: Option<Type>, init: Expr) -> Stmt {
        Stmt::Let {
            name: self.sym(name),
            mutable: false,
            type_annotation: ty,
            init: Some(init),
            span: self.span(),
        }
    }

    /// `let mut name = init;`
    pub fn let_mut(&self, name: &str, init: Expr) -> Stmt {
        Stmt::Let {
            name: self.sym(name),
            mutable: true,
            type_annotation: None,
            init: Some(init),
            span: self.span(),
        }
    }

    /// `target = value;`
    pub fn assign(&self, target: Expr, value: Expr) -> Stmt {
        Stmt::Assign {
            target,
            value,
            span: self.span(),
        }
    }

    /// `return value;`
    pub fn ret(&self, value: Option<Expr>) -> Stmt {
        Stmt::Return {
            value,
            span: self.span(),
        }
    }

    /// `while condition { body }`
    pub fn while_loop(&self, condition: Expr, body: Expr) -> Stmt {
        Stmt::While {
            condition,
            body,
            span: self.span(),
        }
    }

    /// `expr;`
    pub fn stmt(&self, expr: Expr) -> Stmt {
        Stmt::Expr {
            expr,
            span: self.span(),
        }
    }

    // ===== Types =====

    /// `Name`
    pub fn ty(&self, name: &str) -> Type {
        Type::Simple {
            name: self.sym(name),
            span: self.span(),
        }
    }

    /// `inner?`
    pub fn optional(&self, inner: Type) -> Type {
        Type::Optional {
            inner: Box::new(inner),
            span: self.span(),
        }
    }

    /// `Name<params>`
    pub fn generic(&self, name: &str, params: Vec<Type>) -> Type {
        Type::Generic {
            name: self.sym(name),
            params,
            span: self.span(),
        }
    }

    /// `[element]`
    pub fn array_ty(&self, element: Type) -> Type {
        Type::Array {
            element: Box::new(element),
            span: self.span(),
        }
    }

    /// `_`
    pub fn inferred(&self) -> Type {
        Type::Inferred { span: self.span() }
    }

    // ===== Declarations =====

    /// `name: ty`
    pub fn param(&self, name: &str, ty: Type) -> FnParam {
        FnParam {
            name: self.sym(name),
            type_annotation: ty,
            span: self.span(),
        }
    }

    /// `pub fn name(params) -> ret body`
    pub fn public_fn(&self, name: &str, params: Vec<FnParam>, ret: Option<Type>, body: Expr) -> FnDecl {
        self.function(name, params, ret, body, Visibility::Public)
    }

    /// `fn name(params) -> ret body`
    pub fn private_fn(&self, name: &str, params: Vec<FnParam>, ret: Option<Type>, body: Expr) -> FnDecl {
        self.function(name, params, ret, body, Visibility::Private)
    }

    fn function(
        &self,
        name: &str,
        params: Vec<FnParam>,
        ret: Option<Type>,
        body: Expr,
        visibility: Visibility,
    ) -> FnDecl {
        FnDecl {
            name: self.sym(name),
            is_static: false,
            params,
            return_type: ret,
            body,
            visibility,
            span: self.span(),
        }
    }

    /// `pub class name { fields; methods }`
    pub fn class(&self, name: &str, fields: Vec<(&str, Type)>, methods: Vec<FnDecl>) -> Decl {
        Decl::Class {
            name: self.sym(name),
            fields: fields
                .into_iter()
                .map(|(field, ty)| FieldDecl {
                    name: self.sym(field),
                    type_annotation: ty,
                    span: self.span(),
                })
                .collect(),
            methods,
            visibility: Visibility::Public,
            span: self.span(),
        }
    }

    /// `impl type_name { methods }`
    pub fn impl_block(&self, type_name: &str, methods: Vec<FnDecl>) -> Decl {
        Decl::Impl {
            type_name: self.sym(type_name),
            methods,
            span: self.span(),
        }
    }

    /// `pub const name: ty = value;`
    pub fn constant(&self, name: &str, ty: Type, value: Expr) -> Decl {
        Decl::Const {
            name: self.sym(name),
            type_annotation: ty,
            value,
            visibility: Visibility::Public,
            span: self.span(),
        }
    }

    /// `package package; decls`
    ///
    /// # Panics
    ///
    /// Panics if `package` is not a valid dotted path.
    pub fn unit(&self, package: &str, decls: Vec<Decl>) -> CompilationUnit {
        let package = DotPath::parse(package)
            .unwrap_or_else(|err| panic!("builder given {err}"));
        CompilationUnit::new(package, decls)
    }
}
