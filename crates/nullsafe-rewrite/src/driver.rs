//! Per-unit rewrite driver.
//!
//! For every declaration in a unit the driver resolves the features in
//! effect once, walks the body bottom-up applying navigation expansion and
//! array wrapping, and finally injects parameter guards. Guards are added
//! after the walk, so the walk never sees them.

use crate::error::RewriteError;
use crate::guard;
use crate::navigation::{self, TempNames};
use crate::scope::{ActivationSet, DeclScope, FeatureSet};
use crate::sequence;
use crate::validate::validate_activations;
use nullsafe_log::{debug, error, info, trace, warn};
use nullsafe_syntax::ast::{CompilationUnit, Decl, Expr, FnDecl, Stmt};
use nullsafe_syntax::{DotPath, Spanned, StringInterner};
use std::fmt;

/// Counts of rewrites performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteStats {
    /// `?.` markers expanded
    pub navigations: usize,
    /// Parameter guards inserted
    pub guards: usize,
    /// Functions that received at least one guard
    pub guarded_functions: usize,
    /// Array literals wrapped
    pub sequences: usize,
}

impl RewriteStats {
    /// Adds `other` into `self`.
    pub fn merge(&mut self, other: RewriteStats) {
        self.navigations += other.navigations;
        self.guards += other.guards;
        self.guarded_functions += other.guarded_functions;
        self.sequences += other.sequences;
    }

    /// Total number of rewrites.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.navigations + self.guards + self.sequences
    }

    /// Returns `true` if nothing was rewritten.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for RewriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} navigations, {} guards in {} functions, {} arrays",
            self.navigations, self.guards, self.guarded_functions, self.sequences
        )
    }
}

/// A unit that failed to rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    /// Position of the unit in the input
    pub index: usize,
    /// Its package
    pub package: DotPath,
    /// Every error found in it
    pub errors: Vec<RewriteError>,
}

/// Outcome of rewriting a whole build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Rewrites across all successful units
    pub stats: RewriteStats,
    /// Units that failed; these are left partially rewritten and must not
    /// be compiled
    pub failures: Vec<UnitFailure>,
    /// Configuration problems; reported but never fatal
    pub configuration: Vec<RewriteError>,
}

impl BuildReport {
    /// Returns `true` if every unit rewrote cleanly.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies the enabled rewrites to compilation units.
///
/// ```
/// use nullsafe_rewrite::{ActivationSet, Driver};
/// use nullsafe_syntax::build::AstBuilder;
/// use nullsafe_syntax::ast::Decl;
///
/// let b = AstBuilder::new();
/// let body = b.safe_field(b.ident("a"), "b");
/// let func = b.public_fn("f", vec![b.param("a", b.optional(b.ty("Job")))], None, body);
/// let mut unit = b.unit("app", vec![Decl::Fn(func)]);
/// let mut interner = b.into_interner();
///
/// let set = ActivationSet::builder().directive("navigation=app").unwrap().build().unwrap();
/// let stats = Driver::new(&set).rewrite_unit(&mut unit, &mut interner).unwrap();
/// assert_eq!(stats.navigations, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Driver<'a> {
    activations: &'a ActivationSet,
}

impl<'a> Driver<'a> {
    /// Creates a driver reading `activations`.
    #[must_use]
    pub const fn new(activations: &'a ActivationSet) -> Self {
        Self { activations }
    }

    /// A driver over the process-wide set, once one is
    /// [installed](crate::scope::install).
    #[must_use]
    pub fn installed() -> Option<Driver<'static>> {
        crate::scope::installed().map(Driver::new)
    }

    /// The activations this driver consults.
    #[must_use]
    pub const fn activations(&self) -> &'a ActivationSet {
        self.activations
    }

    /// Rewrites one unit in place.
    ///
    /// # Errors
    ///
    /// Returns every [`RewriteError::NavigationDisabled`] found in the unit.
    /// The unit must then be treated as failed; rewrites already applied
    /// to other declarations are not undone.
    pub fn rewrite_unit(
        &self,
        unit: &mut CompilationUnit,
        interner: &mut StringInterner,
    ) -> Result<RewriteStats, Vec<RewriteError>> {
        let CompilationUnit { package, decls } = unit;
        let mut cx = UnitContext {
            interner,
            temps: TempNames::new(),
            stats: RewriteStats::default(),
            errors: Vec::new(),
        };

        for decl in decls.iter_mut() {
            match decl {
                Decl::Fn(func) => {
                    let scope = DeclScope::item(package, cx.interner.display(func.name));
                    self.rewrite_fn(func, &scope, true, &mut cx);
                }
                Decl::Class {
                    name,
                    methods,
                    visibility,
                    ..
                } => {
                    let owner = cx.interner.display(*name).to_string();
                    for method in methods {
                        let scope = DeclScope::method(package, &owner, cx.interner.display(method.name));
                        self.rewrite_fn(method, &scope, visibility.is_public(), &mut cx);
                    }
                }
                Decl::Impl {
                    type_name, methods, ..
                } => {
                    let owner = cx.interner.display(*type_name).to_string();
                    for method in methods {
                        let scope = DeclScope::method(package, &owner, cx.interner.display(method.name));
                        self.rewrite_fn(method, &scope, true, &mut cx);
                    }
                }
                Decl::Const { name, value, .. } => {
                    let scope = DeclScope::item(package, cx.interner.display(*name));
                    let features = self.activations.features_for(&scope);
                    Walker {
                        cx: &mut cx,
                        scope: &scope,
                        features,
                    }
                    .expr(value);
                }
            }
        }

        if cx.errors.is_empty() {
            debug!("rewrote unit `{}`: {}", package, cx.stats);
            Ok(cx.stats)
        } else {
            for err in &cx.errors {
                error!("{}", err);
            }
            Err(cx.errors)
        }
    }

    /// Rewrites `func`, declared at `scope`. Guards go only into public
    /// functions whose owner (if any) is public too.
    fn rewrite_fn(&self, func: &mut FnDecl, scope: &DeclScope, owner_public: bool, cx: &mut UnitContext<'_>) {
        let features = self.activations.features_for(scope);
        if features.is_empty() {
            trace!("`{}`: no features active", scope.path());
        }

        Walker {
            cx: &mut *cx,
            scope,
            features,
        }
        .expr(&mut func.body);

        if features.api_guard && owner_public && func.visibility.is_public() {
            let inserted = guard::inject(func, scope.path(), cx.interner);
            if inserted > 0 {
                trace!("`{}`: {} parameter guards", scope.path(), inserted);
                cx.stats.guards += inserted;
                cx.stats.guarded_functions += 1;
            }
        }
    }

    /// Rewrites every unit and validates the activations against what the
    /// units declare.
    ///
    /// A failing unit does not stop the others from being rewritten.
    pub fn rewrite_all(&self, units: &mut [CompilationUnit], interner: &mut StringInterner) -> BuildReport {
        let mut report = BuildReport::default();

        for (index, unit) in units.iter_mut().enumerate() {
            match self.rewrite_unit(unit, interner) {
                Ok(stats) => report.stats.merge(stats),
                Err(errors) => report.failures.push(UnitFailure {
                    index,
                    package: unit.package.clone(),
                    errors,
                }),
            }
        }

        report.configuration = validate_activations(self.activations, units, interner);
        for problem in &report.configuration {
            warn!("{}", problem);
        }

        info!(
            "rewrote {} units ({} failed): {}",
            units.len(),
            report.failures.len(),
            report.stats
        );
        report
    }
}

struct UnitContext<'i> {
    interner: &'i mut StringInterner,
    temps: TempNames,
    stats: RewriteStats,
    errors: Vec<RewriteError>,
}

/// Bottom-up walk over one declaration body.
struct Walker<'c, 'i> {
    cx: &'c mut UnitContext<'i>,
    scope: &'c DeclScope,
    features: FeatureSet,
}

impl Walker<'_, '_> {
    fn expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::IntegerLiteral { .. }
            | Expr::StringLiteral { .. }
            | Expr::BoolLiteral { .. }
            | Expr::Nil { .. }
            | Expr::Identifier { .. }
            | Expr::Path { .. } => {}

            Expr::Unary { operand, .. } => self.expr(operand),

            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }

            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.expr(condition);
                self.expr(then_branch);
                if let Some(otherwise) = else_branch {
                    self.expr(otherwise);
                }
            }

            Expr::Block { stmts, expr: tail, .. } => {
                for stmt in stmts {
                    self.stmt(stmt);
                }
                if let Some(tail) = tail {
                    self.expr(tail);
                }
            }

            Expr::Call { callee, args, .. } => {
                self.expr(callee);
                for arg in args {
                    self.expr(&mut arg.value);
                }
            }

            Expr::MethodCall { receiver, args, .. } => {
                self.expr(receiver);
                for arg in args {
                    self.expr(&mut arg.value);
                }
            }

            Expr::Field { object, .. } => self.expr(object),

            Expr::Index { collection, index, .. } => {
                self.expr(collection);
                self.expr(index);
            }

            Expr::Struct { fields, .. } => {
                for field in fields {
                    self.expr(&mut field.value);
                }
            }

            Expr::Array { elements, .. } => {
                for element in elements {
                    self.expr(element);
                }
            }

            Expr::Paren { expr: inner, .. } => self.expr(inner),
        }

        self.rewrite_node(expr);
    }

    fn stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Let { init, .. } => {
                if let Some(init) = init {
                    self.expr(init);
                }
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            Stmt::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            Stmt::While { condition, body, .. } => {
                self.expr(condition);
                self.expr(body);
            }
            Stmt::Expr { expr, .. } => self.expr(expr),
        }
    }

    /// Rewrites `expr` itself; its children are already done.
    fn rewrite_node(&mut self, expr: &mut Expr) {
        if expr.is_safe_access() {
            if self.features.navigation {
                let temp = self.cx.temps.fresh(self.cx.interner);
                navigation::expand(expr, temp);
                trace!("`{}`: expanded safe access at {}", self.scope.path(), expr.span());
                self.cx.stats.navigations += 1;
            } else {
                self.cx.errors.push(RewriteError::NavigationDisabled {
                    declaration: self.scope.path().clone(),
                    span: expr.span(),
                });
            }
        } else if self.features.sequence_wrap && sequence::wrap(expr, self.cx.interner) {
            trace!("`{}`: wrapped array literal at {}", self.scope.path(), expr.span());
            self.cx.stats.sequences += 1;
        }
    }
}
