//! Evaluation of loaded compilation units.
//!
//! The interpreter gives host programs plain, unguarded semantics: member
//! access on `nil` is an error, reading past the end of a plain array yields
//! `nil`. Whatever null safety a program has comes from the rewrite, which
//! makes the difference observable in tests.

use crate::env::Env;
use crate::error::{EvalError, Result};
use crate::value::{Object, Value};
use fxhash::FxHashMap;
use nullsafe_runtime::{CallSite, GuardFailure, NullPointerFailure, entry};
use nullsafe_syntax::ast::{BinaryOp, CallArg, CompilationUnit, Decl, Expr, FnDecl, Stmt, UnaryOp};
use nullsafe_syntax::{Span, StringInterner, Symbol};
use std::cell::RefCell;
use std::rc::Rc;

/// A host-callable function implemented in Rust.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value>>;

/// Non-local exits while evaluating a function body.
enum Unwind {
    Return(Value),
    Error(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(err: EvalError) -> Self {
        Unwind::Error(err)
    }
}

type Flow<T> = std::result::Result<T, Unwind>;

fn finish(flow: Flow<Value>) -> Result<Value> {
    match flow {
        Ok(value) | Err(Unwind::Return(value)) => Ok(value),
        Err(Unwind::Error(err)) => Err(err),
    }
}

fn call_site(span: Span) -> CallSite {
    let clamp = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    CallSite::new(clamp(span.line), clamp(span.col))
}

/// Tree-walking evaluator over loaded units.
///
/// ```
/// use nullsafe_interpreter::{Interpreter, Value};
/// use nullsafe_syntax::ast::Decl;
/// use nullsafe_syntax::build::AstBuilder;
///
/// let b = AstBuilder::new();
/// let double = b.public_fn(
///     "double",
///     vec![b.param("n", b.ty("Int"))],
///     Some(b.ty("Int")),
///     b.add(b.ident("n"), b.ident("n")),
/// );
/// let unit = b.unit("app", vec![Decl::Fn(double)]);
/// let interner = b.into_interner();
///
/// let mut interp = Interpreter::new(&interner);
/// interp.load(&unit).unwrap();
/// assert_eq!(interp.call("double", vec![Value::Int(21)]).unwrap(), Value::Int(42));
/// ```
pub struct Interpreter<'i> {
    interner: &'i StringInterner,
    functions: FxHashMap<Symbol, Rc<FnDecl>>,
    methods: FxHashMap<(Symbol, Symbol), Rc<FnDecl>>,
    natives: FxHashMap<String, NativeFn>,
    globals: FxHashMap<Symbol, Value>,
    env: Env,
    call_sites: Vec<Span>,
}

impl<'i> Interpreter<'i> {
    /// Creates an interpreter with nothing loaded.
    #[must_use]
    pub fn new(interner: &'i StringInterner) -> Self {
        Self {
            interner,
            functions: FxHashMap::default(),
            methods: FxHashMap::default(),
            natives: FxHashMap::default(),
            globals: FxHashMap::default(),
            env: Env::new(),
            call_sites: Vec::new(),
        }
    }

    /// Makes the unit's functions, methods and constants available.
    ///
    /// Functions are keyed by their simple name; loading a second function
    /// with the same name replaces the first.
    ///
    /// # Errors
    ///
    /// Returns the error raised while evaluating a constant initializer.
    pub fn load(&mut self, unit: &CompilationUnit) -> Result<()> {
        for decl in &unit.decls {
            match decl {
                Decl::Fn(func) => {
                    self.functions.insert(func.name, Rc::new(func.clone()));
                }
                Decl::Class { name, methods, .. }
                | Decl::Impl {
                    type_name: name,
                    methods,
                    ..
                } => {
                    for method in methods {
                        self.methods.insert((*name, method.name), Rc::new(method.clone()));
                    }
                }
                Decl::Const { name, value, .. } => {
                    let value = self.eval_expr(value)?;
                    self.globals.insert(*name, value);
                }
            }
        }
        Ok(())
    }

    /// Registers a Rust function callable from host code as `name(..)`.
    pub fn register_native(&mut self, name: &str, native: impl Fn(&[Value]) -> Result<Value> + 'static) {
        self.natives.insert(name.to_string(), Rc::new(native));
    }

    /// Calls a loaded function or native by name from outside host code.
    ///
    /// # Errors
    ///
    /// Returns any error the call raises, including guard failures.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        self.call_named(name, args, Span::synthetic())
    }

    /// Evaluates a standalone expression in a fresh environment.
    ///
    /// # Errors
    ///
    /// Returns any error evaluation raises.
    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        let saved = std::mem::take(&mut self.env);
        let result = finish(self.eval(expr));
        self.env = saved;
        result
    }

    fn name(&self, sym: Symbol) -> &'i str {
        self.interner.display(sym)
    }

    fn call_named(&mut self, name: &str, args: Vec<Value>, span: Span) -> Result<Value> {
        let func = self
            .interner
            .get(name)
            .and_then(|sym| self.functions.get(&sym))
            .cloned();
        if let Some(func) = func {
            return self.invoke(&func, None, args, span);
        }
        if let Some(native) = self.natives.get(name).cloned() {
            return native(&args);
        }
        Err(EvalError::UnknownFunction {
            name: name.to_string(),
            span,
        })
    }

    fn invoke(&mut self, func: &FnDecl, receiver: Option<Value>, args: Vec<Value>, span: Span) -> Result<Value> {
        if args.len() != func.params.len() {
            return Err(EvalError::Arity {
                function: self.name(func.name).to_string(),
                expected: func.params.len(),
                found: args.len(),
                span,
            });
        }

        let mut frame = Env::new();
        if let (Some(receiver), Some(this)) = (receiver, self.interner.get("self")) {
            frame.define(this, receiver);
        }
        for (param, arg) in func.params.iter().zip(args) {
            frame.define(param.name, arg);
        }

        let saved = std::mem::replace(&mut self.env, frame);
        self.call_sites.push(span);
        let result = finish(self.eval(&func.body));
        self.call_sites.pop();
        self.env = saved;
        result
    }

    fn eval(&mut self, expr: &Expr) -> Flow<Value> {
        match expr {
            Expr::IntegerLiteral { value, .. } => Ok(Value::Int(*value)),
            Expr::StringLiteral { value, .. } => Ok(Value::str(self.name(*value))),
            Expr::BoolLiteral { value, .. } => Ok(Value::Bool(*value)),
            Expr::Nil { .. } => Ok(Value::Nil),

            Expr::Identifier { name, span } => self
                .env
                .get(*name)
                .or_else(|| self.globals.get(name))
                .cloned()
                .ok_or_else(|| {
                    Unwind::Error(EvalError::Unbound {
                        name: self.name(*name).to_string(),
                        span: *span,
                    })
                }),

            Expr::Path { segments, span } => Err(EvalError::Unbound {
                name: self.join(segments),
                span: *span,
            }
            .into()),

            Expr::Unary { op, operand, span } => {
                let value = self.eval(operand)?;
                match (op, value) {
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Minus, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
                    (op, value) => Err(EvalError::type_error(
                        format!("cannot apply `{op}` to {}", value.type_name()),
                        *span,
                    )
                    .into()),
                }
            }

            Expr::Binary {
                left,
                op,
                right,
                span,
            } => self.binary(left, *op, right, *span),

            Expr::Paren { expr, .. } => self.eval(expr),

            Expr::If {
                condition,
                then_branch,
                else_branch,
                span,
            } => {
                if self.condition(condition, *span)? {
                    self.eval(then_branch)
                } else if let Some(otherwise) = else_branch {
                    self.eval(otherwise)
                } else {
                    Ok(Value::Unit)
                }
            }

            Expr::Block { stmts, expr, .. } => {
                self.env.push();
                let result = self.block(stmts, expr.as_deref());
                self.env.pop();
                result
            }

            Expr::Call { callee, args, span } => {
                let args = self.args(args)?;
                Ok(self.call_expr(callee, args, *span)?)
            }

            Expr::MethodCall {
                receiver,
                method,
                args,
                span,
                ..
            } => {
                let receiver = self.eval(receiver)?;
                let args = self.args(args)?;
                Ok(self.call_method(receiver, *method, args, *span)?)
            }

            Expr::Field { object, field, span, .. } => {
                let object = self.eval(object)?;
                Ok(self.field(&object, *field, *span)?)
            }

            Expr::Index {
                collection,
                index,
                span,
            } => {
                let collection = self.eval(collection)?;
                let index = self.eval(index)?;
                Ok(self.index(&collection, &index, *span)?)
            }

            Expr::Struct { name, fields, .. } => {
                let mut values = FxHashMap::default();
                for init in fields {
                    values.insert(init.name, self.eval(&init.value)?);
                }
                Ok(Value::Object(Rc::new(Object {
                    class: *name,
                    fields: RefCell::new(values),
                })))
            }

            Expr::Array { elements, .. } => {
                let items = elements
                    .iter()
                    .map(|element| self.eval(element))
                    .collect::<Flow<Vec<_>>>()?;
                Ok(Value::array(items))
            }
        }
    }

    fn block(&mut self, stmts: &[Stmt], tail: Option<&Expr>) -> Flow<Value> {
        for stmt in stmts {
            self.exec(stmt)?;
        }
        match tail {
            Some(tail) => self.eval(tail),
            None => Ok(Value::Unit),
        }
    }

    fn exec(&mut self, stmt: &Stmt) -> Flow<()> {
        match stmt {
            Stmt::Let { name, init, .. } => {
                let value = match init {
                    Some(init) => self.eval(init)?,
                    None => Value::Nil,
                };
                self.env.define(*name, value);
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.eval(value)?,
                    None => Value::Unit,
                };
                return Err(Unwind::Return(value));
            }

            Stmt::Assign { target, value, span } => {
                let value = self.eval(value)?;
                self.assign(target, value, *span)?;
            }

            Stmt::While { condition, body, span } => {
                while self.condition(condition, *span)? {
                    self.eval(body)?;
                }
            }

            Stmt::Expr { expr, .. } => {
                self.eval(expr)?;
            }
        }
        Ok(())
    }

    fn condition(&mut self, condition: &Expr, span: Span) -> Flow<bool> {
        match self.eval(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::type_error(
                format!("condition must be Bool, found {}", other.type_name()),
                span,
            )
            .into()),
        }
    }

    fn args(&mut self, args: &[CallArg]) -> Flow<Vec<Value>> {
        args.iter().map(|arg| self.eval(&arg.value)).collect()
    }

    fn join(&self, segments: &[Symbol]) -> String {
        segments
            .iter()
            .map(|sym| self.name(*sym))
            .collect::<Vec<_>>()
            .join("::")
    }

    fn binary(&mut self, left: &Expr, op: BinaryOp, right: &Expr, span: Span) -> Flow<Value> {
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let lhs = self.condition(left, span)?;
            if lhs == matches!(op, BinaryOp::Or) {
                return Ok(Value::Bool(lhs));
            }
            return Ok(Value::Bool(self.condition(right, span)?));
        }

        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;
        let value = match (op, &lhs, &rhs) {
            (BinaryOp::Eq, _, _) => Value::Bool(lhs.host_eq(&rhs)),
            (BinaryOp::Neq, _, _) => Value::Bool(!lhs.host_eq(&rhs)),
            (BinaryOp::Add, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(*b)),
            (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Value::str(&format!("{a}{b}")),
            (BinaryOp::Sub, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(*b)),
            (BinaryOp::Mul, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_mul(*b)),
            (BinaryOp::Lt, Value::Int(a), Value::Int(b)) => Value::Bool(a < b),
            (BinaryOp::Gt, Value::Int(a), Value::Int(b)) => Value::Bool(a > b),
            _ => {
                return Err(EvalError::type_error(
                    format!(
                        "cannot apply `{op}` to {} and {}",
                        lhs.type_name(),
                        rhs.type_name()
                    ),
                    span,
                )
                .into());
            }
        };
        Ok(value)
    }

    fn call_expr(&mut self, callee: &Expr, args: Vec<Value>, span: Span) -> Result<Value> {
        match callee {
            Expr::Identifier { name, .. } => self.call_named(self.name(*name), args, span),

            Expr::Path { segments, .. } => {
                let interner = self.interner;
                let names: Vec<&str> = segments.iter().map(|sym| interner.display(*sym)).collect();
                match names.as_slice() {
                    [module, rest @ ..] if *module == entry::MODULE => self.builtin(rest, args, span),
                    [owner, method] => {
                        let func = interner
                            .get(owner)
                            .zip(interner.get(method))
                            .and_then(|key| self.methods.get(&key))
                            .cloned();
                        match func {
                            Some(func) => self.invoke(&func, None, args, span),
                            None => self.call_named(&names.join("::"), args, span),
                        }
                    }
                    _ => self.call_named(&names.join("::"), args, span),
                }
            }

            other => Err(EvalError::type_error(
                format!("cannot call {other:?}"),
                span,
            )),
        }
    }

    /// Entry points the rewrite emits calls to.
    fn builtin(&self, name: &[&str], mut args: Vec<Value>, span: Span) -> Result<Value> {
        let arity = |expected: usize, args: &[Value]| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(EvalError::Arity {
                    function: format!("{}::{}", entry::MODULE, name.join("::")),
                    expected,
                    found: args.len(),
                    span,
                })
            }
        };

        match name {
            [function] if *function == entry::GUARD_FAILURE => {
                arity(2, &args)?;
                let mut failure = GuardFailure::new(args[0].to_string(), args[1].to_string());
                if let Some(site) = self.call_sites.last().filter(|site| !site.is_synthetic()) {
                    failure = failure.at(call_site(*site));
                }
                Err(failure.into())
            }

            [ty, constructor] if *ty == entry::SAFE_ARRAY && *constructor == entry::SAFE_ARRAY_FROM => {
                arity(1, &args)?;
                match args.remove(0) {
                    Value::Array(items) => Ok(Value::safe_array(items.borrow().clone())),
                    safe @ Value::SafeArray(_) => Ok(safe),
                    other => Err(EvalError::type_error(
                        format!("SafeArray::from expects an array, found {}", other.type_name()),
                        span,
                    )),
                }
            }

            [function] if *function == entry::OR => {
                arity(2, &args)?;
                let default = args.remove(1);
                let value = args.remove(0);
                Ok(nullsafe_runtime::or(value.into_option(), default))
            }

            [function] if *function == entry::SURE => {
                arity(1, &args)?;
                let value = args.remove(0);
                Ok(value
                    .into_option()
                    .ok_or_else(|| NullPointerFailure::new(call_site(span)))?)
            }

            _ => Err(EvalError::UnknownFunction {
                name: format!("{}::{}", entry::MODULE, name.join("::")),
                span,
            }),
        }
    }

    fn call_method(&mut self, receiver: Value, method: Symbol, args: Vec<Value>, span: Span) -> Result<Value> {
        let member = self.name(method);
        let unknown = |ty: &str| EvalError::UnknownMember {
            ty: ty.to_string(),
            member: member.to_string(),
            span,
        };

        match &receiver {
            Value::Nil | Value::Optional(None) => Err(EvalError::NullReference {
                member: member.to_string(),
                span,
            }),

            Value::Optional(Some(inner)) => {
                let inner = (**inner).clone();
                self.call_method(inner, method, args, span)
            }

            Value::Object(object) => {
                let class = object.class;
                match self.methods.get(&(class, method)).cloned() {
                    Some(func) => self.invoke(&func, Some(receiver.clone()), args, span),
                    None => Err(unknown(self.name(class))),
                }
            }

            Value::Array(items) => match (member, args.as_slice()) {
                ("length", []) => Ok(Value::Int(len_value(items.borrow().len()))),
                ("get", [Value::Int(i)]) => Ok(usize::try_from(*i)
                    .ok()
                    .and_then(|i| items.borrow().get(i).cloned())
                    .unwrap_or(Value::Nil)),
                ("push", [value]) => {
                    items.borrow_mut().push(value.clone());
                    Ok(Value::Unit)
                }
                _ => Err(unknown("Array")),
            },

            Value::SafeArray(items) => match (member, args.as_slice()) {
                ("length", []) => Ok(Value::Int(len_value(items.borrow().len()))),
                ("get", [Value::Int(i)]) => Ok(Value::Optional(
                    items.borrow().get(*i).cloned().map(Box::new),
                )),
                ("push", [value]) => {
                    items.borrow_mut().push(value.clone());
                    Ok(Value::Unit)
                }
                _ => Err(unknown("SafeArray")),
            },

            Value::Str(s) => match (member, args.as_slice()) {
                ("length", []) => Ok(Value::Int(len_value(s.len()))),
                _ => Err(unknown("String")),
            },

            other => Err(unknown(other.type_name())),
        }
    }

    fn field(&self, object: &Value, field: Symbol, span: Span) -> Result<Value> {
        let member = self.name(field);
        match object {
            Value::Nil | Value::Optional(None) => Err(EvalError::NullReference {
                member: member.to_string(),
                span,
            }),
            Value::Optional(Some(inner)) => self.field(inner, field, span),
            Value::Object(instance) => instance
                .fields
                .borrow()
                .get(&field)
                .cloned()
                .ok_or_else(|| EvalError::UnknownMember {
                    ty: self.name(instance.class).to_string(),
                    member: member.to_string(),
                    span,
                }),
            other => Err(EvalError::UnknownMember {
                ty: other.type_name().to_string(),
                member: member.to_string(),
                span,
            }),
        }
    }

    fn index(&self, collection: &Value, index: &Value, span: Span) -> Result<Value> {
        let Value::Int(i) = index else {
            return Err(EvalError::type_error(
                format!("index must be Int, found {}", index.type_name()),
                span,
            ));
        };

        match collection {
            Value::Nil | Value::Optional(None) => Err(EvalError::NullReference {
                member: "[]".to_string(),
                span,
            }),
            Value::Optional(Some(inner)) => self.index(inner, index, span),
            // Plain arrays cannot tell a missing element from a stored nil.
            Value::Array(items) => Ok(usize::try_from(*i)
                .ok()
                .and_then(|i| items.borrow().get(i).cloned())
                .unwrap_or(Value::Nil)),
            Value::SafeArray(items) => Ok(Value::Optional(items.borrow().get(*i).cloned().map(Box::new))),
            other => Err(EvalError::type_error(
                format!("cannot index {}", other.type_name()),
                span,
            )),
        }
    }

    fn assign(&mut self, target: &Expr, value: Value, span: Span) -> Flow<()> {
        match target {
            Expr::Identifier { name, .. } => {
                if self.env.assign(*name, value) {
                    return Ok(());
                }
                Err(EvalError::Unbound {
                    name: self.name(*name).to_string(),
                    span,
                }
                .into())
            }

            Expr::Field { object, field, .. } => match self.eval(object)? {
                Value::Object(instance) => {
                    instance.fields.borrow_mut().insert(*field, value);
                    Ok(())
                }
                other if other.is_nil() => Err(EvalError::NullReference {
                    member: self.name(*field).to_string(),
                    span,
                }
                .into()),
                other => Err(EvalError::type_error(
                    format!("cannot assign a field on {}", other.type_name()),
                    span,
                )
                .into()),
            },

            Expr::Index { collection, index, .. } => {
                let collection = self.eval(collection)?;
                let Value::Int(i) = self.eval(index)? else {
                    return Err(EvalError::type_error("index must be Int", span).into());
                };
                let stored = match &collection {
                    Value::Array(items) => {
                        let mut items = items.borrow_mut();
                        match usize::try_from(i).ok().filter(|&i| i < items.len()) {
                            Some(i) => {
                                items[i] = value;
                                true
                            }
                            None => false,
                        }
                    }
                    Value::SafeArray(items) => items.borrow_mut().set(i, value),
                    other => {
                        return Err(EvalError::type_error(
                            format!("cannot index {}", other.type_name()),
                            span,
                        )
                        .into());
                    }
                };
                if stored {
                    Ok(())
                } else {
                    Err(EvalError::type_error(format!("index {i} out of bounds"), span).into())
                }
            }

            _ => Err(EvalError::type_error("invalid assignment target", span).into()),
        }
    }
}

fn len_value(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
