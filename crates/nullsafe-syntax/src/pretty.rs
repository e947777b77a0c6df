//! Pretty-printer for the host AST.
//!
//! Renders trees back to host source, which is how rewritten units are
//! inspected in tests and debug logs.

use crate::ast::{CallArg, CompilationUnit, Decl, Expr, FnDecl, Stmt, Type};
use crate::symbol::{StringInterner, Symbol};

/// Configuration for pretty-printing.
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Indentation string (e.g., "  " or "\t")
    pub indent: String,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

/// Pretty-printer borrowing the interner that resolves the tree's symbols.
pub struct PrettyPrinter<'i> {
    interner: &'i StringInterner,
    config: PrettyConfig,
    indent_level: usize,
}

impl<'i> PrettyPrinter<'i> {
    /// Creates a new pretty-printer.
    #[must_use]
    pub fn new(interner: &'i StringInterner) -> Self {
        Self {
            interner,
            config: PrettyConfig::default(),
            indent_level: 0,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PrettyConfig) -> Self {
        self.config = config;
        self
    }

    fn current_indent(&self) -> String {
        self.config.indent.repeat(self.indent_level)
    }

    fn name(&self, sym: Symbol) -> &'i str {
        self.interner.display(sym)
    }

    /// Renders a whole unit: package header, then declarations separated by
    /// blank lines.
    pub fn print_unit(&mut self, unit: &CompilationUnit) -> String {
        let mut out = String::new();
        if !unit.package.is_root() {
            out.push_str(&format!("package {};\n\n", unit.package));
        }
        let decls: Vec<String> = unit.decls.iter().map(|d| self.print_decl(d)).collect();
        out.push_str(&decls.join("\n\n"));
        out.push('\n');
        out
    }

    /// Renders a declaration.
    pub fn print_decl(&mut self, decl: &Decl) -> String {
        match decl {
            Decl::Fn(func) => self.print_fn(func),

            Decl::Class {
                name,
                fields,
                methods,
                visibility,
                ..
            } => {
                let vis = if visibility.is_public() { "pub " } else { "" };
                let mut out = format!("{vis}class {} {{\n", self.name(*name));
                self.indent_level += 1;
                for field in fields {
                    let ty = self.print_type(&field.type_annotation);
                    out.push_str(&format!(
                        "{}{}: {ty};\n",
                        self.current_indent(),
                        self.name(field.name)
                    ));
                }
                for method in methods {
                    let indent = self.current_indent();
                    let text = self.print_fn(method);
                    out.push_str(&format!("{indent}{text}\n"));
                }
                self.indent_level -= 1;
                out.push('}');
                out
            }

            Decl::Impl {
                type_name, methods, ..
            } => {
                let mut out = format!("impl {} {{\n", self.name(*type_name));
                self.indent_level += 1;
                for method in methods {
                    let indent = self.current_indent();
                    let text = self.print_fn(method);
                    out.push_str(&format!("{indent}{text}\n"));
                }
                self.indent_level -= 1;
                out.push('}');
                out
            }

            Decl::Const {
                name,
                type_annotation,
                value,
                visibility,
                ..
            } => {
                let vis = if visibility.is_public() { "pub " } else { "" };
                let ty = self.print_type(type_annotation);
                let value = self.print_expr(value);
                format!("{vis}const {}: {ty} = {value};", self.name(*name))
            }
        }
    }

    fn print_fn(&mut self, func: &FnDecl) -> String {
        let vis = if func.visibility.is_public() { "pub " } else { "" };
        let stat = if func.is_static { "static " } else { "" };
        let params = func
            .params
            .iter()
            .map(|p| format!("{}: {}", self.name(p.name), self.print_type(&p.type_annotation)))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = func
            .return_type
            .as_ref()
            .map(|t| format!(" -> {}", self.print_type(t)))
            .unwrap_or_default();
        let body = self.print_expr(&func.body);
        format!("{vis}{stat}fn {}({params}){ret} {body}", self.name(func.name))
    }

    /// Renders an expression.
    pub fn print_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::IntegerLiteral { value, .. } => value.to_string(),

            Expr::StringLiteral { value, .. } => format!("\"{}\"", self.name(*value)),

            Expr::BoolLiteral { value, .. } => value.to_string(),

            Expr::Nil { .. } => "nil".to_string(),

            Expr::Identifier { name, .. } => self.name(*name).to_string(),

            Expr::Path { segments, .. } => segments
                .iter()
                .map(|sym| self.name(*sym))
                .collect::<Vec<_>>()
                .join("::"),

            Expr::Unary { op, operand, .. } => {
                let operand = self.print_expr(operand);
                format!("{op}{operand}")
            }

            Expr::Binary {
                left, op, right, ..
            } => {
                let left = self.print_expr(left);
                let right = self.print_expr(right);
                format!("{left} {op} {right}")
            }

            Expr::Paren { expr, .. } => {
                let inner = self.print_expr(expr);
                format!("({inner})")
            }

            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.print_expr(condition);
                let then_branch = self.print_expr(then_branch);
                match else_branch {
                    Some(e) => {
                        let e = self.print_expr(e);
                        format!("if {condition} {then_branch} else {e}")
                    }
                    None => format!("if {condition} {then_branch}"),
                }
            }

            Expr::Block { stmts, expr, .. } => {
                if stmts.is_empty() && expr.is_none() {
                    return "{}".to_string();
                }
                if stmts.is_empty() {
                    if let Some(e) = expr {
                        if !matches!(**e, Expr::Block { .. } | Expr::If { .. }) {
                            let inner = self.print_expr(e);
                            return format!("{{ {inner} }}");
                        }
                    }
                }

                self.indent_level += 1;
                let mut result = "{\n".to_string();
                for stmt in stmts {
                    result.push_str(&self.current_indent());
                    result.push_str(&self.print_stmt(stmt));
                    result.push('\n');
                }
                if let Some(e) = expr {
                    result.push_str(&self.current_indent());
                    result.push_str(&self.print_expr(e));
                    result.push('\n');
                }
                self.indent_level -= 1;
                result.push_str(&self.current_indent());
                result.push('}');
                result
            }

            Expr::Call { callee, args, .. } => {
                let callee = self.print_expr(callee);
                let args = self.print_args(args);
                format!("{callee}({args})")
            }

            Expr::MethodCall {
                receiver,
                method,
                args,
                safe,
                ..
            } => {
                let receiver = self.print_expr(receiver);
                let args = self.print_args(args);
                let dot = if *safe { "?." } else { "." };
                format!("{receiver}{dot}{}({args})", self.name(*method))
            }

            Expr::Field {
                object,
                field,
                safe,
                ..
            } => {
                let object = self.print_expr(object);
                let dot = if *safe { "?." } else { "." };
                format!("{object}{dot}{}", self.name(*field))
            }

            Expr::Index {
                collection, index, ..
            } => {
                let collection = self.print_expr(collection);
                let index = self.print_expr(index);
                format!("{collection}[{index}]")
            }

            Expr::Struct { name, fields, .. } => {
                if fields.is_empty() {
                    return format!("{} {{}}", self.name(*name));
                }
                let fields = fields
                    .iter()
                    .map(|f| format!("{}: {}", self.name(f.name), self.print_expr(&f.value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} {{ {fields} }}", self.name(*name))
            }

            Expr::Array { elements, .. } => {
                let elements = elements
                    .iter()
                    .map(|e| self.print_expr(e))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{elements}]")
            }
        }
    }

    fn print_args(&mut self, args: &[CallArg]) -> String {
        args.iter()
            .map(|arg| {
                let value = self.print_expr(&arg.value);
                match arg.label {
                    Some(label) => format!("{}: {value}", self.name(label)),
                    None => value,
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders a statement.
    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Let {
                name,
                mutable,
                type_annotation,
                init,
                ..
            } => {
                let keyword = if *mutable { "let mut" } else { "let" };
                let ty = type_annotation
                    .as_ref()
                    .map(|t| format!(": {}", self.print_type(t)))
                    .unwrap_or_default();
                match init {
                    Some(init) => {
                        let init = self.print_expr(init);
                        format!("{keyword} {}{ty} = {init};", self.name(*name))
                    }
                    None => format!("{keyword} {}{ty};", self.name(*name)),
                }
            }

            Stmt::Return { value, .. } => match value {
                Some(v) => format!("return {};", self.print_expr(v)),
                None => "return;".to_string(),
            },

            Stmt::Assign { target, value, .. } => {
                let target = self.print_expr(target);
                let value = self.print_expr(value);
                format!("{target} = {value};")
            }

            Stmt::While {
                condition, body, ..
            } => {
                let condition = self.print_expr(condition);
                let body = self.print_expr(body);
                format!("while {condition} {body}")
            }

            Stmt::Expr { expr, .. } if matches!(expr, Expr::If { .. } | Expr::Block { .. }) => {
                self.print_expr(expr)
            }

            Stmt::Expr { expr, .. } => format!("{};", self.print_expr(expr)),
        }
    }

    /// Renders a type annotation.
    #[must_use]
    pub fn print_type(&self, ty: &Type) -> String {
        match ty {
            Type::Simple { name, .. } => self.name(*name).to_string(),

            Type::Generic { name, params, .. } => {
                let params = params
                    .iter()
                    .map(|t| self.print_type(t))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}<{params}>", self.name(*name))
            }

            Type::Array { element, .. } => format!("[{}]", self.print_type(element)),

            Type::Function {
                params,
                return_type,
                ..
            } => {
                let params = params
                    .iter()
                    .map(|t| self.print_type(t))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({params}) -> {}", self.print_type(return_type))
            }

            Type::Optional { inner, .. } => format!("{}?", self.print_type(inner)),

            Type::Inferred { .. } => "_".to_string(),
        }
    }
}
