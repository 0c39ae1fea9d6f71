//! Debug dump of the tree
//!
//! Renders a program as an indented outline, one node per line with its
//! source line appended as `@N`. References print as `name?` while unresolved
//! and `name@N` once bound, `N` being the line of the declaration they bind
//! to. This is a diagnostic aid, not target code.

use crate::{
    BinaryOp, Case, ClassType, EnumType, Expr, ExprId, Fixity, Line, LiteralValue, Method,
    MethodBase, Program, Reference, Stmt, StmtId, SymbolId, SymbolKind,
};

const INDENT: &str = "  ";

/// Renders every class, then every enum, in declaration order
pub fn dump_program(program: &Program) -> String {
    let mut printer = Printer::new(program);
    for class in program.classes() {
        printer.symbol(*class);
    }
    for enum_type in program.enums() {
        printer.symbol(*enum_type);
    }
    printer.out
}

/// Renders a single statement subtree
pub fn dump_stmt(program: &Program, stmt: StmtId) -> String {
    let mut printer = Printer::new(program);
    printer.stmt(stmt);
    printer.out
}

/// Renders an expression on one line
pub fn format_expr(program: &Program, expr: ExprId) -> String {
    Printer::new(program).expr(expr)
}

struct Printer<'prog> {
    program: &'prog Program,
    out: String,
    depth: usize,
}

impl<'prog> Printer<'prog> {
    fn new(program: &'prog Program) -> Self {
        Self {
            program,
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str, line: Line) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push_str(&format!(" @{}\n", line.get()));
    }

    fn label(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn symbol(&mut self, id: SymbolId) {
        let program = self.program;
        let symbol = program.symbol(id);
        let name = program.name(symbol.name);
        match &symbol.kind {
            SymbolKind::Var(value) => {
                let text = format!("var {name}: {}", self.named_value(value.ty, value.value));
                self.line(&text, symbol.line);
            }
            SymbolKind::Field(member) | SymbolKind::Const(member) => {
                let text = format!(
                    "{} {name}: {} ({})",
                    symbol.kind_name(),
                    self.named_value(member.value.ty, member.value.value),
                    member.visibility,
                );
                self.line(&text, symbol.line);
            }
            SymbolKind::Constructor(base) => {
                let text = format!("constructor ({})", base.visibility);
                self.line(&text, symbol.line);
                self.body(base);
            }
            SymbolKind::Method(method) => self.method(name, method, symbol.line),
            SymbolKind::Enum(enum_type) => self.enum_type(name, enum_type, symbol.line),
            SymbolKind::Class(class) => self.class(name, class, symbol.line),
            SymbolKind::Builtin(_) => self.line(&format!("builtin {name}"), symbol.line),
        }
    }

    fn named_value(&self, ty: ExprId, value: Option<ExprId>) -> String {
        let mut text = self.expr(ty);
        if let Some(value) = value {
            text.push_str(" = ");
            text.push_str(&self.expr(value));
        }
        text
    }

    fn method(&mut self, name: &str, method: &Method, line: Line) {
        let program = self.program;
        let params = method
            .parameters
            .iter()
            .map(|param| {
                let symbol = program.symbol(*param);
                let param_name = program.name(symbol.name);
                match &symbol.kind {
                    SymbolKind::Var(value) => {
                        format!("{param_name}: {}", self.named_value(value.ty, value.value))
                    }
                    _ => param_name.to_owned(),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let return_type = method
            .return_type
            .map_or_else(|| "void".to_owned(), |ty| self.expr(ty));
        let mut flags = vec![
            method.base.visibility.to_string(),
            method.call_type.to_string(),
        ];
        if method.is_mutator {
            flags.push("mutator".to_owned());
        }
        let text = format!("method {name}({params}): {return_type} ({})", flags.join(", "));
        self.line(&text, line);
        self.body(&method.base);
    }

    fn body(&mut self, base: &MethodBase) {
        if let Some(body) = base.body {
            self.nested(|printer| printer.stmt(body));
        }
    }

    fn class(&mut self, name: &str, class: &ClassType, line: Line) {
        let mut text = format!("class {name}");
        if let Some(base) = &class.base_class {
            text.push_str(" : ");
            text.push_str(&self.reference(&base.reference));
        }
        text.push_str(&format!(
            " ({}{}, {:?})",
            class.call_type,
            if class.container.is_public { ", public" } else { "" },
            class.container.source_file,
        ));
        self.line(&text, line);
        self.nested(|printer| {
            for member in class.consts.iter().chain(&class.fields) {
                printer.symbol(*member);
            }
            if let Some(constructor) = class.constructor {
                printer.symbol(constructor);
            }
            if let Some(destructor) = &class.destructor {
                printer.line("destructor", destructor.line);
                printer.nested(|printer| {
                    for stmt in &destructor.statements {
                        printer.stmt(*stmt);
                    }
                });
            }
            for method in &class.methods {
                printer.symbol(*method);
            }
        });
    }

    fn enum_type(&mut self, name: &str, enum_type: &EnumType, line: Line) {
        let text = format!(
            "enum {name} ({}{}, {:?})",
            if enum_type.is_flags { "flags" } else { "plain" },
            if enum_type.container.is_public { ", public" } else { "" },
            enum_type.container.source_file,
        );
        self.line(&text, line);
        let program = self.program;
        self.nested(|printer| {
            for value in program.members(enum_type.scope) {
                let symbol = program.symbol(value);
                let mut text = format!("value {}", program.name(symbol.name));
                if let Some(init) = symbol.as_named_value().and_then(|named| named.value) {
                    text.push_str(" = ");
                    text.push_str(&printer.expr(init));
                }
                printer.line(&text, symbol.line);
            }
        });
    }

    fn stmt(&mut self, id: StmtId) {
        let program = self.program;
        match program.stmt(id) {
            Stmt::Block(block) => {
                self.line("block", block.line);
                self.nested(|printer| {
                    for child in &block.statements {
                        printer.stmt(*child);
                    }
                });
            }
            Stmt::If {
                cond,
                on_true,
                on_false,
                line,
            } => {
                let text = format!("if {}", self.expr(*cond));
                self.line(&text, *line);
                self.nested(|printer| printer.stmt(*on_true));
                if let Some(on_false) = on_false {
                    self.label("else");
                    self.nested(|printer| printer.stmt(*on_false));
                }
            }
            Stmt::While { cond, body, line } => {
                let text = format!("while {}", self.expr(*cond));
                self.line(&text, *line);
                self.nested(|printer| printer.stmt(*body));
            }
            Stmt::DoWhile { body, cond, line } => {
                self.line("do", *line);
                self.nested(|printer| printer.stmt(*body));
                let text = format!("while {}", self.expr(*cond));
                self.label(&text);
            }
            Stmt::For {
                init,
                cond,
                advance,
                body,
                line,
            } => {
                let init = init.map(|init| self.inline_stmt(init)).unwrap_or_default();
                let cond = cond.map(|cond| self.expr(cond)).unwrap_or_default();
                let advance = advance.map(|adv| self.expr(adv)).unwrap_or_default();
                let text = format!("for ({init}; {cond}; {advance})");
                self.line(&text, *line);
                self.nested(|printer| printer.stmt(*body));
            }
            Stmt::Break { line } => self.line("break", *line),
            Stmt::Continue { line } => self.line("continue", *line),
            Stmt::Return { value, line } => {
                let text = value.map_or_else(
                    || "return".to_owned(),
                    |value| format!("return {}", self.expr(value)),
                );
                self.line(&text, *line);
            }
            Stmt::Throw { message, line } => {
                let text = format!("throw {}", self.expr(*message));
                self.line(&text, *line);
            }
            Stmt::Delete { target, line } => {
                let text = format!("delete {}", self.expr(*target));
                self.line(&text, *line);
            }
            Stmt::Switch {
                value,
                cases,
                default_body,
                line,
            } => {
                let text = format!("switch {}", self.expr(*value));
                self.line(&text, *line);
                self.nested(|printer| {
                    for case in cases {
                        printer.case(case);
                    }
                    if let Some(default_body) = default_body {
                        printer.label("default");
                        printer.nested(|printer| {
                            for stmt in default_body {
                                printer.stmt(*stmt);
                            }
                        });
                    }
                });
            }
            Stmt::Expr { expr, line } => {
                let text = self.expr(*expr);
                self.line(&text, *line);
            }
            Stmt::Var { var, .. } => self.symbol(*var),
        }
    }

    fn case(&mut self, case: &Case) {
        let values = case
            .values
            .iter()
            .map(|value| self.expr(*value))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(&format!("case {values}"), case.line);
        self.nested(|printer| {
            for stmt in &case.body {
                printer.stmt(*stmt);
            }
            if let Some(fallthrough) = case.fallthrough {
                let text = format!("fallthrough {}", printer.expr(fallthrough));
                printer.label(&text);
            }
        });
    }

    fn inline_stmt(&self, id: StmtId) -> String {
        match self.program.stmt(id) {
            Stmt::Expr { expr, .. } => self.expr(*expr),
            Stmt::Var { var, .. } => {
                let symbol = self.program.symbol(*var);
                let name = self.program.name(symbol.name);
                symbol.as_named_value().map_or_else(
                    || name.to_owned(),
                    |value| format!("var {name}: {}", self.named_value(value.ty, value.value)),
                )
            }
            _ => "...".to_owned(),
        }
    }

    fn expr(&self, id: ExprId) -> String {
        match self.program.expr(id) {
            Expr::Literal { value, .. } => literal(value),
            Expr::SymbolRef { reference, .. } => self.reference(reference),
            Expr::Unary {
                op,
                fixity,
                operand,
                ..
            } => match fixity {
                Fixity::Prefix => format!("({}{})", op.symbol(), self.expr(*operand)),
                Fixity::Postfix => format!("({}{})", self.expr(*operand), op.symbol()),
            },
            Expr::Binary {
                op: BinaryOp::Index,
                left,
                right,
                ..
            } => format!("{}[{}]", self.expr(*left), self.expr(*right)),
            Expr::Binary {
                op, left, right, ..
            } => format!(
                "({} {} {})",
                self.expr(*left),
                op.symbol(),
                self.expr(*right)
            ),
            Expr::Conditional {
                cond,
                on_true,
                on_false,
                ..
            } => format!(
                "({} ? {} : {})",
                self.expr(*cond),
                self.expr(*on_true),
                self.expr(*on_false)
            ),
            Expr::Member { object, member, .. } => {
                format!("{}.{}", self.expr(*object), self.reference(member))
            }
            Expr::Collection { items, .. } => {
                let items = items
                    .iter()
                    .map(|item| self.expr(*item))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{items}]")
            }
            Expr::GotoDefault { .. } => "goto default".to_owned(),
        }
    }

    fn reference(&self, reference: &Reference) -> String {
        let name = self.program.name(reference.name());
        match reference.target() {
            Some(target) => format!("{name}@{}", self.program.symbol(target).line.get()),
            None => format!("{name}?"),
        }
    }
}

fn literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Null => "null".to_owned(),
        LiteralValue::Bool(value) => value.to_string(),
        LiteralValue::Int(value) => value.to_string(),
        LiteralValue::Float(value) => format!("{value:?}"),
        LiteralValue::String(value) => format!("{value:?}"),
        LiteralValue::Char(value) => format!("{value:?}"),
    }
}
