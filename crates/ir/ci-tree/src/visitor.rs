//! Read-only traversal of the tree
//!
//! Implementors override the hooks they care about and call the matching
//! `walk_*` function to keep descending. Every list is visited in declaration
//! order.

use crate::{Case, Expr, ExprId, Program, Reference, Stmt, StmtId, SymbolId, SymbolKind};

/// Visitor over statements, expressions and declarations
pub trait Visitor {
    /// Visit a top-level class or enum, a member, a parameter or a local
    fn visit_symbol(&mut self, program: &Program, symbol: SymbolId) {
        walk_symbol(self, program, symbol);
    }

    /// Visit a statement
    fn visit_stmt(&mut self, program: &Program, stmt: StmtId) {
        walk_stmt(self, program, stmt);
    }

    /// Visit a switch case
    fn visit_case(&mut self, program: &Program, case: &Case) {
        walk_case(self, program, case);
    }

    /// Visit an expression
    fn visit_expr(&mut self, program: &Program, expr: ExprId) {
        walk_expr(self, program, expr);
    }

    /// Visit a name reference
    fn visit_reference(&mut self, _program: &Program, _expr: ExprId, _reference: &Reference) {}

    /// Visit a `goto default`
    fn visit_goto_default(&mut self, _program: &Program, _expr: ExprId) {}
}

/// Visits every class, then every enum
pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, program: &Program) {
    for class in program.classes() {
        visitor.visit_symbol(program, *class);
    }
    for enum_type in program.enums() {
        visitor.visit_symbol(program, *enum_type);
    }
}

/// Descends into the type, initializer, parameters, body or members of a symbol
pub fn walk_symbol<V: Visitor + ?Sized>(visitor: &mut V, program: &Program, symbol: SymbolId) {
    match &program.symbol(symbol).kind {
        SymbolKind::Var(value) => {
            visitor.visit_expr(program, value.ty);
            if let Some(init) = value.value {
                visitor.visit_expr(program, init);
            }
        }
        SymbolKind::Field(member) | SymbolKind::Const(member) => {
            visitor.visit_expr(program, member.value.ty);
            if let Some(init) = member.value.value {
                visitor.visit_expr(program, init);
            }
        }
        SymbolKind::Constructor(base) => {
            if let Some(body) = base.body {
                visitor.visit_stmt(program, body);
            }
        }
        SymbolKind::Method(method) => {
            for param in &method.parameters {
                visitor.visit_symbol(program, *param);
            }
            if let Some(return_type) = method.return_type {
                visitor.visit_expr(program, return_type);
            }
            if let Some(body) = method.base.body {
                visitor.visit_stmt(program, body);
            }
        }
        SymbolKind::Enum(enum_type) => {
            for value in program.members(enum_type.scope) {
                visitor.visit_symbol(program, value);
            }
        }
        SymbolKind::Builtin(_) => {}
        SymbolKind::Class(class) => {
            for member in class.consts.iter().chain(&class.fields) {
                visitor.visit_symbol(program, *member);
            }
            if let Some(constructor) = class.constructor {
                visitor.visit_symbol(program, constructor);
            }
            if let Some(destructor) = &class.destructor {
                for stmt in &destructor.statements {
                    visitor.visit_stmt(program, *stmt);
                }
            }
            for method in &class.methods {
                visitor.visit_symbol(program, *method);
            }
        }
    }
}

/// Descends into the children of a statement
pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, program: &Program, stmt: StmtId) {
    match program.stmt(stmt) {
        Stmt::Block(block) => {
            for child in &block.statements {
                visitor.visit_stmt(program, *child);
            }
        }
        Stmt::If {
            cond,
            on_true,
            on_false,
            ..
        } => {
            visitor.visit_expr(program, *cond);
            visitor.visit_stmt(program, *on_true);
            if let Some(on_false) = on_false {
                visitor.visit_stmt(program, *on_false);
            }
        }
        Stmt::While { cond, body, .. } => {
            visitor.visit_expr(program, *cond);
            visitor.visit_stmt(program, *body);
        }
        Stmt::DoWhile { body, cond, .. } => {
            visitor.visit_stmt(program, *body);
            visitor.visit_expr(program, *cond);
        }
        Stmt::For {
            init,
            cond,
            advance,
            body,
            ..
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(program, *init);
            }
            if let Some(cond) = cond {
                visitor.visit_expr(program, *cond);
            }
            if let Some(advance) = advance {
                visitor.visit_expr(program, *advance);
            }
            visitor.visit_stmt(program, *body);
        }
        Stmt::Break { .. } | Stmt::Continue { .. } => {}
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                visitor.visit_expr(program, *value);
            }
        }
        Stmt::Throw { message, .. } => visitor.visit_expr(program, *message),
        Stmt::Delete { target, .. } => visitor.visit_expr(program, *target),
        Stmt::Switch {
            value,
            cases,
            default_body,
            ..
        } => {
            visitor.visit_expr(program, *value);
            for case in cases {
                visitor.visit_case(program, case);
            }
            for child in default_body.iter().flatten() {
                visitor.visit_stmt(program, *child);
            }
        }
        Stmt::Expr { expr, .. } => visitor.visit_expr(program, *expr),
        Stmt::Var { var, .. } => visitor.visit_symbol(program, *var),
    }
}

/// Descends into the values, body and fallthrough of a case
pub fn walk_case<V: Visitor + ?Sized>(visitor: &mut V, program: &Program, case: &Case) {
    for value in &case.values {
        visitor.visit_expr(program, *value);
    }
    for stmt in &case.body {
        visitor.visit_stmt(program, *stmt);
    }
    if let Some(fallthrough) = case.fallthrough {
        visitor.visit_expr(program, fallthrough);
    }
}

/// Descends into the operands of an expression
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, program: &Program, expr: ExprId) {
    match program.expr(expr) {
        Expr::Literal { .. } => {}
        Expr::SymbolRef { reference, .. } => visitor.visit_reference(program, expr, reference),
        Expr::Unary { operand, .. } => visitor.visit_expr(program, *operand),
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(program, *left);
            visitor.visit_expr(program, *right);
        }
        Expr::Conditional {
            cond,
            on_true,
            on_false,
            ..
        } => {
            visitor.visit_expr(program, *cond);
            visitor.visit_expr(program, *on_true);
            visitor.visit_expr(program, *on_false);
        }
        Expr::Member { object, member, .. } => {
            visitor.visit_expr(program, *object);
            visitor.visit_reference(program, expr, member);
        }
        Expr::Collection { items, .. } => {
            for item in items {
                visitor.visit_expr(program, *item);
            }
        }
        Expr::GotoDefault { .. } => visitor.visit_goto_default(program, expr),
    }
}
