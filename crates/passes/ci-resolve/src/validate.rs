//! Switch structure checks that need no type information

use crate::error::ResolveError;
use ci_span::HasLine as _;
use ci_tree::visitor::{Visitor, walk_program, walk_stmt};
use ci_tree::{ExprId, Program, Stmt, StmtId};

/// Where a `goto default` would jump from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwitchContext {
    /// Inside a case body or its fallthrough slot
    Case {
        /// Whether the switch has a default clause
        has_default: bool,
    },
    /// Inside the default clause itself
    Default,
}

#[derive(Debug, Default)]
struct SwitchValidator {
    /// Innermost switch clause last
    contexts: Vec<SwitchContext>,
    errors: Vec<ResolveError>,
}

impl SwitchValidator {
    fn with_context(&mut self, context: SwitchContext, body: impl FnOnce(&mut Self)) {
        self.contexts.push(context);
        body(self);
        self.contexts.pop();
    }
}

impl Visitor for SwitchValidator {
    fn visit_stmt(&mut self, program: &Program, stmt: StmtId) {
        let Stmt::Switch {
            value,
            cases,
            default_body,
            ..
        } = program.stmt(stmt)
        else {
            walk_stmt(self, program, stmt);
            return;
        };

        self.visit_expr(program, *value);
        let has_default = default_body.is_some();
        for (index, case) in cases.iter().enumerate() {
            for value in &case.values {
                self.visit_expr(program, *value);
            }
            let is_last = index + 1 == cases.len();
            self.with_context(SwitchContext::Case { has_default }, |validator| {
                for stmt in &case.body {
                    validator.visit_stmt(program, *stmt);
                }
                if let Some(fallthrough) = case.fallthrough {
                    let target = program.expr(fallthrough);
                    if is_last && !target.is_goto_default() {
                        validator
                            .errors
                            .push(ResolveError::FallthroughFromLastCase {
                                line: target.line(),
                            });
                    }
                    validator.visit_expr(program, fallthrough);
                }
            });
        }
        if let Some(default_body) = default_body {
            self.with_context(SwitchContext::Default, |validator| {
                for stmt in default_body {
                    validator.visit_stmt(program, *stmt);
                }
            });
        }
    }

    fn visit_goto_default(&mut self, program: &Program, expr: ExprId) {
        let line = program.expr(expr).line();
        match self.contexts.last() {
            Some(SwitchContext::Case { has_default: true }) => {}
            Some(SwitchContext::Case { has_default: false }) => {
                self.errors
                    .push(ResolveError::GotoDefaultWithoutDefault { line });
            }
            Some(SwitchContext::Default) | None => {
                self.errors.push(ResolveError::GotoDefaultOutsideSwitch { line });
            }
        }
    }
}

/// Checks every switch in the program
///
/// A `goto default` must sit in a case body or fallthrough slot of a switch
/// that has a default clause, and only a `goto default` may follow the last
/// case.
pub fn validate_switches(program: &Program) -> Vec<ResolveError> {
    let mut validator = SwitchValidator::default();
    walk_program(&mut validator, program);
    validator.errors
}
