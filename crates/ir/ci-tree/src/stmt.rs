//! Statements

use crate::{ExprId, StmtId, SymbolId};
use ci_span::{HasLine, Line};

/// Ordered sequence of statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Statements in source order
    pub statements: Vec<StmtId>,
    /// Source line
    pub line: Line,
}

/// One `case` clause of a switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// Values matched by this clause
    pub values: Vec<ExprId>,
    /// Clause body
    pub body: Vec<StmtId>,
    /// Explicit transfer out of the body into the next case, or a
    /// [`GotoDefault`](crate::Expr::GotoDefault). `None` means the body
    /// does not fall through.
    pub fallthrough: Option<ExprId>,
    /// Source line
    pub line: Line,
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `{ ... }`
    Block(Block),
    /// `if (cond) on_true else on_false`
    If {
        /// Condition
        cond: ExprId,
        /// Taken branch
        on_true: StmtId,
        /// Else branch
        on_false: Option<StmtId>,
        /// Source line
        line: Line,
    },
    /// `while (cond) body`
    While {
        /// Condition
        cond: ExprId,
        /// Loop body
        body: StmtId,
        /// Source line
        line: Line,
    },
    /// `do body while (cond);`
    DoWhile {
        /// Loop body
        body: StmtId,
        /// Condition
        cond: ExprId,
        /// Source line
        line: Line,
    },
    /// `for (init; cond; advance) body`
    For {
        /// Initializer, a local declaration or an expression statement
        init: Option<StmtId>,
        /// Condition
        cond: Option<ExprId>,
        /// Step expression
        advance: Option<ExprId>,
        /// Loop body
        body: StmtId,
        /// Source line
        line: Line,
    },
    /// `break;`
    Break {
        /// Source line
        line: Line,
    },
    /// `continue;`
    Continue {
        /// Source line
        line: Line,
    },
    /// `return value;`
    Return {
        /// Returned value
        value: Option<ExprId>,
        /// Source line
        line: Line,
    },
    /// `throw message;`
    Throw {
        /// Exception message
        message: ExprId,
        /// Source line
        line: Line,
    },
    /// `delete target;`
    ///
    /// Explicit resource release. Targets lower it to a destructor call, a
    /// collector hint or nothing at all.
    Delete {
        /// Object being released
        target: ExprId,
        /// Source line
        line: Line,
    },
    /// `switch (value) { case ...: ... default: ... }`
    Switch {
        /// Switched-on value
        value: ExprId,
        /// Case clauses in source order
        cases: Vec<Case>,
        /// Default clause; `None` when the switch has no `default:`
        default_body: Option<Vec<StmtId>>,
        /// Source line
        line: Line,
    },
    /// Expression used as a statement
    Expr {
        /// The expression
        expr: ExprId,
        /// Source line
        line: Line,
    },
    /// Local variable declaration
    ///
    /// The symbol is a [`SymbolKind::Var`](crate::SymbolKind::Var); use
    /// [`Program::local`](crate::Program::local) to build one.
    Var {
        /// Declared variable
        var: SymbolId,
        /// Source line
        line: Line,
    },
}

impl HasLine for Stmt {
    fn line(&self) -> Line {
        match self {
            Self::Block(block) => block.line,
            Self::If { line, .. }
            | Self::While { line, .. }
            | Self::DoWhile { line, .. }
            | Self::For { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::Return { line, .. }
            | Self::Throw { line, .. }
            | Self::Delete { line, .. }
            | Self::Switch { line, .. }
            | Self::Expr { line, .. }
            | Self::Var { line, .. } => *line,
        }
    }
}

impl HasLine for Block {
    fn line(&self) -> Line {
        self.line
    }
}

impl HasLine for Case {
    fn line(&self) -> Line {
        self.line
    }
}
