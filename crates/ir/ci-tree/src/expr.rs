//! Expressions

use crate::{ExprId, SymbolId};
use ci_intern::Name;
use ci_span::{HasLine, Line};

/// Expression nodes
///
/// An expression may also stand on its own as a statement through
/// [`Stmt::Expr`](crate::Stmt::Expr).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal {
        /// The boxed scalar
        value: LiteralValue,
        /// Source line
        line: Line,
    },
    /// Reference to a symbol by name
    SymbolRef {
        /// Unresolved after parsing, resolved after the resolver pass
        reference: Reference,
        /// Source line
        line: Line,
    },
    /// Unary operation, prefix or postfix
    Unary {
        /// Operator
        op: UnaryOp,
        /// Whether the operator precedes or follows its operand
        fixity: Fixity,
        /// Operand
        operand: ExprId,
        /// Source line
        line: Line,
    },
    /// Binary operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: ExprId,
        /// Right operand
        right: ExprId,
        /// Source line
        line: Line,
    },
    /// `cond ? on_true : on_false`
    Conditional {
        /// Condition
        cond: ExprId,
        /// Value when the condition holds
        on_true: ExprId,
        /// Value otherwise
        on_false: ExprId,
        /// Source line
        line: Line,
    },
    /// `object.member`
    ///
    /// Only `object` is looked up lexically. The member is looked up among the
    /// members of the type `object` denotes or is declared with.
    Member {
        /// Expression the member is selected from
        object: ExprId,
        /// Member name, bound to a const, field, method or enum value
        member: Reference,
        /// Source line
        line: Line,
    },
    /// Collection literal
    Collection {
        /// Elements in source order
        items: Vec<ExprId>,
        /// Source line
        line: Line,
    },
    /// Jump to the default clause of the enclosing switch
    GotoDefault {
        /// Source line
        line: Line,
    },
}

impl Expr {
    /// The reference carried by a `SymbolRef` or the member of a `Member`
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::SymbolRef { reference, .. }
            | Self::Member {
                member: reference, ..
            } => Some(reference),
            _ => None,
        }
    }

    pub(crate) fn as_reference_mut(&mut self) -> Option<&mut Reference> {
        match self {
            Self::SymbolRef { reference, .. }
            | Self::Member {
                member: reference, ..
            } => Some(reference),
            _ => None,
        }
    }

    /// Whether this is a `goto default`
    pub fn is_goto_default(&self) -> bool {
        matches!(self, Self::GotoDefault { .. })
    }
}

impl HasLine for Expr {
    fn line(&self) -> Line {
        match self {
            Self::Literal { line, .. }
            | Self::SymbolRef { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Conditional { line, .. }
            | Self::Member { line, .. }
            | Self::Collection { line, .. }
            | Self::GotoDefault { line } => *line,
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `null`
    Null,
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// String literal
    String(String),
    /// Character literal
    Char(char),
}

/// A name as written in source, bound to its declaration once resolved
///
/// The two states are distinct variants so a consumer can never mistake an
/// unbound name for a bound one. [`Reference::bind`] is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Produced by the parser: only the name is known
    Unresolved {
        /// Name as written
        name: Name,
    },
    /// Produced by the resolver
    Resolved {
        /// Name as written
        name: Name,
        /// Declaration the name binds to; owned elsewhere in the tree
        target: SymbolId,
    },
}

impl Reference {
    /// A fresh unresolved reference
    pub const fn unresolved(name: Name) -> Self {
        Self::Unresolved { name }
    }

    /// Name as written in source
    pub const fn name(&self) -> Name {
        match self {
            Self::Unresolved { name } | Self::Resolved { name, .. } => *name,
        }
    }

    /// Bound declaration, if resolved
    pub const fn target(&self) -> Option<SymbolId> {
        match self {
            Self::Unresolved { .. } => None,
            Self::Resolved { target, .. } => Some(*target),
        }
    }

    /// Whether the reference has been bound
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Binds the reference to `target`
    ///
    /// Resolution is terminal: a reference that is already resolved keeps its
    /// original binding.
    #[must_use]
    pub const fn bind(self, target: SymbolId) -> Self {
        match self {
            Self::Unresolved { name } => Self::Resolved { name, target },
            resolved @ Self::Resolved { .. } => resolved,
        }
    }
}

/// Position of a unary operator relative to its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// `-x`, `++x`
    Prefix,
    /// `x++`
    Postfix,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT (!)
    Not,
    /// Bitwise NOT (~)
    BitNot,
    /// Increment (++)
    Increment,
    /// Decrement (--)
    Decrement,
}

impl UnaryOp {
    /// Source spelling
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Modulo (%)
    Mod,
    /// Left shift (<<)
    Shl,
    /// Right shift (>>)
    Shr,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Equality (==)
    Eq,
    /// Inequality (!=)
    Ne,
    /// Bitwise AND (&)
    BitAnd,
    /// Bitwise OR (|)
    BitOr,
    /// Bitwise XOR (^)
    BitXor,
    /// Logical AND (&&)
    And,
    /// Logical OR (||)
    Or,
    /// Assignment (=)
    Assign,
    /// Compound assignment (+=)
    AddAssign,
    /// Compound assignment (-=)
    SubAssign,
    /// Compound assignment (*=)
    MulAssign,
    /// Compound assignment (/=)
    DivAssign,
    /// Compound assignment (%=)
    ModAssign,
    /// Compound assignment (<<=)
    ShlAssign,
    /// Compound assignment (>>=)
    ShrAssign,
    /// Compound assignment (&=)
    BitAndAssign,
    /// Compound assignment (|=)
    BitOrAssign,
    /// Compound assignment (^=)
    BitXorAssign,
    /// Element access (`left[right]`)
    Index,
}

impl BinaryOp {
    /// Source spelling
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::And => "&&",
            Self::Or => "||",
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::BitAndAssign => "&=",
            Self::BitOrAssign => "|=",
            Self::BitXorAssign => "^=",
            Self::Index => "[]",
        }
    }

    /// Whether the operator writes to its left operand
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::AddAssign
                | Self::SubAssign
                | Self::MulAssign
                | Self::DivAssign
                | Self::ModAssign
                | Self::ShlAssign
                | Self::ShrAssign
                | Self::BitAndAssign
                | Self::BitOrAssign
                | Self::BitXorAssign
        )
    }
}
