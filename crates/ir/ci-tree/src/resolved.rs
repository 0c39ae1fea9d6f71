//! The resolved form of a program

use crate::error::TreeError;
use crate::{ExprId, Program, ScopeId, ScopeTree, StmtId, SymbolId};
use rustc_hash::FxHashMap;
use std::ops::Deref;

/// A clause of a switch statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchClause {
    /// The case at this position
    Case(usize),
    /// The default clause
    Default,
}

/// Everything a resolver pass found
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    /// Reference expression -> declaration
    pub references: FxHashMap<ExprId, SymbolId>,
    /// Class -> base class
    pub base_classes: FxHashMap<SymbolId, SymbolId>,
    /// Method, constructor or class (for its destructor) -> parameter scope
    pub method_scopes: FxHashMap<SymbolId, ScopeId>,
    /// Block, `for` or embedded statement -> the scope holding its locals
    pub block_scopes: FxHashMap<StmtId, ScopeId>,
    /// Switch clause -> the scope holding its locals
    pub clause_scopes: FxHashMap<(StmtId, SwitchClause), ScopeId>,
    /// The scope tree extended with method and block scopes
    pub scopes: Option<ScopeTree>,
}

/// A program whose every reference is bound
///
/// Only [`Program::into_resolved`] creates one, and it checks that no
/// reference is left unresolved. Consumers get read-only access through
/// `Deref<Target = Program>`.
#[derive(Debug)]
pub struct ResolvedProgram {
    pub(crate) program: Program,
    pub(crate) method_scopes: FxHashMap<SymbolId, ScopeId>,
    pub(crate) block_scopes: FxHashMap<StmtId, ScopeId>,
    pub(crate) clause_scopes: FxHashMap<(StmtId, SwitchClause), ScopeId>,
}

impl ResolvedProgram {
    /// Declaration a reference or member expression is bound to
    pub fn binding(&self, expr: ExprId) -> Option<SymbolId> {
        self.program.expr(expr).as_reference()?.target()
    }

    /// Base class of `class`
    pub fn base_class(&self, class: SymbolId) -> Option<SymbolId> {
        self.program
            .symbol(class)
            .as_class()?
            .base_class?
            .reference
            .target()
    }

    /// Parameter scope of a method or constructor, or the destructor scope of a class
    pub fn method_scope(&self, symbol: SymbolId) -> Option<ScopeId> {
        self.method_scopes.get(&symbol).copied()
    }

    /// Scope opened for a block, a `for` statement or a branch or loop body
    ///
    /// Its members are the locals the statement declares, in order.
    pub fn block_scope(&self, stmt: StmtId) -> Option<ScopeId> {
        self.block_scopes.get(&stmt).copied()
    }

    /// Scope opened for one clause of the switch statement `switch`
    pub fn clause_scope(&self, switch: StmtId, clause: SwitchClause) -> Option<ScopeId> {
        self.clause_scopes.get(&(switch, clause)).copied()
    }

    /// Gives the underlying program back
    pub fn into_inner(self) -> Program {
        self.program
    }
}

impl Deref for ResolvedProgram {
    type Target = Program;

    fn deref(&self) -> &Program {
        &self.program
    }
}

/// Returned by [`Program::into_resolved`] when bindings are incomplete
#[derive(Debug)]
pub struct UnboundReferences {
    /// The program, unchanged
    pub program: Box<Program>,
    /// One error per unbound reference, in allocation order
    pub errors: Vec<TreeError>,
}
