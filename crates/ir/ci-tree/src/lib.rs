//! Ci object model
//!
//! The Ci tree is the single, language-neutral representation shared by every
//! back end. A front end builds it once, the resolver binds every name
//! reference, and the emitters then walk the finished tree read-only.
//!
//! # Layout
//!
//! - **Statements and expressions** ([`Stmt`], [`Expr`]): closed sum types,
//!   stored in arenas and linked by [`StmtId`] / [`ExprId`]
//! - **Symbols** ([`Symbol`]): variables, members, methods and types
//! - **Scopes** ([`ScopeTree`]): ordered name tables chained to their parent
//! - **Program** ([`Program`]): the root aggregate owning all of the above
//!
//! Every node records its source [`Line`] and nothing else about its origin.

pub mod error;
pub mod expr;
pub mod pretty_print;
pub mod program;
pub mod resolved;
pub mod scope;
pub mod stmt;
pub mod symbol;
pub mod visitor;

pub use ci_intern::{Interner, Name};
pub use ci_span::{HasLine, Line};

pub use error::TreeError;
pub use expr::{BinaryOp, Expr, Fixity, LiteralValue, Reference, UnaryOp};
pub use program::{ClassDecl, EnumDecl, Program};
pub use resolved::{Bindings, ResolvedProgram, SwitchClause, UnboundReferences};
pub use scope::{Scope, ScopeKind, ScopeTree};
pub use stmt::{Block, Case, Stmt};
pub use symbol::{
    BaseClass, BuiltinType, CallType, ClassType, Container, EnumType, HasName, Member, Method,
    MethodBase, NamedValue, Symbol, SymbolKind, Visibility,
};

use la_arena::Idx;

/// Statement node IDs
pub type StmtId = Idx<Stmt>;
/// Expression node IDs
pub type ExprId = Idx<Expr>;
/// Symbol IDs
pub type SymbolId = Idx<Symbol>;
/// Scope IDs
pub type ScopeId = Idx<Scope>;
