//! Errors raised while building the tree

use ci_span::Line;
use miette::Diagnostic;
use thiserror::Error;

/// Misuse of the tree-building API
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum TreeError {
    /// A name was declared twice in the same scope
    #[error("`{name}` is already declared in this scope ({line}, first declared at {previous})")]
    #[diagnostic(
        code(tree::duplicate_declaration),
        help("rename one of the declarations; shadowing is only allowed in nested scopes")
    )]
    DuplicateDeclaration {
        /// The redeclared name
        name: String,
        /// Line of the rejected declaration
        line: Line,
        /// Line of the declaration that was kept
        previous: Line,
    },

    /// A member was added to a symbol that has no member scope
    #[error("`{name}` is a {kind}, not a class or enum ({line})")]
    #[diagnostic(code(tree::not_a_type))]
    NotAType {
        /// Name of the symbol
        name: String,
        /// What the symbol actually is
        kind: &'static str,
        /// Line of the symbol
        line: Line,
    },

    /// A member of the wrong kind was added to a type
    #[error("a {member_kind} cannot be declared in {owner_kind} `{owner}` ({line})")]
    #[diagnostic(
        code(tree::invalid_member),
        help("classes hold consts, fields and methods; enums hold consts only")
    )]
    InvalidMember {
        /// Name of the receiving type
        owner: String,
        /// `class` or `enum`
        owner_kind: &'static str,
        /// Kind of the rejected member
        member_kind: &'static str,
        /// Line of the rejected member
        line: Line,
    },

    /// A second constructor was supplied for a class
    #[error("class `{class}` already has a constructor ({line})")]
    #[diagnostic(code(tree::constructor_already_set))]
    ConstructorAlreadySet {
        /// Name of the class
        class: String,
        /// Line of the rejected constructor
        line: Line,
    },

    /// A second destructor was supplied for a class
    #[error("class `{class}` already has a destructor ({line})")]
    #[diagnostic(code(tree::destructor_already_set))]
    DestructorAlreadySet {
        /// Name of the class
        class: String,
        /// Line of the rejected destructor
        line: Line,
    },

    /// A reference was left unbound after resolution
    #[error("`{name}` was not bound by the resolver ({line})")]
    #[diagnostic(code(tree::unbound_reference))]
    UnboundReference {
        /// Name as written
        name: String,
        /// Line of the reference
        line: Line,
    },
}

impl TreeError {
    /// Line of the offending node
    pub const fn line(&self) -> Line {
        match self {
            Self::DuplicateDeclaration { line, .. }
            | Self::NotAType { line, .. }
            | Self::InvalidMember { line, .. }
            | Self::ConstructorAlreadySet { line, .. }
            | Self::DestructorAlreadySet { line, .. }
            | Self::UnboundReference { line, .. } => *line,
        }
    }
}
