//! Symbols: every named, resolvable declaration

use crate::{Block, ExprId, Reference, ScopeId, StmtId, SymbolId};
use ci_intern::Name;
use ci_span::{HasLine, Line};
use derive_more::Display;

/// Anything that declares a name
pub trait HasName {
    /// Declared name
    fn name(&self) -> Name;
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Visibility {
    /// Visible inside the declaring type only
    #[default]
    #[display("private")]
    Private,
    /// Visible inside the compilation unit
    #[display("internal")]
    Internal,
    /// Visible to the declaring type and its subclasses
    #[display("protected")]
    Protected,
    /// Visible everywhere
    #[display("public")]
    Public,
}

/// Dispatch kind, shared by methods and classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum CallType {
    /// No instance / cannot be instantiated
    #[display("static")]
    Static,
    /// Plain, non-overridable
    #[default]
    #[display("normal")]
    Normal,
    /// Must be overridden / cannot be instantiated
    #[display("abstract")]
    Abstract,
    /// May be overridden
    #[display("virtual")]
    Virtual,
    /// Overrides a virtual or abstract declaration
    #[display("override")]
    Override,
    /// Overrides and forbids further overriding
    #[display("sealed")]
    Sealed,
}

/// Types every program knows without declaring them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BuiltinType {
    /// `bool`
    #[display("bool")]
    Bool,
    /// `byte`
    #[display("byte")]
    Byte,
    /// `int`
    #[display("int")]
    Int,
    /// `long`
    #[display("long")]
    Long,
    /// `float`
    #[display("float")]
    Float,
    /// `double`
    #[display("double")]
    Double,
    /// `string`
    #[display("string")]
    String,
}

impl BuiltinType {
    /// Every built-in type, in the order they are declared
    pub const ALL: [Self; 7] = [
        Self::Bool,
        Self::Byte,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::String,
    ];

    /// Source spelling
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

/// A declared type plus an optional initializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue {
    /// Declared type expression
    pub ty: ExprId,
    /// Initializer
    pub value: Option<ExprId>,
}

/// A value declared inside a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Visibility
    pub visibility: Visibility,
    /// Type and initializer
    pub value: NamedValue,
}

/// Anything with a body: constructors and methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBase {
    /// Visibility
    pub visibility: Visibility,
    /// Body; `None` for abstract methods
    pub body: Option<StmtId>,
}

/// Method declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Visibility and body
    pub base: MethodBase,
    /// Return type; `None` for `void`
    pub return_type: Option<ExprId>,
    /// Dispatch kind
    pub call_type: CallType,
    /// Whether the method mutates its receiver
    pub is_mutator: bool,
    /// Parameters in source order; each a [`SymbolKind::Var`]
    pub parameters: Vec<SymbolId>,
}

/// Attributes shared by top-level types
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Container {
    /// Source file the type was declared in
    pub source_file: String,
    /// Whether the type is exported
    pub is_public: bool,
}

/// Enum declaration
///
/// The enum values are [`SymbolKind::Const`] members of its scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Origin and visibility
    pub container: Container,
    /// Bit-set semantics: values may be combined with `|`
    pub is_flags: bool,
    /// Member scope
    pub scope: ScopeId,
}

/// Name of a base class, bound during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseClass {
    /// Looked up in the global type scope, not lexically
    pub reference: Reference,
    /// Source line of the name
    pub line: Line,
}

/// Class declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassType {
    /// Origin and visibility
    pub container: Container,
    /// Inheritance kind
    pub call_type: CallType,
    /// Superclass
    pub base_class: Option<BaseClass>,
    /// Constructor, a [`SymbolKind::Constructor`]
    pub constructor: Option<SymbolId>,
    /// Destructor body
    pub destructor: Option<Block>,
    /// Constants in declaration order
    pub consts: Vec<SymbolId>,
    /// Fields in declaration order
    pub fields: Vec<SymbolId>,
    /// Methods in declaration order
    pub methods: Vec<SymbolId>,
    /// Member scope
    pub scope: ScopeId,
}

/// What a symbol declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    /// Local variable or parameter
    Var(NamedValue),
    /// Instance or static field
    Field(Member),
    /// Constant, including enum values
    Const(Member),
    /// Class constructor
    Constructor(MethodBase),
    /// Method
    Method(Method),
    /// Enum type
    Enum(EnumType),
    /// Class type
    Class(ClassType),
    /// Built-in type, pre-declared in the global scope
    Builtin(BuiltinType),
}

/// A named declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Name, unique within the declaring scope
    pub name: Name,
    /// Source line
    pub line: Line,
    /// Declaration payload
    pub kind: SymbolKind,
}

impl Symbol {
    /// Creates a symbol
    pub const fn new(name: Name, line: Line, kind: SymbolKind) -> Self {
        Self { name, line, kind }
    }

    /// Member scope, for symbols that are themselves scopes
    pub const fn scope(&self) -> Option<ScopeId> {
        match &self.kind {
            SymbolKind::Enum(enum_type) => Some(enum_type.scope),
            SymbolKind::Class(class) => Some(class.scope),
            _ => None,
        }
    }

    /// Type and initializer, for value declarations
    pub const fn as_named_value(&self) -> Option<&NamedValue> {
        match &self.kind {
            SymbolKind::Var(value) => Some(value),
            SymbolKind::Field(member) | SymbolKind::Const(member) => Some(&member.value),
            _ => None,
        }
    }

    /// Visibility, for members of a type
    pub const fn visibility(&self) -> Option<Visibility> {
        match &self.kind {
            SymbolKind::Field(member) | SymbolKind::Const(member) => Some(member.visibility),
            SymbolKind::Constructor(base) => Some(base.visibility),
            SymbolKind::Method(method) => Some(method.base.visibility),
            SymbolKind::Var(_)
            | SymbolKind::Enum(_)
            | SymbolKind::Class(_)
            | SymbolKind::Builtin(_) => None,
        }
    }

    /// Class payload
    pub const fn as_class(&self) -> Option<&ClassType> {
        match &self.kind {
            SymbolKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Enum payload
    pub const fn as_enum(&self) -> Option<&EnumType> {
        match &self.kind {
            SymbolKind::Enum(enum_type) => Some(enum_type),
            _ => None,
        }
    }

    /// Method payload
    pub const fn as_method(&self) -> Option<&Method> {
        match &self.kind {
            SymbolKind::Method(method) => Some(method),
            _ => None,
        }
    }

    /// Whether the symbol names a type
    pub const fn is_type(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Enum(_) | SymbolKind::Class(_) | SymbolKind::Builtin(_)
        )
    }

    /// Short description used in diagnostics and dumps
    pub const fn kind_name(&self) -> &'static str {
        match self.kind {
            SymbolKind::Var(_) => "var",
            SymbolKind::Field(_) => "field",
            SymbolKind::Const(_) => "const",
            SymbolKind::Constructor(_) => "constructor",
            SymbolKind::Method(_) => "method",
            SymbolKind::Enum(_) => "enum",
            SymbolKind::Class(_) => "class",
            SymbolKind::Builtin(_) => "builtin type",
        }
    }
}

impl HasName for Symbol {
    fn name(&self) -> Name {
        self.name
    }
}

impl HasLine for Symbol {
    fn line(&self) -> Line {
        self.line
    }
}
