//! Program: the root of the tree and the API front ends build it with

use crate::error::TreeError;
use crate::{
    BaseClass, Bindings, Block, BuiltinType, CallType, ClassType, Container, EnumType, Expr,
    ExprId, LiteralValue, MethodBase, NamedValue, Reference, ResolvedProgram, ScopeId, ScopeKind,
    ScopeTree, Stmt, StmtId, Symbol, SymbolId, SymbolKind, UnboundReferences,
};
use ci_intern::{Interner, Name};
use ci_span::{HasLine as _, Line};
use la_arena::Arena;

/// Header of a class declaration
#[derive(Debug, Clone, Default)]
pub struct ClassDecl {
    /// Source file the class was declared in
    pub source_file: String,
    /// Whether the class is exported
    pub is_public: bool,
    /// Inheritance kind
    pub call_type: CallType,
    /// Superclass name as written
    pub base_class: Option<String>,
}

/// Header of an enum declaration
#[derive(Debug, Clone, Default)]
pub struct EnumDecl {
    /// Source file the enum was declared in
    pub source_file: String,
    /// Whether the enum is exported
    pub is_public: bool,
    /// Bit-set semantics
    pub is_flags: bool,
}

/// A whole compilation unit
///
/// Owns every statement, expression, symbol and scope through arenas. The
/// global scope holds the built-in types and all top-level classes and enums,
/// and has no parent.
#[derive(Debug)]
pub struct Program {
    interner: Interner,
    stmts: Arena<Stmt>,
    exprs: Arena<Expr>,
    symbols: Arena<Symbol>,
    scopes: ScopeTree,
    classes: Vec<SymbolId>,
    enums: Vec<SymbolId>,
}

impl Program {
    /// Creates a program whose global scope holds only the built-in types
    pub fn new() -> Self {
        let mut program = Self {
            interner: Interner::new(),
            stmts: Arena::new(),
            exprs: Arena::new(),
            symbols: Arena::new(),
            scopes: ScopeTree::new(),
            classes: Vec::new(),
            enums: Vec::new(),
        };
        let global = program.scopes.global();
        for builtin in BuiltinType::ALL {
            let name = program.interner.intern(builtin.keyword());
            let id = program.symbols.alloc(Symbol::new(
                name,
                Line::default(),
                SymbolKind::Builtin(builtin),
            ));
            program.scopes.add_if_absent(global, name, id);
        }
        program
    }

    // Read access

    /// Statement by ID
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    /// Expression by ID
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    /// Symbol by ID
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// All expressions with their IDs, in allocation order
    pub fn exprs(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs.iter()
    }

    /// All symbols with their IDs, in allocation order
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter()
    }

    /// The scope tree
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// The program-level type scope
    pub fn global_scope(&self) -> ScopeId {
        self.scopes.global()
    }

    /// Top-level classes in declaration order
    pub fn classes(&self) -> &[SymbolId] {
        &self.classes
    }

    /// Top-level enums in declaration order
    pub fn enums(&self) -> &[SymbolId] {
        &self.enums
    }

    /// The identifier interner
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Text of an interned name
    pub fn name(&self, name: Name) -> &str {
        self.interner.resolve(name)
    }

    /// Declared name of a symbol
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        self.interner.resolve(self.symbols[id].name)
    }

    /// Lexical lookup of `name` starting at `scope`
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let name = self.interner.get(name)?;
        self.scopes.lookup(scope, name)
    }

    /// Symbols declared directly in `scope`, in declaration order
    pub fn members(&self, scope: ScopeId) -> impl Iterator<Item = SymbolId> + '_ {
        self.scopes.get(scope).symbols()
    }

    // Construction

    /// Interns an identifier
    pub fn intern(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }

    /// Adds an expression node
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    /// Adds a statement node
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    /// Adds an unresolved reference to `name`
    pub fn reference(&mut self, name: &str, line: Line) -> ExprId {
        let name = self.intern(name);
        self.alloc_expr(Expr::SymbolRef {
            reference: Reference::unresolved(name),
            line,
        })
    }

    /// Adds `object.member` with the member still unresolved
    pub fn member(&mut self, object: ExprId, member: &str, line: Line) -> ExprId {
        let member = self.intern(member);
        self.alloc_expr(Expr::Member {
            object,
            member: Reference::unresolved(member),
            line,
        })
    }

    /// Adds a literal
    pub fn literal(&mut self, value: LiteralValue, line: Line) -> ExprId {
        self.alloc_expr(Expr::Literal { value, line })
    }

    /// Adds a variable symbol that belongs to no scope yet
    ///
    /// Used for method parameters and locals; the resolver enters them into
    /// the method or block scope they appear in.
    pub fn alloc_var(&mut self, name: &str, line: Line, value: NamedValue) -> SymbolId {
        let name = self.intern(name);
        self.symbols
            .alloc(Symbol::new(name, line, SymbolKind::Var(value)))
    }

    /// Adds a local declaration statement
    pub fn local(&mut self, name: &str, line: Line, value: NamedValue) -> StmtId {
        let var = self.alloc_var(name, line, value);
        self.alloc_stmt(Stmt::Var { var, line })
    }

    /// Declares `symbol` in `scope`
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateDeclaration`] if the name is already
    /// declared in `scope`. Nothing is allocated in that case.
    pub fn add(&mut self, scope: ScopeId, symbol: Symbol) -> Result<SymbolId, TreeError> {
        if let Some(existing) = self.scopes.lookup_local(scope, symbol.name) {
            return Err(self.duplicate(symbol.name, symbol.line, existing));
        }
        let name = symbol.name;
        let id = self.symbols.alloc(symbol);
        self.scopes
            .add(scope, name, id)
            .map_err(|existing| self.duplicate(name, self.symbols[id].line, existing))?;
        Ok(id)
    }

    /// Declares a top-level class
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateDeclaration`] if a type of that name exists.
    pub fn declare_class(
        &mut self,
        name: &str,
        line: Line,
        decl: ClassDecl,
    ) -> Result<SymbolId, TreeError> {
        let global = self.scopes.global();
        let name = self.intern(name);
        if let Some(existing) = self.scopes.lookup_local(global, name) {
            return Err(self.duplicate(name, line, existing));
        }
        let base_class = decl.base_class.map(|base| BaseClass {
            reference: Reference::unresolved(self.interner.intern(&base)),
            line,
        });
        let id = self.symbols.alloc(Symbol::new(
            name,
            line,
            SymbolKind::Class(ClassType {
                container: Container {
                    source_file: decl.source_file,
                    is_public: decl.is_public,
                },
                call_type: decl.call_type,
                base_class,
                constructor: None,
                destructor: None,
                consts: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                scope: global,
            }),
        ));
        let scope = self.scopes.create_child(global, ScopeKind::Type(id));
        if let SymbolKind::Class(class) = &mut self.symbols[id].kind {
            class.scope = scope;
        }
        self.scopes
            .add(global, name, id)
            .map_err(|existing| self.duplicate(name, line, existing))?;
        self.classes.push(id);
        Ok(id)
    }

    /// Declares a top-level enum
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateDeclaration`] if a type of that name exists.
    pub fn declare_enum(
        &mut self,
        name: &str,
        line: Line,
        decl: EnumDecl,
    ) -> Result<SymbolId, TreeError> {
        let global = self.scopes.global();
        let name = self.intern(name);
        if let Some(existing) = self.scopes.lookup_local(global, name) {
            return Err(self.duplicate(name, line, existing));
        }
        let id = self.symbols.alloc(Symbol::new(
            name,
            line,
            SymbolKind::Enum(EnumType {
                container: Container {
                    source_file: decl.source_file,
                    is_public: decl.is_public,
                },
                is_flags: decl.is_flags,
                scope: global,
            }),
        ));
        let scope = self.scopes.create_child(global, ScopeKind::Type(id));
        if let SymbolKind::Enum(enum_type) = &mut self.symbols[id].kind {
            enum_type.scope = scope;
        }
        self.scopes
            .add(global, name, id)
            .map_err(|existing| self.duplicate(name, line, existing))?;
        self.enums.push(id);
        Ok(id)
    }

    /// Adds a member to a class or an enum value to an enum
    ///
    /// Classes accept consts, fields and methods, which are also appended to
    /// the matching ordered list. Enums accept consts only.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAType`] if `owner` is not a class or enum,
    /// [`TreeError::InvalidMember`] for a member kind the owner cannot hold,
    /// and [`TreeError::DuplicateDeclaration`] on a name clash.
    pub fn add_member(&mut self, owner: SymbolId, member: Symbol) -> Result<SymbolId, TreeError> {
        let owner_symbol = &self.symbols[owner];
        let accepted = match (&owner_symbol.kind, &member.kind) {
            (
                SymbolKind::Class(_),
                SymbolKind::Const(_) | SymbolKind::Field(_) | SymbolKind::Method(_),
            )
            | (SymbolKind::Enum(_), SymbolKind::Const(_)) => true,
            (SymbolKind::Class(_) | SymbolKind::Enum(_), _) => false,
            _ => {
                return Err(TreeError::NotAType {
                    name: self.symbol_name(owner).to_owned(),
                    kind: owner_symbol.kind_name(),
                    line: owner_symbol.line,
                });
            }
        };
        if !accepted {
            return Err(TreeError::InvalidMember {
                owner: self.symbol_name(owner).to_owned(),
                owner_kind: owner_symbol.kind_name(),
                member_kind: member.kind_name(),
                line: member.line,
            });
        }

        let Some(scope) = owner_symbol.scope() else {
            return Err(self.not_a_type(owner));
        };
        let is_const = matches!(member.kind, SymbolKind::Const(_));
        let is_field = matches!(member.kind, SymbolKind::Field(_));
        let id = self.add(scope, member)?;
        if let SymbolKind::Class(class) = &mut self.symbols[owner].kind {
            let list = if is_const {
                &mut class.consts
            } else if is_field {
                &mut class.fields
            } else {
                &mut class.methods
            };
            list.push(id);
        }
        Ok(id)
    }

    /// Gives `class` its constructor
    ///
    /// The constructor is named after the class and is not entered into the
    /// member scope.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAType`] if `class` is not a class and
    /// [`TreeError::ConstructorAlreadySet`] if it already has one.
    pub fn set_constructor(
        &mut self,
        class: SymbolId,
        line: Line,
        constructor: MethodBase,
    ) -> Result<SymbolId, TreeError> {
        let class_symbol = &self.symbols[class];
        let Some(class_type) = class_symbol.as_class() else {
            return Err(self.not_a_type(class));
        };
        if class_type.constructor.is_some() {
            return Err(TreeError::ConstructorAlreadySet {
                class: self.symbol_name(class).to_owned(),
                line,
            });
        }
        let name = class_symbol.name;
        let id = self.symbols.alloc(Symbol::new(
            name,
            line,
            SymbolKind::Constructor(constructor),
        ));
        if let SymbolKind::Class(class_type) = &mut self.symbols[class].kind {
            class_type.constructor = Some(id);
        }
        Ok(id)
    }

    /// Gives `class` its destructor body
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAType`] if `class` is not a class and
    /// [`TreeError::DestructorAlreadySet`] if it already has one.
    pub fn set_destructor(&mut self, class: SymbolId, body: Block) -> Result<(), TreeError> {
        let Some(has_destructor) = self.symbols[class]
            .as_class()
            .map(|class_type| class_type.destructor.is_some())
        else {
            return Err(self.not_a_type(class));
        };
        if has_destructor {
            return Err(TreeError::DestructorAlreadySet {
                class: self.symbol_name(class).to_owned(),
                line: body.line,
            });
        }
        if let SymbolKind::Class(class_type) = &mut self.symbols[class].kind {
            class_type.destructor = Some(body);
        }
        Ok(())
    }

    fn duplicate(&self, name: Name, line: Line, existing: SymbolId) -> TreeError {
        TreeError::DuplicateDeclaration {
            name: self.name(name).to_owned(),
            line,
            previous: self.symbols[existing].line,
        }
    }

    fn not_a_type(&self, id: SymbolId) -> TreeError {
        let symbol = &self.symbols[id];
        TreeError::NotAType {
            name: self.symbol_name(id).to_owned(),
            kind: symbol.kind_name(),
            line: symbol.line,
        }
    }

    // Resolution

    /// Applies `bindings`, turning every unresolved reference into a resolved one
    ///
    /// # Errors
    ///
    /// If any reference or base class has no binding the program is handed
    /// back untouched together with a [`TreeError::UnboundReference`] for
    /// each of them.
    pub fn into_resolved(
        mut self,
        bindings: Bindings,
    ) -> Result<ResolvedProgram, UnboundReferences> {
        let errors = self.unbound(&bindings);
        if !errors.is_empty() {
            return Err(UnboundReferences {
                program: Box::new(self),
                errors,
            });
        }

        for (expr, target) in &bindings.references {
            if let Some(reference) = self.exprs[*expr].as_reference_mut() {
                *reference = reference.bind(*target);
            }
        }
        for (class, base) in &bindings.base_classes {
            if let SymbolKind::Class(ClassType {
                base_class: Some(base_class),
                ..
            }) = &mut self.symbols[*class].kind
            {
                base_class.reference = base_class.reference.bind(*base);
            }
        }
        if let Some(scopes) = bindings.scopes {
            self.scopes = scopes;
        }

        Ok(ResolvedProgram {
            program: self,
            method_scopes: bindings.method_scopes,
            block_scopes: bindings.block_scopes,
            clause_scopes: bindings.clause_scopes,
        })
    }

    fn unbound(&self, bindings: &Bindings) -> Vec<TreeError> {
        let references = self.exprs().filter_map(|(id, expr)| {
            let reference = expr.as_reference()?;
            (!reference.is_resolved() && !bindings.references.contains_key(&id)).then(|| {
                TreeError::UnboundReference {
                    name: self.name(reference.name()).to_owned(),
                    line: expr.line(),
                }
            })
        });
        let bases = self.classes().iter().filter_map(|class| {
            let base = self.symbol(*class).as_class()?.base_class?;
            (!base.reference.is_resolved() && !bindings.base_classes.contains_key(class)).then(
                || TreeError::UnboundReference {
                    name: self.name(base.reference.name()).to_owned(),
                    line: base.line,
                },
            )
        });
        bases.chain(references).collect()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
