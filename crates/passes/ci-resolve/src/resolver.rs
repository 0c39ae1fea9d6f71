//! Binding pass: base classes first, then every lexical reference

use crate::config::ResolveOptions;
use crate::error::{ResolveError, compute_suggestions, suggestion_help};
use crate::validate::validate_switches;
use ci_span::Line;
use ci_tree::{
    Bindings, Block, Case, ClassType, Expr, ExprId, Method, NamedValue, Program, Reference,
    ScopeId, ScopeKind, ScopeTree, Stmt, StmtId, SwitchClause, SymbolId, SymbolKind, TreeError,
};
use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

/// What a member expression selects from
enum MemberOwner {
    /// Members of this class or enum
    Type(SymbolId),
    /// The object itself failed to resolve and was already reported
    Unknown,
    /// Something without members, described for diagnostics
    Nothing(String),
}

/// Walks a borrowed program and records what every name binds to
pub struct Resolver<'prog> {
    /// Program being resolved; never mutated
    program: &'prog Program,
    /// Limits and suggestion settings
    options: &'prog ResolveOptions,
    /// Working copy of the scope tree, grown with method and block scopes
    scopes: ScopeTree,
    /// Scope that lookups start from
    current_scope: ScopeId,
    /// What has been bound so far
    bindings: Bindings,
    /// Collected errors, at most `options.max_errors` of them
    errors: Vec<ResolveError>,
    /// Errors dropped once the limit was reached
    dropped: usize,
}

impl<'prog> Resolver<'prog> {
    pub fn new(program: &'prog Program, options: &'prog ResolveOptions) -> Self {
        let scopes = program.scopes().clone();
        let current_scope = scopes.global();
        Self {
            program,
            options,
            scopes,
            current_scope,
            bindings: Bindings::default(),
            errors: Vec::new(),
            dropped: 0,
        }
    }

    /// Runs every phase and hands back the bindings and errors
    pub fn run(mut self) -> (Bindings, Vec<ResolveError>) {
        self.resolve_base_classes();
        debug!(
            bound = self.bindings.base_classes.len(),
            errors = self.errors.len(),
            "resolved base classes"
        );

        self.resolve_bodies();
        debug!(
            references = self.bindings.references.len(),
            scopes = self.scopes.len(),
            errors = self.errors.len(),
            "resolved declarations and bodies"
        );

        if self.options.validate_switches {
            let switch_errors = validate_switches(self.program);
            debug!(errors = switch_errors.len(), "validated switches");
            for error in switch_errors {
                self.report(error);
            }
        }
        if self.dropped > 0 {
            debug!(dropped = self.dropped, "errors over the limit were dropped");
        }

        self.bindings.scopes = Some(self.scopes);
        (self.bindings, self.errors)
    }

    /// Records an error unless the limit is reached
    fn report(&mut self, error: ResolveError) {
        if self.options.error_limit_reached(self.errors.len()) {
            if self.dropped == 0 {
                warn!(
                    limit = self.options.max_errors,
                    "error limit reached, further errors are dropped"
                );
            }
            self.dropped += 1;
            return;
        }
        self.errors.push(error);
    }

    /// Phase A: binds each base class in the global scope, then rejects cycles
    fn resolve_base_classes(&mut self) {
        let program = self.program;
        let global = self.scopes.global();
        for &class in program.classes() {
            let Some(class_type) = program.symbol(class).as_class() else {
                continue;
            };
            let Some(base) = class_type.base_class else {
                continue;
            };
            if base.reference.is_resolved() {
                continue;
            }

            let name = base.reference.name();
            match self.scopes.lookup_local(global, name) {
                Some(target) if program.symbol(target).as_class().is_some() => {
                    trace!(
                        class = program.symbol_name(class),
                        base = program.name(name),
                        "bound base class"
                    );
                    self.bindings.base_classes.insert(class, target);
                }
                Some(target) => self.report(ResolveError::BaseNotAClass {
                    class: program.symbol_name(class).to_owned(),
                    name: program.name(name).to_owned(),
                    kind: program.symbol(target).kind_name(),
                    line: base.line,
                }),
                None => {
                    let class_names = program
                        .classes()
                        .iter()
                        .map(|candidate| program.symbol_name(*candidate));
                    let suggestions = compute_suggestions(
                        program.name(name),
                        class_names,
                        self.options.max_suggestion_distance,
                        self.options.max_suggestions,
                    );
                    self.report(ResolveError::UnresolvedBaseClass {
                        class: program.symbol_name(class).to_owned(),
                        name: program.name(name).to_owned(),
                        line: base.line,
                        help: suggestion_help(&suggestions),
                    });
                }
            }
        }

        for &class in program.classes() {
            if self.inherits_from_itself(class) {
                self.report(ResolveError::CyclicInheritance {
                    class: program.symbol_name(class).to_owned(),
                    line: program.symbol(class).line,
                });
            }
        }
    }

    /// Base class bound in this run, or already bound in the tree
    fn base_of(&self, class: SymbolId) -> Option<SymbolId> {
        if let Some(base) = self.bindings.base_classes.get(&class) {
            return Some(*base);
        }
        self.program
            .symbol(class)
            .as_class()?
            .base_class?
            .reference
            .target()
    }

    fn inherits_from_itself(&self, class: SymbolId) -> bool {
        let mut seen = FxHashSet::default();
        let mut current = class;
        while let Some(base) = self.base_of(current) {
            if base == class {
                return true;
            }
            if !seen.insert(base) {
                return false;
            }
            current = base;
        }
        false
    }

    /// Phase B: member types and initializers, then method bodies
    fn resolve_bodies(&mut self) {
        let program = self.program;
        for &class in program.classes() {
            if let Some(class_type) = program.symbol(class).as_class() {
                self.resolve_class(class, class_type);
            }
        }
        for &enum_id in program.enums() {
            let Some(enum_type) = program.symbol(enum_id).as_enum() else {
                continue;
            };
            self.within(enum_type.scope, |resolver| {
                for value in program.members(enum_type.scope) {
                    if let Some(named) = program.symbol(value).as_named_value() {
                        resolver.resolve_named_value(named);
                    }
                }
            });
        }
    }

    fn resolve_class(&mut self, class: SymbolId, class_type: &'prog ClassType) {
        let program = self.program;
        self.within(class_type.scope, |resolver| {
            for &member in class_type.consts.iter().chain(&class_type.fields) {
                if let Some(named) = program.symbol(member).as_named_value() {
                    resolver.resolve_named_value(named);
                }
            }

            let constructor = class_type
                .constructor
                .map(|constructor| (constructor, &program.symbol(constructor).kind));
            if let Some((constructor, SymbolKind::Constructor(base))) = constructor {
                let scope = resolver.open_method_scope(constructor);
                resolver.within(scope, |resolver| {
                    if let Some(body) = base.body {
                        resolver.resolve_stmt(body);
                    }
                });
            }

            if let Some(destructor) = &class_type.destructor {
                let scope = resolver.open_method_scope(class);
                resolver.within(scope, |resolver| resolver.resolve_block_statements(destructor));
            }

            for &method in &class_type.methods {
                if let Some(method_type) = program.symbol(method).as_method() {
                    resolver.resolve_method(method, method_type);
                }
            }
        });
    }

    fn resolve_method(&mut self, method: SymbolId, method_type: &'prog Method) {
        let program = self.program;
        if let Some(return_type) = method_type.return_type {
            self.resolve_expr(return_type);
        }

        let scope = self.open_method_scope(method);
        self.within(scope, |resolver| {
            for &param in &method_type.parameters {
                if let Some(named) = program.symbol(param).as_named_value() {
                    resolver.resolve_named_value(named);
                }
                resolver.declare(param);
            }
            if let Some(body) = method_type.base.body {
                resolver.resolve_stmt(body);
            }
        });
    }

    fn open_method_scope(&mut self, owner: SymbolId) -> ScopeId {
        let scope = self
            .scopes
            .create_child(self.current_scope, ScopeKind::Method(owner));
        self.bindings.method_scopes.insert(owner, scope);
        scope
    }

    /// Runs `body` with `scope` as the lookup start, then restores the previous one
    fn within(&mut self, scope: ScopeId, body: impl FnOnce(&mut Self)) {
        let previous_scope = self.current_scope;
        self.current_scope = scope;
        body(self);
        self.current_scope = previous_scope;
    }

    /// Runs `body` in a fresh block scope nested in the current one
    fn in_block(&mut self, body: impl FnOnce(&mut Self)) -> ScopeId {
        let block_scope = self
            .scopes
            .create_child(self.current_scope, ScopeKind::Block);
        self.within(block_scope, body);
        block_scope
    }

    /// Resolves a branch or loop body in a scope of its own
    ///
    /// A local declared as the whole body stays inside it.
    fn resolve_nested(&mut self, stmt: StmtId) {
        if matches!(self.program.stmt(stmt), Stmt::Block(_)) {
            self.resolve_stmt(stmt);
            return;
        }
        let scope = self.in_block(|resolver| resolver.resolve_stmt(stmt));
        self.bindings.block_scopes.insert(stmt, scope);
    }

    /// Enters a local or parameter into the current scope
    fn declare(&mut self, var: SymbolId) {
        let program = self.program;
        let symbol = program.symbol(var);
        if let Err(existing) = self.scopes.add(self.current_scope, symbol.name, var) {
            self.report(ResolveError::Tree(TreeError::DuplicateDeclaration {
                name: program.name(symbol.name).to_owned(),
                line: symbol.line,
                previous: program.symbol(existing).line,
            }));
        }
    }

    fn resolve_named_value(&mut self, named: &NamedValue) {
        self.resolve_expr(named.ty);
        if let Some(value) = named.value {
            self.resolve_expr(value);
        }
    }

    fn resolve_block_statements(&mut self, block: &'prog Block) {
        for &stmt in &block.statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: StmtId) {
        let program = self.program;
        match program.stmt(stmt) {
            Stmt::Block(block) => {
                let scope = self.in_block(|resolver| resolver.resolve_block_statements(block));
                self.bindings.block_scopes.insert(stmt, scope);
            }
            Stmt::If {
                cond,
                on_true,
                on_false,
                ..
            } => {
                self.resolve_expr(*cond);
                self.resolve_nested(*on_true);
                if let Some(on_false) = on_false {
                    self.resolve_nested(*on_false);
                }
            }
            Stmt::While { cond, body, .. } => {
                self.resolve_expr(*cond);
                self.resolve_nested(*body);
            }
            Stmt::DoWhile { body, cond, .. } => {
                self.resolve_nested(*body);
                self.resolve_expr(*cond);
            }
            Stmt::For {
                init,
                cond,
                advance,
                body,
                ..
            } => {
                let scope = self.in_block(|resolver| {
                    if let Some(init) = init {
                        resolver.resolve_stmt(*init);
                    }
                    if let Some(cond) = cond {
                        resolver.resolve_expr(*cond);
                    }
                    if let Some(advance) = advance {
                        resolver.resolve_expr(*advance);
                    }
                    resolver.resolve_nested(*body);
                });
                self.bindings.block_scopes.insert(stmt, scope);
            }
            Stmt::Break { .. } | Stmt::Continue { .. } => {}
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.resolve_expr(*value);
                }
            }
            Stmt::Throw { message, .. } => self.resolve_expr(*message),
            Stmt::Delete { target, .. } => self.resolve_expr(*target),
            Stmt::Switch {
                value,
                cases,
                default_body,
                ..
            } => {
                self.resolve_expr(*value);
                for (index, case) in cases.iter().enumerate() {
                    let scope = self.resolve_case(case);
                    self.bindings
                        .clause_scopes
                        .insert((stmt, SwitchClause::Case(index)), scope);
                }
                if let Some(default_body) = default_body {
                    let scope = self.in_block(|resolver| {
                        for &body_stmt in default_body {
                            resolver.resolve_stmt(body_stmt);
                        }
                    });
                    self.bindings
                        .clause_scopes
                        .insert((stmt, SwitchClause::Default), scope);
                }
            }
            Stmt::Expr { expr, .. } => self.resolve_expr(*expr),
            Stmt::Var { var, .. } => {
                // The initializer cannot see the variable it initializes
                if let Some(named) = program.symbol(*var).as_named_value() {
                    self.resolve_named_value(named);
                }
                self.declare(*var);
            }
        }
    }

    /// Resolves the case values, then the body in its own scope
    fn resolve_case(&mut self, case: &'prog Case) -> ScopeId {
        for &value in &case.values {
            self.resolve_expr(value);
        }
        let scope = self.in_block(|resolver| {
            for &stmt in &case.body {
                resolver.resolve_stmt(stmt);
            }
        });
        if let Some(fallthrough) = case.fallthrough {
            self.resolve_expr(fallthrough);
        }
        scope
    }

    fn resolve_expr(&mut self, expr: ExprId) {
        let program = self.program;
        match program.expr(expr) {
            Expr::Literal { .. } | Expr::GotoDefault { .. } => {}
            Expr::SymbolRef { reference, line } => self.resolve_reference(expr, *reference, *line),
            Expr::Unary { operand, .. } => self.resolve_expr(*operand),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(*left);
                self.resolve_expr(*right);
            }
            Expr::Conditional {
                cond,
                on_true,
                on_false,
                ..
            } => {
                self.resolve_expr(*cond);
                self.resolve_expr(*on_true);
                self.resolve_expr(*on_false);
            }
            Expr::Member {
                object,
                member,
                line,
            } => {
                self.resolve_expr(*object);
                self.resolve_member(expr, *object, *member, *line);
            }
            Expr::Collection { items, .. } => {
                for &item in items {
                    self.resolve_expr(item);
                }
            }
        }
    }

    /// Declaration an already visited reference or member expression binds to
    fn bound(&self, expr: ExprId) -> Option<SymbolId> {
        let reference = self.program.expr(expr).as_reference()?;
        reference
            .target()
            .or_else(|| self.bindings.references.get(&expr).copied())
    }

    /// Type named by the declared type of a value
    ///
    /// Falls back to the global scope when the type expression has not been
    /// visited yet, as for a field of a class resolved later.
    fn declared_type(&self, named: &NamedValue) -> Option<SymbolId> {
        self.bound(named.ty).or_else(|| {
            let reference = self.program.expr(named.ty).as_reference()?;
            self.scopes
                .lookup_local(self.scopes.global(), reference.name())
        })
    }

    fn member_owner(&self, object: ExprId) -> MemberOwner {
        let program = self.program;
        let Some(target) = self.bound(object) else {
            return if program.expr(object).as_reference().is_some() {
                MemberOwner::Unknown
            } else {
                MemberOwner::Nothing("an expression".to_owned())
            };
        };
        let symbol = program.symbol(target);
        let name = program.symbol_name(target);
        match &symbol.kind {
            SymbolKind::Class(_) | SymbolKind::Enum(_) => MemberOwner::Type(target),
            SymbolKind::Var(_) | SymbolKind::Field(_) | SymbolKind::Const(_) => {
                let ty = symbol
                    .as_named_value()
                    .and_then(|named| self.declared_type(named));
                match ty {
                    Some(ty) if program.symbol(ty).scope().is_some() => MemberOwner::Type(ty),
                    Some(ty) => MemberOwner::Nothing(format!(
                        "`{name}` of type `{}`",
                        program.symbol_name(ty)
                    )),
                    None => MemberOwner::Unknown,
                }
            }
            SymbolKind::Builtin(_)
            | SymbolKind::Method(_)
            | SymbolKind::Constructor(_) => {
                MemberOwner::Nothing(format!("{} `{name}`", symbol.kind_name()))
            }
        }
    }

    /// `owner` followed by its base classes, each at most once
    fn type_chain(&self, owner: SymbolId) -> Vec<SymbolId> {
        let mut chain = vec![owner];
        let mut seen = FxHashSet::default();
        seen.insert(owner);
        let mut current = owner;
        while let Some(base) = self.base_of(current) {
            if !seen.insert(base) {
                break;
            }
            chain.push(base);
            current = base;
        }
        chain
    }

    /// Binds `object.member` by looking the member up in the selected type
    ///
    /// Inherited class members are found through the base classes.
    fn resolve_member(&mut self, expr: ExprId, object: ExprId, member: Reference, line: Line) {
        if member.is_resolved() {
            return;
        }
        let program = self.program;
        let name = member.name();
        let owner = match self.member_owner(object) {
            MemberOwner::Type(owner) => owner,
            MemberOwner::Unknown => return,
            MemberOwner::Nothing(what) => {
                self.report(ResolveError::NoMembers {
                    name: program.name(name).to_owned(),
                    object: what,
                    line,
                });
                return;
            }
        };

        let scopes: Vec<ScopeId> = self
            .type_chain(owner)
            .into_iter()
            .filter_map(|ty| program.symbol(ty).scope())
            .collect();
        let found = scopes
            .iter()
            .find_map(|scope| self.scopes.lookup_local(*scope, name));
        if let Some(target) = found {
            trace!(
                owner = program.symbol_name(owner),
                member = program.name(name),
                line = line.get(),
                "bound member"
            );
            self.bindings.references.insert(expr, target);
            return;
        }

        let members: Vec<&str> = scopes
            .iter()
            .flat_map(|scope| self.scopes.get(*scope).names())
            .map(|candidate| program.name(candidate))
            .collect();
        let suggestions = compute_suggestions(
            program.name(name),
            members,
            self.options.max_suggestion_distance,
            self.options.max_suggestions,
        );
        let help = suggestion_help(&suggestions);
        self.report(ResolveError::UnresolvedMember {
            owner: program.symbol_name(owner).to_owned(),
            name: program.name(name).to_owned(),
            line,
            suggestions,
            help,
        });
    }

    fn resolve_reference(&mut self, expr: ExprId, reference: Reference, line: Line) {
        if reference.is_resolved() {
            return;
        }
        let program = self.program;
        let name = reference.name();
        if let Some(target) = self.scopes.lookup(self.current_scope, name) {
            trace!(
                name = program.name(name),
                line = line.get(),
                target_line = program.symbol(target).line.get(),
                "bound reference"
            );
            self.bindings.references.insert(expr, target);
            return;
        }

        let visible = self.scopes.visible_names(self.current_scope);
        let suggestions = compute_suggestions(
            program.name(name),
            visible.iter().map(|candidate| program.name(*candidate)),
            self.options.max_suggestion_distance,
            self.options.max_suggestions,
        );
        let help = suggestion_help(&suggestions);
        self.report(ResolveError::UnresolvedIdentifier {
            name: program.name(name).to_owned(),
            line,
            suggestions,
            help,
        });
    }
}
