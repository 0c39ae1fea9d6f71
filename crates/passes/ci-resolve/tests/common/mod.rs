//! Terse builders for resolver test programs

#![allow(dead_code, reason = "each test file uses a different subset")]
#![allow(clippy::unwrap_used, reason = "fixtures are known to build")]

use ci_tree::{
    BinaryOp, Block, CallType, Case, ClassDecl, EnumDecl, Expr, ExprId, Line, LiteralValue,
    Member, Method, MethodBase, NamedValue, Program, Stmt, StmtId, Symbol, SymbolId, SymbolKind,
    Visibility,
};

/// Wraps a [`Program`] with one-line constructors for common nodes
pub struct Fixture {
    pub program: Program,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            program: Program::new(),
        }
    }

    pub fn class(&mut self, name: &str, line: u32, base: Option<&str>) -> SymbolId {
        let decl = ClassDecl {
            source_file: "test.ci".to_owned(),
            base_class: base.map(str::to_owned),
            ..ClassDecl::default()
        };
        self.program
            .declare_class(name, Line::new(line), decl)
            .unwrap()
    }

    pub fn enumeration(&mut self, name: &str, line: u32) -> SymbolId {
        let decl = EnumDecl {
            source_file: "test.ci".to_owned(),
            ..EnumDecl::default()
        };
        self.program
            .declare_enum(name, Line::new(line), decl)
            .unwrap()
    }

    pub fn field(&mut self, class: SymbolId, name: &str, ty: &str, line: u32) -> SymbolId {
        let ty = self.reference(ty, line);
        let symbol = Symbol::new(
            self.program.intern(name),
            Line::new(line),
            SymbolKind::Field(Member {
                visibility: Visibility::Private,
                value: NamedValue { ty, value: None },
            }),
        );
        self.program.add_member(class, symbol).unwrap()
    }

    pub fn constant(
        &mut self,
        owner: SymbolId,
        name: &str,
        ty: &str,
        value: ExprId,
        line: u32,
    ) -> SymbolId {
        let ty = self.reference(ty, line);
        let symbol = Symbol::new(
            self.program.intern(name),
            Line::new(line),
            SymbolKind::Const(Member {
                visibility: Visibility::Public,
                value: NamedValue {
                    ty,
                    value: Some(value),
                },
            }),
        );
        self.program.add_member(owner, symbol).unwrap()
    }

    /// A public void method; `params` are `(name, type)` pairs
    pub fn method(
        &mut self,
        class: SymbolId,
        name: &str,
        line: u32,
        params: &[(&str, &str)],
        body: Vec<StmtId>,
    ) -> SymbolId {
        let parameters = params
            .iter()
            .map(|(param, ty)| {
                let ty = self.reference(ty, line);
                self.program
                    .alloc_var(param, Line::new(line), NamedValue { ty, value: None })
            })
            .collect();
        let body = self.block(body, line);
        let symbol = Symbol::new(
            self.program.intern(name),
            Line::new(line),
            SymbolKind::Method(Method {
                base: MethodBase {
                    visibility: Visibility::Public,
                    body: Some(body),
                },
                return_type: None,
                call_type: CallType::Normal,
                is_mutator: false,
                parameters,
            }),
        );
        self.program.add_member(class, symbol).unwrap()
    }

    pub fn reference(&mut self, name: &str, line: u32) -> ExprId {
        self.program.reference(name, Line::new(line))
    }

    pub fn int(&mut self, value: i64, line: u32) -> ExprId {
        self.program.literal(LiteralValue::Int(value), Line::new(line))
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, line: u32) -> ExprId {
        self.program.alloc_expr(Expr::Binary {
            op,
            left,
            right,
            line: Line::new(line),
        })
    }

    pub fn boolean(&mut self, value: bool, line: u32) -> ExprId {
        self.program.literal(LiteralValue::Bool(value), Line::new(line))
    }

    pub fn member(&mut self, object: ExprId, name: &str, line: u32) -> ExprId {
        self.program.member(object, name, Line::new(line))
    }

    pub fn goto_default(&mut self, line: u32) -> ExprId {
        self.program.alloc_expr(Expr::GotoDefault {
            line: Line::new(line),
        })
    }

    pub fn var(&mut self, name: &str, ty: &str, value: Option<ExprId>, line: u32) -> StmtId {
        let ty = self.reference(ty, line);
        self.program
            .local(name, Line::new(line), NamedValue { ty, value })
    }

    pub fn block(&mut self, statements: Vec<StmtId>, line: u32) -> StmtId {
        self.program.alloc_stmt(Stmt::Block(Block {
            statements,
            line: Line::new(line),
        }))
    }

    pub fn expr_stmt(&mut self, expr: ExprId, line: u32) -> StmtId {
        self.program.alloc_stmt(Stmt::Expr {
            expr,
            line: Line::new(line),
        })
    }

    pub fn if_stmt(
        &mut self,
        cond: ExprId,
        on_true: StmtId,
        on_false: Option<StmtId>,
        line: u32,
    ) -> StmtId {
        self.program.alloc_stmt(Stmt::If {
            cond,
            on_true,
            on_false,
            line: Line::new(line),
        })
    }

    pub fn while_stmt(&mut self, cond: ExprId, body: StmtId, line: u32) -> StmtId {
        self.program.alloc_stmt(Stmt::While {
            cond,
            body,
            line: Line::new(line),
        })
    }

    pub fn do_while(&mut self, body: StmtId, cond: ExprId, line: u32) -> StmtId {
        self.program.alloc_stmt(Stmt::DoWhile {
            body,
            cond,
            line: Line::new(line),
        })
    }

    pub fn for_stmt(
        &mut self,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        advance: Option<ExprId>,
        body: StmtId,
        line: u32,
    ) -> StmtId {
        self.program.alloc_stmt(Stmt::For {
            init,
            cond,
            advance,
            body,
            line: Line::new(line),
        })
    }

    pub fn throw(&mut self, message: ExprId, line: u32) -> StmtId {
        self.program.alloc_stmt(Stmt::Throw {
            message,
            line: Line::new(line),
        })
    }

    pub fn delete(&mut self, target: ExprId, line: u32) -> StmtId {
        self.program.alloc_stmt(Stmt::Delete {
            target,
            line: Line::new(line),
        })
    }

    /// A public constructor whose body is a block at `line`
    pub fn constructor(&mut self, class: SymbolId, line: u32, body: Vec<StmtId>) -> SymbolId {
        let body = self.block(body, line);
        let base = MethodBase {
            visibility: Visibility::Public,
            body: Some(body),
        };
        self.program
            .set_constructor(class, Line::new(line), base)
            .unwrap()
    }

    pub fn destructor(&mut self, class: SymbolId, line: u32, statements: Vec<StmtId>) {
        let body = Block {
            statements,
            line: Line::new(line),
        };
        self.program.set_destructor(class, body).unwrap();
    }

    pub fn ret(&mut self, value: Option<ExprId>, line: u32) -> StmtId {
        self.program.alloc_stmt(Stmt::Return {
            value,
            line: Line::new(line),
        })
    }

    pub fn case(
        values: Vec<ExprId>,
        body: Vec<StmtId>,
        fallthrough: Option<ExprId>,
        line: u32,
    ) -> Case {
        Case {
            values,
            body,
            fallthrough,
            line: Line::new(line),
        }
    }

    pub fn switch(
        &mut self,
        value: ExprId,
        cases: Vec<Case>,
        default_body: Option<Vec<StmtId>>,
        line: u32,
    ) -> StmtId {
        self.program.alloc_stmt(Stmt::Switch {
            value,
            cases,
            default_body,
            line: Line::new(line),
        })
    }

    /// The cases of a switch statement
    pub fn cases_of(program: &Program, switch: StmtId) -> &[Case] {
        match program.stmt(switch) {
            Stmt::Switch { cases, .. } => cases,
            _ => &[],
        }
    }

    /// The statements of a method's body block
    pub fn body_of(&self, method: SymbolId) -> Vec<StmtId> {
        let body = self.program.symbol(method).as_method().unwrap().base.body;
        match body.map(|stmt| self.program.stmt(stmt)) {
            Some(Stmt::Block(block)) => block.statements.clone(),
            _ => Vec::new(),
        }
    }
}
