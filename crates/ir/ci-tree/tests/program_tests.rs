//! Building a program: declarations, member lists and scope rules

#![allow(clippy::unwrap_used, reason = "fixtures are known to build")]

use ci_tree::pretty_print::dump_program;
use ci_tree::{
    Bindings, Block, CallType, ClassDecl, EnumDecl, Expr, Line, LiteralValue, Member, Method,
    MethodBase, NamedValue, Program, Stmt, Symbol, SymbolKind, TreeError, Visibility,
};

fn field(program: &mut Program, name: &str, line: u32) -> Symbol {
    let ty = program.reference("int", Line::new(line));
    Symbol::new(
        program.intern(name),
        Line::new(line),
        SymbolKind::Field(Member {
            visibility: Visibility::Private,
            value: NamedValue { ty, value: None },
        }),
    )
}

fn constant(program: &mut Program, name: &str, value: i64, line: u32) -> Symbol {
    let ty = program.reference("int", Line::new(line));
    let value = program.literal(LiteralValue::Int(value), Line::new(line));
    Symbol::new(
        program.intern(name),
        Line::new(line),
        SymbolKind::Const(Member {
            visibility: Visibility::Public,
            value: NamedValue {
                ty,
                value: Some(value),
            },
        }),
    )
}

fn method(program: &mut Program, name: &str, line: u32) -> Symbol {
    let body = program.alloc_stmt(Stmt::Block(Block {
        statements: Vec::new(),
        line: Line::new(line),
    }));
    Symbol::new(
        program.intern(name),
        Line::new(line),
        SymbolKind::Method(Method {
            base: MethodBase {
                visibility: Visibility::Public,
                body: Some(body),
            },
            return_type: None,
            call_type: CallType::Normal,
            is_mutator: false,
            parameters: Vec::new(),
        }),
    )
}

#[test]
fn test_builtin_types_are_predeclared() {
    let program = Program::new();
    let global = program.global_scope();
    for keyword in ["bool", "byte", "int", "long", "float", "double", "string"] {
        let id = program.lookup(global, keyword).unwrap();
        assert!(matches!(program.symbol(id).kind, SymbolKind::Builtin(_)));
        assert!(program.symbol(id).is_type());
    }
    assert!(program.classes().is_empty());
    assert!(program.enums().is_empty());
}

#[test]
fn test_duplicate_type_is_rejected() {
    let mut program = Program::new();
    program
        .declare_class("Shape", Line::new(1), ClassDecl::default())
        .unwrap();
    let err = program
        .declare_enum("Shape", Line::new(9), EnumDecl::default())
        .unwrap_err();
    assert_eq!(
        err,
        TreeError::DuplicateDeclaration {
            name: "Shape".to_owned(),
            line: Line::new(9),
            previous: Line::new(1),
        }
    );
    assert_eq!(program.classes().len(), 1);
    assert!(program.enums().is_empty());
}

#[test]
fn test_builtin_name_cannot_be_redeclared() {
    let mut program = Program::new();
    let err = program
        .declare_class("int", Line::new(3), ClassDecl::default())
        .unwrap_err();
    assert!(matches!(err, TreeError::DuplicateDeclaration { .. }));
}

#[test]
fn test_members_keep_declaration_order() {
    let mut program = Program::new();
    let class = program
        .declare_class("Point", Line::new(1), ClassDecl::default())
        .unwrap();

    let first = field(&mut program, "a", 2);
    let second = field(&mut program, "b", 3);
    let again = field(&mut program, "a", 4);
    let a_id = program.add_member(class, first).unwrap();
    let b_id = program.add_member(class, second).unwrap();
    let err = program.add_member(class, again).unwrap_err();
    assert_eq!(err.line(), Line::new(4));

    let scope = program.symbol(class).scope().unwrap();
    let names: Vec<&str> = program
        .members(scope)
        .map(|id| program.symbol_name(id))
        .collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(program.lookup(scope, "a"), Some(a_id));
    assert_eq!(program.lookup(scope, "b"), Some(b_id));
    assert_eq!(program.symbol(class).as_class().unwrap().fields, [a_id, b_id]);
}

#[test]
fn test_class_members_are_sorted_into_lists() {
    let mut program = Program::new();
    let class = program
        .declare_class("Counter", Line::new(1), ClassDecl::default())
        .unwrap();
    let limit = constant(&mut program, "Limit", 10, 2);
    let count = field(&mut program, "count", 3);
    let bump = method(&mut program, "bump", 4);
    let limit = program.add_member(class, limit).unwrap();
    let count = program.add_member(class, count).unwrap();
    let bump = program.add_member(class, bump).unwrap();

    let class_type = program.symbol(class).as_class().unwrap();
    assert_eq!(class_type.consts, [limit]);
    assert_eq!(class_type.fields, [count]);
    assert_eq!(class_type.methods, [bump]);
}

#[test]
fn test_enum_accepts_only_constants() {
    let mut program = Program::new();
    let color = program
        .declare_enum("Color", Line::new(1), EnumDecl::default())
        .unwrap();
    let red = constant(&mut program, "Red", 1, 2);
    program.add_member(color, red).unwrap();

    let paint = method(&mut program, "paint", 3);
    let err = program.add_member(color, paint).unwrap_err();
    assert_eq!(
        err,
        TreeError::InvalidMember {
            owner: "Color".to_owned(),
            owner_kind: "enum",
            member_kind: "method",
            line: Line::new(3),
        }
    );
}

#[test]
fn test_members_need_a_type_owner() {
    let mut program = Program::new();
    let class = program
        .declare_class("Box", Line::new(1), ClassDecl::default())
        .unwrap();
    let inner = field(&mut program, "inner", 2);
    let inner = program.add_member(class, inner).unwrap();

    let nested = field(&mut program, "nested", 3);
    let err = program.add_member(inner, nested).unwrap_err();
    assert!(matches!(err, TreeError::NotAType { kind: "field", .. }));
}

#[test]
fn test_constructor_and_destructor_are_set_once() {
    let mut program = Program::new();
    let class = program
        .declare_class("File", Line::new(1), ClassDecl::default())
        .unwrap();
    let base = MethodBase {
        visibility: Visibility::Public,
        body: None,
    };
    let constructor = program
        .set_constructor(class, Line::new(2), base.clone())
        .unwrap();
    assert_eq!(program.symbol_name(constructor), "File");
    let scope = program.symbol(class).scope().unwrap();
    assert_eq!(program.members(scope).count(), 0);

    let second_constructor = program
        .set_constructor(class, Line::new(3), base)
        .unwrap_err();
    assert!(matches!(
        second_constructor,
        TreeError::ConstructorAlreadySet { .. }
    ));

    let body = Block {
        statements: Vec::new(),
        line: Line::new(4),
    };
    program.set_destructor(class, body.clone()).unwrap();
    let second_destructor = program.set_destructor(class, body).unwrap_err();
    assert_eq!(
        second_destructor,
        TreeError::DestructorAlreadySet {
            class: "File".to_owned(),
            line: Line::new(4),
        }
    );
}

#[test]
fn test_base_class_starts_unresolved() {
    let mut program = Program::new();
    let decl = ClassDecl {
        base_class: Some("Shape".to_owned()),
        ..ClassDecl::default()
    };
    let circle = program.declare_class("Circle", Line::new(5), decl).unwrap();
    let base = program.symbol(circle).as_class().unwrap().base_class.unwrap();
    assert!(!base.reference.is_resolved());
    assert_eq!(program.name(base.reference.name()), "Shape");
    assert_eq!(base.line, Line::new(5));
}

#[test]
fn test_incomplete_bindings_return_program_unchanged() {
    let mut program = Program::new();
    let class = program
        .declare_class("Counter", Line::new(1), ClassDecl::default())
        .unwrap();
    let count = field(&mut program, "count", 2);
    program.add_member(class, count).unwrap();
    let before = dump_program(&program);

    let unbound = program.into_resolved(Bindings::default()).unwrap_err();
    assert_eq!(
        unbound.errors,
        [TreeError::UnboundReference {
            name: "int".to_owned(),
            line: Line::new(2),
        }]
    );
    assert_eq!(dump_program(&unbound.program), before);
}

#[test]
fn test_complete_bindings_resolve_every_reference() {
    let mut program = Program::new();
    let class = program
        .declare_class("Counter", Line::new(1), ClassDecl::default())
        .unwrap();
    let count = field(&mut program, "count", 2);
    let count = program.add_member(class, count).unwrap();
    let int = program.lookup(program.global_scope(), "int").unwrap();

    let ty = program
        .symbol(count)
        .as_named_value()
        .map(|value| value.ty)
        .unwrap();
    let mut bindings = Bindings::default();
    bindings.references.insert(ty, int);

    let resolved = program.into_resolved(bindings).unwrap();
    assert_eq!(resolved.binding(ty), Some(int));
    assert!(resolved.exprs().all(|(_, expr)| match expr {
        Expr::SymbolRef { reference, .. } => reference.is_resolved(),
        _ => true,
    }));
}

#[test]
fn test_member_expressions_need_bindings() {
    let mut program = Program::new();
    let color = program
        .declare_enum("Color", Line::new(1), EnumDecl::default())
        .unwrap();
    let red = constant(&mut program, "Red", 1, 2);
    let red = program.add_member(color, red).unwrap();
    let int = program.lookup(program.global_scope(), "int").unwrap();
    let red_ty = program.symbol(red).as_named_value().unwrap().ty;
    let object = program.reference("Color", Line::new(4));
    let member = program.member(object, "Red", Line::new(4));

    let mut bindings = Bindings::default();
    bindings.references.insert(red_ty, int);
    bindings.references.insert(object, color);
    let unbound = program.into_resolved(bindings.clone()).unwrap_err();
    assert_eq!(
        unbound.errors,
        [TreeError::UnboundReference {
            name: "Red".to_owned(),
            line: Line::new(4),
        }]
    );

    bindings.references.insert(member, red);
    let resolved = unbound.program.into_resolved(bindings).unwrap();
    assert_eq!(resolved.binding(object), Some(color));
    assert_eq!(resolved.binding(member), Some(red));
}
