use crate::parser::ast::Stmt;
use crate::tests::check_source;
use crate::types::{TypeRegistry, BOOL, INT64, VOID};

#[test]
fn registry_seeds_the_primitive_types() {
    let registry = TypeRegistry::default();

    assert_eq!(registry.find("bool"), Some(BOOL));
    assert_eq!(registry.find("int64"), Some(INT64));
    assert_eq!(registry.find("void"), Some(VOID));
    assert_eq!(registry.get(BOOL).size, 1);
    assert_eq!(registry.get(INT64).size, 8);
    assert_eq!(registry.get(VOID).size, 0);
}

#[test]
fn registry_is_extensible_by_name() {
    let mut registry = TypeRegistry::default();
    let idx = registry.add("int32", 4);

    assert_eq!(idx, registry.len() - 1);
    assert_eq!(registry.find("int32"), Some(idx));
    assert_eq!(registry.get(idx).name, "int32");
}

#[test]
fn declaration_type_mismatch_is_an_error() {
    if check_source("{ var x: int64 = true; }").is_ok() {
        panic!("A declaration whose initializer disagrees with its type should not check.");
    }
}

#[test]
fn operand_type_mismatch_is_an_error() {
    if check_source("{ print(1 + true); }").is_ok() {
        panic!("Adding an integer and a boolean should not check.");
    }
}

#[test]
fn non_boolean_condition_is_an_error() {
    if check_source("{ if 3 { } }").is_ok() {
        panic!("An integer if-condition should not check.");
    }
}

#[test]
fn arithmetic_requires_integers() {
    if check_source("{ print(true + false); }").is_ok() {
        panic!("Adding booleans should not check.");
    }
}

#[test]
fn logical_operators_accept_both_primitive_types() {
    check_source("{ print(true && false, 1 & 2, true ^^ false, 3 | 4); }")
        .expect("Logical and bitwise operators accept bool and int64.");
}

#[test]
fn comparisons_yield_booleans() {
    let (program, ..) = check_source("{ var b: bool = 1 < 2; }").expect("Program should check.");

    match &program.body[0] {
        Stmt::Declaration(decl) => {
            assert_eq!(decl.type_idx, Some(BOOL));
            assert_eq!(decl.init.as_ref().unwrap().type_idx(), Some(BOOL));
        }
        _ => panic!("Expected a declaration."),
    }
}

#[test]
fn comparing_booleans_for_order_is_an_error() {
    if check_source("{ print(true < false); }").is_ok() {
        panic!("Ordering comparisons are only defined for integers.");
    }
}

#[test]
fn equality_works_on_booleans() {
    check_source("{ print(true == false, 1 != 2); }").expect("Equality accepts both types.");
}

#[test]
fn declaration_adopts_initializer_type() {
    let (program, ..) = check_source("{ var x = 5; }").expect("Program should check.");

    match &program.body[0] {
        Stmt::Declaration(decl) => assert_eq!(decl.type_idx, Some(INT64)),
        _ => panic!("Expected a declaration."),
    }
}

#[test]
fn declaration_without_type_or_initializer_is_an_error() {
    if check_source("{ var x; }").is_ok() {
        panic!("A declaration with nothing to infer from should not check.");
    }
}

#[test]
fn unknown_type_name_is_an_error() {
    if check_source("{ var x: float = 1; }").is_ok() {
        panic!("An unknown type name should not check.");
    }
}

#[test]
fn unknown_variable_is_an_error() {
    if check_source("{ print(x); }").is_ok() {
        panic!("An undeclared variable should not check.");
    }
}

#[test]
fn use_before_declaration_is_an_error() {
    if check_source("{ print(x); var x: int64; }").is_ok() {
        panic!("A variable used before its declaration should not check.");
    }
}

#[test]
fn cast_arity_is_checked() {
    if check_source("{ print(int64(true, false)); }").is_ok() {
        panic!("A cast with two arguments should not check.");
    }
}

#[test]
fn cast_operand_types_are_checked() {
    if check_source("{ print(int64(1)); }").is_ok() {
        panic!("int64() converts from bool only.");
    }
    if check_source("{ print(bool(true)); }").is_ok() {
        panic!("bool() converts from int64 only.");
    }
}

#[test]
fn casts_produce_the_target_type() {
    check_source("{ var n: int64 = int64(true); var b: bool = bool(4); }")
        .expect("Casts should produce their target type.");
}

#[test]
fn unknown_function_is_an_error() {
    if check_source("{ launch(1); }").is_ok() {
        panic!("An unknown function should not check.");
    }
}

#[test]
fn assignment_operators_are_rejected() {
    if check_source("{ var x: int64 = 1; x += 2; }").is_ok() {
        panic!("Assignment operators have no lowering and should not check.");
    }
}

#[test]
fn unary_legality_follows_operand_type() {
    check_source("{ print(-5, ~5, !true); }").expect("Legal unary operators should check.");

    if check_source("{ print(!1); }").is_ok() {
        panic!("Logical not is only defined for booleans.");
    }
    if check_source("{ print(-true); }").is_ok() {
        panic!("Negation is only defined for integers.");
    }
}

#[test]
fn variable_offsets_accumulate_by_size() {
    let (_, _, symbols) =
        check_source("{ var a: int64; var b: bool; var c: int64; }").expect("Program should check.");

    assert_eq!(symbols.len(), 3);
    assert_eq!(symbols.resolve("a").unwrap().offset, 0);
    assert_eq!(symbols.resolve("b").unwrap().offset, 8);
    assert_eq!(symbols.resolve("c").unwrap().offset, 9);
    assert_eq!(symbols.offset(), 17);
}

#[test]
fn printing_void_is_an_error() {
    if check_source("{ print(print(1)); }").is_ok() {
        panic!("Printing a void value should not check.");
    }
}
