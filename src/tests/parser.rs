use crate::parser::ast::Expr;
use crate::tests::{first_expr, parse_source};

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(format!("{}", first_expr("a + b * c")), "(a + (b * c))");
    assert_eq!(format!("{}", first_expr("a * b + c")), "((a * b) + c)");
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq!(format!("{}", first_expr("a - b - c")), "((a - b) - c)");
    assert_eq!(format!("{}", first_expr("a / b / c")), "((a / b) / c)");
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(format!("{}", first_expr("(2 + 3) * 4")), "((2 + 3) * 4)");
}

#[test]
fn minus_in_prefix_position_is_unary() {
    assert_eq!(format!("{}", first_expr("-a * b")), "((-a) * b)");
    assert_eq!(format!("{}", first_expr("a - -b")), "(a - (-b))");
    assert_eq!(format!("{}", first_expr("--a")), "(-(-a))");
}

#[test]
fn comparison_binds_looser_than_arithmetic() {
    assert_eq!(
        format!("{}", first_expr("a + 1 < b * 2")),
        "((a + 1) < (b * 2))"
    );
}

#[test]
fn logical_operators_bind_loosest() {
    assert_eq!(
        format!("{}", first_expr("a == b && c != d")),
        "((a == b) && (c != d))"
    );
}

#[test]
fn call_arguments_are_separated_by_commas() {
    let expr = first_expr("print(1, 2 + 3)");

    match expr {
        Expr::Call(call) => {
            assert_eq!(call.name.lexeme, "print");
            assert_eq!(call.args.len(), 2);
            assert_eq!(format!("{}", call.args[1]), "(2 + 3)");
        }
        _ => panic!("Expected a function call."),
    }
}

#[test]
fn call_with_no_arguments() {
    match first_expr("print()") {
        Expr::Call(call) => assert!(call.args.is_empty()),
        _ => panic!("Expected a function call."),
    }
}

#[test]
fn nested_calls_parse() {
    assert_eq!(
        format!("{}", first_expr("int64(bool(1 + 2))")),
        "int64(bool((1 + 2)))"
    );
}

#[test]
fn do_parses_a_singleton_block() {
    let program = parse_source("{ if a do print(1); else do print(2); }")
        .expect("Program should parse.");

    assert_eq!(
        format!("{}", program),
        "{ if a { print(1); } else { print(2); } }"
    );
}

#[test]
fn else_if_chains_parse() {
    let src = "{ if a { print(1); } else if b { print(2); } else { print(3); } }";
    let program = parse_source(src).expect("Program should parse.");

    assert_eq!(format!("{}", program), src);
}

#[test]
fn pretty_print_then_reparse_is_idempotent() {
    let src = "{ var x: int64 = 7; var flip: bool; if x * 2 <= 10 { print(-x); } else do \
               flip; print(int64(true) + 1, x); }";

    let first = format!("{}", parse_source(src).expect("Program should parse."));
    let second = format!("{}", parse_source(&first).expect("Printed program should parse."));

    assert_eq!(first, second);
}

#[test]
fn unmatched_paren_is_an_error() {
    if parse_source("{ print(1 ; }").is_ok() {
        panic!("An unmatched '(' should not parse.");
    }
}

#[test]
fn dangling_operator_is_an_error() {
    if parse_source("{ 1 + ; }").is_ok() {
        panic!("A dangling operator should not parse.");
    }
}

#[test]
fn empty_expression_is_an_error() {
    if parse_source("{ ; }").is_ok() {
        panic!("An empty expression should not parse.");
    }
}

#[test]
fn trailing_comma_in_call_is_an_error() {
    if parse_source("{ print(1,); }").is_ok() {
        panic!("A trailing comma in an argument list should not parse.");
    }
}

#[test]
fn unexpected_eof_in_expression_is_an_error() {
    if parse_source("{ print(1 + ").is_ok() {
        panic!("A program that ends mid-expression should not parse.");
    }
}

#[test]
fn missing_semicolon_is_an_error() {
    if parse_source("{ print(1) }").is_ok() {
        panic!("A statement without ';' should not parse.");
    }
}

#[test]
fn declaration_forms_parse() {
    let src = "{ var a: int64; var b = 2; var c: bool = true; }";
    let program = parse_source(src).expect("Program should parse.");

    assert_eq!(format!("{}", program), src);
}
