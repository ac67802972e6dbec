use crate::bytecode::{Code, OpCode};
use crate::errors::RuntimeErrorType;
use crate::tests::run_source;
use crate::virtual_machine::VirtualMachine;

/// Executes a hand-assembled program and captures its output.
fn run_code(code: Code) -> (String, Result<(), crate::virtual_machine::RuntimeError>) {
    let mut vm = VirtualMachine::with_output(code, Vec::new());
    let result = vm.run();
    let output = String::from_utf8(vm.into_output()).expect("Printed output is UTF-8.");
    (output, result)
}

#[test]
fn precedence_scenarios_print_expected_values() {
    assert_eq!(run_source("{ print(2 + 3 * 4); }").0, "14\n");
    assert_eq!(run_source("{ print((2 + 3) * 4); }").0, "20\n");
    assert_eq!(run_source("{ print(10 - 4 - 3); }").0, "3\n");
    assert_eq!(run_source("{ print(120 / 40 / 2 + 59); }").0, "60\n");
}

#[test]
fn variables_round_trip_through_the_variable_area() {
    assert_eq!(
        run_source("{ var x: int64 = 7; var y: int64 = 5; print(x * y + 1); }").0,
        "36\n"
    );
    assert_eq!(run_source("{ var x: int64 = 42; print(x); }").0, "42\n");
    assert_eq!(run_source("{ var b: bool = true; print(b); }").0, "true\n");
    assert_eq!(run_source("{ var z: int64; print(z); }").0, "0\n");
}

#[test]
fn if_branches_follow_the_condition() {
    assert_eq!(
        run_source("{ var b: bool = true; if b { print(1); } else { print(0); } }").0,
        "1\n"
    );
    assert_eq!(
        run_source("{ var n: int64 = 0; if bool(n) { print(1); } else { print(2); } }").0,
        "2\n"
    );
    assert_eq!(
        run_source("{ if 1 > 2 { print(1); } else if 1 == 1 { print(2); } else { print(3); } }").0,
        "2\n"
    );
    // An if without an else just falls through.
    assert_eq!(run_source("{ if false { print(1); } print(9); }").0, "9\n");
}

#[test]
fn unary_operators_evaluate() {
    assert_eq!(run_source("{ print(-(2 + 3)); }").0, "-5\n");
    assert_eq!(run_source("{ print(+7); }").0, "7\n");
    assert_eq!(run_source("{ print(~0); }").0, "-1\n");
    assert_eq!(run_source("{ print(!false); }").0, "true\n");
}

#[test]
fn logical_and_equality_operators_evaluate() {
    assert_eq!(run_source("{ print(true && false); }").0, "false\n");
    assert_eq!(run_source("{ print(true ^^ false); }").0, "true\n");
    assert_eq!(run_source("{ print(6 & 3, 6 | 3, 6 ^ 3); }").0, "2\n7\n5\n");
    assert_eq!(run_source("{ print(1 == 1, 1 != 1); }").0, "true\nfalse\n");
}

#[test]
fn casts_evaluate() {
    assert_eq!(run_source("{ print(int64(true), int64(false)); }").0, "1\n0\n");
    assert_eq!(run_source("{ print(bool(0), bool(-3)); }").0, "false\ntrue\n");
}

#[test]
fn modulo_and_division_truncate_toward_zero() {
    assert_eq!(run_source("{ print(7 / 2, -7 / 2, 7 % 3); }").0, "3\n-3\n1\n");
}

#[test]
fn statements_leave_the_stack_balanced() {
    let (_, result, depth) =
        run_source("{ var x: int64 = 1; if x == 1 { var y: bool = true; } else { print(0); } }");

    result.expect("Program should execute.");
    assert_eq!(depth, 0, "A program without prints leaves an empty operand stack.");
}

#[test]
fn print_keeps_its_operand_on_the_stack() {
    let (output, result, depth) = run_source("{ print(5); }");

    result.expect("Program should execute.");
    assert_eq!(output, "5\n");
    assert_eq!(depth, 1);
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let (_, result, _) = run_source("{ print(1 / 0); }");

    match result {
        Err(e) => assert_eq!(e.error, RuntimeErrorType::ZeroDivision),
        Ok(()) => panic!("Dividing by zero should abort execution."),
    }

    let (_, result, _) = run_source("{ print(1 % 0); }");
    assert!(result.is_err(), "Modulo by zero should abort execution.");
}

#[test]
fn hand_assembled_division_chain_executes() {
    let mut code = Code::new();
    code.push_op(OpCode::Int64Load);
    code.push_word(120);
    code.push_op(OpCode::Int64Load);
    code.push_word(40);
    code.push_op(OpCode::Int64Load);
    code.push_word(20);
    code.push_op(OpCode::Divide);
    code.push_op(OpCode::Divide);
    code.push_op(OpCode::Int64Load);
    code.push_word(59);
    code.push_op(OpCode::Add);
    code.push_op(OpCode::Print);

    let (output, result) = run_code(code);
    result.expect("Program should execute.");
    assert_eq!(output, "119\n");
}

#[test]
fn duplicate_and_swap_rearrange_the_stack() {
    let mut code = Code::new();
    code.push_op(OpCode::Int64Load);
    code.push_word(7);
    code.push_op(OpCode::Duplicate);
    code.push_op(OpCode::Add);
    code.push_op(OpCode::Print);

    let (output, result) = run_code(code);
    result.expect("Program should execute.");
    assert_eq!(output, "14\n");

    let mut code = Code::new();
    code.push_op(OpCode::Int64Load);
    code.push_word(1);
    code.push_op(OpCode::Int64Load);
    code.push_word(2);
    code.push_op(OpCode::Swap);
    code.push_op(OpCode::Print);

    let (output, result) = run_code(code);
    result.expect("Program should execute.");
    assert_eq!(output, "1\n");
}

#[test]
fn raw_pointers_print_as_their_offset() {
    let mut code = Code::new();
    code.push_op(OpCode::Int64Load);
    code.push_word(8);
    code.push_op(OpCode::StackPtrLoad);
    code.push_op(OpCode::Print);

    let (output, result) = run_code(code);
    result.expect("Program should execute.");
    assert_eq!(output, "8\n");
}

#[test]
fn out_of_range_pointer_is_a_runtime_error() {
    let mut code = Code::new();
    code.push_op(OpCode::Int64Load);
    code.push_word(70000);
    code.push_op(OpCode::StackPtrLoad);

    let (_, result) = run_code(code);
    match result {
        Err(e) => assert_eq!(e.error, RuntimeErrorType::SegmentationFault),
        Ok(()) => panic!("A pointer outside the variable area should abort execution."),
    }
}

#[test]
fn reading_past_the_variable_area_is_a_runtime_error() {
    // The offset itself is in range, but an 8-byte read through it is not.
    let mut code = Code::new();
    code.push_op(OpCode::Int64Load);
    code.push_word(65535);
    code.push_op(OpCode::StackPtrLoad);
    code.push_op(OpCode::Int64LoadFromAddress);

    let (_, result) = run_code(code);
    match result {
        Err(e) => assert_eq!(e.error, RuntimeErrorType::SegmentationFault),
        Ok(()) => panic!("A read past the end of the variable area should abort execution."),
    }
}

#[test]
fn stack_underflow_is_a_runtime_error() {
    let mut code = Code::new();
    code.push_op(OpCode::Add);

    let (_, result) = run_code(code);
    match result {
        Err(e) => assert_eq!(e.error, RuntimeErrorType::StackUnderflow),
        Ok(()) => panic!("Popping an empty stack should abort execution."),
    }
}

#[test]
fn unknown_opcode_is_a_runtime_error() {
    let mut code = Code::new();
    code.push_word(9999);

    let (_, result) = run_code(code);
    match result {
        Err(e) => assert_eq!(e.error, RuntimeErrorType::UnknownInstruction),
        Ok(()) => panic!("An unknown instruction word should abort execution."),
    }
}

#[test]
fn mismatched_store_tag_is_a_runtime_error() {
    // A boolean on the stack, stored through an integer store.
    let mut code = Code::new();
    code.push_op(OpCode::BoolLoad);
    code.push_word(1);
    code.push_op(OpCode::Int64Load);
    code.push_word(0);
    code.push_op(OpCode::StackPtrLoad);
    code.push_op(OpCode::Int64LoadIntoAddress);

    let (_, result) = run_code(code);
    match result {
        Err(e) => assert_eq!(e.error, RuntimeErrorType::TypeError),
        Ok(()) => panic!("A store whose value tag disagrees should abort execution."),
    }
}

#[test]
fn wrapping_arithmetic_wraps() {
    assert_eq!(
        run_source("{ print(9223372036854775807 + 1); }").0,
        "-9223372036854775808\n"
    );
}
