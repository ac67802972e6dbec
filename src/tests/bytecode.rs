use crate::bytecode::{Code, OpCode, CODE_MAGIC};
use crate::tests::compile_source;

#[test]
fn serialization_round_trips() {
    let (code, _) = compile_source(
        "{ var x: int64 = 3; if x > 1 { print(x); } else { print(-x); } }",
    )
    .expect("Program should compile.");

    let data = code.to_bytes();
    let restored = Code::from_bytes(&data).expect("Serialized program should load.");

    assert_eq!(code, restored);
}

#[test]
fn serialization_round_trips_an_empty_program() {
    let code = Code::new();
    let restored = Code::from_bytes(&code.to_bytes()).expect("Empty program should load.");

    assert!(restored.is_empty());
    assert!(restored.lookup_table.is_empty());
}

#[test]
fn header_starts_with_magic_and_version() {
    let data = Code::new().to_bytes();

    assert_eq!(&data[0..4], &CODE_MAGIC);
    assert_eq!(data.len(), 24);
}

#[test]
fn bad_magic_is_rejected() {
    let mut data = Code::new().to_bytes();
    data[0] = b'X';

    if Code::from_bytes(&data).is_ok() {
        panic!("A file without the magic bytes should not load.");
    }
}

#[test]
fn truncated_file_is_rejected() {
    let (code, _) = compile_source("{ print(1); }").expect("Program should compile.");
    let data = code.to_bytes();

    if Code::from_bytes(&data[..data.len() - 8]).is_ok() {
        panic!("A truncated file should not load.");
    }
}

#[test]
fn wrong_version_is_rejected() {
    let mut data = Code::new().to_bytes();
    data[4] = 99;

    if Code::from_bytes(&data).is_ok() {
        panic!("A file with an unsupported version should not load.");
    }
}

#[test]
fn disassembly_resolves_jump_targets() {
    let (code, _) = compile_source("{ if true { print(1); } else { print(2); } }")
        .expect("Program should compile.");

    let listing = code.disassemble();

    assert!(listing.contains("BOOL_LOAD 1"));
    assert!(listing.contains("NOT"));
    assert!(listing.contains("JUMP_IF slot 0 ->"));
    assert!(listing.contains("JUMP slot 1 ->"));
    assert!(listing.contains("PRINT"));
}

#[test]
fn disassembly_marks_unknown_words() {
    let mut code = Code::new();
    code.push_word(424242);

    assert!(code.disassemble().contains("???"));
}

#[test]
fn opcodes_decode_from_their_wire_value() {
    let mut code = Code::new();
    code.push_op(OpCode::BoolLoadIntoAddress);
    code.push_op(OpCode::Print);

    assert_eq!(code.get_op(0), Some(OpCode::BoolLoadIntoAddress));
    assert_eq!(code.get_op(1), Some(OpCode::Print));
}
