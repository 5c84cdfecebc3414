use ippcode::instruction::opcode::Opcode;
use ippcode::instruction::operand::DataType;
use ippcode::parser::{ErrorKind, ParseError};

fn xml(source: &str) -> String {
    ippcode::parse_str(source).expect("parse failed").to_xml()
}

fn error(source: &str) -> ParseError {
    match ippcode::parse_str(source) {
        Ok(program) => panic!("expected an error, parsed {:?}", program),
        Err(e) => e,
    }
}

fn kind(source: &str) -> ErrorKind {
    error(source).kind
}

/// Instruction elements reduced to (order, opcode, [(type, text)]).
fn summary(source: &str) -> Vec<(String, String, Vec<(String, String)>)> {
    let program = ippcode::parse_str(source).expect("parse failed");
    let document = program.to_document();
    document
        .root
        .elements()
        .map(|inst| {
            let args = inst
                .elements()
                .map(|arg| (arg.attribute("type").unwrap().to_string(), arg.text()))
                .collect();
            (
                inst.attribute("order").unwrap().to_string(),
                inst.attribute("opcode").unwrap().to_string(),
                args,
            )
        })
        .collect()
}

#[test]
fn two_instruction_program() {
    assert_eq!(
        xml(".IPPcode22\nMOVE GF@x int@5\nWRITE GF@x\n"),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <program language=\"IPPcode22\">\n \
         <instruction order=\"1\" opcode=\"MOVE\">\n  \
         <arg1 type=\"var\">GF@x</arg1>\n  \
         <arg2 type=\"int\">5</arg2>\n \
         </instruction>\n \
         <instruction order=\"2\" opcode=\"WRITE\">\n  \
         <arg1 type=\"var\">GF@x</arg1>\n \
         </instruction>\n\
         </program>\n"
    );
}

#[test]
fn header_only_program() {
    assert_eq!(
        xml(".IPPcode22"),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<program language=\"IPPcode22\"/>\n"
    );
}

#[test]
fn zero_operand_instructions_self_close() {
    let out = xml(".IPPcode22\nCREATEFRAME\nPUSHFRAME\n");
    assert!(out.contains(" <instruction order=\"1\" opcode=\"CREATEFRAME\"/>\n"));
    assert!(out.contains(" <instruction order=\"2\" opcode=\"PUSHFRAME\"/>\n"));
}

#[test]
fn orders_are_gapless_across_blank_and_comment_lines() {
    let source = "\
# factorial-ish
.IPPcode22
DEFVAR GF@n   # counter

MOVE GF@n int@3
LABEL loop
    # body
SUB GF@n GF@n int@1
JUMPIFNEQ loop GF@n int@0
";
    let orders: Vec<String> = summary(source).into_iter().map(|(order, _, _)| order).collect();
    assert_eq!(orders, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn comment_does_not_change_output() {
    assert_eq!(
        xml(".IPPcode22\nADD GF@x int@1 int@2 # note\n"),
        xml(".IPPcode22\nADD GF@x int@1 int@2\n")
    );
}

#[test]
fn case_insensitive_header_and_opcodes() {
    assert_eq!(
        xml(".ippcode22\nwrite bool@TRUE\n"),
        xml(".IPPCODE22\nWrite bool@true\n")
    );
    let program = ippcode::parse_str(".IPPcode22\njumpifeq end nil@nil string@\n").unwrap();
    assert_eq!(program.instructions[0].opcode, Opcode::JumpIfEq);
}

#[test]
fn every_literal_kind() {
    let source = ".IPPcode22
PUSHS int@-42
PUSHS bool@FaLsE
PUSHS string@a\\065b
PUSHS nil@nil
PUSHS TF@tmp
READ LF@in string
CALL $fn
";
    let types: Vec<(String, String)> = summary(source)
        .into_iter()
        .flat_map(|(_, _, args)| args)
        .collect();
    let expected = [
        ("int", "-42"),
        ("bool", "false"),
        ("string", "a\\065b"),
        ("nil", "nil"),
        ("var", "TF@tmp"),
        ("var", "LF@in"),
        ("type", "string"),
        ("label", "$fn"),
    ];
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(t, v)| (t.to_string(), v.to_string()))
        .collect();
    assert_eq!(types, expected);
}

#[test]
fn data_types_on_the_program_model() {
    let program = ippcode::parse_str(".IPPcode22\nSTRLEN GF@len string@hello\n").unwrap();
    let inst = &program.instructions[0];
    assert_eq!(inst.order, 1);
    let types: Vec<DataType> = inst.arguments.iter().map(|a| a.operand.data_type()).collect();
    assert_eq!(types, vec![DataType::Var, DataType::String]);
}

#[test]
fn markup_in_strings_is_escaped() {
    let out = xml(".IPPcode22\nWRITE string@<b>&amp\n");
    assert!(out.contains("<arg1 type=\"string\">&lt;b&gt;&amp;amp</arg1>"), "{}", out);
}

#[test]
fn missing_or_wrong_header() {
    assert_eq!(kind(""), ErrorKind::Header);
    assert_eq!(kind("# nothing here\n\n"), ErrorKind::Header);
    assert_eq!(kind(".IPPcode21\nBREAK\n"), ErrorKind::Header);
    assert_eq!(kind("BREAK\n.IPPcode22\n"), ErrorKind::Header);
    assert_eq!(kind(".IPPcode22 BREAK\n"), ErrorKind::Header);
}

#[test]
fn unknown_opcode() {
    let e = error(".IPPcode22\nFOO GF@x\n");
    assert_eq!(e.kind, ErrorKind::Opcode);
    assert!(e.message.contains("FOO"));
    assert_eq!(e.exit_code(), 22);
}

#[test]
fn header_error_wins_over_later_problems() {
    assert_eq!(kind("FOO\n"), ErrorKind::Header);
}

#[test]
fn arity_is_exact_for_every_opcode() {
    for op in Opcode::ALL {
        let valid: Vec<&str> = op
            .signature()
            .iter()
            .map(|kind| match kind.as_str() {
                "var" => "GF@a",
                "symb" => "int@1",
                "label" => "lbl",
                _ => "int",
            })
            .collect();

        let exact = format!(".IPPcode22\n{} {}\n", op.name(), valid.join(" "));
        assert!(ippcode::parse_str(&exact).is_ok(), "{}", exact);

        let more = format!(".IPPcode22\n{} {} GF@extra\n", op.name(), valid.join(" "));
        assert_eq!(kind(&more), ErrorKind::Syntax, "{}", more);

        if !valid.is_empty() {
            let fewer = format!(".IPPcode22\n{} {}\n", op.name(), valid[1..].join(" "));
            assert_eq!(kind(&fewer), ErrorKind::Syntax, "{}", fewer);
        }
    }
}

#[test]
fn lexical_errors_are_syntax_errors() {
    for line in [
        "WRITE string@a\\999b",
        "WRITE string@a\\b",
        "DEFVAR LF@1foo",
        "WRITE int@0x10",
        "WRITE bool@1",
        "WRITE nil@null",
        "WRITE float@1.5",
        "MOVE int@1 int@2",
        "READ GF@x float",
        "JUMP 3rd",
        "LABEL GF@x",
        "WRITE unprefixed",
    ] {
        let source = format!(".IPPcode22\n{}\n", line);
        let e = error(&source);
        assert_eq!(e.kind, ErrorKind::Syntax, "{}", line);
        assert_eq!(e.exit_code(), 23);
    }
}

#[test]
fn failure_after_valid_lines_yields_no_program() {
    let result = ippcode::parse_str(".IPPcode22\nBREAK\nBREAK\nWRITE\n");
    assert!(result.is_err());
}

#[test]
fn diagnostics_carry_codes_and_notes() {
    let e = error(".IPPcode22\nMOVE GF@x\n");
    let diagnostic = e.to_diagnostic();
    assert_eq!(diagnostic.code.as_deref(), Some("E23"));
    assert_eq!(diagnostic.notes, vec!["usage: MOVE <var> <symb>".to_string()]);
    assert_eq!(diagnostic.labels[0].range, 11..20);
}
