use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::environment::prelude::Value;
use crate::lexer::prelude::{Token, TokenKind};
use crate::parser::prelude::parse_source;
use crate::utils::prelude::{SrcSpan, VectorOutputEmitterIO};
use super::prelude::{Interpreter, RuntimeError, RuntimeErrorType};

fn interpreter() -> (Interpreter, VectorOutputEmitterIO) {
    let output = VectorOutputEmitterIO::new();

    (Interpreter::new(Rc::new(output.clone())), output)
}

fn run(interpreter: &mut Interpreter, src: &str) -> Result<(), RuntimeError> {
    let parsed = parse_source(src);
    assert!(!parsed.has_errors(), "{:?} {:?}", parsed.errors, parsed.lex_errors);

    interpreter.interpret(&parsed.statements)
}

/// Output of a program that must finish without errors.
fn output_of(src: &str) -> String {
    let (mut interpreter, output) = interpreter();

    if let Err(err) = run(&mut interpreter, src) {
        panic!("unexpected runtime error: {err}");
    }

    output.take()
}

fn error_of(src: &str) -> (RuntimeError, String) {
    let (mut interpreter, output) = interpreter();

    match run(&mut interpreter, src) {
        Ok(()) => panic!("expected a runtime error"),
        Err(err) => (err, output.take()),
    }
}

fn global(interpreter: &Interpreter, name: &str) -> Result<Value, RuntimeError> {
    let name = Token::new(TokenKind::Ident, name, 1, SrcSpan::default());

    interpreter.globals.borrow().get(&name)
}

#[test]
fn test_assignment_is_an_expression() -> Result<(), RuntimeError> {
    let (mut interpreter, output) = interpreter();

    run(&mut interpreter, "var a = 1; print a = 2;")?;

    assert_eq!(output.take(), "2\n");
    assert_eq!(global(&interpreter, "a")?, Value::Integer { value: 2 });

    Ok(())
}

#[test]
fn test_function_call() {
    assert_eq!(output_of("fun add(x, y) { return x + y; } print add(2, 3);"), "5\n");
}

#[test]
fn test_redeclaration_is_an_error() {
    let (err, _) = error_of("var x = 1; var x = 2;");

    assert_eq!(err.error, RuntimeErrorType::AlreadyInUse { name: "x".into() });
    assert_eq!(err.to_string(), "identifier 'x' is already in use.\n[line 1]");
}

#[test]
fn test_shadowing_in_block() -> Result<(), RuntimeError> {
    let (mut interpreter, output) = interpreter();

    run(&mut interpreter, "var x = 1; { var x = 2; print x; } print x;")?;

    assert_eq!(output.take(), "2\n1\n");
    assert_eq!(global(&interpreter, "x")?, Value::Integer { value: 1 });

    Ok(())
}

#[test]
fn test_closure_per_iteration() {
    let src = r#"
        var first;
        var second;

        for (var i = 0; i < 2; i = i + 1) {
            var j = i;
            fun show() { println(j); }

            if (i == 0) first = show; else second = show;
        }

        first();
        second();
    "#;

    assert_eq!(output_of(src), "0\n1\n");
}

#[test]
fn test_closure_keeps_its_scope() {
    let src = r#"
        fun counter() {
            var count = 0;
            fun next() { count++; return count; }
            return next;
        }

        var a = counter();
        var b = counter();
        a(); a();
        println(a(), " ", b());
    "#;

    assert_eq!(output_of(src), "3 1\n");
}

#[test]
fn test_recursion() {
    let src = r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(15);
    "#;

    assert_eq!(output_of(src), "610\n");
}

#[test]
fn test_in_hex() {
    assert_eq!(output_of("inHex('DE AD BE EF');"), "DEADBEEF\n");
    assert_eq!(output_of("inHex(255, 10);"), "FF0A\n");
    assert_eq!(output_of("inHex();"), "\n");

    let (err, output) = error_of("inHex(\"text\");");
    assert_eq!(err.error, RuntimeErrorType::InvalidHexArgument);
    assert_eq!(output, "");
}

#[test]
fn test_print_natives() {
    assert_eq!(output_of("print(1, \"a\", nil); println(true, 'ab');"), "1aniltrue'AB'\n");
    assert_eq!(output_of("println(clock);"), "<native fn clock>\n");
    assert_eq!(output_of("fun f() {} println(f);"), "<fn f>\n");
}

#[test]
fn test_clock() -> Result<(), RuntimeError> {
    let (mut interpreter, _) = interpreter();

    run(&mut interpreter, "var now = clock();")?;

    match global(&interpreter, "now")? {
        Value::Integer { value } => assert!(value > 0),
        other => panic!("expected integer, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_arity_mismatch() {
    let (err, _) = error_of("fun f(a, b) {}\nf(1);");

    assert_eq!(err.error, RuntimeErrorType::ArityMismatch { expected: 2, got: 1 });
    assert_eq!(err.to_string(), "Expected 2 arguments but got 1.\n[line 2]");

    let (err, _) = error_of("clock(1);");
    assert_eq!(err.error, RuntimeErrorType::ArityMismatch { expected: 0, got: 1 });
}

#[test]
fn test_not_callable() {
    let (err, _) = error_of("var a = 1; a();");

    assert_eq!(err.to_string(), "Can only call functions and classes.\n[line 1]");
}

#[test]
fn test_duplicate_parameters() {
    let (err, _) = error_of("fun f(a, a) {} f(1, 2);");

    assert_eq!(err.error, RuntimeErrorType::AlreadyInUse { name: "a".into() });
}

#[test]
fn test_arithmetic() {
    assert_eq!(output_of("print 1 + 2 * 3 - 4 / 2;"), "5\n");
    assert_eq!(output_of("print 7 / 2; print -7 / 2;"), "3\n-3\n");
    assert_eq!(output_of("print -(1 - 3);"), "2\n");
    assert_eq!(output_of("print \"foo\" + \"bar\";"), "foobar\n");
    assert_eq!(output_of("print 0x10 + 1;"), "17\n");
}

#[test]
fn test_arithmetic_errors() {
    let (err, _) = error_of("print 1 / 0;");
    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);

    let (err, _) = error_of("print 9223372036854775807 + 1;");
    assert_eq!(err.error, RuntimeErrorType::IntegerOverflow);

    let (err, _) = error_of("print 1 + \"a\";");
    assert_eq!(err.error, RuntimeErrorType::OperandsMustBeNumbersOrStrings);

    let (err, _) = error_of("print \"a\" < \"b\";");
    assert_eq!(err.error, RuntimeErrorType::OperandsMustBeNumbers);

    let (err, _) = error_of("print -\"a\";");
    assert_eq!(err.error, RuntimeErrorType::OperandMustBeNumber);
}

#[test]
fn test_comparison_and_equality() {
    assert_eq!(
        output_of("print 1 < 2; print 2 <= 1; print 3 > 2; print 3 >= 3;"),
        "true\nfalse\ntrue\ntrue\n"
    );
    assert_eq!(
        output_of("print nil == nil; print nil == false; print 1 == 1; print \"a\" != \"a\"; print 'AB' == 'ab';"),
        "true\nfalse\ntrue\nfalse\ntrue\n"
    );
}

#[test]
fn test_truthiness() {
    assert_eq!(
        output_of("print !nil; print !false; print !0; print !\"\";"),
        "true\ntrue\nfalse\nfalse\n"
    );
    assert_eq!(output_of("if (0) print \"yes\"; else print \"no\";"), "yes\n");
}

#[test]
fn test_short_circuit() {
    let src = r#"
        fun loud(v) { println("called"); return v; }
        print nil and loud(1);
        print 1 or loud(2);
        print nil or loud(3);
    "#;

    assert_eq!(output_of(src), "nil\n1\ncalled\n3\n");
}

#[test]
fn test_increment() -> Result<(), RuntimeError> {
    let (mut interpreter, output) = interpreter();

    run(&mut interpreter, "var i = 1; print i++; print i--; i--;")?;

    assert_eq!(output.take(), "2\n1\n");
    assert_eq!(global(&interpreter, "i")?, Value::Integer { value: 0 });

    let (err, _) = error_of("var s = \"a\"; s++;");
    assert_eq!(err.error, RuntimeErrorType::OperandMustBeInteger);

    Ok(())
}

#[test]
fn test_while_and_for() {
    assert_eq!(output_of("var i = 0; while (i < 3) { print i; i = i + 1; }"), "0\n1\n2\n");
    assert_eq!(output_of("for (var i = 3; i > 0; i--) print(i);"), "321");
}

#[test]
fn test_return_unwinds_loops() {
    let src = r#"
        fun find() {
            for (var i = 0; i < 10; i++) {
                if (i == 4) return i;
            }
            return -1;
        }
        fun nothing() { var a = 1; }
        print find();
        print nothing();
    "#;

    assert_eq!(output_of(src), "4\nnil\n");
}

#[test]
fn test_environment_restored_after_return() {
    let src = r#"
        var x = "global";
        fun f() { var x = "local"; { return x; } }
        print f();
        print x;
    "#;

    assert_eq!(output_of(src), "local\nglobal\n");
}

#[test]
fn test_top_level_return_stops_run() {
    assert_eq!(output_of("print 1; { return; } print 2;"), "1\n");
}

#[test]
fn test_runtime_error_stops_run() {
    let (err, output) = error_of("print 1;\nprint missing;\nprint 2;");

    assert_eq!(output, "1\n");
    assert_eq!(err.to_string(), "Undefined variable 'missing'.\n[line 2]");
}

#[test]
fn test_error_restores_global_scope() -> Result<(), RuntimeError> {
    let (mut interpreter, output) = interpreter();

    assert!(run(&mut interpreter, "{ var inner = 1; missing; }").is_err());

    run(&mut interpreter, "var inner = 2; print inner;")?;

    assert_eq!(output.take(), "2\n");

    Ok(())
}

/// Deep recursion needs more native stack than the default test thread has.
fn with_large_stack<F: FnOnce() + Send + 'static>(test: F) {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(test)
        .expect("spawn test thread")
        .join()
        .expect("test thread panicked");
}

#[test]
fn test_deep_recursion_is_a_runtime_error() {
    with_large_stack(|| {
        let src = r#"
            fun depth(n) { if (n == 0) return 0; return depth(n - 1) + 1; }
            print depth(200);
            print depth(100000);
        "#;

        let (err, output) = error_of(src);

        assert_eq!(output, "200\n");
        assert_eq!(err.error, RuntimeErrorType::StackOverflow);
        assert_eq!(err.to_string(), "Stack overflow.\n[line 2]");
    });
}

#[test]
fn test_call_depth_resets_after_error() {
    with_large_stack(|| {
        let (mut interpreter, output) = interpreter();
        let src = "fun down(n) { if (n == 0) return 0; return down(n - 1); }";

        assert!(run(&mut interpreter, src).is_ok());
        assert!(run(&mut interpreter, "down(100000);").is_err());
        assert!(run(&mut interpreter, "print down(250);").is_ok());

        assert_eq!(output.take(), "0\n");
    });
}
