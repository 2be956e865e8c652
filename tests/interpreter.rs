#[cfg(test)]
mod interpreter_tests {
    use lox_interpreter as lox;
    use pretty_assertions::assert_eq;

    use lox::diagnostics::Diagnostics;
    use lox::interpreter::Interpreter;
    use lox::parser::Parser;
    use lox::scanner::tokenize;
    use lox::session::Session;
    use lox::value::Value;

    /// Run `source` as one program; return what it printed and what went wrong.
    fn run(source: &str) -> (String, Diagnostics) {
        let mut session = Session::with_output(Vec::new());
        let diagnostics = session.run(source);
        let printed = String::from_utf8(session.into_output()).expect("utf-8 output");
        (printed, diagnostics)
    }

    /// Run a program that must finish without any diagnostics.
    fn output(source: &str) -> String {
        let (printed, diagnostics) = run(source);

        assert!(
            diagnostics.is_empty(),
            "unexpected errors: {:?}",
            diagnostics.errors().map(|e| e.to_string()).collect::<Vec<_>>()
        );

        printed
    }

    /// Run a program that must stop with exactly one runtime error.
    fn runtime_error(source: &str) -> (String, String) {
        let (printed, diagnostics) = run(source);

        assert!(diagnostics.had_runtime_error());
        assert!(!diagnostics.had_error());
        assert_eq!(diagnostics.len(), 1);

        let message = diagnostics
            .errors()
            .next()
            .map(|e| e.to_string())
            .unwrap_or_default();
        (printed, message)
    }

    fn evaluate(source: &str) -> Value {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, &mut diagnostics);
        let expr = Parser::new(tokens, &mut diagnostics)
            .parse_expression()
            .expect("valid expression");

        Interpreter::with_output(Vec::new())
            .evaluate(&expr)
            .expect("evaluates")
    }

    // ── scoping ────────────────────────────────────────────────────────────

    #[test]
    fn test_block_shadowing_round_trip() {
        assert_eq!(
            output("var a = 1; { var a = 2; print a; } print a;"),
            "2\n1\n"
        );
    }

    #[test]
    fn test_nested_scopes() {
        let source = r#"
            var a = "global a";
            var b = "global b";
            var c = "global c";
            {
              var a = "outer a";
              var b = "outer b";
              {
                var a = "inner a";
                print a;
                print b;
                print c;
              }
              print a;
              print b;
              print c;
            }
            print a;
            print b;
            print c;
        "#;

        assert_eq!(
            output(source),
            "inner a\nouter b\nglobal c\nouter a\nouter b\nglobal c\nglobal a\nglobal b\nglobal c\n"
        );
    }

    #[test]
    fn test_assignment_reaches_enclosing_scope() {
        assert_eq!(output("var a = 1; { a = a + 1; } print a;"), "2\n");
    }

    #[test]
    fn test_closure_binds_at_declaration_not_call() {
        let source = r#"
            var a = "global";
            {
              fun showA() {
                print a;
              }

              showA();
              var a = "block";
              showA();
            }
        "#;

        assert_eq!(output(source), "global\nglobal\n");
    }

    // ── closures ───────────────────────────────────────────────────────────

    #[test]
    fn test_independent_counters() {
        let source = r#"
            fun makeCounter() {
              var count = 0;
              fun counter() {
                count = count + 1;
                return count;
              }
              return counter;
            }

            var first = makeCounter();
            var second = makeCounter();
            print first();
            print first();
            print second();
            print first();
            print second();
        "#;

        assert_eq!(output(source), "1\n2\n1\n3\n2\n");
    }

    #[test]
    fn test_closures_share_captured_environment() {
        let source = r#"
            var get;
            var set;
            {
              var value = "before";
              fun g() { return value; }
              fun s(v) { value = v; }
              get = g;
              set = s;
            }
            print get();
            set("after");
            print get();
        "#;

        assert_eq!(output(source), "before\nafter\n");
    }

    // ── control flow ───────────────────────────────────────────────────────

    #[test]
    fn test_short_circuit() {
        let source = r#"
            fun sideEffect() {
              print "evaluated";
              return true;
            }
            print false and sideEffect();
            print true or sideEffect();
        "#;

        assert_eq!(output(source), "false\ntrue\n");
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            output(r#"print nil or "yes"; print "left" or "right"; print 1 and 2; print nil and 2;"#),
            "yes\nleft\n2\nnil\n"
        );
    }

    #[test]
    fn test_truthiness() {
        let source = r#"
            if (0) print "zero is truthy";
            if ("") print "empty string is truthy";
            if (nil) print "unreachable"; else print "nil is falsy";
            if (false) print "unreachable"; else print "false is falsy";
            print !nil;
            print !0;
        "#;

        assert_eq!(
            output(source),
            "zero is truthy\nempty string is truthy\nnil is falsy\nfalse is falsy\ntrue\nfalse\n"
        );
    }

    #[test]
    fn test_while_and_for() {
        assert_eq!(
            output("var i = 0; while (i < 3) { print i; i = i + 1; }"),
            "0\n1\n2\n"
        );
        assert_eq!(
            output("for (var i = 0; i < 3; i = i + 1) print i;"),
            "0\n1\n2\n"
        );
    }

    #[test]
    fn test_for_loop_variable_is_scoped_to_loop() {
        let (_, message) = runtime_error("for (var i = 0; i < 1; i = i + 1) {} print i;");

        assert_eq!(message, "Undefined variable 'i'.\n[line 1]");
    }

    // ── functions ──────────────────────────────────────────────────────────

    #[test]
    fn test_recursion() {
        let source = r#"
            fun fib(n) {
              if (n < 2) return n;
              return fib(n - 1) + fib(n - 2);
            }
            fun fact(n) {
              if (n <= 1) return 1;
              return n * fact(n - 1);
            }
            print fib(10);
            print fact(5);
        "#;

        assert_eq!(output(source), "55\n120\n");
    }

    #[test]
    fn test_deep_recursion_completes() {
        let source = r#"
            fun depth(n) {
              if (n < 1) return 0;
              return depth(n - 1) + 1;
            }
            print depth(10000);
        "#;

        assert_eq!(output(source), "10000\n");
    }

    #[test]
    fn test_deep_mutual_recursion_completes() {
        let source = r#"
            fun isEven(n) {
              if (n == 0) return true;
              return isOdd(n - 1);
            }
            fun isOdd(n) {
              if (n == 0) return false;
              return isEven(n - 1);
            }
            print isEven(20001);
        "#;

        assert_eq!(output(source), "false\n");
    }

    #[test]
    fn test_local_recursion() {
        let source = r#"
            {
              fun count(n) {
                if (n > 0) count(n - 1);
                print n;
              }
              count(2);
            }
        "#;

        assert_eq!(output(source), "0\n1\n2\n");
    }

    #[test]
    fn test_return_unwinds_through_loops_and_blocks() {
        let source = r#"
            fun find() {
              var i = 0;
              while (true) {
                {
                  if (i == 3) return i;
                }
                i = i + 1;
              }
            }
            print find();
        "#;

        assert_eq!(output(source), "3\n");
    }

    #[test]
    fn test_implicit_nil_return() {
        assert_eq!(
            output("fun nothing() {} fun bare() { return; } print nothing(); print bare();"),
            "nil\nnil\n"
        );
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        let source = r#"
            var log = "";
            fun note(x) { log = log + x; return x; }
            fun three(a, b, c) { return a + b + c; }
            print three(note("a"), note("b"), note("c"));
            print log;
        "#;

        assert_eq!(output(source), "abc\nabc\n");
    }

    #[test]
    fn test_functions_are_values() {
        assert_eq!(
            output("fun f() {} var g = f; print f; print g == f; print clock;"),
            "<fn f>\ntrue\n<native fn>\n"
        );
    }

    #[test]
    fn test_clock_returns_seconds() {
        assert_eq!(output("print clock() > 1000000000;"), "true\n");
    }

    // ── values ─────────────────────────────────────────────────────────────

    #[test]
    fn test_arithmetic_and_formatting() {
        assert_eq!(
            output(r#"print 1 + 2 * 3; print 10 / 4; print -3 - 1; print "foo" + "bar";"#),
            "7\n2.5\n-4\nfoobar\n"
        );
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        assert_eq!(
            output("print 1 / 0; print -1 / 0; print 0 / 0;"),
            "+Inf\n-Inf\nNaN\n"
        );
    }

    #[test]
    fn test_equality() {
        let source = r#"
            print nil == nil;
            print nil == false;
            print 1 == 1;
            print "a" == "a";
            print 1 == "1";
            print true != false;
            var nan = 0 / 0;
            print nan == nan;
        "#;

        assert_eq!(
            output(source),
            "true\nfalse\ntrue\ntrue\nfalse\ntrue\nfalse\n"
        );
    }

    #[test]
    fn test_evaluate_single_expression() {
        assert_eq!(evaluate("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(evaluate("\"a\" + \"b\""), Value::from("ab"));
        assert_eq!(evaluate("!(1 < 2)"), Value::Bool(false));
        assert_eq!(evaluate("nil"), Value::Nil);
    }

    // ── runtime errors ─────────────────────────────────────────────────────

    #[test]
    fn test_mixed_plus_is_a_runtime_error() {
        let (printed, message) = runtime_error("1 + \"a\";");

        assert_eq!(printed, "");
        assert_eq!(message, "Operands must be two numbers or two strings.\n[line 1]");
    }

    #[test]
    fn test_numeric_operand_errors() {
        assert_eq!(
            runtime_error("-\"x\";").1,
            "Operand must be a number.\n[line 1]"
        );
        assert_eq!(
            runtime_error("print 1 < \"2\";").1,
            "Operands must be numbers.\n[line 1]"
        );
        assert_eq!(
            runtime_error("print nil * 2;").1,
            "Operands must be numbers.\n[line 1]"
        );
    }

    #[test]
    fn test_error_halts_the_unit() {
        let (printed, message) = runtime_error("print 1;\n\nprint nil + 1;\nprint 2;");

        assert_eq!(printed, "1\n");
        assert_eq!(message, "Operands must be two numbers or two strings.\n[line 3]");
    }

    #[test]
    fn test_arity_mismatch() {
        let (_, message) = runtime_error("fun f(a, b) {}\nf(1);");
        assert_eq!(message, "Expected 2 arguments but got 1.\n[line 2]");

        let (_, message) = runtime_error("fun f(a) {} f(1, 2);");
        assert_eq!(message, "Expected 1 arguments but got 2.\n[line 1]");

        let (_, message) = runtime_error("clock(1);");
        assert_eq!(message, "Expected 0 arguments but got 1.\n[line 1]");
    }

    #[test]
    fn test_calling_a_non_callable() {
        let (_, message) = runtime_error("\"not a function\"();");

        assert_eq!(message, "Can only call functions.\n[line 1]");
    }

    #[test]
    fn test_undefined_variables() {
        assert_eq!(
            runtime_error("print missing;").1,
            "Undefined variable 'missing'.\n[line 1]"
        );
        assert_eq!(
            runtime_error("missing = 1;").1,
            "Undefined variable 'missing'.\n[line 1]"
        );
    }

    #[test]
    fn test_error_inside_function_is_not_a_return() {
        let source = r#"
            fun boom() {
              return nil + 1;
            }
            var result = "unset";
            result = boom();
            print result;
        "#;

        let (printed, message) = runtime_error(source);

        assert_eq!(printed, "");
        assert_eq!(message, "Operands must be two numbers or two strings.\n[line 3]");
    }
}
