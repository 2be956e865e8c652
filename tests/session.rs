#[cfg(test)]
mod session_tests {
    use lox_interpreter as lox;
    use pretty_assertions::assert_eq;

    use lox::diagnostics::{Diagnostics, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};
    use lox::session::Session;
    use lox::token::{Token, TokenType};
    use lox::value::Value;

    fn printed(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(session.output()).into_owned()
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.errors().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_globals_persist_between_units() {
        let mut session = Session::with_output(Vec::new());

        assert!(session.run("var a = 1;").is_empty());
        assert!(session.run("a = a + 1;").is_empty());
        assert!(session.run("print a;").is_empty());

        assert_eq!(printed(&session), "2\n");
        assert_eq!(
            session
                .interpreter()
                .globals()
                .borrow()
                .get(&Token::new(TokenType::IDENTIFIER, "a", 1))
                .unwrap(),
            Value::Number(2.0)
        );
    }

    #[test]
    fn test_closure_from_an_earlier_unit_keeps_working() {
        let mut session = Session::with_output(Vec::new());

        session.run(
            "fun makeAdder(n) { fun add(x) { return x + n; } return add; } var add2 = makeAdder(2);",
        );
        let diagnostics = session.run("print add2(40);");

        assert!(diagnostics.is_empty());
        assert_eq!(printed(&session), "42\n");
    }

    #[test]
    fn test_runtime_error_leaves_session_usable() {
        let mut session = Session::with_output(Vec::new());

        session.run("var x = \"kept\";");
        let diagnostics = session.run("{ var x = 1; print nil + x; }");

        assert_eq!(diagnostics.exit_code(), Some(EXIT_RUNTIME_ERROR));

        // The block's environment was unwound along with the error.
        let diagnostics = session.run("print x;");
        assert!(diagnostics.is_empty());
        assert_eq!(printed(&session), "kept\n");
    }

    #[test]
    fn test_runtime_error_inside_call_restores_environment() {
        let mut session = Session::with_output(Vec::new());

        session.run("var v = \"global\"; fun f(v) { return v + nil; }");
        let diagnostics = session.run("f(1);");
        assert!(diagnostics.had_runtime_error());

        session.run("print v;");
        assert_eq!(printed(&session), "global\n");
    }

    #[test]
    fn test_parse_error_skips_the_whole_unit() {
        let mut session = Session::with_output(Vec::new());
        let diagnostics = session.run("print 1;\nprint (;\nprint 3;");

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 2] Error at ';': Expect expression."]
        );
        assert_eq!(diagnostics.exit_code(), Some(EXIT_STATIC_ERROR));
        assert_eq!(printed(&session), "");
    }

    #[test]
    fn test_lex_error_skips_the_whole_unit() {
        let mut session = Session::with_output(Vec::new());
        let diagnostics = session.run("print 1; @");

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error: Unexpected character: @"]
        );
        assert_eq!(printed(&session), "");
    }

    #[test]
    fn test_resolve_error_skips_the_whole_unit() {
        let mut session = Session::with_output(Vec::new());
        let diagnostics = session.run("print 1;\nreturn 2;");

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 2] Error at 'return': Can't return from top-level code."]
        );
        assert_eq!(diagnostics.exit_code(), Some(EXIT_STATIC_ERROR));
        assert_eq!(printed(&session), "");
    }

    #[test]
    fn test_static_error_does_not_poison_the_next_unit() {
        let mut session = Session::with_output(Vec::new());

        assert!(session.run("var = ;").had_error());
        let diagnostics = session.run("print \"fine\";");

        assert_eq!(diagnostics.exit_code(), None);
        assert_eq!(printed(&session), "fine\n");
    }

    #[test]
    fn test_deeply_nested_expression_runs() {
        let depth: usize = 2000;
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));

        let mut session = Session::with_output(Vec::new());
        let diagnostics = session.run(&source);

        assert!(diagnostics.is_empty());
        assert_eq!(printed(&session), "1\n");
    }

    #[test]
    fn test_deeply_nested_blocks_run() {
        let depth: usize = 2000;
        let source = format!("{}print \"deep\";{}", "{".repeat(depth), "}".repeat(depth));

        let mut session = Session::with_output(Vec::new());
        let diagnostics = session.run(&source);

        assert!(diagnostics.is_empty());
        assert_eq!(printed(&session), "deep\n");
    }

    #[test]
    fn test_exit_code_prefers_static_errors() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.exit_code(), None);

        let paren = Token::new(TokenType::RIGHT_PAREN, ")", 4);
        let error = lox::error::LoxError::runtime(&paren, "boom");
        assert_eq!(error.line(), Some(4));
        assert!(!error.is_static());

        diagnostics.report(error);
        assert_eq!(diagnostics.exit_code(), Some(EXIT_RUNTIME_ERROR));

        diagnostics.error(4, "late static error");
        assert_eq!(diagnostics.exit_code(), Some(EXIT_STATIC_ERROR));
        assert_eq!(diagnostics.len(), 2);
    }
}
