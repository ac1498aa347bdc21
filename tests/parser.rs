#[cfg(test)]
mod parser_tests {
    use lox::ast_printer::AstPrinter;
    use lox::error::LoxError;
    use lox::parser::Parser;
    use lox::scanner::Scanner;
    use lox::stmt::Stmt;
    use lox::token::Token;

    fn parse(source: &str) -> (Vec<Stmt>, Vec<LoxError>) {
        let tokens: Vec<Token> = Scanner::new(source.as_bytes().to_vec())
            .collect::<Result<Vec<_>, _>>()
            .expect("scan error");
        Parser::new(tokens).parse()
    }

    fn parse_clean(source: &str) -> Vec<Stmt> {
        let (statements, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        statements
    }

    fn printed(source: &str) -> String {
        AstPrinter::print_program(&parse_clean(source))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(printed("print 1 + 2 * 3;"), "print 1 + 2 * 3;");
        assert_eq!(printed("(1 + 2) * 3;"), "(1 + 2) * 3;");
    }

    #[test]
    fn comparison_and_equality_chain() {
        assert_eq!(printed("1 < 2 == true;"), "1 < 2 == true;");
        assert_eq!(printed("!true == false;"), "!true == false;");
    }

    #[test]
    fn logical_operators_nest_or_over_and() {
        assert_eq!(printed("a or b and c;"), "a or b and c;");
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1;"), "a = b = 1;");
    }

    #[test]
    fn calls_and_property_access() {
        assert_eq!(printed("f(1, 2)(3);"), "f(1, 2)(3);");
        assert_eq!(printed("a.b.c = 1;"), "a.b.c = 1;");
        assert_eq!(printed("obj.method(x);"), "obj.method(x);");
    }

    #[test]
    fn for_loop_desugars_to_while() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            "{ var i = 0; while (i < 3) { print i; i = i + 1; } }"
        );
    }

    #[test]
    fn for_loop_with_empty_clauses() {
        assert_eq!(printed("for (;;) print 1;"), "while (true) print 1;");
        assert_eq!(
            printed("for (; a < 3;) print a;"),
            "while (a < 3) print a;"
        );
    }

    #[test]
    fn class_with_superclass_and_methods() {
        assert_eq!(
            printed("class B < A { say() { super.say(); print this; } }"),
            "class B < A { say() { super.say(); print this; } }"
        );
    }

    #[test]
    fn invalid_assignment_target() {
        let (_, errors) = parse("1 = 2;");
        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].to_string().contains("Invalid assignment target."),
            "got: {}",
            errors[0]
        );
    }

    #[test]
    fn parse_error_synchronizes_to_next_statement() {
        let (statements, errors) = parse("var = 1; print 2;");

        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Expect variable name."));
        // The statement after the bad declaration still parses.
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Stmt::Print(_)));
    }

    #[test]
    fn error_diagnostics_carry_token_location() {
        let (_, errors) = parse("print;");
        assert_eq!(errors.len(), 1);
        assert!(
            errors[0]
                .to_string()
                .contains("at ;: Parse Error: Expect expression."),
            "got: {}",
            errors[0]
        );

        let (_, errors) = parse("print 1");
        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].to_string().contains("at EOF: Parse Error:"),
            "got: {}",
            errors[0]
        );
    }

    fn function_with_params(count: usize) -> String {
        let params: Vec<String> = (0..count).map(|i| format!("p{}", i)).collect();
        format!("fun f({}) {{}}", params.join(", "))
    }

    fn call_with_args(count: usize) -> String {
        let args: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        format!("f({});", args.join(", "))
    }

    #[test]
    fn parameter_limit_is_255() {
        let (_, errors) = parse(&function_with_params(255));
        assert!(errors.is_empty(), "255 parameters should parse");

        let (_, errors) = parse(&function_with_params(256));
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("Can't have more than 255 parameters."));
    }

    #[test]
    fn argument_limit_is_255() {
        let (_, errors) = parse(&call_with_args(255));
        assert!(errors.is_empty(), "255 arguments should parse");

        let (_, errors) = parse(&call_with_args(256));
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("Can't have more than 255 arguments."));
    }

    #[test]
    fn printing_and_reparsing_is_stable() {
        let source = r#"
            class Counter {
                init() { this.n = 0; }
                tick() { this.n = this.n + 1; return this.n; }
            }
            class Loud < Counter {
                tick() { print "tick"; return super.tick(); }
            }
            fun run(c) {
                for (var i = 0; i < 3; i = i + 1) {
                    if (c == nil) return;
                    print c.tick();
                }
            }
            var c = Loud();
            run(c);
            print 1 + 2 * (3 - 4) / -5;
            print "a" + "b" == "ab" or false;
        "#;

        let first = AstPrinter::print_program(&parse_clean(source));
        let second = AstPrinter::print_program(&parse_clean(&first));
        assert_eq!(first, second);
    }
}
