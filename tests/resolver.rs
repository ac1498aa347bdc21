#[cfg(test)]
mod resolver_tests {
    use lox::error::LoxError;
    use lox::interpreter::Interpreter;
    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::scanner::Scanner;
    use lox::stmt::Stmt;
    use lox::token::Token;

    fn parse(source: &str) -> Vec<Stmt> {
        let tokens: Vec<Token> = Scanner::new(source.as_bytes().to_vec())
            .collect::<Result<Vec<_>, _>>()
            .expect("scan error");
        let (statements, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
        statements
    }

    fn resolve(source: &str) -> Result<(), LoxError> {
        let statements = parse(source);
        let mut interpreter = Interpreter::new();
        Resolver::new(&mut interpreter).resolve(&statements)
    }

    fn expect_resolve_error(source: &str, fragment: &str) {
        match resolve(source) {
            Err(e) => {
                let text = e.to_string();
                assert!(text.contains("Resolve Error"), "wrong kind: {}", text);
                assert!(text.contains(fragment), "got: {}", text);
            }
            Ok(()) => panic!("expected resolve error for {:?}", source),
        }
    }

    #[test]
    fn top_level_return_is_rejected() {
        expect_resolve_error("return 1;", "Can't return from top-level code.");
        expect_resolve_error("return;", "Can't return from top-level code.");
    }

    #[test]
    fn return_inside_function_is_fine() {
        assert!(resolve("fun f() { return 1; }").is_ok());
    }

    #[test]
    fn initializer_cannot_return_a_value() {
        expect_resolve_error(
            "class A { init() { return 1; } }",
            "Can't return a value from an initializer.",
        );

        // A bare return only short-circuits; it is allowed.
        assert!(resolve("class A { init() { return; } }").is_ok());
    }

    #[test]
    fn this_outside_a_class_is_rejected() {
        expect_resolve_error("print this;", "Can't use 'this' outside a class.");
        expect_resolve_error(
            "fun f() { return this; }",
            "Can't use 'this' outside a class.",
        );
    }

    #[test]
    fn super_outside_a_class_is_rejected() {
        expect_resolve_error("super.cook();", "Can't use 'super' outside of a class.");
    }

    #[test]
    fn super_without_a_superclass_is_rejected() {
        expect_resolve_error(
            "class A { say() { super.say(); } }",
            "Can't use 'super' in a class with no superclass.",
        );
    }

    #[test]
    fn super_in_a_subclass_is_fine() {
        assert!(resolve("class A { say() {} } class B < A { say() { super.say(); } }").is_ok());
    }

    #[test]
    fn class_cannot_inherit_from_itself() {
        expect_resolve_error("class A < A {}", "A class can't inherit from itself.");
    }

    #[test]
    fn duplicate_declaration_in_local_scope_is_rejected() {
        expect_resolve_error(
            "fun f() { var a = 1; var a = 2; }",
            "Already a variable with this name in this scope.",
        );

        // Global redeclaration stays legal.
        assert!(resolve("var a = 1; var a = 2;").is_ok());
    }

    #[test]
    fn reading_a_local_in_its_own_initializer_is_rejected() {
        expect_resolve_error(
            "fun f() { var a = a; }",
            "Can't read local variable in its own initializer.",
        );

        // At global scope the same text is accepted.
        assert!(resolve("var a = a;").is_ok());
    }

    #[test]
    fn shadowing_an_outer_variable_is_fine() {
        assert!(resolve("var a = 1; { var a = a; }").is_err()); // own-initializer read
        assert!(resolve("var a = 1; { var b = a; }").is_ok());
    }

    #[test]
    fn locals_record_lexical_depths() {
        let statements = parse(
            "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; }",
        );
        let mut interpreter = Interpreter::new();
        Resolver::new(&mut interpreter)
            .resolve(&statements)
            .expect("resolve");

        // i (depth 1 from inc's body), i (read, depth 1), i (return, depth 1),
        // inc (depth 0 from make's body) all resolve as locals.
        assert!(!interpreter.locals().is_empty());
        assert!(interpreter.locals().values().any(|d| *d == 1));
    }

    #[test]
    fn resolving_twice_produces_the_same_table() {
        let statements = parse(
            "var g = 1;
             fun outer() {
                 var a = 2;
                 fun inner(b) { return a + b + g; }
                 return inner;
             }",
        );

        let mut interpreter = Interpreter::new();
        Resolver::new(&mut interpreter)
            .resolve(&statements)
            .expect("first resolve");
        let first = interpreter.locals().clone();

        Resolver::new(&mut interpreter)
            .resolve(&statements)
            .expect("second resolve");
        let second = interpreter.locals().clone();

        assert_eq!(first, second);
    }
}
