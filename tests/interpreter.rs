#[cfg(test)]
mod interpreter_tests {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    use lox::error::LoxError;
    use lox::interpreter::Interpreter;
    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::scanner::Scanner;
    use lox::stmt::Stmt;
    use lox::token::Token;

    /// A cloneable sink so the test can read back what `print` wrote.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).expect("utf8 output")
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn parse(source: &str) -> Vec<Stmt> {
        let tokens: Vec<Token> = Scanner::new(source.as_bytes().to_vec())
            .collect::<Result<Vec<_>, _>>()
            .expect("scan error");
        let (statements, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
        statements
    }

    fn run_source(source: &str) -> Result<String, LoxError> {
        let statements = parse(source);

        let buf = SharedBuf::default();
        let mut interpreter = Interpreter::with_output(Box::new(buf.clone()));

        Resolver::new(&mut interpreter).resolve(&statements)?;
        interpreter.interpret(&statements)?;

        Ok(buf.contents())
    }

    fn expect_output(source: &str, expected: &str) {
        match run_source(source) {
            Ok(output) => assert_eq!(output, expected, "for source: {}", source),
            Err(e) => panic!("unexpected error for {:?}: {}", source, e),
        }
    }

    fn expect_runtime_error(source: &str, fragment: &str) {
        match run_source(source) {
            Err(e) => {
                let text = e.to_string();
                assert!(text.contains("Runtime Error"), "wrong kind: {}", text);
                assert!(text.contains(fragment), "got: {}", text);
            }
            Ok(output) => panic!("expected runtime error, got output {:?}", output),
        }
    }

    #[test]
    fn arithmetic_precedence() {
        expect_output("print 1 + 2 * 3;", "7\n");
        expect_output("print (1 + 2) * 3;", "9\n");
        expect_output("print 10 / 4;", "2.5\n");
        expect_output("print -3 + 1;", "-2\n");
    }

    #[test]
    fn string_concatenation() {
        expect_output("var a = \"hi\"; var b = \" there\"; print a + b;", "hi there\n");
        // Empty string is the identity.
        expect_output("print \"\" + \"x\" + \"\";", "x\n");
    }

    #[test]
    fn value_stringification() {
        expect_output("print nil;", "nil\n");
        expect_output("print true;", "true\n");
        expect_output("print 2.0;", "2\n");
        expect_output("print 0.5;", "0.5\n");
        expect_output("fun f() {} print f;", "<fn f>\n");
        expect_output("class A {} print A;", "A\n");
        expect_output("class A {} print A();", "A instance\n");
        expect_output("print clock;", "<native fn>\n");
    }

    #[test]
    fn truthiness() {
        expect_output("print !nil;", "true\n");
        expect_output("print !false;", "true\n");
        // Zero and the empty string are truthy.
        expect_output("print !0;", "false\n");
        expect_output("print !\"\";", "false\n");
    }

    #[test]
    fn equality_semantics() {
        expect_output("print nil == nil;", "true\n");
        expect_output("print 1 == 1;", "true\n");
        expect_output("print \"a\" == \"a\";", "true\n");
        expect_output("print 1 == \"1\";", "false\n");
        expect_output("print 1 != 2;", "true\n");
        // Instances compare by identity.
        expect_output(
            "class A {} var x = A(); var y = A(); print x == y; print x == x;",
            "false\ntrue\n",
        );
    }

    #[test]
    fn logical_operators_short_circuit() {
        expect_output("print nil or \"yes\";", "yes\n");
        expect_output("print false and 1;", "false\n");
        expect_output("print 1 and 2;", "2\n");
        // The right side must not run when short-circuited.
        expect_output(
            "fun boom() { print \"boom\"; return true; } print true or boom();",
            "true\n",
        );
    }

    #[test]
    fn control_flow() {
        expect_output("if (1 < 2) print \"yes\"; else print \"no\";", "yes\n");
        expect_output(
            "var i = 0; while (i < 3) { print i; i = i + 1; }",
            "0\n1\n2\n",
        );
        expect_output(
            "for (var i = 0; i < 3; i = i + 1) print i;",
            "0\n1\n2\n",
        );
    }

    #[test]
    fn recursive_function() {
        expect_output(
            "fun f(n) { if (n <= 1) return 1; return n * f(n - 1); } print f(5);",
            "120\n",
        );
    }

    #[test]
    fn closures_capture_their_environment() {
        expect_output(
            "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } \
             var c = make(); print c(); print c(); print c();",
            "1\n2\n3\n",
        );

        // Two closures from separate calls do not share state.
        expect_output(
            "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } \
             var a = make(); var b = make(); print a(); print a(); print b();",
            "1\n2\n1\n",
        );
    }

    #[test]
    fn closures_bind_lexically_not_dynamically() {
        expect_output(
            "var a = \"global\"; { fun show() { print a; } show(); var a = \"block\"; show(); }",
            "global\nglobal\n",
        );
    }

    #[test]
    fn methods_and_fields() {
        expect_output(
            "class Counter { init() { this.n = 0; } tick() { this.n = this.n + 1; return this.n; } } \
             var k = Counter(); print k.tick(); print k.tick();",
            "1\n2\n",
        );

        // Fields shadow methods on read.
        expect_output(
            "class A { f() { return \"method\"; } } var a = A(); a.f = \"field\"; print a.f;",
            "field\n",
        );
    }

    #[test]
    fn inheritance_and_super() {
        expect_output(
            "class A { say() { print \"A\"; } } \
             class B < A { say() { super.say(); print \"B\"; } } \
             B().say();",
            "A\nB\n",
        );

        // Methods are inherited when not overridden.
        expect_output(
            "class A { say() { print \"A\"; } } class B < A {} B().say();",
            "A\n",
        );
    }

    #[test]
    fn initializer_always_returns_the_instance() {
        expect_output(
            "class A { init() { this.x = 1; } } print A().x;",
            "1\n",
        );

        // Bare `return;` in an initializer still yields `this`.
        expect_output(
            "class A { init() { this.x = 1; if (true) return; this.x = 2; } } print A().x;",
            "1\n",
        );

        // Re-invoking init through the instance returns the same instance.
        expect_output(
            "class A { init() {} } var a = A(); print a.init() == a;",
            "true\n",
        );
    }

    #[test]
    fn initializer_arity_is_class_arity() {
        expect_output(
            "class P { init(x, y) { this.x = x; this.y = y; } } var p = P(3, 4); print p.x + p.y;",
            "7\n",
        );
        expect_runtime_error(
            "class P { init(x, y) {} } P(1);",
            "Expected 2 arguments but got 1.",
        );
        expect_runtime_error("class A {} A(1);", "Expected 0 arguments but got 1.");
    }

    #[test]
    fn bound_methods_remember_their_receiver() {
        expect_output(
            "class A { init(name) { this.name = name; } who() { print this.name; } } \
             var m = A(\"left\").who; m();",
            "left\n",
        );
    }

    #[test]
    fn global_var_reads_itself_as_nil() {
        expect_output("var a = a; print a;", "nil\n");
        // Redeclaration sees the previous value.
        expect_output("var a = 1; var a = a + 1; print a;", "2\n");
    }

    #[test]
    fn clock_is_a_number() {
        expect_output("print clock() > 0;", "true\n");
    }

    #[test]
    fn unary_operand_must_be_a_number() {
        expect_runtime_error("print -\"x\";", "Operand must be a number.");
    }

    #[test]
    fn binary_operands_must_be_numbers() {
        expect_runtime_error("\"x\" - 1;", "Operands must be numbers");
        expect_runtime_error("1 < \"x\";", "Operands must be numbers");
    }

    #[test]
    fn plus_rejects_mixed_operands() {
        expect_runtime_error("1 + \"x\";", "Operands must be two numbers or strings.");
    }

    #[test]
    fn only_callables_can_be_called() {
        expect_runtime_error("var x; x();", "Can only call functions and classes.");
        expect_runtime_error("\"text\"();", "Can only call functions and classes.");
    }

    #[test]
    fn arity_is_checked_exactly() {
        expect_runtime_error(
            "fun f(a, b) {} f(1);",
            "Expected 2 arguments but got 1.",
        );
        expect_runtime_error(
            "fun f() {} f(1);",
            "Expected 0 arguments but got 1.",
        );
    }

    #[test]
    fn undefined_variable_read() {
        expect_runtime_error("print missing;", "Undefined variable: 'missing'.");
        expect_runtime_error("missing = 1;", "Undefined variable: 'missing'.");
    }

    #[test]
    fn property_access_requires_instances() {
        expect_runtime_error("var x = 1; print x.field;", "Only instances have properties.");
        expect_runtime_error("var x = 1; x.field = 2;", "Only instances have fields.");
        expect_runtime_error(
            "class A {} print A().missing;",
            "Undefined property 'missing'.",
        );
    }

    #[test]
    fn superclass_must_be_a_class() {
        expect_runtime_error(
            "var NotAClass = \"so not\"; class A < NotAClass {}",
            "Superclass must be a class.",
        );
    }

    #[test]
    fn missing_super_method_is_a_runtime_error() {
        expect_runtime_error(
            "class A {} class B < A { go() { super.gone(); } } B().go();",
            "Undefined property 'gone'.",
        );
    }

    #[test]
    fn environment_is_restored_after_a_runtime_error() {
        let statements = parse("var a = 1; { var a = 2; \"x\" - 1; }");
        let buf = SharedBuf::default();
        let mut interpreter = Interpreter::with_output(Box::new(buf.clone()));
        Resolver::new(&mut interpreter)
            .resolve(&statements)
            .expect("resolve");
        assert!(interpreter.interpret(&statements).is_err());

        // The block's frame was popped on the error path: `a` is the global.
        let follow_up = parse("print a;");
        Resolver::new(&mut interpreter)
            .resolve(&follow_up)
            .expect("resolve");
        interpreter.interpret(&follow_up).expect("interpret");
        assert_eq!(buf.contents(), "1\n");
    }

    #[test]
    fn return_unwinds_nested_blocks_but_not_past_the_call() {
        expect_output(
            "fun f() { while (true) { { return \"deep\"; } } } print f(); print \"after\";",
            "deep\nafter\n",
        );
    }

    #[test]
    fn function_without_return_yields_nil() {
        expect_output("fun f() { 1 + 1; } print f();", "nil\n");
    }
}
