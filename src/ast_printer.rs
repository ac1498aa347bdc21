use crate::expr::{Expr, LiteralValue};
use crate::stmt::{FunctionDecl, Stmt};
use crate::value::format_number;

/// Renders a syntax tree back to canonical source form.
///
/// The output is valid program text: parsing it again yields an equivalent
/// tree, modulo whitespace and the fact that `for` loops were already
/// desugared into their block/while form before printing.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_program(statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(Self::print_stmt)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("{};", Self::print_expr(expr)),

            Stmt::Print(expr) => format!("print {};", Self::print_expr(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("var {} = {};", name.lexeme, Self::print_expr(init)),
                None => format!("var {};", name.lexeme),
            },

            Stmt::Block(statements) => Self::print_block(statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut s = format!(
                    "if ({}) {}",
                    Self::print_expr(condition),
                    Self::print_stmt(then_branch)
                );
                if let Some(eb) = else_branch {
                    s.push_str(&format!(" else {}", Self::print_stmt(eb)));
                }
                s
            }

            Stmt::While { condition, body } => format!(
                "while ({}) {}",
                Self::print_expr(condition),
                Self::print_stmt(body)
            ),

            Stmt::Function(declaration) => Self::print_function(declaration, "fun "),

            Stmt::Return { value, .. } => match value {
                Some(expr) => format!("return {};", Self::print_expr(expr)),
                None => "return;".to_string(),
            },

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let mut s = format!("class {}", name.lexeme);
                if let Some(superclass) = superclass {
                    s.push_str(&format!(" < {}", Self::print_expr(superclass)));
                }
                s.push_str(" {");
                for method in methods {
                    s.push(' ');
                    // Methods carry no `fun` keyword.
                    s.push_str(&Self::print_function(method, ""));
                }
                s.push_str(" }");
                s
            }
        }
    }

    pub fn print_expr(expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => match lit {
                LiteralValue::True => "true".into(),

                LiteralValue::False => "false".into(),

                LiteralValue::Nil => "nil".into(),

                LiteralValue::Str(s) => format!("\"{}\"", s),

                LiteralValue::Number(n) => format_number(*n),
            },

            Expr::Grouping(inner) => format!("({})", Self::print_expr(inner)),

            Expr::Unary { operator, right } => {
                format!("{}{}", operator.lexeme, Self::print_expr(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "{} {} {}",
                Self::print_expr(left),
                operator.lexeme,
                Self::print_expr(right)
            ),

            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                format!("{} = {}", name.lexeme, Self::print_expr(value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let args = arguments
                    .iter()
                    .map(Self::print_expr)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", Self::print_expr(callee), args)
            }

            Expr::Get { object, name } => {
                format!("{}.{}", Self::print_expr(object), name.lexeme)
            }

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "{}.{} = {}",
                Self::print_expr(object),
                name.lexeme,
                Self::print_expr(value)
            ),

            Expr::This { .. } => "this".to_string(),

            Expr::Super { method, .. } => format!("super.{}", method.lexeme),
        }
    }

    fn print_block(statements: &[Stmt]) -> String {
        if statements.is_empty() {
            return "{}".to_string();
        }

        let inner = statements
            .iter()
            .map(Self::print_stmt)
            .collect::<Vec<_>>()
            .join(" ");
        format!("{{ {} }}", inner)
    }

    fn print_function(declaration: &FunctionDecl, keyword: &str) -> String {
        let params = declaration
            .params
            .iter()
            .map(|p| p.lexeme.clone())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{}{}({}) {}",
            keyword,
            declaration.name.lexeme,
            params,
            Self::print_block(&declaration.body)
        )
    }
}
