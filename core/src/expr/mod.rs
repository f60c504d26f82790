//! Arithmetic expression language.
//!
//! Source text flows through three stages, each of which may fail with an [`Error`]:
//! 1. [`lex::tokenize`] splits the text into tokens.
//! 2. [`parse::parse`] builds an expression tree from the tokens.
//! 3. [`eval::eval`] reduces the tree to a [`Value`].
//!
//! # Inspiration
//! + [Crafting Interpreters](https://craftinginterpreters.com)
pub mod ast;
pub mod context;
pub mod env;
pub mod error;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod position;
pub mod token;
pub mod value;

pub use context::Context;
pub use env::Environment;
pub use error::Error;
pub use value::{Number, Value};

use std::rc::Rc;

/// Tokenize, parse, and evaluate `text`.
/// Stops at the first error.
/// + `name`: Name of the source, used when reporting errors.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(name = %name.as_ref())))]
pub fn run(
    name: impl AsRef<str>,
    text: impl AsRef<str>,
    env: &mut Environment<'_>,
) -> Result<Value, Error> {
    let lex = lex::tokenize(name.as_ref(), text.as_ref())?;
    let ast = parse::parse(&lex)?;
    let ctx = Rc::new(Context::new(context::PROGRAM));
    eval::eval(&ast, env, &ctx)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn run_pipeline() {
        let mut env = Environment::new();
        let value = run("<test>", "VAR a = 5", &mut env).unwrap();
        assert_eq!(value.number, Number::Int(5));
        let value = run("<test>", "a + 1", &mut env).unwrap();
        assert_eq!(value.to_string(), "6");

        let value = run("<test>", "2 * 1.5", &mut env).unwrap();
        assert_eq!(value.to_string(), "3.0");
    }

    #[test]
    fn run_is_repeatable() {
        let src = "VAR x = 2 ^ 3 ^ 2 / 4";
        let mut first = Environment::new();
        let mut second = Environment::new();
        let a = run("<test>", src, &mut first).unwrap();
        let b = run("<test>", src, &mut second).unwrap();
        assert_eq!(a.number, b.number);
        assert_eq!(first.get("x"), second.get("x"));
    }

    #[test]
    fn run_stops_at_first_error() {
        // the parser never sees `)` and the assignment never runs
        let mut env = Environment::new();
        let err = run("<test>", "VAR a = 1 @ )", &mut env).unwrap_err();
        assert!(matches!(err.kind, error::Kind::Tokenize(_)));
        assert!(!env.contains("a"));

        let err = run("<test>", "VAR a = (1", &mut env).unwrap_err();
        assert!(matches!(err.kind, error::Kind::Parse(_)));
        assert!(!env.contains("a"));
    }

    #[test]
    fn run_deep_nesting_is_an_error() {
        let mut env = Environment::new();
        let depth = 10_000;
        let src = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let err = run("<test>", src, &mut env).unwrap_err();
        assert!(matches!(err.kind, error::Kind::Parse(_)));
        assert!(err.to_string().starts_with("Invalid Syntax: expression nested too deeply"));

        let src = format!("{}1", "-".repeat(20_000));
        let err = run("<test>", src, &mut env).unwrap_err();
        assert!(matches!(err.kind, error::Kind::Parse(_)));

        let value = run("<test>", "((((-(-(2 ^ 2 ^ 2))))))", &mut env).unwrap();
        assert_eq!(value.number, Number::Int(16));
    }

    #[test]
    fn run_render() {
        let mut env = Environment::new();
        let err = run("<stdin>", "1 / 0", &mut env).unwrap_err();
        assert_eq!(
            err.render(),
            "Traceback (most recent call last):\n  \
            File <stdin>, Line 1, in <program>\n\
            Runtime Error: division by zero\n\
            File <stdin>, Line 1\n\
            1 / 0\n    ^"
        );

        let err = run("<stdin>", "(1 + 2", &mut env).unwrap_err();
        assert_eq!(
            err.render(),
            "Invalid Syntax: expected ')', found end of input\n\
            File <stdin>, Line 1\n\
            (1 + 2\n      ^"
        );

        let err = run("<stdin>", "2 + a", &mut env).unwrap_err();
        assert!(
            err.render()
                .ends_with("Runtime Error: a is not defined\nFile <stdin>, Line 1\n2 + a\n    ^")
        );
    }
}
